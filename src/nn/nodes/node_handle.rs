/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 节点句柄：计算图中节点的通用部分（id、名称、值、梯度、detach 状态）
 */

use super::raw_node::{NodeType, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    value: Option<Tensor>,
    /// 结果节点（loss）对本节点的梯度，形状与值相同
    grad: Option<Tensor>,
    detached: bool,
}

impl NodeHandle {
    pub(crate) fn new(id: NodeId, name: &str, raw_node: NodeType) -> Self {
        Self {
            id,
            name: name.to_string(),
            raw_node,
            value: None,
            grad: None,
            detached: false,
        }
    }

    pub(crate) const fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) const fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.raw_node.type_name()
    }

    pub(crate) fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    pub(crate) fn set_value(&mut self, value: Option<Tensor>) {
        self.value = value;
    }

    pub(crate) fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    pub(crate) fn set_grad(&mut self, grad: Option<Tensor>) {
        self.grad = grad;
    }

    /// 将新梯度累加到已有梯度上（同一节点被多个子节点使用时）
    pub(crate) fn accumulate_grad(&mut self, grad: Tensor) -> Result<(), GraphError> {
        if let Some(value) = &self.value {
            if value.shape() != grad.shape() {
                return Err(GraphError::ShapeMismatch {
                    expected: value.shape().to_vec(),
                    got: grad.shape().to_vec(),
                    message: format!("{self}收到的梯度形状与值不一致"),
                });
            }
        }
        match &mut self.grad {
            Some(existing) => *existing += &grad,
            None => self.grad = Some(grad),
        }
        Ok(())
    }

    pub(crate) const fn is_detached(&self) -> bool {
        self.detached
    }

    pub(crate) fn set_detached(&mut self, detached: bool) {
        self.detached = detached;
    }

    pub(crate) const fn is_parameter(&self) -> bool {
        matches!(self.raw_node, NodeType::Parameter(_))
    }

    pub(crate) const fn is_input(&self) -> bool {
        matches!(self.raw_node, NodeType::Input(_))
    }

    /// 计算本节点对第`index`个父节点的梯度（VJP）
    pub(crate) fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        self.raw_node
            .calc_grad_to_parent(index, parents, value, upstream_grad)
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id,
            self.name,
            self.type_name()
        )
    }
}
