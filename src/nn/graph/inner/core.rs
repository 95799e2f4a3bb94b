/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 核心操作：创建、访问器与中间节点释放
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::NodeHandle;
use crate::nn::{Device, NodeId};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name_and_rng("default_graph", StdRng::from_entropy())
    }

    /// 创建一个带固定种子的计算图（确保可重复性）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_name_and_rng("default_graph", StdRng::seed_from_u64(seed))
    }

    fn with_name_and_rng(name: &str, rng: StdRng) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            backward_edges: HashMap::new(),
            next_id: 0,
            is_eval_mode: false,
            rng,
            device: Device::default(),
        }
    }

    // ========== 基础访问器 ==========

    /// 设置/重置图的随机种子
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub(in crate::nn) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn device(&self) -> Device {
        self.device
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        let mut ids = self.nodes.keys().copied().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(
        &mut self,
        id: NodeId,
    ) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_nodes(&self, ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        ids.iter().map(|&id| self.get_node(id)).collect()
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 先检查节点是否存在
        let _ = self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn get_node_grad(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.grad())
    }

    /// 设置参数节点的值（优化器更新参数时使用），形状必须与原值一致
    pub fn set_node_value(&mut self, id: NodeId, value: &Tensor) -> Result<(), GraphError> {
        let node = self.get_node_mut(id)?;
        if !node.is_parameter() {
            return Err(GraphError::InvalidOperation(format!(
                "{node}不是参数节点，其值不应该被手动设置"
            )));
        }
        if let Some(old) = node.value() {
            if old.shape() != value.shape() {
                return Err(GraphError::ShapeMismatch {
                    expected: old.shape().to_vec(),
                    got: value.shape().to_vec(),
                    message: format!("{node}的新值形状与原值不一致"),
                });
            }
        }
        node.set_value(Some(value.clone()));
        Ok(())
    }

    pub fn is_parameter_node(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(id)?.is_parameter())
    }

    /// 所有参数节点的 id（按创建顺序）
    pub fn get_parameter_nodes(&self) -> Vec<NodeId> {
        let mut ids = self
            .nodes
            .values()
            .filter(|node| node.is_parameter())
            .map(NodeHandle::id)
            .collect::<Vec<_>>();
        ids.sort();
        ids
    }

    // ========== 节点 id/名称 ==========

    pub(in crate::nn::graph) fn generate_node_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    /// 显式指定的名称须唯一；未指定时生成形如`conv2d_12`的名称
    pub(in crate::nn::graph) fn generate_node_name(
        &self,
        id: NodeId,
        name: Option<&str>,
        type_name: &str,
    ) -> Result<String, GraphError> {
        match name {
            Some(name) => {
                if self.nodes.values().any(|node| node.name() == name) {
                    return Err(GraphError::DuplicateNodeName(format!(
                        "节点{}在图{}中重复",
                        name, self.name
                    )));
                }
                Ok(name.to_string())
            }
            None => Ok(format!("{}_{}", type_name.to_lowercase(), id.0)),
        }
    }

    // ========== 释放 ==========

    /// 删除所有非参数节点及其边，参数节点的值与梯度保留
    pub fn release_intermediate_nodes(&mut self) {
        self.nodes.retain(|_, node| node.is_parameter());
        self.backward_edges.retain(|id, _| self.nodes.contains_key(id));
    }
}
