use super::{TraitNode, invalid_parent_index};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 输入节点：值由用户给定，不接收梯度
#[derive(Clone, Default)]
pub(crate) struct Input;

impl Input {
    pub(crate) const fn new() -> Self {
        Self
    }
}

impl TraitNode for Input {
    fn type_name(&self) -> &'static str {
        "Input"
    }

    fn calc_value_by_parents(&mut self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "输入节点的值由用户给定，不能由父节点计算".to_string(),
        ))
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(invalid_parent_index(self.type_name(), index))
    }
}
