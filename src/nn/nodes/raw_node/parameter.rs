use super::{TraitNode, invalid_parent_index};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 参数节点：可训练，跨训练步骤保留值与（累加的）梯度
#[derive(Clone, Default)]
pub(crate) struct Parameter;

impl Parameter {
    pub(crate) const fn new() -> Self {
        Self
    }
}

impl TraitNode for Parameter {
    fn type_name(&self) -> &'static str {
        "Parameter"
    }

    fn calc_value_by_parents(&mut self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "参数节点的值由初始化或优化器设置，不能由父节点计算".to_string(),
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
