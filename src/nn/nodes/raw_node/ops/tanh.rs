use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// Tanh 激活节点，dy/dx = 1 - y²
#[derive(Clone, Default)]
pub(crate) struct Tanh;

impl Tanh {
    pub(crate) const fn new() -> Self {
        Self
    }
}

impl TraitNode for Tanh {
    fn type_name(&self) -> &'static str {
        "Tanh"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 1)?;
        Ok(parents[0].tanh())
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if index != 0 {
            return Err(invalid_parent_index(self.type_name(), index));
        }
        Ok(upstream_grad * &value.map(|y| 1.0 - y * y))
    }
}
