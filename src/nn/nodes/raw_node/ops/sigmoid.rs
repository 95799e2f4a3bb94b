use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// Sigmoid 激活节点，dy/dx = y(1 - y)
#[derive(Clone, Default)]
pub(crate) struct Sigmoid;

impl Sigmoid {
    pub(crate) const fn new() -> Self {
        Self
    }
}

impl TraitNode for Sigmoid {
    fn type_name(&self) -> &'static str {
        "Sigmoid"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 1)?;
        Ok(parents[0].sigmoid())
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
        Ok(upstream_grad * &value.map(|y| y * (1.0 - y)))
    }
}
