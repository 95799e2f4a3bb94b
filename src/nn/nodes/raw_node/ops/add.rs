use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 加法节点，支持 NumPy 风格广播（如 [N, out] + [1, out]）
#[derive(Clone, Default)]
pub(crate) struct Add;

impl Add {
    pub(crate) const fn new() -> Self {
        Self
    }
}

impl TraitNode for Add {
    fn type_name(&self) -> &'static str {
        "Add"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 2)?;
        let (a, b) = (parents[0], parents[1]);
        if !a.can_broadcast_with(b) {
            return Err(GraphError::ShapeMismatch {
                expected: a.shape().to_vec(),
                got: b.shape().to_vec(),
                message: "Add节点的两个父节点形状无法广播".to_string(),
            });
        }
        Ok(a + b)
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        // 广播过的维度需要求和还原
        let parent = parents
            .get(index)
            .ok_or_else(|| invalid_parent_index(self.type_name(), index))?;
        Ok(upstream_grad.sum_to_shape(parent.shape())?)
    }
}
