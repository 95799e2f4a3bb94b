use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 变形节点：元素顺序不变，仅改变形状
#[derive(Clone)]
pub(crate) struct Reshape {
    target_shape: Vec<usize>,
}

impl Reshape {
    pub(crate) fn new(target_shape: &[usize]) -> Self {
        Self {
            target_shape: target_shape.to_vec(),
        }
    }
}

impl TraitNode for Reshape {
    fn type_name(&self) -> &'static str {
        "Reshape"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 1)?;
        let input = parents[0];
        let target_size = self.target_shape.iter().product::<usize>();
        if target_size != input.size() {
            return Err(GraphError::ShapeMismatch {
                expected: self.target_shape.clone(),
                got: input.shape().to_vec(),
                message: format!(
                    "Reshape前后元素个数不一致：{} vs {}",
                    input.size(),
                    target_size
                ),
            });
        }
        Ok(input.reshape(&self.target_shape)?)
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if index != 0 {
            return Err(invalid_parent_index(self.type_name(), index));
        }
        Ok(upstream_grad.reshape(parents[0].shape())?)
    }
}
