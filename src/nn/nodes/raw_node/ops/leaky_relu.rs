use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// Leaky ReLU 激活函数节点
///
/// forward: f(x) = x if x > 0, else negative_slope * x
/// backward: d(f)/dx = 1 if x > 0, else negative_slope
///
/// 当 negative_slope = 0 时，等价于标准 ReLU
#[derive(Clone)]
pub(crate) struct LeakyReLU {
    negative_slope: f32,
}

impl LeakyReLU {
    pub(crate) const fn new(negative_slope: f32) -> Self {
        Self { negative_slope }
    }
}

impl TraitNode for LeakyReLU {
    fn type_name(&self) -> &'static str {
        if self.negative_slope == 0.0 {
            "ReLU"
        } else {
            "LeakyReLU"
        }
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 1)?;
        let slope = self.negative_slope;
        Ok(parents[0].map(|x| if x > 0.0 { x } else { slope * x }))
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
        let slope = self.negative_slope;
        let local_grad = parents[0].map(|x| if x > 0.0 { 1.0 } else { slope });
        Ok(upstream_grad * &local_grad)
    }
}
