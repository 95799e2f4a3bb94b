/*
 * @Author       : 老董
 * @Date         : 2026-01-10
 * @Description  : 均方误差损失节点：mean((prediction - target)²)，输出 [1, 1]
 */

use super::{check_same_shape, upstream_scalar};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

#[derive(Clone, Default)]
pub(crate) struct MseLoss;

impl MseLoss {
    pub(crate) const fn new() -> Self {
        Self
    }
}

impl TraitNode for MseLoss {
    fn type_name(&self) -> &'static str {
        "MSELoss"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 2)?;
        check_same_shape(self.type_name(), parents[0], parents[1])?;
        let diff = parents[0] - parents[1];
        Ok(diff.powi(2).mean().reshape(&[1, 1])?)
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let scale =
            2.0 * upstream_scalar(self.type_name(), upstream_grad)? / parents[0].size() as f32;
        let diff = parents[0] - parents[1];
        match index {
            0 => Ok(&diff * scale),
            1 => Ok(&diff * -scale),
            _ => Err(invalid_parent_index(self.type_name(), index)),
        }
    }
}
