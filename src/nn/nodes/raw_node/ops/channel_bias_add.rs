/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 逐通道加偏置节点：卷积层输出 [N, C, H, W] 的每个通道加上同一个偏置
 *
 * 父节点：
 * - parents[0]: 输入 [N, C, H, W]
 * - parents[1]: 偏置 [1, C]
 */

use super::{check_channel_vector, shape_4d};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

#[derive(Clone, Default)]
pub(crate) struct ChannelBiasAdd;

impl ChannelBiasAdd {
    pub(crate) const fn new() -> Self {
        Self
    }
}

impl TraitNode for ChannelBiasAdd {
    fn type_name(&self) -> &'static str {
        "ChannelBiasAdd"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 2)?;
        let [_, c, _, _] = shape_4d(parents[0], "ChannelBiasAdd 输入 [N, C, H, W]")?;
        check_channel_vector(parents[1], c, "通道偏置")?;
        let bias = parents[1].reshape(&[1, c, 1, 1])?;
        Ok(parents[0] + &bias)
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match index {
            0 => Ok(upstream_grad.clone()),
            1 => {
                let [_, c, _, _] = shape_4d(upstream_grad, "上游梯度")?;
                Ok(upstream_grad
                    .sum_to_shape(&[1, c, 1, 1])?
                    .reshape(parents[1].shape())?)
            }
            _ => Err(invalid_parent_index(self.type_name(), index)),
        }
    }
}
