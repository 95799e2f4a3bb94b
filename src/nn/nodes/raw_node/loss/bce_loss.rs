/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : 二元交叉熵损失节点：-mean(y·ln(p) + (1-y)·ln(1-p))，输出 [1, 1]
 *
 * 与 PyTorch 一致，对数值被截断到不小于 -100，p 恰为 0 或 1 时损失仍有限。
 */

use super::{check_same_shape, upstream_scalar};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

const LOG_MIN: f32 = -100.0;
const GRAD_EPS: f32 = 1e-12;

#[derive(Clone, Default)]
pub(crate) struct BceLoss;

impl BceLoss {
    pub(crate) const fn new() -> Self {
        Self
    }
}

fn clamped_ln(x: f32) -> f32 {
    x.ln().max(LOG_MIN)
}

impl TraitNode for BceLoss {
    fn type_name(&self) -> &'static str {
        "BCELoss"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 2)?;
        check_same_shape(self.type_name(), parents[0], parents[1])?;
        let (p, y) = (parents[0].data_as_slice(), parents[1].data_as_slice());
        if p.iter().any(|&v| !(0.0..=1.0).contains(&v)) {
            return Err(GraphError::ComputationError(format!(
                "{}的预测值须在[0, 1]内",
                self.type_name()
            )));
        }
        let total = p
            .iter()
            .zip(y)
            .map(|(&p, &y)| -(y * clamped_ln(p) + (1.0 - y) * clamped_ln(1.0 - p)))
            .sum::<f32>();
        let mean = if p.is_empty() { 0.0 } else { total / p.len() as f32 };
        Ok(Tensor::new(&[mean], &[1, 1]))
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let scale = upstream_scalar(self.type_name(), upstream_grad)? / parents[0].size() as f32;
        let (p, y) = (parents[0].data_as_slice(), parents[1].data_as_slice());
        let grad = match index {
            0 => p
                .iter()
                .zip(y)
                .map(|(&p, &y)| scale * (p - y) / (p * (1.0 - p)).max(GRAD_EPS))
                .collect::<Vec<_>>(),
            1 => p
                .iter()
                .map(|&p| scale * (clamped_ln(1.0 - p) - clamped_ln(p)))
                .collect::<Vec<_>>(),
            _ => return Err(invalid_parent_index(self.type_name(), index)),
        };
        Ok(Tensor::from_vec(grad, parents[0].shape())?)
    }
}
