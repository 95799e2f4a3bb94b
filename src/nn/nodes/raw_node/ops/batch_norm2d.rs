/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : 2D 批归一化节点（逐通道，统计 N、H、W 三个维度）
 *
 * 训练时使用当前 batch 的均值与有偏方差，并暴露给层用于更新滑动统计量；
 * 评估时使用层传入的滑动均值与方差。
 *
 * 父节点：
 * - parents[0]: 输入 [N, C, H, W]
 * - parents[1]: gamma [1, C]
 * - parents[2]: beta [1, C]
 */

use super::{check_channel_vector, map_samples, shape_4d};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

#[derive(Clone)]
pub(crate) struct BatchNorm2d {
    eps: f32,
    /// 评估模式下使用的滑动统计量 (均值, 方差)；None 表示训练模式
    running: Option<(Vec<f32>, Vec<f32>)>,
    parallel: bool,
    // 缓存（用于反向传播）
    x_hat: Vec<f32>,
    inv_std: Vec<f32>,
    batch_mean: Vec<f32>,
    batch_var: Vec<f32>,
    count: usize,
}

impl BatchNorm2d {
    pub(crate) const fn new(
        eps: f32,
        running: Option<(Vec<f32>, Vec<f32>)>,
        parallel: bool,
    ) -> Self {
        Self {
            eps,
            running,
            parallel,
            x_hat: Vec::new(),
            inv_std: Vec::new(),
            batch_mean: Vec::new(),
            batch_var: Vec::new(),
            count: 0,
        }
    }

    /// 训练模式下本次计算得到的 (均值, 有偏方差, 每通道元素数)
    pub(crate) fn batch_stats(&self) -> Option<(Vec<f32>, Vec<f32>, usize)> {
        if self.running.is_some() || self.batch_mean.is_empty() {
            return None;
        }
        Some((self.batch_mean.clone(), self.batch_var.clone(), self.count))
    }

    const fn is_training(&self) -> bool {
        self.running.is_none()
    }
}

/// 通道`c`在 [N, C, HW] 布局下的所有元素下标
fn channel_indices(n: usize, c_total: usize, hw: usize, c: usize) -> impl Iterator<Item = usize> {
    (0..n).flat_map(move |ni| {
        let start = (ni * c_total + c) * hw;
        start..start + hw
    })
}

impl TraitNode for BatchNorm2d {
    fn type_name(&self) -> &'static str {
        "BatchNorm2d"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 3)?;
        let [n, c, h, w] = shape_4d(parents[0], "BatchNorm2d 输入 [N, C, H, W]")?;
        check_channel_vector(parents[1], c, "gamma")?;
        check_channel_vector(parents[2], c, "beta")?;
        let hw = h * w;
        let count = n * hw;
        if count == 0 || (self.is_training() && count < 2) {
            return Err(GraphError::InvalidOperation(format!(
                "BatchNorm2d 训练时每个通道至少需要 2 个元素，得到 {count}"
            )));
        }

        let x = parents[0].data_as_slice();
        let (mean, var) = match &self.running {
            Some((mean, var)) => {
                if mean.len() != c || var.len() != c {
                    return Err(GraphError::ShapeMismatch {
                        expected: vec![c],
                        got: vec![mean.len()],
                        message: "滑动统计量的长度须等于通道数".to_string(),
                    });
                }
                (mean.clone(), var.clone())
            }
            None => {
                let stats = map_samples(self.parallel, c, |ci| {
                    let mean =
                        channel_indices(n, c, hw, ci).map(|i| x[i]).sum::<f32>() / count as f32;
                    let var = channel_indices(n, c, hw, ci)
                        .map(|i| (x[i] - mean).powi(2))
                        .sum::<f32>()
                        / count as f32;
                    (mean, var)
                });
                stats.into_iter().unzip()
            }
        };

        let inv_std = var
            .iter()
            .map(|v| 1.0 / (v + self.eps).sqrt())
            .collect::<Vec<_>>();
        let gamma = parents[1].data_as_slice();
        let beta = parents[2].data_as_slice();

        let mut x_hat = vec![0.0f32; x.len()];
        let mut out = vec![0.0f32; x.len()];
        for ci in 0..c {
            for i in channel_indices(n, c, hw, ci) {
                x_hat[i] = (x[i] - mean[ci]) * inv_std[ci];
                out[i] = gamma[ci] * x_hat[i] + beta[ci];
            }
        }

        self.x_hat = x_hat;
        self.inv_std = inv_std;
        self.count = count;
        if self.is_training() {
            self.batch_mean = mean;
            self.batch_var = var;
        }
        Ok(Tensor::from_vec(out, parents[0].shape())?)
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let [n, c, h, w] = shape_4d(parents[0], "BatchNorm2d 输入 [N, C, H, W]")?;
        let hw = h * w;
        let dy = upstream_grad.data_as_slice();
        let x_hat = &self.x_hat;
        if x_hat.len() != dy.len() {
            return Err(GraphError::ComputationError(format!(
                "{}没有缓存的中间结果，无法计算梯度",
                self.type_name()
            )));
        }
        // 每通道的 Σdy 与 Σ(dy·x̂)
        let sums = map_samples(self.parallel, c, |ci| {
            channel_indices(n, c, hw, ci).fold((0.0f32, 0.0f32), |(s, sx), i| {
                (s + dy[i], sx + dy[i] * x_hat[i])
            })
        });

        match index {
            0 => {
                let gamma = parents[1].data_as_slice();
                let m = self.count as f32;
                let mut dx = vec![0.0f32; dy.len()];
                for ci in 0..c {
                    let (sum_dy, sum_dy_x_hat) = sums[ci];
                    let scale = gamma[ci] * self.inv_std[ci];
                    for i in channel_indices(n, c, hw, ci) {
                        dx[i] = if self.is_training() {
                            scale / m * (m * dy[i] - sum_dy - x_hat[i] * sum_dy_x_hat)
                        } else {
                            scale * dy[i]
                        };
                    }
                }
                Ok(Tensor::from_vec(dx, parents[0].shape())?)
            }
            1 => {
                let d_gamma = sums.iter().map(|&(_, sx)| sx).collect::<Vec<_>>();
                Ok(Tensor::from_vec(d_gamma, &[1, c])?)
            }
            2 => {
                let d_beta = sums.iter().map(|&(s, _)| s).collect::<Vec<_>>();
                Ok(Tensor::from_vec(d_beta, &[1, c])?)
            }
            _ => Err(invalid_parent_index(self.type_name(), index)),
        }
    }
}
