/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : 2D 卷积节点（PyTorch 风格）
 *
 * - 单节点处理多通道，Batch-First 格式：输入 [batch, C_in, H, W]
 * - 输出格式：[batch, C_out, H', W']，H' = (H + 2p - kH) / s + 1
 * - 零填充不实际生成填充后的张量，越界位置直接跳过
 * - parallel 为真时在 batch 维度并行
 *
 * 父节点：
 * - parents[0]: 输入数据
 * - parents[1]: 卷积核参数 [C_out, C_in, kH, kW]
 */

use super::{map_samples, padded_index, shape_4d, sum_partials};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

#[derive(Clone)]
pub(crate) struct Conv2d {
    stride: (usize, usize),
    padding: (usize, usize),
    parallel: bool,
}

/// 一次卷积的各维度尺寸
#[derive(Clone, Copy)]
struct Geometry {
    batch: usize,
    in_c: usize,
    in_h: usize,
    in_w: usize,
    out_c: usize,
    out_h: usize,
    out_w: usize,
    k_h: usize,
    k_w: usize,
}

impl Conv2d {
    pub(crate) const fn new(
        stride: (usize, usize),
        padding: (usize, usize),
        parallel: bool,
    ) -> Self {
        Self {
            stride,
            padding,
            parallel,
        }
    }

    fn geometry(&self, input: &Tensor, kernel: &Tensor) -> Result<Geometry, GraphError> {
        let [batch, in_c, in_h, in_w] = shape_4d(input, "Conv2d 输入 [batch, C_in, H, W]")?;
        let [out_c, kernel_in_c, k_h, k_w] = shape_4d(kernel, "卷积核 [C_out, C_in, kH, kW]")?;
        if kernel_in_c != in_c {
            return Err(GraphError::ShapeMismatch {
                expected: vec![in_c],
                got: vec![kernel_in_c],
                message: format!("输入通道数 {in_c} 与卷积核输入通道数 {kernel_in_c} 不匹配"),
            });
        }
        let (stride_h, stride_w) = self.stride;
        let (pad_h, pad_w) = self.padding;
        if stride_h == 0 || stride_w == 0 || in_h + 2 * pad_h < k_h || in_w + 2 * pad_w < k_w {
            return Err(GraphError::InvalidOperation(format!(
                "卷积输出尺寸无效：输入 {in_h}x{in_w}，核 {k_h}x{k_w}，步长 {:?}，填充 {:?}",
                self.stride, self.padding
            )));
        }
        Ok(Geometry {
            batch,
            in_c,
            in_h,
            in_w,
            out_c,
            out_h: (in_h + 2 * pad_h - k_h) / stride_h + 1,
            out_w: (in_w + 2 * pad_w - k_w) / stride_w + 1,
            k_h,
            k_w,
        })
    }
}

impl TraitNode for Conv2d {
    fn type_name(&self) -> &'static str {
        "Conv2d"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 2)?;
        let g = self.geometry(parents[0], parents[1])?;
        let (x, k) = (parents[0].data_as_slice(), parents[1].data_as_slice());
        let ((stride_h, stride_w), (pad_h, pad_w)) = (self.stride, self.padding);
        let sample_in = g.in_c * g.in_h * g.in_w;

        let outputs = map_samples(self.parallel, g.batch, |n| {
            let xs = &x[n * sample_in..(n + 1) * sample_in];
            let mut out = vec![0.0f32; g.out_c * g.out_h * g.out_w];
            for co in 0..g.out_c {
                for oh in 0..g.out_h {
                    for ow in 0..g.out_w {
                        let mut acc = 0.0;
                        for ci in 0..g.in_c {
                            for kh in 0..g.k_h {
                                let Some(ih) = padded_index(oh, kh, stride_h, pad_h, g.in_h) else {
                                    continue;
                                };
                                for kw in 0..g.k_w {
                                    let Some(iw) = padded_index(ow, kw, stride_w, pad_w, g.in_w)
                                    else {
                                        continue;
                                    };
                                    acc += xs[(ci * g.in_h + ih) * g.in_w + iw]
                                        * k[((co * g.in_c + ci) * g.k_h + kh) * g.k_w + kw];
                                }
                            }
                        }
                        out[(co * g.out_h + oh) * g.out_w + ow] = acc;
                    }
                }
            }
            out
        });

        Ok(Tensor::from_vec(
            outputs.concat(),
            &[g.batch, g.out_c, g.out_h, g.out_w],
        )?)
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let g = self.geometry(parents[0], parents[1])?;
        let (x, k) = (parents[0].data_as_slice(), parents[1].data_as_slice());
        let up = upstream_grad.data_as_slice();
        let ((stride_h, stride_w), (pad_h, pad_w)) = (self.stride, self.padding);
        let sample_in = g.in_c * g.in_h * g.in_w;
        let sample_out = g.out_c * g.out_h * g.out_w;

        match index {
            // 对输入的梯度：把每个输出位置的梯度按卷积核散布回输入
            0 => {
                let grads = map_samples(self.parallel, g.batch, |n| {
                    let ups = &up[n * sample_out..(n + 1) * sample_out];
                    let mut dx = vec![0.0f32; sample_in];
                    for co in 0..g.out_c {
                        for oh in 0..g.out_h {
                            for ow in 0..g.out_w {
                                let grad = ups[(co * g.out_h + oh) * g.out_w + ow];
                                if grad == 0.0 {
                                    continue;
                                }
                                for ci in 0..g.in_c {
                                    for kh in 0..g.k_h {
                                        let Some(ih) = padded_index(oh, kh, stride_h, pad_h, g.in_h)
                                        else {
                                            continue;
                                        };
                                        for kw in 0..g.k_w {
                                            let Some(iw) =
                                                padded_index(ow, kw, stride_w, pad_w, g.in_w)
                                            else {
                                                continue;
                                            };
                                            dx[(ci * g.in_h + ih) * g.in_w + iw] += grad
                                                * k[((co * g.in_c + ci) * g.k_h + kh) * g.k_w + kw];
                                        }
                                    }
                                }
                            }
                        }
                    }
                    dx
                });
                Ok(Tensor::from_vec(grads.concat(), parents[0].shape())?)
            }
            // 对卷积核的梯度：各样本的局部梯度求和
            1 => {
                let kernel_len = parents[1].size();
                let partials = map_samples(self.parallel, g.batch, |n| {
                    let xs = &x[n * sample_in..(n + 1) * sample_in];
                    let ups = &up[n * sample_out..(n + 1) * sample_out];
                    let mut dk = vec![0.0f32; kernel_len];
                    for co in 0..g.out_c {
                        for oh in 0..g.out_h {
                            for ow in 0..g.out_w {
                                let grad = ups[(co * g.out_h + oh) * g.out_w + ow];
                                if grad == 0.0 {
                                    continue;
                                }
                                for ci in 0..g.in_c {
                                    for kh in 0..g.k_h {
                                        let Some(ih) = padded_index(oh, kh, stride_h, pad_h, g.in_h)
                                        else {
                                            continue;
                                        };
                                        for kw in 0..g.k_w {
                                            let Some(iw) =
                                                padded_index(ow, kw, stride_w, pad_w, g.in_w)
                                            else {
                                                continue;
                                            };
                                            dk[((co * g.in_c + ci) * g.k_h + kh) * g.k_w + kw] +=
                                                grad * xs[(ci * g.in_h + ih) * g.in_w + iw];
                                        }
                                    }
                                }
                            }
                        }
                    }
                    dk
                });
                Ok(Tensor::from_vec(
                    sum_partials(partials, kernel_len),
                    parents[1].shape(),
                )?)
            }
            _ => Err(invalid_parent_index(self.type_name(), index)),
        }
    }
}
