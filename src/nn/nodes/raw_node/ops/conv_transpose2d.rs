/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 2D 转置卷积节点（PyTorch 风格，即卷积对输入的梯度运算）
 *
 * - 输入 [batch, C_in, H, W]，输出 [batch, C_out, H', W']
 * - H' = (H - 1) * s - 2p + kH
 * - 每个输入元素乘以卷积核后散布到输出上，落在填充区域的部分被丢弃
 *
 * 父节点：
 * - parents[0]: 输入数据
 * - parents[1]: 卷积核参数 [C_in, C_out, kH, kW]
 */

use super::{map_samples, padded_index, shape_4d, sum_partials};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

#[derive(Clone)]
pub(crate) struct ConvTranspose2d {
    stride: (usize, usize),
    padding: (usize, usize),
    parallel: bool,
}

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

impl Geometry {
    const fn kernel_index(&self, ci: usize, co: usize, kh: usize, kw: usize) -> usize {
        ((ci * self.out_c + co) * self.k_h + kh) * self.k_w + kw
    }
}

impl ConvTranspose2d {
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
        let [batch, in_c, in_h, in_w] = shape_4d(input, "ConvTranspose2d 输入 [batch, C_in, H, W]")?;
        let [kernel_in_c, out_c, k_h, k_w] = shape_4d(kernel, "转置卷积核 [C_in, C_out, kH, kW]")?;
        if kernel_in_c != in_c {
            return Err(GraphError::ShapeMismatch {
                expected: vec![in_c],
                got: vec![kernel_in_c],
                message: format!("输入通道数 {in_c} 与转置卷积核输入通道数 {kernel_in_c} 不匹配"),
            });
        }
        let (stride_h, stride_w) = self.stride;
        let (pad_h, pad_w) = self.padding;
        let full_h = in_h.saturating_sub(1) * stride_h + k_h;
        let full_w = in_w.saturating_sub(1) * stride_w + k_w;
        if stride_h == 0
            || stride_w == 0
            || in_h == 0
            || in_w == 0
            || full_h <= 2 * pad_h
            || full_w <= 2 * pad_w
        {
            return Err(GraphError::InvalidOperation(format!(
                "转置卷积输出尺寸无效：输入 {in_h}x{in_w}，核 {k_h}x{k_w}，步长 {:?}，填充 {:?}",
                self.stride, self.padding
            )));
        }
        Ok(Geometry {
            batch,
            in_c,
            in_h,
            in_w,
            out_c,
            out_h: full_h - 2 * pad_h,
            out_w: full_w - 2 * pad_w,
            k_h,
            k_w,
        })
    }
}

impl TraitNode for ConvTranspose2d {
    fn type_name(&self) -> &'static str {
        "ConvTranspose2d"
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
            for ci in 0..g.in_c {
                for ih in 0..g.in_h {
                    for iw in 0..g.in_w {
                        let xv = xs[(ci * g.in_h + ih) * g.in_w + iw];
                        if xv == 0.0 {
                            continue;
                        }
                        for co in 0..g.out_c {
                            for kh in 0..g.k_h {
                                let Some(oh) = padded_index(ih, kh, stride_h, pad_h, g.out_h) else {
                                    continue;
                                };
                                for kw in 0..g.k_w {
                                    let Some(ow) = padded_index(iw, kw, stride_w, pad_w, g.out_w)
                                    else {
                                        continue;
                                    };
                                    out[(co * g.out_h + oh) * g.out_w + ow] +=
                                        xv * k[g.kernel_index(ci, co, kh, kw)];
                                }
                            }
                        }
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
            // 对输入的梯度：即以同一卷积核对上游梯度做普通卷积
            0 => {
                let grads = map_samples(self.parallel, g.batch, |n| {
                    let ups = &up[n * sample_out..(n + 1) * sample_out];
                    let mut dx = vec![0.0f32; sample_in];
                    for ci in 0..g.in_c {
                        for ih in 0..g.in_h {
                            for iw in 0..g.in_w {
                                let mut acc = 0.0;
                                for co in 0..g.out_c {
                                    for kh in 0..g.k_h {
                                        let Some(oh) =
                                            padded_index(ih, kh, stride_h, pad_h, g.out_h)
                                        else {
                                            continue;
                                        };
                                        for kw in 0..g.k_w {
                                            let Some(ow) =
                                                padded_index(iw, kw, stride_w, pad_w, g.out_w)
                                            else {
                                                continue;
                                            };
                                            acc += ups[(co * g.out_h + oh) * g.out_w + ow]
                                                * k[g.kernel_index(ci, co, kh, kw)];
                                        }
                                    }
                                }
                                dx[(ci * g.in_h + ih) * g.in_w + iw] = acc;
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
                    for ci in 0..g.in_c {
                        for ih in 0..g.in_h {
                            for iw in 0..g.in_w {
                                let xv = xs[(ci * g.in_h + ih) * g.in_w + iw];
                                if xv == 0.0 {
                                    continue;
                                }
                                for co in 0..g.out_c {
                                    for kh in 0..g.k_h {
                                        let Some(oh) =
                                            padded_index(ih, kh, stride_h, pad_h, g.out_h)
                                        else {
                                            continue;
                                        };
                                        for kw in 0..g.k_w {
                                            let Some(ow) =
                                                padded_index(iw, kw, stride_w, pad_w, g.out_w)
                                            else {
                                                continue;
                                            };
                                            dk[g.kernel_index(ci, co, kh, kw)] +=
                                                xv * ups[(co * g.out_h + oh) * g.out_w + ow];
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
