mod add;
mod batch_norm2d;
mod channel_bias_add;
mod conv2d;
mod conv_transpose2d;
mod leaky_relu;
mod mat_mul;
mod reshape;
mod sigmoid;
mod tanh;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use batch_norm2d::BatchNorm2d;
pub(in crate::nn) use channel_bias_add::ChannelBiasAdd;
pub(in crate::nn) use conv_transpose2d::ConvTranspose2d;
pub(in crate::nn) use conv2d::Conv2d;
pub(in crate::nn) use leaky_relu::LeakyReLU;
pub(in crate::nn) use mat_mul::MatMul;
pub(in crate::nn) use reshape::Reshape;
pub(in crate::nn) use sigmoid::Sigmoid;
pub(in crate::nn) use tanh::Tanh;

use crate::nn::GraphError;
use crate::tensor::Tensor;
use rayon::prelude::*;

/// 对 batch 中每个样本执行`f`，`parallel`为真时使用 Rayon 并行
fn map_samples<T, F>(parallel: bool, batch_size: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if parallel {
        (0..batch_size).into_par_iter().map(f).collect()
    } else {
        (0..batch_size).map(f).collect()
    }
}

/// 将各样本的局部结果（等长）逐元素求和
fn sum_partials(partials: Vec<Vec<f32>>, len: usize) -> Vec<f32> {
    partials.into_iter().fold(vec![0.0; len], |mut acc, partial| {
        for (a, p) in acc.iter_mut().zip(partial) {
            *a += p;
        }
        acc
    })
}

/// 取出 4D 张量的形状 [batch, C, H, W]
fn shape_4d(tensor: &Tensor, what: &str) -> Result<[usize; 4], GraphError> {
    match tensor.shape() {
        &[n, c, h, w] => Ok([n, c, h, w]),
        _ => Err(GraphError::DimensionMismatch {
            expected: 4,
            got: tensor.dimension(),
            message: format!("{what}必须是 4D，得到 {:?}", tensor.shape()),
        }),
    }
}

/// 通道向量须为 [1, C]
fn check_channel_vector(tensor: &Tensor, channels: usize, what: &str) -> Result<(), GraphError> {
    if tensor.shape() != [1, channels] {
        return Err(GraphError::ShapeMismatch {
            expected: vec![1, channels],
            got: tensor.shape().to_vec(),
            message: format!("{what}的形状须为 [1, C]"),
        });
    }
    Ok(())
}

/// 计算`pos * stride + k - pad`，落在[0, len)之外（即落在零填充区域）时返回None
const fn padded_index(
    pos: usize,
    k: usize,
    stride: usize,
    pad: usize,
    len: usize,
) -> Option<usize> {
    let raw = pos * stride + k;
    if raw < pad || raw - pad >= len {
        None
    } else {
        Some(raw - pad)
    }
}
