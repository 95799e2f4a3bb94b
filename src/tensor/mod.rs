/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量：基于ndarray的n维f32数组，是计算图中节点值与梯度的载体
 */

use ndarray::{ArrayD, IxDyn};
use rand::Rng;

use crate::errors::TensorError;

mod index;
mod ops;
mod property;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通过Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、f32等）就只是纯数（number），在这里不被认为是张量。
///
/// 内部数据始终保持标准（行优先、连续）内存布局，卷积等算子可直接按切片访问。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]...
    /// `data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        match Self::try_new(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{}", e),
        }
    }

    /// 同`new`，但以`Result`返回形状错误
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Tensor, TensorError> {
        Self::from_vec(data.to_vec(), shape)
    }

    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Result<Tensor, TensorError> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
                expected,
            });
        }
        let data =
            ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|_| TensorError::DataShapeMismatch {
                data_len: expected,
                shape: shape.to_vec(),
                expected,
            })?;
        Ok(Tensor { data })
    }

    /// 由ndarray数组构造张量，非标准布局的数组会被重新排布
    pub fn from_array(data: ArrayD<f32>) -> Tensor {
        if data.is_standard_layout() {
            Tensor { data }
        } else {
            Tensor {
                data: data.as_standard_layout().into_owned(),
            }
        }
    }

    pub fn zeros(shape: &[usize]) -> Tensor {
        Self::full(0., shape)
    }

    pub fn ones(shape: &[usize]) -> Tensor {
        Self::full(1., shape)
    }

    pub fn full(value: f32, shape: &[usize]) -> Tensor {
        Tensor {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// 创建一个随机张量，其值在[low, high)区间内均匀分布
    pub fn uniform_with_rng<R: Rng + ?Sized>(
        low: f32,
        high: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        let len = shape.iter().product::<usize>();
        let data = (0..len)
            .map(|_| if low < high { rng.gen_range(low..high) } else { low })
            .collect::<Vec<_>>();
        Tensor {
            data: ArrayD::from_shape_vec(IxDyn(shape), data)
                .unwrap_or_else(|_| ArrayD::from_elem(IxDyn(shape), low)),
        }
    }

    /// 创建一个服从正态分布的随机张量（Box-Muller变换）
    pub fn normal_with_rng<R: Rng + ?Sized>(
        mean: f32,
        std_dev: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
            let u2: f32 = rng.gen_range(0.0..1.0);
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor {
            data: ArrayD::from_shape_vec(IxDyn(shape), data)
                .unwrap_or_else(|_| ArrayD::from_elem(IxDyn(shape), mean)),
        }
    }
}
