/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 张量的其他运算：归约、逐元素函数、形状变换与矩阵乘法
 */

use ndarray::{Axis, Ix2, IxDyn};

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl Tensor {
    /// 所有元素之和，返回形状为[1]的张量
    pub fn sum(&self) -> Tensor {
        Tensor::new(&[self.data.sum()], &[1])
    }

    /// 所有元素的均值，返回形状为[1]的张量；空张量的均值为0
    pub fn mean(&self) -> Tensor {
        let mean = if self.size() == 0 {
            0.
        } else {
            self.data.sum() / self.size() as f32
        };
        Tensor::new(&[mean], &[1])
    }

    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor::from_array(self.data.mapv(f))
    }

    pub fn sqrt(&self) -> Tensor {
        self.map(f32::sqrt)
    }

    pub fn powi(&self, n: i32) -> Tensor {
        self.map(|x| x.powi(n))
    }

    pub fn clamp(&self, min: f32, max: f32) -> Tensor {
        self.map(|x| x.clamp(min, max))
    }

    pub fn tanh(&self) -> Tensor {
        self.map(f32::tanh)
    }

    /// 数值稳定的sigmoid
    pub fn sigmoid(&self) -> Tensor {
        self.map(|x| {
            if x >= 0. {
                1. / (1. + (-x).exp())
            } else {
                let e = x.exp();
                e / (1. + e)
            }
        })
    }

    /// 在元素个数不变的前提下改变形状
    pub fn reshape(&self, shape: &[usize]) -> Result<Tensor, TensorError> {
        if shape.iter().product::<usize>() != self.size() {
            return Err(TensorError::IncompatibleReshape {
                from: self.shape().to_vec(),
                to: shape.to_vec(),
            });
        }
        Tensor::from_vec(self.to_vec(), shape)
    }

    /// 2阶张量（矩阵）的转置
    pub fn transpose(&self) -> Result<Tensor, TensorError> {
        if self.dimension() != 2 {
            return Err(TensorError::DimensionMismatch {
                expected: 2,
                got: self.dimension(),
            });
        }
        Ok(Tensor::from_array(self.data.t().to_owned()))
    }

    /// 矩阵乘法：[m, k] × [k, n] -> [m, n]
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        let error = || TensorError::OperatorError {
            operator: Operator::MatMul,
            tensor1_shape: self.shape().to_vec(),
            tensor2_shape: other.shape().to_vec(),
        };
        let a = self
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| error())?;
        let b = other
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| error())?;
        if a.ncols() != b.nrows() {
            return Err(error());
        }
        Ok(Tensor::from_array(a.dot(&b).into_dyn()))
    }

    /// 将（广播后的）张量按轴求和，还原为`shape`形状。
    /// `shape`须能广播到当前张量的形状，常用于广播运算的反向传播
    pub fn sum_to_shape(&self, shape: &[usize]) -> Result<Tensor, TensorError> {
        if self.shape() == shape {
            return Ok(self.clone());
        }
        let error = || TensorError::OperatorError {
            operator: Operator::SumToShape,
            tensor1_shape: self.shape().to_vec(),
            tensor2_shape: shape.to_vec(),
        };
        let ndim = self.dimension();
        if shape.len() > ndim {
            return Err(error());
        }
        let offset = ndim - shape.len();
        let mut data = self.data.clone();
        for axis in 0..ndim {
            let target = if axis < offset { 1 } else { shape[axis - offset] };
            let current = data.shape()[axis];
            if target == current {
                continue;
            }
            if target != 1 {
                return Err(error());
            }
            data = data.sum_axis(Axis(axis)).insert_axis(Axis(axis));
        }
        let data = data
            .into_shape(IxDyn(shape))
            .map_err(|_| error())?;
        Ok(Tensor::from_array(data))
    }
}
