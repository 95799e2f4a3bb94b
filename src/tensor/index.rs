/*
 * @Author       : 老董
 * @Date         : 2023-10-03 10:21:47
 * @Description  : 张量的索引与沿批次轴（第0维）的取样
 */

use ndarray::{Axis, IxDyn, Slice};
use std::ops::{Index, IndexMut};

use super::Tensor;
use crate::errors::TensorError;

impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; N]) -> &f32 {
        &self.data[IxDyn(&index)]
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, index: [usize; N]) -> &mut f32 {
        &mut self.data[IxDyn(&index)]
    }
}

impl Tensor {
    /// 按`indices`的顺序从第0维选取样本，组成新张量
    pub fn select_samples(&self, indices: &[usize]) -> Result<Tensor, TensorError> {
        let len = self.shape().first().copied().unwrap_or(0);
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(TensorError::IndexOutOfBounds { index: bad, len });
        }
        Ok(Tensor::from_array(self.data.select(Axis(0), indices)))
    }

    /// 取第0维上[lower, upper)区间内的样本
    pub fn narrow_samples(&self, lower: usize, upper: usize) -> Result<Tensor, TensorError> {
        let len = self.shape().first().copied().unwrap_or(0);
        if lower > upper || upper > len {
            return Err(TensorError::IndexOutOfBounds { index: upper, len });
        }
        let view = self
            .data
            .slice_axis(Axis(0), Slice::from(lower as isize..upper as isize));
        Ok(Tensor::from_array(view.to_owned()))
    }

    /// 将多个形状相同的张量沿新的第0维堆叠
    pub fn stack(tensors: &[Tensor]) -> Result<Tensor, TensorError> {
        let Some(first) = tensors.first() else {
            return Err(TensorError::DimensionMismatch { expected: 1, got: 0 });
        };
        let views = tensors
            .iter()
            .map(|t| {
                if t.is_same_shape(first) {
                    Ok(t.view())
                } else {
                    Err(TensorError::OperatorError {
                        operator: crate::errors::Operator::Stack,
                        tensor1_shape: first.shape().to_vec(),
                        tensor2_shape: t.shape().to_vec(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let stacked = ndarray::stack(Axis(0), &views).map_err(|_| TensorError::DimensionMismatch {
            expected: first.dimension(),
            got: first.dimension() + 1,
        })?;
        Ok(Tensor::from_array(stacked))
    }
}
