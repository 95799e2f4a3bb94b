/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 张量的四则运算，实现了两个张量“逐元素”（或张量与纯数）运算，并返回一个新的张量。
 *                 该运算支持以下情况：
 *                 1. 其中一个操作数为纯数而另一个为张量：则返回的张量形状与该张量相同。
 *                 2. 两个操作数均为张量：支持 NumPy 风格的广播（broadcasting）。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub};

/// 两个张量逐元素运算，支持 NumPy 风格广播
///
/// # Panics
/// 如果形状不兼容（无法广播）
fn broadcast_op(
    tensor_1: &Tensor,
    tensor_2: &Tensor,
    operator: Operator,
    f: impl Fn(f32, f32) -> f32,
) -> Tensor {
    let Some(shape) = super::super::property::broadcast_shape(tensor_1.shape(), tensor_2.shape())
    else {
        panic!(
            "{}",
            TensorError::OperatorError {
                operator,
                tensor1_shape: tensor_1.shape().to_vec(),
                tensor2_shape: tensor_2.shape().to_vec(),
            }
        )
    };
    let data = if tensor_1.is_same_shape(tensor_2) {
        ndarray::Zip::from(&tensor_1.data)
            .and(&tensor_2.data)
            .map_collect(|&a, &b| f(a, b))
    } else {
        // 两者均在广播形状下取视图
        let view_1 = tensor_1.data.broadcast(shape.as_slice());
        let view_2 = tensor_2.data.broadcast(shape.as_slice());
        match (view_1, view_2) {
            (Some(a), Some(b)) => ndarray::Zip::from(&a).and(&b).map_collect(|&a, &b| f(a, b)),
            _ => panic!(
                "{}",
                TensorError::OperatorError {
                    operator,
                    tensor1_shape: tensor_1.shape().to_vec(),
                    tensor2_shape: tensor_2.shape().to_vec(),
                }
            ),
        }
    };
    Tensor::from_array(data)
}

macro_rules! impl_binary_op {
    ($trait_name:ident, $method:ident, $operator:expr, $f:expr) => {
        impl $trait_name for Tensor {
            type Output = Tensor;
            fn $method(self, other: Tensor) -> Tensor {
                broadcast_op(&self, &other, $operator, $f)
            }
        }
        impl<'a> $trait_name<&'a Tensor> for Tensor {
            type Output = Tensor;
            fn $method(self, other: &'a Tensor) -> Tensor {
                broadcast_op(&self, other, $operator, $f)
            }
        }
        impl $trait_name<Tensor> for &Tensor {
            type Output = Tensor;
            fn $method(self, other: Tensor) -> Tensor {
                broadcast_op(self, &other, $operator, $f)
            }
        }
        impl<'b> $trait_name<&'b Tensor> for &Tensor {
            type Output = Tensor;
            fn $method(self, other: &'b Tensor) -> Tensor {
                broadcast_op(self, other, $operator, $f)
            }
        }
        impl $trait_name<f32> for Tensor {
            type Output = Tensor;
            fn $method(self, scalar: f32) -> Tensor {
                let f = $f;
                Tensor::from_array(self.data.mapv(|a| f(a, scalar)))
            }
        }
        impl $trait_name<f32> for &Tensor {
            type Output = Tensor;
            fn $method(self, scalar: f32) -> Tensor {
                let f = $f;
                Tensor::from_array(self.data.mapv(|a| f(a, scalar)))
            }
        }
        impl $trait_name<Tensor> for f32 {
            type Output = Tensor;
            fn $method(self, tensor: Tensor) -> Tensor {
                let f = $f;
                Tensor::from_array(tensor.data.mapv(|a| f(self, a)))
            }
        }
        impl<'a> $trait_name<&'a Tensor> for f32 {
            type Output = Tensor;
            fn $method(self, tensor: &'a Tensor) -> Tensor {
                let f = $f;
                Tensor::from_array(tensor.data.mapv(|a| f(self, a)))
            }
        }
    };
}

impl_binary_op!(Add, add, Operator::Add, |a: f32, b: f32| a + b);
impl_binary_op!(Sub, sub, Operator::Sub, |a: f32, b: f32| a - b);
impl_binary_op!(Mul, mul, Operator::Mul, |a: f32, b: f32| a * b);
impl_binary_op!(Div, div, Operator::Div, |a: f32, b: f32| a / b);

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓自运算↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl<'a> AddAssign<&'a Tensor> for Tensor {
    /// 仅支持形状严格一致的累加（梯度累加场景）
    fn add_assign(&mut self, other: &'a Tensor) {
        assert!(
            self.is_same_shape(other),
            "{}",
            TensorError::OperatorError {
                operator: Operator::AddAssign,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        self.data += &other.data;
    }
}

impl MulAssign<f32> for Tensor {
    fn mul_assign(&mut self, scalar: f32) {
        self.data *= scalar;
    }
}

impl Neg for Tensor {
    type Output = Tensor;
    fn neg(self) -> Tensor {
        Tensor::from_array(-self.data)
    }
}

impl Neg for &Tensor {
    type Output = Tensor;
    fn neg(self) -> Tensor {
        Tensor::from_array(-&self.data)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑自运算↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
