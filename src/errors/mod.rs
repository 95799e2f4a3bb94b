use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不兼容，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("数据长度{data_len}与形状{shape:?}（元素个数{expected}）不一致")]
    DataShapeMismatch {
        data_len: usize,
        shape: Vec<usize>,
        expected: usize,
    },
    #[error("无法将形状为{from:?}的张量重塑为{to:?}")]
    IncompatibleReshape { from: Vec<usize>, to: Vec<usize> },
    #[error("该运算要求张量为{expected}维，实际为{got}维")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("索引{index}越界（第0维长度为{len}）")]
    IndexOutOfBounds { index: usize, len: usize },
}
