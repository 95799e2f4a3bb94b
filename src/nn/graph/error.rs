/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 模块的错误类型
 */

use crate::errors::TensorError;
use crate::nn::NodeId;
use thiserror::Error;

/// Graph 操作错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("节点{0}不存在")]
    NodeNotFound(NodeId),
    #[error("非法操作：{0}")]
    InvalidOperation(String),
    #[error("形状不匹配：期望{expected:?}，实际{got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("维度不匹配：期望{expected}维，实际{got}维。{message}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        message: String,
    },
    #[error("计算错误：{0}")]
    ComputationError(String),
    #[error("节点名称重复：{0}")]
    DuplicateNodeName(String),
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
