//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

use crate::errors::TensorError;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件或目录未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 图像解码错误
    #[error("图像解码失败: {0}")]
    Image(#[from] image::ImageError),

    /// 彩色图在灰度目录中没有同名文件
    #[error("彩色图缺少同名的灰度图: {0}")]
    Unpaired(PathBuf),

    /// 索引越界
    #[error("索引越界: {index} > {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 不支持的通道数（只支持 1、3、4）
    #[error("不支持的通道数: {0}")]
    UnsupportedChannels(usize),

    /// 样本区间为空
    #[error("样本区间 [{lower}, {upper}) 内没有样本")]
    EmptyRange { lower: usize, upper: usize },

    #[error(transparent)]
    Tensor(#[from] TensorError),
}
