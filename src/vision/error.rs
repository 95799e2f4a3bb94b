//! 样本图保存相关的错误类型

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    /// 只支持 1（灰度）、3（RGB）、4（RGBA）通道
    #[error("不支持的通道数: {0}")]
    UnsupportedChannels(usize),

    #[error("图像张量须为[N, C, H, W]形状，实际为{0:?}")]
    InvalidShape(Vec<usize>),

    #[error("每行图像个数须大于 0")]
    ZeroGridWidth,

    #[error("无法创建目录{path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("图像保存失败: {0}")]
    Image(#[from] image::ImageError),
}
