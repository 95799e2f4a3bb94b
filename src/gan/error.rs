//! 训练过程的顶层错误类型

use thiserror::Error;

use super::ConfigError;
use crate::data::DataError;
use crate::nn::GraphError;
use crate::vision::VisionError;

/// 训练中任何一步失败都会以此错误终止整个训练
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error("训练配置无效：{0}")]
    Config(#[from] ConfigError),
    #[error("留出数据集为空，无法生成样本图")]
    EmptyHeldOut,
    #[error("彩色图与灰度图的批大小不一致：{color} vs {gray}")]
    BatchSizeMismatch { color: usize, gray: usize },
}
