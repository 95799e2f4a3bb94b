/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 计算设备：决定卷积/归一化等重计算算子是否在batch维度上并行
 */

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// 计算设备
///
/// 计算图中所有张量都位于同一设备上，因此不存在跨设备运算。
/// `Accelerator`以rayon线程池在batch维度上并行执行卷积、批归一化等算子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Cpu,
    Accelerator,
}

impl Device {
    pub const fn from_accelerator_flag(use_accelerator: bool) -> Self {
        if use_accelerator {
            Self::Accelerator
        } else {
            Self::Cpu
        }
    }

    pub const fn is_accelerated(&self) -> bool {
        matches!(self, Self::Accelerator)
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Accelerator => write!(f, "accelerator"),
        }
    }
}
