/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 训练配置：所有超参数集中在一个不可变的结构体中，由`Trainer::new`接收
 */

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nn::Device;

/// 训练配置的校验错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("dim须为4的正整数倍，实际为{0}")]
    InvalidDim(usize),
    #[error("{0}须大于0")]
    Zero(&'static str),
    #[error("不支持的通道数{0}（只支持1、3、4）")]
    UnsupportedChannels(usize),
    #[error("训练区间{train}与留出区间{held_out}重叠")]
    OverlappingRanges {
        train: SampleRange,
        held_out: SampleRange,
    },
    #[error("样本区间{0}为空")]
    EmptyRange(SampleRange),
}

/// 半开的样本下标区间 [lower, upper)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRange {
    pub lower: usize,
    pub upper: usize,
}

impl SampleRange {
    pub const fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    pub const fn len(&self) -> usize {
        self.upper.saturating_sub(self.lower)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn overlaps(&self, other: &Self) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }
}

impl std::fmt::Display for SampleRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

/// 训练配置，`Default`即参考训练的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f32,
    pub betas: (f32, f32),
    pub epsilon: f32,
    pub num_epochs: usize,
    pub batch_size: usize,
    /// 网络宽度：G 的种子通道数，也是 D 最后一层卷积的通道数
    pub dim: usize,
    /// 彩色图通道数，G 的输出与 D 的输入共用
    pub channels: usize,
    /// 样本网格每行的图像个数
    pub grid_width: usize,
    pub train_range: SampleRange,
    pub held_out_range: SampleRange,
    pub color_dir: PathBuf,
    pub gray_dir: PathBuf,
    /// 参数初始化与数据打乱的随机种子，None 则每次运行不同
    pub seed: Option<u64>,
    pub device: Device,
    /// 样本图路径模板，`{}`处替换为从1开始的 epoch 序号
    pub sample_pattern: String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 2e-4,
            betas: (0.5, 0.999),
            epsilon: 1e-8,
            num_epochs: 20,
            batch_size: 100,
            dim: 32,
            channels: 3,
            grid_width: 10,
            train_range: SampleRange::new(0, 18000),
            held_out_range: SampleRange::new(18000, 22000),
            color_dir: PathBuf::from("/data/Cats_color_32"),
            gray_dir: PathBuf::from("/data/Cats_B&W_32"),
            seed: None,
            device: Device::Cpu,
            sample_pattern: Self::sample_pattern_for(Device::Cpu).to_string(),
        }
    }
}

impl TrainConfig {
    /// 参考配置，设备与样本路径模板由`device`决定
    pub fn for_device(device: Device) -> Self {
        Self {
            device,
            sample_pattern: Self::sample_pattern_for(device).to_string(),
            ..Self::default()
        }
    }

    const fn sample_pattern_for(device: Device) -> &'static str {
        match device {
            Device::Accelerator => "/output/epoch_{}.png",
            Device::Cpu => "samples/epoch_{}.png",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dim == 0 || self.dim % 4 != 0 {
            return Err(ConfigError::InvalidDim(self.dim));
        }
        for (name, value) in [
            ("batch_size", self.batch_size),
            ("num_epochs", self.num_epochs),
            ("grid_width", self.grid_width),
            ("channels", self.channels),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        if !matches!(self.channels, 1 | 3 | 4) {
            return Err(ConfigError::UnsupportedChannels(self.channels));
        }
        for range in [self.train_range, self.held_out_range] {
            if range.is_empty() {
                return Err(ConfigError::EmptyRange(range));
            }
        }
        if self.train_range.overlaps(&self.held_out_range) {
            return Err(ConfigError::OverlappingRanges {
                train: self.train_range,
                held_out: self.held_out_range,
            });
        }
        Ok(())
    }

    /// 第`epoch`（从1开始）个 epoch 的样本图路径
    pub fn sample_path(&self, epoch: usize) -> PathBuf {
        PathBuf::from(self.sample_pattern.replace("{}", &epoch.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 缺省的字段取参考配置中的值
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
