/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 灰度图上色GAN：网络结构、损失组合与训练循环
 */

mod config;
mod discriminator;
mod error;
mod generator;
pub mod loss;
mod progress;
mod trainer;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, SampleRange, TrainConfig};
pub use discriminator::{COLOR_SIDE, Discriminator};
pub use error::TrainError;
pub use generator::{GRAY_SIDE, Generator};
pub use progress::{LogProgress, ProgressSink, StepLosses, StepReport};
pub use trainer::Trainer;

use crate::data::{DataLoader, PairedDataset};
use crate::nn::Device;
use crate::vision::PngGridWriter;

/// 以参考配置完整训练一次
///
/// `use_accelerator`决定卷积等算子是否并行执行，以及样本图的保存位置。
pub fn train_gan(use_accelerator: bool) -> Result<(), TrainError> {
    train_with_config(TrainConfig::for_device(Device::from_accelerator_flag(
        use_accelerator,
    )))
}

/// 按给定配置从图像目录读取数据并训练
pub fn train_with_config(config: TrainConfig) -> Result<(), TrainError> {
    config.validate()?;
    let load = |range: SampleRange| {
        PairedDataset::from_folders(
            &config.color_dir,
            &config.gray_dir,
            config.channels,
            range.lower,
            range.upper,
        )
    };
    let train_set = load(config.train_range)?;
    let held_out_set = load(config.held_out_range)?;
    tracing::info!(
        "训练集{}个样本，留出集{}个样本",
        train_set.len(),
        held_out_set.len()
    );

    let mut train = DataLoader::new(train_set, config.batch_size).shuffle(true);
    let mut held_out = DataLoader::new(held_out_set, config.batch_size).shuffle(true);
    if let Some(seed) = config.seed {
        train = train.seed(seed);
        held_out = held_out.seed(seed.wrapping_add(1));
    }

    let mut trainer = Trainer::new(config)?;
    trainer.fit(&train, &held_out, &mut PngGridWriter::new(), &mut LogProgress)
}
