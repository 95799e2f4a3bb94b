/*
 * @Author       : 老董
 * @Date         : 2026-02-16
 * @Description  : 灰度图上色 GAN 集成测试
 *                 验证：完整训练流程（进度汇报 + 样本图保存）与 G/D 参数隔离
 */

use std::path::{Path, PathBuf};

use colorize_gan::data::{DataLoader, PairedDataset};
use colorize_gan::gan::{StepReport, TrainConfig, Trainer};
use colorize_gan::nn::{Device, Module, Var};
use colorize_gan::tensor::Tensor;
use colorize_gan::vision::{SampleWriter, VisionError};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 只记录调用的样本图保存者
#[derive(Default)]
struct RecordingWriter {
    calls: Vec<(PathBuf, Vec<usize>, usize)>,
}

impl SampleWriter for RecordingWriter {
    fn write_samples(
        &mut self,
        images: &Tensor,
        path: &Path,
        width: usize,
    ) -> Result<(), VisionError> {
        self.calls
            .push((path.to_path_buf(), images.shape().to_vec(), width));
        Ok(())
    }
}

fn synthetic_dataset(n: usize, channels: usize, seed: u64) -> PairedDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    PairedDataset::new(
        Tensor::uniform_with_rng(0.0, 1.0, &[n, channels, 28, 28], &mut rng),
        Tensor::uniform_with_rng(0.0, 1.0, &[n, 1, 14, 14], &mut rng),
    )
    .unwrap()
}

fn snapshot(params: &[Var]) -> Vec<Tensor> {
    params.iter().map(|p| p.value().unwrap()).collect()
}

#[test]
fn test_one_epoch_end_to_end() {
    let config = TrainConfig {
        batch_size: 2,
        num_epochs: 1,
        dim: 8,
        channels: 4,
        seed: Some(42),
        ..TrainConfig::default()
    };
    let train = DataLoader::new(synthetic_dataset(4, 4, 1), config.batch_size)
        .shuffle(true)
        .seed(42);
    let held_out = DataLoader::new(synthetic_dataset(4, 4, 2), config.batch_size);

    let mut trainer = Trainer::new(config).unwrap();
    let mut writer = RecordingWriter::default();
    let mut reports: Vec<StepReport> = Vec::new();
    let mut progress = |report: &StepReport| reports.push(*report);

    trainer
        .fit(&train, &held_out, &mut writer, &mut progress)
        .unwrap();

    assert_eq!(reports.len(), 2);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!((report.epoch, report.num_epochs), (1, 1));
        assert_eq!((report.step, report.num_steps), (i + 1, 2));
        assert!(report.losses.generator >= 0.0);
        assert!(report.losses.discriminator >= 0.0);
    }

    assert_eq!(writer.calls.len(), 1);
    let (path, shape, width) = &writer.calls[0];
    assert!(path.to_string_lossy().contains("epoch_1"));
    assert_eq!(shape, &vec![2, 4, 28, 28]);
    assert_eq!(*width, 10);
}

#[test]
fn test_accelerated_training_matches_cpu() {
    let run = |device: Device| {
        let config = TrainConfig {
            batch_size: 2,
            dim: 8,
            seed: Some(3),
            device,
            ..TrainConfig::default()
        };
        let dataset = synthetic_dataset(2, 3, 5);
        let mut trainer = Trainer::new(config).unwrap();
        trainer.train_batch(dataset.color(), dataset.gray()).unwrap();
        snapshot(&trainer.generator().parameters())
    };

    // 并行只改变样本的计算顺序，不改变各样本局部结果的求和顺序
    assert_eq!(run(Device::Cpu), run(Device::Accelerator));
}

#[test]
fn test_each_step_only_moves_its_own_network() {
    let config = TrainConfig {
        batch_size: 3,
        dim: 8,
        seed: Some(9),
        ..TrainConfig::default()
    };
    let dataset = synthetic_dataset(3, 3, 6);
    let mut trainer = Trainer::new(config).unwrap();

    let g_params = trainer.generator().parameters();
    let d_params = trainer.discriminator().parameters();

    let d_before = snapshot(&d_params);
    trainer
        .generator_step(dataset.color(), dataset.gray())
        .unwrap();
    assert_eq!(snapshot(&d_params), d_before);

    let g_before = snapshot(&g_params);
    trainer
        .discriminator_step(dataset.color(), dataset.gray())
        .unwrap();
    assert_eq!(snapshot(&g_params), g_before);
    assert_ne!(snapshot(&d_params), d_before);
}
