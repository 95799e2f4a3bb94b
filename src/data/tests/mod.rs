mod dataloader;
mod transforms;

use crate::data::PairedDataset;
use crate::tensor::Tensor;

/// 每个样本的像素值都等于样本下标，便于追踪批次内容
fn indexed_dataset(len: usize, channels: usize) -> PairedDataset {
    let color_size = channels * 28 * 28;
    let gray_size = 14 * 14;
    let color = (0..len)
        .flat_map(|i| std::iter::repeat_n(i as f32, color_size))
        .collect::<Vec<_>>();
    let gray = (0..len)
        .flat_map(|i| std::iter::repeat_n(i as f32, gray_size))
        .collect::<Vec<_>>();
    PairedDataset::new(
        Tensor::new(&color, &[len, channels, 28, 28]),
        Tensor::new(&gray, &[len, 1, 14, 14]),
    )
    .unwrap()
}

/// 每个测试独占的临时目录
fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("colorize_gan_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
