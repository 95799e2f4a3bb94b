mod config;
mod loss;
mod networks;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::gan::TrainConfig;
use crate::nn::Var;
use crate::tensor::Tensor;

/// 小尺寸、可复现的配置
fn small_config() -> TrainConfig {
    TrainConfig {
        dim: 8,
        channels: 3,
        batch_size: 2,
        num_epochs: 1,
        seed: Some(7),
        ..TrainConfig::default()
    }
}

/// [0, 1) 上均匀分布的（彩色, 灰度）批次
fn random_batch(n: usize, channels: usize, seed: u64) -> (Tensor, Tensor) {
    let mut rng = StdRng::seed_from_u64(seed);
    (
        Tensor::uniform_with_rng(0.0, 1.0, &[n, channels, 28, 28], &mut rng),
        Tensor::uniform_with_rng(0.0, 1.0, &[n, 1, 14, 14], &mut rng),
    )
}

fn snapshot(params: &[Var]) -> Vec<Tensor> {
    params.iter().map(|p| p.value().unwrap()).collect()
}
