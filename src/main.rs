/*
 * @Author       : 老董
 * @Date         : 2026-02-16
 * @Description  : 程序入口：以参考配置完整训练一次
 */

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// 是否在加速设备（并行算子）上训练
const USE_ACCELERATOR: bool = true;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match colorize_gan::gan::train_gan(USE_ACCELERATOR) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("训练失败：{e}");
            ExitCode::FAILURE
        }
    }
}
