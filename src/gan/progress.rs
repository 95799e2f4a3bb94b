/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 训练进度的汇报
 */

/// 一个批次的两项损失
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepLosses {
    pub generator: f32,
    pub discriminator: f32,
}

/// 一个批次结束时的进度，序号均从1开始
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub epoch: usize,
    pub num_epochs: usize,
    pub step: usize,
    pub num_steps: usize,
    pub losses: StepLosses,
}

/// 进度的接收者，每个批次调用一次
pub trait ProgressSink {
    fn report(&mut self, report: &StepReport);
}

/// 以日志形式输出进度
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, report: &StepReport) {
        tracing::info!(
            "Epoch: [{}/{}], Step: [{}/{}], G_loss: {:.4}, D_loss: {:.4}",
            report.epoch,
            report.num_epochs,
            report.step,
            report.num_steps,
            report.losses.generator,
            report.losses.discriminator
        );
    }
}

impl<F: FnMut(&StepReport)> ProgressSink for F {
    fn report(&mut self, report: &StepReport) {
        self(report);
    }
}
