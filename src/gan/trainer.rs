/*
 * @Author       : 老董
 * @Date         : 2026-02-15
 * @Description  : 对抗训练循环
 *
 * 每个批次先训练生成器，再训练判别器：
 * - G 步：D 的参数会得到梯度，但只有 G 的优化器执行 step
 * - D 步：重新生成的假图被 detach，梯度不会流回 G
 * 每个 epoch 结束时用留出集的一个批次生成样本图。
 */

use std::path::PathBuf;

use super::loss::{discriminator_loss, fake_labels, generator_loss, real_labels};
use super::{
    Discriminator, Generator, ProgressSink, StepLosses, StepReport, TrainConfig, TrainError,
};
use crate::data::DataLoader;
use crate::nn::{Adam, Graph, Module, Optimizer};
use crate::tensor::Tensor;
use crate::vision::{SampleWriter, denormalize};

pub struct Trainer {
    config: TrainConfig,
    graph: Graph,
    generator: Generator,
    discriminator: Discriminator,
    g_optimizer: Adam,
    d_optimizer: Adam,
}

impl Trainer {
    /// 校验配置并构建两个网络及各自的优化器
    pub fn new(config: TrainConfig) -> Result<Self, TrainError> {
        config.validate()?;

        let graph = config.seed.map_or_else(Graph::new, Graph::new_with_seed);
        graph.set_device(config.device);

        let generator = Generator::new(&graph, config.dim, config.channels)?;
        let discriminator = Discriminator::new(&graph, config.dim, config.channels)?;

        let (beta1, beta2) = config.betas;
        let g_optimizer = Adam::with_config(
            &graph,
            &generator.parameters(),
            config.learning_rate,
            beta1,
            beta2,
            config.epsilon,
        );
        let d_optimizer = Adam::with_config(
            &graph,
            &discriminator.parameters(),
            config.learning_rate,
            beta1,
            beta2,
            config.epsilon,
        );
        tracing::debug!(
            "网络已构建：G {}个参数张量，D {}个参数张量，设备{}",
            generator.num_params(),
            discriminator.num_params(),
            config.device
        );

        Ok(Self {
            config,
            graph,
            generator,
            discriminator,
            g_optimizer,
            d_optimizer,
        })
    }

    /// 生成器的一步更新，返回 G_loss
    pub fn generator_step(&mut self, color: &Tensor, gray: &Tensor) -> Result<f32, TrainError> {
        let n = batch_size_of(color, gray)?;
        let color = self.graph.input(color)?;
        let gray = self.graph.input(gray)?;
        let real = self.graph.input(&real_labels(n))?;

        self.g_optimizer.zero_grad()?;
        let generated = self.generator.forward(&gray)?;
        let d_on_generated = self.discriminator.forward(&generated)?;
        let loss = generator_loss(&generated, &color, &d_on_generated, &real)?;
        let value = loss.backward()?;
        self.g_optimizer.step()?;
        Ok(value)
    }

    /// 判别器的一步更新，返回 D_loss
    pub fn discriminator_step(
        &mut self,
        color: &Tensor,
        gray: &Tensor,
    ) -> Result<f32, TrainError> {
        let n = batch_size_of(color, gray)?;
        let color = self.graph.input(color)?;
        let gray = self.graph.input(gray)?;
        let real = self.graph.input(&real_labels(n))?;
        let fake = self.graph.input(&fake_labels(n))?;

        let generated = self.generator.forward(&gray)?.detach()?;
        self.d_optimizer.zero_grad()?;
        let d_on_fake = self.discriminator.forward(&generated)?;
        let d_on_real = self.discriminator.forward(&color)?;
        let loss = discriminator_loss(&d_on_fake, &fake, &d_on_real, &real)?;
        let value = loss.backward()?;
        self.d_optimizer.step()?;
        Ok(value)
    }

    /// 先 G 后 D 地训练一个批次，结束后释放本批次的中间节点
    pub fn train_batch(&mut self, color: &Tensor, gray: &Tensor) -> Result<StepLosses, TrainError> {
        let generator = self.generator_step(color, gray)?;
        let discriminator = self.discriminator_step(color, gray)?;
        let before = self.graph.nodes_count();
        self.graph.release_intermediate_nodes();
        tracing::debug!(
            "释放了{}个中间节点",
            before - self.graph.nodes_count()
        );
        Ok(StepLosses {
            generator,
            discriminator,
        })
    }

    /// 在 no_grad 下为灰度图上色，BN 使用滑动统计量，输出`[N, C, 28, 28]`
    pub fn colorize(&self, gray: &Tensor) -> Result<Tensor, TrainError> {
        let colorized = self.graph.no_grad_scope(|graph| {
            let gray = graph.input(gray)?;
            self.generator.forward(&gray)?.value()
        });
        self.graph.release_intermediate_nodes();
        Ok(colorized?)
    }

    /// 为留出集的第一个批次上色并保存为样本图，返回保存路径
    pub fn evaluate(
        &self,
        held_out: &DataLoader,
        epoch: usize,
        writer: &mut dyn SampleWriter,
    ) -> Result<PathBuf, TrainError> {
        let (_, gray) = held_out.iter().next().ok_or(TrainError::EmptyHeldOut)??;
        let images = denormalize(&self.colorize(&gray)?);
        let path = self.config.sample_path(epoch);
        writer.write_samples(&images, &path, self.config.grid_width)?;
        Ok(path)
    }

    /// 完整训练：每个批次汇报一次进度，每个 epoch 结束时保存一次样本图
    pub fn fit(
        &mut self,
        train: &DataLoader,
        held_out: &DataLoader,
        writer: &mut dyn SampleWriter,
        progress: &mut dyn ProgressSink,
    ) -> Result<(), TrainError> {
        let num_epochs = self.config.num_epochs;
        let num_steps = train.num_batches();
        tracing::info!(
            "开始训练：{}个epoch，每个epoch {}个批次，设备{}",
            num_epochs,
            num_steps,
            self.config.device
        );

        for epoch in 1..=num_epochs {
            let mut sum = StepLosses {
                generator: 0.0,
                discriminator: 0.0,
            };
            for (i, batch) in train.iter().enumerate() {
                let (color, gray) = batch?;
                let losses = self.train_batch(&color, &gray)?;
                sum.generator += losses.generator;
                sum.discriminator += losses.discriminator;
                progress.report(&StepReport {
                    epoch,
                    num_epochs,
                    step: i + 1,
                    num_steps,
                    losses,
                });
            }

            let steps = num_steps.max(1) as f32;
            tracing::info!(
                "Epoch {}/{}结束：平均G_loss {:.4}，平均D_loss {:.4}",
                epoch,
                num_epochs,
                sum.generator / steps,
                sum.discriminator / steps
            );
            self.evaluate(held_out, epoch, writer)?;
        }
        Ok(())
    }

    pub const fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub const fn generator(&self) -> &Generator {
        &self.generator
    }

    pub const fn discriminator(&self) -> &Discriminator {
        &self.discriminator
    }
}

fn batch_size_of(color: &Tensor, gray: &Tensor) -> Result<usize, TrainError> {
    let color_n = color.shape().first().copied().unwrap_or(0);
    let gray_n = gray.shape().first().copied().unwrap_or(0);
    if color_n == gray_n {
        Ok(color_n)
    } else {
        Err(TrainError::BatchSizeMismatch {
            color: color_n,
            gray: gray_n,
        })
    }
}
