//! # Colorize GAN
//!
//! `colorize_gan`用纯rust实现一个灰度图像上色的对抗生成网络（GAN）：
//! 生成器（Generator）将14×14的单通道灰度图放大并上色为28×28的彩色图，
//! 判别器（Discriminator）负责区分生成图与真实彩色图。
//!
//! 项目自带一个轻量的张量/自动微分引擎（[`tensor`]、[`nn`]），GAN 的网络结构、
//! 损失组合与训练循环位于[`gan`]模块；数据读取与样本图保存分别位于[`data`]与[`vision`]。
//!

pub mod data;
pub mod errors;
pub mod gan;
pub mod nn;
pub mod tensor;
pub mod vision;
