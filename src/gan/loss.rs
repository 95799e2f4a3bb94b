/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 生成器/判别器的损失组合，各项系数均为1
 */

use crate::nn::{GraphError, Var, VarLossOps};
use crate::tensor::Tensor;

/// 长度为`n`的全1标签（“真”）
pub fn real_labels(n: usize) -> Tensor {
    Tensor::ones(&[n])
}

/// 长度为`n`的全0标签（“假”）
pub fn fake_labels(n: usize) -> Tensor {
    Tensor::zeros(&[n])
}

/// G_loss = MSE(G(gray), color) + BCE(D(G(gray)), 1)
pub fn generator_loss(
    generated: &Var,
    color: &Var,
    d_on_generated: &Var,
    real: &Var,
) -> Result<Var, GraphError> {
    let reconstruction = generated.mse_loss(color)?;
    let adversarial = d_on_generated.bce_loss(real)?;
    reconstruction.try_add(&adversarial)
}

/// D_loss = BCE(D(fake), 0) + BCE(D(color), 1)
pub fn discriminator_loss(
    d_on_fake: &Var,
    fake: &Var,
    d_on_real: &Var,
    real: &Var,
) -> Result<Var, GraphError> {
    d_on_fake.bce_loss(fake)?.try_add(&d_on_real.bce_loss(real)?)
}
