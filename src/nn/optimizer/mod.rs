/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : 优化器（PyTorch 风格）
 *
 * - Optimizer 持有 Rc<RefCell<GraphInner>> 引用，并绑定特定参数
 * - `backward()` 计算所有参数的梯度（由 Var 调用）
 * - `step()` 只更新 Optimizer 绑定的参数
 */

mod adam;

pub use adam::Adam;

use crate::nn::GraphError;

/// Optimizer trait
///
/// ```ignore
/// let mut optimizer = Adam::new(&graph, &model.parameters(), 2e-4);
///
/// optimizer.zero_grad()?;
/// let loss = model.forward(&x)?.mse_loss(&y)?;
/// loss.backward()?;
/// optimizer.step()?;
/// ```
pub trait Optimizer {
    /// 清零所绑定参数的梯度
    fn zero_grad(&mut self) -> Result<(), GraphError>;

    /// 更新参数（只更新 Optimizer 绑定的参数）
    fn step(&mut self) -> Result<(), GraphError>;

    fn learning_rate(&self) -> f32;

    fn set_learning_rate(&mut self, lr: f32);

    /// 重置累积状态（如 Adam 的动量）
    fn reset(&mut self);
}
