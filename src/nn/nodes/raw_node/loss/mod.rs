mod bce_loss;
mod mse_loss;

pub(in crate::nn) use bce_loss::BceLoss;
pub(in crate::nn) use mse_loss::MseLoss;

use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 预测与目标须形状一致
fn check_same_shape(
    type_name: &str,
    prediction: &Tensor,
    target: &Tensor,
) -> Result<(), GraphError> {
    if !prediction.is_same_shape(target) {
        return Err(GraphError::ShapeMismatch {
            expected: prediction.shape().to_vec(),
            got: target.shape().to_vec(),
            message: format!("{type_name}的预测值与目标值形状不一致"),
        });
    }
    Ok(())
}

/// 损失节点的上游梯度是 [1, 1] 的标量
fn upstream_scalar(type_name: &str, upstream_grad: &Tensor) -> Result<f32, GraphError> {
    upstream_grad.number().ok_or_else(|| {
        GraphError::ComputationError(format!(
            "{type_name}的上游梯度应为标量，得到 {:?}",
            upstream_grad.shape()
        ))
    })
}
