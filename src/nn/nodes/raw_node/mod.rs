mod input;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::Input;
pub(in crate::nn) use loss::*;
pub(in crate::nn) use ops::*;
pub(in crate::nn) use parameter::Parameter;

use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Clone)]
pub(crate) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Add(Add),
    MatMul(MatMul),
    Reshape(Reshape),
    Conv2d(Conv2d),
    ConvTranspose2d(ConvTranspose2d),
    ChannelBiasAdd(ChannelBiasAdd),
    BatchNorm2d(BatchNorm2d),
    LeakyReLU(LeakyReLU),
    Tanh(Tanh),
    Sigmoid(Sigmoid),
    MseLoss(MseLoss),
    BceLoss(BceLoss),
}

use crate::nn::GraphError;
use crate::tensor::Tensor;

#[enum_dispatch(NodeType)]
pub(crate) trait TraitNode {
    fn type_name(&self) -> &'static str;

    /// 根据父节点的值计算本节点的值（父节点的值按`parents`的顺序给出），
    /// 反向传播需要的中间结果也在此缓存
    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError>;

    /// 已知结果节点对本节点的梯度`upstream_grad`，计算其对第`index`个父节点的梯度（VJP）
    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError>;
}

/// 检查父节点数量，供各节点在求值时使用
pub(in crate::nn::nodes) fn check_parents_count(
    type_name: &str,
    parents: &[&Tensor],
    expected: usize,
) -> Result<(), GraphError> {
    if parents.len() != expected {
        return Err(GraphError::InvalidOperation(format!(
            "{type_name}节点需要{expected}个父节点，但得到{}个",
            parents.len()
        )));
    }
    Ok(())
}

/// 父节点序号越界，不该触及本错误，否则说明crate代码有问题
pub(in crate::nn::nodes) fn invalid_parent_index(type_name: &str, index: usize) -> GraphError {
    GraphError::ComputationError(format!("{type_name}节点没有第{index}个父节点"))
}
