use crate::nn::{GraphError, Var};

/// 损失函数扩展 trait，结果为 [1, 1] 的标量节点
pub trait VarLossOps {
    /// 均方误差：mean((self - target)²)
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError>;

    /// 二元交叉熵，`self`须为概率（通常是 sigmoid 的输出）
    fn bce_loss(&self, target: &Var) -> Result<Var, GraphError>;
}

impl VarLossOps for Var {
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(target)?;
        self.derive(|g| g.new_mse_loss_node(self.node_id(), target.node_id(), None))
    }

    fn bce_loss(&self, target: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(target)?;
        self.derive(|g| g.new_bce_loss_node(self.node_id(), target.node_id(), None))
    }
}
