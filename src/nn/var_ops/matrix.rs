use crate::nn::{GraphError, Var};

/// 矩阵运算扩展 trait
pub trait VarMatrixOps {
    /// 矩阵乘法：[m, k] × [k, n] -> [m, n]
    fn matmul(&self, other: &Var) -> Result<Var, GraphError>;
}

impl VarMatrixOps for Var {
    fn matmul(&self, other: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(other)?;
        self.derive(|g| g.new_mat_mul_node(self.node_id(), other.node_id(), None))
    }
}
