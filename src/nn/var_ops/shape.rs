use crate::nn::{GraphError, Var};

/// 形状变换扩展 trait
pub trait VarShapeOps {
    /// 变形为`shape`，元素个数须不变
    fn reshape(&self, shape: &[usize]) -> Result<Var, GraphError>;

    /// 保留第一维（batch），其余维度展平：[N, ...] -> [N, rest]
    fn flatten(&self) -> Result<Var, GraphError>;
}

impl VarShapeOps for Var {
    fn reshape(&self, shape: &[usize]) -> Result<Var, GraphError> {
        self.derive(|g| g.new_reshape_node(self.node_id(), shape, None))
    }

    fn flatten(&self) -> Result<Var, GraphError> {
        let shape = self.shape()?;
        let batch = shape.first().copied().ok_or_else(|| {
            GraphError::InvalidOperation("标量节点无法展平".to_string())
        })?;
        let rest = shape[1..].iter().product::<usize>();
        self.reshape(&[batch, rest])
    }
}
