use crate::nn::GraphError;
use crate::nn::nodes::raw_node::{TraitNode, check_parents_count, invalid_parent_index};
use crate::tensor::Tensor;

/// 矩阵乘法节点：[m, k] × [k, n] -> [m, n]
#[derive(Clone, Default)]
pub(crate) struct MatMul;

impl MatMul {
    pub(crate) const fn new() -> Self {
        Self
    }
}

impl TraitNode for MatMul {
    fn type_name(&self) -> &'static str {
        "MatMul"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_parents_count(self.type_name(), parents, 2)?;
        let (a, b) = (parents[0], parents[1]);
        if a.dimension() != 2 || b.dimension() != 2 || a.shape()[1] != b.shape()[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![a.shape().last().copied().unwrap_or(0), 0],
                got: b.shape().to_vec(),
                message: format!(
                    "MatMul节点要求 [m, k] × [k, n]，得到 {:?} × {:?}",
                    a.shape(),
                    b.shape()
                ),
            });
        }
        Ok(a.matmul(b)?)
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match index {
            // dA = dC · Bᵀ
            0 => Ok(upstream_grad.matmul(&parents[1].transpose()?)?),
            // dB = Aᵀ · dC
            1 => Ok(parents[0].transpose()?.matmul(upstream_grad)?),
            _ => Err(invalid_parent_index(self.type_name(), index)),
        }
    }
}
