/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : Linear (全连接) 层
 */

use crate::nn::{Graph, GraphError, Init, Module, Var, VarMatrixOps};

/// Linear (全连接) 层
///
/// PyTorch 风格的全连接层：`output = x @ W + b`
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
pub struct Linear {
    /// 权重参数 [in_features, out_features]
    weights: Var,
    /// 偏置参数 [1, out_features]
    bias: Var,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// 创建新的 Linear 层，权重与偏置均按 U(-1/√in, 1/√in) 初始化
    ///
    /// 参数名为`{name}_W`与`{name}_b`
    pub fn new(
        graph: &Graph,
        in_features: usize,
        out_features: usize,
        name: &str,
    ) -> Result<Self, GraphError> {
        let init = Init::uniform_from_fan_in(in_features);
        let weights = graph.parameter(
            &[in_features, out_features],
            init.clone(),
            &format!("{name}_W"),
        )?;
        let bias = graph.parameter(&[1, out_features], init, &format!("{name}_b"))?;

        Ok(Self {
            weights,
            bias,
            in_features,
            out_features,
        })
    }

    /// 前向传播：x @ W + b
    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.matmul(&self.weights)?.try_add(&self.bias)
    }

    pub const fn in_features(&self) -> usize {
        self.in_features
    }

    pub const fn out_features(&self) -> usize {
        self.out_features
    }

    pub const fn weights(&self) -> &Var {
        &self.weights
    }

    pub const fn bias(&self) -> &Var {
        &self.bias
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<Var> {
        vec![self.weights.clone(), self.bias.clone()]
    }
}
