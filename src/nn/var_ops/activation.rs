use crate::nn::{GraphError, Var};

/// 激活函数扩展 trait
///
/// ```ignore
/// use colorize_gan::nn::VarActivationOps;
///
/// let h = x.leaky_relu(0.2)?.sigmoid()?;
/// ```
pub trait VarActivationOps {
    /// `ReLU` 激活：max(0, x)
    fn relu(&self) -> Result<Var, GraphError>;

    /// `LeakyReLU` 激活：x if x > 0 else slope * x
    fn leaky_relu(&self, negative_slope: f32) -> Result<Var, GraphError>;

    /// Tanh 激活，输出在 (-1, 1)
    fn tanh(&self) -> Result<Var, GraphError>;

    /// Sigmoid 激活：1 / (1 + exp(-x))
    fn sigmoid(&self) -> Result<Var, GraphError>;
}

impl VarActivationOps for Var {
    fn relu(&self) -> Result<Var, GraphError> {
        self.derive(|g| g.new_relu_node(self.node_id(), None))
    }

    fn leaky_relu(&self, negative_slope: f32) -> Result<Var, GraphError> {
        self.derive(|g| g.new_leaky_relu_node(self.node_id(), negative_slope, None))
    }

    fn tanh(&self) -> Result<Var, GraphError> {
        self.derive(|g| g.new_tanh_node(self.node_id(), None))
    }

    fn sigmoid(&self) -> Result<Var, GraphError> {
        self.derive(|g| g.new_sigmoid_node(self.node_id(), None))
    }
}
