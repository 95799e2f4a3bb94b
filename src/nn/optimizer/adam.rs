/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : Adam 优化器，只更新绑定的参数
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::Optimizer;
use crate::nn::graph::GraphInner;
use crate::nn::{Graph, GraphError, NodeId, Var};
use crate::tensor::Tensor;

/// Adam 优化器
///
/// Adam: Adaptive Moment Estimation
/// - m = β1 * m + (1 - β1) * g
/// - v = β2 * v + (1 - β2) * g²
/// - θ = θ - α * m_hat / (√v_hat + ε)
///
/// 没有梯度的参数在本次`step`中保持不变
pub struct Adam {
    graph: Rc<RefCell<GraphInner>>,
    params: Vec<NodeId>,
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    /// 一阶矩估计
    m: HashMap<NodeId, Tensor>,
    /// 二阶矩估计
    v: HashMap<NodeId, Tensor>,
    /// 时间步
    t: i32,
}

impl Adam {
    /// 创建 Adam 优化器（β1 = 0.9，β2 = 0.999，ε = 1e-8）
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self::with_config(graph, params, lr, 0.9, 0.999, 1e-8)
    }

    /// 创建带完整配置的 Adam 优化器
    pub fn with_config(
        graph: &Graph,
        params: &[Var],
        lr: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    ) -> Self {
        Self {
            graph: graph.inner_rc(),
            params: params.iter().map(Var::node_id).collect(),
            lr,
            beta1,
            beta2,
            epsilon,
            m: HashMap::new(),
            v: HashMap::new(),
            t: 0,
        }
    }

    pub fn params(&self) -> &[NodeId] {
        &self.params
    }

    pub const fn betas(&self) -> (f32, f32) {
        (self.beta1, self.beta2)
    }
}

impl Optimizer for Adam {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            g.clear_node_grad(node_id)?;
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), GraphError> {
        self.t += 1;
        let bias_correction1 = 1.0 - self.beta1.powi(self.t);
        let bias_correction2 = 1.0 - self.beta2.powi(self.t);

        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            let Some(grad) = g.get_node_grad(node_id)?.cloned() else {
                continue;
            };
            let current = g.get_node_value(node_id)?.cloned().ok_or_else(|| {
                GraphError::ComputationError(format!("参数节点 {node_id} 没有值"))
            })?;

            let m = match self.m.get(&node_id) {
                Some(m) => self.beta1 * m + (1.0 - self.beta1) * &grad,
                None => (1.0 - self.beta1) * &grad,
            };
            let grad_sq = &grad * &grad;
            let v = match self.v.get(&node_id) {
                Some(v) => self.beta2 * v + (1.0 - self.beta2) * &grad_sq,
                None => (1.0 - self.beta2) * &grad_sq,
            };

            let m_hat = &m / bias_correction1;
            let v_hat = &v / bias_correction2;
            let update = self.lr * &m_hat / (v_hat.sqrt() + self.epsilon);
            g.set_node_value(node_id, &(current - update))?;

            self.m.insert(node_id, m);
            self.v.insert(node_id, v);
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }
}
