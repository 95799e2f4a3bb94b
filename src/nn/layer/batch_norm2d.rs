/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : BatchNorm2d (2D 批归一化) 层
 */

use crate::nn::{Graph, GraphError, Init, Module, Var};
use std::cell::RefCell;

const DEFAULT_EPS: f32 = 1e-5;
const DEFAULT_MOMENTUM: f32 = 0.1;

/// BatchNorm2d (2D 批归一化) 层
///
/// - 训练模式：用当前 batch 的统计量归一化，并以 momentum 更新滑动均值/方差
///   （滑动方差使用无偏估计）
/// - 评估模式：用滑动均值/方差归一化
///
/// gamma 初始化为 1，beta 初始化为 0，形状均为 [1, C]
pub struct BatchNorm2d {
    gamma: Var,
    beta: Var,
    num_features: usize,
    eps: f32,
    momentum: f32,
    running_mean: RefCell<Vec<f32>>,
    running_var: RefCell<Vec<f32>>,
}

impl BatchNorm2d {
    /// 创建新的 BatchNorm2d 层，参数名为`{name}_gamma`与`{name}_beta`
    pub fn new(graph: &Graph, num_features: usize, name: &str) -> Result<Self, GraphError> {
        let gamma = graph.parameter(&[1, num_features], Init::Ones, &format!("{name}_gamma"))?;
        let beta = graph.parameter(&[1, num_features], Init::Zeros, &format!("{name}_beta"))?;
        Ok(Self {
            gamma,
            beta,
            num_features,
            eps: DEFAULT_EPS,
            momentum: DEFAULT_MOMENTUM,
            running_mean: RefCell::new(vec![0.0; num_features]),
            running_var: RefCell::new(vec![1.0; num_features]),
        })
    }

    /// 前向传播，是否使用 batch 统计量由图当前的训练/评估模式决定
    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.check_same_graph(&self.gamma)?;
        let training = x.get_graph().is_train_mode();
        let running = if training {
            None
        } else {
            Some((
                self.running_mean.borrow().clone(),
                self.running_var.borrow().clone(),
            ))
        };

        let output = x.derive(|g| {
            g.new_batch_norm2d_node(
                x.node_id(),
                self.gamma.node_id(),
                self.beta.node_id(),
                self.eps,
                running,
                None,
            )
        })?;

        if training {
            let stats = output
                .get_graph()
                .inner()
                .batch_norm_stats(output.node_id())?;
            if let Some((mean, var, count)) = stats {
                self.update_running_stats(&mean, &var, count);
            }
        }
        Ok(output)
    }

    fn update_running_stats(&self, batch_mean: &[f32], batch_var: &[f32], count: usize) {
        let unbias = if count > 1 {
            count as f32 / (count - 1) as f32
        } else {
            1.0
        };
        let m = self.momentum;
        for (running, &mean) in self.running_mean.borrow_mut().iter_mut().zip(batch_mean) {
            *running = (1.0 - m) * *running + m * mean;
        }
        for (running, &var) in self.running_var.borrow_mut().iter_mut().zip(batch_var) {
            *running = (1.0 - m) * *running + m * var * unbias;
        }
    }

    pub const fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn running_mean(&self) -> Vec<f32> {
        self.running_mean.borrow().clone()
    }

    pub fn running_var(&self) -> Vec<f32> {
        self.running_var.borrow().clone()
    }
}

impl Module for BatchNorm2d {
    fn parameters(&self) -> Vec<Var> {
        vec![self.gamma.clone(), self.beta.clone()]
    }
}
