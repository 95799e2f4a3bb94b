/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 句柄（用户级 API）
 */

use super::error::GraphError;
use super::inner::GraphInner;
use crate::nn::var::{Init, Var};
use crate::nn::{Device, NodeId};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

/// Graph - 计算图句柄（PyTorch 风格用户 API）
///
/// - 是 `Rc<RefCell<GraphInner>>` 的薄封装
/// - Clone 语义：多个 Graph 引用同一个 GraphInner
/// - 创建的 Var 自动持有图引用
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    // ==================== 创建 ====================

    /// 创建新图（参数初始化使用系统熵作为随机源）
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(GraphInner::new())),
        }
    }

    /// 创建带种子的图（用于确定性训练）
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(GraphInner::new_with_seed(seed))),
        }
    }

    /// 从现有 Rc 创建句柄
    pub(crate) const fn from_rc(inner: Rc<RefCell<GraphInner>>) -> Self {
        Self { inner }
    }

    /// 获取内部 GraphInner 的不可变引用
    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    /// 获取内部 GraphInner 的可变引用
    pub fn inner_mut(&self) -> std::cell::RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    /// 获取内部 Rc
    pub(crate) fn inner_rc(&self) -> Rc<RefCell<GraphInner>> {
        Rc::clone(&self.inner)
    }

    /// 将 NodeId 包装成 Var
    pub fn wrap_node_id(&self, node_id: NodeId) -> Var {
        Var::new(node_id, Rc::clone(&self.inner))
    }

    // ==================== 设备 ====================

    pub fn device(&self) -> Device {
        self.inner.borrow().device()
    }

    pub fn set_device(&self, device: Device) {
        self.inner.borrow_mut().set_device(device);
    }

    // ==================== 创建变量 ====================

    /// 创建输入节点并设置数据（输入节点不接收梯度）
    pub fn input(&self, data: &Tensor) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().new_input_node(data, None)?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    /// 创建命名输入节点
    pub fn input_named(&self, data: &Tensor, name: &str) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().new_input_node(data, Some(name))?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    /// 创建参数节点，初始值由图的随机数生成器按`init`生成
    pub fn parameter(&self, shape: &[usize], init: Init, name: &str) -> Result<Var, GraphError> {
        let mut g = self.inner.borrow_mut();
        let init_data = init.generate_with_rng(shape, g.rng_mut());
        let node_id = g.new_parameter_node(&init_data, name)?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    /// 以给定的值创建参数节点
    pub fn parameter_with_value(&self, value: &Tensor, name: &str) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().new_parameter_node(value, name)?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    // ==================== 训练控制 ====================

    /// 清零所有参数的梯度
    pub fn zero_grad(&self) {
        self.inner.borrow_mut().zero_grad();
    }

    /// 设置训练模式
    pub fn train(&self) {
        self.inner.borrow_mut().set_train_mode();
    }

    /// 设置评估模式
    pub fn eval(&self) {
        self.inner.borrow_mut().set_eval_mode();
    }

    pub fn is_train_mode(&self) -> bool {
        self.inner.borrow().is_train_mode()
    }

    /// no_grad 上下文：闭包内创建的节点均为评估模式且不参与反向传播，
    /// 闭包结束后恢复进入前的模式
    pub fn no_grad_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        let was_train = self.is_train_mode();
        self.eval();
        let result = f(self);
        if was_train {
            self.train();
        }
        result
    }

    /// 删除所有非参数节点（一次训练步骤结束后调用，避免图无限增长）
    pub fn release_intermediate_nodes(&self) {
        self.inner.borrow_mut().release_intermediate_nodes();
    }

    pub fn nodes_count(&self) -> usize {
        self.inner.borrow().nodes_count()
    }
}
