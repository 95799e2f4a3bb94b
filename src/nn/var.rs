/*
 * @Author       : 老董
 * @Date         : 2026-01-08
 * @Description  : Var - 变量句柄，持有图引用，支持链式调用
 */

use super::graph::{Graph, GraphInner};
use super::{GraphError, NodeId};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;

// ==================== Init 枚举 ====================

/// 参数初始化策略
#[derive(Debug, Clone)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// [-bound, bound) 上的均匀分布（PyTorch 线性层/卷积层的默认初始化）
    Uniform { bound: f32 },
}

impl Init {
    /// 由`fan_in`得到 PyTorch 默认的均匀分布初始化：bound = 1/√fan_in
    pub fn uniform_from_fan_in(fan_in: usize) -> Self {
        Self::Uniform {
            bound: 1.0 / (fan_in.max(1) as f32).sqrt(),
        }
    }

    /// 生成初始化后的 Tensor（使用图的 RNG）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::full(*v, shape),
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
            Self::Uniform { bound } => Tensor::uniform_with_rng(-bound, *bound, shape, rng),
        }
    }
}

// ==================== Var 结构 ====================

/// 变量句柄 - 携带图引用，支持链式调用
///
/// Clone 语义（非 Copy），但开销极低（Rc clone）。
/// 图中的中间节点被释放后，其 Var 随之失效，访问时返回`NodeNotFound`。
#[derive(Clone)]
pub struct Var {
    id: NodeId,
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个 Var 是否来自同一个 Graph
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取 Var 所属的 Graph handle
    pub fn get_graph(&self) -> Graph {
        Graph::from_rc(Rc::clone(&self.graph))
    }

    /// 两个 Var 须来自同一个 Graph
    pub(crate) fn check_same_graph(&self, other: &Self) -> Result<(), GraphError> {
        if self.same_graph(other) {
            Ok(())
        } else {
            Err(GraphError::InvalidOperation(
                "不能对来自不同 Graph 的 Var 进行操作".to_string(),
            ))
        }
    }

    /// 在同一张图上创建新节点并包装为 Var
    pub(crate) fn derive(
        &self,
        build: impl FnOnce(&mut GraphInner) -> Result<NodeId, GraphError>,
    ) -> Result<Self, GraphError> {
        let id = {
            let mut g = self.graph.borrow_mut();
            build(&mut *g)?
        };
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }

    // ==================== 梯度流控制 ====================

    /// 截断梯度流：反向传播不再经过本节点流向其祖先
    pub fn detach(&self) -> Result<Self, GraphError> {
        self.graph.borrow_mut().detach_node(self.id)?;
        Ok(self.clone())
    }

    pub fn is_detached(&self) -> Result<bool, GraphError> {
        self.graph.borrow().is_node_detached(self.id)
    }

    // ==================== 执行 ====================

    /// 以本节点为损失执行反向传播，返回损失的标量值
    pub fn backward(&self) -> Result<f32, GraphError> {
        self.graph.borrow_mut().backward(self.id)
    }

    // ==================== 值访问 ====================

    /// 获取节点的值（克隆的 Tensor）
    pub fn value(&self) -> Result<Tensor, GraphError> {
        let g = self.graph.borrow();
        let node = g.get_node(self.id)?;
        node.value()
            .cloned()
            .ok_or_else(|| GraphError::ComputationError(format!("{node}没有值")))
    }

    /// 获取标量节点的值
    pub fn item(&self) -> Result<f32, GraphError> {
        let value = self.value()?;
        value.number().ok_or_else(|| {
            GraphError::InvalidOperation(format!(
                "item()要求节点为标量，实际形状为{:?}",
                value.shape()
            ))
        })
    }

    /// 获取节点的梯度（克隆的 Tensor），尚未反向传播时为 None
    pub fn grad(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_grad(self.id)?.cloned())
    }

    pub fn shape(&self) -> Result<Vec<usize>, GraphError> {
        Ok(self.value()?.shape().to_vec())
    }

    pub fn name(&self) -> Result<String, GraphError> {
        Ok(self.graph.borrow().get_node_name(self.id)?.to_string())
    }

    /// 支持广播的加法（如 [N, out] + [1, out]）
    pub fn try_add(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other)?;
        self.derive(|g| g.new_add_node(self.id, other.id, None))
    }
}
