/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 基础操作、节点访问与释放
 * - backward.rs: VJP 反向传播
 * - mode.rs: train/eval/detach
 * - node_builders.rs: new_*_node
 */

mod backward;
mod core;
mod mode;
mod node_builders;

use crate::nn::nodes::NodeHandle;
use crate::nn::{Device, NodeId};
use rand::rngs::StdRng;
use std::collections::HashMap;

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄使用此结构。
/// 节点在创建时即根据父节点的值立即求值（define-by-run），
/// 因此不存在单独的前向传播步骤。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    /// 反向边：child_id -> parent_ids（子节点指向父节点，顺序即父节点的参数顺序）
    pub(in crate::nn::graph) backward_edges: HashMap<NodeId, Vec<NodeId>>,
    pub(in crate::nn::graph) next_id: u64,
    pub(in crate::nn::graph) is_eval_mode: bool,
    /// 图级别的随机数生成器（用于参数初始化）
    pub(in crate::nn::graph) rng: StdRng,
    pub(in crate::nn::graph) device: Device,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
