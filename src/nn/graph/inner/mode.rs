/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner train/eval 模式、detach 机制
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;

impl GraphInner {
    pub const fn set_train_mode(&mut self) {
        self.is_eval_mode = false;
    }

    pub const fn set_eval_mode(&mut self) {
        self.is_eval_mode = true;
    }

    pub const fn is_train_mode(&self) -> bool {
        !self.is_eval_mode
    }

    // ========== detach 机制 ==========

    /// 将节点标记为 detached：反向传播不会经过该节点流向其祖先
    pub fn detach_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.set_detached(true);
        Ok(())
    }

    /// 检查节点是否被 detach
    pub fn is_node_detached(&self, node_id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(node_id)?.is_detached())
    }
}
