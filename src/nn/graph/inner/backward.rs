/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner VJP 反向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use std::collections::HashSet;

impl GraphInner {
    // ========== VJP 反向传播核心 ==========

    /// 以`loss`为起点反向传播，梯度累加到参数节点上，返回loss的标量值
    ///
    /// 非参数节点的梯度在每次反向传播前被清空；参数节点的梯度只会累加，
    /// 需要由优化器的`zero_grad`显式清零。
    pub fn backward(&mut self, loss_id: NodeId) -> Result<f32, GraphError> {
        if !self.is_train_mode() {
            tracing::warn!("在 no_grad/eval 模式下调用 backward，这通常是误用");
        }

        let (loss_scalar, loss_shape) = {
            let loss_node = self.get_node(loss_id)?;
            let loss_value = loss_node.value().ok_or_else(|| {
                GraphError::ComputationError(format!("损失{loss_node}没有值"))
            })?;
            if loss_value.size() != 1 {
                return Err(GraphError::InvalidOperation(format!(
                    "反向传播要求损失为标量 [1, 1]，但得到 {:?}",
                    loss_value.shape()
                )));
            }
            let loss_scalar = loss_value.number().ok_or_else(|| {
                GraphError::ComputationError(format!(
                    "无法从损失节点获取标量值，形状: {:?}",
                    loss_value.shape()
                ))
            })?;
            (loss_scalar, loss_value.shape().to_vec())
        };

        self.reset_intermediate_grad();
        self.get_node_mut(loss_id)?
            .set_grad(Some(Tensor::ones(&loss_shape)));

        let topo_order = self.topological_sort_backward(loss_id)?;
        for node_id in topo_order {
            self.propagate_grad_to_parents(node_id)?;
        }

        Ok(loss_scalar)
    }

    /// 将梯度从当前节点传播到其父节点
    fn propagate_grad_to_parents(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let parent_ids = self.get_node_parents(node_id)?;
        if parent_ids.is_empty() {
            return Ok(());
        }

        let parent_grads: Vec<(NodeId, Tensor)> = {
            let node = self.get_node(node_id)?;
            if node.is_detached() {
                return Ok(());
            }
            let Some(upstream_grad) = node.grad() else {
                return Ok(());
            };
            let value = node.value().ok_or_else(|| {
                GraphError::ComputationError(format!("{node}没有值，无法反向传播"))
            })?;

            let parents = self.get_nodes(&parent_ids)?;
            let parent_values = parents
                .iter()
                .map(|parent| {
                    parent.value().ok_or_else(|| {
                        GraphError::ComputationError(format!("{node}的父节点{parent}没有值"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut grads = Vec::with_capacity(parents.len());
            for (index, parent) in parents.iter().enumerate() {
                // 输入节点与被截断的节点不接收梯度
                if parent.is_input() || parent.is_detached() {
                    continue;
                }
                let parent_grad =
                    node.calc_grad_to_parent(index, &parent_values, value, upstream_grad)?;
                grads.push((parent.id(), parent_grad));
            }
            grads
        };

        for (parent_id, parent_grad) in parent_grads {
            self.get_node_mut(parent_id)?.accumulate_grad(parent_grad)?;
        }

        Ok(())
    }

    /// 反向拓扑序：保证处理某节点时，其所有子节点的梯度都已传入
    fn topological_sort_backward(&self, loss_id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let mut post_order = Vec::new();
        let mut visited = HashSet::new();
        // (节点, 是否已展开其父节点)
        let mut stack = vec![(loss_id, false)];

        while let Some((node_id, expanded)) = stack.pop() {
            if expanded {
                post_order.push(node_id);
                continue;
            }
            if !visited.insert(node_id) {
                continue;
            }
            stack.push((node_id, true));
            for parent_id in self.get_node_parents(node_id)? {
                if !visited.contains(&parent_id) {
                    stack.push((parent_id, false));
                }
            }
        }

        post_order.reverse();
        Ok(post_order)
    }

    /// 清除所有非参数节点的梯度
    fn reset_intermediate_grad(&mut self) {
        for node in self.nodes.values_mut() {
            if !node.is_parameter() {
                node.set_grad(None);
            }
        }
    }

    /// 清除单个节点的梯度
    pub fn clear_node_grad(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.set_grad(None);
        Ok(())
    }

    /// 清零所有节点的梯度
    pub fn zero_grad(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_grad(None);
        }
    }
}
