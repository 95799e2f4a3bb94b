/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 节点创建（new_*_node）
 *
 * 节点创建时立即根据父节点的值求值；评估模式下创建的节点自动被 detach。
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::raw_node::{
    Add, BatchNorm2d, BceLoss, ChannelBiasAdd, Conv2d, ConvTranspose2d, Input, LeakyReLU, MatMul,
    MseLoss, Parameter, Reshape, Sigmoid, Tanh,
};
use crate::nn::nodes::{NodeHandle, NodeType, TraitNode};
use crate::tensor::Tensor;

impl GraphInner {
    /// 通用的运算节点创建流程：求值、分配id与名称、登记反向边
    fn add_op_node(
        &mut self,
        raw_node: impl Into<NodeType>,
        parent_ids: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let mut raw_node = raw_node.into();
        let value = {
            let parents = self.get_nodes(parent_ids)?;
            let parent_values = parents
                .iter()
                .map(|parent| {
                    parent.value().ok_or_else(|| {
                        GraphError::ComputationError(format!("父节点{parent}没有值"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            raw_node.calc_value_by_parents(&parent_values)?
        };

        let id = self.generate_node_id();
        let name = self.generate_node_name(id, name, raw_node.type_name())?;
        let mut handle = NodeHandle::new(id, &name, raw_node);
        handle.set_value(Some(value));
        handle.set_detached(self.is_eval_mode);

        self.nodes.insert(id, handle);
        self.backward_edges.insert(id, parent_ids.to_vec());
        Ok(id)
    }

    /// 叶子节点（输入或参数）的创建流程
    fn add_leaf_node(
        &mut self,
        raw_node: impl Into<NodeType>,
        value: &Tensor,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let raw_node = raw_node.into();
        let id = self.generate_node_id();
        let name = self.generate_node_name(id, name, raw_node.type_name())?;
        let mut handle = NodeHandle::new(id, &name, raw_node);
        handle.set_value(Some(value.clone()));
        self.nodes.insert(id, handle);
        Ok(id)
    }

    // ========== 叶子节点 ==========

    pub fn new_input_node(
        &mut self,
        value: &Tensor,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_leaf_node(Input::new(), value, name)
    }

    pub fn new_parameter_node(&mut self, value: &Tensor, name: &str) -> Result<NodeId, GraphError> {
        self.add_leaf_node(Parameter::new(), value, Some(name))
    }

    // ========== 基础运算 ==========

    /// 支持 NumPy 风格广播的加法
    pub fn new_add_node(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_op_node(Add::new(), &[a, b], name)
    }

    pub fn new_mat_mul_node(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_op_node(MatMul::new(), &[a, b], name)
    }

    pub fn new_reshape_node(
        &mut self,
        x: NodeId,
        target_shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_op_node(Reshape::new(target_shape), &[x], name)
    }

    // ========== 卷积与归一化 ==========

    /// 2D 卷积：输入 [N, C_in, H, W]，卷积核 [C_out, C_in, kH, kW]
    pub fn new_conv2d_node(
        &mut self,
        x: NodeId,
        kernel: NodeId,
        stride: (usize, usize),
        padding: (usize, usize),
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parallel = self.device.is_accelerated();
        self.add_op_node(Conv2d::new(stride, padding, parallel), &[x, kernel], name)
    }

    /// 2D 转置卷积：输入 [N, C_in, H, W]，卷积核 [C_in, C_out, kH, kW]
    pub fn new_conv_transpose2d_node(
        &mut self,
        x: NodeId,
        kernel: NodeId,
        stride: (usize, usize),
        padding: (usize, usize),
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parallel = self.device.is_accelerated();
        self.add_op_node(
            ConvTranspose2d::new(stride, padding, parallel),
            &[x, kernel],
            name,
        )
    }

    /// 逐通道加偏置：输入 [N, C, H, W]，偏置 [1, C]
    pub fn new_channel_bias_add_node(
        &mut self,
        x: NodeId,
        bias: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_op_node(ChannelBiasAdd::new(), &[x, bias], name)
    }

    /// 2D 批归一化：父节点为[输入, gamma, beta]。
    /// `running`为`Some((均值, 方差))`时使用给定统计量（评估），否则使用当前 batch 的统计量（训练）
    pub fn new_batch_norm2d_node(
        &mut self,
        x: NodeId,
        gamma: NodeId,
        beta: NodeId,
        eps: f32,
        running: Option<(Vec<f32>, Vec<f32>)>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parallel = self.device.is_accelerated();
        self.add_op_node(
            BatchNorm2d::new(eps, running, parallel),
            &[x, gamma, beta],
            name,
        )
    }

    /// 批归一化节点在训练模式下计算出的 batch 统计量：(均值, 有偏方差, 每通道元素数)
    pub fn batch_norm_stats(
        &self,
        node_id: NodeId,
    ) -> Result<Option<(Vec<f32>, Vec<f32>, usize)>, GraphError> {
        let node = self.get_node(node_id)?;
        match node.node_type() {
            NodeType::BatchNorm2d(bn) => Ok(bn.batch_stats()),
            _ => Err(GraphError::InvalidOperation(format!(
                "{node}不是批归一化节点"
            ))),
        }
    }

    // ========== 激活函数 ==========

    pub fn new_leaky_relu_node(
        &mut self,
        x: NodeId,
        negative_slope: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if negative_slope < 0.0 {
            return Err(GraphError::InvalidOperation(format!(
                "LeakyReLU的negative_slope应为非负数，但得到: {negative_slope}"
            )));
        }
        self.add_op_node(LeakyReLU::new(negative_slope), &[x], name)
    }

    /// ReLU 即 negative_slope 为 0 的 LeakyReLU
    pub fn new_relu_node(&mut self, x: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        self.add_op_node(LeakyReLU::new(0.0), &[x], name)
    }

    pub fn new_tanh_node(&mut self, x: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        self.add_op_node(Tanh::new(), &[x], name)
    }

    pub fn new_sigmoid_node(
        &mut self,
        x: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_op_node(Sigmoid::new(), &[x], name)
    }

    // ========== 损失函数 ==========

    /// 均方误差（对所有元素取平均）
    pub fn new_mse_loss_node(
        &mut self,
        prediction: NodeId,
        target: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_op_node(MseLoss::new(), &[prediction, target], name)
    }

    /// 二元交叉熵（对所有元素取平均），prediction 须为概率
    pub fn new_bce_loss_node(
        &mut self,
        prediction: NodeId,
        target: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_op_node(BceLoss::new(), &[prediction, target], name)
    }
}
