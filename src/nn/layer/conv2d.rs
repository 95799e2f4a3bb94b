/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Conv2d (2D 卷积) 层
 */

use crate::nn::{Graph, GraphError, Init, Module, Var};

/// Conv2d (2D 卷积) 层
///
/// PyTorch 风格：`output = conv2d(x, K) + b`
///
/// # 输入/输出形状
/// - 输入：[batch, in_channels, H, W]
/// - 输出：[batch, out_channels, H', W']，H' = (H + 2p - k) / s + 1
pub struct Conv2d {
    /// 卷积核参数 [out_channels, in_channels, kH, kW]
    kernel: Var,
    /// 偏置参数 [1, out_channels]
    bias: Var,
    in_channels: usize,
    out_channels: usize,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
}

impl Conv2d {
    /// 创建新的 Conv2d 层，参数名为`{name}_K`与`{name}_b`
    ///
    /// 卷积核与偏置均按 U(-1/√fan_in, 1/√fan_in) 初始化，fan_in = in_channels·kH·kW
    pub fn new(
        graph: &Graph,
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        name: &str,
    ) -> Result<Self, GraphError> {
        let (k_h, k_w) = kernel_size;
        let init = Init::uniform_from_fan_in(in_channels * k_h * k_w);
        let kernel = graph.parameter(
            &[out_channels, in_channels, k_h, k_w],
            init.clone(),
            &format!("{name}_K"),
        )?;
        let bias = graph.parameter(&[1, out_channels], init, &format!("{name}_b"))?;

        Ok(Self {
            kernel,
            bias,
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
        })
    }

    /// 前向传播：conv2d(x, K) + b
    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.check_same_graph(&self.kernel)?;
        let conv_out = x.derive(|g| {
            g.new_conv2d_node(
                x.node_id(),
                self.kernel.node_id(),
                self.stride,
                self.padding,
                None,
            )
        })?;
        conv_out.derive(|g| {
            g.new_channel_bias_add_node(conv_out.node_id(), self.bias.node_id(), None)
        })
    }

    pub const fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub const fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub const fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub const fn stride(&self) -> (usize, usize) {
        self.stride
    }

    pub const fn padding(&self) -> (usize, usize) {
        self.padding
    }
}

impl Module for Conv2d {
    fn parameters(&self) -> Vec<Var> {
        vec![self.kernel.clone(), self.bias.clone()]
    }
}
