/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : ConvTranspose2d (2D 转置卷积) 层，用于上采样
 */

use crate::nn::{Graph, GraphError, Init, Module, Var};

/// ConvTranspose2d (2D 转置卷积) 层
///
/// # 输入/输出形状
/// - 输入：[batch, in_channels, H, W]
/// - 输出：[batch, out_channels, H', W']，H' = (H - 1)·s - 2p + k
pub struct ConvTranspose2d {
    /// 卷积核参数 [in_channels, out_channels, kH, kW]
    kernel: Var,
    /// 偏置参数 [1, out_channels]
    bias: Var,
    in_channels: usize,
    out_channels: usize,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
}

impl ConvTranspose2d {
    /// 创建新的 ConvTranspose2d 层，参数名为`{name}_K`与`{name}_b`
    ///
    /// 与 PyTorch 相同，fan_in 取 out_channels·kH·kW
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
        let init = Init::uniform_from_fan_in(out_channels * k_h * k_w);
        let kernel = graph.parameter(
            &[in_channels, out_channels, k_h, k_w],
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

    /// 前向传播：conv_transpose2d(x, K) + b
    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        x.check_same_graph(&self.kernel)?;
        let conv_out = x.derive(|g| {
            g.new_conv_transpose2d_node(
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

impl Module for ConvTranspose2d {
    fn parameters(&self) -> Vec<Var> {
        vec![self.kernel.clone(), self.bias.clone()]
    }
}
