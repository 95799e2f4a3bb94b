/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Module trait 定义
 */

use super::Var;

/// 模块 trait
///
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回 `Vec<Var>`（签名一致，放入 trait）
/// - 由于 Var 携带图引用，`forward()` 不需要 `&Graph` 参数
pub trait Module {
    /// 获取所有可训练参数，优化器据此决定要更新哪些参数
    fn parameters(&self) -> Vec<Var>;

    /// 获取参数（Var）的个数
    fn num_params(&self) -> usize {
        self.parameters().len()
    }
}
