/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 的扩展 trait，需 import 后才能链式调用
 */

mod activation;
mod loss;
mod matrix;
mod shape;

pub use activation::VarActivationOps;
pub use loss::VarLossOps;
pub use matrix::VarMatrixOps;
pub use shape::VarShapeOps;
