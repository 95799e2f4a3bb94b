mod batch_norm2d;
mod conv2d;
mod conv_transpose2d;
mod linear;

pub use batch_norm2d::BatchNorm2d;
pub use conv_transpose2d::ConvTranspose2d;
pub use conv2d::Conv2d;
pub use linear::Linear;
