pub mod softmax;
pub mod strategy;
pub mod validate;

pub use softmax::{softmax_loss, softmax_loss_naive, softmax_loss_vectorized, SoftmaxOutput};
pub use strategy::LossStrategy;
