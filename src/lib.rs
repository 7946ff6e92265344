pub mod error;
pub mod math;
pub mod loss;
pub mod gradient_check;
pub mod config;

// Convenience re-exports
pub use error::{LossError, Result};
pub use math::matrix::Matrix;
pub use loss::softmax::{softmax_loss, softmax_loss_naive, softmax_loss_vectorized, SoftmaxOutput};
pub use loss::strategy::LossStrategy;
pub use gradient_check::{eval_numerical_gradient, grad_check_sparse, rel_error, GradCheckSample};
pub use config::LossConfig;
