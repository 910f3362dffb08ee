//! torch 张量包装
//! 依赖:
//! - python: torch

mod tensor;
pub use tensor::ImageTensor;
