// python 包装
pub mod torch;
