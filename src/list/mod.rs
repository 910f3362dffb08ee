//! 列表节点
//!
//! 每个目录一个节点, 输出 (LIST, INT) 供 XY Plot 队列使用。

mod list_builder;
pub use list_builder::build_list;

#[cfg(feature = "python")]
mod catalog_list;
#[cfg(feature = "python")]
pub use catalog_list::*;
