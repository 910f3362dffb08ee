//! 节点分类

/// Klein 条件提示词, 所有节点共用
pub const CATEGORY_KLEIN: &str = "conditioning/klein";
