//! 节点注册项

use pyo3::{types::PyType, Bound};

/// (类名, 节点类型, 显示名称)
pub struct NodeRegister<'py>(pub &'static str, pub Bound<'py, PyType>, pub &'static str);
