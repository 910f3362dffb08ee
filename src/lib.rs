//! Klein 写实人像提示词节点
//!
//! 组合逻辑与模型调用不依赖 Python, 节点层在 `python` 特性下编译。

pub mod config;
pub mod error;
pub mod image;
pub mod list;
pub mod prompt;
pub mod refiner;
pub mod vocab;

#[cfg(feature = "python")]
mod core;
#[cfg(feature = "python")]
mod register;
#[cfg(feature = "python")]
mod wrapper;

#[cfg(feature = "python")]
use std::path::PathBuf;

#[cfg(feature = "python")]
use pyo3::{
    pymodule,
    types::{PyAnyMethods, PyDict, PyDictMethods, PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

/// ComfyUI 扩展模块
#[cfg(feature = "python")]
#[pymodule]
#[pyo3(name = "comfyui_kppb")] // 需要与包名保持一致
fn py_init(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();

    if let Some(dir) = module_dir(py, m) {
        config::set_module_dir(dir);
    }
    let config = config::PackConfig::discover();

    // 注册 ComfyUI NODE_CLASS_MAPPINGS/NODE_DISPLAY_NAME_MAPPINGS
    let node_mapping = PyDict::new(py);
    let name_mapping = PyDict::new(py);
    for node in register::node_register(py, &config)? {
        node_mapping.set_item(node.0, node.1)?;
        name_mapping.set_item(node.0, node.2)?;
    }
    log::info!("kppb registered {} nodes", node_mapping.len());

    m.add("NODE_CLASS_MAPPINGS", node_mapping)?;
    m.add("NODE_DISPLAY_NAME_MAPPINGS", name_mapping)?;
    Ok(())
}

/// 扩展模块所在目录
///
/// 初始化期间 `__file__` 可能尚未设置, 此时取父包的 `__file__` 所在目录。
#[cfg(feature = "python")]
fn module_dir(py: Python<'_>, m: &Bound<'_, PyModule>) -> Option<PathBuf> {
    let parent_dir = |file: PathBuf| file.parent().map(PathBuf::from);

    if let Ok(file) = m.getattr("__file__").and_then(|v| v.extract::<PathBuf>()) {
        return parent_dir(file);
    }

    let name = m.name().ok()?.extract::<String>().ok()?;
    let (package, _) = name.rsplit_once('.')?;
    let file = py
        .import("sys")
        .and_then(|sys| sys.getattr("modules"))
        .and_then(|modules| modules.get_item(package))
        .and_then(|package| package.getattr("__file__"))
        .and_then(|file| file.extract::<PathBuf>());
    match file {
        Ok(file) => parent_dir(file),
        Err(e) => {
            log::debug!("kppb module dir unknown, {e}");
            None
        }
    }
}
