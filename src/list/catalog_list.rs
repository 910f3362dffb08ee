//! 目录列表节点
//!
//! 每个目录条目对应一个布尔开关, 另有多行自定义条目, 输出 (LIST, INT),
//! 可直接接入 XY Plot 队列的维度输入。

use std::collections::HashMap;

use log::error;
use pyo3::{
    pyclass, pymethods,
    types::{PyAnyMethods, PyDict, PyDictMethods, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use super::build_list;
use crate::{
    config::PackConfig,
    core::{
        category::CATEGORY_KLEIN,
        types::{NODE_BOOLEAN, NODE_INT, NODE_LIST, NODE_STRING},
        PromptServer,
    },
    vocab::{catalogs, ExtendedVocabulary},
};

/// 自定义条目的输入名称
const CUSTOM_ENTRIES: &str = "custom_entries";

/// 每个条目一个 BOOLEAN 开关, 最后是多行自定义条目
fn toggle_input_types<S: AsRef<str>>(py: Python<'_>, items: &[S]) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("required", {
        let required = PyDict::new(py);
        for item in items {
            required.set_item(
                item.as_ref(),
                (NODE_BOOLEAN, {
                    let toggle = PyDict::new(py);
                    toggle.set_item("default", false)?;
                    toggle
                }),
            )?;
        }
        required.set_item(
            CUSTOM_ENTRIES,
            (NODE_STRING, {
                let custom = PyDict::new(py);
                custom.set_item("multiline", true)?;
                custom.set_item("default", "")?;
                custom.set_item("tooltip", "One entry per line, appended after the selected items")?;
                custom
            }),
        )?;
        required
    })?;

    Ok(dict.into())
}

/// 关键字参数中的开关, 非布尔值按关闭处理
fn collect_toggles(kwargs: Option<&Bound<'_, PyDict>>) -> PyResult<HashMap<String, bool>> {
    let mut toggles = HashMap::new();
    if let Some(kwargs) = kwargs {
        for (key, value) in kwargs.iter() {
            let key: String = key.extract()?;
            toggles.insert(key, value.extract::<bool>().unwrap_or(false));
        }
    }
    Ok(toggles)
}

/// 扩展词表, 每次按当前配置读取
fn extended_vocabulary() -> ExtendedVocabulary {
    ExtendedVocabulary::load(&PackConfig::discover())
}

macro_rules! catalog_list_node {
    ($(#[$meta:meta])* $node:ident, $description:expr, $items:expr) => {
        $(#[$meta])*
        #[pyclass(subclass)]
        pub struct $node {}

        impl PromptServer for $node {}

        #[pymethods]
        impl $node {
            #[new]
            fn new() -> Self {
                let _ = tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::DEBUG)
                    .with_level(true)
                    .with_file(true)
                    .with_line_number(true)
                    .try_init();
                Self {}
            }

            #[classattr]
            #[pyo3(name = "RETURN_TYPES")]
            fn return_types() -> (&'static str, &'static str) {
                (NODE_LIST, NODE_INT)
            }

            #[classattr]
            #[pyo3(name = "RETURN_NAMES")]
            fn return_names() -> (&'static str, &'static str) {
                ("list", "count")
            }

            #[classattr]
            #[pyo3(name = "CATEGORY")]
            const CATEGORY: &'static str = CATEGORY_KLEIN;

            #[classattr]
            #[pyo3(name = "DESCRIPTION")]
            fn description() -> &'static str {
                $description
            }

            #[classattr]
            #[pyo3(name = "FUNCTION")]
            const FUNCTION: &'static str = "execute";

            #[classmethod]
            #[pyo3(name = "INPUT_TYPES")]
            fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
                Python::with_gil(|py| toggle_input_types(py, $items))
            }

            #[pyo3(name = "execute", signature = (custom_entries = String::new(), **kwargs))]
            fn execute(
                &mut self,
                py: Python,
                custom_entries: String,
                kwargs: Option<Bound<'_, PyDict>>,
            ) -> PyResult<(Vec<String>, usize)> {
                match collect_toggles(kwargs.as_ref()) {
                    Ok(toggles) => Ok(build_list($items, &toggles, &custom_entries)),
                    Err(e) => {
                        let name = stringify!($node);
                        error!("{name} error, {e}");
                        if let Err(e) = self.send_error(py, name.to_string(), e.to_string()) {
                            error!("send error failed, {e}");
                        }
                        Err(PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
                    }
                }
            }
        }
    };
}

catalog_list_node!(
    /// 场景列表
    KPPBSceneList,
    "IG scene/location list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::SCENES.items()
);

catalog_list_node!(
    /// 姿势列表
    KPPBPoseList,
    "Pose list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::POSES.items()
);

catalog_list_node!(
    /// 景别列表
    KPPBShotTypeList,
    "Shot type list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::SHOT_TYPES.items()
);

catalog_list_node!(
    /// 机位角度列表
    KPPBCameraAngleList,
    "Camera angle list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::CAMERA_ANGLES.items()
);

catalog_list_node!(
    /// 布光列表
    KPPBLightingList,
    "Lighting list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::LIGHTING.items()
);

catalog_list_node!(
    /// 服装组合列表
    KPPBOutfitList,
    "Outfit combination list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::OUTFITS.items()
);

catalog_list_node!(
    /// 图像编辑指令列表
    KPPBImageEditList,
    "Image edit instruction list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::IMAGE_EDITS.items()
);

catalog_list_node!(
    /// 氛围特效列表
    KPPBIGEffectList,
    "IG atmospheric effect list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::QUICK_EFFECTS.items()
);

catalog_list_node!(
    /// 发型列表
    KPPBHairstyleList,
    "Hairstyle list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::HAIRSTYLES.items()
);

catalog_list_node!(
    /// 动作列表
    KPPBActionList,
    "Action list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::ACTIONS.items()
);

catalog_list_node!(
    /// 多人动作列表
    KPPBGroupActionList,
    "Group/couples action list with boolean toggles. Outputs LIST for XY Plot.",
    catalogs::GROUP_ACTIONS.items()
);

catalog_list_node!(
    /// 扩展姿势列表
    KPPBExtendedPoseList,
    "Extended pose list with boolean toggles. Outputs LIST for XY Plot.",
    extended_vocabulary().pose_catalog().items()
);

catalog_list_node!(
    /// 扩展动作列表
    KPPBExtendedActionList,
    "Extended action list with boolean toggles. Outputs LIST for XY Plot.",
    extended_vocabulary().action_catalog().items()
);

catalog_list_node!(
    /// 扩展多人动作列表
    KPPBExtendedGroupActionList,
    "Extended group action list with boolean toggles. Outputs LIST for XY Plot.",
    extended_vocabulary().group_action_catalog().items()
);
