//! 图像编辑指令节点

use pyo3::{
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyResult, Python,
};

use super::{EditRequest, EditSlot};
use crate::{
    core::{
        category::CATEGORY_KLEIN,
        types::{NODE_BOOLEAN, NODE_STRING},
        PromptServer,
    },
    vocab::{
        edit::{EditKind, QUICK_EFFECTS},
        NONE,
    },
};

/// 单行文本输入, 可带占位提示
fn text_input<'py>(
    py: Python<'py>,
    placeholder: Option<&str>,
) -> PyResult<(&'static str, Bound<'py, PyDict>)> {
    let options = PyDict::new(py);
    options.set_item("default", "")?;
    if let Some(placeholder) = placeholder {
        options.set_item("placeholder", placeholder)?;
    }
    Ok((NODE_STRING, options))
}

fn kind_input(py: Python<'_>, default: EditKind) -> PyResult<(Vec<String>, Bound<'_, PyDict>)> {
    let options = PyDict::new(py);
    options.set_item("default", default.to_string())?;
    Ok((EditKind::options(), options))
}

/// 图像编辑指令组合
///
/// 三个可叠加的编辑槽位, 加上快捷氛围效果。
#[pyclass(subclass)]
pub struct KPPBImageEditComposer {}

impl PromptServer for KPPBImageEditComposer {}

#[pymethods]
impl KPPBImageEditComposer {
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
        (NODE_STRING, NODE_STRING)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str, &'static str) {
        ("edit_prompt", "edit_json")
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_KLEIN;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Compose Klein 9B image editing instructions from structured inputs. Supports 3 stacked edit slots + IG quick effects."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item("edit_1_type", kind_input(py, EditKind::ReplaceElement)?)?;
                required.set_item(
                    "edit_1_target",
                    text_input(py, Some("what to affect (e.g. the jacket)"))?,
                )?;
                required.set_item(
                    "edit_1_value",
                    text_input(py, Some("desired result (e.g. leather bomber)"))?,
                )?;
                required.set_item("edit_1_location", text_input(py, Some("where (optional)"))?)?;
                required.set_item(
                    "preserve_identity",
                    (NODE_BOOLEAN, {
                        let preserve_identity = PyDict::new(py);
                        preserve_identity.set_item("default", true)?;
                        preserve_identity.set_item(
                            "tooltip",
                            "Append identity lock to prevent face/likeness drift during edits",
                        )?;
                        preserve_identity
                    }),
                )?;
                required
            })?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                for slot in 2..=3 {
                    optional.set_item(format!("edit_{slot}_type"), kind_input(py, EditKind::AddElement)?)?;
                    optional.set_item(format!("edit_{slot}_target"), text_input(py, None)?)?;
                    optional.set_item(format!("edit_{slot}_value"), text_input(py, None)?)?;
                    optional.set_item(format!("edit_{slot}_location"), text_input(py, None)?)?;
                }
                optional.set_item(
                    "ig_quick_effect",
                    (QUICK_EFFECTS.labels().collect::<Vec<_>>(), {
                        let effect = PyDict::new(py);
                        effect.set_item("default", NONE)?;
                        effect
                    }),
                )?;
                optional.set_item(
                    "preserve_note",
                    (NODE_STRING, {
                        let note = PyDict::new(py);
                        note.set_item("multiline", true)?;
                        note.set_item("default", "")?;
                        note.set_item(
                            "placeholder",
                            "what to keep unchanged (e.g. keep the pose and expression)",
                        )?;
                        note
                    }),
                )?;
                optional
            })?;

            Ok(dict.into())
        })
    }

    #[allow(clippy::too_many_arguments)]
    #[pyo3(
        name = "execute",
        signature = (
            edit_1_type,
            edit_1_target,
            edit_1_value,
            edit_1_location,
            preserve_identity = true,
            edit_2_type = EditKind::AddElement.to_string(),
            edit_2_target = String::new(),
            edit_2_value = String::new(),
            edit_2_location = String::new(),
            edit_3_type = EditKind::AddElement.to_string(),
            edit_3_target = String::new(),
            edit_3_value = String::new(),
            edit_3_location = String::new(),
            ig_quick_effect = NONE.to_string(),
            preserve_note = String::new(),
        )
    )]
    fn execute(
        &mut self,
        edit_1_type: String,
        edit_1_target: String,
        edit_1_value: String,
        edit_1_location: String,
        preserve_identity: bool,
        edit_2_type: String,
        edit_2_target: String,
        edit_2_value: String,
        edit_2_location: String,
        edit_3_type: String,
        edit_3_target: String,
        edit_3_value: String,
        edit_3_location: String,
        ig_quick_effect: String,
        preserve_note: String,
    ) -> PyResult<(String, String)> {
        let request = EditRequest {
            slots: [
                EditSlot {
                    kind: edit_1_type,
                    target: edit_1_target,
                    value: edit_1_value,
                    location: edit_1_location,
                },
                EditSlot {
                    kind: edit_2_type,
                    target: edit_2_target,
                    value: edit_2_value,
                    location: edit_2_location,
                },
                EditSlot {
                    kind: edit_3_type,
                    target: edit_3_target,
                    value: edit_3_value,
                    location: edit_3_location,
                },
            ],
            quick_effect: ig_quick_effect,
            preserve_note,
            preserve_identity,
        };

        Ok(request.compose())
    }
}
