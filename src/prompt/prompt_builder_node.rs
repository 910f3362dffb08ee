//! 提示词构建节点

use log::info;
use pyo3::{
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyResult, Python,
};

use super::{ExposureToggles, PromptBuilder, PromptFields};
use crate::{
    config::PackConfig,
    core::{
        category::CATEGORY_KLEIN,
        types::{NODE_BOOLEAN, NODE_INT, NODE_SEED_MAX, NODE_STRING},
        PromptServer,
    },
    vocab::{
        photo::{
            CAMERA_ANGLE, COLOR_GRADING, DEPTH_OF_FIELD, HAIRSTYLE, HAIR_COLOR, LENS,
            LIGHTING_SETUP, PHOTO_STYLE, POSE, SCENE_TYPE, SHOT_TYPE,
        },
        SelectionField, REFERENCE,
    },
};

/// 下拉输入, 默认参考图
fn selection_input<'py>(
    py: Python<'py>,
    field: &SelectionField,
) -> PyResult<(Vec<&'static str>, Bound<'py, PyDict>)> {
    let options = PyDict::new(py);
    options.set_item("default", REFERENCE)?;
    Ok((field.options().to_vec(), options))
}

fn string_input(py: Python<'_>, multiline: bool, force_input: bool) -> PyResult<(&'static str, Bound<'_, PyDict>)> {
    let options = PyDict::new(py);
    if multiline {
        options.set_item("multiline", true)?;
    }
    options.set_item("default", "")?;
    if force_input {
        options.set_item("forceInput", true)?;
    }
    Ok((NODE_STRING, options))
}

fn toggle_input<'py>(
    py: Python<'py>,
    default: bool,
    tooltip: &str,
) -> PyResult<(&'static str, Bound<'py, PyDict>)> {
    let options = PyDict::new(py);
    options.set_item("default", default)?;
    options.set_item("tooltip", tooltip)?;
    Ok((NODE_BOOLEAN, options))
}

/// 提示词构建器
///
/// 面向 FLUX.2 Klein 9B 的写实人像提示词, 输出正向、负向提示词与 JSON 镜像。
#[pyclass(subclass)]
pub struct KPPBPromptBuilder {
    builder: PromptBuilder,
}

impl PromptServer for KPPBPromptBuilder {}

#[pymethods]
impl KPPBPromptBuilder {
    #[new]
    fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .try_init();
        Self {
            builder: PromptBuilder::new(&PackConfig::discover()),
        }
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str, &'static str, &'static str) {
        (NODE_STRING, NODE_STRING, NODE_STRING)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str, &'static str, &'static str) {
        ("positive_prompt", "negative_prompt", "prompt_json")
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_KLEIN;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "IG-focused photorealistic prompt builder for FLUX.2 Klein 9B."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        let has_exposure_inputs = PromptBuilder::new(&PackConfig::discover()).has_exposure_inputs();

        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item("subject", string_input(py, true, false)?)?;
                required.set_item("pose", selection_input(py, &POSE)?)?;
                required.set_item("action", string_input(py, true, false)?)?;
                required.set_item("scene_type", selection_input(py, &SCENE_TYPE)?)?;
                required.set_item("shot_type", selection_input(py, &SHOT_TYPE)?)?;
                required.set_item("camera_angle", selection_input(py, &CAMERA_ANGLE)?)?;
                required.set_item("lighting_setup", selection_input(py, &LIGHTING_SETUP)?)?;
                required.set_item("photo_style", selection_input(py, &PHOTO_STYLE)?)?;
                required.set_item("lens", selection_input(py, &LENS)?)?;
                required.set_item("depth_of_field", selection_input(py, &DEPTH_OF_FIELD)?)?;
                required.set_item("color_grading", selection_input(py, &COLOR_GRADING)?)?;
                required.set_item("hairstyle", selection_input(py, &HAIRSTYLE)?)?;
                required.set_item("hair_color", selection_input(py, &HAIR_COLOR)?)?;
                required.set_item(
                    "preserve_identity",
                    toggle_input(
                        py,
                        true,
                        "Append identity lock phrase for character reference consistency",
                    )?,
                )?;
                required
            })?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                optional.set_item("outfit", string_input(py, true, true)?)?;
                optional.set_item("edit_instructions", string_input(py, true, true)?)?;
                optional.set_item("environment", string_input(py, true, false)?)?;
                optional.set_item("lighting_custom", string_input(py, false, false)?)?;
                optional.set_item("mood", string_input(py, false, false)?)?;
                optional.set_item("extra_details", string_input(py, true, false)?)?;
                optional.set_item("negative_prompt", string_input(py, true, false)?)?;
                optional.set_item(
                    "seed",
                    (NODE_INT, {
                        let seed = PyDict::new(py);
                        seed.set_item("default", -1)?;
                        seed.set_item("min", -1)?;
                        seed.set_item("max", NODE_SEED_MAX)?;
                        seed.set_item("tooltip", "-1 for random, or set for reproducible random picks")?;
                        seed
                    }),
                )?;
                if has_exposure_inputs {
                    optional.set_item(
                        "expose_breasts",
                        toggle_input(
                            py,
                            false,
                            "ON: clothing adjusted to reveal breasts. OFF: nipples always concealed by fabric, hands, or hair",
                        )?,
                    )?;
                    optional.set_item("remove_bra", toggle_input(py, false, "No bra under clothing")?)?;
                    optional.set_item(
                        "remove_panties",
                        toggle_input(
                            py,
                            false,
                            "No panties/underwear, only visible if pose or camera angle reveals it",
                        )?,
                    )?;
                }
                optional
            })?;

            Ok(dict.into())
        })
    }

    #[allow(clippy::too_many_arguments)]
    #[pyo3(
        name = "execute",
        signature = (
            subject,
            pose,
            action,
            scene_type,
            shot_type,
            camera_angle,
            lighting_setup,
            photo_style,
            lens,
            depth_of_field,
            color_grading,
            hairstyle = REFERENCE.to_string(),
            hair_color = REFERENCE.to_string(),
            preserve_identity = true,
            outfit = String::new(),
            edit_instructions = String::new(),
            environment = String::new(),
            lighting_custom = String::new(),
            mood = String::new(),
            extra_details = String::new(),
            negative_prompt = String::new(),
            seed = -1,
            expose_breasts = false,
            remove_bra = false,
            remove_panties = false,
        )
    )]
    fn execute(
        &mut self,
        subject: String,
        pose: String,
        action: String,
        scene_type: String,
        shot_type: String,
        camera_angle: String,
        lighting_setup: String,
        photo_style: String,
        lens: String,
        depth_of_field: String,
        color_grading: String,
        hairstyle: String,
        hair_color: String,
        preserve_identity: bool,
        outfit: String,
        edit_instructions: String,
        environment: String,
        lighting_custom: String,
        mood: String,
        extra_details: String,
        negative_prompt: String,
        seed: i64,
        expose_breasts: bool,
        remove_bra: bool,
        remove_panties: bool,
    ) -> PyResult<(String, String, String)> {
        let fields = PromptFields {
            subject,
            pose,
            action,
            scene_type,
            shot_type,
            camera_angle,
            lighting_setup,
            photo_style,
            lens,
            depth_of_field,
            color_grading,
            hairstyle,
            hair_color,
            preserve_identity,
            outfit,
            edit_instructions,
            environment,
            lighting_custom,
            mood,
            extra_details,
            negative_prompt,
            exposure: ExposureToggles {
                expose_breasts,
                remove_bra,
                remove_panties,
            },
            seed,
        };

        let built = self.builder.build(&fields);
        info!("prompt builder output ({} chars)", built.positive.len());

        Ok((built.positive, built.negative, built.json))
    }
}
