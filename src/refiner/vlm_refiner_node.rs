//! VLM 提示词精炼节点

use log::{error, info};
use pyo3::{
    pyclass, pymethods,
    types::{PyAny, PyDict, PyDictMethods, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use super::{
    refine, ClaudeCodeCli, ClaudeModel, ImageRole, OllamaAssistant, OllamaClient, RefineOutput,
    RefineRequest, RefinerMode, ReferenceImage, DEFAULT_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_TRIGGER_WORD,
};
use crate::{
    core::{
        category::CATEGORY_KLEIN,
        types::{NODE_BOOLEAN, NODE_FLOAT, NODE_IMAGE, NODE_INT, NODE_SEED_MAX, NODE_STRING},
        PromptServer,
    },
    error::Error,
    wrapper::torch::ImageTensor,
};

fn with_tooltip<'py>(py: Python<'py>, tooltip: &str) -> PyResult<Bound<'py, PyDict>> {
    let options = PyDict::new(py);
    options.set_item("tooltip", tooltip)?;
    Ok(options)
}

/// 连线输入的字符串
fn forced_string<'py>(py: Python<'py>, tooltip: &str) -> PyResult<(&'static str, Bound<'py, PyDict>)> {
    let options = with_tooltip(py, tooltip)?;
    options.set_item("default", "")?;
    options.set_item("forceInput", true)?;
    Ok((NODE_STRING, options))
}

/// VLM 提示词精炼
///
/// 视觉模型直接读取参考图, 将角色身份与场景设置合并为完整的生成提示词。
#[pyclass(subclass)]
pub struct KPPBVLMRefiner {}

impl PromptServer for KPPBVLMRefiner {}

#[pymethods]
impl KPPBVLMRefiner {
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
    fn return_types() -> (&'static str, &'static str, &'static str) {
        (NODE_STRING, NODE_STRING, NODE_STRING)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str, &'static str, &'static str) {
        ("refined_prompt", "image_caption", "filename_prefix")
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_KLEIN;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "One-shot VLM prompt composer for Klein 9B. The VLM sees the reference images and merges the character's identity with the scene settings."
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
                required.set_item(
                    "character_ref",
                    (
                        NODE_IMAGE,
                        with_tooltip(py, "Character reference image, identity/likeness is extracted from this")?,
                    ),
                )?;
                required.set_item(
                    "ollama_url",
                    (NODE_STRING, {
                        let url = PyDict::new(py);
                        url.set_item("default", DEFAULT_OLLAMA_URL)?;
                        url
                    }),
                )?;
                required.set_item(
                    "model",
                    (NODE_STRING, {
                        let model = PyDict::new(py);
                        model.set_item("default", DEFAULT_MODEL)?;
                        model
                    }),
                )?;
                required.set_item(
                    "mode",
                    (RefinerMode::options(), {
                        let mode = PyDict::new(py);
                        mode.set_item("default", RefinerMode::DescribeEnhance.to_string())?;
                        mode
                    }),
                )?;
                required
            })?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                optional.set_item(
                    "scene_ref",
                    (
                        NODE_IMAGE,
                        with_tooltip(py, "Additional reference for scene, pose, lighting, or outfit")?,
                    ),
                )?;
                optional.set_item(
                    "prop_ref",
                    (
                        NODE_IMAGE,
                        with_tooltip(py, "Product/prop reference, e.g. handbag, sunglasses, sponsored item")?,
                    ),
                )?;
                optional.set_item(
                    "positive_prompt",
                    forced_string(
                        py,
                        "Connect from Prompt Builder's positive_prompt, used as fallback if VLM returns empty",
                    )?,
                )?;
                optional.set_item(
                    "prompt_json",
                    forced_string(py, "Connect from Prompt Builder's prompt_json output")?,
                )?;
                optional.set_item(
                    "edit_prompt",
                    forced_string(py, "Connect from Image Edit Composer's edit_prompt output")?,
                )?;
                optional.set_item(
                    "system_prompt",
                    (NODE_STRING, {
                        let system_prompt = PyDict::new(py);
                        system_prompt.set_item("multiline", true)?;
                        system_prompt.set_item("default", "")?;
                        system_prompt.set_item("placeholder", "Override system prompt (leave empty for auto)")?;
                        system_prompt
                    }),
                )?;
                optional.set_item(
                    "temperature",
                    (NODE_FLOAT, {
                        let temperature = with_tooltip(py, "Lower = more focused, higher = more creative")?;
                        temperature.set_item("default", 0.3)?;
                        temperature.set_item("min", 0.0)?;
                        temperature.set_item("max", 2.0)?;
                        temperature.set_item("step", 0.05)?;
                        temperature
                    }),
                )?;
                optional.set_item(
                    "seed",
                    (NODE_INT, {
                        let seed = with_tooltip(py, "-1 for random, or set for reproducible output")?;
                        seed.set_item("default", -1)?;
                        seed.set_item("min", -1)?;
                        seed.set_item("max", NODE_SEED_MAX)?;
                        seed
                    }),
                )?;
                optional.set_item(
                    "preserve_identity",
                    (NODE_BOOLEAN, {
                        let preserve_identity = with_tooltip(
                            py,
                            "Append identity lock phrase to reinforce likeness preservation for the diffusion model",
                        )?;
                        preserve_identity.set_item("default", true)?;
                        preserve_identity
                    }),
                )?;
                optional.set_item(
                    "unload_model",
                    (NODE_BOOLEAN, {
                        let unload_model = with_tooltip(
                            py,
                            "Unload the Ollama model from VRAM after inference. ON for localhost, OFF for remote endpoints",
                        )?;
                        unload_model.set_item("default", true)?;
                        unload_model
                    }),
                )?;
                optional.set_item(
                    "use_claude_code",
                    (NODE_BOOLEAN, {
                        let use_claude_code =
                            with_tooltip(py, "Use Claude Code CLI instead of Ollama, one shot with images")?;
                        use_claude_code.set_item("default", false)?;
                        use_claude_code
                    }),
                )?;
                optional.set_item(
                    "claude_model",
                    (ClaudeModel::options(), {
                        let claude_model = with_tooltip(py, "Claude model to use")?;
                        claude_model.set_item("default", ClaudeModel::Opus.to_string())?;
                        claude_model
                    }),
                )?;
                optional.set_item(
                    "trigger_word",
                    (NODE_STRING, {
                        let trigger_word = with_tooltip(
                            py,
                            "Trigger word for LoRA training captions (dataset generation mode only)",
                        )?;
                        trigger_word.set_item("default", DEFAULT_TRIGGER_WORD)?;
                        trigger_word
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
            character_ref,
            ollama_url,
            model,
            mode,
            scene_ref = None,
            prop_ref = None,
            positive_prompt = String::new(),
            prompt_json = String::new(),
            edit_prompt = String::new(),
            system_prompt = String::new(),
            temperature = 0.3,
            seed = -1,
            preserve_identity = true,
            unload_model = true,
            use_claude_code = false,
            claude_model = ClaudeModel::Opus.to_string(),
            trigger_word = DEFAULT_TRIGGER_WORD.to_string(),
        )
    )]
    fn execute<'py>(
        &mut self,
        py: Python<'py>,
        character_ref: Bound<'py, PyAny>,
        ollama_url: String,
        model: String,
        mode: String,
        scene_ref: Option<Bound<'py, PyAny>>,
        prop_ref: Option<Bound<'py, PyAny>>,
        positive_prompt: String,
        prompt_json: String,
        edit_prompt: String,
        system_prompt: String,
        temperature: f64,
        seed: i64,
        preserve_identity: bool,
        unload_model: bool,
        use_claude_code: bool,
        claude_model: String,
        trigger_word: String,
    ) -> PyResult<(String, String, String)> {
        let results = self.refine_prompt(
            py,
            &character_ref,
            scene_ref.as_ref(),
            prop_ref.as_ref(),
            RefineRequest {
                mode: RefinerMode::default(),
                images: Vec::new(),
                positive_prompt,
                prompt_json,
                edit_prompt,
                system_prompt,
                temperature,
                seed,
                preserve_identity,
                trigger_word,
            },
            &mode,
            Backend {
                ollama_url,
                model,
                unload_model,
                use_claude_code,
                claude_model,
            },
        );

        match results {
            Ok(v) => Ok((v.refined_prompt, v.image_caption, v.filename_prefix)),
            Err(e) => {
                error!("KPPBVLMRefiner error, {e}");
                if let Err(e) = self.send_error(py, "KPPBVLMRefiner".to_string(), e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

/// 后端选择参数
struct Backend {
    ollama_url: String,
    model: String,
    unload_model: bool,
    use_claude_code: bool,
    claude_model: String,
}

impl KPPBVLMRefiner {
    #[allow(clippy::too_many_arguments)]
    fn refine_prompt(
        &self,
        py: Python<'_>,
        character_ref: &Bound<'_, PyAny>,
        scene_ref: Option<&Bound<'_, PyAny>>,
        prop_ref: Option<&Bound<'_, PyAny>>,
        mut request: RefineRequest,
        mode: &str,
        backend: Backend,
    ) -> Result<RefineOutput, Error> {
        request.mode = mode.parse::<RefinerMode>()?;

        let references = [
            (ImageRole::Character, Some(character_ref)),
            (ImageRole::Scene, scene_ref),
            (ImageRole::Prop, prop_ref),
        ];
        for (role, tensor) in references {
            if let Some(tensor) = tensor {
                let png = ImageTensor::new(tensor).first_frame()?.to_png()?;
                request.images.push(ReferenceImage { role, png });
            }
        }

        info!(
            "vlm refiner: mode={}, images={}, claude_code={}",
            request.mode,
            request.images.len(),
            backend.use_claude_code
        );

        // 网络与子进程调用期间释放 GIL
        if backend.use_claude_code {
            let cli = ClaudeCodeCli::new(backend.claude_model.parse::<ClaudeModel>()?);
            py.allow_threads(|| refine(&request, &cli))
        } else {
            let assistant = OllamaAssistant {
                client: OllamaClient::new(&backend.ollama_url)?,
                model: backend.model.trim().to_string(),
                unload_model: backend.unload_model,
            };
            py.allow_threads(|| refine(&request, &assistant))
        }
    }
}
