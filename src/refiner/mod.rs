//! VLM 提示词精炼
//!
//! 视觉模型读取参考图与场景设置, 单次调用写出完整的生成提示词。
//! 两种后端: 本地 Ollama 守护进程, 或 Claude Code CLI。

pub mod claude_cli;
pub mod instructions;
pub mod ollama;
pub mod response;

pub use claude_cli::{find_claude, ClaudeCodeCli, ClaudeModel};
pub use ollama::{OllamaClient, Timeouts, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};

#[cfg(feature = "python")]
mod vlm_refiner_node;
#[cfg(feature = "python")]
pub use vlm_refiner_node::KPPBVLMRefiner;

use log::{info, warn};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{error::Error, image::to_base64};
use instructions::{cli_user_message, daemon_user_message, system_prompt, MessageInputs};
use ollama::{ChatRequest, Message};
use response::{clean_response, filename_prefix, finalize_prompt, parse_dataset};

/// 默认的训练触发词
pub const DEFAULT_TRIGGER_WORD: &str = "ohwx";

/// 精炼模式
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum RefinerMode {
    #[default]
    #[strum(to_string = "describe & enhance")]
    DescribeEnhance,
    #[strum(to_string = "image edit aware")]
    ImageEditAware,
    #[strum(to_string = "caption only")]
    CaptionOnly,
    #[strum(to_string = "dataset generation")]
    DatasetGeneration,
}

impl RefinerMode {
    pub fn options() -> Vec<String> {
        Self::iter().map(|v| v.to_string()).collect()
    }
}

/// 参考图的用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Character,
    Scene,
    Prop,
}

impl ImageRole {
    pub fn label(&self) -> &'static str {
        match self {
            ImageRole::Character => "CHARACTER REFERENCE",
            ImageRole::Scene => "SCENE REFERENCE",
            ImageRole::Prop => "PROP/PRODUCT REFERENCE",
        }
    }
}

/// PNG 编码的参考图
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    pub role: ImageRole,
    pub png: Vec<u8>,
}

/// 一次模型调用
#[derive(Debug, Clone)]
pub struct Completion<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub images: &'a [ReferenceImage],
    pub temperature: f64,
    pub seed: i64,
    pub json_format: bool,
}

/// 精炼后端
pub trait Assistant {
    /// 是否为 CLI 后端, 决定系统提示词与用户消息的写法
    fn is_cli(&self) -> bool;

    fn complete(&self, completion: &Completion) -> Result<String, Error>;
}

/// Ollama 后端: 推理前确保模型存在, 推理后可选卸载
#[derive(Debug, Clone)]
pub struct OllamaAssistant {
    pub client: OllamaClient,
    pub model: String,
    pub unload_model: bool,
}

impl Assistant for OllamaAssistant {
    fn is_cli(&self) -> bool {
        false
    }

    fn complete(&self, completion: &Completion) -> Result<String, Error> {
        self.client.ensure_model(&self.model)?;

        let images = completion.images.iter().map(|v| to_base64(&v.png)).collect();
        let messages = vec![
            Message::system(completion.system),
            Message::user(completion.user, images),
        ];
        let mut request = ChatRequest::new(&self.model, messages, completion.temperature, completion.seed);
        if completion.json_format {
            request = request.with_json_format();
        }

        let content = self.client.chat(&request)?;
        if self.unload_model {
            self.client.unload(&self.model);
        }
        Ok(content)
    }
}

impl Assistant for ClaudeCodeCli {
    fn is_cli(&self) -> bool {
        true
    }

    fn complete(&self, completion: &Completion) -> Result<String, Error> {
        self.run(completion.system, completion.user, completion.images)
    }
}

/// 精炼请求
#[derive(Debug, Clone)]
pub struct RefineRequest {
    pub mode: RefinerMode,
    /// 角色参考图在前, 其后依次为场景、道具
    pub images: Vec<ReferenceImage>,
    pub positive_prompt: String,
    pub prompt_json: String,
    pub edit_prompt: String,
    /// 非空时覆盖按模式选择的系统提示词
    pub system_prompt: String,
    pub temperature: f64,
    pub seed: i64,
    pub preserve_identity: bool,
    pub trigger_word: String,
}

impl Default for RefineRequest {
    fn default() -> Self {
        Self {
            mode: RefinerMode::default(),
            images: Vec::new(),
            positive_prompt: String::new(),
            prompt_json: String::new(),
            edit_prompt: String::new(),
            system_prompt: String::new(),
            temperature: 0.3,
            seed: -1,
            preserve_identity: true,
            trigger_word: DEFAULT_TRIGGER_WORD.to_string(),
        }
    }
}

/// 精炼结果
#[derive(Debug, Clone, PartialEq)]
pub struct RefineOutput {
    pub refined_prompt: String,
    pub image_caption: String,
    pub filename_prefix: String,
}

/// 执行一次精炼
pub fn refine(request: &RefineRequest, assistant: &dyn Assistant) -> Result<RefineOutput, Error> {
    if !request.images.iter().any(|v| v.role == ImageRole::Character) {
        return Err(Error::InvalidParameter("character reference image is required".to_string()));
    }

    let use_cli = assistant.is_cli();
    let roles = request.images.iter().map(|v| v.role).collect::<Vec<_>>();
    let inputs = MessageInputs {
        positive_prompt: &request.positive_prompt,
        prompt_json: &request.prompt_json,
        edit_prompt: &request.edit_prompt,
        trigger_word: &request.trigger_word,
    };

    let system = system_prompt(request.mode, use_cli, &request.system_prompt);
    let user = if use_cli {
        cli_user_message(request.mode, &roles, &inputs)
    } else {
        daemon_user_message(request.mode, &roles, &inputs)
    };

    info!(
        "refine: mode={}, backend={}, images={}",
        request.mode,
        if use_cli { "claude code" } else { "ollama" },
        request.images.len()
    );

    let is_dataset = request.mode == RefinerMode::DatasetGeneration;
    let raw = assistant.complete(&Completion {
        system: &system,
        user: &user,
        images: &request.images,
        temperature: request.temperature,
        seed: request.seed,
        json_format: is_dataset,
    })?;

    let result = clean_response(&raw);
    let prefix = filename_prefix(&request.prompt_json, &request.mode.to_string());

    if is_dataset {
        if let Some(dataset) = parse_dataset(&result, &request.trigger_word) {
            info!(
                "dataset output: prompt {} chars, caption {} chars, prefix {prefix}",
                dataset.prompt.len(),
                dataset.caption.len()
            );
            return Ok(RefineOutput {
                refined_prompt: dataset.prompt,
                image_caption: dataset.caption,
                filename_prefix: prefix,
            });
        }
        warn!("dataset output could not be parsed, using raw output");
    }

    let prompt = finalize_prompt(&result, &request.positive_prompt, request.preserve_identity);
    info!("final output ({} chars)", prompt.len());

    Ok(RefineOutput {
        refined_prompt: prompt.clone(),
        image_caption: prompt,
        filename_prefix: prefix,
    })
}
