//! 错误处理

#[allow(unused)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // 标准库错误处理
    #[error("io error, {0}")]
    Io(std::io::Error),
    #[error("strum error, {0}")]
    ParseEnumString(String),
    #[error("invalid parameter, {0}")]
    InvalidParameter(String),

    // Ollama 守护进程
    #[error(
        "Cannot connect to Ollama at {url}. Make sure Ollama is running ('ollama serve').\nError: {reason}"
    )]
    Connection { url: String, reason: String },
    #[error("Ollama is not running at {url}.\nStart it with: ollama serve")]
    DaemonNotRunning { url: String },
    #[error("Ollama request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },
    #[error(
        "Cloudflare timeout (HTTP 524) from {url}.\nThe model '{model}' is likely too large for the GPU and Ollama is offloading to CPU, causing slow inference.\nTry a smaller quantization (e.g. q4_K_M instead of q8_0)."
    )]
    ProxyTimeout { url: String, model: String },
    #[error("Model '{model}' not found in Ollama.\nPull it first:  ollama pull {model}")]
    ModelNotFound { model: String },
    #[error("Ollama HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Failed to pull model '{model}' from Ollama.\n{reason}\nYou can try manually: ollama pull {model}")]
    PullFailed { model: String, reason: String },
    #[error("Unexpected Ollama response format: {0}")]
    UnexpectedResponse(String),

    // Claude Code CLI
    #[error(
        "Claude Code CLI not found. Install it or disable 'use_claude_code'.\nInstall: npm install -g @anthropic-ai/claude-code"
    )]
    CliNotFound,
    #[error("Claude Code CLI failed (code {code}): {stderr}")]
    CliFailed { code: i32, stderr: String },
    #[error("Claude Code CLI timed out after {seconds}s")]
    CliTimeout { seconds: u64 },

    // 图片
    #[error("image error, {0}")]
    ImageError(#[from] image::ImageError),
    #[error("creating image buffer error")]
    ImageBuffer,
    #[error("unsupported number of channels: {0}")]
    UnsupportedNumberOfChannels(usize),

    #[error("py error, {0}")]
    PyErr(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<strum::ParseError> for Error {
    fn from(e: strum::ParseError) -> Self {
        Error::ParseEnumString(e.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for Error {
    fn from(e: pyo3::PyErr) -> Self {
        Error::PyErr(e.to_string())
    }
}

impl Error {
    /// 连接类错误: 守护进程不可达
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connection { .. } | Error::DaemonNotRunning { .. })
    }

    /// 超时类错误, 与连接失败区分
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Timeout { .. } | Error::ProxyTimeout { .. } | Error::CliTimeout { .. }
        )
    }
}
