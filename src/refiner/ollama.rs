//! Ollama 守护进程客户端
//!
//! 每次调用都重新查询守护进程, 不在本地缓存模型状态。

use std::{
    io::{self, BufRead, BufReader},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::Duration,
};

use log::{info, warn};
use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    StatusCode,
};
use serde::{Deserialize, Serialize};

use super::response::{extract_from_thinking, strip_think_blocks};
use crate::error::Error;

/// 默认的守护进程地址
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// 默认的视觉模型
pub const DEFAULT_MODEL: &str = "huihui_ai/qwen3-vl-abliterated:32b-instruct-q8_0";
/// 经过代理的端点要求浏览器风格的 User-Agent
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// 各类请求的超时
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeouts {
    pub tags: Duration,
    pub unload: Duration,
    pub chat: Duration,
    /// 拉取时相邻两次进度的最大间隔
    pub pull: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            tags: Duration::from_secs(15),
            unload: Duration::from_secs(30),
            chat: Duration::from_secs(300),
            pull: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
    /// base64 编码的 PNG
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Message {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
            images: Vec::new(),
        }
    }

    pub fn user(content: &str, images: Vec<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
            images,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    pub temperature: f64,
    pub num_predict: i32,
    pub repeat_penalty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    pub think: bool,
    pub options: ChatOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ChatRequest {
    /// 非流式、关闭推理的请求; 负数种子表示不固定
    pub fn new(model: &str, messages: Vec<Message>, temperature: f64, seed: i64) -> Self {
        Self {
            model: model.to_string(),
            messages,
            stream: false,
            think: false,
            options: ChatOptions {
                temperature,
                num_predict: -1,
                repeat_penalty: 1.3,
                seed: (seed >= 0).then_some(seed),
            },
            format: None,
        }
    }

    /// 强制 JSON 输出
    pub fn with_json_format(mut self) -> Self {
        self.format = Some("json".to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
    done_reason: Option<String>,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
    #[serde(default)]
    total_duration: u64,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    #[serde(default)]
    thinking: String,
}

#[derive(Debug, Default, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct PullProgress {
    #[serde(default)]
    status: String,
    error: Option<String>,
    completed: Option<u64>,
    total: Option<u64>,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    name: &'a str,
    stream: bool,
}

/// 拉取响应流中的事件
enum PullEvent {
    Rejected { status: u16, body: String },
    Line(String),
    SendFailed(reqwest::Error),
    ReadFailed(io::Error),
}

/// 读取响应体时的超时, 包括 reqwest 包装在 io 错误中的超时
fn is_read_timeout(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::TimedOut
        || e.get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout)
}

#[derive(Debug, Serialize)]
struct UnloadRequest<'a> {
    model: &'a str,
    messages: [(); 0],
    keep_alive: u8,
}

/// Ollama REST 客户端
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    http: Client,
    /// 拉取专用, 不设总时限
    pull_http: Client,
    timeouts: Timeouts,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_timeouts(base_url, Timeouts::default())
    }

    pub fn with_timeouts(base_url: &str, timeouts: Timeouts) -> Result<Self, Error> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let build_error = |e: reqwest::Error| Error::Connection {
            url: base_url.clone(),
            reason: e.to_string(),
        };
        let http = Client::builder().user_agent(USER_AGENT).build().map_err(build_error)?;
        let pull_http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None)
            .connect_timeout(timeouts.tags)
            .build()
            .map_err(build_error)?;

        Ok(Self {
            base_url,
            http,
            pull_http,
            timeouts,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(&self, request: RequestBuilder, timeout: Duration) -> Result<Response, Error> {
        request.timeout(timeout).send().map_err(|e| self.transport_error(e, timeout))
    }

    fn transport_error(&self, e: reqwest::Error, timeout: Duration) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                url: self.base_url.clone(),
                seconds: timeout.as_secs(),
            }
        } else {
            Error::Connection {
                url: self.base_url.clone(),
                reason: e.to_string(),
            }
        }
    }

    /// 健康检查
    pub fn is_running(&self) -> bool {
        let request = self.http.get(self.endpoint("/api/tags"));
        match self.send(request, self.timeouts.tags) {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// 本地已有的模型名称
    pub fn list_models(&self) -> Result<Vec<String>, Error> {
        let request = self.http.get(self.endpoint("/api/tags"));
        let resp = self.send(request, self.timeouts.tags)?;
        let status = resp.status();
        let body = resp.text().map_err(|e| self.transport_error(e, self.timeouts.tags))?;
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let tags = serde_json::from_str::<TagsResponse>(&body)
            .map_err(|_| Error::UnexpectedResponse(body.clone()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// 模型是否已存在: 完全匹配、`:latest` 匹配, 或未带标签时按名称前缀匹配
    ///
    /// 查询失败视为不存在。
    pub fn model_exists(&self, model: &str) -> bool {
        let models = match self.list_models() {
            Ok(v) => v,
            Err(e) => {
                warn!("failed to list ollama models, {e}");
                return false;
            }
        };
        models.iter().any(|local| model_matches(local, model))
    }

    /// 拉取模型, 流式输出进度
    ///
    /// 请求没有总时限, 相邻两次进度之间超过 `Timeouts::pull` 视为超时。
    pub fn pull(&self, model: &str) -> Result<(), Error> {
        info!("model '{model}' not found locally, pulling from ollama registry...");

        let stall = self.timeouts.pull;
        let timeout = || Error::Timeout {
            url: self.base_url.clone(),
            seconds: stall.as_secs(),
        };
        let pull_failed = |reason: String| Error::PullFailed {
            model: model.to_string(),
            reason,
        };

        let events = self.stream_pull(model);
        let mut last_status = String::new();
        loop {
            let event = match events.recv_timeout(stall) {
                Ok(v) => v,
                Err(RecvTimeoutError::Timeout) => return Err(timeout()),
                Err(RecvTimeoutError::Disconnected) => break,
            };
            let line = match event {
                PullEvent::Line(v) => v,
                PullEvent::Rejected { status, body } => {
                    return Err(pull_failed(format!("HTTP {status}: {body}")))
                }
                PullEvent::SendFailed(e) => return Err(self.transport_error(e, stall)),
                PullEvent::ReadFailed(e) if is_read_timeout(&e) => return Err(timeout()),
                PullEvent::ReadFailed(e) => return Err(pull_failed(e.to_string())),
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(chunk) = serde_json::from_str::<PullProgress>(line) else {
                continue;
            };

            if let Some(error) = chunk.error {
                return Err(pull_failed(error));
            }

            if chunk.status != last_status {
                match (chunk.completed, chunk.total) {
                    (Some(completed), Some(total)) if total > 0 => {
                        let pct = completed as f64 / total as f64 * 100.0;
                        let size_gb = total as f64 / 1e9;
                        info!("{}: {pct:.0}% of {size_gb:.1}GB", chunk.status);
                    }
                    _ => info!("{}", chunk.status),
                }
                last_status = chunk.status;
            }
        }

        info!("model '{model}' pulled successfully");
        Ok(())
    }

    /// 在线程中发送拉取请求, 逐行转发响应
    ///
    /// 接收端提前放弃时, 线程在下一次转发失败后退出。
    fn stream_pull(&self, model: &str) -> Receiver<PullEvent> {
        let (tx, rx) = mpsc::channel();
        let http = self.pull_http.clone();
        let url = self.endpoint("/api/pull");
        let model = model.to_string();

        thread::spawn(move || {
            let request = http.post(url).json(&PullRequest {
                name: &model,
                stream: true,
            });
            let resp = match request.send() {
                Ok(v) => v,
                Err(e) => {
                    let _ = tx.send(PullEvent::SendFailed(e));
                    return;
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().unwrap_or_default();
                let _ = tx.send(PullEvent::Rejected {
                    status: status.as_u16(),
                    body,
                });
                return;
            }

            for line in BufReader::new(resp).lines() {
                let (event, last) = match line {
                    Ok(v) => (PullEvent::Line(v), false),
                    Err(e) => (PullEvent::ReadFailed(e), true),
                };
                if tx.send(event).is_err() || last {
                    return;
                }
            }
        });

        rx
    }

    /// 推理前检查守护进程并在缺失时拉取模型
    pub fn ensure_model(&self, model: &str) -> Result<(), Error> {
        if !self.is_running() {
            return Err(Error::DaemonNotRunning {
                url: self.base_url.clone(),
            });
        }
        if !self.model_exists(model) {
            self.pull(model)?;
        }
        Ok(())
    }

    /// 单次对话补全, 返回去掉推理块的正文
    pub fn chat(&self, request: &ChatRequest) -> Result<String, Error> {
        let http_request = self.http.post(self.endpoint("/api/chat")).json(request);
        let resp = self.send(http_request, self.timeouts.chat)?;

        let status = resp.status();
        let body = resp.text().map_err(|e| self.transport_error(e, self.timeouts.chat))?;
        if !status.is_success() {
            return Err(self.map_status(status, body, &request.model));
        }

        let result = serde_json::from_str::<ChatResponse>(&body)
            .map_err(|_| Error::UnexpectedResponse(body.clone()))?;

        info!(
            "ollama stats: think={}, done_reason={}, prompt_tokens={}, eval_tokens={}, duration={:.1}s",
            request.think,
            result.done_reason.as_deref().unwrap_or("N/A"),
            result.prompt_eval_count.map_or("N/A".to_string(), |v| v.to_string()),
            result.eval_count.map_or("N/A".to_string(), |v| v.to_string()),
            result.total_duration as f64 / 1e9,
        );

        let Some(ChatResponseMessage {
            content: Some(raw_content),
            thinking,
        }) = result.message
        else {
            return Err(Error::UnexpectedResponse(body));
        };

        if !thinking.is_empty() {
            info!("thinking ({} chars): {thinking}", thinking.len());
        }
        info!("raw content ({} chars): {raw_content}", raw_content.len());

        let content = strip_think_blocks(&raw_content);
        if content != raw_content.trim() {
            info!("stripped inline think blocks, {} chars remaining", content.len());
        }

        if content.is_empty() && !thinking.is_empty() {
            if let Some(extracted) = extract_from_thinking(&thinking) {
                warn!(
                    "content empty, recovered {} chars from thinking (best effort)",
                    extracted.len()
                );
                return Ok(extracted);
            }
        }

        Ok(content)
    }

    /// 以 keep_alive=0 从显存卸载模型, 失败只记录警告
    pub fn unload(&self, model: &str) {
        let request = self.http.post(self.endpoint("/api/chat")).json(&UnloadRequest {
            model,
            messages: [],
            keep_alive: 0,
        });

        match self.send(request, self.timeouts.unload) {
            Ok(resp) if resp.status().is_success() => info!("model '{model}' unloaded from VRAM"),
            Ok(resp) => warn!("failed to unload model: HTTP {}", resp.status().as_u16()),
            Err(e) => warn!("failed to unload model: {e}"),
        }
    }

    /// HTTP 错误状态的映射
    fn map_status(&self, status: StatusCode, body: String, model: &str) -> Error {
        if status.as_u16() == 524 {
            return Error::ProxyTimeout {
                url: self.base_url.clone(),
                model: model.to_string(),
            };
        }
        if status == StatusCode::NOT_FOUND || body.to_lowercase().contains("not found") {
            return Error::ModelNotFound {
                model: model.to_string(),
            };
        }
        Error::Http {
            status: status.as_u16(),
            body,
        }
    }
}

fn model_matches(local: &str, model: &str) -> bool {
    if local == model || local == format!("{model}:latest") {
        return true;
    }
    !model.contains(':') && local.split(':').next() == Some(model)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        io::{Read, Write},
        net::{TcpListener, TcpStream},
        sync::{Arc, Mutex},
        thread,
    };

    use serde_json::{json, Value};

    use super::*;

    /// 记录到的请求
    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub method: String,
        pub path: String,
        pub headers: String,
        pub body: String,
    }

    type Handler = dyn Fn(&Recorded) -> (u16, String) + Send + Sync;

    /// 进程内的固定应答 HTTP 服务
    pub struct CannedServer {
        pub url: String,
        pub requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl CannedServer {
        pub fn start<F>(handler: F) -> anyhow::Result<Self>
        where
            F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
        {
            let listener = TcpListener::bind("127.0.0.1:0")?;
            let url = format!("http://{}", listener.local_addr()?);
            let requests = Arc::new(Mutex::new(Vec::new()));

            let handler: Arc<Handler> = Arc::new(handler);
            let recorded = requests.clone();
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let handler = handler.clone();
                    let recorded = recorded.clone();
                    thread::spawn(move || {
                        let _ = serve(stream, handler.as_ref(), &recorded);
                    });
                }
            });

            Ok(Self { url, requests })
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().map(|v| v.clone()).unwrap_or_default()
        }
    }

    /// 读完一个请求的头部与正文
    fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<Recorded>> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                return Ok(None);
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let mut request_line = head.lines().next().unwrap_or_default().split(' ');
        let request = Recorded {
            method: request_line.next().unwrap_or_default().to_string(),
            path: request_line.next().unwrap_or_default().to_string(),
            headers: head.clone(),
            body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
        };
        Ok(Some(request))
    }

    fn serve(mut stream: TcpStream, handler: &Handler, recorded: &Mutex<Vec<Recorded>>) -> std::io::Result<()> {
        let Some(request) = read_request(&mut stream)? else {
            return Ok(());
        };
        if let Ok(mut v) = recorded.lock() {
            v.push(request.clone());
        }

        let (status, body) = handler(&request);
        let response = format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes())?;
        stream.flush()
    }

    /// 逐行慢速输出的 NDJSON 流, 不带 Content-Length, 以关闭连接结束
    fn slow_stream(lines: Vec<String>, gap: Duration) -> anyhow::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let url = format!("http://{}", listener.local_addr()?);
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            if !matches!(read_request(&mut stream), Ok(Some(_))) {
                return;
            }
            let head = "HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\nConnection: close\r\n\r\n";
            if stream.write_all(head.as_bytes()).and_then(|_| stream.flush()).is_err() {
                return;
            }
            for line in lines {
                thread::sleep(gap);
                let chunk = format!("{line}\n");
                if stream.write_all(chunk.as_bytes()).and_then(|_| stream.flush()).is_err() {
                    return;
                }
            }
        });
        Ok(url)
    }

    fn tags_body() -> String {
        json!({"models": [
            {"name": "llava:latest"},
            {"name": "qwen3-vl:8b"},
            {"name": "huihui_ai/qwen3-vl-abliterated:32b-instruct-q8_0"},
        ]})
        .to_string()
    }

    fn chat_request() -> ChatRequest {
        ChatRequest::new(
            "qwen3-vl:8b",
            vec![
                Message::system("sys"),
                Message::user("/nothink\n\nhello", vec!["aGk=".to_string()]),
            ],
            0.3,
            -1,
        )
    }

    #[test]
    fn test_model_matching() {
        assert!(model_matches("llava:latest", "llava"));
        assert!(model_matches("llava:latest", "llava:latest"));
        assert!(model_matches("qwen3-vl:8b", "qwen3-vl"));
        assert!(!model_matches("qwen3-vl:8b", "qwen3-vl:32b"));
        assert!(!model_matches("qwen3-vl:8b", "qwen3"));
    }

    #[test]
    fn test_model_exists_against_tags() -> anyhow::Result<()> {
        let server = CannedServer::start(|_| (200, tags_body()))?;
        let client = OllamaClient::new(&server.url)?;

        assert!(client.is_running());
        assert!(client.model_exists("llava"));
        assert!(client.model_exists(DEFAULT_MODEL));
        assert!(!client.model_exists("mistral"));

        let requests = server.requests();
        assert!(requests.iter().all(|r| r.path == "/api/tags" && r.method == "GET"));
        assert!(requests[0].headers.contains(USER_AGENT));
        Ok(())
    }

    #[test]
    fn test_unreachable_daemon() -> anyhow::Result<()> {
        let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
        let client = OllamaClient::new(&format!("http://127.0.0.1:{port}"))?;

        assert!(!client.is_running());
        assert!(!client.model_exists("llava"));
        assert!(matches!(
            client.ensure_model("llava"),
            Err(Error::DaemonNotRunning { .. })
        ));

        let err = client.chat(&chat_request()).err();
        assert!(matches!(err, Some(Error::Connection { .. })));
        assert!(err.is_some_and(|e| e.is_connectivity() && !e.is_timeout()));
        Ok(())
    }

    #[test]
    fn test_chat_status_mapping() -> anyhow::Result<()> {
        let server = CannedServer::start(|req| match req.body.contains("missing-model") {
            true => (404, r#"{"error":"model not found"}"#.to_string()),
            false => (524, "origin timeout".to_string()),
        })?;
        let client = OllamaClient::new(&server.url)?;

        let mut request = chat_request();
        request.model = "missing-model".to_string();
        assert!(matches!(
            client.chat(&request),
            Err(Error::ModelNotFound { model }) if model == "missing-model"
        ));

        let err = client.chat(&chat_request()).err();
        assert!(matches!(err, Some(Error::ProxyTimeout { .. })));
        assert!(err.is_some_and(|e| e.is_timeout()));
        Ok(())
    }

    #[test]
    fn test_chat_generic_http_error() -> anyhow::Result<()> {
        let server = CannedServer::start(|_| (500, "boom".to_string()))?;
        let client = OllamaClient::new(&server.url)?;

        assert!(matches!(
            client.chat(&chat_request()),
            Err(Error::Http { status: 500, body }) if body == "boom"
        ));
        Ok(())
    }

    #[test]
    fn test_chat_payload_and_content() -> anyhow::Result<()> {
        let server = CannedServer::start(|_| {
            let body = json!({
                "message": {"role": "assistant", "content": "<think>plan</think>\nPhoto of her."},
                "done_reason": "stop",
                "prompt_eval_count": 812,
                "eval_count": 64,
                "total_duration": 2_500_000_000u64,
            });
            (200, body.to_string())
        })?;
        let client = OllamaClient::new(&format!("{}/", server.url))?;

        let request = ChatRequest::new("qwen3-vl:8b", vec![Message::system("sys")], 0.3, 42).with_json_format();
        assert_eq!(client.chat(&request)?, "Photo of her.");

        let requests = server.requests();
        assert_eq!(requests[0].path, "/api/chat");
        let payload: Value = serde_json::from_str(&requests[0].body)?;
        assert_eq!(payload["stream"], json!(false));
        assert_eq!(payload["think"], json!(false));
        assert_eq!(payload["format"], json!("json"));
        assert_eq!(payload["options"]["seed"], json!(42));
        assert_eq!(payload["options"]["num_predict"], json!(-1));
        assert_eq!(payload["options"]["repeat_penalty"], json!(1.3));
        assert_eq!(payload["options"]["temperature"], json!(0.3));
        assert!(payload["messages"][0].get("images").is_none());
        Ok(())
    }

    #[test]
    fn test_chat_request_omits_unset_fields() -> anyhow::Result<()> {
        let payload = serde_json::to_value(chat_request())?;
        assert!(payload.get("format").is_none());
        assert!(payload["options"].get("seed").is_none());
        assert_eq!(payload["messages"][1]["images"], json!(["aGk="]));
        Ok(())
    }

    #[test]
    fn test_chat_recovers_from_thinking() -> anyhow::Result<()> {
        let server = CannedServer::start(|_| {
            let body = json!({"message": {
                "content": "",
                "thinking": "Draft: \"Photo of the character from the reference image, seated on a velvet sofa.\"",
            }});
            (200, body.to_string())
        })?;
        let client = OllamaClient::new(&server.url)?;

        assert_eq!(
            client.chat(&chat_request())?,
            "Photo of the character from the reference image, seated on a velvet sofa."
        );
        Ok(())
    }

    #[test]
    fn test_chat_unexpected_shape() -> anyhow::Result<()> {
        let server = CannedServer::start(|_| (200, r#"{"done": true}"#.to_string()))?;
        let client = OllamaClient::new(&server.url)?;

        assert!(matches!(
            client.chat(&chat_request()),
            Err(Error::UnexpectedResponse(body)) if body.contains("done")
        ));
        Ok(())
    }

    #[test]
    fn test_chat_timeout_is_distinct() -> anyhow::Result<()> {
        let server = CannedServer::start(|_| {
            thread::sleep(Duration::from_secs(3));
            (200, "{}".to_string())
        })?;
        let timeouts = Timeouts {
            chat: Duration::from_millis(300),
            ..Default::default()
        };
        let client = OllamaClient::with_timeouts(&server.url, timeouts)?;

        let err = client.chat(&chat_request()).err();
        assert!(matches!(err, Some(Error::Timeout { .. })));
        assert!(err.is_some_and(|e| e.is_timeout() && !e.is_connectivity()));
        Ok(())
    }

    #[test]
    fn test_pull_stream() -> anyhow::Result<()> {
        let server = CannedServer::start(|_| {
            let lines = [
                json!({"status": "pulling manifest"}),
                json!({"status": "downloading", "completed": 100, "total": 1000}),
                json!({"status": "downloading", "completed": 900, "total": 1000}),
                json!({"status": "success"}),
            ];
            let body = lines.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("\n");
            (200, format!("{body}\nnot json\n"))
        })?;
        let client = OllamaClient::new(&server.url)?;

        client.pull("llava")?;
        let payload: Value = serde_json::from_str(&server.requests()[0].body)?;
        assert_eq!(payload, json!({"name": "llava", "stream": true}));
        Ok(())
    }

    #[test]
    fn test_pull_errors() -> anyhow::Result<()> {
        let server = CannedServer::start(|req| match req.body.contains("bad-name") {
            true => (
                200,
                format!("{}\n{}", json!({"status": "pulling manifest"}), json!({"error": "file does not exist"})),
            ),
            false => (500, "registry down".to_string()),
        })?;
        let client = OllamaClient::new(&server.url)?;

        assert!(matches!(
            client.pull("bad-name"),
            Err(Error::PullFailed { reason, .. }) if reason == "file does not exist"
        ));
        assert!(matches!(
            client.pull("other"),
            Err(Error::PullFailed { reason, .. }) if reason == "HTTP 500: registry down"
        ));
        Ok(())
    }

    #[test]
    fn test_pull_outlives_stall_limit_while_progressing() -> anyhow::Result<()> {
        let mut lines = vec![json!({"status": "pulling manifest"}).to_string()];
        for completed in 1..=5 {
            lines.push(json!({"status": "downloading", "completed": completed * 100, "total": 500}).to_string());
        }
        lines.push(json!({"status": "success"}).to_string());

        let url = slow_stream(lines, Duration::from_millis(400))?;
        let timeouts = Timeouts {
            pull: Duration::from_secs(1),
            ..Default::default()
        };
        let client = OllamaClient::with_timeouts(&url, timeouts)?;

        // 总耗时约 2.8s, 每个间隔都在 1s 以内
        client.pull("big-model")?;
        Ok(())
    }

    #[test]
    fn test_pull_stall_is_timeout() -> anyhow::Result<()> {
        let lines = vec![
            json!({"status": "pulling manifest"}).to_string(),
            json!({"status": "success"}).to_string(),
        ];
        let url = slow_stream(lines, Duration::from_secs(2))?;
        let timeouts = Timeouts {
            pull: Duration::from_millis(500),
            ..Default::default()
        };
        let client = OllamaClient::with_timeouts(&url, timeouts)?;

        let err = client.pull("big-model").err();
        assert!(matches!(err, Some(Error::Timeout { .. })));
        assert!(err.is_some_and(|e| e.is_timeout() && !e.is_connectivity()));
        Ok(())
    }

    #[test]
    fn test_ensure_model_pulls_when_missing() -> anyhow::Result<()> {
        let server = CannedServer::start(|req| match req.path.as_str() {
            "/api/tags" => (200, tags_body()),
            _ => (200, json!({"status": "success"}).to_string()),
        })?;
        let client = OllamaClient::new(&server.url)?;

        client.ensure_model("llava")?;
        assert!(server.requests().iter().all(|r| r.path == "/api/tags"));

        client.ensure_model("mistral")?;
        assert!(server.requests().iter().any(|r| r.path == "/api/pull"));
        Ok(())
    }

    #[test]
    fn test_unload_payload() -> anyhow::Result<()> {
        let server = CannedServer::start(|_| (200, "{}".to_string()))?;
        let client = OllamaClient::new(&server.url)?;

        client.unload("llava");
        let payload: Value = serde_json::from_str(&server.requests()[0].body)?;
        assert_eq!(payload, json!({"model": "llava", "messages": [], "keep_alive": 0}));
        Ok(())
    }
}
