//! Claude Code CLI 调用

use std::{
    env,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::Duration,
};

use log::{error, info};
use strum_macros::{Display, EnumIter, EnumString};
use tempfile::NamedTempFile;
use wait_timeout::ChildExt;

use super::ReferenceImage;
use crate::error::Error;

/// CLI 的默认超时
pub const CLI_TIMEOUT: Duration = Duration::from_secs(300);
/// 嵌套会话标记, 子进程中移除
const NESTED_SESSION_ENV: &str = "CLAUDECODE";
const STDERR_LIMIT: usize = 300;

/// 可选模型
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum ClaudeModel {
    #[default]
    #[strum(to_string = "opus")]
    Opus,
    #[strum(to_string = "sonnet")]
    Sonnet,
    #[strum(to_string = "haiku")]
    Haiku,
}

impl ClaudeModel {
    pub fn options() -> Vec<String> {
        use strum::IntoEnumIterator;
        Self::iter().map(|v| v.to_string()).collect()
    }
}

fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        true
    }
}

fn binary_names() -> &'static [&'static str] {
    if cfg!(windows) {
        &["claude.cmd", "claude.exe", "claude"]
    } else {
        &["claude"]
    }
}

/// 常见安装位置
fn install_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let home = dirs::home_dir();

    if cfg!(windows) {
        if let Some(appdata) = env::var_os("APPDATA") {
            candidates.push(PathBuf::from(appdata).join("npm").join("claude.cmd"));
        }
        if let Some(local) = env::var_os("LOCALAPPDATA") {
            let local = PathBuf::from(local);
            candidates.push(local.join("Programs").join("claude").join("claude.exe"));
            candidates.push(local.join("fnm_multishells").join("claude.cmd"));
        }
        if let Some(home) = home {
            candidates.push(home.join(".local").join("bin").join("claude.cmd"));
            candidates.push(home.join(".local").join("bin").join("claude.exe"));
        }
    } else {
        if let Some(home) = home {
            candidates.push(home.join(".local").join("bin").join("claude"));
            candidates.push(home.join(".npm-global").join("bin").join("claude"));
        }
        candidates.push(PathBuf::from("/usr/local/bin/claude"));
        candidates.push(PathBuf::from("/opt/homebrew/bin/claude"));
    }
    candidates
}

/// 查找 claude 可执行文件: 先搜索 PATH, 再看常见安装位置
pub fn find_claude() -> Option<PathBuf> {
    let from_path = env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .flat_map(|dir| binary_names().iter().map(move |name| dir.join(name)))
            .find(|path| is_executable(path))
    });

    from_path.or_else(|| install_candidates().into_iter().find(|path| is_executable(path)))
}

/// Claude Code CLI 调用器
#[derive(Debug, Clone)]
pub struct ClaudeCodeCli {
    binary: Option<PathBuf>,
    model: ClaudeModel,
    timeout: Duration,
}

impl ClaudeCodeCli {
    pub fn new(model: ClaudeModel) -> Self {
        Self {
            binary: None,
            model,
            timeout: CLI_TIMEOUT,
        }
    }

    /// 指定可执行文件, 跳过查找
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> ClaudeModel {
        self.model
    }

    /// 单次调用, 返回去掉首尾空白的标准输出
    ///
    /// 参考图写入临时文件, 在提示词中以路径引用; 临时文件在返回前删除。
    pub fn run(&self, system_prompt: &str, user_prompt: &str, images: &[ReferenceImage]) -> Result<String, Error> {
        let binary = match &self.binary {
            Some(v) => v.clone(),
            None => find_claude().ok_or(Error::CliNotFound)?,
        };

        let mut temp_files: Vec<NamedTempFile> = Vec::with_capacity(images.len());
        let mut image_lines = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let mut file = tempfile::Builder::new()
                .prefix(&format!("kppb_img{i}_"))
                .suffix(".png")
                .tempfile()?;
            file.write_all(&image.png)?;
            file.flush()?;
            image_lines.push(format!(
                "[Image {} ({}): {}]",
                i + 1,
                image.role.label(),
                file.path().display()
            ));
            temp_files.push(file);
        }

        let mut prompt = String::new();
        if !image_lines.is_empty() {
            prompt.push_str(&image_lines.join("\n"));
            prompt.push_str("\n\n");
        }
        prompt.push_str(user_prompt);

        let model = self.model.to_string();
        info!("calling claude code cli (model={model}, images={})", images.len());

        let mut child = Command::new(&binary)
            .arg("-p")
            .arg(&prompt)
            .arg("--append-system-prompt")
            .arg(system_prompt)
            .arg("--model")
            .arg(&model)
            .args(["--output-format", "text", "--max-turns", "1"])
            .arg("--dangerously-skip-permissions")
            .env_remove(NESTED_SESSION_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::CliNotFound,
                _ => Error::Io(e),
            })?;

        let stdout = read_in_background(child.stdout.take());
        let stderr = read_in_background(child.stderr.take());

        let Some(status) = child.wait_timeout(self.timeout)? else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::CliTimeout {
                seconds: self.timeout.as_secs(),
            });
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            let stderr = stderr.trim();
            error!("claude code cli error (code {code}): {stderr}");
            return Err(Error::CliFailed {
                code,
                stderr: stderr.chars().take(STDERR_LIMIT).collect(),
            });
        }

        let content = stdout.trim().to_string();
        info!("claude code cli response ({} chars)", content.len());
        drop(temp_files);
        Ok(content)
    }
}

/// 在线程中读完管道, 避免缓冲区写满导致子进程阻塞
fn read_in_background<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            let mut bytes = Vec::new();
            let _ = pipe.read_to_end(&mut bytes);
            text = String::from_utf8_lossy(&bytes).to_string();
        }
        text
    })
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt};

    use super::*;
    use crate::refiner::ImageRole;

    fn fake_cli(dir: &Path, script: &str) -> anyhow::Result<PathBuf> {
        let path = dir.join("claude");
        fs::write(&path, format!("#!/bin/sh\n{script}\n"))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    fn images() -> Vec<ReferenceImage> {
        vec![
            ReferenceImage {
                role: ImageRole::Character,
                png: vec![0x89, b'P', b'N', b'G'],
            },
            ReferenceImage {
                role: ImageRole::Prop,
                png: vec![0x89, b'P', b'N', b'G'],
            },
        ]
    }

    /// 提示词中引用的临时图片路径
    fn referenced_images(prompt: &str) -> Vec<PathBuf> {
        prompt
            .lines()
            .filter_map(|line| line.split_once("): "))
            .map(|(_, rest)| PathBuf::from(rest.trim_end_matches(']')))
            .collect()
    }

    /// 先把 `-p` 参数写入旁路文件, 再执行后续脚本
    fn recording_cli(dir: &Path, then: &str) -> anyhow::Result<(PathBuf, PathBuf)> {
        let record = dir.join("prompt.txt");
        let cli = fake_cli(dir, &format!("printf '%s' \"$2\" > '{}'\n{then}", record.display()))?;
        Ok((cli, record))
    }

    #[test]
    fn test_model_options() {
        assert_eq!(ClaudeModel::options(), vec!["opus", "sonnet", "haiku"]);
        assert_eq!("sonnet".parse::<ClaudeModel>().ok(), Some(ClaudeModel::Sonnet));
    }

    #[test]
    fn test_arguments_and_temp_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        // 逐行输出参数
        let cli = fake_cli(dir.path(), r#"for arg in "$@"; do printf '%s\n' "$arg"; done"#)?;

        let runner = ClaudeCodeCli::new(ClaudeModel::Haiku).with_binary(&cli);
        let output = runner.run("SYSTEM", "do the thing", &images())?;

        assert!(output.starts_with("-p\n[Image 1 (CHARACTER REFERENCE): "));
        assert!(output.contains("[Image 2 (PROP/PRODUCT REFERENCE): "));
        assert!(output.contains(".png]\n\ndo the thing\n--append-system-prompt\nSYSTEM\n"));
        assert!(output.ends_with(
            "--model\nhaiku\n--output-format\ntext\n--max-turns\n1\n--dangerously-skip-permissions"
        ));

        let paths = referenced_images(&output);
        assert_eq!(paths.len(), 2);
        for path in paths {
            let name = path.file_name().and_then(|v| v.to_str()).unwrap_or_default();
            assert!(name.starts_with("kppb_img") && name.ends_with(".png"));
            assert!(!path.exists());
        }
        Ok(())
    }

    #[test]
    fn test_nested_session_marker_removed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cli = fake_cli(dir.path(), r#"printf '%s' "${CLAUDECODE:-unset}""#)?;

        env::set_var(NESTED_SESSION_ENV, "1");
        let output = ClaudeCodeCli::new(ClaudeModel::Opus).with_binary(&cli).run("s", "u", &[])?;
        assert_eq!(output, "unset");
        Ok(())
    }

    #[test]
    fn test_missing_binary() {
        let runner = ClaudeCodeCli::new(ClaudeModel::Opus).with_binary("/nonexistent/kppb/claude");
        assert!(matches!(runner.run("s", "u", &[]), Err(Error::CliNotFound)));
    }

    #[test]
    fn test_non_zero_exit() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let (cli, record) = recording_cli(dir.path(), "echo '  quota exceeded  ' >&2\nexit 3")?;

        let result = ClaudeCodeCli::new(ClaudeModel::Opus).with_binary(&cli).run("s", "u", &images());
        assert!(matches!(
            result,
            Err(Error::CliFailed { code: 3, stderr }) if stderr == "quota exceeded"
        ));

        let paths = referenced_images(&fs::read_to_string(record)?);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|path| !path.exists()));
        Ok(())
    }

    #[test]
    fn test_timeout() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let (cli, record) = recording_cli(dir.path(), "exec sleep 5")?;

        let err = ClaudeCodeCli::new(ClaudeModel::Opus)
            .with_binary(&cli)
            .with_timeout(Duration::from_millis(1500))
            .run("s", "u", &images())
            .err();
        assert!(matches!(err, Some(Error::CliTimeout { .. })));
        assert!(err.is_some_and(|e| e.is_timeout()));

        let paths = referenced_images(&fs::read_to_string(record)?);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|path| !path.exists()));
        Ok(())
    }
}
