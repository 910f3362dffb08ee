//! 插件配置
//!
//! `config.json` 只识别一个布尔选项, 用于开启扩展词表:
//!
//! ```json
//! { "extended_vocabulary": true }
//! ```
//!
//! 旧版本使用的 `"nsfw"` 键同样可用。文件缺失或格式错误时按未开启处理。

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// 配置文件路径的环境变量
pub const CONFIG_ENV: &str = "KPPB_CONFIG";
/// 配置文件名, 与扩展模块位于同一目录
pub const CONFIG_FILE: &str = "config.json";
/// 模块目录未知时, 相对 ComfyUI 根目录的默认配置路径
pub const DEFAULT_CONFIG_PATH: &str = "custom_nodes/comfyui_kppb/config.json";

/// 扩展模块所在目录, 模块导入时设置一次
static MODULE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// 记录扩展模块所在目录, 仅第一次设置生效
pub fn set_module_dir(dir: impl Into<PathBuf>) {
    let dir = dir.into();
    debug!("kppb module dir: {}", dir.display());
    let _ = MODULE_DIR.set(dir);
}

/// 配置文件中的原始键, 两个键任一为 true 即开启
#[derive(Debug, Deserialize)]
struct RawConfig {
    extended_vocabulary: Option<bool>,
    nsfw: Option<bool>,
}

impl From<RawConfig> for PackConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            extended_vocabulary: raw.extended_vocabulary.unwrap_or(false) || raw.nsfw.unwrap_or(false),
            data_dir: None,
        }
    }
}

/// 插件配置
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawConfig")]
pub struct PackConfig {
    /// 扩展词表开关
    pub extended_vocabulary: bool,

    /// 配置文件所在目录, 扩展词表数据文件与其相邻
    #[serde(skip)]
    pub data_dir: Option<PathBuf>,
}

impl PackConfig {
    /// 从指定文件加载, 永不失败
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let data_dir = path.parent().map(Path::to_path_buf);

        let content = match fs::read_to_string(path) {
            Ok(v) => v,
            Err(e) => {
                debug!("config {} not loaded, {e}", path.display());
                return Self {
                    data_dir,
                    ..Default::default()
                };
            }
        };

        match serde_json::from_str::<PackConfig>(&content) {
            Ok(mut config) => {
                config.data_dir = data_dir;
                config
            }
            Err(e) => {
                warn!("malformed config {}, {e}", path.display());
                Self {
                    data_dir,
                    ..Default::default()
                }
            }
        }
    }

    /// 查找配置文件: 先看环境变量, 再看扩展模块目录
    pub fn discover() -> Self {
        Self::load(Self::discover_path())
    }

    pub fn discover_path() -> PathBuf {
        Self::resolve_path(env::var_os(CONFIG_ENV), MODULE_DIR.get().map(PathBuf::as_path))
    }

    /// 环境变量优先, 其次模块目录下的 `config.json`, 都没有时相对工作目录
    pub fn resolve_path(env_path: Option<OsString>, module_dir: Option<&Path>) -> PathBuf {
        match (env_path, module_dir) {
            (Some(path), _) if !path.is_empty() => PathBuf::from(path),
            (_, Some(dir)) => dir.join(CONFIG_FILE),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// 开启扩展词表的配置, 数据从 `data_dir` 读取
    pub fn extended(data_dir: Option<PathBuf>) -> Self {
        Self {
            extended_vocabulary: true,
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_file_defaults_to_inactive() {
        let config = PackConfig::load("/nonexistent/kppb/config.json");
        assert!(!config.extended_vocabulary);
        assert_eq!(config.data_dir, Some(PathBuf::from("/nonexistent/kppb")));
    }

    #[test]
    fn test_malformed_file_defaults_to_inactive() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"{ extended_vocabulary: yes")?;

        let config = PackConfig::load(file.path());
        assert!(!config.extended_vocabulary);
        Ok(())
    }

    #[test]
    fn test_enabled_with_legacy_key() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{"nsfw": true}"#)?;

        let config = PackConfig::load(file.path());
        assert!(config.extended_vocabulary);
        Ok(())
    }

    #[test]
    fn test_either_key_enables() -> anyhow::Result<()> {
        for (content, expected) in [
            (r#"{"nsfw": true, "extended_vocabulary": false}"#, true),
            (r#"{"extended_vocabulary": true, "nsfw": false}"#, true),
            (r#"{"extended_vocabulary": true, "nsfw": true}"#, true),
            (r#"{"extended_vocabulary": false, "nsfw": false}"#, false),
            ("{}", false),
        ] {
            let mut file = tempfile::NamedTempFile::new()?;
            file.write_all(content.as_bytes())?;
            assert_eq!(PackConfig::load(file.path()).extended_vocabulary, expected, "{content}");
        }
        Ok(())
    }

    #[test]
    fn test_resolve_path_order() {
        let module_dir = Path::new("/opt/ComfyUI/custom_nodes/comfyui_kppb");

        assert_eq!(
            PackConfig::resolve_path(Some(OsString::from("/etc/kppb.json")), Some(module_dir)),
            PathBuf::from("/etc/kppb.json")
        );
        assert_eq!(
            PackConfig::resolve_path(Some(OsString::new()), Some(module_dir)),
            module_dir.join(CONFIG_FILE)
        );
        assert_eq!(PackConfig::resolve_path(None, Some(module_dir)), module_dir.join(CONFIG_FILE));
        assert_eq!(PackConfig::resolve_path(None, None), PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_enabled_and_unknown_keys_ignored() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(br#"{"extended_vocabulary": true, "theme": "dark"}"#)?;

        let config = PackConfig::load(file.path());
        assert!(config.extended_vocabulary);
        assert_eq!(config.data_dir.as_deref(), file.path().parent());
        Ok(())
    }
}
