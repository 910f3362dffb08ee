//! 扩展词表
//!
//! 配置开启后从配置文件旁的 `extended_vocabulary.json` 读取:
//!
//! ```json
//! {
//!     "poses": { "label": "prose" },
//!     "actions": { "label": "prose" },
//!     "group_actions": { "label": "prose" }
//! }
//! ```
//!
//! 未开启或文件缺失时三张表均为空, 扩展查询退化为原样返回。

use std::{fs, path::Path};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{catalogs::Catalog, ExpansionTable};
use crate::config::PackConfig;

/// 扩展词表数据文件名
pub const EXTENDED_VOCABULARY_FILE: &str = "extended_vocabulary.json";

/// 扩展词表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedVocabulary {
    #[serde(default)]
    pub poses: ExpansionTable,
    #[serde(default)]
    pub actions: ExpansionTable,
    #[serde(default)]
    pub group_actions: ExpansionTable,
}

impl ExtendedVocabulary {
    /// 按配置加载, 未开启时返回空表
    pub fn load(config: &PackConfig) -> Self {
        if !config.extended_vocabulary {
            return Self::default();
        }

        let path = match &config.data_dir {
            Some(dir) => dir.join(EXTENDED_VOCABULARY_FILE),
            None => Path::new(EXTENDED_VOCABULARY_FILE).to_path_buf(),
        };
        Self::from_file(&path)
    }

    /// 读取数据文件, 失败时返回空表
    pub fn from_file(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(v) => v,
            Err(e) => {
                warn!("extended vocabulary {} not loaded, {e}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<ExtendedVocabulary>(&content) {
            Ok(vocab) => {
                info!(
                    "extended vocabulary loaded: {} poses, {} actions, {} group actions",
                    vocab.poses.len(),
                    vocab.actions.len(),
                    vocab.group_actions.len()
                );
                vocab
            }
            Err(e) => {
                warn!("malformed extended vocabulary {}, {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty() && self.actions.is_empty() && self.group_actions.is_empty()
    }

    /// 依次查姿势、动作、多人动作表, 均未命中时原样返回
    pub fn expand<'a>(&'a self, label: &'a str) -> &'a str {
        self.poses
            .get(label)
            .or_else(|| self.actions.get(label))
            .or_else(|| self.group_actions.get(label))
            .unwrap_or(label)
    }

    pub fn pose_catalog(&self) -> Catalog {
        Catalog::sorted("extended_pose", &self.poses.labels().collect::<Vec<_>>())
    }

    pub fn action_catalog(&self) -> Catalog {
        Catalog::sorted("extended_action", &self.actions.labels().collect::<Vec<_>>())
    }

    pub fn group_action_catalog(&self) -> Catalog {
        Catalog::sorted(
            "extended_group_action",
            &self.group_actions.labels().collect::<Vec<_>>(),
        )
    }
}
