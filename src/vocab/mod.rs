//! 词表
//!
//! 下拉选项集合与短标签到描述性文本的扩展表。

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod catalogs;
pub mod edit;
pub mod extended;
pub mod photo;
pub mod wardrobe;

pub use extended::ExtendedVocabulary;

/// 沿用参考图, 不覆盖
pub const REFERENCE: &str = "as in reference";
/// 构建时随机选择一个具体选项
pub const RANDOM: &str = "random";
/// 自由文本转义值
pub const CUSTOM: &str = "custom";
/// 服装类别的空选项
pub const NONE: &str = "none";

/// 身份锁定语句, 要求严格保持参考图中人物的外貌
pub const IDENTITY_LOCK_PROMPT: &str = "Maintain exact likeness, identical facial structure, bone structure, \
eye shape, eye color, nose, lips, jawline, skin tone, breast size \
and shape, body proportions, and all identifying marks from the \
character reference";

/// 是否为参考图哨兵值
pub fn is_reference(value: &str) -> bool {
    value == REFERENCE
}

/// 是否为哨兵值 (参考图/随机/自定义)
pub fn is_sentinel(value: &str) -> bool {
    matches!(value, REFERENCE | RANDOM | CUSTOM)
}

/// 下拉选择字段
///
/// 选项总是以 [`REFERENCE`] 和 [`RANDOM`] 开头。
#[derive(Debug, Clone)]
pub struct SelectionField {
    name: &'static str,
    options: Vec<&'static str>,
}

impl SelectionField {
    /// 具体选项前自动加上两个哨兵值
    pub fn new(name: &'static str, concrete: &[&'static str]) -> Self {
        let mut options = Vec::with_capacity(concrete.len() + 2);
        options.push(REFERENCE);
        options.push(RANDOM);
        options.extend_from_slice(concrete);
        Self { name, options }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 完整下拉选项
    pub fn options(&self) -> &[&'static str] {
        &self.options
    }

    /// 可被随机选中的选项
    pub fn concrete(&self) -> Vec<&'static str> {
        self.options
            .iter()
            .copied()
            .filter(|v| !is_sentinel(v))
            .collect()
    }

    /// 解析随机哨兵值, 其他值原样返回
    ///
    /// 没有具体选项时退回 [`REFERENCE`]。
    pub fn resolve<R: Rng>(&self, value: &str, rng: &mut R) -> String {
        if value != RANDOM {
            return value.to_string();
        }

        let concrete = self.concrete();
        if concrete.is_empty() {
            return REFERENCE.to_string();
        }
        concrete[rng.random_range(0..concrete.len())].to_string()
    }
}

/// 扩展表: 短标签 -> 描述性文本
///
/// 查询不到时返回原标签。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionTable(IndexMap<String, String>);

impl ExpansionTable {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    /// 带回退的查询
    pub fn expand<'a>(&'a self, label: &'a str) -> &'a str {
        self.get(label).unwrap_or(label)
    }

    /// 标签, 保持插入顺序
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
