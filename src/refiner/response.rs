//! 模型输出的清理与解析

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    prompt::prose::ensure_period,
    vocab::{is_reference, IDENTITY_LOCK_PROMPT},
};

/// 完全失败时的占位提示词
pub const FALLBACK_PROMPT: &str = "photorealistic portrait.";
/// 训练标注中的触发词占位符
pub const TRIGGER_PLACEHOLDER: &str = "[trigger]";
/// 旧版数据集输出的分隔符
pub const CAPTION_DELIMITER: &str = "---CAPTION---";

/// 文件名前缀取值的字段, 按优先级
const SLUG_KEYS: [&str; 5] = ["shot_type", "pose", "scene_type", "lighting_setup", "photo_style"];
const SLUG_MAX_LEN: usize = 80;

lazy_static! {
    static ref THINK_BLOCK: Regex = Regex::new(r"(?s)<think>.*?</think>\s*").expect("valid regex");
    static ref LONG_QUOTE: Regex = Regex::new(r#""([^"]{50,})""#).expect("valid regex");
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").expect("valid regex");
}

/// 去掉内联的 `<think>...</think>` 推理块
pub fn strip_think_blocks(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").trim().to_string()
}

/// 去掉 markdown 代码围栏所在的行
pub fn strip_code_fences(text: &str) -> String {
    if !text.starts_with("```") {
        return text.to_string();
    }
    text.lines()
        .filter(|line| !line.trim().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// 去掉推理块、一对包裹引号与代码围栏
pub fn clean_response(text: &str) -> String {
    let mut result = strip_think_blocks(text);
    if result.len() >= 2 && result.starts_with('"') && result.ends_with('"') {
        result = result[1..result.len() - 1].to_string();
    }
    strip_code_fences(&result)
}

/// 折叠连续重复 4 次及以上的单词
///
/// 单词之间以单个空格分隔, 每次重复都必须在单词边界结束,
/// 因此 `soft soft soft soft.` 折叠为 `soft.`, 尾随标点保留。
fn collapse_repeated_words(text: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if !is_word(c) {
            out.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let word_len = rest.find(|c: char| !is_word(c)).unwrap_or(rest.len());
        let word = &rest[..word_len];
        let mut end = word_len;
        let mut repeats = 0;
        while let Some(next) = rest[end..].strip_prefix(' ').and_then(|v| v.strip_prefix(word)) {
            if next.chars().next().is_some_and(is_word) {
                break;
            }
            end += 1 + word.len();
            repeats += 1;
        }

        out.push_str(word);
        rest = if repeats >= 3 { &rest[end..] } else { &rest[word_len..] };
    }
    out
}

/// 从推理字段中恢复最终草稿
///
/// 仅在正文为空时使用的尽力回退: 取最后一段 50 字符以上的引号内文本,
/// 结果是有损的, 可靠性不及直接返回的正文。
pub fn extract_from_thinking(thinking: &str) -> Option<String> {
    let last = LONG_QUOTE
        .captures_iter(thinking)
        .filter_map(|caps| caps.get(1))
        .last()?;
    let result = collapse_repeated_words(last.as_str().trim());
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

/// 数据集模式的输出
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOutput {
    pub prompt: String,
    pub caption: String,
}

#[derive(Debug, Deserialize)]
struct DatasetJson {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    caption: String,
}

/// 解析数据集输出
///
/// 先按 JSON 解析, 失败时尝试旧版分隔符格式, 都失败返回 None。
pub fn parse_dataset(text: &str, trigger_word: &str) -> Option<DatasetOutput> {
    let text = strip_code_fences(text.trim());

    if let Ok(data) = serde_json::from_str::<DatasetJson>(&text) {
        let prompt = data.prompt.trim();
        if !prompt.is_empty() {
            let caption = data.caption.trim().replace(TRIGGER_PLACEHOLDER, trigger_word);
            return Some(DatasetOutput {
                prompt: ensure_period(prompt),
                caption: ensure_period(&caption),
            });
        }
    }

    let (prompt, caption) = text.split_once(CAPTION_DELIMITER)?;
    let caption = caption.trim().replace(TRIGGER_PLACEHOLDER, trigger_word);
    Some(DatasetOutput {
        prompt: ensure_period(prompt),
        caption: ensure_period(&caption),
    })
}

/// 追加身份锁定语句
pub fn append_identity_lock(text: &str) -> String {
    let base = text.trim_end_matches(['.', ' ']);
    format!("{base}. {IDENTITY_LOCK_PROMPT}.")
}

/// 最终提示词
///
/// 补句号; 为空时依次回退到调用方提供的正向提示词与占位提示词。
pub fn finalize_prompt(text: &str, positive_prompt: &str, preserve_identity: bool) -> String {
    let mut result = ensure_period(text);
    if result.is_empty() || result == "." {
        let positive = positive_prompt.trim();
        if positive.is_empty() {
            warn!("model returned empty, using minimal fallback");
            result = FALLBACK_PROMPT.to_string();
        } else {
            info!("model returned empty, passing through positive prompt ({} chars)", positive.len());
            result = positive.to_string();
        }
    }

    if preserve_identity {
        result = append_identity_lock(&result);
    }
    result
}

/// 由场景设置生成文件名前缀
pub fn filename_prefix(prompt_json: &str, mode: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !prompt_json.trim().is_empty() {
        let data = serde_json::from_str::<Value>(prompt_json).unwrap_or(Value::Null);
        for key in SLUG_KEYS {
            if let Some(value) = data.get(key).and_then(Value::as_str) {
                if !value.is_empty() && !is_reference(value) {
                    parts.push(value.to_string());
                }
            }
        }
    }

    if parts.is_empty() {
        parts.push(if mode.is_empty() {
            "img".to_string()
        } else {
            mode.replace(' ', "_")
        });
    }

    let slug = parts.join("_").to_lowercase();
    let slug = NON_ALNUM.replace_all(&slug, "_");
    let slug = slug.trim_matches('_');
    if slug.len() > SLUG_MAX_LEN {
        slug[..SLUG_MAX_LEN].trim_end_matches('_').to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_think_blocks() {
        let text = "<think>\nplanning...\n</think>\n\nPhoto of a woman <think>x</think> smiling";
        assert_eq!(strip_think_blocks(text), "Photo of a woman smiling");
    }

    #[test]
    fn test_clean_response() {
        assert_eq!(clean_response("\"Photo of her.\""), "Photo of her.");
        assert_eq!(clean_response("```\nPhoto of her.\n```"), "Photo of her.");
        assert_eq!(clean_response("```text\nline one\nline two\n```"), "line one\nline two");
        assert_eq!(clean_response("\""), "\"");
    }

    #[test]
    fn test_extract_last_long_quote() {
        let thinking = r#"First draft: "Photo of the character from the reference image, standing by a window."
            Better: "Photo of the character from the reference image, leaning on a railing at golden hour."
            short: "ok""#;
        assert_eq!(
            extract_from_thinking(thinking).as_deref(),
            Some("Photo of the character from the reference image, leaning on a railing at golden hour.")
        );
        assert_eq!(extract_from_thinking("no quotes here"), None);
    }

    #[test]
    fn test_degeneration_guard() {
        assert_eq!(
            collapse_repeated_words("soft soft soft soft soft light and and and warm"),
            "soft light and and and warm"
        );
        assert_eq!(
            collapse_repeated_words("soft soft soft soft. very very very very, nice"),
            "soft. very, nice"
        );
        assert_eq!(collapse_repeated_words("glow glow glow glow"), "glow");
        // 末尾不是单词边界时不算重复
        assert_eq!(collapse_repeated_words("no no no nope"), "no no no nope");
        assert_eq!(collapse_repeated_words("no no no no nope"), "no nope");
        assert_eq!(collapse_repeated_words("a-b b b b, c"), "a-b, c");
        assert_eq!(collapse_repeated_words("café café café café!"), "café!");
    }

    #[test]
    fn test_parse_dataset_json_in_fence() {
        let text = "```json\n{\"prompt\":\"P\",\"caption\":\"[trigger] C\"}\n```";
        assert_eq!(
            parse_dataset(text, "ohwx"),
            Some(DatasetOutput {
                prompt: "P.".to_string(),
                caption: "ohwx C.".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_dataset_legacy_delimiter() {
        let text = "A photo of her in a cafe\n---CAPTION---\n[trigger], sitting in a cafe";
        assert_eq!(
            parse_dataset(text, "sks"),
            Some(DatasetOutput {
                prompt: "A photo of her in a cafe.".to_string(),
                caption: "sks, sitting in a cafe.".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_dataset_failures() {
        assert_eq!(parse_dataset(r#"{"prompt": "", "caption": "x"}"#, "t"), None);
        assert_eq!(parse_dataset("just prose", "t"), None);
        assert_eq!(parse_dataset("[1, 2]", "t"), None);
    }

    #[test]
    fn test_finalize_prompt() {
        assert_eq!(finalize_prompt("Photo of her", "", false), "Photo of her.");
        assert_eq!(finalize_prompt("", "  Photo from builder.  ", false), "Photo from builder.");
        assert_eq!(finalize_prompt("", "", false), FALLBACK_PROMPT);
        assert_eq!(
            finalize_prompt("Photo of her. ", "", true),
            format!("Photo of her. {IDENTITY_LOCK_PROMPT}.")
        );
    }

    #[test]
    fn test_filename_prefix() {
        let json = r#"{"shot_type": "full body", "pose": "", "scene_type": "bar/club",
                       "lighting_setup": "as in reference", "photo_style": "Neon Night"}"#;
        assert_eq!(filename_prefix(json, "describe & enhance"), "full_body_bar_club_neon_night");
        assert_eq!(filename_prefix("", "caption only"), "caption_only");
        assert_eq!(filename_prefix("not json", ""), "img");
        assert_eq!(filename_prefix("{}", "describe & enhance"), "describe_enhance");

        let long = format!(r#"{{"shot_type": "{}"}}"#, "ab ".repeat(60));
        let slug = filename_prefix(&long, "");
        assert!(slug.len() <= 80);
        assert!(!slug.ends_with('_'));
    }
}
