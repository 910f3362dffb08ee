//! 图像编辑指令组合
//!
//! 三个编辑槽位, 加上快捷效果、保留说明与身份锁定。

use log::warn;
use serde::{Deserialize, Serialize};

use super::prose::upper_first;
use crate::vocab::{
    edit::{EditKind, QUICK_EFFECTS},
    IDENTITY_LOCK_PROMPT, NONE,
};

/// 已经是保留类指令的前缀
const PRESERVE_VERBS: [&str; 5] = ["keep ", "preserve ", "maintain ", "don't ", "do not "];

/// 编辑槽位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditSlot {
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    pub value: String,
    pub location: String,
}

impl EditSlot {
    pub fn new(kind: EditKind, target: &str, value: &str, location: &str) -> Self {
        Self {
            kind: kind.to_string(),
            target: target.to_string(),
            value: value.to_string(),
            location: location.to_string(),
        }
    }

    /// 组合单条指令, 缺少必填字段或类型未知时返回 None
    pub fn compose(&self) -> Option<String> {
        let kind = self.kind.parse::<EditKind>().ok()?;
        let target = self.target.trim();
        let value = self.value.trim();
        let location = self.location.trim();
        let loc = if location.is_empty() {
            String::new()
        } else {
            format!(" {location}")
        };

        if target.is_empty() && value.is_empty() {
            return None;
        }

        let instruction = match kind {
            EditKind::AddElement | EditKind::AddEffect if !value.is_empty() => {
                format!("Add {value}{loc}")
            }
            EditKind::RemoveElement if !target.is_empty() => format!("Remove {target}{loc}"),
            EditKind::ReplaceElement if !target.is_empty() && !value.is_empty() => {
                format!("Replace {target} with {value}{loc}")
            }
            EditKind::ChangeStyle if !value.is_empty() => format!("Turn into {value} style"),
            EditKind::ChangeEnvironment | EditKind::ChangeOutfit if value.is_empty() => {
                return None
            }
            EditKind::ChangeEnvironment | EditKind::ChangeOutfit if !target.is_empty() => {
                format!("Change {target} to {value}")
            }
            EditKind::ChangeEnvironment => format!("Change the environment to {value}"),
            EditKind::ChangeOutfit => format!("Change the outfit to {value}"),
            EditKind::ChangeHair if !value.is_empty() => format!("Change the hair to {value}"),
            EditKind::ChangeMakeup if !value.is_empty() => format!("Change the makeup to {value}"),
            EditKind::Custom if !value.is_empty() => value.to_string(),
            _ => return None,
        };
        Some(instruction)
    }
}

/// 编辑请求
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    pub slots: [EditSlot; 3],
    pub quick_effect: String,
    pub preserve_note: String,
    pub preserve_identity: bool,
}

impl Default for EditRequest {
    fn default() -> Self {
        Self {
            slots: [
                EditSlot::new(EditKind::ReplaceElement, "", "", ""),
                EditSlot::new(EditKind::AddElement, "", "", ""),
                EditSlot::new(EditKind::AddElement, "", "", ""),
            ],
            quick_effect: NONE.to_string(),
            preserve_note: String::new(),
            preserve_identity: true,
        }
    }
}

/// 编辑记录, 原始槽位值与组合结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub edit_1: EditSlot,
    pub edit_2: EditSlot,
    pub edit_3: EditSlot,
    pub ig_quick_effect: String,
    pub preserve_identity: bool,
    pub preserve_note: String,
    pub composed_prompt: String,
}

impl EditRequest {
    /// 有序指令列表
    pub fn instructions(&self) -> Vec<String> {
        let mut instructions = self
            .slots
            .iter()
            .filter_map(EditSlot::compose)
            .collect::<Vec<String>>();

        if let Some(effect) = QUICK_EFFECTS.get(&self.quick_effect) {
            if !effect.is_empty() {
                instructions.push(effect.to_string());
            }
        }

        let note = self.preserve_note.trim();
        if !note.is_empty() {
            let lower = note.to_lowercase();
            if PRESERVE_VERBS.iter().any(|verb| lower.starts_with(verb)) {
                instructions.push(upper_first(note));
            } else {
                instructions.push(format!("Keep {note}"));
            }
        }

        if self.preserve_identity {
            instructions.push(IDENTITY_LOCK_PROMPT.to_string());
        }
        instructions
    }

    /// 返回 (编辑提示词, JSON 记录)
    pub fn compose(&self) -> (String, String) {
        let mut prompt = self.instructions().join(". ");
        if !prompt.is_empty() && !prompt.ends_with('.') {
            prompt.push('.');
        }

        let [edit_1, edit_2, edit_3] = self.slots.clone();
        let record = EditRecord {
            edit_1,
            edit_2,
            edit_3,
            ig_quick_effect: self.quick_effect.clone(),
            preserve_identity: self.preserve_identity,
            preserve_note: self.preserve_note.clone(),
            composed_prompt: prompt.clone(),
        };
        let json = serde_json::to_string_pretty(&record).unwrap_or_else(|e| {
            warn!("edit record serialization failed, {e}");
            String::new()
        });
        (prompt, json)
    }
}
