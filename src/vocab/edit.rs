//! 图像编辑类型与快捷效果

use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{ExpansionTable, NONE};

/// 编辑类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum EditKind {
    #[strum(to_string = "add element")]
    AddElement,
    #[strum(to_string = "remove element")]
    RemoveElement,
    #[strum(to_string = "replace element")]
    ReplaceElement,
    #[strum(to_string = "change style")]
    ChangeStyle,
    #[strum(to_string = "change environment")]
    ChangeEnvironment,
    #[strum(to_string = "change outfit")]
    ChangeOutfit,
    #[strum(to_string = "change hair")]
    ChangeHair,
    #[strum(to_string = "change makeup")]
    ChangeMakeup,
    #[strum(to_string = "add effect")]
    AddEffect,
    /// 原样使用 value
    #[strum(to_string = "custom")]
    Custom,
}

impl EditKind {
    /// 下拉选项, 按声明顺序
    pub fn options() -> Vec<String> {
        EditKind::iter().map(|v| v.to_string()).collect()
    }
}

lazy_static! {
    /// IG 快捷效果
    pub static ref QUICK_EFFECTS: ExpansionTable = ExpansionTable::from_pairs(&[
        (NONE, ""),
        ("add rain", "Add gentle rain falling throughout the scene with wet reflective surfaces"),
        ("add snow", "Add softly falling snow with a cold winter atmosphere"),
        ("add lens flare", "Add warm lens flare from the light source"),
        ("add bokeh background", "Add beautiful circular bokeh lights in the background"),
        ("add golden dust particles", "Add golden dust particles floating in the light"),
        ("add neon glow", "Add colorful neon glow and reflections across the scene"),
        ("add fog/haze", "Add atmospheric fog and haze softening the background"),
        ("add confetti", "Add colorful confetti falling through the air"),
        ("add sparkles", "Add glittering sparkles catching the light"),
        ("change to nighttime", "Change the time to nighttime with dark sky and artificial lighting"),
        ("change to golden hour", "Change the lighting to warm golden hour with long amber shadows"),
        ("change to overcast", "Change the sky to soft overcast with even diffused lighting"),
        ("add wet/reflective surfaces", "Add wet reflective surfaces with puddles catching the light"),
        ("add motion blur", "Add subtle motion blur suggesting movement and energy"),
    ]);
}
