//! 着装暴露程度
//!
//! 仅在扩展词表开启时生效, 关闭时为空策略: 不产生子句, 不追加负面词。

use crate::config::PackConfig;

/// 暴露开关
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExposureToggles {
    pub expose_breasts: bool,
    pub remove_bra: bool,
    pub remove_panties: bool,
}

/// 暴露子句策略
pub trait ExposurePolicy: Send + Sync {
    /// 子句片段, 位于服装之后、环境之前
    fn clause_parts(&self, toggles: &ExposureToggles) -> Vec<&'static str>;

    /// 与开关矛盾的画面, 追加到负面提示词
    fn negatives(&self, toggles: &ExposureToggles) -> Vec<&'static str>;

    /// 节点是否需要暴露开关输入
    fn has_inputs(&self) -> bool;
}

/// 空策略
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExposure;

impl ExposurePolicy for NoExposure {
    fn clause_parts(&self, _toggles: &ExposureToggles) -> Vec<&'static str> {
        Vec::new()
    }

    fn negatives(&self, _toggles: &ExposureToggles) -> Vec<&'static str> {
        Vec::new()
    }

    fn has_inputs(&self) -> bool {
        false
    }
}

/// 扩展词表开启时的策略
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendedExposure;

impl ExposurePolicy for ExtendedExposure {
    fn clause_parts(&self, toggles: &ExposureToggles) -> Vec<&'static str> {
        let mut parts = Vec::new();
        if toggles.expose_breasts {
            parts.push("clothing adjusted to expose breasts");
            if toggles.remove_bra {
                parts.push("no bra");
            }
        } else {
            parts.push("nipples fully concealed by clothing, fabric, hands, or hair");
            parts.push("breasts fully covered by outfit");
        }

        if toggles.remove_panties {
            parts.push("not wearing panties");
        } else {
            parts.push("underwear or lingerie covering intimate areas");
        }
        parts
    }

    fn negatives(&self, toggles: &ExposureToggles) -> Vec<&'static str> {
        let mut negatives = Vec::new();
        if !toggles.expose_breasts {
            negatives.push(
                "exposed nipples, bare breasts, lifted shirt, shirt pulled up, topless, areola visible",
            );
        }
        if !toggles.remove_panties {
            negatives.push("exposed genitals, no underwear, pantyless, bottomless");
        }
        negatives
    }

    fn has_inputs(&self) -> bool {
        true
    }
}

/// 按配置选择策略
pub fn policy_for(config: &PackConfig) -> Box<dyn ExposurePolicy> {
    if config.extended_vocabulary {
        Box::new(ExtendedExposure)
    } else {
        Box::new(NoExposure)
    }
}
