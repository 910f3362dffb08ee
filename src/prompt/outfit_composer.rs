//! 服装组合

use serde::{Deserialize, Serialize};

use super::prose::join_series;
use crate::vocab::NONE;

/// 服装选择
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitSelection {
    pub top: String,
    pub bottom: String,
    pub shoes: String,
    pub lingerie_top: String,
    pub lingerie_bottom: String,
    pub outerwear: String,
    pub accessories: [String; 3],
    pub extra_outfit_details: String,
}

impl Default for OutfitSelection {
    fn default() -> Self {
        Self {
            top: NONE.to_string(),
            bottom: NONE.to_string(),
            shoes: NONE.to_string(),
            lingerie_top: NONE.to_string(),
            lingerie_bottom: NONE.to_string(),
            outerwear: NONE.to_string(),
            accessories: [NONE.to_string(), NONE.to_string(), NONE.to_string()],
            extra_outfit_details: String::new(),
        }
    }
}

fn is_picked(item: &str) -> bool {
    !item.trim().is_empty() && item != NONE
}

impl OutfitSelection {
    /// 选中的服装, 固定层次顺序, 饰品按小写去重
    pub fn pieces(&self) -> Vec<String> {
        let mut pieces = [
            &self.lingerie_top,
            &self.lingerie_bottom,
            &self.top,
            &self.bottom,
            &self.outerwear,
            &self.shoes,
        ]
        .into_iter()
        .filter(|v| is_picked(v))
        .map(|v| v.to_lowercase())
        .collect::<Vec<String>>();

        let mut seen = Vec::new();
        for item in self.accessories.iter().filter(|v| is_picked(v)) {
            let lower = item.to_lowercase();
            if !seen.contains(&lower) {
                seen.push(lower.clone());
                pieces.push(lower);
            }
        }
        pieces
    }

    /// 组合为一句服装描述, 无任何选择时返回空串
    pub fn compose(&self) -> String {
        let pieces = self.pieces();
        let extra = self.extra_outfit_details.trim();

        let clause = if pieces.is_empty() {
            String::new()
        } else {
            format!("Wearing {}", join_series(&pieces))
        };

        match (clause.is_empty(), extra.is_empty()) {
            (true, true) => String::new(),
            (true, false) => extra.to_string(),
            (false, true) => clause,
            (false, false) => format!("{clause}. {extra}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection() {
        assert_eq!(OutfitSelection::default().compose(), "");
    }

    #[test]
    fn test_single_and_pair() {
        let outfit = OutfitSelection {
            shoes: "Boots".to_string(),
            ..Default::default()
        };
        assert_eq!(outfit.compose(), "Wearing boots");

        let outfit = OutfitSelection {
            top: "Crop top".to_string(),
            shoes: "Sneakers".to_string(),
            ..Default::default()
        };
        assert_eq!(outfit.compose(), "Wearing crop top and sneakers");
    }

    #[test]
    fn test_layer_order_and_accessory_dedup() {
        let outfit = OutfitSelection {
            top: "Blouse".to_string(),
            bottom: "Pencil skirt".to_string(),
            shoes: "Pumps".to_string(),
            lingerie_top: "Lace bra".to_string(),
            outerwear: "Blazer".to_string(),
            accessories: [
                "Watch".to_string(),
                "watch".to_string(),
                "Hoop earrings".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(
            outfit.compose(),
            "Wearing lace bra, blouse, pencil skirt, blazer, pumps, watch, and hoop earrings"
        );
    }

    #[test]
    fn test_extra_details() {
        let outfit = OutfitSelection {
            extra_outfit_details: "  all in black  ".to_string(),
            ..Default::default()
        };
        assert_eq!(outfit.compose(), "all in black");

        let outfit = OutfitSelection {
            top: "Hoodie".to_string(),
            extra_outfit_details: "oversized fit".to_string(),
            ..Default::default()
        };
        assert_eq!(outfit.compose(), "Wearing hoodie. oversized fit");
    }
}
