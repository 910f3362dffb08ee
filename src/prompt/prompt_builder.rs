//! 提示词构建器
//!
//! 按固定顺序拼接各个子句, 输出正向提示词、负面提示词与字段的 JSON 镜像。
//! 随机哨兵值在拼接前逐字段解析一次。

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::{
    exposure::{policy_for, ExposurePolicy, ExposureToggles},
    prose::{is_set, normalize_sentences, sentence_case, strip_trailing_period, upper_first},
};
use crate::{
    config::PackConfig,
    vocab::{
        is_reference,
        photo::{
            CAMERA_ANGLE, COLOR_GRADING, DEPTH_OF_FIELD, HAIRSTYLE, HAIR_COLOR, LENS,
            LIGHTING_EXPANSIONS, LIGHTING_SETUP, NATURAL_GRADING, PHOTO_STYLE, POSE, SCENE_TYPE,
            SHOT_TYPE,
        },
        ExtendedVocabulary, IDENTITY_LOCK_PROMPT, REFERENCE,
    },
};

/// 未填写主体时的默认描述
pub const DEFAULT_SUBJECT: &str = "the character from the reference image";

/// 自动补 "In " 时视为已有介词的前缀
const LOCATIVE_PREPOSITIONS: [&str; 11] = [
    "in ", "at ", "on ", "near ", "by ", "inside ", "outside ", "under ", "above ", "along ",
    "within ",
];

/// 始终附加的负面词: 胸型缺陷
pub const NEGATIVE_BODY: &str = "saggy breasts, torpedo breasts, droopy breasts, pendulous breasts, tubular breasts, uneven breasts, deflated breasts";
/// 始终附加的负面词: 肢体缺陷与画面瑕疵
pub const NEGATIVE_ANATOMY: &str = "extra fingers, extra hands, extra limbs, missing fingers, fused fingers, mutated hands, deformed hands, phantom limb, floating hand, disembodied hand, extra arms, bad anatomy, malformed limbs, wrong number of fingers, six fingers, disfigured, ugly, blurry, watermark, text, logo, signature";

/// 构建器输入
#[derive(Debug, Clone, PartialEq)]
pub struct PromptFields {
    pub subject: String,
    pub pose: String,
    pub action: String,
    pub scene_type: String,
    pub shot_type: String,
    pub camera_angle: String,
    pub lighting_setup: String,
    pub photo_style: String,
    pub lens: String,
    pub depth_of_field: String,
    pub color_grading: String,
    pub hairstyle: String,
    pub hair_color: String,
    pub preserve_identity: bool,
    pub outfit: String,
    pub edit_instructions: String,
    pub environment: String,
    pub lighting_custom: String,
    pub mood: String,
    pub extra_details: String,
    pub negative_prompt: String,
    pub exposure: ExposureToggles,
    /// -1 使用线程随机数, 其他值使结果可复现
    pub seed: i64,
}

impl Default for PromptFields {
    fn default() -> Self {
        Self {
            subject: String::new(),
            pose: REFERENCE.to_string(),
            action: String::new(),
            scene_type: REFERENCE.to_string(),
            shot_type: REFERENCE.to_string(),
            camera_angle: REFERENCE.to_string(),
            lighting_setup: REFERENCE.to_string(),
            photo_style: REFERENCE.to_string(),
            lens: REFERENCE.to_string(),
            depth_of_field: REFERENCE.to_string(),
            color_grading: REFERENCE.to_string(),
            hairstyle: REFERENCE.to_string(),
            hair_color: REFERENCE.to_string(),
            preserve_identity: true,
            outfit: String::new(),
            edit_instructions: String::new(),
            environment: String::new(),
            lighting_custom: String::new(),
            mood: String::new(),
            extra_details: String::new(),
            negative_prompt: String::new(),
            exposure: ExposureToggles::default(),
            seed: -1,
        }
    }
}

impl PromptFields {
    /// 解析全部随机哨兵值
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> Self {
        Self {
            pose: POSE.resolve(&self.pose, rng),
            scene_type: SCENE_TYPE.resolve(&self.scene_type, rng),
            shot_type: SHOT_TYPE.resolve(&self.shot_type, rng),
            camera_angle: CAMERA_ANGLE.resolve(&self.camera_angle, rng),
            lighting_setup: LIGHTING_SETUP.resolve(&self.lighting_setup, rng),
            photo_style: PHOTO_STYLE.resolve(&self.photo_style, rng),
            lens: LENS.resolve(&self.lens, rng),
            depth_of_field: DEPTH_OF_FIELD.resolve(&self.depth_of_field, rng),
            color_grading: COLOR_GRADING.resolve(&self.color_grading, rng),
            hairstyle: HAIRSTYLE.resolve(&self.hairstyle, rng),
            hair_color: HAIR_COLOR.resolve(&self.hair_color, rng),
            ..self.clone()
        }
    }
}

/// JSON 镜像
///
/// 参考图哨兵值写为空串, 自由文本字段保留原始输入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMirror {
    pub subject: String,
    pub pose: String,
    pub action: String,
    pub hairstyle: String,
    pub hair_color: String,
    pub scene_type: String,
    pub outfit: String,
    pub edit_instructions: String,
    pub environment: String,
    pub lighting_setup: String,
    pub lighting_custom: String,
    pub shot_type: String,
    pub camera_angle: String,
    pub lens: String,
    pub depth_of_field: String,
    pub photo_style: String,
    pub mood: String,
    pub color_grading: String,
    pub extra_details: String,
    pub exposure: String,
    pub preserve_identity: bool,
    pub negative_prompt: String,
}

/// 构建结果
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPrompt {
    pub positive: String,
    pub negative: String,
    pub json: String,
}

fn mirrored(value: &str) -> String {
    if is_reference(value) {
        String::new()
    } else {
        value.to_string()
    }
}

/// 提示词构建器
pub struct PromptBuilder {
    vocab: ExtendedVocabulary,
    exposure: Box<dyn ExposurePolicy>,
}

impl PromptBuilder {
    pub fn new(config: &PackConfig) -> Self {
        Self {
            vocab: ExtendedVocabulary::load(config),
            exposure: policy_for(config),
        }
    }

    pub fn with_vocabulary(config: &PackConfig, vocab: ExtendedVocabulary) -> Self {
        Self {
            vocab,
            exposure: policy_for(config),
        }
    }

    /// 节点是否需要暴露开关输入
    pub fn has_exposure_inputs(&self) -> bool {
        self.exposure.has_inputs()
    }

    /// 按 seed 选择随机源后构建
    pub fn build(&self, fields: &PromptFields) -> BuiltPrompt {
        if fields.seed < 0 {
            self.build_with_rng(fields, &mut rand::rng())
        } else {
            let mut rng = ChaCha8Rng::seed_from_u64(fields.seed as u64);
            self.build_with_rng(fields, &mut rng)
        }
    }

    pub fn build_with_rng<R: Rng>(&self, fields: &PromptFields, rng: &mut R) -> BuiltPrompt {
        let resolved = fields.resolve(rng);
        self.assemble(&resolved)
    }

    /// 拼接已解析的字段
    pub fn assemble(&self, f: &PromptFields) -> BuiltPrompt {
        let mut sentences: Vec<String> = Vec::new();

        // 开头: 风格 + 主体 + 姿势
        let subject = match f.subject.trim() {
            "" => DEFAULT_SUBJECT,
            v => v,
        };
        let mut opener = if is_set(&f.photo_style) {
            format!("{} photo of {subject}", sentence_case(&f.photo_style))
        } else {
            format!("Photo of {subject}")
        };
        if is_set(&f.pose) {
            opener.push_str(", ");
            opener.push_str(self.vocab.expand(&f.pose));
        }
        sentences.push(opener);

        let action = strip_trailing_period(self.vocab.expand(f.action.trim()));
        if !action.is_empty() {
            sentences.push(action.to_string());
        }

        let mut hair = Vec::new();
        if is_set(&f.hair_color) {
            hair.push(f.hair_color.clone());
        }
        if is_set(&f.hairstyle) {
            hair.push(format!("{} hair", f.hairstyle));
        }
        if !hair.is_empty() {
            sentences.push(sentence_case(&hair.join(" ")));
        }

        let outfit = strip_trailing_period(f.outfit.trim());
        if !outfit.is_empty() {
            sentences.push(outfit.to_string());
        }

        let exposure = self.exposure.clause_parts(&f.exposure).join(", ");
        if !exposure.is_empty() {
            sentences.push(sentence_case(&exposure));
        }

        let environment = f.environment.trim();
        if !environment.is_empty() {
            let lower = environment.to_lowercase();
            if LOCATIVE_PREPOSITIONS.iter().any(|p| lower.starts_with(p)) {
                sentences.push(upper_first(environment));
            } else {
                sentences.push(format!("In {environment}"));
            }
        } else if is_set(&f.scene_type) {
            let article = match f.scene_type.chars().next().map(|c| c.to_ascii_lowercase()) {
                Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
                _ => "a",
            };
            sentences.push(format!("In {article} {} setting", f.scene_type));
        }

        let details = strip_trailing_period(f.extra_details.trim());
        if !details.is_empty() {
            sentences.push(upper_first(details));
        }

        let mut lighting = if is_set(&f.lighting_setup) {
            LIGHTING_EXPANSIONS.expand(&f.lighting_setup).to_string()
        } else {
            String::new()
        };
        let lighting_custom = f.lighting_custom.trim();
        if !lighting_custom.is_empty() {
            lighting = if lighting.is_empty() {
                lighting_custom.to_string()
            } else {
                format!("{lighting}, {lighting_custom}")
            };
        }
        if !lighting.is_empty() {
            sentences.push(upper_first(&lighting));
        }

        let mut technical = Vec::new();
        if is_set(&f.shot_type) {
            technical.push(sentence_case(&f.shot_type));
        }
        if is_set(&f.camera_angle) {
            technical.push(f.camera_angle.clone());
        }
        if is_set(&f.lens) {
            technical.push(format!("{} lens", f.lens));
        }
        if is_set(&f.depth_of_field) {
            let words = f.depth_of_field.split_whitespace().collect::<Vec<_>>();
            if let (Some(first), Some(last)) = (words.first(), words.last()) {
                technical.push(format!("{first} depth of field at {last}"));
            }
        }
        if !technical.is_empty() {
            sentences.push(technical.join(", "));
        }

        let mut tail = Vec::new();
        let mood = f.mood.trim();
        if !mood.is_empty() {
            tail.push(format!("{} mood", upper_first(mood)));
        }
        if is_set(&f.color_grading) && f.color_grading != NATURAL_GRADING {
            tail.push(format!("{} color grading", upper_first(&f.color_grading)));
        }
        if !tail.is_empty() {
            sentences.push(tail.join(". "));
        }

        let edit_instructions = strip_trailing_period(f.edit_instructions.trim());
        if !edit_instructions.is_empty() {
            sentences.push(edit_instructions.to_string());
        }

        if f.preserve_identity {
            sentences.push(IDENTITY_LOCK_PROMPT.to_string());
        }

        let positive = normalize_sentences(&sentences.join(". "));
        let negative = self.negative_prompt(f);
        let json = self.mirror_json(f, &exposure, &negative);
        debug!("prompt built, {} clauses, {} chars", sentences.len(), positive.len());

        BuiltPrompt {
            positive,
            negative,
            json,
        }
    }

    fn negative_prompt(&self, f: &PromptFields) -> String {
        let mut parts = Vec::new();
        let user = f.negative_prompt.trim();
        if !user.is_empty() {
            parts.push(user);
        }
        parts.push(NEGATIVE_BODY);
        parts.push(NEGATIVE_ANATOMY);
        parts.extend(self.exposure.negatives(&f.exposure));
        parts.join(", ")
    }

    fn mirror_json(&self, f: &PromptFields, exposure: &str, negative: &str) -> String {
        let mirror = PromptMirror {
            subject: f.subject.clone(),
            pose: mirrored(&f.pose),
            action: f.action.clone(),
            hairstyle: mirrored(&f.hairstyle),
            hair_color: mirrored(&f.hair_color),
            scene_type: mirrored(&f.scene_type),
            outfit: f.outfit.clone(),
            edit_instructions: f.edit_instructions.clone(),
            environment: f.environment.clone(),
            lighting_setup: mirrored(&f.lighting_setup),
            lighting_custom: f.lighting_custom.clone(),
            shot_type: mirrored(&f.shot_type),
            camera_angle: mirrored(&f.camera_angle),
            lens: mirrored(&f.lens),
            depth_of_field: mirrored(&f.depth_of_field),
            photo_style: mirrored(&f.photo_style),
            mood: f.mood.clone(),
            color_grading: mirrored(&f.color_grading),
            extra_details: f.extra_details.clone(),
            exposure: exposure.to_lowercase(),
            preserve_identity: f.preserve_identity,
            negative_prompt: negative.to_string(),
        };

        serde_json::to_string_pretty(&mirror).unwrap_or_else(|e| {
            warn!("prompt mirror serialization failed, {e}");
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::vocab::{ExpansionTable, RANDOM};

    fn builder() -> PromptBuilder {
        PromptBuilder::new(&PackConfig::default())
    }

    #[test]
    fn test_editorial_opening_without_pose() {
        let fields = PromptFields {
            photo_style: "editorial".to_string(),
            preserve_identity: false,
            ..Default::default()
        };
        let built = builder().build(&fields);
        assert_eq!(
            built.positive,
            "Editorial photo of the character from the reference image."
        );

        let with_lock = builder().build(&PromptFields {
            photo_style: "editorial".to_string(),
            ..Default::default()
        });
        assert!(with_lock
            .positive
            .starts_with("Editorial photo of the character from the reference image. Maintain exact likeness"));
    }

    #[test]
    fn test_full_clause_order() {
        let fields = PromptFields {
            subject: "a woman in her twenties".to_string(),
            pose: "leaning on railing".to_string(),
            action: "sipping through straw.".to_string(),
            scene_type: "urban street".to_string(),
            shot_type: "waist-up portrait".to_string(),
            camera_angle: "slightly low angle".to_string(),
            lighting_setup: "golden hour".to_string(),
            photo_style: "street style".to_string(),
            lens: "50mm".to_string(),
            depth_of_field: "shallow f/2.0".to_string(),
            color_grading: "warm golden".to_string(),
            hairstyle: "messy bun".to_string(),
            hair_color: "Auburn".to_string(),
            preserve_identity: false,
            outfit: "Wearing denim jacket and sneakers.".to_string(),
            edit_instructions: "Add light rain.".to_string(),
            environment: "on a rooftop terrace".to_string(),
            lighting_custom: "soft rim light".to_string(),
            mood: "dreamy".to_string(),
            extra_details: "freckles visible.".to_string(),
            ..Default::default()
        };

        let built = builder().build(&fields);
        assert_eq!(
            built.positive,
            "Street style photo of a woman in her twenties, leaning on railing. \
             sipping through straw. \
             Auburn messy bun hair. \
             Wearing denim jacket and sneakers. \
             On a rooftop terrace. \
             Freckles visible. \
             Warm golden hour sunlight with long shadows and rich amber tones, soft rim light. \
             Waist-up portrait, slightly low angle, 50mm lens, shallow depth of field at f/2.0. \
             Dreamy mood. Warm golden color grading. \
             Add light rain."
        );
    }

    #[test]
    fn test_scene_article_and_prepositions() {
        let built = builder().build(&PromptFields {
            scene_type: "hotel room".to_string(),
            preserve_identity: false,
            ..Default::default()
        });
        assert_eq!(
            built.positive,
            "Photo of the character from the reference image. In a hotel room setting."
        );

        let built = builder().build(&PromptFields {
            scene_type: "urban street".to_string(),
            preserve_identity: false,
            ..Default::default()
        });
        assert!(built.positive.ends_with("In an urban street setting."));

        let built = builder().build(&PromptFields {
            scene_type: "urban street".to_string(),
            environment: "a neon-lit alley".to_string(),
            preserve_identity: false,
            ..Default::default()
        });
        assert!(built.positive.ends_with("In a neon-lit alley."));
    }

    #[test]
    fn test_natural_grading_suppressed() {
        let built = builder().build(&PromptFields {
            color_grading: "natural".to_string(),
            mood: "calm".to_string(),
            preserve_identity: false,
            ..Default::default()
        });
        assert!(built.positive.ends_with("Calm mood."));
        assert!(!built.positive.contains("color grading"));
    }

    #[test]
    fn test_negative_prompt_blocks() {
        let built = builder().build(&PromptFields {
            negative_prompt: "  cartoon  ".to_string(),
            ..Default::default()
        });
        assert_eq!(
            built.negative,
            format!("cartoon, {NEGATIVE_BODY}, {NEGATIVE_ANATOMY}")
        );

        let built = builder().build(&PromptFields::default());
        assert_eq!(built.negative, format!("{NEGATIVE_BODY}, {NEGATIVE_ANATOMY}"));
    }

    #[test]
    fn test_extended_mode_exposure_clause() -> anyhow::Result<()> {
        let builder =
            PromptBuilder::with_vocabulary(&PackConfig::extended(None), ExtendedVocabulary::default());
        assert!(builder.has_exposure_inputs());

        let built = builder.build(&PromptFields {
            outfit: "Wearing a sundress".to_string(),
            environment: "at the beach".to_string(),
            preserve_identity: false,
            ..Default::default()
        });
        assert!(built.positive.contains(
            "Wearing a sundress. Nipples fully concealed by clothing, fabric, hands, or hair, \
             breasts fully covered by outfit, underwear or lingerie covering intimate areas. At the beach."
        ));
        assert!(built.negative.ends_with("pantyless, bottomless"));

        let mirror: PromptMirror = serde_json::from_str(&built.json)?;
        assert!(mirror.exposure.starts_with("nipples fully concealed"));
        Ok(())
    }

    #[test]
    fn test_extended_pose_expansion() {
        let vocab = ExtendedVocabulary {
            poses: ExpansionTable::from_pairs(&[("hero", "standing tall with fists on hips")]),
            ..Default::default()
        };
        let builder = PromptBuilder::with_vocabulary(&PackConfig::extended(None), vocab);
        let built = builder.build(&PromptFields {
            pose: "hero".to_string(),
            preserve_identity: false,
            ..Default::default()
        });
        assert!(built
            .positive
            .starts_with("Photo of the character from the reference image, standing tall with fists on hips."));
    }

    #[test]
    fn test_normalization_is_idempotent_on_output() {
        let built = builder().build(&PromptFields {
            extra_details: "a.. b. . c".to_string(),
            edit_instructions: "...".to_string(),
            ..Default::default()
        });
        assert_eq!(normalize_sentences(&built.positive), built.positive);
    }

    #[test]
    fn test_mirror_reflects_resolved_values() -> anyhow::Result<()> {
        let fields = PromptFields {
            pose: RANDOM.to_string(),
            lens: RANDOM.to_string(),
            shot_type: "headshot".to_string(),
            mood: "moody".to_string(),
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let built = builder().build_with_rng(&fields, &mut rng);
        let mirror: PromptMirror = serde_json::from_str(&built.json)?;

        assert!(POSE.concrete().contains(&mirror.pose.as_str()));
        assert!(LENS.concrete().contains(&mirror.lens.as_str()));
        assert!(built.positive.contains(&mirror.pose));
        assert!(built.positive.contains(&format!("{} lens", mirror.lens)));
        assert_eq!(mirror.shot_type, "headshot");
        assert_eq!(mirror.scene_type, "");
        assert_eq!(mirror.camera_angle, "");
        assert_eq!(mirror.mood, "moody");
        assert_eq!(mirror.exposure, "");
        assert!(mirror.preserve_identity);
        assert_eq!(mirror.negative_prompt, built.negative);
        Ok(())
    }

    #[test]
    fn test_seeded_build_is_repeatable() {
        let fields = PromptFields {
            pose: RANDOM.to_string(),
            scene_type: RANDOM.to_string(),
            lighting_setup: RANDOM.to_string(),
            seed: 1234,
            ..Default::default()
        };
        let builder = builder();
        assert_eq!(builder.build(&fields), builder.build(&fields));
    }
}
