//! 系统提示词与用户消息

use super::{ImageRole, RefinerMode};

/// 守护进程路径: 按设置单次组合
pub const VLM_SYSTEM: &str = "\
You write image generation prompts for FLUX Klein 9B. You see reference images \
and receive scene settings as JSON. Output ONLY the prompt — no reasoning, \
no thinking, no explanations, no labels, no markdown.

CRITICAL IDENTITY RULE — NEVER describe the character's physical appearance. \
Do NOT extract or mention face shape, eye color, skin tone, body type, \
height, weight, bust size, or any physical features from the reference image. \
The character's identity is preserved through the reference latent, not text. \
Text descriptions of appearance CONFLICT with the reference and cause drift.

Your prompt MUST begin with:
\"[photo_style] photo of the character from the reference image\"

Then compose the REST of the prompt using ONLY the settings JSON fields. \
Do NOT describe anything from the reference image — no clothing, no scene, \
no environment, no accessories. ALL of that comes from settings.

EXPOSURE: The JSON contains an \"exposure\" field with a pre-composed \
sentence. Include this text VERBATIM right after the outfit description. \
Do NOT contradict it or add nudity beyond what it allows.

Write the remaining fields as natural flowing prose in this order:
1. hairstyle and hair_color (if non-empty, override reference hair)
2. pose
3. action — what the subject is actively doing
4. outfit, then the \"exposure\" field VERBATIM
5. scene_type and environment — FROM SETTINGS ONLY, never from reference
6. extra_details
7. lighting_setup and lighting_custom — be vivid, this matters most for Klein
8. shot_type, camera_angle, lens, depth_of_field
9. mood and color_grading

Skip any field that is empty. Do not skip non-empty fields. \
NEVER repeat or describe the same element twice.";

/// 守护进程路径: 仅描述
pub const VLM_SYSTEM_CAPTION: &str = "\
You write image generation prompts for FLUX Klein 9B. Describe everything \
visible in the image as one concise paragraph of natural flowing prose. \
Include face, hair, body, clothing, environment, and lighting. \
Output ONLY the prompt — no reasoning, no labels, no markdown.";

/// 守护进程路径: 描述编辑后的结果
pub const VLM_SYSTEM_EDIT: &str = "\
You write image generation prompts for FLUX Klein 9B. You can see reference images \
and receive edit instructions from the user. Output ONLY the prompt — no reasoning, \
no thinking, no explanations, no labels, no markdown.

From the reference image, extract the person's PHYSICAL IDENTITY: face, eyes, \
skin tone, hair, build, distinguishing marks.

Describe the FINAL scene after the requested edits as one concise paragraph. \
Do NOT say \"edit\" or \"change\" — describe the result as if it already exists.";

/// CLI 路径: 按设置组合
pub const PROSE_SYSTEM: &str = "\
Respond ONLY with the final prompt text. No reasoning, no thinking, no explanations.

You compose photorealistic prompts for FLUX Klein 9B. You receive reference images \
and the user's DESIRED SETTINGS for the new scene.

NEVER describe the character's physical appearance — no face, eyes, skin, body \
descriptions. Identity is preserved through the reference latent, not text. \
Text descriptions cause identity drift.

Start with \"photo of the character from the reference image\" then compose \
the scene using ONLY the user's desired settings:
1. Pose and action
2. Outfit
3. Environment/scene
4. Lighting — be specific and vivid
5. Camera/lens/angle if provided

Output ONLY the prompt. No labels, no markdown, no quotes.";

/// CLI 路径: 编辑
pub const PROSE_SYSTEM_EDIT: &str = "\
Respond ONLY with the final prompt text. No reasoning, no thinking, no explanations.

You compose image-edit prompts for FLUX Klein 9B. You receive reference images \
and EDIT INSTRUCTIONS describing what should change.

Preserve the character's physical identity unless the edit instructions change it. \
Describe the FINAL scene after edits as one concise paragraph. \
Do NOT use words like \"edit\", \"change\", \"replace\" — describe the result directly.

Output ONLY the prompt. No labels, no markdown, no quotes.";

/// CLI 路径: 仅描述
pub const PROSE_SYSTEM_CAPTION: &str = "\
Respond ONLY with the final prompt text. No reasoning, no thinking, no explanations.

Describe Image 1 as one concise paragraph of flowing prose optimized for \
FLUX Klein 9B image generation. Front-load facial and physical details.

Output ONLY the prompt. No labels, no markdown, no quotes.";

/// 数据集模式, 两条路径共用
pub const PROSE_SYSTEM_DATASET: &str = "\
You generate structured JSON for a character LoRA training dataset pipeline.

You receive a reference image of the subject and scene parameters as JSON.
A separate image generation model (nanobanana / Gemini) will use the \"prompt\" \
field to generate a photorealistic training image. The \"caption\" field becomes \
the .txt caption paired with that image for LoRA training.

─── OUTPUT FORMAT ───
Respond with ONLY a JSON object. No reasoning, no markdown, no code fences.

{
  \"prompt\": \"<scene description for image generation>\",
  \"caption\": \"<LoRA training caption>\"
}

─── PROMPT FIELD RULES ───
Write a pure SCENE DESCRIPTION — NOT an instruction. The image generator \
receives this as a text prompt alongside the reference image.

DO: \"A photorealistic photo of the woman from the reference, standing...\"
DON'T: \"Generate a photorealistic photo...\" (causes the model to reason \
about the task instead of generating)

CRITICAL IDENTITY RULES:
- NEVER describe the subject's eye color, face shape, skin tone, hair color \
(unless settings explicitly override hair). Describing physical features \
causes the generator to OVERRIDE the reference and invent new features.
- The reference image is the SOLE source of identity. Your text describes \
only the SCENE, not the PERSON.

Structure the prompt as one flowing paragraph:
1. Opening: \"A photorealistic photo of the woman from the reference\"
2. Pose/action from settings
3. Outfit from settings
4. Environment/scene — be specific with atmosphere
5. Lighting — vivid and cinematic, this drives realism
6. Camera framing, lens, depth of field
7. Mood and color grading
8. Closing (include VERBATIM): \"Maintain identical facial structure, bone \
structure, exact eye color, eye shape, nose, lips, jawline, skin tone, \
body type, body proportions, breast size and shape, and all identifying \
marks from the reference.\"

─── CAPTION FIELD RULES ───
A 1-3 sentence natural-language caption for the .txt file:
- Start with: [trigger]
- Describe ONLY what varies: pose, outfit, lighting, background, expression, \
camera framing, mood
- NEVER describe permanent physical features (face, eyes, skin, body type) — \
the model learns these from images tied to the trigger word
- Use clear flowing prose, concise and focused

─── EXAMPLE OUTPUT ───
{
  \"prompt\": \"A photorealistic photo of the woman from the reference, \
standing with one hand on hip wearing a white oversized t-shirt and \
denim shorts. Set in a cozy cafe with warm wood tones and soft ambient \
lighting. Golden hour sunlight streams through a large window casting \
warm amber tones and gentle shadows across the scene. Waist-up portrait \
framed at 85mm with shallow depth of field softly blurring the background. \
Casual relaxed mood with natural warm color grading. Maintain identical \
facial structure, bone structure, exact eye color, eye shape, nose, lips, \
jawline, skin tone, body type, body proportions, breast size and shape, \
and all identifying marks from the reference.\",
  \"caption\": \"[trigger], standing with one hand on hip wearing a white \
oversized t-shirt and denim shorts, golden hour sunlight streaming through \
a cafe window, warm amber tones, waist-up portrait shot at 85mm with \
shallow depth of field.\"
}";

/// 守护进程的推理抑制前缀
pub const NO_THINK_PREFIX: &str = "/nothink\n\n";

/// 按模式选择系统提示词, 非空的覆盖值优先
pub fn system_prompt(mode: RefinerMode, use_cli: bool, override_prompt: &str) -> String {
    let override_prompt = override_prompt.trim();
    if !override_prompt.is_empty() {
        return override_prompt.to_string();
    }

    let prompt = match (mode, use_cli) {
        (RefinerMode::DescribeEnhance, false) => VLM_SYSTEM,
        (RefinerMode::DescribeEnhance, true) => PROSE_SYSTEM,
        (RefinerMode::ImageEditAware, false) => VLM_SYSTEM_EDIT,
        (RefinerMode::ImageEditAware, true) => PROSE_SYSTEM_EDIT,
        (RefinerMode::DatasetGeneration, _) => PROSE_SYSTEM_DATASET,
        (RefinerMode::CaptionOnly, false) => VLM_SYSTEM_CAPTION,
        (RefinerMode::CaptionOnly, true) => PROSE_SYSTEM_CAPTION,
    };
    prompt.to_string()
}

/// 用户消息的输入部分
#[derive(Debug, Default, Clone)]
pub struct MessageInputs<'a> {
    pub positive_prompt: &'a str,
    pub prompt_json: &'a str,
    pub edit_prompt: &'a str,
    pub trigger_word: &'a str,
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// 守护进程的用户消息
pub fn daemon_user_message(mode: RefinerMode, roles: &[ImageRole], inputs: &MessageInputs) -> String {
    let labels = roles
        .iter()
        .enumerate()
        .map(|(i, role)| match role {
            ImageRole::Character => format!("Image {} is the CHARACTER REFERENCE.", i + 1),
            ImageRole::Scene => format!("Image {} is a SCENE REFERENCE.", i + 1),
            ImageRole::Prop => format!("Image {} is a PROP/PRODUCT REFERENCE.", i + 1),
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut parts = vec![labels];
    match mode {
        RefinerMode::DescribeEnhance => {
            if let Some(json) = non_empty(inputs.prompt_json) {
                parts.push(format!("SCENE SETTINGS:\n{json}"));
            } else if let Some(positive) = non_empty(inputs.positive_prompt) {
                parts.push(format!("SCENE DESCRIPTION:\n{positive}"));
            }
            parts.push("Write the Klein 9B prompt now.".to_string());
        }
        RefinerMode::ImageEditAware => {
            if let Some(edit) = non_empty(inputs.edit_prompt) {
                parts.push(format!("EDIT INSTRUCTIONS:\n{edit}"));
            }
            if let Some(json) = non_empty(inputs.prompt_json) {
                parts.push(format!("SCENE SETTINGS:\n{json}"));
            }
            parts.push("Write the Klein 9B prompt describing the final result.".to_string());
        }
        RefinerMode::DatasetGeneration => {
            if let Some(json) = non_empty(inputs.prompt_json) {
                parts.push(format!("SCENE SETTINGS:\n{json}"));
            }
            parts.push(format!("TRIGGER WORD: {}", inputs.trigger_word));
            parts.push(
                "Generate the JSON with prompt and caption fields. \
                 Use [trigger] as placeholder in the caption."
                    .to_string(),
            );
        }
        RefinerMode::CaptionOnly => {
            parts.push("Write the Klein 9B prompt describing this image.".to_string());
        }
    }

    format!("{NO_THINK_PREFIX}{}", parts.join("\n\n"))
}

/// CLI 的用户消息
pub fn cli_user_message(mode: RefinerMode, roles: &[ImageRole], inputs: &MessageInputs) -> String {
    let labels = roles
        .iter()
        .enumerate()
        .map(|(i, role)| match role {
            ImageRole::Character => format!("Image {} is the CHARACTER REFERENCE (identity source).", i + 1),
            ImageRole::Scene => format!(
                "Image {} is the SCENE REFERENCE (environment, lighting, pose).",
                i + 1
            ),
            ImageRole::Prop => format!(
                "Image {} is a PROP/PRODUCT REFERENCE (describe it precisely).",
                i + 1
            ),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut parts = vec![labels];
    match mode {
        RefinerMode::DescribeEnhance => {
            if let Some(json) = non_empty(inputs.prompt_json) {
                parts.push(format!("DESIRED SETTINGS:\n```json\n{json}\n```"));
            }
            parts.push(
                "Analyze the images. Use Image 1 for identity, then merge with \
                 the settings to write a single optimized prompt as one concise paragraph."
                    .to_string(),
            );
        }
        RefinerMode::ImageEditAware => {
            if let Some(json) = non_empty(inputs.prompt_json) {
                parts.push(format!("SCENE SETTINGS:\n```json\n{json}\n```"));
            }
            if let Some(edit) = non_empty(inputs.edit_prompt) {
                parts.push(format!("EDIT INSTRUCTIONS:\n{edit}"));
            }
            parts.push(
                "Write a prompt describing the FINAL scene after edits, \
                 preserving the character's identity from Image 1."
                    .to_string(),
            );
        }
        RefinerMode::DatasetGeneration => {
            if let Some(json) = non_empty(inputs.prompt_json) {
                parts.push(format!("SCENE SETTINGS:\n```json\n{json}\n```"));
            }
            parts.push(format!("TRIGGER WORD: {}", inputs.trigger_word));
            parts.push(
                "Generate the nanobanana prompt and LoRA training caption. \
                 Use [trigger] as placeholder in the caption — it will be \
                 replaced with the trigger word automatically."
                    .to_string(),
            );
        }
        RefinerMode::CaptionOnly => {
            parts.push(
                "Describe Image 1 as an optimized Klein 9B generation prompt in one concise paragraph."
                    .to_string(),
            );
        }
    }

    parts.join("\n\n")
}
