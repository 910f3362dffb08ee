//! 摄影相关下拉选项
//!
//! 面向 IG 风格写实人像。

use lazy_static::lazy_static;

use super::{ExpansionTable, SelectionField, CUSTOM, RANDOM, REFERENCE};

/// 灯光预设 (标签, 扩展描述)
const LIGHTING_PRESETS: &[(&str, &str)] = &[
    ("ring light", "even ring light illumination with circular catchlights in the eyes and minimal shadows"),
    ("softbox beauty", "professional softbox beauty lighting with soft wrap-around illumination and flattering skin tones"),
    ("natural window light", "soft natural light streaming through a window, creating gentle gradients from light to shadow"),
    ("golden hour", "warm golden hour sunlight with long shadows and rich amber tones"),
    ("blue hour", "cool blue hour twilight with deep indigo sky and soft diffused ambient light"),
    ("neon/artificial", "vibrant neon and artificial light casting colorful reflections and electric atmosphere"),
    ("direct flash", "direct on-camera flash with harsh shadows and high contrast pop"),
    ("overcast soft", "soft overcast daylight creating even, shadowless illumination with gentle tonal gradations"),
    ("backlit sun flare", "backlit sun flare with the subject haloed in warm luminous light and lens flare"),
    ("LED strip ambient", "colorful LED strip ambient light casting soft gradients of color across the scene"),
    ("screen/monitor glow", "cool screen glow illuminating the face with soft bluish-white light in a dim room"),
    ("harsh midday sun", "harsh midday sun with strong overhead shadows and high contrast"),
    ("studio rim light", "dramatic studio rim light separating the subject from the background with a luminous edge"),
    ("dramatic side light", "strong directional side light carving deep shadows and bright highlights"),
    ("candlelight", "warm flickering candlelight casting intimate orange glow and dancing soft shadows"),
];

lazy_static! {
    /// 灯光扩展表, 哨兵值与 custom 映射为空串
    pub static ref LIGHTING_EXPANSIONS: ExpansionTable = {
        let mut pairs = vec![(REFERENCE, ""), (RANDOM, "")];
        pairs.extend_from_slice(LIGHTING_PRESETS);
        pairs.push((CUSTOM, ""));
        ExpansionTable::from_pairs(&pairs)
    };

    /// 灯光下拉, 选项与扩展表的键一致
    pub static ref LIGHTING_SETUP: SelectionField = {
        let mut concrete = LIGHTING_PRESETS.iter().map(|(k, _)| *k).collect::<Vec<_>>();
        concrete.push(CUSTOM);
        SelectionField::new("lighting_setup", &concrete)
    };

    pub static ref SCENE_TYPE: SelectionField = SelectionField::new("scene_type", &[
        "bedroom",
        "bathroom",
        "living room",
        "kitchen",
        "hotel room",
        "urban street",
        "cafe",
        "bar/club",
        "rooftop",
        "beach",
        "pool",
        "park",
        "gym",
        "studio",
        "balcony",
        "car",
        "stairwell",
        "hallway/corridor",
    ]);

    pub static ref SHOT_TYPE: SelectionField = SelectionField::new("shot_type", &[
        "extreme close-up",
        "close-up face",
        "headshot",
        "upper body portrait",
        "chest-up portrait",
        "waist-up portrait",
        "three-quarter portrait",
        "cowboy shot",
        "full body",
        "wide full-body",
        "selfie arm-length",
        "environmental portrait",
        "candid mid-shot",
        "from-behind candid",
        "silhouette framing",
    ]);

    pub static ref CAMERA_ANGLE: SelectionField = SelectionField::new("camera_angle", &[
        "eye level",
        "slightly low angle",
        "slightly high angle",
        "3/4 angle",
        "profile angle",
        "mirror selfie angle",
        "phone camera angle",
        "dutch angle",
        "low-angle hero shot",
        "overhead selfie angle",
        "from below",
        "rear 3/4 angle",
    ]);

    pub static ref LENS: SelectionField = SelectionField::new("lens", &[
        "24mm wide",
        "35mm",
        "50mm",
        "85mm portrait",
        "105mm",
        "135mm",
        "iPhone front camera",
        "iPhone rear camera",
    ]);

    pub static ref DEPTH_OF_FIELD: SelectionField = SelectionField::new("depth_of_field", &[
        "razor thin f/1.4",
        "shallow f/2.0",
        "shallow f/2.8",
        "moderate f/4",
        "standard f/5.6",
        "sharp f/8",
    ]);

    pub static ref PHOTO_STYLE: SelectionField = SelectionField::new("photo_style", &[
        "phone candid",
        "mirror selfie",
        "editorial",
        "lifestyle",
        "fashion",
        "cinematic",
        "film grain",
        "flash photography",
        "golden hour aesthetic",
        "neon night",
        "studio clean",
        "vintage retro",
        "street style",
        "paparazzi",
        "documentary candid",
    ]);

    pub static ref POSE: SelectionField = SelectionField::new("pose", &[
        "standing",
        "standing hand on hip",
        "standing both hands on hips",
        "standing arms crossed",
        "standing hands in pockets",
        "standing contrapposto",
        "standing one leg bent",
        "walking",
        "walking mid-step turn",
        "sitting",
        "sitting cross-legged",
        "sitting one knee up",
        "sitting on edge",
        "sitting couch lounge",
        "sitting on floor",
        "sitting on stairs",
        "leaning against wall",
        "leaning on railing",
        "leaning in doorway",
        "leaning on table",
        "crouching",
        "squatting",
        "kneeling",
        "reclining on sofa",
        "lying on side",
        "lying on back",
        "lying on stomach elbows up",
        "over the shoulder look",
        "back to camera",
        "three-quarter turn",
        "profile",
        "head tilt",
        "looking away",
        "hair flip",
        "touching hair",
        "tucking hair behind ear",
        "hand on chest",
        "chin on hand",
        "fingers near lips",
        "adjusting collar",
        "adjusting jacket",
        "mirror selfie pose",
        "holding phone",
        "texting",
        "holding coffee",
        "peace sign",
        "laughing candid",
        "serious editorial",
        "twirl",
        "dance step",
        "small jump",
        "stretch overhead",
        "yoga warrior pose",
    ]);

    pub static ref HAIR_COLOR: SelectionField = SelectionField::new("hair_color", &[
        "ash blonde",
        "auburn",
        "black",
        "bleach blonde",
        "blue",
        "brunette",
        "caramel",
        "chestnut",
        "copper",
        "dark brown",
        "dirty blonde",
        "ginger",
        "golden blonde",
        "gray",
        "green",
        "honey blonde",
        "jet black",
        "lavender",
        "light brown",
        "medium brown",
        "ombre",
        "pastel pink",
        "pink",
        "platinum blonde",
        "red",
        "silver",
        "strawberry blonde",
        "two-tone",
        "white",
    ]);

    pub static ref HAIRSTYLE: SelectionField = SelectionField::new("hairstyle", super::catalogs::HAIRSTYLE_ITEMS);

    pub static ref COLOR_GRADING: SelectionField = SelectionField::new("color_grading", &[
        "natural",
        "warm golden",
        "cool blue",
        "cinematic teal-orange",
        "muted desaturated",
        "vibrant",
        "film noir",
        "vintage kodak",
        "fuji velvia",
        "faded film",
        "high contrast",
        "pastel soft",
    ]);
}

/// 调色中不产生描述的值
pub const NATURAL_GRADING: &str = "natural";
