//! 列表节点目录
//!
//! 每个目录在初始化时按码点排序, 大写开头的条目排在小写之前。

use lazy_static::lazy_static;

/// 发型, 同时用作提示词构建器的发型下拉
pub const HAIRSTYLE_ITEMS: &[&str] = &[
    "beach waves",
    "blunt bob",
    "box braids",
    "braided crown",
    "braided ponytail",
    "bun",
    "buzz cut",
    "cornrows",
    "curtain bangs",
    "double buns",
    "dutch braids",
    "fishtail braid",
    "french braid",
    "half up half down",
    "high ponytail",
    "hollywood waves",
    "layered",
    "long straight",
    "loose curls",
    "low bun",
    "low ponytail",
    "messy bun",
    "messy waves",
    "middle part straight",
    "pixie cut",
    "shag",
    "side part",
    "side swept",
    "slicked back",
    "space buns",
    "textured bob",
    "tight curls",
    "top knot",
    "wet look",
    "wolf cut",
];

const SCENE_ITEMS: &[&str] = &[
    "balcony",
    "bar/club",
    "bathroom",
    "beach",
    "bedroom",
    "cafe",
    "car",
    "gym",
    "hallway/corridor",
    "hotel room",
    "kitchen",
    "living room",
    "park",
    "pool",
    "rooftop",
    "stairwell",
    "studio",
    "urban street",
];

const POSE_ITEMS: &[&str] = &[
    "adjusting collar",
    "adjusting jacket",
    "arms crossed",
    "back to camera",
    "chin on hand",
    "contrapposto",
    "crouching",
    "dance step",
    "fingers near lips",
    "from-behind candid",
    "hair flip",
    "hand on chest",
    "hand on hip",
    "hands behind head",
    "hands clasped behind back",
    "hands clasped front",
    "hands in pockets",
    "head tilt",
    "holding coffee",
    "holding phone",
    "kneeling",
    "laughing candid",
    "leaning against wall",
    "leaning in doorway",
    "leaning on counter",
    "leaning on railing",
    "leaning on table",
    "looking away",
    "lying on back",
    "lying on side",
    "lying on stomach elbows up",
    "mirror selfie pose",
    "one knee up seated",
    "one leg bent standing",
    "over the shoulder look",
    "peace sign",
    "profile",
    "reclining on sofa",
    "serious editorial",
    "sitting",
    "sitting couch lounge",
    "sitting cross-legged",
    "sitting on edge",
    "sitting on floor",
    "sitting on stairs",
    "small jump",
    "squatting",
    "standing",
    "standing both hands on hips",
    "stretch overhead",
    "texting",
    "three-quarter turn",
    "touching hair",
    "tucking hair behind ear",
    "twirl",
    "walking",
    "walking mid-step turn",
    "weight shifted",
];

const SHOT_TYPE_ITEMS: &[&str] = &[
    "candid mid-shot",
    "chest-up portrait",
    "close-up face",
    "cowboy shot",
    "environmental portrait",
    "extreme close-up",
    "from-behind candid",
    "full body",
    "headshot",
    "selfie arm-length",
    "silhouette framing",
    "three-quarter portrait",
    "upper body portrait",
    "waist-up portrait",
    "wide full-body",
];

const CAMERA_ANGLE_ITEMS: &[&str] = &[
    "3/4 angle",
    "dutch angle",
    "eye level",
    "from below",
    "low-angle hero shot",
    "mirror selfie angle",
    "overhead selfie angle",
    "phone camera angle",
    "profile angle",
    "rear 3/4 angle",
    "slightly high angle",
    "slightly low angle",
];

const LIGHTING_ITEMS: &[&str] = &[
    "backlit sun flare",
    "blue hour",
    "candlelight",
    "direct flash",
    "dramatic side light",
    "golden hour",
    "harsh midday sun",
    "LED strip ambient",
    "natural window light",
    "neon/artificial",
    "overcast soft",
    "ring light",
    "screen/monitor glow",
    "softbox beauty",
    "studio rim light",
];

const OUTFIT_ITEMS: &[&str] = &[
    "ankle boots and ripped jeans",
    "blazer and pencil skirt",
    "bodysuit and high-waisted jeans",
    "bomber jacket and biker shorts",
    "bralette and high-waisted shorts",
    "bustier and leather skirt",
    "corset top and mini skirt",
    "crop top and cargo pants",
    "crop top and high-waisted jeans",
    "crop top and mini skirt",
    "denim jacket and sundress",
    "graphic tee and joggers",
    "halter top and palazzo pants",
    "hoodie and leggings",
    "lace camisole and silk skirt",
    "leather jacket and jeans",
    "mesh top and leather pants",
    "off-shoulder top and skirt",
    "oversized blazer and shorts",
    "satin robe",
    "sheer blouse and slacks",
    "sports bra and yoga pants",
    "sundress",
    "sweater and mini skirt",
    "swimsuit",
    "tank top and denim shorts",
    "teddy lingerie",
    "tube top and maxi skirt",
    "turtleneck and leather skirt",
    "wrap dress",
];

const IMAGE_EDIT_ITEMS: &[&str] = &[
    "Add bokeh background",
    "Add confetti falling",
    "Add fog and haze",
    "Add freckles",
    "Add gentle rain",
    "Add golden dust particles",
    "Add lens flare",
    "Add motion blur",
    "Add neon glow and reflections",
    "Add snow falling",
    "Add sparkles catching the light",
    "Add sunglasses",
    "Add tattoos on the arms",
    "Add wet reflective surfaces",
    "Change background to beach sunset",
    "Change background to city rooftop",
    "Change background to city skyline at night",
    "Change background to coffee shop",
    "Change background to neon-lit alley",
    "Change background to studio backdrop",
    "Change hair to black",
    "Change hair to blonde",
    "Change hair to pink",
    "Change hair to red",
    "Change lighting to golden hour",
    "Change lighting to neon",
    "Change season to autumn",
    "Change season to winter",
    "Change time to nighttime",
    "Change to overcast sky",
    "Remove background distractions",
    "Turn into cinematic film style",
    "Turn into vintage film style",
];

const ACTION_ITEMS: &[&str] = &[
    "adjusting earring",
    "adjusting sunglasses",
    "applying lipstick",
    "blowing a kiss",
    "brushing hair",
    "checking phone",
    "drinking coffee",
    "drinking wine",
    "eating",
    "fixing hair in mirror",
    "holding bouquet",
    "holding shopping bags",
    "laughing at phone",
    "licking lips",
    "listening to music with earbuds",
    "looking in mirror",
    "opening gift box",
    "playing with necklace",
    "pouring drink",
    "putting on jacket",
    "putting on shoes",
    "reading book",
    "removing jacket",
    "scrolling phone on couch",
    "sipping through straw",
    "stretching after waking",
    "taking selfie",
    "tying shoelaces",
    "typing on laptop",
    "winking",
    "writing in journal",
    "zipping up dress",
];

const GROUP_ACTION_ITEMS: &[&str] = &[
    "arm around friend laughing",
    "cheers-ing drinks together",
    "dancing together at party",
    "feeding each other food",
    "group hug",
    "group selfie",
    "having brunch with friends",
    "having coffee with friend",
    "holding hands walking",
    "hugging friend",
    "karaoke with friends",
    "leaning on friend's shoulder",
    "linking arms walking",
    "piggyback ride",
    "playful pushing friend",
    "posing back to back",
    "sharing earbuds listening to music",
    "sharing umbrella",
    "shopping together",
    "sitting on boyfriend's lap",
    "slow dancing",
    "toasting champagne",
    "walking arm in arm",
    "whispering in ear",
];

/// 有序目录
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    name: &'static str,
    items: Vec<String>,
}

impl Catalog {
    /// 按码点排序构建
    pub fn sorted<S: AsRef<str>>(name: &'static str, items: &[S]) -> Self {
        let mut items = items
            .iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<String>>();
        items.sort();
        Self { name, items }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

lazy_static! {
    pub static ref SCENES: Catalog = Catalog::sorted("scene", SCENE_ITEMS);
    pub static ref POSES: Catalog = Catalog::sorted("pose", POSE_ITEMS);
    pub static ref SHOT_TYPES: Catalog = Catalog::sorted("shot_type", SHOT_TYPE_ITEMS);
    pub static ref CAMERA_ANGLES: Catalog = Catalog::sorted("camera_angle", CAMERA_ANGLE_ITEMS);
    pub static ref LIGHTING: Catalog = Catalog::sorted("lighting", LIGHTING_ITEMS);
    pub static ref OUTFITS: Catalog = Catalog::sorted("outfit", OUTFIT_ITEMS);
    pub static ref IMAGE_EDITS: Catalog = Catalog::sorted("image_edit", IMAGE_EDIT_ITEMS);
    /// 快捷效果的完整描述
    pub static ref QUICK_EFFECTS: Catalog = Catalog::sorted(
        "quick_effect",
        &super::edit::QUICK_EFFECTS
            .labels()
            .filter_map(|label| super::edit::QUICK_EFFECTS.get(label))
            .filter(|prose| !prose.is_empty())
            .collect::<Vec<&str>>(),
    );
    pub static ref HAIRSTYLES: Catalog = Catalog::sorted("hairstyle", HAIRSTYLE_ITEMS);
    pub static ref ACTIONS: Catalog = Catalog::sorted("action", ACTION_ITEMS);
    pub static ref GROUP_ACTIONS: Catalog = Catalog::sorted("group_action", GROUP_ACTION_ITEMS);
}
