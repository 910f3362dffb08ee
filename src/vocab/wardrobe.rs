//! 服装类别
//!
//! 每个类别都以 `none` 开头, 其余按码点排序。

use lazy_static::lazy_static;

use super::NONE;

/// 服装下拉字段
#[derive(Debug, Clone)]
pub struct WardrobeCategory {
    name: &'static str,
    options: Vec<&'static str>,
}

impl WardrobeCategory {
    fn new(name: &'static str, items: &[&'static str]) -> Self {
        let mut sorted = items.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut options = Vec::with_capacity(sorted.len() + 1);
        options.push(NONE);
        options.extend(sorted);
        Self { name, options }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn options(&self) -> &[&'static str] {
        &self.options
    }
}

lazy_static! {
    pub static ref TOPS: WardrobeCategory = WardrobeCategory::new("top", &[
        "T-shirt", "Tank top", "Crop top", "Hoodie", "Sweater", "Blouse",
        "Bodysuit", "Bustier", "Corset", "Corset top", "Lace camisole",
        "Satin camisole", "Sheer blouse", "Chiffon blouse", "Mesh top",
        "Fishnet top", "Off-shoulder top", "One-shoulder top", "Halter top",
        "Tube top", "Plunge neckline top", "Deep V-neck top", "Wrap top",
        "Peplum top", "Ribbed knit top", "Turtleneck", "Mock neck top",
        "Sleeveless turtleneck", "Cardigan", "Cropped cardigan", "Bolero shrug",
        "Band t-shirt", "Graphic tee", "Long sleeve top", "Cropped hoodie",
        "Gothic lace top", "Harness top",
    ]);

    pub static ref BOTTOMS: WardrobeCategory = WardrobeCategory::new("bottom", &[
        "Jeans", "Shorts", "Skirt", "Leggings", "Joggers", "Cargo pants",
        "Mini skirt", "Maxi skirt", "Slacks", "Denim skirt", "Micro skirt",
        "Pleated skirt", "Tennis skirt", "Pencil skirt", "Wrap skirt",
        "Asymmetrical skirt", "High-slit skirt", "Leather skirt", "Latex skirt",
        "Plaid skirt", "Denim shorts", "Micro shorts", "High-waisted shorts",
        "Biker shorts", "Hot pants", "Leather pants", "Ripped jeans",
        "Skinny jeans", "High-waisted jeans", "Bell bottoms", "Flare pants",
        "Wide-leg pants", "Palazzo pants", "Track pants", "Sweatpants",
        "Yoga pants", "Fishnet leggings", "Suspender skirt",
    ]);

    pub static ref LINGERIE_TOPS: WardrobeCategory = WardrobeCategory::new("lingerie_top", &[
        "Bralette", "Lace bralette", "Satin bra", "Push-up bra",
        "Balconette bra", "Plunge bra", "Strapless bra", "Triangle bra",
        "Sheer bra", "Lace bra", "Longline bra", "Cage bra", "Harness bra",
        "Lace bustier", "Lingerie corset", "Overbust corset",
        "Babydoll top", "Teddy lingerie",
    ]);

    pub static ref LINGERIE_BOTTOMS: WardrobeCategory = WardrobeCategory::new("lingerie_bottom", &[
        "Lace panties", "Thong", "G-string", "Bikini briefs",
        "Cheeky briefs", "High-waisted panties", "Satin panties",
        "Sheer panties", "Strappy panties", "Garter belt",
        "Suspender belt", "Thigh garters", "Stockings",
        "Fishnet stockings", "Thigh-highs", "Hold-up stockings",
        "Bodystocking", "Sheer tights", "Fishnet tights",
    ]);

    pub static ref OUTERWEAR: WardrobeCategory = WardrobeCategory::new("outerwear", &[
        "Trench coat", "Wool coat", "Long coat", "Peacoat", "Puffer jacket",
        "Parka", "Bomber jacket", "Denim jacket", "Leather jacket",
        "Moto jacket", "Blazer", "Oversized blazer", "Cardigan",
        "Long cardigan", "Cropped jacket", "Zip hoodie", "Windbreaker",
        "Faux fur coat", "Cape", "Poncho", "Kimono", "Shawl",
        "Wrap coat", "Duster coat", "Belted coat", "Suit jacket",
        "Satin robe",
    ]);

    pub static ref SHOES: WardrobeCategory = WardrobeCategory::new("shoes", &[
        "Sneakers", "Boots", "Heels", "Platform shoes", "Sandals", "Flats",
        "Strappy heels", "Stilettos", "Pumps", "Wedges", "Ankle boots",
        "Knee-high boots", "Thigh-high boots", "Combat boots",
        "Platform heels", "Heeled boots", "Strappy sandals",
        "Gladiator sandals", "Mules", "Slides", "Ballet flats",
        "Cowboy boots", "Pointed-toe heels", "Clear heels",
        "Lace-up heels", "Thigh-high heeled boots", "Barefoot",
    ]);

    pub static ref ACCESSORIES: WardrobeCategory = WardrobeCategory::new("accessory", &[
        "Belt", "Chain belt", "Sunglasses", "Eyeglasses", "Beanie",
        "Baseball cap", "Handbag", "Backpack", "Headphones", "Watch",
        "Choker", "Leather choker", "Spiked choker", "Body harness",
        "Leather harness", "Necklace", "Pendant necklace",
        "Layered necklace", "Chain necklace", "Earrings", "Hoop earrings",
        "Stud earrings", "Bangles", "Rings", "Stacked rings",
        "Nose ring", "Septum ring", "Body chain", "Waist chain",
        "Scarf", "Silk scarf", "Necktie", "Bow tie", "Bracelets",
        "Anklet", "Clutch bag", "Tote bag",
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_first_then_sorted() {
        for category in [
            &*TOPS,
            &*BOTTOMS,
            &*LINGERIE_TOPS,
            &*LINGERIE_BOTTOMS,
            &*OUTERWEAR,
            &*SHOES,
            &*ACCESSORIES,
        ] {
            let options = category.options();
            assert_eq!(options[0], NONE, "{}", category.name());
            assert!(options[1..].windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_capitalized_entries_sort_before_lowercase_words() {
        assert_eq!(TOPS.options()[1], "Band t-shirt");
        assert!(SHOES.options().contains(&"Barefoot"));
    }
}
