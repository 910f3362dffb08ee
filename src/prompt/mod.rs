//! 提示词组合节点

pub mod edit_composer;
pub mod exposure;
pub mod outfit_composer;
pub mod prompt_builder;
pub mod prose;

pub use edit_composer::{EditRecord, EditRequest, EditSlot};
pub use exposure::{ExposurePolicy, ExposureToggles};
pub use outfit_composer::OutfitSelection;
pub use prompt_builder::{BuiltPrompt, PromptBuilder, PromptFields, PromptMirror};

#[cfg(feature = "python")]
mod image_edit_composer_node;
#[cfg(feature = "python")]
mod outfit_composer_node;
#[cfg(feature = "python")]
mod prompt_builder_node;

#[cfg(feature = "python")]
pub use image_edit_composer_node::KPPBImageEditComposer;
#[cfg(feature = "python")]
pub use outfit_composer_node::KPPBOutfitComposer;
#[cfg(feature = "python")]
pub use prompt_builder_node::KPPBPromptBuilder;
