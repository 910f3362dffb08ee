//! 图片处理

mod png_codec;
pub use png_codec::{encode_png, to_base64, Frame};
