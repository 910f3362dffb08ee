//! 参考帧编码
//!
//! ComfyUI 的 IMAGE 为 NHWC 浮点张量, 取值 0..1。

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb, Rgba};

use crate::error::Error;

/// 单帧像素
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
    /// HWC 排列
    pub data: Vec<f32>,
}

impl Frame {
    /// 从 NHWC 数据中取出第一帧
    pub fn first_of_batch(shape: &[usize], data: &[f32]) -> Result<Self, Error> {
        let (height, width, channels) = match shape {
            [_, h, w, c] => (*h, *w, *c),
            [h, w, c] => (*h, *w, *c),
            _ => {
                return Err(Error::InvalidParameter(format!(
                    "expected an NHWC image tensor, got shape {shape:?}"
                )))
            }
        };

        let len = height * width * channels;
        if len == 0 || data.len() < len {
            return Err(Error::InvalidParameter(format!(
                "image tensor is empty or truncated, shape {shape:?}"
            )));
        }

        Ok(Self {
            height,
            width,
            channels,
            data: data[..len].to_vec(),
        })
    }

    /// 转换为图像, 数值缩放并截断到 0..255
    pub fn to_image(&self) -> Result<DynamicImage, Error> {
        let data: Vec<u8> = self
            .data
            .iter()
            .map(|&x| (255.0 * x).clamp(0.0, 255.0) as u8)
            .collect();
        let (width, height) = (self.width as u32, self.height as u32);

        let image = match self.channels {
            1 => DynamicImage::ImageLuma8(
                ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(width, height, data)
                    .ok_or(Error::ImageBuffer)?,
            ),
            3 => DynamicImage::ImageRgb8(
                ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(width, height, data)
                    .ok_or(Error::ImageBuffer)?,
            ),
            4 => DynamicImage::ImageRgba8(
                ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, data)
                    .ok_or(Error::ImageBuffer)?,
            ),
            n => return Err(Error::UnsupportedNumberOfChannels(n)),
        };
        Ok(image)
    }

    pub fn to_png(&self) -> Result<Vec<u8>, Error> {
        encode_png(&self.to_image()?)
    }
}

/// PNG 编码
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, Error> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// base64 编码, 用于守护进程的 images 字段
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
