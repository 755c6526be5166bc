//! 单元测试共用的图片构造工具。

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// 构造带渐变的不透明 RGBA 网格。
pub(crate) fn gradient_grid(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let r = (x % 255) as u8;
        let g = (y % 255) as u8;
        let b = ((x + y) % 255) as u8;
        Rgba([r, g, b, 255])
    })
}

pub(crate) fn encode_as(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .expect("failed to encode test image");
    cursor.into_inner()
}

pub(crate) fn png_bytes(grid: &RgbaImage) -> Vec<u8> {
    encode_as(&DynamicImage::ImageRgba8(grid.clone()), ImageFormat::Png)
}
