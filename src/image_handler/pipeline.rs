//! # 解码与编码流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → RGBA 像素网格 → PNG 字节”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素 / 内存上限快速拒绝
//! 3. 完整解码并转换为 RGBA8
//! 4. 输出统一编码为 PNG（无损、保留 alpha）

use image::{GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;

use super::source::{NormalizedOutput, PixelGrid, RawImageData};
use super::{ImageConfig, ImageError, ImageHandler};

impl ImageHandler {
    /// 将原始字节解码为 RGBA 像素网格。
    pub(crate) fn decode_to_grid(
        raw: &RawImageData,
        config: &ImageConfig,
    ) -> Result<PixelGrid, ImageError> {
        image::guess_format(&raw.bytes)
            .map_err(|e| ImageError::InvalidFormat(format!("不支持的图片格式：{}", e)))?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        Self::validate_pixel_limits(config, width, height)?;
        Self::validate_decoded_memory_limits(config, width, height)?;

        let grid = decoded.to_rgba8();

        log::debug!(
            "✅ 图片解码成功 - 来源: {} 尺寸: {}x{}",
            raw.source_hint,
            width,
            height
        );

        Ok(grid)
    }

    /// 将像素网格编码为 PNG 字节。
    pub(crate) fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>, ImageError> {
        let mut buf = Vec::new();
        grid.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;
        Ok(buf)
    }

    /// 背景移除输出的两步规范化：能解码则重编码为 PNG，否则原样透传。
    pub(crate) fn normalize_output(raw: RawImageData, config: &ImageConfig) -> NormalizedOutput {
        let reencoded = Self::decode_to_grid(&raw, config).and_then(|grid| Self::encode_png(&grid));

        match reencoded {
            Ok(png) => NormalizedOutput::Reencoded(png),
            Err(err) => {
                log::warn!(
                    "⚠️ 模型输出无法重编码，原样透传 - 来源: {} 原因: {}",
                    raw.source_hint,
                    err
                );
                NormalizedOutput::PassedThrough(raw.bytes)
            }
        }
    }

    /// 仅通过内存中的图片头信息读取宽高。
    ///
    /// 用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ImageError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}
