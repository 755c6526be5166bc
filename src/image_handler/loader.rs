//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 在“尽可能早”的阶段执行输入校验，尽快失败，减少不必要的内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 空内容：显式前置检查，返回 `ImageError::EmptyInput`。
//! - 体积：超过 `max_upload_bytes` 直接拒绝。
//! - 签名：magic bytes 明确识别为非图片类型（压缩包、文档等）时直接拒绝，
//!   无法识别的签名交给解码器判断。仅着色链路使用，背景移除原样交给模型。

use super::source::RawImageData;
use super::{ImageConfig, ImageError, ImageHandler};

impl ImageHandler {
    /// 接收上传字节：空内容与体积检查。
    pub(super) fn load_upload(
        bytes: Vec<u8>,
        config: &ImageConfig,
        source_hint: &'static str,
    ) -> Result<RawImageData, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::EmptyInput);
        }

        let size = bytes.len() as u64;
        if size > config.max_upload_bytes {
            return Err(ImageError::UploadTooLarge {
                size,
                limit: config.max_upload_bytes,
            });
        }

        log::debug!("📥 接收上传 - 来源: {} 体积: {} 字节", source_hint, bytes.len());

        Ok(RawImageData { bytes, source_hint })
    }

    /// 通过文件签名（magic bytes）排除明确的非图片输入。
    pub(super) fn validate_image_signature(bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::EmptyInput);
        }

        // infer 不认识的签名（如 PNM、QOI）交给解码器判断
        let Some(kind) = infer::get(bytes) else {
            return Ok(());
        };

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ImageError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}
