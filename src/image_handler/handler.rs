//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责同步的流程编排，不直接与 HTTP 或外部模型绑定。
//! 着色链路固定为：
//! 1. 接收上传（空内容 / 体积检查）
//! 2. 签名校验并解码为 RGBA 网格
//! 3. 原地着色
//! 4. 编码 PNG
//!
//! ## 实现思路
//!
//! - 配置在构造时校验一次，之后只读，单次请求内天然一致。
//! - 记录 `load/decode/tint/encode/total` 阶段耗时，便于性能诊断。

use std::time::Instant;

use super::source::{NormalizedOutput, RawImageData};
use super::tint::{TintParameters, apply_tint};
use super::{ImageConfig, ImageError};

/// 图片处理器。
pub struct ImageHandler {
    config: ImageConfig,
}

impl ImageHandler {
    /// 根据配置创建处理器。
    ///
    /// # 示例
    /// ```rust
    /// use morph_canvas_backend::image_handler::{ImageConfig, ImageHandler};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default())?;
    /// # Ok::<(), morph_canvas_backend::image_handler::ImageError>(())
    /// ```
    pub fn new(config: ImageConfig) -> Result<Self, ImageError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// 着色主入口：上传字节 → 着色后的 PNG 字节。
    pub fn tint(&self, bytes: Vec<u8>, params: &TintParameters) -> Result<Vec<u8>, ImageError> {
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = Self::load_upload(bytes, &self.config, "tint")?;
        Self::validate_image_signature(&raw.bytes)?;
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let mut grid = Self::decode_to_grid(&raw, &self.config)?;
        let decode_elapsed = decode_start.elapsed();

        let tint_start = Instant::now();
        apply_tint(&mut grid, params);
        let tint_elapsed = tint_start.elapsed();

        let encode_start = Instant::now();
        let png = Self::encode_png(&grid)?;
        let encode_elapsed = encode_start.elapsed();

        log::info!(
            "🎨 着色完成 - 尺寸: {}x{} 目标色: {:?} factor: {} 耗时(ms): load={} decode={} tint={} encode={} total={}",
            grid.width(),
            grid.height(),
            params.target,
            params.factor,
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            tint_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(png)
    }

    /// 背景移除前置：只做空内容与体积检查，字节原样交给模型。
    pub fn prepare_for_removal(&self, bytes: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        Self::load_upload(bytes, &self.config, "remove-background").map(|raw| raw.bytes)
    }

    /// 背景移除后置：空输出视为模型失败，其余走重编码 / 透传。
    pub fn finish_removal(&self, output: Vec<u8>) -> Result<NormalizedOutput, ImageError> {
        if output.is_empty() {
            return Err(ImageError::Remover("模型输出为空".to_string()));
        }

        let raw = RawImageData {
            bytes: output,
            source_hint: "remover-output",
        };

        Ok(Self::normalize_output(raw, &self.config))
    }
}
