//! # 配置模块
//!
//! ## 设计思路
//!
//! 将图片链路中所有“可调上限”集中到 `ImageConfig`，保证运行时行为可观测、可测试。
//! 进程启动时校验一次，之后只读共享，不再支持运行时改动。

use serde::{Deserialize, Serialize};

use super::ImageError;

/// 图片处理配置。
///
/// 字段覆盖上传、解码两个阶段的资源上限。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// 单次上传允许的最大请求体积（字节）。
    pub max_upload_bytes: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 25 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
        }
    }
}

impl ImageConfig {
    /// 启动时校验配置取值范围。
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.max_upload_bytes < 1024 {
            return Err(ImageError::InvalidFormat("max_upload_bytes 不能小于 1KB".to_string()));
        }
        if self.max_upload_bytes > usize::MAX as u64 {
            return Err(ImageError::InvalidFormat("max_upload_bytes 超出平台寻址范围".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(ImageError::InvalidFormat("max_decoded_pixels 必须大于 0".to_string()));
        }
        if self.max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(ImageError::InvalidFormat("max_decoded_bytes 不能小于 8MB".to_string()));
        }

        Ok(())
    }
}
