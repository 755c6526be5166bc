//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入”和“流水线中间结果”解耦：
//! - `RawImageData` 表示已接收但未解码的字节
//! - `PixelGrid` 表示解码后的 RGBA 像素网格
//! - `NormalizedOutput` 表示背景移除结果的规范化去向

use image::RgbaImage;

/// 解码后的 RGBA8 像素网格，每行长度一致。
pub type PixelGrid = RgbaImage;

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 背景移除输出的规范化结果。
///
/// 外部模型的输出不保证是严格的 PNG，这里显式区分两种去向，
/// 避免把“重编码失败”藏进被吞掉的错误里。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedOutput {
    /// 成功解码并重新编码为 PNG。
    Reencoded(Vec<u8>),
    /// 无法解码，原样透传模型输出。
    PassedThrough(Vec<u8>),
}

impl NormalizedOutput {
    pub fn is_reencoded(&self) -> bool {
        matches!(self, Self::Reencoded(_))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Reencoded(bytes) | Self::PassedThrough(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Reencoded(bytes) | Self::PassedThrough(bytes) => bytes,
        }
    }
}
