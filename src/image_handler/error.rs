//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图片链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! `EmptyInput` 与 `UploadTooLarge` 单独成枝：两者属于调用方前置条件失败，
//! HTTP 层据此分别返回 400 / 413，其余分支一律视为处理失败。

/// 图片处理统一错误类型。
///
/// 该类型会在路由层被上转为 `AppError`，最终写入 HTTP 响应。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("上传内容为空")]
    EmptyInput,

    #[error("上传体积过大：{size} 字节（限制：{limit} 字节）")]
    UploadTooLarge { size: u64, limit: u64 },

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("背景移除服务错误：{0}")]
    Remover(String),

    #[error("后台任务失败：{0}")]
    Task(String),
}

impl ImageError {
    /// 稳定错误码，供日志检索。
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::UploadTooLarge { .. } => "upload_too_large",
            Self::InvalidFormat(_) => "invalid_format",
            Self::Decode(_) => "decode_failed",
            Self::Encode(_) => "encode_failed",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Remover(_) => "remover_failed",
            Self::Task(_) => "task_failed",
        }
    }

    /// 出错所在的处理阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::UploadTooLarge { .. } | Self::InvalidFormat(_) => "load",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::Encode(_) => "encode",
            Self::Remover(_) => "remove",
            Self::Task(_) => "task",
        }
    }
}
