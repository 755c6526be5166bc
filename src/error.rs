//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义 HTTP 层统一的 `AppError` 枚举，所有路由函数统一返回 `Result<T, AppError>`，
//! 客户端通过 JSON `{"detail": "..."}` 获得可读的错误信息。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - `ImageError::EmptyInput` 上转为 400，`UploadTooLarge` 上转为 413，
//!   其余图片链路错误按操作名包装为 500。
//! - 实现 axum `IntoResponse`，在这里统一决定状态码与日志级别。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::image_handler::ImageError;

/// 出错时正在执行的操作，决定 500 响应的前缀文案。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Tint,
    BackgroundRemoval,
}

impl Operation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Self::Tint => "Tinting failed",
            Self::BackgroundRemoval => "Background removal failed",
        }
    }
}

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 上传字段为空
    #[error("Empty file uploaded")]
    EmptyUpload,

    /// 缺少字段或参数无法解析
    #[error("{0}")]
    Validation(String),

    /// multipart 请求体格式错误
    #[error("{0}")]
    BadRequest(String),

    /// 请求体超过上传上限
    #[error("{0}")]
    PayloadTooLarge(String),

    /// 图片处理流水线错误（解码 / 模型 / 编码）
    #[error("{}: {}", .operation.failure_prefix(), .source)]
    Processing {
        operation: Operation,
        #[source]
        source: ImageError,
    },
}

impl AppError {
    pub fn from_image(operation: Operation, error: ImageError) -> Self {
        match error {
            ImageError::EmptyInput => Self::EmptyUpload,
            too_large @ ImageError::UploadTooLarge { .. } => {
                Self::PayloadTooLarge(too_large.to_string())
            }
            source => Self::Processing { operation, source },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyUpload | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Processing { operation, source } => log::error!(
                "❌ 请求处理失败 - 操作: {:?} 阶段: {} 错误码: {} 详情: {}",
                operation,
                source.stage(),
                source.code(),
                source
            ),
            other => log::warn!("⚠️ 请求被拒绝 - 状态: {} 详情: {}", status.as_u16(), other),
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
