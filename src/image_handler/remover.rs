//! # 背景移除（外部模型）
//!
//! ## 设计思路
//!
//! 背景分割完全交给外部模型，这里只定义它的边界：字节进、字节出，可能失败、可能很慢。
//! 通过 `BackgroundRemover` trait 抽象，启动时构造一次，以 `Arc<dyn BackgroundRemover>`
//! 注入服务层，测试中可替换为假实现。
//!
//! ## 实现思路
//!
//! 生产实现 `HttpBackgroundRemover` 将图片以 multipart 字段 `file` 转发给 rembg 的
//! HTTP 服务（`POST /api/remove`），复用同一个 `reqwest::Client`。
//! 不做重试、不设处理超时，只限制建立连接的耗时。

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ImageError;

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// 背景移除调用的返回 future。
pub type RemovalFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, ImageError>> + Send + 'a>>;

/// 外部背景移除模型的抽象。
pub trait BackgroundRemover: Send + Sync {
    /// 返回去除背景后的图片字节，期望为带透明通道的 PNG，但不做保证。
    fn remove(&self, bytes: Vec<u8>) -> RemovalFuture<'_>;

    /// 日志中使用的实现名称。
    fn name(&self) -> &'static str;
}

/// rembg HTTP 服务配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoverConfig {
    /// 完整的移除接口地址。
    pub endpoint: String,
    /// 建立连接（TCP/TLS）超时时间（秒）。
    pub connect_timeout_secs: u64,
}

impl Default for RemoverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:7000/api/remove".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl RemoverConfig {
    pub fn validate(&self) -> Result<(), ImageError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| ImageError::InvalidFormat(format!("remover endpoint 格式错误：{}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ImageError::InvalidFormat(format!(
                "remover endpoint 仅支持 http/https：{}",
                url.scheme()
            )));
        }
        if !(1..=120).contains(&self.connect_timeout_secs) {
            return Err(ImageError::InvalidFormat(
                "connect_timeout_secs 必须在 1~120 秒之间".to_string(),
            ));
        }

        Ok(())
    }
}

/// 通过 HTTP 调用 rembg 服务的背景移除实现。
pub struct HttpBackgroundRemover {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpBackgroundRemover {
    pub fn new(config: &RemoverConfig) -> Result<Self, ImageError> {
        config.validate()?;

        let endpoint = reqwest::Url::parse(&config.endpoint)
            .map_err(|e| ImageError::InvalidFormat(format!("remover endpoint 格式错误：{}", e)))?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ImageError::Remover(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self { client, endpoint })
    }

    async fn remove_via_http(&self, bytes: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        log::debug!("📡 调用背景移除服务 - 体积: {} 字节", bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes).file_name("upload");
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageError::Remover(format!("请求失败：{}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
            return Err(ImageError::Remover(format!(
                "服务返回 HTTP {}：{}",
                status.as_u16(),
                preview.trim()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ImageError::Remover(format!("读取响应失败：{}", e)))?;

        Ok(body.to_vec())
    }
}

impl BackgroundRemover for HttpBackgroundRemover {
    fn remove(&self, bytes: Vec<u8>) -> RemovalFuture<'_> {
        Box::pin(self.remove_via_http(bytes))
    }

    fn name(&self) -> &'static str {
        "rembg-http"
    }
}
