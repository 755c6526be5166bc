//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `ImageServiceState` 作为路由层的注入状态，替代全局单例：
//! 1. 生命周期清晰（由 `main.rs` 在启动时构造一次）
//! 2. 测试可注入假的背景移除实现
//! 3. 请求之间不共享任何可变状态
//!
//! ## 实现思路
//!
//! - `tint`：CPU 密集，放到 tokio 阻塞线程池执行，不占用异步工作线程。
//! - `remove_background`：前置校验 → 外部模型 → 空输出检查 → 重编码 / 透传。
//! - 两者都以 PNG Data URL 作为最终输出。

use std::sync::Arc;
use std::time::Instant;

use super::data_url::to_png_data_url;
use super::remover::BackgroundRemover;
use super::tint::TintParameters;
use super::{ImageConfig, ImageError, ImageHandler};

/// 图片处理服务状态。
///
/// 内部全部为只读共享句柄，克隆开销只是引用计数。
#[derive(Clone)]
pub struct ImageServiceState {
    handler: Arc<ImageHandler>,
    remover: Arc<dyn BackgroundRemover>,
}

impl ImageServiceState {
    /// 使用默认配置创建服务状态。
    pub fn new(remover: Arc<dyn BackgroundRemover>) -> Result<Self, ImageError> {
        Self::with_config(ImageConfig::default(), remover)
    }

    /// 使用自定义配置创建服务状态。
    pub fn with_config(
        config: ImageConfig,
        remover: Arc<dyn BackgroundRemover>,
    ) -> Result<Self, ImageError> {
        Ok(Self {
            handler: Arc::new(ImageHandler::new(config)?),
            remover,
        })
    }

    pub fn config(&self) -> &ImageConfig {
        self.handler.config()
    }

    /// 着色并返回 PNG Data URL。
    pub async fn tint(&self, bytes: Vec<u8>, params: TintParameters) -> Result<String, ImageError> {
        let handler = Arc::clone(&self.handler);

        let png = tokio::task::spawn_blocking(move || handler.tint(bytes, &params))
            .await
            .map_err(|e| ImageError::Task(format!("着色任务异常终止：{}", e)))??;

        Ok(to_png_data_url(&png))
    }

    /// 调用外部模型移除背景并返回 PNG Data URL。
    pub async fn remove_background(&self, bytes: Vec<u8>) -> Result<String, ImageError> {
        let total_start = Instant::now();
        let input = self.handler.prepare_for_removal(bytes)?;
        let input_len = input.len();

        let remove_start = Instant::now();
        let output = self.remover.remove(input).await?;
        let remove_elapsed = remove_start.elapsed();

        let handler = Arc::clone(&self.handler);
        let normalized = tokio::task::spawn_blocking(move || handler.finish_removal(output))
            .await
            .map_err(|e| ImageError::Task(format!("重编码任务异常终止：{}", e)))??;

        log::info!(
            "🪄 背景移除完成 - 模型: {} 输入: {} 字节 输出: {} 字节 重编码: {} 耗时(ms): remove={} total={}",
            self.remover.name(),
            input_len,
            normalized.as_bytes().len(),
            normalized.is_reencoded(),
            remove_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(to_png_data_url(&normalized.into_bytes()))
    }
}
