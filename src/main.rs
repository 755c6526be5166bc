//! # Morph Canvas 图片处理后端 — 应用入口
//!
//! 本文件仅负责日志、配置、外部模型与 HTTP 服务的初始化。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::sync::Arc;

use morph_canvas_backend::image_handler::{HttpBackgroundRemover, ImageServiceState};
use morph_canvas_backend::server::{self, ServerError};
use morph_canvas_backend::settings::AppSettings;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("❌ 服务异常退出: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    log::info!("setup: begin");

    let settings = AppSettings::load()?;
    log::info!(
        "setup: settings loaded (bind={}, remover={}, max_upload_bytes={})",
        settings.server.bind_address(),
        settings.remover.endpoint,
        settings.image.max_upload_bytes
    );

    // 外部模型句柄只构造一次，之后只读共享
    let remover = Arc::new(HttpBackgroundRemover::new(&settings.remover)?);
    let state = ImageServiceState::with_config(settings.image.clone(), remover)?;
    log::info!("setup: image service ready");

    let router = server::build_router(state, &settings)?;
    server::serve(router, &settings).await
}
