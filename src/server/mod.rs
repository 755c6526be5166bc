//! # HTTP 服务
//!
//! 负责路由注册、跨域、请求体上限、请求日志与优雅退出。
//!
//! | 路由 | 说明 |
//! |------|------|
//! | `GET /health` | 健康检查 |
//! | `POST /remove-background` | 外部模型移除背景 |
//! | `POST /tint` | 对非透明像素着色 |

pub mod cors;
pub mod routes;

use std::time::Instant;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};

use crate::image_handler::{ImageError, ImageServiceState};
use crate::settings::{AppSettings, SettingsError};

/// multipart 边界与文本字段的额外开销。
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("网络错误：{0}")]
    Io(#[from] std::io::Error),
}

/// 构建完整路由。
pub fn build_router(
    state: ImageServiceState,
    settings: &AppSettings,
) -> Result<Router, ServerError> {
    let body_limit = usize::try_from(state.config().max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let router = Router::new()
        .route("/health", get(routes::health))
        .route("/remove-background", post(routes::remove_background))
        .route("/tint", post(routes::tint))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(log_request))
        .layer(cors::cors_layer(&settings.cors)?)
        .with_state(state);

    Ok(router)
}

/// 绑定端口并运行，直到收到 Ctrl-C。
pub async fn serve(router: Router, settings: &AppSettings) -> Result<(), ServerError> {
    let address = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    log::info!("🚀 服务已启动 - 监听: {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("👋 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("⚠️ 无法监听退出信号，服务将持续运行: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("🛑 收到退出信号，等待进行中的请求完成");
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({}ms)",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );

    response
}
