//! 跨域策略。
//!
//! 白名单中出现 `*` 时回显请求的 Origin：浏览器不接受 `*` 与携带凭证同时出现，
//! 回显可以保持“任意来源 + 允许凭证”的既有行为。方法与请求头同样回显。

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::settings::{CorsConfig, SettingsError};

pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, SettingsError> {
    let origin = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim())
                    .map_err(|e| SettingsError::Invalid(format!("CORS 来源无效 {:?}：{}", origin, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
