//! # 应用配置
//!
//! 配置来源按优先级从低到高：
//! 1. 内置默认值（与线上部署一致：`0.0.0.0:5000`、前端域名白名单、本机 rembg 服务）
//! 2. `MORPH_CANVAS_CONFIG` 指向的 JSON 文件（缺失字段取默认值，文件损坏时回退默认并告警）
//! 3. 环境变量覆盖
//!
//! 启动时整体校验一次，之后只读。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::image_handler::{ImageConfig, ImageError, RemoverConfig};

pub const CONFIG_PATH_ENV: &str = "MORPH_CANVAS_CONFIG";
pub const HOST_ENV: &str = "MORPH_CANVAS_HOST";
pub const PORT_ENV: &str = "MORPH_CANVAS_PORT";
pub const CORS_ORIGINS_ENV: &str = "MORPH_CANVAS_CORS_ORIGINS";
pub const MAX_UPLOAD_BYTES_ENV: &str = "MORPH_CANVAS_MAX_UPLOAD_BYTES";
pub const MAX_DECODED_PIXELS_ENV: &str = "MORPH_CANVAS_MAX_DECODED_PIXELS";
pub const REMBG_URL_ENV: &str = "REMBG_URL";
pub const REMBG_CONNECT_TIMEOUT_ENV: &str = "REMBG_CONNECT_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("环境变量 {name} 取值无效：{value:?}（{reason}）")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("配置无效：{0}")]
    Invalid(String),

    #[error(transparent)]
    Image(#[from] ImageError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// 跨域配置。`*` 表示放行任意来源（回显请求 Origin，以便同时允许携带凭证）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "*".to_string(),
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "https://morphs-canvas.vercel.app".to_string(),
            ],
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub image: ImageConfig,
    pub remover: RemoverConfig,
}

impl AppSettings {
    /// 从进程环境加载完整配置。
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load_from_path(Path::new(path.trim())),
            _ => Self::default(),
        };

        settings.apply_overrides(|name| std::env::var(name).ok())?;
        settings.validate()?;

        Ok(settings)
    }

    /// 读取 JSON 配置文件；文件不存在或内容损坏时回退默认值。
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            log::warn!("⚠️ 配置文件不存在，使用默认配置: {}", path.display());
            return Self::default();
        }

        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str::<Self>(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(settings) => {
                log::info!("⚙️ 已加载配置文件: {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("⚠️ 配置文件解析失败，使用默认配置: {}（{}）", path.display(), err);
                Self::default()
            }
        }
    }

    /// 应用环境变量覆盖。`lookup` 便于测试时注入假环境。
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(host) = read(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(port) = read(PORT_ENV) {
            self.server.port = parse_number(PORT_ENV, &port)?;
        }
        if let Some(origins) = read(CORS_ORIGINS_ENV) {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(limit) = read(MAX_UPLOAD_BYTES_ENV) {
            self.image.max_upload_bytes = parse_number(MAX_UPLOAD_BYTES_ENV, &limit)?;
        }
        if let Some(limit) = read(MAX_DECODED_PIXELS_ENV) {
            self.image.max_decoded_pixels = parse_number(MAX_DECODED_PIXELS_ENV, &limit)?;
        }
        if let Some(url) = read(REMBG_URL_ENV) {
            self.remover.endpoint = url;
        }
        if let Some(timeout) = read(REMBG_CONNECT_TIMEOUT_ENV) {
            self.remover.connect_timeout_secs = parse_number(REMBG_CONNECT_TIMEOUT_ENV, &timeout)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.server.host.trim().is_empty() {
            return Err(SettingsError::Invalid("server.host 不能为空".to_string()));
        }
        if self.cors.allowed_origins.is_empty() {
            return Err(SettingsError::Invalid("cors.allowed_origins 至少需要一个来源".to_string()));
        }

        self.image.validate()?;
        self.remover.validate()?;
        Ok(())
    }
}

fn parse_number<T>(name: &'static str, value: &str) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| SettingsError::InvalidEnv {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir() -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("morph-canvas-settings-test-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_deployment() {
        let settings = AppSettings::default();

        assert_eq!(settings.server.bind_address(), "0.0.0.0:5000");
        assert!(settings.cors.allows_any_origin());
        assert!(
            settings
                .cors
                .allowed_origins
                .contains(&"https://morphs-canvas.vercel.app".to_string())
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn load_partial_file_keeps_other_defaults() {
        let dir = unique_temp_dir();
        let path = dir.join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"port": 8080}, "remover": {"endpoint": "http://rembg:7000/api/remove"}}"#,
        )
        .expect("write config");

        let settings = AppSettings::load_from_path(&path);

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.remover.endpoint, "http://rembg:7000/api/remove");
        assert_eq!(settings.image, ImageConfig::default());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn load_bad_file_falls_back_to_defaults() {
        let dir = unique_temp_dir();
        let path = dir.join("settings.json");
        std::fs::write(&path, "not-json").expect("write invalid config");

        assert_eq!(AppSettings::load_from_path(&path), AppSettings::default());
        assert_eq!(AppSettings::load_from_path(&dir.join("missing.json")), AppSettings::default());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn env_overrides_replace_values() {
        let mut settings = AppSettings::default();
        settings
            .apply_overrides(env(&[
                (HOST_ENV, "127.0.0.1"),
                (PORT_ENV, "9000"),
                (CORS_ORIGINS_ENV, "http://a.test, http://b.test ,"),
                (MAX_UPLOAD_BYTES_ENV, "4096"),
                (REMBG_URL_ENV, "https://rembg.internal/api/remove"),
                (REMBG_CONNECT_TIMEOUT_ENV, "3"),
            ]))
            .expect("overrides should apply");

        assert_eq!(settings.server.bind_address(), "127.0.0.1:9000");
        assert_eq!(settings.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!settings.cors.allows_any_origin());
        assert_eq!(settings.image.max_upload_bytes, 4096);
        assert_eq!(settings.remover.endpoint, "https://rembg.internal/api/remove");
        assert_eq!(settings.remover.connect_timeout_secs, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut settings = AppSettings::default();
        settings
            .apply_overrides(env(&[(HOST_ENV, "   "), (PORT_ENV, "")]))
            .expect("blank overrides are ignored");

        assert_eq!(settings.server, ServerConfig::default());
    }

    #[test]
    fn invalid_numeric_env_is_rejected() {
        let mut settings = AppSettings::default();
        let result = settings.apply_overrides(env(&[(PORT_ENV, "not-a-port")]));

        assert!(matches!(result, Err(SettingsError::InvalidEnv { name: PORT_ENV, .. })));
    }

    #[test]
    fn validate_rejects_bad_remover_endpoint() {
        let mut settings = AppSettings::default();
        settings.remover.endpoint = "not a url".to_string();

        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Image(ImageError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let server = ServerConfig {
            host: "::1".to_string(),
            port: 5000,
        };

        assert_eq!(server.bind_address(), "[::1]:5000");
    }
}
