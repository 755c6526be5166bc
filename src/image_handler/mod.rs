//! # 图片处理模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将“上传校验 → 解码 → 变换 → 编码 → Data URL”按职责拆分为多个子模块，
//! 避免单文件膨胀与耦合。
//!
//! - `service`：承载可注入状态（`ImageServiceState`）
//! - `handler`：编排同步处理流水线
//! - `loader`：负责上传字节的空内容 / 体积 / 签名校验
//! - `pipeline`：负责解码、像素限制、PNG 编码与模型输出规范化
//! - `tint`：着色变换
//! - `remover`：外部背景移除模型的边界与 HTTP 实现
//! - `data_url`：响应内联图片编码
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! HTTP 请求
//!    ↓
//! server/routes.rs（multipart 解析 + 参数适配）
//!    ↓
//! service.rs（State 注入、阻塞线程池调度）
//!    ├─ handler.rs（着色：load → decode → tint → encode）
//!    └─ remover.rs（外部模型）→ handler.rs（空输出检查 + 重编码 / 透传）
//!    ↓
//! data_url.rs → JSON 响应
//! ```

mod config;
pub mod data_url;
mod error;
mod handler;
mod loader;
mod pipeline;
pub mod remover;
mod service;
mod source;
pub mod tint;

pub use config::ImageConfig;
pub use error::ImageError;
pub use handler::ImageHandler;
pub use remover::{BackgroundRemover, HttpBackgroundRemover, RemovalFuture, RemoverConfig};
pub use service::ImageServiceState;
pub use source::{NormalizedOutput, PixelGrid};
pub use tint::{TintParameters, apply_tint};
