//! # Morph Canvas 图片处理后端 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                前端 (Next.js, multipart 上传)             │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ HTTP (JSON: processedImageUrl / detail)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ server ─────── axum 路由 · CORS · 请求日志            │
//! │  │                                                       │
//! │  ├─ error ──────── AppError (HTTP 状态码映射)             │
//! │  │                                                       │
//! │  ├─ image_handler  上传校验 · 解码 · 着色 · PNG · Data URL│
//! │  │   └─ remover    外部背景移除模型 (rembg HTTP)          │
//! │  │                                                       │
//! │  └─ settings ───── 默认值 · JSON 文件 · 环境变量          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有路由函数的错误返回类型 |
//! | [`image_handler`] | 着色变换、背景移除编排、图片编解码 |
//! | [`server`] | 路由注册、跨域、请求体上限、优雅退出 |
//! | [`settings`] | 启动配置加载与校验 |

pub mod error;
pub mod image_handler;
pub mod server;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;
