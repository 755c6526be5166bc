//! # 着色变换模块
//!
//! ## 设计思路
//!
//! 对所有 alpha > 0 的像素，逐通道向目标色做线性插值：
//!
//! ```text
//! new = clamp(round(old * (1 - factor) + target * factor), 0, 255)
//! ```
//!
//! - alpha 原样保留；alpha == 0 的像素逐字节不动（包括其 RGB）。
//! - 舍入统一使用“远离零的四舍五入”（`f64::round`），127.5 → 128。
//! - `factor` 不做输入截断，超出 [0, 1] 时外推，只对输出通道截断；
//!   非有限值（NaN / ±inf）在路由层以 422 拒绝。

use super::source::PixelGrid;

pub const DEFAULT_TINT_RED: i32 = 102;
pub const DEFAULT_TINT_GREEN: i32 = 212;
pub const DEFAULT_TINT_BLUE: i32 = 255;
pub const DEFAULT_TINT_FACTOR: f64 = 0.2;

/// 着色参数：目标色与混合系数，按请求构造、用完即弃。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintParameters {
    /// 目标色 `[r, g, b]`，名义范围 0–255，越界值只影响外推结果。
    pub target: [i32; 3],
    /// 混合系数，名义范围 [0, 1]。
    pub factor: f64,
}

impl Default for TintParameters {
    fn default() -> Self {
        Self {
            target: [DEFAULT_TINT_RED, DEFAULT_TINT_GREEN, DEFAULT_TINT_BLUE],
            factor: DEFAULT_TINT_FACTOR,
        }
    }
}

impl TintParameters {
    pub fn new(red: i32, green: i32, blue: i32, factor: f64) -> Self {
        Self {
            target: [red, green, blue],
            factor,
        }
    }
}

/// 单通道混合。
pub fn blend_channel(old: u8, target: i32, factor: f64) -> u8 {
    let mixed = f64::from(old) * (1.0 - factor) + f64::from(target) * factor;
    // NaN 经 `as` 转换为 0，与截断后的下界一致
    mixed.round().clamp(0.0, 255.0) as u8
}

/// 原地着色。
pub fn apply_tint(grid: &mut PixelGrid, params: &TintParameters) {
    for pixel in grid.pixels_mut() {
        if pixel[3] == 0 {
            continue;
        }

        for channel in 0..3 {
            pixel[channel] = blend_channel(pixel[channel], params.target[channel], params.factor);
        }
    }
}
