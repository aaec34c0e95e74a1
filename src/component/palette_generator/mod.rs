//! 單檔產生調色盤
//!
//! 流程：計算雜湊 → 讀取或建立快取 → 記錄狀態 → 色彩方案 → 16 色調色盤
//! 也可以直接從單一顏色產生，跳過媒體與快取

mod engine;
mod main;
mod render;

pub use engine::{GeneratedPalette, PaletteEngine, PaletteSource};
pub use main::PaletteGenerator;
pub use render::{render_palette, swatch};
