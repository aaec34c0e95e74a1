//! 色彩型別與轉換
//!
//! `Argb` 為快取與輸出使用的 8-bit 色彩；`Hct` 與 `oklab` 提供
//! 調色盤合成所需的感知色彩空間。

mod argb;
mod hct;
mod named;
pub mod oklab;

pub use argb::Argb;
pub use hct::{Hct, hue_distance, normalize_degrees};
pub use named::parse_color;
