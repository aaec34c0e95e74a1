//! 外部協作者：像素擷取、量化與色彩方案
//!
//! 批次流程與單檔產生都只依賴這裡的 trait，測試時可替換成假實作。

mod frame_source;
mod quantizer;
mod scheme;

pub use frame_source::{FfmpegFrameSource, FrameSource, parse_rgb24, sampling_rate};
pub use quantizer::{KMeansQuantizer, MAX_PALETTE_COLORS, MAX_POPULATION_COLORS, Quantizer};
pub use scheme::{ColorMap, FALLBACK_SOURCE, SchemeError, SchemeGenerator, TonalScheme};
