//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod base16;
pub mod batch_cache;
pub mod extraction;
pub mod palette_cache;
pub mod palette_generator;
mod path_prompt;

pub use batch_cache::BatchCacher;
pub use palette_generator::PaletteGenerator;
