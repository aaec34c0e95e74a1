//! 以檔案內容雜湊為鍵的調色盤快取

mod sample;
mod store;

pub use sample::{PaletteState, QuantizedSample};
pub use store::{CacheError, CacheStore};
