pub mod load;
pub mod save;
pub mod types;

pub use types::{
    APP_NAME, Base16Method, Base16Settings, BaseColors, Config, MAX_RECENT_PATHS, MediaKind,
    MediaTypeTable, PreviewFormat, UserSettings,
};
