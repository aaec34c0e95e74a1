use crate::color::Argb;
use crate::component::base16::FinishTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "media_palette";
pub const MAX_RECENT_PATHS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaTypeTable {
    #[serde(rename = "IMAGE_FILE")]
    pub image_file: Vec<String>,
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    #[must_use]
    pub const fn is_video(self) -> bool {
        matches!(self, Self::Video)
    }
}

impl MediaTypeTable {
    /// 依副檔名判斷媒體類型，不在白名單內回傳 `None`
    #[must_use]
    pub fn media_kind(&self, path: &Path) -> Option<MediaKind> {
        let ext = path.extension().and_then(|ext| ext.to_str())?;
        let dotted = format!(".{}", ext.to_lowercase());

        if self.video_file.iter().any(|e| e.eq_ignore_ascii_case(&dotted)) {
            Some(MediaKind::Video)
        } else if self.image_file.iter().any(|e| e.eq_ignore_ascii_case(&dotted)) {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_media_file(&self, path: &Path) -> bool {
        self.media_kind(path).is_some()
    }
}

/// Base16 產生方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Base16Method {
    /// 將固定色混向主色
    #[default]
    Static,
    /// 直接從取樣色中挑選色相
    Dynamic,
}

impl fmt::Display for Base16Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// 影片預覽圖格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFormat {
    #[default]
    Jpg,
    Jpeg,
    Png,
    Webm,
}

impl PreviewFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webm => "webm",
        }
    }
}

impl fmt::Display for PreviewFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 靜態模式使用的 8 個基底色
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseColors {
    pub black: Argb,
    pub red: Argb,
    pub green: Argb,
    pub yellow: Argb,
    pub blue: Argb,
    pub magenta: Argb,
    pub cyan: Argb,
    pub white: Argb,
}

impl Default for BaseColors {
    fn default() -> Self {
        Self {
            black: Argb::from_rgb(0x00, 0x00, 0x00),
            red: Argb::from_rgb(0xff, 0x00, 0x00),
            green: Argb::from_rgb(0x00, 0xff, 0x00),
            yellow: Argb::from_rgb(0xff, 0xff, 0x00),
            blue: Argb::from_rgb(0x00, 0x00, 0xff),
            magenta: Argb::from_rgb(0xff, 0x00, 0xff),
            cyan: Argb::from_rgb(0x00, 0xff, 0xff),
            white: Argb::from_rgb(0xff, 0xff, 0xff),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Base16Settings {
    pub method: Base16Method,
    /// 混色比例，0 保留原色、1 完全取代為目標色
    pub blend: f64,
    pub colors: BaseColors,
    pub finish: FinishTable,
}

impl Default for Base16Settings {
    fn default() -> Self {
        Self {
            method: Base16Method::Static,
            blend: 0.5,
            colors: BaseColors::default(),
            finish: FinishTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// 未設定時使用邏輯 CPU 數量
    pub worker_count: Option<usize>,
    /// 影片最多取樣的幀數
    pub frames: u32,
    /// 影片最多取樣的秒數
    pub max_duration_secs: f64,
    pub preview_format: PreviewFormat,
    pub dark: bool,
    pub print_json: bool,
    pub cache_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub base16: Base16Settings,
    pub recent_paths: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            worker_count: None,
            frames: 5,
            max_duration_secs: 5.0,
            preview_format: PreviewFormat::default(),
            dark: true,
            print_json: false,
            cache_dir: None,
            state_dir: None,
            base16: Base16Settings::default(),
            recent_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub media_types: MediaTypeTable,
    pub settings: UserSettings,
}
