use crate::config::types::{APP_NAME, Config, MediaTypeTable, UserSettings};
use crate::tools::logical_cpu_count;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

/// 編譯時嵌入的媒體副檔名白名單
const MEDIA_TYPE_TABLE_JSON: &str = include_str!("data/media_type_table.json");

pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    /// 讀取目前目錄的 `settings.json` 並驗證
    ///
    /// 設定檔不存在時使用預設值；格式錯誤或數值超出範圍時直接失敗，
    /// 避免在任何工作開始後才發現設定問題。
    pub fn new() -> Result<Self> {
        let settings = Self::load_settings(Path::new(SETTINGS_FILE))?;
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: UserSettings) -> Result<Self> {
        let config = Self {
            media_types: Self::load_embedded_media_type_table()?,
            settings,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("無法讀取設定檔: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(UserSettings::default());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("無法解析設定檔: {}", path.display()))
    }

    fn load_embedded_media_type_table() -> Result<MediaTypeTable> {
        serde_json::from_str(MEDIA_TYPE_TABLE_JSON).context("無法解析嵌入的媒體類型設定")
    }

    pub fn validate(&self) -> Result<()> {
        let settings = &self.settings;

        if settings.worker_count == Some(0) {
            bail!("worker_count 必須為正整數");
        }
        if settings.frames == 0 {
            bail!("frames 必須為正整數");
        }
        if !settings.max_duration_secs.is_finite() || settings.max_duration_secs <= 0.0 {
            bail!(
                "max_duration_secs 必須為正數，目前為 {}",
                settings.max_duration_secs
            );
        }

        let blend = settings.base16.blend;
        if !(0.0..=1.0).contains(&blend) {
            bail!("base16.blend 必須介於 0 到 1 之間，目前為 {blend}");
        }

        settings
            .base16
            .finish
            .validate()
            .context("base16.finish 設定無效")?;

        Ok(())
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.settings
            .worker_count
            .unwrap_or_else(logical_cpu_count)
            .max(1)
    }

    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.settings.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join(APP_NAME)
        })
    }

    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.settings.state_dir.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(|| PathBuf::from(".state"))
                .join(APP_NAME)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{Base16Method, MediaKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings_are_valid() {
        let config = Config::with_settings(UserSettings::default()).unwrap();
        assert!(config.worker_count() >= 1);
        assert_eq!(config.settings.frames, 5);
        assert_eq!(config.settings.base16.method, Base16Method::Static);
    }

    #[test]
    fn test_rejects_out_of_range_blend() {
        let mut settings = UserSettings::default();
        settings.base16.blend = 1.5;
        assert!(Config::with_settings(settings).is_err());
    }

    #[test]
    fn test_rejects_zero_workers_and_frames() {
        let mut settings = UserSettings::default();
        settings.worker_count = Some(0);
        assert!(Config::with_settings(settings).is_err());

        let mut settings = UserSettings::default();
        settings.frames = 0;
        assert!(Config::with_settings(settings).is_err());

        let mut settings = UserSettings::default();
        settings.max_duration_secs = f64::NAN;
        assert!(Config::with_settings(settings).is_err());
    }

    #[test]
    fn test_unknown_method_fails_to_parse() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{ "base16": { "method": "rainbow" } }"#)
            .unwrap();

        assert!(Config::load_settings(file.path()).is_err());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        let raw = br##"{
            "frames": 8,
            "base16": {
                "method": "dynamic",
                "colors": {
                    "black": "#101010",
                    "red": "#f00",
                    "green": "#0f0",
                    "yellow": "#ff0",
                    "blue": "#00f",
                    "magenta": "#f0f",
                    "cyan": "#0ff",
                    "white": "#eee"
                }
            }
        }"##;
        file.write_all(raw).unwrap();

        let settings = Config::load_settings(file.path()).unwrap();
        assert_eq!(settings.frames, 8);
        assert_eq!(settings.base16.method, Base16Method::Dynamic);
        assert!((settings.base16.blend - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.base16.colors.black.to_hex(), "#101010");
    }

    #[test]
    fn test_missing_settings_file_uses_default() {
        let settings = Config::load_settings(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.frames, 5);
    }

    #[test]
    fn test_media_kind_by_extension() {
        let config = Config::with_settings(UserSettings::default()).unwrap();
        let table = &config.media_types;

        assert_eq!(table.media_kind(Path::new("/a/b.JPG")), Some(MediaKind::Image));
        assert_eq!(table.media_kind(Path::new("clip.mkv")), Some(MediaKind::Video));
        assert_eq!(table.media_kind(Path::new("notes.txt")), None);
        assert_eq!(table.media_kind(Path::new("no_extension")), None);
    }
}
