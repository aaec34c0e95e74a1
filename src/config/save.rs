use crate::config::load::SETTINGS_FILE;
use crate::config::types::{Config, MAX_RECENT_PATHS, UserSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    save_settings_to(settings, Path::new(SETTINGS_FILE))
}

pub fn save_settings_to(settings: &UserSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("無法序列化設定")?;

    fs::write(path, content)
        .with_context(|| format!("無法寫入設定檔: {}", path.display()))?;

    Ok(())
}

/// 更新最近使用的路徑
/// 將新路徑加入最前面，去重並限制數量
pub fn add_recent_path(settings: &mut UserSettings, path: &str) {
    settings.recent_paths.retain(|p| p != path);
    settings.recent_paths.insert(0, path.to_string());
    settings.recent_paths.truncate(MAX_RECENT_PATHS);
}

/// 記錄最近使用的路徑並寫回設定檔
///
/// 直接修改傳入的設定，之後儲存設定時不會蓋掉剛記錄的路徑。
pub fn remember_path(settings: &mut UserSettings, path: &str) -> Result<()> {
    remember_path_to(settings, path, Path::new(SETTINGS_FILE))
}

pub fn remember_path_to(settings: &mut UserSettings, path: &str, file: &Path) -> Result<()> {
    add_recent_path(settings, path);
    save_settings_to(settings, file)
}

impl Config {
    /// 驗證通過才寫入設定檔並套用，失敗時保留原設定
    pub fn update_settings(&mut self, updated: UserSettings) -> Result<()> {
        self.update_settings_to(updated, Path::new(SETTINGS_FILE))
    }

    pub fn update_settings_to(&mut self, updated: UserSettings, file: &Path) -> Result<()> {
        let candidate = Self {
            media_types: self.media_types.clone(),
            settings: updated,
        };
        candidate.validate()?;
        save_settings_to(&candidate.settings, file)?;

        *self = candidate;
        Ok(())
    }
}
