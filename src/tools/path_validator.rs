use anyhow::{Result, bail};
use std::path::Path;

/// 確認路徑存在（檔案或資料夾皆可）
pub fn validate_path_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    Ok(())
}

pub fn validate_file_exists(path: &Path) -> Result<()> {
    validate_path_exists(path)?;
    if !path.is_file() {
        bail!("路徑不是檔案: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
