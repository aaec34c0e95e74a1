use super::sample::{PaletteState, QuantizedSample};
use crate::component::extraction::FrameSource;
use crate::config::{Config, PreviewFormat};
use crate::tools::{ContentHash, calculate_content_hash, ensure_directory_exists};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use thiserror::Error;
use uuid::Uuid;

const STATE_FILE: &str = "state.json";

/// 讀取快取失敗的原因，呼叫端一律視為需要重新計算
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("快取不存在: {}", .0.display())]
    NotFound(PathBuf),
    #[error("快取內容無法解析 {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("讀取快取失敗 {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 以內容雜湊為鍵的快取目錄
///
/// ```text
/// <cache_dir>/<hash>.json     量化結果
/// <cache_dir>/<hash>.<ext>    影片預覽圖
/// <state_dir>/state.json      最近一次產生的來源
/// ```
///
/// 同一雜湊的並行寫入不互斥：先寫入唯一暫存檔再改名，讀取端不會看到寫到一半的檔案，
/// 最後完成的寫入覆蓋先前結果。
#[derive(Debug, Clone)]
pub struct CacheStore {
    cache_dir: PathBuf,
    state_dir: PathBuf,
    preview_format: PreviewFormat,
}

impl CacheStore {
    #[must_use]
    pub const fn new(
        cache_dir: PathBuf,
        state_dir: PathBuf,
        preview_format: PreviewFormat,
    ) -> Self {
        Self {
            cache_dir,
            state_dir,
            preview_format,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.cache_dir(),
            config.state_dir(),
            config.settings.preview_format,
        )
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn hash(&self, path: &Path) -> Result<ContentHash> {
        calculate_content_hash(path)
    }

    #[must_use]
    pub fn entry_path(&self, hash: &ContentHash) -> PathBuf {
        self.cache_dir.join(format!("{hash}.json"))
    }

    #[must_use]
    pub fn preview_path(&self, hash: &ContentHash) -> PathBuf {
        self.cache_dir
            .join(format!("{hash}.{}", self.preview_format.extension()))
    }

    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE)
    }

    /// 量化結果存在，影片還需要預覽圖
    #[must_use]
    pub fn exists(&self, hash: &ContentHash, is_video: bool) -> bool {
        self.entry_path(hash).is_file() && (!is_video || self.preview_path(hash).is_file())
    }

    pub fn load(&self, hash: &ContentHash) -> Result<QuantizedSample, CacheError> {
        read_json(&self.entry_path(hash))
    }

    pub fn save(&self, hash: &ContentHash, sample: &QuantizedSample) -> Result<()> {
        let content = serde_json::to_vec(sample).context("無法序列化量化結果")?;
        write_atomic(&self.entry_path(hash), &content)
    }

    /// 取得影片預覽圖，已存在時直接回傳
    ///
    /// 只檢查檔案是否存在，來源影片內容改變時雜湊也會不同。
    pub fn get_preview(
        &self,
        source: &Path,
        hash: &ContentHash,
        frames: &dyn FrameSource,
        shutdown_signal: &AtomicBool,
    ) -> Result<PathBuf> {
        let destination = self.preview_path(hash);
        if destination.is_file() {
            debug!("使用既有預覽圖: {}", destination.display());
            return Ok(destination);
        }

        ensure_directory_exists(&self.cache_dir)
            .with_context(|| format!("無法建立快取資料夾: {}", self.cache_dir.display()))?;

        // 保留副檔名讓 ffmpeg 判斷輸出格式
        let temp_path = self.cache_dir.join(format!(
            ".{hash}.{}.{}",
            Uuid::new_v4().simple(),
            self.preview_format.extension()
        ));

        if let Err(e) = frames.render_preview(source, &temp_path, shutdown_signal) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.context(format!("無法產生預覽圖: {}", source.display())));
        }

        if let Err(e) = fs::rename(&temp_path, &destination) {
            let _ = fs::remove_file(&temp_path);
            return Err(e)
                .with_context(|| format!("無法移動預覽圖到: {}", destination.display()));
        }

        Ok(destination)
    }

    pub fn save_state(&self, state: &PaletteState) -> Result<()> {
        let content = serde_json::to_vec_pretty(state).context("無法序列化狀態")?;
        write_atomic(&self.state_path(), &content)
    }

    pub fn load_state(&self) -> Result<PaletteState, CacheError> {
        read_json(&self.state_path())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CacheError> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CacheError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(CacheError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&content).map_err(|source| CacheError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// 寫入同目錄的唯一暫存檔後改名
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_directory_exists(parent)
        .with_context(|| format!("無法建立資料夾: {}", parent.display()))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("cache");
    let temp_path = parent.join(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

    fs::write(&temp_path, content)
        .with_context(|| format!("無法寫入暫存檔: {}", temp_path.display()))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        warn!("改名失敗，移除暫存檔: {}", temp_path.display());
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("無法寫入: {}", path.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Argb;
    use crate::config::MediaKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> CacheStore {
        CacheStore::new(
            temp_dir.path().join("cache"),
            temp_dir.path().join("state"),
            PreviewFormat::Png,
        )
    }

    fn sample() -> QuantizedSample {
        let mut sample = QuantizedSample::default();
        sample.population.insert(Argb::from_rgb(10, 20, 30), 3);
        sample.palette.push(Argb::from_rgb(10, 20, 30));
        sample
    }

    fn some_hash() -> ContentHash {
        ContentHash::parse(&"ab".repeat(16)).unwrap()
    }

    struct CountingPreview {
        calls: AtomicUsize,
    }

    impl FrameSource for CountingPreview {
        fn sample_pixels(
            &self,
            _path: &Path,
            _kind: MediaKind,
            _shutdown_signal: &AtomicBool,
        ) -> Result<Vec<Argb>> {
            Ok(Vec::new())
        }

        fn render_preview(
            &self,
            _source: &Path,
            destination: &Path,
            _shutdown_signal: &AtomicBool,
        ) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            fs::write(destination, b"preview")?;
            Ok(())
        }
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let hash = some_hash();

        assert!(!store.exists(&hash, false));
        store.save(&hash, &sample()).unwrap();

        assert!(store.exists(&hash, false));
        assert!(!store.exists(&hash, true));
        assert_eq!(store.load(&hash).unwrap(), sample());
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let hash = some_hash();

        assert!(matches!(store.load(&hash), Err(CacheError::NotFound(_))));

        fs::create_dir_all(store.cache_dir()).unwrap();
        fs::write(store.entry_path(&hash), b"{ not json").unwrap();
        assert!(matches!(store.load(&hash), Err(CacheError::Decode { .. })));
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let hash = some_hash();

        store.save(&hash, &sample()).unwrap();
        store.save(&hash, &sample()).unwrap();

        let names: Vec<String> = fs::read_dir(store.cache_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{hash}.json")]);
    }

    #[test]
    fn test_preview_generated_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let hash = some_hash();
        let frames = CountingPreview {
            calls: AtomicUsize::new(0),
        };
        let signal = AtomicBool::new(false);
        let source = temp_dir.path().join("clip.mp4");

        let first = store.get_preview(&source, &hash, &frames, &signal).unwrap();
        let second = store.get_preview(&source, &hash, &frames, &signal).unwrap();

        assert_eq!(first, second);
        assert!(first.ends_with(format!("{hash}.png")));
        assert_eq!(frames.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_state_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        assert!(matches!(store.load_state(), Err(CacheError::NotFound(_))));

        let state = PaletteState {
            path: PathBuf::from("/media/a.png"),
            hash: some_hash(),
            quantized: sample(),
        };
        store.save_state(&state).unwrap();
        assert_eq!(store.load_state().unwrap(), state);
    }
}
