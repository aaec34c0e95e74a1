use crate::color::Argb;
use crate::component::base16::{self, Base16Palette, SynthesisInput};
use crate::component::extraction::{
    ColorMap, FfmpegFrameSource, FrameSource, KMeansQuantizer, Quantizer, SchemeGenerator,
    TonalScheme,
};
use crate::component::palette_cache::{CacheStore, PaletteState, QuantizedSample};
use crate::config::{Base16Method, Base16Settings, Config, MediaKind, MediaTypeTable};
use crate::tools::{ContentHash, validate_file_exists};
use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 調色盤的來源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSource {
    /// 影片的 `path` 為預覽圖路徑
    Media { path: PathBuf, hash: ContentHash },
    Color(Argb),
}

impl PaletteSource {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Media { path, .. } => Some(path),
            Self::Color(_) => None,
        }
    }

    #[must_use]
    pub const fn hash(&self) -> Option<&ContentHash> {
        match self {
            Self::Media { hash, .. } => Some(hash),
            Self::Color(_) => None,
        }
    }
}

impl fmt::Display for PaletteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Media { path, .. } => write!(f, "{}", path.display()),
            Self::Color(color) => write!(f, "{color}"),
        }
    }
}

/// 產生的調色盤
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPalette {
    pub source: PaletteSource,
    pub dark: bool,
    pub method: Base16Method,
    pub colors: ColorMap,
    pub base16: Base16Palette,
}

/// 從單一媒體檔或上次的狀態產生調色盤
pub struct PaletteEngine {
    store: CacheStore,
    media_types: MediaTypeTable,
    frames: Arc<dyn FrameSource>,
    quantizer: Arc<dyn Quantizer>,
    scheme: Arc<dyn SchemeGenerator>,
    base16: Base16Settings,
    dark: bool,
}

impl PaletteEngine {
    #[must_use]
    pub fn new(
        store: CacheStore,
        media_types: MediaTypeTable,
        frames: Arc<dyn FrameSource>,
        quantizer: Arc<dyn Quantizer>,
        scheme: Arc<dyn SchemeGenerator>,
        base16: Base16Settings,
        dark: bool,
    ) -> Self {
        Self {
            store,
            media_types,
            frames,
            quantizer,
            scheme,
            base16,
            dark,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CacheStore::from_config(config),
            config.media_types.clone(),
            Arc::new(FfmpegFrameSource::from_config(config)),
            Arc::new(KMeansQuantizer::default()),
            Arc::new(TonalScheme),
            config.settings.base16.clone(),
            config.settings.dark,
        )
    }

    /// 雜湊 → 快取（不存在時擷取、量化並寫入）→ 記錄狀態 → 合成
    ///
    /// 快取與狀態寫入失敗只記錄警告，不影響輸出。
    pub fn generate_from_file(
        &self,
        path: &Path,
        shutdown_signal: &AtomicBool,
    ) -> Result<GeneratedPalette> {
        validate_file_exists(path)?;
        let path = std::path::absolute(path)
            .with_context(|| format!("無法取得絕對路徑: {}", path.display()))?;
        let kind = self
            .media_types
            .media_kind(&path)
            .ok_or_else(|| anyhow!("不支援的媒體格式: {}", path.display()))?;

        let hash = self.store.hash(&path)?;
        let sample = match self.store.load(&hash) {
            Ok(sample) => {
                debug!("使用快取 {hash}");
                sample
            }
            Err(reason) => {
                debug!("重新計算 {}: {reason}", path.display());
                let pixels = self.frames.sample_pixels(&path, kind, shutdown_signal)?;
                let sample = self.quantizer.quantize(&pixels, shutdown_signal)?;
                if let Err(e) = self.store.save(&hash, &sample) {
                    warn!("無法寫入快取 {hash}: {e:#}");
                }
                sample
            }
        };

        let state = PaletteState {
            path: path.clone(),
            hash: hash.clone(),
            quantized: sample,
        };
        if let Err(e) = self.store.save_state(&state) {
            warn!("無法寫入狀態檔: {e:#}");
        }

        let source = self.output_source(&path, kind, &hash, shutdown_signal);
        info!("產生調色盤: {}", path.display());
        self.synthesize(PaletteSource::Media { path: source, hash }, &state.quantized)
    }

    /// 以目前設定重新合成上次的結果，不讀取媒體檔
    pub fn regenerate(&self, shutdown_signal: &AtomicBool) -> Result<GeneratedPalette> {
        let state = self
            .store
            .load_state()
            .context("找不到上次產生的紀錄，請先從媒體檔產生調色盤")?;

        let source = match self.media_types.media_kind(&state.path) {
            Some(kind) => self.output_source(&state.path, kind, &state.hash, shutdown_signal),
            None => state.path.clone(),
        };

        info!("重新產生調色盤: {}", state.path.display());
        let source = PaletteSource::Media {
            path: source,
            hash: state.hash,
        };
        self.synthesize(source, &state.quantized)
    }

    /// 影片改用預覽圖，失敗時退回原始路徑
    fn output_source(
        &self,
        path: &Path,
        kind: MediaKind,
        hash: &ContentHash,
        shutdown_signal: &AtomicBool,
    ) -> PathBuf {
        if !kind.is_video() {
            return path.to_path_buf();
        }

        match self
            .store
            .get_preview(path, hash, self.frames.as_ref(), shutdown_signal)
        {
            Ok(preview) => preview,
            Err(e) => {
                warn!("無法產生預覽圖，改用原始檔案: {e:#}");
                path.to_path_buf()
            }
        }
    }

    /// 以單一顏色為主色產生，不讀取媒體也不寫入快取與狀態
    pub fn generate_from_color(&self, color: Argb) -> Result<GeneratedPalette> {
        info!("從顏色產生調色盤: {color}");
        let colors = self.scheme.from_source(color, self.dark);
        self.finish(PaletteSource::Color(color), colors, &[color])
    }

    pub fn synthesize(
        &self,
        source: PaletteSource,
        sample: &QuantizedSample,
    ) -> Result<GeneratedPalette> {
        let colors = self.scheme.generate(sample, self.dark)?;
        self.finish(source, colors, &sample.palette)
    }

    fn finish(
        &self,
        source: PaletteSource,
        colors: ColorMap,
        samples: &[Argb],
    ) -> Result<GeneratedPalette> {
        let role = |name: &str| -> Result<Argb> {
            colors
                .get(name)
                .copied()
                .ok_or_else(|| anyhow!("色彩方案缺少 {name}"))
        };

        let input = SynthesisInput {
            primary: role("primary")?,
            foreground: role("on_background")?,
            background: role("background")?,
            samples,
        };
        let palette = base16::generate(&self.base16, self.dark, &input);

        Ok(GeneratedPalette {
            source,
            dark: self.dark,
            method: self.base16.method,
            colors,
            base16: palette,
        })
    }
}
