use crate::color::Argb;
use crate::config::{Config, MediaKind};
use crate::tools::{get_media_duration, run_cancellable};
use anyhow::{Result, bail};
use log::debug;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::AtomicBool;

/// 預覽圖擷取位置佔影片長度的比例
const PREVIEW_POSITION: f64 = 0.1;

/// 取得媒體像素的外部工具
pub trait FrameSource: Send + Sync {
    /// 圖片取單張，影片依設定的幀數與長度取樣
    fn sample_pixels(
        &self,
        path: &Path,
        kind: MediaKind,
        shutdown_signal: &AtomicBool,
    ) -> Result<Vec<Argb>>;

    /// 輸出單張預覽圖到 `destination`，格式由副檔名決定
    fn render_preview(
        &self,
        source: &Path,
        destination: &Path,
        shutdown_signal: &AtomicBool,
    ) -> Result<()>;
}

/// 透過 ffmpeg / ffprobe 擷取像素
#[derive(Debug, Clone, Copy)]
pub struct FfmpegFrameSource {
    frames: u32,
    max_duration_secs: f64,
}

impl FfmpegFrameSource {
    #[must_use]
    pub const fn new(frames: u32, max_duration_secs: f64) -> Self {
        Self {
            frames,
            max_duration_secs,
        }
    }

    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.settings.frames, config.settings.max_duration_secs)
    }

    fn base_command() -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error"]);
        cmd
    }

    fn image_command(path: &Path) -> Command {
        let mut cmd = Self::base_command();
        cmd.arg("-i").arg(path);
        cmd.args(["-vframes", "1", "-f", "rawvideo", "-pix_fmt", "rgb24", "-"]);
        cmd
    }

    fn video_command(&self, path: &Path, duration: f64) -> Command {
        let effective = duration.min(self.max_duration_secs);
        let fps = sampling_rate(self.frames, effective);

        let mut cmd = Self::base_command();
        cmd.arg("-i").arg(path);
        cmd.args(["-t", &format!("{effective:.3}")]);
        cmd.args(["-vf", &format!("fps={fps:.8}")]);
        cmd.args(["-vframes", &self.frames.to_string()]);
        cmd.args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"]);
        cmd
    }

    /// 在影片長度約 10% 處擷取一幀，`-ss` 放在 `-i` 前以快速定位
    fn preview_command(source: &Path, destination: &Path, duration: f64) -> Command {
        let position = duration * PREVIEW_POSITION;

        let mut cmd = Self::base_command();
        cmd.args(["-y", "-ss", &format!("{position:.3}")]);
        cmd.arg("-i").arg(source);
        cmd.args(["-frames:v", "1"]);
        cmd.arg(destination);
        cmd
    }
}

impl FrameSource for FfmpegFrameSource {
    fn sample_pixels(
        &self,
        path: &Path,
        kind: MediaKind,
        shutdown_signal: &AtomicBool,
    ) -> Result<Vec<Argb>> {
        let command = match kind {
            MediaKind::Image => Self::image_command(path),
            MediaKind::Video => {
                let duration = get_media_duration(path, shutdown_signal)?;
                self.video_command(path, duration)
            }
        };

        let raw = run_cancellable(command, shutdown_signal)?;
        let pixels = parse_rgb24(&raw);
        if pixels.is_empty() {
            bail!("沒有取得任何像素: {}", path.display());
        }

        debug!("{} 取得 {} 個像素", path.display(), pixels.len());
        Ok(pixels)
    }

    fn render_preview(
        &self,
        source: &Path,
        destination: &Path,
        shutdown_signal: &AtomicBool,
    ) -> Result<()> {
        let duration = get_media_duration(source, shutdown_signal)?;
        let cmd = Self::preview_command(source, destination, duration);

        run_cancellable(cmd, shutdown_signal)?;

        if !destination.is_file() {
            bail!("ffmpeg 沒有輸出預覽圖: {}", destination.display());
        }
        Ok(())
    }
}

/// 取樣的幀率，影片太短時退回每秒一幀
#[must_use]
pub fn sampling_rate(frames: u32, effective_duration: f64) -> f64 {
    let frames = f64::from(frames);
    if effective_duration.floor() < frames {
        1.0
    } else {
        frames / effective_duration
    }
}

/// 將 ffmpeg 輸出的 rgb24 位元組轉成顏色，結尾不足 3 bytes 的部分捨棄
#[must_use]
pub fn parse_rgb24(raw: &[u8]) -> Vec<Argb> {
    raw.chunks_exact(3)
        .map(|px| Argb::from_rgb(px[0], px[1], px[2]))
        .collect()
}
