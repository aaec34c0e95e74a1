//! 測試共用的假協作者，不需要 ffmpeg

#![allow(dead_code)]

use anyhow::{Result, bail};
use media_palette::color::Argb;
use media_palette::component::extraction::{FrameSource, parse_rgb24};
use media_palette::config::MediaKind;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// 把檔案內容當成 rgb24 像素；檔名含 `broken` 時失敗
#[derive(Default)]
pub struct FakeFrames {
    pub sample_calls: AtomicUsize,
    pub preview_calls: AtomicUsize,
    /// 第一次取樣時觸發中斷
    pub interrupt_on_sample: bool,
    pub delay: Option<Duration>,
}

impl FakeFrames {
    pub fn samples(&self) -> usize {
        self.sample_calls.load(Ordering::SeqCst)
    }

    pub fn previews(&self) -> usize {
        self.preview_calls.load(Ordering::SeqCst)
    }
}

impl FrameSource for FakeFrames {
    fn sample_pixels(
        &self,
        path: &Path,
        _kind: MediaKind,
        shutdown_signal: &AtomicBool,
    ) -> Result<Vec<Argb>> {
        self.sample_calls.fetch_add(1, Ordering::SeqCst);
        if self.interrupt_on_sample {
            shutdown_signal.store(true, Ordering::SeqCst);
        }
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        let name = path.file_name().unwrap().to_string_lossy();
        if name.contains("broken") {
            bail!("無法解碼: {name}");
        }

        Ok(parse_rgb24(&fs::read(path)?))
    }

    fn render_preview(
        &self,
        _source: &Path,
        destination: &Path,
        _shutdown_signal: &AtomicBool,
    ) -> Result<()> {
        self.preview_calls.fetch_add(1, Ordering::SeqCst);
        fs::write(destination, b"preview")?;
        Ok(())
    }
}

/// 寫入一個以 rgb24 位元組表示的假媒體檔
pub fn write_media(path: &Path, colors: &[(u8, u8, u8)]) {
    let bytes: Vec<u8> = colors
        .iter()
        .cycle()
        .take(colors.len() * 8)
        .flat_map(|(r, g, b)| [*r, *g, *b])
        .collect();
    fs::write(path, bytes).unwrap();
}

pub const WARM: [(u8, u8, u8); 3] = [(200, 40, 30), (230, 140, 40), (120, 30, 20)];
pub const COOL: [(u8, u8, u8); 3] = [(30, 60, 200), (40, 170, 190), (20, 40, 90)];
pub const MIXED: [(u8, u8, u8); 4] = [(200, 40, 30), (40, 180, 60), (30, 60, 200), (220, 200, 40)];
