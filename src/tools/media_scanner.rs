use crate::config::MediaTypeTable;
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::SyncSender;
use walkdir::WalkDir;

/// 掃描結果統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub found: usize,
    pub skipped_errors: usize,
    pub interrupted: bool,
}

/// 遞迴尋找媒體檔案並送入有界通道
pub struct MediaLocator<'a> {
    media_types: &'a MediaTypeTable,
    shutdown_signal: &'a AtomicBool,
}

impl<'a> MediaLocator<'a> {
    #[must_use]
    pub const fn new(media_types: &'a MediaTypeTable, shutdown_signal: &'a AtomicBool) -> Self {
        Self {
            media_types,
            shutdown_signal,
        }
    }

    /// 依序走訪每個根路徑，通道滿時阻塞
    ///
    /// 每送出一個路徑就遞增 `discovered`。接收端關閉或收到中斷信號時提前結束。
    pub fn send_all(
        &self,
        roots: &[PathBuf],
        sender: &SyncSender<PathBuf>,
        discovered: &AtomicUsize,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        let mut seen = HashSet::new();

        for root in roots {
            for entry in WalkDir::new(root).follow_links(false) {
                if self.shutdown_signal.load(Ordering::SeqCst) {
                    stats.interrupted = true;
                    return stats;
                }

                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("略過無法讀取的路徑: {e}");
                        stats.skipped_errors += 1;
                        continue;
                    }
                };

                if !entry.file_type().is_file() || !self.media_types.is_media_file(entry.path()) {
                    continue;
                }

                let path = match to_absolute(entry.path()) {
                    Ok(path) => path,
                    Err(e) => {
                        warn!("無法取得絕對路徑 {}: {e}", entry.path().display());
                        stats.skipped_errors += 1;
                        continue;
                    }
                };

                if !seen.insert(path.clone()) {
                    continue;
                }

                debug!("找到媒體檔案: {}", path.display());
                if sender.send(path).is_err() {
                    stats.interrupted = true;
                    return stats;
                }
                discovered.fetch_add(1, Ordering::SeqCst);
                stats.found += 1;
            }
        }

        stats
    }

    #[cfg(test)]
    fn collect(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let (sender, receiver) = std::sync::mpsc::sync_channel(0);
        let discovered = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            scope.spawn(move || {
                self.send_all(roots, &sender, &discovered);
            });
            receiver.iter().collect()
        })
    }
}

fn to_absolute(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path)
}
