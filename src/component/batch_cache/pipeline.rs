use super::job::{JobStage, JobStatus};
use super::state::{PipelineSnapshot, PipelineState, StateHandle};
use crate::component::extraction::{FfmpegFrameSource, FrameSource, KMeansQuantizer, Quantizer};
use crate::component::palette_cache::CacheStore;
use crate::config::{Config, MediaKind, MediaTypeTable};
use crate::tools::{MediaLocator, ScanStats};
use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// 掃描端與 worker 之間的通道容量
pub const PATH_CHANNEL_CAPACITY: usize = 100;

/// 中斷時使用的結束代碼
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// 新寫入快取
    pub completed: usize,
    /// 快取已存在
    pub skipped: usize,
    pub failed: Vec<(PathBuf, String)>,
    pub scan: ScanStats,
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl BatchSummary {
    fn from_state(
        state: &PipelineState,
        scan: ScanStats,
        interrupted: bool,
        elapsed: Duration,
    ) -> Self {
        let mut summary = Self {
            scan,
            interrupted,
            elapsed,
            ..Self::default()
        };

        for job in state.completed() {
            match &job.status {
                JobStatus::Completed => summary.completed += 1,
                JobStatus::Skipped => summary.skipped += 1,
                JobStatus::Failed(message) => {
                    summary.failed.push((job.path.clone(), message.clone()));
                }
                JobStatus::Running(_) => {}
            }
        }

        summary
    }

    #[must_use]
    pub fn processed(&self) -> usize {
        self.completed + self.skipped + self.failed.len()
    }

    /// 0 全部成功，1 有失敗，130 被中斷
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else if self.failed.is_empty() {
            0
        } else {
            1
        }
    }
}

/// 批次預熱快取
///
/// 掃描端把路徑送進有界通道，固定數量的 worker 取出後依序計算雜湊、
/// 擷取像素、量化、寫入快取，影片另外產生預覽圖。單一檔案失敗不影響其他檔案。
pub struct BatchPipeline {
    store: CacheStore,
    media_types: MediaTypeTable,
    frames: Arc<dyn FrameSource>,
    quantizer: Arc<dyn Quantizer>,
    worker_count: usize,
}

impl BatchPipeline {
    #[must_use]
    pub fn new(
        store: CacheStore,
        media_types: MediaTypeTable,
        frames: Arc<dyn FrameSource>,
        quantizer: Arc<dyn Quantizer>,
        worker_count: usize,
    ) -> Self {
        Self {
            store,
            media_types,
            frames,
            quantizer,
            worker_count: worker_count.max(1),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CacheStore::from_config(config),
            config.media_types.clone(),
            Arc::new(FfmpegFrameSource::from_config(config)),
            Arc::new(KMeansQuantizer::default()),
            config.worker_count(),
        )
    }

    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// 在另一個執行緒上依序處理每個快照，回傳最終統計
    pub fn run_with<F>(
        &self,
        roots: &[PathBuf],
        shutdown_signal: &AtomicBool,
        mut on_snapshot: F,
    ) -> BatchSummary
    where
        F: FnMut(&PipelineSnapshot) + Send,
    {
        let (updates, receiver) = mpsc::sync_channel(0);

        thread::scope(|scope| {
            scope.spawn(move || {
                for snapshot in receiver {
                    on_snapshot(&snapshot);
                    if snapshot.done {
                        break;
                    }
                }
            });

            self.run(roots, shutdown_signal, updates)
        })
    }

    /// 執行整個流程，結束時送出唯一一次 `done = true` 的快照
    pub fn run(
        &self,
        roots: &[PathBuf],
        shutdown_signal: &AtomicBool,
        updates: SyncSender<PipelineSnapshot>,
    ) -> BatchSummary {
        let started = Instant::now();
        let state = StateHandle::new(updates);
        let (path_sender, path_receiver) = mpsc::sync_channel::<PathBuf>(PATH_CHANNEL_CAPACITY);

        info!(
            "開始批次快取，{} 個路徑，{} 個 worker",
            roots.len(),
            self.worker_count
        );

        let scan = thread::scope(|scope| {
            let state = &state;

            let locator = scope.spawn(move || {
                MediaLocator::new(&self.media_types, shutdown_signal).send_all(
                    roots,
                    &path_sender,
                    state.discovered(),
                )
            });

            // 所有 worker 結束後接收端隨之釋放，阻塞中的掃描端會收到錯誤並結束
            let path_receiver = Arc::new(Mutex::new(path_receiver));
            for worker_id in 0..self.worker_count {
                let receiver = Arc::clone(&path_receiver);
                scope.spawn(move || self.worker_loop(worker_id, &receiver, state, shutdown_signal));
            }
            drop(path_receiver);

            locator.join().unwrap_or_default()
        });

        let interrupted = shutdown_signal.load(Ordering::SeqCst);
        let final_state = state.close();
        let summary = BatchSummary::from_state(&final_state, scan, interrupted, started.elapsed());

        info!(
            "批次快取結束: 新增 {}，略過 {}，失敗 {}{}",
            summary.completed,
            summary.skipped,
            summary.failed.len(),
            if interrupted { "（已中斷）" } else { "" }
        );

        summary
    }

    fn worker_loop(
        &self,
        worker_id: usize,
        receiver: &Mutex<Receiver<PathBuf>>,
        state: &StateHandle,
        shutdown_signal: &AtomicBool,
    ) {
        loop {
            if shutdown_signal.load(Ordering::SeqCst) {
                break;
            }

            let next = receiver
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .recv();
            let Ok(path) = next else {
                break;
            };

            if shutdown_signal.load(Ordering::SeqCst) {
                break;
            }

            let Some(kind) = self.media_types.media_kind(&path) else {
                continue;
            };

            let id = state.start(path.clone(), kind);
            let status = match self.process(id, &path, kind, state, shutdown_signal) {
                Ok(status) => status,
                Err(e) => {
                    warn!("[worker {worker_id}] 處理失敗 {}: {e:#}", path.display());
                    JobStatus::Failed(format!("{e:#}"))
                }
            };
            state.finish(id, status);
        }

        debug!("[worker {worker_id}] 結束");
    }

    fn process(
        &self,
        id: u64,
        path: &Path,
        kind: MediaKind,
        state: &StateHandle,
        shutdown_signal: &AtomicBool,
    ) -> Result<JobStatus> {
        state.advance(id, JobStage::Hashing);
        let hash = self.store.hash(path)?;
        state.set_hash(id, hash.clone());

        if self.store.exists(&hash, kind.is_video()) {
            debug!("快取已存在，略過: {}", path.display());
            return Ok(JobStatus::Skipped);
        }

        // 影片可能只缺預覽圖
        if let Err(reason) = self.store.load(&hash) {
            debug!("需要重新計算 {}: {reason}", path.display());

            state.advance(id, JobStage::Extracting);
            let pixels = self.frames.sample_pixels(path, kind, shutdown_signal)?;

            state.advance(id, JobStage::Quantizing);
            let sample = self.quantizer.quantize(&pixels, shutdown_signal)?;

            state.advance(id, JobStage::Saving);
            self.store.save(&hash, &sample)?;
        }

        if kind.is_video() {
            state.advance(id, JobStage::Previewing);
            self.store
                .get_preview(path, &hash, self.frames.as_ref(), shutdown_signal)?;
        }

        Ok(JobStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let mut summary = BatchSummary::default();
        assert_eq!(summary.exit_code(), 0);

        summary.failed.push((PathBuf::from("/a.png"), "boom".into()));
        assert_eq!(summary.exit_code(), 1);

        summary.interrupted = true;
        assert_eq!(summary.exit_code(), EXIT_INTERRUPTED);
    }

    #[test]
    fn test_processed_counts_everything() {
        let summary = BatchSummary {
            completed: 2,
            skipped: 3,
            failed: vec![(PathBuf::from("/a.png"), "boom".into())],
            ..BatchSummary::default()
        };
        assert_eq!(summary.processed(), 6);
    }
}
