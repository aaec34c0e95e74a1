use super::job::{Job, JobStage, JobStatus};
use crate::config::MediaKind;
use crate::tools::ContentHash;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 某一時間點的進度複本
#[derive(Debug, Clone)]
pub struct PipelineSnapshot {
    pub active: Vec<Job>,
    /// 依完成順序排列
    pub completed: Arc<Vec<Job>>,
    /// 已找到但尚未被 worker 取走的檔案數
    pub queued: usize,
    pub done: bool,
}

impl PipelineSnapshot {
    #[must_use]
    pub fn total_known(&self) -> usize {
        self.active.len() + self.completed.len() + self.queued
    }
}

/// 由流程擁有的工作清單
#[derive(Debug, Default)]
pub struct PipelineState {
    next_id: u64,
    active: Vec<Job>,
    completed: Arc<Vec<Job>>,
    started: usize,
    done: bool,
}

impl PipelineState {
    fn snapshot(&self, discovered: usize) -> PipelineSnapshot {
        PipelineSnapshot {
            active: self.active.clone(),
            completed: Arc::clone(&self.completed),
            queued: discovered.saturating_sub(self.started),
            done: self.done,
        }
    }

    fn job_mut(&mut self, id: u64) -> Option<&mut Job> {
        self.active.iter_mut().find(|job| job.id == id)
    }

    #[must_use]
    pub fn completed(&self) -> &[Job] {
        &self.completed
    }
}

/// 工作清單的唯一存取入口
///
/// 每次修改都在持有鎖的狀態下送出快照。通道容量為 0，畫面處理得慢時 worker 也會等待。
pub struct StateHandle {
    state: Mutex<PipelineState>,
    discovered: AtomicUsize,
    updates: SyncSender<PipelineSnapshot>,
}

impl StateHandle {
    #[must_use]
    pub fn new(updates: SyncSender<PipelineSnapshot>) -> Self {
        Self {
            state: Mutex::new(PipelineState::default()),
            discovered: AtomicUsize::new(0),
            updates,
        }
    }

    /// 掃描端每送出一個路徑就遞增
    #[must_use]
    pub const fn discovered(&self) -> &AtomicUsize {
        &self.discovered
    }

    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<T>(&self, mutate: impl FnOnce(&mut PipelineState) -> T) -> T {
        let mut guard = self.lock();
        let result = mutate(&mut guard);
        let snapshot = guard.snapshot(self.discovered.load(Ordering::SeqCst));
        // 接收端結束後不再回報
        let _ = self.updates.send(snapshot);
        result
    }

    pub fn start(&self, path: PathBuf, kind: MediaKind) -> u64 {
        self.update(|state| {
            state.next_id += 1;
            let id = state.next_id;
            state.started += 1;
            state.active.push(Job::new(id, path, kind));
            id
        })
    }

    pub fn advance(&self, id: u64, stage: JobStage) {
        self.update(|state| {
            if let Some(job) = state.job_mut(id) {
                // 階段只能往前
                if matches!(job.status, JobStatus::Running(current) if stage > current) {
                    job.status = JobStatus::Running(stage);
                }
            }
        });
    }

    pub fn set_hash(&self, id: u64, hash: ContentHash) {
        self.update(|state| {
            if let Some(job) = state.job_mut(id) {
                job.hash = Some(hash);
            }
        });
    }

    /// 將工作從進行中移到已完成
    pub fn finish(&self, id: u64, status: JobStatus) {
        debug_assert!(status.is_finished());
        self.update(|state| {
            if let Some(index) = state.active.iter().position(|job| job.id == id) {
                let mut job = state.active.remove(index);
                job.status = status;
                Arc::make_mut(&mut state.completed).push(job);
            }
        });
    }

    /// 送出最後一次 `done = true` 的快照並交回最終狀態
    pub fn close(self) -> PipelineState {
        self.update(|state| state.done = true);
        self.state.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
