//! 批次建立調色盤快取
//!
//! 掃描端 → 有界通道 → 固定數量 worker → 快取目錄，
//! 進度以快照形式同步送到單一畫面執行緒。

mod job;
mod main;
mod pipeline;
mod progress;
mod state;

pub use job::{Job, JobStage, JobStatus};
pub use main::{BatchCacher, print_summary};
pub use pipeline::{BatchPipeline, BatchSummary, EXIT_INTERRUPTED, PATH_CHANNEL_CAPACITY};
pub use progress::ProgressReporter;
pub use state::{PipelineSnapshot, PipelineState, StateHandle};
