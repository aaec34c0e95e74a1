//! 批次快取流程整合測試，以假的像素來源取代 ffmpeg

mod common;

use common::{COOL, FakeFrames, MIXED, WARM, write_media};
use media_palette::component::batch_cache::{
    BatchPipeline, BatchSummary, EXIT_INTERRUPTED, JobStage, JobStatus, PipelineSnapshot,
};
use media_palette::component::extraction::KMeansQuantizer;
use media_palette::component::palette_cache::CacheStore;
use media_palette::config::{Config, PreviewFormat, UserSettings};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tempfile::TempDir;

struct Fixture {
    _temp_dir: TempDir,
    media_dir: PathBuf,
    cache_dir: PathBuf,
    state_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let media_dir = temp_dir.path().join("media");
        fs::create_dir_all(media_dir.join("nested")).unwrap();
        Self {
            cache_dir: temp_dir.path().join("cache"),
            state_dir: temp_dir.path().join("state"),
            media_dir,
            _temp_dir: temp_dir,
        }
    }

    fn pipeline(&self, frames: Arc<FakeFrames>, workers: usize) -> BatchPipeline {
        let config = Config::with_settings(UserSettings::default()).unwrap();
        BatchPipeline::new(
            CacheStore::new(
                self.cache_dir.clone(),
                self.state_dir.clone(),
                PreviewFormat::Png,
            ),
            config.media_types,
            frames,
            Arc::new(KMeansQuantizer::default()),
            workers,
        )
    }

    fn cache_files(&self) -> BTreeSet<String> {
        match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => BTreeSet::new(),
        }
    }
}

fn run(
    pipeline: &BatchPipeline,
    root: &Path,
    signal: &AtomicBool,
) -> (BatchSummary, Vec<PipelineSnapshot>) {
    let mut snapshots = Vec::new();
    let summary = pipeline.run_with(&[root.to_path_buf()], signal, |snapshot| {
        snapshots.push(snapshot.clone());
    });
    (summary, snapshots)
}

#[test]
fn test_partial_failure_does_not_abort_batch() {
    let fixture = Fixture::new();
    write_media(&fixture.media_dir.join("a.png"), &WARM);
    write_media(&fixture.media_dir.join("b.jpg"), &COOL);
    write_media(&fixture.media_dir.join("nested").join("c.webp"), &MIXED);
    write_media(&fixture.media_dir.join("broken.png"), &[(1, 2, 3)]);
    fs::write(fixture.media_dir.join("notes.txt"), b"ignored").unwrap();

    let frames = Arc::new(FakeFrames::default());
    let pipeline = fixture.pipeline(Arc::clone(&frames), 2);
    let (summary, snapshots) = run(&pipeline, &fixture.media_dir, &AtomicBool::new(false));

    assert_eq!(summary.completed, 3);
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].0.ends_with("broken.png"));
    assert!(summary.failed[0].1.contains("無法解碼"));
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(frames.samples(), 4);

    let last = snapshots.last().unwrap();
    assert!(last.done);
    assert_eq!(snapshots.iter().filter(|s| s.done).count(), 1);
    assert_eq!(last.completed.len(), 4);
    assert!(last.active.is_empty());
    assert_eq!(
        last.completed
            .iter()
            .filter(|job| matches!(job.status, JobStatus::Failed(_)))
            .count(),
        1
    );

    // 3 份量化結果，失敗的檔案不留下任何東西
    assert_eq!(fixture.cache_files().len(), 3);
}

#[test]
fn test_second_run_is_a_no_op() {
    let fixture = Fixture::new();
    write_media(&fixture.media_dir.join("a.png"), &WARM);
    write_media(&fixture.media_dir.join("b.png"), &COOL);
    write_media(&fixture.media_dir.join("clip.mp4"), &MIXED);

    let frames = Arc::new(FakeFrames::default());
    let pipeline = fixture.pipeline(Arc::clone(&frames), 3);
    let signal = AtomicBool::new(false);

    let (first, _) = run(&pipeline, &fixture.media_dir, &signal);
    let files_after_first = fixture.cache_files();
    let entry = fixture.cache_dir.join(files_after_first.iter().next().unwrap());
    let content_after_first = fs::read(&entry).unwrap();

    let (second, _) = run(&pipeline, &fixture.media_dir, &signal);

    assert_eq!(first.completed, 3);
    assert_eq!(second.completed, 0);
    assert_eq!(second.skipped, 3);
    assert_eq!(second.exit_code(), 0);
    assert_eq!(frames.samples(), 3);
    assert_eq!(frames.previews(), 1);
    // 3 份 JSON + 1 張預覽圖
    assert_eq!(files_after_first.len(), 4);
    assert_eq!(fixture.cache_files(), files_after_first);
    assert_eq!(fs::read(&entry).unwrap(), content_after_first);
}

#[test]
fn test_identical_content_shares_cache_entry() {
    let fixture = Fixture::new();
    write_media(&fixture.media_dir.join("a.png"), &WARM);
    write_media(&fixture.media_dir.join("nested").join("copy.png"), &WARM);

    let frames = Arc::new(FakeFrames::default());
    let pipeline = fixture.pipeline(frames, 1);
    let (summary, snapshots) = run(&pipeline, &fixture.media_dir, &AtomicBool::new(false));

    // 單一 worker 依序處理，第二個檔案命中第一個寫入的快取
    assert_eq!(summary.completed + summary.skipped, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(fixture.cache_files().len(), 1);

    let hashes: BTreeSet<_> = snapshots
        .last()
        .unwrap()
        .completed
        .iter()
        .map(|job| job.hash.clone().unwrap())
        .collect();
    assert_eq!(hashes.len(), 1);
}

#[test]
fn test_missing_preview_is_rebuilt_without_extraction() {
    let fixture = Fixture::new();
    write_media(&fixture.media_dir.join("clip.mkv"), &MIXED);

    let frames = Arc::new(FakeFrames::default());
    let pipeline = fixture.pipeline(Arc::clone(&frames), 1);
    let signal = AtomicBool::new(false);
    run(&pipeline, &fixture.media_dir, &signal);

    let preview = fixture
        .cache_files()
        .into_iter()
        .find(|name| name.ends_with(".png"))
        .unwrap();
    fs::remove_file(fixture.cache_dir.join(&preview)).unwrap();

    let (summary, snapshots) = run(&pipeline, &fixture.media_dir, &signal);

    assert_eq!(summary.completed, 1);
    assert_eq!(frames.samples(), 1);
    assert_eq!(frames.previews(), 2);
    assert!(fixture.cache_dir.join(&preview).is_file());
    assert!(snapshots.iter().any(|s| {
        s.active
            .iter()
            .any(|job| job.status == JobStatus::Running(JobStage::Previewing))
    }));
    assert!(!snapshots.iter().any(|s| {
        s.active
            .iter()
            .any(|job| job.status == JobStatus::Running(JobStage::Extracting))
    }));
}

#[test]
fn test_empty_directory_emits_single_done_snapshot() {
    let fixture = Fixture::new();

    let pipeline = fixture.pipeline(Arc::new(FakeFrames::default()), 4);
    let (summary, snapshots) = run(&pipeline, &fixture.media_dir, &AtomicBool::new(false));

    assert_eq!(summary.processed(), 0);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].done);
    assert_eq!(snapshots[0].total_known(), 0);
}

#[test]
fn test_missing_root_is_logged_and_skipped() {
    let fixture = Fixture::new();
    write_media(&fixture.media_dir.join("a.png"), &WARM);

    let pipeline = fixture.pipeline(Arc::new(FakeFrames::default()), 2);
    let mut snapshots = 0;
    let summary = pipeline.run_with(
        &[fixture.media_dir.join("missing"), fixture.media_dir.clone()],
        &AtomicBool::new(false),
        |_| snapshots += 1,
    );

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.scan.skipped_errors, 1);
    assert!(snapshots > 0);
}

#[test]
fn test_cancellation_stops_new_jobs() {
    let fixture = Fixture::new();
    for i in 0..20 {
        write_media(&fixture.media_dir.join(format!("{i:02}.png")), &WARM);
    }

    let workers = 2;
    let frames = Arc::new(FakeFrames {
        interrupt_on_sample: true,
        delay: Some(Duration::from_millis(20)),
        ..FakeFrames::default()
    });
    let pipeline = fixture.pipeline(Arc::clone(&frames), workers);
    let signal = AtomicBool::new(false);
    let (summary, snapshots) = run(&pipeline, &fixture.media_dir, &signal);

    assert!(summary.interrupted);
    assert_eq!(summary.exit_code(), EXIT_INTERRUPTED);
    // 只有中斷前已開始的工作會進入擷取
    assert!(frames.samples() <= workers, "samples = {}", frames.samples());
    assert!(summary.processed() <= workers);
    assert_eq!(snapshots.iter().filter(|s| s.done).count(), 1);
    assert!(snapshots.last().unwrap().done);
}
