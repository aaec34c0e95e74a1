use super::job::{Job, JobStatus};
use super::state::PipelineSnapshot;
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

/// 在單一執行緒上把快照畫成進度列
///
/// 每個進行中的工作一個 spinner，最下方一條整體進度，完成的工作印在上方。
pub struct ProgressReporter {
    multi: MultiProgress,
    overall: ProgressBar,
    spinners: HashMap<u64, ProgressBar>,
    printed: usize,
}

impl ProgressReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// 不輸出任何畫面，供測試使用
    #[must_use]
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let overall = multi.add(ProgressBar::new(0));
        overall.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        overall.enable_steady_tick(Duration::from_millis(120));

        Self {
            multi,
            overall,
            spinners: HashMap::new(),
            printed: 0,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .expect("Invalid progress bar template")
    }

    pub fn update(&mut self, snapshot: &PipelineSnapshot) {
        self.print_completed(snapshot);
        self.sync_spinners(&snapshot.active);

        self.overall.set_length(snapshot.total_known() as u64);
        self.overall.set_position(snapshot.completed.len() as u64);
        self.overall.set_message(format!(
            "進行中 {}，等待 {}",
            snapshot.active.len(),
            snapshot.queued
        ));

        if snapshot.done {
            self.finish();
        }
    }

    fn print_completed(&mut self, snapshot: &PipelineSnapshot) {
        for job in snapshot.completed.iter().skip(self.printed) {
            let _ = self.multi.println(completed_line(job));
        }
        self.printed = snapshot.completed.len();
    }

    fn sync_spinners(&mut self, active: &[Job]) {
        self.spinners.retain(|id, spinner| {
            let still_active = active.iter().any(|job| job.id == *id);
            if !still_active {
                spinner.finish_and_clear();
            }
            still_active
        });

        for job in active {
            let spinner = self.spinners.entry(job.id).or_insert_with(|| {
                let spinner = self
                    .multi
                    .insert_before(&self.overall, ProgressBar::new_spinner());
                spinner.set_style(Self::spinner_style());
                spinner.enable_steady_tick(Duration::from_millis(120));
                spinner
            });

            if let JobStatus::Running(stage) = job.status {
                spinner.set_message(format!("{} {}", job.file_name(), style(stage).dim()));
            }
        }
    }

    fn finish(&mut self) {
        for (_, spinner) in self.spinners.drain() {
            spinner.finish_and_clear();
        }
        self.overall.finish_with_message("完成");
    }

    #[must_use]
    pub const fn printed(&self) -> usize {
        self.printed
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn completed_line(job: &Job) -> String {
    match &job.status {
        JobStatus::Completed => format!("{} {}", style("✓").green(), job.file_name()),
        JobStatus::Skipped => format!(
            "{} {} {}",
            style("-").dim(),
            job.file_name(),
            style("（已快取）").dim()
        ),
        JobStatus::Failed(message) => format!(
            "{} {}: {}",
            style("✗").red(),
            job.file_name(),
            style(message).red()
        ),
        JobStatus::Running(stage) => format!("{} {}", job.file_name(), stage),
    }
}
