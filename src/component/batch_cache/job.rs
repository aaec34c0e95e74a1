use crate::config::MediaKind;
use crate::tools::ContentHash;
use std::fmt;
use std::path::{Path, PathBuf};

/// 單一工作的處理階段，只會往前推進
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JobStage {
    Queued,
    Hashing,
    Extracting,
    Quantizing,
    Saving,
    Previewing,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Queued => "等待中",
            Self::Hashing => "計算雜湊",
            Self::Extracting => "擷取像素",
            Self::Quantizing => "量化",
            Self::Saving => "寫入快取",
            Self::Previewing => "產生預覽圖",
        };
        f.write_str(label)
    }
}

/// 工作的最終結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Running(JobStage),
    /// 新寫入快取
    Completed,
    /// 快取已存在
    Skipped,
    Failed(String),
}

impl JobStatus {
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        !matches!(self, Self::Running(_))
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: u64,
    pub path: PathBuf,
    pub kind: MediaKind,
    pub hash: Option<ContentHash>,
    pub status: JobStatus,
}

impl Job {
    #[must_use]
    pub fn new(id: u64, path: PathBuf, kind: MediaKind) -> Self {
        Self {
            id,
            path,
            kind,
            hash: None,
            status: JobStatus::Running(JobStage::Queued),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            JobStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
