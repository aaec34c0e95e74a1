mod cpu_info;
mod ffmpeg_runner;
mod ffprobe_info;
mod file_hasher;
mod media_scanner;
mod path_validator;

pub use cpu_info::logical_cpu_count;
pub use ffmpeg_runner::{Cancelled, run_cancellable};
pub use ffprobe_info::get_media_duration;
pub use file_hasher::{ContentHash, calculate_content_hash};
pub use media_scanner::{MediaLocator, ScanStats};
pub use path_validator::{ensure_directory_exists, validate_file_exists, validate_path_exists};
