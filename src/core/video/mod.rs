//! 视频帧处理 - 分块并行抽帧、帧指纹、重复镜头检测
//!
//! 核心策略：
//! 1. 分块调度 - 按分块起点预先算好全局帧编号，并行任务之间无共享状态
//! 2. 帧指纹 - dHash（默认）或 pHash，汉明距离比较
//! 3. 镜头去重 - 贪心比对已确认唯一的指纹集合

pub mod deduplicator;
pub mod error;
pub mod fingerprint;
pub mod frame;
pub mod runner;
pub mod scheduler;

pub use deduplicator::{DedupDecision, ShotDeduplicator};
pub use error::ExtractionError;
pub use fingerprint::{hamming_distance, Fingerprint, FingerprintEngine};
pub use frame::{frame_file_name, list_frames, output_pattern, remove_frames, shot_index, FrameFile};
pub use runner::{decoder_available, probe_duration, CommandRunner, DecoderCommand, ProcessRunner};
pub use scheduler::{plan_chunks, ExtractionReport, ExtractionTask, FrameScheduler};
