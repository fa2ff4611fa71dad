//! 字幕处理 - 解析、清洗、按时间窗口分桶、跨窗口去重
//!
//! 核心流程：
//! 1. 解析字幕轨（SRT / WebVTT）
//! 2. 合并多行、去除标记
//! 3. 按固定时长窗口分桶（最后一个窗口无上界）
//! 4. 跨窗口去重，滚动字幕只保留首次出现

pub mod error;
pub mod markup;
pub mod parser;
pub mod window;

use serde::{Deserialize, Serialize};

pub use error::CaptionError;
pub use markup::{clean_text, joined_text, merge_lines, normalize_caption_text};
pub use parser::{parse_srt, parse_track, parse_vtt};
pub use window::{captions_per_window, deduplicate_windows, overlaps, prepare_captions, window_count};

/// 单条字幕，时间单位为秒
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Caption {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub(crate) fn with_text(&self, text: String) -> Self {
        Self {
            start: self.start,
            end: self.end,
            text,
        }
    }
}
