//! 幻灯片合成 - 按窗口序号把字幕与抽帧的重复标记拼接起来

pub mod synthesizer;

use crate::core::captions::{joined_text, Caption};
use serde::Serialize;
use std::path::PathBuf;

pub use synthesizer::{compose, SlideSynthesizer};

/// 一张幻灯片：窗口序号同时也是抽帧文件序号
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub index: u32,
    pub captions: Vec<Caption>,
    pub duplicate: bool,
    /// 对应的抽帧文件，缺失时为 None（渲染为空图片块）
    pub image: Option<PathBuf>,
}

impl Slide {
    pub fn text(&self) -> String {
        joined_text(self.captions.iter().map(|c| c.text.as_str()))
    }

    /// 幻灯片在视频中的起始秒数
    pub fn start_secs(&self, window_secs: u64) -> u64 {
        self.index as u64 * window_secs
    }
}
