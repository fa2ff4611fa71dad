use super::Slide;
use crate::core::captions::{captions_per_window, deduplicate_windows, prepare_captions, Caption};
use crate::core::config::GlanceConfig;
use crate::core::video::{list_frames, FrameFile, ShotDeduplicator};
use log::{info, warn};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

pub struct SlideSynthesizer {
    config: GlanceConfig,
}

impl SlideSynthesizer {
    pub fn new(config: GlanceConfig) -> Self {
        Self { config }
    }

    /// 清洗 → 分桶 → 跨窗口去重
    pub fn caption_windows(&self, captions: &[Caption]) -> Vec<Vec<Caption>> {
        let prepared = prepare_captions(captions);
        deduplicate_windows(captions_per_window(&prepared, self.config.effective_window_secs()))
    }

    /// 抽帧目录必须已经静止（线程池排空且封面帧已写入）
    pub fn synthesize(&self, captions: &[Caption], frames_dir: &Path) -> Vec<Slide> {
        let windows = self.caption_windows(captions);
        if windows.is_empty() {
            return Vec::new();
        }

        let frames = list_frames(frames_dir, &self.config.frame_prefix).unwrap_or_else(|e| {
            warn!("⚠️ Cannot list frames in {:?}: {}", frames_dir, e);
            Vec::new()
        });
        let duplicates = ShotDeduplicator::from_config(&self.config).find_similar_shots(&frames);

        let slides = compose(windows, &duplicates, &frames);
        info!("🖼️ Synthesized {} slides ({} duplicates)", slides.len(), duplicates.len());
        slides
    }
}

/// 按共享的镜头序号拼接；没有字幕的窗口也保留，保证与帧序列位置对齐
pub fn compose(windows: Vec<Vec<Caption>>, duplicates: &BTreeSet<u32>, frames: &[FrameFile]) -> Vec<Slide> {
    let by_index: HashMap<u32, &FrameFile> = frames.iter().map(|f| (f.index, f)).collect();

    windows
        .into_iter()
        .enumerate()
        .map(|(i, captions)| {
            let index = i as u32;
            let image = by_index.get(&index).map(|f| f.path.clone());
            if image.is_none() {
                warn!("⚠️ Missing frame for slide {}", index);
            }
            Slide {
                index,
                captions,
                duplicate: duplicates.contains(&index),
                image,
            }
        })
        .collect()
}
