//! 视频 → 幻灯片

use super::error::GlanceError;
use crate::core::captions::parse_track;
use crate::core::config::GlanceConfig;
use crate::core::slides::{Slide, SlideSynthesizer};
use crate::core::video::{probe_duration, remove_frames, CommandRunner, FrameScheduler, ProcessRunner};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 交给外部渲染器的结果
#[derive(Debug, Clone, Serialize)]
pub struct SlideShow {
    pub slides: Vec<Slide>,
    pub frames_dir: PathBuf,
    pub window_secs: u64,
    pub duration_secs: u64,
}

impl SlideShow {
    pub fn to_json(&self) -> Result<String, GlanceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 幻灯片生成器 - 抽帧 + 字幕分桶 + 重复镜头标记
///
/// ```no_run
/// use glance_lib::api::SlideShowGenerator;
/// use glance_lib::core::config::GlanceConfig;
/// use std::path::Path;
///
/// let generator = SlideShowGenerator::new(GlanceConfig::default());
/// let show = generator
///     .generate(Path::new("talk.mp4"), Path::new("talk.en.srt"), Path::new("/tmp/glance/talk"))
///     .unwrap();
/// println!("{}", show.to_json().unwrap());
/// ```
pub struct SlideShowGenerator {
    config: GlanceConfig,
    runner: Box<dyn CommandRunner>,
}

impl SlideShowGenerator {
    pub fn new(config: GlanceConfig) -> Self {
        Self::with_runner(config, Box::new(ProcessRunner))
    }

    pub fn with_runner(config: GlanceConfig, runner: Box<dyn CommandRunner>) -> Self {
        crate::init_logging();
        info!("🎬 SlideShowGenerator: created");
        Self { config, runner }
    }

    pub fn config(&self) -> &GlanceConfig {
        &self.config
    }

    pub fn generate(&self, video: &Path, captions: &Path, work_dir: &Path) -> Result<SlideShow, GlanceError> {
        let duration = probe_duration(&self.config.probe_program, video)?;
        self.generate_with_duration(video, duration, captions, work_dir)
    }

    /// 时长已知时跳过探测；解码失败直接返回错误，不产出部分结果
    pub fn generate_with_duration(
        &self,
        video: &Path,
        duration: u64,
        captions: &Path,
        work_dir: &Path,
    ) -> Result<SlideShow, GlanceError> {
        let parsed = parse_track(captions)?;
        info!("📝 Parsed {} captions from {:?}", parsed.len(), captions);

        let scheduler = FrameScheduler::new(self.config.clone(), video, work_dir);
        if let Err(e) = scheduler.run(duration, self.runner.as_ref()) {
            // 不留下部分抽帧
            match remove_frames(work_dir, &self.config.frame_prefix) {
                Ok(removed) => warn!("🗑️ Extraction failed, removed {} partial frames", removed),
                Err(cleanup) => warn!("⚠️ Failed to remove partial frames in {:?}: {}", work_dir, cleanup),
            }
            return Err(e.into());
        }

        let slides = SlideSynthesizer::new(self.config.clone()).synthesize(&parsed, work_dir);

        Ok(SlideShow {
            slides,
            frames_dir: work_dir.to_path_buf(),
            window_secs: self.config.effective_window_secs(),
            duration_secs: duration,
        })
    }

    /// 删除本次抽出的帧文件
    pub fn cleanup(&self, show: &SlideShow) -> Result<usize, GlanceError> {
        let removed = remove_frames(&show.frames_dir, &self.config.frame_prefix)?;
        info!("🗑️ Removed {} frames from {:?}", removed, show.frames_dir);
        Ok(removed)
    }
}
