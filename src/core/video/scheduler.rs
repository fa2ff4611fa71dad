//! 分块并行抽帧调度
//!
//! 每个分块的起始帧编号 = floor(分块起点 / 窗口时长)，在派发前一次算好，
//! 因此乱序、并行执行的分块写入的全局帧编号互不重叠、没有空洞。
//! 封面帧在线程池排空后同步执行，写入保留的 0 号帧。

use super::error::ExtractionError;
use super::frame::{frame_file_name, output_pattern};
use super::runner::{CommandRunner, DecoderCommand};
use crate::core::config::GlanceConfig;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// 单次解码器调用负责的时间片
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionTask {
    pub start_offset: u64,
    /// None 表示时长未知，解码到输入结束
    pub length: Option<u64>,
    pub start_number: u32,
    /// 每隔多少秒取一帧
    pub sample_interval: u64,
}

/// 切分时间轴；时长为 0 时退化为一个覆盖整段输入的分块
pub fn plan_chunks(duration: u64, window_secs: u64, chunk_secs: u64) -> Vec<ExtractionTask> {
    let window = window_secs.max(1);
    let chunk = chunk_secs.max(window).div_ceil(window) * window;

    if duration == 0 {
        return vec![ExtractionTask {
            start_offset: 0,
            length: None,
            start_number: 0,
            sample_interval: window,
        }];
    }

    (0..duration)
        .step_by(chunk as usize)
        .map(|start| {
            let length = chunk.min(duration - start);
            ExtractionTask {
                start_offset: start,
                length: Some(length),
                start_number: (start / window) as u32,
                // 尾部不足一个窗口的分块缩短采样间隔，保证至少出一帧
                sample_interval: if length < window { length.max(1) } else { window },
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub chunks: usize,
    pub workers: usize,
}

pub struct FrameScheduler {
    config: GlanceConfig,
    video: PathBuf,
    output_dir: PathBuf,
}

impl FrameScheduler {
    pub fn new(config: GlanceConfig, video: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            video: video.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn plan(&self, duration: u64) -> Vec<ExtractionTask> {
        plan_chunks(
            duration,
            self.config.effective_window_secs(),
            self.config.effective_chunk_secs(),
        )
    }

    fn base_command(&self) -> DecoderCommand {
        DecoderCommand::new(&self.config.decoder_program).args([
            "-y",
            "-hide_banner",
            "-loglevel",
            self.config.decoder_log_level.as_str(),
        ])
    }

    fn input(&self) -> String {
        self.video.to_string_lossy().into_owned()
    }

    pub fn chunk_command(&self, task: &ExtractionTask) -> DecoderCommand {
        let mut cmd = self
            .base_command()
            .args(["-ss".to_string(), task.start_offset.to_string()]);
        if let Some(length) = task.length {
            cmd = cmd.args(["-t".to_string(), length.to_string()]);
        }

        let pattern = self.output_dir.join(output_pattern(&self.config.frame_prefix));
        cmd.args(["-i".to_string(), self.input()])
            .args([
                "-vf".to_string(),
                format!("fps=1/{}", task.sample_interval),
                "-pix_fmt".to_string(),
                "yuvj420p".to_string(),
                "-q:v".to_string(),
                self.config.jpeg_quality.to_string(),
                "-start_number".to_string(),
                task.start_number.to_string(),
            ])
            .arg(pattern.to_string_lossy().into_owned())
    }

    /// 封面帧：固定偏移处的单帧，写入 0 号帧
    pub fn hero_command(&self) -> DecoderCommand {
        let output = self.output_dir.join(frame_file_name(&self.config.frame_prefix, 0));
        self.base_command()
            .args(["-ss".to_string(), self.config.hero_offset_secs.to_string()])
            .args(["-i".to_string(), self.input()])
            .args([
                "-pix_fmt".to_string(),
                "yuvj420p".to_string(),
                "-q:v".to_string(),
                self.config.jpeg_quality.to_string(),
                "-vframes".to_string(),
                "1".to_string(),
            ])
            .arg(output.to_string_lossy().into_owned())
    }

    pub fn commands(&self, duration: u64) -> Vec<DecoderCommand> {
        self.plan(duration).iter().map(|t| self.chunk_command(t)).collect()
    }

    /// 在有界线程池里并行执行所有分块，任一失败即中止（排队中的分块不再启动），
    /// 全部成功后再同步执行封面帧
    pub fn run(&self, duration: u64, runner: &dyn CommandRunner) -> Result<ExtractionReport, ExtractionError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let commands = self.commands(duration);
        let workers = self.config.effective_workers(commands.len());
        info!(
            "🎞️ Extracting frames: duration={}s, {} chunks, {} workers",
            duration,
            commands.len(),
            workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| ExtractionError::ThreadPool(e.to_string()))?;

        let aborted = AtomicBool::new(false);
        pool.install(|| {
            commands.par_iter().try_for_each(|command| {
                if aborted.load(Ordering::SeqCst) {
                    debug!("Skipping queued chunk after failure: {}", command);
                    return Ok(());
                }
                runner.run(command).inspect_err(|_| aborted.store(true, Ordering::SeqCst))
            })
        })?;

        runner.run(&self.hero_command())?;
        info!("✅ Frames extracted to {:?}", self.output_dir);

        Ok(ExtractionReport {
            chunks: commands.len(),
            workers,
        })
    }
}
