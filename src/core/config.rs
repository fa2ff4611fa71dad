//! 幻灯片生成配置

use serde::{Deserialize, Serialize};

/// 帧指纹算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintKind {
    /// 差值哈希（默认，阈值 5 按它校准）
    DHash,
    /// DCT 感知哈希
    PHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlanceConfig {
    /// 每张幻灯片覆盖的秒数
    pub window_secs: u64,
    /// 每个解码任务覆盖的秒数
    pub chunk_secs: u64,
    /// 指纹边长（位数 = hash_size²）
    pub hash_size: u32,
    /// 汉明距离不超过该值视为重复
    pub duplicate_threshold: u32,
    /// 抽帧线程数，None 表示按 CPU 自动决定
    pub workers: Option<usize>,
    /// 封面帧的时间偏移（秒）
    pub hero_offset_secs: u64,
    /// ffmpeg -q:v
    pub jpeg_quality: u32,
    pub frame_prefix: String,
    pub decoder_program: String,
    pub probe_program: String,
    pub decoder_log_level: String,
    pub fingerprint: FingerprintKind,
}

impl Default for GlanceConfig {
    fn default() -> Self {
        Self {
            window_secs: 30,
            chunk_secs: 300,
            hash_size: 8,
            duplicate_threshold: 5,
            workers: None,
            hero_offset_secs: 3,
            jpeg_quality: 5,
            frame_prefix: "glancer-img".to_string(),
            decoder_program: "ffmpeg".to_string(),
            probe_program: "ffprobe".to_string(),
            decoder_log_level: "error".to_string(),
            fingerprint: FingerprintKind::DHash,
        }
    }
}

impl GlanceConfig {
    /// 讲座类视频：画面变化少，窗口更长、阈值更紧
    pub fn for_lectures() -> Self {
        Self {
            window_secs: 60,
            chunk_secs: 600,
            duplicate_threshold: 3,
            ..Default::default()
        }
    }

    /// 快剪辑视频：窗口更短、阈值更宽
    pub fn for_fast_cuts() -> Self {
        Self {
            window_secs: 15,
            chunk_secs: 150,
            duplicate_threshold: 8,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn effective_window_secs(&self) -> u64 {
        self.window_secs.max(1)
    }

    /// 分块向上取整到窗口的整数倍，保证各分块的全局帧编号互不重叠
    pub fn effective_chunk_secs(&self) -> u64 {
        let window = self.effective_window_secs();
        self.chunk_secs.max(window).div_ceil(window) * window
    }

    pub fn effective_hash_size(&self) -> u32 {
        self.hash_size.max(1)
    }

    pub fn effective_workers(&self, task_count: usize) -> usize {
        let limit = self.workers.unwrap_or_else(|| num_cpus::get() * 2);
        task_count.min(limit).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlanceConfig::default();
        assert_eq!(config.window_secs, 30);
        assert_eq!(config.chunk_secs, 300);
        assert_eq!(config.hash_size, 8);
        assert_eq!(config.duplicate_threshold, 5);
        assert_eq!(config.fingerprint, FingerprintKind::DHash);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GlanceConfig::from_json(r#"{"window_secs": 20, "fingerprint": "phash"}"#).unwrap();
        assert_eq!(config.window_secs, 20);
        assert_eq!(config.chunk_secs, 300);
        assert_eq!(config.fingerprint, FingerprintKind::PHash);
    }

    #[test]
    fn test_chunk_never_smaller_than_window() {
        let config = GlanceConfig {
            window_secs: 30,
            chunk_secs: 10,
            ..Default::default()
        };
        assert_eq!(config.effective_chunk_secs(), 30);

        let unaligned = GlanceConfig {
            window_secs: 30,
            chunk_secs: 45,
            ..Default::default()
        };
        assert_eq!(unaligned.effective_chunk_secs(), 60);

        let zero = GlanceConfig {
            window_secs: 0,
            ..Default::default()
        };
        assert_eq!(zero.effective_window_secs(), 1);
    }

    #[test]
    fn test_effective_workers() {
        let config = GlanceConfig {
            workers: Some(4),
            ..Default::default()
        };
        assert_eq!(config.effective_workers(3), 3);
        assert_eq!(config.effective_workers(10), 4);
        assert_eq!(config.effective_workers(0), 1);
    }

    #[test]
    fn test_default_workers_follow_cpu_count() {
        let config = GlanceConfig::default();
        let limit = num_cpus::get() * 2;
        assert_eq!(config.effective_workers(1), 1);
        assert_eq!(config.effective_workers(limit + 5), limit);
        assert_eq!(config.effective_workers(3), 3.min(limit));
    }
}
