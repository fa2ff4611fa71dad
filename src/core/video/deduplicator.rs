use super::fingerprint::{Fingerprint, FingerprintEngine};
use super::frame::FrameFile;
use crate::core::config::GlanceConfig;
use image::DynamicImage;
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// 镜头去重器 - 贪心聚类
/// 只有非重复帧才会加入唯一指纹集合，一串相似帧会收敛到同一个代表帧
pub struct ShotDeduplicator {
    engine: FingerprintEngine,
    /// 汉明距离阈值（<= 阈值即重复）
    threshold: u32,
    /// 已确认唯一的指纹，按加入顺序排列
    uniques: Vec<Fingerprint>,
}

/// 去重决策结果
#[derive(Debug, Clone, PartialEq)]
pub struct DedupDecision {
    pub is_duplicate: bool,
    /// 与唯一集合的最小距离，集合为空时为 None
    pub closest_distance: Option<u32>,
}

impl ShotDeduplicator {
    pub fn new(engine: FingerprintEngine, threshold: u32) -> Self {
        Self {
            engine,
            threshold,
            uniques: Vec::new(),
        }
    }

    pub fn from_config(config: &GlanceConfig) -> Self {
        Self::new(FingerprintEngine::from_config(config), config.duplicate_threshold)
    }

    /// 与唯一集合中任意指纹距离 <= 阈值即判重复；否则加入集合
    pub fn check(&mut self, fingerprint: Fingerprint) -> DedupDecision {
        let closest_distance = self.uniques.iter().map(|u| u.distance(&fingerprint)).min();
        let is_duplicate = closest_distance.is_some_and(|d| d <= self.threshold);

        if !is_duplicate {
            self.uniques.push(fingerprint);
        }

        DedupDecision {
            is_duplicate,
            closest_distance,
        }
    }

    pub fn check_image(&mut self, image: &DynamicImage) -> DedupDecision {
        let fingerprint = self.engine.fingerprint(image);
        self.check(fingerprint)
    }

    /// 扫描磁盘上的抽帧，返回重复镜头的序号
    ///
    /// 先按镜头序号排序再扫描；无法解码的帧跳过，视为非重复
    pub fn find_similar_shots(&mut self, frames: &[FrameFile]) -> BTreeSet<u32> {
        self.clear();

        let mut ordered: Vec<&FrameFile> = frames.iter().collect();
        ordered.sort_by_key(|f| f.index);

        let mut duplicates = BTreeSet::new();
        for frame in ordered {
            let fingerprint = match self.engine.fingerprint_file(&frame.path) {
                Ok(fp) => fp,
                Err(e) => {
                    warn!("⚠️ Skipping undecodable frame {:?}: {}", frame.path, e);
                    continue;
                }
            };

            let decision = self.check(fingerprint);
            debug!(
                "Shot {}: duplicate={} closest={:?}",
                frame.index, decision.is_duplicate, decision.closest_distance
            );
            if decision.is_duplicate {
                duplicates.insert(frame.index);
            }
        }

        info!(
            "🔍 Duplicate scan: {} frames, {} unique, {} duplicates",
            frames.len(),
            self.uniques.len(),
            duplicates.len()
        );
        duplicates
    }

    /// 内存中的帧，语义同 [`Self::find_similar_shots`]
    pub fn find_similar_images(&mut self, mut frames: Vec<(u32, DynamicImage)>) -> BTreeSet<u32> {
        self.clear();
        frames.sort_by_key(|(index, _)| *index);

        frames
            .iter()
            .filter(|(_, image)| self.check_image(image).is_duplicate)
            .map(|(index, _)| *index)
            .collect()
    }

    pub fn clear(&mut self) {
        self.uniques.clear();
    }

    pub fn len(&self) -> usize {
        self.uniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uniques.is_empty()
    }
}

impl Default for ShotDeduplicator {
    fn default() -> Self {
        Self::new(FingerprintEngine::default(), 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::frame::frame_file_name;
    use image::{Rgb, RgbImage};

    /// 纯色底 + 深色横条，或从左到右的亮度渐变
    fn shot(color: [u8; 3], variant: &str) -> DynamicImage {
        let dark = Rgb([color[0] / 2, color[1] / 2, color[2] / 2]);
        let img = RgbImage::from_fn(128, 128, |x, y| match variant {
            "horizontal" if (60..=68).contains(&y) => dark,
            "ramp" => Rgb(color.map(|c| (c as u32 * x / 127) as u8)),
            _ => Rgb(color),
        });
        DynamicImage::ImageRgb8(img)
    }

    fn write_frames(dir: &std::path::Path, shots: &[(u32, DynamicImage)]) -> Vec<FrameFile> {
        shots
            .iter()
            .map(|(index, image)| {
                let path = dir.join(frame_file_name("glancer-img", *index));
                image.save(&path).unwrap();
                FrameFile { index: *index, path }
            })
            .collect()
    }

    #[test]
    fn test_identical_frames_marked_duplicate() {
        let mut dedup = ShotDeduplicator::default();
        let first = dedup.check_image(&shot([200, 200, 200], "horizontal"));
        assert!(!first.is_duplicate);
        assert_eq!(first.closest_distance, None);

        let second = dedup.check_image(&shot([200, 200, 200], "horizontal"));
        assert!(second.is_duplicate);
        assert_eq!(second.closest_distance, Some(0));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_duplicates_not_added_to_unique_set() {
        let mut dedup = ShotDeduplicator::new(FingerprintEngine::default(), 0);
        let a = Fingerprint::from_bits([true, false, false, false]);
        let b = Fingerprint::from_bits([false, true, false, false]);

        assert!(!dedup.check(a.clone()).is_duplicate);
        assert!(dedup.check(a).is_duplicate);
        assert!(!dedup.check(b).is_duplicate);
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_greedy_collapses_onto_representative() {
        // c 距 a 为 2 > 阈值 1，但 b（距 a 为 1）是重复帧不进集合，所以 c 是新镜头
        let mut dedup = ShotDeduplicator::new(FingerprintEngine::default(), 1);
        let a = Fingerprint::from_bits([false, false, false, false]);
        let b = Fingerprint::from_bits([true, false, false, false]);
        let c = Fingerprint::from_bits([true, true, false, false]);

        assert!(!dedup.check(a).is_duplicate);
        assert!(dedup.check(b).is_duplicate);
        assert!(!dedup.check(c).is_duplicate);
    }

    #[test]
    fn test_find_similar_shots_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut frames = write_frames(
            dir.path(),
            &[
                (2, shot([120, 80, 200], "ramp")),
                (0, shot([200, 200, 200], "horizontal")),
                (1, shot([200, 200, 200], "horizontal")),
            ],
        );
        // 发现顺序与镜头顺序无关
        frames.reverse();

        let duplicates = ShotDeduplicator::default().find_similar_shots(&frames);
        assert!(duplicates.contains(&1));
        assert!(!duplicates.contains(&0));
        assert!(!duplicates.contains(&2));
    }

    #[test]
    fn test_undecodable_frame_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut frames = write_frames(dir.path(), &[(0, shot([30, 60, 90], "horizontal"))]);
        let broken = dir.path().join(frame_file_name("glancer-img", 1));
        std::fs::write(&broken, b"truncated").unwrap();
        frames.push(FrameFile { index: 1, path: broken });

        let duplicates = ShotDeduplicator::default().find_similar_shots(&frames);
        assert!(duplicates.is_empty());
    }

    #[test]
    fn test_reordering_unrelated_frames_keeps_flags() {
        let a = shot([200, 200, 200], "horizontal");
        let b = shot([200, 10, 10], "ramp");

        let mut dedup = ShotDeduplicator::default();
        let forward = dedup.find_similar_images(vec![(0, a.clone()), (1, b.clone()), (2, a.clone())]);
        let swapped = dedup.find_similar_images(vec![(0, b), (1, a.clone()), (2, a)]);

        assert_eq!(forward, BTreeSet::from([2]));
        assert_eq!(swapped, BTreeSet::from([2]));
    }
}
