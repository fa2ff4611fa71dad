//! 帧指纹：差值哈希（dHash）与 DCT 感知哈希（pHash）
//!
//! 两种算法位数相同（hash_size²），但数值上不可互换，阈值需分别校准。

use crate::core::config::{FingerprintKind, GlanceConfig};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageResult};
use rustdct::{Dct2, DctPlanner};
use std::path::Path;

/// 定长位向量，第 i 位存放在 `words[i / 64]` 的第 `i % 64` 位
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    words: Vec<u64>,
    bits: u32,
}

impl Fingerprint {
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut words = Vec::new();
        let mut count = 0u32;
        for bit in bits {
            let word = (count / 64) as usize;
            if word == words.len() {
                words.push(0);
            }
            if bit {
                words[word] |= 1u64 << (count % 64);
            }
            count += 1;
        }
        Self { words, bits: count }
    }

    pub fn len(&self) -> u32 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// 不超过 64 位时以整数形式返回
    pub fn as_u64(&self) -> Option<u64> {
        match self.words.as_slice() {
            [] => Some(0),
            [word] => Some(*word),
            _ => None,
        }
    }

    pub fn distance(&self, other: &Fingerprint) -> u32 {
        hamming_distance(self, other)
    }
}

/// 汉明距离；长度不同时缺失的字按 0 计
pub fn hamming_distance(a: &Fingerprint, b: &Fingerprint) -> u32 {
    let len = a.words.len().max(b.words.len());
    (0..len)
        .map(|i| {
            let x = a.words.get(i).copied().unwrap_or(0);
            let y = b.words.get(i).copied().unwrap_or(0);
            (x ^ y).count_ones()
        })
        .sum()
}

#[derive(Debug, Clone, Copy)]
pub struct FingerprintEngine {
    kind: FingerprintKind,
    hash_size: u32,
}

impl FingerprintEngine {
    pub fn new(kind: FingerprintKind, hash_size: u32) -> Self {
        Self {
            kind,
            hash_size: hash_size.max(1),
        }
    }

    pub fn from_config(config: &GlanceConfig) -> Self {
        Self::new(config.fingerprint, config.effective_hash_size())
    }

    pub fn hash_size(&self) -> u32 {
        self.hash_size
    }

    pub fn fingerprint(&self, image: &DynamicImage) -> Fingerprint {
        let gray = image.to_luma8();
        match self.kind {
            FingerprintKind::DHash => dhash(&gray, self.hash_size),
            FingerprintKind::PHash => phash(&gray, self.hash_size),
        }
    }

    pub fn fingerprint_file(&self, path: &Path) -> ImageResult<Fingerprint> {
        let image = image::open(path)?;
        Ok(self.fingerprint(&image))
    }
}

impl Default for FingerprintEngine {
    fn default() -> Self {
        Self::new(FingerprintKind::DHash, 8)
    }
}

/// 缩放到 (n+1)×n，每行左像素 < 右像素记 1，按行优先拼接
///
/// 灰度化用 `image` 的 `to_luma8`（Rec. 709 权重）；换用 Rec. 601 灰度的实现
/// 在亮度接近的相邻像素上可能得到不同的位
fn dhash(gray: &GrayImage, hash_size: u32) -> Fingerprint {
    let resized = imageops::resize(gray, hash_size + 1, hash_size, FilterType::Lanczos3);

    Fingerprint::from_bits((0..hash_size).flat_map(|row| {
        let resized = &resized;
        (0..hash_size).map(move |col| {
            let left = resized.get_pixel(col, row).0[0];
            let right = resized.get_pixel(col + 1, row).0[0];
            left < right
        })
    }))
}

/// 缩放到 4n×4n，二维 DCT-II 后取左上 n×n 低频块，大于中位数记 1
fn phash(gray: &GrayImage, hash_size: u32) -> Fingerprint {
    let side = (hash_size * 4) as usize;
    let n = hash_size as usize;
    let resized = imageops::resize(gray, side as u32, side as u32, FilterType::Lanczos3);

    let mut rows: Vec<f32> = resized.pixels().map(|p| p.0[0] as f32).collect();

    let mut planner = DctPlanner::new();
    let dct = planner.plan_dct2(side);

    for row in rows.chunks_exact_mut(side) {
        dct.process_dct2(row);
    }

    // 转置后对列做 DCT；结果 cols[c * side + r] 为 (r, c) 处系数
    let mut cols = vec![0f32; side * side];
    for r in 0..side {
        for c in 0..side {
            cols[c * side + r] = rows[r * side + c];
        }
    }
    for col in cols.chunks_exact_mut(side) {
        dct.process_dct2(col);
    }

    let low: Vec<f32> = (0..n)
        .flat_map(|r| {
            let cols = &cols;
            (0..n).map(move |c| cols[c * side + r])
        })
        .collect();

    let median = median(&low);
    Fingerprint::from_bits(low.iter().map(|&v| v > median))
}

fn median(values: &[f32]) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.is_empty() {
        0.0
    } else if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
