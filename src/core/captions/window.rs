//! 时间窗口分桶与跨窗口去重

use super::markup::{clean_text, merge_lines};
use super::Caption;
use std::collections::HashSet;

/// 合并多行并清洗标记，清洗后为空的字幕直接丢弃
pub fn prepare_captions(captions: &[Caption]) -> Vec<Caption> {
    captions
        .iter()
        .map(|c| c.with_text(clean_text(&merge_lines(&c.text))))
        .filter(|c| !c.text.is_empty())
        .collect()
}

/// 窗口数 = max(1, ceil(最后一条字幕结束时间 / 窗口时长))，无字幕则为 0
pub fn window_count(captions: &[Caption], window_secs: u64) -> usize {
    let Some(last) = captions.last() else {
        return 0;
    };
    let window = window_secs.max(1) as f64;
    let shots = (last.end / window).ceil();
    if shots.is_finite() && shots > 1.0 {
        shots as usize
    } else {
        1
    }
}

/// 闭区间重叠判断，边界相接也算重叠
pub fn overlaps(window_start: f64, window_end: f64, start: f64, end: f64) -> bool {
    window_start <= end && window_end >= start
}

/// 按窗口分桶，字幕须已经过 [`prepare_captions`]
///
/// 最后一个窗口没有上界：视频时长不是窗口整数倍时，尾部字幕也会落进最后一张幻灯片
pub fn captions_per_window(captions: &[Caption], window_secs: u64) -> Vec<Vec<Caption>> {
    let total = window_count(captions, window_secs);
    let window = window_secs.max(1) as f64;

    (0..total)
        .map(|index| {
            let window_start = index as f64 * window;
            let window_end = if index + 1 == total {
                f64::INFINITY
            } else {
                window_start + window
            };
            captions
                .iter()
                .filter(|c| overlaps(window_start, window_end, c.start, c.end))
                .cloned()
                .collect()
        })
        .collect()
}

/// 同一 (start, end, text) 只在第一次出现的窗口保留
pub fn deduplicate_windows(windows: Vec<Vec<Caption>>) -> Vec<Vec<Caption>> {
    let mut seen: HashSet<(u64, u64, String)> = HashSet::new();

    windows
        .into_iter()
        .map(|window| {
            window
                .into_iter()
                .filter(|c| seen.insert((c.start.to_bits(), c.end.to_bits(), c.text.clone())))
                .collect()
        })
        .collect()
}
