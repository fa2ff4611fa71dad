//! 字幕轨解析（SRT / WebVTT）

use super::error::CaptionError;
use super::Caption;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;

static SRT_TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})\s*-->\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})")
        .unwrap()
});

static VTT_TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(\d+):)?(\d{1,2}):(\d{1,2})\.(\d{1,3})\s*-->\s*(?:(\d+):)?(\d{1,2}):(\d{1,2})\.(\d{1,3})")
        .unwrap()
});

/// 按扩展名选择解析器
pub fn parse_track(path: &Path) -> Result<Vec<Caption>, CaptionError> {
    let contents = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "srt" => parse_srt(&contents),
        "vtt" => parse_vtt(&contents),
        other => Err(CaptionError::UnsupportedFormat(other.to_string())),
    }
}

pub fn parse_srt(contents: &str) -> Result<Vec<Caption>, CaptionError> {
    let mut captions = Vec::new();

    for block in blocks(contents) {
        let (timing_pos, caps) = find_timing(&block, &SRT_TIMING_RE).ok_or_else(|| CaptionError::Parse {
            line: block[0].0,
            reason: format!("expected SRT timing line, found {:?}", block[0].1),
        })?;
        captions.push(build_caption(&block, timing_pos, &caps)?);
    }

    Ok(captions)
}

pub fn parse_vtt(contents: &str) -> Result<Vec<Caption>, CaptionError> {
    let mut captions = Vec::new();

    for (i, block) in blocks(contents).into_iter().enumerate() {
        let head = block[0].1.trim_start();
        if i == 0 && head.starts_with("WEBVTT") {
            continue;
        }
        if head.starts_with("NOTE") || head.starts_with("STYLE") || head.starts_with("REGION") {
            continue;
        }

        let (timing_pos, caps) = find_timing(&block, &VTT_TIMING_RE).ok_or_else(|| CaptionError::Parse {
            line: block[0].0,
            reason: format!("expected WebVTT timing line, found {:?}", block[0].1),
        })?;
        captions.push(build_caption(&block, timing_pos, &caps)?);
    }

    Ok(captions)
}

/// 按空行切块，保留 1 起始的行号
fn blocks(contents: &str) -> Vec<Vec<(usize, String)>> {
    let normalized = contents
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut result = Vec::new();
    let mut current: Vec<(usize, String)> = Vec::new();

    for (idx, line) in normalized.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        } else {
            current.push((idx + 1, line.to_string()));
        }
    }
    if !current.is_empty() {
        result.push(current);
    }

    result
}

/// 计时行只能是块的第一行，或紧跟在序号/标识行之后
fn find_timing<'a>(block: &'a [(usize, String)], re: &Regex) -> Option<(usize, Captures<'a>)> {
    block
        .iter()
        .take(2)
        .enumerate()
        .find_map(|(pos, (_, line))| re.captures(line).map(|caps| (pos, caps)))
}

fn build_caption(block: &[(usize, String)], timing_pos: usize, caps: &Captures) -> Result<Caption, CaptionError> {
    let start = timestamp(caps.get(1).map(|m| m.as_str()), &caps[2], &caps[3], &caps[4])?;
    let end = timestamp(caps.get(5).map(|m| m.as_str()), &caps[6], &caps[7], &caps[8])?;
    let text = block[timing_pos + 1..]
        .iter()
        .map(|(_, line)| line.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Caption::new(start, end, text))
}

fn timestamp(hours: Option<&str>, minutes: &str, seconds: &str, fraction: &str) -> Result<f64, CaptionError> {
    let parse = |s: &str| s.parse::<u64>().map_err(|_| CaptionError::Timestamp(s.to_string()));

    let h = hours.map(parse).transpose()?.unwrap_or(0);
    let m = parse(minutes)?;
    let s = parse(seconds)?;
    let frac = parse(fraction)? as f64 / 10f64.powi(fraction.len() as i32);

    let whole = h
        .checked_mul(3600)
        .and_then(|v| v.checked_add(m * 60))
        .and_then(|v| v.checked_add(s))
        .ok_or_else(|| CaptionError::Timestamp(format!("{}:{}:{}", hours.unwrap_or("0"), minutes, seconds)))?;

    Ok(whole as f64 + frac)
}
