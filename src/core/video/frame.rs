//! 抽帧文件命名约定：`前缀 + 4 位补零的镜头序号 + ".jpg"`

use std::io;
use std::path::{Path, PathBuf};

/// 磁盘上的一张抽帧图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFile {
    pub index: u32,
    pub path: PathBuf,
}

pub fn frame_file_name(prefix: &str, index: u32) -> String {
    format!("{prefix}{index:04}.jpg")
}

/// 交给解码器的输出模板（`%04d` 由 -start_number 起编号）
pub fn output_pattern(prefix: &str) -> String {
    format!("{prefix}%04d.jpg")
}

/// 从文件名解析镜头序号，不符合约定返回 None
pub fn shot_index(prefix: &str, file_name: &str) -> Option<u32> {
    let digits = file_name.strip_suffix(".jpg")?.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// 列出目录下所有抽帧，按镜头序号排序
pub fn list_frames(dir: &Path, prefix: &str) -> io::Result<Vec<FrameFile>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(index) = name.to_str().and_then(|n| shot_index(prefix, n)) else {
            continue;
        };
        frames.push(FrameFile {
            index,
            path: entry.path(),
        });
    }
    frames.sort_by_key(|f| f.index);
    Ok(frames)
}

/// 删除目录下所有抽帧，返回删除数量；已经不存在的文件忽略
pub fn remove_frames(dir: &Path, prefix: &str) -> io::Result<usize> {
    let mut removed = 0;
    for frame in list_frames(dir, prefix)? {
        match std::fs::remove_file(&frame.path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name("glancer-img", 7), "glancer-img0007.jpg");
        assert_eq!(frame_file_name("glancer-img", 12345), "glancer-img12345.jpg");
        assert_eq!(output_pattern("glancer-img"), "glancer-img%04d.jpg");
    }

    #[test]
    fn test_shot_index() {
        assert_eq!(shot_index("glancer-img", "glancer-img0042.jpg"), Some(42));
        assert_eq!(shot_index("glancer-img", "glancer-img.jpg"), None);
        assert_eq!(shot_index("glancer-img", "glancer-imgab12.jpg"), None);
        assert_eq!(shot_index("glancer-img", "other0001.jpg"), None);
        assert_eq!(shot_index("glancer-img", "glancer-img0001.png"), None);
    }

    #[test]
    fn test_list_and_remove_frames() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["glancer-img0010.jpg", "glancer-img0002.jpg", "notes.txt", "glancer-img0000.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let frames = list_frames(dir.path(), "glancer-img").unwrap();
        let indices: Vec<u32> = frames.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 2, 10]);

        assert_eq!(remove_frames(dir.path(), "glancer-img").unwrap(), 3);
        assert!(list_frames(dir.path(), "glancer-img").unwrap().is_empty());
        assert!(dir.path().join("notes.txt").exists());
    }
}
