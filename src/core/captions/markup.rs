//! 字幕文本清洗（纯函数，不依赖 locale）

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// HTML 实体反转义（完整 HTML5 实体表，含无分号的旧式实体），无法识别的实体原样保留
pub fn unescape_entities(text: &str) -> String {
    htmlize::unescape(text).into_owned()
}

pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// 反转义 → 去标签 → 不换行空格转普通空格 → 去首尾空白
pub fn clean_text(text: &str) -> String {
    let unescaped = unescape_entities(text);
    let stripped = strip_tags(&unescaped);
    stripped.replace('\u{a0}', " ").trim().to_string()
}

/// 去掉空行，剩余行用 `\n` 连接
pub fn merge_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 换行转空格并压缩连续空白
pub fn normalize_caption_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 一个窗口内所有字幕拼成一段文字
pub fn joined_text<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let paragraphs: Vec<String> = texts
        .into_iter()
        .map(normalize_caption_text)
        .filter(|text| !text.is_empty())
        .collect();
    normalize_caption_text(&paragraphs.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_strips_markup() {
        assert_eq!(clean_text("<i>Hello</i> &amp; <b>world</b>"), "Hello & world");
        assert_eq!(clean_text("  a&nbsp;b  "), "a b");
        assert_eq!(clean_text("<font color=\"#fff\">  </font>"), "");
    }

    #[test]
    fn test_escaped_tags_are_stripped_after_unescape() {
        assert_eq!(clean_text("&lt;c&gt;word&lt;/c&gt;"), "word");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(unescape_entities("it&#39;s &#x263A;"), "it's \u{263a}");
        assert_eq!(unescape_entities("&bogus; stays"), "&bogus; stays");
    }

    #[test]
    fn test_accented_and_legacy_entities() {
        assert_eq!(
            clean_text("caf&eacute; ni&ntilde;o &uuml;ber &ndash; na&iuml;ve &amp"),
            "café niño über – naïve &"
        );
    }

    #[test]
    fn test_merge_lines_drops_blank_lines() {
        assert_eq!(merge_lines("one\n\n  \ntwo"), "one\ntwo");
    }

    #[test]
    fn test_joined_text() {
        let joined = joined_text(["Hello\nthere", "", "  World  "]);
        assert_eq!(joined, "Hello there World");
    }
}
