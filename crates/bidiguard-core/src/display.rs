//! 显示配置（TOML）与占位符渲染
//!
//! 配置只作为显式参数传入渲染层，库内不持有全局状态。
use std::fmt::Write;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::detectors::default_detector;
use crate::error::{Result, SanitizeError};
use crate::findings::ScanResult;
use crate::table::describe;

/// 占位符显示配置
/// 兼容两种字段名：snake_case 或宿主设置里的 camelCase
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub enabled: bool,
    #[serde(alias = "backgroundColor")]
    pub background_color: String,
    #[serde(alias = "textColor")]
    pub text_color: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            background_color: "#ff0000".to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

impl DisplayConfig {
    /// 从 TOML 文本解析并校验颜色
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        let cfg: DisplayConfig = toml::from_str(txt)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path)?;
        Self::from_toml_str(&txt)
    }

    pub fn validate(&self) -> Result<()> {
        parse_color("background_color", &self.background_color)?;
        parse_color("text_color", &self.text_color)?;
        Ok(())
    }
}

fn color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("color regex"))
}

/// 解析 #rgb / #rrggbb 为 (r, g, b)
pub fn parse_color(field: &'static str, value: &str) -> Result<(u8, u8, u8)> {
    let invalid = || SanitizeError::InvalidColor { field, value: value.to_string() };
    let caps = color_regex().captures(value).ok_or_else(invalid)?;
    let hex = &caps[1];
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    if hex.len() == 3 {
        // 短写法每位重复一次：#f80 -> #ff8800
        let r = channel(&hex[0..1])? * 17;
        let g = channel(&hex[1..2])? * 17;
        let b = channel(&hex[2..3])? * 17;
        Ok((r, g, b))
    } else {
        Ok((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?))
    }
}

/// 单个占位符：宿主据此绘制带颜色的标记与提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub offset: usize,
    pub codepoint: char,
    pub label: String,
}

/// 为扫描结果中的每次命中生成占位符
pub fn placeholders(result: &ScanResult) -> Vec<Placeholder> {
    result
        .occurrences
        .iter()
        .map(|o| Placeholder { offset: o.offset, codepoint: o.codepoint, label: describe(o.codepoint as u32) })
        .collect()
}

/// 可见标记文本，如 `[U+202D]`
pub fn marker(ch: char) -> String {
    format!("[U+{:04X}]", ch as u32)
}

/// 将文本中的隐藏字符替换为带 24 位 ANSI 颜色的可见标记
/// - 关闭时原样返回
/// - 配置中的颜色非法时返回 InvalidColor
pub fn render_placeholders(text: &str, config: &DisplayConfig) -> Result<String> {
    if !config.enabled {
        return Ok(text.to_string());
    }
    let (br, bg, bb) = parse_color("background_color", &config.background_color)?;
    let (fr, fg, fb) = parse_color("text_color", &config.text_color)?;

    let result = default_detector().scan(text);
    let mut out = String::with_capacity(text.len() + result.count() * 32);
    let mut last = 0usize;
    for o in &result.occurrences {
        out.push_str(&text[last..o.byte_start]);
        // 写入 String 不会失败
        let _ = write!(
            out,
            "\x1b[48;2;{br};{bg};{bb}m\x1b[38;2;{fr};{fg};{fb}m[U+{:04X}]\x1b[0m",
            o.codepoint as u32
        );
        last = o.byte_end;
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// 状态栏文本
pub fn status_line(count: usize) -> String {
    match count {
        0 => "No hidden characters".to_string(),
        1 => "1 hidden character".to_string(),
        n => format!("{n} hidden characters"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::scan;

    #[test]
    fn defaults_when_fields_missing() {
        let cfg = DisplayConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DisplayConfig::default());
    }

    #[test]
    fn accepts_camel_case_fields() {
        let cfg = DisplayConfig::from_toml_str(
            "enabled = false\nbackgroundColor = \"#00f\"\ntextColor = \"#101010\"\n",
        )
        .unwrap();
        assert!(!cfg.enabled);
        assert_eq!(cfg.background_color, "#00f");
        assert_eq!(cfg.text_color, "#101010");
    }

    #[test]
    fn rejects_bad_colors() {
        let err = DisplayConfig::from_toml_str("text_color = \"red\"").unwrap_err();
        assert!(matches!(err, SanitizeError::InvalidColor { field: "text_color", .. }));
        assert!(parse_color("background_color", "#12345").is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(DisplayConfig::from_toml_str("enabled = ["), Err(SanitizeError::Config(_))));
    }

    #[test]
    fn parses_short_and_long_colors() {
        assert_eq!(parse_color("c", "#f80").unwrap(), (255, 136, 0));
        assert_eq!(parse_color("c", "#0A0b0C").unwrap(), (10, 11, 12));
    }

    #[test]
    fn placeholders_carry_labels() {
        let p = placeholders(&scan("a\u{202C}"));
        assert_eq!(
            p,
            vec![Placeholder { offset: 1, codepoint: '\u{202C}', label: "Pop directional formatting (U+202C)".into() }]
        );
    }

    #[test]
    fn render_wraps_marker_in_colors() {
        let out = render_placeholders("a\u{202D}b", &DisplayConfig::default()).unwrap();
        assert_eq!(out, "a\x1b[48;2;255;0;0m\x1b[38;2;255;255;255m[U+202D]\x1b[0mb");
        assert!(out.contains(&marker('\u{202D}')));
    }

    #[test]
    fn render_disabled_returns_text() {
        let cfg = DisplayConfig { enabled: false, ..Default::default() };
        assert_eq!(render_placeholders("a&lrm;b", &cfg).unwrap(), "a&lrm;b");
    }

    #[test]
    fn status_line_pluralizes() {
        assert_eq!(status_line(0), "No hidden characters");
        assert_eq!(status_line(1), "1 hidden character");
        assert_eq!(status_line(7), "7 hidden characters");
    }
}
