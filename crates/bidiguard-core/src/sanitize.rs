//! 文本清理：删除检测器识别出的全部隐藏字符
use crate::detectors::{default_detector, Detector};
use crate::error::{Result, SanitizeError};
use crate::table::lookup;

/// 清理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeResult {
    pub cleaned: String,
    pub removed_count: usize,
}

impl SanitizeResult {
    pub fn changed(&self) -> bool {
        self.removed_count > 0
    }
}

/// 用指定检测器清理文本（单遍，线性时间）
/// 逐字符写入输出缓冲；模式只可能以 `;` 或隐藏字符结尾，写入这两类字符后检查缓冲尾部，
/// 命中即截断。删除后两侧拼成的新实体（如 `&l&lrm;rm;`）会在其结尾字符写入时被发现，
/// 因此结果中不再含任何模式，removed_count 为全部删除次数。
pub fn sanitize_with(detector: &Detector, text: &str) -> SanitizeResult {
    let mut cleaned = String::with_capacity(text.len());
    let mut removed_count = 0usize;
    for ch in text.chars() {
        cleaned.push(ch);
        if ch != ';' && lookup(ch).is_none() {
            continue;
        }
        if let Some(n) = detector.suffix_match_len(&cleaned) {
            cleaned.truncate(cleaned.len() - n);
            removed_count += 1;
        }
    }
    SanitizeResult { cleaned, removed_count }
}

/// 使用默认检测器清理文本
pub fn sanitize(text: &str) -> SanitizeResult {
    sanitize_with(default_detector(), text)
}

/// 字节入口：非 UTF-8 输入立即返回 InvalidArgument
pub fn sanitize_bytes(bytes: &[u8]) -> Result<SanitizeResult> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| SanitizeError::InvalidArgument(format!("input is not UTF-8: {e}")))?;
    Ok(sanitize(text))
}
