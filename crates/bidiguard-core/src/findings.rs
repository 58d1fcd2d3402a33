//! 命中项与排序
use serde::Serialize;

/// 命中的写法：原始码点或 HTML 实体文本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    Raw,
    Entity,
}

/// 单次命中
/// - `offset` 按字符（Unicode 标量值）计数，与显示位置一致
/// - `byte_start..byte_end` 为原串中的字节区间，便于切片
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub offset: usize,
    pub byte_start: usize,
    pub byte_end: usize,
    pub codepoint: char,
    pub form: Form,
}

/// 一次扫描的结果（每次扫描新建，不缓存）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub occurrences: Vec<Occurrence>,
}

impl ScanResult {
    pub fn count(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// 仅返回 (offset, codepoint) 序列
    pub fn offsets(&self) -> Vec<(usize, char)> {
        self.occurrences.iter().map(|o| (o.offset, o.codepoint)).collect()
    }
}

/// 稳定排序：起始偏移升序 → 长度降序
pub(crate) fn sort_occurrences_stable(items: &mut [Occurrence]) {
    items.sort_by(|a, b| {
        use std::cmp::Ordering;
        match a.byte_start.cmp(&b.byte_start) {
            Ordering::Equal => (b.byte_end - b.byte_start).cmp(&(a.byte_end - a.byte_start)),
            o => o,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(byte_start: usize, byte_end: usize) -> Occurrence {
        Occurrence { offset: byte_start, byte_start, byte_end, codepoint: '\u{202D}', form: Form::Raw }
    }

    #[test]
    fn sorts_by_start_then_longest() {
        let mut v = vec![occ(9, 12), occ(0, 3), occ(9, 17)];
        sort_occurrences_stable(&mut v);
        let spans: Vec<_> = v.iter().map(|o| (o.byte_start, o.byte_end)).collect();
        assert_eq!(spans, vec![(0, 3), (9, 17), (9, 12)]);
    }

    #[test]
    fn form_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Form::Entity).unwrap(), "\"entity\"");
    }
}
