//! 检测器：单个 Aho-Corasick 自动机同时覆盖原始码点与实体文本
use std::sync::OnceLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use crate::error::{Result, SanitizeError};
use crate::findings::{sort_occurrences_stable, Form, Occurrence, ScanResult};
use crate::options::EntityMode;
use crate::table::HIDDEN_CHARACTERS;

/// 检测器（线程安全，可跨线程共享）
pub struct Detector {
    /// 全部模式的自动机（按 targets 的顺序构建）
    ac: AhoCorasick,
    /// 模式文本（与 ac 模式索引一一对应）
    patterns: Vec<String>,
    /// 模式索引 -> (规范码点, 写法)
    targets: Vec<(char, Form)>,
    mode: EntityMode,
}

impl Detector {
    /// 从内置表构建检测器
    pub fn new(mode: EntityMode) -> Self {
        let mut patterns: Vec<String> = Vec::new();
        let mut targets: Vec<(char, Form)> = Vec::new();

        for spec in HIDDEN_CHARACTERS {
            patterns.push(spec.codepoint.to_string());
            targets.push((spec.codepoint, Form::Raw));
            if mode == EntityMode::RawAndEntities {
                for e in spec.entities {
                    for variant in entity_variants(e) {
                        patterns.push(variant);
                        targets.push((spec.codepoint, Form::Entity));
                    }
                }
            }
        }

        let ac = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .expect("build aho-corasick");

        Self { ac, patterns, targets, mode }
    }

    /// 若 `s` 以某个模式结尾，返回该模式的字节长度
    pub(crate) fn suffix_match_len(&self, s: &str) -> Option<usize> {
        self.patterns.iter().find(|p| s.ends_with(p.as_str())).map(|p| p.len())
    }

    pub fn mode(&self) -> EntityMode {
        self.mode
    }

    /// 扫描文本，按出现顺序返回全部命中
    /// - 空串或无命中时返回空结果
    /// - 同一字符的原始写法与实体写法分别计数，不去重
    pub fn scan(&self, text: &str) -> ScanResult {
        let mut occurrences = Vec::new();
        // 增量换算字符偏移：只统计上一命中到本命中之间的字符数
        let mut last_byte = 0usize;
        let mut chars_before = 0usize;

        for m in self.ac.find_iter(text) {
            chars_before += text[last_byte..m.start()].chars().count();
            last_byte = m.start();
            let (codepoint, form) = self.targets[m.pattern().as_usize()];
            occurrences.push(Occurrence {
                offset: chars_before,
                byte_start: m.start(),
                byte_end: m.end(),
                codepoint,
                form,
            });
        }

        // 非重叠匹配本身有序，这里再保证一次
        sort_occurrences_stable(&mut occurrences);
        ScanResult { occurrences }
    }

    /// 字节入口：非 UTF-8 输入立即返回 InvalidArgument
    pub fn scan_bytes(&self, bytes: &[u8]) -> Result<ScanResult> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| SanitizeError::InvalidArgument(format!("input is not UTF-8: {e}")))?;
        Ok(self.scan(text))
    }
}

/// 实体的全部可匹配写法
/// - 命名实体（`&lrm;`）大小写敏感，只有原样一种
/// - 数字实体（`&#x202D;`）中的 x 与十六进制字母大小写不敏感，逐位展开
fn entity_variants(entity: &str) -> Vec<String> {
    if !entity.starts_with("&#") {
        return vec![entity.to_string()];
    }
    let mut out = vec![String::new()];
    for ch in entity.chars() {
        if ch.is_ascii_alphabetic() {
            out = out
                .into_iter()
                .flat_map(|p| [format!("{p}{}", ch.to_ascii_lowercase()), format!("{p}{}", ch.to_ascii_uppercase())])
                .collect();
        } else {
            for p in &mut out { p.push(ch); }
        }
    }
    out
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(EntityMode::default())
    }
}

/// 进程内共享的默认检测器（原始码点 + 实体）
pub fn default_detector() -> &'static Detector {
    static DETECTOR: OnceLock<Detector> = OnceLock::new();
    DETECTOR.get_or_init(Detector::default)
}

/// 共享的只识别原始码点的检测器
pub(crate) fn raw_only_detector() -> &'static Detector {
    static DETECTOR: OnceLock<Detector> = OnceLock::new();
    DETECTOR.get_or_init(|| Detector::new(EntityMode::RawOnly))
}

/// 按模式取共享检测器
pub fn detector_for(mode: EntityMode) -> &'static Detector {
    match mode {
        EntityMode::RawAndEntities => default_detector(),
        EntityMode::RawOnly => raw_only_detector(),
    }
}

/// 使用默认检测器扫描
pub fn scan(text: &str) -> ScanResult {
    default_detector().scan(text)
}

/// 使用默认检测器扫描字节
pub fn scan_bytes(bytes: &[u8]) -> Result<ScanResult> {
    default_detector().scan_bytes(bytes)
}
