//! 扫描选项与统计信息（模块）

/// 实体识别模式
/// - RawAndEntities：同时识别原始码点与 HTML 实体文本（默认）
/// - RawOnly：只识别原始码点，忽略 `&lrm;` 等实体写法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityMode {
    #[default]
    RawAndEntities,
    RawOnly,
}

/// 目录扫描选项
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// 实体识别模式
    pub entity_mode: EntityMode,
    /// 最大文件大小（字节）；超过则跳过
    pub max_file_size: Option<u64>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
    /// 扩展名白名单（不含点，大小写不敏感）；为空表示全部文件
    pub extensions: Vec<String>,
}

impl ScanOptions {
    /// 判断路径是否在扩展名白名单内
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_with_hits: usize,
    pub occurrences: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn empty_extension_list_accepts_everything() {
        let opts = ScanOptions::default();
        assert!(opts.accepts(Path::new("a/b.md")));
        assert!(opts.accepts(Path::new("Makefile")));
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let opts = ScanOptions { extensions: vec!["md".into()], ..Default::default() };
        assert!(opts.accepts(Path::new("note.MD")));
        assert!(!opts.accepts(Path::new("note.txt")));
        assert!(!opts.accepts(Path::new("README")));
    }
}
