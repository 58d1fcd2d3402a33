//! 批量清理文件名
//!
//! 逐个处理：单个文件失败只记录原因，不中断整批。
use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::detectors::detector_for;
use crate::options::ScanOptions;
use crate::sanitize::sanitize_with;
use crate::scan::collect_files;

/// 单个文件的重命名（dry-run 时为计划）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub from: PathBuf,
    pub to: PathBuf,
    pub removed_count: usize,
}

/// 单个文件的失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    pub files_checked: usize,
    pub renamed: Vec<Renamed>,
    pub failed: Vec<RenameFailure>,
}

/// 对 root 下名称含隐藏字符的文件，改名为清理后的名称（同目录）
pub fn rename_hidden(root: &Path, opts: &ScanOptions, dry_run: bool) -> Result<RenameReport> {
    if !root.exists() {
        anyhow::bail!("input path does not exist: {}", root.display());
    }
    let detector = detector_for(opts.entity_mode);
    let mut report = RenameReport::default();
    // dry-run 时磁盘不变，用集合模拟已占用的目标名
    let mut planned: HashSet<PathBuf> = HashSet::new();

    for path in collect_files(root, opts) {
        report.files_checked += 1;
        let name = match path.file_name().and_then(|s| s.to_str()) { Some(s) => s, None => continue };
        let res = sanitize_with(detector, name);
        if !res.changed() { continue; }

        let fail = |reason: &str| RenameFailure { path: path.clone(), reason: reason.to_string() };
        if res.cleaned.is_empty() {
            report.failed.push(fail("cleaned name is empty"));
            continue;
        }
        let target = path.with_file_name(&res.cleaned);
        if target.exists() || planned.contains(&target) {
            report.failed.push(fail("target already exists"));
            continue;
        }

        if !dry_run {
            if let Err(e) = std::fs::rename(&path, &target) {
                report.failed.push(fail(&e.to_string()));
                continue;
            }
        }
        planned.insert(target.clone());
        report.renamed.push(Renamed { from: path.clone(), to: target, removed_count: res.removed_count });
    }

    Ok(report)
}
