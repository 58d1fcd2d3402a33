//! 目录扫描主流程与并行调度
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::detectors::{detector_for, Detector};
use crate::findings::{Form, ScanResult};
use crate::options::{ScanOptions, ScanStats};
use crate::table::describe;

/// 命中位置：文件名或文件内容
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Name,
    Content,
}

/// 输出项结构（JSON 数组的单个元素）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFinding {
    pub path: String,
    pub location: Location,
    /// 字符偏移（文件名或文件内容内）
    pub offset: usize,
    /// 1 起始的行号/列号（列按字符计）
    pub line: usize,
    pub column: usize,
    /// `U+XXXX` 形式
    pub codepoint: String,
    pub name: String,
    pub form: Form,
}

/// 收集 root 下全部待扫描文件（root 为文件时只含其自身），按路径排序
pub fn collect_files(root: &Path, opts: &ScanOptions) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = vec![];
    for entry in WalkDir::new(root) {
        let entry = match entry { Ok(e) => e, Err(_) => continue };
        if entry.file_type().is_file() && opts.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }
    // 按路径排序，确保输出顺序稳定
    files.sort();
    files
}

/// 将扫描结果转为输出项，同时计算行列号
fn to_findings(rel: &str, location: Location, text: &str, result: &ScanResult) -> Vec<FileFinding> {
    let mut out = Vec::with_capacity(result.count());
    let mut line = 1usize;
    let mut line_start_offset = 0usize;
    let mut cursor_byte = 0usize;
    let mut cursor_offset = 0usize;

    for o in &result.occurrences {
        // 从上一位置推进到本次命中，沿途统计换行
        for ch in text[cursor_byte..o.byte_start].chars() {
            cursor_offset += 1;
            if ch == '\n' {
                line += 1;
                line_start_offset = cursor_offset;
            }
        }
        cursor_byte = o.byte_start;
        out.push(FileFinding {
            path: rel.to_string(),
            location,
            offset: o.offset,
            line,
            column: o.offset - line_start_offset + 1,
            codepoint: format!("U+{:04X}", o.codepoint as u32),
            name: describe(o.codepoint as u32),
            form: o.form,
        });
    }
    out
}

/// 扫描单个文件的名称与内容
/// - 文件名总是扫描（不可 UTF-8 解码的部分做有损替换，隐藏字符不受影响）
/// - 超出大小、读取失败或非 UTF-8 时只跳过内容
pub fn scan_file(path: &Path, root: &Path, detector: &Detector, max_file_size: Option<u64>) -> Vec<FileFinding> {
    let rel = display_path(path, root);
    let mut findings = Vec::new();
    if let Some(name) = path.file_name() {
        let name = name.to_string_lossy();
        findings.extend(to_findings(&rel, Location::Name, &name, &detector.scan(&name)));
    }

    if let Some(max) = max_file_size {
        if let Ok(md) = std::fs::metadata(path) { if md.len() > max { return findings; } }
    }
    let bytes = match std::fs::read(path) { Ok(b) => b, Err(_) => return findings };
    if let Ok(text) = std::str::from_utf8(&bytes) {
        findings.extend(to_findings(&rel, Location::Content, text, &detector.scan(text)));
    }
    findings
}

/// 相对 root 的显示路径；root 为文件本身时退回文件名
fn display_path(path: &Path, root: &Path) -> String {
    let rel = match path.strip_prefix(root) {
        Ok(r) if !r.as_os_str().is_empty() => r,
        _ => path.file_name().map(Path::new).unwrap_or(path),
    };
    rel.to_string_lossy().replace('\\', "/")
}

/// 写出单个文件的命中并更新统计
fn write_file_findings(out: &mut dyn Write, findings: &[FileFinding], first: &mut bool, stats: &mut ScanStats) -> Result<()> {
    stats.files_scanned += 1;
    if !findings.is_empty() { stats.files_with_hits += 1; }
    for f in findings {
        stats.occurrences += 1;
        if !*first { write!(out, ",")?; } else { *first = false; }
        serde_json::to_writer(&mut *out, f)?;
    }
    Ok(())
}

/// 扫描目录并将结果以 JSON 数组流式写入 `out`
/// 稳定性保证：文件按路径排序；文件内先名称后内容，各自按偏移升序
pub fn scan_and_write(root: &Path, out: &mut dyn Write, opts: &ScanOptions) -> Result<ScanStats> {
    let detector = detector_for(opts.entity_mode);
    let files = collect_files(root, opts);
    let mut stats = ScanStats::default();

    // 决策：线程数>1 且文件多于一个时走并行调度；否则串行
    let threads = opts.threads.unwrap_or_else(num_cpus::get);
    if threads > 1 && files.len() > 1 {
        scan_and_write_parallel(root, &files, out, opts, detector, &mut stats, threads)?;
        return Ok(stats);
    }

    write!(out, "[")?;
    let mut first = true;
    for path in &files {
        let findings = scan_file(path, root, detector, opts.max_file_size);
        write_file_findings(out, &findings, &mut first, &mut stats)?;
    }
    write!(out, "]")?;
    Ok(stats)
}

/// 并行调度：
/// - Rayon 线程池并行扫描
/// - 单线程 Writer 按 idx 重排并流式写 JSON，保证与串行一致的顺序
fn scan_and_write_parallel(
    root: &Path,
    files: &[PathBuf],
    out: &mut dyn Write,
    opts: &ScanOptions,
    detector: &'static Detector,
    stats: &mut ScanStats,
    threads: usize,
) -> Result<()> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;
    use std::collections::BTreeMap;

    write!(out, "[")?;
    let mut first = true;

    // worker → writer：(idx, 命中)
    type Msg = (usize, Vec<FileFinding>);
    let (tx, rx) = channel::bounded::<Msg>(256);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let files_vec: Vec<(usize, PathBuf)> = files.iter().cloned().enumerate().collect();
    let root_owned = root.to_path_buf();
    let max_file_size = opts.max_file_size;

    // Writer 持有 &mut out，留在当前线程；扫描放到后台线程
    let scan_thread = std::thread::spawn(move || {
        pool.install(|| {
            files_vec.par_iter().for_each_with(tx, |tx, (idx, path)| {
                let _ = tx.send((*idx, scan_file(path, &root_owned, detector, max_file_size)));
            });
        });
        // 结束后 Sender 全部被丢弃，Receiver 将收到关闭信号
    });

    let mut next_idx: usize = 0;
    let mut buffer: BTreeMap<usize, Vec<FileFinding>> = BTreeMap::new();

    while let Ok((idx, findings)) = rx.recv() {
        buffer.insert(idx, findings);
        // 从 next_idx 开始顺序冲刷
        while let Some(findings) = buffer.remove(&next_idx) {
            write_file_findings(out, &findings, &mut first, stats)?;
            next_idx += 1;
        }
    }

    if scan_thread.join().is_err() {
        anyhow::bail!("scan worker panicked");
    }

    write!(out, "]")?;
    Ok(())
}
