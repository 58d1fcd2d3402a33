//! 隐藏双向控制字符检测与清理库
//!
//! 设计要点：
//! - 识别固定字符集（U+202D、U+202C）的原始码点及其 HTML 实体写法。
//! - `scan` / `sanitize` / `describe` 均为纯函数，对任意 `&str` 不失败。
//! - 目录扫描与批量改名建立在纯函数之上，单个文件失败不影响整批。

mod detectors;
mod display;
mod error;
mod findings;
mod options;
mod rename;
mod sanitize;
mod scan;
mod table;

pub use detectors::{default_detector, detector_for, scan, scan_bytes, Detector};
pub use display::{marker, parse_color, placeholders, render_placeholders, status_line, DisplayConfig, Placeholder};
pub use error::{Result, SanitizeError};
pub use findings::{Form, Occurrence, ScanResult};
pub use options::{EntityMode, ScanOptions, ScanStats};
pub use rename::{rename_hidden, RenameFailure, RenameReport, Renamed};
pub use sanitize::{sanitize, sanitize_bytes, sanitize_with, SanitizeResult};
pub use scan::{collect_files, scan_and_write, scan_file, FileFinding, Location};
pub use table::{describe, lookup, lookup_entity, HiddenCharacterSpec, HIDDEN_CHARACTERS};
