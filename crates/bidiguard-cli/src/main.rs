use anyhow::{bail, Context, Result};
use bidiguard_core::{
    describe, detector_for, placeholders, rename_hidden, render_placeholders, sanitize_with, scan_and_write,
    status_line, DisplayConfig, EntityMode, ScanOptions,
};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "bidiguard", version, about = "检测并清理隐藏的双向控制字符")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 扫描文件或目录，输出命中项 JSON 数组
    Scan {
        /// 输入路径（文件或目录）
        #[arg(long)]
        input: PathBuf,

        /// 输出文件；缺省写到标准输出
        #[arg(long)]
        output: Option<PathBuf>,

        /// 线程数（"auto"=CPU 核心数）
        #[arg(long, default_value = "auto")]
        threads: String,

        /// 最大扫描文件大小（单位字节）
        #[arg(long)]
        max_file_size: Option<u64>,

        /// 扩展名白名单，逗号分隔（例如 md,txt）；缺省扫描全部文件
        #[arg(long, value_delimiter = ',')]
        ext: Vec<String>,

        /// 只识别原始码点，忽略 &lrm; 等实体写法
        #[arg(long)]
        raw_only: bool,
    },

    /// 清理单个文件的内容
    Clean {
        #[arg(long)]
        input: PathBuf,

        /// 原地写回；否则输出到标准输出
        #[arg(long)]
        in_place: bool,

        #[arg(long)]
        raw_only: bool,
    },

    /// 以带颜色的占位符显示文件中的隐藏字符
    Show {
        #[arg(long)]
        input: PathBuf,

        /// 显示配置（TOML：enabled / background_color / text_color）
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// 批量清理文件名
    Rename {
        /// 输入目录
        #[arg(long)]
        input: PathBuf,

        /// 扩展名白名单，逗号分隔
        #[arg(long, value_delimiter = ',', default_value = "md")]
        ext: Vec<String>,

        /// 只打印计划，不实际改名
        #[arg(long)]
        dry_run: bool,
    },

    /// 查询码点的显示名称（U+202D、0x202D、202D 或单个字符）
    Describe {
        codepoint: String,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, output, threads, max_file_size, ext, raw_only } => {
            info!(?input, ?output, "starting scan");
            let opts = ScanOptions {
                entity_mode: entity_mode(raw_only),
                max_file_size,
                threads: parse_threads(&threads),
                extensions: ext,
            };

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path).context("create output file")?)),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            let stats = scan_and_write(&input, &mut out, &opts).context("scan and write failed")?;
            out.flush().ok();

            info!(
                files_scanned = stats.files_scanned,
                files_with_hits = stats.files_with_hits,
                occurrences = stats.occurrences,
                "scan finished"
            );
        }
        Commands::Clean { input, in_place, raw_only } => {
            let bytes = std::fs::read(&input).with_context(|| format!("read {}", input.display()))?;
            let text = String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", input.display()))?;
            let res = sanitize_with(detector_for(entity_mode(raw_only)), &text);

            if in_place {
                if res.changed() {
                    std::fs::write(&input, &res.cleaned).with_context(|| format!("write {}", input.display()))?;
                }
            } else {
                let mut stdout = io::stdout().lock();
                stdout.write_all(res.cleaned.as_bytes())?;
                stdout.flush()?;
            }
            info!(path = %input.display(), removed = res.removed_count, "clean finished");
        }
        Commands::Show { input, config } => {
            let cfg = match config {
                Some(path) => DisplayConfig::load(&path).with_context(|| format!("load config {}", path.display()))?,
                None => DisplayConfig::default(),
            };
            let text = std::fs::read_to_string(&input).with_context(|| format!("read {}", input.display()))?;
            let result = detector_for(EntityMode::RawAndEntities).scan(&text);
            for p in placeholders(&result) {
                debug!(offset = p.offset, label = %p.label, "placeholder");
            }

            let mut stdout = io::stdout().lock();
            stdout.write_all(render_placeholders(&text, &cfg)?.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(stdout)?;
            }
            writeln!(stdout, "{}", status_line(result.count()))?;
        }
        Commands::Rename { input, ext, dry_run } => {
            let opts = ScanOptions { extensions: ext, ..Default::default() };
            let report = rename_hidden(&input, &opts, dry_run).context("rename failed")?;

            for r in &report.renamed {
                info!(from = %r.from.display(), to = %r.to.display(), removed = r.removed_count, dry_run, "renamed");
            }
            // 单个失败只告警，继续整批
            for f in &report.failed {
                warn!(path = %f.path.display(), reason = %f.reason, "rename skipped");
            }
            info!(
                files_checked = report.files_checked,
                renamed = report.renamed.len(),
                failed = report.failed.len(),
                "Renamed {} files.",
                report.renamed.len()
            );
        }
        Commands::Describe { codepoint } => {
            let cp = parse_codepoint(&codepoint)?;
            println!("{}", describe(cp));
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，避免与 stdout 上的 JSON/文本输出混在一起
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).with_writer(io::stderr).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn entity_mode(raw_only: bool) -> EntityMode {
    if raw_only { EntityMode::RawOnly } else { EntityMode::RawAndEntities }
}

/// 解析线程参数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

/// 解析码点参数：U+XXXX / 0xXXXX / 十六进制数字 / 单个字符
fn parse_codepoint(s: &str) -> Result<u32> {
    let mut chars = s.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if !ch.is_ascii_hexdigit() { return Ok(ch as u32); }
    }
    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    match u32::from_str_radix(hex, 16) {
        Ok(cp) => Ok(cp),
        Err(_) => bail!("invalid codepoint: {s:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codepoint_forms() {
        assert_eq!(parse_codepoint("U+202D").unwrap(), 0x202D);
        assert_eq!(parse_codepoint("0x202c").unwrap(), 0x202C);
        assert_eq!(parse_codepoint("41").unwrap(), 0x41);
        assert_eq!(parse_codepoint("\u{202D}").unwrap(), 0x202D);
        assert_eq!(parse_codepoint("Z").unwrap(), 0x5A);
        assert!(parse_codepoint("U+XYZ").is_err());
    }

    #[test]
    fn parses_threads() {
        assert_eq!(parse_threads("auto"), None);
        assert_eq!(parse_threads("4"), Some(4));
        assert_eq!(parse_threads("0"), None);
    }
}
