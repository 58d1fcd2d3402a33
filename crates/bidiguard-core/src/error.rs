//! 错误类型
use thiserror::Error;

/// 核心库错误
/// - 文本扫描/清理对 `&str` 是全函数，不会产生错误
/// - 仅在入参不满足类型约定（非 UTF-8 字节）、配置非法或读写失败时返回
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// 入参不是合法文本，立即失败，不做有损转换
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// 颜色字符串不是 #rgb / #rrggbb
    #[error("invalid color {value:?} for {field}")]
    InvalidColor { field: &'static str, value: String },

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = SanitizeError> = std::result::Result<T, E>;
