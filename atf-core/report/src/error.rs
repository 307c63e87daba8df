//! 报告错误定义

use thiserror::Error;

/// 报告操作结果类型
pub type Result<T> = std::result::Result<T, ReportError>;

/// 报告错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    /// 未知的报告格式
    #[error("未知的报告格式: {0}")]
    UnknownFormat(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON 序列化错误
    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML 序列化错误
    #[error("YAML 序列化错误: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// XML 生成错误
    #[error("XML 生成错误: {0}")]
    XmlError(String),
}
