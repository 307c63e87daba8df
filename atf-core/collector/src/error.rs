//! 配置收集错误定义

use thiserror::Error;

/// 收集操作结果类型
pub type Result<T> = std::result::Result<T, CollectError>;

/// 收集错误类型
#[derive(Error, Debug)]
pub enum CollectError {
    /// 不支持的文件格式
    #[error("不支持的配置文件格式: {0}")]
    UnsupportedFormat(String),

    /// 根元素既不是测试集也不是测试计划
    #[error("无法识别的根元素: {0}")]
    UnknownRoot(String),

    /// 测试计划包含多个被测系统配置，无法收集为单个测试集
    #[error("测试计划 \"{plan}\" 包含 {count} 个被测系统配置，请逐个配置执行")]
    MultipleConfigurations { plan: String, count: usize },

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON 解析错误
    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML 解析错误
    #[error("YAML 解析错误: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// XML 解析错误
    #[error("XML 解析错误: {0}")]
    XmlError(#[from] quick_xml::DeError),

    /// XML 语法错误
    #[error("XML 语法错误: {0}")]
    XmlSyntax(#[from] quick_xml::Error),

    /// 引擎错误 (例如测试集为空)
    #[error(transparent)]
    Engine(#[from] atf_engine::AtfError),
}
