//! 执行引擎错误定义

use thiserror::Error;

/// 引擎操作结果类型
pub type Result<T> = std::result::Result<T, AtfError>;

/// 引擎错误类型
///
/// 失败的测试动作不是错误：它们以 `TestResult::Fail` 的形式沿层级向上传播。
/// 这里只列出执行器边界上的失败以及配置层面的问题。
#[derive(Error, Debug)]
pub enum AtfError {
    /// 参数无效 (例如空脚本路径、未知脚本类型)
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    /// 进程无法启动或异常终止
    #[error("进程启动失败 ({program}): {reason}")]
    ProcessLaunchFailure { program: String, reason: String },

    /// 脚本以非零退出码结束
    #[error("脚本执行失败 (退出码: {code})")]
    ExitFailure { code: i32, output: String },

    /// 脚本执行超时，子进程已被终止
    #[error("脚本执行超时 ({secs} 秒)")]
    Timeout { secs: u64 },

    /// 测试结果值不在合法集合内
    #[error("无效的测试结果值: {0:?}")]
    InvalidResultValue(String),

    /// 没有可执行的测试集
    #[error("测试集为空: {0}")]
    ConfigurationEmpty(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl AtfError {
    /// 失败时脚本已经产生的输出 (仅非零退出时可用)
    pub fn output(&self) -> Option<&str> {
        match self {
            AtfError::ExitFailure { output, .. } => Some(output),
            _ => None,
        }
    }
}
