//! 执行进度通知
//!
//! 引擎在进入/离开用例和步骤、执行 setup/cleanup、评估完成时发出通知。
//! 通知接收端不得阻塞，也不得使执行失败。

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Notice,
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// 进度通知接收端
pub trait ProgressSink: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);

    fn notice(&self, message: &str) {
        self.emit(Severity::Notice, message);
    }

    fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }
}

/// 输出到 tracing 日志
///
/// notice 对应 info 级别，info (主要是脚本输出) 对应 debug 级别，
/// 这样控制台默认只显示通知，日志文件记录完整输出。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Notice => info!(target: "atf::progress", "{}", message),
            Severity::Info => debug!(target: "atf::progress", "{}", message),
            Severity::Error => error!(target: "atf::progress", "{}", message),
        }
    }
}

/// 丢弃所有通知
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _severity: Severity, _message: &str) {}
}

/// 单条进度通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub severity: Severity,
    pub message: String,
}

/// 通过无界通道转发通知，由其他任务异步消费
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// 创建通道接收端和对应的 sink
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, severity: Severity, message: &str) {
        // 接收端已关闭时忽略
        let _ = self.tx.send(ProgressEvent {
            severity,
            message: message.to_string(),
        });
    }
}

/// 包装脚本输出，便于在日志中辨认
pub fn fmt_output(output: &str) -> String {
    let mut s = String::from("###### OUTPUT ######\n");
    s.push_str(output);
    if !output.is_empty() && !output.ends_with('\n') {
        s.push('\n');
    }
    s.push_str("#### OUTPUT END ####");
    s
}
