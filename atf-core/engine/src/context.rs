//! 执行上下文

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::executor::{ProcessExecutor, ScriptExecutor};
use crate::progress::{ProgressSink, TracingSink};

/// 一次运行中所有层级共享的执行上下文
#[derive(Clone)]
pub struct ExecContext {
    /// 进度通知接收端
    pub sink: Arc<dyn ProgressSink>,

    /// 脚本执行器
    pub executor: Arc<dyn ScriptExecutor>,

    /// 动作未声明超时时使用的默认超时
    pub default_timeout: Option<Duration>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self {
            sink: Arc::new(TracingSink),
            executor: Arc::new(ProcessExecutor::new()),
            default_timeout: None,
        }
    }

    /// 设置进度通知接收端
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// 设置脚本执行器，替换之前 [`with_working_dir`](Self::with_working_dir) 安装的执行器
    pub fn with_executor(mut self, executor: Arc<dyn ScriptExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// 子进程在指定目录中启动
    ///
    /// 安装一个新的 [`ProcessExecutor`]，之前通过 [`with_executor`](Self::with_executor)
    /// 设置的执行器会被替换，因此两者以最后一次调用为准。
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.executor = Arc::new(ProcessExecutor::new().with_working_dir(dir));
        self
    }

    /// 设置默认动作超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecContext")
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}
