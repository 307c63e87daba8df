//! 单元测试用的脚本执行器

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::executor::ScriptExecutor;
use crate::progress::NullSink;
use crate::{AtfError, ExecContext, Result};

/// 不启动进程，按脚本名决定成功或失败，并记录调用
#[derive(Clone, Default)]
pub(crate) struct ScriptedExecutor {
    failing: HashSet<String>,
    calls: Arc<Mutex<Vec<(String, Option<Duration>)>>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(mut self, script: &str) -> Self {
        self.failing.insert(script.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(script, _)| script.clone())
            .collect()
    }

    pub(crate) fn timeouts(&self) -> Vec<Option<Duration>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, timeout)| *timeout)
            .collect()
    }
}

#[async_trait]
impl ScriptExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        script: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((script.to_string(), timeout));

        if self.failing.contains(script) {
            return Err(AtfError::ExitFailure {
                code: 1,
                output: format!("{} failed\n", script),
            });
        }

        let mut line = script.to_string();
        if !args.is_empty() {
            line.push(' ');
            line.push_str(&args.join(" "));
        }
        line.push('\n');
        Ok(line)
    }
}

pub(crate) fn context(executor: &ScriptedExecutor) -> ExecContext {
    ExecContext::new()
        .with_sink(Arc::new(NullSink))
        .with_executor(Arc::new(executor.clone()))
}
