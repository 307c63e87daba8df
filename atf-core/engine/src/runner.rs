//! 测试运行器与测试报告

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ExecContext, Result, TestResult, TestSet};

/// 一次运行的结果：已执行的测试集及起止时间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub test_set: TestSet,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
}

/// 用例统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub not_tested: usize,
}

impl TestReport {
    /// 测试集汇总状态
    pub fn status(&self) -> TestResult {
        self.test_set.status
    }

    /// 按用例状态统计
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.test_set.cases.len(),
            ..Default::default()
        };

        for case in &self.test_set.cases {
            match case.status {
                TestResult::Pass => summary.passed += 1,
                TestResult::Fail => summary.failed += 1,
                TestResult::Skipped => summary.skipped += 1,
                _ => summary.not_tested += 1,
            }
        }
        summary
    }

    /// 运行耗时
    pub fn duration(&self) -> chrono::Duration {
        self.finished - self.started
    }
}

/// 测试运行器
///
/// 每次运行独占一个测试集：`run` 按值接收测试集，执行后放入报告返回。
#[derive(Debug, Clone, Default)]
pub struct Runner {
    ctx: ExecContext,
}

impl Runner {
    pub fn new(ctx: ExecContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ExecContext {
        &self.ctx
    }

    /// 校验并执行测试集
    pub async fn run(&self, mut set: TestSet) -> Result<TestReport> {
        set.validate()?;

        info!("开始执行测试集: {} ({} 个用例)", set.name, set.cases.len());
        let started = Local::now();
        let status = set.execute(&self.ctx).await;
        let finished = Local::now();
        info!("测试集 {} 执行完成: {}", set.name, status);

        Ok(TestReport {
            test_set: set,
            started,
            finished,
        })
    }
}
