//! 测试用例
//!
//! 用例按声明顺序执行全部步骤，前后可带 setup/cleanup 动作：
//!
//! ```text
//! Pending → SetupRunning → (StepsRunning | Aborted) → CleanupRunning → Evaluated
//! ```
//!
//! setup 失败时不执行任何步骤，步骤全部标记为 Skipped，cleanup 仍然执行，
//! 用例状态为 Fail (与期望值无关)。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::progress::fmt_output;
use crate::{Action, AtfError, ExecContext, Result, TestResult, TestStep};

/// 测试用例
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// 用例名称
    #[serde(alias = "@name", alias = "Name")]
    pub name: String,

    /// 用例描述
    #[serde(default, alias = "Description")]
    pub description: String,

    /// 期望结果
    #[serde(default, alias = "@expected", alias = "Expected")]
    pub expected: TestResult,

    /// 执行后得出的状态
    #[serde(default, alias = "@status", alias = "Status")]
    pub status: TestResult,

    #[serde(default, alias = "Setup", skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,

    #[serde(default, alias = "Cleanup", skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<Action>,

    /// 测试步骤，声明顺序即执行顺序
    #[serde(default, alias = "TestStep")]
    pub steps: Vec<TestStep>,
}

impl TestCase {
    pub fn new(name: &str, description: &str, expected: TestResult) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            expected,
            ..Default::default()
        }
    }

    pub fn with_setup(mut self, setup: Action) -> Self {
        self.setup = Some(setup);
        self
    }

    pub fn with_cleanup(mut self, cleanup: Action) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// 追加一个步骤
    pub fn append_step(&mut self, step: TestStep) -> Result<()> {
        if step.name.trim().is_empty() {
            return Err(AtfError::InvalidArgument(format!(
                "测试用例 \"{}\" 中的步骤缺少名称",
                self.name
            )));
        }
        self.steps.push(step);
        Ok(())
    }

    /// 按顺序追加多个步骤，遇到无效步骤时停止
    pub fn extend_steps<I>(&mut self, steps: I) -> Result<()>
    where
        I: IntoIterator<Item = TestStep>,
    {
        for step in steps {
            self.append_step(step)?;
        }
        Ok(())
    }

    /// 执行用例并返回最终状态
    pub async fn execute(&mut self, ctx: &ExecContext) -> TestResult {
        ctx.sink
            .notice(&format!(">>> 进入测试用例 \"{}\"", self.name));

        let setup_failed = run_fixture(self.setup.as_mut(), "setup", ctx).await;

        if setup_failed {
            ctx.sink.error(&format!(
                "测试用例 \"{}\" 的 setup 失败，跳过全部步骤",
                self.name
            ));
            self.skip_steps();
        } else {
            for step in self.steps.iter_mut() {
                step.execute(ctx).await;
            }
        }

        // cleanup 失败只记录，不影响用例状态
        run_fixture(self.cleanup.as_mut(), "cleanup", ctx).await;

        self.status = self.evaluate(setup_failed);
        ctx.sink
            .notice(&format!("测试用例 \"{}\" 状态: {}", self.name, self.status));
        ctx.sink
            .notice(&format!("<<< 离开测试用例 \"{}\"", self.name));
        self.status
    }

    /// 不执行，整个用例标记为 Skipped (测试集 setup 失败时使用)
    pub fn skip(&mut self) {
        self.skip_steps();
        self.status = TestResult::Skipped;
    }

    fn skip_steps(&mut self) {
        for step in self.steps.iter_mut() {
            step.skip();
        }
    }

    fn evaluate(&self, setup_failed: bool) -> TestResult {
        if setup_failed {
            return TestResult::Fail;
        }

        // 没有步骤时同样视为全部跳过
        if self
            .steps
            .iter()
            .all(|step| step.status == TestResult::Skipped)
        {
            return TestResult::Skipped;
        }

        let want = match self.expected {
            TestResult::Pass => TestResult::Pass,
            TestResult::XFail => TestResult::Fail,
            _ => return TestResult::NotTested,
        };

        for step in &self.steps {
            if step.status != want {
                return TestResult::Fail;
            }
        }

        TestResult::Pass
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "TestCase {:?} [expected: {}, status: {}]",
            self.name, self.expected, self.status
        )?;
        if !self.description.is_empty() {
            writeln!(f, "  {}", self.description)?;
        }
        if let Some(setup) = &self.setup {
            writeln!(f, "  Setup: {}", setup)?;
        }
        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }
        if let Some(cleanup) = &self.cleanup {
            writeln!(f, "  Cleanup: {}", cleanup)?;
        }
        Ok(())
    }
}

/// 执行 setup/cleanup 动作，返回动作是否失败
pub(crate) async fn run_fixture(
    fixture: Option<&mut Action>,
    label: &str,
    ctx: &ExecContext,
) -> bool {
    let Some(action) = fixture else {
        return false;
    };

    ctx.sink.info(&format!("执行 {} 动作: {}", label, action));
    let output = action.execute(ctx).await;
    ctx.sink.info(&fmt_output(output));

    let failed = action.result() == TestResult::Fail;
    if failed {
        ctx.sink.error(&format!("{} 动作失败", label));
    }
    failed
}
