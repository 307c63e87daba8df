//! 测试集 (配置)
//!
//! 一个测试集针对一个被测系统配置，按顺序执行其中的测试用例。
//! 执行流程与测试用例相同，只是高了一层：setup 失败时所有用例的所有步骤
//! 都标记为 Skipped，测试集状态为 Fail，cleanup 仍然执行。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::case::run_fixture;
use crate::{Action, AtfError, ExecContext, Result, SysUnderTest, TestCase, TestResult};

/// 测试集
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSet {
    /// 测试集名称
    #[serde(alias = "@name", alias = "Name")]
    pub name: String,

    #[serde(default, alias = "Description")]
    pub description: String,

    /// 来源测试计划的名称
    #[serde(default, alias = "TestPlan", skip_serializing_if = "Option::is_none")]
    pub test_plan: Option<String>,

    /// 被测系统信息
    #[serde(default, alias = "SysUnderTest", alias = "SystemUnderTest")]
    pub sut: SysUnderTest,

    /// 执行后的汇总状态
    #[serde(default, alias = "@status", alias = "Status")]
    pub status: TestResult,

    #[serde(default, alias = "Setup", skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,

    #[serde(default, alias = "Cleanup", skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<Action>,

    /// 测试用例，声明顺序即执行顺序
    #[serde(default, alias = "TestCase")]
    pub cases: Vec<TestCase>,
}

/// 测试集的别名：一个测试集即一个被测系统配置
pub type Configuration = TestSet;

impl TestSet {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    pub fn with_sut(mut self, sut: SysUnderTest) -> Self {
        self.sut = sut;
        self
    }

    pub fn with_setup(mut self, setup: Action) -> Self {
        self.setup = Some(setup);
        self
    }

    pub fn with_cleanup(mut self, cleanup: Action) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// 追加一个测试用例
    pub fn append_case(&mut self, case: TestCase) -> Result<()> {
        if case.name.trim().is_empty() {
            return Err(AtfError::InvalidArgument(format!(
                "测试集 \"{}\" 中的用例缺少名称",
                self.name
            )));
        }
        self.cases.push(case);
        Ok(())
    }

    /// 按顺序追加多个测试用例，遇到无效用例时停止
    pub fn extend_cases<I>(&mut self, cases: I) -> Result<()>
    where
        I: IntoIterator<Item = TestCase>,
    {
        for case in cases {
            self.append_case(case)?;
        }
        Ok(())
    }

    /// 检查测试集是否可以执行
    ///
    /// 反序列化得到的测试集不经过 `append_case`/`append_step`，名称在这里统一检查。
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AtfError::InvalidArgument("测试集缺少名称".to_string()));
        }
        if self.cases.is_empty() {
            return Err(AtfError::ConfigurationEmpty(format!(
                "测试集 \"{}\" 不包含任何测试用例",
                self.name
            )));
        }

        for case in &self.cases {
            if case.name.trim().is_empty() {
                return Err(AtfError::InvalidArgument(format!(
                    "测试集 \"{}\" 中的用例缺少名称",
                    self.name
                )));
            }
            if case.steps.iter().any(|step| step.name.trim().is_empty()) {
                return Err(AtfError::InvalidArgument(format!(
                    "测试用例 \"{}\" 中的步骤缺少名称",
                    case.name
                )));
            }
        }
        Ok(())
    }

    /// 执行测试集并返回汇总状态
    pub async fn execute(&mut self, ctx: &ExecContext) -> TestResult {
        ctx.sink
            .notice(&format!(">>> 进入测试集 \"{}\"", self.name));
        if !self.sut.is_unset() {
            ctx.sink.info(&format!("被测系统: {}", self.sut));
        }

        let setup_failed = run_fixture(self.setup.as_mut(), "setup", ctx).await;

        if setup_failed {
            ctx.sink.error(&format!(
                "测试集 \"{}\" 的 setup 失败，跳过全部测试用例",
                self.name
            ));
            for case in self.cases.iter_mut() {
                case.skip();
            }
        } else {
            for case in self.cases.iter_mut() {
                case.execute(ctx).await;
            }
        }

        run_fixture(self.cleanup.as_mut(), "cleanup", ctx).await;

        self.status = self.aggregate(setup_failed);
        ctx.sink
            .notice(&format!("测试集 \"{}\" 状态: {}", self.name, self.status));
        ctx.sink
            .notice(&format!("<<< 离开测试集 \"{}\"", self.name));
        self.status
    }

    fn aggregate(&self, setup_failed: bool) -> TestResult {
        if setup_failed
            || self
                .cases
                .iter()
                .any(|case| case.status == TestResult::Fail)
        {
            return TestResult::Fail;
        }

        let mut active = self
            .cases
            .iter()
            .filter(|case| case.status != TestResult::Skipped)
            .peekable();

        if active.peek().is_none() {
            return TestResult::Skipped;
        }

        if active.all(|case| case.status == TestResult::Pass) {
            TestResult::Pass
        } else {
            TestResult::NotTested
        }
    }
}

impl fmt::Display for TestSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestSet {:?}", self.name)?;
        if let Some(plan) = &self.test_plan {
            write!(f, " (test plan {:?})", plan)?;
        }
        writeln!(f, " [status: {}]", self.status)?;
        if !self.description.is_empty() {
            writeln!(f, "  {}", self.description)?;
        }
        if !self.sut.is_unset() {
            writeln!(f, "  SUT: {}", self.sut)?;
        }
        match &self.setup {
            Some(setup) => writeln!(f, "  Setup: {}", setup)?,
            None => writeln!(f, "  Setup: []")?,
        }
        for case in &self.cases {
            write!(f, "{}", case)?;
        }
        match &self.cleanup {
            Some(cleanup) => writeln!(f, "  Cleanup: {}", cleanup)?,
            None => writeln!(f, "  Cleanup: []")?,
        }
        Ok(())
    }
}
