//! 测试步骤
//!
//! 一个步骤绑定一个动作和期望结果，执行后根据动作结果得出步骤状态。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::progress::fmt_output;
use crate::{Action, ExecContext, TestResult};

/// 测试步骤
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    /// 步骤名称
    #[serde(alias = "@name", alias = "Name")]
    pub name: String,

    /// 期望结果 (只有 Pass 和 XFail 可评估)
    #[serde(default, alias = "@expected", alias = "Expected")]
    pub expected: TestResult,

    /// 执行后得出的状态
    #[serde(default, alias = "@status", alias = "Status")]
    pub status: TestResult,

    /// 步骤动作
    #[serde(default, alias = "Action")]
    pub action: Action,
}

impl TestStep {
    pub fn new(name: &str, expected: TestResult, action: Action) -> Self {
        Self {
            name: name.to_string(),
            expected,
            status: TestResult::Unknown,
            action,
        }
    }

    /// 执行动作并评估步骤状态
    pub async fn execute(&mut self, ctx: &ExecContext) -> TestResult {
        ctx.sink
            .notice(&format!(">>> 进入测试步骤 \"{}\"", self.name));

        let output = self.action.execute(ctx).await;
        ctx.sink.info(&fmt_output(output));

        self.status = judge(self.expected, self.action.result());

        ctx.sink
            .notice(&format!("测试步骤 \"{}\" 状态: {}", self.name, self.status));
        ctx.sink
            .notice(&format!("<<< 离开测试步骤 \"{}\"", self.name));
        self.status
    }

    /// 不执行，直接标记为 Skipped
    pub fn skip(&mut self) {
        self.status = TestResult::Skipped;
    }
}

/// 根据期望结果和动作结果得出步骤状态
///
/// 期望 Pass 时动作必须成功，期望 XFail 时动作必须失败；
/// 其他期望值无法评估，状态为 NotTested。
pub fn judge(expected: TestResult, actual: TestResult) -> TestResult {
    let want = match expected {
        TestResult::Pass => TestResult::Pass,
        TestResult::XFail => TestResult::Fail,
        _ => return TestResult::NotTested,
    };

    if actual == want {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

impl fmt::Display for TestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TestStep {:?} [expected: {}, status: {}]: {}",
            self.name, self.expected, self.status, self.action
        )
    }
}
