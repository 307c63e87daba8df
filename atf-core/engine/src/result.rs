//! 测试结果定义
//!
//! 所有层级 (动作、步骤、用例、测试集) 共用同一个封闭的结果枚举。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AtfError;

/// 测试结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TestResult {
    /// 尚未评估
    #[default]
    Unknown,
    Pass,
    Fail,
    /// 预期失败
    XFail,
    Skipped,
    NotTested,
    NotAvailable,
}

impl TestResult {
    /// 全部合法值，按声明顺序
    pub const ALL: [TestResult; 7] = [
        TestResult::Unknown,
        TestResult::Pass,
        TestResult::Fail,
        TestResult::XFail,
        TestResult::Skipped,
        TestResult::NotTested,
        TestResult::NotAvailable,
    ];

    /// 规范名称
    pub fn as_str(&self) -> &'static str {
        match self {
            TestResult::Unknown => "Unknown",
            TestResult::Pass => "Pass",
            TestResult::Fail => "Fail",
            TestResult::XFail => "XFail",
            TestResult::Skipped => "Skipped",
            TestResult::NotTested => "NotTested",
            TestResult::NotAvailable => "NotAvailable",
        }
    }

    /// 是否为可评估的期望值 (只有 Pass 和 XFail)
    pub fn is_judgeable_expectation(&self) -> bool {
        matches!(self, TestResult::Pass | TestResult::XFail)
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestResult {
    type Err = AtfError;

    /// 解析测试结果，接受常见的别名 (大小写不敏感)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let result = match normalized.as_str() {
            "unknown" | "unknownresult" => TestResult::Unknown,
            "pass" | "passed" => TestResult::Pass,
            "fail" | "failed" => TestResult::Fail,
            "xfail" | "expected fail" => TestResult::XFail,
            "skipped" | "skip" => TestResult::Skipped,
            "nottested" | "not tested" => TestResult::NotTested,
            "n/a" | "na" | "notavailable" | "not available" => TestResult::NotAvailable,
            _ => return Err(AtfError::InvalidResultValue(s.to_string())),
        };
        Ok(result)
    }
}

impl TryFrom<String> for TestResult {
    type Error = AtfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TestResult> for String {
    fn from(value: TestResult) -> Self {
        value.as_str().to_string()
    }
}
