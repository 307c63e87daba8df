//! 测试计划
//!
//! 测试计划是编写阶段的模板，本身不能执行。执行前通过 [`TestPlan::to_test_set`]
//! 复制出独立的测试集，同一个计划可以产生任意多次互不影响的运行。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Action, AtfError, Result, SysUnderTest, TestCase, TestSet};

/// 测试计划
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlan {
    #[serde(alias = "@name", alias = "Name")]
    pub name: String,

    #[serde(default, alias = "Description")]
    pub description: String,

    #[serde(default, alias = "Setup", skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,

    #[serde(default, alias = "Cleanup", skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<Action>,

    #[serde(default, alias = "TestCase")]
    pub cases: Vec<TestCase>,

    /// 计划面向的被测系统配置
    #[serde(default, alias = "SysUnderTest", skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<SysUnderTest>,
}

impl TestPlan {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
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

    /// 按顺序追加测试用例
    pub fn append<I>(&mut self, cases: I) -> Result<()>
    where
        I: IntoIterator<Item = TestCase>,
    {
        for case in cases {
            if case.name.trim().is_empty() {
                return Err(AtfError::InvalidArgument(format!(
                    "测试计划 \"{}\" 中的用例缺少名称",
                    self.name
                )));
            }
            self.cases.push(case);
        }
        Ok(())
    }

    /// 添加一个被测系统配置
    pub fn add_configuration(&mut self, sut: SysUnderTest) {
        self.configurations.push(sut);
    }

    /// 复制出一个可执行的测试集 (被测系统信息为空)
    pub fn to_test_set(&self) -> TestSet {
        TestSet {
            name: self.name.clone(),
            description: self.description.clone(),
            test_plan: Some(self.name.clone()),
            sut: SysUnderTest::default(),
            setup: self.setup.clone(),
            cleanup: self.cleanup.clone(),
            cases: self.cases.clone(),
            ..Default::default()
        }
    }

    /// 为每个被测系统配置复制出一个测试集
    ///
    /// 没有配置时返回单个测试集，等同于 [`TestPlan::to_test_set`]。
    pub fn to_test_sets(&self) -> Vec<TestSet> {
        if self.configurations.is_empty() {
            return vec![self.to_test_set()];
        }

        self.configurations
            .iter()
            .map(|sut| {
                let mut set = self.to_test_set();
                set.name = format!("{} [{}]", self.name, sut.name);
                set.sut = sut.clone();
                set
            })
            .collect()
    }
}

impl fmt::Display for TestPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TestPlan {:?}", self.name)?;
        if !self.description.is_empty() {
            writeln!(f, "  {}", self.description)?;
        }
        for sut in &self.configurations {
            writeln!(f, "  SUT: {}", sut)?;
        }
        for case in &self.cases {
            write!(f, "{}", case)?;
        }
        Ok(())
    }
}
