//! ATF 执行引擎
//!
//! 测试层级的执行与自评估：
//! - 动作 (Action)：外部脚本/程序、人工操作或空动作
//! - 步骤 (TestStep)：动作 + 期望结果
//! - 用例 (TestCase)：有序步骤 + setup/cleanup
//! - 测试集 (TestSet)：有序用例 + setup/cleanup + 被测系统信息
//! - 测试计划 (TestPlan)：编写阶段的模板，复制为测试集后执行
//!
//! 结果自下而上传播：动作结果 → 步骤状态 → 用例状态 → 测试集状态。
//! 所有层级严格按声明顺序串行执行。
//!
//! # 示例
//!
//! ```ignore
//! use atf_engine::{Action, ExecContext, Runner, TestCase, TestResult, TestSet, TestStep};
//!
//! let mut case = TestCase::new("ping", "网关可达", TestResult::Pass);
//! case.append_step(TestStep::new("ping", TestResult::Pass, Action::executable("ping.py", "10.0.0.1")))?;
//!
//! let mut set = TestSet::new("smoke", "冒烟测试");
//! set.append_case(case)?;
//!
//! let report = Runner::new(ExecContext::new()).run(set).await?;
//! println!("{}", report.status());
//! ```

mod action;
mod case;
mod context;
mod error;
pub mod executor;
mod plan;
pub mod progress;
mod result;
mod runner;
mod set;
mod step;
mod sut;

#[cfg(test)]
mod testing;

pub use action::{Action, ActionKind};
pub use case::TestCase;
pub use context::ExecContext;
pub use error::{AtfError, Result};
pub use executor::{classify, ProcessExecutor, ScriptExecutor, ScriptKind};
pub use plan::TestPlan;
pub use progress::{ChannelSink, NullSink, ProgressEvent, ProgressSink, Severity, TracingSink};
pub use result::TestResult;
pub use runner::{Runner, Summary, TestReport};
pub use set::{Configuration, TestSet};
pub use step::{judge, TestStep};
pub use sut::SysUnderTest;
