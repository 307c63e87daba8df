//! 测试动作
//!
//! 动作是最小的执行单元：外部脚本/程序、人工操作说明，或空动作。
//! 动作类型在构造时根据内容确定一次，之后不再变化。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{ExecContext, TestResult};

/// 动作类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// 可执行脚本/程序
    Executable { script: String, args: String },

    /// 人工操作
    Manual { description: String },

    /// 空动作 (占位)
    Empty,
}

/// 测试动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ActionDef", into = "ActionDef")]
pub struct Action {
    kind: ActionKind,

    /// 超时时间（秒），未设置时使用运行默认值
    timeout: Option<u64>,

    /// 执行输出
    output: String,

    /// 执行结果
    result: TestResult,
}

impl Action {
    /// 根据内容创建动作：非空脚本优先，其次非空描述，否则为空动作
    pub fn new(script: &str, args: &str, description: &str) -> Self {
        let kind = if !script.trim().is_empty() {
            ActionKind::Executable {
                script: script.trim().to_string(),
                args: args.to_string(),
            }
        } else if !description.trim().is_empty() {
            ActionKind::Manual {
                description: description.to_string(),
            }
        } else {
            ActionKind::Empty
        };

        Self {
            kind,
            timeout: None,
            output: String::new(),
            result: TestResult::NotTested,
        }
    }

    /// 创建可执行动作
    pub fn executable(script: &str, args: &str) -> Self {
        Self::new(script, args, "")
    }

    /// 创建人工动作
    pub fn manual(description: &str) -> Self {
        Self::new("", "", description)
    }

    /// 创建空动作
    pub fn empty() -> Self {
        Self::new("", "", "")
    }

    /// 设置超时时间（秒）
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn is_executable(&self) -> bool {
        matches!(self.kind, ActionKind::Executable { .. })
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.kind, ActionKind::Manual { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ActionKind::Empty)
    }

    pub fn script(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Executable { script, .. } => Some(script),
            _ => None,
        }
    }

    pub fn args(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Executable { args, .. } => Some(args),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Manual { description } => Some(description),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn result(&self) -> TestResult {
        self.result
    }

    /// 执行动作并返回输出
    ///
    /// 只有可执行动作会启动进程，成功为 Pass，失败为 Fail。
    /// 人工动作和空动作不做判定，结果保持 NotTested。
    pub async fn execute(&mut self, ctx: &ExecContext) -> &str {
        match &self.kind {
            ActionKind::Executable { script, args } => {
                // 不支持引号，按空白拆分
                let argv: Vec<String> = args.split_whitespace().map(String::from).collect();
                // 超时为 0 表示不限制
                let timeout = match self.timeout {
                    Some(0) => None,
                    Some(secs) => Some(Duration::from_secs(secs)),
                    None => ctx.default_timeout.filter(|d| !d.is_zero()),
                };

                match ctx.executor.execute(script, &argv, timeout).await {
                    Ok(output) => {
                        debug!("动作执行成功: {}", script);
                        self.output = output;
                        self.result = TestResult::Pass;
                    }
                    Err(e) => {
                        warn!("动作执行失败: {} - {}", script, e);
                        self.output = match e.output() {
                            Some(output) => format!("{}{}\n", output, e),
                            None => format!("{}\n", e),
                        };
                        self.result = TestResult::Fail;
                    }
                }
            }
            ActionKind::Manual { description } => {
                self.output = description.clone();
            }
            ActionKind::Empty => {
                self.output.clear();
            }
        }

        &self.output
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Executable { script, args } if args.is_empty() => write!(f, "{}", script),
            ActionKind::Executable { script, args } => write!(f, "{} {}", script, args),
            ActionKind::Manual { description } => write!(f, "Manual Action:\n{}", description),
            ActionKind::Empty => write!(f, "No action"),
        }
    }
}

/// 动作的序列化形式 (配置文件和报告共用)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActionDef {
    #[serde(default, alias = "Script", skip_serializing_if = "String::is_empty")]
    script: String,

    #[serde(default, alias = "Args", skip_serializing_if = "String::is_empty")]
    args: String,

    #[serde(default, alias = "Description", skip_serializing_if = "String::is_empty")]
    description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,

    #[serde(default, alias = "Output")]
    output: String,

    #[serde(default = "neutral_result", alias = "Result", alias = "@result")]
    result: TestResult,
}

fn neutral_result() -> TestResult {
    TestResult::NotTested
}

impl From<ActionDef> for Action {
    fn from(def: ActionDef) -> Self {
        let mut action = Action::new(&def.script, &def.args, &def.description);
        action.timeout = def.timeout;
        action.output = def.output;
        action.result = def.result;
        action
    }
}

impl From<Action> for ActionDef {
    fn from(action: Action) -> Self {
        let (script, args, description) = match action.kind {
            ActionKind::Executable { script, args } => (script, args, String::new()),
            ActionKind::Manual { description } => (String::new(), String::new(), description),
            ActionKind::Empty => (String::new(), String::new(), String::new()),
        };

        Self {
            script,
            args,
            description,
            timeout: action.timeout,
            output: action.output,
            result: action.result,
        }
    }
}
