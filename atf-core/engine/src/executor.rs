//! 脚本/程序执行器
//!
//! 根据文件扩展名选择解释器，启动子进程并收集合并后的 stdout + stderr 输出。
//! 解释器必须位于 PATH 中。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{AtfError, Result};

const PYTHON_EXEC: &str = if cfg!(windows) { "python" } else { "python3" };
const PERL_EXEC: &str = "perl";
const TCL_EXEC: &str = "tclsh";
const EXPECT_EXEC: &str = "expect";
const JAVA_EXEC: &str = "java";
const RUBY_EXEC: &str = "ruby";
const GROOVY_EXEC: &str = "groovy";

/// 脚本类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Unknown,
    PythonScript,
    PerlScript,
    TclScript,
    ExpectScript,
    RubyScript,
    GroovyScript,
    /// Java JAR，以 `java -jar <path>` 方式执行
    JavaExecutable,
    /// 可直接执行的本地程序 (无扩展名或 .exe/.com/.bat)
    NativeExecutable,
}

impl ScriptKind {
    /// 该类型对应的解释器 (本地程序和未知类型没有解释器)
    pub fn interpreter(&self) -> Option<&'static str> {
        match self {
            ScriptKind::PythonScript => Some(PYTHON_EXEC),
            ScriptKind::PerlScript => Some(PERL_EXEC),
            ScriptKind::TclScript => Some(TCL_EXEC),
            // Windows 上 expect 只是 Tcl 扩展，不是独立解释器
            ScriptKind::ExpectScript if cfg!(windows) => Some(TCL_EXEC),
            ScriptKind::ExpectScript => Some(EXPECT_EXEC),
            ScriptKind::RubyScript => Some(RUBY_EXEC),
            ScriptKind::GroovyScript => Some(GROOVY_EXEC),
            ScriptKind::JavaExecutable => Some(JAVA_EXEC),
            ScriptKind::NativeExecutable | ScriptKind::Unknown => None,
        }
    }
}

/// 取路径最后一段中从最后一个 '.' 开始的后缀 (包含 '.')
fn extension_of(path: &str) -> &str {
    let name = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// 根据扩展名判断脚本类型
pub fn classify(path: &str) -> ScriptKind {
    match extension_of(path).to_ascii_lowercase().as_str() {
        "" | ".exe" | ".com" | ".bat" => ScriptKind::NativeExecutable,
        ".py" => ScriptKind::PythonScript,
        ".pl" => ScriptKind::PerlScript,
        ".tcl" => ScriptKind::TclScript,
        ".exp" => ScriptKind::ExpectScript,
        ".rb" => ScriptKind::RubyScript,
        ".groovy" => ScriptKind::GroovyScript,
        ".jar" => ScriptKind::JavaExecutable,
        _ => ScriptKind::Unknown,
    }
}

/// 构建完整的命令行 (程序, 参数列表)
///
/// 脚本类型在用户参数前插入脚本路径；Java 插入 `-jar <path>`。
pub fn command_line(path: &str, args: &[String]) -> Result<(String, Vec<String>)> {
    let kind = classify(path);
    let mut argv = Vec::with_capacity(args.len() + 2);

    let program = match kind {
        ScriptKind::Unknown => {
            return Err(AtfError::InvalidArgument(format!(
                "不支持的脚本类型: {}",
                path
            )))
        }
        ScriptKind::NativeExecutable => path.to_string(),
        ScriptKind::JavaExecutable => {
            argv.push("-jar".to_string());
            argv.push(path.to_string());
            JAVA_EXEC.to_string()
        }
        _ => {
            argv.push(path.to_string());
            // 除 Unknown/Native 外都有解释器
            kind.interpreter().unwrap_or_default().to_string()
        }
    };

    argv.extend(args.iter().cloned());
    Ok((program, argv))
}

/// 执行脚本/程序，返回合并后的输出
///
/// 单次同步等待，不重试。非零退出码通过 `ExitFailure` 返回，其中带有输出；
/// 超时后子进程被终止并返回 `Timeout`，超时为 0 时不限制。
pub async fn run(
    path: &str,
    args: &[String],
    timeout: Option<Duration>,
    working_dir: Option<&Path>,
) -> Result<String> {
    if path.trim().is_empty() {
        return Err(AtfError::InvalidArgument("脚本路径为空".to_string()));
    }

    let (program, argv) = command_line(path, args)?;
    debug!("启动进程: {} {:?}", program, argv);

    let mut cmd = Command::new(&program);
    cmd.args(&argv)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|e| AtfError::ProcessLaunchFailure {
        program: program.clone(),
        reason: e.to_string(),
    })?;

    let waited = match timeout.filter(|limit| !limit.is_zero()) {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(waited) => waited,
            Err(_) => {
                // future 被丢弃时 kill_on_drop 会终止子进程
                warn!("进程 {} 超时 ({:?})，已终止", program, limit);
                return Err(AtfError::Timeout {
                    secs: limit.as_secs(),
                });
            }
        },
        None => child.wait_with_output().await,
    };

    let output = waited.map_err(|e| AtfError::ProcessLaunchFailure {
        program: program.clone(),
        reason: e.to_string(),
    })?;

    let mut text = String::from_utf8_lossy(&output.stdout).to_string();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        return Ok(text);
    }

    match output.status.code() {
        Some(code) => Err(AtfError::ExitFailure { code, output: text }),
        None => Err(AtfError::ProcessLaunchFailure {
            program,
            reason: format!("进程异常终止: {}", output.status),
        }),
    }
}

/// 脚本执行器接口
///
/// 引擎通过此接口执行动作，默认实现为 [`ProcessExecutor`]。
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    async fn execute(
        &self,
        script: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<String>;
}

/// 以子进程方式执行脚本
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    /// 子进程工作目录
    working_dir: Option<PathBuf>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置子进程工作目录
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

#[async_trait]
impl ScriptExecutor for ProcessExecutor {
    async fn execute(
        &self,
        script: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<String> {
        run(script, args, timeout, self.working_dir.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify(".py"), ScriptKind::PythonScript);
        assert_eq!(classify("scripts/check.pl"), ScriptKind::PerlScript);
        assert_eq!(classify("a.tcl"), ScriptKind::TclScript);
        assert_eq!(classify("login.exp"), ScriptKind::ExpectScript);
        assert_eq!(classify("a.rb"), ScriptKind::RubyScript);
        assert_eq!(classify("a.groovy"), ScriptKind::GroovyScript);
        assert_eq!(classify(".jar"), ScriptKind::JavaExecutable);
        assert_eq!(classify(".xyz"), ScriptKind::Unknown);
    }

    #[test]
    fn test_classify_native() {
        assert_eq!(classify(""), ScriptKind::NativeExecutable);
        assert_eq!(classify("/usr/bin/true"), ScriptKind::NativeExecutable);
        assert_eq!(classify("tool.exe"), ScriptKind::NativeExecutable);
        assert_eq!(classify("TOOL.BAT"), ScriptKind::NativeExecutable);
        assert_eq!(classify("run.com"), ScriptKind::NativeExecutable);
        // 目录名中的 '.' 不影响判断
        assert_eq!(classify("/opt/v1.2/runner"), ScriptKind::NativeExecutable);
    }

    #[test]
    fn test_command_line_script() {
        let args = vec!["-v".to_string(), "host".to_string()];
        let (program, argv) = command_line("check.py", &args).unwrap();
        assert_eq!(program, PYTHON_EXEC);
        assert_eq!(argv, vec!["check.py", "-v", "host"]);
    }

    #[test]
    fn test_command_line_java() {
        let args = vec!["x".to_string()];
        let (program, argv) = command_line("tool.jar", &args).unwrap();
        assert_eq!(program, "java");
        assert_eq!(argv, vec!["-jar", "tool.jar", "x"]);
    }

    #[test]
    fn test_command_line_native() {
        let (program, argv) = command_line("/bin/echo", &["hi".to_string()]).unwrap();
        assert_eq!(program, "/bin/echo");
        assert_eq!(argv, vec!["hi"]);
    }

    #[test]
    fn test_expect_interpreter() {
        let expected = if cfg!(windows) { "tclsh" } else { "expect" };
        assert_eq!(ScriptKind::ExpectScript.interpreter(), Some(expected));
    }

    #[tokio::test]
    async fn test_run_empty_path() {
        let err = run("", &[], None, None).await.unwrap_err();
        assert!(matches!(err, AtfError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_run_unknown_kind() {
        let err = run("data.xyz", &[], None, None).await.unwrap_err();
        assert!(matches!(err, AtfError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let err = run("/nonexistent/atf-no-such-binary", &[], None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AtfError::ProcessLaunchFailure { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_success_and_failure() {
        assert!(run("true", &[], None, None).await.is_ok());

        let err = run("false", &[], None, None).await.unwrap_err();
        assert!(matches!(err, AtfError::ExitFailure { code: 1, .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_merges_output() {
        let args = vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()];
        let err = run("sh", &args, None, None).await.unwrap_err();
        match err {
            AtfError::ExitFailure { code, output } => {
                assert_eq!(code, 3);
                assert!(output.contains("out"));
                assert!(output.contains("err"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_timeout_kills_child() {
        let started = std::time::Instant::now();
        let err = run(
            "sleep",
            &["5".to_string()],
            Some(Duration::from_millis(200)),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AtfError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_executor_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ProcessExecutor::new().with_working_dir(dir.path());
        let output = executor.execute("pwd", &[], None).await.unwrap();
        let reported = std::fs::canonicalize(output.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }
}
