//! 报告生成集成测试

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use atf_engine::{
    Action, AtfError, ExecContext, NullSink, Runner, ScriptExecutor, SysUnderTest, TestCase,
    TestReport, TestResult, TestSet, TestStep,
};
use atf_report::*;
use tempfile::TempDir;

/// 名称以 "fail" 开头的脚本失败，以 "ansi" 开头的脚本输出颜色控制序列
struct FakeExecutor;

#[async_trait]
impl ScriptExecutor for FakeExecutor {
    async fn execute(
        &self,
        script: &str,
        _args: &[String],
        _timeout: Option<Duration>,
    ) -> atf_engine::Result<String> {
        if script.starts_with("fail") {
            Err(AtfError::ExitFailure {
                code: 2,
                output: "boom <stderr>\n".to_string(),
            })
        } else if script.starts_with("ansi") {
            Ok("\x1b[31mFAIL\x1b[0m\n".to_string())
        } else {
            Ok(format!("ran {}\n", script))
        }
    }
}

async fn executed_report() -> TestReport {
    let mut set = TestSet::new("nightly", "夜间回归")
        .with_sut(
            SysUnderTest::new("dut-1")
                .with_systype("router")
                .with_ip_addr("10.0.0.1"),
        )
        .with_setup(Action::executable("prepare.py", "--clean"));

    let mut boot = TestCase::new("boot", "", TestResult::Pass)
        .with_cleanup(Action::manual("unplug <cable> & wait"));
    boot.append_step(TestStep::new(
        "ping",
        TestResult::Pass,
        Action::executable("ping.py", "10.0.0.1"),
    ))
    .unwrap();

    let mut broken = TestCase::new("broken", "", TestResult::Pass);
    broken
        .append_step(TestStep::new(
            "crash",
            TestResult::Pass,
            Action::executable("fail.py", ""),
        ))
        .unwrap();

    set.extend_cases([boot, broken]).unwrap();

    let ctx = ExecContext::new()
        .with_sink(Arc::new(NullSink))
        .with_executor(Arc::new(FakeExecutor));
    Runner::new(ctx).run(set).await.unwrap()
}

#[tokio::test]
async fn test_json_report_contains_run_state() {
    let report = executed_report().await;
    let json = render(&report, ReportFormat::Json, None).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["test_set"]["status"], "Fail");
    assert_eq!(value["test_set"]["cases"][0]["status"], "Pass");
    assert_eq!(
        value["test_set"]["cases"][1]["steps"][0]["action"]["result"],
        "Fail"
    );

    let parsed: TestReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.test_set, report.test_set);
}

#[tokio::test]
async fn test_yaml_report() {
    let report = executed_report().await;
    let yaml = render(&report, ReportFormat::Yaml, None).unwrap();
    assert!(yaml.contains("name: nightly"));
    assert!(yaml.contains("status: Fail"));
}

#[tokio::test]
async fn test_xml_report_structure() {
    let report = executed_report().await;
    let xml = render(&report, ReportFormat::Xml, None).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<TestSet name=\"nightly\" status=\"Fail\">"));
    assert!(xml.contains("<SystemUnderTest name=\"dut-1\">"));
    assert!(xml.contains("<TestCase name=\"boot\" expected=\"Pass\" status=\"Pass\">"));
    assert!(xml.contains("<TestStep name=\"crash\" expected=\"Pass\" status=\"Fail\">"));
    assert!(xml.contains("<Action result=\"Fail\">"));
    assert!(xml.contains("<Setup result=\"Pass\">"));
    // 文本被转义
    assert!(xml.contains("unplug &lt;cable&gt; &amp; wait"));
    assert!(!xml.contains("<cable>"));
}

#[tokio::test]
async fn test_xml_report_replaces_control_characters() {
    let mut set = TestSet::new("colors", "");
    let mut case = TestCase::new("colored", "", TestResult::Pass);
    case.append_step(TestStep::new(
        "paint",
        TestResult::Pass,
        Action::executable("ansi.sh", ""),
    ))
    .unwrap();
    set.append_case(case).unwrap();

    let ctx = ExecContext::new()
        .with_sink(Arc::new(NullSink))
        .with_executor(Arc::new(FakeExecutor));
    let report = Runner::new(ctx).run(set).await.unwrap();
    assert!(report.test_set.cases[0].steps[0]
        .action
        .output()
        .contains('\x1b'));

    let xml = render(&report, ReportFormat::Xml, None).unwrap();
    assert!(!xml.contains('\x1b'));
    assert!(xml.contains("<Output>\u{FFFD}[31mFAIL\u{FFFD}[0m"));
    assert!(xml
        .chars()
        .all(|c| matches!(c, '\t' | '\n' | '\r') || c >= ' '));
}

#[tokio::test]
async fn test_html_report() {
    let report = executed_report().await;
    let html = render(&report, ReportFormat::Html, None).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h1>Test Report: nightly</h1>"));
    assert!(html.contains(html::DEFAULT_CSS));
    assert!(html.contains("<th>System Under Test</th><th>dut-1</th>"));
    assert!(html.contains("class=\"passed\""));
    assert!(html.contains("class=\"failed\""));
    assert!(html.contains("class=\"nottested\""));
    assert_eq!(html.matches("<article>").count(), 2);
    assert!(html.contains("boom &lt;stderr&gt;"));
    assert!(!html.contains("<stderr>"));

    let custom = render(&report, ReportFormat::Html, Some("td { color: red; }")).unwrap();
    assert!(custom.contains("td { color: red; }"));
    assert!(!custom.contains(html::DEFAULT_CSS));
}

#[tokio::test]
async fn test_text_report() {
    let report = executed_report().await;
    let text = render(&report, ReportFormat::Text, None).unwrap();

    assert!(text.starts_with("Test Report: nightly"));
    assert!(text.contains("Cases: 2 total, 1 passed, 1 failed, 0 skipped, 0 not tested"));
    assert!(text.contains("TestStep \"ping\" [expected: Pass, status: Pass]"));
    assert!(text.contains("| ran ping.py"));
}

#[tokio::test]
async fn test_report_writer() {
    let report = executed_report().await;
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("results");

    let paths = ReportWriter::new(&out)
        .write(
            &report,
            &[ReportFormat::Html, ReportFormat::Xml, ReportFormat::Html],
        )
        .unwrap();
    assert_eq!(paths, vec![out.join("report.html"), out.join("report.xml")]);
    assert!(paths.iter().all(|p| p.exists()));

    let css = dir.path().join("style.css");
    std::fs::write(&css, "h1 { color: blue; }").unwrap();
    let paths = ReportWriter::new(&out)
        .with_name("nightly")
        .with_css_file(&css)
        .unwrap()
        .write(&report, &[ReportFormat::Html, ReportFormat::Text])
        .unwrap();
    assert_eq!(paths[0], out.join("nightly.html"));
    assert_eq!(paths[1], out.join("nightly.txt"));
    let html = std::fs::read_to_string(&paths[0]).unwrap();
    assert!(html.contains("h1 { color: blue; }"));
}

#[test]
fn test_report_writer_missing_css() {
    let dir = TempDir::new().unwrap();
    let err = ReportWriter::new(dir.path())
        .with_css_file(&dir.path().join("missing.css"))
        .unwrap_err();
    assert!(matches!(err, ReportError::IoError(_)));
}
