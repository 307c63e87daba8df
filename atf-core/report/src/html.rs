//! HTML 报告
//!
//! 生成单个 HTML5 页面：页头 (起止时间、被测系统、测试集 setup/cleanup)，
//! 每个测试用例一个 `<article>`。状态单元格使用 CSS 类
//! `passed` / `failed` / `nottested` / `skipped` 着色。

use quick_xml::escape::escape;
use std::fmt::Write;

use atf_engine::{Action, SysUnderTest, TestCase, TestReport, TestResult, TestStep};

/// 未指定 CSS 文件时使用的样式
pub const DEFAULT_CSS: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 1em; }
th, td { border: 1px solid #999; padding: 4px 8px; text-align: left; vertical-align: top; }
th { background: #ddd; }
pre { margin: 0; white-space: pre-wrap; }
.passed { background: #8f8; }
.failed { background: #f88; }
.nottested { background: #ff8; }
.skipped { background: #ccc; }
";

/// 生成 HTML 报告，`css` 为空时使用默认样式
pub fn render(report: &TestReport, css: Option<&str>) -> String {
    let set = &report.test_set;
    let mut html = String::new();

    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html>");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>Test Report: {}</title>", escape(&set.name));
    let _ = writeln!(html, "<style>\n{}</style>", css.unwrap_or(DEFAULT_CSS));
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");

    // 页头
    let _ = writeln!(html, "<header>");
    let _ = writeln!(html, "<h1>Test Report: {}</h1>", escape(&set.name));
    if !set.description.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", escape(&set.description));
    }
    let _ = writeln!(html, "<table>");
    let _ = writeln!(
        html,
        "<tr><td><b>Execution Started</b></td><td>{}</td></tr>",
        report.started.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(
        html,
        "<tr><td><b>Execution Finished</b></td><td>{}</td></tr>",
        report.finished.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(
        html,
        "<tr><td><b>Status</b></td><td class=\"{}\">{}</td></tr>",
        css_class(set.status),
        set.status
    );
    let _ = writeln!(html, "</table>");

    if !set.sut.is_unset() {
        push_sut(&mut html, &set.sut);
    }

    if set.setup.is_some() || set.cleanup.is_some() {
        let _ = writeln!(html, "<table>");
        if let Some(setup) = &set.setup {
            push_fixture_row(&mut html, "Setup", setup, false);
        }
        if let Some(cleanup) = &set.cleanup {
            push_fixture_row(&mut html, "Cleanup", cleanup, false);
        }
        let _ = writeln!(html, "</table>");
    }
    let _ = writeln!(html, "</header>");

    for case in &set.cases {
        push_case(&mut html, case);
    }

    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}

fn push_sut(html: &mut String, sut: &SysUnderTest) {
    let _ = writeln!(html, "<table>");
    let _ = writeln!(
        html,
        "<tr><th>System Under Test</th><th>{}</th></tr>",
        escape(&sut.name)
    );
    for (label, value) in [
        ("Type", &sut.systype),
        ("Version", &sut.version),
        ("IP Address", &sut.ip_addr),
        ("Description", &sut.description),
    ] {
        let _ = writeln!(html, "<tr><td>{}</td><td>{}</td></tr>", label, escape(value));
    }
    let _ = writeln!(html, "</table>");
}

fn push_case(html: &mut String, case: &TestCase) {
    let _ = writeln!(html, "<article>");
    let _ = writeln!(
        html,
        "<h3>Test Case: {} <span class=\"{}\">{}</span></h3>",
        escape(&case.name),
        css_class(case.status),
        case.status
    );
    if !case.description.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", escape(&case.description));
    }
    let _ = writeln!(html, "<table>");
    let _ = writeln!(
        html,
        "<tr><th class=\"name\">Name</th><th>Action</th><th>Output</th>\
         <th class=\"status\">Expected Status</th><th class=\"status\">Status</th></tr>"
    );
    if let Some(setup) = &case.setup {
        push_fixture_row(html, "Setup", setup, true);
    }
    for step in &case.steps {
        push_step_row(html, step);
    }
    if let Some(cleanup) = &case.cleanup {
        push_fixture_row(html, "Cleanup", cleanup, true);
    }
    let _ = writeln!(html, "</table>");
    let _ = writeln!(html, "</article>");
}

fn push_step_row(html: &mut String, step: &TestStep) {
    let _ = writeln!(
        html,
        "<tr><td>{}</td><td>{}</td><td><pre>{}</pre></td><td>{}</td><td class=\"{}\">{}</td></tr>",
        escape(&step.name),
        escape(&step.action.to_string()),
        escape(step.action.output()),
        step.expected,
        css_class(step.status),
        step.status
    );
}

/// setup/cleanup 行，期望结果总是 Pass
fn push_fixture_row(html: &mut String, label: &str, action: &Action, in_case: bool) {
    let _ = write!(
        html,
        "<tr><td>{}</td><td>{}</td><td><pre>{}</pre></td>",
        label,
        escape(&action.to_string()),
        escape(action.output())
    );
    if in_case {
        let _ = write!(html, "<td>{}</td>", TestResult::Pass);
    }
    let _ = writeln!(
        html,
        "<td class=\"{}\">{}</td></tr>",
        css_class(action.result()),
        action.result()
    );
}

/// 状态对应的 CSS 类
pub fn css_class(result: TestResult) -> &'static str {
    match result {
        TestResult::Pass => "passed",
        TestResult::Fail => "failed",
        TestResult::Skipped => "skipped",
        _ => "nottested",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_class() {
        assert_eq!(css_class(TestResult::Pass), "passed");
        assert_eq!(css_class(TestResult::Fail), "failed");
        assert_eq!(css_class(TestResult::Skipped), "skipped");
        assert_eq!(css_class(TestResult::NotTested), "nottested");
        assert_eq!(css_class(TestResult::Unknown), "nottested");
    }
}
