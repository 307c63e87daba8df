//! 纯文本报告

use std::fmt::Write;

use atf_engine::{Action, TestReport};

/// 生成缩进的文本报告
pub fn render(report: &TestReport) -> String {
    let set = &report.test_set;
    let summary = report.summary();
    let mut out = String::new();

    let _ = writeln!(out, "Test Report: {}", set.name);
    let _ = writeln!(out, "  Started:  {}", report.started.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "  Finished: {}", report.finished.format("%Y-%m-%d %H:%M:%S"));
    if let Some(plan) = &set.test_plan {
        let _ = writeln!(out, "  Test plan: {}", plan);
    }
    if !set.sut.is_unset() {
        let _ = writeln!(out, "  SUT: {}", set.sut);
    }
    let _ = writeln!(out, "  Status: {}", set.status);
    let _ = writeln!(
        out,
        "  Cases: {} total, {} passed, {} failed, {} skipped, {} not tested",
        summary.total, summary.passed, summary.failed, summary.skipped, summary.not_tested
    );

    if let Some(setup) = &set.setup {
        push_action(&mut out, 1, "Setup", setup);
    }

    for case in &set.cases {
        let _ = writeln!(
            out,
            "\n  TestCase {:?} [expected: {}, status: {}]",
            case.name, case.expected, case.status
        );
        if let Some(setup) = &case.setup {
            push_action(&mut out, 2, "Setup", setup);
        }
        for step in &case.steps {
            let _ = writeln!(
                out,
                "    TestStep {:?} [expected: {}, status: {}]",
                step.name, step.expected, step.status
            );
            push_action(&mut out, 3, "Action", &step.action);
        }
        if let Some(cleanup) = &case.cleanup {
            push_action(&mut out, 2, "Cleanup", cleanup);
        }
    }

    if let Some(cleanup) = &set.cleanup {
        let _ = writeln!(out);
        push_action(&mut out, 1, "Cleanup", cleanup);
    }
    out
}

fn push_action(out: &mut String, depth: usize, label: &str, action: &Action) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(
        out,
        "{}{} [{}]: {}",
        indent,
        label,
        action.result(),
        action.to_string().replace('\n', " ")
    );
    for line in action.output().lines() {
        let _ = writeln!(out, "{}  | {}", indent, line);
    }
}
