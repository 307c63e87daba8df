//! XML 报告

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

use atf_engine::{Action, ActionKind, SysUnderTest, TestCase, TestReport, TestSet, TestStep};

use crate::{ReportError, Result};

type XmlWriter = Writer<Vec<u8>>;

/// 生成 XML 报告
pub fn render(report: &TestReport) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut root = BytesStart::new("TestReport");
    root.push_attribute(("started", report.started.to_rfc3339().as_str()));
    root.push_attribute(("finished", report.finished.to_rfc3339().as_str()));
    write_event(&mut writer, Event::Start(root))?;

    write_set(&mut writer, &report.test_set)?;

    write_end(&mut writer, "TestReport")?;

    String::from_utf8(writer.into_inner()).map_err(|e| ReportError::XmlError(e.to_string()))
}

fn write_set(writer: &mut XmlWriter, set: &TestSet) -> Result<()> {
    let mut tag = BytesStart::new("TestSet");
    tag.push_attribute(("name", &*xml_safe(&set.name)));
    tag.push_attribute(("status", set.status.as_str()));
    write_event(writer, Event::Start(tag))?;

    write_text_element(writer, "Description", &set.description)?;
    if let Some(plan) = &set.test_plan {
        write_text_element(writer, "TestPlan", plan)?;
    }
    if !set.sut.is_unset() {
        write_sut(writer, &set.sut)?;
    }
    if let Some(setup) = &set.setup {
        write_action(writer, "Setup", setup)?;
    }
    for case in &set.cases {
        write_case(writer, case)?;
    }
    if let Some(cleanup) = &set.cleanup {
        write_action(writer, "Cleanup", cleanup)?;
    }

    write_end(writer, "TestSet")
}

fn write_sut(writer: &mut XmlWriter, sut: &SysUnderTest) -> Result<()> {
    let mut tag = BytesStart::new("SystemUnderTest");
    tag.push_attribute(("name", &*xml_safe(&sut.name)));
    write_event(writer, Event::Start(tag))?;

    write_text_element(writer, "Type", &sut.systype)?;
    write_text_element(writer, "Version", &sut.version)?;
    write_text_element(writer, "IPAddress", &sut.ip_addr)?;
    write_text_element(writer, "Description", &sut.description)?;

    write_end(writer, "SystemUnderTest")
}

fn write_case(writer: &mut XmlWriter, case: &TestCase) -> Result<()> {
    let mut tag = BytesStart::new("TestCase");
    tag.push_attribute(("name", &*xml_safe(&case.name)));
    tag.push_attribute(("expected", case.expected.as_str()));
    tag.push_attribute(("status", case.status.as_str()));
    write_event(writer, Event::Start(tag))?;

    write_text_element(writer, "Description", &case.description)?;
    if let Some(setup) = &case.setup {
        write_action(writer, "Setup", setup)?;
    }
    for step in &case.steps {
        write_step(writer, step)?;
    }
    if let Some(cleanup) = &case.cleanup {
        write_action(writer, "Cleanup", cleanup)?;
    }

    write_end(writer, "TestCase")
}

fn write_step(writer: &mut XmlWriter, step: &TestStep) -> Result<()> {
    let mut tag = BytesStart::new("TestStep");
    tag.push_attribute(("name", &*xml_safe(&step.name)));
    tag.push_attribute(("expected", step.expected.as_str()));
    tag.push_attribute(("status", step.status.as_str()));
    write_event(writer, Event::Start(tag))?;

    write_action(writer, "Action", &step.action)?;

    write_end(writer, "TestStep")
}

fn write_action(writer: &mut XmlWriter, element: &str, action: &Action) -> Result<()> {
    let mut tag = BytesStart::new(element);
    tag.push_attribute(("result", action.result().as_str()));
    write_event(writer, Event::Start(tag))?;

    match action.kind() {
        ActionKind::Executable { script, args } => {
            write_text_element(writer, "Script", script)?;
            write_text_element(writer, "Args", args)?;
        }
        ActionKind::Manual { description } => {
            write_text_element(writer, "Description", description)?;
        }
        ActionKind::Empty => {}
    }
    write_text_element(writer, "Output", action.output())?;

    write_end(writer, element)
}

/// 写入只包含文本的元素，文本为空时省略
fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::new(&xml_safe(text))))?;
    write_end(writer, name)
}

/// 替换 XML 1.0 不允许出现的字符 (例如脚本输出中的 ANSI 控制序列)
fn xml_safe(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if allowed(c) { c } else { '\u{FFFD}' })
                .collect(),
        )
    }
}

fn write_end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn write_event(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ReportError::XmlError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_safe() {
        assert!(matches!(xml_safe("plain\ttext\r\n"), Cow::Borrowed(_)));
        assert_eq!(xml_safe("\x1b[31mFAIL\x1b[0m"), "\u{FFFD}[31mFAIL\u{FFFD}[0m");
        assert_eq!(xml_safe("a\u{0}b\u{FFFF}"), "a\u{FFFD}b\u{FFFD}");
        assert_eq!(xml_safe("中文 \u{E000}"), "中文 \u{E000}");
    }
}
