//! ATF 报告生成
//!
//! 将执行完成的 [`TestReport`] 渲染为各种格式，不会重新执行任何动作：
//! - JSON / YAML：完整的报告树
//! - XML：`TestReport/TestSet/TestCase/TestStep/Action` 元素树
//! - HTML：带状态着色的单页报告
//! - 文本：缩进的可读树

mod error;
mod format;
pub mod html;
mod text;
mod writer;
mod xml;

pub use error::{ReportError, Result};
pub use format::ReportFormat;
pub use writer::ReportWriter;

use atf_engine::TestReport;

/// 按格式渲染报告，`css` 只对 HTML 生效
pub fn render(report: &TestReport, format: ReportFormat, css: Option<&str>) -> Result<String> {
    let content = match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)?,
        ReportFormat::Yaml => serde_yaml::to_string(report)?,
        ReportFormat::Xml => xml::render(report)?,
        ReportFormat::Html => html::render(report, css),
        ReportFormat::Text => text::render(report),
    };
    Ok(content)
}
