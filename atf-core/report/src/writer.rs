//! 报告文件写入

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use atf_engine::TestReport;

use crate::{render, ReportFormat, Result};

const DEFAULT_REPORT_NAME: &str = "report";

/// 将报告以一种或多种格式写入目录
#[derive(Debug, Clone)]
pub struct ReportWriter {
    /// 输出目录
    dir: PathBuf,

    /// 文件名 (不含扩展名)
    name: String,

    /// HTML 报告使用的样式
    css: Option<String>,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            name: DEFAULT_REPORT_NAME.to_string(),
            css: None,
        }
    }

    /// 设置报告文件名，空名称保持默认值
    pub fn with_name(mut self, name: &str) -> Self {
        if !name.trim().is_empty() {
            self.name = name.trim().to_string();
        }
        self
    }

    /// 设置 HTML 报告样式
    pub fn with_css(mut self, css: String) -> Self {
        self.css = Some(css);
        self
    }

    /// 从文件读取 HTML 报告样式
    pub fn with_css_file(self, path: &Path) -> Result<Self> {
        let css = fs::read_to_string(path)?;
        Ok(self.with_css(css))
    }

    /// 指定格式的报告文件路径
    pub fn path_for(&self, format: ReportFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.name, format.extension()))
    }

    /// 写入报告，返回写入的文件路径
    ///
    /// 重复的格式只写一次。
    pub fn write(&self, report: &TestReport, formats: &[ReportFormat]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let mut written = Vec::with_capacity(formats.len());
        for format in formats {
            let path = self.path_for(*format);
            if written.contains(&path) {
                continue;
            }

            let content = render(report, *format, self.css.as_deref())?;
            fs::write(&path, content)?;
            info!("报告已写入: {:?}", path);
            written.push(path);
        }
        Ok(written)
    }
}
