//! 报告格式

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ReportError;

/// 报告格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Yaml,
    Xml,
    Html,
    Text,
}

impl ReportFormat {
    /// 报告文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
            ReportFormat::Xml => "xml",
            ReportFormat::Html => "html",
            ReportFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "xml" => Ok(ReportFormat::Xml),
            "html" | "htm" => Ok(ReportFormat::Html),
            "txt" | "text" => Ok(ReportFormat::Text),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}
