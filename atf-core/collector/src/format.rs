//! 配置文件格式

use std::fmt;
use std::path::Path;

use crate::{CollectError, Result};

/// 支持的测试定义格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
    Xml,
}

impl SourceFormat {
    /// 根据文件扩展名判断格式 (大小写不敏感)
    ///
    /// 纯文本格式 (.txt/.cfg) 没有实现，与其他未知扩展名一样返回错误。
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(SourceFormat::Json),
            "yaml" | "yml" => Ok(SourceFormat::Yaml),
            "xml" => Ok(SourceFormat::Xml),
            _ => Err(CollectError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceFormat::Json => "json",
            SourceFormat::Yaml => "yaml",
            SourceFormat::Xml => "xml",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.json")).unwrap(), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("a.YML")).unwrap(), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("dir/a.yaml")).unwrap(), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("a.xml")).unwrap(), SourceFormat::Xml);
    }

    #[test]
    fn test_text_formats_unsupported() {
        for name in ["a.txt", "a.cfg", "a", "a.toml"] {
            assert!(matches!(
                SourceFormat::from_path(Path::new(name)),
                Err(CollectError::UnsupportedFormat(_))
            ));
        }
    }
}
