//! 被测系统 (SUT) 描述信息
//!
//! 仅用于记录和报告，不影响执行。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 被测系统
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysUnderTest {
    /// 名称
    #[serde(alias = "Name", alias = "@name")]
    pub name: String,

    /// 系统类型
    #[serde(alias = "Systype", alias = "type")]
    pub systype: String,

    /// 版本
    #[serde(alias = "Version")]
    pub version: String,

    /// 描述
    #[serde(alias = "Description")]
    pub description: String,

    /// IP 地址
    #[serde(alias = "IPaddr", alias = "ip")]
    pub ip_addr: String,
}

impl SysUnderTest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_systype(mut self, systype: &str) -> Self {
        self.systype = systype.to_string();
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_ip_addr(mut self, ip_addr: &str) -> Self {
        self.ip_addr = ip_addr.to_string();
        self
    }

    /// 所有字段都为空
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for SysUnderTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.systype.is_empty() || !self.version.is_empty() {
            write!(f, " ({} {})", self.systype, self.version)?;
        }
        if !self.ip_addr.is_empty() {
            write!(f, " @ {}", self.ip_addr)?;
        }
        Ok(())
    }
}
