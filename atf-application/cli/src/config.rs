//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/atf/config.toml)
//!
//! 优先级: 命令行参数 > 环境变量 > 配置文件 > 默认值

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use atf_report::ReportFormat;

const ENV_RESULTS_DIR: &str = "ATF_RESULTS_DIR";
const ENV_ACTION_TIMEOUT: &str = "ATF_ACTION_TIMEOUT";
const ENV_REPORT_FORMATS: &str = "ATF_REPORT_FORMATS";

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// 结果根目录，每次运行在其下创建 `<测试集>_<时间>` 子目录
    pub results_dir: Option<String>,

    /// 动作默认超时（秒）
    pub action_timeout_secs: Option<u64>,

    /// 除 HTML 外额外生成的报告格式
    #[serde(default)]
    pub report_formats: Vec<String>,

    /// HTML 报告使用的 CSS 文件
    pub css_file: Option<String>,
}

impl CliConfig {
    /// 获取配置文件路径
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("atf").join("config.toml"))
    }

    /// 加载配置文件并应用环境变量
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            tracing::debug!("加载 CLI 配置: {:?}", path);
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_vars()?;
        Ok(config)
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    /// 从环境变量覆盖
    pub fn apply_env_vars(&mut self) -> Result<()> {
        self.apply_env_from(|key| env::var(key).ok())
    }

    fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_RESULTS_DIR) {
            self.results_dir = Some(dir);
        }
        if let Some(timeout) = lookup(ENV_ACTION_TIMEOUT) {
            let secs = timeout
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} 不是有效的秒数: {:?}", ENV_ACTION_TIMEOUT, timeout))?;
            self.action_timeout_secs = Some(secs);
        }
        if let Some(formats) = lookup(ENV_REPORT_FORMATS) {
            self.report_formats = formats
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    /// 结果根目录，默认为 `~/results`
    pub fn results_dir(&self) -> Result<PathBuf> {
        match &self.results_dir {
            Some(dir) => Ok(expand_path(dir)),
            None => {
                let home = dirs::home_dir().context("无法获取用户主目录")?;
                Ok(home.join("results"))
            }
        }
    }

    /// 解析配置的报告格式
    pub fn report_formats(&self) -> Result<Vec<ReportFormat>> {
        self.report_formats
            .iter()
            .map(|f| {
                f.parse::<ReportFormat>()
                    .with_context(|| format!("配置中的报告格式无效: {}", f))
            })
            .collect()
    }

    pub fn css_file(&self) -> Option<PathBuf> {
        self.css_file.as_deref().map(expand_path)
    }
}

/// 展开路径中的 `~`
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.results_dir, None);
        assert_eq!(config.action_timeout_secs, None);
        assert!(config.report_formats().unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "results_dir = \"/tmp/atf\"\naction_timeout_secs = 60\nreport_formats = [\"json\", \"txt\"]\n",
        )
        .unwrap();

        let config = CliConfig::load_from_file(&path).unwrap();
        assert_eq!(config.results_dir().unwrap(), PathBuf::from("/tmp/atf"));
        assert_eq!(config.action_timeout_secs, Some(60));
        assert_eq!(
            config.report_formats().unwrap(),
            vec![ReportFormat::Json, ReportFormat::Text]
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = CliConfig {
            results_dir: Some("/from/file".to_string()),
            action_timeout_secs: Some(10),
            report_formats: vec!["json".to_string()],
            css_file: None,
        };

        let env: HashMap<&str, &str> = [
            (ENV_RESULTS_DIR, "/from/env"),
            (ENV_ACTION_TIMEOUT, " 30 "),
            (ENV_REPORT_FORMATS, "yaml, text,"),
        ]
        .into_iter()
        .collect();
        config
            .apply_env_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.results_dir.as_deref(), Some("/from/env"));
        assert_eq!(config.action_timeout_secs, Some(30));
        assert_eq!(
            config.report_formats().unwrap(),
            vec![ReportFormat::Yaml, ReportFormat::Text]
        );
    }

    #[test]
    fn test_invalid_env_timeout() {
        let mut config = CliConfig::default();
        let result = config.apply_env_from(|key| {
            (key == ENV_ACTION_TIMEOUT).then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_report_format() {
        let config = CliConfig {
            report_formats: vec!["pdf".to_string()],
            ..Default::default()
        };
        assert!(config.report_formats().is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_path("~/results");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert_eq!(expand_path("/abs/dir"), PathBuf::from("/abs/dir"));
    }
}
