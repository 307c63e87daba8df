//! 日志初始化
//!
//! 控制台只显示通知 (默认 info)，日志文件额外记录脚本输出 (debug)。

use anyhow::{Context, Result};
use std::fs::File;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// 解析日志级别，无法识别时使用 info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// 初始化全局日志
///
/// `RUST_LOG` 存在时覆盖控制台级别；日志文件固定记录 debug 及以上。
pub fn init(level: &str, file: Option<File>) -> Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(parse_level(level).into()));

    let console = fmt::layer().with_target(false).with_filter(console_filter);

    let file_layer = file.map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_filter(LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .context("初始化日志失败")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_level("verbose"), LevelFilter::INFO);
    }
}
