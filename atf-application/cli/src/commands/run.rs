//! Run 命令处理

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use atf_engine::{
    ChannelSink, ExecContext, ProgressSink, Runner, Severity, TestReport, TestResult, TestSet,
    TracingSink,
};
use atf_report::{ReportFormat, ReportWriter};

use crate::config::{expand_path, CliConfig};
use crate::logging;

const DEFAULT_LOG_FILE: &str = "output.log";

#[derive(Args, Debug)]
pub struct RunArgs {
    /// 测试定义文件 (.json/.yaml/.yml/.xml)
    #[arg(short, long)]
    pub input: String,

    /// 工作目录，默认在结果目录下按测试集名称和时间创建
    #[arg(short, long)]
    pub workdir: Option<String>,

    /// 日志文件，相对路径位于工作目录下
    #[arg(short = 'l', long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: String,

    /// 报告文件名 (不含扩展名)
    #[arg(short, long)]
    pub report: Option<String>,

    /// HTML 报告使用的 CSS 文件
    #[arg(short, long)]
    pub css: Option<String>,

    /// 同时生成 XML 报告
    #[arg(short = 'X', long)]
    pub xml: bool,

    /// 额外的报告格式 (json/yaml/xml/html/text)，逗号分隔
    #[arg(short, long, value_delimiter = ',')]
    pub formats: Vec<String>,

    /// 动作默认超时（秒），0 表示不限制
    #[arg(long)]
    pub timeout: Option<u64>,

    /// 控制台输出调试信息
    #[arg(short, long)]
    pub debug: bool,
}

pub async fn handle(args: RunArgs, log_level: &str) -> Result<()> {
    let config = CliConfig::load()?;

    // 测试计划按被测系统配置展开为多个测试集
    let input = expand_path(&args.input);
    let sets = atf_collector::collect_all(&input)
        .with_context(|| format!("加载测试定义失败: {:?}", input))?;
    let run_name = sets
        .first()
        .map(|set| set.test_plan.clone().unwrap_or_else(|| set.name.clone()))
        .unwrap_or_default();

    // 工作目录
    let workdir = match &args.workdir {
        Some(dir) => expand_path(dir),
        None => default_workdir(&config.results_dir()?, &run_name),
    };
    fs::create_dir_all(&workdir).with_context(|| format!("创建工作目录失败: {:?}", workdir))?;

    // 日志
    let log_path = resolve_in(&workdir, &args.log_file);
    let log_file =
        File::create(&log_path).with_context(|| format!("创建日志文件失败: {:?}", log_path))?;
    let level = if args.debug { "debug" } else { log_level };
    logging::init(level, Some(log_file))?;

    info!("ATF CLI 启动");
    info!("测试定义: {:?}", input);
    info!("工作目录: {:?}", workdir);

    // 报告参数在执行前校验
    let formats = report_formats(&args, &config)?;
    let css = match args.css.as_deref().map(expand_path).or_else(|| config.css_file()) {
        Some(path) => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("读取 CSS 文件失败: {:?}", path))?,
        ),
        None => None,
    };

    let timeout = args
        .timeout
        .or(config.action_timeout_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    let multiple = sets.len() > 1;
    for (index, set) in sets.into_iter().enumerate() {
        let report_dir = if multiple {
            workdir.join(run_dir_name(index, &set))
        } else {
            workdir.clone()
        };

        let mut writer = ReportWriter::new(&report_dir);
        if let Some(name) = &args.report {
            writer = writer.with_name(name);
        }
        if let Some(css) = &css {
            writer = writer.with_css(css.clone());
        }

        println!(
            "\n{} {} ({} 个用例)\n",
            "开始执行测试集:".bold(),
            set.name.cyan().bold(),
            set.cases.len().to_string().yellow()
        );

        let report = execute(set, timeout).await?;

        let paths = writer
            .write(&report, &formats)
            .with_context(|| format!("写入报告失败: {:?}", report_dir))?;

        print_summary(&report, &report_dir, &paths);
    }
    Ok(())
}

/// 执行测试集，进度通知由独立任务驱动进度条并写入日志
async fn execute(set: TestSet, timeout: Option<Duration>) -> Result<TestReport> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("进度条模板无效")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let (sink, mut rx) = ChannelSink::channel();
    let pb = spinner.clone();
    let drain = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if event.severity == Severity::Notice {
                pb.set_message(event.message.lines().next().unwrap_or_default().to_string());
            }
            pb.suspend(|| TracingSink.emit(event.severity, &event.message));
        }
    });

    let mut ctx = ExecContext::new().with_sink(Arc::new(sink));
    if let Some(timeout) = timeout {
        ctx = ctx.with_timeout(timeout);
    }

    let runner = Runner::new(ctx);
    let result = runner.run(set).await;

    // 释放发送端后通知任务才会结束
    drop(runner);
    if let Err(e) = drain.await {
        warn!("进度通知任务异常退出: {}", e);
    }

    match &result {
        Ok(_) => spinner.finish_with_message("完成".green().to_string()),
        Err(_) => spinner.finish_with_message("失败".red().to_string()),
    }
    result.context("执行测试集失败")
}

/// HTML 报告总是生成，其余格式来自 `-X`、`-f` 或配置
fn report_formats(args: &RunArgs, config: &CliConfig) -> Result<Vec<ReportFormat>> {
    let mut formats = vec![ReportFormat::Html];
    if args.xml {
        formats.push(ReportFormat::Xml);
    }

    if args.formats.is_empty() {
        formats.extend(config.report_formats()?);
    } else {
        for f in &args.formats {
            let format = f
                .parse::<ReportFormat>()
                .with_context(|| format!("无效的报告格式: {}", f))?;
            formats.push(format);
        }
    }
    Ok(formats)
}

/// `<结果目录>/<测试集名称>_<时间>`
fn default_workdir(results_dir: &Path, set_name: &str) -> PathBuf {
    results_dir.join(format!(
        "{}_{}",
        sanitize(set_name),
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// 多个被测系统配置时每个测试集的报告子目录，如 `01_dut-a`
fn run_dir_name(index: usize, set: &TestSet) -> String {
    let label = if set.sut.name.is_empty() {
        &set.name
    } else {
        &set.sut.name
    };
    format!("{:02}_{}", index + 1, sanitize(label))
}

/// 文件名中只保留字母数字和 `-_.`
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 绝对路径原样返回，相对路径放在 `dir` 下
fn resolve_in(dir: &Path, path: &str) -> PathBuf {
    let path = expand_path(path);
    if path.is_absolute() {
        path
    } else {
        dir.join(path)
    }
}

fn print_summary(report: &TestReport, report_dir: &Path, paths: &[PathBuf]) {
    let summary = report.summary();

    println!("\n{}", "=".repeat(60));
    println!("{}", "执行报告".bold());
    println!("{}", "=".repeat(60));
    println!();

    println!("测试集: {}", report.test_set.name.cyan().bold());
    println!(
        "执行时间: {} ms",
        report.duration().num_milliseconds().to_string().yellow()
    );
    println!();

    println!("用例统计:");
    println!("  总用例: {}", summary.total.to_string().bright_blue());
    println!("  通过:   {}", summary.passed.to_string().green());
    println!("  失败:   {}", summary.failed.to_string().red());
    println!("  跳过:   {}", summary.skipped.to_string().yellow());
    println!("  未测试: {}", summary.not_tested.to_string().bright_black());
    println!();

    for case in &report.test_set.cases {
        let icon = match case.status {
            TestResult::Pass => "✓".green(),
            TestResult::Fail => "✗".red(),
            TestResult::Skipped => "⊘".yellow(),
            _ => "-".bright_black(),
        };
        println!("{} {} [{}]", icon.bold(), case.name, case.status);
    }
    println!();

    println!("报告目录: {}", report_dir.display().to_string().bright_black());
    for path in paths {
        println!("报告: {}", path.display().to_string().bright_black());
    }

    println!("{}", "=".repeat(60));
    let status = match report.status() {
        TestResult::Pass => format!("{} 测试集通过", "✓".green().bold()),
        TestResult::Fail => format!("{} 测试集失败", "✗".red().bold()),
        other => format!("{} 测试集状态: {}", "-".yellow().bold(), other),
    };
    println!("{}", status);
    println!("{}", "=".repeat(60));
}
