//! ATF CLI 应用

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

mod commands;
mod config;
mod logging;

#[derive(Parser)]
#[command(name = "atf")]
#[command(about = "ATF - 测试自动化框架", long_about = None)]
#[command(version)]
struct Cli {
    /// 控制台日志级别
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行测试集或测试计划
    Run(commands::run::RunArgs),

    /// 显示测试定义，不执行
    Show {
        /// 测试定义文件 (.json/.yaml/.yml/.xml)
        #[arg(short, long)]
        input: String,
    },

    /// 显示脚本类型和执行命令行
    Classify {
        /// 脚本路径
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::handle(args, &cli.log_level).await?,
        Commands::Show { input } => {
            logging::init(&cli.log_level, None)?;
            info!("ATF CLI 启动");
            commands::show::handle(&input)?
        }
        Commands::Classify { paths } => {
            logging::init(&cli.log_level, None)?;
            commands::classify::handle(&paths)
        }
    }

    Ok(())
}
