//! Show 命令处理

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use atf_collector::{load_definition, Definition};

pub fn handle(input: &str) -> Result<()> {
    let definition = load_definition(Path::new(input))
        .with_context(|| format!("加载测试定义失败: {}", input))?;

    match &definition {
        Definition::Set(set) => {
            println!("{} {}\n", "测试集:".bold(), set.name.cyan().bold());
            println!("用例数: {}", set.cases.len().to_string().yellow());
            println!();
            print!("{}", set);
        }
        Definition::Plan(plan) => {
            println!("{} {}\n", "测试计划:".bold(), plan.name.cyan().bold());
            println!("用例数: {}", plan.cases.len().to_string().yellow());
            println!(
                "被测系统: {}",
                plan.configurations.len().to_string().yellow()
            );
            println!();
            print!("{}", plan);
        }
    }

    Ok(())
}
