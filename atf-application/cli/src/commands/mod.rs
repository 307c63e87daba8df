//! CLI 命令处理模块

pub mod classify;
pub mod run;
pub mod show;
