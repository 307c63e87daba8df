//! ATF 配置收集
//!
//! 从测试定义文件加载测试集或测试计划，交给执行引擎运行。
//! 文件格式由扩展名决定：
//! - `.json` - JSON
//! - `.yaml` / `.yml` - YAML
//! - `.xml` - XML，根元素为 `<TestSet>` 或 `<TestPlan>`
//!
//! # 示例
//!
//! ```ignore
//! use std::path::Path;
//!
//! let set = atf_collector::collect(Path::new("smoke.yaml"))?;
//! println!("{} 个测试用例", set.cases.len());
//! ```

mod error;
mod format;
mod loader;

pub use error::{CollectError, Result};
pub use format::SourceFormat;
pub use loader::{
    collect, collect_all, collect_test_plan, collect_test_set, load_definition, parse_definition,
    Definition,
};
