//! 测试定义加载
//!
//! 一个文件描述一个测试集或一个测试计划：
//! - JSON/YAML：顶层为 `TestSet` 或 `TestPlan` 键包裹的对象，没有包裹时视为测试集
//! - XML：根元素为 `<TestSet>` 或 `<TestPlan>`

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use atf_engine::{TestPlan, TestSet};

use crate::{CollectError, Result, SourceFormat};

const TEST_SET_ROOT: &str = "TestSet";
const TEST_PLAN_ROOT: &str = "TestPlan";

/// 加载得到的测试定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Set(TestSet),
    Plan(TestPlan),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Set(set) => &set.name,
            Definition::Plan(plan) => &plan.name,
        }
    }

    /// 转换为可执行的测试集，测试计划会被复制 (不带被测系统信息)
    pub fn into_test_set(self) -> TestSet {
        match self {
            Definition::Set(set) => set,
            Definition::Plan(plan) => plan.to_test_set(),
        }
    }

    /// 转换为可执行的测试集列表，测试计划按被测系统配置各复制一份
    pub fn into_test_sets(self) -> Vec<TestSet> {
        match self {
            Definition::Set(set) => vec![set],
            Definition::Plan(plan) => plan.to_test_sets(),
        }
    }
}

/// 从文件加载测试定义
pub fn load_definition(path: &Path) -> Result<Definition> {
    let format = SourceFormat::from_path(path)?;
    info!("加载测试定义: {:?} ({})", path, format);

    let content = fs::read_to_string(path)?;
    parse_definition(&content, format)
}

/// 从字符串解析测试定义
pub fn parse_definition(content: &str, format: SourceFormat) -> Result<Definition> {
    let definition = match format {
        SourceFormat::Json => parse_json(content)?,
        SourceFormat::Yaml => parse_yaml(content)?,
        SourceFormat::Xml => parse_xml(content)?,
    };

    debug!("解析完成: {}", definition.name());
    Ok(definition)
}

/// 加载测试集 (文件必须描述测试集)
pub fn collect_test_set(path: &Path) -> Result<TestSet> {
    match load_definition(path)? {
        Definition::Set(set) => Ok(set),
        Definition::Plan(plan) => Err(CollectError::UnknownRoot(format!(
            "期望 {}，实际为 {} \"{}\"",
            TEST_SET_ROOT, TEST_PLAN_ROOT, plan.name
        ))),
    }
}

/// 加载测试计划 (文件必须描述测试计划)
pub fn collect_test_plan(path: &Path) -> Result<TestPlan> {
    match load_definition(path)? {
        Definition::Plan(plan) => Ok(plan),
        Definition::Set(set) => Err(CollectError::UnknownRoot(format!(
            "期望 {}，实际为 {} \"{}\"",
            TEST_PLAN_ROOT, TEST_SET_ROOT, set.name
        ))),
    }
}

/// 加载单个可执行的测试集，测试计划会被复制为测试集
///
/// 测试计划最多只能有一个被测系统配置，多个配置时使用 [`collect_all`]。
/// 不包含任何用例的测试集在这里就被拒绝。
pub fn collect(path: &Path) -> Result<TestSet> {
    let definition = load_definition(path)?;
    if let Definition::Plan(plan) = &definition {
        if plan.configurations.len() > 1 {
            return Err(CollectError::MultipleConfigurations {
                plan: plan.name.clone(),
                count: plan.configurations.len(),
            });
        }
    }

    let mut sets = definition.into_test_sets();
    let set = sets.pop().unwrap_or_default();
    set.validate()?;
    Ok(set)
}

/// 加载全部可执行的测试集，测试计划的每个被测系统配置对应一个测试集
///
/// 返回的测试集均已通过校验，顺序与配置声明顺序一致。
pub fn collect_all(path: &Path) -> Result<Vec<TestSet>> {
    let definition = load_definition(path)?;
    let name = definition.name().to_string();

    let sets = definition.into_test_sets();
    for set in &sets {
        set.validate()?;
    }
    info!("\"{}\" 收集到 {} 个测试集", name, sets.len());
    Ok(sets)
}

fn parse_json(content: &str) -> Result<Definition> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    let root = value
        .as_object()
        .filter(|map| map.len() == 1)
        .and_then(|map| map.keys().next().cloned());

    let definition = match root.as_deref() {
        Some(TEST_PLAN_ROOT) => {
            Definition::Plan(serde_json::from_value(value[TEST_PLAN_ROOT].clone())?)
        }
        Some(TEST_SET_ROOT) => {
            Definition::Set(serde_json::from_value(value[TEST_SET_ROOT].clone())?)
        }
        _ => Definition::Set(serde_json::from_value(value)?),
    };
    Ok(definition)
}

fn parse_yaml(content: &str) -> Result<Definition> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;

    let root = value
        .as_mapping()
        .filter(|map| map.len() == 1)
        .and_then(|map| map.keys().next())
        .and_then(|key| key.as_str())
        .map(str::to_string);

    let definition = match root.as_deref() {
        Some(TEST_PLAN_ROOT) => {
            Definition::Plan(serde_yaml::from_value(value[TEST_PLAN_ROOT].clone())?)
        }
        Some(TEST_SET_ROOT) => {
            Definition::Set(serde_yaml::from_value(value[TEST_SET_ROOT].clone())?)
        }
        _ => Definition::Set(serde_yaml::from_value(value)?),
    };
    Ok(definition)
}

fn parse_xml(content: &str) -> Result<Definition> {
    match xml_root(content)?.as_str() {
        TEST_SET_ROOT => Ok(Definition::Set(from_xml(content)?)),
        TEST_PLAN_ROOT => Ok(Definition::Plan(from_xml(content)?)),
        other => Err(CollectError::UnknownRoot(other.to_string())),
    }
}

fn from_xml<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(quick_xml::de::from_str(content)?)
}

/// 读取 XML 根元素名称
fn xml_root(content: &str) -> Result<String> {
    let mut reader = Reader::from_str(content);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Eof => return Err(CollectError::UnknownRoot("(空文档)".to_string())),
            _ => {}
        }
    }
}
