//! 通知模板渲染
//!
//! 支持 `{{variable}}` 占位符语法。
//!
//! ## 使用示例
//!
//! ```ignore
//! use notification_dispatch::template::{PlaceholderRenderer, TemplateRenderer};
//! use serde_json::json;
//!
//! let mut variables = Variables::new();
//! variables.insert("name".to_string(), json!("Alice"));
//! variables.insert("count".to_string(), json!(3));
//!
//! let rendered = PlaceholderRenderer::new().render("Hi {{name}}, {{count}} new", &variables);
//! // 输出: "Hi Alice, 3 new"
//! ```

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::types::Variables;

/// 渲染时匹配任意不含花括号的占位符
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"));

/// 变量名只允许字母、数字、下划线
static VARIABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("variable pattern is valid"));

/// 模板渲染器
///
/// Handler 只在变量非空时调用渲染器
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, variables: &Variables) -> String;
}

/// 默认渲染器
///
/// 把 `{{key}}` 原样替换为变量值：字符串不带引号，其他值使用 JSON 文本。
/// 模板中没有对应变量的占位符保留原样。
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render(&self, template: &str, variables: &Variables) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
                Some(value) => stringify(value),
                None => {
                    debug!(variable = &caps[1], "模板变量未提供，保留原样");
                    caps[0].to_string()
                }
            })
            .into_owned()
    }
}

/// 变量值转文本
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 提取模板中的所有变量名（按出现顺序，可能重复）
pub fn extract_placeholders(template: &str) -> Vec<String> {
    VARIABLE_NAME
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// 找出模板中引用了但变量表里没有的变量名
pub fn missing_placeholders(template: &str, variables: &Variables) -> Vec<String> {
    let mut missing = Vec::new();
    for name in extract_placeholders(template) {
        if !variables.contains_key(&name) && !missing.contains(&name) {
            missing.push(name);
        }
    }
    missing
}
