//! Custom Tera filters for case conversion and inflection.

use std::collections::HashMap;

use spark_core::domain::{self, CaseStyle};
use tera::{Result, Tera, Value};

/// Register every Spark filter on `tera`.
pub(crate) fn register(tera: &mut Tera) {
    tera.register_filter("pascal_case", pascal_case);
    tera.register_filter("camel_case", camel_case);
    tera.register_filter("kebab_case", kebab_case);
    tera.register_filter("snake_case", snake_case);
    tera.register_filter("pluralize_word", pluralize_word);
    tera.register_filter("singularize_word", singularize_word);
}

fn expect_str<'a>(value: &'a Value, filter: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))
}

fn cased(value: &Value, style: CaseStyle, filter: &str) -> Result<Value> {
    let s = expect_str(value, filter)?;
    if s.trim().is_empty() {
        return Ok(Value::String(String::new()));
    }
    domain::transform(s, style)
        .map(Value::String)
        .map_err(|e| tera::Error::msg(format!("{filter}: {e}")))
}

pub(crate) fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    cased(value, CaseStyle::Pascal, "pascal_case")
}

pub(crate) fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    cased(value, CaseStyle::Camel, "camel_case")
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    cased(value, CaseStyle::Kebab, "kebab_case")
}

pub(crate) fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    cased(value, CaseStyle::Snake, "snake_case")
}

pub(crate) fn pluralize_word(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = expect_str(value, "pluralize_word")?;
    Ok(Value::String(domain::pluralize(s)))
}

pub(crate) fn singularize_word(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = expect_str(value, "singularize_word")?;
    Ok(Value::String(domain::singularize(s)))
}
