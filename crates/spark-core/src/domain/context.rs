use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::case::{self, CaseStyle};
use crate::domain::error::DomainError;
use crate::domain::frontmatter::{Frontmatter, FrontmatterValue};
use crate::domain::subject::SubjectName;

/// A value bound in a [`RenderContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Text(String),
    Flag(bool),
    Map(BTreeMap<String, ContextValue>),
}

impl ContextValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&FrontmatterValue> for ContextValue {
    fn from(value: &FrontmatterValue) -> Self {
        match value {
            FrontmatterValue::Text(s) => Self::Text(s.clone()),
            FrontmatterValue::Flag(b) => Self::Flag(*b),
        }
    }
}

impl From<&Frontmatter> for ContextValue {
    fn from(frontmatter: &Frontmatter) -> Self {
        Self::Map(
            frontmatter
                .iter()
                .map(|(k, v)| (k.to_string(), v.into()))
                .collect(),
        )
    }
}

impl From<&BTreeMap<String, String>> for ContextValue {
    fn from(map: &BTreeMap<String, String>) -> Self {
        Self::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), Self::Text(v.clone())))
                .collect(),
        )
    }
}

/// Variables visible to a template body.
///
/// Built once per invocation from the subject name and then extended per
/// template with `filename`, `subdirectory` and `frontmatter`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    variables: BTreeMap<String, ContextValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard name variables for `subject`.
    ///
    /// | Variable           | `user avatar`  |
    /// |--------------------|----------------|
    /// | `name`             | `user avatar`  |
    /// | `pascal_case_name` | `UserAvatar`   |
    /// | `camel_case_name`  | `userAvatar`   |
    /// | `kebab_case_name`  | `user-avatar`  |
    /// | `snake_case_name`  | `user_avatar`  |
    /// | `plural_name`      | `UserAvatars`  |
    pub fn for_subject(generator: &str, subject: &SubjectName) -> Result<Self, DomainError> {
        let leaf = subject.leaf();
        let pascal = case::transform(leaf, CaseStyle::Pascal)?;

        Ok(Self::new()
            .with("generator", generator)
            .with("name", leaf)
            .with("camel_case_name", case::transform(leaf, CaseStyle::Camel)?)
            .with("kebab_case_name", case::transform(leaf, CaseStyle::Kebab)?)
            .with("snake_case_name", case::transform(leaf, CaseStyle::Snake)?)
            .with("plural_name", case::pluralize(&pascal))
            .with("pascal_case_name", pascal))
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.variables.get(key)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ContextValue::as_text)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_name_variables() {
        let subject = SubjectName::parse("forms/user avatar").unwrap();
        let ctx = RenderContext::for_subject("component", &subject).unwrap();

        assert_eq!(ctx.get_text("name"), Some("user avatar"));
        assert_eq!(ctx.get_text("pascal_case_name"), Some("UserAvatar"));
        assert_eq!(ctx.get_text("camel_case_name"), Some("userAvatar"));
        assert_eq!(ctx.get_text("kebab_case_name"), Some("user-avatar"));
        assert_eq!(ctx.get_text("snake_case_name"), Some("user_avatar"));
        assert_eq!(ctx.get_text("plural_name"), Some("UserAvatars"));
        assert_eq!(ctx.get_text("generator"), Some("component"));
    }

    #[test]
    fn frontmatter_becomes_nested_map() {
        let meta = Frontmatter::new().with("type", "stack").with("dark", true);
        let ctx = RenderContext::new().with("frontmatter", &meta);

        let Some(ContextValue::Map(map)) = ctx.get("frontmatter") else {
            panic!("frontmatter should be a map");
        };
        assert_eq!(map.get("type"), Some(&ContextValue::Text("stack".into())));
        assert_eq!(map.get("dark"), Some(&ContextValue::Flag(true)));
    }

    #[test]
    fn serializes_as_plain_object() {
        let ctx = RenderContext::new().with("name", "x").with("flag", false);
        let json = serde_yaml::to_string(&ctx).unwrap();
        assert!(json.contains("name: x"));
        assert!(json.contains("flag: false"));
    }
}
