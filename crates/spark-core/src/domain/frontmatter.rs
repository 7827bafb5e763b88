//! Template front-matter.
//!
//! A template may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! dir: app/components
//! case: pascal
//! ---
//! export const {{ pascal_case_name }} = () => null
//! ```
//!
//! Only `dir`, `filename` and `case` have meaning to the engine. Every other
//! key is kept and handed to the template as `frontmatter.<key>`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_yaml::Value;

use crate::domain::case::CaseStyle;
use crate::domain::error::DomainError;

const DELIMITER: &str = "---";

/// A single front-matter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Text(String),
    Flag(bool),
}

impl FrontmatterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FrontmatterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FrontmatterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FrontmatterValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Parsed metadata of one template file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Frontmatter {
    entries: BTreeMap<String, FrontmatterValue>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FrontmatterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FrontmatterValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.entries.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FrontmatterValue::as_text)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(FrontmatterValue::as_flag)
    }

    /// Default output directory, relative to the project root.
    pub fn dir(&self) -> Option<&str> {
        self.text("dir").filter(|s| !s.trim().is_empty())
    }

    /// Output filename pattern. Rendered as a template before use.
    pub fn filename(&self) -> Option<&str> {
        self.text("filename").filter(|s| !s.trim().is_empty())
    }

    /// Declared casing style.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidCaseStyle`] if `case` names no known style.
    pub fn case(&self) -> Result<Option<CaseStyle>, DomainError> {
        self.text("case").map(str::parse::<CaseStyle>).transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split a template into its front-matter and body.
///
/// A file that does not open with a `---` line has empty front-matter and is
/// all body. The returned error carries no template name; callers attach it
/// with [`DomainError::in_template`].
///
/// # Errors
///
/// [`DomainError::MalformedFrontmatter`] when the opening delimiter has no
/// closing one, the block is not valid YAML, or it is not a mapping.
pub fn parse(raw: &str) -> Result<(Frontmatter, String), DomainError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(rest) = strip_opening(raw) else {
        return Ok((Frontmatter::default(), raw.to_string()));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let metadata = parse_block(&rest[..offset])?;
            let body = &rest[offset + line.len()..];
            return Ok((metadata, body.to_string()));
        }
        offset += line.len();
    }

    Err(malformed("opening '---' is never closed"))
}

fn strip_opening(raw: &str) -> Option<&str> {
    let first_len = raw.find('\n').map_or(raw.len(), |i| i + 1);
    (raw[..first_len].trim_end() == DELIMITER).then(|| &raw[first_len..])
}

fn parse_block(block: &str) -> Result<Frontmatter, DomainError> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    let value: Value = serde_yaml::from_str(block).map_err(|e| malformed(e.to_string()))?;
    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Frontmatter::default()),
        _ => return Err(malformed("front-matter must be a mapping of keys to values")),
    };

    let mut frontmatter = Frontmatter::default();
    for (key, value) in mapping {
        let key = match key {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return Err(malformed("front-matter keys must be scalars")),
        };
        if let Some(value) = convert_value(value)? {
            frontmatter.entries.insert(key, value);
        }
    }

    Ok(frontmatter)
}

fn convert_value(value: Value) -> Result<Option<FrontmatterValue>, DomainError> {
    Ok(match value {
        Value::Null => None,
        Value::Bool(b) => Some(FrontmatterValue::Flag(b)),
        Value::String(s) => Some(FrontmatterValue::Text(s)),
        Value::Number(n) => Some(FrontmatterValue::Text(n.to_string())),
        Value::Tagged(tagged) => convert_value(tagged.value)?,
        nested @ (Value::Sequence(_) | Value::Mapping(_)) => {
            let text = serde_yaml::to_string(&nested).map_err(|e| malformed(e.to_string()))?;
            Some(FrontmatterValue::Text(text.trim_end().to_string()))
        }
    })
}

fn malformed(reason: impl Into<String>) -> DomainError {
    DomainError::MalformedFrontmatter {
        template: String::new(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_marker_whole_file_is_body() {
        let raw = "export const x = 1\n";
        let (meta, body) = parse(raw).unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn splits_metadata_and_body() {
        let raw = "---\ndir: app/components\ncase: kebab\ndark: true\n---\nbody line\n";
        let (meta, body) = parse(raw).unwrap();

        assert_eq!(meta.dir(), Some("app/components"));
        assert_eq!(meta.case().unwrap(), Some(CaseStyle::Kebab));
        assert_eq!(meta.flag("dark"), Some(true));
        assert_eq!(body, "body line\n");
    }

    #[test]
    fn accepts_crlf_delimiters() {
        let raw = "---\r\nfilename: index.ts\r\n---\r\nbody";
        let (meta, body) = parse(raw).unwrap();
        assert_eq!(meta.filename(), Some("index.ts"));
        assert_eq!(body, "body");
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let (meta, _) = parse("---\ntype: stack\ncount: 3\n---\n").unwrap();
        assert_eq!(meta.text("type"), Some("stack"));
        assert_eq!(meta.text("count"), Some("3"));
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn null_values_are_absent() {
        let (meta, _) = parse("---\ndir:\nfilename: ~\n---\n").unwrap();
        assert!(meta.is_empty());
        assert_eq!(meta.dir(), None);
    }

    #[test]
    fn sequences_are_kept_as_text() {
        let (meta, _) = parse("---\ntags: [a, b]\n---\n").unwrap();
        let tags = meta.text("tags").unwrap();
        assert!(tags.contains('a') && tags.contains('b'));
    }

    #[test]
    fn empty_block_is_empty_metadata() {
        let (meta, body) = parse("---\n---\nbody").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn unclosed_block_is_malformed() {
        let err = parse("---\ndir: app\nbody without end").unwrap_err();
        assert!(matches!(err, DomainError::MalformedFrontmatter { .. }));

        let err = parse("---").unwrap_err();
        assert!(matches!(err, DomainError::MalformedFrontmatter { .. }));
    }

    #[test]
    fn non_mapping_block_is_malformed() {
        let err = parse("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, DomainError::MalformedFrontmatter { .. }));
    }

    #[test]
    fn invalid_yaml_is_malformed() {
        let err = parse("---\ndir: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, DomainError::MalformedFrontmatter { .. }));
    }

    #[test]
    fn unknown_case_style_is_reported_by_accessor() {
        let (meta, _) = parse("---\ncase: title\n---\n").unwrap();
        assert!(matches!(meta.case(), Err(DomainError::InvalidCaseStyle { .. })));
    }

    #[test]
    fn marker_later_in_file_is_body() {
        let raw = "line\n---\nnot: meta\n---\n";
        let (meta, body) = parse(raw).unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, raw);
    }
}
