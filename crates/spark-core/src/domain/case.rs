//! Identifier casing and pluralization.
//!
//! Word splitting is delegated to `heck`: `-`, `_`, whitespace and every other
//! non-alphanumeric character separate words, as do lower-to-upper
//! transitions (`userAvatar`) and acronym boundaries (`HTTPRequest`).
//!
//! | Style    | `user avatar` | Notes                                  |
//! |----------|---------------|----------------------------------------|
//! | `pascal` | `UserAvatar`  | built-in fallback                      |
//! | `camel`  | `userAvatar`  |                                        |
//! | `kebab`  | `user-avatar` |                                        |
//! | `snake`  | `user_avatar` |                                        |
//! | `none`   | `user avatar` | trimmed, otherwise untouched           |
//! | `auto`   | -             | whatever the template declares         |

use std::fmt;
use std::str::FromStr;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use serde::Serialize;

use crate::domain::error::DomainError;

/// Upper bound on re-application passes in [`transform`].
const MAX_CASE_PASSES: usize = 4;

/// A casing convention for generated filenames and identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStyle {
    /// Defer to the template's declared `case`, else pascal.
    #[default]
    Auto,
    Pascal,
    Camel,
    Kebab,
    Snake,
    None,
}

impl CaseStyle {
    pub const ALL: [CaseStyle; 6] = [
        CaseStyle::Auto,
        CaseStyle::Pascal,
        CaseStyle::Camel,
        CaseStyle::Kebab,
        CaseStyle::Snake,
        CaseStyle::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Pascal => "pascal",
            Self::Camel => "camel",
            Self::Kebab => "kebab",
            Self::Snake => "snake",
            Self::None => "none",
        }
    }

    /// Resolve `auto` against the style a template declares.
    ///
    /// Concrete styles resolve to themselves. `auto` takes the declared
    /// style when there is a concrete one and falls back to pascal.
    pub fn resolve(self, declared: Option<CaseStyle>) -> CaseStyle {
        match self {
            Self::Auto => match declared {
                Some(style) if style != Self::Auto => style,
                _ => Self::Pascal,
            },
            concrete => concrete,
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "pascal" | "pascalcase" => Ok(Self::Pascal),
            "camel" | "camelcase" => Ok(Self::Camel),
            "kebab" | "kebabcase" => Ok(Self::Kebab),
            "snake" | "snakecase" => Ok(Self::Snake),
            "none" | "as-is" => Ok(Self::None),
            _ => Err(DomainError::InvalidCaseStyle { value: s.into() }),
        }
    }
}

/// Convert `input` to `style`.
///
/// `auto` without template context behaves as pascal; call
/// [`CaseStyle::resolve`] first when a declared style is known.
///
/// # Errors
///
/// [`DomainError::InvalidSubjectName`] when the trimmed input is empty or
/// contains no letter or digit to build a word from.
pub fn transform(input: &str, style: CaseStyle) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidSubjectName {
            name: input.into(),
            reason: "name cannot be empty".into(),
        });
    }

    let converted = match style {
        CaseStyle::None => trimmed.to_string(),
        CaseStyle::Auto | CaseStyle::Pascal => to_fixed_point(trimmed, |s| s.to_pascal_case()),
        CaseStyle::Camel => to_fixed_point(trimmed, |s| s.to_lower_camel_case()),
        CaseStyle::Kebab => to_fixed_point(trimmed, |s| s.to_kebab_case()),
        CaseStyle::Snake => to_fixed_point(trimmed, |s| s.to_snake_case()),
    };

    if converted.is_empty() {
        return Err(DomainError::InvalidSubjectName {
            name: input.into(),
            reason: "name must contain at least one letter or digit".into(),
        });
    }

    Ok(converted)
}

// heck folds a run of capitals into one acronym word, so a second pass can
// still change the output ("a b c" -> "ABC" -> "Abc").
fn to_fixed_point(input: &str, convert: impl Fn(&str) -> String) -> String {
    let mut current = convert(input);
    for _ in 0..MAX_CASE_PASSES {
        let next = convert(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Check the precondition every generator applies to its subject name.
pub fn validate_subject(input: &str) -> Result<(), DomainError> {
    if !input.chars().any(char::is_alphanumeric) {
        let reason = if input.trim().is_empty() {
            "name cannot be empty"
        } else {
            "name must contain at least one letter or digit"
        };
        return Err(DomainError::InvalidSubjectName {
            name: input.into(),
            reason: reason.into(),
        });
    }
    Ok(())
}

/// Naive English plural of the last word in `word`.
///
/// | Input    | Output     |
/// |----------|------------|
/// | `User`   | `Users`    |
/// | `Box`    | `Boxes`    |
/// | `Story`  | `Stories`  |
/// | `Day`    | `Days`     |
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.is_empty() {
        return String::new();
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{word}es");
    }
    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    format!("{word}s")
}

/// Inverse of [`pluralize`] for the same rule set.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ["ches", "shes", "xes", "zes", "sses"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        return word[..word.len() - 2].to_string();
    }
    if lower.ends_with('s') && !lower.ends_with("ss") && word.len() > 1 {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut chars = lower.chars().rev();
    chars.next();
    matches!(chars.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}
