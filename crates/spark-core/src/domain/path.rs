//! Output path resolution.
//!
//! Precedence for each part of the path, highest first:
//!
//! | Part      | CLI        | Front-matter | Fallback                    |
//! |-----------|------------|--------------|-----------------------------|
//! | directory | `--dir`    | `dir`        | `app/<kind>s`               |
//! | casing    | `--case`   | `case`       | pascal                      |
//! | filename  | -          | `filename`   | template name, `NAME` swapped |
//!
//! The resolved casing applies to both the filename and the subject's
//! subdirectory segments. All checks are lexical: nothing here touches the
//! filesystem.

use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;
use crate::domain::subject::{SubjectName, has_drive_prefix};

/// Placeholder replaced by the cased subject in template file names.
pub const NAME_TOKEN: &str = "NAME";

/// Suffix stripped from template file names.
pub const TEMPLATE_SUFFIX: &str = ".tera";

/// Inputs to [`resolve`] for one template.
///
/// `frontmatter_dir` and `frontmatter_filename` are expected to be already
/// rendered.
#[derive(Debug, Clone, Copy)]
pub struct PathRequest<'a> {
    pub generator: &'a str,
    pub template: &'a str,
    pub subject: &'a SubjectName,
    /// Leaf of the subject in the resolved casing.
    pub filename_stem: &'a str,
    /// Subject subdirectory in the resolved casing.
    pub subdirectory: &'a str,
    pub dir_override: Option<&'a str>,
    pub frontmatter_dir: Option<&'a str>,
    pub frontmatter_filename: Option<&'a str>,
}

/// Where one template's output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Normalized, relative to the project root.
    pub relative: PathBuf,
    /// `project_root` joined with `relative`.
    pub absolute: PathBuf,
}

impl ResolvedPath {
    pub fn file_name(&self) -> Option<&str> {
        self.relative.file_name().and_then(|n| n.to_str())
    }
}

/// The conventional directory of a generator kind.
pub fn fallback_dir(generator: &str) -> String {
    format!("app/{generator}s")
}

/// Output filename derived from the template's own name.
///
/// `NAME.tsx.tera` becomes `UserAvatar.tsx`; nested template paths keep
/// their directories. The token is swapped for the whole cased stem, so text
/// around it is kept as-is: `useNAME.ts.tera` gives `useSession.ts` in pascal
/// case but `usesession.ts` in camel case. Templates that need a prefix in a
/// non-pascal style set `filename` in their front-matter instead.
pub fn default_filename(template: &str, stem: &str) -> String {
    let template = template.replace('\\', "/");
    let name = template.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(&template);
    name.replace(NAME_TOKEN, stem)
}

/// Compute the output path of one template.
///
/// # Errors
///
/// [`DomainError::PathEscape`] if the subject is rooted, its subdirectory
/// climbs above the target directory, or the joined path leaves
/// `project_root`.
pub fn resolve(project_root: &Path, request: &PathRequest<'_>) -> Result<ResolvedPath, DomainError> {
    if request.subject.is_rooted() {
        return Err(escape(request.subject.raw()));
    }
    // the subject may only descend from the directory it is generated into
    normalize(request.subdirectory).map_err(|_| escape(request.subject.raw()))?;

    let dir = request
        .dir_override
        .or(request.frontmatter_dir)
        .map(str::to_string)
        .unwrap_or_else(|| fallback_dir(request.generator));

    let filename = request
        .frontmatter_filename
        .map(str::to_string)
        .unwrap_or_else(|| default_filename(request.template, request.filename_stem));

    let joined = [dir.as_str(), request.subdirectory, filename.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    let relative = normalize(&joined)?;
    if relative.as_os_str().is_empty() {
        return Err(escape(&joined));
    }

    Ok(ResolvedPath {
        absolute: project_root.join(&relative),
        relative,
    })
}

/// Lexically normalize a `/`- or `\`-separated relative path.
///
/// `.` segments are dropped and `..` pops a segment. Absolute paths, drive
/// prefixes and any `..` that climbs past the start fail with
/// [`DomainError::PathEscape`]. An empty input normalizes to an empty path.
pub fn normalize(path: &str) -> Result<PathBuf, DomainError> {
    let unified = path.trim().replace('\\', "/");
    if unified.starts_with('/') || has_drive_prefix(&unified) || Path::new(path).is_absolute() {
        return Err(escape(path));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(escape(path));
                }
            }
            other => segments.push(other),
        }
    }

    Ok(segments.iter().collect())
}

fn escape(path: &str) -> DomainError {
    DomainError::PathEscape { path: path.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(subject: &'a SubjectName, stem: &'a str, subdir: &'a str) -> PathRequest<'a> {
        PathRequest {
            generator: "component",
            template: "NAME.tsx.tera",
            subject,
            filename_stem: stem,
            subdirectory: subdir,
            dir_override: None,
            frontmatter_dir: None,
            frontmatter_filename: None,
        }
    }

    #[test]
    fn falls_back_to_conventional_directory() {
        let subject = SubjectName::parse("UserAvatar").unwrap();
        let resolved = resolve(Path::new("/proj"), &request(&subject, "UserAvatar", "")).unwrap();

        assert_eq!(resolved.relative, PathBuf::from("app/components/UserAvatar.tsx"));
        assert_eq!(resolved.absolute, PathBuf::from("/proj/app/components/UserAvatar.tsx"));
        assert_eq!(resolved.file_name(), Some("UserAvatar.tsx"));
    }

    #[test]
    fn cli_dir_beats_frontmatter_dir() {
        let subject = SubjectName::parse("UserAvatar").unwrap();
        let mut req = request(&subject, "UserAvatar", "");
        req.frontmatter_dir = Some("app/widgets");
        assert_eq!(
            resolve(Path::new("/p"), &req).unwrap().relative,
            PathBuf::from("app/widgets/UserAvatar.tsx")
        );

        req.dir_override = Some("src/ui");
        assert_eq!(
            resolve(Path::new("/p"), &req).unwrap().relative,
            PathBuf::from("src/ui/UserAvatar.tsx")
        );
    }

    #[test]
    fn frontmatter_filename_replaces_default() {
        let subject = SubjectName::parse("UserAvatar").unwrap();
        let mut req = request(&subject, "UserAvatar", "");
        req.frontmatter_filename = Some("index.ts");
        assert_eq!(
            resolve(Path::new("/p"), &req).unwrap().relative,
            PathBuf::from("app/components/index.ts")
        );
    }

    #[test]
    fn subject_subdirectory_is_nested_under_dir() {
        let subject = SubjectName::parse("forms/TextField").unwrap();
        let resolved = resolve(Path::new("/p"), &request(&subject, "TextField", "Forms")).unwrap();
        assert_eq!(
            resolved.relative,
            PathBuf::from("app/components/Forms/TextField.tsx")
        );
    }

    #[test]
    fn traversal_in_subject_escapes() {
        let subject = SubjectName::parse("../../x").unwrap();
        let err = resolve(Path::new("/p"), &request(&subject, "X", "../..")).unwrap_err();
        assert!(matches!(err, DomainError::PathEscape { .. }));
    }

    #[test]
    fn rooted_subject_escapes() {
        let subject = SubjectName::parse("/etc/passwd").unwrap();
        let err = resolve(Path::new("/p"), &request(&subject, "Passwd", "Etc")).unwrap_err();
        assert!(matches!(err, DomainError::PathEscape { .. }));
    }

    #[test]
    fn escaping_dir_override_is_rejected() {
        let subject = SubjectName::parse("UserAvatar").unwrap();
        for dir in ["../outside", "/abs", "C:\\win", "app/../../x"] {
            let mut req = request(&subject, "UserAvatar", "");
            req.dir_override = Some(dir);
            assert!(
                matches!(resolve(Path::new("/p"), &req), Err(DomainError::PathEscape { .. })),
                "{dir} should escape"
            );
        }
    }

    #[test]
    fn inner_parent_segments_are_folded() {
        let subject = SubjectName::parse("UserAvatar").unwrap();
        let mut req = request(&subject, "UserAvatar", "");
        req.dir_override = Some("app/./tmp/../components\\shared");
        assert_eq!(
            resolve(Path::new("/p"), &req).unwrap().relative,
            PathBuf::from("app/components/shared/UserAvatar.tsx")
        );
    }

    #[test]
    fn default_filename_strips_suffix_and_swaps_token() {
        assert_eq!(default_filename("NAME.tsx.tera", "Foo"), "Foo.tsx");
        assert_eq!(default_filename("NAME/NAME.test.tsx", "Foo"), "Foo/Foo.test.tsx");
        assert_eq!(default_filename("styles.ts.tera", "Foo"), "styles.ts");
    }

    #[test]
    fn default_filename_keeps_text_around_the_token() {
        assert_eq!(default_filename("useNAME.ts.tera", "Session"), "useSession.ts");
        assert_eq!(default_filename("useNAME.ts.tera", "session"), "usesession.ts");
    }
}
