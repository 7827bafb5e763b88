//! Integration tests for spark-core.
//!
//! The orchestrator runs against small in-process fakes: a map-backed
//! filesystem, a fixed catalog and a renderer that only understands
//! `{{ variable }}`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use spark_core::application::ports::{
    Filesystem, GeneratorCatalog, TemplateRenderer, WriteMode, WriteOutcome,
};
use spark_core::application::{ApplicationError, FsErrorKind, GenerateOptions, GeneratorService};
use spark_core::domain::{
    DomainError, FailureKind, FileStatus, GeneratorSpec, RenderContext,
};
use spark_core::error::{SparkError, SparkResult};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Clone, Default)]
struct FakeFs {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl FakeFs {
    fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.as_bytes().to_vec());
        self
    }

    fn read(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(Path::new(path))
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    fn count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl Filesystem for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, _path: &Path) -> bool {
        false
    }

    fn create_dir_all(&self, _path: &Path) -> SparkResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8], mode: WriteMode) -> SparkResult<WriteOutcome> {
        let mut files = self.files.lock().unwrap();
        let existed = files.contains_key(path);
        match (existed, mode) {
            (true, WriteMode::CreateNew) => Ok(WriteOutcome::AlreadyExists),
            (true, WriteMode::Overwrite) => {
                files.insert(path.to_path_buf(), content.to_vec());
                Ok(WriteOutcome::Overwritten)
            }
            (false, _) => {
                files.insert(path.to_path_buf(), content.to_vec());
                Ok(WriteOutcome::Created)
            }
        }
    }

    fn set_permissions(&self, _path: &Path, _executable: bool) -> SparkResult<()> {
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> SparkResult<()> {
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> SparkResult<()> {
        let mut files = self.files.lock().unwrap();
        let moved: Vec<PathBuf> = files.keys().filter(|p| p.starts_with(from)).cloned().collect();
        for path in moved {
            if let (Some(content), Ok(rest)) = (files.remove(&path), path.strip_prefix(from)) {
                files.insert(to.join(rest), content);
            }
        }
        Ok(())
    }
}

struct FixedCatalog(Vec<GeneratorSpec>);

impl GeneratorCatalog for FixedCatalog {
    fn kinds(&self) -> SparkResult<Vec<String>> {
        Ok(self.0.iter().map(|s| s.kind.clone()).collect())
    }

    fn load(&self, kind: &str) -> SparkResult<Option<GeneratorSpec>> {
        Ok(self.0.iter().find(|s| s.kind == kind).cloned())
    }
}

/// Replaces `{{ name }}` with top-level text variables.
struct PlaceholderRenderer;

impl TemplateRenderer for PlaceholderRenderer {
    fn render(
        &self,
        template: &str,
        body: &str,
        context: &RenderContext,
    ) -> Result<String, DomainError> {
        let mut out = String::new();
        let mut rest = body;
        while let Some(start) = rest.find("{{") {
            let Some(end) = rest[start..].find("}}") else {
                return Err(DomainError::TemplateSyntax {
                    template: template.into(),
                    reason: "unclosed '{{'".into(),
                });
            };
            out.push_str(&rest[..start]);
            let variable = rest[start + 2..start + end].trim();
            let value = context.get_text(variable).ok_or_else(|| {
                DomainError::UndefinedTemplateVariable {
                    variable: variable.into(),
                    template: template.into(),
                }
            })?;
            out.push_str(value);
            rest = &rest[start + end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn service(spec: GeneratorSpec, fs: &FakeFs) -> GeneratorService {
    GeneratorService::new(
        Box::new(FixedCatalog(vec![spec])),
        Box::new(PlaceholderRenderer),
        Box::new(fs.clone()),
        "/app",
    )
}

fn component() -> GeneratorSpec {
    GeneratorSpec::new("component").with_template(
        "NAME.tsx.tera",
        "---\ndir: app/components\n---\nexport const {{ pascal_case_name }} = () => null\n",
    )
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn component_for_user_avatar_creates_one_file() {
    let fs = FakeFs::default();
    let result = service(component(), &fs)
        .run("component", "UserAvatar", &GenerateOptions::default())
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].status, FileStatus::Created);
    assert_eq!(
        result.entries[0].path.as_deref(),
        Some(Path::new("app/components/UserAvatar.tsx"))
    );
    assert_eq!(
        fs.read("/app/app/components/UserAvatar.tsx").unwrap(),
        "export const UserAvatar = () => null\n"
    );
}

#[test]
fn traversal_subject_never_escapes() {
    let fs = FakeFs::default();
    let result = service(component(), &fs)
        .run("component", "../../x", &GenerateOptions::default())
        .unwrap();

    assert!(result.has_failure(FailureKind::PathEscape));
    assert_eq!(fs.count(), 0);
}

#[test]
fn escaping_dir_override_fails_the_file() {
    let fs = FakeFs::default();
    let options = GenerateOptions {
        dir: Some("../../etc".into()),
        ..Default::default()
    };
    let result = service(component(), &fs)
        .run("component", "Foo", &options)
        .unwrap();

    assert_eq!(result.entries[0].failure_kind(), Some(FailureKind::PathEscape));
    assert_eq!(fs.count(), 0);
}

#[test]
fn existing_file_is_skipped_byte_for_byte() {
    let fs = FakeFs::default().with_file("/app/app/components/UserAvatar.tsx", "// mine");
    let result = service(component(), &fs)
        .run("component", "UserAvatar", &GenerateOptions::default())
        .unwrap();

    assert_eq!(result.entries[0].status, FileStatus::SkippedExists);
    assert!(result.is_success());
    assert_eq!(fs.read("/app/app/components/UserAvatar.tsx").unwrap(), "// mine");
}

#[test]
fn update_overwrites_existing_file() {
    let fs = FakeFs::default().with_file("/app/app/components/UserAvatar.tsx", "// mine");
    let options = GenerateOptions {
        update: true,
        ..Default::default()
    };
    let result = service(component(), &fs)
        .run("component", "UserAvatar", &options)
        .unwrap();

    assert_eq!(result.entries[0].status, FileStatus::Overwritten);
    assert!(
        fs.read("/app/app/components/UserAvatar.tsx")
            .unwrap()
            .contains("export const UserAvatar")
    );
}

#[test]
fn one_broken_template_does_not_stop_the_others() {
    let spec = GeneratorSpec::new("screen")
        .with_template("NAMEScreen.tsx", "screen {{ pascal_case_name }}")
        .with_template("NAMEScreen.test.tsx", "test {{ missing_variable }}")
        .with_template("NAMEScreen.styles.ts", "styles {{ kebab_case_name }}");
    let fs = FakeFs::default();

    let result = service(spec, &fs)
        .run("screen", "Welcome", &GenerateOptions::default())
        .unwrap();

    let statuses: Vec<_> = result.entries.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        [FileStatus::Created, FileStatus::Failed, FileStatus::Created]
    );
    assert_eq!(
        result.entries[1].failure_kind(),
        Some(FailureKind::UndefinedTemplateVariable)
    );
    assert!(
        result.entries[1]
            .failure
            .as_ref()
            .unwrap()
            .message
            .contains("missing_variable")
    );

    assert!(fs.read("/app/app/screens/WelcomeScreen.tsx").is_some());
    assert!(fs.read("/app/app/screens/WelcomeScreen.test.tsx").is_none());
    assert_eq!(
        fs.read("/app/app/screens/WelcomeScreen.styles.ts").unwrap(),
        "styles welcome"
    );
}

#[test]
fn duplicate_targets_fail_closed() {
    let spec = GeneratorSpec::new("component")
        .with_template("a.tera", "---\nfilename: index.ts\n---\nfirst")
        .with_template("b.tera", "---\nfilename: index.ts\n---\nsecond")
        .with_template("NAME.tsx", "third");
    let fs = FakeFs::default().with_file("/app/app/components/index.ts", "keep");

    let options = GenerateOptions {
        update: true,
        ..Default::default()
    };
    let result = service(spec, &fs).run("component", "Foo", &options).unwrap();

    assert_eq!(
        result.entries[0].failure_kind(),
        Some(FailureKind::DuplicateOutputPath)
    );
    assert_eq!(
        result.entries[1].failure_kind(),
        Some(FailureKind::DuplicateOutputPath)
    );
    assert_eq!(result.entries[2].status, FileStatus::Created);
    assert_eq!(fs.read("/app/app/components/index.ts").unwrap(), "keep");
}

#[test]
fn malformed_frontmatter_fails_only_that_file() {
    let spec = GeneratorSpec::new("component")
        .with_template("NAME.tsx", "---\ndir: app/x\nno closing marker")
        .with_template("NAME.ts", "ok");
    let fs = FakeFs::default();

    let result = service(spec, &fs).run("component", "Foo", &GenerateOptions::default()).unwrap();

    assert_eq!(
        result.entries[0].failure_kind(),
        Some(FailureKind::MalformedFrontmatter)
    );
    assert_eq!(result.entries[0].path, None);
    assert_eq!(result.entries[1].status, FileStatus::Created);
}

#[test]
fn nested_subject_becomes_subdirectory() {
    let fs = FakeFs::default();
    let result = service(component(), &fs)
        .run("component", "forms/text field", &GenerateOptions::default())
        .unwrap();

    assert!(result.is_success());
    assert!(fs.read("/app/app/components/Forms/TextField.tsx").is_some());
}

#[test]
fn frontmatter_dir_is_rendered() {
    let spec = GeneratorSpec::new("screen").with_template(
        "index.ts",
        "---\ndir: app/screens/{{ kebab_case_name }}\n---\nx",
    );
    let fs = FakeFs::default();
    service(spec, &fs)
        .run("screen", "UserProfile", &GenerateOptions::default())
        .unwrap();
    assert!(fs.read("/app/app/screens/user-profile/index.ts").is_some());
}

#[test]
fn unknown_generator_and_bad_subject_write_nothing() {
    let fs = FakeFs::default();
    let svc = service(component(), &fs);

    let err = svc
        .run("widget", "Foo", &GenerateOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        SparkError::Application(ApplicationError::UnknownGenerator { .. })
    ));

    let err = svc.run("component", "", &GenerateOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        SparkError::Domain(DomainError::InvalidSubjectName { .. })
    ));
    assert_eq!(fs.count(), 0);
}

#[test]
fn write_failures_carry_filesystem_kind() {
    struct ReadOnlyFs;
    impl Filesystem for ReadOnlyFs {
        fn exists(&self, _: &Path) -> bool {
            false
        }
        fn is_dir(&self, _: &Path) -> bool {
            false
        }
        fn create_dir_all(&self, _: &Path) -> SparkResult<()> {
            Ok(())
        }
        fn write_file(&self, path: &Path, _: &[u8], _: WriteMode) -> SparkResult<WriteOutcome> {
            Err(ApplicationError::WriteFailure {
                path: path.to_path_buf(),
                kind: FsErrorKind::PermissionDenied,
                reason: "read-only".into(),
            }
            .into())
        }
        fn set_permissions(&self, _: &Path, _: bool) -> SparkResult<()> {
            Ok(())
        }
        fn remove_dir_all(&self, _: &Path) -> SparkResult<()> {
            Ok(())
        }
        fn rename(&self, _: &Path, _: &Path) -> SparkResult<()> {
            Ok(())
        }
    }

    let svc = GeneratorService::new(
        Box::new(FixedCatalog(vec![component()])),
        Box::new(PlaceholderRenderer),
        Box::new(ReadOnlyFs),
        "/app",
    );
    let result = svc
        .run("component", "Foo", &GenerateOptions::default())
        .unwrap();
    assert_eq!(result.entries[0].failure_kind(), Some(FailureKind::WriteFailure));
    assert!(!result.is_success());
}
