//! Core services driven against the in-memory filesystem.

use std::fs;
use std::path::Path;

use spark_adapters::{BuiltinCatalog, DirectoryBoilerplate, MemoryFilesystem, TeraRenderer};
use spark_core::application::{
    BoilerplateOptions, BoilerplateService, Filesystem, GenerateOptions, GeneratorService,
    WriteMode,
};
use spark_core::domain::FileStatus;
use tempfile::TempDir;

#[test]
fn generator_writes_only_to_the_given_filesystem() {
    let memory = MemoryFilesystem::new();
    let service = GeneratorService::new(
        Box::new(BuiltinCatalog::new()),
        Box::new(TeraRenderer::new()),
        Box::new(memory.clone()),
        "/MyApp",
    );

    let result = service
        .run("screen", "Settings", &GenerateOptions::default())
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.entries[0].status, FileStatus::Created);
    assert_eq!(
        memory.list_files(),
        vec![Path::new("/MyApp/app/screens/SettingsScreen.tsx").to_path_buf()]
    );
    let written = memory
        .read_file(Path::new("/MyApp/app/screens/SettingsScreen.tsx"))
        .unwrap();
    assert!(written.contains("SettingsScreen"));
}

#[test]
fn existing_file_in_memory_is_skipped() {
    let memory = MemoryFilesystem::new();
    let target = Path::new("/MyApp/app/components/Card.tsx");
    memory.write_file(target, b"// mine\n", WriteMode::CreateNew).unwrap();

    let service = GeneratorService::new(
        Box::new(BuiltinCatalog::new()),
        Box::new(TeraRenderer::new()),
        Box::new(memory.clone()),
        "/MyApp",
    );
    let result = service
        .run("component", "Card", &GenerateOptions::default())
        .unwrap();

    assert_eq!(result.entries[0].status, FileStatus::SkippedExists);
    assert_eq!(memory.read_file(target).as_deref(), Some("// mine\n"));
}

#[test]
fn overwrite_replaces_previous_app_in_memory() {
    let boilerplate = TempDir::new().unwrap();
    fs::write(boilerplate.path().join("package.json"), "{ \"name\": \"hello-world\" }\n").unwrap();

    let memory = MemoryFilesystem::new();
    memory
        .write_file(Path::new("/work/Pizza/stale.txt"), b"old", WriteMode::CreateNew)
        .unwrap();

    let service = BoilerplateService::new(
        Box::new(DirectoryBoilerplate::new(boilerplate.path())),
        Box::new(memory.clone()),
    );
    let options = BoilerplateOptions {
        overwrite: true,
        ..Default::default()
    };
    service.create("Pizza", "/work/Pizza", &options).unwrap();

    assert!(!memory.exists(Path::new("/work/Pizza/stale.txt")));
    assert!(!memory.exists(Path::new("/work/.Pizza.spark-backup")));
    assert_eq!(
        memory
            .read_bytes(Path::new("/work/Pizza/package.json"))
            .map(String::from_utf8),
        Some(Ok("{ \"name\": \"pizza\" }\n".to_string()))
    );
}
