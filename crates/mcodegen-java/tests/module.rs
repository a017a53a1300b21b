//! Parse, generate and edit through [`JavaModule`] on a scratch directory.

use mcodegen_core::{
    EditStep, Error, GenerationMapper, LanguageModule, ScenarioConfiguration, ScenarioScope,
    SetFileProperty,
};
use mcodegen_java::{
    AddJavaImport, AddJavaImportHandler, AppendJavaInterfaces, AppendJavaInterfacesHandler,
    JavaModule,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn setup(files: &[(&str, &str)]) -> (TempDir, ScenarioScope) {
    let dir = TempDir::new().unwrap();
    for (path, text) in files {
        let path = dir.path().join("src").join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }
    let config = ScenarioConfiguration::builder()
        .sources_dir(dir.path().join("src"))
        .output_dir(dir.path().join("out"))
        .edit_step_handler(AddJavaImportHandler)
        .edit_step_handler(AppendJavaInterfacesHandler)
        .build()
        .unwrap();
    (dir, ScenarioScope::new("java", Arc::new(config)))
}

const USER: &str = "package com.example;

public class User extends Base {
    private final long id;

    public long getId() {
        return id;
    }
}
";

const BASE: &str = "package com.example;

public abstract class Base {}
";

#[test]
fn parse_then_generate_under_package_dirs() {
    let (dir, scope) = setup(&[
        ("com/example/User.java", USER),
        ("com/example/Base.java", BASE),
    ]);
    let module = JavaModule::new();

    let file = module
        .parse(&scope, Path::new("com/example/User.java"))
        .unwrap();
    let user = file.class("User").unwrap();
    assert_eq!(user.super_classes[0].name, "com.example.Base");
    assert!(module.class_index().contains("com.example.Base"));
    assert!(module.class_index().contains("com.example.User"));

    module
        .generate(&scope, file, Path::new("gen"), &[])
        .unwrap();
    let out =
        std::fs::read_to_string(dir.path().join("out/gen/com/example/User.java")).unwrap();
    assert!(out.starts_with("package com.example;\n"));
    assert!(out.contains("public class User extends Base {"));
    assert!(out.contains("    private final long id;"));
    assert!(out.contains("        return id;"));
}

#[test]
fn generate_honours_mappers_and_requires_package() {
    let (dir, scope) = setup(&[("Loose.java", "public class Loose {}\n")]);
    let module = JavaModule::new();

    let file = module.parse(&scope, Path::new("Loose.java")).unwrap();
    match module.generate(&scope, file.clone(), Path::new(""), &[]) {
        Err(Error::UnsupportedShape { language, .. }) => assert_eq!(language, "java"),
        other => panic!("expected UnsupportedShape, got {other:?}"),
    }

    let mappers: Vec<Box<dyn GenerationMapper>> =
        vec![Box::new(SetFileProperty::new("jvmPackage", "org.loose"))];
    module
        .generate(&scope, file, Path::new(""), &mappers)
        .unwrap();
    let out = std::fs::read_to_string(dir.path().join("out/org/loose/Loose.java")).unwrap();
    assert!(out.starts_with("package org.loose;\n"));
}

#[test]
fn unresolvable_super_type_fails_parse() {
    let (_dir, scope) = setup(&[("a/Orphan.java", "package a;\n\nclass Orphan extends Ghost {}\n")]);
    assert!(matches!(
        JavaModule::new().parse(&scope, Path::new("a/Orphan.java")),
        Err(Error::SemanticResolutionFailed { .. })
    ));
}

#[test]
fn edit_runs_configured_handlers() {
    let (dir, scope) = setup(&[("com/example/User.java", USER)]);
    let steps: Vec<Box<dyn EditStep>> = vec![
        Box::new(AddJavaImport::new("java.io.Serializable")),
        Box::new(AppendJavaInterfaces::new().append("User", ["Serializable"])),
    ];
    JavaModule::new()
        .edit(&scope, Path::new("com/example/User.java"), &steps)
        .unwrap();

    let out =
        std::fs::read_to_string(dir.path().join("out/User.java")).unwrap();
    assert!(out.contains("package com.example;\n\nimport java.io.Serializable;\n"));
    assert!(out.contains("public class User extends Base implements Serializable {"));
    assert!(dir.path().join("src/com/example/User.java").is_file());
}
