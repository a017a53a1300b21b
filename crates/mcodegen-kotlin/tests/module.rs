//! Parse and generate through [`KotlinModule`] on a scratch directory.

use mcodegen_core::{
    Error, GenerationListMapper, LanguageModule, ScenarioConfiguration, ScenarioScope,
};
use mcodegen_ir::{IrClassBuilder, IrClassKind, IrFile, IrFileBuilder, IrVisibility};
use mcodegen_kotlin::{JVM_PACKAGE, KotlinModule};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn setup(files: &[(&str, &str)], indent: Option<&str>) -> (TempDir, ScenarioScope) {
    let dir = TempDir::new().unwrap();
    for (path, text) in files {
        let path = dir.path().join("src").join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }
    let mut config = ScenarioConfiguration::builder()
        .sources_dir(dir.path().join("src"))
        .output_dir(dir.path().join("out"));
    if let Some(indent) = indent {
        config = config.property("kotlin", "indent", indent);
    }
    let config = config.build().unwrap();
    (dir, ScenarioScope::new("kotlin", Arc::new(config)))
}

const USER: &str = "package com.example

data class User(val id: Long, var name: String?) : Comparable<User> {
    override fun compareTo(other: User): Int = id.compareTo(other.id)
}
";

fn class_file(name: &str, package: &str) -> IrFile {
    let class = IrClassBuilder::qualified(format!("{package}.{name}"), name)
        .kind(IrClassKind::Class)
        .visibility(IrVisibility::Public)
        .build()
        .unwrap();
    IrFileBuilder::new(format!("{name}.kt"))
        .property(JVM_PACKAGE, package)
        .declaration(class)
        .build()
}

#[test]
fn parse_then_generate_under_package_dirs() {
    let (dir, scope) = setup(&[("com/example/User.kt", USER)], None);
    let module = KotlinModule::new();

    let file = module
        .parse(&scope, Path::new("com/example/User.kt"))
        .unwrap();
    assert_eq!(file.properties.get_str(JVM_PACKAGE), Some("com.example"));
    assert_eq!(file.class("User").unwrap().fields.len(), 2);

    module
        .generate(&scope, file, Path::new("gen"), &[])
        .unwrap();
    let out = std::fs::read_to_string(dir.path().join("out/gen/com/example/User.kt")).unwrap();
    assert!(out.starts_with("package com.example\n"));
    assert!(out.contains("data class User(val id: Long, var name: String?) : Comparable<User> {"));
    assert!(out.contains("    override fun compareTo(other: User): Int = id.compareTo(other.id)"));
}

#[test]
fn root_package_and_indent_property() {
    let source = "class Root {\n    fun ping(): Int = 1\n}\n";
    let (dir, scope) = setup(&[("Root.kt", source)], Some("  "));
    let module = KotlinModule::new();

    let file = module.parse(&scope, Path::new("Root.kt")).unwrap();
    assert_eq!(file.properties.get_str(JVM_PACKAGE), Some(""));
    module.generate(&scope, file, Path::new(""), &[]).unwrap();

    let out = std::fs::read_to_string(dir.path().join("out/Root.kt")).unwrap();
    assert_eq!(out, "class Root {\n  fun ping(): Int = 1\n}\n");
}

#[test]
fn generate_rejects_missing_package_and_several_declarations() {
    let (_dir, scope) = setup(&[("Pair.kt", "class A\nclass B\n")], None);
    let module = KotlinModule::new();

    let pair = module.parse(&scope, Path::new("Pair.kt")).unwrap();
    match module.generate(&scope, pair, Path::new(""), &[]) {
        Err(Error::UnsupportedMultiDeclaration { language, count, .. }) => {
            assert_eq!(language, "kotlin");
            assert_eq!(count, 2);
        }
        other => panic!("expected UnsupportedMultiDeclaration, got {other:?}"),
    }

    let class = IrClassBuilder::new("Loose")
        .kind(IrClassKind::Class)
        .visibility(IrVisibility::Public)
        .build()
        .unwrap();
    let loose = IrFileBuilder::new("Loose.kt").declaration(class).build();
    assert!(matches!(
        module.generate(&scope, loose, Path::new(""), &[]),
        Err(Error::UnsupportedShape { .. })
    ));
}

#[test]
fn generate_multiple_runs_list_mappers() {
    let (dir, scope) = setup(&[], None);
    let module = KotlinModule::new();

    // One file in, one file per class name out, all moved to `org.split`.
    let split: Box<dyn GenerationListMapper> = Box::new(
        |files: Vec<IrFile>| -> mcodegen_core::Result<Vec<IrFile>> {
            Ok(files
                .iter()
                .flat_map(|f| {
                    let stem = f.stem().to_string();
                    [
                        class_file(&stem, "org.split"),
                        class_file(&format!("{stem}Api"), "org.split"),
                    ]
                })
                .collect())
        },
    );

    module
        .generate_multiple(
            &scope,
            vec![class_file("Service", "com.example")],
            Path::new("gen"),
            &[split],
        )
        .unwrap();

    let root = dir.path().join("out/gen/org/split");
    assert_eq!(
        std::fs::read_to_string(root.join("Service.kt")).unwrap(),
        "package org.split\n\nclass Service\n"
    );
    assert_eq!(
        std::fs::read_to_string(root.join("ServiceApi.kt")).unwrap(),
        "package org.split\n\nclass ServiceApi\n"
    );
    assert!(!dir.path().join("out/gen/com").exists());
}
