//! Parse through a stand-in companion program and generate with
//! [`SwiftModule`] on a scratch directory.

use mcodegen_core::{Error, LanguageModule, ScenarioConfiguration, ScenarioScope};
use mcodegen_ir::{
    IrCallableBuilder, IrClassBuilder, IrExpression, IrFieldBuilder, IrFile, IrFileBuilder,
    IrImport, IrPrimitive, IrStatement, IrType, IrVisibility, wire,
};
use mcodegen_swift::SwiftModule;
use mcodegen_swift::ext::{self, SWIFT_MODULE};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn scope(dir: &TempDir, properties: &[(&str, &str)]) -> ScenarioScope {
    let mut config = ScenarioConfiguration::builder()
        .sources_dir(dir.path().join("src"))
        .output_dir(dir.path().join("out"));
    for (name, value) in properties {
        config = config.property("swift", *name, *value);
    }
    ScenarioScope::new("ios", Arc::new(config.build().unwrap()))
}

fn model_file() -> IrFile {
    let class = IrClassBuilder::qualified("App.Model", "Model")
        .kind(ext::struct_kind())
        .visibility(IrVisibility::Public)
        .field(
            IrFieldBuilder::new("id", IrType::primitive(IrPrimitive::Long))
                .visibility(IrVisibility::Public)
                .mutable(false)
                .build()
                .unwrap(),
        )
        .field(
            IrFieldBuilder::new("title", IrType::reference("String"))
                .visibility(IrVisibility::Public)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    IrFileBuilder::new("Model.swift")
        .import(IrImport::new("Foundation"))
        .property(SWIFT_MODULE, "App")
        .declaration(class)
        .build()
}

/// Writes a shell script that checks its arguments and prints `output`.
#[cfg(unix)]
fn companion(dir: &TempDir, output: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let payload = dir.path().join("payload.json");
    std::fs::write(&payload, output).unwrap();
    let script = dir.path().join("companion.sh");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\n[ \"$1\" = \"-scope\" ] && [ -f \"$2\" ] && [ \"$3\" = \"-source\" ] || exit 2\ncat '{}'\n",
            payload.display()
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn parse_through_companion_then_generate() {
    let dir = TempDir::new().unwrap();
    let expected = model_file();
    let script = companion(&dir, &wire::to_json(&expected).unwrap());
    let scope = scope(&dir, &[("companion", script.to_str().unwrap())]);
    let module = SwiftModule::new();

    let file = module.parse(&scope, Path::new("Model.swift")).unwrap();
    assert_eq!(file, expected);

    module.generate(&scope, file, Path::new("ios"), &[]).unwrap();
    let text = std::fs::read_to_string(dir.path().join("out/ios/Model.swift")).unwrap();
    assert_eq!(
        text,
        "import Foundation\n\npublic struct Model {\n    public let id: Int64\n    public var title: String?\n}\n"
    );
}

#[cfg(unix)]
#[test]
fn failing_companion_is_reported() {
    let dir = TempDir::new().unwrap();
    let script = companion(&dir, "not json");
    let scope = scope(&dir, &[("companion", script.to_str().unwrap())]);

    let err = SwiftModule::new()
        .parse(&scope, Path::new("Model.swift"))
        .unwrap_err();
    assert!(matches!(err, Error::Wire(_)), "got {err:?}");
}

#[test]
fn missing_companion_is_an_external_frontend_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-companion");
    let scope = scope(&dir, &[("companion", missing.to_str().unwrap())]);

    match SwiftModule::new().parse(&scope, Path::new("Model.swift")) {
        Err(Error::ExternalFrontend { program, .. }) => {
            assert_eq!(program, missing.display().to_string())
        }
        other => panic!("expected ExternalFrontend error, got {other:?}"),
    }
}

#[test]
fn top_level_function_with_indent_property() {
    let dir = TempDir::new().unwrap();
    let scope = scope(&dir, &[("indent", "\t")]);
    let function = IrCallableBuilder::method("answer", IrType::primitive(IrPrimitive::Int))
        .visibility(IrVisibility::Internal)
        .body(vec![IrStatement::return_stmt(Some(IrExpression::literal("42")))])
        .build()
        .unwrap();
    let file = IrFileBuilder::new("Answer.swift").declaration(function).build();

    SwiftModule::new()
        .generate(&scope, file, Path::new(""), &[])
        .unwrap();
    let text = std::fs::read_to_string(dir.path().join("out/Answer.swift")).unwrap();
    assert_eq!(text, "internal func answer() -> Int32 {\n\treturn 42\n}\n");
}

#[test]
fn generate_rejects_several_declarations_and_skips_empty_files() {
    let dir = TempDir::new().unwrap();
    let scope = scope(&dir, &[]);
    let module = SwiftModule::new();

    let mut file = model_file();
    file.declarations.extend(model_file().declarations);
    match module.generate(&scope, file, Path::new(""), &[]) {
        Err(Error::UnsupportedMultiDeclaration { language, count, .. }) => {
            assert_eq!(language, "swift");
            assert_eq!(count, 2);
        }
        other => panic!("expected multi-declaration error, got {other:?}"),
    }

    let empty = IrFileBuilder::new("Empty.swift").build();
    module.generate(&scope, empty, Path::new(""), &[]).unwrap();
    assert!(!dir.path().join("out").exists());
}

#[test]
fn mappers_run_before_writing() {
    let dir = TempDir::new().unwrap();
    let scope = scope(&dir, &[]);
    let rename: Box<dyn mcodegen_core::GenerationMapper> = Box::new(|mut file: IrFile| -> mcodegen_core::Result<IrFile> {
        file.name = "Renamed.swift".to_string();
        Ok(file)
    });

    SwiftModule::new()
        .generate(&scope, model_file(), Path::new("gen"), &[rename])
        .unwrap();
    assert!(dir.path().join("out/gen/Renamed.swift").exists());
    assert!(!dir.path().join("out/gen/Model.swift").exists());
}
