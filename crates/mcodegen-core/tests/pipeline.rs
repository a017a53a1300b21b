//! End-to-end scenarios over a minimal language module.

use mcodegen_core::{
    EditStep, EditStepHandler, Error, GenerationMapper, LanguageModule, Result, Scenario,
    ScenarioConfiguration, ScenarioManager, ScenarioScope, SetFileProperty,
    UnifyClassesByNameAndFields, apply_mappers, language::write_output, primary_class,
    read_source, unify_sources,
};
use mcodegen_ir::{
    IrClassBuilder, IrClassKind, IrFieldBuilder, IrFile, IrFileBuilder, IrPrimitive, IrType,
    IrVisibility, wire,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Reads IR wire JSON; writes `name: field, field` lines.
struct OutlineModule;

impl LanguageModule for OutlineModule {
    fn language_name(&self) -> &'static str {
        "outline"
    }

    fn parse(&self, scope: &ScenarioScope, source_path: &Path) -> Result<IrFile> {
        Ok(wire::from_json(&read_source(scope, source_path)?)?)
    }

    fn generate(
        &self,
        scope: &ScenarioScope,
        file: IrFile,
        target_subpath: &Path,
        mappers: &[Box<dyn GenerationMapper>],
    ) -> Result<()> {
        let file = apply_mappers(file, mappers)?;
        let Some(class) = primary_class(&file, self.language_name())? else {
            return Ok(());
        };
        let fields: Vec<&str> = class.fields.iter().map(|f| f.name.as_str()).collect();
        let package = file.properties.get_str("package").unwrap_or("-");
        let text = format!("{package} {}: {}\n", class.name, fields.join(", "));
        let out = scope
            .configuration()
            .output_dir()
            .join(target_subpath)
            .join(format!("{}.outline", class.name));
        write_output(&out, &text)
    }
}

#[derive(Debug)]
struct Upper;
impl EditStep for Upper {}

struct UpperHandler;
impl EditStepHandler for UpperHandler {
    type Step = Upper;
    fn handle(&self, _: &Upper, source: &str) -> Result<String> {
        Ok(source.to_uppercase())
    }
}

#[derive(Debug)]
struct Missing;
impl EditStep for Missing {}

static REVERSE_CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct Reverse;
impl EditStep for Reverse {}

struct ReverseHandler;
impl EditStepHandler for ReverseHandler {
    type Step = Reverse;
    fn handle(&self, _: &Reverse, source: &str) -> Result<String> {
        REVERSE_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(source.chars().rev().collect())
    }
}

fn user(fields: &[(&str, IrPrimitive)]) -> IrFile {
    let mut class = IrClassBuilder::new("User")
        .kind(IrClassKind::Class)
        .visibility(IrVisibility::Public);
    for (name, primitive) in fields {
        class.push_field(
            IrFieldBuilder::new(*name, IrType::primitive(primitive.clone()))
                .visibility(IrVisibility::Public)
                .build()
                .unwrap(),
        );
    }
    IrFileBuilder::new("User.ir")
        .declaration(class.build().unwrap())
        .build()
}

fn workspace() -> (TempDir, Arc<ScenarioConfiguration>) {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    let config = ScenarioConfiguration::builder()
        .sources_dir(dir.path().join("src"))
        .output_dir(dir.path().join("out"))
        .edit_step_handler(UpperHandler)
        .edit_step_handler(ReverseHandler)
        .build()
        .unwrap();
    (dir, Arc::new(config))
}

#[test]
fn parse_unify_map_generate() {
    let (dir, config) = workspace();
    let src = dir.path().join("src");
    std::fs::write(
        src.join("jvm.ir"),
        wire::to_json(&user(&[
            ("id", IrPrimitive::Long),
            ("age", IrPrimitive::Int),
            ("jvmOnly", IrPrimitive::Int),
        ]))
        .unwrap(),
    )
    .unwrap();
    std::fs::write(
        src.join("ios.ir"),
        wire::to_json(&user(&[("age", IrPrimitive::Int), ("id", IrPrimitive::Long)])).unwrap(),
    )
    .unwrap();

    let scenario = Scenario::new("common", config, |scope| {
        let module = OutlineModule;
        let jvm = module.parse(scope, Path::new("jvm.ir"))?;
        let ios = module.parse(scope, Path::new("ios.ir"))?;
        let unified = unify_sources(&UnifyClassesByNameAndFields, &[jvm, ios])?;
        let mappers: Vec<Box<dyn GenerationMapper>> =
            vec![Box::new(SetFileProperty::new("package", "app"))];
        module.generate(scope, unified, Path::new("common"), &mappers)
    });
    scenario.run().unwrap();

    let out = std::fs::read_to_string(dir.path().join("out/common/User.outline")).unwrap();
    assert_eq!(out, "app User: id, age\n");
}

#[test]
fn edit_writes_once_with_same_file_name() {
    let (dir, config) = workspace();
    std::fs::write(dir.path().join("src/Notes.txt"), "hello").unwrap();
    let scope = ScenarioScope::new("edit", config);

    let steps: Vec<Box<dyn EditStep>> = vec![Box::new(Upper)];
    OutlineModule
        .edit(&scope, Path::new("Notes.txt"), &steps)
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("out/Notes.txt")).unwrap(),
        "HELLO"
    );
}

#[test]
fn failed_edit_leaves_no_output() {
    let (dir, config) = workspace();
    std::fs::write(dir.path().join("src/Notes.txt"), "hello").unwrap();
    let scope = ScenarioScope::new("edit", config);

    let steps: Vec<Box<dyn EditStep>> = vec![Box::new(Upper), Box::new(Missing)];
    let result = OutlineModule.edit(&scope, Path::new("Notes.txt"), &steps);

    match result {
        Err(Error::HandlerNotFound(name)) => assert_eq!(name, "Missing"),
        other => panic!("expected HandlerNotFound, got {other:?}"),
    }
    assert!(!dir.path().join("out/Notes.txt").exists());
}

#[test]
fn failed_middle_step_keeps_previous_output() {
    let (dir, config) = workspace();
    std::fs::write(dir.path().join("src/Notes.txt"), "hello").unwrap();
    std::fs::create_dir_all(dir.path().join("out")).unwrap();
    std::fs::write(dir.path().join("out/Notes.txt"), "previous run").unwrap();
    let scope = ScenarioScope::new("edit", config);

    let steps: Vec<Box<dyn EditStep>> =
        vec![Box::new(Upper), Box::new(Missing), Box::new(Reverse)];
    let result = OutlineModule.edit(&scope, Path::new("Notes.txt"), &steps);

    match result {
        Err(Error::HandlerNotFound(name)) => assert_eq!(name, "Missing"),
        other => panic!("expected HandlerNotFound, got {other:?}"),
    }
    assert_eq!(REVERSE_CALLS.load(Ordering::SeqCst), 0);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("out/Notes.txt")).unwrap(),
        "previous run"
    );
}

#[test]
fn batch_abort_keeps_earlier_output() {
    let (dir, config) = workspace();
    std::fs::write(
        dir.path().join("src/User.ir"),
        wire::to_json(&user(&[("id", IrPrimitive::Long)])).unwrap(),
    )
    .unwrap();

    let mut manager = ScenarioManager::new();
    manager
        .add(Scenario::new("ok", Arc::clone(&config), |scope| {
            let file = OutlineModule.parse(scope, Path::new("User.ir"))?;
            OutlineModule.generate(scope, file, Path::new(""), &[])
        }))
        .add(Scenario::new("broken", Arc::clone(&config), |scope| {
            OutlineModule.parse(scope, Path::new("Missing.ir")).map(|_| ())
        }))
        .add(Scenario::new("never", config, |_| {
            panic!("scenario after a failure must not run")
        }));

    match manager.run() {
        Err(Error::ScenarioFailed { scenario, source }) => {
            assert_eq!(scenario, "broken");
            assert!(matches!(*source, Error::SourceUnreadable { .. }));
        }
        other => panic!("expected ScenarioFailed, got {other:?}"),
    }
    assert!(dir.path().join("out/User.outline").exists());
}

#[test]
fn multiple_declarations_are_rejected() {
    let (_dir, config) = workspace();
    let scope = ScenarioScope::new("multi", config);
    let class = |name: &str| {
        IrClassBuilder::new(name)
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .build()
            .unwrap()
    };
    let file = IrFileBuilder::new("Two.ir")
        .declaration(class("A"))
        .declaration(class("B"))
        .build();
    assert!(matches!(
        OutlineModule.generate(&scope, file, Path::new(""), &[]),
        Err(Error::UnsupportedMultiDeclaration { count: 2, .. })
    ));
}
