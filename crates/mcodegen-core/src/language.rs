//! The contract every language module implements.

use crate::edit::{EditStep, edit_source_file};
use crate::error::{Error, Result};
use crate::mapper::GenerationMapper;
use crate::scenario::ScenarioScope;
use mcodegen_ir::{IrClass, IrDeclaration, IrFile};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A front-end, back-end and editor for one concrete language.
///
/// Module instances may cache semantic state between calls (e.g. a class
/// index); that state belongs to the instance, not to the process.
pub trait LanguageModule {
    /// Key used for configuration properties and `Unknown` fallback text.
    fn language_name(&self) -> &'static str;

    /// Parses `source_path`, relative to the sources directory, into IR.
    fn parse(&self, scope: &ScenarioScope, source_path: &Path) -> Result<IrFile>;

    /// Applies `mappers` in order, then writes the single top-level class
    /// under `output_dir/target_subpath`. A file without classes is skipped.
    fn generate(
        &self,
        scope: &ScenarioScope,
        file: IrFile,
        target_subpath: &Path,
        mappers: &[Box<dyn GenerationMapper>],
    ) -> Result<()>;

    /// Applies `steps` to the source text and writes the edited file to the
    /// output directory.
    fn edit(
        &self,
        scope: &ScenarioScope,
        source_path: &Path,
        steps: &[Box<dyn EditStep>],
    ) -> Result<()> {
        edit_source_file(scope, source_path, steps)
    }
}

/// Reads `source_path` relative to the configured sources directory.
pub fn read_source(scope: &ScenarioScope, source_path: &Path) -> Result<String> {
    let path = scope.configuration().sources_dir().join(source_path);
    std::fs::read_to_string(&path).map_err(|source| Error::SourceUnreadable { path, source })
}

/// Path of `source_path` inside the sources directory.
pub fn source_file_path(scope: &ScenarioScope, source_path: &Path) -> PathBuf {
    scope.configuration().sources_dir().join(source_path)
}

/// File name component of `source_path` as a string.
pub fn file_name(source_path: &Path) -> Result<String> {
    source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::Config(format!("source path `{}` has no file name", source_path.display()))
        })
}

/// Writes `contents` to `path` in one step.
///
/// The text goes to a temporary file in the target directory which is then
/// renamed over `path`, so a failure never leaves a half-written file.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| Error::io(&dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// String property `name` configured for `language`, or `default`.
pub fn property_str<'a>(
    scope: &'a ScenarioScope,
    language: &str,
    name: &str,
    default: &'a str,
) -> &'a str {
    scope
        .configuration()
        .property_str(language, name)
        .unwrap_or(default)
}

/// The one class a generated file is made of.
///
/// More than one top-level declaration is rejected; a file whose only
/// declaration is not a class yields `None`.
pub fn primary_class<'a>(file: &'a IrFile, language: &'static str) -> Result<Option<&'a IrClass>> {
    if file.declarations.len() > 1 {
        return Err(Error::UnsupportedMultiDeclaration {
            language,
            file: file.name.clone(),
            count: file.declarations.len(),
        });
    }
    Ok(file.declarations.first().and_then(IrDeclaration::as_class))
}

/// Directory for a JVM package under `root` (`com.example` -> `root/com/example`).
pub fn package_dir(root: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}
