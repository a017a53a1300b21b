//! [`LanguageModule`] implementation for Kotlin.

use crate::ext::LANGUAGE;
use crate::reader::read_kotlin;
use crate::writer::KotlinWriter;
use mcodegen_core::language::{package_dir, property_str};
use mcodegen_core::{
    Error, GenerationListMapper, GenerationMapper, LanguageModule, Result, ScenarioScope,
    apply_list_mappers, apply_mappers, primary_class, read_source, write_output,
};
use mcodegen_ir::IrFile;
use std::path::Path;

/// File property naming the package of a JVM compilation unit. Shared with
/// the Java module so IR read from either language generates into the other.
pub const JVM_PACKAGE: &str = "jvmPackage";

/// Kotlin front-end and back-end.
#[derive(Debug, Default, Clone, Copy)]
pub struct KotlinModule;

impl KotlinModule {
    pub fn new() -> Self {
        Self
    }

    /// Runs `list_mappers` over `files`, then generates every resulting file
    /// into `target_subpath`.
    pub fn generate_multiple(
        &self,
        scope: &ScenarioScope,
        files: Vec<IrFile>,
        target_subpath: &Path,
        list_mappers: &[Box<dyn GenerationListMapper>],
    ) -> Result<()> {
        let files = apply_list_mappers(files, list_mappers)?;
        tracing::debug!(files = files.len(), "generating kotlin file list");
        for file in files {
            self.generate(scope, file, target_subpath, &[])?;
        }
        Ok(())
    }
}

impl LanguageModule for KotlinModule {
    fn language_name(&self) -> &'static str {
        LANGUAGE
    }

    fn parse(&self, scope: &ScenarioScope, source_path: &Path) -> Result<IrFile> {
        let source = read_source(scope, source_path)?;
        let file = read_kotlin(&source, source_path)?;
        tracing::debug!(
            path = %source_path.display(),
            declarations = file.declarations.len(),
            "parsed kotlin source"
        );
        Ok(file)
    }

    fn generate(
        &self,
        scope: &ScenarioScope,
        file: IrFile,
        target_subpath: &Path,
        mappers: &[Box<dyn GenerationMapper>],
    ) -> Result<()> {
        let file = apply_mappers(file, mappers)?;
        let Some(class) = primary_class(&file, LANGUAGE)? else {
            tracing::debug!(file = %file.name, "no class to generate");
            return Ok(());
        };
        let package = file
            .properties
            .get_str(JVM_PACKAGE)
            .ok_or_else(|| Error::UnsupportedShape {
                language: LANGUAGE,
                shape: format!("file `{}` without a `{JVM_PACKAGE}` property", file.name),
            })?;

        let indent = property_str(scope, LANGUAGE, "indent", "    ");
        let text = KotlinWriter::emit(package, &file.imports, class, indent)?;

        let root = scope.configuration().output_dir().join(target_subpath);
        let path = package_dir(&root, package).join(format!("{}.kt", file.stem()));
        write_output(&path, &text)?;
        tracing::debug!(path = %path.display(), "generated kotlin source");
        Ok(())
    }
}
