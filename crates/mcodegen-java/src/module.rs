//! [`LanguageModule`] implementation for Java.

use crate::ext::LANGUAGE;
use crate::index::ClassIndex;
use crate::reader::{ReadInput, read_java};
use crate::writer::JavaWriter;
use mcodegen_core::language::{package_dir, property_str};
use mcodegen_core::{
    Error, GenerationMapper, LanguageModule, Result, ScenarioScope, apply_mappers, primary_class,
    read_source, write_output,
};
use mcodegen_ir::IrFile;
use std::cell::{Ref, RefCell};
use std::path::Path;

/// File property naming the package of a JVM compilation unit.
pub const JVM_PACKAGE: &str = "jvmPackage";

/// Java front-end and back-end.
///
/// Super types are resolved through a class index owned by the module, so
/// files parsed earlier through the same instance are visible to later ones.
#[derive(Debug, Default)]
pub struct JavaModule {
    index: RefCell<ClassIndex>,
}

impl JavaModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classes resolved or declared so far.
    pub fn class_index(&self) -> Ref<'_, ClassIndex> {
        self.index.borrow()
    }
}

impl LanguageModule for JavaModule {
    fn language_name(&self) -> &'static str {
        LANGUAGE
    }

    fn parse(&self, scope: &ScenarioScope, source_path: &Path) -> Result<IrFile> {
        let source = read_source(scope, source_path)?;
        let file = read_java(ReadInput {
            source: &source,
            source_path,
            sources_dir: scope.configuration().sources_dir(),
            index: &self.index,
        })?;
        tracing::debug!(
            path = %source_path.display(),
            declarations = file.declarations.len(),
            "parsed java source"
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
        let text = JavaWriter::emit(package, &file.imports, class, indent)?;

        let root = scope.configuration().output_dir().join(target_subpath);
        let path = package_dir(&root, package).join(format!("{}.java", class.name));
        write_output(&path, &text)?;
        tracing::debug!(path = %path.display(), "generated java source");
        Ok(())
    }
}
