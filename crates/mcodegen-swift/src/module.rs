//! [`LanguageModule`] implementation for Swift.

use crate::ext::{LANGUAGE, SWIFT_MODULE};
use crate::writer::SwiftWriter;
use mcodegen_core::language::property_str;
use mcodegen_core::{
    Error, ExternalFrontend, GenerationMapper, LanguageModule, Result, ScenarioScope,
    apply_mappers, write_output,
};
use mcodegen_ir::IrFile;
use std::path::Path;

/// Companion executable used when no `swift/companion` property is set,
/// relative to the working directory.
pub const DEFAULT_COMPANION: &str = "swift-companion/.build/release/swift-companion";

/// Swift back-end, with parsing delegated to an external companion program.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwiftModule;

impl SwiftModule {
    pub fn new() -> Self {
        Self
    }

    fn frontend(scope: &ScenarioScope) -> ExternalFrontend {
        ExternalFrontend::new(property_str(scope, LANGUAGE, "companion", DEFAULT_COMPANION))
    }
}

impl LanguageModule for SwiftModule {
    fn language_name(&self) -> &'static str {
        LANGUAGE
    }

    fn parse(&self, scope: &ScenarioScope, source_path: &Path) -> Result<IrFile> {
        let file = Self::frontend(scope).parse(scope, source_path)?;
        tracing::debug!(
            path = %source_path.display(),
            declarations = file.declarations.len(),
            "parsed swift source"
        );
        Ok(file)
    }

    /// Unlike the JVM modules, a lone top-level function or property is
    /// written too.
    fn generate(
        &self,
        scope: &ScenarioScope,
        file: IrFile,
        target_subpath: &Path,
        mappers: &[Box<dyn GenerationMapper>],
    ) -> Result<()> {
        let file = apply_mappers(file, mappers)?;
        let declaration = match file.declarations.as_slice() {
            [] => {
                tracing::debug!(file = %file.name, "no declaration to generate");
                return Ok(());
            }
            [only] => only,
            all => {
                return Err(Error::UnsupportedMultiDeclaration {
                    language: LANGUAGE,
                    file: file.name.clone(),
                    count: all.len(),
                });
            }
        };

        let module = file.properties.get_str(SWIFT_MODULE);
        let indent = property_str(scope, LANGUAGE, "indent", "    ");
        let text = SwiftWriter::emit(module, &file.imports, declaration, indent)?;

        let path = scope
            .configuration()
            .output_dir()
            .join(target_subpath)
            .join(format!("{}.swift", file.stem()));
        write_output(&path, &text)?;
        tracing::debug!(path = %path.display(), "generated swift source");
        Ok(())
    }
}
