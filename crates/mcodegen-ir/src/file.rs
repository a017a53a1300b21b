//! Files, imports and top-level declarations.

use crate::class::{IrCallable, IrClass, IrField};
use crate::meta::{IrMeta, impl_ir_element};
use crate::properties::LanguageProperties;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrImport {
    pub path: String,
    #[serde(default)]
    pub wildcard: bool,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

impl IrImport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            wildcard: false,
            meta: IrMeta::default(),
        }
    }

    pub fn wildcard(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            wildcard: true,
            meta: IrMeta::default(),
        }
    }

    /// Last path segment, i.e. the name the import brings into scope.
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

/// A top-level declaration. Top-level fields and callables are only partially
/// supported by the language modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrDeclaration {
    Class(IrClass),
    Field(IrField),
    Callable(IrCallable),
}

impl IrDeclaration {
    pub fn as_class(&self) -> Option<&IrClass> {
        match self {
            IrDeclaration::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            IrDeclaration::Class(c) => &c.name,
            IrDeclaration::Field(f) => &f.name,
            IrDeclaration::Callable(c) => &c.name,
        }
    }
}

impl From<IrClass> for IrDeclaration {
    fn from(value: IrClass) -> Self {
        IrDeclaration::Class(value)
    }
}

impl From<IrField> for IrDeclaration {
    fn from(value: IrField) -> Self {
        IrDeclaration::Field(value)
    }
}

impl From<IrCallable> for IrDeclaration {
    fn from(value: IrCallable) -> Self {
        IrDeclaration::Callable(value)
    }
}

/// One source file's worth of IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrFile {
    pub name: String,
    #[serde(default)]
    pub imports: Vec<IrImport>,
    #[serde(default)]
    pub declarations: Vec<IrDeclaration>,
    /// File-level properties, e.g. the JVM package or Swift module.
    #[serde(default, skip_serializing_if = "LanguageProperties::is_empty")]
    pub properties: LanguageProperties,
}

impl IrFile {
    pub fn classes(&self) -> impl Iterator<Item = &IrClass> {
        self.declarations.iter().filter_map(IrDeclaration::as_class)
    }

    pub fn class(&self, name: &str) -> Option<&IrClass> {
        self.classes().find(|c| c.name == name)
    }

    /// File name without its extension (`Foo.java` -> `Foo`).
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

impl_ir_element!(IrImport);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IrFileBuilder;

    #[test]
    fn test_stem() {
        let file = IrFileBuilder::new("Foo.java").build();
        assert_eq!(file.stem(), "Foo");
        let file = IrFileBuilder::new("Makefile").build();
        assert_eq!(file.stem(), "Makefile");
    }

    #[test]
    fn test_import_simple_name() {
        assert_eq!(IrImport::new("java.util.List").simple_name(), "List");
        assert_eq!(IrImport::wildcard("java.util").simple_name(), "util");
    }
}
