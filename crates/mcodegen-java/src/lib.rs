//! Java language module for mcodegen.
//!
//! - [`JavaModule`] parses Java with tree-sitter and emits one `.java` file per
//!   class under `<output>/<subpath>/<package dirs>/`.
//! - [`edit`] holds source-level edit steps (imports, interfaces, getters)
//!   and their handlers.

pub mod edit;
pub mod ext;
mod index;
mod module;
mod reader;
mod writer;

pub use edit::{
    AddJavaGetters, AddJavaGettersHandler, AddJavaImport, AddJavaImportHandler,
    AppendJavaInterfaces, AppendJavaInterfacesHandler,
};
pub use index::ClassIndex;
pub use module::{JVM_PACKAGE, JavaModule};
pub use writer::JavaWriter;
