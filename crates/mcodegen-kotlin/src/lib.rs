//! Kotlin language module for mcodegen.
//!
//! [`KotlinModule`] parses Kotlin with tree-sitter and emits one `.kt` file
//! per IR file under `<output>/<subpath>/<package dirs>/`, named after the
//! IR file. Declarations are mapped structurally; function bodies travel as
//! Kotlin text.

pub mod ext;
mod module;
mod reader;
mod writer;

pub use module::{JVM_PACKAGE, KotlinModule};
pub use writer::KotlinWriter;
