//! Swift language module for mcodegen.
//!
//! Swift sources are parsed by an external companion executable that prints
//! the IR wire envelope (see [`mcodegen_core::ExternalFrontend`]). Generation
//! writes one `.swift` file per IR file directly under
//! `<output>/<subpath>/`, since Swift modules have no directory layout.

pub mod ext;
mod module;
mod writer;

pub use module::{DEFAULT_COMPANION, SwiftModule};
pub use writer::SwiftWriter;
