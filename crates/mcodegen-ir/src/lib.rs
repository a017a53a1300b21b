//! Language-neutral intermediate representation for code generation.
//!
//! Front-ends parse Java, Kotlin or Swift source into an [`IrFile`]; mappers and
//! the unification engine transform it; back-ends emit it in a target language.
//!
//! # Architecture
//!
//! ```text
//! IrFile
//! ├── imports: Vec<IrImport>
//! ├── declarations: Vec<IrDeclaration>
//! │     └── IrClass ── fields, callables, nested classes, initializers
//! │                        └── IrStatement / IrExpression / IrType
//! └── properties: LanguageProperties
//! ```
//!
//! Every element carries an [`IrMeta`]: an optional source location, its
//! annotations, and a bag of language-specific properties. Language-specific
//! class kinds and visibilities use the `Extension` variants of
//! [`IrClassKind`] and [`IrVisibility`].
//!
//! Constructs a front-end cannot map become `Unknown` statements or
//! expressions carrying the original text; a back-end emits that text only
//! when the language matches.

pub mod builders;
pub mod class;
pub mod expr;
pub mod file;
pub mod meta;
pub mod properties;
pub mod stmt;
pub mod structure_eq;
pub mod types;
pub mod wire;

pub use builders::{
    BuildError, IrCallableBuilder, IrClassBuilder, IrFieldBuilder, IrFileBuilder,
};
pub use class::{
    IrCallable, IrCallableKind, IrClass, IrClassInitializer, IrClassKind, IrField,
    IrInitializerKind, IrParameter, IrSuperClass, IrVisibility,
};
pub use expr::{
    IrAssignmentOperator, IrBinaryOperator, IrCallKind, IrExpression, IrExpressionKind,
    IrFallback, IrUnaryOperator, fallback_for,
};
pub use file::{IrDeclaration, IrFile, IrImport};
pub use meta::{IrAnnotation, IrAnnotationParameter, IrElement, IrLocation, IrMeta};
pub use properties::{LanguageProperties, PropertyValue};
pub use stmt::{IrCatchClause, IrStatement, IrStatementKind, IrSwitchCase};
pub use structure_eq::StructureEq;
pub use types::{IrPrimitive, IrType, IrTypeKind, IrTypeParameter};
pub use wire::{IR_SCHEMA_VERSION, WireError};
