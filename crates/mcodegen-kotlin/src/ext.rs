//! Kotlin-only members of the open IR variant sets.

use mcodegen_ir::{IrClassKind, IrVisibility};

pub const LANGUAGE: &str = "kotlin";

/// `object Name { ... }`. A companion object additionally carries the
/// `companion` property.
pub fn object() -> IrClassKind {
    IrClassKind::extension(LANGUAGE, "object")
}

pub fn is_object(kind: &IrClassKind) -> bool {
    kind.is_extension(LANGUAGE, "object")
}

/// Java's package-private scope, which Kotlin approximates with `internal`.
pub(crate) fn is_java_package_private(visibility: &IrVisibility) -> bool {
    visibility.is_extension("java", "package-private")
}
