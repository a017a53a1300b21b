//! Java-only members of the open IR variant sets.

use mcodegen_ir::{IrClassKind, IrVisibility};

pub const LANGUAGE: &str = "java";

/// No access modifier: visible inside the package only.
pub fn package_private() -> IrVisibility {
    IrVisibility::extension(LANGUAGE, "package-private")
}

pub fn is_package_private(visibility: &IrVisibility) -> bool {
    visibility.is_extension(LANGUAGE, "package-private")
}

/// `record Name(components) { ... }`; components are the non-static fields.
pub fn record() -> IrClassKind {
    IrClassKind::extension(LANGUAGE, "record")
}

pub fn is_record(kind: &IrClassKind) -> bool {
    kind.is_extension(LANGUAGE, "record")
}
