//! Swift-only members of the open IR variant sets, and the property keys the
//! Swift module reads.

use mcodegen_ir::{IrClassKind, IrVisibility};

pub const LANGUAGE: &str = "swift";

/// File property naming the Swift module a file belongs to.
pub const SWIFT_MODULE: &str = "swiftModule";

/// Type property naming the module a referenced type comes from; the writer
/// qualifies the type name with it.
pub const ELEMENT_MODULE: &str = "swiftElementModule";

pub fn struct_kind() -> IrClassKind {
    IrClassKind::extension(LANGUAGE, "struct")
}

pub fn is_struct(kind: &IrClassKind) -> bool {
    kind.is_extension(LANGUAGE, "struct")
}

pub fn actor() -> IrClassKind {
    IrClassKind::extension(LANGUAGE, "actor")
}

pub fn is_actor(kind: &IrClassKind) -> bool {
    kind.is_extension(LANGUAGE, "actor")
}

/// `open`: public and overridable outside the module.
pub fn open() -> IrVisibility {
    IrVisibility::extension(LANGUAGE, "open")
}

pub fn is_open(visibility: &IrVisibility) -> bool {
    visibility.is_extension(LANGUAGE, "open")
}

pub fn fileprivate() -> IrVisibility {
    IrVisibility::extension(LANGUAGE, "fileprivate")
}

pub fn is_fileprivate(visibility: &IrVisibility) -> bool {
    visibility.is_extension(LANGUAGE, "fileprivate")
}
