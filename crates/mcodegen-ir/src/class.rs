//! Class-level declarations and their members.

use crate::expr::IrExpression;
use crate::meta::{IrMeta, impl_ir_element};
use crate::stmt::IrStatement;
use crate::types::{IrType, IrTypeParameter};
use serde::{Deserialize, Serialize};

/// Kind of a class-like declaration.
///
/// The four shared kinds live here. Language modules add their own kinds
/// (Kotlin `object`, Swift `struct`/`actor`) through [`IrClassKind::Extension`]
/// and expose constructors for them, so code matching on kinds must keep a
/// fallback arm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Extension { language: String, name: String },
}

impl IrClassKind {
    pub fn extension(language: impl Into<String>, name: impl Into<String>) -> Self {
        IrClassKind::Extension {
            language: language.into(),
            name: name.into(),
        }
    }

    /// True for an extension kind declared by `language` under `name`.
    pub fn is_extension(&self, language: &str, name: &str) -> bool {
        matches!(self, IrClassKind::Extension { language: l, name: n } if l == language && n == name)
    }
}

/// Visibility of a declaration.
///
/// Same open-set convention as [`IrClassKind`]: Java package-private, Swift
/// `open` / `fileprivate` are extensions owned by their language modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrVisibility {
    Public,
    Protected,
    Internal,
    Private,
    Extension { language: String, name: String },
}

impl IrVisibility {
    pub fn extension(language: impl Into<String>, name: impl Into<String>) -> Self {
        IrVisibility::Extension {
            language: language.into(),
            name: name.into(),
        }
    }

    pub fn is_extension(&self, language: &str, name: &str) -> bool {
        matches!(self, IrVisibility::Extension { language: l, name: n } if l == language && n == name)
    }
}

/// A supertype reference: `extends Base<T>` / `implements Api` / `: Base()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrSuperClass {
    pub name: String,
    pub kind: IrClassKind,
    #[serde(default)]
    pub type_arguments: Vec<IrType>,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrField {
    pub name: String,
    #[serde(rename = "field_type")]
    pub ty: IrType,
    pub visibility: IrVisibility,
    pub mutable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<IrStatement>,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrParameter {
    pub name: String,
    #[serde(rename = "parameter_type")]
    pub ty: IrType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<IrExpression>,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

impl IrParameter {
    pub fn new(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
            meta: IrMeta::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrCallableKind {
    Method,
    Constructor {
        /// `this(...)` / `super(...)` call opening the constructor body.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delegate: Option<IrExpression>,
    },
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrCallable {
    pub kind: IrCallableKind,
    pub name: String,
    /// Ignored for constructors.
    pub return_type: IrType,
    #[serde(default)]
    pub parameters: Vec<IrParameter>,
    #[serde(default)]
    pub type_parameters: Vec<IrTypeParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<IrStatement>>,
    pub visibility: IrVisibility,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_override: bool,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

impl IrCallable {
    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, IrCallableKind::Constructor { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrInitializerKind {
    Instance,
    Static,
}

/// `{ ... }` / `static { ... }` / Kotlin `init { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrClassInitializer {
    pub kind: IrInitializerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<IrStatement>>,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

/// A class-like declaration.
///
/// `name` is the simple name used for in-source lookups; `qualified_name` is
/// used for cross-reference resolution. Nested classes carry a qualified name
/// derived from their enclosing chain (see [`crate::IrClassBuilder`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrClass {
    pub qualified_name: String,
    pub name: String,
    pub kind: IrClassKind,
    pub visibility: IrVisibility,
    #[serde(default)]
    pub type_parameters: Vec<IrTypeParameter>,
    #[serde(default)]
    pub super_classes: Vec<IrSuperClass>,
    #[serde(default)]
    pub fields: Vec<IrField>,
    #[serde(default)]
    pub callables: Vec<IrCallable>,
    #[serde(default)]
    pub nested_classes: Vec<IrClass>,
    #[serde(default)]
    pub initializers: Vec<IrClassInitializer>,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

impl IrClass {
    pub fn field(&self, name: &str) -> Option<&IrField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn nested(&self, name: &str) -> Option<&IrClass> {
        self.nested_classes.iter().find(|c| c.name == name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &IrCallable> {
        self.callables.iter().filter(|c| !c.is_constructor())
    }

    pub fn constructors(&self) -> impl Iterator<Item = &IrCallable> {
        self.callables.iter().filter(|c| c.is_constructor())
    }

    /// Supertypes whose kind is [`IrClassKind::Class`].
    pub fn base_classes(&self) -> impl Iterator<Item = &IrSuperClass> {
        self.super_classes
            .iter()
            .filter(|s| s.kind == IrClassKind::Class)
    }
}

impl_ir_element!(
    IrSuperClass,
    IrField,
    IrParameter,
    IrCallable,
    IrClassInitializer,
    IrClass
);
