//! Type references.

use crate::meta::{IrMeta, impl_ir_element};
use serde::{Deserialize, Serialize};

/// A type as written at a use site.
///
/// `nullable` is always present. Readers for languages without a nullability
/// concept default references to `true` and primitives to `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrType {
    pub kind: IrTypeKind,
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrTypeKind {
    /// A named class/interface type, possibly parameterized (`List<String>`).
    Reference {
        name: String,
        #[serde(default)]
        arguments: Vec<IrType>,
    },
    Primitive {
        primitive: IrPrimitive,
    },
    Array {
        element: Box<IrType>,
    },
    Function {
        parameters: Vec<IrType>,
        returns: Box<IrType>,
    },
    /// A reference to a type parameter in scope (`T`).
    Generic {
        name: String,
    },
}

/// Primitive types shared by the supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrPrimitive {
    Void,
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    /// A primitive the front-end could not map; carries the source spelling.
    Unmapped(String),
}

impl IrPrimitive {
    pub fn as_str(&self) -> &str {
        match self {
            IrPrimitive::Void => "void",
            IrPrimitive::Boolean => "boolean",
            IrPrimitive::Byte => "byte",
            IrPrimitive::Short => "short",
            IrPrimitive::Int => "int",
            IrPrimitive::Long => "long",
            IrPrimitive::Char => "char",
            IrPrimitive::Float => "float",
            IrPrimitive::Double => "double",
            IrPrimitive::Unmapped(s) => s,
        }
    }
}

impl IrType {
    pub fn new(kind: IrTypeKind, nullable: bool) -> Self {
        Self {
            kind,
            nullable,
            meta: IrMeta::default(),
        }
    }

    /// A nullable reference without type arguments.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(
            IrTypeKind::Reference {
                name: name.into(),
                arguments: Vec::new(),
            },
            true,
        )
    }

    pub fn reference_with(name: impl Into<String>, arguments: Vec<IrType>) -> Self {
        Self::new(
            IrTypeKind::Reference {
                name: name.into(),
                arguments,
            },
            true,
        )
    }

    /// A non-nullable primitive.
    pub fn primitive(primitive: IrPrimitive) -> Self {
        Self::new(IrTypeKind::Primitive { primitive }, false)
    }

    pub fn void() -> Self {
        Self::primitive(IrPrimitive::Void)
    }

    pub fn array(element: IrType) -> Self {
        Self::new(
            IrTypeKind::Array {
                element: Box::new(element),
            },
            true,
        )
    }

    pub fn function(parameters: Vec<IrType>, returns: IrType) -> Self {
        Self::new(
            IrTypeKind::Function {
                parameters,
                returns: Box::new(returns),
            },
            true,
        )
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Self::new(IrTypeKind::Generic { name: name.into() }, true)
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_meta(mut self, meta: IrMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn is_void(&self) -> bool {
        matches!(
            self.kind,
            IrTypeKind::Primitive {
                primitive: IrPrimitive::Void
            }
        )
    }

    /// Name of a reference or generic type.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            IrTypeKind::Reference { name, .. } | IrTypeKind::Generic { name } => Some(name),
            _ => None,
        }
    }

    /// The last segment of a qualified reference name (`java.util.List` -> `List`).
    pub fn simple_name(&self) -> Option<&str> {
        self.name().map(|n| n.rsplit('.').next().unwrap_or(n))
    }
}

/// A declared type parameter with its upper bounds, e.g. `T extends Comparable<T>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrTypeParameter {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<IrType>,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

impl IrTypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
            meta: IrMeta::default(),
        }
    }

    pub fn with_bound(mut self, bound: IrType) -> Self {
        self.bounds.push(bound);
        self
    }
}

impl_ir_element!(IrType, IrTypeParameter);
