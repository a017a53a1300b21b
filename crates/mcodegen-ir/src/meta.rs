//! Data shared by every IR node: location, annotations and language properties.

use crate::expr::IrExpression;
use crate::properties::{LanguageProperties, PropertyValue};
use serde::{Deserialize, Serialize};

/// Where a node came from. Diagnostics only; never part of a node's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrLocation {
    pub file_path: String,
    pub line: usize,
    pub column: usize,
}

impl IrLocation {
    pub fn new(file_path: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
        }
    }
}

/// An annotation / attribute attached to a declaration, e.g. `@Deprecated(since = "2")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrAnnotation {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<IrAnnotationParameter>,
    #[serde(default, skip_serializing_if = "LanguageProperties::is_empty")]
    pub properties: LanguageProperties,
}

impl IrAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            properties: LanguageProperties::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: IrExpression) -> Self {
        self.parameters.push(IrAnnotationParameter {
            name: name.into(),
            value,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrAnnotationParameter {
    pub name: String,
    pub value: IrExpression,
}

/// Location, annotations and language properties carried by every element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<IrLocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<IrAnnotation>,
    #[serde(default, skip_serializing_if = "LanguageProperties::is_empty")]
    pub properties: LanguageProperties,
}

impl IrMeta {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.annotations.is_empty() && self.properties.is_empty()
    }

    pub fn with_location(mut self, location: IrLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_annotation(mut self, annotation: IrAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }
}

/// Capability shared by all IR nodes.
pub trait IrElement {
    fn meta(&self) -> &IrMeta;

    fn location(&self) -> Option<&IrLocation> {
        self.meta().location.as_ref()
    }

    fn annotations(&self) -> &[IrAnnotation] {
        &self.meta().annotations
    }

    fn properties(&self) -> &LanguageProperties {
        &self.meta().properties
    }

    fn has_annotation(&self, name: &str) -> bool {
        self.annotations().iter().any(|a| a.name == name)
    }
}

/// Implements [`IrElement`] for node structs that keep their data in a `meta` field.
macro_rules! impl_ir_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::meta::IrElement for $ty {
                fn meta(&self) -> &$crate::meta::IrMeta {
                    &self.meta
                }
            }
        )*
    };
}

pub(crate) use impl_ir_element;
