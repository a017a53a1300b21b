//! Builders for declaration nodes.
//!
//! Builders default optional collections to empty and check required fields
//! in `build()`, so a partially-constructed node never escapes.

use crate::class::*;
use crate::expr::IrExpression;
use crate::file::{IrDeclaration, IrFile, IrImport};
use crate::meta::{IrAnnotation, IrLocation, IrMeta};
use crate::properties::{LanguageProperties, PropertyValue};
use crate::stmt::IrStatement;
use crate::types::{IrType, IrTypeParameter};

/// A required field was not set before `build()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("{node} `{name}` is missing required field `{field}`")]
    MissingField {
        node: &'static str,
        name: String,
        field: &'static str,
    },
}

fn missing(node: &'static str, name: &str, field: &'static str) -> BuildError {
    BuildError::MissingField {
        node,
        name: name.to_string(),
        field,
    }
}

/// Shared setters for the [`IrMeta`] of whatever is being built.
macro_rules! meta_setters {
    () => {
        pub fn location(mut self, location: IrLocation) -> Self {
            self.meta.location = Some(location);
            self
        }

        pub fn annotation(mut self, annotation: IrAnnotation) -> Self {
            self.meta.annotations.push(annotation);
            self
        }

        pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
            self.meta.properties.insert(key, value);
            self
        }
    };
}

#[derive(Debug, Clone)]
pub struct IrFileBuilder {
    name: String,
    imports: Vec<IrImport>,
    declarations: Vec<IrDeclaration>,
    properties: LanguageProperties,
}

impl IrFileBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            imports: Vec::new(),
            declarations: Vec::new(),
            properties: LanguageProperties::new(),
        }
    }

    pub fn import(mut self, import: IrImport) -> Self {
        self.imports.push(import);
        self
    }

    pub fn declaration(mut self, declaration: impl Into<IrDeclaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn properties(mut self, properties: LanguageProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn push_import(&mut self, import: IrImport) {
        self.imports.push(import);
    }

    pub fn push_declaration(&mut self, declaration: impl Into<IrDeclaration>) {
        self.declarations.push(declaration.into());
    }

    /// A file has no required fields beyond its name.
    pub fn build(self) -> IrFile {
        IrFile {
            name: self.name,
            imports: self.imports,
            declarations: self.declarations,
            properties: self.properties,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IrClassBuilder {
    qualified_name: String,
    name: String,
    kind: Option<IrClassKind>,
    visibility: Option<IrVisibility>,
    type_parameters: Vec<IrTypeParameter>,
    super_classes: Vec<IrSuperClass>,
    fields: Vec<IrField>,
    callables: Vec<IrCallable>,
    nested_classes: Vec<IrClass>,
    initializers: Vec<IrClassInitializer>,
    meta: IrMeta,
}

impl IrClassBuilder {
    /// Starts a class whose qualified name equals its simple name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::qualified(name.clone(), name)
    }

    pub fn qualified(qualified_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            name: name.into(),
            kind: None,
            visibility: None,
            type_parameters: Vec::new(),
            super_classes: Vec::new(),
            fields: Vec::new(),
            callables: Vec::new(),
            nested_classes: Vec::new(),
            initializers: Vec::new(),
            meta: IrMeta::default(),
        }
    }

    /// Starts from an existing class, e.g. to copy it with some members replaced.
    pub fn from_class(class: IrClass) -> Self {
        Self {
            qualified_name: class.qualified_name,
            name: class.name,
            kind: Some(class.kind),
            visibility: Some(class.visibility),
            type_parameters: class.type_parameters,
            super_classes: class.super_classes,
            fields: class.fields,
            callables: class.callables,
            nested_classes: class.nested_classes,
            initializers: class.initializers,
            meta: class.meta,
        }
    }

    pub fn kind(mut self, kind: IrClassKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn visibility(mut self, visibility: IrVisibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn type_parameter(mut self, type_parameter: IrTypeParameter) -> Self {
        self.type_parameters.push(type_parameter);
        self
    }

    pub fn super_class(mut self, super_class: IrSuperClass) -> Self {
        self.super_classes.push(super_class);
        self
    }

    pub fn field(mut self, field: IrField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: Vec<IrField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn callable(mut self, callable: IrCallable) -> Self {
        self.callables.push(callable);
        self
    }

    pub fn nested_class(mut self, nested: IrClass) -> Self {
        self.nested_classes.push(nested);
        self
    }

    pub fn nested_classes(mut self, nested: Vec<IrClass>) -> Self {
        self.nested_classes = nested;
        self
    }

    pub fn initializer(mut self, initializer: IrClassInitializer) -> Self {
        self.initializers.push(initializer);
        self
    }

    pub fn push_field(&mut self, field: IrField) {
        self.fields.push(field);
    }

    pub fn push_callable(&mut self, callable: IrCallable) {
        self.callables.push(callable);
    }

    pub fn push_nested_class(&mut self, nested: IrClass) {
        self.nested_classes.push(nested);
    }

    pub fn push_super_class(&mut self, super_class: IrSuperClass) {
        self.super_classes.push(super_class);
    }

    pub fn push_initializer(&mut self, initializer: IrClassInitializer) {
        self.initializers.push(initializer);
    }

    meta_setters!();

    pub fn build(self) -> Result<IrClass, BuildError> {
        let kind = self
            .kind
            .ok_or_else(|| missing("class", &self.name, "kind"))?;
        let visibility = self
            .visibility
            .ok_or_else(|| missing("class", &self.name, "visibility"))?;

        let nested_classes = self
            .nested_classes
            .into_iter()
            .map(|nested| requalify(nested, &self.qualified_name))
            .collect();

        Ok(IrClass {
            qualified_name: self.qualified_name,
            name: self.name,
            kind,
            visibility,
            type_parameters: self.type_parameters,
            super_classes: self.super_classes,
            fields: self.fields,
            callables: self.callables,
            nested_classes,
            initializers: self.initializers,
            meta: self.meta,
        })
    }
}

/// Re-derives qualified names of `class` and its nested chain under `outer`.
fn requalify(mut class: IrClass, outer: &str) -> IrClass {
    class.qualified_name = format!("{}.{}", outer, class.name);
    let qualified = class.qualified_name.clone();
    class.nested_classes = class
        .nested_classes
        .into_iter()
        .map(|nested| requalify(nested, &qualified))
        .collect();
    class
}

#[derive(Debug, Clone)]
pub struct IrFieldBuilder {
    name: String,
    ty: IrType,
    visibility: Option<IrVisibility>,
    mutable: bool,
    initializer: Option<IrStatement>,
    meta: IrMeta,
}

impl IrFieldBuilder {
    /// Fields are mutable unless told otherwise.
    pub fn new(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: None,
            mutable: true,
            initializer: None,
            meta: IrMeta::default(),
        }
    }

    pub fn visibility(mut self, visibility: IrVisibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn mutable(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
    }

    pub fn initializer(mut self, initializer: IrStatement) -> Self {
        self.initializer = Some(initializer);
        self
    }

    meta_setters!();

    pub fn build(self) -> Result<IrField, BuildError> {
        let visibility = self
            .visibility
            .ok_or_else(|| missing("field", &self.name, "visibility"))?;
        Ok(IrField {
            name: self.name,
            ty: self.ty,
            visibility,
            mutable: self.mutable,
            initializer: self.initializer,
            meta: self.meta,
        })
    }
}

#[derive(Debug, Clone)]
pub struct IrCallableBuilder {
    kind: IrCallableKind,
    name: String,
    return_type: IrType,
    parameters: Vec<IrParameter>,
    type_parameters: Vec<IrTypeParameter>,
    body: Option<Vec<IrStatement>>,
    visibility: Option<IrVisibility>,
    is_abstract: bool,
    is_static: bool,
    is_override: bool,
    meta: IrMeta,
}

impl IrCallableBuilder {
    pub fn method(name: impl Into<String>, return_type: IrType) -> Self {
        Self::with_kind(IrCallableKind::Method, name, return_type)
    }

    /// Constructors return `void`; the return type is ignored on emission.
    pub fn constructor(name: impl Into<String>) -> Self {
        Self::with_kind(
            IrCallableKind::Constructor { delegate: None },
            name,
            IrType::void(),
        )
    }

    fn with_kind(kind: IrCallableKind, name: impl Into<String>, return_type: IrType) -> Self {
        Self {
            kind,
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            type_parameters: Vec::new(),
            body: None,
            visibility: None,
            is_abstract: false,
            is_static: false,
            is_override: false,
            meta: IrMeta::default(),
        }
    }

    /// Sets the `this(...)`/`super(...)` delegation. No effect on methods.
    pub fn delegate(mut self, call: IrExpression) -> Self {
        if let IrCallableKind::Constructor { delegate } = &mut self.kind {
            *delegate = Some(call);
        }
        self
    }

    pub fn parameter(mut self, parameter: IrParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn type_parameter(mut self, type_parameter: IrTypeParameter) -> Self {
        self.type_parameters.push(type_parameter);
        self
    }

    pub fn body(mut self, statements: Vec<IrStatement>) -> Self {
        self.body = Some(statements);
        self
    }

    pub fn visibility(mut self, visibility: IrVisibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn is_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn is_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn is_override(mut self, is_override: bool) -> Self {
        self.is_override = is_override;
        self
    }

    meta_setters!();

    pub fn build(self) -> Result<IrCallable, BuildError> {
        let visibility = self
            .visibility
            .ok_or_else(|| missing("callable", &self.name, "visibility"))?;
        Ok(IrCallable {
            kind: self.kind,
            name: self.name,
            return_type: self.return_type,
            parameters: self.parameters,
            type_parameters: self.type_parameters,
            body: self.body,
            visibility,
            is_abstract: self.is_abstract,
            is_static: self.is_static,
            is_override: self.is_override,
            meta: self.meta,
        })
    }
}

impl IrSuperClass {
    pub fn new(name: impl Into<String>, kind: IrClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_arguments: Vec::new(),
            meta: IrMeta::default(),
        }
    }

    pub fn with_type_arguments(mut self, type_arguments: Vec<IrType>) -> Self {
        self.type_arguments = type_arguments;
        self
    }
}

impl IrClassInitializer {
    pub fn new(kind: IrInitializerKind, body: Option<Vec<IrStatement>>) -> Self {
        Self {
            kind,
            body,
            meta: IrMeta::default(),
        }
    }
}
