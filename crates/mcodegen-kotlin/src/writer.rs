//! Kotlin writer for IR.
//!
//! Emits one file per class. Java-only shapes are translated where Kotlin
//! has a direct counterpart: static members move into a synthesized
//! `companion object`, `switch` becomes `when`, the ternary becomes an `if`
//! expression and bitwise operators become their infix functions. Shapes
//! with no counterpart fail with [`Error::UnsupportedShape`] and `Unknown`
//! nodes without Kotlin text fail with [`Error::MissingFallback`].

use crate::ext::{self, LANGUAGE};
use mcodegen_core::{Error, Result};
use mcodegen_ir::*;
use std::fmt::Write;

/// Packages whose types are visible without an import.
const AUTO_IMPORTED: &[&str] = &["java.lang", "kotlin", "kotlin.collections"];

/// Emits IR as Kotlin source code.
pub struct KotlinWriter<'a> {
    output: String,
    indent: usize,
    unit: &'a str,
    package: &'a str,
    imports: Vec<&'a str>,
}

impl<'a> KotlinWriter<'a> {
    /// Emit `class` as a Kotlin file in `package`; an empty package is the
    /// root package.
    pub fn emit(
        package: &'a str,
        imports: &'a [IrImport],
        class: &IrClass,
        indent_unit: &'a str,
    ) -> Result<String> {
        let mut writer = Self {
            output: String::new(),
            indent: 0,
            unit: indent_unit,
            package,
            imports: imports
                .iter()
                .filter(|i| !i.wildcard && !i.meta.properties.contains("alias"))
                .map(|i| i.path.as_str())
                .collect(),
        };
        writer.write_header(imports);
        writer.write_class(class, false)?;
        Ok(writer.output)
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str(self.unit);
        }
    }

    fn unsupported(shape: impl Into<String>) -> Error {
        Error::UnsupportedShape {
            language: LANGUAGE,
            shape: shape.into(),
        }
    }

    fn fallback<'f>(fallback: &'f [IrFallback], node: &'static str) -> Result<&'f str> {
        fallback_for(fallback, LANGUAGE).ok_or(Error::MissingFallback {
            language: LANGUAGE,
            node,
        })
    }

    fn write_header(&mut self, imports: &[IrImport]) {
        if !self.package.is_empty() {
            let _ = writeln!(self.output, "package {}\n", self.package);
        }
        if imports.is_empty() {
            return;
        }
        for import in imports {
            self.output.push_str("import ");
            self.output.push_str(&import.path);
            if import.wildcard {
                self.output.push_str(".*");
            }
            if let Some(alias) = import.meta.properties.get_str("alias") {
                let _ = write!(self.output, " as {alias}");
            }
            self.output.push('\n');
        }
        self.output.push('\n');
    }

    /// Simple Kotlin name when the type is visible without qualification.
    fn type_name<'n>(&self, name: &'n str) -> &'n str {
        let simple = match name.rsplit_once('.') {
            Some((package, simple))
                if package == self.package
                    || AUTO_IMPORTED.contains(&package)
                    || self.imports.contains(&name) =>
            {
                simple
            }
            Some(_) => return name,
            None => name,
        };
        kotlin_name(simple)
    }

    // ----------------------------------------------------------------------
    // Declarations
    // ----------------------------------------------------------------------

    fn write_annotations(&mut self, annotations: &[IrAnnotation], inline: bool) -> Result<()> {
        for annotation in annotations {
            if !inline {
                self.write_indent();
            }
            self.output.push('@');
            if let Some(site) = annotation.properties.get_str("use_site") {
                let _ = write!(self.output, "{site}:");
            }
            self.output.push_str(self.type_name(&annotation.name));
            match annotation.parameters.as_slice() {
                [] => {}
                [only] if only.name == "value" => {
                    self.output.push('(');
                    self.write_expr(&only.value)?;
                    self.output.push(')');
                }
                params => {
                    self.output.push('(');
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            self.output.push_str(", ");
                        }
                        let _ = write!(self.output, "{} = ", param.name);
                        self.write_expr(&param.value)?;
                    }
                    self.output.push(')');
                }
            }
            self.output.push(if inline { ' ' } else { '\n' });
        }
        Ok(())
    }

    /// Public is the default and is never written.
    fn write_visibility(&mut self, visibility: &IrVisibility) -> Result<()> {
        match visibility {
            IrVisibility::Public => {}
            IrVisibility::Protected => self.output.push_str("protected "),
            IrVisibility::Private => self.output.push_str("private "),
            IrVisibility::Internal => self.output.push_str("internal "),
            v if ext::is_java_package_private(v) => self.output.push_str("internal "),
            IrVisibility::Extension { language, name } => {
                return Err(Self::unsupported(format!("{language} visibility `{name}`")));
            }
        }
        Ok(())
    }

    fn write_flags(&mut self, properties: &LanguageProperties, flags: &[&str]) {
        for flag in flags {
            if properties.flag(flag) {
                self.output.push_str(flag);
                self.output.push(' ');
            }
        }
    }

    fn write_type_parameters(&mut self, params: &[IrTypeParameter]) -> Result<()> {
        if params.is_empty() {
            return Ok(());
        }
        self.output.push('<');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            if let Some(variance) = param.meta.properties.get_str("variance") {
                let _ = write!(self.output, "{variance} ");
            }
            self.output.push_str(&param.name);
            match param.bounds.as_slice() {
                [] => {}
                [bound] => {
                    self.output.push_str(" : ");
                    self.write_type(bound)?;
                }
                _ => {
                    return Err(Self::unsupported(format!(
                        "type parameter `{}` with several bounds",
                        param.name
                    )));
                }
            }
        }
        self.output.push('>');
        Ok(())
    }

    fn write_class(&mut self, class: &IrClass, in_interface: bool) -> Result<()> {
        let props = &class.meta.properties;
        let is_record = class.kind.is_extension("java", "record");
        let is_object = ext::is_object(&class.kind);
        let keyword = match &class.kind {
            IrClassKind::Class => "class",
            IrClassKind::Interface if props.flag("fun") => "fun interface",
            IrClassKind::Interface => "interface",
            IrClassKind::Enum => "enum class",
            IrClassKind::Annotation => "annotation class",
            _ if is_object && props.flag("companion") => "companion object",
            _ if is_object => "object",
            _ if is_record => "data class",
            IrClassKind::Extension { language, name } => {
                return Err(Self::unsupported(format!("{language} class kind `{name}`")));
            }
        };

        let bases = class.base_classes().count();
        let can_extend = matches!(class.kind, IrClassKind::Class) || is_object || is_record;
        if bases > 1 || (bases == 1 && !can_extend) {
            return Err(Self::unsupported(format!(
                "{keyword} `{}` with {bases} base classes",
                class.name
            )));
        }

        // Members of an object are already static.
        let hoist = !is_object;
        let is_static_field = |f: &IrField| hoist && f.meta.properties.flag("static");
        let primary = class
            .callables
            .iter()
            .find(|c| c.is_constructor() && c.meta.properties.flag("primary"));
        let properties: Vec<&IrField> = class
            .fields
            .iter()
            .filter(|f| {
                f.meta.properties.flag("constructor_property")
                    || (is_record && !f.meta.properties.flag("static"))
            })
            .collect();
        let constants: Vec<&IrField> = class
            .fields
            .iter()
            .filter(|f| f.meta.properties.flag("enum_constant"))
            .collect();
        let fields: Vec<&IrField> = class
            .fields
            .iter()
            .filter(|f| {
                !properties.iter().any(|p| p.name == f.name)
                    && !f.meta.properties.flag("enum_constant")
                    && !is_static_field(*f)
            })
            .collect();
        let static_fields: Vec<&IrField> = class
            .fields
            .iter()
            .filter(|f| is_static_field(*f) && !f.meta.properties.flag("enum_constant"))
            .collect();

        // Whatever the primary constructor does beyond storing its
        // properties runs in an `init` block.
        let primary_rest: Vec<IrStatement> = primary
            .and_then(|p| p.body.as_deref())
            .unwrap_or_default()
            .iter()
            .filter(|s| !assigns_property(s, &properties))
            .cloned()
            .collect();
        let mut initializers: Vec<&[IrStatement]> = Vec::new();
        if !primary_rest.is_empty() {
            initializers.push(&primary_rest);
        }
        let mut static_initializers: Vec<&[IrStatement]> = Vec::new();
        for init in &class.initializers {
            let body = init.body.as_deref().unwrap_or_default();
            if hoist && init.kind == IrInitializerKind::Static {
                static_initializers.push(body);
            } else {
                initializers.push(body);
            }
        }
        let callables: Vec<&IrCallable> = class
            .callables
            .iter()
            .filter(|c| !c.meta.properties.flag("primary") && !(hoist && c.is_static))
            .collect();
        let static_callables: Vec<&IrCallable> = class
            .callables
            .iter()
            .filter(|c| hoist && c.is_static)
            .collect();

        let has_statics = !static_fields.is_empty()
            || !static_initializers.is_empty()
            || !static_callables.is_empty();
        if has_statics && class.nested_classes.iter().any(|n| n.meta.properties.flag("companion")) {
            return Err(Self::unsupported(format!(
                "static members alongside the companion object of `{}`",
                class.name
            )));
        }

        // Header
        self.write_annotations(&class.meta.annotations, false)?;
        self.write_indent();
        if !in_interface || class.visibility != IrVisibility::Public {
            self.write_visibility(&class.visibility)?;
        }
        if class.kind == IrClassKind::Class {
            self.write_flags(props, &["sealed", "abstract", "open", "data", "inner", "value"]);
        }
        self.output.push_str(keyword);
        if !props.flag("companion") || class.name != "Companion" {
            self.output.push(' ');
            self.output.push_str(&class.name);
        }
        self.write_type_parameters(&class.type_parameters)?;

        let has_header = primary.is_some() || !properties.is_empty();
        if has_header {
            if let Some(ctor) = primary.filter(|p| p.visibility != IrVisibility::Public) {
                self.output.push(' ');
                self.write_visibility(&ctor.visibility)?;
                self.output.push_str("constructor");
            }
            self.write_primary_parameters(primary, &properties)?;
        }

        if !class.super_classes.is_empty() {
            let has_constructors = class.callables.iter().any(IrCallable::is_constructor);
            self.output.push_str(" : ");
            for (i, super_type) in class.super_classes.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.output.push_str(self.type_name(&super_type.name));
                self.write_type_arguments(&super_type.type_arguments)?;
                if super_type.kind == IrClassKind::Class {
                    match super_type.meta.properties.get_str("arguments") {
                        Some(args) => self.output.push_str(args),
                        None if has_header || !has_constructors => self.output.push_str("()"),
                        None => {}
                    }
                }
                if let Some(delegate) = super_type.meta.properties.get_str("delegate") {
                    let _ = write!(self.output, " by {delegate}");
                }
            }
        }

        let has_members = !constants.is_empty()
            || !fields.is_empty()
            || !initializers.is_empty()
            || !callables.is_empty()
            || !class.nested_classes.is_empty()
            || has_statics;
        if !has_members {
            self.output.push('\n');
            return Ok(());
        }

        // Body
        let in_interface = class.kind == IrClassKind::Interface;
        self.output.push_str(" {\n");
        self.indent += 1;

        let mut first = true;
        let mut separate = |out: &mut String| {
            if !first {
                out.push('\n');
            }
            first = false;
        };

        if class.kind == IrClassKind::Enum {
            separate(&mut self.output);
            let more = has_members
                && (!fields.is_empty()
                    || !initializers.is_empty()
                    || !callables.is_empty()
                    || !class.nested_classes.is_empty()
                    || has_statics);
            self.write_enum_entries(&constants, more)?;
        }
        for field in fields {
            separate(&mut self.output);
            self.write_property(field, in_interface, false)?;
        }
        for body in initializers {
            separate(&mut self.output);
            self.write_indent();
            self.output.push_str("init ");
            self.write_body(body)?;
        }
        for callable in callables {
            separate(&mut self.output);
            self.write_callable(callable, in_interface)?;
        }
        for nested in &class.nested_classes {
            separate(&mut self.output);
            self.write_class(nested, in_interface)?;
        }

        if has_statics {
            separate(&mut self.output);
            self.write_indent();
            self.output.push_str("companion object {\n");
            self.indent += 1;
            let mut first = true;
            let mut separate = |out: &mut String| {
                if !first {
                    out.push('\n');
                }
                first = false;
            };
            for field in static_fields {
                separate(&mut self.output);
                self.write_property(field, false, is_constant(field))?;
            }
            for body in static_initializers {
                separate(&mut self.output);
                self.write_indent();
                self.output.push_str("init ");
                self.write_body(body)?;
            }
            for callable in static_callables {
                separate(&mut self.output);
                self.write_callable(callable, false)?;
            }
            self.indent -= 1;
            self.write_indent();
            self.output.push_str("}\n");
        }

        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    /// `(val id: Long, var name: String?, extra: Int)`
    fn write_primary_parameters(
        &mut self,
        primary: Option<&IrCallable>,
        properties: &[&IrField],
    ) -> Result<()> {
        self.output.push('(');
        match primary {
            Some(ctor) => {
                for (i, param) in ctor.parameters.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_annotations(&param.meta.annotations, true)?;
                    if let Some(field) = properties.iter().find(|f| f.name == param.name) {
                        self.write_visibility(&field.visibility)?;
                        self.write_flags(&field.meta.properties, &["override", "open"]);
                        self.output
                            .push_str(if field.mutable { "var " } else { "val " });
                    }
                    self.write_parameter(param)?;
                }
            }
            None => {
                for (i, field) in properties.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_annotations(&field.meta.annotations, true)?;
                    self.write_visibility(&field.visibility)?;
                    self.output
                        .push_str(if field.mutable { "var " } else { "val " });
                    let _ = write!(self.output, "{}: ", field.name);
                    self.write_type(&field.ty)?;
                }
            }
        }
        self.output.push(')');
        Ok(())
    }

    fn write_enum_entries(&mut self, constants: &[&IrField], more: bool) -> Result<()> {
        for (i, constant) in constants.iter().enumerate() {
            self.write_annotations(&constant.meta.annotations, false)?;
            self.write_indent();
            self.output.push_str(&constant.name);
            if let Some(init) = &constant.initializer {
                match init.as_expression().map(|e| &e.kind) {
                    Some(IrExpressionKind::ObjectCreation { arguments, .. }) => {
                        if !arguments.is_empty() {
                            self.write_arguments(arguments)?;
                        }
                    }
                    _ => {
                        return Err(Self::unsupported(format!(
                            "enum entry `{}` with a non-constructor initializer",
                            constant.name
                        )));
                    }
                }
            }
            if let Some(body) = constant.meta.properties.get_str("body") {
                let _ = write!(self.output, " {body}");
            }
            let last = i + 1 == constants.len();
            self.output.push_str(match (last, more) {
                (false, _) => ",\n",
                (true, true) => ";\n",
                (true, false) => "\n",
            });
        }
        if constants.is_empty() && more {
            self.write_indent();
            self.output.push_str(";\n");
        }
        Ok(())
    }

    /// `constant` marks a `static final` primitive or string with a literal value.
    fn write_property(&mut self, field: &IrField, in_interface: bool, constant: bool) -> Result<()> {
        let props = &field.meta.properties;
        self.write_annotations(&field.meta.annotations, false)?;
        self.write_indent();
        if !in_interface || field.visibility != IrVisibility::Public {
            self.write_visibility(&field.visibility)?;
        }
        self.write_flags(props, &["override", "abstract", "open", "lateinit"]);
        if constant || props.flag("const") {
            self.output.push_str("const ");
        }
        if let Some(receiver) = props.get_str("receiver") {
            let _ = write!(
                self.output,
                "{} {receiver}.{}",
                if field.mutable { "var" } else { "val" },
                field.name
            );
        } else {
            let _ = write!(
                self.output,
                "{} {}",
                if field.mutable { "var" } else { "val" },
                field.name
            );
        }
        if !(props.flag("inferred_type") && field.initializer.is_some()) {
            self.output.push_str(": ");
            self.write_type(&field.ty)?;
        }
        if let Some(delegate) = props.get_str("delegate") {
            let _ = write!(self.output, " by {delegate}");
        } else if let Some(init) = &field.initializer {
            self.output.push_str(" = ");
            self.write_field_initializer(init)?;
        }
        self.output.push('\n');

        for accessor in ["getter", "setter"] {
            if let Some(text) = props.get_str(accessor) {
                self.indent += 1;
                self.write_indent();
                self.output.push_str(text);
                self.output.push('\n');
                self.indent -= 1;
            }
        }
        Ok(())
    }

    fn write_field_initializer(&mut self, init: &IrStatement) -> Result<()> {
        match &init.kind {
            IrStatementKind::Expression { expression } => self.write_expr(expression),
            IrStatementKind::Unknown { fallback } => {
                let text = Self::fallback(fallback, "initializer")?;
                self.output.push_str(text);
                Ok(())
            }
            _ => Err(Self::unsupported("statement as property initializer")),
        }
    }

    fn write_callable(&mut self, callable: &IrCallable, in_interface: bool) -> Result<()> {
        let annotations: Vec<IrAnnotation> = callable
            .meta
            .annotations
            .iter()
            .filter(|a| a.name != "Override")
            .cloned()
            .collect();
        let is_override =
            callable.is_override || annotations.len() != callable.meta.annotations.len();
        self.write_annotations(&annotations, false)?;
        self.write_indent();
        if !in_interface || callable.visibility != IrVisibility::Public {
            self.write_visibility(&callable.visibility)?;
        }

        if let IrCallableKind::Constructor { delegate } = &callable.kind {
            self.output.push_str("constructor");
            self.write_parameters(&callable.parameters)?;
            match delegate.as_ref().map(|d| &d.kind) {
                Some(IrExpressionKind::MethodCall {
                    call_kind,
                    arguments,
                    ..
                }) => {
                    self.output.push_str(match call_kind {
                        IrCallKind::Super => " : super",
                        _ => " : this",
                    });
                    self.write_arguments(arguments)?;
                }
                Some(_) => return Err(Self::unsupported("constructor delegation")),
                None => {}
            }
            return match callable.body.as_deref() {
                Some(body) if !body.is_empty() => {
                    self.output.push(' ');
                    self.write_body(body)
                }
                _ => {
                    self.output.push('\n');
                    Ok(())
                }
            };
        }

        if is_override {
            self.output.push_str("override ");
        }
        if callable.is_abstract && !in_interface {
            self.output.push_str("abstract ");
        }
        self.write_flags(
            &callable.meta.properties,
            &["open", "suspend", "inline", "operator", "infix", "tailrec", "external"],
        );
        self.output.push_str("fun ");
        if !callable.type_parameters.is_empty() {
            self.write_type_parameters(&callable.type_parameters)?;
            self.output.push(' ');
        }
        if let Some(receiver) = callable.meta.properties.get_str("receiver") {
            let _ = write!(self.output, "{receiver}.");
        }
        self.output.push_str(&callable.name);
        self.write_parameters(&callable.parameters)?;
        if !callable.return_type.is_void() {
            self.output.push_str(": ");
            self.write_type(&callable.return_type)?;
        }

        let Some(body) = callable.body.as_deref() else {
            self.output.push('\n');
            return Ok(());
        };
        match body {
            [
                IrStatement {
                    kind: IrStatementKind::Return { expression: Some(e) },
                    ..
                },
            ] if callable.meta.properties.flag("expression_body") => {
                self.output.push_str(" = ");
                self.write_expr(e)?;
                self.output.push('\n');
                Ok(())
            }
            stmts => {
                self.output.push(' ');
                self.write_body(stmts)
            }
        }
    }

    fn write_parameters(&mut self, params: &[IrParameter]) -> Result<()> {
        self.output.push('(');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_annotations(&param.meta.annotations, true)?;
            self.write_parameter(param)?;
        }
        self.output.push(')');
        Ok(())
    }

    fn write_parameter(&mut self, param: &IrParameter) -> Result<()> {
        match (&param.ty.kind, param.meta.properties.flag("varargs")) {
            (IrTypeKind::Array { element }, true) => {
                let _ = write!(self.output, "vararg {}: ", param.name);
                self.write_type(element)?;
            }
            _ => {
                let _ = write!(self.output, "{}: ", param.name);
                self.write_type(&param.ty)?;
            }
        }
        if let Some(default) = &param.default_value {
            self.output.push_str(" = ");
            self.write_expr(default)?;
        }
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Types
    // ----------------------------------------------------------------------

    fn write_type(&mut self, ty: &IrType) -> Result<()> {
        self.write_annotations(&ty.meta.annotations, true)?;
        let mut nullable = ty.nullable;
        match &ty.kind {
            IrTypeKind::Reference { name, arguments } => {
                self.output.push_str(self.type_name(name));
                self.write_type_arguments(arguments)?;
            }
            IrTypeKind::Primitive { primitive } => {
                nullable &= *primitive != IrPrimitive::Void;
                self.output.push_str(primitive_name(primitive));
            }
            IrTypeKind::Array { element } => match &element.kind {
                IrTypeKind::Primitive { primitive }
                    if !element.nullable && *primitive != IrPrimitive::Void =>
                {
                    let _ = write!(self.output, "{}Array", primitive_name(primitive));
                }
                _ => {
                    self.output.push_str("Array<");
                    self.write_type(element)?;
                    self.output.push('>');
                }
            },
            IrTypeKind::Function {
                parameters,
                returns,
            } => {
                if nullable {
                    self.output.push('(');
                }
                if let Some(receiver) = ty.meta.properties.get_str("receiver") {
                    let _ = write!(self.output, "{receiver}.");
                }
                self.output.push('(');
                for (i, param) in parameters.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_type(param)?;
                }
                self.output.push_str(") -> ");
                self.write_type(returns)?;
                if nullable {
                    self.output.push(')');
                }
            }
            IrTypeKind::Generic { name } => {
                nullable &= name != "*";
                self.output.push_str(name);
            }
        }
        if nullable {
            self.output.push('?');
        }
        Ok(())
    }

    fn write_type_arguments(&mut self, arguments: &[IrType]) -> Result<()> {
        if arguments.is_empty() {
            return Ok(());
        }
        self.output.push('<');
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            if let Some(variance) = arg.meta.properties.get_str("variance") {
                let _ = write!(self.output, "{variance} ");
            }
            self.write_type(arg)?;
        }
        self.output.push('>');
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Statements
    // ----------------------------------------------------------------------

    /// `{ ... }` starting at the current position.
    fn write_body(&mut self, stmts: &[IrStatement]) -> Result<()> {
        self.output.push_str("{\n");
        self.indent += 1;
        for stmt in stmts {
            self.write_stmt(stmt)?;
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    /// Kotlin branches always get braces.
    fn write_branch(&mut self, stmt: &IrStatement) -> Result<()> {
        match &stmt.kind {
            IrStatementKind::Block { statements } => self.write_body(statements),
            _ => self.write_body(std::slice::from_ref(stmt)),
        }
    }

    /// Continue on the line of the closing brace just written.
    fn reopen_line(&mut self) {
        if self.output.ends_with('\n') {
            self.output.pop();
        }
        self.output.push(' ');
    }

    fn write_stmt(&mut self, stmt: &IrStatement) -> Result<()> {
        if matches!(stmt.kind, IrStatementKind::Empty) {
            return Ok(());
        }
        self.write_indent();
        self.write_stmt_inline(stmt)
    }

    /// Writes a statement whose indentation is already in place.
    fn write_stmt_inline(&mut self, stmt: &IrStatement) -> Result<()> {
        match &stmt.kind {
            IrStatementKind::Empty => {}

            IrStatementKind::Expression { expression } => {
                self.write_expr(expression)?;
                self.output.push('\n');
            }

            IrStatementKind::VariableDeclaration { .. } => {
                self.write_variable(stmt)?;
                self.output.push('\n');
            }

            // A bare `{ }` would be a lambda.
            IrStatementKind::Block { statements } => {
                self.output.push_str("run ");
                self.write_body(statements)?;
            }

            IrStatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.output.push_str("if (");
                self.write_expr(condition)?;
                self.output.push_str(") ");
                self.write_branch(then_branch)?;
                if let Some(alt) = else_branch {
                    self.reopen_line();
                    self.output.push_str("else ");
                    if matches!(alt.kind, IrStatementKind::If { .. }) {
                        self.write_stmt_inline(alt)?;
                    } else {
                        self.write_branch(alt)?;
                    }
                }
            }

            IrStatementKind::For { .. } => {
                return Err(Self::unsupported("C-style for loop"));
            }

            IrStatementKind::ForEach {
                variable,
                variable_type,
                iterable,
                body,
            } => {
                let _ = write!(self.output, "for ({variable}");
                if let Some(ty) = variable_type {
                    self.output.push_str(": ");
                    self.write_type(ty)?;
                }
                self.output.push_str(" in ");
                self.write_expr(iterable)?;
                self.output.push_str(") ");
                self.write_branch(body)?;
            }

            IrStatementKind::While { condition, body } => {
                self.output.push_str("while (");
                self.write_expr(condition)?;
                self.output.push_str(") ");
                self.write_branch(body)?;
            }

            IrStatementKind::DoWhile { body, condition } => {
                self.output.push_str("do ");
                self.write_branch(body)?;
                self.reopen_line();
                self.output.push_str("while (");
                self.write_expr(condition)?;
                self.output.push_str(")\n");
            }

            IrStatementKind::Switch { expression, cases } => {
                self.output.push_str("when (");
                self.write_expr(expression)?;
                self.output.push_str(") {\n");
                self.indent += 1;
                self.write_when_branches(cases)?;
                self.indent -= 1;
                self.write_indent();
                self.output.push_str("}\n");
            }

            IrStatementKind::Return { expression } => {
                self.output.push_str("return");
                if let Some(e) = expression {
                    self.output.push(' ');
                    self.write_expr(e)?;
                }
                self.output.push('\n');
            }

            IrStatementKind::Break => self.output.push_str("break\n"),
            IrStatementKind::Continue => self.output.push_str("continue\n"),

            IrStatementKind::Throw { expression } => {
                self.output.push_str("throw ");
                self.write_expr(expression)?;
                self.output.push('\n');
            }

            IrStatementKind::TryCatch {
                try_block,
                catch_clauses,
                finally_block,
            } => {
                self.output.push_str("try ");
                self.write_branch(try_block)?;
                for clause in catch_clauses {
                    let [ty] = clause.exception_types.as_slice() else {
                        return Err(Self::unsupported("multi-type catch clause"));
                    };
                    self.reopen_line();
                    let _ = write!(
                        self.output,
                        "catch ({}: ",
                        clause.name.as_deref().unwrap_or("e")
                    );
                    self.write_type(&ty.clone().with_nullable(false))?;
                    self.output.push_str(") ");
                    match &clause.body {
                        Some(body) => self.write_branch(body)?,
                        None => self.write_body(&[])?,
                    }
                }
                if let Some(finally) = finally_block {
                    self.reopen_line();
                    self.output.push_str("finally ");
                    self.write_branch(finally)?;
                }
            }

            IrStatementKind::Unknown { fallback } => {
                let text = Self::fallback(fallback, "statement")?;
                self.output.push_str(text);
                self.output.push('\n');
            }
        }
        Ok(())
    }

    fn write_variable(&mut self, stmt: &IrStatement) -> Result<()> {
        let IrStatementKind::VariableDeclaration {
            name,
            ty,
            additional_names,
            mutable,
            initializer,
        } = &stmt.kind
        else {
            return Err(Self::unsupported("variable"));
        };
        if !additional_names.is_empty() {
            return Err(Self::unsupported(format!(
                "declaration of `{name}` with several declarators"
            )));
        }
        let _ = write!(
            self.output,
            "{} {name}",
            if *mutable { "var" } else { "val" }
        );
        if !(stmt.meta.properties.flag("inferred_type") && initializer.is_some()) {
            self.output.push_str(": ");
            self.write_type(ty)?;
        }
        if let Some(init) = initializer {
            self.output.push_str(" = ");
            self.write_field_initializer(init)?;
        }
        Ok(())
    }

    /// `case` branches as `when` branches. Cases without statements fall
    /// through into the next one and are merged into its condition.
    fn write_when_branches(&mut self, cases: &[IrSwitchCase]) -> Result<()> {
        let mut pending: Vec<&IrExpression> = Vec::new();
        let mut default = false;
        for (i, case) in cases.iter().enumerate() {
            default |= case.matches.is_empty();
            pending.extend(case.matches.iter());

            let stmts = match &case.body {
                Some(IrStatement {
                    kind: IrStatementKind::Block { statements },
                    ..
                }) => statements.as_slice(),
                Some(other) => std::slice::from_ref(other),
                None => &[],
            };
            if stmts.is_empty() && i + 1 < cases.len() {
                continue;
            }
            let stmts = match stmts {
                [rest @ .., last] if matches!(last.kind, IrStatementKind::Break) => rest,
                all => all,
            };

            self.write_indent();
            if default {
                self.output.push_str("else");
            } else {
                for (j, m) in pending.iter().enumerate() {
                    if j > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(m)?;
                }
            }
            self.output.push_str(" -> ");
            match stmts {
                [single] if single.as_expression().is_some() => self.write_stmt_inline(single)?,
                _ => self.write_body(stmts)?,
            }
            pending.clear();
            default = false;
        }
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Expressions
    // ----------------------------------------------------------------------

    fn write_arguments(&mut self, args: &[IrExpression]) -> Result<()> {
        self.output.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_expr(arg)?;
        }
        self.output.push(')');
        Ok(())
    }

    fn write_receiver(&mut self, receiver: &Option<Box<IrExpression>>) -> Result<()> {
        if let Some(r) = receiver {
            self.write_expr(r)?;
            self.output.push('.');
        }
        Ok(())
    }

    fn write_expr(&mut self, expr: &IrExpression) -> Result<()> {
        match &expr.kind {
            IrExpressionKind::Empty => {}

            IrExpressionKind::Literal { value } => self.output.push_str(value),

            IrExpressionKind::Identifier { qualifier, name } => {
                self.write_receiver(qualifier)?;
                self.output.push_str(name);
            }

            IrExpressionKind::TypeReference { referenced } => {
                self.write_type(&referenced.clone().with_nullable(false))?;
            }

            // `Foo.class`
            IrExpressionKind::PropertyAccess {
                receiver: Some(receiver),
                name,
            } if name == "class" => {
                self.write_expr(receiver)?;
                self.output.push_str("::class.java");
            }

            IrExpressionKind::PropertyAccess { receiver, name } => {
                self.write_receiver(receiver)?;
                self.output.push_str(name);
            }

            IrExpressionKind::MethodCall {
                receiver,
                name,
                arguments,
                call_kind,
            } => {
                match call_kind {
                    IrCallKind::This => self.output.push_str("this"),
                    IrCallKind::Super => self.output.push_str("super"),
                    IrCallKind::Default => {
                        self.write_receiver(receiver)?;
                        self.output.push_str(name);
                    }
                }
                self.write_arguments(arguments)?;
            }

            IrExpressionKind::ObjectCreation {
                class_name,
                type_arguments,
                arguments,
            } => {
                self.output.push_str(self.type_name(class_name));
                self.write_type_arguments(type_arguments)?;
                self.write_arguments(arguments)?;
            }

            IrExpressionKind::Binary {
                left,
                operator,
                right,
            } => {
                self.write_expr(left)?;
                let _ = write!(self.output, " {} ", binary_operator(operator));
                self.write_expr(right)?;
            }

            IrExpressionKind::Unary {
                operator: IrUnaryOperator::BitwiseNot,
                operand,
                ..
            } => {
                self.write_expr(operand)?;
                self.output.push_str(".inv()");
            }

            IrExpressionKind::Unary {
                operator,
                operand,
                prefix,
            } => {
                if *prefix {
                    self.output.push_str(operator.symbol());
                    self.write_expr(operand)?;
                } else {
                    self.write_expr(operand)?;
                    self.output.push_str(operator.symbol());
                }
            }

            IrExpressionKind::Assignment {
                target,
                operator,
                value,
            } => {
                self.write_expr(target)?;
                let _ = write!(self.output, " {} ", operator.symbol());
                self.write_expr(value)?;
            }

            IrExpressionKind::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                self.output.push_str("if (");
                self.write_expr(condition)?;
                self.output.push_str(") ");
                self.write_expr(if_true)?;
                self.output.push_str(" else ");
                self.write_expr(if_false)?;
            }

            IrExpressionKind::Cast { expression, target } => {
                self.write_expr(expression)?;
                self.output.push_str(" as ");
                self.write_type(target)?;
            }

            IrExpressionKind::TypeCheck {
                expression,
                checked,
            } => {
                self.write_expr(expression)?;
                self.output.push_str(" is ");
                self.write_type(checked)?;
            }

            IrExpressionKind::Lambda { parameters, body } => {
                self.output.push('{');
                if !parameters.is_empty() {
                    let _ = write!(self.output, " {} ->", parameters.join(", "));
                }
                match body.as_slice() {
                    [single] if single.as_expression().is_some() => {
                        if let Some(e) = single.as_expression() {
                            self.output.push(' ');
                            self.write_expr(e)?;
                        }
                        self.output.push_str(" }");
                    }
                    stmts => {
                        self.output.push('\n');
                        self.indent += 1;
                        for stmt in stmts {
                            self.write_stmt(stmt)?;
                        }
                        self.indent -= 1;
                        self.write_indent();
                        self.output.push('}');
                    }
                }
            }

            IrExpressionKind::Parenthesized { expression } => {
                self.output.push('(');
                self.write_expr(expression)?;
                self.output.push(')');
            }

            IrExpressionKind::Unknown { fallback } => {
                let text = Self::fallback(fallback, "expression")?;
                self.output.push_str(text);
            }
        }
        Ok(())
    }
}

/// Kotlin spelling of a simple type name written in Java terms.
fn kotlin_name(name: &str) -> &str {
    match name {
        "Object" => "Any",
        "Integer" => "Int",
        "Character" => "Char",
        "Void" => "Unit",
        other => other,
    }
}

fn primitive_name(primitive: &IrPrimitive) -> &str {
    match primitive {
        IrPrimitive::Void => "Unit",
        IrPrimitive::Boolean => "Boolean",
        IrPrimitive::Byte => "Byte",
        IrPrimitive::Short => "Short",
        IrPrimitive::Int => "Int",
        IrPrimitive::Long => "Long",
        IrPrimitive::Char => "Char",
        IrPrimitive::Float => "Float",
        IrPrimitive::Double => "Double",
        IrPrimitive::Unmapped(name) => name,
    }
}

/// Bitwise operators are infix functions in Kotlin.
fn binary_operator(operator: &IrBinaryOperator) -> &'static str {
    match operator {
        IrBinaryOperator::BitwiseAnd => "and",
        IrBinaryOperator::BitwiseOr => "or",
        IrBinaryOperator::BitwiseXor => "xor",
        IrBinaryOperator::ShiftLeft => "shl",
        IrBinaryOperator::ShiftRight => "shr",
        IrBinaryOperator::UnsignedShiftRight => "ushr",
        other => other.symbol(),
    }
}

/// `this.name = name` for one of the constructor properties.
fn assigns_property(stmt: &IrStatement, properties: &[&IrField]) -> bool {
    let Some(IrExpressionKind::Assignment {
        target,
        operator: IrAssignmentOperator::Assign,
        value,
    }) = stmt.as_expression().map(|e| &e.kind)
    else {
        return false;
    };
    let (
        IrExpressionKind::PropertyAccess {
            receiver: Some(receiver),
            name,
        },
        IrExpressionKind::Identifier {
            qualifier: None,
            name: source,
        },
    ) = (&target.kind, &value.kind)
    else {
        return false;
    };
    let on_this = matches!(
        &receiver.kind,
        IrExpressionKind::Identifier { qualifier: None, name } if name == "this"
    );
    on_this && name == source && properties.iter().any(|p| &p.name == name)
}

/// A Java `static final` primitive or string initialized with a literal.
fn is_constant(field: &IrField) -> bool {
    let literal = matches!(
        field.initializer.as_ref().and_then(IrStatement::as_expression),
        Some(IrExpression {
            kind: IrExpressionKind::Literal { .. },
            ..
        })
    );
    let simple_type = match &field.ty.kind {
        IrTypeKind::Primitive { primitive } => *primitive != IrPrimitive::Void,
        IrTypeKind::Reference { name, .. } => {
            matches!(name.as_str(), "String" | "java.lang.String" | "kotlin.String")
        }
        _ => false,
    };
    !field.mutable && literal && simple_type
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(class: &IrClass) -> Result<String> {
        KotlinWriter::emit("com.example", &[], class, "    ")
    }

    fn long() -> IrType {
        IrType::primitive(IrPrimitive::Long)
    }

    fn int() -> IrType {
        IrType::primitive(IrPrimitive::Int)
    }

    fn method(name: &str, ret: IrType) -> IrCallableBuilder {
        IrCallableBuilder::method(name, ret).visibility(IrVisibility::Public)
    }

    #[test]
    fn test_data_class_with_primary_constructor() {
        let this_assign = |name: &str| {
            IrStatement::expr(IrExpression::assign(
                IrExpression::property(Some(IrExpression::ident("this")), name),
                IrAssignmentOperator::Assign,
                IrExpression::ident(name),
            ))
        };
        let property = |name: &str, ty: IrType, mutable: bool| {
            IrFieldBuilder::new(name, ty)
                .visibility(IrVisibility::Public)
                .mutable(mutable)
                .property("constructor_property", true)
                .build()
                .unwrap()
        };
        let user = IrType::reference("com.example.User").with_nullable(false);
        let class = IrClassBuilder::qualified("com.example.User", "User")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .property("data", true)
            .super_class({
                let mut base = IrSuperClass::new("com.example.base.Entity", IrClassKind::Class);
                base.meta.properties.insert("arguments", "(id)");
                base
            })
            .super_class(
                IrSuperClass::new("kotlin.Comparable", IrClassKind::Interface)
                    .with_type_arguments(vec![user.clone()]),
            )
            .field(property("id", long(), false))
            .field(property("name", IrType::reference("String"), true))
            .callable(
                IrCallableBuilder::constructor("User")
                    .visibility(IrVisibility::Public)
                    .property("primary", true)
                    .parameter(IrParameter::new("id", long()))
                    .parameter(IrParameter::new("name", IrType::reference("String")))
                    .body(vec![this_assign("id"), this_assign("name")])
                    .build()
                    .unwrap(),
            )
            .callable(
                method("compareTo", int())
                    .is_override(true)
                    .property("expression_body", true)
                    .parameter(IrParameter::new("other", user))
                    .body(vec![IrStatement::return_stmt(Some(IrExpression::call(
                        Some(IrExpression::ident("id")),
                        "compareTo",
                        vec![IrExpression::property(Some(IrExpression::ident("other")), "id")],
                    )))])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let imports = [IrImport::new("com.example.base.Entity")];
        let out = KotlinWriter::emit("com.example", &imports, &class, "    ").unwrap();
        insta::assert_snapshot!(out, @r"
        package com.example

        import com.example.base.Entity

        data class User(val id: Long, var name: String?) : Entity(id), Comparable<User> {
            override fun compareTo(other: User): Int = id.compareTo(other.id)
        }
        ");
    }

    #[test]
    fn test_java_shapes_are_translated() {
        let field = |name: &str, ty: IrType, visibility: IrVisibility| {
            IrFieldBuilder::new(name, ty).visibility(visibility).mutable(true)
        };
        let switch = IrStatement::new(IrStatementKind::Switch {
            expression: IrExpression::ident("kind"),
            cases: vec![
                IrSwitchCase {
                    matches: vec![IrExpression::literal("1")],
                    body: None,
                    meta: IrMeta::default(),
                },
                IrSwitchCase {
                    matches: vec![IrExpression::literal("2")],
                    body: Some(IrStatement::block(vec![IrStatement::return_stmt(Some(
                        IrExpression::literal("\"small\""),
                    ))])),
                    meta: IrMeta::default(),
                },
                IrSwitchCase {
                    matches: vec![],
                    body: Some(IrStatement::block(vec![IrStatement::return_stmt(Some(
                        IrExpression::literal("\"big\""),
                    ))])),
                    meta: IrMeta::default(),
                },
            ],
        });
        let class = IrClassBuilder::qualified("com.example.Counter", "Counter")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::extension("java", "package-private"))
            .super_class(IrSuperClass::new("com.example.Base", IrClassKind::Class))
            .field(
                field("LIMIT", int(), IrVisibility::Public)
                    .mutable(false)
                    .property("static", true)
                    .initializer(IrStatement::expr(IrExpression::literal("10")))
                    .build()
                    .unwrap(),
            )
            .field(
                field("count", IrType::reference("java.lang.Integer"), IrVisibility::Private)
                    .build()
                    .unwrap(),
            )
            .callable(
                IrCallableBuilder::constructor("Counter")
                    .visibility(IrVisibility::Public)
                    .parameter(IrParameter::new("start", int()))
                    .delegate(IrExpression::delegation(IrCallKind::Super, vec![]))
                    .body(vec![IrStatement::expr(IrExpression::assign(
                        IrExpression::property(Some(IrExpression::ident("this")), "count"),
                        IrAssignmentOperator::Assign,
                        IrExpression::ident("start"),
                    ))])
                    .build()
                    .unwrap(),
            )
            .callable(
                method("next", int())
                    .body(vec![IrStatement::return_stmt(Some(IrExpression::ternary(
                        IrExpression::binary(
                            IrExpression::ident("count"),
                            IrBinaryOperator::Equals,
                            IrExpression::literal("null"),
                        ),
                        IrExpression::literal("0"),
                        IrExpression::binary(
                            IrExpression::ident("count"),
                            IrBinaryOperator::BitwiseAnd,
                            IrExpression::literal("0xFF"),
                        ),
                    )))])
                    .build()
                    .unwrap(),
            )
            .callable(
                method("describe", IrType::reference("String"))
                    .parameter(IrParameter::new("kind", int()))
                    .body(vec![switch])
                    .build()
                    .unwrap(),
            )
            .callable(
                method("create", IrType::reference("com.example.Counter"))
                    .is_static(true)
                    .body(vec![IrStatement::return_stmt(Some(IrExpression::new_object(
                        "com.example.Counter",
                        vec![IrExpression::literal("0")],
                    )))])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        insta::assert_snapshot!(emit(&class).unwrap(), @r#"
        package com.example

        internal class Counter : Base {
            private var count: Int?

            constructor(start: Int) : super() {
                this.count = start
            }

            fun next(): Int {
                return if (count == null) 0 else count and 0xFF
            }

            fun describe(kind: Int): String? {
                when (kind) {
                    1, 2 -> {
                        return "small"
                    }
                    else -> {
                        return "big"
                    }
                }
            }

            companion object {
                const val LIMIT: Int = 10

                fun create(): Counter? {
                    return Counter(0)
                }
            }
        }
        "#);
    }

    #[test]
    fn test_enum_entries_and_interface() {
        let entry = |name: &str, value: &str| {
            IrFieldBuilder::new(name, IrType::reference("Color").with_nullable(false))
                .visibility(IrVisibility::Public)
                .mutable(false)
                .property("enum_constant", true)
                .initializer(IrStatement::expr(IrExpression::new_object(
                    "Color",
                    vec![IrExpression::literal(value)],
                )))
                .build()
                .unwrap()
        };
        let color = IrClassBuilder::new("Color")
            .kind(IrClassKind::Enum)
            .visibility(IrVisibility::Public)
            .field(
                IrFieldBuilder::new("rgb", int())
                    .visibility(IrVisibility::Public)
                    .mutable(false)
                    .property("constructor_property", true)
                    .build()
                    .unwrap(),
            )
            .field(entry("RED", "0xFF0000"))
            .field(entry("GREEN", "0x00FF00"))
            .callable(
                IrCallableBuilder::constructor("Color")
                    .visibility(IrVisibility::Private)
                    .property("primary", true)
                    .parameter(IrParameter::new("rgb", int()))
                    .build()
                    .unwrap(),
            )
            .callable(
                method("hex", IrType::reference("String").with_nullable(false))
                    .property("expression_body", true)
                    .body(vec![IrStatement::return_stmt(Some(IrExpression::call(
                        Some(IrExpression::ident("rgb")),
                        "toString",
                        vec![IrExpression::literal("16")],
                    )))])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        insta::assert_snapshot!(KotlinWriter::emit("", &[], &color, "    ").unwrap(), @r"
        enum class Color private constructor(val rgb: Int) {
            RED(0xFF0000),
            GREEN(0x00FF00);

            fun hex(): String = rgb.toString(16)
        }
        ");

        let mut element = IrTypeParameter::new("T");
        element.meta.properties.insert("variance", "out");
        let source = IrClassBuilder::new("Source")
            .kind(IrClassKind::Interface)
            .visibility(IrVisibility::Public)
            .type_parameter(element)
            .field(
                IrFieldBuilder::new("size", int())
                    .visibility(IrVisibility::Public)
                    .mutable(false)
                    .build()
                    .unwrap(),
            )
            .callable(
                method("read", IrType::void())
                    .is_abstract(true)
                    .parameter(IrParameter::new(
                        "block",
                        IrType::function(
                            vec![IrType::generic("T").with_nullable(false)],
                            IrType::void(),
                        )
                        .with_nullable(false),
                    ))
                    .build()
                    .unwrap(),
            )
            .callable(
                method("isEmpty", IrType::primitive(IrPrimitive::Boolean))
                    .property("expression_body", true)
                    .body(vec![IrStatement::return_stmt(Some(IrExpression::binary(
                        IrExpression::ident("size"),
                        IrBinaryOperator::Equals,
                        IrExpression::literal("0"),
                    )))])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        insta::assert_snapshot!(emit(&source).unwrap(), @r"
        package com.example

        interface Source<out T> {
            val size: Int

            fun read(block: (T) -> Unit)

            fun isEmpty(): Boolean = size == 0
        }
        ");
    }

    #[test]
    fn test_object_and_lambda() {
        let registry = IrClassBuilder::new("Registry")
            .kind(ext::object())
            .visibility(IrVisibility::Public)
            .field(
                IrFieldBuilder::new(
                    "names",
                    IrType::reference_with(
                        "kotlin.collections.MutableList",
                        vec![IrType::reference("String").with_nullable(false)],
                    )
                    .with_nullable(false),
                )
                .visibility(IrVisibility::Private)
                .mutable(false)
                .initializer(IrStatement::expr(IrExpression::call(None, "mutableListOf", vec![])))
                .build()
                .unwrap(),
            )
            .callable(
                method("each", IrType::void())
                    .parameter(IrParameter::new(
                        "action",
                        IrType::function(
                            vec![IrType::reference("String").with_nullable(false)],
                            IrType::void(),
                        )
                        .with_nullable(false),
                    ))
                    .body(vec![IrStatement::expr(IrExpression::call(
                        Some(IrExpression::ident("names")),
                        "forEach",
                        vec![IrExpression::lambda(
                            vec!["name".into()],
                            vec![IrStatement::expr(IrExpression::call(
                                None,
                                "action",
                                vec![IrExpression::ident("name")],
                            ))],
                        )],
                    ))])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        insta::assert_snapshot!(emit(&registry).unwrap(), @r"
        package com.example

        object Registry {
            private val names: MutableList<String> = mutableListOf()

            fun each(action: (String) -> Unit) {
                names.forEach({ name -> action(name) })
            }
        }
        ");
    }

    #[test]
    fn test_inferred_local_omits_type() {
        let mut total = IrStatement::var(
            "total",
            int(),
            true,
            Some(IrStatement::expr(IrExpression::literal("0"))),
        );
        total.meta.properties.insert("inferred_type", true);
        let limit = IrStatement::var(
            "limit",
            int(),
            false,
            Some(IrStatement::expr(IrExpression::literal("1"))),
        );
        let class = IrClassBuilder::new("Counter")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .callable(
                method("count", IrType::void())
                    .body(vec![total, limit])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let out = emit(&class).unwrap();
        assert!(out.contains("        var total = 0\n"), "{out}");
        assert!(out.contains("        val limit: Int = 1\n"), "{out}");
    }

    #[test]
    fn test_c_style_for_is_rejected() {
        let class = IrClassBuilder::new("Loop")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .callable(
                method("run", IrType::void())
                    .body(vec![IrStatement::new(IrStatementKind::For {
                        initializer: None,
                        condition: None,
                        update: None,
                        body: Box::new(IrStatement::block(vec![])),
                    })])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        match emit(&class) {
            Err(Error::UnsupportedShape { language, shape }) => {
                assert_eq!(language, "kotlin");
                assert_eq!(shape, "C-style for loop");
            }
            other => panic!("expected UnsupportedShape, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_without_kotlin_text_is_rejected() {
        let class = IrClassBuilder::new("J")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .callable(
                method("f", IrType::void())
                    .body(vec![IrStatement::unknown("java", "assert x;")])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        match emit(&class) {
            Err(Error::MissingFallback { language, node }) => {
                assert_eq!(language, "kotlin");
                assert_eq!(node, "statement");
            }
            other => panic!("expected MissingFallback, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_class_kind_is_rejected() {
        let class = IrClassBuilder::new("S")
            .kind(IrClassKind::extension("swift", "struct"))
            .visibility(IrVisibility::Public)
            .build()
            .unwrap();
        assert!(matches!(emit(&class), Err(Error::UnsupportedShape { .. })));
    }
}
