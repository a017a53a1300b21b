//! Swift writer for IR.
//!
//! JVM names are flattened to their last segment since Swift has no
//! packages; a type carrying the `swiftElementModule` property is qualified
//! with that module unless it is the module being written. Java shapes with
//! a direct Swift counterpart are translated (`switch` cases, `null` to `nil`,
//! `X.class` to `X.self`). Shapes with no counterpart fail with
//! [`Error::UnsupportedShape`] and `Unknown` nodes without Swift text fail
//! with [`Error::MissingFallback`].

use crate::ext::{self, ELEMENT_MODULE, LANGUAGE};
use mcodegen_core::{Error, Result};
use mcodegen_ir::*;
use std::fmt::Write;

/// Where a declaration sits, which decides the modifiers it may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    File,
    Class,
    Value,
    Protocol,
}

/// Emits IR as Swift source code.
pub struct SwiftWriter<'a> {
    output: String,
    indent: usize,
    unit: &'a str,
    module: Option<&'a str>,
}

impl<'a> SwiftWriter<'a> {
    /// Emit one top-level declaration as a Swift file belonging to `module`.
    pub fn emit(
        module: Option<&'a str>,
        imports: &[IrImport],
        declaration: &IrDeclaration,
        indent_unit: &'a str,
    ) -> Result<String> {
        let mut writer = Self {
            output: String::new(),
            indent: 0,
            unit: indent_unit,
            module,
        };
        for import in imports {
            let _ = writeln!(writer.output, "import {}", import.path);
        }
        if !imports.is_empty() {
            writer.output.push('\n');
        }
        match declaration {
            IrDeclaration::Class(class) => writer.write_class(class, Scope::File)?,
            IrDeclaration::Field(field) => writer.write_property(field, Scope::File)?,
            IrDeclaration::Callable(callable) => writer.write_callable(callable, Scope::File)?,
        }
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

    fn type_name(&self, name: &str, meta: &IrMeta) -> String {
        let simple = swift_name(name.rsplit('.').next().unwrap_or(name));
        match meta.properties.get_str(ELEMENT_MODULE) {
            Some(module) if Some(module) != self.module => format!("{module}.{simple}"),
            _ => simple.to_string(),
        }
    }

    // ----------------------------------------------------------------------
    // Declarations
    // ----------------------------------------------------------------------

    /// `public` becomes `open` on declarations flagged `open`.
    fn write_visibility(&mut self, visibility: &IrVisibility, props: &LanguageProperties) -> Result<()> {
        let keyword = match visibility {
            IrVisibility::Public if props.flag("open") => "open",
            IrVisibility::Public => "public",
            IrVisibility::Internal => "internal",
            IrVisibility::Private => "private",
            v if ext::is_open(v) => "open",
            v if ext::is_fileprivate(v) => "fileprivate",
            v if v.is_extension("java", "package-private") => "internal",
            IrVisibility::Protected => return Err(Self::unsupported("protected visibility")),
            IrVisibility::Extension { language, name } => {
                return Err(Self::unsupported(format!("{language} visibility `{name}`")));
            }
        };
        self.output.push_str(keyword);
        self.output.push(' ');
        Ok(())
    }

    /// Members of a protocol carry no visibility; a private top-level
    /// declaration is file-private.
    fn write_member_visibility(
        &mut self,
        visibility: &IrVisibility,
        props: &LanguageProperties,
        scope: Scope,
    ) -> Result<()> {
        match scope {
            Scope::Protocol => Ok(()),
            Scope::File if *visibility == IrVisibility::Private => {
                self.output.push_str("fileprivate ");
                Ok(())
            }
            _ => self.write_visibility(visibility, props),
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
            self.output.push_str(&param.name);
            for (j, bound) in param.bounds.iter().enumerate() {
                self.output.push_str(if j == 0 { ": " } else { " & " });
                self.write_type(&bound.clone().with_nullable(false))?;
            }
        }
        self.output.push('>');
        Ok(())
    }

    fn write_class(&mut self, class: &IrClass, scope: Scope) -> Result<()> {
        let props = &class.meta.properties;
        let keyword = match &class.kind {
            IrClassKind::Class => "class",
            IrClassKind::Interface => "protocol",
            IrClassKind::Enum => "enum",
            k if ext::is_struct(k) => "struct",
            k if ext::is_actor(k) => "actor",
            IrClassKind::Annotation => return Err(Self::unsupported("annotation class")),
            IrClassKind::Extension { language, name } => {
                return Err(Self::unsupported(format!("{language} class kind `{name}`")));
            }
        };
        let bases = class.base_classes().count();
        if bases > 1 || (bases == 1 && class.kind != IrClassKind::Class) {
            return Err(Self::unsupported(format!(
                "{keyword} `{}` with {bases} base classes",
                class.name
            )));
        }
        if !class.initializers.is_empty() {
            return Err(Self::unsupported(format!(
                "initializer block in `{}`",
                class.name
            )));
        }

        self.write_indent();
        self.write_member_visibility(&class.visibility, props, scope)?;
        if class.kind == IrClassKind::Class && props.flag("final") {
            self.output.push_str("final ");
        }
        let _ = write!(self.output, "{keyword} {}", class.name);
        self.write_type_parameters(&class.type_parameters)?;

        // The base class comes first in the inheritance clause.
        let mut supers: Vec<&IrSuperClass> = class.base_classes().collect();
        supers.extend(
            class
                .super_classes
                .iter()
                .filter(|s| s.kind != IrClassKind::Class),
        );
        for (i, super_type) in supers.iter().enumerate() {
            self.output.push_str(if i == 0 { ": " } else { ", " });
            let name = self.type_name(&super_type.name, &super_type.meta);
            self.output.push_str(&name);
            self.write_type_arguments(&super_type.type_arguments)?;
        }

        let (constants, fields): (Vec<&IrField>, Vec<&IrField>) = class
            .fields
            .iter()
            .partition(|f| f.meta.properties.flag("enum_constant"));
        if class.fields.is_empty() && class.callables.is_empty() && class.nested_classes.is_empty() {
            self.output.push_str(" {}\n");
            return Ok(());
        }

        let member_scope = match &class.kind {
            IrClassKind::Interface => Scope::Protocol,
            IrClassKind::Class => Scope::Class,
            _ => Scope::Value,
        };
        self.output.push_str(" {\n");
        self.indent += 1;

        let mut first = true;
        let mut separate = |out: &mut String| {
            if !first {
                out.push('\n');
            }
            first = false;
        };
        if !constants.is_empty() {
            separate(&mut self.output);
            for constant in constants {
                self.write_enum_case(constant)?;
            }
        }
        if !fields.is_empty() {
            separate(&mut self.output);
            for field in fields {
                self.write_property(field, member_scope)?;
            }
        }
        for callable in &class.callables {
            separate(&mut self.output);
            self.write_callable(callable, member_scope)?;
        }
        for nested in &class.nested_classes {
            separate(&mut self.output);
            self.write_class(nested, member_scope)?;
        }

        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    /// `case red` or `case red = 1` for a single literal argument.
    fn write_enum_case(&mut self, constant: &IrField) -> Result<()> {
        self.write_indent();
        let _ = write!(self.output, "case {}", constant.name);
        if let Some(init) = &constant.initializer {
            match init.as_expression().map(|e| &e.kind) {
                Some(IrExpressionKind::ObjectCreation { arguments, .. }) => match arguments.as_slice() {
                    [] => {}
                    [raw @ IrExpression {
                        kind: IrExpressionKind::Literal { .. },
                        ..
                    }] => {
                        self.output.push_str(" = ");
                        self.write_expr(raw)?;
                    }
                    _ => {
                        return Err(Self::unsupported(format!(
                            "enum case `{}` with constructor arguments",
                            constant.name
                        )));
                    }
                },
                _ => {
                    return Err(Self::unsupported(format!(
                        "enum case `{}` with a non-constructor initializer",
                        constant.name
                    )));
                }
            }
        }
        self.output.push('\n');
        Ok(())
    }

    fn write_property(&mut self, field: &IrField, scope: Scope) -> Result<()> {
        let props = &field.meta.properties;
        self.write_indent();
        self.write_member_visibility(&field.visibility, props, scope)?;
        if props.flag("static") && scope != Scope::File {
            self.output.push_str("static ");
        } else if props.flag("final") && scope == Scope::Class {
            self.output.push_str("final ");
        }

        if scope == Scope::Protocol {
            let _ = write!(self.output, "var {}: ", field.name);
            self.write_type(&field.ty)?;
            self.output
                .push_str(if field.mutable { " { get set }\n" } else { " { get }\n" });
            return Ok(());
        }

        let _ = write!(
            self.output,
            "{} {}: ",
            if field.mutable { "var" } else { "let" },
            field.name
        );
        self.write_type(&field.ty)?;
        if let Some(init) = &field.initializer {
            self.output.push_str(" = ");
            self.write_initializer(init)?;
        }
        self.output.push('\n');
        Ok(())
    }

    fn write_initializer(&mut self, init: &IrStatement) -> Result<()> {
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

    fn write_callable(&mut self, callable: &IrCallable, scope: Scope) -> Result<()> {
        let props = &callable.meta.properties;
        self.write_indent();
        self.write_member_visibility(&callable.visibility, props, scope)?;

        let delegate = match &callable.kind {
            IrCallableKind::Constructor { delegate } => {
                if callable.is_override {
                    self.output.push_str("override ");
                }
                let convenience = scope == Scope::Class
                    && matches!(
                        delegate.as_ref().map(|d| &d.kind),
                        Some(IrExpressionKind::MethodCall {
                            call_kind: IrCallKind::This,
                            ..
                        })
                    );
                if convenience {
                    self.output.push_str("convenience ");
                }
                self.output.push_str("init");
                self.write_type_parameters(&callable.type_parameters)?;
                self.write_parameters(&callable.parameters)?;
                delegate.as_ref()
            }
            IrCallableKind::Method => {
                if callable.is_static && scope != Scope::File {
                    self.output.push_str("static ");
                }
                if callable.is_override {
                    self.output.push_str("override ");
                }
                if props.flag("final") && scope == Scope::Class {
                    self.output.push_str("final ");
                }
                if props.flag("mutating") && scope == Scope::Value {
                    self.output.push_str("mutating ");
                }
                let _ = write!(self.output, "func {}", callable.name);
                self.write_type_parameters(&callable.type_parameters)?;
                self.write_parameters(&callable.parameters)?;
                None
            }
        };
        if props.flag("async") {
            self.output.push_str(" async");
        }
        if props.flag("throws") {
            self.output.push_str(" throws");
        }
        if !callable.is_constructor() && !callable.return_type.is_void() {
            self.output.push_str(" -> ");
            self.write_type(&callable.return_type)?;
        }

        if scope == Scope::Protocol {
            self.output.push('\n');
            return Ok(());
        }
        let Some(body) = callable.body.as_deref() else {
            return Err(Self::unsupported(format!(
                "function `{}` without a body outside a protocol",
                callable.name
            )));
        };
        self.output.push_str(" {\n");
        self.indent += 1;
        if let Some(call) = delegate {
            self.write_indent();
            self.write_expr(call)?;
            self.output.push('\n');
        }
        for stmt in body {
            self.write_stmt(stmt)?;
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    fn write_parameters(&mut self, params: &[IrParameter]) -> Result<()> {
        self.output.push('(');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            if let Some(label) = param.meta.properties.get_str("label") {
                let _ = write!(self.output, "{label} ");
            }
            let _ = write!(self.output, "{}: ", param.name);
            match (&param.ty.kind, param.meta.properties.flag("varargs")) {
                (IrTypeKind::Array { element }, true) => {
                    self.write_type(element)?;
                    self.output.push_str("...");
                }
                _ => self.write_type(&param.ty)?,
            }
            if let Some(default) = &param.default_value {
                self.output.push_str(" = ");
                self.write_expr(default)?;
            }
        }
        self.output.push(')');
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Types
    // ----------------------------------------------------------------------

    fn write_type(&mut self, ty: &IrType) -> Result<()> {
        let mut nullable = ty.nullable;
        match &ty.kind {
            IrTypeKind::Reference { name, arguments } => {
                let name = self.type_name(name, &ty.meta);
                self.output.push_str(&name);
                self.write_type_arguments(arguments)?;
            }
            IrTypeKind::Primitive { primitive } => {
                nullable &= *primitive != IrPrimitive::Void;
                self.output.push_str(primitive_name(primitive));
            }
            IrTypeKind::Array { element } => {
                self.output.push('[');
                self.write_type(element)?;
                self.output.push(']');
            }
            IrTypeKind::Function {
                parameters,
                returns,
            } => {
                if nullable {
                    self.output.push('(');
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
            IrTypeKind::Generic { name } if name == "*" => {
                return Err(Self::unsupported("star projection"));
            }
            IrTypeKind::Generic { name } => self.output.push_str(name),
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

    fn write_branch(&mut self, stmt: &IrStatement) -> Result<()> {
        match &stmt.kind {
            IrStatementKind::Block { statements } => self.write_body(statements),
            _ => self.write_body(std::slice::from_ref(stmt)),
        }
    }

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

    fn write_stmt_inline(&mut self, stmt: &IrStatement) -> Result<()> {
        match &stmt.kind {
            IrStatementKind::Empty => {}

            // Swift has no `++`/`--`; as a statement the value is unused.
            IrStatementKind::Expression {
                expression:
                    IrExpression {
                        kind:
                            IrExpressionKind::Unary {
                                operator: op @ (IrUnaryOperator::Increment | IrUnaryOperator::Decrement),
                                operand,
                                ..
                            },
                        ..
                    },
            } => {
                self.write_expr(operand)?;
                self.output.push_str(match op {
                    IrUnaryOperator::Increment => " += 1\n",
                    _ => " -= 1\n",
                });
            }

            IrStatementKind::Expression { expression } => {
                self.write_expr(expression)?;
                self.output.push('\n');
            }

            IrStatementKind::VariableDeclaration {
                name,
                ty,
                additional_names,
                mutable,
                initializer,
            } => {
                if !additional_names.is_empty() {
                    return Err(Self::unsupported(format!(
                        "declaration of `{name}` with several declarators"
                    )));
                }
                let _ = write!(
                    self.output,
                    "{} {name}",
                    if *mutable { "var" } else { "let" }
                );
                if !(stmt.meta.properties.flag("inferred_type") && initializer.is_some()) {
                    self.output.push_str(": ");
                    self.write_type(ty)?;
                }
                if let Some(init) = initializer {
                    self.output.push_str(" = ");
                    self.write_initializer(init)?;
                }
                self.output.push('\n');
            }

            IrStatementKind::Block { statements } => {
                self.output.push_str("do ");
                self.write_body(statements)?;
            }

            IrStatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.output.push_str("if ");
                self.write_condition(condition)?;
                self.output.push(' ');
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
                iterable,
                body,
                ..
            } => {
                let _ = write!(self.output, "for {variable} in ");
                self.write_expr(iterable)?;
                self.output.push(' ');
                self.write_branch(body)?;
            }

            IrStatementKind::While { condition, body } => {
                self.output.push_str("while ");
                self.write_condition(condition)?;
                self.output.push(' ');
                self.write_branch(body)?;
            }

            IrStatementKind::DoWhile { body, condition } => {
                self.output.push_str("repeat ");
                self.write_branch(body)?;
                self.reopen_line();
                self.output.push_str("while ");
                self.write_condition(condition)?;
                self.output.push('\n');
            }

            IrStatementKind::Switch { expression, cases } => {
                self.output.push_str("switch ");
                self.write_condition(expression)?;
                self.output.push_str(" {\n");
                self.write_switch_cases(cases)?;
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
                if finally_block.is_some() {
                    return Err(Self::unsupported("finally block"));
                }
                self.output.push_str("do ");
                self.write_branch(try_block)?;
                for clause in catch_clauses {
                    let [ty] = clause.exception_types.as_slice() else {
                        return Err(Self::unsupported("multi-type catch clause"));
                    };
                    self.reopen_line();
                    let _ = write!(
                        self.output,
                        "catch let {} as ",
                        clause.name.as_deref().unwrap_or("error")
                    );
                    self.write_type(&ty.clone().with_nullable(false))?;
                    self.output.push(' ');
                    match &clause.body {
                        Some(body) => self.write_branch(body)?,
                        None => self.write_body(&[])?,
                    }
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

    /// Conditions are written without the parentheses Java needs.
    fn write_condition(&mut self, condition: &IrExpression) -> Result<()> {
        match &condition.kind {
            IrExpressionKind::Parenthesized { expression } => self.write_expr(expression),
            _ => self.write_expr(condition),
        }
    }

    /// Cases without statements fall through into the next one and are merged
    /// into its pattern list; a trailing `break` is implicit in Swift.
    fn write_switch_cases(&mut self, cases: &[IrSwitchCase]) -> Result<()> {
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
                self.output.push_str("default:\n");
            } else {
                self.output.push_str("case ");
                for (j, m) in pending.iter().enumerate() {
                    if j > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(m)?;
                }
                self.output.push_str(":\n");
            }
            self.indent += 1;
            if stmts.is_empty() {
                self.write_indent();
                self.output.push_str("break\n");
            }
            for stmt in stmts {
                self.write_stmt(stmt)?;
            }
            self.indent -= 1;
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

            IrExpressionKind::Literal { value } => self.output.push_str(&literal(value)),

            IrExpressionKind::Identifier { qualifier, name } => {
                self.write_receiver(qualifier)?;
                self.output.push_str(if name == "this" { "self" } else { name.as_str() });
            }

            IrExpressionKind::TypeReference { referenced } => {
                self.write_type(&referenced.clone().with_nullable(false))?;
            }

            IrExpressionKind::PropertyAccess {
                receiver: Some(receiver),
                name,
            } if name == "class" => {
                self.write_expr(receiver)?;
                self.output.push_str(".self");
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
                    IrCallKind::This => self.output.push_str("self.init"),
                    IrCallKind::Super => self.output.push_str("super.init"),
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
                let name = self.type_name(class_name, &expr.meta);
                self.output.push_str(&name);
                self.write_type_arguments(type_arguments)?;
                self.write_arguments(arguments)?;
            }

            IrExpressionKind::Binary {
                operator: IrBinaryOperator::UnsignedShiftRight,
                ..
            } => {
                return Err(Self::unsupported("unsigned shift operator `>>>`"));
            }

            IrExpressionKind::Binary {
                left,
                operator,
                right,
            } => {
                self.write_expr(left)?;
                let _ = write!(self.output, " {} ", operator.symbol());
                self.write_expr(right)?;
            }

            IrExpressionKind::Unary {
                operator: IrUnaryOperator::Increment | IrUnaryOperator::Decrement,
                ..
            } => {
                return Err(Self::unsupported("increment or decrement used as a value"));
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
                self.write_expr(condition)?;
                self.output.push_str(" ? ");
                self.write_expr(if_true)?;
                self.output.push_str(" : ");
                self.write_expr(if_false)?;
            }

            IrExpressionKind::Cast { expression, target } => {
                self.write_expr(expression)?;
                self.output.push_str(" as! ");
                self.write_type(&target.clone().with_nullable(false))?;
            }

            IrExpressionKind::TypeCheck {
                expression,
                checked,
            } => {
                self.write_expr(expression)?;
                self.output.push_str(" is ");
                self.write_type(&checked.clone().with_nullable(false))?;
            }

            IrExpressionKind::Lambda { parameters, body } => {
                self.output.push('{');
                if !parameters.is_empty() {
                    let _ = write!(self.output, " {} in", parameters.join(", "));
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

/// Swift spelling of a simple type name written in JVM terms.
fn swift_name(name: &str) -> &str {
    match name {
        "Object" | "Any" => "Any",
        "Boolean" => "Bool",
        "Byte" => "Int8",
        "Short" => "Int16",
        "Integer" => "Int32",
        "Long" => "Int64",
        "Character" | "Char" => "Character",
        "Void" | "Unit" => "Void",
        other => other,
    }
}

fn primitive_name(primitive: &IrPrimitive) -> &str {
    match primitive {
        IrPrimitive::Void => "Void",
        IrPrimitive::Boolean => "Bool",
        IrPrimitive::Byte => "Int8",
        IrPrimitive::Short => "Int16",
        IrPrimitive::Int => "Int32",
        IrPrimitive::Long => "Int64",
        IrPrimitive::Char => "Character",
        IrPrimitive::Float => "Float",
        IrPrimitive::Double => "Double",
        IrPrimitive::Unmapped(name) => name,
    }
}

/// `null` is `nil`, character literals are string literals and JVM numeric
/// suffixes are dropped.
fn literal(value: &str) -> String {
    if value == "null" {
        return "nil".to_string();
    }
    if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
        return format!("\"{inner}\"");
    }
    let numeric = value.starts_with(|c: char| c.is_ascii_digit());
    let is_hex = value.starts_with("0x") || value.starts_with("0X");
    match value.strip_suffix(['L', 'l', 'F', 'f', 'D', 'd']) {
        Some(stripped) if numeric && !(is_hex && !value.ends_with(['L', 'l'])) => {
            stripped.to_string()
        }
        _ => value.to_string(),
    }
}
