//! Java writer for IR.
//!
//! Emits one compilation unit per class. Every IR variant is matched;
//! shapes Java cannot express fail with [`Error::UnsupportedShape`] and
//! `Unknown` nodes without Java text fail with [`Error::MissingFallback`].

use crate::ext::{self, LANGUAGE};
use mcodegen_core::{Error, Result};
use mcodegen_ir::*;
use std::fmt::Write;

/// Emits IR as Java source code.
pub struct JavaWriter<'a> {
    output: String,
    indent: usize,
    unit: &'a str,
    package: &'a str,
    imports: Vec<&'a str>,
}

impl<'a> JavaWriter<'a> {
    /// Emit `class` as a compilation unit in `package`.
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
                .filter(|i| !i.wildcard && !i.meta.properties.flag("static"))
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

    fn write_header(&mut self, imports: &[IrImport]) {
        if !self.package.is_empty() {
            let _ = writeln!(self.output, "package {};\n", self.package);
        }
        if imports.is_empty() {
            return;
        }
        for import in imports {
            self.output.push_str("import ");
            if import.meta.properties.flag("static") {
                self.output.push_str("static ");
            }
            self.output.push_str(&import.path);
            if import.wildcard {
                self.output.push_str(".*");
            }
            self.output.push_str(";\n");
        }
        self.output.push('\n');
    }

    /// Simple name when the type is visible without qualification.
    fn type_name<'n>(&self, name: &'n str) -> &'n str {
        let Some((package, simple)) = name.rsplit_once('.') else {
            return name;
        };
        if package == self.package || package == "java.lang" || self.imports.contains(&name) {
            simple
        } else {
            name
        }
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
            self.output.push_str(annotation.name.as_str());
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
                        self.output.push_str(&param.name);
                        self.output.push_str(" = ");
                        self.write_expr(&param.value)?;
                    }
                    self.output.push(')');
                }
            }
            self.output.push(if inline { ' ' } else { '\n' });
        }
        Ok(())
    }

    fn write_visibility(&mut self, visibility: &IrVisibility) -> Result<()> {
        match visibility {
            IrVisibility::Public => self.output.push_str("public "),
            IrVisibility::Protected => self.output.push_str("protected "),
            IrVisibility::Private => self.output.push_str("private "),
            // Nearest Java scope for module-internal declarations.
            IrVisibility::Internal => {}
            v if ext::is_package_private(v) => {}
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
            self.output.push_str(&param.name);
            for (j, bound) in param.bounds.iter().enumerate() {
                self.output.push_str(if j == 0 { " extends " } else { " & " });
                self.write_type(bound, true)?;
            }
        }
        self.output.push('>');
        Ok(())
    }

    fn write_super_types(&mut self, keyword: &str, supers: &[&IrSuperClass]) -> Result<()> {
        if supers.is_empty() {
            return Ok(());
        }
        self.output.push(' ');
        self.output.push_str(keyword);
        self.output.push(' ');
        for (i, super_type) in supers.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str(self.type_name(&super_type.name));
            self.write_type_arguments(&super_type.type_arguments)?;
        }
        Ok(())
    }

    fn write_class(&mut self, class: &IrClass, in_interface: bool) -> Result<()> {
        let keyword = match &class.kind {
            IrClassKind::Class => "class",
            IrClassKind::Interface => "interface",
            IrClassKind::Enum => "enum",
            IrClassKind::Annotation => "@interface",
            k if ext::is_record(k) => "record",
            IrClassKind::Extension { language, name } => {
                return Err(Self::unsupported(format!("{language} class kind `{name}`")));
            }
        };

        let bases: Vec<&IrSuperClass> = class.base_classes().collect();
        let interfaces: Vec<&IrSuperClass> = class
            .super_classes
            .iter()
            .filter(|s| s.kind != IrClassKind::Class)
            .collect();
        let is_class = class.kind == IrClassKind::Class;
        if bases.len() > 1 || (!is_class && !bases.is_empty()) {
            return Err(Self::unsupported(format!(
                "{keyword} `{}` with {} base classes",
                class.name,
                bases.len()
            )));
        }

        self.write_annotations(&class.meta.annotations, false)?;
        self.write_indent();
        if !in_interface {
            self.write_visibility(&class.visibility)?;
        }
        let flags: &[&str] = if is_class {
            &["abstract", "static", "final"]
        } else {
            &["static"]
        };
        self.write_flags(&class.meta.properties, flags);
        self.output.push_str(keyword);
        self.output.push(' ');
        self.output.push_str(&class.name);
        self.write_type_parameters(&class.type_parameters)?;

        let is_record = ext::is_record(&class.kind);
        let (components, fields): (Vec<&IrField>, Vec<&IrField>) = class
            .fields
            .iter()
            .partition(|f| is_record && !f.meta.properties.flag("static"));
        if is_record {
            self.output.push('(');
            for (i, component) in components.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.write_annotations(&component.meta.annotations, true)?;
                self.write_type(&component.ty, false)?;
                self.output.push(' ');
                self.output.push_str(&component.name);
            }
            self.output.push(')');
        }

        if class.kind == IrClassKind::Interface {
            self.write_super_types("extends", &interfaces)?;
        } else {
            self.write_super_types("extends", &bases)?;
            self.write_super_types("implements", &interfaces)?;
        }
        self.output.push_str(" {\n");
        self.indent += 1;
        self.write_members(class, &fields)?;
        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    fn write_members(&mut self, class: &IrClass, fields: &[&IrField]) -> Result<()> {
        let in_interface = matches!(class.kind, IrClassKind::Interface | IrClassKind::Annotation);
        let (constants, fields): (Vec<&IrField>, Vec<&IrField>) = fields
            .iter()
            .partition(|f| f.meta.properties.flag("enum_constant"));

        let mut first = true;
        let mut separate = |out: &mut String| {
            if !first {
                out.push('\n');
            }
            first = false;
        };

        if class.kind == IrClassKind::Enum {
            separate(&mut self.output);
            for (i, constant) in constants.iter().enumerate() {
                self.write_annotations(&constant.meta.annotations, false)?;
                self.write_indent();
                self.output.push_str(&constant.name);
                if let Some(init) = &constant.initializer {
                    match init.as_expression().map(|e| &e.kind) {
                        Some(IrExpressionKind::ObjectCreation { arguments, .. }) => {
                            self.write_arguments(arguments)?;
                        }
                        _ => self.write_field_initializer(init)?,
                    }
                }
                let last = i + 1 == constants.len();
                self.output
                    .push_str(if !last { ",\n" } else { ";\n" });
            }
            if constants.is_empty() {
                self.write_indent();
                self.output.push_str(";\n");
            }
        }

        for field in fields {
            separate(&mut self.output);
            self.write_field(field, in_interface)?;
        }
        for init in &class.initializers {
            separate(&mut self.output);
            self.write_initializer(init)?;
        }
        for callable in &class.callables {
            separate(&mut self.output);
            self.write_callable(callable, class, in_interface)?;
        }
        for nested in &class.nested_classes {
            separate(&mut self.output);
            self.write_class(nested, in_interface)?;
        }
        Ok(())
    }

    fn write_field(&mut self, field: &IrField, in_interface: bool) -> Result<()> {
        self.write_annotations(&field.meta.annotations, false)?;
        self.write_indent();
        if !in_interface {
            self.write_visibility(&field.visibility)?;
            self.write_flags(&field.meta.properties, &["static"]);
            if !field.mutable {
                self.output.push_str("final ");
            }
        }
        self.write_type(&field.ty, false)?;
        self.output.push(' ');
        self.output.push_str(&field.name);
        if let Some(init) = &field.initializer {
            self.output.push_str(" = ");
            self.write_field_initializer(init)?;
        }
        self.output.push_str(";\n");
        Ok(())
    }

    fn write_field_initializer(&mut self, init: &IrStatement) -> Result<()> {
        match &init.kind {
            IrStatementKind::Expression { expression } => self.write_expr(expression),
            IrStatementKind::Unknown { fallback } => {
                let text = fallback_for(fallback, LANGUAGE).ok_or(Error::MissingFallback {
                    language: LANGUAGE,
                    node: "initializer",
                })?;
                self.output.push_str(text);
                Ok(())
            }
            _ => Err(Self::unsupported("statement as field initializer")),
        }
    }

    fn write_initializer(&mut self, init: &IrClassInitializer) -> Result<()> {
        self.write_indent();
        if init.kind == IrInitializerKind::Static {
            self.output.push_str("static ");
        }
        self.write_body(init.body.as_deref().unwrap_or_default())
    }

    fn write_callable(&mut self, callable: &IrCallable, class: &IrClass, in_interface: bool) -> Result<()> {
        let has_override = callable.meta.annotations.iter().any(|a| a.name == "Override");
        if callable.is_override && !has_override {
            self.write_indent();
            self.output.push_str("@Override\n");
        }
        self.write_annotations(&callable.meta.annotations, false)?;
        self.write_indent();

        if in_interface {
            if callable.is_static {
                self.output.push_str("static ");
            } else if callable.body.is_some() {
                self.output.push_str("default ");
            }
        } else {
            self.write_visibility(&callable.visibility)?;
            if callable.is_abstract {
                self.output.push_str("abstract ");
            }
            if callable.is_static {
                self.output.push_str("static ");
            }
            self.write_flags(&callable.meta.properties, &["final"]);
        }
        if !callable.type_parameters.is_empty() {
            self.write_type_parameters(&callable.type_parameters)?;
            self.output.push(' ');
        }

        match &callable.kind {
            IrCallableKind::Constructor { .. } => self.output.push_str(&class.name),
            IrCallableKind::Method => {
                self.write_type(&callable.return_type, false)?;
                self.output.push(' ');
                self.output.push_str(&callable.name);
            }
        }
        self.write_parameters(&callable.parameters)?;

        if let Some(default) = callable.meta.properties.get_str("default_value") {
            let _ = write!(self.output, " default {default}");
        }

        let delegate = match &callable.kind {
            IrCallableKind::Constructor { delegate } => delegate.as_ref(),
            IrCallableKind::Method => None,
        };
        match (&callable.body, delegate) {
            (None, None) => {
                self.output.push_str(";\n");
                Ok(())
            }
            (body, delegate) => {
                self.output.push(' ');
                self.output.push_str("{\n");
                self.indent += 1;
                if let Some(call) = delegate {
                    self.write_indent();
                    self.write_expr(call)?;
                    self.output.push_str(";\n");
                }
                for stmt in body.as_deref().unwrap_or_default() {
                    self.write_stmt(stmt)?;
                }
                self.indent -= 1;
                self.write_indent();
                self.output.push_str("}\n");
                Ok(())
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
            self.write_flags(&param.meta.properties, &["final"]);
            match (&param.ty.kind, param.meta.properties.flag("varargs")) {
                (IrTypeKind::Array { element }, true) => {
                    self.write_type(element, false)?;
                    self.output.push_str("...");
                }
                _ => self.write_type(&param.ty, false)?,
            }
            self.output.push(' ');
            self.output.push_str(&param.name);
        }
        self.output.push(')');
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Types
    // ----------------------------------------------------------------------

    /// `boxed` forces wrapper classes, as required for type arguments.
    fn write_type(&mut self, ty: &IrType, boxed: bool) -> Result<()> {
        self.write_annotations(&ty.meta.annotations, true)?;
        match &ty.kind {
            IrTypeKind::Reference { name, arguments } => {
                self.output.push_str(self.type_name(name));
                self.write_type_arguments(arguments)?;
            }
            IrTypeKind::Primitive { primitive } => {
                let name = if boxed || (ty.nullable && *primitive != IrPrimitive::Void) {
                    boxed_name(primitive)
                } else {
                    primitive.as_str()
                };
                self.output.push_str(name);
            }
            IrTypeKind::Array { element } => {
                self.write_type(element, false)?;
                self.output.push_str("[]");
            }
            IrTypeKind::Function { .. } => return Err(Self::unsupported("function type")),
            IrTypeKind::Generic { name } => self.output.push_str(name),
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
            self.write_type(arg, true)?;
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

    /// A nested statement: blocks open on the same line, others go on the next.
    fn write_branch(&mut self, stmt: &IrStatement) -> Result<()> {
        match &stmt.kind {
            IrStatementKind::Block { statements } => {
                self.output.push(' ');
                self.write_body(statements)
            }
            _ => {
                self.output.push('\n');
                self.indent += 1;
                self.write_stmt(stmt)?;
                self.indent -= 1;
                Ok(())
            }
        }
    }

    fn write_stmt(&mut self, stmt: &IrStatement) -> Result<()> {
        self.write_indent();
        self.write_stmt_inline(stmt)
    }

    /// Writes a statement whose indentation is already in place.
    fn write_stmt_inline(&mut self, stmt: &IrStatement) -> Result<()> {
        match &stmt.kind {
            IrStatementKind::Empty => self.output.push_str(";\n"),

            IrStatementKind::Expression { expression } => {
                self.write_expr(expression)?;
                self.output.push_str(";\n");
            }

            IrStatementKind::VariableDeclaration { .. } => {
                self.write_variable(stmt)?;
                self.output.push_str(";\n");
            }

            IrStatementKind::Block { statements } => self.write_body(statements)?,

            IrStatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.output.push_str("if (");
                self.write_expr(condition)?;
                self.output.push(')');
                self.write_branch(then_branch)?;
                if let Some(alt) = else_branch {
                    if matches!(then_branch.kind, IrStatementKind::Block { .. }) {
                        // `} else` on one line
                        self.output.pop();
                        self.output.push(' ');
                    } else {
                        self.write_indent();
                    }
                    self.output.push_str("else");
                    if matches!(alt.kind, IrStatementKind::If { .. }) {
                        self.output.push(' ');
                        self.write_stmt_inline(alt)?;
                    } else {
                        self.write_branch(alt)?;
                    }
                }
            }

            IrStatementKind::For {
                initializer,
                condition,
                update,
                body,
            } => {
                self.output.push_str("for (");
                if let Some(init) = initializer {
                    self.write_header_stmt(init)?;
                }
                self.output.push(';');
                if let Some(cond) = condition {
                    self.output.push(' ');
                    self.write_expr(cond)?;
                }
                self.output.push(';');
                if let Some(update) = update {
                    self.output.push(' ');
                    self.write_header_stmt(update)?;
                }
                self.output.push(')');
                self.write_branch(body)?;
            }

            IrStatementKind::ForEach {
                variable,
                variable_type,
                iterable,
                body,
            } => {
                self.output.push_str("for (");
                match variable_type {
                    Some(ty) => self.write_type(ty, false)?,
                    None => self.output.push_str("var"),
                }
                let _ = write!(self.output, " {variable} : ");
                self.write_expr(iterable)?;
                self.output.push(')');
                self.write_branch(body)?;
            }

            IrStatementKind::While { condition, body } => {
                self.output.push_str("while (");
                self.write_expr(condition)?;
                self.output.push(')');
                self.write_branch(body)?;
            }

            IrStatementKind::DoWhile { body, condition } => {
                self.output.push_str("do");
                self.write_branch(body)?;
                self.write_indent();
                self.output.push_str("while (");
                self.write_expr(condition)?;
                self.output.push_str(");\n");
            }

            IrStatementKind::Switch { expression, cases } => {
                self.output.push_str("switch (");
                self.write_expr(expression)?;
                self.output.push_str(") {\n");
                self.indent += 1;
                for case in cases {
                    self.write_case(case)?;
                }
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
                self.output.push_str(";\n");
            }

            IrStatementKind::Break => self.output.push_str("break;\n"),
            IrStatementKind::Continue => self.output.push_str("continue;\n"),

            IrStatementKind::Throw { expression } => {
                self.output.push_str("throw ");
                self.write_expr(expression)?;
                self.output.push_str(";\n");
            }

            IrStatementKind::TryCatch {
                try_block,
                catch_clauses,
                finally_block,
            } => {
                self.output.push_str("try");
                self.write_branch(try_block)?;
                for clause in catch_clauses {
                    self.write_indent();
                    self.output.push_str("catch (");
                    for (i, ty) in clause.exception_types.iter().enumerate() {
                        if i > 0 {
                            self.output.push_str(" | ");
                        }
                        self.write_type(ty, false)?;
                    }
                    let _ = write!(self.output, " {})", clause.name.as_deref().unwrap_or("e"));
                    match &clause.body {
                        Some(body) => self.write_branch(body)?,
                        None => self.write_branch(&IrStatement::block(Vec::new()))?,
                    }
                }
                if let Some(finally) = finally_block {
                    self.write_indent();
                    self.output.push_str("finally");
                    self.write_branch(finally)?;
                }
            }

            IrStatementKind::Unknown { fallback } => {
                let text = fallback_for(fallback, LANGUAGE).ok_or(Error::MissingFallback {
                    language: LANGUAGE,
                    node: "statement",
                })?;
                self.output.push_str(text);
                self.output.push('\n');
            }
        }
        Ok(())
    }

    /// Initializer or update clause of a `for` header, without the `;`.
    fn write_header_stmt(&mut self, stmt: &IrStatement) -> Result<()> {
        match &stmt.kind {
            IrStatementKind::VariableDeclaration { .. } => self.write_variable(stmt),
            IrStatementKind::Expression { expression } => self.write_expr(expression),
            _ => Err(Self::unsupported("statement in for header")),
        }
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
        if !mutable {
            self.output.push_str("final ");
        }
        self.write_type(ty, false)?;
        self.output.push(' ');
        self.output.push_str(name);
        for extra in additional_names {
            self.output.push_str(", ");
            self.output.push_str(extra);
        }
        if let Some(init) = initializer {
            self.output.push_str(" = ");
            self.write_field_initializer(init)?;
        }
        Ok(())
    }

    fn write_case(&mut self, case: &IrSwitchCase) -> Result<()> {
        self.write_indent();
        if case.matches.is_empty() {
            self.output.push_str("default");
        } else {
            self.output.push_str("case ");
            for (i, m) in case.matches.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.write_expr(m)?;
            }
        }

        let stmts = match &case.body {
            Some(IrStatement {
                kind: IrStatementKind::Block { statements },
                ..
            }) => statements.as_slice(),
            Some(other) => std::slice::from_ref(other),
            None => &[],
        };

        if case.meta.properties.flag("arrow") {
            self.output.push_str(" -> ");
            match stmts {
                [single] if single.as_expression().is_some() => self.write_stmt_inline(single)?,
                _ => self.write_body(stmts)?,
            }
        } else {
            self.output.push_str(":\n");
            self.indent += 1;
            for stmt in stmts {
                self.write_stmt(stmt)?;
            }
            self.indent -= 1;
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

            IrExpressionKind::TypeReference { referenced } => self.write_type(referenced, false)?,

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
                self.output.push_str("new ");
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
                let _ = write!(self.output, " {} ", operator.symbol());
                self.write_expr(right)?;
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
                self.output.push('(');
                self.write_type(target, false)?;
                self.output.push_str(") ");
                self.write_expr(expression)?;
            }

            IrExpressionKind::TypeCheck {
                expression,
                checked,
            } => {
                self.write_expr(expression)?;
                self.output.push_str(" instanceof ");
                self.write_type(checked, false)?;
            }

            IrExpressionKind::Lambda { parameters, body } => {
                match parameters.as_slice() {
                    [single] => self.output.push_str(single),
                    params => {
                        let _ = write!(self.output, "({})", params.join(", "));
                    }
                }
                self.output.push_str(" -> ");
                match body.as_slice() {
                    [single] if single.as_expression().is_some() => {
                        if let Some(e) = single.as_expression() {
                            self.write_expr(e)?;
                        }
                    }
                    stmts => {
                        self.write_body(stmts)?;
                        // The enclosing statement supplies its own terminator.
                        if self.output.ends_with('\n') {
                            self.output.pop();
                        }
                    }
                }
            }

            IrExpressionKind::Parenthesized { expression } => {
                self.output.push('(');
                self.write_expr(expression)?;
                self.output.push(')');
            }

            IrExpressionKind::Unknown { fallback } => {
                let text = fallback_for(fallback, LANGUAGE).ok_or(Error::MissingFallback {
                    language: LANGUAGE,
                    node: "expression",
                })?;
                self.output.push_str(text);
            }
        }
        Ok(())
    }
}

fn boxed_name(primitive: &IrPrimitive) -> &str {
    match primitive {
        IrPrimitive::Void => "Void",
        IrPrimitive::Boolean => "Boolean",
        IrPrimitive::Byte => "Byte",
        IrPrimitive::Short => "Short",
        IrPrimitive::Int => "Integer",
        IrPrimitive::Long => "Long",
        IrPrimitive::Char => "Character",
        IrPrimitive::Float => "Float",
        IrPrimitive::Double => "Double",
        IrPrimitive::Unmapped(name) => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private_field(name: &str, ty: IrType) -> IrField {
        IrFieldBuilder::new(name, ty)
            .visibility(IrVisibility::Private)
            .build()
            .unwrap()
    }

    fn emit(class: &IrClass) -> Result<String> {
        JavaWriter::emit("com.example", &[], class, "    ")
    }

    #[test]
    fn test_class_with_members() {
        let class = IrClassBuilder::qualified("com.example.User", "User")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .super_class(IrSuperClass::new("com.example.Base", IrClassKind::Class))
            .super_class(IrSuperClass::new("java.io.Serializable", IrClassKind::Interface))
            .field(private_field("id", IrType::primitive(IrPrimitive::Long)))
            .field(
                IrFieldBuilder::new(
                    "tags",
                    IrType::reference_with(
                        "java.util.List",
                        vec![IrType::reference("String")],
                    ),
                )
                .visibility(IrVisibility::Private)
                .mutable(false)
                .build()
                .unwrap(),
            )
            .callable(
                IrCallableBuilder::constructor("User")
                    .visibility(IrVisibility::Public)
                    .parameter(IrParameter::new("id", IrType::primitive(IrPrimitive::Long)))
                    .delegate(IrExpression::delegation(IrCallKind::Super, vec![]))
                    .body(vec![IrStatement::expr(IrExpression::assign(
                        IrExpression::property(Some(IrExpression::ident("this")), "id"),
                        IrAssignmentOperator::Assign,
                        IrExpression::ident("id"),
                    ))])
                    .build()
                    .unwrap(),
            )
            .callable(
                IrCallableBuilder::method("getId", IrType::primitive(IrPrimitive::Long))
                    .visibility(IrVisibility::Public)
                    .is_override(true)
                    .body(vec![IrStatement::return_stmt(Some(IrExpression::ident("id")))])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        insta::assert_snapshot!(emit(&class).unwrap(), @r"
        package com.example;

        public class User extends Base implements java.io.Serializable {
            private long id;

            private final java.util.List<String> tags;

            public User(long id) {
                super();
                this.id = id;
            }

            @Override
            public long getId() {
                return id;
            }
        }
        ");
    }

    #[test]
    fn test_interface_and_control_flow() {
        let body = vec![
            IrStatement::var(
                "total",
                IrType::primitive(IrPrimitive::Int),
                true,
                Some(IrStatement::expr(IrExpression::literal("0"))),
            ),
            IrStatement::if_stmt(
                IrExpression::binary(
                    IrExpression::ident("n"),
                    IrBinaryOperator::Greater,
                    IrExpression::literal("0"),
                ),
                IrStatement::block(vec![IrStatement::expr(IrExpression::assign(
                    IrExpression::ident("total"),
                    IrAssignmentOperator::PlusAssign,
                    IrExpression::ident("n"),
                ))]),
                Some(IrStatement::throw(IrExpression::new_object(
                    "IllegalArgumentException",
                    vec![],
                ))),
            ),
            IrStatement::unknown("java", "assert total >= 0;"),
            IrStatement::return_stmt(Some(IrExpression::ident("total"))),
        ];
        let class = IrClassBuilder::qualified("com.example.Counter", "Counter")
            .kind(IrClassKind::Interface)
            .visibility(IrVisibility::Public)
            .callable(
                IrCallableBuilder::method("size", IrType::primitive(IrPrimitive::Int))
                    .visibility(IrVisibility::Public)
                    .is_abstract(true)
                    .build()
                    .unwrap(),
            )
            .callable(
                IrCallableBuilder::method("add", IrType::primitive(IrPrimitive::Int))
                    .visibility(IrVisibility::Public)
                    .parameter(IrParameter::new("n", IrType::primitive(IrPrimitive::Int)))
                    .body(body)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        insta::assert_snapshot!(emit(&class).unwrap(), @r"
        package com.example;

        public interface Counter {
            int size();

            default int add(int n) {
                int total = 0;
                if (n > 0) {
                    total += n;
                } else
                    throw new IllegalArgumentException();
                assert total >= 0;
                return total;
            }
        }
        ");
    }

    #[test]
    fn test_enum_constants() {
        let color = IrType::reference("Color").with_nullable(false);
        let constant = |name: &str, args: Vec<IrExpression>| {
            let mut builder = IrFieldBuilder::new(name, color.clone())
                .visibility(IrVisibility::Public)
                .mutable(false)
                .property("enum_constant", true);
            if !args.is_empty() {
                builder = builder
                    .initializer(IrStatement::expr(IrExpression::new_object("Color", args)));
            }
            builder.build().unwrap()
        };
        let class = IrClassBuilder::qualified("com.example.Color", "Color")
            .kind(IrClassKind::Enum)
            .visibility(IrVisibility::Public)
            .field(constant("RED", vec![]))
            .field(constant("GREEN", vec![IrExpression::literal("2")]))
            .build()
            .unwrap();

        insta::assert_snapshot!(emit(&class).unwrap(), @r"
        package com.example;

        public enum Color {
            RED,
            GREEN(2);
        }
        ");
    }

    #[test]
    fn test_nullable_primitives_are_boxed() {
        let class = IrClassBuilder::qualified("com.example.Box", "Box")
            .kind(IrClassKind::Class)
            .visibility(ext::package_private())
            .field(private_field(
                "count",
                IrType::primitive(IrPrimitive::Int).with_nullable(true),
            ))
            .field(private_field(
                "ids",
                IrType::reference_with("java.util.List", vec![IrType::primitive(IrPrimitive::Long)]),
            ))
            .build()
            .unwrap();
        let imports = [IrImport::new("java.util.List")];
        let out = JavaWriter::emit("com.example", &imports, &class, "  ").unwrap();
        insta::assert_snapshot!(out, @r"
        package com.example;

        import java.util.List;

        class Box {
          private Integer count;

          private List<Long> ids;
        }
        ");
    }

    #[test]
    fn test_two_base_classes_are_rejected() {
        let class = IrClassBuilder::new("Both")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .super_class(IrSuperClass::new("a.A", IrClassKind::Class))
            .super_class(IrSuperClass::new("b.B", IrClassKind::Class))
            .build()
            .unwrap();
        assert!(matches!(emit(&class), Err(Error::UnsupportedShape { .. })));
    }

    #[test]
    fn test_unknown_without_java_text_is_rejected() {
        let class = IrClassBuilder::new("K")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .callable(
                IrCallableBuilder::method("f", IrType::void())
                    .visibility(IrVisibility::Public)
                    .body(vec![IrStatement::unknown("kotlin", "println(1)")])
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        match emit(&class) {
            Err(Error::MissingFallback { language, node }) => {
                assert_eq!(language, "java");
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
