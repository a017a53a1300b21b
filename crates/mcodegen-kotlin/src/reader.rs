//! Tree-sitter based Kotlin reader.
//!
//! Declarations (classes, objects, properties, functions, constructors) map
//! onto IR nodes. Function bodies map statement by statement: locals,
//! assignments, `if`, loops, subject `when`, jumps and `try` get structured
//! nodes, and a statement with no mapping is kept as an `Unknown` carrying
//! its Kotlin text. Expressions go through a small mapper that falls back
//! to `Unknown` the same way.
//!
//! There is no compiler behind the reader, so super types are qualified
//! through the file's own imports and declarations only and otherwise kept
//! as written.

use crate::ext::{self, LANGUAGE};
use crate::module::JVM_PACKAGE;
use mcodegen_core::{Error, Result};
use mcodegen_ir::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Modifier keywords kept as boolean properties on the declaration.
const FLAGS: &[&str] = &[
    "abstract", "open", "final", "override", "data", "sealed", "inner", "value", "const",
    "lateinit", "inline", "operator", "suspend", "tailrec", "infix", "external", "expect",
    "actual",
];

/// Parse Kotlin source into a syntax tree.
pub(crate) fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_kotlin::language().into())
        .map_err(|err| Error::Config(format!("kotlin grammar: {err}")))?;
    parser
        .parse(source, None)
        .ok_or_else(|| Error::Config("kotlin parser produced no tree".into()))
}

/// Parse one Kotlin file into an [`IrFile`]. `source_path` is relative to
/// the sources directory and only used for names and locations.
pub(crate) fn read_kotlin(source: &str, source_path: &Path) -> Result<IrFile> {
    let tree = parse_tree(source)?;
    let root = tree.root_node();
    if root.has_error() {
        tracing::debug!(path = %source_path.display(), "kotlin source has syntax errors");
    }

    let file_name = source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let package = read_package(root, source);
    let imports = read_imports(root, source);

    let mut local = HashMap::new();
    collect_declared(root, source, &package, &mut local);

    let ctx = ReadContext {
        source,
        path: source_path,
        package: &package,
        imports: &imports,
        local,
        generics: RefCell::new(Vec::new()),
    };

    // The root package is a valid (empty) package in Kotlin.
    let mut file = IrFileBuilder::new(file_name).property(JVM_PACKAGE, package.clone());
    for import in &imports {
        file.push_import(import.clone());
    }

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "class_declaration" | "object_declaration" => {
                file.push_declaration(ctx.read_class(child, None)?);
            }
            "function_declaration" => {
                file.push_declaration(ctx.read_function(child, false)?);
            }
            "property_declaration" => {
                if let Some(field) = ctx.read_property(child)? {
                    file.push_declaration(field);
                }
            }
            "package_header" | "import_list" | "import_header" | "shebang_line"
            | "file_annotation" | "line_comment" | "multiline_comment" => {}
            other => {
                tracing::debug!(kind = other, "skipping kotlin top-level node");
            }
        }
    }
    Ok(file.build())
}

fn text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn is_comment(kind: &str) -> bool {
    matches!(kind, "line_comment" | "multiline_comment")
}

/// Expression-like child; the `null` literal is an anonymous token.
fn is_value(node: Node) -> bool {
    (node.is_named() && !is_comment(node.kind())) || node.kind() == "null"
}

fn is_type_node(kind: &str) -> bool {
    matches!(
        kind,
        "user_type"
            | "nullable_type"
            | "function_type"
            | "parenthesized_type"
            | "not_nullable_type"
            | "non_nullable_type"
    )
}

fn is_class_node(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration" | "object_declaration" | "companion_object"
    )
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

/// True when `node` has an anonymous child token `token` (`interface`, `var`, ...).
fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token)
}

/// First type node among the direct children.
fn type_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|c| is_type_node(c.kind()))
}

/// The named child following the first `=` token.
fn value_after_eq(node: Node) -> Option<Node> {
    value_after(node, "=")
}

fn value_after<'t>(node: Node<'t>, token: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let mut seen = false;
    for child in node.children(&mut cursor) {
        if seen && is_value(child) {
            return Some(child);
        }
        if child.kind() == token {
            seen = true;
        }
    }
    None
}

/// First value child that is not a branch body.
fn first_operand(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|c| is_value(*c) && c.kind() != "control_structure_body")
}

/// Declared name: the `name` field, else the first identifier child.
fn decl_name<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(text(name, source));
    }
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "type_identifier" | "simple_identifier"))
        .map(|n| text(n, source))
}

/// `val` / `var` of a property or primary-constructor parameter.
fn binding_keyword<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "val" | "var" => return Some(child.kind()),
            "binding_pattern_kind" => return Some(text(child, source).trim()),
            _ => {}
        }
    }
    None
}

fn read_package(root: Node, source: &str) -> String {
    let Some(header) = child_of_kind(root, "package_header") else {
        return String::new();
    };
    match child_of_kind(header, "identifier") {
        Some(id) => text(id, source).to_string(),
        None => text(header, source)
            .trim_start_matches("package")
            .trim()
            .to_string(),
    }
}

fn read_imports(root: Node, source: &str) -> Vec<IrImport> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "import_header" => imports.extend(read_import(child, source)),
            "import_list" => {
                let mut inner = child.walk();
                for header in child.named_children(&mut inner) {
                    if header.kind() == "import_header" {
                        imports.extend(read_import(header, source));
                    }
                }
            }
            _ => {}
        }
    }
    imports
}

fn read_import(header: Node, source: &str) -> Option<IrImport> {
    let path = text(child_of_kind(header, "identifier")?, source);
    let mut import = if child_of_kind(header, "wildcard_import").is_some() {
        IrImport::wildcard(path)
    } else {
        IrImport::new(path)
    };
    if let Some(alias) = child_of_kind(header, "import_alias") {
        let alias = decl_name(alias, source)
            .unwrap_or_else(|| text(alias, source).trim_start_matches("as").trim());
        import.meta.properties.insert("alias", alias);
    }
    Some(import)
}

/// Records every class declared in the file under its qualified name.
fn collect_declared(node: Node, source: &str, prefix: &str, out: &mut HashMap<String, String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if !is_class_node(child.kind()) {
            continue;
        }
        let Some(name) = decl_name(child, source) else {
            continue;
        };
        let qualified = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        out.entry(name.to_string()).or_insert_with(|| qualified.clone());
        let mut inner = child.walk();
        for body in child.named_children(&mut inner) {
            if matches!(body.kind(), "class_body" | "enum_class_body") {
                collect_declared(body, source, &qualified, out);
            }
        }
    }
}

/// Modifier keywords and annotations of one declaration.
#[derive(Default)]
struct Modifiers {
    keywords: Vec<String>,
    annotations: Vec<IrAnnotation>,
}

impl Modifiers {
    fn has(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Kotlin declarations are public unless marked otherwise.
    fn visibility(&self) -> IrVisibility {
        if self.has("private") {
            IrVisibility::Private
        } else if self.has("protected") {
            IrVisibility::Protected
        } else if self.has("internal") {
            IrVisibility::Internal
        } else {
            IrVisibility::Public
        }
    }

    fn flags(&self) -> impl Iterator<Item = &'static str> + '_ {
        FLAGS.iter().copied().filter(|flag| self.has(flag))
    }
}

struct ReadContext<'a> {
    source: &'a str,
    path: &'a Path,
    package: &'a str,
    imports: &'a [IrImport],
    /// Simple name of every class declared in the file -> qualified name.
    local: HashMap<String, String>,
    /// Type parameter names in scope, innermost last.
    generics: RefCell<Vec<String>>,
}

impl<'a> ReadContext<'a> {
    fn node_text(&self, node: Node) -> &'a str {
        text(node, self.source)
    }

    fn location(&self, node: Node) -> IrLocation {
        let pos = node.start_position();
        IrLocation::new(self.path.display().to_string(), pos.row + 1, pos.column + 1)
    }

    fn with_generics<T>(&self, names: &[String], f: impl FnOnce() -> T) -> T {
        let depth = self.generics.borrow().len();
        self.generics.borrow_mut().extend(names.iter().cloned());
        let out = f();
        self.generics.borrow_mut().truncate(depth);
        out
    }

    fn is_generic(&self, name: &str) -> bool {
        self.generics.borrow().iter().any(|g| g == name)
    }

    /// Qualifies a type name through local declarations and explicit imports.
    fn resolve(&self, name: &str) -> String {
        if let Some((head, rest)) = name.split_once('.') {
            return match self.resolve_simple(head) {
                Some(outer) => format!("{outer}.{rest}"),
                None => name.to_string(),
            };
        }
        self.resolve_simple(name).unwrap_or_else(|| name.to_string())
    }

    fn resolve_simple(&self, name: &str) -> Option<String> {
        if let Some(qualified) = self.local.get(name) {
            return Some(qualified.clone());
        }
        self.imports
            .iter()
            .filter(|i| !i.wildcard)
            .find(|i| i.meta.properties.get_str("alias").unwrap_or(i.simple_name()) == name)
            .map(|i| i.path.clone())
    }

    // ----------------------------------------------------------------------
    // Declarations
    // ----------------------------------------------------------------------

    fn read_modifiers(&self, node: Node) -> Modifiers {
        let mut modifiers = Modifiers::default();
        let Some(mods) = child_of_kind(node, "modifiers") else {
            return modifiers;
        };
        self.collect_modifiers(mods, &mut modifiers);
        modifiers
    }

    fn collect_modifiers(&self, mods: Node, out: &mut Modifiers) {
        let mut cursor = mods.walk();
        for child in mods.named_children(&mut cursor) {
            match child.kind() {
                "annotation" => out.annotations.push(self.read_annotation(child)),
                k if is_comment(k) => {}
                _ => out.keywords.push(self.node_text(child).trim().to_string()),
            }
        }
    }

    fn read_annotation(&self, node: Node) -> IrAnnotation {
        let target = child_of_kind(node, "constructor_invocation");
        let name_node = target
            .and_then(|t| child_of_kind(t, "user_type"))
            .or_else(|| child_of_kind(node, "user_type"));
        let name = name_node.map(|n| self.node_text(n)).unwrap_or_default();
        let mut annotation = IrAnnotation::new(name);
        if let Some(site) = child_of_kind(node, "use_site_target") {
            let site = self.node_text(site).trim_end_matches(':').trim();
            annotation.properties.insert("use_site", site);
        }
        let Some(args) = target.and_then(|t| child_of_kind(t, "value_arguments")) else {
            return annotation;
        };
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            if arg.kind() != "value_argument" {
                continue;
            }
            let Some(value) = last_named_child(arg) else {
                continue;
            };
            let key = if has_token(arg, "=") {
                child_of_kind(arg, "simple_identifier")
                    .map(|k| self.node_text(k))
                    .unwrap_or("value")
            } else {
                "value"
            };
            annotation = annotation.with_parameter(key, self.read_expr(value));
        }
        annotation
    }

    fn read_type_parameters(&self, node: Node) -> Vec<IrTypeParameter> {
        let mut out = Vec::new();
        if let Some(params) = child_of_kind(node, "type_parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                if param.kind() != "type_parameter" {
                    continue;
                }
                let Some(name) = child_of_kind(param, "type_identifier") else {
                    continue;
                };
                let mut tp = IrTypeParameter::new(self.node_text(name));
                if let Some(variance) = child_of_kind(param, "type_parameter_modifiers") {
                    tp.meta
                        .properties
                        .insert("variance", self.node_text(variance).trim());
                }
                out.push(tp);
            }
        }

        // Bounds may be written inline or in a `where` clause.
        let names: Vec<String> = out.iter().map(|t| t.name.clone()).collect();
        self.with_generics(&names, || {
            if let Some(params) = child_of_kind(node, "type_parameters") {
                let mut cursor = params.walk();
                for (param, tp) in params
                    .named_children(&mut cursor)
                    .filter(|p| p.kind() == "type_parameter")
                    .zip(out.iter_mut())
                {
                    if let Some(bound) = type_child(param) {
                        tp.bounds.push(self.read_type(bound));
                    }
                }
            }
            if let Some(constraints) = child_of_kind(node, "type_constraints") {
                let mut cursor = constraints.walk();
                for constraint in constraints.named_children(&mut cursor) {
                    let (Some(name), Some(bound)) = (
                        child_of_kind(constraint, "type_identifier"),
                        type_child(constraint),
                    ) else {
                        continue;
                    };
                    let name = self.node_text(name);
                    if let Some(tp) = out.iter_mut().find(|t| t.name == name) {
                        tp.bounds.push(self.read_type(bound));
                    }
                }
            }
        });
        out
    }

    pub(crate) fn read_class(&self, node: Node, outer: Option<&str>) -> Result<IrClass> {
        let is_companion = node.kind() == "companion_object";
        let name = decl_name(node, self.source)
            .unwrap_or(if is_companion { "Companion" } else { "" });
        let qualified = match outer {
            Some(outer) => format!("{outer}.{name}"),
            None if self.package.is_empty() => name.to_string(),
            None => format!("{}.{name}", self.package),
        };

        let modifiers = self.read_modifiers(node);
        let kind = match node.kind() {
            "object_declaration" | "companion_object" => ext::object(),
            _ if has_token(node, "interface") => IrClassKind::Interface,
            _ if modifiers.has("enum") || child_of_kind(node, "enum_class_body").is_some() => {
                IrClassKind::Enum
            }
            _ if modifiers.has("annotation") => IrClassKind::Annotation,
            _ => IrClassKind::Class,
        };

        let type_parameters = self.read_type_parameters(node);
        let generic_names: Vec<String> = type_parameters.iter().map(|t| t.name.clone()).collect();

        let mut builder = IrClassBuilder::qualified(qualified.clone(), name)
            .kind(kind.clone())
            .visibility(modifiers.visibility())
            .location(self.location(node));
        for flag in modifiers.flags() {
            builder = builder.property(flag, true);
        }
        if is_companion {
            builder = builder.property("companion", true);
        }
        if has_token(node, "fun") {
            builder = builder.property("fun", true);
        }
        for annotation in &modifiers.annotations {
            builder = builder.annotation(annotation.clone());
        }
        for tp in type_parameters {
            builder = builder.type_parameter(tp);
        }

        self.with_generics(&generic_names, || -> Result<()> {
            for super_class in self.read_super_types(node) {
                builder.push_super_class(super_class);
            }
            if let Some(ctor) = child_of_kind(node, "primary_constructor") {
                let (fields, callable) = self.read_primary_constructor(ctor, name)?;
                for field in fields {
                    builder.push_field(field);
                }
                builder.push_callable(callable);
            }
            let mut cursor = node.walk();
            for body in node.named_children(&mut cursor) {
                if matches!(body.kind(), "class_body" | "enum_class_body") {
                    self.read_body(body, &kind, name, &qualified, &mut builder)?;
                }
            }
            Ok(())
        })?;

        Ok(builder.build()?)
    }

    fn read_super_types(&self, node: Node) -> Vec<IrSuperClass> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "delegation_specifier" => out.extend(self.read_delegation_specifier(child)),
                "delegation_specifiers" => {
                    let mut inner = child.walk();
                    for spec in child.named_children(&mut inner) {
                        if spec.kind() == "delegation_specifier" {
                            out.extend(self.read_delegation_specifier(spec));
                        }
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// `Base(args)` is a class; a bare type or `Api by impl` is an interface.
    fn read_delegation_specifier(&self, spec: Node) -> Option<IrSuperClass> {
        let mut cursor = spec.walk();
        let target = spec
            .named_children(&mut cursor)
            .find(|c| !is_comment(c.kind()) && c.kind() != "annotation")?;
        match target.kind() {
            "constructor_invocation" => {
                let ty = child_of_kind(target, "user_type")?;
                let mut super_class = self.super_type(ty, IrClassKind::Class);
                if let Some(args) = child_of_kind(target, "value_arguments") {
                    super_class
                        .meta
                        .properties
                        .insert("arguments", self.node_text(args));
                }
                Some(super_class)
            }
            "user_type" => Some(self.super_type(target, IrClassKind::Interface)),
            "explicit_delegation" => {
                let ty = child_of_kind(target, "user_type")?;
                let mut super_class = self.super_type(ty, IrClassKind::Interface);
                if let Some(delegate) = last_named_child(target).filter(|d| d.id() != ty.id()) {
                    super_class
                        .meta
                        .properties
                        .insert("delegate", self.node_text(delegate));
                }
                Some(super_class)
            }
            other => {
                tracing::debug!(kind = other, "skipping kotlin super type");
                None
            }
        }
    }

    fn super_type(&self, user_type: Node, kind: IrClassKind) -> IrSuperClass {
        let (name, arguments) = self.read_user_type(user_type);
        IrSuperClass::new(self.resolve(&name), kind).with_type_arguments(arguments)
    }

    fn read_primary_constructor(
        &self,
        node: Node,
        class_name: &str,
    ) -> Result<(Vec<IrField>, IrCallable)> {
        let modifiers = self.read_modifiers(node);
        let holder = child_of_kind(node, "class_parameters").unwrap_or(node);

        let mut fields = Vec::new();
        let mut assignments = Vec::new();
        let mut ctor = IrCallableBuilder::constructor(class_name)
            .visibility(modifiers.visibility())
            .location(self.location(node))
            .property("primary", true);

        let mut cursor = holder.walk();
        for param_node in holder.named_children(&mut cursor) {
            if param_node.kind() != "class_parameter" {
                continue;
            }
            let param_mods = self.read_modifiers(param_node);
            let Some(name) = decl_name(param_node, self.source) else {
                continue;
            };
            let ty = type_child(param_node)
                .map(|t| self.read_type(t))
                .unwrap_or_else(|| IrType::reference("Any").with_nullable(false));

            let mut param = IrParameter::new(name, ty.clone());
            param.default_value = value_after_eq(param_node).map(|v| self.read_expr(v));
            param.meta.annotations = param_mods.annotations.clone();
            ctor = ctor.parameter(param);

            // `val`/`var` parameters also declare a property.
            if let Some(binding) = binding_keyword(param_node, self.source) {
                let mut field = IrFieldBuilder::new(name, ty)
                    .visibility(param_mods.visibility())
                    .mutable(binding == "var")
                    .location(self.location(param_node))
                    .property("constructor_property", true);
                for flag in param_mods.flags() {
                    field = field.property(flag, true);
                }
                for annotation in param_mods.annotations {
                    field = field.annotation(annotation);
                }
                fields.push(field.build()?);
                assignments.push(IrStatement::expr(IrExpression::assign(
                    IrExpression::property(Some(IrExpression::ident("this")), name),
                    IrAssignmentOperator::Assign,
                    IrExpression::ident(name),
                )));
            }
        }

        Ok((fields, ctor.body(assignments).build()?))
    }

    fn read_body(
        &self,
        body: Node,
        kind: &IrClassKind,
        class_name: &str,
        qualified: &str,
        builder: &mut IrClassBuilder,
    ) -> Result<()> {
        let in_interface = *kind == IrClassKind::Interface;
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "property_declaration" => {
                    if let Some(field) = self.read_property(member)? {
                        builder.push_field(field);
                    }
                }

                "function_declaration" => {
                    builder.push_callable(self.read_function(member, in_interface)?);
                }

                "secondary_constructor" => {
                    builder.push_callable(self.read_secondary_constructor(member, class_name)?);
                }

                // init { ... }
                "anonymous_initializer" => {
                    let mut init = IrClassInitializer::new(
                        IrInitializerKind::Instance,
                        Some(self.read_statements(member)),
                    );
                    init.meta.location = Some(self.location(member));
                    builder.push_initializer(init);
                }

                k if is_class_node(k) => {
                    builder.push_nested_class(self.read_class(member, Some(qualified))?);
                }

                "enum_entry" => {
                    builder.push_field(self.read_enum_entry(member, class_name)?);
                }

                k if is_comment(k) => {}

                other => {
                    tracing::debug!(kind = other, class = class_name, "skipping kotlin member");
                }
            }
        }
        Ok(())
    }

    /// `None` for destructuring declarations, which have no IR counterpart.
    pub(crate) fn read_property(&self, node: Node) -> Result<Option<IrField>> {
        let Some(variable) = child_of_kind(node, "variable_declaration") else {
            tracing::debug!(
                text = self.node_text(node),
                "skipping kotlin property without a single variable"
            );
            return Ok(None);
        };
        let Some(name) = decl_name(variable, self.source) else {
            return Ok(None);
        };
        let modifiers = self.read_modifiers(node);
        let type_parameters = self.read_type_parameters(node);
        let generic_names: Vec<String> = type_parameters.iter().map(|t| t.name.clone()).collect();

        self.with_generics(&generic_names, || -> Result<Option<IrField>> {
            let value = value_after_eq(node);
            let declared = type_child(variable).map(|t| self.read_type(t));
            let inferred = declared.is_none();
            let ty = declared
                .or_else(|| value.and_then(literal_type))
                .unwrap_or_else(|| IrType::reference("Any").with_nullable(false));

            let mutable = binding_keyword(node, self.source) == Some("var");
            let mut field = IrFieldBuilder::new(name, ty)
                .visibility(modifiers.visibility())
                .mutable(mutable)
                .location(self.location(node));
            if inferred {
                field = field.property("inferred_type", true);
            }
            for flag in modifiers.flags() {
                field = field.property(flag, true);
            }
            for annotation in modifiers.annotations {
                field = field.annotation(annotation);
            }
            if let Some(receiver) = child_of_kind(node, "receiver_type") {
                field = field.property("receiver", self.node_text(receiver));
            }
            if let Some(value) = value {
                field = field.initializer(IrStatement::expr(self.read_expr(value)));
            }
            if let Some(delegate) = child_of_kind(node, "property_delegate") {
                let expr = last_named_child(delegate)
                    .map(|e| self.node_text(e))
                    .unwrap_or_default();
                field = field.property("delegate", expr);
            }
            for accessor in ["getter", "setter"] {
                if let Some(node) = child_of_kind(node, accessor) {
                    field = field.property(accessor, self.node_text(node));
                }
            }
            Ok(Some(field.build()?))
        })
    }

    fn read_enum_entry(&self, node: Node, enum_name: &str) -> Result<IrField> {
        let name = decl_name(node, self.source).unwrap_or_default();
        let mut field =
            IrFieldBuilder::new(name, IrType::reference(enum_name).with_nullable(false))
                .visibility(IrVisibility::Public)
                .mutable(false)
                .location(self.location(node))
                .property("enum_constant", true);
        if let Some(args) = child_of_kind(node, "value_arguments") {
            field = field.initializer(IrStatement::expr(IrExpression::new_object(
                enum_name,
                self.read_arguments(args),
            )));
        }
        if let Some(body) = child_of_kind(node, "class_body") {
            field = field.property("body", self.node_text(body));
        }
        for annotation in self.read_modifiers(node).annotations {
            field = field.annotation(annotation);
        }
        Ok(field.build()?)
    }

    pub(crate) fn read_function(&self, node: Node, in_interface: bool) -> Result<IrCallable> {
        let modifiers = self.read_modifiers(node);
        let name = node
            .child_by_field_name("name")
            .or_else(|| child_of_kind(node, "simple_identifier"))
            .map(|n| self.node_text(n))
            .unwrap_or_default();
        let type_parameters = self.read_type_parameters(node);
        let generic_names: Vec<String> = type_parameters.iter().map(|t| t.name.clone()).collect();

        self.with_generics(&generic_names, || -> Result<IrCallable> {
            let params = child_of_kind(node, "function_value_parameters");
            let parameters = params
                .map(|p| self.read_parameters(p))
                .unwrap_or_default();

            // The return type follows the parameter list.
            let return_type = params
                .and_then(|p| {
                    let mut sibling = p.next_named_sibling();
                    while let Some(s) = sibling {
                        if is_type_node(s.kind()) {
                            return Some(s);
                        }
                        if s.kind() == "function_body" {
                            return None;
                        }
                        sibling = s.next_named_sibling();
                    }
                    None
                })
                .map(|t| self.read_type(t))
                .unwrap_or_else(IrType::void);

            let mut expression_body = false;
            let body = child_of_kind(node, "function_body").map(|b| {
                if has_token(b, "=") {
                    expression_body = true;
                    let expr = last_named_child(b)
                        .map(|e| self.read_expr(e))
                        .unwrap_or_else(IrExpression::empty);
                    vec![IrStatement::return_stmt(Some(expr))]
                } else {
                    self.read_statements(b)
                }
            });

            let is_abstract = modifiers.has("abstract") || (in_interface && body.is_none());
            let mut callable = IrCallableBuilder::method(name, return_type)
                .visibility(modifiers.visibility())
                .is_abstract(is_abstract)
                .is_override(modifiers.has("override"))
                .location(self.location(node));
            for flag in modifiers.flags() {
                if !matches!(flag, "abstract" | "override") {
                    callable = callable.property(flag, true);
                }
            }
            if expression_body {
                callable = callable.property("expression_body", true);
            }
            if let Some(receiver) = child_of_kind(node, "receiver_type") {
                callable = callable.property("receiver", self.node_text(receiver));
            }
            for annotation in modifiers.annotations {
                callable = callable.annotation(annotation);
            }
            for tp in type_parameters {
                callable = callable.type_parameter(tp);
            }
            for param in parameters {
                callable = callable.parameter(param);
            }
            if let Some(body) = body {
                callable = callable.body(body);
            }
            Ok(callable.build()?)
        })
    }

    fn read_secondary_constructor(&self, node: Node, class_name: &str) -> Result<IrCallable> {
        let modifiers = self.read_modifiers(node);
        let mut ctor = IrCallableBuilder::constructor(class_name)
            .visibility(modifiers.visibility())
            .location(self.location(node));
        if let Some(params) = child_of_kind(node, "function_value_parameters") {
            for param in self.read_parameters(params) {
                ctor = ctor.parameter(param);
            }
        }
        if let Some(call) = child_of_kind(node, "constructor_delegation_call") {
            let call_kind = if self.node_text(call).trim_start().starts_with("super") {
                IrCallKind::Super
            } else {
                IrCallKind::This
            };
            let args = child_of_kind(call, "value_arguments")
                .map(|a| self.read_arguments(a))
                .unwrap_or_default();
            ctor = ctor.delegate(IrExpression::delegation(call_kind, args));
        }
        for annotation in modifiers.annotations {
            ctor = ctor.annotation(annotation);
        }
        Ok(ctor.body(self.read_statements(node)).build()?)
    }

    fn read_parameters(&self, node: Node) -> Vec<IrParameter> {
        let mut params: Vec<IrParameter> = Vec::new();
        let mut pending = Modifiers::default();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor).filter(|c| is_value(*c)) {
            match child.kind() {
                "parameter_modifiers" => self.collect_modifiers(child, &mut pending),
                "parameter" => {
                    let modifiers = std::mem::take(&mut pending);
                    let name = decl_name(child, self.source).unwrap_or_default();
                    let mut ty = type_child(child)
                        .map(|t| self.read_type(t))
                        .unwrap_or_else(|| IrType::reference("Any").with_nullable(false));
                    let mut param_meta = IrMeta::default();
                    if modifiers.has("vararg") {
                        ty = IrType::array(ty).with_nullable(false);
                        param_meta.properties.insert("varargs", true);
                    }
                    param_meta.annotations = modifiers.annotations;
                    let mut param = IrParameter::new(name, ty);
                    param.meta = param_meta;
                    params.push(param);
                }
                k if is_comment(k) => {}
                // `= default` of the preceding parameter
                _ => {
                    if let Some(last) = params.last_mut() {
                        last.default_value = Some(self.read_expr(child));
                    }
                }
            }
        }
        params
    }

    // ----------------------------------------------------------------------
    // Statements
    // ----------------------------------------------------------------------

    /// Statements of a `{ ... }` body.
    fn read_statements(&self, node: Node) -> Vec<IrStatement> {
        let statements = child_of_kind(node, "statements").or_else(|| {
            child_of_kind(node, "block").and_then(|b| child_of_kind(b, "statements"))
        });
        let Some(statements) = statements else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = statements.walk();
        for stmt in statements.named_children(&mut cursor) {
            if !is_comment(stmt.kind()) {
                out.push(self.read_statement(stmt));
            }
        }
        out
    }

    fn read_block(&self, node: Node) -> IrStatement {
        IrStatement::block(self.read_statements(node))
    }

    /// Branch of `if`, `when` and loops: a braced block or a single statement.
    fn read_control_body(&self, node: Node) -> IrStatement {
        if has_token(node, "{") {
            return self.read_block(node);
        }
        let mut cursor = node.walk();
        let inner = node
            .named_children(&mut cursor)
            .find(|c| !is_comment(c.kind()));
        match inner {
            Some(inner) if inner.kind() == "block" => self.read_block(inner),
            Some(inner) => self.read_statement(inner),
            None => IrStatement::block(Vec::new()),
        }
    }

    /// Kotlin has expressions where Java has statements. The ones with a
    /// statement shape become statement nodes, other expressions are wrapped
    /// as expression statements and anything left keeps its Kotlin text.
    fn read_statement(&self, node: Node) -> IrStatement {
        let mut stmt = self
            .map_statement(node)
            .unwrap_or_else(|| IrStatement::unknown(LANGUAGE, self.node_text(node)));
        stmt.meta.location = Some(self.location(node));
        stmt
    }

    fn map_statement(&self, node: Node) -> Option<IrStatement> {
        match node.kind() {
            "property_declaration" => self.read_local_property(node),
            "block" => Some(self.read_block(node)),
            "assignment" => self.read_assignment(node).map(IrStatement::expr),
            "if_expression" => self.read_if(node),
            "while_statement" => {
                let condition = self.read_expr(first_operand(node)?);
                Some(IrStatement::while_loop(condition, self.loop_body(node)))
            }
            "do_while_statement" => {
                let condition = last_named_child(node)
                    .filter(|c| c.kind() != "control_structure_body")?;
                Some(IrStatement::new(IrStatementKind::DoWhile {
                    body: Box::new(self.loop_body(node)),
                    condition: self.read_expr(condition),
                }))
            }
            "for_statement" => self.read_for(node),
            "when_expression" => self.read_when(node),
            "jump_expression" => self.read_jump(node),
            "try_expression" => self.read_try(node),
            _ => {
                let expr = self.read_expr(node);
                (!expr.is_unknown()).then(|| IrStatement::expr(expr))
            }
        }
    }

    fn loop_body(&self, node: Node) -> IrStatement {
        child_of_kind(node, "control_structure_body")
            .map(|b| self.read_control_body(b))
            .unwrap_or_else(|| IrStatement::block(Vec::new()))
    }

    /// Local `val`/`var`. Delegated locals (`by lazy`) stay text.
    fn read_local_property(&self, node: Node) -> Option<IrStatement> {
        let field = self.read_property(node).ok().flatten()?;
        if field.meta.properties.get_str("delegate").is_some() {
            return None;
        }
        let inferred = field.meta.properties.flag("inferred_type");
        let mut stmt = IrStatement::var(field.name, field.ty, field.mutable, field.initializer);
        if inferred {
            stmt.meta.properties.insert("inferred_type", true);
        }
        Some(stmt)
    }

    /// `target = value` and the compound `+=` family.
    fn read_assignment(&self, node: Node) -> Option<IrExpression> {
        let target = child_of_kind(node, "directly_assignable_expression")?;
        let operator = {
            let mut cursor = node.walk();
            node.children(&mut cursor)
                .filter(|c| !c.is_named())
                .find_map(|c| IrAssignmentOperator::from_symbol(c.kind()))?
        };
        let value = last_named_child(node).filter(|v| v.id() != target.id())?;

        let mut cursor = target.walk();
        let parts: Vec<Node> = target
            .named_children(&mut cursor)
            .filter(|c| !is_comment(c.kind()))
            .collect();
        let target = match parts.as_slice() {
            [single] => self.read_expr(*single),
            [receiver, suffix] if suffix.kind() == "navigation_suffix" => {
                let name = self.plain_suffix(*suffix)?;
                IrExpression::property(Some(self.read_expr(*receiver)), name)
            }
            _ => return None,
        };
        if target.is_unknown() {
            return None;
        }
        Some(IrExpression::assign(target, operator, self.read_expr(value)))
    }

    fn read_if(&self, node: Node) -> Option<IrStatement> {
        let condition = self.read_expr(first_operand(node)?);
        let mut then_branch = None;
        let mut else_branch = None;
        let mut after_else = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "else" => after_else = true,
                "control_structure_body" if after_else => {
                    else_branch = Some(self.read_control_body(child));
                }
                "control_structure_body" => then_branch = Some(self.read_control_body(child)),
                _ => {}
            }
        }
        Some(IrStatement::if_stmt(
            condition,
            then_branch.unwrap_or_else(|| IrStatement::block(Vec::new())),
            else_branch,
        ))
    }

    /// `for (x in items)`; destructuring loops have no IR form.
    fn read_for(&self, node: Node) -> Option<IrStatement> {
        let variable = child_of_kind(node, "variable_declaration")?;
        let name = decl_name(variable, self.source)?;
        let iterable = value_after(node, "in")?;
        Some(IrStatement::new(IrStatementKind::ForEach {
            variable: name.to_string(),
            variable_type: type_child(variable).map(|t| self.read_type(t)),
            iterable: self.read_expr(iterable),
            body: Box::new(self.loop_body(node)),
        }))
    }

    /// `when (x) { a, b -> ...; else -> ... }`. A `when` without a subject,
    /// with a bound subject or with `in`/`is` conditions has no switch form.
    fn read_when(&self, node: Node) -> Option<IrStatement> {
        let subject = child_of_kind(node, "when_subject")?;
        if child_of_kind(subject, "variable_declaration").is_some() {
            return None;
        }
        let expression = self.read_expr(first_operand(subject)?);

        let mut cases = Vec::new();
        let mut cursor = node.walk();
        for entry in node.named_children(&mut cursor) {
            if entry.kind() != "when_entry" {
                continue;
            }
            let mut matches = Vec::new();
            let mut inner = entry.walk();
            for condition in entry.named_children(&mut inner) {
                if condition.kind() != "when_condition" {
                    continue;
                }
                let value = first_operand(condition)
                    .filter(|v| !matches!(v.kind(), "range_test" | "type_test"))?;
                matches.push(self.read_expr(value));
            }
            if matches.is_empty() && !has_token(entry, "else") {
                return None;
            }
            cases.push(IrSwitchCase {
                matches,
                body: child_of_kind(entry, "control_structure_body")
                    .map(|b| self.read_control_body(b)),
                meta: IrMeta::default().with_location(self.location(entry)),
            });
        }
        Some(IrStatement::new(IrStatementKind::Switch { expression, cases }))
    }

    /// `return`, `throw`, `break` and `continue`. Labelled jumps
    /// (`return@forEach`) stay text.
    fn read_jump(&self, node: Node) -> Option<IrStatement> {
        let keyword = node.child(0)?.kind();
        let value = first_operand(node).map(|v| self.read_expr(v));
        match keyword {
            "return" => Some(IrStatement::return_stmt(value)),
            "throw" => value.map(IrStatement::throw),
            "break" => Some(IrStatement::break_stmt()),
            "continue" => Some(IrStatement::continue_stmt()),
            _ => None,
        }
    }

    fn read_try(&self, node: Node) -> Option<IrStatement> {
        let mut catch_clauses = Vec::new();
        let mut finally_block = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "catch_block" => {
                    let ty = type_child(child)?;
                    catch_clauses.push(IrCatchClause {
                        exception_types: vec![self.read_type(ty)],
                        name: child_of_kind(child, "simple_identifier")
                            .map(|n| self.node_text(n).to_string()),
                        body: Some(self.read_block(child)),
                        meta: IrMeta::default().with_location(self.location(child)),
                    });
                }
                "finally_block" => finally_block = Some(Box::new(self.read_block(child))),
                _ => {}
            }
        }
        Some(IrStatement::new(IrStatementKind::TryCatch {
            try_block: Box::new(self.read_block(node)),
            catch_clauses,
            finally_block,
        }))
    }

    // ----------------------------------------------------------------------
    // Types
    // ----------------------------------------------------------------------

    /// Dotted name and the type arguments of the last segment.
    fn read_user_type(&self, node: Node) -> (String, Vec<IrType>) {
        let mut segments = Vec::new();
        let mut arguments = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_identifier" | "simple_identifier" => {
                    segments.push(self.node_text(child));
                }
                "type_arguments" => arguments = self.read_type_arguments(child),
                _ => {}
            }
        }
        (segments.join("."), arguments)
    }

    fn read_type_arguments(&self, node: Node) -> Vec<IrType> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() == "type_projection")
            .map(|projection| {
                let Some(inner) = type_child(projection) else {
                    // `*`
                    return IrType::generic(self.node_text(projection).trim())
                        .with_nullable(false);
                };
                let mut ty = self.read_type(inner);
                if let Some(variance) = child_of_kind(projection, "type_projection_modifiers") {
                    ty.meta
                        .properties
                        .insert("variance", self.node_text(variance).trim());
                }
                ty
            })
            .collect()
    }

    pub(crate) fn read_type(&self, node: Node) -> IrType {
        match node.kind() {
            "user_type" => {
                let (name, arguments) = self.read_user_type(node);
                self.named_type(name, arguments)
            }
            "nullable_type" => {
                let inner = {
                    let mut cursor = node.walk();
                    node.named_children(&mut cursor)
                        .find(|c| is_type_node(c.kind()))
                };
                match inner {
                    Some(inner) => self.read_type(inner).with_nullable(true),
                    None => IrType::reference(self.node_text(node).trim_end_matches('?')),
                }
            }
            "parenthesized_type" => type_child(node)
                .map(|t| self.read_type(t))
                .unwrap_or_else(|| IrType::reference("Any").with_nullable(false)),
            "not_nullable_type" | "non_nullable_type" => type_child(node)
                .map(|t| self.read_type(t).with_nullable(false))
                .unwrap_or_else(|| IrType::reference("Any").with_nullable(false)),
            "function_type" => {
                let mut parameters = Vec::new();
                if let Some(params) = child_of_kind(node, "function_type_parameters") {
                    let mut cursor = params.walk();
                    for param in params.named_children(&mut cursor) {
                        if param.kind() == "parameter" {
                            if let Some(ty) = type_child(param) {
                                parameters.push(self.read_type(ty));
                            }
                        } else if is_type_node(param.kind()) {
                            parameters.push(self.read_type(param));
                        }
                    }
                }
                let returns = last_named_child(node)
                    .filter(|n| is_type_node(n.kind()))
                    .map(|t| self.read_type(t))
                    .unwrap_or_else(IrType::void);
                let mut ty = IrType::function(parameters, returns).with_nullable(false);
                if let Some(receiver) = child_of_kind(node, "receiver_type") {
                    ty.meta
                        .properties
                        .insert("receiver", self.node_text(receiver));
                }
                ty
            }
            _ => IrType::reference(self.node_text(node)).with_nullable(false),
        }
    }

    /// Kotlin built-ins map to primitives and arrays; everything else is a
    /// non-null reference, or a generic when a type parameter is in scope.
    fn named_type(&self, name: String, mut arguments: Vec<IrType>) -> IrType {
        if arguments.is_empty() && self.is_generic(&name) {
            return IrType::generic(name).with_nullable(false);
        }
        if let Some(primitive) = kotlin_primitive(&name) {
            return IrType::primitive(primitive);
        }
        if let Some(element) = name.strip_suffix("Array").and_then(kotlin_primitive) {
            return IrType::array(IrType::primitive(element)).with_nullable(false);
        }
        if name == "Array" && arguments.len() == 1 {
            if let Some(element) = arguments.pop() {
                return IrType::array(element).with_nullable(false);
            }
        }
        IrType::reference_with(name, arguments).with_nullable(false)
    }

    // ----------------------------------------------------------------------
    // Expressions
    // ----------------------------------------------------------------------

    fn unknown(&self, node: Node) -> IrExpression {
        IrExpression::unknown(LANGUAGE, self.node_text(node))
    }

    fn read_arguments(&self, node: Node) -> Vec<IrExpression> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() == "value_argument")
            .map(|arg| {
                // Named and spread arguments have no IR counterpart.
                if has_token(arg, "=") || has_token(arg, "*") {
                    return self.unknown(arg);
                }
                match last_named_child(arg) {
                    Some(value) => self.read_expr(value),
                    None => self.unknown(arg),
                }
            })
            .collect()
    }

    fn operator_token(&self, node: Node) -> Option<&'a str> {
        let mut cursor = node.walk();
        let token = node
            .children(&mut cursor)
            .find(|c| !c.is_named())
            .map(|c| self.node_text(c));
        token
    }

    pub(crate) fn read_expr(&self, node: Node) -> IrExpression {
        let operands = || -> Vec<Node> {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .filter(|c| !is_comment(c.kind()))
                .collect()
        };

        match node.kind() {
            "integer_literal" | "long_literal" | "hex_literal" | "bin_literal" | "real_literal"
            | "unsigned_literal" | "boolean_literal" | "character_literal" | "null"
            | "null_literal" => IrExpression::literal(self.node_text(node)),

            "string_literal" => {
                let interpolated = {
                    let mut cursor = node.walk();
                    node.named_children(&mut cursor).any(|c| {
                        matches!(c.kind(), "interpolated_expression" | "interpolated_identifier")
                    })
                };
                if interpolated {
                    self.unknown(node)
                } else {
                    IrExpression::literal(self.node_text(node))
                }
            }

            "simple_identifier" => IrExpression::ident(self.node_text(node)),

            "this_expression" | "super_expression" => match self.node_text(node) {
                t @ ("this" | "super") => IrExpression::ident(t),
                _ => self.unknown(node),
            },

            "parenthesized_expression" => match operands().first() {
                Some(inner) => IrExpression::parenthesized(self.read_expr(*inner)),
                None => self.unknown(node),
            },

            // a.b
            "navigation_expression" => match operands().as_slice() {
                [receiver, suffix] if suffix.kind() == "navigation_suffix" => {
                    match self.plain_suffix(*suffix) {
                        Some(name) => IrExpression::property(Some(self.read_expr(*receiver)), name),
                        None => self.unknown(node),
                    }
                }
                _ => self.unknown(node),
            },

            // f(args) / a.f(args)
            "call_expression" => {
                let parts = operands();
                let [callee, suffix] = parts.as_slice() else {
                    return self.unknown(node);
                };
                let simple_suffix = suffix.kind() == "call_suffix"
                    && child_of_kind(*suffix, "annotated_lambda").is_none()
                    && child_of_kind(*suffix, "type_arguments").is_none();
                let Some(args) = child_of_kind(*suffix, "value_arguments").filter(|_| simple_suffix)
                else {
                    return self.unknown(node);
                };
                let arguments = self.read_arguments(args);
                match callee.kind() {
                    "simple_identifier" => {
                        IrExpression::call(None, self.node_text(*callee), arguments)
                    }
                    "navigation_expression" => {
                        let nav = {
                            let mut cursor = callee.walk();
                            callee
                                .named_children(&mut cursor)
                                .filter(|c| !is_comment(c.kind()))
                                .collect::<Vec<_>>()
                        };
                        match nav.as_slice() {
                            [receiver, suffix] => match self.plain_suffix(*suffix) {
                                Some(name) => IrExpression::call(
                                    Some(self.read_expr(*receiver)),
                                    name,
                                    arguments,
                                ),
                                None => self.unknown(node),
                            },
                            _ => self.unknown(node),
                        }
                    }
                    _ => self.unknown(node),
                }
            }

            "additive_expression" | "multiplicative_expression" | "comparison_expression"
            | "equality_expression" | "conjunction_expression" | "disjunction_expression" => {
                let operator = self
                    .operator_token(node)
                    .and_then(IrBinaryOperator::from_symbol);
                match (operands().as_slice(), operator) {
                    ([left, right], Some(operator)) => IrExpression::binary(
                        self.read_expr(*left),
                        operator,
                        self.read_expr(*right),
                    ),
                    _ => self.unknown(node),
                }
            }

            "prefix_expression" | "postfix_expression" => {
                let prefix = node.kind() == "prefix_expression";
                let operator = self
                    .operator_token(node)
                    .and_then(IrUnaryOperator::from_symbol);
                match (operands().as_slice(), operator) {
                    ([operand], Some(operator)) => {
                        IrExpression::unary(operator, self.read_expr(*operand), prefix)
                    }
                    _ => self.unknown(node),
                }
            }

            // `as?` is a safe cast with no IR counterpart.
            "as_expression" if !has_token(node, "as?") => {
                match (operands().first(), type_child(node)) {
                    (Some(expr), Some(ty)) => {
                        IrExpression::cast(self.read_expr(*expr), self.read_type(ty))
                    }
                    _ => self.unknown(node),
                }
            }

            "check_expression" if has_token(node, "is") => {
                match (operands().first(), type_child(node)) {
                    (Some(expr), Some(ty)) => {
                        IrExpression::type_check(self.read_expr(*expr), self.read_type(ty))
                    }
                    _ => self.unknown(node),
                }
            }

            _ => self.unknown(node),
        }
    }

    /// Member name of a `.name` suffix; safe calls and references are `None`.
    fn plain_suffix(&self, suffix: Node) -> Option<&'a str> {
        let mut cursor = suffix.walk();
        let children: Vec<Node> = suffix.children(&mut cursor).collect();
        match children.as_slice() {
            [dot, name] if dot.kind() == "." && name.kind() == "simple_identifier" => {
                Some(self.node_text(*name))
            }
            _ => None,
        }
    }
}

fn last_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).filter(|c| is_value(*c)).last()
}

fn kotlin_primitive(name: &str) -> Option<IrPrimitive> {
    Some(match name {
        "Unit" => IrPrimitive::Void,
        "Boolean" => IrPrimitive::Boolean,
        "Byte" => IrPrimitive::Byte,
        "Short" => IrPrimitive::Short,
        "Int" => IrPrimitive::Int,
        "Long" => IrPrimitive::Long,
        "Char" => IrPrimitive::Char,
        "Float" => IrPrimitive::Float,
        "Double" => IrPrimitive::Double,
        _ => return None,
    })
}

/// Type of a property declared without one, when its initializer is a literal.
fn literal_type(value: Node) -> Option<IrType> {
    let primitive = match value.kind() {
        "integer_literal" | "hex_literal" | "bin_literal" => IrPrimitive::Int,
        "long_literal" => IrPrimitive::Long,
        "boolean_literal" => IrPrimitive::Boolean,
        "character_literal" => IrPrimitive::Char,
        "real_literal" => IrPrimitive::Double,
        "string_literal" => return Some(IrType::reference("String").with_nullable(false)),
        _ => return None,
    };
    Some(IrType::primitive(primitive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(source: &str) -> IrFile {
        read_kotlin(source, Path::new("com/example/Model.kt")).unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = read(
            "package com.example\n\nimport kotlin.collections.List\nimport java.util.*\nimport a.b.Thing as Other\n\nclass Model\n",
        );
        assert_eq!(file.name, "Model.kt");
        assert_eq!(file.properties.get_str(JVM_PACKAGE), Some("com.example"));
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.imports[0].path, "kotlin.collections.List");
        assert!(file.imports[1].wildcard);
        assert_eq!(file.imports[1].path, "java.util");
        assert_eq!(file.imports[2].meta.properties.get_str("alias"), Some("Other"));
    }

    #[test]
    fn test_data_class_with_primary_constructor() {
        let file = read(
            "package com.example

import com.example.base.Entity

data class User(
    val id: Long,
    var name: String?,
    private val tags: List<String> = emptyList(),
    age: Int
) : Entity(id), Comparable<User> {
    override fun compareTo(other: User): Int = id.compareTo(other.id)
}
",
        );
        let user = file.class("User").unwrap();
        assert_eq!(user.qualified_name, "com.example.User");
        assert_eq!(user.kind, IrClassKind::Class);
        assert!(user.meta.properties.flag("data"));

        let names: Vec<&str> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "tags"]);
        assert!(!user.fields[0].mutable);
        assert!(user.fields[1].mutable);
        assert!(user.fields[1].ty.nullable);
        assert_eq!(user.fields[2].visibility, IrVisibility::Private);
        assert!(user.fields[0].meta.properties.flag("constructor_property"));

        let ctor = user.constructors().next().unwrap();
        assert!(ctor.meta.properties.flag("primary"));
        assert_eq!(ctor.parameters.len(), 4);
        assert!(ctor.parameters[2].default_value.is_some());
        // One `this.x = x` per property parameter.
        assert_eq!(ctor.body.as_ref().map(Vec::len), Some(3));

        assert_eq!(user.super_classes.len(), 2);
        assert_eq!(user.super_classes[0].name, "com.example.base.Entity");
        assert_eq!(user.super_classes[0].kind, IrClassKind::Class);
        assert_eq!(
            user.super_classes[0].meta.properties.get_str("arguments"),
            Some("(id)")
        );
        assert_eq!(user.super_classes[1].name, "Comparable");
        assert_eq!(user.super_classes[1].kind, IrClassKind::Interface);
        assert_eq!(user.super_classes[1].type_arguments.len(), 1);

        let compare = user.methods().next().unwrap();
        assert!(compare.is_override);
        assert!(compare.meta.properties.flag("expression_body"));
        assert_eq!(compare.return_type, IrType::primitive(IrPrimitive::Int));
    }

    #[test]
    fn test_interface_object_and_companion() {
        let file = read(
            "package com.example

interface Repository<T : Any> {
    val size: Int
    fun find(id: Long): T?
    fun count(): Int {
        return size
    }
}

object Registry {
    const val LIMIT = 10
}

class Holder {
    companion object {
        fun create(): Holder = Holder()
    }
}
",
        );
        let repo = file.class("Repository").unwrap();
        assert_eq!(repo.kind, IrClassKind::Interface);
        assert_eq!(repo.type_parameters[0].name, "T");
        assert_eq!(repo.type_parameters[0].bounds.len(), 1);
        let find = repo.methods().find(|m| m.name == "find").unwrap();
        assert!(find.is_abstract);
        assert!(find.body.is_none());
        assert_eq!(find.return_type, IrType::generic("T").with_nullable(true));
        let count = repo.methods().find(|m| m.name == "count").unwrap();
        assert!(!count.is_abstract);
        let body = count.body.as_ref().unwrap();
        assert_eq!(body.len(), 1);
        assert!(body[0].is_unknown());

        let registry = file.class("Registry").unwrap();
        assert!(ext::is_object(&registry.kind));
        let limit = registry.field("LIMIT").unwrap();
        assert!(limit.meta.properties.flag("const"));
        assert!(limit.meta.properties.flag("inferred_type"));
        assert_eq!(limit.ty, IrType::primitive(IrPrimitive::Int));

        let holder = file.class("Holder").unwrap();
        let companion = holder.nested("Companion").unwrap();
        assert!(ext::is_object(&companion.kind));
        assert!(companion.meta.properties.flag("companion"));
        assert_eq!(companion.qualified_name, "com.example.Holder.Companion");
    }

    #[test]
    fn test_enum_entries() {
        let file = read(
            "enum class Color(val rgb: Int) {
    RED(0xFF0000),
    GREEN(0x00FF00);

    fun hex(): String = rgb.toString(16)
}
",
        );
        let color = file.class("Color").unwrap();
        assert_eq!(color.kind, IrClassKind::Enum);
        let red = color.field("RED").unwrap();
        assert!(red.meta.properties.flag("enum_constant"));
        match red.initializer.as_ref().and_then(IrStatement::as_expression) {
            Some(IrExpression {
                kind: IrExpressionKind::ObjectCreation { arguments, .. },
                ..
            }) => assert_eq!(arguments[0], IrExpression::literal("0xFF0000")),
            other => panic!("expected constructor arguments, got {other:?}"),
        }
        assert_eq!(file.properties.get_str(JVM_PACKAGE), Some(""));
    }

    #[test]
    fn test_types_and_parameters() {
        let file = read(
            "class Api {
    fun send(vararg ids: Long, callback: (String) -> Unit, extra: Map<String, List<Int>>? = null) {}
    val counts: IntArray = intArrayOf()
}
",
        );
        let api = file.class("Api").unwrap();
        let send = api.methods().next().unwrap();
        assert!(send.return_type.is_void());
        assert_eq!(send.parameters.len(), 3);
        assert!(send.parameters[0].meta.properties.flag("varargs"));
        assert_eq!(
            send.parameters[0].ty,
            IrType::array(IrType::primitive(IrPrimitive::Long)).with_nullable(false)
        );
        assert_eq!(
            send.parameters[1].ty,
            IrType::function(
                vec![IrType::reference("String").with_nullable(false)],
                IrType::void()
            )
            .with_nullable(false)
        );
        assert!(send.parameters[2].ty.nullable);
        assert_eq!(
            send.parameters[2].default_value,
            Some(IrExpression::literal("null"))
        );
        assert_eq!(
            api.field("counts").unwrap().ty,
            IrType::array(IrType::primitive(IrPrimitive::Int)).with_nullable(false)
        );
    }

    #[test]
    fn test_expressions_and_secondary_constructor() {
        let file = read(
            "open class Box(val size: Int) {
    @Deprecated(message = \"old\")
    protected open var label: String = \"box\" + size
    constructor(text: String) : this(text.length) {
        println(text)
    }
    init {
        require(size >= 0)
    }
}
",
        );
        let class = file.class("Box").unwrap();
        assert!(class.meta.properties.flag("open"));

        let label = class.field("label").unwrap();
        assert_eq!(label.visibility, IrVisibility::Protected);
        assert!(label.meta.properties.flag("open"));
        assert_eq!(label.meta.annotations[0].name, "Deprecated");
        assert_eq!(label.meta.annotations[0].parameters[0].name, "message");
        match label.initializer.as_ref().and_then(IrStatement::as_expression) {
            Some(IrExpression {
                kind: IrExpressionKind::Binary { operator, .. },
                ..
            }) => assert_eq!(*operator, IrBinaryOperator::Plus),
            other => panic!("expected binary initializer, got {other:?}"),
        }

        let secondary = class
            .constructors()
            .find(|c| !c.meta.properties.flag("primary"))
            .unwrap();
        match &secondary.kind {
            IrCallableKind::Constructor {
                delegate:
                    Some(IrExpression {
                        kind: IrExpressionKind::MethodCall { call_kind, arguments, .. },
                        ..
                    }),
            } => {
                assert_eq!(*call_kind, IrCallKind::This);
                assert_eq!(
                    arguments[0],
                    IrExpression::property(Some(IrExpression::ident("text")), "length")
                );
            }
            other => panic!("expected this(...) delegation, got {other:?}"),
        }
        let secondary_body = secondary.body.as_ref().unwrap();
        assert_eq!(secondary_body.len(), 1);
        assert_eq!(
            secondary_body[0].as_expression(),
            Some(&IrExpression::call(
                None,
                "println",
                vec![IrExpression::ident("text")]
            ))
        );
        assert_eq!(class.initializers.len(), 1);
        let location = class.initializers[0].body.as_ref().unwrap()[0]
            .meta
            .location
            .clone()
            .unwrap();
        assert_eq!(location.line, 8);
    }

    #[test]
    fn test_if_and_return_in_function_body() {
        let file = read("class A { fun f(x: Int): Int { if (x > 0) { return 1 }; return 0 } }");
        let f = file.class("A").unwrap().methods().next().unwrap();
        let body = f.body.as_ref().unwrap();
        assert_eq!(body.len(), 2);

        match &body[0].kind {
            IrStatementKind::If {
                condition,
                then_branch,
                else_branch: None,
            } => {
                assert_eq!(
                    *condition,
                    IrExpression::binary(
                        IrExpression::ident("x"),
                        IrBinaryOperator::Greater,
                        IrExpression::literal("0")
                    )
                );
                match &then_branch.kind {
                    IrStatementKind::Block { statements } => {
                        assert_eq!(statements.len(), 1);
                        assert_eq!(
                            statements[0].kind,
                            IrStatementKind::Return {
                                expression: Some(IrExpression::literal("1"))
                            }
                        );
                    }
                    other => panic!("expected block, got {other:?}"),
                }
            }
            other => panic!("expected if, got {other:?}"),
        }
        assert_eq!(
            body[1].kind,
            IrStatementKind::Return {
                expression: Some(IrExpression::literal("0"))
            }
        );
        assert_eq!(body[1].meta.location.as_ref().unwrap().line, 1);
    }

    #[test]
    fn test_locals_loops_when_and_try() {
        let file = read(
            "class B {
    fun g(items: List<String>, n: Int) {
        var total = 0
        val limit: Int = n * 2
        for (item in items) {
            total += item.length
        }
        while (total > limit) total -= 1
        when (n) {
            1, 2 -> println(\"small\")
            else -> {
                throw IllegalStateException(\"big\")
            }
        }
        try {
            check(total >= 0)
        } catch (e: IllegalArgumentException) {
            return
        } finally {
            println(total)
        }
        items.forEach { return@forEach }
    }
}
",
        );
        let g = file.class("B").unwrap().methods().next().unwrap();
        let body = g.body.as_ref().unwrap();
        assert_eq!(body.len(), 7);

        match &body[0].kind {
            IrStatementKind::VariableDeclaration { name, mutable, .. } => {
                assert_eq!(name, "total");
                assert!(*mutable);
            }
            other => panic!("expected local var, got {other:?}"),
        }
        assert!(body[0].meta.properties.flag("inferred_type"));
        match &body[1].kind {
            IrStatementKind::VariableDeclaration {
                name,
                ty,
                mutable,
                initializer,
                ..
            } => {
                assert_eq!(name, "limit");
                assert_eq!(*ty, IrType::primitive(IrPrimitive::Int));
                assert!(!*mutable);
                assert!(initializer.is_some());
            }
            other => panic!("expected local val, got {other:?}"),
        }
        assert!(!body[1].meta.properties.flag("inferred_type"));

        let total_minus_one = IrExpression::assign(
            IrExpression::ident("total"),
            IrAssignmentOperator::MinusAssign,
            IrExpression::literal("1"),
        );
        match &body[2].kind {
            IrStatementKind::ForEach {
                variable,
                iterable,
                body: loop_body,
                ..
            } => {
                assert_eq!(variable, "item");
                assert_eq!(*iterable, IrExpression::ident("items"));
                let IrStatementKind::Block { statements } = &loop_body.kind else {
                    panic!("expected block, got {loop_body:?}");
                };
                assert_eq!(
                    statements[0].as_expression(),
                    Some(&IrExpression::assign(
                        IrExpression::ident("total"),
                        IrAssignmentOperator::PlusAssign,
                        IrExpression::property(Some(IrExpression::ident("item")), "length"),
                    ))
                );
            }
            other => panic!("expected for-each, got {other:?}"),
        }
        match &body[3].kind {
            IrStatementKind::While { body: loop_body, .. } => {
                assert_eq!(loop_body.as_expression(), Some(&total_minus_one));
            }
            other => panic!("expected while, got {other:?}"),
        }
        match &body[4].kind {
            IrStatementKind::Switch { expression, cases } => {
                assert_eq!(*expression, IrExpression::ident("n"));
                assert_eq!(cases.len(), 2);
                assert_eq!(
                    cases[0].matches,
                    vec![IrExpression::literal("1"), IrExpression::literal("2")]
                );
                assert!(cases[1].matches.is_empty());
                let Some(IrStatement {
                    kind: IrStatementKind::Block { statements },
                    ..
                }) = &cases[1].body
                else {
                    panic!("expected else block, got {:?}", cases[1].body);
                };
                assert!(matches!(statements[0].kind, IrStatementKind::Throw { .. }));
            }
            other => panic!("expected when, got {other:?}"),
        }
        match &body[5].kind {
            IrStatementKind::TryCatch {
                catch_clauses,
                finally_block,
                ..
            } => {
                assert_eq!(catch_clauses.len(), 1);
                assert_eq!(catch_clauses[0].name.as_deref(), Some("e"));
                let Some(IrStatement {
                    kind: IrStatementKind::Block { statements },
                    ..
                }) = &catch_clauses[0].body
                else {
                    panic!("expected catch block");
                };
                assert_eq!(statements[0].kind, IrStatementKind::Return { expression: None });
                assert!(finally_block.is_some());
            }
            other => panic!("expected try, got {other:?}"),
        }
        match &body[6].kind {
            IrStatementKind::Unknown { fallback } => {
                assert_eq!(
                    fallback_for(fallback, "kotlin"),
                    Some("items.forEach { return@forEach }")
                );
            }
            other => panic!("expected kotlin text, got {other:?}"),
        }
    }
}
