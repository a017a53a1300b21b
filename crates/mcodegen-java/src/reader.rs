//! Tree-sitter based Java reader.
//!
//! Declarations map onto IR nodes one to one. Method bodies are mapped
//! statement by statement; a construct with no IR counterpart becomes an
//! `Unknown` node carrying its Java text, so the rest of the body survives.

use crate::ext::{self, LANGUAGE};
use crate::index::{ClassIndex, TypeResolver};
use mcodegen_core::{Error, Result};
use mcodegen_ir::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Annotations that make a reference type non-null.
const NON_NULL: &[&str] = &["NonNull", "NotNull", "Nonnull"];

/// Parse Java source into a syntax tree.
pub(crate) fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_java::language().into())
        .map_err(|err| Error::Config(format!("java grammar: {err}")))?;
    parser
        .parse(source, None)
        .ok_or_else(|| Error::Config("java parser produced no tree".into()))
}

/// Everything the reader needs besides the text.
pub(crate) struct ReadInput<'a> {
    pub source: &'a str,
    /// Source path relative to the sources directory.
    pub source_path: &'a Path,
    pub sources_dir: &'a Path,
    pub index: &'a RefCell<ClassIndex>,
}

/// Parse one compilation unit into an [`IrFile`].
pub(crate) fn read_java(input: ReadInput<'_>) -> Result<IrFile> {
    let tree = parse_tree(input.source)?;
    let root = tree.root_node();
    if root.has_error() {
        tracing::debug!(path = %input.source_path.display(), "java source has syntax errors");
    }

    let file_name = input
        .source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let package = read_package(root, input.source);
    let imports = read_imports(root, input.source);

    let mut local = HashMap::new();
    collect_declared(root, input.source, &package, &mut local);
    let resolver = TypeResolver::new(
        input.index,
        input.sources_dir,
        &package,
        &imports,
        local,
    );

    let ctx = ReadContext {
        source: input.source,
        path: input.source_path,
        package: &package,
        resolver,
        generics: RefCell::new(Vec::new()),
    };

    let mut file = IrFileBuilder::new(file_name);
    if !package.is_empty() {
        file = file.property(crate::module::JVM_PACKAGE, package.clone());
    }
    for import in &imports {
        file.push_import(import.clone());
    }

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if is_type_declaration(child.kind()) {
            file.push_declaration(ctx.read_class(child, None)?);
        }
    }
    Ok(file.build())
}

fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "annotation_type_declaration"
            | "record_declaration"
    )
}

fn text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn read_package(root: Node, source: &str) -> String {
    let mut cursor = root.walk();
    let Some(decl) = root
        .named_children(&mut cursor)
        .find(|c| c.kind() == "package_declaration")
    else {
        return String::new();
    };
    let mut inner = decl.walk();
    decl.named_children(&mut inner)
        .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
        .map(|n| text(n, source).to_string())
        .unwrap_or_default()
}

fn read_imports(root: Node, source: &str) -> Vec<IrImport> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for decl in root.children(&mut cursor) {
        if decl.kind() != "import_declaration" {
            continue;
        }
        let mut inner = decl.walk();
        let mut path = None;
        let mut is_static = false;
        let mut wildcard = false;
        for part in decl.children(&mut inner) {
            match part.kind() {
                "static" => is_static = true,
                "asterisk" => wildcard = true,
                "identifier" | "scoped_identifier" => path = Some(text(part, source)),
                _ => {}
            }
        }
        let Some(path) = path else { continue };
        let mut import = if wildcard {
            IrImport::wildcard(path)
        } else {
            IrImport::new(path)
        };
        if is_static {
            import.meta.properties.insert("static", true);
        }
        imports.push(import);
    }
    imports
}

/// Records every type declared in the unit under its qualified name.
fn collect_declared(node: Node, source: &str, prefix: &str, out: &mut HashMap<String, String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if is_type_declaration(child.kind()) {
            let Some(name) = child.child_by_field_name("name") else {
                continue;
            };
            let name = text(name, source);
            let qualified = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}.{name}")
            };
            out.entry(name.to_string()).or_insert_with(|| qualified.clone());
            if let Some(body) = child.child_by_field_name("body") {
                collect_declared(body, source, &qualified, out);
            }
        } else if child.kind() == "enum_body_declarations" {
            collect_declared(child, source, prefix, out);
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

    fn visibility(&self, implicit_public: bool) -> IrVisibility {
        if self.has("public") {
            IrVisibility::Public
        } else if self.has("protected") {
            IrVisibility::Protected
        } else if self.has("private") {
            IrVisibility::Private
        } else if implicit_public {
            IrVisibility::Public
        } else {
            ext::package_private()
        }
    }

    fn non_null(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| NON_NULL.contains(&a.name.rsplit('.').next().unwrap_or(&a.name)))
    }

    /// `abstract`/`final`/`static` as boolean properties, plus annotations.
    fn meta(&self, location: IrLocation) -> IrMeta {
        let mut meta = IrMeta::default().with_location(location);
        for keyword in ["abstract", "final", "static", "default"] {
            if self.has(keyword) {
                meta.properties.insert(keyword, true);
            }
        }
        meta.annotations = self.annotations.clone();
        meta
    }
}

struct ReadContext<'a> {
    source: &'a str,
    path: &'a Path,
    package: &'a str,
    resolver: TypeResolver<'a>,
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

    fn named_child_of_kind<'t>(&self, node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).find(|c| c.kind() == kind)
    }

    fn first_named_child<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .find(|c| !matches!(c.kind(), "line_comment" | "block_comment"))
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

    // ----------------------------------------------------------------------
    // Declarations
    // ----------------------------------------------------------------------

    fn read_modifiers(&self, node: Node) -> Modifiers {
        let mut modifiers = Modifiers::default();
        let Some(mods) = self.named_child_of_kind(node, "modifiers") else {
            return modifiers;
        };
        let mut cursor = mods.walk();
        for child in mods.children(&mut cursor) {
            match child.kind() {
                "marker_annotation" | "annotation" => {
                    modifiers.annotations.push(self.read_annotation(child));
                }
                _ => modifiers.keywords.push(self.node_text(child).to_string()),
            }
        }
        modifiers
    }

    fn read_annotation(&self, node: Node) -> IrAnnotation {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or_default();
        let mut annotation = IrAnnotation::new(name);
        let Some(args) = node.child_by_field_name("arguments") else {
            return annotation;
        };
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            if arg.kind() == "element_value_pair" {
                let key = arg
                    .child_by_field_name("key")
                    .map(|k| self.node_text(k))
                    .unwrap_or("value");
                if let Some(value) = arg.child_by_field_name("value") {
                    annotation = annotation.with_parameter(key, self.read_expr(value));
                }
            } else if !matches!(arg.kind(), "line_comment" | "block_comment") {
                annotation = annotation.with_parameter("value", self.read_expr(arg));
            }
        }
        annotation
    }

    fn read_type_parameters(&self, node: Node) -> Vec<IrTypeParameter> {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "type_parameter" {
                continue;
            }
            let Some(name) = self.named_child_of_kind(param, "type_identifier") else {
                continue;
            };
            let mut tp = IrTypeParameter::new(self.node_text(name));
            if let Some(bound) = self.named_child_of_kind(param, "type_bound") {
                let mut inner = bound.walk();
                for ty in bound.named_children(&mut inner) {
                    tp = tp.with_bound(self.read_type(ty));
                }
            }
            out.push(tp);
        }
        out
    }

    fn read_class(&self, node: Node, outer: Option<&str>) -> Result<IrClass> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or_default();
        let qualified = match outer {
            Some(outer) => format!("{outer}.{name}"),
            None if self.package.is_empty() => name.to_string(),
            None => format!("{}.{name}", self.package),
        };

        let kind = match node.kind() {
            "interface_declaration" => IrClassKind::Interface,
            "enum_declaration" => IrClassKind::Enum,
            "annotation_type_declaration" => IrClassKind::Annotation,
            "record_declaration" => ext::record(),
            _ => IrClassKind::Class,
        };

        let modifiers = self.read_modifiers(node);
        // Members of interfaces and annotation types are public without a modifier.
        let nested_in_interface = node
            .parent()
            .is_some_and(|p| matches!(p.kind(), "interface_body" | "annotation_type_body"));
        let type_parameters = self.read_type_parameters(node);
        let generic_names: Vec<String> = type_parameters.iter().map(|t| t.name.clone()).collect();

        let mut builder = IrClassBuilder::qualified(qualified.clone(), name)
            .kind(kind.clone())
            .visibility(modifiers.visibility(nested_in_interface));
        builder = builder.location(self.location(node));
        for keyword in ["abstract", "final", "static"] {
            if modifiers.has(keyword) {
                builder = builder.property(keyword, true);
            }
        }
        for annotation in &modifiers.annotations {
            builder = builder.annotation(annotation.clone());
        }
        for tp in type_parameters {
            builder = builder.type_parameter(tp);
        }

        self.with_generics(&generic_names, || -> Result<()> {
            for super_class in self.read_super_types(node, name)? {
                builder.push_super_class(super_class);
            }

            if ext::is_record(&kind) {
                for field in self.read_record_components(node) {
                    builder.push_field(field?);
                }
            }

            if let Some(body) = node.child_by_field_name("body") {
                self.read_body(body, &kind, name, &qualified, &mut builder)?;
            }
            Ok(())
        })?;

        Ok(builder.build()?)
    }

    fn read_super_types(&self, node: Node, class_name: &str) -> Result<Vec<IrSuperClass>> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let (kind, list) = match child.kind() {
                "superclass" => (IrClassKind::Class, child),
                "super_interfaces" | "extends_interfaces" => {
                    match self.named_child_of_kind(child, "type_list") {
                        Some(list) => (IrClassKind::Interface, list),
                        None => continue,
                    }
                }
                _ => continue,
            };
            let mut inner = list.walk();
            for ty in list.named_children(&mut inner) {
                if matches!(ty.kind(), "line_comment" | "block_comment") {
                    continue;
                }
                out.push(self.read_super_type(ty, kind.clone(), class_name)?);
            }
        }
        Ok(out)
    }

    fn read_super_type(&self, ty: Node, kind: IrClassKind, class_name: &str) -> Result<IrSuperClass> {
        let (raw, arguments) = match ty.kind() {
            "generic_type" => {
                let base = self
                    .first_named_child(ty)
                    .map(|n| self.node_text(n))
                    .unwrap_or_default();
                (base, self.read_type_arguments(ty))
            }
            _ => (self.node_text(ty), Vec::new()),
        };
        let name = self
            .resolver
            .resolve(raw)
            .ok_or_else(|| Error::SemanticResolutionFailed {
                path: self.path.to_path_buf(),
                what: format!("super type `{raw}` of `{class_name}`"),
            })?;
        Ok(IrSuperClass::new(name, kind).with_type_arguments(arguments))
    }

    fn read_record_components(&self, node: Node) -> Vec<Result<IrField>> {
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter(|p| p.kind() == "formal_parameter")
            .map(|p| {
                let param = self.read_parameter(p);
                let mut field = IrFieldBuilder::new(param.name, param.ty)
                    .visibility(IrVisibility::Private)
                    .mutable(false)
                    .location(self.location(p));
                for annotation in param.meta.annotations {
                    field = field.annotation(annotation);
                }
                Ok(field.build()?)
            })
            .collect()
    }

    fn read_body(
        &self,
        body: Node,
        kind: &IrClassKind,
        class_name: &str,
        qualified: &str,
        builder: &mut IrClassBuilder,
    ) -> Result<()> {
        let in_interface = matches!(kind, IrClassKind::Interface | IrClassKind::Annotation);
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                // int a, b = 1;
                "field_declaration" | "constant_declaration" => {
                    for field in self.read_fields(member, in_interface)? {
                        builder.push_field(field);
                    }
                }

                "method_declaration" | "annotation_type_element_declaration" => {
                    builder.push_callable(self.read_method(member, in_interface)?);
                }

                "constructor_declaration" | "compact_constructor_declaration" => {
                    builder.push_callable(self.read_constructor(member)?);
                }

                k if is_type_declaration(k) => {
                    builder.push_nested_class(self.read_class(member, Some(qualified))?);
                }

                // static { ... }
                "static_initializer" => {
                    let block = self.named_child_of_kind(member, "block");
                    let stmts = block.map(|b| self.read_block_stmts(b));
                    let mut init = IrClassInitializer::new(IrInitializerKind::Static, stmts);
                    init.meta.location = Some(self.location(member));
                    builder.push_initializer(init);
                }

                // { ... } directly in a class body
                "block" => {
                    let mut init = IrClassInitializer::new(
                        IrInitializerKind::Instance,
                        Some(self.read_block_stmts(member)),
                    );
                    init.meta.location = Some(self.location(member));
                    builder.push_initializer(init);
                }

                "enum_constant" => {
                    builder.push_field(self.read_enum_constant(member, class_name)?);
                }

                "enum_body_declarations" => {
                    self.read_body(member, kind, class_name, qualified, builder)?;
                }

                "line_comment" | "block_comment" => {}

                other => {
                    tracing::debug!(kind = other, class = class_name, "skipping java member");
                }
            }
        }
        Ok(())
    }

    fn read_fields(&self, node: Node, in_interface: bool) -> Result<Vec<IrField>> {
        let modifiers = self.read_modifiers(node);
        let Some(ty_node) = node.child_by_field_name("type") else {
            return Ok(Vec::new());
        };
        let base_ty = self.read_type(ty_node);
        // Interface fields are implicitly public static final.
        let is_static = in_interface || modifiers.has("static");
        let is_final = in_interface || modifiers.has("final");

        let mut fields = Vec::new();
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let mut ty = self.with_dimensions(base_ty.clone(), declarator);
            if modifiers.non_null() {
                ty.nullable = false;
            }
            let mut meta = modifiers.meta(self.location(declarator));
            if is_static {
                meta.properties.insert("static", true);
            }
            if is_final {
                meta.properties.insert("final", true);
            }

            let mut field = IrFieldBuilder::new(self.node_text(name), ty)
                .visibility(modifiers.visibility(in_interface))
                .mutable(!is_final);
            if let Some(value) = declarator.child_by_field_name("value") {
                field = field.initializer(IrStatement::expr(self.read_expr(value)));
            }
            let mut field = field.build()?;
            field.meta = meta;
            fields.push(field);
        }
        Ok(fields)
    }

    fn read_enum_constant(&self, node: Node, enum_name: &str) -> Result<IrField> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or_default();
        let mut field = IrFieldBuilder::new(name, IrType::reference(enum_name).with_nullable(false))
            .visibility(IrVisibility::Public)
            .mutable(false)
            .location(self.location(node))
            .property("enum_constant", true);
        if let Some(args) = node.child_by_field_name("arguments") {
            field = field.initializer(IrStatement::expr(IrExpression::new_object(
                enum_name,
                self.read_arguments(args),
            )));
        }
        for annotation in self.read_modifiers(node).annotations {
            field = field.annotation(annotation);
        }
        Ok(field.build()?)
    }

    fn read_method(&self, node: Node, in_interface: bool) -> Result<IrCallable> {
        let modifiers = self.read_modifiers(node);
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or_default();
        let type_parameters = self.read_type_parameters(node);
        let generic_names: Vec<String> = type_parameters.iter().map(|t| t.name.clone()).collect();

        self.with_generics(&generic_names, || -> Result<IrCallable> {
            let mut return_type = node
                .child_by_field_name("type")
                .map(|t| self.read_type(t))
                .unwrap_or_else(IrType::void);
            if modifiers.non_null() {
                return_type.nullable = false;
            }
            let body = node
                .child_by_field_name("body")
                .map(|b| self.read_block_stmts(b));
            let is_abstract = modifiers.has("abstract")
                || (in_interface && body.is_none() && !modifiers.has("static"));

            let mut builder = IrCallableBuilder::method(name, return_type)
                .visibility(modifiers.visibility(in_interface))
                .is_abstract(is_abstract)
                .is_static(modifiers.has("static"))
                .is_override(modifiers.annotations.iter().any(|a| a.name == "Override"));
            for tp in type_parameters {
                builder = builder.type_parameter(tp);
            }
            for param in self.read_parameters(node) {
                builder = builder.parameter(param);
            }
            if let Some(body) = body {
                builder = builder.body(body);
            }

            let mut callable = builder.build()?;
            callable.meta = modifiers.meta(self.location(node));
            if let Some(default) = node.child_by_field_name("value") {
                callable
                    .meta
                    .properties
                    .insert("default_value", self.node_text(default));
            }
            Ok(callable)
        })
    }

    fn read_constructor(&self, node: Node) -> Result<IrCallable> {
        let modifiers = self.read_modifiers(node);
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or_default();

        let mut builder =
            IrCallableBuilder::constructor(name).visibility(modifiers.visibility(false));
        for tp in self.read_type_parameters(node) {
            builder = builder.type_parameter(tp);
        }
        for param in self.read_parameters(node) {
            builder = builder.parameter(param);
        }

        if let Some(body) = node.child_by_field_name("body") {
            let mut stmts = Vec::new();
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                match child.kind() {
                    "explicit_constructor_invocation" => {
                        builder = builder.delegate(self.read_delegation(child));
                    }
                    "line_comment" | "block_comment" => {}
                    _ => stmts.push(self.read_stmt(child)),
                }
            }
            builder = builder.body(stmts);
        }

        let mut callable = builder.build()?;
        callable.meta = modifiers.meta(self.location(node));
        if node.kind() == "compact_constructor_declaration" {
            callable.meta.properties.insert("compact", true);
        }
        Ok(callable)
    }

    /// `this(...)` or `super(...)` as the first constructor statement.
    fn read_delegation(&self, node: Node) -> IrExpression {
        let call_kind = match node.child_by_field_name("constructor").map(|c| c.kind()) {
            Some("this") => IrCallKind::This,
            Some("super") if node.child_by_field_name("object").is_none() => IrCallKind::Super,
            _ => return IrExpression::unknown(LANGUAGE, self.node_text(node)),
        };
        let args = node
            .child_by_field_name("arguments")
            .map(|a| self.read_arguments(a))
            .unwrap_or_default();
        IrExpression::delegation(call_kind, args)
            .with_meta(IrMeta::default().with_location(self.location(node)))
    }

    fn read_parameters(&self, node: Node) -> Vec<IrParameter> {
        let Some(params) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"))
            .map(|p| self.read_parameter(p))
            .collect()
    }

    fn read_parameter(&self, node: Node) -> IrParameter {
        let modifiers = self.read_modifiers(node);
        let ty_node = node
            .child_by_field_name("type")
            .or_else(|| {
                let mut cursor = node.walk();
                node.named_children(&mut cursor)
                    .find(|c| c.kind() != "modifiers" && c.kind() != "variable_declarator")
            });
        let mut ty = ty_node.map(|t| self.read_type(t)).unwrap_or_else(IrType::void);

        let (name, varargs) = if node.kind() == "spread_parameter" {
            ty = IrType::array(ty);
            let name = self
                .named_child_of_kind(node, "variable_declarator")
                .and_then(|d| d.child_by_field_name("name"))
                .map(|n| self.node_text(n))
                .unwrap_or_default();
            (name, true)
        } else {
            let name = node
                .child_by_field_name("name")
                .map(|n| self.node_text(n))
                .unwrap_or_default();
            ty = self.with_dimensions(ty, node);
            (name, false)
        };
        if modifiers.non_null() {
            ty.nullable = false;
        }

        let mut param = IrParameter::new(name, ty);
        param.meta = modifiers.meta(self.location(node));
        if varargs {
            param.meta.properties.insert("varargs", true);
        }
        param
    }

    // ----------------------------------------------------------------------
    // Types
    // ----------------------------------------------------------------------

    fn read_type(&self, node: Node) -> IrType {
        match node.kind() {
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                IrType::primitive(primitive(self.node_text(node)))
            }

            "type_identifier" => {
                let name = self.node_text(node);
                if self.is_generic(name) {
                    IrType::generic(name)
                } else {
                    IrType::reference(name)
                }
            }

            "scoped_type_identifier" => IrType::reference(self.node_text(node)),

            // List<String>
            "generic_type" => {
                let base = self
                    .first_named_child(node)
                    .map(|n| self.node_text(n))
                    .unwrap_or_default();
                IrType::reference_with(base, self.read_type_arguments(node))
            }

            // String[][]
            "array_type" => {
                let element = node
                    .child_by_field_name("element")
                    .map(|e| self.read_type(e))
                    .unwrap_or_else(|| IrType::reference("Object"));
                let depth = node
                    .child_by_field_name("dimensions")
                    .map(|d| self.node_text(d).matches('[').count())
                    .unwrap_or(1);
                (0..depth).fold(element, |ty, _| IrType::array(ty))
            }

            // @NonNull String
            "annotated_type" => {
                let mut annotations = Vec::new();
                let mut inner = None;
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "marker_annotation" | "annotation" => {
                            annotations.push(self.read_annotation(child))
                        }
                        _ => inner = Some(child),
                    }
                }
                let mut ty = inner
                    .map(|n| self.read_type(n))
                    .unwrap_or_else(|| IrType::reference("Object"));
                if annotations
                    .iter()
                    .any(|a| NON_NULL.contains(&a.name.as_str()))
                {
                    ty.nullable = false;
                }
                ty.meta.annotations = annotations;
                ty
            }

            // ? extends Number
            "wildcard" => IrType::generic(self.node_text(node)),

            _ => IrType::reference(self.node_text(node)),
        }
    }

    fn read_type_arguments(&self, node: Node) -> Vec<IrType> {
        let Some(args) = self.named_child_of_kind(node, "type_arguments") else {
            return Vec::new();
        };
        let mut cursor = args.walk();
        args.named_children(&mut cursor)
            .map(|a| self.read_type(a))
            .collect()
    }

    /// Applies C-style dimensions written after a name (`int a[]`).
    fn with_dimensions(&self, ty: IrType, node: Node) -> IrType {
        match node.child_by_field_name("dimensions") {
            Some(dims) => (0..self.node_text(dims).matches('[').count())
                .fold(ty, |ty, _| IrType::array(ty)),
            None => ty,
        }
    }

    // ----------------------------------------------------------------------
    // Statements
    // ----------------------------------------------------------------------

    fn read_block_stmts(&self, node: Node) -> Vec<IrStatement> {
        let mut stmts = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if !matches!(child.kind(), "line_comment" | "block_comment") {
                stmts.push(self.read_stmt(child));
            }
        }
        stmts
    }

    fn unknown_stmt(&self, node: Node) -> IrStatement {
        IrStatement::unknown(LANGUAGE, self.node_text(node))
    }

    fn read_stmt(&self, node: Node) -> IrStatement {
        let stmt = match node.kind() {
            "block" => Some(IrStatement::block(self.read_block_stmts(node))),
            "local_variable_declaration" => self.read_local_variable(node),
            "expression_statement" => self
                .first_named_child(node)
                .map(|e| IrStatement::expr(self.read_expr(e))),
            "if_statement" => self.read_if(node),
            "while_statement" => {
                let condition = node.child_by_field_name("condition");
                let body = node.child_by_field_name("body");
                condition.zip(body).map(|(c, b)| {
                    IrStatement::while_loop(self.read_condition(c), self.read_stmt(b))
                })
            }
            "do_statement" => {
                let condition = node.child_by_field_name("condition");
                let body = node.child_by_field_name("body");
                condition.zip(body).map(|(c, b)| {
                    IrStatement::new(IrStatementKind::DoWhile {
                        body: Box::new(self.read_stmt(b)),
                        condition: self.read_condition(c),
                    })
                })
            }
            "for_statement" => self.read_for(node),
            "enhanced_for_statement" => self.read_for_each(node),
            "return_statement" => Some(IrStatement::return_stmt(
                self.first_named_child(node).map(|e| self.read_expr(e)),
            )),
            // Labelled jumps have no IR form.
            "break_statement" if self.first_named_child(node).is_none() => {
                Some(IrStatement::break_stmt())
            }
            "continue_statement" if self.first_named_child(node).is_none() => {
                Some(IrStatement::continue_stmt())
            }
            "throw_statement" => self
                .first_named_child(node)
                .map(|e| IrStatement::throw(self.read_expr(e))),
            "try_statement" => self.read_try(node),
            "switch_expression" => self.read_switch(node),
            ";" => Some(IrStatement::empty()),
            _ => None,
        };
        stmt.unwrap_or_else(|| self.unknown_stmt(node))
            .with_meta(IrMeta::default().with_location(self.location(node)))
    }

    fn read_local_variable(&self, node: Node) -> Option<IrStatement> {
        let modifiers = self.read_modifiers(node);
        let ty = self.read_type(node.child_by_field_name("type")?);
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        match declarators.as_slice() {
            [single] => {
                let name = self.node_text(single.child_by_field_name("name")?);
                let init = single
                    .child_by_field_name("value")
                    .map(|v| IrStatement::expr(self.read_expr(v)));
                Some(IrStatement::var(
                    name,
                    self.with_dimensions(ty, *single),
                    !modifiers.has("final"),
                    init,
                ))
            }
            // int a, b; only without initializers
            [first, rest @ ..] if declarators.iter().all(|d| d.child_by_field_name("value").is_none()) => {
                let additional_names = rest
                    .iter()
                    .filter_map(|d| d.child_by_field_name("name"))
                    .map(|n| self.node_text(n).to_string())
                    .collect();
                Some(IrStatement::new(IrStatementKind::VariableDeclaration {
                    name: self.node_text(first.child_by_field_name("name")?).to_string(),
                    ty,
                    additional_names,
                    mutable: !modifiers.has("final"),
                    initializer: None,
                }))
            }
            _ => None,
        }
    }

    /// Strips the parentheses tree-sitter keeps around conditions.
    fn read_condition(&self, node: Node) -> IrExpression {
        match node.kind() {
            "parenthesized_expression" => match self.first_named_child(node) {
                Some(inner) => self.read_expr(inner),
                None => IrExpression::unknown(LANGUAGE, self.node_text(node)),
            },
            _ => self.read_expr(node),
        }
    }

    fn read_if(&self, node: Node) -> Option<IrStatement> {
        let condition = self.read_condition(node.child_by_field_name("condition")?);
        let then_branch = self.read_stmt(node.child_by_field_name("consequence")?);
        let else_branch = node
            .child_by_field_name("alternative")
            .map(|a| self.read_stmt(a));
        Some(IrStatement::if_stmt(condition, then_branch, else_branch))
    }

    fn read_for(&self, node: Node) -> Option<IrStatement> {
        let mut cursor = node.walk();
        let init: Vec<Node> = node.children_by_field_name("init", &mut cursor).collect();
        let mut cursor = node.walk();
        let update: Vec<Node> = node.children_by_field_name("update", &mut cursor).collect();
        // for (i = 0, j = 0; ...) has no IR form
        if init.len() > 1 || update.len() > 1 {
            return None;
        }

        let initializer = init.first().map(|n| match n.kind() {
            "local_variable_declaration" => self.read_stmt(*n),
            _ => IrStatement::expr(self.read_expr(*n)),
        });
        let update = update.first().map(|n| IrStatement::expr(self.read_expr(*n)));
        let condition = node
            .child_by_field_name("condition")
            .map(|c| self.read_expr(c));
        let body = self.read_stmt(node.child_by_field_name("body")?);

        Some(IrStatement::new(IrStatementKind::For {
            initializer: initializer.map(Box::new),
            condition,
            update: update.map(Box::new),
            body: Box::new(body),
        }))
    }

    fn read_for_each(&self, node: Node) -> Option<IrStatement> {
        let variable = self.node_text(node.child_by_field_name("name")?);
        let variable_type = node.child_by_field_name("type").map(|t| self.read_type(t));
        let iterable = self.read_expr(node.child_by_field_name("value")?);
        let body = self.read_stmt(node.child_by_field_name("body")?);
        Some(IrStatement::new(IrStatementKind::ForEach {
            variable: variable.to_string(),
            variable_type,
            iterable,
            body: Box::new(body),
        }))
    }

    fn read_try(&self, node: Node) -> Option<IrStatement> {
        let try_block = self.read_stmt(node.child_by_field_name("body")?);
        let mut catch_clauses = Vec::new();
        let mut finally_block = None;

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "catch_clause" => {
                    let param = self.named_child_of_kind(child, "catch_formal_parameter")?;
                    let exception_types = self
                        .named_child_of_kind(param, "catch_type")
                        .map(|t| {
                            let mut inner = t.walk();
                            t.named_children(&mut inner)
                                .map(|ty| self.read_type(ty))
                                .collect()
                        })
                        .unwrap_or_default();
                    catch_clauses.push(IrCatchClause {
                        exception_types,
                        name: param
                            .child_by_field_name("name")
                            .map(|n| self.node_text(n).to_string()),
                        body: child.child_by_field_name("body").map(|b| self.read_stmt(b)),
                        meta: IrMeta::default().with_location(self.location(child)),
                    });
                }
                "finally_clause" => {
                    finally_block = self
                        .named_child_of_kind(child, "block")
                        .map(|b| Box::new(self.read_stmt(b)));
                }
                _ => {}
            }
        }

        Some(IrStatement::new(IrStatementKind::TryCatch {
            try_block: Box::new(try_block),
            catch_clauses,
            finally_block,
        }))
    }

    fn read_switch(&self, node: Node) -> Option<IrStatement> {
        let expression = self.read_condition(node.child_by_field_name("condition")?);
        let block = node.child_by_field_name("body")?;
        let mut cases = Vec::new();

        let mut cursor = block.walk();
        for group in block.named_children(&mut cursor) {
            let arrow = match group.kind() {
                "switch_block_statement_group" => false,
                "switch_rule" => true,
                _ => continue,
            };
            let mut matches = Vec::new();
            let mut body = Vec::new();
            let mut inner = group.walk();
            for child in group.named_children(&mut inner) {
                match child.kind() {
                    "switch_label" => {
                        let mut labels = child.walk();
                        matches.extend(
                            child
                                .named_children(&mut labels)
                                .map(|e| self.read_expr(e)),
                        );
                    }
                    "line_comment" | "block_comment" => {}
                    _ => body.push(self.read_stmt(child)),
                }
            }
            let mut meta = IrMeta::default().with_location(self.location(group));
            if arrow {
                meta.properties.insert("arrow", true);
            }
            cases.push(IrSwitchCase {
                matches,
                body: Some(IrStatement::block(body)),
                meta,
            });
        }

        Some(IrStatement::new(IrStatementKind::Switch { expression, cases }))
    }

    // ----------------------------------------------------------------------
    // Expressions
    // ----------------------------------------------------------------------

    fn read_arguments(&self, node: Node) -> Vec<IrExpression> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| !matches!(c.kind(), "line_comment" | "block_comment"))
            .map(|a| self.read_expr(a))
            .collect()
    }

    fn unknown_expr(&self, node: Node) -> IrExpression {
        IrExpression::unknown(LANGUAGE, self.node_text(node))
    }

    fn read_expr(&self, node: Node) -> IrExpression {
        self.try_read_expr(node)
            .unwrap_or_else(|| self.unknown_expr(node))
    }

    fn try_read_expr(&self, node: Node) -> Option<IrExpression> {
        let expr = match node.kind() {
            // Literals keep their source spelling.
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal"
            | "character_literal"
            | "string_literal"
            | "text_block"
            | "true"
            | "false"
            | "null_literal" => IrExpression::literal(self.node_text(node)),

            "identifier" | "this" | "super" => IrExpression::ident(self.node_text(node)),

            // a.b
            "field_access" => {
                let object = self.read_expr(node.child_by_field_name("object")?);
                let field = self.node_text(node.child_by_field_name("field")?);
                IrExpression::property(Some(object), field)
            }

            // a.b(c)
            "method_invocation" => {
                let receiver = node.child_by_field_name("object").map(|o| self.read_expr(o));
                let name = self.node_text(node.child_by_field_name("name")?);
                let args = node
                    .child_by_field_name("arguments")
                    .map(|a| self.read_arguments(a))
                    .unwrap_or_default();
                IrExpression::call(receiver, name, args)
            }

            // new Foo<>(a); anonymous classes have no IR form
            "object_creation_expression" => {
                if self.named_child_of_kind(node, "class_body").is_some() {
                    return None;
                }
                let ty = node.child_by_field_name("type")?;
                let (class_name, type_arguments) = match ty.kind() {
                    "generic_type" => (
                        self.first_named_child(ty).map(|n| self.node_text(n))?,
                        self.read_type_arguments(ty),
                    ),
                    _ => (self.node_text(ty), Vec::new()),
                };
                let arguments = node
                    .child_by_field_name("arguments")
                    .map(|a| self.read_arguments(a))
                    .unwrap_or_default();
                IrExpression::new(IrExpressionKind::ObjectCreation {
                    class_name: class_name.to_string(),
                    type_arguments,
                    arguments,
                })
            }

            "binary_expression" => {
                let op = IrBinaryOperator::from_symbol(
                    self.node_text(node.child_by_field_name("operator")?),
                )?;
                IrExpression::binary(
                    self.read_expr(node.child_by_field_name("left")?),
                    op,
                    self.read_expr(node.child_by_field_name("right")?),
                )
            }

            "unary_expression" => {
                let op = IrUnaryOperator::from_symbol(
                    self.node_text(node.child_by_field_name("operator")?),
                )?;
                IrExpression::unary(op, self.read_expr(node.child_by_field_name("operand")?), true)
            }

            // ++i / i--
            "update_expression" => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.children(&mut cursor).collect();
                let (op, operand, prefix) = match children.as_slice() {
                    [op, operand] if !op.is_named() => (*op, *operand, true),
                    [operand, op] if !op.is_named() => (*op, *operand, false),
                    _ => return None,
                };
                let op = IrUnaryOperator::from_symbol(self.node_text(op))?;
                IrExpression::unary(op, self.read_expr(operand), prefix)
            }

            "assignment_expression" => {
                let op = IrAssignmentOperator::from_symbol(
                    self.node_text(node.child_by_field_name("operator")?),
                )?;
                IrExpression::assign(
                    self.read_expr(node.child_by_field_name("left")?),
                    op,
                    self.read_expr(node.child_by_field_name("right")?),
                )
            }

            "ternary_expression" => IrExpression::ternary(
                self.read_expr(node.child_by_field_name("condition")?),
                self.read_expr(node.child_by_field_name("consequence")?),
                self.read_expr(node.child_by_field_name("alternative")?),
            ),

            "cast_expression" => IrExpression::cast(
                self.read_expr(node.child_by_field_name("value")?),
                self.read_type(node.child_by_field_name("type")?),
            ),

            // Pattern matching (`x instanceof Foo f`) has no IR form.
            "instanceof_expression" => {
                if node.child_by_field_name("name").is_some()
                    || node.child_by_field_name("pattern").is_some()
                {
                    return None;
                }
                IrExpression::type_check(
                    self.read_expr(node.child_by_field_name("left")?),
                    self.read_type(node.child_by_field_name("right")?),
                )
            }

            "lambda_expression" => {
                let params = node.child_by_field_name("parameters")?;
                let parameters = match params.kind() {
                    "identifier" => vec![self.node_text(params).to_string()],
                    _ => {
                        let mut cursor = params.walk();
                        params
                            .named_children(&mut cursor)
                            .filter_map(|p| match p.kind() {
                                "identifier" => Some(self.node_text(p).to_string()),
                                "formal_parameter" => p
                                    .child_by_field_name("name")
                                    .map(|n| self.node_text(n).to_string()),
                                _ => None,
                            })
                            .collect()
                    }
                };
                let body = node.child_by_field_name("body")?;
                let body = match body.kind() {
                    "block" => self.read_block_stmts(body),
                    _ => vec![IrStatement::expr(self.read_expr(body))],
                };
                IrExpression::lambda(parameters, body)
            }

            "parenthesized_expression" => {
                IrExpression::parenthesized(self.read_expr(self.first_named_child(node)?))
            }

            // Foo.class
            "class_literal" => IrExpression::property(
                Some(IrExpression::type_reference(
                    self.read_type(self.first_named_child(node)?),
                )),
                "class",
            ),

            _ => return None,
        };
        Some(expr.with_meta(IrMeta::default().with_location(self.location(node))))
    }
}

fn primitive(name: &str) -> IrPrimitive {
    match name {
        "void" => IrPrimitive::Void,
        "boolean" => IrPrimitive::Boolean,
        "byte" => IrPrimitive::Byte,
        "short" => IrPrimitive::Short,
        "int" => IrPrimitive::Int,
        "long" => IrPrimitive::Long,
        "char" => IrPrimitive::Char,
        "float" => IrPrimitive::Float,
        "double" => IrPrimitive::Double,
        other => IrPrimitive::Unmapped(other.to_string()),
    }
}
