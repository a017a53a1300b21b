//! Java source edits.
//!
//! Handlers locate declarations in the tree-sitter tree and splice text at
//! byte offsets, so everything they do not touch keeps its formatting.

use crate::reader::parse_tree;
use mcodegen_core::{EditStep, EditStepHandler, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use tree_sitter::Node;

/// Adds `import <name>;` unless the unit already has it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddJavaImport {
    pub import: String,
    pub is_static: bool,
}

impl AddJavaImport {
    pub fn new(import: impl Into<String>) -> Self {
        Self {
            import: import.into(),
            is_static: false,
        }
    }

    pub fn new_static(import: impl Into<String>) -> Self {
        Self {
            import: import.into(),
            is_static: true,
        }
    }
}

impl EditStep for AddJavaImport {}

/// Appends interfaces to classes (`implements`) and interfaces (`extends`),
/// keyed by simple declaration name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendJavaInterfaces {
    pub class_to_interfaces: BTreeMap<String, Vec<String>>,
}

impl AppendJavaInterfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        mut self,
        class: impl Into<String>,
        interfaces: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.class_to_interfaces
            .entry(class.into())
            .or_default()
            .extend(interfaces.into_iter().map(Into::into));
        self
    }
}

impl EditStep for AppendJavaInterfaces {}

/// Generates `getX()` for every field of the named classes.
///
/// With `fix_getters_for_kotlin`, getters are marked `@Override` and a
/// boolean `getIsX` is renamed to `isX`, matching the accessors Kotlin
/// interfaces declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddJavaGetters {
    pub class_names: BTreeSet<String>,
    pub ignored_fields: BTreeSet<String>,
    pub fix_getters_for_kotlin: bool,
}

impl EditStep for AddJavaGetters {}

pub struct AddJavaImportHandler;

impl EditStepHandler for AddJavaImportHandler {
    type Step = AddJavaImport;

    fn handle(&self, step: &AddJavaImport, source: &str) -> Result<String> {
        let tree = parse_tree(source)?;
        let root = tree.root_node();
        let line = if step.is_static {
            format!("import static {};", step.import)
        } else {
            format!("import {};", step.import)
        };

        let mut last_import = None;
        let mut package = None;
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "import_declaration" => {
                    if normalize_space(node_text(child, source)) == line {
                        return Ok(source.to_string());
                    }
                    last_import = Some(child);
                }
                "package_declaration" => package = Some(child),
                _ => {}
            }
        }

        Ok(match (last_import, package) {
            (Some(import), _) => splice(source, import.end_byte(), &format!("\n{line}")),
            (None, Some(package)) => splice(source, package.end_byte(), &format!("\n\n{line}")),
            (None, None) => format!("{line}\n\n{source}"),
        })
    }
}

pub struct AppendJavaInterfacesHandler;

impl EditStepHandler for AppendJavaInterfacesHandler {
    type Step = AppendJavaInterfaces;

    fn handle(&self, step: &AppendJavaInterfaces, source: &str) -> Result<String> {
        let tree = parse_tree(source)?;
        let mut edits = Vec::new();

        for decl in declarations(tree.root_node(), &["class_declaration", "interface_declaration"]) {
            let Some(name) = decl.child_by_field_name("name") else {
                continue;
            };
            let Some(wanted) = step.class_to_interfaces.get(node_text(name, source)) else {
                continue;
            };

            let (clause_kind, keyword) = match decl.kind() {
                "interface_declaration" => ("extends_interfaces", "extends"),
                _ => ("super_interfaces", "implements"),
            };
            let clause = named_child(decl, clause_kind);
            let present: BTreeSet<&str> = clause
                .and_then(|c| named_child(c, "type_list"))
                .map(|list| {
                    let mut cursor = list.walk();
                    list.named_children(&mut cursor)
                        .map(|t| node_text(t, source))
                        .collect()
                })
                .unwrap_or_default();
            let mut added: Vec<&str> = Vec::new();
            for interface in wanted {
                if !present.contains(interface.as_str()) && !added.contains(&interface.as_str()) {
                    added.push(interface);
                }
            }
            if added.is_empty() {
                continue;
            }

            match clause {
                Some(clause) => edits.push((clause.end_byte(), format!(", {}", added.join(", ")))),
                None => {
                    // After the last header part that precedes the clause.
                    let anchor = ["superclass", "type_parameters"]
                        .iter()
                        .find_map(|kind| named_child(decl, kind))
                        .unwrap_or(name);
                    edits.push((anchor.end_byte(), format!(" {keyword} {}", added.join(", "))));
                }
            }
        }

        Ok(apply_edits(source, edits))
    }
}

pub struct AddJavaGettersHandler;

impl EditStepHandler for AddJavaGettersHandler {
    type Step = AddJavaGetters;

    fn handle(&self, step: &AddJavaGetters, source: &str) -> Result<String> {
        let tree = parse_tree(source)?;
        let mut edits = Vec::new();

        for decl in declarations(tree.root_node(), &["class_declaration"]) {
            let Some(name) = decl.child_by_field_name("name") else {
                continue;
            };
            if !step.class_names.contains(node_text(name, source)) {
                continue;
            }
            let Some(body) = decl.child_by_field_name("body") else {
                continue;
            };

            let indent = member_indent(source, decl, body);
            let mut getters = Vec::new();
            let mut cursor = body.walk();
            for field in body.named_children(&mut cursor) {
                if field.kind() != "field_declaration" {
                    continue;
                }
                let mut inner = field.walk();
                let declarators: Vec<Node> = field
                    .children_by_field_name("declarator", &mut inner)
                    .collect();
                let ignored = declarators.iter().any(|d| {
                    d.child_by_field_name("name")
                        .is_some_and(|n| step.ignored_fields.contains(node_text(n, source)))
                });
                if ignored {
                    continue;
                }
                let Some(ty) = field.child_by_field_name("type") else {
                    continue;
                };
                let is_static = named_child(field, "modifiers")
                    .is_some_and(|m| node_text(m, source).split_whitespace().any(|w| w == "static"));
                for declarator in declarators {
                    let Some(field_name) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    let dims = declarator
                        .child_by_field_name("dimensions")
                        .map(|d| node_text(d, source))
                        .unwrap_or("");
                    getters.push(getter(
                        &format!("{}{dims}", node_text(ty, source)),
                        node_text(field_name, source),
                        is_static,
                        step.fix_getters_for_kotlin,
                    ));
                }
            }

            if !getters.is_empty() {
                let text: Vec<String> = getters.iter().map(|g| apply_indent(g, &indent)).collect();
                edits.push(append_to_body(source, body, &text.join("\n\n")));
            }
        }

        Ok(apply_edits(source, edits))
    }
}

fn getter(ty: &str, field: &str, is_static: bool, fix_for_kotlin: bool) -> String {
    let mut name = format!("get{}", capitalize(field));
    let mut out = String::new();
    if fix_for_kotlin {
        out.push_str("@Override\n");
        // getIsActive -> isActive
        let is_prefixed = name
            .strip_prefix("getIs")
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_uppercase);
        if ty == "boolean" && is_prefixed {
            name = decapitalize(&name[3..]);
        }
    }
    out.push_str("public ");
    if is_static {
        out.push_str("static ");
    }
    let _ = write!(out, "{ty} {name}() {{\n    return {field};\n}}");
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn normalize_space(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn named_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

/// Every node of the given kinds, outermost first.
fn declarations<'t>(root: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if kinds.contains(&node.kind()) {
            out.push(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

fn splice(source: &str, at: usize, text: &str) -> String {
    let mut out = String::with_capacity(source.len() + text.len());
    out.push_str(&source[..at]);
    out.push_str(text);
    out.push_str(&source[at..]);
    out
}

/// Applies `(offset, text)` insertions back to front so offsets stay valid.
fn apply_edits(source: &str, mut edits: Vec<(usize, String)>) -> String {
    edits.sort_by(|a, b| b.0.cmp(&a.0));
    edits
        .into_iter()
        .fold(source.to_string(), |text, (at, insert)| splice(&text, at, &insert))
}

/// Indentation of the class members: taken from the first member, or one
/// level (four spaces) deeper than the declaration.
fn member_indent(source: &str, decl: Node, body: Node) -> String {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|c| c.start_position().row != body.start_position().row);
    match first {
        Some(member) => line_indent(source, member.start_byte()),
        None => format!("{}    ", line_indent(source, decl.start_byte())),
    }
}

fn line_indent(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

fn apply_indent(content: &str, indent: &str) -> String {
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Insertion that puts `text` on its own lines before the closing brace,
/// separated from existing members by a blank line.
fn append_to_body(source: &str, body: Node, text: &str) -> (usize, String) {
    let open = body.start_byte() + 1;
    let close = body.end_byte().saturating_sub(1);
    let mut end = close;
    while end > open && source.as_bytes()[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    let separator = if end == open { "\n" } else { "\n\n" };
    let mut insert = format!("{separator}{text}");
    // `{}` on one line: the closing brace needs a line of its own
    if !source[end..close].contains('\n') {
        insert.push('\n');
        insert.push_str(&line_indent(source, body.start_byte()));
    }
    (end, insert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_import_after_existing() {
        let source = "package a;\n\nimport java.util.List;\n\nclass A {}\n";
        let out = AddJavaImportHandler
            .handle(&AddJavaImport::new("java.util.Map"), source)
            .unwrap();
        assert_eq!(
            out,
            "package a;\n\nimport java.util.List;\nimport java.util.Map;\n\nclass A {}\n"
        );
        // idempotent
        let again = AddJavaImportHandler
            .handle(&AddJavaImport::new("java.util.Map"), &out)
            .unwrap();
        assert_eq!(again, out);
    }

    #[test]
    fn test_add_import_without_imports() {
        let out = AddJavaImportHandler
            .handle(
                &AddJavaImport::new_static("org.junit.Assert.assertTrue"),
                "package a;\n\nclass A {}\n",
            )
            .unwrap();
        assert_eq!(
            out,
            "package a;\n\nimport static org.junit.Assert.assertTrue;\n\nclass A {}\n"
        );
        let out = AddJavaImportHandler
            .handle(&AddJavaImport::new("x.Y"), "class A {}\n")
            .unwrap();
        assert_eq!(out, "import x.Y;\n\nclass A {}\n");
    }

    #[test]
    fn test_append_interfaces() {
        let source = "\
class User extends Base {
}

class Account implements Serializable {
    interface Listener {}
}

class Other {}
";
        let step = AppendJavaInterfaces::new()
            .append("User", ["CUser", "CNamed"])
            .append("Account", ["Serializable", "CAccount"])
            .append("Listener", ["EventListener"]);
        let out = AppendJavaInterfacesHandler.handle(&step, source).unwrap();
        assert_eq!(
            out,
            "\
class User extends Base implements CUser, CNamed {
}

class Account implements Serializable, CAccount {
    interface Listener extends EventListener {}
}

class Other {}
"
        );
    }

    #[test]
    fn test_add_getters() {
        let source = "\
public class User {
    private long id;
    private boolean isActive;
    private String secret;
}
";
        let step = AddJavaGetters {
            class_names: BTreeSet::from(["User".to_string()]),
            ignored_fields: BTreeSet::from(["secret".to_string()]),
            fix_getters_for_kotlin: true,
        };
        let out = AddJavaGettersHandler.handle(&step, source).unwrap();
        assert_eq!(
            out,
            "\
public class User {
    private long id;
    private boolean isActive;
    private String secret;

    @Override
    public long getId() {
        return id;
    }

    @Override
    public boolean isActive() {
        return isActive;
    }
}
"
        );
    }

    #[test]
    fn test_add_getters_to_empty_class_without_kotlin_fix() {
        let step = AddJavaGetters {
            class_names: BTreeSet::from(["Empty".to_string(), "Flag".to_string()]),
            ..AddJavaGetters::default()
        };
        let out = AddJavaGettersHandler
            .handle(&step, "class Flag {\n    boolean isOn;\n}\nclass Empty {\n}\n")
            .unwrap();
        assert_eq!(
            out,
            "class Flag {\n    boolean isOn;\n\n    public boolean getIsOn() {\n        return isOn;\n    }\n}\nclass Empty {\n}\n"
        );
    }
}
