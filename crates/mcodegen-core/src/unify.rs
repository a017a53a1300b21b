//! Reconciles several parsed files that describe the same API surface.
//!
//! The first source is the template. A class survives only when every other
//! source declares a class with the same simple name; inside a surviving class
//! a field survives only when every counterpart has a field with the same name
//! and a structurally equal type. Nested classes are intersected recursively.
//!
//! Callables, initializers, super types and metadata are copied from the
//! template as-is. Methods are not intersected across sources: a method that
//! exists only on one platform still ends up in the unified class.

use crate::error::{Error, Result};
use mcodegen_ir::{IrClass, IrClassBuilder, IrField, IrFile, IrFileBuilder, StructureEq};
use std::collections::HashMap;

/// A way of merging several sources into one output.
pub trait UnifySourcesStrategy {
    type Source;
    type Output;

    fn unify(&self, sources: &[Self::Source]) -> Result<Self::Output>;
}

/// Unifies `sources` with `strategy`.
pub fn unify_sources<S: UnifySourcesStrategy>(
    strategy: &S,
    sources: &[S::Source],
) -> Result<S::Output> {
    strategy.unify(sources)
}

/// Keeps the classes, fields and nested classes common to every source.
///
/// The output file takes the template's name and holds only the surviving
/// top-level classes, in template order. Imports, file properties and
/// non-class declarations are not carried over, with any number of sources:
/// a single source comes back with its classes only, so the output shape
/// does not depend on how many platforms were read. Generators set the
/// package or module they need through mappers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnifyClassesByNameAndFields;

impl UnifySourcesStrategy for UnifyClassesByNameAndFields {
    type Source = IrFile;
    type Output = IrFile;

    fn unify(&self, sources: &[IrFile]) -> Result<IrFile> {
        let Some((template, others)) = sources.split_first() else {
            return Err(Error::NoSources);
        };

        let mut file = IrFileBuilder::new(template.name.clone());

        // Nothing to intersect with; the usual class-only output.
        if others.is_empty() {
            for class in template.classes() {
                file.push_declaration(class.clone());
            }
            return Ok(file.build());
        }

        let indexes: Vec<HashMap<&str, &IrClass>> = others
            .iter()
            .map(|f| f.classes().map(|c| (c.name.as_str(), c)).collect())
            .collect();

        for class in template.classes() {
            let counterparts: Vec<&IrClass> = indexes
                .iter()
                .filter_map(|index| index.get(class.name.as_str()).copied())
                .collect();
            if counterparts.len() < indexes.len() {
                tracing::debug!(
                    class = %class.name,
                    "class missing from {} of {} sources, dropped",
                    indexes.len() - counterparts.len(),
                    sources.len()
                );
                continue;
            }
            file.push_declaration(unify_class(class, &counterparts)?);
        }

        Ok(file.build())
    }
}

fn unify_class(template: &IrClass, counterparts: &[&IrClass]) -> Result<IrClass> {
    let fields = common_fields(template, counterparts);
    let nested = common_nested_classes(template, counterparts)?;

    Ok(IrClassBuilder::from_class(template.clone())
        .fields(fields)
        .nested_classes(nested)
        .build()?)
}

fn common_fields(template: &IrClass, counterparts: &[&IrClass]) -> Vec<IrField> {
    let indexes: Vec<HashMap<&str, &IrField>> = counterparts
        .iter()
        .map(|c| c.fields.iter().map(|f| (f.name.as_str(), f)).collect())
        .collect();

    template
        .fields
        .iter()
        .filter(|field| {
            indexes.iter().all(|index| {
                index
                    .get(field.name.as_str())
                    .is_some_and(|other| other.ty.structure_eq(&field.ty))
            })
        })
        .cloned()
        .collect()
}

fn common_nested_classes(template: &IrClass, counterparts: &[&IrClass]) -> Result<Vec<IrClass>> {
    let indexes: Vec<HashMap<&str, &IrClass>> = counterparts
        .iter()
        .map(|c| {
            c.nested_classes
                .iter()
                .map(|n| (n.name.as_str(), n))
                .collect()
        })
        .collect();

    let mut result = Vec::new();
    for nested in &template.nested_classes {
        let matches: Vec<&IrClass> = indexes
            .iter()
            .filter_map(|index| index.get(nested.name.as_str()).copied())
            .collect();
        if matches.len() == indexes.len() {
            result.push(unify_class(nested, &matches)?);
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcodegen_ir::{
        IrCallableBuilder, IrClassKind, IrFieldBuilder, IrImport, IrLocation, IrPrimitive,
        IrType, IrVisibility,
    };
    use pretty_assertions::assert_eq;

    fn field(name: &str, ty: IrType) -> IrField {
        IrFieldBuilder::new(name, ty)
            .visibility(IrVisibility::Public)
            .build()
            .unwrap()
    }

    fn class(name: &str, fields: Vec<IrField>) -> IrClassBuilder {
        IrClassBuilder::new(name)
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .fields(fields)
    }

    fn file(name: &str, classes: Vec<IrClass>) -> IrFile {
        let mut builder = IrFileBuilder::new(name);
        for c in classes {
            builder.push_declaration(c);
        }
        builder.build()
    }

    fn int() -> IrType {
        IrType::primitive(IrPrimitive::Int)
    }

    fn field_names(class: &IrClass) -> Vec<&str> {
        class.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_no_sources_is_an_error() {
        let result = unify_sources(&UnifyClassesByNameAndFields, &[]);
        assert!(matches!(result, Err(Error::NoSources)));
    }

    #[test]
    fn test_single_source_keeps_classes_only() {
        let a = class("A", vec![field("x", int())]).build().unwrap();
        let helper = IrCallableBuilder::method("helper", IrType::void())
            .visibility(IrVisibility::Public)
            .build()
            .unwrap();
        let source = IrFileBuilder::new("Api.kt")
            .import(IrImport::new("kotlin.math.max"))
            .property("jvmPackage", "com.example")
            .declaration(helper)
            .declaration(field("LIMIT", int()))
            .declaration(a.clone())
            .build();

        let unified = unify_sources(&UnifyClassesByNameAndFields, &[source]).unwrap();
        assert_eq!(unified.name, "Api.kt");
        assert_eq!(unified.classes().cloned().collect::<Vec<_>>(), vec![a]);
        assert_eq!(unified.declarations.len(), 1);
        assert!(unified.imports.is_empty());
        assert!(unified.properties.is_empty());
    }

    #[test]
    fn test_fields_intersect_by_name_and_type() {
        let a1 = class(
            "User",
            vec![
                field("id", int()),
                field("name", IrType::reference("String")),
                field("age", int()),
            ],
        )
        .build()
        .unwrap();
        let a2 = class(
            "User",
            vec![
                field("name", IrType::reference("String")),
                field("id", int()),
                field("age", IrType::primitive(IrPrimitive::Long)),
            ],
        )
        .build()
        .unwrap();

        let unified = unify_sources(
            &UnifyClassesByNameAndFields,
            &[file("A.java", vec![a1]), file("A.kt", vec![a2])],
        )
        .unwrap();
        let user = unified.class("User").unwrap();
        assert_eq!(field_names(user), vec!["id", "name"]);
    }

    #[test]
    fn test_type_location_does_not_break_match() {
        let located = int().with_meta(
            mcodegen_ir::IrMeta::default().with_location(IrLocation::new("B.swift", 2, 3)),
        );
        let a1 = class("P", vec![field("x", int())]).build().unwrap();
        let a2 = class("P", vec![field("x", located)]).build().unwrap();

        let unified = unify_sources(
            &UnifyClassesByNameAndFields,
            &[file("A.java", vec![a1]), file("B.swift", vec![a2])],
        )
        .unwrap();
        assert_eq!(field_names(unified.class("P").unwrap()), vec!["x"]);
    }

    #[test]
    fn test_class_missing_from_one_source_is_dropped() {
        let sources = [
            file(
                "T.java",
                vec![
                    class("A", vec![]).build().unwrap(),
                    class("B", vec![]).build().unwrap(),
                    class("C", vec![]).build().unwrap(),
                ],
            ),
            file(
                "T.kt",
                vec![
                    class("C", vec![]).build().unwrap(),
                    class("A", vec![]).build().unwrap(),
                ],
            ),
            file("T.swift", vec![class("A", vec![]).build().unwrap()]),
        ];

        let unified = unify_sources(&UnifyClassesByNameAndFields, &sources).unwrap();
        let names: Vec<_> = unified.classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
        assert_eq!(unified.name, "T.java");
    }

    #[test]
    fn test_no_common_classes_is_empty_not_error() {
        let unified = unify_sources(
            &UnifyClassesByNameAndFields,
            &[
                file("A.java", vec![class("A", vec![]).build().unwrap()]),
                file("B.java", vec![class("B", vec![]).build().unwrap()]),
            ],
        )
        .unwrap();
        assert!(unified.declarations.is_empty());
    }

    #[test]
    fn test_nested_classes_intersect_recursively() {
        let inner1 = class("Inner", vec![field("a", int()), field("b", int())])
            .nested_class(class("Deep", vec![field("z", int())]).build().unwrap())
            .build()
            .unwrap();
        let inner2 = class("Inner", vec![field("b", int())])
            .nested_class(class("Deep", vec![]).build().unwrap())
            .build()
            .unwrap();
        let only_left = class("Extra", vec![]).build().unwrap();

        let outer1 = IrClassBuilder::qualified("pkg.Outer", "Outer")
            .kind(IrClassKind::Class)
            .visibility(IrVisibility::Public)
            .nested_class(inner1)
            .nested_class(only_left)
            .build()
            .unwrap();
        let outer2 = class("Outer", vec![]).nested_class(inner2).build().unwrap();

        let unified = unify_sources(
            &UnifyClassesByNameAndFields,
            &[file("A.java", vec![outer1]), file("B.kt", vec![outer2])],
        )
        .unwrap();
        let outer = unified.class("Outer").unwrap();
        assert_eq!(outer.nested_classes.len(), 1);
        let inner = outer.nested("Inner").unwrap();
        assert_eq!(inner.qualified_name, "pkg.Outer.Inner");
        assert_eq!(field_names(inner), vec!["b"]);
        assert!(inner.nested("Deep").unwrap().fields.is_empty());
    }

    // Methods are deliberately not intersected: the template's callables survive
    // even when the other source has none.
    #[test]
    fn test_callables_pass_through_from_template() {
        let method = IrCallableBuilder::method("onlyOnJvm", IrType::void())
            .visibility(IrVisibility::Public)
            .build()
            .unwrap();
        let a1 = class("S", vec![]).callable(method.clone()).build().unwrap();
        let a2 = class("S", vec![]).build().unwrap();

        let unified = unify_sources(
            &UnifyClassesByNameAndFields,
            &[file("S.java", vec![a1]), file("S.swift", vec![a2])],
        )
        .unwrap();
        assert_eq!(unified.class("S").unwrap().callables, vec![method]);
    }

    #[test]
    fn test_non_template_callables_are_ignored() {
        let method = IrCallableBuilder::method("onlyOnIos", IrType::void())
            .visibility(IrVisibility::Public)
            .build()
            .unwrap();
        let a1 = class("S", vec![]).build().unwrap();
        let a2 = class("S", vec![]).callable(method).build().unwrap();

        let unified = unify_sources(
            &UnifyClassesByNameAndFields,
            &[file("S.java", vec![a1]), file("S.swift", vec![a2])],
        )
        .unwrap();
        assert!(unified.class("S").unwrap().callables.is_empty());
    }
}
