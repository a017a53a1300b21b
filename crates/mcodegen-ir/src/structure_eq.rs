//! Structural equality for IR types, expressions and statements.
//!
//! `structure_eq` compares trees ignoring where they came from: source
//! locations and language properties differ between front-ends reading the
//! same declaration and are not compared, at any depth.
//!
//! # Core Fields (must match exactly)
//!
//! - Kind, names, type arguments, nullability
//! - Operators, literal spelling, fallback text
//! - Annotations (name and parameter values)

use crate::expr::{IrExpression, IrExpressionKind};
use crate::meta::{IrAnnotation, IrMeta};
use crate::stmt::{IrCatchClause, IrStatement, IrStatementKind, IrSwitchCase};
use crate::types::{IrType, IrTypeKind, IrTypeParameter};

/// Trait for structural equality comparison.
///
/// Unlike `PartialEq`, this ignores locations and language properties.
pub trait StructureEq {
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for IrType {
    fn structure_eq(&self, other: &Self) -> bool {
        self.nullable == other.nullable
            && self.kind.structure_eq(&other.kind)
            && self.meta.structure_eq(&other.meta)
    }
}

impl StructureEq for IrTypeKind {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                IrTypeKind::Reference {
                    name: n1,
                    arguments: a1,
                },
                IrTypeKind::Reference {
                    name: n2,
                    arguments: a2,
                },
            ) => n1 == n2 && vec_structure_eq(a1, a2),
            (IrTypeKind::Primitive { primitive: p1 }, IrTypeKind::Primitive { primitive: p2 }) => {
                p1 == p2
            }
            (IrTypeKind::Array { element: e1 }, IrTypeKind::Array { element: e2 }) => {
                e1.structure_eq(e2)
            }
            (
                IrTypeKind::Function {
                    parameters: p1,
                    returns: r1,
                },
                IrTypeKind::Function {
                    parameters: p2,
                    returns: r2,
                },
            ) => vec_structure_eq(p1, p2) && r1.structure_eq(r2),
            (IrTypeKind::Generic { name: n1 }, IrTypeKind::Generic { name: n2 }) => n1 == n2,
            _ => false,
        }
    }
}

impl StructureEq for IrTypeParameter {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && vec_structure_eq(&self.bounds, &other.bounds)
            && self.meta.structure_eq(&other.meta)
    }
}

// Only annotations take part; location and properties are dropped.
impl StructureEq for IrMeta {
    fn structure_eq(&self, other: &Self) -> bool {
        vec_structure_eq(&self.annotations, &other.annotations)
    }
}

impl StructureEq for IrAnnotation {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.name == b.name && a.value.structure_eq(&b.value))
    }
}

impl StructureEq for IrExpression {
    fn structure_eq(&self, other: &Self) -> bool {
        self.kind.structure_eq(&other.kind) && self.meta.structure_eq(&other.meta)
    }
}

impl StructureEq for IrExpressionKind {
    fn structure_eq(&self, other: &Self) -> bool {
        use IrExpressionKind as K;
        match (self, other) {
            (K::Empty, K::Empty) => true,
            (K::Literal { value: v1 }, K::Literal { value: v2 }) => v1 == v2,
            (
                K::Identifier {
                    qualifier: q1,
                    name: n1,
                },
                K::Identifier {
                    qualifier: q2,
                    name: n2,
                },
            ) => n1 == n2 && option_structure_eq(q1.as_deref(), q2.as_deref()),
            (K::TypeReference { referenced: r1 }, K::TypeReference { referenced: r2 }) => {
                r1.structure_eq(r2)
            }
            (
                K::PropertyAccess {
                    receiver: r1,
                    name: n1,
                },
                K::PropertyAccess {
                    receiver: r2,
                    name: n2,
                },
            ) => n1 == n2 && option_structure_eq(r1.as_deref(), r2.as_deref()),
            (
                K::MethodCall {
                    receiver: r1,
                    name: n1,
                    arguments: a1,
                    call_kind: c1,
                },
                K::MethodCall {
                    receiver: r2,
                    name: n2,
                    arguments: a2,
                    call_kind: c2,
                },
            ) => {
                n1 == n2
                    && c1 == c2
                    && option_structure_eq(r1.as_deref(), r2.as_deref())
                    && vec_structure_eq(a1, a2)
            }
            (
                K::ObjectCreation {
                    class_name: c1,
                    type_arguments: t1,
                    arguments: a1,
                },
                K::ObjectCreation {
                    class_name: c2,
                    type_arguments: t2,
                    arguments: a2,
                },
            ) => c1 == c2 && vec_structure_eq(t1, t2) && vec_structure_eq(a1, a2),
            (
                K::Binary {
                    left: l1,
                    operator: o1,
                    right: r1,
                },
                K::Binary {
                    left: l2,
                    operator: o2,
                    right: r2,
                },
            ) => o1 == o2 && l1.structure_eq(l2) && r1.structure_eq(r2),
            (
                K::Unary {
                    operator: o1,
                    operand: e1,
                    prefix: p1,
                },
                K::Unary {
                    operator: o2,
                    operand: e2,
                    prefix: p2,
                },
            ) => o1 == o2 && p1 == p2 && e1.structure_eq(e2),
            (
                K::Assignment {
                    target: t1,
                    operator: o1,
                    value: v1,
                },
                K::Assignment {
                    target: t2,
                    operator: o2,
                    value: v2,
                },
            ) => o1 == o2 && t1.structure_eq(t2) && v1.structure_eq(v2),
            (
                K::Ternary {
                    condition: c1,
                    if_true: t1,
                    if_false: f1,
                },
                K::Ternary {
                    condition: c2,
                    if_true: t2,
                    if_false: f2,
                },
            ) => c1.structure_eq(c2) && t1.structure_eq(t2) && f1.structure_eq(f2),
            (
                K::Cast {
                    expression: e1,
                    target: t1,
                },
                K::Cast {
                    expression: e2,
                    target: t2,
                },
            ) => e1.structure_eq(e2) && t1.structure_eq(t2),
            (
                K::TypeCheck {
                    expression: e1,
                    checked: t1,
                },
                K::TypeCheck {
                    expression: e2,
                    checked: t2,
                },
            ) => e1.structure_eq(e2) && t1.structure_eq(t2),
            (
                K::Lambda {
                    parameters: p1,
                    body: b1,
                },
                K::Lambda {
                    parameters: p2,
                    body: b2,
                },
            ) => p1 == p2 && vec_structure_eq(b1, b2),
            (K::Parenthesized { expression: e1 }, K::Parenthesized { expression: e2 }) => {
                e1.structure_eq(e2)
            }
            (K::Unknown { fallback: f1 }, K::Unknown { fallback: f2 }) => f1 == f2,
            _ => false,
        }
    }
}

impl StructureEq for IrStatement {
    fn structure_eq(&self, other: &Self) -> bool {
        self.kind.structure_eq(&other.kind) && self.meta.structure_eq(&other.meta)
    }
}

impl StructureEq for IrStatementKind {
    fn structure_eq(&self, other: &Self) -> bool {
        use IrStatementKind as S;
        match (self, other) {
            (S::Empty, S::Empty) | (S::Break, S::Break) | (S::Continue, S::Continue) => true,
            (S::Expression { expression: e1 }, S::Expression { expression: e2 })
            | (S::Throw { expression: e1 }, S::Throw { expression: e2 }) => e1.structure_eq(e2),
            (
                S::VariableDeclaration {
                    name: n1,
                    ty: t1,
                    additional_names: a1,
                    mutable: m1,
                    initializer: i1,
                },
                S::VariableDeclaration {
                    name: n2,
                    ty: t2,
                    additional_names: a2,
                    mutable: m2,
                    initializer: i2,
                },
            ) => {
                n1 == n2
                    && a1 == a2
                    && m1 == m2
                    && t1.structure_eq(t2)
                    && option_structure_eq(i1.as_deref(), i2.as_deref())
            }
            (S::Block { statements: s1 }, S::Block { statements: s2 }) => vec_structure_eq(s1, s2),
            (
                S::If {
                    condition: c1,
                    then_branch: t1,
                    else_branch: e1,
                },
                S::If {
                    condition: c2,
                    then_branch: t2,
                    else_branch: e2,
                },
            ) => {
                c1.structure_eq(c2)
                    && t1.structure_eq(t2)
                    && option_structure_eq(e1.as_deref(), e2.as_deref())
            }
            (
                S::For {
                    initializer: i1,
                    condition: c1,
                    update: u1,
                    body: b1,
                },
                S::For {
                    initializer: i2,
                    condition: c2,
                    update: u2,
                    body: b2,
                },
            ) => {
                option_structure_eq(i1.as_deref(), i2.as_deref())
                    && option_structure_eq(c1.as_ref(), c2.as_ref())
                    && option_structure_eq(u1.as_deref(), u2.as_deref())
                    && b1.structure_eq(b2)
            }
            (
                S::ForEach {
                    variable: v1,
                    variable_type: t1,
                    iterable: i1,
                    body: b1,
                },
                S::ForEach {
                    variable: v2,
                    variable_type: t2,
                    iterable: i2,
                    body: b2,
                },
            ) => {
                v1 == v2
                    && option_structure_eq(t1.as_ref(), t2.as_ref())
                    && i1.structure_eq(i2)
                    && b1.structure_eq(b2)
            }
            (
                S::While {
                    condition: c1,
                    body: b1,
                },
                S::While {
                    condition: c2,
                    body: b2,
                },
            )
            | (
                S::DoWhile {
                    body: b1,
                    condition: c1,
                },
                S::DoWhile {
                    body: b2,
                    condition: c2,
                },
            ) => c1.structure_eq(c2) && b1.structure_eq(b2),
            (
                S::Switch {
                    expression: e1,
                    cases: c1,
                },
                S::Switch {
                    expression: e2,
                    cases: c2,
                },
            ) => e1.structure_eq(e2) && vec_structure_eq(c1, c2),
            (S::Return { expression: e1 }, S::Return { expression: e2 }) => {
                option_structure_eq(e1.as_ref(), e2.as_ref())
            }
            (
                S::TryCatch {
                    try_block: t1,
                    catch_clauses: c1,
                    finally_block: f1,
                },
                S::TryCatch {
                    try_block: t2,
                    catch_clauses: c2,
                    finally_block: f2,
                },
            ) => {
                t1.structure_eq(t2)
                    && vec_structure_eq(c1, c2)
                    && option_structure_eq(f1.as_deref(), f2.as_deref())
            }
            (S::Unknown { fallback: f1 }, S::Unknown { fallback: f2 }) => f1 == f2,
            _ => false,
        }
    }
}

impl StructureEq for IrSwitchCase {
    fn structure_eq(&self, other: &Self) -> bool {
        vec_structure_eq(&self.matches, &other.matches)
            && option_structure_eq(self.body.as_ref(), other.body.as_ref())
            && self.meta.structure_eq(&other.meta)
    }
}

impl StructureEq for IrCatchClause {
    fn structure_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && vec_structure_eq(&self.exception_types, &other.exception_types)
            && option_structure_eq(self.body.as_ref(), other.body.as_ref())
            && self.meta.structure_eq(&other.meta)
    }
}

/// Element-wise comparison of two slices.
pub fn vec_structure_eq<T: StructureEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structure_eq(y))
}

/// Both absent, or both present and structurally equal.
pub fn option_structure_eq<T: StructureEq>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.structure_eq(b),
        _ => false,
    }
}
