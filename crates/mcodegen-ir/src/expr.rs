//! Expressions.

use crate::meta::{IrMeta, impl_ir_element};
use crate::stmt::IrStatement;
use crate::types::IrType;
use serde::{Deserialize, Serialize};

/// Source text for a construct that has no structural mapping, tagged with the
/// language it is written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrFallback {
    pub language: String,
    pub text: String,
}

impl IrFallback {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// Looks up the fallback text for `language`.
pub fn fallback_for<'a>(fallback: &'a [IrFallback], language: &str) -> Option<&'a str> {
    fallback
        .iter()
        .find(|f| f.language == language)
        .map(|f| f.text.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrExpression {
    pub kind: IrExpressionKind,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrExpressionKind {
    /// Nothing; e.g. an omitted `for` condition.
    Empty,
    /// Integer, float, string, char, boolean or null literal, in source spelling.
    Literal { value: String },
    /// A (possibly qualified) name: `x`, `this`, `System.out`.
    Identifier {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        qualifier: Option<Box<IrExpression>>,
        name: String,
    },
    /// A reference to a type used as a value (`String.class` receiver, static calls).
    TypeReference { referenced: IrType },
    PropertyAccess {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<Box<IrExpression>>,
        name: String,
    },
    MethodCall {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<Box<IrExpression>>,
        name: String,
        #[serde(default)]
        arguments: Vec<IrExpression>,
        #[serde(default)]
        call_kind: IrCallKind,
    },
    ObjectCreation {
        class_name: String,
        #[serde(default)]
        type_arguments: Vec<IrType>,
        #[serde(default)]
        arguments: Vec<IrExpression>,
    },
    Binary {
        left: Box<IrExpression>,
        operator: IrBinaryOperator,
        right: Box<IrExpression>,
    },
    Unary {
        operator: IrUnaryOperator,
        operand: Box<IrExpression>,
        prefix: bool,
    },
    Assignment {
        target: Box<IrExpression>,
        operator: IrAssignmentOperator,
        value: Box<IrExpression>,
    },
    Ternary {
        condition: Box<IrExpression>,
        if_true: Box<IrExpression>,
        if_false: Box<IrExpression>,
    },
    Cast {
        expression: Box<IrExpression>,
        target: IrType,
    },
    TypeCheck {
        expression: Box<IrExpression>,
        checked: IrType,
    },
    Lambda {
        parameters: Vec<String>,
        body: Vec<IrStatement>,
    },
    Parenthesized { expression: Box<IrExpression> },
    /// Graceful-degradation node: source text only, no structure.
    Unknown { fallback: Vec<IrFallback> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrCallKind {
    #[default]
    Default,
    /// `this(...)` constructor delegation.
    This,
    /// `super(...)` constructor delegation.
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrBinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    And,
    Or,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
}

impl IrBinaryOperator {
    /// C-family spelling shared by Java, Kotlin and Swift for most operators.
    pub fn symbol(&self) -> &'static str {
        match self {
            IrBinaryOperator::Plus => "+",
            IrBinaryOperator::Minus => "-",
            IrBinaryOperator::Multiply => "*",
            IrBinaryOperator::Divide => "/",
            IrBinaryOperator::Modulo => "%",
            IrBinaryOperator::Equals => "==",
            IrBinaryOperator::NotEquals => "!=",
            IrBinaryOperator::Greater => ">",
            IrBinaryOperator::GreaterOrEqual => ">=",
            IrBinaryOperator::Less => "<",
            IrBinaryOperator::LessOrEqual => "<=",
            IrBinaryOperator::And => "&&",
            IrBinaryOperator::Or => "||",
            IrBinaryOperator::BitwiseAnd => "&",
            IrBinaryOperator::BitwiseOr => "|",
            IrBinaryOperator::BitwiseXor => "^",
            IrBinaryOperator::ShiftLeft => "<<",
            IrBinaryOperator::ShiftRight => ">>",
            IrBinaryOperator::UnsignedShiftRight => ">>>",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => IrBinaryOperator::Plus,
            "-" => IrBinaryOperator::Minus,
            "*" => IrBinaryOperator::Multiply,
            "/" => IrBinaryOperator::Divide,
            "%" => IrBinaryOperator::Modulo,
            "==" => IrBinaryOperator::Equals,
            "!=" => IrBinaryOperator::NotEquals,
            ">" => IrBinaryOperator::Greater,
            ">=" => IrBinaryOperator::GreaterOrEqual,
            "<" => IrBinaryOperator::Less,
            "<=" => IrBinaryOperator::LessOrEqual,
            "&&" => IrBinaryOperator::And,
            "||" => IrBinaryOperator::Or,
            "&" => IrBinaryOperator::BitwiseAnd,
            "|" => IrBinaryOperator::BitwiseOr,
            "^" => IrBinaryOperator::BitwiseXor,
            "<<" => IrBinaryOperator::ShiftLeft,
            ">>" => IrBinaryOperator::ShiftRight,
            ">>>" => IrBinaryOperator::UnsignedShiftRight,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrUnaryOperator {
    Not,
    Plus,
    Minus,
    BitwiseNot,
    Increment,
    Decrement,
}

impl IrUnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            IrUnaryOperator::Not => "!",
            IrUnaryOperator::Plus => "+",
            IrUnaryOperator::Minus => "-",
            IrUnaryOperator::BitwiseNot => "~",
            IrUnaryOperator::Increment => "++",
            IrUnaryOperator::Decrement => "--",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "!" => IrUnaryOperator::Not,
            "+" => IrUnaryOperator::Plus,
            "-" => IrUnaryOperator::Minus,
            "~" => IrUnaryOperator::BitwiseNot,
            "++" => IrUnaryOperator::Increment,
            "--" => IrUnaryOperator::Decrement,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrAssignmentOperator {
    Assign,
    PlusAssign,
    MinusAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
}

impl IrAssignmentOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            IrAssignmentOperator::Assign => "=",
            IrAssignmentOperator::PlusAssign => "+=",
            IrAssignmentOperator::MinusAssign => "-=",
            IrAssignmentOperator::MultiplyAssign => "*=",
            IrAssignmentOperator::DivideAssign => "/=",
            IrAssignmentOperator::ModuloAssign => "%=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => IrAssignmentOperator::Assign,
            "+=" => IrAssignmentOperator::PlusAssign,
            "-=" => IrAssignmentOperator::MinusAssign,
            "*=" => IrAssignmentOperator::MultiplyAssign,
            "/=" => IrAssignmentOperator::DivideAssign,
            "%=" => IrAssignmentOperator::ModuloAssign,
            _ => return None,
        })
    }
}

impl IrExpression {
    pub fn new(kind: IrExpressionKind) -> Self {
        Self {
            kind,
            meta: IrMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: IrMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn empty() -> Self {
        Self::new(IrExpressionKind::Empty)
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(IrExpressionKind::Literal {
            value: value.into(),
        })
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(IrExpressionKind::Identifier {
            qualifier: None,
            name: name.into(),
        })
    }

    pub fn qualified_ident(qualifier: IrExpression, name: impl Into<String>) -> Self {
        Self::new(IrExpressionKind::Identifier {
            qualifier: Some(Box::new(qualifier)),
            name: name.into(),
        })
    }

    pub fn type_reference(referenced: IrType) -> Self {
        Self::new(IrExpressionKind::TypeReference { referenced })
    }

    pub fn property(receiver: Option<IrExpression>, name: impl Into<String>) -> Self {
        Self::new(IrExpressionKind::PropertyAccess {
            receiver: receiver.map(Box::new),
            name: name.into(),
        })
    }

    pub fn call(
        receiver: Option<IrExpression>,
        name: impl Into<String>,
        arguments: Vec<IrExpression>,
    ) -> Self {
        Self::new(IrExpressionKind::MethodCall {
            receiver: receiver.map(Box::new),
            name: name.into(),
            arguments,
            call_kind: IrCallKind::Default,
        })
    }

    /// `this(...)` / `super(...)` constructor delegation.
    pub fn delegation(call_kind: IrCallKind, arguments: Vec<IrExpression>) -> Self {
        let name = match call_kind {
            IrCallKind::Super => "super",
            _ => "this",
        };
        Self::new(IrExpressionKind::MethodCall {
            receiver: None,
            name: name.to_string(),
            arguments,
            call_kind,
        })
    }

    pub fn new_object(class_name: impl Into<String>, arguments: Vec<IrExpression>) -> Self {
        Self::new(IrExpressionKind::ObjectCreation {
            class_name: class_name.into(),
            type_arguments: Vec::new(),
            arguments,
        })
    }

    pub fn binary(left: IrExpression, operator: IrBinaryOperator, right: IrExpression) -> Self {
        Self::new(IrExpressionKind::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn unary(operator: IrUnaryOperator, operand: IrExpression, prefix: bool) -> Self {
        Self::new(IrExpressionKind::Unary {
            operator,
            operand: Box::new(operand),
            prefix,
        })
    }

    pub fn assign(
        target: IrExpression,
        operator: IrAssignmentOperator,
        value: IrExpression,
    ) -> Self {
        Self::new(IrExpressionKind::Assignment {
            target: Box::new(target),
            operator,
            value: Box::new(value),
        })
    }

    pub fn ternary(condition: IrExpression, if_true: IrExpression, if_false: IrExpression) -> Self {
        Self::new(IrExpressionKind::Ternary {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    pub fn cast(expression: IrExpression, target: IrType) -> Self {
        Self::new(IrExpressionKind::Cast {
            expression: Box::new(expression),
            target,
        })
    }

    pub fn type_check(expression: IrExpression, checked: IrType) -> Self {
        Self::new(IrExpressionKind::TypeCheck {
            expression: Box::new(expression),
            checked,
        })
    }

    pub fn lambda(parameters: Vec<String>, body: Vec<IrStatement>) -> Self {
        Self::new(IrExpressionKind::Lambda { parameters, body })
    }

    pub fn parenthesized(expression: IrExpression) -> Self {
        Self::new(IrExpressionKind::Parenthesized {
            expression: Box::new(expression),
        })
    }

    /// An expression with no structural mapping, carrying its source text.
    pub fn unknown(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(IrExpressionKind::Unknown {
            fallback: vec![IrFallback::new(language, text)],
        })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, IrExpressionKind::Unknown { .. })
    }
}

impl_ir_element!(IrExpression);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbols_roundtrip() {
        for op in [
            IrBinaryOperator::Plus,
            IrBinaryOperator::ShiftRight,
            IrBinaryOperator::UnsignedShiftRight,
            IrBinaryOperator::Or,
        ] {
            assert_eq!(IrBinaryOperator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(IrBinaryOperator::from_symbol("?:"), None);
        assert_eq!(
            IrAssignmentOperator::from_symbol("%="),
            Some(IrAssignmentOperator::ModuloAssign)
        );
    }

    #[test]
    fn test_unknown_carries_fallback() {
        let expr = IrExpression::unknown("java", "a -> a + 1");
        assert!(expr.is_unknown());
        match &expr.kind {
            IrExpressionKind::Unknown { fallback } => {
                assert_eq!(fallback_for(fallback, "java"), Some("a -> a + 1"));
                assert_eq!(fallback_for(fallback, "kotlin"), None);
            }
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_delegation_name() {
        let call = IrExpression::delegation(IrCallKind::Super, vec![]);
        match call.kind {
            IrExpressionKind::MethodCall { name, call_kind, .. } => {
                assert_eq!(name, "super");
                assert_eq!(call_kind, IrCallKind::Super);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }
}
