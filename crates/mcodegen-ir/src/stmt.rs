//! Statements.

use crate::expr::{IrExpression, IrFallback};
use crate::meta::{IrMeta, impl_ir_element};
use crate::types::IrType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrStatement {
    pub kind: IrStatementKind,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrStatementKind {
    Empty,
    Expression {
        expression: IrExpression,
    },
    VariableDeclaration {
        name: String,
        #[serde(rename = "variable_type")]
        ty: IrType,
        /// Extra declarators sharing the type: `int a, b, c;`.
        #[serde(default)]
        additional_names: Vec<String>,
        mutable: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initializer: Option<Box<IrStatement>>,
    },
    Block {
        statements: Vec<IrStatement>,
    },
    If {
        condition: IrExpression,
        then_branch: Box<IrStatement>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_branch: Option<Box<IrStatement>>,
    },
    For {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initializer: Option<Box<IrStatement>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<IrExpression>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        update: Option<Box<IrStatement>>,
        body: Box<IrStatement>,
    },
    /// `for (T x : items)` / `for x in items`.
    ForEach {
        variable: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variable_type: Option<IrType>,
        iterable: IrExpression,
        body: Box<IrStatement>,
    },
    While {
        condition: IrExpression,
        body: Box<IrStatement>,
    },
    DoWhile {
        body: Box<IrStatement>,
        condition: IrExpression,
    },
    Switch {
        expression: IrExpression,
        cases: Vec<IrSwitchCase>,
    },
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expression: Option<IrExpression>,
    },
    Break,
    Continue,
    Throw {
        expression: IrExpression,
    },
    TryCatch {
        try_block: Box<IrStatement>,
        #[serde(default)]
        catch_clauses: Vec<IrCatchClause>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finally_block: Option<Box<IrStatement>>,
    },
    /// Graceful-degradation node: source text only, no structure.
    Unknown {
        fallback: Vec<IrFallback>,
    },
}

/// One `case`/`when` branch. Empty `matches` is the default branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrSwitchCase {
    #[serde(default)]
    pub matches: Vec<IrExpression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<IrStatement>,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

/// A catch clause; multi-catch lists several exception types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrCatchClause {
    pub exception_types: Vec<IrType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<IrStatement>,
    #[serde(default, skip_serializing_if = "IrMeta::is_empty")]
    pub meta: IrMeta,
}

impl IrStatement {
    pub fn new(kind: IrStatementKind) -> Self {
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
        Self::new(IrStatementKind::Empty)
    }

    pub fn expr(expression: IrExpression) -> Self {
        Self::new(IrStatementKind::Expression { expression })
    }

    pub fn var(
        name: impl Into<String>,
        ty: IrType,
        mutable: bool,
        initializer: Option<IrStatement>,
    ) -> Self {
        Self::new(IrStatementKind::VariableDeclaration {
            name: name.into(),
            ty,
            additional_names: Vec::new(),
            mutable,
            initializer: initializer.map(Box::new),
        })
    }

    pub fn block(statements: Vec<IrStatement>) -> Self {
        Self::new(IrStatementKind::Block { statements })
    }

    pub fn if_stmt(
        condition: IrExpression,
        then_branch: IrStatement,
        else_branch: Option<IrStatement>,
    ) -> Self {
        Self::new(IrStatementKind::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }

    pub fn while_loop(condition: IrExpression, body: IrStatement) -> Self {
        Self::new(IrStatementKind::While {
            condition,
            body: Box::new(body),
        })
    }

    pub fn return_stmt(expression: Option<IrExpression>) -> Self {
        Self::new(IrStatementKind::Return { expression })
    }

    pub fn break_stmt() -> Self {
        Self::new(IrStatementKind::Break)
    }

    pub fn continue_stmt() -> Self {
        Self::new(IrStatementKind::Continue)
    }

    pub fn throw(expression: IrExpression) -> Self {
        Self::new(IrStatementKind::Throw { expression })
    }

    /// A statement with no structural mapping, carrying its source text.
    pub fn unknown(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(IrStatementKind::Unknown {
            fallback: vec![IrFallback::new(language, text)],
        })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, IrStatementKind::Unknown { .. })
    }

    /// The wrapped expression of an expression statement.
    pub fn as_expression(&self) -> Option<&IrExpression> {
        match &self.kind {
            IrStatementKind::Expression { expression } => Some(expression),
            _ => None,
        }
    }
}

impl_ir_element!(IrStatement, IrSwitchCase, IrCatchClause);
