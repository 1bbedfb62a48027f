use std::{
    fmt::{self, Display},
    rc::Rc,
};

use crate::{lexer::tokens::TokenKind, Span};

use super::ast::{write_spaced, NamedNodes, Node};

// LITERALS

/// Symbol Expression
/// Represents an identifier in the AST. This includes functions.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: Rc<str>,
    pub span: Span,
}

impl Display for SymbolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Integer Expression
#[derive(Debug, Clone, PartialEq)]
pub struct IntExpr {
    pub value: i64,
    pub span: Span,
}

impl Display for IntExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Float Expression
#[derive(Debug, Clone, PartialEq)]
pub struct FloatExpr {
    pub value: f64,
    pub span: Span,
}

impl Display for FloatExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

/// String Expression
/// Represents a string literal in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub value: Rc<str>,
    pub span: Span,
}

impl Display for StringExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

/// Array Expression
/// `[a, b, c]`, elements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Node>,
    pub span: Span,
}

impl Display for ArrayExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", element)?;
        }
        write!(f, "]")
    }
}

/// Hash Expression
/// `{ key: value, ... }`. A repeated key keeps its first position and its last value.
#[derive(Debug, Clone, PartialEq)]
pub struct HashExpr {
    pub pairs: NamedNodes,
    pub span: Span,
}

impl Display for HashExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

// COMPLEX

/// Unary Expression
/// Represents a prefix (`-x`, `!x`, `not x`) or postfix (`x++`) operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: TokenKind,
    pub operand: Box<Node>,
    pub is_postfix: bool,
    pub span: Span,
}

impl Display for UnaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_postfix {
            write!(f, "({} {})", self.operand, self.operator.symbol())
        } else {
            write!(f, "({} {})", self.operator.symbol(), self.operand)
        }
    }
}

/// Binary Expression
/// Represents a binary operation between two expressions in the AST.
///
/// This includes assignments (`a = b`, `a += b`) as well as arithmetic,
/// comparison and logical operations. `is_let_decl` is only ever set on a
/// plain `=` written after `let`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Node>,
    pub operator: TokenKind,
    pub right: Box<Node>,
    pub is_let_decl: bool,
    pub span: Span,
}

impl Display for BinaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_let_decl {
            write!(f, "(let ")?;
        } else {
            write!(f, "(")?;
        }
        write!(f, "{} {} {})", self.operator.symbol(), self.left, self.right)
    }
}

/// Call Expression
/// Represents a function call in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
    pub named_arguments: NamedNodes,
    pub span: Span,
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(call {}", self.callee)?;
        write_spaced(f, &self.arguments)?;
        for (name, value) in self.named_arguments.iter() {
            write!(f, " {}: {}", name, value)?;
        }
        write!(f, ")")
    }
}

/// Slot Expression
/// `object.member` where the member is not itself a call.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotExpr {
    pub object: Box<Node>,
    pub member: Box<Node>,
    pub span: Span,
}

impl Display for SlotExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(. {} {})", self.object, self.member)
    }
}
