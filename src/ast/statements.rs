use std::{
    fmt::{self, Display},
    rc::Rc,
    slice::Iter,
};

use crate::Span;

use super::ast::{write_spaced, Node};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Node>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Node> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(block")?;
        write_spaced(f, &self.body)?;
        write!(f, ")")
    }
}

/// `if`/`unless` with its `else if` chain and optional `else`.
///
/// `negate` is set for `unless`. Else-if clauses are themselves `IfStmt`s
/// with no clauses of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub negate: bool,
    pub condition: Box<Node>,
    pub then_body: BlockStmt,
    pub else_ifs: Vec<IfStmt>,
    pub else_body: Option<BlockStmt>,
    pub span: Span,
}

impl Display for IfStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.negate { "unless" } else { "if" };
        write!(f, "({} {} {}", keyword, self.condition, self.then_body)?;
        for clause in &self.else_ifs {
            write!(f, " (else-if {} {})", clause.condition, clause.then_body)?;
        }
        if let Some(else_body) = &self.else_body {
            write!(f, " (else {})", else_body)?;
        }
        write!(f, ")")
    }
}

/// `while`/`until` loop; `negate` is set for `until`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub negate: bool,
    pub condition: Box<Node>,
    pub body: BlockStmt,
    pub span: Span,
}

impl Display for WhileStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.negate { "until" } else { "while" };
        write!(f, "({} {} {})", keyword, self.condition, self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Box<Node>,
    pub span: Span,
}

impl Display for ReturnStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(return {})", self.value)
    }
}

/// One `name: type (= default)?` entry of a function's parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: Rc<str>,
    pub type_name: Rc<str>,
    pub default: Option<Node>,
    pub span: Span,
}

impl Display for ParamDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {}", self.name, self.type_name)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub identifier: Rc<str>,
    pub return_type: Option<Rc<str>>,
    pub body: BlockStmt,
    pub parameters: Vec<ParamDecl>,
    pub span: Span,
}

impl Display for FnDeclStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(def {}", self.identifier)?;
        for parameter in &self.parameters {
            write!(f, " {}", parameter)?;
        }
        if let Some(return_type) = &self.return_type {
            write!(f, " -> {}", return_type)?;
        }
        write!(f, " {})", self.body)
    }
}

/// A `field: type` line of a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Rc<str>,
    pub type_name: Rc<str>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclStmt {
    pub name: Rc<str>,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

impl Display for TypeDeclStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(type {}", self.name)?;
        for field in &self.fields {
            write!(f, " ({}: {})", field.name, field.type_name)?;
        }
        write!(f, ")")
    }
}
