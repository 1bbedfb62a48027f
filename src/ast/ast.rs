use std::{
    fmt::{self, Display},
    rc::Rc,
};

use crate::Span;

use super::{
    expressions::{
        ArrayExpr, BinaryExpr, CallExpr, FloatExpr, HashExpr, IntExpr, SlotExpr, StringExpr,
        SymbolExpr, UnaryExpr,
    },
    statements::{BlockStmt, FnDeclStmt, IfStmt, ReturnStmt, TypeDeclStmt, WhileStmt},
};

/// Node Types
///
/// Defines the various kinds of nodes in the AST.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum NodeType {
    Identifier,
    Int,
    Float,
    String,
    Array,
    Hash,
    Unary,
    Binary,
    Call,
    Slot,
    Block,
    If,
    While,
    Return,
    FnDecl,
    TypeDecl,
}

/// A node of the program tree.
///
/// Every node owns its children; a tree is built bottom-up by the parser
/// and never shares subtrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Identifier(SymbolExpr),
    Int(IntExpr),
    Float(FloatExpr),
    String(StringExpr),
    Array(ArrayExpr),
    Hash(HashExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Slot(SlotExpr),
    Block(BlockStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    FnDecl(FnDeclStmt),
    TypeDecl(TypeDeclStmt),
}

impl Node {
    pub fn get_node_type(&self) -> NodeType {
        match self {
            Node::Identifier(_) => NodeType::Identifier,
            Node::Int(_) => NodeType::Int,
            Node::Float(_) => NodeType::Float,
            Node::String(_) => NodeType::String,
            Node::Array(_) => NodeType::Array,
            Node::Hash(_) => NodeType::Hash,
            Node::Unary(_) => NodeType::Unary,
            Node::Binary(_) => NodeType::Binary,
            Node::Call(_) => NodeType::Call,
            Node::Slot(_) => NodeType::Slot,
            Node::Block(_) => NodeType::Block,
            Node::If(_) => NodeType::If,
            Node::While(_) => NodeType::While,
            Node::Return(_) => NodeType::Return,
            Node::FnDecl(_) => NodeType::FnDecl,
            Node::TypeDecl(_) => NodeType::TypeDecl,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            Node::Identifier(node) => &node.span,
            Node::Int(node) => &node.span,
            Node::Float(node) => &node.span,
            Node::String(node) => &node.span,
            Node::Array(node) => &node.span,
            Node::Hash(node) => &node.span,
            Node::Unary(node) => &node.span,
            Node::Binary(node) => &node.span,
            Node::Call(node) => &node.span,
            Node::Slot(node) => &node.span,
            Node::Block(node) => &node.span,
            Node::If(node) => &node.span,
            Node::While(node) => &node.span,
            Node::Return(node) => &node.span,
            Node::FnDecl(node) => &node.span,
            Node::TypeDecl(node) => &node.span,
        }
    }

    /// The identifier text when this node is a bare identifier.
    pub fn as_identifier(&self) -> Option<&Rc<str>> {
        match self {
            Node::Identifier(symbol) => Some(&symbol.value),
            _ => None,
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Identifier(node) => write!(f, "{}", node),
            Node::Int(node) => write!(f, "{}", node),
            Node::Float(node) => write!(f, "{}", node),
            Node::String(node) => write!(f, "{}", node),
            Node::Array(node) => write!(f, "{}", node),
            Node::Hash(node) => write!(f, "{}", node),
            Node::Unary(node) => write!(f, "{}", node),
            Node::Binary(node) => write!(f, "{}", node),
            Node::Call(node) => write!(f, "{}", node),
            Node::Slot(node) => write!(f, "{}", node),
            Node::Block(node) => write!(f, "{}", node),
            Node::If(node) => write!(f, "{}", node),
            Node::While(node) => write!(f, "{}", node),
            Node::Return(node) => write!(f, "{}", node),
            Node::FnDecl(node) => write!(f, "{}", node),
            Node::TypeDecl(node) => write!(f, "{}", node),
        }
    }
}

/// Insertion-ordered name to node mapping with unique keys.
///
/// Used for hash literal pairs and named call arguments. Inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedNodes {
    entries: Vec<(Rc<str>, Node)>,
}

impl NamedNodes {
    pub fn new() -> Self {
        NamedNodes::default()
    }

    /// Returns the replaced value, if any.
    pub fn insert(&mut self, key: Rc<str>, value: Node) -> Option<Node> {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_ref() == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Node)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }
}

/// Writes each node preceded by a space.
pub(crate) fn write_spaced<'a>(
    f: &mut fmt::Formatter<'_>,
    nodes: impl IntoIterator<Item = &'a Node>,
) -> fmt::Result {
    for node in nodes {
        write!(f, " {}", node)?;
    }
    Ok(())
}
