/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Node` family, node kinds and ordered name mappings
/// - expressions: Definitions for the expression nodes
/// - statements: Definitions for blocks, control flow and declarations
pub mod ast;
pub mod expressions;
pub mod statements;
