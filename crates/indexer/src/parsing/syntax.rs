//! Language-neutral view of one parsed source file.
//!
//! The parser lowers its concrete tree into these variants so extraction can
//! be written as plain pattern matches, independent of the grammar's node
//! names.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load grammar: {0}")]
    Language(String),
    #[error("parser returned no tree")]
    NoTree,
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

pub trait SyntaxParser {
    fn parse(&mut self, source: &str) -> Result<SyntaxTree, ParseError>;
}

/// Top-level declarations of a file, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxTree {
    pub nodes: Vec<SyntaxNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    Package(String),
    Import(ImportNode),
    Type(TypeNode),
    Field(FieldNode),
    Method(MethodNode),
    /// Anything extraction ignores, tagged with the grammar's node kind.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportNode {
    pub path: String,
    pub is_static: bool,
    pub wildcard: bool,
}

impl ImportNode {
    /// The import as written, with `.*` for on-demand imports.
    pub fn raw_path(&self) -> String {
        if self.wildcard {
            format!("{}.*", self.path)
        } else {
            self.path.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeNodeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub name: String,
    pub superclass: Option<String>,
    /// `implements` targets of classes, enums and records; `extends`
    /// targets of interfaces.
    pub super_interfaces: Vec<String>,
    pub members: Vec<SyntaxNode>,
}

/// One declaration statement; `int a, b;` has two names.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub type_text: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodNode {
    pub name: String,
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterNode>,
    pub documentation: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub name: String,
    pub type_text: String,
}
