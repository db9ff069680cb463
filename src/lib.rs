pub mod ast;
pub mod compiler;
pub mod errors;
pub mod hir;
pub mod lexer;
pub mod operator;
pub mod parser;
pub mod symbol;
pub mod token;

pub use crate::compiler::{compile, parse_source};
