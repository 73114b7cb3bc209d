// Session command parser

pub mod ast;
pub mod command;
pub mod lexer;

// Public API re-exports
pub use ast::Command;
pub use command::{parse_line, parse_session_line};
