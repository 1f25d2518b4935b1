//! Parser infrastructure for the remap language.
//!
//! # Architecture
//!
//! This parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder.
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Adjacency: every token knows whether it touches the previous one, which is all
//!   path continuation needs
//! - Checkpoint-based wrapping: binary operators, assignments and queries wrap their
//!   already-parsed left side
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree. Recovery follows these rules:
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. A broken statement is skipped up to the next newline, `;` or enclosing `}`
//! 4. On recursion limit, remaining input goes into single Error node
//!
//! Only exec fuel exhaustion returns an actual error.

pub mod ast;
pub mod cst;
pub mod lexer;
pub mod printer;

mod core;
mod grammar;
mod invariants;

#[cfg(test)]
mod tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

pub use ast::{
    Abort, Argument, Array, AssignOperator, Assignee, Assignment, BinaryOp, BinaryOperator,
    Block, BooleanLit, Closure, Entry, Expr, FieldSegment, FloatLit, FunctionCall, Group,
    Ident, IfStatement, IndexSegment, IntegerLit, Literal, NamedArgument, Noop, NullLit, Object,
    Path, PathSegment, Predicate, Program, Query, QueryRoot, RawStringLit, RegexLit, Return,
    StringLit, StringSegment, Target, TimestampLit, UnaryOp,
};
pub use printer::SyntaxPrinter;

pub use core::Parser;
pub(crate) use core::DEFAULT_RECURSION_LIMIT;
