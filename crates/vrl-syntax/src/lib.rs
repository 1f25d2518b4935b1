//! Lexer, parser and typed syntax tree for the Vector Remap Language.
//!
//! # Example
//!
//! ```
//! use vrl_syntax::parser::Expr;
//!
//! let result = vrl_syntax::parse(".status = 200");
//! assert!(result.diagnostics.is_empty());
//!
//! let Some(Expr::Assignment(assign)) = result.program.statements().next() else {
//!     panic!("expected an assignment");
//! };
//! assert!(assign.value().is_some());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod parser;

#[cfg(test)]
mod dump;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, ErrorClass, Location, Severity};

use parser::ast::Program;
use parser::cst::SyntaxNode;
use parser::lexer::{lex, lex_validating_regex};
use parser::{DEFAULT_RECURSION_LIMIT, Parser, SyntaxPrinter};

/// Errors that can occur while parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many tokens consumed).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    #[error("parsing failed with {} errors", .0.error_count())]
    Syntax(Diagnostics),
}

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A parsed program and everything reported while parsing it.
///
/// The program is always present, even when diagnostics were reported;
/// recovered regions show up as `Error` nodes in the tree.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Diagnostics,
}

impl ParseResult {
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    /// The program, or `Error::Syntax` when any error was reported.
    pub fn into_program(self) -> Result<Program> {
        if self.diagnostics.has_errors() {
            return Err(Error::Syntax(self.diagnostics));
        }
        Ok(self.program)
    }

    pub fn syntax(&self) -> &SyntaxNode {
        self.program.as_cst()
    }

    pub fn printer(&self) -> SyntaxPrinter<'_> {
        SyntaxPrinter::new(&self.program)
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    exec_fuel: Option<u32>,
    recursion_limit: u32,
    validate_regex: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            exec_fuel: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            validate_regex: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on consumed tokens. `None` means unlimited.
    pub fn exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel = limit;
        self
    }

    /// Maximum nesting depth.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Reports regex literals whose pattern does not parse. Off by default.
    pub fn validate_regex(mut self, value: bool) -> Self {
        self.validate_regex = value;
        self
    }

    pub fn parse(&self, source: &str) -> Result<ParseResult> {
        tracing::debug!(len = source.len(), "parsing");

        let lexed = if self.validate_regex {
            lex_validating_regex(source)
        } else {
            lex(source)
        };
        let token_count = lexed.tokens.len();
        let parser = Parser::new(source, lexed.tokens)
            .with_exec_fuel(self.exec_fuel)
            .with_recursion_limit(self.recursion_limit);

        let (cst, parse_diagnostics) = parser.parse().inspect_err(|err| {
            tracing::debug!(%err, "parse aborted");
        })?;

        let mut diagnostics = lexed.diagnostics;
        diagnostics.extend(parse_diagnostics);
        diagnostics.sort_by_position();
        diagnostics.locate(source);

        let program =
            Program::cast(SyntaxNode::new_root(cst)).expect("parser always produces Program");

        tracing::debug!(
            tokens = token_count,
            diagnostics = diagnostics.len(),
            "parsed"
        );

        Ok(ParseResult {
            program,
            diagnostics,
        })
    }
}

/// Parses `source` with default options. Never fails; problems are reported
/// as diagnostics next to the recovered program.
pub fn parse(source: &str) -> ParseResult {
    match ParseOptions::new().parse(source) {
        Ok(result) => result,
        Err(err) => unreachable!("parsing without exec fuel cannot abort: {err}"),
    }
}
