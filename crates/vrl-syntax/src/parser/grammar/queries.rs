//! Queries and paths.
//!
//! Path continuation is decided purely on token adjacency: `.field` and `[index]`
//! extend a path only when they touch the preceding token.

use rowan::Checkpoint;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;

impl Parser<'_> {
    /// `.` or `%` root, optionally followed by an adjacent path.
    pub(crate) fn parse_external_query(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::Query);
        self.bump();

        if self.at_first_segment() {
            self.start_node(SyntaxKind::Path);
            if self.currently_is(SyntaxKind::BracketOpen) {
                self.parse_index_segment();
            } else {
                self.start_node(SyntaxKind::FieldSegment);
                self.parse_field_name();
                self.finish_node();
            }
            self.parse_path_segments();
            self.finish_node();
        } else if self.at_path_segment() {
            // `..foo`: a root cannot be followed by a separator
            self.error_msg(
                DiagnosticKind::InvalidPathContinuation,
                "expected a field name or index right after the path root",
            );
            self.start_node(SyntaxKind::Path);
            self.parse_path_segments();
            self.finish_node();
        }

        self.finish_node();
        SyntaxKind::Query
    }

    /// A field name, string or `[` touching the root token.
    fn at_first_segment(&mut self) -> bool {
        let kind = self.current();
        let starts_segment = kind.is_field_name()
            || kind == SyntaxKind::DoubleQuote
            || kind == SyntaxKind::BracketOpen;
        starts_segment && self.current_is_immediate()
    }

    /// Adjacent `.` or `[` after a term.
    fn at_path_segment(&mut self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::Dot | SyntaxKind::BracketOpen
        ) && self.current_is_immediate()
    }

    /// Wraps an identifier, call or container in a `Query` when a path touches it.
    pub(crate) fn parse_path_continuation(
        &mut self,
        checkpoint: Checkpoint,
        kind: SyntaxKind,
    ) -> SyntaxKind {
        let can_root = matches!(
            kind,
            SyntaxKind::Ident
                | SyntaxKind::FunctionCall
                | SyntaxKind::Group
                | SyntaxKind::Block
                | SyntaxKind::Array
                | SyntaxKind::Object
        );
        if !can_root || !self.at_path_segment() {
            return kind;
        }

        self.start_node_at(checkpoint, SyntaxKind::Query);
        self.start_node(SyntaxKind::Path);
        self.parse_path_segments();
        self.finish_node();
        self.finish_node();
        SyntaxKind::Query
    }

    fn parse_path_segments(&mut self) {
        while self.at_path_segment() {
            if self.currently_is(SyntaxKind::Dot) {
                self.parse_field_segment();
            } else {
                self.parse_index_segment();
            }
        }
    }

    /// `.name` or `."quoted name"`; the name must touch the dot.
    fn parse_field_segment(&mut self) {
        self.start_node(SyntaxKind::FieldSegment);
        self.assert_current(SyntaxKind::Dot);
        self.bump();

        let kind = self.current();
        let is_name = kind.is_field_name() || kind == SyntaxKind::DoubleQuote;
        if is_name && self.current_is_immediate() {
            self.parse_field_name();
        } else {
            self.error_found(
                DiagnosticKind::InvalidPathContinuation,
                "expected a field name right after `.`",
            );
        }

        self.finish_node();
    }

    fn parse_field_name(&mut self) {
        if self.currently_is(SyntaxKind::DoubleQuote) {
            self.parse_string();
        } else {
            self.bump();
        }
    }

    /// `[integer]`, where the integer may be negative.
    fn parse_index_segment(&mut self) {
        self.start_node(SyntaxKind::IndexSegment);
        self.push_delimiter(SyntaxKind::BracketOpen);
        self.bump();
        self.skip_newlines();

        match self.current() {
            SyntaxKind::Integer => self.bump(),
            SyntaxKind::Minus if self.negative_number_follows(SyntaxKind::Integer) => {
                self.bump();
                self.bump();
            }
            _ => {
                self.error_found(
                    DiagnosticKind::UnexpectedToken,
                    "path index must be an integer",
                );
            }
        }

        self.skip_newlines();
        self.close_delimiter(SyntaxKind::BracketClose);
        self.finish_node();
    }

    /// Current `-` is directly followed by a number of `kind`.
    pub(crate) fn negative_number_follows(&self, kind: SyntaxKind) -> bool {
        self.nth_token(1)
            .is_some_and(|t| t.kind == kind && t.immediate)
    }
}
