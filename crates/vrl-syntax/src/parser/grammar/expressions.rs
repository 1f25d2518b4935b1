//! Precedence climbing over the binary operator table.

use rowan::Checkpoint;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::ast::BinaryOperator;
use crate::parser::core::describe;
use crate::parser::cst::SyntaxKind;

/// Binding power of a binary operator token; higher binds tighter.
pub(super) fn infix_binding_power(kind: SyntaxKind) -> Option<u8> {
    BinaryOperator::from_kind(kind).map(|op| op.precedence())
}

impl Parser<'_> {
    /// `arithmetic`: the full operator grammar, without assignments.
    pub(crate) fn parse_arithmetic(&mut self) -> SyntaxKind {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_bp: u8) -> SyntaxKind {
        let checkpoint = self.checkpoint();
        let lhs = self.parse_unary();
        self.parse_binary_rest(checkpoint, min_bp, lhs)
    }

    /// Folds operators of at least `min_bp` onto the operand started at `checkpoint`.
    /// Operands of the same level are parsed with `bp + 1`, which makes every
    /// operator left-associative.
    ///
    /// Each fold nests the tree one level deeper, so folds stay counted against
    /// the recursion limit until the whole chain is parsed.
    pub(crate) fn parse_binary_rest(
        &mut self,
        checkpoint: Checkpoint,
        min_bp: u8,
        mut lhs: SyntaxKind,
    ) -> SyntaxKind {
        let mut folds = 0;
        loop {
            let Some(bp) = infix_binding_power(self.current()) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            if !self.enter_recursion() {
                lhs = SyntaxKind::Error;
                break;
            }
            folds += 1;

            self.start_node_at(checkpoint, SyntaxKind::BinaryOp);
            self.bump();
            self.skip_newlines();
            self.parse_binary(bp + 1);
            self.finish_node();

            lhs = SyntaxKind::BinaryOp;
        }
        for _ in 0..folds {
            self.exit_recursion();
        }
        lhs
    }

    /// `!` operand, binding tighter than any binary operator.
    fn parse_unary(&mut self) -> SyntaxKind {
        self.skip_newlines();
        if !self.currently_is(SyntaxKind::Bang) {
            return self.parse_term();
        }
        if !self.enter_recursion() {
            return SyntaxKind::Error;
        }

        self.start_node(SyntaxKind::UnaryOp);
        self.bump();
        self.skip_newlines();
        self.parse_unary();
        self.finish_node();

        self.exit_recursion();
        SyntaxKind::UnaryOp
    }

    /// Primary term, including any path continuation of an internal query root.
    pub(crate) fn parse_term(&mut self) -> SyntaxKind {
        if !self.enter_recursion() {
            return SyntaxKind::Error;
        }

        let checkpoint = self.checkpoint();
        let kind = match self.current() {
            SyntaxKind::Dot | SyntaxKind::Percent => self.parse_external_query(),
            SyntaxKind::Integer
            | SyntaxKind::Float
            | SyntaxKind::Minus
            | SyntaxKind::DoubleQuote
            | SyntaxKind::RawString
            | SyntaxKind::Regex
            | SyntaxKind::Timestamp
            | SyntaxKind::KwTrue
            | SyntaxKind::KwFalse
            | SyntaxKind::KwNull => self.parse_literal(),
            SyntaxKind::ParenOpen => self.parse_group(),
            SyntaxKind::BracketOpen => self.parse_array(),
            SyntaxKind::BraceOpen if self.at_object_start() => self.parse_object(),
            SyntaxKind::BraceOpen => self.parse_block(),
            SyntaxKind::Id => self.parse_ident_or_call(),
            _ => {
                self.error_expected_expression();
                SyntaxKind::Error
            }
        };
        let kind = self.parse_path_continuation(checkpoint, kind);

        self.exit_recursion();
        kind
    }

    /// Reports a missing operand. Tokens that can end or separate something are
    /// left for the caller; anything else is consumed as an error.
    fn error_expected_expression(&mut self) {
        let kind = self.current();
        let message = match kind {
            SyntaxKind::Underscore => "`_` can only be an assignment target".to_string(),
            SyntaxKind::PathField => "`@` is only valid in a path field".to_string(),
            _ => format!("found {}", describe(kind)),
        };

        match kind {
            SyntaxKind::Newline
            | SyntaxKind::Semicolon
            | SyntaxKind::Comma
            | SyntaxKind::Colon
            | SyntaxKind::ParenClose
            | SyntaxKind::BracketClose
            | SyntaxKind::BraceClose => {
                self.error_msg(DiagnosticKind::ExpectedExpression, message);
            }
            _ if self.eof() => self.error(DiagnosticKind::ExpectedExpression),
            _ => self.error_and_bump_msg(DiagnosticKind::ExpectedExpression, message),
        }
    }
}
