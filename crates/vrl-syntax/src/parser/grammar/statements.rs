use rowan::TextRange;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::core::describe;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{ARITHMETIC_FIRST, ASSIGN_OPERATORS, STATEMENT_FIRST};

impl Parser<'_> {
    pub fn parse_program(&mut self) {
        self.start_node(SyntaxKind::Program);
        self.parse_statements(None);
        self.eat_trivia();
        self.finish_node();
        self.assert_balanced_delimiters();
    }

    /// Statement sequence of a program (`closer` is `None`) or a block body.
    pub(crate) fn parse_statements(&mut self, closer: Option<SyntaxKind>) {
        loop {
            self.skip_newlines();
            if self.should_stop() {
                break;
            }

            let kind = self.current();
            if Some(kind) == closer {
                break;
            }

            match kind {
                SyntaxKind::Semicolon => {
                    self.error_and_bump_msg(
                        DiagnosticKind::UnexpectedToken,
                        "`;` must follow an expression",
                    );
                    continue;
                }
                SyntaxKind::ParenClose | SyntaxKind::BracketClose | SyntaxKind::BraceClose => {
                    self.error_and_bump_msg(
                        DiagnosticKind::UnexpectedToken,
                        format!("unmatched {}", describe(kind)),
                    );
                    continue;
                }
                _ if !STATEMENT_FIRST.contains(kind) => {
                    self.error_found(DiagnosticKind::ExpectedExpression, "");
                    self.synchronize();
                    continue;
                }
                _ => {}
            }

            self.parse_statement();
            if !self.parse_end_of_statement(closer) {
                self.synchronize();
            }
        }
    }

    /// One or more newlines, or `;` followed by any newlines. The end of the
    /// enclosing sequence also ends a statement.
    fn parse_end_of_statement(&mut self, closer: Option<SyntaxKind>) -> bool {
        if self.should_stop() {
            return true;
        }
        match self.current() {
            SyntaxKind::Newline => {
                self.skip_newlines();
                true
            }
            SyntaxKind::Semicolon => {
                self.bump();
                self.skip_newlines();
                true
            }
            kind if Some(kind) == closer => true,
            _ => {
                self.error_found(DiagnosticKind::MissingSeparator, "");
                false
            }
        }
    }

    /// `if_statement | abort | return | assignment_expr`
    pub(crate) fn parse_statement(&mut self) -> SyntaxKind {
        if !self.enter_recursion() {
            return SyntaxKind::Error;
        }
        let kind = match self.current() {
            SyntaxKind::KwIf => self.parse_if_statement(),
            SyntaxKind::KwAbort => self.parse_abort(),
            SyntaxKind::KwReturn => self.parse_return(),
            _ => self.parse_assignment_expr(),
        };
        self.exit_recursion();
        kind
    }

    /// `if predicate block (else if predicate block)* (else block)?`
    fn parse_if_statement(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::IfStatement);
        self.assert_current(SyntaxKind::KwIf);
        self.bump();
        self.parse_predicate();
        self.skip_newlines();
        self.parse_block();

        // `else` continues the chain only on the line of the closing `}`
        while self.eat_token(SyntaxKind::KwElse) {
            self.skip_newlines();
            if self.eat_token(SyntaxKind::KwIf) {
                self.parse_predicate();
                self.skip_newlines();
                self.parse_block();
            } else {
                self.parse_block();
                break;
            }
        }

        self.finish_node();
        SyntaxKind::IfStatement
    }

    /// Condition of an `if`: an arithmetic expression, or a parenthesized
    /// sequence of assignment expressions whose last one decides the branch.
    fn parse_predicate(&mut self) {
        self.skip_newlines();
        self.start_node(SyntaxKind::Predicate);

        let kind = self.current();
        if kind == SyntaxKind::ParenOpen {
            let checkpoint = self.checkpoint();
            let count = self.parse_predicate_sequence();
            if count == 1 && self.at_operand_continuation() {
                // `(a) || b`: the parentheses were a group operand
                self.start_node_at(checkpoint, SyntaxKind::Group);
                self.finish_node();
                let kind = self.parse_path_continuation(checkpoint, SyntaxKind::Group);
                self.parse_binary_rest(checkpoint, 0, kind);
            }
        } else if ARITHMETIC_FIRST.contains(kind) {
            self.parse_arithmetic();
        } else {
            self.error_found(DiagnosticKind::ExpectedExpression, "`if` needs a condition");
        }

        self.finish_node();
    }

    /// Whether the token after a closed `( ... )` extends it as an operand.
    fn at_operand_continuation(&mut self) -> bool {
        let kind = self.current();
        if super::expressions::infix_binding_power(kind).is_some() {
            return true;
        }
        matches!(kind, SyntaxKind::Dot | SyntaxKind::BracketOpen) && self.current_is_immediate()
    }

    /// `( expr (sep expr)* )` inside a predicate. Returns the number of expressions.
    fn parse_predicate_sequence(&mut self) -> usize {
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();

        let mut count = 0;
        loop {
            self.skip_newlines();
            if self.should_stop() || self.currently_is(SyntaxKind::ParenClose) {
                break;
            }

            let kind = self.current();
            if kind == SyntaxKind::Semicolon {
                self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "`;` must follow an expression",
                );
                continue;
            }
            if !(ARITHMETIC_FIRST.contains(kind) || kind == SyntaxKind::Underscore) {
                self.error_found(DiagnosticKind::ExpectedExpression, "");
                break;
            }

            self.parse_assignment_expr();
            count += 1;

            match self.current() {
                SyntaxKind::Newline => self.skip_newlines(),
                SyntaxKind::Semicolon => {
                    self.bump();
                    self.skip_newlines();
                }
                _ => break,
            }
        }

        self.close_delimiter(SyntaxKind::ParenClose);
        count
    }

    /// `{ statements }`. Also used where only a block is allowed, so `{}` is an empty block.
    pub(crate) fn parse_block(&mut self) -> SyntaxKind {
        if !self.currently_is(SyntaxKind::BraceOpen) {
            self.error_found(DiagnosticKind::UnexpectedToken, "expected `{`");
            return SyntaxKind::Error;
        }

        self.start_node(SyntaxKind::Block);
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump();
        self.with_newlines(true, |p| p.parse_statements(Some(SyntaxKind::BraceClose)));
        self.close_delimiter(SyntaxKind::BraceClose);
        self.finish_node();
        SyntaxKind::Block
    }

    /// `abort expr?`
    fn parse_abort(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::Abort);
        self.bump();
        if self.currently_is_one_of(STATEMENT_FIRST) {
            self.parse_statement();
        }
        self.finish_node();
        SyntaxKind::Abort
    }

    /// `return expr`
    fn parse_return(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::Return);
        self.bump();
        self.skip_newlines();
        let kind = self.current();
        if STATEMENT_FIRST.contains(kind) {
            self.parse_statement();
        } else {
            self.error_found(DiagnosticKind::ExpectedExpression, "`return` needs a value");
        }
        self.finish_node();
        SyntaxKind::Return
    }

    /// `assignment | arithmetic`, where an assignment is `target op expr` or
    /// `ok_target, err_target op expr`.
    pub(crate) fn parse_assignment_expr(&mut self) -> SyntaxKind {
        let start = self.current_span().start();
        let checkpoint = self.checkpoint();
        let lhs = self.parse_assign_operand();
        let lhs_range = self.range_from(start);

        match self.current() {
            kind if ASSIGN_OPERATORS.contains(kind) => {
                self.validate_assign_target(lhs, lhs_range);
                self.start_node_at(checkpoint, SyntaxKind::Assignment);
                self.bump();
                self.parse_assignment_value();
                self.finish_node();
                SyntaxKind::Assignment
            }
            SyntaxKind::Comma => {
                self.validate_assign_target(lhs, lhs_range);
                self.start_node_at(checkpoint, SyntaxKind::InfallibleTarget);
                self.bump();
                self.skip_newlines();
                let err_start = self.current_span().start();
                let err = self.parse_assign_operand();
                let err_range = self.range_from(err_start);
                self.validate_assign_target(err, err_range);
                self.finish_node();

                self.start_node_at(checkpoint, SyntaxKind::Assignment);
                if self.currently_is_one_of(ASSIGN_OPERATORS) {
                    self.bump();
                    self.parse_assignment_value();
                } else {
                    self.error_found(
                        DiagnosticKind::UnexpectedToken,
                        "expected `=` or `|=` after assignment targets",
                    );
                }
                self.finish_node();
                SyntaxKind::Assignment
            }
            _ => {
                if lhs == SyntaxKind::Noop {
                    self.error_at(
                        DiagnosticKind::InvalidAssignmentTarget,
                        lhs_range,
                        "`_` can only be assigned to",
                    );
                }
                lhs
            }
        }
    }

    /// `_` (as a `Noop` node) or an arithmetic expression.
    fn parse_assign_operand(&mut self) -> SyntaxKind {
        if self.currently_is(SyntaxKind::Underscore) {
            self.start_node(SyntaxKind::Noop);
            self.bump();
            self.finish_node();
            return SyntaxKind::Noop;
        }
        self.parse_arithmetic()
    }

    fn parse_assignment_value(&mut self) {
        self.skip_newlines();
        let kind = self.current();
        if STATEMENT_FIRST.contains(kind) {
            self.parse_statement();
        } else {
            self.error_found(DiagnosticKind::ExpectedExpression, "");
        }
    }

    /// Range from `start` to the end of the last consumed token.
    pub(crate) fn range_from(&self, start: rowan::TextSize) -> TextRange {
        let end = self.last_non_trivia_end().unwrap_or(start).max(start);
        TextRange::new(start, end)
    }
}
