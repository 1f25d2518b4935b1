//! Containers, groups, function calls and closures.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::ARITHMETIC_FIRST;

impl Parser<'_> {
    /// `( assignment_expr )`. Newlines inside are insignificant.
    pub(crate) fn parse_group(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::Group);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();

        self.with_newlines(false, |p| {
            let kind = p.current();
            if ARITHMETIC_FIRST.contains(kind) || kind == SyntaxKind::Underscore {
                p.parse_assignment_expr();
            } else {
                p.error_found(DiagnosticKind::ExpectedExpression, "");
            }
            p.close_delimiter(SyntaxKind::ParenClose);
        });

        self.finish_node();
        SyntaxKind::Group
    }

    /// `[ arithmetic, ... ]`
    pub(crate) fn parse_array(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::Array);
        self.push_delimiter(SyntaxKind::BracketOpen);
        self.bump();
        self.with_newlines(true, |p| {
            p.parse_comma_list(SyntaxKind::BracketClose, Self::parse_arithmetic_item);
            p.close_delimiter(SyntaxKind::BracketClose);
        });
        self.finish_node();
        SyntaxKind::Array
    }

    /// `{ "key": arithmetic, ... }`
    pub(crate) fn parse_object(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::Object);
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump();
        self.with_newlines(true, |p| {
            p.parse_comma_list(SyntaxKind::BraceClose, Self::parse_entry);
            p.close_delimiter(SyntaxKind::BraceClose);
        });
        self.finish_node();
        SyntaxKind::Object
    }

    /// `{` opens an object when it is empty, or when its first item is a
    /// complete string literal followed by `:`. Anything else is a block.
    pub(crate) fn at_object_start(&mut self) -> bool {
        self.assert_current(SyntaxKind::BraceOpen);
        let Some(first) = self.next_significant(self.pos + 1, true) else {
            return false;
        };
        match self.tokens[first].kind {
            SyntaxKind::BraceClose => true,
            SyntaxKind::DoubleQuote => {
                let mut i = first + 1;
                while i < self.tokens.len() && self.tokens[i].kind != SyntaxKind::DoubleQuote {
                    if self.tokens[i].kind == SyntaxKind::Newline {
                        return false;
                    }
                    i += 1;
                }
                if i >= self.tokens.len() {
                    return false;
                }
                self.next_significant(i + 1, true)
                    .is_some_and(|colon| self.tokens[colon].kind == SyntaxKind::Colon)
            }
            _ => false,
        }
    }

    /// Comma-separated items up to `closer`, with newlines allowed around
    /// items and a trailing comma.
    fn parse_comma_list(&mut self, closer: SyntaxKind, mut item: impl FnMut(&mut Self) -> bool) {
        loop {
            self.skip_newlines();
            if self.should_stop() || self.currently_is(closer) {
                break;
            }
            if !item(self) {
                break;
            }
            self.skip_newlines();
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
    }

    fn parse_arithmetic_item(&mut self) -> bool {
        let kind = self.current();
        if !ARITHMETIC_FIRST.contains(kind) {
            self.error_found(DiagnosticKind::ExpectedExpression, "");
            return false;
        }
        self.parse_arithmetic();
        true
    }

    /// `"key": arithmetic`
    fn parse_entry(&mut self) -> bool {
        let kind = self.current();
        if kind != SyntaxKind::DoubleQuote {
            self.error_found(
                DiagnosticKind::UnexpectedToken,
                "object keys must be string literals",
            );
            return false;
        }

        self.start_node(SyntaxKind::Entry);
        self.parse_string();
        self.skip_newlines();
        if self.expect(SyntaxKind::Colon, "`:` after object key") {
            self.skip_newlines();
            self.parse_arithmetic_item();
        }
        self.finish_node();
        true
    }

    /// Identifier, or a call when `(` follows (with an optional adjacent `!` before it).
    pub(crate) fn parse_ident_or_call(&mut self) -> SyntaxKind {
        if !self.at_call() {
            self.start_node(SyntaxKind::Ident);
            self.bump();
            self.finish_node();
            return SyntaxKind::Ident;
        }

        self.start_node(SyntaxKind::FunctionCall);
        self.bump();
        self.eat_token(SyntaxKind::Bang);
        self.parse_argument_list();
        if self.currently_is(SyntaxKind::Arrow) {
            self.parse_closure();
        }
        self.finish_node();
        SyntaxKind::FunctionCall
    }

    fn at_call(&mut self) -> bool {
        self.assert_current(SyntaxKind::Id);
        let mut next = self.pos + 1;
        if let Some(bang) = self.tokens.get(next)
            && bang.kind == SyntaxKind::Bang
            && bang.immediate
        {
            next += 1;
        }
        self.next_significant(next, false)
            .is_some_and(|i| self.tokens[i].kind == SyntaxKind::ParenOpen)
    }

    /// `( argument, ... )`
    fn parse_argument_list(&mut self) {
        self.start_node(SyntaxKind::ArgumentList);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.assert_current(SyntaxKind::ParenOpen);
        self.bump();
        self.with_newlines(true, |p| {
            p.parse_comma_list(SyntaxKind::ParenClose, Self::parse_argument);
            p.close_delimiter(SyntaxKind::ParenClose);
        });
        self.finish_node();
    }

    /// Positional `arithmetic`, or `name: arithmetic` where the name is any
    /// identifier or reserved word.
    fn parse_argument(&mut self) -> bool {
        let kind = self.current();
        let named = (kind == SyntaxKind::Id || kind.is_keyword())
            && self
                .next_significant(self.pos + 1, false)
                .is_some_and(|i| self.tokens[i].kind == SyntaxKind::Colon);
        if !named {
            return self.parse_arithmetic_item();
        }

        self.start_node(SyntaxKind::NamedArgument);
        self.bump();
        self.eat_token(SyntaxKind::Colon);
        self.skip_newlines();
        self.parse_arithmetic_item();
        self.finish_node();
        true
    }

    /// `-> |params| block` or `-> || block`
    fn parse_closure(&mut self) {
        self.start_node(SyntaxKind::Closure);
        self.bump();

        self.start_node(SyntaxKind::ClosureParams);
        let mut params = Vec::new();
        match self.current() {
            SyntaxKind::PipePipe => self.bump(),
            SyntaxKind::Pipe => {
                self.push_delimiter(SyntaxKind::Pipe);
                self.bump();
                self.parse_comma_list(SyntaxKind::Pipe, |p| p.parse_closure_param(&mut params));
                self.close_delimiter(SyntaxKind::Pipe);
            }
            _ => self.error_found(
                DiagnosticKind::UnexpectedToken,
                "expected closure parameters `|...|`",
            ),
        }
        self.finish_node();
        self.validate_closure_params(&params);

        self.skip_newlines();
        self.parse_block();
        self.finish_node();
    }

    fn parse_closure_param(&mut self, params: &mut Vec<(String, rowan::TextRange)>) -> bool {
        let kind = self.current();
        if !matches!(kind, SyntaxKind::Id | SyntaxKind::Underscore) {
            self.error_found(DiagnosticKind::UnexpectedToken, "expected a parameter name");
            return false;
        }
        let span = self.current_span();
        let name = &self.source[std::ops::Range::<usize>::from(span)];
        params.push((name.to_string(), span));
        self.bump();
        true
    }
}
