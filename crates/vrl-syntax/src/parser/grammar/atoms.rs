use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;

impl Parser<'_> {
    /// Literal of any kind. A `-` directly touching a number makes it negative.
    pub(crate) fn parse_literal(&mut self) -> SyntaxKind {
        let node = match self.current() {
            SyntaxKind::Integer => SyntaxKind::IntegerLit,
            SyntaxKind::Float => SyntaxKind::FloatLit,
            SyntaxKind::Minus => {
                if self.negative_number_follows(SyntaxKind::Integer) {
                    SyntaxKind::IntegerLit
                } else if self.negative_number_follows(SyntaxKind::Float) {
                    SyntaxKind::FloatLit
                } else {
                    self.error_and_bump_msg(
                        DiagnosticKind::ExpectedExpression,
                        "`-` must be directly followed by a number",
                    );
                    return SyntaxKind::Error;
                }
            }
            SyntaxKind::DoubleQuote => return self.parse_string(),
            SyntaxKind::RawString => SyntaxKind::RawStringLit,
            SyntaxKind::Regex => SyntaxKind::RegexLit,
            SyntaxKind::Timestamp => SyntaxKind::TimestampLit,
            SyntaxKind::KwTrue | SyntaxKind::KwFalse => SyntaxKind::BooleanLit,
            SyntaxKind::KwNull => SyntaxKind::NullLit,
            kind => unreachable!("parse_literal called on {kind:?}"),
        };

        self.start_node(node);
        if self.currently_is(SyntaxKind::Minus) {
            self.bump();
        }
        self.bump();
        self.finish_node();
        node
    }

    /// `"..."`: text, escapes and `{{ ident }}` templates up to the closing quote.
    /// An unterminated string has no closing quote; the lexer already reported it.
    pub(crate) fn parse_string(&mut self) -> SyntaxKind {
        self.start_node(SyntaxKind::StringLit);
        self.assert_current(SyntaxKind::DoubleQuote);
        self.bump();

        loop {
            match self.nth_raw(0) {
                SyntaxKind::StrText | SyntaxKind::Escape => self.bump(),
                SyntaxKind::TemplateOpen => self.parse_template(),
                SyntaxKind::DoubleQuote => {
                    self.bump();
                    break;
                }
                _ => break,
            }
        }

        self.finish_node();
        SyntaxKind::StringLit
    }

    fn parse_template(&mut self) {
        self.start_node(SyntaxKind::Template);
        self.bump();
        while matches!(self.nth_raw(0), SyntaxKind::Whitespace | SyntaxKind::Id) {
            self.bump();
        }
        if self.nth_raw(0) == SyntaxKind::TemplateClose {
            self.bump();
        }
        self.finish_node();
    }
}
