//! Parser state machine and low-level operations.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::cst::{SyntaxKind, TokenSet, token_sets};
use super::lexer::{Token, token_text};
use crate::Error;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

pub(crate) const DEFAULT_RECURSION_LIMIT: u32 = 256;

#[derive(Debug, Clone, Copy)]
pub(super) struct OpenDelimiter {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

/// Trivia tokens are buffered and flushed when starting a new node.
///
/// Newlines are statement separators, so they are only treated as trivia while
/// `newlines_significant` is off (inside parenthesized groups).
pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) trivia_buffer: Vec<Token>,
    pub(super) builder: GreenNodeBuilder<'static>,
    pub(super) diagnostics: Diagnostics,
    pub(super) depth: u32,
    pub(super) last_diagnostic_pos: Option<TextSize>,
    pub(super) delimiter_stack: Vec<OpenDelimiter>,
    pub(super) debug_fuel: std::cell::Cell<u32>,
    pub(super) newlines_significant: bool,
    exec_fuel_remaining: Option<u32>,
    recursion_limit: u32,
    recursion_exceeded: bool,
    fatal_error: Option<Error>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            trivia_buffer: Vec::with_capacity(4),
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_diagnostic_pos: None,
            delimiter_stack: Vec::with_capacity(8),
            debug_fuel: std::cell::Cell::new(256),
            newlines_significant: true,
            exec_fuel_remaining: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            recursion_exceeded: false,
            fatal_error: None,
        }
    }

    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel_remaining = limit;
        self
    }

    pub fn with_recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Parses a whole program. Returns Err only on exec fuel exhaustion.
    pub fn parse(mut self) -> Result<(GreenNode, Diagnostics), Error> {
        self.parse_program();
        self.finish()
    }

    fn finish(mut self) -> Result<(GreenNode, Diagnostics), Error> {
        self.drain_trivia();
        if let Some(err) = self.fatal_error {
            return Err(err);
        }
        Ok((self.builder.finish(), self.diagnostics))
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal_error.is_some()
    }

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        self.nth_raw(0)
    }

    fn reset_debug_fuel(&self) {
        self.debug_fuel.set(256);
    }

    /// Kind at `pos + lookahead` without skipping anything. `Error` past the end.
    pub(super) fn nth_raw(&self, lookahead: usize) -> SyntaxKind {
        self.ensure_progress();
        self.tokens
            .get(self.pos + lookahead)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn nth_token(&self, lookahead: usize) -> Option<Token> {
        self.tokens.get(self.pos + lookahead).copied()
    }

    fn consume_exec_fuel(&mut self) {
        if let Some(ref mut remaining) = self.exec_fuel_remaining {
            if *remaining == 0 {
                if self.fatal_error.is_none() {
                    self.fatal_error = Some(Error::ExecFuelExhausted);
                }
                return;
            }
            *remaining -= 1;
        }
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.skip_trivia_to_buffer();
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    /// Whether the current token touches the previous one.
    pub(super) fn current_is_immediate(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        self.tokens.get(self.pos).is_some_and(|t| t.immediate)
    }

    pub(super) fn eof_offset(&self) -> TextSize {
        TextSize::of(self.source)
    }

    pub(super) fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn should_stop(&self) -> bool {
        self.eof() || self.has_fatal_error()
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    /// Index of the first token at or after `from` that is not trivia.
    /// Newlines count as trivia when `skip_newlines` is set.
    pub(super) fn next_significant(&self, from: usize, skip_newlines: bool) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| {
            let kind = self.tokens[i].kind;
            !(kind.is_trivia() || (skip_newlines && kind == SyntaxKind::Newline))
        })
    }

    fn is_skippable(&self, kind: SyntaxKind) -> bool {
        kind.is_trivia() || (!self.newlines_significant && kind == SyntaxKind::Newline)
    }

    pub(super) fn skip_trivia_to_buffer(&mut self) {
        while self.pos < self.tokens.len() && self.is_skippable(self.tokens[self.pos].kind) {
            self.trivia_buffer.push(self.tokens[self.pos]);
            self.pos += 1;
        }
    }

    pub(super) fn drain_trivia(&mut self) {
        for token in self.trivia_buffer.drain(..) {
            let text = token_text(self.source, &token);
            self.builder.token(token.kind.into(), text);
        }
    }

    pub(super) fn eat_trivia(&mut self) {
        self.skip_trivia_to_buffer();
        self.drain_trivia();
    }

    /// Runs `f` with newlines treated as separators (`true`) or as trivia (`false`).
    pub(super) fn with_newlines<R>(
        &mut self,
        significant: bool,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = std::mem::replace(&mut self.newlines_significant, significant);
        let result = f(self);
        self.newlines_significant = saved;
        result
    }

    /// Consumes newlines at a position where an operand is still required.
    pub(super) fn skip_newlines(&mut self) {
        while self.currently_is(SyntaxKind::Newline) {
            self.bump();
        }
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.drain_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.drain_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn bump(&mut self) {
        assert!(!self.eof(), "bump called at EOF");
        self.reset_debug_fuel();
        self.consume_exec_fuel();

        self.drain_trivia();

        let token = self.tokens[self.pos];
        let text = token_text(self.source, &token);
        self.builder.token(token.kind.into(), text);
        self.pos += 1;
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        if self.currently_is(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// On mismatch: emit diagnostic but don't consume.
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat_token(kind) {
            return true;
        }
        self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {what}"));
        false
    }

    fn should_report(&mut self, pos: TextSize) -> bool {
        if self.recursion_exceeded || self.last_diagnostic_pos == Some(pos) {
            return false;
        }
        self.last_diagnostic_pos = Some(pos);
        true
    }

    fn bump_as_error(&mut self) {
        if !self.eof() {
            self.start_node(SyntaxKind::Error);
            self.bump();
            self.finish_node();
        }
    }

    /// Expectation errors at end of input are reported as such.
    fn kind_at_current(&mut self, kind: DiagnosticKind) -> DiagnosticKind {
        self.skip_trivia_to_buffer();
        let at_end = self.eof();
        match kind {
            DiagnosticKind::ExpectedExpression
            | DiagnosticKind::UnexpectedToken
            | DiagnosticKind::MissingSeparator
                if at_end =>
            {
                DiagnosticKind::UnexpectedEndOfInput
            }
            _ => kind,
        }
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let range = self.current_span();
        if !self.should_report(range.start()) {
            return;
        }
        let kind = self.kind_at_current(kind);
        self.diagnostics.report(kind, range).emit();
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        if !self.should_report(range.start()) {
            return;
        }
        let kind = self.kind_at_current(kind);
        self.diagnostics.report(kind, range).message(message).emit();
    }

    /// Reports that `what` was expected, naming the current token. At end of
    /// input the found token is left out.
    pub(super) fn error_found(&mut self, kind: DiagnosticKind, what: &str) {
        let current = self.current();
        if self.eof() {
            if what.is_empty() {
                self.error(kind);
            } else {
                self.error_msg(kind, what);
            }
            return;
        }

        let found = describe(current);
        let message = if what.is_empty() {
            format!("found {found}")
        } else {
            format!("{what}, found {found}")
        };
        self.error_msg(kind, message);
    }

    /// Reports at an explicit range rather than the current token.
    pub(super) fn error_at(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
    ) {
        if !self.should_report(range.start()) {
            return;
        }
        self.diagnostics.report(kind, range).message(message).emit();
    }

    pub(super) fn error_with_related(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
        related_msg: impl Into<String>,
        related_range: TextRange,
    ) {
        if !self.should_report(range.start()) {
            return;
        }
        self.diagnostics
            .report(kind, range)
            .message(message)
            .related_to(related_msg, related_range)
            .emit();
    }

    pub(super) fn error_and_bump_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        self.bump_as_error();
    }

    /// Panic-mode recovery: wraps tokens in an `Error` node up to the next
    /// statement boundary (newline, `;`, an unmatched closer, or end of input).
    pub(super) fn synchronize(&mut self) {
        if self.should_stop() || self.at_statement_boundary() {
            return;
        }

        let start = self.current_span().start();
        self.start_node(SyntaxKind::Error);
        let mut depth = 0u32;
        while !self.should_stop() {
            match self.current() {
                SyntaxKind::Newline | SyntaxKind::Semicolon if depth == 0 => break,
                SyntaxKind::ParenOpen | SyntaxKind::BracketOpen | SyntaxKind::BraceOpen => {
                    depth += 1
                }
                SyntaxKind::ParenClose | SyntaxKind::BracketClose | SyntaxKind::BraceClose => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
        }
        self.finish_node();

        let end = self.last_non_trivia_end().unwrap_or(start);
        tracing::trace!(
            start = u32::from(start),
            end = u32::from(end),
            "skipped to statement boundary"
        );
    }

    fn at_statement_boundary(&mut self) -> bool {
        self.currently_is_one_of(token_sets::STATEMENT_END)
    }

    /// Recovery inside a delimited construct: skips balanced tokens until
    /// `closer` at nesting depth zero, another unmatched closer, or end of input.
    pub(super) fn recover_to_closer(&mut self, closer: SyntaxKind) {
        if self.should_stop() || self.currently_is(closer) || self.at_unmatched_closer() {
            return;
        }

        self.start_node(SyntaxKind::Error);
        let mut depth = 0u32;
        while !self.should_stop() {
            let kind = self.current();
            match kind {
                _ if kind == closer && depth == 0 => break,
                SyntaxKind::ParenOpen | SyntaxKind::BracketOpen | SyntaxKind::BraceOpen => {
                    depth += 1
                }
                SyntaxKind::ParenClose | SyntaxKind::BracketClose | SyntaxKind::BraceClose
                    if depth == 0 =>
                {
                    break;
                }
                SyntaxKind::ParenClose | SyntaxKind::BracketClose | SyntaxKind::BraceClose => {
                    depth -= 1
                }
                _ => {}
            }
            self.bump();
        }
        self.finish_node();
        tracing::trace!(?closer, "skipped to closing delimiter");
    }

    fn at_unmatched_closer(&mut self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::ParenClose | SyntaxKind::BracketClose | SyntaxKind::BraceClose
        )
    }

    /// Checks the recursion guard. On the first overflow, reports it and absorbs
    /// the rest of the input into one error node.
    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.recursion_exceeded {
            return false;
        }
        if self.depth >= self.recursion_limit {
            let range = self.current_span();
            self.diagnostics
                .report(DiagnosticKind::RecursionLimitExceeded, range)
                .message(format!("more than {} levels", self.recursion_limit))
                .emit();
            self.recursion_exceeded = true;
            tracing::debug!(limit = self.recursion_limit, "recursion limit exceeded");

            self.start_node(SyntaxKind::Error);
            while !self.should_stop() {
                self.bump();
            }
            self.eat_trivia();
            self.finish_node();
            return false;
        }
        self.depth += 1;
        self.reset_debug_fuel();
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.reset_debug_fuel();
    }

    pub(super) fn push_delimiter(&mut self, kind: SyntaxKind) {
        let span = self.current_span();
        self.delimiter_stack.push(OpenDelimiter { kind, span });
    }

    pub(super) fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    /// Consumes the closing delimiter matching the innermost open one.
    ///
    /// Stray tokens before the closer are skipped into an error node. A closer
    /// missing at end of input is reported together with where it was opened.
    pub(super) fn close_delimiter(&mut self, closer: SyntaxKind) {
        let open = self.pop_delimiter();
        let expected = closer_text(closer);

        if self.eat_token(closer) {
            return;
        }

        if !self.should_stop() {
            self.error_msg(
                DiagnosticKind::UnexpectedToken,
                format!("expected `{expected}`"),
            );
            self.recover_to_closer(closer);
            if self.eat_token(closer) {
                return;
            }
        }

        if self.eof()
            && let Some(open) = open
        {
            let opener = closer_text(open.kind);
            self.error_unclosed_delimiter(
                format!("expected `{expected}`"),
                format!("`{opener}` opened here"),
                open.span,
            );
        }
    }

    pub(super) fn error_unclosed_delimiter(
        &mut self,
        message: impl Into<String>,
        related_msg: impl Into<String>,
        open_range: TextRange,
    ) {
        let current = self.current_span();
        if !self.should_report(current.start()) {
            return;
        }
        self.diagnostics
            .report(DiagnosticKind::UnexpectedEndOfInput, current)
            .message(message)
            .related_to(related_msg, open_range)
            .emit();
    }

    pub(super) fn last_non_trivia_end(&self) -> Option<TextSize> {
        self.tokens[..self.pos]
            .iter()
            .rev()
            .find(|t| !t.kind.is_trivia() && t.kind != SyntaxKind::Newline)
            .map(|t| t.span.end())
    }
}

fn closer_text(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::ParenOpen => "(",
        SyntaxKind::ParenClose => ")",
        SyntaxKind::BracketOpen => "[",
        SyntaxKind::BracketClose => "]",
        SyntaxKind::BraceOpen => "{",
        SyntaxKind::BraceClose => "}",
        SyntaxKind::Pipe => "|",
        _ => "?",
    }
}

/// Human-readable name of a token kind for diagnostics.
pub(super) fn describe(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        ParenOpen => "`(`",
        ParenClose => "`)`",
        BracketOpen => "`[`",
        BracketClose => "`]`",
        BraceOpen => "`{`",
        BraceClose => "`}`",
        Comma => "`,`",
        Semicolon => "`;`",
        Colon => "`:`",
        Dot => "`.`",
        Percent => "`%`",
        Equals => "`=`",
        PipeEquals => "`|=`",
        Pipe => "`|`",
        PipePipe => "`||`",
        AmpAmp => "`&&`",
        Bang => "`!`",
        BangEquals => "`!=`",
        EqualsEquals => "`==`",
        Greater => "`>`",
        GreaterEquals => "`>=`",
        Less => "`<`",
        LessEquals => "`<=`",
        Plus => "`+`",
        Minus => "`-`",
        Star => "`*`",
        Slash => "`/`",
        QuestionQuestion => "`??`",
        Arrow => "`->`",
        Underscore => "`_`",
        KwIf => "`if`",
        KwElse => "`else`",
        KwNull => "`null`",
        KwTrue => "`true`",
        KwFalse => "`false`",
        KwAbort => "`abort`",
        KwReturn => "`return`",
        Id => "identifier",
        PathField => "path field",
        Integer => "integer",
        Float => "float",
        DoubleQuote => "string",
        RawString => "raw string",
        Regex => "regex",
        Timestamp => "timestamp",
        Newline => "newline",
        _ => "end of input",
    }
}
