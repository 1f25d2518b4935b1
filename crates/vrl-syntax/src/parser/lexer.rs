//! Scanner for the remap language.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//! Every token records whether it directly touches the previous one (`immediate`), which is
//! what path continuation is decided on.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character. Malformed literals are still handed to the
//! parser as literals of the expected kind, with a lexical diagnostic on the side.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::cst::SyntaxKind;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
    /// No whitespace, newline or comment separates this token from the previous one.
    pub immediate: bool,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange, immediate: bool) -> Self {
        Self {
            kind,
            span,
            immediate,
        }
    }
}

/// Scanner output: tokens plus lexical diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
///
/// Post-processes the Logos output:
/// - Coalesces consecutive lexer errors into single `Garbage` tokens
/// - Splits string literals into quote + text/escape/template parts + quote
/// - Maps unterminated and malformed literals to their regular kinds, reporting them
///
/// Regex literal patterns are left unchecked; see [`lex_validating_regex`].
pub fn lex(source: &str) -> Lexed {
    scan(source, false)
}

/// Like [`lex`], but also reports regex literals whose pattern does not parse.
pub fn lex_validating_regex(source: &str) -> Lexed {
    scan(source, true)
}

fn scan(source: &str, validate_regex: bool) -> Lexed {
    let mut sink = Sink {
        source,
        tokens: Vec::new(),
        diagnostics: Diagnostics::new(),
        validate_regex,
    };
    let mut lexer = SyntaxKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    sink.garbage(start..lexer.span().start);
                }
                sink.token(kind, lexer.span());
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    sink.garbage(start..source.len());
                }
                break;
            }
        }
    }

    Lexed {
        tokens: sink.tokens,
        diagnostics: sink.diagnostics,
    }
}

struct Sink<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    diagnostics: Diagnostics,
    validate_regex: bool,
}

impl Sink<'_> {
    fn push(&mut self, kind: SyntaxKind, span: Range<usize>) {
        let span = range_to_text_range(span);
        let immediate = self
            .tokens
            .last()
            .is_some_and(|prev| !prev.kind.breaks_adjacency() && prev.span.end() == span.start());
        self.tokens.push(Token::new(kind, span, immediate));
    }

    fn report(&mut self, kind: DiagnosticKind, span: Range<usize>) {
        self.diagnostics
            .report(kind, range_to_text_range(span))
            .emit();
    }

    fn report_msg(&mut self, kind: DiagnosticKind, span: Range<usize>, msg: impl Into<String>) {
        self.diagnostics
            .report(kind, range_to_text_range(span))
            .message(msg)
            .emit();
    }

    fn garbage(&mut self, span: Range<usize>) {
        let text = &self.source[span.clone()];
        self.report_msg(DiagnosticKind::UnexpectedCharacter, span.clone(), text);
        self.push(SyntaxKind::Garbage, span);
    }

    fn token(&mut self, kind: SyntaxKind, span: Range<usize>) {
        use SyntaxKind::*;
        match kind {
            StringLiteral => self.string(span, true),
            UnterminatedString => {
                self.report(DiagnosticKind::UnterminatedString, span.clone());
                self.string(span, false);
            }
            UnterminatedRawString => {
                self.report(DiagnosticKind::UnterminatedRawString, span.clone());
                self.push(RawString, span);
            }
            Regex => {
                if self.validate_regex {
                    self.regex(span.clone());
                }
                self.push(Regex, span);
            }
            UnterminatedRegex => {
                self.report(DiagnosticKind::UnterminatedRegex, span.clone());
                self.push(Regex, span);
            }
            Timestamp => {
                self.timestamp_escapes(span.clone());
                self.push(Timestamp, span);
            }
            UnterminatedTimestamp => {
                self.report(DiagnosticKind::UnterminatedTimestamp, span.clone());
                self.push(Timestamp, span);
            }
            MalformedNumber => {
                self.report_msg(
                    DiagnosticKind::InvalidNumber,
                    span.clone(),
                    "leading zeros are not allowed",
                );
                let kind = if self.source[span.clone()].contains('.') {
                    Float
                } else {
                    Integer
                };
                self.push(kind, span);
            }
            Integer => {
                // `2^63` only fits as the magnitude of a negative literal
                let signed = self.tokens.last().is_some_and(|prev| {
                    prev.kind == Minus && usize::from(prev.span.end()) == span.start
                });
                let fits = parse_integer_magnitude(&self.source[span.clone()])
                    .is_some_and(|value| signed || value <= i64::MAX as u64);
                if !fits {
                    self.report_msg(
                        DiagnosticKind::InvalidNumber,
                        span.clone(),
                        "integer does not fit in 64 bits",
                    );
                }
                self.push(Integer, span);
            }
            _ => self.push(kind, span),
        }
    }

    /// Splits `"..."` into `DoubleQuote`, `StrText`/`Escape`/template parts and the closing quote.
    fn string(&mut self, span: Range<usize>, terminated: bool) {
        let start = span.start;
        let body_end = if terminated { span.end - 1 } else { span.end };
        self.push(SyntaxKind::DoubleQuote, start..start + 1);

        let body = &self.source[start + 1..body_end];
        let base = start + 1;
        let mut text_start: Option<usize> = None;
        let mut i = 0;

        while i < body.len() {
            let rest = &body[i..];
            if rest.starts_with('\\') {
                self.flush_text(&mut text_start, base + i);
                let next = rest[1..].chars().next();
                let len = 1 + next.map_or(0, char::len_utf8);
                if let Some(c) = next
                    && !is_string_escape(c)
                {
                    let escape = format!("\\{c}");
                    self.report_msg(DiagnosticKind::InvalidEscape, base + i..base + i + len, escape);
                }
                self.push(SyntaxKind::Escape, base + i..base + i + len);
                i += len;
            } else if rest.starts_with("{{") {
                if let Some(template) = match_template(rest) {
                    self.flush_text(&mut text_start, base + i);
                    self.template(base + i, &template);
                    i += template.len;
                } else {
                    self.report_msg(
                        DiagnosticKind::InvalidTemplate,
                        base + i..base + i + 2,
                        "expected `{{ identifier }}`",
                    );
                    text_start.get_or_insert(base + i);
                    i += 2;
                }
            } else {
                text_start.get_or_insert(base + i);
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        self.flush_text(&mut text_start, base + body.len());

        if terminated {
            self.push(SyntaxKind::DoubleQuote, span.end - 1..span.end);
        }
    }

    fn flush_text(&mut self, text_start: &mut Option<usize>, end: usize) {
        if let Some(start) = text_start.take()
            && start < end
        {
            self.push(SyntaxKind::StrText, start..end);
        }
    }

    fn template(&mut self, at: usize, t: &TemplateMatch) {
        self.push(SyntaxKind::TemplateOpen, at..at + 2);
        let mut pos = at + 2;
        if t.leading_ws > 0 {
            self.push(SyntaxKind::Whitespace, pos..pos + t.leading_ws);
            pos += t.leading_ws;
        }
        self.push(SyntaxKind::Id, pos..pos + t.ident_len);
        pos += t.ident_len;
        if t.trailing_ws > 0 {
            self.push(SyntaxKind::Whitespace, pos..pos + t.trailing_ws);
            pos += t.trailing_ws;
        }
        self.push(SyntaxKind::TemplateClose, pos..pos + 2);
    }

    fn timestamp_escapes(&mut self, span: Range<usize>) {
        let text = &self.source[span.clone()];
        let mut chars = text.char_indices().skip(2);
        while let Some((i, c)) = chars.next() {
            if c != '\\' {
                continue;
            }
            if let Some((j, escaped)) = chars.next()
                && escaped != '\''
                && escaped != '\\'
            {
                let end = span.start + j + escaped.len_utf8();
                let escape = format!("\\{escaped}");
                self.report_msg(DiagnosticKind::InvalidEscape, span.start + i..end, escape);
            }
        }
    }

    fn regex(&mut self, span: Range<usize>) {
        let pattern = unescape_quote(quoted_body(&self.source[span.clone()]));
        if let Err(err) = regex_syntax::Parser::new().parse(&pattern) {
            let detail = match &err {
                regex_syntax::Error::Parse(e) => e.kind().to_string(),
                regex_syntax::Error::Translate(e) => e.kind().to_string(),
                _ => err.to_string(),
            };
            self.report_msg(DiagnosticKind::InvalidRegex, span, detail);
        }
    }
}

fn is_string_escape(c: char) -> bool {
    matches!(c, '"' | '\\' | 'n' | '\n' | '0' | 'r' | 't' | '{' | '}' | '\'')
}

struct TemplateMatch {
    leading_ws: usize,
    ident_len: usize,
    trailing_ws: usize,
    len: usize,
}

/// Matches `{{ ident }}` at the start of `text`.
fn match_template(text: &str) -> Option<TemplateMatch> {
    let bytes = text.as_bytes();
    let is_ws = |b: u8| b == b' ' || b == b'\t';
    let mut pos = 2;

    let leading_ws = bytes[pos..].iter().take_while(|&&b| is_ws(b)).count();
    pos += leading_ws;

    let first = *bytes.get(pos)?;
    if !(first == b'_' || first.is_ascii_alphabetic()) {
        return None;
    }
    let ident_len = 1 + bytes[pos + 1..]
        .iter()
        .take_while(|&&b| b == b'_' || b.is_ascii_alphanumeric())
        .count();
    pos += ident_len;

    let trailing_ws = bytes[pos..].iter().take_while(|&&b| is_ws(b)).count();
    pos += trailing_ws;

    if !bytes[pos..].starts_with(b"}}") {
        return None;
    }

    Some(TemplateMatch {
        leading_ws,
        ident_len,
        trailing_ws,
        len: pos + 2,
    })
}

/// Body of a `s'...'`, `r'...'` or `t'...'` token, without prefix and closing quote.
/// Unterminated tokens yield everything after the prefix.
pub(crate) fn quoted_body(text: &str) -> &str {
    let body = text.get(2..).unwrap_or("");
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\'' => return &body[..i],
            _ => {}
        }
    }
    body
}

/// Replaces `\'` with `'`; every other backslash is kept.
pub(crate) fn unescape_quote(body: &str) -> String {
    body.replace("\\'", "'")
}

/// Magnitude of an unsigned integer literal, accepting up to `2^63` so that
/// `-9223372036854775808` stays representable.
pub(crate) fn parse_integer_magnitude(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let value = digits.parse::<u64>().ok()?;
    (value <= 1 << 63).then_some(value)
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[std::ops::Range::<usize>::from(token.span)]
}
