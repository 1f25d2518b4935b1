//! Syntax kinds for the remap language.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `VrlLang` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    /// Event root and path separator.
    #[token(".")]
    Dot,

    /// Metadata root.
    #[token("%")]
    Percent,

    #[token("=")]
    Equals,

    #[token("|=")]
    PipeEquals,

    /// Merge operator, also delimits closure parameters.
    #[token("|")]
    Pipe,

    #[token("||")]
    PipePipe,

    #[token("&&")]
    AmpAmp,

    /// Logical not, or the fallible marker directly after a function name.
    #[token("!")]
    Bang,

    #[token("!=")]
    BangEquals,

    #[token("==")]
    EqualsEquals,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEquals,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEquals,

    #[token("+")]
    Plus,

    /// Subtraction, or the sign of an adjacent numeric literal.
    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    /// Error coalescing.
    #[token("??")]
    QuestionQuestion,

    /// Introduces a trailing closure.
    #[token("->")]
    Arrow,

    #[token("_", priority = 3)]
    Underscore,

    #[token("if")]
    KwIf,

    #[token("else")]
    KwElse,

    #[token("null")]
    KwNull,

    #[token("true")]
    KwTrue,

    #[token("false")]
    KwFalse,

    #[token("abort")]
    KwAbort,

    #[token("return")]
    KwReturn,

    /// Identifier. Defined after keywords so they take precedence.
    #[regex(r"[_a-zA-Z][_a-zA-Z0-9]*")]
    Id,

    /// Identifier containing `@`; only valid as a path field.
    #[regex(r"(?:[_a-zA-Z][_a-zA-Z0-9]*)?@[@_a-zA-Z0-9]*")]
    PathField,

    #[regex(r"0|[1-9][_0-9]*")]
    Integer,

    #[regex(r"(?:0|[1-9][_0-9]*)\.[_0-9]*")]
    Float,

    /// Number with a redundant leading zero. Lexer-internal only.
    #[regex(r"0[_0-9]+(?:\.[_0-9]*)?")]
    #[doc(hidden)]
    MalformedNumber,

    #[regex(r#""(?:[^"\\\n]|\\(?:.|\n))*""#, allow_greedy = true)]
    #[doc(hidden)]
    StringLiteral, // Lexer-internal only

    #[regex(r#""(?:[^"\\\n]|\\.)*\\?"#, allow_greedy = true)]
    #[doc(hidden)]
    UnterminatedString, // Lexer-internal only

    DoubleQuote,
    /// Plain text run inside a string literal.
    StrText,
    /// Backslash escape inside a string literal.
    Escape,
    /// `{{` opening a string template.
    TemplateOpen,
    /// `}}` closing a string template.
    TemplateClose,

    #[regex(r"s'(?:[^'\\]|\\(?:.|\n))*'", allow_greedy = true)]
    RawString,

    #[regex(r"s'(?:[^'\\\n]|\\.)*\\?", allow_greedy = true)]
    #[doc(hidden)]
    UnterminatedRawString,

    #[regex(r"r'(?:[^'\\]|\\(?:.|\n))*'", allow_greedy = true)]
    Regex,

    #[regex(r"r'(?:[^'\\\n]|\\.)*\\?", allow_greedy = true)]
    #[doc(hidden)]
    UnterminatedRegex,

    #[regex(r"t'(?:[^'\\\n]|\\.)*'", allow_greedy = true)]
    Timestamp,

    #[regex(r"t'(?:[^'\\\n]|\\.)*\\?", allow_greedy = true)]
    #[doc(hidden)]
    UnterminatedTimestamp,

    #[regex(r"[ \t\r\x0C]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"#[^\n]*", allow_greedy = true)]
    Comment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Program,
    IfStatement,
    Predicate,
    Block,
    Abort,
    Return,
    Assignment,
    InfallibleTarget,
    Noop,
    BinaryOp,
    UnaryOp,
    Query,
    Path,
    FieldSegment,
    IndexSegment,
    FunctionCall,
    ArgumentList,
    NamedArgument,
    Closure,
    ClosureParams,
    StringLit,
    Template,
    RawStringLit,
    IntegerLit,
    FloatLit,
    BooleanLit,
    NullLit,
    RegexLit,
    TimestampLit,
    Array,
    Object,
    Entry,
    Group,
    Ident,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Tokens the parser skips silently. Newlines are significant and are not trivia.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Comment | Garbage)
    }

    /// Tokens that break adjacency between their neighbours.
    #[inline]
    pub fn breaks_adjacency(self) -> bool {
        matches!(self, Whitespace | Newline | Comment)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    /// Reserved words, valid as field names and argument names.
    #[inline]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            KwIf | KwElse | KwNull | KwTrue | KwFalse | KwAbort | KwReturn
        )
    }

    /// Tokens that may name a path field.
    #[inline]
    pub fn is_field_name(self) -> bool {
        matches!(self, Id | PathField | Underscore) || self.is_keyword()
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VrlLang {}

impl Language for VrlLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<VrlLang>;
pub type SyntaxToken = rowan::SyntaxToken<VrlLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Creates an empty token set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
        TokenSet(1 << kind)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..128u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                // SAFETY: bounds checked against `__LAST` above
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// FIRST set of a term (literal, container, query, call, identifier).
    pub const TERM_FIRST: TokenSet = TokenSet::new(&[
        ParenOpen,
        BracketOpen,
        BraceOpen,
        Dot,
        Percent,
        Minus,
        Id,
        Integer,
        Float,
        DoubleQuote,
        RawString,
        Regex,
        Timestamp,
        KwNull,
        KwTrue,
        KwFalse,
    ]);

    /// FIRST set of an arithmetic expression.
    pub const ARITHMETIC_FIRST: TokenSet = TERM_FIRST.union(TokenSet::single(Bang));

    /// FIRST set of a statement.
    pub const STATEMENT_FIRST: TokenSet = ARITHMETIC_FIRST.union(TokenSet::new(&[
        KwIf,
        KwAbort,
        KwReturn,
        Underscore,
    ]));

    pub const ASSIGN_OPERATORS: TokenSet = TokenSet::new(&[Equals, PipeEquals]);

    /// Tokens that end a statement without being part of it.
    pub const STATEMENT_END: TokenSet =
        TokenSet::new(&[Newline, Semicolon, BraceClose, ParenClose, BracketClose]);
}
