use rowan::TextRange;
use serde::{Serialize, Serializer};

/// Diagnostic kinds, lexical first, then syntactic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    // Scanner
    UnterminatedString,
    UnterminatedRawString,
    UnterminatedRegex,
    UnterminatedTimestamp,
    InvalidEscape,
    InvalidNumber,
    InvalidTemplate,
    InvalidRegex,
    UnexpectedCharacter,

    // Parser
    UnexpectedEndOfInput,
    ExpectedExpression,
    MissingSeparator,
    UnexpectedToken,
    InvalidPathContinuation,
    InvalidAssignmentTarget,
    DuplicateClosureParam,
    RecursionLimitExceeded,
}

/// Coarse error taxonomy consumers can match on without tracking every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    LexError,
    UnexpectedToken,
    UnexpectedEndOfInput,
    InvalidPathContinuation,
    DuplicateClosureParam,
    LimitExceeded,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnterminatedString
            | Self::UnterminatedRawString
            | Self::UnterminatedRegex
            | Self::UnterminatedTimestamp
            | Self::InvalidEscape
            | Self::InvalidNumber
            | Self::InvalidTemplate
            | Self::InvalidRegex
            | Self::UnexpectedCharacter => ErrorClass::LexError,

            Self::UnexpectedEndOfInput => ErrorClass::UnexpectedEndOfInput,
            Self::ExpectedExpression
            | Self::MissingSeparator
            | Self::UnexpectedToken
            | Self::InvalidAssignmentTarget => ErrorClass::UnexpectedToken,
            Self::InvalidPathContinuation => ErrorClass::InvalidPathContinuation,
            Self::DuplicateClosureParam => ErrorClass::DuplicateClosureParam,
            Self::RecursionLimitExceeded => ErrorClass::LimitExceeded,
        }
    }

    pub fn is_lexical(&self) -> bool {
        self.class() == ErrorClass::LexError
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnterminatedString => "unterminated string literal",
            Self::UnterminatedRawString => "unterminated raw string literal",
            Self::UnterminatedRegex => "unterminated regex literal",
            Self::UnterminatedTimestamp => "unterminated timestamp literal",
            Self::InvalidEscape => "invalid escape sequence",
            Self::InvalidNumber => "invalid numeric literal",
            Self::InvalidTemplate => "invalid string template",
            Self::InvalidRegex => "invalid regex literal",
            Self::UnexpectedCharacter => "unexpected character",

            Self::UnexpectedEndOfInput => "unexpected end of input",
            Self::ExpectedExpression => "expected an expression",
            Self::MissingSeparator => "expected newline or `;` after expression",
            Self::UnexpectedToken => "unexpected token",
            Self::InvalidPathContinuation => "invalid path continuation",
            Self::InvalidAssignmentTarget => "invalid assignment target",
            Self::DuplicateClosureParam => "duplicate closure parameter",
            Self::RecursionLimitExceeded => "nesting limit exceeded",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::InvalidEscape => "invalid escape sequence `{}`".to_string(),
            Self::UnexpectedCharacter => "unexpected character `{}`".to_string(),
            Self::DuplicateClosureParam => "closure parameter `{}` is already defined".to_string(),
            Self::UnexpectedToken => "{}".to_string(),

            // Standard pattern: fallback + context
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Line/column span of a diagnostic. Lines are 1-indexed, columns are
/// 0-indexed and counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedInfo {
    #[serde(serialize_with = "serialize_text_range")]
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) class: ErrorClass,
    pub(crate) severity: Severity,
    /// The byte range shown to the user (underlined in output).
    #[serde(serialize_with = "serialize_text_range")]
    pub(crate) range: TextRange,
    /// Filled in once the whole source is known.
    pub(crate) location: Location,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            class: kind.class(),
            severity: kind.default_severity(),
            range,
            location: Location::default(),
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn class(&self) -> ErrorClass {
        self.class
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn related(&self) -> &[RelatedInfo] {
        &self.related
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}:{}: {}",
            self.severity,
            self.location,
            self.location.end_line,
            self.location.end_col,
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " ({} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}

fn serialize_text_range<S: Serializer>(range: &TextRange, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;
    let mut state = s.serialize_struct("Range", 2)?;
    state.serialize_field("start", &u32::from(range.start()))?;
    state.serialize_field("end", &u32::from(range.end()))?;
    state.end()
}
