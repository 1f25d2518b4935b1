//! Diagnostics collected while scanning and parsing one source buffer.

mod message;
mod printer;


use rowan::{TextRange, TextSize};
use serde::Serialize;

pub use message::{Diagnostic, DiagnosticKind, ErrorClass, Location, RelatedInfo, Severity};
pub use printer::DiagnosticsPrinter;

/// Ordered, per-call diagnostic buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: Diagnostic,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a diagnostic with the given kind and span.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to override.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: Diagnostic::with_default_message(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Orders diagnostics by source position. Stable, so diagnostics at the
    /// same offset keep their emission order.
    pub(crate) fn sort_by_position(&mut self) {
        self.messages.sort_by_key(|d| d.range.start());
    }

    /// Fills in line/column locations for every diagnostic.
    pub(crate) fn locate(&mut self, source: &str) {
        let index = LineIndex::new(source);
        for diag in &mut self.messages {
            diag.location = index.location(diag.range);
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl DiagnosticBuilder<'_> {
    /// Provide custom detail for this diagnostic, rendered using the kind's template.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        let detail = msg.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    pub fn related_to(mut self, msg: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo::new(range, msg));
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

/// Byte offset to line/column mapping.
pub(crate) struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<TextSize>,
}

impl<'s> LineIndex<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            source
                .match_indices('\n')
                .map(|(i, _)| TextSize::from(i as u32 + 1)),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// 1-indexed line and 0-indexed character column of `offset`.
    pub(crate) fn line_col(&self, offset: TextSize) -> (u32, u32) {
        let offset = offset.min(TextSize::of(self.source));
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = usize::from(self.line_starts[line]);
        let col = self.source[line_start..usize::from(offset)].chars().count();
        (line as u32 + 1, col as u32)
    }

    pub(crate) fn location(&self, range: TextRange) -> Location {
        let (start_line, start_col) = self.line_col(range.start());
        let (end_line, end_col) = self.line_col(range.end());
        Location {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}
