use indexmap::IndexMap;
use rowan::TextRange;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;

impl Parser<'_> {
    /// Assignment targets are `_`, a query or a bare identifier.
    pub(crate) fn validate_assign_target(&mut self, kind: SyntaxKind, range: TextRange) {
        match kind {
            SyntaxKind::Noop | SyntaxKind::Query | SyntaxKind::Ident | SyntaxKind::Error => {}
            _ => {
                let text = self.source[std::ops::Range::<usize>::from(range)].trim();
                self.error_at(
                    DiagnosticKind::InvalidAssignmentTarget,
                    range,
                    format!("cannot assign to `{text}`"),
                );
            }
        }
    }

    /// Closure parameters must be distinct; `_` may repeat.
    pub(crate) fn validate_closure_params(&mut self, params: &[(String, TextRange)]) {
        let mut seen: IndexMap<&str, TextRange> = IndexMap::new();
        for (name, range) in params {
            if name == "_" {
                continue;
            }
            if let Some(&first) = seen.get(name.as_str()) {
                self.error_with_related(
                    DiagnosticKind::DuplicateClosureParam,
                    *range,
                    name.as_str(),
                    "first defined here",
                    first,
                );
                continue;
            }
            seen.insert(name, *range);
        }
    }
}
