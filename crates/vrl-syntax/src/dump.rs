//! Test-only dump methods for parse result inspection.

use crate::{ParseResult, parse};

impl ParseResult {
    pub fn dump_cst(&self) -> String {
        self.printer().raw(true).dump()
    }

    pub fn dump_cst_full(&self) -> String {
        self.printer().raw(true).with_trivia(true).dump()
    }

    pub fn dump_ast(&self) -> String {
        self.printer().dump()
    }

    pub fn dump_diagnostics(&self, source: &str) -> String {
        self.diagnostics.printer(source).render_plain()
    }

    #[track_caller]
    pub fn expect_valid(src: &str) -> Self {
        let result = parse(src);
        if !result.is_valid() {
            panic!(
                "Expected valid program, got error:\n{}",
                result.diagnostics.render(src)
            );
        }
        result
    }

    #[track_caller]
    pub fn expect_valid_cst(src: &str) -> String {
        Self::expect_valid(src).dump_cst()
    }

    #[track_caller]
    pub fn expect_valid_cst_full(src: &str) -> String {
        Self::expect_valid(src).dump_cst_full()
    }

    #[track_caller]
    pub fn expect_valid_ast(src: &str) -> String {
        Self::expect_valid(src).dump_ast()
    }

    /// Plain one-line-per-diagnostic output of an invalid program.
    #[track_caller]
    pub fn expect_invalid(src: &str) -> String {
        let result = parse(src);
        if result.is_valid() {
            panic!("Expected invalid program, got valid:\n{}", result.dump_ast());
        }
        result.dump_diagnostics(src)
    }

    /// Source-annotated rendering of an invalid program's diagnostics.
    #[track_caller]
    pub fn expect_invalid_rendered(src: &str) -> String {
        let result = parse(src);
        if result.is_valid() {
            panic!("Expected invalid program, got valid:\n{}", result.dump_ast());
        }
        result.diagnostics.render(src)
    }
}
