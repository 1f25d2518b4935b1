//! Deterministic text dumps of the syntax tree.
//!
//! The AST dump shows one node per line with its decoded payload; the raw dump
//! shows the lossless CST with token texts.

use std::fmt::Write;

use rowan::NodeOrToken;

use super::ast::{
    Argument, Assignee, Expr, Literal, PathSegment, Program, Query, QueryRoot, StringLit,
    StringSegment, Target,
};
use super::cst::{SyntaxKind, SyntaxNode};

pub struct SyntaxPrinter<'a> {
    program: &'a Program,
    raw: bool,
    trivia: bool,
    spans: bool,
}

impl<'a> SyntaxPrinter<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            raw: false,
            trivia: false,
            spans: false,
        }
    }

    /// Dump the CST instead of the AST.
    pub fn raw(mut self, value: bool) -> Self {
        self.raw = value;
        self
    }

    /// Include whitespace and comment tokens in the CST dump.
    pub fn with_trivia(mut self, value: bool) -> Self {
        self.trivia = value;
        self
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.raw {
            self.format_cst(self.program.as_cst(), 0, w)
        } else {
            self.format_program(w)
        }
    }

    fn format_cst(&self, node: &SyntaxNode, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let prefix = "  ".repeat(indent);
        let span = self.span_str(node.text_range());

        writeln!(w, "{}{:?}{}", prefix, node.kind(), span)?;

        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => self.format_cst(&n, indent + 1, w)?,
                NodeOrToken::Token(t) => {
                    if self.trivia || !t.kind().is_trivia() {
                        let child_prefix = "  ".repeat(indent + 1);
                        let child_span = self.span_str(t.text_range());
                        writeln!(
                            w,
                            "{}{:?}{} {:?}",
                            child_prefix,
                            t.kind(),
                            child_span,
                            t.text()
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    fn format_program(&self, w: &mut impl Write) -> std::fmt::Result {
        let node = self.program.as_cst();
        writeln!(w, "Program{}", self.span_str(node.text_range()))?;
        self.format_statements(node, 1, w)
    }

    /// Statements of a program or block, with recovered error nodes in place.
    fn format_statements(
        &self,
        node: &SyntaxNode,
        indent: usize,
        w: &mut impl Write,
    ) -> std::fmt::Result {
        for child in node.children() {
            match child.kind() {
                SyntaxKind::Error => self.line(w, indent, "Error", &child)?,
                SyntaxKind::Noop => self.line(w, indent, "Noop", &child)?,
                _ => {
                    if let Some(expr) = Expr::cast(child) {
                        self.format_expr(&expr, indent, w)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn line(
        &self,
        w: &mut impl Write,
        indent: usize,
        text: &str,
        node: &SyntaxNode,
    ) -> std::fmt::Result {
        writeln!(
            w,
            "{}{}{}",
            "  ".repeat(indent),
            text,
            self.span_str(node.text_range())
        )
    }

    fn format_expr(&self, expr: &Expr, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let node = expr.as_cst();
        match expr {
            Expr::IfStatement(stmt) => {
                self.line(w, indent, "IfStatement", node)?;
                for child in stmt.as_cst().children() {
                    match child.kind() {
                        SyntaxKind::Predicate => {
                            self.line(w, indent + 1, "Predicate", &child)?;
                            self.format_statements(&child, indent + 2, w)?;
                        }
                        SyntaxKind::Block => {
                            self.line(w, indent + 1, "Block", &child)?;
                            self.format_statements(&child, indent + 2, w)?;
                        }
                        _ => {}
                    }
                }
                Ok(())
            }
            Expr::Abort(abort) => {
                self.line(w, indent, "Abort", node)?;
                self.format_opt(abort.message(), indent + 1, w)
            }
            Expr::Return(ret) => {
                self.line(w, indent, "Return", node)?;
                self.format_opt(ret.value(), indent + 1, w)
            }
            Expr::Assignment(assign) => {
                let op = assign.operator().map_or("?", |op| op.symbol());
                self.line(w, indent, &format!("Assignment {op}"), node)?;
                match assign.assignee() {
                    Some(Assignee::Single(target)) => self.format_target(&target, indent + 1, w)?,
                    Some(Assignee::Infallible { ok, err }) => {
                        writeln!(w, "{}Infallible", "  ".repeat(indent + 1))?;
                        self.format_target(&ok, indent + 2, w)?;
                        self.format_target(&err, indent + 2, w)?;
                    }
                    None => writeln!(w, "{}Error", "  ".repeat(indent + 1))?,
                }
                self.format_opt(assign.value(), indent + 1, w)
            }
            Expr::BinaryOp(op) => {
                let symbol = op.operator().map_or("?", |op| op.symbol());
                self.line(w, indent, &format!("BinaryOp {symbol}"), node)?;
                self.format_opt(op.lhs(), indent + 1, w)?;
                self.format_opt(op.rhs(), indent + 1, w)
            }
            Expr::UnaryOp(op) => {
                self.line(w, indent, "UnaryOp !", node)?;
                self.format_opt(op.operand(), indent + 1, w)
            }
            Expr::Query(query) => self.format_query(query, indent, w),
            Expr::FunctionCall(call) => {
                let name = call.name().map(|t| t.text().to_string()).unwrap_or_default();
                let bang = if call.is_fallible() { "!" } else { "" };
                self.line(w, indent, &format!("FunctionCall {name}{bang}"), node)?;
                for arg in call.arguments() {
                    match arg {
                        Argument::Positional(expr) => self.format_expr(&expr, indent + 1, w)?,
                        Argument::Named(named) => {
                            let name = named.name().map(|t| t.text().to_string());
                            let text = format!("NamedArgument {}", name.unwrap_or_default());
                            self.line(w, indent + 1, &text, named.as_cst())?;
                            self.format_opt(named.value(), indent + 2, w)?;
                        }
                    }
                }
                if let Some(closure) = call.closure() {
                    let params: Vec<String> = closure
                        .params()
                        .iter()
                        .map(|t| t.text().to_string())
                        .collect();
                    let text = format!("Closure |{}|", params.join(", "));
                    self.line(w, indent + 1, &text, closure.as_cst())?;
                    if let Some(body) = closure.body() {
                        self.format_expr(&Expr::Block(body), indent + 2, w)?;
                    }
                }
                Ok(())
            }
            Expr::Literal(lit) => self.format_literal(lit, indent, w),
            Expr::Array(array) => {
                self.line(w, indent, "Array", node)?;
                for element in array.elements() {
                    self.format_expr(&element, indent + 1, w)?;
                }
                Ok(())
            }
            Expr::Object(object) => {
                self.line(w, indent, "Object", node)?;
                for entry in object.entries() {
                    let key = entry.key().map(|k| k.text()).unwrap_or_default();
                    self.line(w, indent + 1, &format!("Entry {key:?}"), entry.as_cst())?;
                    self.format_opt(entry.value(), indent + 2, w)?;
                }
                Ok(())
            }
            Expr::Block(_) => {
                self.line(w, indent, "Block", node)?;
                self.format_statements(node, indent + 1, w)
            }
            Expr::Group(group) => {
                self.line(w, indent, "Group", node)?;
                self.format_opt(group.inner(), indent + 1, w)
            }
            Expr::Ident(ident) => {
                let name = ident.name().map(|t| t.text().to_string()).unwrap_or_default();
                self.line(w, indent, &format!("Ident {name}"), node)
            }
        }
    }

    fn format_opt(&self, expr: Option<Expr>, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        match expr {
            Some(expr) => self.format_expr(&expr, indent, w),
            None => Ok(()),
        }
    }

    fn format_target(&self, target: &Target, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        match target {
            Target::Noop(noop) => self.line(w, indent, "Noop", noop.as_cst()),
            Target::Query(query) => self.format_query(query, indent, w),
            Target::Ident(ident) => self.format_expr(&Expr::Ident(ident.clone()), indent, w),
        }
    }

    fn format_query(&self, query: &Query, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let root = query.root();
        let root_name = match &root {
            Some(QueryRoot::Event) => "event",
            Some(QueryRoot::Metadata) => "metadata",
            Some(QueryRoot::Internal(_)) => "internal",
            None => "?",
        };

        let mut path = String::new();
        for segment in query.segments() {
            match segment {
                PathSegment::Field(field) => {
                    let name = field.name().unwrap_or_default();
                    if field.is_quoted() {
                        write!(path, ".{name:?}").expect("String write never fails");
                    } else {
                        write!(path, ".{name}").expect("String write never fails");
                    }
                }
                PathSegment::Index(index) => match index.value() {
                    Some(value) => {
                        write!(path, "[{value}]").expect("String write never fails");
                    }
                    None => path.push_str("[?]"),
                },
            }
        }

        let text = if path.is_empty() {
            format!("Query {root_name}")
        } else {
            format!("Query {root_name} {path}")
        };
        self.line(w, indent, &text, query.as_cst())?;

        if let Some(QueryRoot::Internal(expr)) = root {
            self.format_expr(&expr, indent + 1, w)?;
        }
        Ok(())
    }

    fn format_literal(&self, lit: &Literal, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let node = lit.as_cst();
        let text = match lit {
            Literal::String(string) => return self.format_string(string, indent, w),
            Literal::Integer(int) => format!("Integer {}", int.text()),
            Literal::Float(float) => format!("Float {}", float.text()),
            Literal::Boolean(b) => format!("Boolean {}", b.value()),
            Literal::Null(_) => "Null".to_string(),
            Literal::RawString(raw) => format!("RawString {:?}", raw.value().unwrap_or_default()),
            Literal::Regex(regex) => format!("Regex {:?}", regex.pattern().unwrap_or_default()),
            Literal::Timestamp(ts) => format!("Timestamp {:?}", ts.value().unwrap_or_default()),
        };
        self.line(w, indent, &text, node)
    }

    fn format_string(
        &self,
        string: &StringLit,
        indent: usize,
        w: &mut impl Write,
    ) -> std::fmt::Result {
        self.line(w, indent, "String", string.as_cst())?;
        let prefix = "  ".repeat(indent + 1);
        for segment in string.segments() {
            match segment {
                StringSegment::Text(text) => writeln!(w, "{prefix}Text {text:?}")?,
                StringSegment::Template(name) => writeln!(w, "{prefix}Template {name}")?,
            }
        }
        Ok(())
    }

    fn span_str(&self, range: rowan::TextRange) -> String {
        if !self.spans {
            return String::new();
        }
        format!(
            " [{}..{}]",
            u32::from(range.start()),
            u32::from(range.end())
        )
    }
}
