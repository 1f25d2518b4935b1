//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Accessors return `Option` so that recovered trees stay walkable.

use super::cst::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use super::lexer::{parse_integer_magnitude, quoted_body, unescape_quote};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Program, Program);
ast_node!(IfStatement, IfStatement);
ast_node!(Predicate, Predicate);
ast_node!(Block, Block);
ast_node!(Abort, Abort);
ast_node!(Return, Return);
ast_node!(Assignment, Assignment);
ast_node!(Noop, Noop);
ast_node!(BinaryOp, BinaryOp);
ast_node!(UnaryOp, UnaryOp);
ast_node!(Query, Query);
ast_node!(Path, Path);
ast_node!(FieldSegment, FieldSegment);
ast_node!(IndexSegment, IndexSegment);
ast_node!(FunctionCall, FunctionCall);
ast_node!(NamedArgument, NamedArgument);
ast_node!(Closure, Closure);
ast_node!(StringLit, StringLit);
ast_node!(RawStringLit, RawStringLit);
ast_node!(IntegerLit, IntegerLit);
ast_node!(FloatLit, FloatLit);
ast_node!(BooleanLit, BooleanLit);
ast_node!(NullLit, NullLit);
ast_node!(RegexLit, RegexLit);
ast_node!(TimestampLit, TimestampLit);
ast_node!(Array, Array);
ast_node!(Object, Object);
ast_node!(Entry, Entry);
ast_node!(Group, Group);
ast_node!(Ident, Ident);

/// Any expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    IfStatement(IfStatement),
    Abort(Abort),
    Return(Return),
    Assignment(Assignment),
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
    Query(Query),
    FunctionCall(FunctionCall),
    Literal(Literal),
    Array(Array),
    Object(Object),
    Block(Block),
    Group(Group),
    Ident(Ident),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::IfStatement => IfStatement::cast(node).map(Expr::IfStatement),
            SyntaxKind::Abort => Abort::cast(node).map(Expr::Abort),
            SyntaxKind::Return => Return::cast(node).map(Expr::Return),
            SyntaxKind::Assignment => Assignment::cast(node).map(Expr::Assignment),
            SyntaxKind::BinaryOp => BinaryOp::cast(node).map(Expr::BinaryOp),
            SyntaxKind::UnaryOp => UnaryOp::cast(node).map(Expr::UnaryOp),
            SyntaxKind::Query => Query::cast(node).map(Expr::Query),
            SyntaxKind::FunctionCall => FunctionCall::cast(node).map(Expr::FunctionCall),
            SyntaxKind::Array => Array::cast(node).map(Expr::Array),
            SyntaxKind::Object => Object::cast(node).map(Expr::Object),
            SyntaxKind::Block => Block::cast(node).map(Expr::Block),
            SyntaxKind::Group => Group::cast(node).map(Expr::Group),
            SyntaxKind::Ident => Ident::cast(node).map(Expr::Ident),
            _ => Literal::cast(node).map(Expr::Literal),
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::IfStatement(n) => n.as_cst(),
            Expr::Abort(n) => n.as_cst(),
            Expr::Return(n) => n.as_cst(),
            Expr::Assignment(n) => n.as_cst(),
            Expr::BinaryOp(n) => n.as_cst(),
            Expr::UnaryOp(n) => n.as_cst(),
            Expr::Query(n) => n.as_cst(),
            Expr::FunctionCall(n) => n.as_cst(),
            Expr::Literal(n) => n.as_cst(),
            Expr::Array(n) => n.as_cst(),
            Expr::Object(n) => n.as_cst(),
            Expr::Block(n) => n.as_cst(),
            Expr::Group(n) => n.as_cst(),
            Expr::Ident(n) => n.as_cst(),
        }
    }
}

/// Literal values. Decoding happens on access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    String(StringLit),
    RawString(RawStringLit),
    Integer(IntegerLit),
    Float(FloatLit),
    Boolean(BooleanLit),
    Null(NullLit),
    Regex(RegexLit),
    Timestamp(TimestampLit),
}

impl Literal {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::StringLit => StringLit::cast(node).map(Literal::String),
            SyntaxKind::RawStringLit => RawStringLit::cast(node).map(Literal::RawString),
            SyntaxKind::IntegerLit => IntegerLit::cast(node).map(Literal::Integer),
            SyntaxKind::FloatLit => FloatLit::cast(node).map(Literal::Float),
            SyntaxKind::BooleanLit => BooleanLit::cast(node).map(Literal::Boolean),
            SyntaxKind::NullLit => NullLit::cast(node).map(Literal::Null),
            SyntaxKind::RegexLit => RegexLit::cast(node).map(Literal::Regex),
            SyntaxKind::TimestampLit => TimestampLit::cast(node).map(Literal::Timestamp),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Literal::String(n) => n.as_cst(),
            Literal::RawString(n) => n.as_cst(),
            Literal::Integer(n) => n.as_cst(),
            Literal::Float(n) => n.as_cst(),
            Literal::Boolean(n) => n.as_cst(),
            Literal::Null(n) => n.as_cst(),
            Literal::Regex(n) => n.as_cst(),
            Literal::Timestamp(n) => n.as_cst(),
        }
    }
}

/// Binary operators, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    ErrorCoalesce,
    Or,
    And,
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Merge,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn from_kind(kind: SyntaxKind) -> Option<Self> {
        let op = match kind {
            SyntaxKind::QuestionQuestion => Self::ErrorCoalesce,
            SyntaxKind::PipePipe => Self::Or,
            SyntaxKind::AmpAmp => Self::And,
            SyntaxKind::EqualsEquals => Self::Equal,
            SyntaxKind::BangEquals => Self::NotEqual,
            SyntaxKind::Greater => Self::Greater,
            SyntaxKind::GreaterEquals => Self::GreaterOrEqual,
            SyntaxKind::Less => Self::Less,
            SyntaxKind::LessEquals => Self::LessOrEqual,
            SyntaxKind::Pipe => Self::Merge,
            SyntaxKind::Plus => Self::Add,
            SyntaxKind::Minus => Self::Subtract,
            SyntaxKind::Star => Self::Multiply,
            SyntaxKind::Slash => Self::Divide,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::ErrorCoalesce => "??",
            Self::Or => "||",
            Self::And => "&&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Merge => "|",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Precedence class; higher binds tighter. All binary operators are left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            Self::ErrorCoalesce => 1,
            Self::Or => 2,
            Self::And => 3,
            Self::Equal | Self::NotEqual => 4,
            Self::Greater | Self::GreaterOrEqual | Self::Less | Self::LessOrEqual => 5,
            Self::Merge => 6,
            Self::Add | Self::Subtract => 7,
            Self::Multiply | Self::Divide => 8,
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOperator {
    /// `=`
    Assign,
    /// `|=`
    MergeAssign,
}

impl AssignOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::MergeAssign => "|=",
        }
    }
}

/// Left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Noop(Noop),
    Query(Query),
    Ident(Ident),
}

impl Target {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Noop => Noop::cast(node).map(Target::Noop),
            SyntaxKind::Query => Query::cast(node).map(Target::Query),
            SyntaxKind::Ident => Ident::cast(node).map(Target::Ident),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Target::Noop(n) => n.as_cst(),
            Target::Query(n) => n.as_cst(),
            Target::Ident(n) => n.as_cst(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Assignee {
    Single(Target),
    /// `ok, err = ...`
    Infallible { ok: Target, err: Target },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryRoot {
    /// `.`
    Event,
    /// `%`
    Metadata,
    /// A computed value the path is applied to.
    Internal(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(FieldSegment),
    Index(IndexSegment),
}

impl PathSegment {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FieldSegment => FieldSegment::cast(node).map(PathSegment::Field),
            SyntaxKind::IndexSegment => IndexSegment::cast(node).map(PathSegment::Index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Argument {
    Positional(Expr),
    Named(NamedArgument),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringSegment {
    /// Literal text with escapes decoded.
    Text(String),
    /// `{{ name }}`
    Template(String),
}

fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + use<> {
    node.children_with_tokens()
        .filter_map(SyntaxElement::into_token)
}

fn token_of(node: &SyntaxNode, pred: impl Fn(SyntaxKind) -> bool) -> Option<SyntaxToken> {
    tokens(node).find(|t| pred(t.kind()))
}

/// First expression child after the first token of `kind`.
fn expr_after(node: &SyntaxNode, kind: SyntaxKind) -> Option<Expr> {
    node.children_with_tokens()
        .skip_while(|el| el.as_token().is_none_or(|t| t.kind() != kind))
        .filter_map(SyntaxElement::into_node)
        .find_map(Expr::cast)
}

/// Text of a literal node without surrounding trivia.
fn literal_text(node: &SyntaxNode) -> String {
    tokens(node)
        .filter(|t| !t.kind().is_trivia())
        .map(|t| t.text().to_string())
        .collect()
}

impl Program {
    pub fn statements(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl IfStatement {
    pub fn predicates(&self) -> impl Iterator<Item = Predicate> + '_ {
        self.0.children().filter_map(Predicate::cast)
    }

    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.0.children().filter_map(Block::cast)
    }

    pub fn condition(&self) -> Option<Predicate> {
        self.predicates().next()
    }

    pub fn consequent(&self) -> Option<Block> {
        self.blocks().next()
    }

    /// `else if` branches in source order.
    pub fn else_ifs(&self) -> Vec<(Predicate, Block)> {
        self.predicates().zip(self.blocks()).skip(1).collect()
    }

    /// Final `else` block. It is the one block without a predicate.
    pub fn alternative(&self) -> Option<Block> {
        let predicates = self.predicates().count();
        self.blocks().nth(predicates)
    }
}

impl Predicate {
    pub fn exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }

    /// The expression deciding the branch: the last one.
    pub fn condition(&self) -> Option<Expr> {
        self.exprs().last()
    }
}

impl Abort {
    pub fn message(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Return {
    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Assignment {
    pub fn assignee(&self) -> Option<Assignee> {
        let first = self.0.first_child()?;
        if first.kind() != SyntaxKind::InfallibleTarget {
            return Target::cast(first).map(Assignee::Single);
        }
        let mut targets = first.children().filter_map(Target::cast);
        let ok = targets.next()?;
        let err = targets.next()?;
        Some(Assignee::Infallible { ok, err })
    }

    pub fn operator(&self) -> Option<AssignOperator> {
        token_of(&self.0, |k| matches!(k, SyntaxKind::Equals | SyntaxKind::PipeEquals)).map(
            |t| match t.kind() {
                SyntaxKind::PipeEquals => AssignOperator::MergeAssign,
                _ => AssignOperator::Assign,
            },
        )
    }

    pub fn value(&self) -> Option<Expr> {
        let op = self.operator()?;
        let kind = match op {
            AssignOperator::Assign => SyntaxKind::Equals,
            AssignOperator::MergeAssign => SyntaxKind::PipeEquals,
        };
        expr_after(&self.0, kind)
    }
}

impl BinaryOp {
    pub fn operator(&self) -> Option<BinaryOperator> {
        tokens(&self.0).find_map(|t| BinaryOperator::from_kind(t.kind()))
    }

    pub fn operator_token(&self) -> Option<SyntaxToken> {
        token_of(&self.0, |k| BinaryOperator::from_kind(k).is_some())
    }

    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().next().and_then(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        let kind = self.operator_token()?.kind();
        expr_after(&self.0, kind)
    }
}

impl UnaryOp {
    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Query {
    pub fn root(&self) -> Option<QueryRoot> {
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) => match t.kind() {
                    SyntaxKind::Dot => return Some(QueryRoot::Event),
                    SyntaxKind::Percent => return Some(QueryRoot::Metadata),
                    _ => {}
                },
                rowan::NodeOrToken::Node(n) if n.kind() != SyntaxKind::Path => {
                    return Expr::cast(n).map(QueryRoot::Internal);
                }
                rowan::NodeOrToken::Node(_) => return None,
            }
        }
        None
    }

    pub fn path(&self) -> Option<Path> {
        self.0.children().find_map(Path::cast)
    }

    pub fn segments(&self) -> impl Iterator<Item = PathSegment> {
        self.path()
            .into_iter()
            .flat_map(|path| path.0.children().filter_map(PathSegment::cast))
    }
}

impl Path {
    pub fn segments(&self) -> impl Iterator<Item = PathSegment> + '_ {
        self.0.children().filter_map(PathSegment::cast)
    }
}

impl FieldSegment {
    /// Field name, with quotes removed and escapes decoded for string fields.
    pub fn name(&self) -> Option<String> {
        if let Some(string) = self.0.children().find_map(StringLit::cast) {
            return Some(string.text());
        }
        token_of(&self.0, SyntaxKind::is_field_name).map(|t| t.text().to_string())
    }

    pub fn is_quoted(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::StringLit)
    }
}

impl IndexSegment {
    pub fn value(&self) -> Option<i64> {
        integer_value(&self.0)
    }
}

impl FunctionCall {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, |k| k == SyntaxKind::Id)
    }

    /// `name!(...)`
    pub fn is_fallible(&self) -> bool {
        token_of(&self.0, |k| k == SyntaxKind::Bang).is_some()
    }

    pub fn arguments(&self) -> Vec<Argument> {
        let Some(list) = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::ArgumentList)
        else {
            return Vec::new();
        };
        list.children()
            .filter_map(|node| match NamedArgument::cast(node.clone()) {
                Some(named) => Some(Argument::Named(named)),
                None => Expr::cast(node).map(Argument::Positional),
            })
            .collect()
    }

    pub fn closure(&self) -> Option<Closure> {
        self.0.children().find_map(Closure::cast)
    }
}

impl NamedArgument {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, |k| k == SyntaxKind::Id || k.is_keyword())
    }

    pub fn value(&self) -> Option<Expr> {
        expr_after(&self.0, SyntaxKind::Colon)
    }
}

impl Closure {
    /// Parameter names; `_` for ignored parameters.
    pub fn params(&self) -> Vec<SyntaxToken> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ClosureParams)
            .map(|params| {
                tokens(&params)
                    .filter(|t| matches!(t.kind(), SyntaxKind::Id | SyntaxKind::Underscore))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

impl StringLit {
    /// Text runs (escapes decoded, adjacent runs merged) and template segments.
    pub fn segments(&self) -> Vec<StringSegment> {
        let mut segments = Vec::new();
        let mut text = String::new();
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) => match t.kind() {
                    SyntaxKind::StrText => text.push_str(t.text()),
                    SyntaxKind::Escape => decode_escape(t.text(), &mut text),
                    _ => {}
                },
                rowan::NodeOrToken::Node(n) if n.kind() == SyntaxKind::Template => {
                    if !text.is_empty() {
                        segments.push(StringSegment::Text(std::mem::take(&mut text)));
                    }
                    let name = token_of(&n, |k| k == SyntaxKind::Id)
                        .map(|t| t.text().to_string())
                        .unwrap_or_default();
                    segments.push(StringSegment::Template(name));
                }
                rowan::NodeOrToken::Node(_) => {}
            }
        }
        if !text.is_empty() {
            segments.push(StringSegment::Text(text));
        }
        segments
    }

    /// Whole string with templates kept in their `{{ name }}` form.
    pub fn text(&self) -> String {
        self.segments()
            .into_iter()
            .map(|segment| match segment {
                StringSegment::Text(text) => text,
                StringSegment::Template(name) => format!("{{{{ {name} }}}}"),
            })
            .collect()
    }

    pub fn is_terminated(&self) -> bool {
        tokens(&self.0)
            .filter(|t| t.kind() == SyntaxKind::DoubleQuote)
            .count()
            == 2
    }
}

fn decode_escape(escape: &str, out: &mut String) {
    let mut chars = escape.chars();
    chars.next();
    match chars.next() {
        Some('n') | Some('\n') => out.push('\n'),
        Some('r') => out.push('\r'),
        Some('t') => out.push('\t'),
        Some('0') => out.push('\0'),
        Some(c @ ('"' | '\\' | '{' | '}' | '\'')) => out.push(c),
        // Invalid escapes were reported by the lexer; keep them verbatim.
        _ => out.push_str(escape),
    }
}

fn literal_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    token_of(node, |k| k == kind)
}

impl RawStringLit {
    pub fn value(&self) -> Option<String> {
        let token = literal_token(&self.0, SyntaxKind::RawString)?;
        Some(unescape_quote(quoted_body(token.text())))
    }
}

impl RegexLit {
    pub fn pattern(&self) -> Option<String> {
        let token = literal_token(&self.0, SyntaxKind::Regex)?;
        Some(unescape_quote(quoted_body(token.text())))
    }
}

impl TimestampLit {
    /// Opaque timestamp text; parsing it is up to the consumer.
    pub fn value(&self) -> Option<String> {
        let token = literal_token(&self.0, SyntaxKind::Timestamp)?;
        let body = quoted_body(token.text());
        Some(body.replace("\\'", "'").replace("\\\\", "\\"))
    }
}

fn integer_value(node: &SyntaxNode) -> Option<i64> {
    let negative = literal_token(node, SyntaxKind::Minus).is_some();
    let magnitude = parse_integer_magnitude(literal_token(node, SyntaxKind::Integer)?.text())?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

impl IntegerLit {
    pub fn value(&self) -> Option<i64> {
        integer_value(&self.0)
    }

    /// Source text, including a sign and digit separators.
    pub fn text(&self) -> String {
        literal_text(&self.0)
    }
}

impl FloatLit {
    pub fn value(&self) -> Option<f64> {
        let digits: String = literal_text(&self.0)
            .chars()
            .filter(|&c| c != '_')
            .collect();
        digits.parse().ok()
    }

    pub fn text(&self) -> String {
        literal_text(&self.0)
    }
}

impl BooleanLit {
    pub fn value(&self) -> bool {
        literal_token(&self.0, SyntaxKind::KwTrue).is_some()
    }
}

impl Array {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl Object {
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.0.children().filter_map(Entry::cast)
    }
}

impl Entry {
    pub fn key(&self) -> Option<StringLit> {
        self.0.children().find_map(StringLit::cast)
    }

    pub fn value(&self) -> Option<Expr> {
        expr_after(&self.0, SyntaxKind::Colon)
    }
}

impl Group {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl Ident {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, |k| k == SyntaxKind::Id)
    }
}
