//! Syntax tree for the stylesheet subset the front end understands.

/// Byte range of a syntax node in its source text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest range covering both.
    pub fn to(self, other: SourceRange) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

pub type Spanned<T> = (T, SourceRange);

pub type Identifier = String;

pub type Block = Vec<Spanned<Statement>>;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Stylesheet {
    pub statements: Block,
}

/// A statement. Its range starts at the first token and, for `@warn` and
/// `@debug`, ends where the expression ends (the `;` is not included).
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// `$name: value;`
    Assign {
        name: Identifier,
        value: Spanned<Expr>,
    },
    Warn(Spanned<Expr>),
    Debug(Spanned<Expr>),
    Mixin {
        name: Identifier,
        body: Block,
    },
    Include {
        name: Identifier,
    },
    Rule {
        selector: String,
        body: Block,
    },
    Declaration {
        property: String,
        value: Spanned<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number {
        value: f64,
        unit: Option<String>,
    },
    String {
        text: String,
        quoted: bool,
    },
    Variable(Identifier),
    Binary {
        left: Box<Spanned<Expr>>,
        operator: BinaryOperator,
        right: Box<Spanned<Expr>>,
    },
    Negate(Box<Spanned<Expr>>),
    /// Space-separated values.
    List(Vec<Spanned<Expr>>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }
}
