//! Recursive-descent parser for the stylesheet subset.
//!
//! Ranges are byte offsets into the source. They are converted to UTF-16
//! spans only when a diagnostic or error needs one.

use crate::ast::{
    BinaryOperator, Block, Expr, Identifier, SourceRange, Spanned, Statement, Stylesheet,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub range: SourceRange,
}

pub fn parse(source: &str) -> Result<Stylesheet, ParseError> {
    let mut parser = Parser { source, pos: 0 };
    let statements = parser.statements(false)?;
    parser.skip_trivia();
    match parser.peek() {
        None => Ok(Stylesheet { statements }),
        Some(_) => Err(parser.error("unexpected `}`")),
    }
}

struct Parser<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_trivia();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{expected}`")))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let end = self.pos + self.peek().map_or(0, char::len_utf8);
        ParseError {
            message: message.into(),
            range: SourceRange::new(self.pos, end),
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.starts_with("//") {
                self.pos += trimmed.find('\n').unwrap_or(trimmed.len());
            } else if let Some(comment) = trimmed.strip_prefix("/*") {
                self.pos += comment.find("*/").map_or(trimmed.len(), |end| end + 4);
            } else {
                return;
            }
        }
    }

    fn ident(&mut self) -> Option<Spanned<Identifier>> {
        let start = self.pos;
        let rest = self.rest();
        let mut chars = rest.chars();
        let first = chars.next()?;
        let starts_ident = first.is_alphabetic()
            || first == '_'
            || (first == '-' && chars.next().is_some_and(|c| c.is_alphabetic() || c == '_'));
        if !starts_ident {
            return None;
        }
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        self.pos += len;
        Some((rest[..len].to_owned(), SourceRange::new(start, self.pos)))
    }

    fn statements(&mut self, in_rule: bool) -> Result<Block, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None | Some('}') => return Ok(statements),
                Some(_) => statements.push(self.statement(in_rule)?),
            }
        }
    }

    /// The body of a `{ ... }` block, with the opening brace already consumed.
    fn block(&mut self) -> Result<Block, ParseError> {
        let body = self.statements(true)?;
        self.skip_trivia();
        if self.eat('}') {
            Ok(body)
        } else {
            Err(self.error("expected `}`"))
        }
    }

    fn statement(&mut self, in_rule: bool) -> Result<Spanned<Statement>, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some('$') => {
                self.bump();
                let Some((name, _)) = self.ident() else {
                    return Err(self.error("expected variable name"));
                };
                self.expect(':')?;
                let value = self.expr()?;
                let range = SourceRange::new(start, value.1.end);
                self.expect(';')?;
                Ok((Statement::Assign { name, value }, range))
            }
            Some('@') => {
                self.bump();
                let Some((keyword, keyword_range)) = self.ident() else {
                    return Err(self.error("expected at-rule name"));
                };
                self.at_rule(start, &keyword, keyword_range)
            }
            Some(_) if in_rule && self.looks_like_declaration() => self.declaration(),
            Some(_) => self.rule(),
            None => Err(self.error("expected statement")),
        }
    }

    fn at_rule(
        &mut self,
        start: usize,
        keyword: &str,
        keyword_range: SourceRange,
    ) -> Result<Spanned<Statement>, ParseError> {
        match keyword {
            "warn" | "debug" => {
                let value = self.expr()?;
                let range = SourceRange::new(start, value.1.end);
                self.expect(';')?;
                let statement = if keyword == "warn" {
                    Statement::Warn(value)
                } else {
                    Statement::Debug(value)
                };
                Ok((statement, range))
            }
            "mixin" => {
                self.skip_trivia();
                let Some((name, _)) = self.ident() else {
                    return Err(self.error("expected mixin name"));
                };
                self.expect('{')?;
                let body = self.block()?;
                Ok((Statement::Mixin { name, body }, SourceRange::new(start, self.pos)))
            }
            "include" => {
                self.skip_trivia();
                let Some((name, name_range)) = self.ident() else {
                    return Err(self.error("expected mixin name"));
                };
                self.expect(';')?;
                Ok((Statement::Include { name }, SourceRange::new(start, name_range.end)))
            }
            other => Err(ParseError {
                message: format!("unknown at-rule `@{other}`"),
                range: SourceRange::new(start, keyword_range.end),
            }),
        }
    }

    /// Whether the statement at the cursor ends before any `{` opens.
    fn looks_like_declaration(&self) -> bool {
        self.rest()
            .find(['{', ';', '}'])
            .is_none_or(|at| !self.rest()[at..].starts_with('{'))
    }

    fn declaration(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let start = self.pos;
        let Some((property, _)) = self.ident() else {
            return Err(self.error("expected property name"));
        };
        self.expect(':')?;
        let value = self.expr()?;
        let range = SourceRange::new(start, value.1.end);
        self.skip_trivia();
        if self.peek() != Some('}') {
            self.expect(';')?;
        }
        Ok((Statement::Declaration { property, value }, range))
    }

    fn rule(&mut self) -> Result<Spanned<Statement>, ParseError> {
        let start = self.pos;
        let Some(brace) = self.rest().find(['{', ';', '}']) else {
            self.pos = self.source.len();
            return Err(self.error("expected `{`"));
        };
        if !self.rest()[brace..].starts_with('{') {
            self.pos += brace;
            return Err(self.error("expected `{`"));
        }
        let selector = self.rest()[..brace].trim().to_owned();
        if selector.is_empty() {
            return Err(self.error("expected selector"));
        }
        self.pos += brace + 1;
        let body = self.block()?;
        Ok((Statement::Rule { selector, body }, SourceRange::new(start, self.pos)))
    }

    /// A space-separated list of one or more operations.
    fn expr(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let first = self.additive()?;
        let mut items = vec![first];
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(c) if starts_expression(c) => items.push(self.additive()?),
                _ => break,
            }
        }
        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        let range = items[0].1.to(items[items.len() - 1].1);
        Ok((Expr::List(items), range))
    }

    fn additive(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            self.skip_trivia();
            let operator = match self.peek() {
                Some('+') => BinaryOperator::Add,
                Some('-') if self.is_binary_minus() => BinaryOperator::Subtract,
                _ => return Ok(left),
            };
            self.bump();
            let right = self.multiplicative()?;
            left = binary(left, operator, right);
        }
    }

    /// `a - b` and `a-b` subtract; `a -b` starts a new list item.
    fn is_binary_minus(&self) -> bool {
        let after_space = self.source[..self.pos]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let before_space = self.peek_second().is_some_and(char::is_whitespace);
        before_space || !after_space
    }

    fn multiplicative(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let mut left = self.unary()?;
        loop {
            self.skip_trivia();
            let operator = match self.peek() {
                Some('*') => BinaryOperator::Multiply,
                Some('/') => BinaryOperator::Divide,
                _ => return Ok(left),
            };
            self.bump();
            let right = self.unary()?;
            left = binary(left, operator, right);
        }
    }

    fn unary(&mut self) -> Result<Spanned<Expr>, ParseError> {
        self.skip_trivia();
        let start = self.pos;
        let negates = self.peek() == Some('-')
            && self
                .peek_second()
                .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | '$' | '('));
        if negates {
            self.bump();
            let operand = self.unary()?;
            let range = SourceRange::new(start, operand.1.end);
            return Ok((Expr::Negate(Box::new(operand)), range));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_digit() => self.number(),
            Some('.') if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.number(),
            Some(quote @ ('"' | '\'')) => self.string(quote),
            Some('$') => {
                self.bump();
                match self.ident() {
                    Some((name, range)) => Ok((Expr::Variable(name), SourceRange::new(start, range.end))),
                    None => Err(self.error("expected variable name")),
                }
            }
            Some('(') => {
                self.bump();
                let (inner, _) = self.expr()?;
                self.expect(')')?;
                Ok((inner, SourceRange::new(start, self.pos)))
            }
            Some('#') => {
                self.bump();
                let len = self
                    .rest()
                    .find(|c: char| !c.is_ascii_alphanumeric())
                    .unwrap_or(self.rest().len());
                self.pos += len;
                let text = self.source[start..self.pos].to_owned();
                Ok((Expr::String { text, quoted: false }, SourceRange::new(start, self.pos)))
            }
            _ => match self.ident() {
                Some((text, range)) => Ok((Expr::String { text, quoted: false }, range)),
                None => Err(self.error("expected expression")),
            },
        }
    }

    fn number(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let start = self.pos;
        let rest = self.rest();
        let mut len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if rest[len..].starts_with('.') {
            let fraction = &rest[len + 1..];
            let digits = fraction
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(fraction.len());
            if digits > 0 {
                len += 1 + digits;
            }
        }
        let literal = &rest[..len];
        let value = literal.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid number `{literal}`"),
            range: SourceRange::new(start, start + len),
        })?;
        self.pos += len;

        let unit = if self.eat('%') {
            Some("%".to_owned())
        } else {
            let rest = self.rest();
            let unit_len = rest
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len());
            self.pos += unit_len;
            (unit_len > 0).then(|| rest[..unit_len].to_owned())
        };
        Ok((Expr::Number { value, unit }, SourceRange::new(start, self.pos)))
    }

    fn string(&mut self, quote: char) -> Result<Spanned<Expr>, ParseError> {
        let start = self.pos;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => break,
                Some('\\') => match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => break,
                },
                Some('\n') | None => {
                    return Err(ParseError {
                        message: "unterminated string".to_owned(),
                        range: SourceRange::new(start, self.pos),
                    });
                }
                Some(c) => text.push(c),
            }
        }
        Ok((Expr::String { text, quoted: true }, SourceRange::new(start, self.pos)))
    }
}

fn starts_expression(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '"' | '\'' | '$' | '(' | '#')
}

fn binary(left: Spanned<Expr>, operator: BinaryOperator, right: Spanned<Expr>) -> Spanned<Expr> {
    let range = left.1.to(right.1);
    let expr = Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    };
    (expr, range)
}
