//! Tree-walking evaluator.
//!
//! Evaluates a parsed stylesheet into CSS. `@warn`, `@debug` and the
//! evaluator's own deprecation notices are handed to the [`Dispatcher`] in the
//! order they are reached.

use std::collections::HashMap;
use std::fmt::Write as _;

use cascade_logger::{CallStack, Dispatcher};
use cascade_span::{LineIndex, SourceUrl, Span};

use crate::ast::{BinaryOperator, Block, Expr, Identifier, SourceRange, Spanned, Statement};
use crate::compile::CancelFlag;
use crate::error::{CompileError, CompileResult};
use crate::value::Value;

/// A style rule in the output.
#[derive(Clone, Debug, PartialEq)]
struct CssRule {
    selector: String,
    declarations: Vec<(String, String)>,
}

pub struct Evaluator<'a> {
    index: &'a LineIndex,
    url: Option<&'a SourceUrl>,
    dispatcher: Dispatcher<'a>,
    include_context: bool,
    cancel: Option<&'a CancelFlag>,
    stack: CallStack,
    globals: HashMap<Identifier, Value>,
    /// Block scopes of the member currently executing, innermost last.
    scopes: Vec<HashMap<Identifier, Value>>,
    mixins: HashMap<Identifier, &'a Block>,
    rules: Vec<CssRule>,
    selectors: Vec<String>,
    current_rule: Option<usize>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        index: &'a LineIndex,
        url: Option<&'a SourceUrl>,
        dispatcher: Dispatcher<'a>,
        include_context: bool,
        cancel: Option<&'a CancelFlag>,
    ) -> Self {
        Self {
            index,
            url,
            dispatcher,
            include_context,
            cancel,
            stack: CallStack::new(),
            globals: HashMap::new(),
            scopes: Vec::new(),
            mixins: HashMap::new(),
            rules: Vec::new(),
            selectors: Vec::new(),
            current_rule: None,
        }
    }

    /// Evaluate `statements` and return the CSS they produce.
    pub fn run(mut self, statements: &'a Block) -> CompileResult<String> {
        self.block(statements)?;
        self.check_cancelled()?;
        Ok(self.css())
    }

    /// Stop as soon as the host cancels, including between the diagnostics
    /// of a single statement.
    fn check_cancelled(&self) -> CompileResult<()> {
        if self.cancel.is_some_and(CancelFlag::is_cancelled) {
            tracing::debug!("compilation cancelled");
            return Err(CompileError::Cancelled);
        }
        Ok(())
    }

    fn block(&mut self, block: &'a Block) -> CompileResult<()> {
        for statement in block {
            self.statement(statement)?;
        }
        Ok(())
    }

    fn statement(&mut self, (statement, range): &'a Spanned<Statement>) -> CompileResult<()> {
        self.check_cancelled()?;
        match statement {
            Statement::Assign { name, value } => {
                let value = self.expr(value)?;
                self.assign(name, value);
            }
            Statement::Warn(value) => {
                let value = self.expr(value)?;
                let span = self.span(*range)?;
                self.check_cancelled()?;
                self.dispatcher
                    .warn_value(&value, Some(span.clone()), false, &self.stack.at(&span))?;
            }
            Statement::Debug(value) => {
                let value = self.expr(value)?;
                let span = self.span(*range)?;
                self.check_cancelled()?;
                self.dispatcher.debug_value(&value, span)?;
            }
            Statement::Mixin { name, body } => {
                self.mixins.insert(name.clone(), body);
            }
            Statement::Include { name } => {
                let span = self.span(*range)?;
                let Some(body) = self.mixins.get(name).copied() else {
                    return Err(CompileError::UndefinedMixin {
                        name: name.clone(),
                        span,
                    });
                };
                tracing::trace!(mixin = %name, depth = self.stack.depth(), "including mixin");
                self.stack.push(format!("{name}()"), span);
                let caller_scopes = std::mem::replace(&mut self.scopes, vec![HashMap::new()]);
                let result = self.block(body);
                self.scopes = caller_scopes;
                self.stack.pop();
                result?;
            }
            Statement::Rule { selector, body } => {
                let selector = match self.selectors.last() {
                    Some(parent) if selector.contains('&') => selector.replace('&', parent),
                    Some(parent) => format!("{parent} {selector}"),
                    None => selector.clone(),
                };
                self.rules.push(CssRule {
                    selector: selector.clone(),
                    declarations: Vec::new(),
                });
                let parent_rule = self.current_rule.replace(self.rules.len() - 1);
                self.selectors.push(selector);
                self.scopes.push(HashMap::new());
                let result = self.block(body);
                self.scopes.pop();
                self.selectors.pop();
                self.current_rule = parent_rule;
                result?;
            }
            Statement::Declaration { property, value } => {
                let Some(rule) = self.current_rule else {
                    return Err(CompileError::Operation {
                        message: "Declarations may only be used within style rules.".to_owned(),
                        span: self.span(*range)?,
                    });
                };
                let value = self.expr(value)?;
                self.rules[rule]
                    .declarations
                    .push((property.clone(), value.to_string()));
            }
        }
        Ok(())
    }

    fn assign(&mut self, name: &str, value: Value) {
        if let Some(scope) = self
            .scopes
            .iter_mut()
            .rev()
            .find(|scope| scope.contains_key(name))
        {
            scope.insert(name.to_owned(), value);
        } else if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_owned(), value);
        } else {
            self.globals.insert(name.to_owned(), value);
        }
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
    }

    fn expr(&mut self, (expr, range): &Spanned<Expr>) -> CompileResult<Value> {
        Ok(match expr {
            Expr::Number { value, unit } => Value::number(*value, unit.clone()),
            Expr::String { text, quoted } => Value::String {
                text: text.clone(),
                quoted: *quoted,
            },
            Expr::Variable(name) => match self.lookup(name) {
                Some(value) => value.clone(),
                None => {
                    return Err(CompileError::UndefinedVariable {
                        name: name.clone(),
                        span: self.span(*range)?,
                    });
                }
            },
            Expr::Negate(operand) => match self.expr(operand)? {
                Value::Number { value, unit } => Value::number(-value, unit),
                other => {
                    return Err(CompileError::Operation {
                        message: format!("Undefined operation \"-{other}\"."),
                        span: self.span(*range)?,
                    });
                }
            },
            Expr::List(items) => Value::List(
                items
                    .iter()
                    .map(|item| self.expr(item))
                    .collect::<CompileResult<_>>()?,
            ),
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.expr(left)?;
                let right = self.expr(right)?;
                if *operator == BinaryOperator::Divide {
                    self.warn_slash_division(&left, &right, *range)?;
                }
                self.binary(*operator, left, right, *range)?
            }
        })
    }

    /// `/` between two numbers is slated to become a separator.
    fn warn_slash_division(
        &self,
        left: &Value,
        right: &Value,
        range: SourceRange,
    ) -> CompileResult<()> {
        if !matches!((left, right), (Value::Number { .. }, Value::Number { .. })) {
            return Ok(());
        }
        self.check_cancelled()?;
        let span = self.span(range)?;
        let message = format!(
            "Using / for division is deprecated and will be removed in a future release. \
             Recommendation: math.div({left}, {right})"
        );
        self.dispatcher
            .warn(&message, Some(span.clone()), true, &self.stack.at(&span))?;
        Ok(())
    }

    fn binary(
        &self,
        operator: BinaryOperator,
        left: Value,
        right: Value,
        range: SourceRange,
    ) -> CompileResult<Value> {
        match (operator, left, right) {
            (
                operator,
                Value::Number {
                    value: a,
                    unit: left_unit,
                },
                Value::Number {
                    value: b,
                    unit: right_unit,
                },
            ) => self.arithmetic(operator, (a, left_unit), (b, right_unit), range),
            (BinaryOperator::Add, Value::String { text, quoted }, right) => Ok(Value::String {
                text: text + &right.to_text(),
                quoted,
            }),
            (BinaryOperator::Add, left, Value::String { text, quoted }) => Ok(Value::String {
                text: left.to_text() + &text,
                quoted,
            }),
            (operator, left, right) => Err(CompileError::Operation {
                message: format!(
                    "Undefined operation \"{left} {} {right}\".",
                    operator.symbol()
                ),
                span: self.span(range)?,
            }),
        }
    }

    fn arithmetic(
        &self,
        operator: BinaryOperator,
        (a, left_unit): (f64, Option<String>),
        (b, right_unit): (f64, Option<String>),
        range: SourceRange,
    ) -> CompileResult<Value> {
        let incompatible = |left: &str, right: &str| -> CompileResult<Value> {
            Err(CompileError::Operation {
                message: format!(
                    "Incompatible units {left} and {right} for `{}`.",
                    operator.symbol()
                ),
                span: self.span(range)?,
            })
        };
        match operator {
            BinaryOperator::Add | BinaryOperator::Subtract => {
                let unit = match (left_unit, right_unit) {
                    (Some(l), Some(r)) if l != r => return incompatible(&l, &r),
                    (l, r) => l.or(r),
                };
                let value = if operator == BinaryOperator::Add {
                    a + b
                } else {
                    a - b
                };
                Ok(Value::number(value, unit))
            }
            BinaryOperator::Multiply => match (left_unit, right_unit) {
                (Some(l), Some(r)) => incompatible(&l, &r),
                (l, r) => Ok(Value::number(a * b, l.or(r))),
            },
            BinaryOperator::Divide => match (left_unit, right_unit) {
                (Some(l), Some(r)) if l == r => Ok(Value::number(a / b, None)),
                (l, None) => Ok(Value::number(a / b, l)),
                (l, Some(r)) => incompatible(l.as_deref().unwrap_or("(none)"), &r),
            },
        }
    }

    /// Convert a byte range from the parser into a span over the file.
    fn span(&self, range: SourceRange) -> CompileResult<Span> {
        let start = self.index.utf16_offset(range.start)?;
        let end = self.index.utf16_offset(range.end)?;
        Ok(self
            .index
            .span(self.url.cloned(), start, end, self.include_context)?)
    }

    fn css(&self) -> String {
        let mut out = String::new();
        for rule in self.rules.iter().filter(|rule| !rule.declarations.is_empty()) {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "{} {{", rule.selector);
            for (property, value) in &rule.declarations {
                let _ = writeln!(out, "  {property}: {value};");
            }
            out.push_str("}\n");
        }
        out
    }
}
