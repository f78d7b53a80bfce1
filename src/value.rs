//! Runtime values produced by the evaluator.

use std::fmt;

use cascade_logger::Loggable;

/// Digits kept after the decimal point when a number is written out.
const PRECISION: i32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number { value: f64, unit: Option<String> },
    String { text: String, quoted: bool },
    List(Vec<Value>),
}

impl Value {
    pub fn number(value: f64, unit: Option<String>) -> Self {
        Value::Number { value, unit }
    }

    /// The text of a string, or the representation of anything else. Used
    /// when concatenating.
    pub fn to_text(&self) -> String {
        match self {
            Value::String { text, .. } => text.clone(),
            other => other.to_string(),
        }
    }
}

/// The standard external representation: numbers without trailing zeros,
/// quoted strings with their quotes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number { value, unit } => {
                write_number(f, *value)?;
                if let Some(unit) = unit {
                    f.write_str(unit)?;
                }
                Ok(())
            }
            Value::String { text, quoted: true } => f.write_str(&text.inspect()),
            Value::String { text, quoted: false } => f.write_str(text),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("NaN");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let scale = 10f64.powi(PRECISION);
    let mut rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        // Avoid printing `-0`.
        rounded = 0.0;
    }
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        write!(f, "{}", rounded as i64)
    } else {
        write!(f, "{rounded}")
    }
}

impl Loggable for Value {
    fn as_text(&self) -> Option<&str> {
        match self {
            Value::String { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    fn inspect(&self) -> String {
        self.to_string()
    }
}
