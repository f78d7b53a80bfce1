//! Turning a triggering value into a diagnostic message.

/// A value that can be the subject of `@warn` or `@debug`.
pub trait Loggable {
    /// The text of a textual value, without quotes. `None` for anything else.
    fn as_text(&self) -> Option<&str>;

    /// The value in the language's standard external representation.
    fn inspect(&self) -> String;
}

/// Textual values are used verbatim; everything else is inspected.
pub fn derive_message<V: Loggable + ?Sized>(value: &V) -> String {
    match value.as_text() {
        Some(text) => text.to_owned(),
        None => value.inspect(),
    }
}

impl Loggable for str {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }

    fn inspect(&self) -> String {
        format!("\"{}\"", self.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

impl Loggable for String {
    fn as_text(&self) -> Option<&str> {
        Some(self.as_str())
    }

    fn inspect(&self) -> String {
        self.as_str().inspect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Number(f64);

    impl Loggable for Number {
        fn as_text(&self) -> Option<&str> {
            None
        }

        fn inspect(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(derive_message("oops"), "oops");
        assert_eq!(derive_message(&String::from("say \"hi\"")), "say \"hi\"");
    }

    #[test]
    fn test_other_values_are_inspected() {
        assert_eq!(derive_message(&Number(1.5)), "1.5");
    }

    #[test]
    fn test_inspect_quotes_text() {
        assert_eq!("a\"b".inspect(), "\"a\\\"b\"");
    }
}
