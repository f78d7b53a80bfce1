//! Call-stack rendering for warnings.

use cascade_span::Span;

/// Member name used for the outermost frame.
pub const ROOT_MEMBER: &str = "root stylesheet";

/// Renders the logical call stack at the point a warning is issued.
///
/// The compiler injects this so the dispatcher never reaches into evaluator
/// state on its own.
pub trait StackTrace {
    fn render(&self) -> String;
}

impl<F> StackTrace for F
where
    F: Fn() -> String,
{
    fn render(&self) -> String {
        self()
    }
}

/// One active mixin or function invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub member: String,
    /// Where the invocation happened in the caller.
    pub call_site: Span,
}

/// The evaluator's stack of active invocations, outermost first.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, member: impl Into<String>, call_site: Span) {
        self.frames.push(Frame {
            member: member.into(),
            call_site,
        });
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The stack as seen from `current`, the node being evaluated.
    pub fn at<'a>(&'a self, current: &'a Span) -> Trace<'a> {
        Trace {
            stack: self,
            current,
        }
    }
}

/// A [`CallStack`] snapshot anchored at the node currently being evaluated.
#[derive(Clone, Copy, Debug)]
pub struct Trace<'a> {
    stack: &'a CallStack,
    current: &'a Span,
}

impl StackTrace for Trace<'_> {
    /// One line per frame, innermost first: `<url> <line>:<col>  <member>`.
    fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.stack.depth() + 1);
        let mut position = self.current;
        for frame in self.stack.frames.iter().rev() {
            lines.push(format!("{position}  {}", frame.member));
            position = &frame.call_site;
        }
        lines.push(format!("{position}  {ROOT_MEMBER}"));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use cascade_span::{LineIndex, SourceUrl};
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_root_only() {
        let index = LineIndex::new("@warn 1;");
        let span = index.span(None, 0, 7, false).unwrap();
        let stack = CallStack::new();
        assert_eq!(stack.at(&span).render(), "- 1:1  root stylesheet");
    }

    #[test]
    fn test_nested_frames_innermost_first() {
        let source = "@mixin a { @warn 1; }\n@mixin b { @include a; }\n@include b;\n";
        let index = LineIndex::new(source);
        let url = SourceUrl::parse("file:///a.scss").ok();
        let include_b = index.span(url.clone(), 47, 57, false).unwrap();
        let include_a = index.span(url.clone(), 33, 43, false).unwrap();
        let warn = index.span(url, 11, 18, false).unwrap();

        let mut stack = CallStack::new();
        stack.push("b()", include_b);
        stack.push("a()", include_a);
        assert_snapshot!(stack.at(&warn).render(), @r"
        file:///a.scss 1:12  a()
        file:///a.scss 2:12  b()
        file:///a.scss 3:1  root stylesheet
        ");

        stack.pop();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_closure_renderer() {
        let renderer = || "custom".to_owned();
        assert_eq!(StackTrace::render(&renderer), "custom");
    }
}
