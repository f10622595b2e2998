//! Source code representation and diagnostics.

use std::{cell::RefCell, fmt, ops::Range};

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the 1-based line and column for a byte position in `content`.
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let pos = pos.min(self.content.len());
        let before = &self.content[..pos];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => pos - newline,
            None => pos + 1,
        };
        (line, column)
    }

    /// Renders every accumulated error with its line:column position.
    pub fn render_errors(&self) -> String {
        let mut out = String::new();
        self.errors.for_each(|error| {
            let (line, column) = self.line_col(error.span().start);
            out.push_str(&format!(
                "error: {message} at {line}:{column}\n",
                message = error.message(),
                line = line,
                column = column
            ));
        });
        out
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// Represents a compile time error.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    message: String,
    span: Range<usize>,
}

impl CompileError {
    /// Create a new error with the specified `message` and `span`.
    pub fn new(message: impl ToString, span: Range<usize>) -> Self {
        Self {
            message: message.to_string(),
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte range of the offending source text.
    pub fn span(&self) -> &Range<usize> {
        &self.span
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error: {message} at position {position}",
            message = self.message,
            position = self.span.start
        )
    }
}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<CompileError>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern so the lexer, parser and
    /// code generator can all report errors without threading `&mut` everywhere.
    pub fn add_error(&self, error: CompileError) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Calls `f` on every accumulated error, in the order they were reported.
    pub fn for_each(&self, mut f: impl FnMut(&CompileError)) {
        for error in self.errors.borrow().iter() {
            f(error);
        }
    }

    /// Returns a copy of the accumulated errors.
    pub fn errors(&self) -> Vec<CompileError> {
        self.errors.borrow().clone()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col() {
        let source = Source::new("fn main() -> int {\n    ret 0;\n}\n");
        assert_eq!(source.line_col(0), (1, 1));
        assert_eq!(source.line_col(3), (1, 4));
        assert_eq!(source.line_col(19), (2, 1));
        assert_eq!(source.line_col(23), (2, 5));
        // past the end clamps to the last position
        assert_eq!(source.line_col(1000), (4, 1));
    }

    #[test]
    fn accumulates_errors() {
        let source = Source::new("var\nvar");
        assert!(source.has_no_errors());
        source.errors.add_error(CompileError::new("first", 0..3));
        source.errors.add_error(CompileError::new("second", 4..7));
        assert_eq!(source.errors.len(), 2);
        assert_eq!(
            source.render_errors(),
            "error: first at 1:1\nerror: second at 2:1\n"
        );
    }

    #[test]
    fn error_display() {
        let error = CompileError::new("unexpected token", 7..8);
        assert_eq!(error.to_string(), "error: unexpected token at position 7");
    }
}
