use std::fmt;

/// Represents all errors that are generated from within the compiler and its
/// phase submodules.
///
/// This type captures the metadata which is present for every error caused by
/// input source code: the line number the error occurs on.  The inner error
/// carries the metadata which is specific to a phase of the compiler (the
/// phases define their own error enums and store them in `inner`).
#[derive(Clone, Debug, PartialEq)]
pub struct CompilerError<IE> {
    line: u32,
    inner: IE,
}

impl<IE> CompilerError<IE> {
    pub fn new(line: u32, inner: IE) -> Self {
        CompilerError { line, inner }
    }

    pub fn inner(self) -> IE {
        self.inner
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl<IE: fmt::Display> fmt::Display for CompilerError<IE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Line 0 marks errors with no meaningful source position, such as a
        // missing `main` procedure.
        if self.line == 0 {
            write!(f, "{}", self.inner)
        } else {
            write!(f, "L{}: {}", self.line, self.inner)
        }
    }
}

impl<IE: fmt::Display + fmt::Debug> std::error::Error for CompilerError<IE> {}
