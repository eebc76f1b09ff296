/*
 * Handles semantic analysis of an SPL syntax tree.  This includes:
 * 1. Constructing the scoped symbol tables and the type graph for the code.
 * 2. Checking variables, procedures and types to make sure that they exist
 *    and are used as the kind of thing they were declared as.
 * 3. Type checking every statement and expression.
 *
 * Analysis runs in two passes over the same tree so that a procedure can call
 * a procedure declared later in the same declaration list and a type can be
 * used inside a body before its named declaration is textually reached.  The
 * declare pass enters every type, procedure and parameter; the check pass
 * descends into local declarations and procedure bodies against the then
 * fully populated tables.
 */
mod analyzer;
mod error;

#[cfg(test)]
mod tests;

pub mod symbol_table;

pub use analyzer::check;
pub use error::SemanticError;

use super::CompilerError;

/// Captures the failure state of any semantic analysis operation, which will,
/// if it fails, result in a [`SemanticError`] wrapped in a [`CompilerError`].
pub type SemanticResult<T> = Result<T, CompilerError<SemanticError>>;
