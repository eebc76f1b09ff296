/**
 * The compiler takes an SPL syntax tree that an external parser has built and
 * converts it into ECO32 assembly language.
 *
 * This happens in three phases which run strictly one after the other:
 *
 * 1. Semantic analysis (`semantics`): builds the scoped symbol tables and the
 * type graph for the program and rejects any program which is ill-formed or
 * ill-typed.  This is the last phase where a user error can occur: analysis is
 * fail fast and the first violation aborts the compilation with a
 * line-numbered diagnostic.
 *
 * 2. Storage allocation (`memory`): computes the stack frame layout for every
 * procedure.  Incoming parameters get non-negative frame offsets, local
 * variables get negative ones, and every procedure learns how much space it
 * must reserve for the arguments of the calls it makes.  The results are
 * written in place onto the symbol table entries the analyzer created.
 *
 * 3. Code generation (`eco32`): walks the tree once and emits the target
 * assembly text.  After analysis and allocation have succeeded the input is
 * considered correct and compilable, so any inconsistency discovered here can
 * only be a bug in the compiler itself; the policy for those is to panic at
 * the point of discovery.  The one user-visible failure left in this phase is
 * exhausting the fixed register window on a deeply nested expression.
 */
pub mod ast;
pub mod eco32;
pub mod memory;
pub mod semantics;
pub mod types;

mod error;

pub use error::CompilerError;
