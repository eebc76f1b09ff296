/**
 * Target specific storage layout for a checked program.
 *
 * The allocator decides where every parameter and local variable lives
 * within its procedure's stack frame and how much room each procedure must
 * reserve for the arguments of the calls it makes.  The results are written
 * in place onto the symbol table entries built by semantic analysis; no new
 * entries are created.
 */
mod layout;

pub use layout::{allocate, REF_BYTE_SIZE};
