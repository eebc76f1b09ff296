/*!
 # ECO32
 ## About
 This module models the subset of the ECO32 assembly language that compiled
 SPL programs use and translates a checked, storage-allocated syntax tree
 into it.

 The generator works on a flat instruction list (`Vec<Inst>`) and renders it
 to text at the very end, so tests can inspect instructions structurally and
 the textual layout lives in exactly one place (the `Display` impls).
*/
mod assembly;
mod codegen;

pub use assembly::{Inst, Operand, Reg, REG_MAX, REG_MIN};
pub use codegen::{generate, CodegenError, CodegenResult};
