#![allow(dead_code)]

pub mod compiler;

pub use compiler::ast;
pub use compiler::eco32::generate;
pub use compiler::memory::allocate;
pub use compiler::semantics::check;
pub use compiler::types::{Type, TypeKind};
pub use compiler::CompilerError;
