/*
 * The SPL syntax tree.  An external parser builds these nodes through the
 * public constructors; the compiler phases only ever read them.
 *
 * Every node records the source line it came from so that diagnostics can
 * point at it.  The list shaped constructs (declaration lists, statement
 * lists, argument lists) are ordinary vectors whose emptiness is what
 * terminates the recursions that walk them.
 */
mod declaration;
mod expression;
mod statement;

pub use declaration::{ArrayTypeExpr, Decl, NameTypeExpr, ParamDecl, ProcDecl, TypeDecl, TypeExpr, VarDecl};
pub use expression::{ArrayVar, BinaryExpr, BinaryOp, Expr, IntExpr, SimpleVar, Variable, VariableExpr};
pub use statement::{AssignStmt, CallStmt, CompoundStmt, EmptyStmt, IfStmt, Stmt, WhileStmt};

/// A complete compilation unit: the list of global declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn new(decls: Vec<Decl>) -> Program {
        Program { decls }
    }
}
