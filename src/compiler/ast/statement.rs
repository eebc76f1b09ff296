use super::expression::{Expr, Variable};

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Empty(EmptyStmt),
    Compound(CompoundStmt),
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    Call(CallStmt),
}

impl Stmt {
    pub fn empty(line: u32) -> Stmt {
        Stmt::Empty(EmptyStmt { line })
    }

    pub fn compound(stmts: Vec<Stmt>, line: u32) -> Stmt {
        Stmt::Compound(CompoundStmt { stmts, line })
    }

    pub fn assign(target: Variable, value: Expr, line: u32) -> Stmt {
        Stmt::Assign(AssignStmt {
            target,
            value,
            line,
        })
    }

    pub fn if_then(cond: Expr, then_branch: Stmt, line: u32) -> Stmt {
        Stmt::If(IfStmt {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: None,
            line,
        })
    }

    pub fn if_else(cond: Expr, then_branch: Stmt, else_branch: Stmt, line: u32) -> Stmt {
        Stmt::If(IfStmt {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: Some(Box::new(else_branch)),
            line,
        })
    }

    pub fn while_do(cond: Expr, body: Stmt, line: u32) -> Stmt {
        Stmt::While(WhileStmt {
            cond,
            body: Box::new(body),
            line,
        })
    }

    pub fn call(name: &str, args: Vec<Expr>, line: u32) -> Stmt {
        Stmt::Call(CallStmt {
            name: name.into(),
            args,
            line,
        })
    }

    pub fn line(&self) -> u32 {
        match self {
            Stmt::Empty(s) => s.line,
            Stmt::Compound(s) => s.line,
            Stmt::Assign(s) => s.line,
            Stmt::If(s) => s.line,
            Stmt::While(s) => s.line,
            Stmt::Call(s) => s.line,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmptyStmt {
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompoundStmt {
    pub stmts: Vec<Stmt>,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssignStmt {
    pub target: Variable,
    pub value: Expr,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Box<Stmt>,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallStmt {
    pub name: String,
    pub args: Vec<Expr>,
    pub line: u32,
}
