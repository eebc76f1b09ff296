use std::fmt;

use log::debug;

use crate::compiler::ast::*;
use crate::compiler::semantics::symbol_table::{Entry, ParamType, ScopeRef};
use crate::compiler::types::{Type, TypeKind};
use crate::compiler::CompilerError;

use super::assembly::{Inst, Operand, Reg, REG_MAX, REG_MIN};

/// Symbol of the runtime's out-of-bounds handler; the emitted bounds checks
/// branch here.
const BOUNDS_HANDLER: &str = "_indexError";

/// Runtime library symbols every compiled program imports.
const RUNTIME_IMPORTS: [&str; 10] = [
    "printi",
    "printc",
    "readi",
    "readc",
    "exit",
    "time",
    "clearAll",
    "setPixel",
    "drawLine",
    "drawCircle",
];

/// Errors generated while emitting code.  After semantic analysis and
/// storage allocation there is exactly one condition left that user input
/// can trigger: an expression nesting deeper than the register window.
#[derive(Clone, Debug, PartialEq)]
pub enum CodegenError {
    ExpressionTooComplicated,
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::ExpressionTooComplicated => write!(f, "expression too complicated"),
        }
    }
}

pub type CodegenResult<T> = Result<T, CompilerError<CodegenError>>;

/// Generates ECO32 assembly for a program that has passed semantic analysis
/// and storage allocation, returning the assembly text.
pub fn generate(program: &Program, global: &ScopeRef) -> CodegenResult<String> {
    let mut gen = CodeGen::new();
    gen.prolog();
    for decl in &program.decls {
        if let Decl::Proc(pd) = decl {
            gen.gen_proc(pd, global)?;
        }
    }
    Ok(gen.render())
}

struct CodeGen {
    code: Vec<Inst>,
    next_label: u32,
}

impl CodeGen {
    fn new() -> CodeGen {
        CodeGen {
            code: vec![],
            next_label: 0,
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for inst in &self.code {
            out.push_str(&inst.to_string());
            out.push('\n');
        }
        out
    }

    fn new_label(&mut self) -> String {
        let label = format!("L{}", self.next_label);
        self.next_label += 1;
        label
    }

    /// Validates a working register index against the window.  Every
    /// register an expression consumes goes through here, so nesting that
    /// would run past the window is caught before anything is emitted for
    /// it.
    fn reg(&self, index: u8, line: u32) -> CodegenResult<Reg> {
        if index > REG_MAX {
            Err(CompilerError::new(
                line,
                CodegenError::ExpressionTooComplicated,
            ))
        } else {
            Ok(Reg(index))
        }
    }

    fn prolog(&mut self) {
        for sym in &RUNTIME_IMPORTS {
            self.code.push(Inst::Import((*sym).into()));
        }
        self.code.push(Inst::Import(BOUNDS_HANDLER.into()));
        self.code.push(Inst::Blank);
        self.code.push(Inst::Code);
        self.code.push(Inst::Align(4));
    }

    fn gen_proc(&mut self, pd: &ProcDecl, global: &ScopeRef) -> CodegenResult<()> {
        let entry = global
            .borrow()
            .get(&pd.name)
            .expect("procedure entered during semantic analysis");
        let (scope, local_size, outgoing) = {
            let entry = entry.borrow();
            match &*entry {
                Entry::Procedure(p) => (
                    ScopeRef::clone(&p.scope),
                    p.local_var_area_size
                        .expect("storage allocation has run"),
                    p.outgoing_area_size,
                ),
                _ => panic!("'{}' entered as a non-procedure", pd.name),
            }
        };

        // A procedure that makes no call never needs its return address to
        // survive, so its frame holds only the locals and the caller's frame
        // pointer.
        let (frame_size, old_fp_offset) = match outgoing {
            Some(out) => (local_size + 8 + out, out + 4),
            None => (local_size + 4, 0),
        };
        let ra_offset = -(local_size + 8);

        debug!(
            "generating procedure '{}' ({} byte frame)",
            pd.name, frame_size
        );

        self.code.push(Inst::Blank);
        self.code.push(Inst::Export(pd.name.clone()));
        self.code.push(Inst::Label(pd.name.clone()));
        self.code
            .push(Inst::Sub(Reg::SP, Reg::SP, Operand::Imm(frame_size)));
        self.code.push(Inst::Stw(Reg::FP, Reg::SP, old_fp_offset));
        self.code
            .push(Inst::Add(Reg::FP, Reg::SP, Operand::Imm(frame_size)));
        if outgoing.is_some() {
            self.code.push(Inst::Stw(Reg::RA, Reg::FP, ra_offset));
        }

        for stmt in &pd.body {
            self.gen_stmt(stmt, &scope)?;
        }

        if outgoing.is_some() {
            self.code.push(Inst::Ldw(Reg::RA, Reg::FP, ra_offset));
        }
        self.code.push(Inst::Ldw(Reg::FP, Reg::SP, old_fp_offset));
        self.code
            .push(Inst::Add(Reg::SP, Reg::SP, Operand::Imm(frame_size)));
        self.code.push(Inst::Jr(Reg::RA));
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt, scope: &ScopeRef) -> CodegenResult<()> {
        match stmt {
            Stmt::Empty(_) => Ok(()),
            Stmt::Compound(c) => {
                for s in &c.stmts {
                    self.gen_stmt(s, scope)?;
                }
                Ok(())
            }
            Stmt::Assign(a) => {
                self.gen_variable(&a.target, scope, REG_MIN)?;
                self.gen_expr(&a.value, scope, REG_MIN + 1)?;
                self.code
                    .push(Inst::Stw(Reg(REG_MIN + 1), Reg(REG_MIN), 0));
                Ok(())
            }
            Stmt::If(i) => match &i.else_branch {
                None => {
                    let end = self.new_label();
                    self.gen_cond(&i.cond, scope, REG_MIN, &end)?;
                    self.gen_stmt(&i.then_branch, scope)?;
                    self.code.push(Inst::Label(end));
                    Ok(())
                }
                Some(else_branch) => {
                    let else_label = self.new_label();
                    self.gen_cond(&i.cond, scope, REG_MIN, &else_label)?;
                    self.gen_stmt(&i.then_branch, scope)?;
                    let end = self.new_label();
                    self.code.push(Inst::J(end.clone()));
                    self.code.push(Inst::Label(else_label));
                    self.gen_stmt(else_branch, scope)?;
                    self.code.push(Inst::Label(end));
                    Ok(())
                }
            },
            Stmt::While(w) => {
                let top = self.new_label();
                let end = self.new_label();
                self.code.push(Inst::Label(top.clone()));
                self.gen_cond(&w.cond, scope, REG_MIN, &end)?;
                self.gen_stmt(&w.body, scope)?;
                self.code.push(Inst::J(top));
                self.code.push(Inst::Label(end));
                Ok(())
            }
            Stmt::Call(c) => self.gen_call(c, scope),
        }
    }

    /// Stages each argument into the callee's incoming slot at the matching
    /// parameter offset, then transfers control.  A reference formal
    /// receives the argument's address, a value formal its value; both are
    /// computed into the bottom of the register window since nothing is
    /// live across arguments.
    fn gen_call(&mut self, call: &CallStmt, scope: &ScopeRef) -> CodegenResult<()> {
        let entry = scope
            .borrow()
            .lookup(&call.name)
            .expect("callee resolved during semantic analysis");
        let params: Vec<ParamType> = match &*entry.borrow() {
            Entry::Procedure(p) => p.params.clone(),
            _ => panic!("'{}' called as a non-procedure", call.name),
        };

        for (arg, param) in call.args.iter().zip(&params) {
            if param.is_ref {
                match arg {
                    Expr::Variable(v) => {
                        self.gen_variable(&v.var, scope, REG_MIN)?;
                    }
                    _ => panic!("reference argument is a variable after semantic analysis"),
                }
            } else {
                self.gen_expr(arg, scope, REG_MIN)?;
            }
            let offset = param
                .offset
                .expect("parameter offsets assigned during storage allocation");
            self.code.push(Inst::Stw(Reg(REG_MIN), Reg::SP, offset));
        }
        self.code.push(Inst::Jal(call.name.clone()));
        Ok(())
    }

    /// Evaluates `expr` into working register `target`; subexpressions use
    /// `target + 1` upward.
    fn gen_expr(&mut self, expr: &Expr, scope: &ScopeRef, target: u8) -> CodegenResult<()> {
        match expr {
            Expr::Int(i) => {
                let d = self.reg(target, i.line)?;
                self.code.push(Inst::Add(d, Reg::ZERO, Operand::Imm(i.value)));
                Ok(())
            }
            Expr::Variable(v) => {
                self.gen_variable(&v.var, scope, target)?;
                let d = self.reg(target, v.line)?;
                self.code.push(Inst::Ldw(d, d, 0));
                Ok(())
            }
            Expr::Binary(b) => {
                self.gen_expr(&b.left, scope, target)?;
                self.gen_expr(&b.right, scope, target + 1)?;
                let d = self.reg(target, b.line)?;
                let s = Operand::Reg(Reg(target + 1));
                let inst = match b.op {
                    BinaryOp::Add => Inst::Add(d, d, s),
                    BinaryOp::Sub => Inst::Sub(d, d, s),
                    BinaryOp::Mul => Inst::Mul(d, d, s),
                    BinaryOp::Div => Inst::Div(d, d, s),
                    // Comparisons only occur as `if`/`while` tests and are
                    // compiled by gen_cond.
                    _ => panic!("comparison outside a condition after semantic analysis"),
                };
                self.code.push(inst);
                Ok(())
            }
        }
    }

    /// Compiles a boolean test: evaluates both operands and emits the
    /// *inverted* branch to `false_label`, so the true case falls through.
    fn gen_cond(
        &mut self,
        cond: &Expr,
        scope: &ScopeRef,
        target: u8,
        false_label: &str,
    ) -> CodegenResult<()> {
        match cond {
            Expr::Binary(b) if b.op.is_comparison() => {
                self.gen_expr(&b.left, scope, target)?;
                self.gen_expr(&b.right, scope, target + 1)?;
                let a = self.reg(target, b.line)?;
                let c = Reg(target + 1);
                let lbl = false_label.to_string();
                let inst = match b.op {
                    BinaryOp::Eq => Inst::Bne(a, c, lbl),
                    BinaryOp::Neq => Inst::Beq(a, c, lbl),
                    BinaryOp::Lt => Inst::Bge(a, c, lbl),
                    BinaryOp::Le => Inst::Bgt(a, c, lbl),
                    BinaryOp::Gt => Inst::Ble(a, c, lbl),
                    BinaryOp::Ge => Inst::Blt(a, c, lbl),
                    _ => unreachable!(),
                };
                self.code.push(inst);
                Ok(())
            }
            _ => panic!("condition is a comparison after semantic analysis"),
        }
    }

    /// Computes the address of `var` into `target` and returns the
    /// variable's type, which the callers use for element sizes and bounds.
    /// A reference parameter's slot holds an address, so it costs one extra
    /// indirection before the frame offset addressing is usable.
    fn gen_variable(
        &mut self,
        var: &Variable,
        scope: &ScopeRef,
        target: u8,
    ) -> CodegenResult<Type> {
        match var {
            Variable::Simple(s) => {
                let d = self.reg(target, s.line)?;
                let entry = scope
                    .borrow()
                    .lookup(&s.name)
                    .expect("variable resolved during semantic analysis");
                let entry = entry.borrow();
                let v = match &*entry {
                    Entry::Variable(v) => v,
                    _ => panic!("'{}' referenced as a non-variable", s.name),
                };
                let offset = v
                    .offset
                    .expect("offsets assigned during storage allocation");
                self.code.push(Inst::Add(d, Reg::FP, Operand::Imm(offset)));
                if v.is_ref {
                    self.code.push(Inst::Ldw(d, d, 0));
                }
                Ok(v.ty.clone())
            }
            Variable::Array(a) => {
                let ty = self.gen_variable(&a.array, scope, target)?;
                let (element_count, base) = match ty.kind() {
                    TypeKind::Array {
                        element_count,
                        base,
                        ..
                    } => (*element_count, base.clone()),
                    _ => panic!("indexed variable is an array after semantic analysis"),
                };
                self.gen_expr(&a.index, scope, target + 1)?;
                let d = Reg(target);
                let i = Reg(target + 1);
                let bound = self.reg(target + 2, a.line)?;
                self.code
                    .push(Inst::Add(bound, Reg::ZERO, Operand::Imm(element_count)));
                self.code
                    .push(Inst::Bgeu(i, bound, BOUNDS_HANDLER.into()));
                self.code
                    .push(Inst::Mul(i, i, Operand::Imm(base.byte_size())));
                self.code.push(Inst::Add(d, d, Operand::Reg(i)));
                Ok(base)
            }
        }
    }
}
