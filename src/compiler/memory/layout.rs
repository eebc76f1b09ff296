use log::debug;

use crate::compiler::ast::*;
use crate::compiler::semantics::symbol_table::{Entry, ProcedureEntry, ScopeRef};

/// Byte size of the address slot a reference parameter occupies.
pub const REF_BYTE_SIZE: i32 = 4;

/// Computes the stack frame layout for every procedure, mutating symbol
/// table entries in place.  Must only run on a program that passed semantic
/// analysis; an unresolved name here is a compiler bug, not a user error.
///
/// Three numbers come out of this per procedure: the incoming parameter
/// area size, the local variable area size, and the outgoing argument area
/// size, which is `None` for procedures that make no calls.
pub fn allocate(program: &Program, global: &ScopeRef) {
    // Parameter offsets first, for every procedure entry including the
    // runtime library: call sites need the callee's incoming layout, and the
    // outgoing area computation below needs every parameter area size.
    debug!("assigning parameter offsets");
    {
        let scope = global.borrow();
        for entry in scope.entries().values() {
            if let Entry::Procedure(proc) = &mut *entry.borrow_mut() {
                assign_param_offsets(proc);
            }
        }
    }

    for decl in &program.decls {
        if let Decl::Proc(pd) = decl {
            allocate_proc(pd, global);
        }
    }
}

/// Walks a parameter list in declaration order, assigning increasing
/// non-negative offsets: a reference parameter consumes one address slot, a
/// value parameter consumes its type's byte size.  The final cursor is the
/// parameter area size the caller must provide.
fn assign_param_offsets(proc: &mut ProcedureEntry) {
    let mut offset = 0;
    for param in &mut proc.params {
        param.offset = Some(offset);
        offset += if param.is_ref {
            REF_BYTE_SIZE
        } else {
            param.ty.byte_size()
        };
    }
    proc.param_area_size = Some(offset);
}

fn allocate_proc(pd: &ProcDecl, global: &ScopeRef) {
    let entry = global
        .borrow()
        .get(&pd.name)
        .expect("procedure entered during semantic analysis");

    let (scope, param_offsets) = {
        let entry = entry.borrow();
        match &*entry {
            Entry::Procedure(p) => (
                ScopeRef::clone(&p.scope),
                p.params.iter().map(|p| p.offset).collect::<Vec<_>>(),
            ),
            _ => panic!("'{}' entered as a non-procedure", pd.name),
        }
    };

    // Parameters are addressed through their variable entries in the
    // procedure scope, so the offsets just assigned are copied over.
    for (pdecl, offset) in pd.params.iter().zip(param_offsets) {
        set_var_offset(&scope, &pdecl.name, offset);
    }

    // Locals grow downward from the frame pointer.
    let mut cursor = 0;
    for vdecl in &pd.locals {
        let var = scope
            .borrow()
            .get(&vdecl.name)
            .expect("local entered during semantic analysis");
        if let Entry::Variable(v) = &mut *var.borrow_mut() {
            cursor -= v.ty.byte_size();
            v.offset = Some(cursor);
        };
    }
    let local_var_area_size = -cursor;

    let outgoing_area_size = outgoing_area_of_stmts(&pd.body, global);

    debug!(
        "procedure '{}': locals {} bytes, outgoing {:?}",
        pd.name, local_var_area_size, outgoing_area_size
    );

    if let Entry::Procedure(p) = &mut *entry.borrow_mut() {
        p.local_var_area_size = Some(local_var_area_size);
        p.outgoing_area_size = outgoing_area_size;
    };
}

fn set_var_offset(scope: &ScopeRef, name: &str, offset: Option<i32>) {
    let var = scope
        .borrow()
        .get(name)
        .expect("parameter entered during semantic analysis");
    if let Entry::Variable(v) = &mut *var.borrow_mut() {
        v.offset = offset;
    };
}

/// Largest parameter area needed by any call reachable from `stmts`.
/// Sequential statements and mutually exclusive branches both combine by
/// maximum: only one call is ever in flight at a time, so the frame only
/// needs to fit the worst single call.  `None` means no call at all.
fn outgoing_area_of_stmts(stmts: &[Stmt], global: &ScopeRef) -> Option<i32> {
    stmts.iter().fold(None, |acc, s| {
        max_area(acc, outgoing_area_of_stmt(s, global))
    })
}

fn outgoing_area_of_stmt(stmt: &Stmt, global: &ScopeRef) -> Option<i32> {
    match stmt {
        Stmt::Empty(_) | Stmt::Assign(_) => None,
        Stmt::Compound(c) => outgoing_area_of_stmts(&c.stmts, global),
        Stmt::If(i) => {
            let then_area = outgoing_area_of_stmt(&i.then_branch, global);
            let else_area = match &i.else_branch {
                Some(e) => outgoing_area_of_stmt(e, global),
                None => None,
            };
            max_area(then_area, else_area)
        }
        Stmt::While(w) => outgoing_area_of_stmt(&w.body, global),
        Stmt::Call(c) => {
            let entry = global
                .borrow()
                .lookup(&c.name)
                .expect("callee resolved during semantic analysis");
            let entry = entry.borrow();
            match &*entry {
                Entry::Procedure(p) => {
                    Some(p.param_area_size.expect("parameter areas assigned first"))
                }
                _ => panic!("'{}' called as a non-procedure", c.name),
            }
        }
    }
}

fn max_area(a: Option<i32>, b: Option<i32>) -> Option<i32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
