use log::debug;

use crate::compiler::ast::*;
use crate::compiler::types::{Type, TypeKind};
use crate::compiler::CompilerError;

use super::symbol_table::{Entry, ParamType, Scope, ScopeRef};
use super::{SemanticError, SemanticResult};

/// Runs semantic analysis over `program` and returns the populated global
/// scope.  The first violation found aborts the whole analysis; no partial
/// result is produced.
pub fn check(program: &Program) -> SemanticResult<ScopeRef> {
    let analyzer = Analyzer::new();
    let global = analyzer.predefined_scope();

    analyzer.declare_program(program, &global)?;
    analyzer.check_program(program, &global)?;
    analyzer.check_main(program, &global)?;

    Ok(global)
}

/// Carries the canonical built-in types across both analysis passes.  All
/// type comparisons below are identity comparisons, so everything integer
/// typed must resolve back to this one `int` allocation.
struct Analyzer {
    int_type: Type,
    boolean_type: Type,
}

impl Analyzer {
    fn new() -> Analyzer {
        Analyzer {
            int_type: Type::primitive("int", 4),
            boolean_type: Type::primitive("boolean", 4),
        }
    }

    /// Builds the global scope and enters the `int` type and the runtime
    /// library procedures.  `boolean` gets no entry: it exists only as the
    /// type of comparisons and cannot be named in source.
    fn predefined_scope(&self) -> ScopeRef {
        let global = Scope::new();

        global
            .borrow_mut()
            .enter("int", Entry::type_def(self.int_type.clone()))
            .expect("empty global scope");

        let val = || ParamType::new(self.int_type.clone(), false);
        let by_ref = || ParamType::new(self.int_type.clone(), true);

        self.enter_builtin(&global, "printi", vec![val()]);
        self.enter_builtin(&global, "printc", vec![val()]);
        self.enter_builtin(&global, "readi", vec![by_ref()]);
        self.enter_builtin(&global, "readc", vec![by_ref()]);
        self.enter_builtin(&global, "exit", vec![]);
        self.enter_builtin(&global, "time", vec![by_ref()]);
        self.enter_builtin(&global, "clearAll", vec![val()]);
        self.enter_builtin(&global, "setPixel", vec![val(), val(), val()]);
        self.enter_builtin(&global, "drawLine", vec![val(), val(), val(), val(), val()]);
        self.enter_builtin(&global, "drawCircle", vec![val(), val(), val(), val()]);

        global
    }

    fn enter_builtin(&self, global: &ScopeRef, name: &str, params: Vec<ParamType>) {
        let scope = Scope::nested(global);
        global
            .borrow_mut()
            .enter(name, Entry::procedure(params, scope))
            .expect("predefined names are distinct");
    }

    /// Declare pass: enters every type declaration and every procedure
    /// header (parameters included) in textual order.  Bodies are not
    /// descended into, so entries made here are visible to every body
    /// checked by the second pass regardless of declaration order.
    fn declare_program(&self, program: &Program, global: &ScopeRef) -> SemanticResult<()> {
        debug!("declare pass: {} global declarations", program.decls.len());
        for decl in &program.decls {
            match decl {
                Decl::Type(td) => {
                    let ty = self.resolve_type_expr(&td.ty, global)?;
                    global
                        .borrow_mut()
                        .enter(&td.name, Entry::type_def(ty))
                        .map_err(|e| CompilerError::new(td.line, e))?;
                }
                Decl::Proc(pd) => self.declare_proc(pd, global)?,
            }
        }
        Ok(())
    }

    fn declare_proc(&self, pd: &ProcDecl, global: &ScopeRef) -> SemanticResult<()> {
        debug!("declaring procedure '{}'", pd.name);
        let scope = Scope::nested(global);
        let mut params = Vec::with_capacity(pd.params.len());

        for p in &pd.params {
            let ty = self.resolve_type_expr(&p.ty, global)?;
            if ty.is_array() && !p.is_ref {
                return Err(CompilerError::new(
                    p.line,
                    SemanticError::ArrayParamNotReference(p.name.clone()),
                ));
            }
            scope
                .borrow_mut()
                .enter(&p.name, Entry::variable(ty.clone(), p.is_ref))
                .map_err(|e| CompilerError::new(p.line, e))?;
            params.push(ParamType::new(ty, p.is_ref));
        }

        global
            .borrow_mut()
            .enter(&pd.name, Entry::procedure(params, scope))
            .map_err(|e| CompilerError::new(pd.line, e))?;
        Ok(())
    }

    /// Check pass: enters local variables and type checks every procedure
    /// body against the tables the declare pass populated.
    fn check_program(&self, program: &Program, global: &ScopeRef) -> SemanticResult<()> {
        for decl in &program.decls {
            if let Decl::Proc(pd) = decl {
                self.check_proc(pd, global)?;
            }
        }
        Ok(())
    }

    fn check_proc(&self, pd: &ProcDecl, global: &ScopeRef) -> SemanticResult<()> {
        debug!("checking body of procedure '{}'", pd.name);
        let scope = proc_scope(global, &pd.name);

        for v in &pd.locals {
            let ty = self.resolve_type_expr(&v.ty, &scope)?;
            scope
                .borrow_mut()
                .enter(&v.name, Entry::variable(ty, false))
                .map_err(|e| CompilerError::new(v.line, e))?;
        }

        for stmt in &pd.body {
            self.check_stmt(stmt, &scope)?;
        }
        Ok(())
    }

    fn check_stmt(&self, stmt: &Stmt, scope: &ScopeRef) -> SemanticResult<()> {
        match stmt {
            Stmt::Empty(_) => Ok(()),
            Stmt::Compound(c) => {
                for s in &c.stmts {
                    self.check_stmt(s, scope)?;
                }
                Ok(())
            }
            Stmt::Assign(a) => {
                let target_ty = self.check_variable(&a.target, scope)?;
                let value_ty = self.check_expr(&a.value, scope)?;
                if target_ty != value_ty {
                    return Err(CompilerError::new(a.line, SemanticError::AssignTypeMismatch));
                }
                if target_ty.is_array() {
                    return Err(CompilerError::new(a.line, SemanticError::AssignArray));
                }
                Ok(())
            }
            Stmt::If(i) => {
                if self.check_expr(&i.cond, scope)? != self.boolean_type {
                    return Err(CompilerError::new(i.line, SemanticError::IfCondNotBoolean));
                }
                self.check_stmt(&i.then_branch, scope)?;
                if let Some(else_branch) = &i.else_branch {
                    self.check_stmt(else_branch, scope)?;
                }
                Ok(())
            }
            Stmt::While(w) => {
                if self.check_expr(&w.cond, scope)? != self.boolean_type {
                    return Err(CompilerError::new(w.line, SemanticError::WhileCondNotBoolean));
                }
                self.check_stmt(&w.body, scope)
            }
            Stmt::Call(c) => self.check_call(c, scope),
        }
    }

    fn check_call(&self, call: &CallStmt, scope: &ScopeRef) -> SemanticResult<()> {
        let entry = scope.borrow().lookup(&call.name).ok_or_else(|| {
            CompilerError::new(
                call.line,
                SemanticError::UndefinedProcedure(call.name.clone()),
            )
        })?;
        let entry = entry.borrow();
        let proc = match &*entry {
            Entry::Procedure(p) => p,
            _ => {
                return Err(CompilerError::new(
                    call.line,
                    SemanticError::NotAProcedure(call.name.clone()),
                ))
            }
        };

        if call.args.len() < proc.params.len() {
            return Err(CompilerError::new(
                call.line,
                SemanticError::TooFewArguments(call.name.clone()),
            ));
        }
        if call.args.len() > proc.params.len() {
            return Err(CompilerError::new(
                call.line,
                SemanticError::TooManyArguments(call.name.clone()),
            ));
        }

        for (i, (arg, param)) in call.args.iter().zip(&proc.params).enumerate() {
            let arg_ty = self.check_expr(arg, scope)?;
            if arg_ty != param.ty {
                return Err(CompilerError::new(
                    arg.line(),
                    SemanticError::ArgumentTypeMismatch(call.name.clone(), i + 1),
                ));
            }
            if param.is_ref && !matches!(arg, Expr::Variable(_)) {
                return Err(CompilerError::new(
                    arg.line(),
                    SemanticError::ArgumentMustBeVariable(call.name.clone(), i + 1),
                ));
            }
        }
        Ok(())
    }

    fn check_expr(&self, expr: &Expr, scope: &ScopeRef) -> SemanticResult<Type> {
        match expr {
            Expr::Int(_) => Ok(self.int_type.clone()),
            Expr::Variable(v) => self.check_variable(&v.var, scope),
            Expr::Binary(b) => {
                let left = self.check_expr(&b.left, scope)?;
                let right = self.check_expr(&b.right, scope)?;
                if left != right {
                    return Err(CompilerError::new(b.line, SemanticError::OperandTypeMismatch));
                }
                if b.op.is_comparison() {
                    if left != self.int_type {
                        return Err(CompilerError::new(
                            b.line,
                            SemanticError::ComparisonNonInteger,
                        ));
                    }
                    Ok(self.boolean_type.clone())
                } else {
                    if left != self.int_type {
                        return Err(CompilerError::new(
                            b.line,
                            SemanticError::ArithmeticNonInteger,
                        ));
                    }
                    Ok(self.int_type.clone())
                }
            }
        }
    }

    fn check_variable(&self, var: &Variable, scope: &ScopeRef) -> SemanticResult<Type> {
        match var {
            Variable::Simple(s) => {
                let entry = scope.borrow().lookup(&s.name).ok_or_else(|| {
                    CompilerError::new(s.line, SemanticError::UndefinedVariable(s.name.clone()))
                })?;
                let entry = entry.borrow();
                match &*entry {
                    Entry::Variable(v) => Ok(v.ty.clone()),
                    _ => Err(CompilerError::new(
                        s.line,
                        SemanticError::NotAVariable(s.name.clone()),
                    )),
                }
            }
            Variable::Array(a) => {
                let base_ty = self.check_variable(&a.array, scope)?;
                if self.check_expr(&a.index, scope)? != self.int_type {
                    return Err(CompilerError::new(a.line, SemanticError::IndexNotInteger));
                }
                match base_ty.kind() {
                    TypeKind::Array { base, .. } => Ok(base.clone()),
                    _ => Err(CompilerError::new(a.line, SemanticError::IndexNonArray)),
                }
            }
        }
    }

    /// Resolves a type expression to a node in the type graph.  A name
    /// resolves to the one canonical type its declaration allocated; an
    /// array former allocates a fresh array type over its base.
    fn resolve_type_expr(&self, te: &TypeExpr, scope: &ScopeRef) -> SemanticResult<Type> {
        match te {
            TypeExpr::Name(n) => {
                let entry = scope.borrow().lookup(&n.name).ok_or_else(|| {
                    CompilerError::new(n.line, SemanticError::UndefinedType(n.name.clone()))
                })?;
                let entry = entry.borrow();
                match &*entry {
                    Entry::Type(t) => Ok(t.ty.clone()),
                    _ => Err(CompilerError::new(
                        n.line,
                        SemanticError::NotAType(n.name.clone()),
                    )),
                }
            }
            TypeExpr::Array(a) => {
                let base = self.resolve_type_expr(&a.base, scope)?;
                Ok(Type::array(a.element_count, base))
            }
        }
    }

    /// After both passes the program must define a parameterless procedure
    /// named `main`.
    fn check_main(&self, program: &Program, global: &ScopeRef) -> SemanticResult<()> {
        let line = program
            .decls
            .iter()
            .find(|d| d.name() == "main")
            .map(|d| d.line())
            .unwrap_or(0);

        let entry = global
            .borrow()
            .get("main")
            .ok_or_else(|| CompilerError::new(0, SemanticError::MainMissing))?;
        let entry = entry.borrow();
        match &*entry {
            Entry::Procedure(p) if p.params.is_empty() => Ok(()),
            Entry::Procedure(_) => Err(CompilerError::new(line, SemanticError::MainHasParameters)),
            _ => Err(CompilerError::new(line, SemanticError::MainNotAProcedure)),
        }
    }
}

/// Fetches the scope a procedure entry owns.  Only valid after the declare
/// pass has entered the procedure.
pub(super) fn proc_scope(global: &ScopeRef, name: &str) -> ScopeRef {
    let entry = global
        .borrow()
        .get(name)
        .expect("procedure entered by the declare pass");
    let entry = entry.borrow();
    match &*entry {
        Entry::Procedure(p) => ScopeRef::clone(&p.scope),
        _ => panic!("'{}' entered as a non-procedure", name),
    }
}
