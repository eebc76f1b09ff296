use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::compiler::types::Type;

use super::SemanticError;

/// Shared handle to a scope.  The global scope is owned by the caller of the
/// analyzer; every nested scope is kept alive by the procedure entry that
/// owns it.
pub type ScopeRef = Rc<RefCell<Scope>>;

/// Shared handle to a symbol table entry.  Entries are allocated once during
/// analysis and then mutated in place by the storage allocator, so they live
/// behind a `RefCell`.
pub type EntryRef = Rc<RefCell<Entry>>;

/**
 A `Scope` maps identifiers to the entries declared in one lexical block and
 chains to the enclosing scope.  Looking a name up walks the chain outward
 until a binding is found, which is what makes an inner declaration shadow an
 outer one.  Entering a name that is already bound in the *same* scope is a
 redeclaration error; only the current scope is consulted for that check.

 The parent link is weak: procedure entries in the enclosing scope hold
 strong references down to their child scopes, so a strong link back up
 would form a cycle.
*/
#[derive(Debug)]
pub struct Scope {
    entries: FxHashMap<String, EntryRef>,
    parent: Option<Weak<RefCell<Scope>>>,
}

impl Scope {
    /// Creates a root scope with no enclosing scope.
    pub fn new() -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            entries: FxHashMap::default(),
            parent: None,
        }))
    }

    /// Creates a scope nested inside `parent`.
    pub fn nested(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            entries: FxHashMap::default(),
            parent: Some(Rc::downgrade(parent)),
        }))
    }

    /// Binds `name` to `entry` in this scope and returns the new entry
    /// handle.  Fails if `name` is already bound here; shadowing an outer
    /// scope is legal.
    pub fn enter(&mut self, name: &str, entry: Entry) -> Result<EntryRef, SemanticError> {
        if self.entries.contains_key(name) {
            return Err(SemanticError::Redeclaration(name.into()));
        }
        let entry = Rc::new(RefCell::new(entry));
        self.entries.insert(name.into(), Rc::clone(&entry));
        Ok(entry)
    }

    /// Returns the binding for `name` in this scope only.
    pub fn get(&self, name: &str) -> Option<EntryRef> {
        self.entries.get(name).map(Rc::clone)
    }

    /// Returns the binding for `name`, walking outward through the enclosing
    /// scopes until found or the chain is exhausted.
    pub fn lookup(&self, name: &str) -> Option<EntryRef> {
        if let Some(entry) = self.entries.get(name) {
            return Some(Rc::clone(entry));
        }
        let parent = self.parent.as_ref()?;
        let parent = parent.upgrade().expect("enclosing scope dropped");
        let found = parent.borrow().lookup(name);
        found
    }

    pub fn entries(&self) -> &FxHashMap<String, EntryRef> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
pub enum Entry {
    Variable(VariableEntry),
    Procedure(ProcedureEntry),
    Type(TypeEntry),
}

impl Entry {
    pub fn variable(ty: Type, is_ref: bool) -> Entry {
        Entry::Variable(VariableEntry {
            ty,
            is_ref,
            offset: None,
        })
    }

    pub fn procedure(params: Vec<ParamType>, scope: ScopeRef) -> Entry {
        Entry::Procedure(ProcedureEntry {
            params,
            scope,
            param_area_size: None,
            local_var_area_size: None,
            outgoing_area_size: None,
        })
    }

    pub fn type_def(ty: Type) -> Entry {
        Entry::Type(TypeEntry { ty })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Variable(v) => {
                let kind = if v.is_ref { "ref var" } else { "var" };
                match v.offset {
                    Some(offset) => write!(f, "{}: {} @ {}", kind, v.ty, offset),
                    None => write!(f, "{}: {}", kind, v.ty),
                }
            }
            Entry::Procedure(p) => write!(f, "proc({} params)", p.params.len()),
            Entry::Type(t) => write!(f, "type: {}", t.ty),
        }
    }
}

#[derive(Debug)]
pub struct VariableEntry {
    pub ty: Type,
    pub is_ref: bool,
    /// Frame-pointer relative byte offset: parameters >= 0, locals < 0.
    /// `None` until the storage allocator has run.
    pub offset: Option<i32>,
}

#[derive(Debug)]
pub struct ProcedureEntry {
    /// Formal parameters in declaration order, which is also the order the
    /// caller pushes arguments in.
    pub params: Vec<ParamType>,
    /// The procedure's own scope, holding its parameters and locals.
    pub scope: ScopeRef,
    /// Byte size of the incoming parameter area.  `None` until allocated.
    pub param_area_size: Option<i32>,
    /// Byte size of the local variable area.  `None` until allocated.
    pub local_var_area_size: Option<i32>,
    /// Byte size of the outgoing argument area.  After allocation this stays
    /// `None` exactly for procedures whose bodies contain no call.
    pub outgoing_area_size: Option<i32>,
}

#[derive(Debug)]
pub struct TypeEntry {
    pub ty: Type,
}

#[derive(Clone, Debug)]
pub struct ParamType {
    pub ty: Type,
    pub is_ref: bool,
    /// Offset of this parameter within the incoming parameter area.
    /// `None` until the storage allocator has run.
    pub offset: Option<i32>,
}

impl ParamType {
    pub fn new(ty: Type, is_ref: bool) -> ParamType {
        ParamType {
            ty,
            is_ref,
            offset: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Type {
        Type::primitive("int", 4)
    }

    #[test]
    fn test_enter_and_lookup() {
        let scope = Scope::new();
        scope
            .borrow_mut()
            .enter("x", Entry::variable(int(), false))
            .unwrap();

        let entry = scope.borrow().lookup("x").unwrap();
        assert!(matches!(&*entry.borrow(), Entry::Variable(_)));
        assert!(scope.borrow().lookup("y").is_none());
    }

    #[test]
    fn test_redeclaration_in_same_scope_fails() {
        let scope = Scope::new();
        scope
            .borrow_mut()
            .enter("x", Entry::variable(int(), false))
            .unwrap();
        let result = scope.borrow_mut().enter("x", Entry::variable(int(), true));
        assert_eq!(result.unwrap_err(), SemanticError::Redeclaration("x".into()));
    }

    #[test]
    fn test_shadowing_outer_scope() {
        let outer_ty = int();
        let inner_ty = Type::array(3, int());

        let outer = Scope::new();
        outer
            .borrow_mut()
            .enter("x", Entry::variable(outer_ty.clone(), false))
            .unwrap();

        let inner = Scope::nested(&outer);
        inner
            .borrow_mut()
            .enter("x", Entry::variable(inner_ty.clone(), false))
            .unwrap();

        let seen_inner = inner.borrow().lookup("x").unwrap();
        match &*seen_inner.borrow() {
            Entry::Variable(v) => assert_eq!(v.ty, inner_ty),
            _ => panic!("expected a variable entry"),
        }

        let seen_outer = outer.borrow().lookup("x").unwrap();
        match &*seen_outer.borrow() {
            Entry::Variable(v) => assert_eq!(v.ty, outer_ty),
            _ => panic!("expected a variable entry"),
        };
    }

    #[test]
    fn test_lookup_walks_outward() {
        let root = Scope::new();
        root.borrow_mut()
            .enter("t", Entry::type_def(int()))
            .unwrap();

        let inner = Scope::nested(&root);
        assert!(inner.borrow().lookup("t").is_some());
        assert!(inner.borrow().get("t").is_none());
    }
}
