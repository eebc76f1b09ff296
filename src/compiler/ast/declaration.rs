/// A global declaration: a named type or a procedure.  SPL has no global
/// variables; variable declarations only occur inside procedures.
#[derive(Clone, Debug, PartialEq)]
pub enum Decl {
    Type(TypeDecl),
    Proc(ProcDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Type(t) => &t.name,
            Decl::Proc(p) => &p.name,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Decl::Type(t) => t.line,
            Decl::Proc(p) => p.line,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub line: u32,
}

impl TypeDecl {
    pub fn new(name: &str, ty: TypeExpr, line: u32) -> Decl {
        Decl::Type(TypeDecl {
            name: name.into(),
            ty,
            line,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProcDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<super::Stmt>,
    pub line: u32,
}

impl ProcDecl {
    pub fn new(
        name: &str,
        params: Vec<ParamDecl>,
        locals: Vec<VarDecl>,
        body: Vec<super::Stmt>,
        line: u32,
    ) -> Decl {
        Decl::Proc(ProcDecl {
            name: name.into(),
            params,
            locals,
            body,
            line,
        })
    }
}

/// A formal parameter.  `is_ref` marks call-by-reference parameters; arrays
/// can only be passed this way.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub is_ref: bool,
    pub line: u32,
}

impl ParamDecl {
    pub fn new(name: &str, ty: TypeExpr, is_ref: bool, line: u32) -> ParamDecl {
        ParamDecl {
            name: name.into(),
            ty,
            is_ref,
            line,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub line: u32,
}

impl VarDecl {
    pub fn new(name: &str, ty: TypeExpr, line: u32) -> VarDecl {
        VarDecl {
            name: name.into(),
            ty,
            line,
        }
    }
}

/// A type expression as written in the source: either the name of a declared
/// type or an array former over another type expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    Name(NameTypeExpr),
    Array(ArrayTypeExpr),
}

impl TypeExpr {
    pub fn name(name: &str, line: u32) -> TypeExpr {
        TypeExpr::Name(NameTypeExpr {
            name: name.into(),
            line,
        })
    }

    pub fn array(element_count: i32, base: TypeExpr, line: u32) -> TypeExpr {
        TypeExpr::Array(ArrayTypeExpr {
            element_count,
            base: Box::new(base),
            line,
        })
    }

    pub fn line(&self) -> u32 {
        match self {
            TypeExpr::Name(n) => n.line,
            TypeExpr::Array(a) => a.line,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NameTypeExpr {
    pub name: String,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayTypeExpr {
    pub element_count: i32,
    pub base: Box<TypeExpr>,
    pub line: u32,
}
