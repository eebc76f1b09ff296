use std::fmt;
use std::rc::Rc;

/**
 `Type` is a shared handle to a node in the program's type graph.

 Types are compared by identity, never by structure: a named type declaration
 allocates exactly one `Type` and every later use of that name resolves back
 to the same allocation, while two textually identical `array [3] of int`
 type expressions written in two places produce two distinct types.  Cloning
 a `Type` clones the handle, not the node, so identity survives being stored
 in symbol table entries and parameter lists.
*/
#[derive(Clone, Debug)]
pub struct Type(Rc<TypeKind>);

#[derive(Debug)]
pub enum TypeKind {
    Primitive {
        name: String,
        byte_size: i32,
    },
    Array {
        element_count: i32,
        base: Type,
        byte_size: i32,
    },
}

impl Type {
    pub fn primitive(name: &str, byte_size: i32) -> Type {
        Type(Rc::new(TypeKind::Primitive {
            name: name.into(),
            byte_size,
        }))
    }

    pub fn array(element_count: i32, base: Type) -> Type {
        let byte_size = element_count * base.byte_size();
        Type(Rc::new(TypeKind::Array {
            element_count,
            base,
            byte_size,
        }))
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    pub fn byte_size(&self) -> i32 {
        match &*self.0 {
            TypeKind::Primitive { byte_size, .. } => *byte_size,
            TypeKind::Array { byte_size, .. } => *byte_size,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(&*self.0, TypeKind::Array { .. })
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Type {}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            TypeKind::Primitive { name, .. } => f.write_str(name),
            TypeKind::Array {
                element_count,
                base,
                ..
            } => write!(f, "array [{}] of {}", element_count, base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_structure() {
        let int = Type::primitive("int", 4);
        let a = Type::array(3, int.clone());
        let b = Type::array(3, int.clone());

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(int, int.clone());
    }

    #[test]
    fn test_array_byte_size() {
        let int = Type::primitive("int", 4);
        let row = Type::array(5, int.clone());
        let grid = Type::array(3, row.clone());

        assert_eq!(int.byte_size(), 4);
        assert_eq!(row.byte_size(), 20);
        assert_eq!(grid.byte_size(), 60);
        assert!(grid.is_array());
        assert!(!int.is_array());
    }

    #[test]
    fn test_display() {
        let int = Type::primitive("int", 4);
        let a = Type::array(3, Type::array(5, int));
        assert_eq!(a.to_string(), "array [3] of array [5] of int");
    }
}
