use std::fmt;

/// Errors generated during semantic analysis of a compilation unit.
#[derive(Clone, Debug, PartialEq)]
pub enum SemanticError {
    UndefinedType(String),
    NotAType(String),
    UndefinedVariable(String),
    NotAVariable(String),
    UndefinedProcedure(String),
    NotAProcedure(String),
    Redeclaration(String),
    ArrayParamNotReference(String),
    OperandTypeMismatch,
    ComparisonNonInteger,
    ArithmeticNonInteger,
    AssignTypeMismatch,
    AssignArray,
    IfCondNotBoolean,
    WhileCondNotBoolean,
    TooFewArguments(String),
    TooManyArguments(String),
    ArgumentTypeMismatch(String, usize),
    ArgumentMustBeVariable(String, usize),
    IndexNonArray,
    IndexNotInteger,
    MainMissing,
    MainNotAProcedure,
    MainHasParameters,
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SemanticError::*;
        match self {
            UndefinedType(name) => write!(f, "undefined type '{}'", name),
            NotAType(name) => write!(f, "'{}' is not a type", name),
            UndefinedVariable(name) => write!(f, "undefined variable '{}'", name),
            NotAVariable(name) => write!(f, "'{}' is not a variable", name),
            UndefinedProcedure(name) => write!(f, "undefined procedure '{}'", name),
            NotAProcedure(name) => write!(f, "'{}' is not a procedure", name),
            Redeclaration(name) => write!(f, "redeclaration of '{}'", name),
            ArrayParamNotReference(name) => {
                write!(f, "parameter '{}' must be a reference parameter", name)
            }
            OperandTypeMismatch => write!(f, "expression combines different types"),
            ComparisonNonInteger => write!(f, "comparison requires integer operands"),
            ArithmeticNonInteger => write!(f, "arithmetic operation requires integer operands"),
            AssignTypeMismatch => write!(f, "assignment has different types"),
            AssignArray => write!(f, "assignment requires non-array values"),
            IfCondNotBoolean => write!(f, "'if' test expression must be of type boolean"),
            WhileCondNotBoolean => write!(f, "'while' test expression must be of type boolean"),
            TooFewArguments(name) => {
                write!(f, "procedure '{}' called with too few arguments", name)
            }
            TooManyArguments(name) => {
                write!(f, "procedure '{}' called with too many arguments", name)
            }
            ArgumentTypeMismatch(name, n) => {
                write!(f, "procedure '{}' argument {} has wrong type", name, n)
            }
            ArgumentMustBeVariable(name, n) => {
                write!(f, "procedure '{}' argument {} must be a variable", name, n)
            }
            IndexNonArray => write!(f, "illegal indexing a non-array"),
            IndexNotInteger => write!(f, "illegal indexing with a non-integer"),
            MainMissing => write!(f, "procedure 'main' is missing"),
            MainNotAProcedure => write!(f, "'main' is not a procedure"),
            MainHasParameters => write!(f, "procedure 'main' must not have any parameters"),
        }
    }
}
