use crate::compiler::ast::*;
use crate::compiler::semantics::{check, SemanticError};

fn int_ty() -> TypeExpr {
    TypeExpr::name("int", 1)
}

fn var(name: &str, line: u32) -> Expr {
    Expr::variable(Variable::simple(name, line), line)
}

fn empty_main(line: u32) -> Decl {
    ProcDecl::new("main", vec![], vec![], vec![], line)
}

/// `main` with one local integer `x` and the given body.
fn main_with_x(body: Vec<Stmt>) -> Program {
    Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![VarDecl::new("x", int_ty(), 2)],
        body,
        1,
    )])
}

#[test]
fn test_minimal_program_checks() {
    super::init_logging();
    let program = Program::new(vec![empty_main(1)]);
    assert!(check(&program).is_ok());
}

#[test]
fn test_missing_main_is_rejected() {
    let program = Program::new(vec![ProcDecl::new("helper", vec![], vec![], vec![], 1)]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.inner(), SemanticError::MainMissing);
}

#[test]
fn test_main_must_be_a_procedure() {
    let program = Program::new(vec![TypeDecl::new(
        "main",
        TypeExpr::array(3, int_ty(), 1),
        1,
    )]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.inner(), SemanticError::MainNotAProcedure);
}

#[test]
fn test_main_must_not_have_parameters() {
    let program = Program::new(vec![ProcDecl::new(
        "main",
        vec![ParamDecl::new("n", int_ty(), false, 1)],
        vec![],
        vec![],
        1,
    )]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.inner(), SemanticError::MainHasParameters);
}

#[test]
fn test_assigning_boolean_to_integer_is_rejected() {
    // x := 1 = 2
    let program = main_with_x(vec![Stmt::assign(
        Variable::simple("x", 3),
        Expr::binary(BinaryOp::Eq, Expr::int(1, 3), Expr::int(2, 3), 3),
        3,
    )]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.clone().inner(), SemanticError::AssignTypeMismatch);
    assert_eq!(err.to_string(), "L3: assignment has different types");
}

#[test]
fn test_whole_array_assignment_is_rejected() {
    let arr = || TypeExpr::array(3, int_ty(), 2);
    let program = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![VarDecl::new("a", arr(), 2), VarDecl::new("b", arr(), 3)],
        vec![Stmt::assign(
            Variable::simple("a", 4),
            var("b", 4),
            4,
        )],
        1,
    )]);
    let err = check(&program).unwrap_err();
    // a and b come from two distinct array type expressions, so identity
    // comparison already rejects the assignment.
    assert_eq!(err.inner(), SemanticError::AssignTypeMismatch);
}

#[test]
fn test_named_array_assignment_is_rejected_as_array() {
    let program = Program::new(vec![
        TypeDecl::new("vec", TypeExpr::array(3, int_ty(), 1), 1),
        ProcDecl::new(
            "main",
            vec![],
            vec![
                VarDecl::new("a", TypeExpr::name("vec", 3), 3),
                VarDecl::new("b", TypeExpr::name("vec", 4), 4),
            ],
            vec![Stmt::assign(
                Variable::simple("a", 5),
                var("b", 5),
                5,
            )],
            2,
        ),
    ]);
    let err = check(&program).unwrap_err();
    // Here both sides share the canonical `vec` type, so it is the array
    // prohibition that fires.
    assert_eq!(err.inner(), SemanticError::AssignArray);
}

#[test]
fn test_literal_cannot_be_passed_by_reference() {
    let program = Program::new(vec![
        ProcDecl::new(
            "f",
            vec![ParamDecl::new("n", int_ty(), true, 1)],
            vec![],
            vec![],
            1,
        ),
        ProcDecl::new(
            "main",
            vec![],
            vec![],
            vec![Stmt::call("f", vec![Expr::int(3, 4)], 4)],
            3,
        ),
    ]);
    let err = check(&program).unwrap_err();
    assert_eq!(
        err.inner(),
        SemanticError::ArgumentMustBeVariable("f".into(), 1)
    );
}

#[test]
fn test_recursive_call_with_wrong_argument_count() {
    // f expects two arguments and calls itself with one.
    let program = Program::new(vec![
        ProcDecl::new(
            "f",
            vec![
                ParamDecl::new("a", int_ty(), false, 1),
                ParamDecl::new("b", int_ty(), false, 1),
            ],
            vec![],
            vec![Stmt::call("f", vec![Expr::int(1, 2)], 2)],
            1,
        ),
        empty_main(4),
    ]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.inner(), SemanticError::TooFewArguments("f".into()));
}

#[test]
fn test_too_many_arguments() {
    let program = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![],
        vec![Stmt::call(
            "exit",
            vec![Expr::int(1, 2)],
            2,
        )],
        1,
    )]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.inner(), SemanticError::TooManyArguments("exit".into()));
}

#[test]
fn test_argument_types_are_checked_pairwise() {
    // printi(1 = 2): boolean argument for an integer parameter.
    let program = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![],
        vec![Stmt::call(
            "printi",
            vec![Expr::binary(
                BinaryOp::Eq,
                Expr::int(1, 2),
                Expr::int(2, 2),
                2,
            )],
            2,
        )],
        1,
    )]);
    let err = check(&program).unwrap_err();
    assert_eq!(
        err.inner(),
        SemanticError::ArgumentTypeMismatch("printi".into(), 1)
    );
}

#[test]
fn test_undefined_names_are_rejected() {
    let undefined_var = main_with_x(vec![Stmt::assign(
        Variable::simple("y", 3),
        Expr::int(1, 3),
        3,
    )]);
    assert_eq!(
        check(&undefined_var).unwrap_err().inner(),
        SemanticError::UndefinedVariable("y".into())
    );

    let undefined_proc = main_with_x(vec![Stmt::call("nope", vec![], 3)]);
    assert_eq!(
        check(&undefined_proc).unwrap_err().inner(),
        SemanticError::UndefinedProcedure("nope".into())
    );

    let undefined_type = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![VarDecl::new("x", TypeExpr::name("matrix", 2), 2)],
        vec![],
        1,
    )]);
    assert_eq!(
        check(&undefined_type).unwrap_err().inner(),
        SemanticError::UndefinedType("matrix".into())
    );
}

#[test]
fn test_kind_mismatches_are_rejected() {
    // A type name used as a variable.
    let type_as_var = Program::new(vec![
        TypeDecl::new("vec", TypeExpr::array(3, int_ty(), 1), 1),
        ProcDecl::new(
            "main",
            vec![],
            vec![VarDecl::new("x", int_ty(), 3)],
            vec![Stmt::assign(Variable::simple("x", 4), var("vec", 4), 4)],
            2,
        ),
    ]);
    assert_eq!(
        check(&type_as_var).unwrap_err().inner(),
        SemanticError::NotAVariable("vec".into())
    );

    // A procedure name used as a type.
    let proc_as_type = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![VarDecl::new("x", TypeExpr::name("printi", 2), 2)],
        vec![],
        1,
    )]);
    assert_eq!(
        check(&proc_as_type).unwrap_err().inner(),
        SemanticError::NotAType("printi".into())
    );

    // A variable called like a procedure.
    let var_as_proc = main_with_x(vec![Stmt::call("x", vec![], 3)]);
    assert_eq!(
        check(&var_as_proc).unwrap_err().inner(),
        SemanticError::NotAProcedure("x".into())
    );
}

#[test]
fn test_redeclaration_in_same_scope_is_rejected() {
    let program = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![
            VarDecl::new("x", int_ty(), 2),
            VarDecl::new("x", int_ty(), 3),
        ],
        vec![],
        1,
    )]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.clone().inner(), SemanticError::Redeclaration("x".into()));
    assert_eq!(err.line(), 3);
}

#[test]
fn test_local_shadows_global_name() {
    // A local variable may shadow a predefined procedure; inside the body
    // the name then refers to the variable.
    let program = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![VarDecl::new("printi", int_ty(), 2)],
        vec![Stmt::assign(
            Variable::simple("printi", 3),
            Expr::int(1, 3),
            3,
        )],
        1,
    )]);
    assert!(check(&program).is_ok());

    // ...including for calls, which now see a variable.
    let call_shadowed = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![VarDecl::new("printi", int_ty(), 2)],
        vec![Stmt::call("printi", vec![Expr::int(1, 3)], 3)],
        1,
    )]);
    assert_eq!(
        check(&call_shadowed).unwrap_err().inner(),
        SemanticError::NotAProcedure("printi".into())
    );
}

#[test]
fn test_type_identity_distinguishes_equal_shapes() {
    let named_array = |name: &str, line: u32| TypeDecl::new(name, TypeExpr::array(3, int_ty(), line), line);

    // p takes a `first`; passing a `second` of identical shape must fail.
    let mismatch = Program::new(vec![
        named_array("first", 1),
        named_array("second", 2),
        ProcDecl::new(
            "p",
            vec![ParamDecl::new("v", TypeExpr::name("first", 3), true, 3)],
            vec![],
            vec![],
            3,
        ),
        ProcDecl::new(
            "main",
            vec![],
            vec![VarDecl::new("a", TypeExpr::name("second", 5), 5)],
            vec![Stmt::call("p", vec![var("a", 6)], 6)],
            4,
        ),
    ]);
    assert_eq!(
        check(&mismatch).unwrap_err().inner(),
        SemanticError::ArgumentTypeMismatch("p".into(), 1)
    );

    // Two uses of the *same* named type are compatible.
    let matching = Program::new(vec![
        named_array("first", 1),
        ProcDecl::new(
            "p",
            vec![ParamDecl::new("v", TypeExpr::name("first", 3), true, 3)],
            vec![],
            vec![],
            3,
        ),
        ProcDecl::new(
            "main",
            vec![],
            vec![VarDecl::new("a", TypeExpr::name("first", 5), 5)],
            vec![Stmt::call("p", vec![var("a", 6)], 6)],
            4,
        ),
    ]);
    assert!(check(&matching).is_ok());
}

#[test]
fn test_array_parameter_must_be_reference() {
    let program = Program::new(vec![
        ProcDecl::new(
            "p",
            vec![ParamDecl::new(
                "v",
                TypeExpr::array(3, int_ty(), 1),
                false,
                1,
            )],
            vec![],
            vec![],
            1,
        ),
        empty_main(3),
    ]);
    let err = check(&program).unwrap_err();
    assert_eq!(
        err.inner(),
        SemanticError::ArrayParamNotReference("v".into())
    );
}

#[test]
fn test_forward_references_resolve() {
    // main calls a procedure declared after it, which uses a type declared
    // after *it*; both resolve because declaration runs before checking.
    let program = Program::new(vec![
        ProcDecl::new(
            "main",
            vec![],
            vec![],
            vec![Stmt::call("later", vec![], 2)],
            1,
        ),
        ProcDecl::new(
            "later",
            vec![],
            vec![VarDecl::new("v", TypeExpr::name("vec", 5), 5)],
            vec![Stmt::assign(
                Variable::index(Variable::simple("v", 6), Expr::int(0, 6), 6),
                Expr::int(1, 6),
                6,
            )],
            4,
        ),
        TypeDecl::new("vec", TypeExpr::array(3, int_ty(), 8), 8),
    ]);
    assert!(check(&program).is_ok());
}

#[test]
fn test_conditions_must_be_boolean() {
    let if_int = main_with_x(vec![Stmt::if_then(
        Expr::int(1, 3),
        Stmt::empty(3),
        3,
    )]);
    assert_eq!(
        check(&if_int).unwrap_err().inner(),
        SemanticError::IfCondNotBoolean
    );

    let while_int = main_with_x(vec![Stmt::while_do(var("x", 3), Stmt::empty(3), 3)]);
    assert_eq!(
        check(&while_int).unwrap_err().inner(),
        SemanticError::WhileCondNotBoolean
    );
}

#[test]
fn test_operator_rules() {
    // int + boolean combines different types
    let mixed = main_with_x(vec![Stmt::assign(
        Variable::simple("x", 3),
        Expr::binary(
            BinaryOp::Add,
            Expr::int(1, 3),
            Expr::binary(BinaryOp::Eq, Expr::int(1, 3), Expr::int(2, 3), 3),
            3,
        ),
        3,
    )]);
    assert_eq!(
        check(&mixed).unwrap_err().inner(),
        SemanticError::OperandTypeMismatch
    );

    // comparing two whole arrays: same type on both sides but not integer
    let arr_cmp = Program::new(vec![
        TypeDecl::new("vec", TypeExpr::array(3, int_ty(), 1), 1),
        ProcDecl::new(
            "main",
            vec![],
            vec![
                VarDecl::new("a", TypeExpr::name("vec", 3), 3),
                VarDecl::new("b", TypeExpr::name("vec", 4), 4),
            ],
            vec![Stmt::if_then(
                Expr::binary(BinaryOp::Eq, var("a", 5), var("b", 5), 5),
                Stmt::empty(5),
                5,
            )],
            2,
        ),
    ]);
    assert_eq!(
        check(&arr_cmp).unwrap_err().inner(),
        SemanticError::ComparisonNonInteger
    );

    // boolean operands for arithmetic
    let bool_arith = main_with_x(vec![Stmt::assign(
        Variable::simple("x", 3),
        Expr::binary(
            BinaryOp::Add,
            Expr::binary(BinaryOp::Eq, Expr::int(1, 3), Expr::int(2, 3), 3),
            Expr::binary(BinaryOp::Eq, Expr::int(1, 3), Expr::int(2, 3), 3),
            3,
        ),
        3,
    )]);
    assert_eq!(
        check(&bool_arith).unwrap_err().inner(),
        SemanticError::ArithmeticNonInteger
    );
}

#[test]
fn test_indexing_rules() {
    // indexing a non-array
    let scalar_index = main_with_x(vec![Stmt::assign(
        Variable::index(Variable::simple("x", 3), Expr::int(0, 3), 3),
        Expr::int(1, 3),
        3,
    )]);
    assert_eq!(
        check(&scalar_index).unwrap_err().inner(),
        SemanticError::IndexNonArray
    );

    // indexing with a non-integer
    let bad_index = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![VarDecl::new("a", TypeExpr::array(3, int_ty(), 2), 2)],
        vec![Stmt::assign(
            Variable::index(
                Variable::simple("a", 3),
                Expr::binary(BinaryOp::Eq, Expr::int(0, 3), Expr::int(0, 3), 3),
                3,
            ),
            Expr::int(1, 3),
            3,
        )],
        1,
    )]);
    assert_eq!(
        check(&bad_index).unwrap_err().inner(),
        SemanticError::IndexNotInteger
    );
}

#[test]
fn test_multidimensional_access() {
    // var m: array [3] of array [5] of int; m[1][2] := 9
    let program = Program::new(vec![ProcDecl::new(
        "main",
        vec![],
        vec![VarDecl::new(
            "m",
            TypeExpr::array(3, TypeExpr::array(5, int_ty(), 2), 2),
            2,
        )],
        vec![Stmt::assign(
            Variable::index(
                Variable::index(Variable::simple("m", 3), Expr::int(1, 3), 3),
                Expr::int(2, 3),
                3,
            ),
            Expr::int(9, 3),
            3,
        )],
        1,
    )]);
    assert!(check(&program).is_ok());
}

#[test]
fn test_first_error_aborts_analysis() {
    // Both statements are bad; the diagnostic must come from the first.
    let program = main_with_x(vec![
        Stmt::assign(Variable::simple("y", 3), Expr::int(1, 3), 3),
        Stmt::assign(Variable::simple("z", 4), Expr::int(1, 4), 4),
    ]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.line(), 3);
    assert_eq!(err.inner(), SemanticError::UndefinedVariable("y".into()));
}

#[test]
fn test_missing_main_renders_without_line_prefix() {
    let program = Program::new(vec![ProcDecl::new("helper", vec![], vec![], vec![], 1)]);
    let err = check(&program).unwrap_err();
    assert_eq!(err.to_string(), "procedure 'main' is missing");
}
