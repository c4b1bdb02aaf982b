use quill_syntax::{
    parse, BinaryOp, Expr, LiteralValue, PrimitiveType, Radix, SyntaxError, Type, UnaryOp,
};

const TASK_IDL: &str = r#"
// Task tracking API
namespace TaskManager {
    interface ITaskList;

    enum Priority : int32_t {
        LOW = 0,
        MEDIUM = 1,
        HIGH = 2,
    };

    const int32_t MAX_TASKS = 0x400;
    const double RATIO = 0.75;

    typedef string_t TaskId;

    interface ITask {
        TaskId Id;
        string_t Title writable;
        Priority Priority writable;
        string_t[] Tags writable;
        dict<string_t, int64_t> Metadata;
        ITaskList? Owner;
        bool complete();
        void rename(string_t title, bool notify);
    };

    interface ITaskList {
        ITask[] tasks();
        ITask? find(TaskId id);
    };
}
"#;

#[test]
fn parse_full_namespace() {
    let file = parse(TASK_IDL).expect("parse failed");
    assert_eq!(file.namespaces.len(), 1);

    let ns = &file.namespaces[0];
    assert_eq!(ns.name, "TaskManager");
    assert_eq!(ns.forward_declarations.len(), 1);
    assert_eq!(ns.forward_declarations[0].name, "ITaskList");
    assert_eq!(ns.interfaces.len(), 2);
    assert_eq!(ns.enums.len(), 1);
    assert_eq!(ns.typedefs.len(), 1);
    assert_eq!(ns.constants.len(), 2);

    let task = ns.interface("ITask").expect("ITask missing");
    assert_eq!(task.properties.len(), 6);
    assert_eq!(task.methods.len(), 2);

    let title = &task.properties[1];
    assert_eq!(title.name, "Title");
    assert!(title.writable);
    assert!(!task.properties[0].writable);

    let rename = &task.methods[1];
    assert_eq!(rename.return_type, Type::primitive(PrimitiveType::Void));
    assert_eq!(rename.parameters.len(), 2);
    assert_eq!(rename.parameters[1].name, "notify");
    assert_eq!(rename.parameters[1].ty, Type::primitive(PrimitiveType::Bool));
}

#[test]
fn parse_enum_with_trailing_comma() {
    let file = parse(TASK_IDL).unwrap();
    let priority = file.namespaces[0].enum_decl("Priority").unwrap();
    assert_eq!(priority.backing, PrimitiveType::Int32);
    let names: Vec<&str> = priority.values.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["LOW", "MEDIUM", "HIGH"]);
    assert_eq!(priority.values[2].value, Expr::int(2));
}

#[test]
fn parse_container_types() {
    let file = parse(TASK_IDL).unwrap();
    let task = file.namespaces[0].interface("ITask").unwrap();

    assert_eq!(task.properties[3].ty, Type::array(Type::primitive(PrimitiveType::String)));
    assert_eq!(
        task.properties[4].ty,
        Type::dict(Type::primitive(PrimitiveType::String), Type::primitive(PrimitiveType::Int64))
    );
    assert_eq!(task.properties[5].ty, Type::nullable(Type::type_ref("ITaskList")));
}

#[test]
fn type_suffixes_apply_left_to_right() {
    let file = parse(
        "namespace N { interface I { int32_t[]? a; int32_t?[] b; set<string_t>[] c; array<bool> d; } }",
    )
    .unwrap();
    let props = &file.namespaces[0].interfaces[0].properties;
    let int = || Type::primitive(PrimitiveType::Int32);

    assert_eq!(props[0].ty, Type::nullable(Type::array(int())));
    assert_eq!(props[1].ty, Type::array(Type::nullable(int())));
    assert_eq!(
        props[2].ty,
        Type::array(Type::set(Type::primitive(PrimitiveType::String)))
    );
    assert_eq!(props[3].ty, Type::array(Type::primitive(PrimitiveType::Bool)));
}

#[test]
fn adjacent_closing_brackets() {
    let file = parse(
        "namespace N { interface I {
            array<array<int32_t>> a;
            dict<string_t, set<int64_t>> b;
            set<dict<string_t, int32_t>> c();
            array<array<array<bool>>>? d;
            dict<string_t, set<IThing>>[] e;
        } }",
    )
    .unwrap();
    let iface = &file.namespaces[0].interfaces[0];
    let props = &iface.properties;
    let string = || Type::primitive(PrimitiveType::String);

    assert_eq!(
        props[0].ty,
        Type::array(Type::array(Type::primitive(PrimitiveType::Int32)))
    );
    assert_eq!(
        props[1].ty,
        Type::dict(string(), Type::set(Type::primitive(PrimitiveType::Int64)))
    );
    assert_eq!(
        iface.methods[0].return_type,
        Type::set(Type::dict(string(), Type::primitive(PrimitiveType::Int32)))
    );
    assert_eq!(
        props[2].ty,
        Type::nullable(Type::array(Type::array(Type::array(Type::primitive(PrimitiveType::Bool)))))
    );
    assert_eq!(
        props[3].ty,
        Type::array(Type::dict(string(), Type::set(Type::type_ref("IThing"))))
    );
}

#[test]
fn split_closing_bracket_does_not_leak() {
    // the second `>` of `>>` closes nothing here
    let err = parse("namespace N { interface I { set<int32_t>> a; } }").unwrap_err();
    match err {
        SyntaxError::Parser { message, .. } => assert!(message.contains("found `>`"), "{message}"),
        other => panic!("Expected parser error, found {other:?}"),
    }
    assert!(parse("namespace N { interface I { dict<set<int32_t>>, bool> a; } }").is_err());
}

#[test]
fn shift_right_in_constants() {
    let file = parse("namespace N { const int32_t S = 64 >> 2; }").unwrap();
    assert!(matches!(
        file.namespaces[0].constants[0].value,
        Expr::Binary { op: BinaryOp::Shr, .. }
    ));
}

#[test]
fn expression_identifiers_in_order() {
    let file = parse("namespace N { const int32_t C = (A | ~B) << -SHIFT + 1; }").unwrap();
    assert_eq!(file.namespaces[0].constants[0].value.identifiers(), ["A", "B", "SHIFT"]);
}

#[test]
fn block_comments_in_source() {
    let file = parse(
        "/** Module docs **/
        namespace N {
            /* counts */ const int32_t C = /* inline */ 1;
        }",
    )
    .unwrap();
    assert_eq!(file.namespaces[0].constants[0].name, "C");
}

#[test]
fn literal_radix_is_preserved() {
    let file = parse(
        "namespace N { const int32_t A = 0xFF; const int32_t B = 0b1010; const int32_t C = 42; }",
    )
    .unwrap();
    let constants = &file.namespaces[0].constants;
    assert_eq!(constants[0].value, Expr::int_with_radix(255, Radix::Hex));
    assert_eq!(constants[1].value, Expr::int_with_radix(10, Radix::Binary));
    assert_eq!(constants[2].value, Expr::int(42));
}

#[test]
fn expression_precedence() {
    let file = parse("namespace N { const int32_t X = 1 | 2 & 3 << 4 + 5 * -6; }").unwrap();
    let value = &file.namespaces[0].constants[0].value;

    let expected = Expr::binary(
        BinaryOp::BitOr,
        Expr::int(1),
        Expr::binary(
            BinaryOp::BitAnd,
            Expr::int(2),
            Expr::binary(
                BinaryOp::Shl,
                Expr::int(3),
                Expr::binary(
                    BinaryOp::Add,
                    Expr::int(4),
                    Expr::binary(BinaryOp::Mul, Expr::int(5), Expr::unary(UnaryOp::Neg, Expr::int(6))),
                ),
            ),
        ),
    );
    assert_eq!(value, &expected);
    assert_eq!(value.to_string(), "1 | 2 & 3 << 4 + 5 * -6");
}

#[test]
fn subtraction_is_left_associative() {
    let file = parse("namespace N { const int32_t X = 10 - 4 - 3; }").unwrap();
    let value = &file.namespaces[0].constants[0].value;
    match value {
        Expr::Binary { op: BinaryOp::Sub, left, right } => {
            assert!(matches!(**left, Expr::Binary { op: BinaryOp::Sub, .. }));
            assert_eq!(**right, Expr::int(3));
        }
        other => panic!("Expected subtraction, found {other:?}"),
    }
}

#[test]
fn parentheses_are_kept() {
    let file = parse("namespace N { enum Flags : int64_t { A = (1 << 2), B = A | (0x10) } }").unwrap();
    let flags = &file.namespaces[0].enums[0];
    assert_eq!(flags.backing, PrimitiveType::Int64);
    assert!(matches!(flags.values[0].value, Expr::Parenthesized { .. }));
    assert_eq!(flags.values[1].value.to_string(), "A | (0x10)");
}

#[test]
fn float_constants() {
    let file = parse("namespace N { const float SCALE = 1.5; }").unwrap();
    match &file.namespaces[0].constants[0].value {
        Expr::Literal { value: LiteralValue::Float(v), .. } => assert_eq!(*v, 1.5),
        other => panic!("Expected float literal, found {other:?}"),
    }
}

#[test]
fn contextual_words_are_identifiers() {
    let file = parse("namespace N { interface I { int32_t set; bool dict(); string_t writable writable; } }")
        .unwrap();
    let iface = &file.namespaces[0].interfaces[0];
    assert_eq!(iface.properties[0].name, "set");
    assert_eq!(iface.methods[0].name, "dict");
    assert_eq!(iface.properties[1].name, "writable");
    assert!(iface.properties[1].writable);
}

#[test]
fn multiple_namespaces_keep_order() {
    let file = parse("namespace First { } namespace Second { interface IB { } }").unwrap();
    let names: Vec<&str> = file.namespaces.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["First", "Second"]);
    assert!(file.namespaces[0].is_empty());
}

#[test]
fn spans_cover_declarations() {
    let source = "namespace N { typedef int32_t Id; }";
    let file = parse(source).unwrap();
    let span = file.namespaces[0].typedefs[0].span.expect("span missing");
    assert_eq!(&source[span.start..span.end], "typedef int32_t Id;");
}

#[test]
fn missing_semicolon_is_reported() {
    let err = parse("namespace N { typedef int32_t Id }").unwrap_err();
    match err {
        SyntaxError::Parser { message, expected, .. } => {
            assert!(message.contains("`;`"), "unexpected message: {message}");
            assert_eq!(expected.as_deref(), Some("`;`"));
        }
        other => panic!("Expected parser error, found {other:?}"),
    }
}

#[test]
fn truncated_input_is_reported() {
    let err = parse("namespace N { interface I {").unwrap_err();
    assert!(matches!(err, SyntaxError::UnexpectedEof { .. }));
}

#[test]
fn enum_backing_must_be_integer() {
    let err = parse("namespace N { enum E : float { A = 1 } }").unwrap_err();
    assert!(matches!(err, SyntaxError::Parser { .. }));
}

#[test]
fn oversized_literal_is_rejected() {
    let err = parse("namespace N { const int64_t BIG = 0x1FFFFFFFFFFFFFFFF; }").unwrap_err();
    assert!(matches!(err, SyntaxError::InvalidLiteral { .. }));
}

#[test]
fn ast_json_round_trip() {
    let file = parse(TASK_IDL).unwrap();
    let json = file.to_json().unwrap();
    let back = quill_syntax::IdlFile::from_json(&json).unwrap();
    assert_eq!(back, file);
}
