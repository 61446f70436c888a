use pretty_assertions::assert_eq;
use weft_ir::VarScope;

use super::*;
use crate::EvalErrorKind;

fn ctx() -> ExecutionContext {
    let ctx = ExecutionContext::root();
    ctx.set(VarScope::Local, "name", Value::str("Ada"));
    ctx.set(VarScope::Local, "count", Value::Int(3));
    ctx.set(
        VarScope::Local,
        "user",
        Value::from_json(serde_json::json!({"name": "Lin", "tags": ["a", "b"]})),
    );
    ctx
}

#[test]
fn test_precedence() {
    let ctx = ctx();
    assert_eq!(eval_str("1 + 2 * 3", &ctx).unwrap(), Value::Int(7));
    assert_eq!(eval_str("(1 + 2) * 3", &ctx).unwrap(), Value::Int(9));
    assert_eq!(eval_str("10 - 4 - 3", &ctx).unwrap(), Value::Int(3));
    assert_eq!(
        eval_str("count > 2 && count < 5 || false", &ctx).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(eval_str("-count + 1", &ctx).unwrap(), Value::Int(-2));
}

#[test]
fn test_paths_and_indexing() {
    let ctx = ctx();
    assert_eq!(eval_str("user.name", &ctx).unwrap(), Value::str("Lin"));
    assert_eq!(eval_str("user.tags[1]", &ctx).unwrap(), Value::str("b"));
    assert_eq!(eval_str("user.tags[-1]", &ctx).unwrap(), Value::str("b"));
    assert_eq!(eval_str("user.tags.length", &ctx).unwrap(), Value::Int(2));
    assert_eq!(eval_str("user[\"name\"]", &ctx).unwrap(), Value::str("Lin"));
    assert_eq!(eval_str("user.missing", &ctx).unwrap(), Value::Null);
    assert_eq!(eval_str("user.tags[9]", &ctx).unwrap(), Value::Null);
    assert_eq!(eval_str("name[0]", &ctx).unwrap(), Value::str("A"));
    assert!(eval_str("count.name", &ctx).is_err());
}

#[test]
fn test_short_circuit_skips_undefined_names() {
    let ctx = ctx();
    assert_eq!(eval_str("false && missing", &ctx).unwrap(), Value::Bool(false));
    assert_eq!(eval_str("true || missing", &ctx).unwrap(), Value::Bool(true));
    assert!(eval_str("true && missing", &ctx).is_err());
}

#[test]
fn test_list_literal() {
    assert_eq!(
        eval_str("[1, 'two', count]", &ctx()).unwrap(),
        Value::List(vec![Value::Int(1), Value::str("two"), Value::Int(3)])
    );
}

#[test]
fn test_syntax_errors() {
    for src in ["", "1 +", "(1", "a b", "a.", "#"] {
        let err = parse(src).unwrap_err();
        assert!(
            matches!(err.kind, EvalErrorKind::Expression { .. }),
            "{src}: {err:?}"
        );
    }
}

#[test]
fn test_segments() {
    assert_eq!(segments("").unwrap(), vec![]);
    assert_eq!(
        segments("plain").unwrap(),
        vec![Segment::Literal(Cow::Borrowed("plain"))]
    );
    assert_eq!(
        segments("Hi {name}!").unwrap(),
        vec![
            Segment::Literal("Hi ".into()),
            Segment::Binding("name"),
            Segment::Literal("!".into()),
        ]
    );
    assert_eq!(
        segments("{{literal}} {x}").unwrap(),
        vec![
            Segment::Literal("{literal} ".into()),
            Segment::Binding("x"),
        ]
    );
    assert_eq!(
        segments("{a + '}'}").unwrap(),
        vec![Segment::Binding("a + '}'")]
    );
    assert!(segments("oops {name").is_err());
    assert_eq!(
        segments("a } b").unwrap(),
        vec![Segment::Literal("a } b".into())]
    );
}

#[test]
fn test_interpolate() {
    let ctx = ctx();
    assert_eq!(
        interpolate("Hello, {name}! You have {count} items.", &ctx).unwrap(),
        "Hello, Ada! You have 3 items."
    );
    assert_eq!(interpolate("{user.tags}", &ctx).unwrap(), r#"["a","b"]"#);
    let err = interpolate("Total: {total}", &ctx).unwrap_err();
    assert!(err.to_string().contains("total"));
}

#[test]
fn test_interpolate_markup_keeps_non_expression_braces() {
    let ctx = ctx();
    assert_eq!(
        interpolate_markup("body { color: red } p { margin: 0 }", &ctx).unwrap(),
        "body { color: red } p { margin: 0 }"
    );
    assert_eq!(
        interpolate_markup("if (x) { return 1; }", &ctx).unwrap(),
        "if (x) { return 1; }"
    );
    assert_eq!(interpolate_markup("open { brace", &ctx).unwrap(), "open { brace");
    assert_eq!(
        interpolate_markup("{name}: { color: red }", &ctx).unwrap(),
        "Ada: { color: red }"
    );

    let err = interpolate_markup("Total: {total}", &ctx).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "total".to_string()
        }
    );
}

#[test]
fn test_evaluate_value_keeps_type_of_single_binding() {
    let ctx = ctx();
    assert_eq!(evaluate_value("{count}", &ctx).unwrap(), Value::Int(3));
    assert_eq!(evaluate_value(" {count + 1} ", &ctx).unwrap(), Value::Int(4));
    assert_eq!(
        evaluate_value("{count} items", &ctx).unwrap(),
        Value::str("3 items")
    );
    assert_eq!(evaluate_value("42", &ctx).unwrap(), Value::str("42"));
    assert_eq!(evaluate_value("{{x}}", &ctx).unwrap(), Value::str("{x}"));
}

#[test]
fn test_conditions() {
    let ctx = ctx();
    assert!(evaluate_condition("{count}", &ctx).unwrap());
    assert!(evaluate_condition("count == 3", &ctx).unwrap());
    assert!(evaluate_condition("{count > 1}", &ctx).unwrap());
    assert!(!evaluate_condition("name == 'Bob'", &ctx).unwrap());
    assert!(!evaluate_condition("  ", &ctx).unwrap());
    assert!(evaluate_condition("missing", &ctx).is_err());
}

#[test]
fn test_conditions_mixing_bindings_and_operators() {
    let ctx = ctx();
    ctx.set(VarScope::Local, "a", Value::Int(1));
    ctx.set(VarScope::Local, "b", Value::Int(2));
    assert!(!evaluate_condition("{a} == {b}", &ctx).unwrap());
    assert!(evaluate_condition("{a} != {b}", &ctx).unwrap());
    assert!(!evaluate_condition("{count} > 3", &ctx).unwrap());
    assert!(evaluate_condition("{count} >= 3 && {name} == 'Ada'", &ctx).unwrap());
    assert!(evaluate_condition("{a + 1} == b", &ctx).unwrap());
    assert!(!evaluate_condition("!{count}", &ctx).unwrap());

    let err = evaluate_condition("{missing} > 1", &ctx).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "missing".to_string()
        }
    );
    let err = evaluate_condition("{a} {b}", &ctx).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Expression { .. }));
}
