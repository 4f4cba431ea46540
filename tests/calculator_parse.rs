use formgate::parse::parse;
use formgate::{Calculator, CompareOp, Fact, FormContext, RuleStore, Value, fact};

#[test]
fn parse_literal_forms() {
    assert_eq!(parse("true").unwrap(), Calculator::Const(Value::Bool(true)));
    assert_eq!(parse("0").unwrap(), Calculator::Const(Value::Int(0)));
    assert_eq!(
        parse(r#""false""#).unwrap(),
        Calculator::Const(Value::String("false".into()))
    );
}

#[test]
fn parse_matches_builder() {
    let parsed = parse("is_modify AND NOT has_id").unwrap();
    let built = fact(Fact::IsModify).value().and(!fact(Fact::HasId).value());
    assert_eq!(parsed, built);
}

#[test]
fn parse_lowercase_keywords() {
    let parsed = parse("has_selection or selected_count != 0").unwrap();
    assert_eq!(
        parsed,
        fact(Fact::HasSelection)
            .value()
            .or(fact(Fact::SelectedCount).neq(0_i64))
    );
}

#[test]
fn parse_via_from_str() {
    let calc: Calculator = "record_id == \"A-1\"".parse().unwrap();
    assert_eq!(
        calc,
        Calculator::Compare {
            fact: Fact::RecordId,
            op: CompareOp::Eq,
            value: Value::String("A-1".into()),
        }
    );
}

#[test]
fn display_reparses_to_same_tree() {
    let source = "NOT is_modify OR (has_id AND selected_count >= 2)";
    let calc = parse(source).unwrap();
    assert_eq!(parse(&calc.to_string()).unwrap(), calc);
}

#[test]
fn arbitrary_code_is_rejected() {
    for src in [
        "alert(1)",
        "window.location = 'x'",
        "this.setState({})",
        "is_modify && has_id",
        "is_modify ==",
    ] {
        assert!(parse(src).is_err(), "accepted {src:?}");
    }
}

#[test]
fn evaluate_against_form() {
    let form = FormContext::new()
        .modify(true)
        .with_id("A-1")
        .with_selected(vec![serde_json::json!({}), serde_json::json!({})]);

    let eval = |src: &str| parse(src).unwrap().evaluate(&form);

    assert_eq!(eval("is_modify"), Some(Value::Bool(true)));
    assert_eq!(eval("record_id"), Some(Value::String("A-1".into())));
    assert_eq!(eval("selected_count"), Some(Value::Int(2)));
    assert_eq!(eval("selected_count > 2"), Some(Value::Bool(false)));
    assert_eq!(eval("record_id == \"A-1\" AND has_selection"), Some(Value::Bool(true)));
    assert_eq!(eval("NOT record_id"), Some(Value::Bool(true)));
    assert_eq!(parse("record_id").unwrap().evaluate(&FormContext::new()), None);
}

#[test]
fn store_validation_catches_bad_calculators() {
    let store = RuleStore::from_json(
        r#"[
            {"code": "calculator", "inUse": true, "config": {"function_cal": "has_id"}},
            {"code": "calculator", "inUse": true, "config": {"function_cal": "eval(x)"}}
        ]"#,
    )
    .unwrap();
    let err = store.validate().unwrap_err();
    assert!(err.to_string().starts_with("rule #1 has an invalid function_cal"));
}
