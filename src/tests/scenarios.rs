use crate::ops;
use crate::runtime::guard;
use crate::{ErrorKind, TypeExpr, Value};

fn letters() -> Value {
    Value::strings(&["a", "b", "c", "d"])
}

#[test]
fn splits_four_letters_into_pairs() {
    let groups = ops::chunk(&letters(), 2).expect("chunk");
    let expected = Value::slice(
        TypeExpr::slice_of(TypeExpr::Str),
        vec![Value::strings(&["a", "b"]), Value::strings(&["c", "d"])],
    );
    assert_eq!(groups, expected);
}

#[test]
fn negative_split_size_fails_without_result() {
    let err = ops::chunk(&letters(), -1).expect_err("negative size");
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(err.to_string(), "size must not be negative number");
}

#[test]
fn scalar_where_sequence_required() {
    let err = ops::chunk(&Value::Int(12), 2).expect_err("scalar input");
    assert_eq!(err.kind(), ErrorKind::WrongShape);
    assert_eq!(err.to_string(), "data must be slice");
}

#[test]
fn search_callback_with_wrong_element_parameter() {
    let on_ints = Value::func("func(int) bool", |_| vec![Value::Bool(true)]).expect("signature");
    let err = ops::find_index(&letters(), &on_ints, 0).expect_err("int callback on strings");
    assert_eq!(err.kind(), ErrorKind::CallbackParamType);
    assert_eq!(
        err.to_string(),
        "callback 1st parameter's data type should be same with slice element data type"
    );
}

#[test]
fn search_callback_with_non_bool_return() {
    let echo = Value::func("func(string) string", |args| vec![args[0].clone()]).expect("signature");
    let err = ops::find_index(&letters(), &echo, 0).expect_err("string predicate");
    assert_eq!(err.kind(), ErrorKind::CallbackReturnShape);
    assert_eq!(
        err.to_string(),
        "callback return value should be one variable with bool type"
    );
}

#[test]
fn last_index_must_not_precede_start_index() {
    let err = guard::require_ordered("last index", 1, "start index", 2).expect_err("unordered");
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(err.to_string(), "last index should be greater than start index");
}
