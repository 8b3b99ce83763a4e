use super::*;
use crate::runtime::callback::{Callback, Reducer, ReturnContract};
use crate::types::{Signature, TypeExpr};
use std::cell::RefCell;
use std::rc::Rc;

fn func(signature: &str, body: impl Fn(&[Value]) -> Vec<Value> + 'static) -> FuncValue {
    FuncValue::new(Signature::parse(signature).expect("signature"), body)
}

fn noop(signature: &str) -> FuncValue {
    func(signature, |_| Vec::new())
}

fn message(result: RuntimeResult<impl std::fmt::Debug>) -> String {
    result.expect_err("expected failure").to_string()
}

#[test]
fn classifies_nil_handles_as_nil() {
    let literal = classify(&Value::nil());
    assert_eq!(literal.category, Category::Nil);
    assert_eq!(literal.ty, None);

    let typed = classify(&Value::typed_nil(TypeExpr::slice_of(TypeExpr::Str)));
    assert_eq!(typed.category, Category::Nil);
    assert_eq!(typed.len, 0);

    let behind_pointer = classify(&Value::pointer_to(Value::typed_nil(TypeExpr::map_of(
        TypeExpr::Str,
        TypeExpr::Int,
    ))));
    assert_eq!(behind_pointer.category, Category::Nil);
}

#[test]
fn classifies_sequences_through_one_pointer() {
    let direct = classify(&Value::strings(&["a", "b"]));
    assert!(direct.is_sequence());
    assert_eq!(direct.len, 2);
    assert_eq!(direct.element_type(), Some(&TypeExpr::Str));
    assert!(!direct.is_fixed_size());

    let pointed = classify(&Value::pointer_to(Value::strings(&["a", "b", "c"])));
    assert!(pointed.is_sequence());
    assert_eq!(pointed.ty, Some(TypeExpr::slice_of(TypeExpr::Str)));
    assert_eq!(pointed.len, 3);

    let twice = classify(&Value::pointer_to(Value::pointer_to(Value::ints(&[1]))));
    assert_eq!(twice.category, Category::Pointer);
}

#[test]
fn classifies_arrays_maps_functions_and_scalars() {
    let array = classify(&Value::array(TypeExpr::Int, vec![Value::Int(1), Value::Int(2)]));
    assert!(array.is_sequence());
    assert!(array.is_fixed_size());
    assert_eq!(array.ty, Some(TypeExpr::array_of(2, TypeExpr::Int)));

    let map = MapValue::new(TypeExpr::Str, TypeExpr::Bool);
    map.insert(MapKey::Str("on".into()), Value::Bool(true));
    let shape = classify(&map.into_value());
    assert!(shape.is_mapping());
    assert_eq!(shape.key_type(), Some(&TypeExpr::Str));
    assert_eq!(shape.element_type(), Some(&TypeExpr::Bool));
    assert_eq!(shape.len, 1);

    let callback = Value::Func(noop("func(string, int) bool"));
    let shape = classify(&callback);
    assert!(shape.is_function());
    assert_eq!(
        shape.element,
        ElementShape::Signature {
            params: vec![TypeExpr::Str, TypeExpr::Int],
            returns: vec![TypeExpr::Bool],
        }
    );

    let scalar = classify(&Value::Int(12));
    assert_eq!(scalar.category, Category::Scalar);
    assert_eq!(scalar.ty, Some(TypeExpr::Int));
}

#[test]
fn values_compare_deeply_and_render_go_style() {
    assert_eq!(Value::strings(&["a", "b"]), Value::strings(&["a", "b"]));
    assert_ne!(Value::strings(&["a"]), Value::ints(&[1]));
    assert_eq!(Value::nil(), Value::typed_nil(TypeExpr::slice_of(TypeExpr::Int)));
    assert_eq!(Value::strings(&["a", "b"]).to_string(), "[a b]");

    let map = MapValue::new(TypeExpr::Str, TypeExpr::Int);
    map.insert(MapKey::Str("b".into()), Value::Int(2));
    map.insert(MapKey::Str("a".into()), Value::Int(1));
    assert_eq!(map.into_value().to_string(), "map[a:1 b:2]");
}

#[test]
fn expect_bool_reports_interface_conversion() {
    assert_eq!(Value::Bool(true).expect_bool(), Ok(true));
    assert_eq!(
        message(Value::Int(3).expect_bool()),
        "interface conversion: interface {} is int, not bool"
    );
}

#[test]
fn sequence_validator_rejects_wrong_element_parameter() {
    let err = callback::validate_for_sequence(&noop("func(int) bool"), &TypeExpr::Str)
        .expect_err("int parameter against string elements");
    assert_eq!(err.kind(), ErrorKind::CallbackParamType);
    assert_eq!(
        err.to_string(),
        "callback 1st parameter's data type should be same with slice element data type"
    );
}

#[test]
fn sequence_validator_checks_arity_and_index_slot() {
    assert_eq!(
        message(callback::validate_for_sequence(&noop("func() bool"), &TypeExpr::Str)),
        "callback must only have one or two parameters"
    );
    assert_eq!(
        message(callback::validate_for_sequence(
            &noop("func(string, int, int) bool"),
            &TypeExpr::Str
        )),
        "callback must only have one or two parameters"
    );
    assert_eq!(
        message(callback::validate_for_sequence(
            &noop("func(string, string) bool"),
            &TypeExpr::Str
        )),
        "callback 2nd parameter's data type should be int"
    );

    let unary = callback::validate_for_sequence(&noop("func(string) bool"), &TypeExpr::Str)
        .expect("unary callback");
    assert!(matches!(unary, Callback::Unary(_)));
    let binary = callback::validate_for_sequence(&noop("func(string, int) bool"), &TypeExpr::Str)
        .expect("binary callback");
    assert!(matches!(binary, Callback::Binary(_)));
}

#[test]
fn mapping_validator_uses_map_wording() {
    let (key, value) = (TypeExpr::Str, TypeExpr::Int);
    assert_eq!(
        message(callback::validate_for_mapping(&noop("func(string) bool"), &key, &value)),
        "callback 1st parameter's data type should be same with map value data type"
    );
    assert_eq!(
        message(callback::validate_for_mapping(&noop("func(int, int) bool"), &key, &value)),
        "callback 2nd parameter's data type should be same with map key data type"
    );
    assert!(callback::validate_for_mapping(&noop("func(int, string) bool"), &key, &value).is_ok());
}

#[test]
fn return_contracts_have_distinct_messages() {
    let cases = [
        (
            "func(int) bool",
            ReturnContract::Nothing,
            "callback should not have return value",
        ),
        (
            "func(int) int",
            ReturnContract::Bool,
            "callback return value should be one variable with bool type",
        ),
        (
            "func(int) (bool, bool)",
            ReturnContract::Bool,
            "callback return value should be one variable with bool type",
        ),
        (
            "func(int)",
            ReturnContract::Single,
            "callback return value should be one variable",
        ),
        (
            "func(int) (int, bool)",
            ReturnContract::BoolThenAny,
            "callback return value should be bool type, optionally followed by one more value",
        ),
    ];
    for (signature, contract, expected) in cases {
        let err = callback::validate_returns(&noop(signature), contract)
            .expect_err("contract violation");
        assert_eq!(err.kind(), ErrorKind::CallbackReturnShape, "{signature}");
        assert_eq!(err.to_string(), expected, "{signature}");
    }

    assert!(callback::validate_returns(&noop("func(int)"), ReturnContract::Nothing).is_ok());
    assert!(callback::validate_returns(&noop("func(int) bool"), ReturnContract::BoolThenAny).is_ok());
    assert!(
        callback::validate_returns(&noop("func(int) (bool, string)"), ReturnContract::BoolThenAny)
            .is_ok()
    );
}

#[test]
fn reducer_validator_checks_every_slot() {
    let (acc, elem) = (TypeExpr::Int, TypeExpr::Str);
    assert_eq!(
        message(callback::validate_reducer(&noop("func(int) int"), &acc, &elem)),
        "callback must only have two or three parameters"
    );
    assert_eq!(
        message(callback::validate_reducer(&noop("func(string, string) int"), &acc, &elem)),
        "callback 1st parameter's data type should be same with initial value data type"
    );
    assert_eq!(
        message(callback::validate_reducer(&noop("func(int, int) int"), &acc, &elem)),
        "callback 2nd parameter's data type should be same with slice element data type"
    );
    assert_eq!(
        message(callback::validate_reducer(&noop("func(int, string, string) int"), &acc, &elem)),
        "callback 3rd parameter's data type should be int"
    );
    assert_eq!(
        message(callback::validate_reducer(&noop("func(int, string) string"), &acc, &elem)),
        "callback return value should be one variable with same type as initial value"
    );

    let indexed = callback::validate_reducer(&noop("func(int, string, int) int"), &acc, &elem)
        .expect("indexed reducer");
    assert!(matches!(indexed, Reducer::Indexed(_)));
}

#[test]
fn reducer_step_threads_the_accumulator() {
    let sum = func("func(int, int) int", |args| {
        vec![Value::Int(
            args[0].as_int().unwrap_or(0) + args[1].as_int().unwrap_or(0),
        )]
    });
    let reducer =
        callback::validate_reducer(&sum, &TypeExpr::Int, &TypeExpr::Int).expect("reducer");
    let next = reducer
        .step(Value::Int(10), Value::Int(5), 0)
        .expect("step");
    assert_eq!(next, Value::Int(15));
}

#[test]
fn sequence_iteration_visits_in_order_and_stops_early() {
    let seq = SliceValue::from_vec(
        vec![Value::str("a"), Value::str("b"), Value::str("c")],
        TypeExpr::Str,
    );
    let mut seen = Vec::new();
    iter::for_each_sequence(&seq, |element, index| {
        seen.push(format!("{index}:{element}"));
        Ok(())
    })
    .expect("iteration");
    assert_eq!(seen, ["0:a", "1:b", "2:c"]);

    let mut visits = 0;
    iter::for_each_sequence_stoppable(&seq, |element, _| {
        visits += 1;
        Ok(element != Value::str("b"))
    })
    .expect("iteration");
    assert_eq!(visits, 2);
}

#[test]
fn sequence_iteration_propagates_visit_failure() {
    let seq = SliceValue::from_vec(vec![Value::Int(1), Value::Int(2)], TypeExpr::Int);
    let mut visits = 0;
    let err = iter::for_each_sequence(&seq, |_, _| {
        visits += 1;
        Err(RuntimeError::range("stop"))
    })
    .expect_err("visit failure");
    assert_eq!(err.to_string(), "stop");
    assert_eq!(visits, 1);
}

#[test]
fn mapping_iteration_follows_given_keys_and_skips_missing() {
    let map = MapValue::new(TypeExpr::Str, TypeExpr::Int);
    map.insert(MapKey::Str("a".into()), Value::Int(1));
    map.insert(MapKey::Str("b".into()), Value::Int(2));

    let keys = [
        MapKey::Str("b".into()),
        MapKey::Str("missing".into()),
        MapKey::Str("a".into()),
    ];
    let mut seen = Vec::new();
    iter::for_each_mapping(&map, &keys, |value, key| {
        seen.push(format!("{key}={value}"));
        Ok(())
    })
    .expect("iteration");
    assert_eq!(seen, ["b=2", "a=1"]);

    let mut first = None;
    iter::for_each_mapping_stoppable(&map, &map.keys(), |value, _| {
        first = Some(value);
        Ok(false)
    })
    .expect("iteration");
    assert_eq!(first, Some(Value::Int(1)));
}

#[test]
fn builder_turns_fixed_arrays_into_growable_slices() {
    let seq = builder::make_sequence_like(&TypeExpr::array_of(4, TypeExpr::Str), 0, 0)
        .expect("slice like [4]string");
    assert_eq!(seq.elem_type, TypeExpr::Str);
    assert!(seq.is_empty());
    seq.push(Value::str("grows"));
    assert!(matches!(seq.into_value(), Value::Slice(_)));

    let through_pointer = builder::make_sequence_like(
        &TypeExpr::pointer_to(TypeExpr::slice_of(TypeExpr::Int)),
        0,
        0,
    )
    .expect("slice like *[]int");
    assert_eq!(through_pointer.elem_type, TypeExpr::Int);

    assert_eq!(
        message(builder::make_sequence_like(&TypeExpr::Int, 0, 0)),
        "cannot build a slice like int"
    );
}

#[test]
fn builder_fills_length_with_zero_values_and_reserves_capacity() {
    let seq = builder::make_sequence_of(TypeExpr::Str, 2, 8);
    assert_eq!(seq.snapshot(), vec![Value::str(""), Value::str("")]);
    assert!(seq.capacity() >= 8);

    let seq = builder::make_sequence_of(TypeExpr::Int, 3, 1);
    assert_eq!(seq.len(), 3);
    assert!(seq.capacity() >= 3);
}

#[test]
fn builder_rejects_unhashable_mapping_keys() {
    let map = builder::make_mapping_like(&TypeExpr::map_of(TypeExpr::Str, TypeExpr::Int))
        .expect("map like map[string]int");
    assert_eq!(map.key_type, TypeExpr::Str);
    assert!(map.is_empty());

    let err = builder::make_mapping_of(TypeExpr::slice_of(TypeExpr::Int), TypeExpr::Int)
        .expect_err("slice keys");
    assert_eq!(err.kind(), ErrorKind::RuntimeFault);
    assert_eq!(err.to_string(), "runtime error: hash of unhashable type []int");

    assert_eq!(
        message(builder::make_mapping_like(&TypeExpr::Str)),
        "cannot build a map like string"
    );
}

#[test]
fn dynamic_keys_are_rechecked_per_value() {
    let map = builder::make_mapping_of(TypeExpr::Any, TypeExpr::Int).expect("any keys");
    map.insert_value(&Value::str("x"), Value::Int(1)).expect("string key");
    assert_eq!(
        message(map.insert_value(&Value::ints(&[1]), Value::Int(2))),
        "runtime error: hash of unhashable type []int"
    );
    assert_eq!(map.len(), 1);
}

#[test]
fn guards_report_exact_messages() {
    assert_eq!(
        message(guard::require_non_nil("data", &Value::nil())),
        "data cannot be nil"
    );
    assert_eq!(
        message(guard::require_non_nil(
            "data",
            &Value::typed_nil(TypeExpr::slice_of(TypeExpr::Int))
        )),
        "data cannot be nil"
    );
    assert_eq!(
        message(guard::require_sequence("data", &Value::Int(12))),
        "data must be slice"
    );
    assert_eq!(
        message(guard::require_mapping("data", &Value::ints(&[1]))),
        "data must be map"
    );
    assert_eq!(
        message(guard::require_function("callback", &Value::str("f"))),
        "callback must be function"
    );
    assert_eq!(
        message(guard::require_non_negative("size", -1)),
        "size must not be negative number"
    );
    assert_eq!(
        message(guard::require_positive("n", 0)),
        "n must be positive number"
    );
    assert_eq!(
        message(guard::require_ordered("last index", 1, "start index", 2)),
        "last index should be greater than start index"
    );
    assert_eq!(
        message(guard::require_same_type(
            "data",
            &TypeExpr::slice_of(TypeExpr::Int),
            "values",
            &TypeExpr::slice_of(TypeExpr::Str)
        )),
        "type of data should be same with type of values"
    );

    assert!(guard::require_ordered("last index", 2, "start index", 2).is_ok());
    assert!(guard::require_non_negative("size", 0).is_ok());
    assert!(guard::require_sequence("data", &Value::pointer_to(Value::ints(&[]))).is_ok());
}

#[test]
fn any_sequence_guard_accepts_mixed_variadic_input() {
    let mixed = [Value::Int(1), Value::ints(&[2])];
    assert!(guard::require_any_sequence("values", &mixed).is_ok());
    assert_eq!(
        message(guard::require_any_sequence("values", &[Value::Int(1)])),
        "values must be slice"
    );
    assert_eq!(
        message(guard::require_any_sequence("values", &[Value::Int(1), Value::str("x")])),
        "values must be slice"
    );
}

#[test]
fn error_kinds_match_variants() {
    assert_eq!(RuntimeError::nil_input("data").kind(), ErrorKind::NilInput);
    assert_eq!(RuntimeError::wrong_shape("x").kind(), ErrorKind::WrongShape);
    assert_eq!(RuntimeError::range("x").kind(), ErrorKind::Range);
    assert_eq!(RuntimeError::type_mismatch("x").kind(), ErrorKind::TypeMismatch);
    assert_eq!(RuntimeError::fault("x").kind(), ErrorKind::RuntimeFault);
}

#[test]
fn recover_turns_panics_into_faults() {
    let err = recover::scoped_recover::<()>(|| panic!("index out of range [3] with length 3"))
        .expect_err("panic");
    assert_eq!(err.kind(), ErrorKind::RuntimeFault);
    assert_eq!(err.to_string(), "index out of range [3] with length 3");

    let owned = recover::scoped_recover::<()>(|| panic!("{} exploded", "callback"))
        .expect_err("panic");
    assert_eq!(owned.to_string(), "callback exploded");

    assert_eq!(recover::scoped_recover(|| Ok(7)), Ok(7));
}

#[test]
fn recover_with_rewrites_only_faults() {
    let rewritten = recover::scoped_recover_with::<()>(
        || Err(RuntimeError::fault("boom")),
        |fault| format!("wrapped: {fault}"),
    )
    .expect_err("fault");
    assert_eq!(rewritten.to_string(), "wrapped: boom");

    let untouched = recover::scoped_recover_with::<()>(
        || Err(RuntimeError::range("n must not be negative number")),
        |fault| format!("wrapped: {fault}"),
    )
    .expect_err("range failure");
    assert_eq!(untouched.kind(), ErrorKind::Range);
    assert_eq!(untouched.to_string(), "n must not be negative number");
}

#[test]
fn func_call_checks_arguments_and_results() {
    let double = func("func(int) int", |args| {
        vec![Value::Int(args[0].as_int().unwrap_or(0) * 2)]
    });
    assert_eq!(double.call(&[Value::Int(4)]), Ok(vec![Value::Int(8)]));
    assert_eq!(
        message(double.call(&[])),
        "reflect: Call with too few input arguments"
    );
    assert_eq!(
        message(double.call(&[Value::Int(1), Value::Int(2)])),
        "reflect: Call with too many input arguments"
    );
    assert_eq!(
        message(double.call(&[Value::str("x")])),
        "reflect: Call using string as type int"
    );

    let liar = func("func(int) int", |_| vec![Value::str("not an int")]);
    assert_eq!(
        message(liar.call(&[Value::Int(1)])),
        "reflect: function returned string for result of type int"
    );

    let silent = func("func(int) int", |_| Vec::new());
    assert_eq!(
        message(silent.call(&[Value::Int(1)])),
        "reflect: function returned 0 values, signature declares 1"
    );
}

#[test]
fn func_call_recovers_panicking_body() {
    let explode = func("func(int) bool", |_| panic!("callback exploded"));
    let err = explode.call(&[Value::Int(1)]).expect_err("panic in body");
    assert_eq!(err.kind(), ErrorKind::RuntimeFault);
    assert_eq!(err.to_string(), "callback exploded");
}

#[test]
fn containers_are_shared_handles() {
    let seq = SliceValue::new(TypeExpr::Int);
    let alias = seq.clone();
    alias.push(Value::Int(1));
    assert_eq!(seq.len(), 1);

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let record = func("func(int)", move |args| {
        sink.borrow_mut().push(args[0].clone());
        Vec::new()
    });
    record.call(&[Value::Int(9)]).expect("call");
    assert_eq!(*log.borrow(), vec![Value::Int(9)]);

    let inner = Value::ints(&[1]);
    let pointer = Value::pointer_to(inner.clone());
    pointer.as_sequence().expect("sequence behind pointer").push(Value::Int(2));
    assert_eq!(inner.to_string(), "[1 2]");
}

#[test]
fn try_push_checks_the_element_type() {
    let seq = SliceValue::new(TypeExpr::Str);
    seq.try_push(Value::str("ok")).expect("string element");
    assert_eq!(
        message(seq.try_push(Value::Int(1))),
        "reflect.Set: value of type int is not assignable to type string"
    );
    assert_eq!(seq.len(), 1);
}
