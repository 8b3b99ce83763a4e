//! Precondition checks shared by every operation. Each guard returns the
//! first violation it finds; operations run them in a fixed order so a
//! single message surfaces.

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::inspect::{classify, Category};
use crate::runtime::value::Value;
use crate::types::TypeExpr;

/// Fails for a nil value and for a pointer to one.
pub fn require_non_nil(label: &str, value: &Value) -> RuntimeResult<()> {
    if value.deref_once().is_nil() {
        return Err(RuntimeError::nil_input(label));
    }
    Ok(())
}

pub fn require_sequence(label: &str, value: &Value) -> RuntimeResult<()> {
    if classify(value).category != Category::Sequence {
        return Err(RuntimeError::wrong_shape(format!("{label} must be slice")));
    }
    Ok(())
}

/// Variadic form: passes when at least one of `values` is a sequence.
pub fn require_any_sequence(label: &str, values: &[Value]) -> RuntimeResult<()> {
    match values {
        [single] => require_sequence(label, single),
        many if many.iter().any(|value| classify(value).is_sequence()) => Ok(()),
        _ => Err(RuntimeError::wrong_shape(format!("{label} must be slice"))),
    }
}

pub fn require_mapping(label: &str, value: &Value) -> RuntimeResult<()> {
    if !classify(value).is_mapping() {
        return Err(RuntimeError::wrong_shape(format!("{label} must be map")));
    }
    Ok(())
}

pub fn require_function(label: &str, value: &Value) -> RuntimeResult<()> {
    if !classify(value).is_function() {
        return Err(RuntimeError::wrong_shape(format!("{label} must be function")));
    }
    Ok(())
}

pub fn require_non_negative(label: &str, n: i64) -> RuntimeResult<()> {
    if n < 0 {
        return Err(RuntimeError::range(format!(
            "{label} must not be negative number"
        )));
    }
    Ok(())
}

pub fn require_positive(label: &str, n: i64) -> RuntimeResult<()> {
    if n <= 0 {
        return Err(RuntimeError::range(format!("{label} must be positive number")));
    }
    Ok(())
}

pub fn require_ordered(label_left: &str, left: i64, label_right: &str, right: i64) -> RuntimeResult<()> {
    if left < right {
        return Err(RuntimeError::range(format!(
            "{label_left} should be greater than {label_right}"
        )));
    }
    Ok(())
}

pub fn require_same_type(
    label_left: &str,
    type_left: &TypeExpr,
    label_right: &str,
    type_right: &TypeExpr,
) -> RuntimeResult<()> {
    if type_left != type_right {
        return Err(RuntimeError::type_mismatch(format!(
            "type of {label_left} should be same with type of {label_right}"
        )));
    }
    Ok(())
}
