//! Fresh result containers typed after an input container.
//!
//! Sequence builders always return a growable [`SliceValue`]: a fixed-size
//! array source yields a slice of the same element type.

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::{MapValue, SliceValue};
use crate::types::TypeExpr;

/// Builds a slice whose element type matches `source`'s (a slice, array, or
/// pointer to either). `len` slots are filled with the element's zero value
/// and at least `capacity` slots are reserved.
pub fn make_sequence_like(source: &TypeExpr, len: usize, capacity: usize) -> RuntimeResult<SliceValue> {
    let elem = match source {
        TypeExpr::Pointer(inner) => inner.element(),
        other => other.element(),
    };
    match elem {
        Some(elem) => Ok(make_sequence_of(elem.clone(), len, capacity)),
        None => Err(RuntimeError::wrong_shape(format!(
            "cannot build a slice like {source}"
        ))),
    }
}

pub fn make_sequence_of(elem_type: TypeExpr, len: usize, capacity: usize) -> SliceValue {
    let slice = SliceValue::with_capacity(elem_type, capacity.max(len));
    for _ in 0..len {
        slice.push(slice.elem_type.zero_value());
    }
    slice
}

/// Builds an empty mapping with `source`'s key and value types.
pub fn make_mapping_like(source: &TypeExpr) -> RuntimeResult<MapValue> {
    let source = match source {
        TypeExpr::Pointer(inner) => inner.as_ref(),
        other => other,
    };
    match source {
        TypeExpr::Map { key, value } => make_mapping_of((**key).clone(), (**value).clone()),
        other => Err(RuntimeError::wrong_shape(format!(
            "cannot build a map like {other}"
        ))),
    }
}

/// Builds an empty mapping; the key type must be hashable.
pub fn make_mapping_of(key_type: TypeExpr, value_type: TypeExpr) -> RuntimeResult<MapValue> {
    if !key_type.is_hashable() {
        return Err(RuntimeError::fault(format!(
            "runtime error: hash of unhashable type {key_type}"
        )));
    }
    Ok(MapValue::new(key_type, value_type))
}
