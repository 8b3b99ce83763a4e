//! The two traversal primitives. Length and key order are captured before
//! the first visit and the source is never mutated; higher-level traversal
//! composes these with a closure that accumulates into caller-owned state.

use crate::runtime::error::RuntimeResult;
use crate::runtime::value::{MapKey, MapValue, SliceValue, Value};

pub fn for_each_sequence<F>(seq: &SliceValue, mut visit: F) -> RuntimeResult<()>
where
    F: FnMut(Value, usize) -> RuntimeResult<()>,
{
    for_each_sequence_stoppable(seq, |element, index| {
        visit(element, index)?;
        Ok(true)
    })
}

/// Stops at the first visit returning `false`.
pub fn for_each_sequence_stoppable<F>(seq: &SliceValue, mut visit: F) -> RuntimeResult<()>
where
    F: FnMut(Value, usize) -> RuntimeResult<bool>,
{
    let len = seq.len();
    for index in 0..len {
        // Elements are read one at a time so `visit` never runs under a borrow.
        let Some(element) = seq.get(index) else {
            break;
        };
        if !visit(element, index)? {
            break;
        }
    }
    Ok(())
}

/// Visits `keys` in the given order; keys missing from `map` are skipped.
pub fn for_each_mapping<F>(map: &MapValue, keys: &[MapKey], mut visit: F) -> RuntimeResult<()>
where
    F: FnMut(Value, &MapKey) -> RuntimeResult<()>,
{
    for_each_mapping_stoppable(map, keys, |value, key| {
        visit(value, key)?;
        Ok(true)
    })
}

pub fn for_each_mapping_stoppable<F>(map: &MapValue, keys: &[MapKey], mut visit: F) -> RuntimeResult<()>
where
    F: FnMut(Value, &MapKey) -> RuntimeResult<bool>,
{
    for key in keys {
        let Some(value) = map.get(key) else {
            continue;
        };
        if !visit(value, key)? {
            break;
        }
    }
    Ok(())
}
