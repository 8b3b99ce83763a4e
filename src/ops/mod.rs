//! Collection operations built on the runtime dispatch layer.
//!
//! Every operation runs its guards first and returns a new container; the
//! only in-place operation is [`slice::fill`].

pub mod iterate;
pub mod maps;
pub mod random;
pub mod slice;

pub use iterate::{
    count_by, detect, each, each_right, every, filter, find, find_index, find_last,
    find_last_index, group_by, key_by, map, partition, reduce, reject, some,
};
pub use maps::{from_pairs, map_values, to_pairs};
pub use random::{sample, sample_size, shuffle};
pub use slice::{
    chunk, compact, concat, difference, drop, drop_right, fill, first, includes, index_of,
    initial, intersection, join, last, last_index_of, nth, pull, reverse, size, tail, take,
    take_right, union, uniq, without,
};

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::guard;
use crate::runtime::value::{FuncValue, MapValue, SliceValue, Value};
use crate::types::TypeExpr;

pub(crate) fn sequence_arg(label: &str, value: &Value) -> RuntimeResult<SliceValue> {
    guard::require_non_nil(label, value)?;
    guard::require_sequence(label, value)?;
    value
        .as_sequence()
        .ok_or_else(|| RuntimeError::wrong_shape(format!("{label} must be slice")))
}

pub(crate) fn mapping_arg(label: &str, value: &Value) -> RuntimeResult<MapValue> {
    guard::require_non_nil(label, value)?;
    guard::require_mapping(label, value)?;
    value
        .as_map()
        .ok_or_else(|| RuntimeError::wrong_shape(format!("{label} must be map")))
}

pub(crate) fn callback_arg(value: &Value) -> RuntimeResult<FuncValue> {
    guard::require_non_nil("callback", value)?;
    guard::require_function("callback", value)?;
    value
        .as_func()
        .ok_or_else(|| RuntimeError::wrong_shape("callback must be function"))
}

/// Slice type used when comparing sequences, so `[4]T` and `[]T` line up.
pub(crate) fn sequence_type(seq: &SliceValue) -> TypeExpr {
    TypeExpr::slice_of(seq.elem_type.clone())
}
