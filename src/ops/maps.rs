use super::iterate::{mapping_callback, return_type};
use super::{callback_arg, mapping_arg, sequence_arg};
use crate::runtime::builder;
use crate::runtime::callback::ReturnContract;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::iter;
use crate::runtime::recover;
use crate::runtime::value::Value;
use crate::types::TypeExpr;

/// Builds a map from `[key, value]` pairs. A pair list typed `[][]T` or
/// `[][2]T` yields `map[T]T`; `[]any` yields `map[any]any`.
pub fn from_pairs(data: &Value) -> RuntimeResult<Value> {
    let pairs = sequence_arg("data", data)?;
    let entry_type = match &pairs.elem_type {
        TypeExpr::Any => TypeExpr::Any,
        other => match other.element() {
            Some(elem) => elem.clone(),
            None => {
                return Err(RuntimeError::wrong_shape(
                    "each element of data must be a slice pair",
                ))
            }
        },
    };

    recover::scoped_recover_with(
        || {
            let result = builder::make_mapping_of(entry_type.clone(), entry_type.clone())?;
            iter::for_each_sequence(&pairs, |pair, _| {
                let pair = pair.as_sequence().ok_or_else(|| {
                    RuntimeError::wrong_shape("each element of data must be a slice pair")
                })?;
                match pair.snapshot().as_slice() {
                    [key, value] => result.insert_value(key, value.clone()),
                    _ => Err(RuntimeError::wrong_shape(
                        "each pair in data must have exactly two elements",
                    )),
                }
            })?;
            Ok(result.into_value())
        },
        |fault| format!("key of each pair in data must be hashable: {fault}"),
    )
}

/// `[key, value]` pairs of a map, in key order, as `[][]any`.
pub fn to_pairs(data: &Value) -> RuntimeResult<Value> {
    let map = mapping_arg("data", data)?;
    let pair_type = TypeExpr::slice_of(TypeExpr::Any);
    let result = builder::make_sequence_of(pair_type, 0, map.len());
    iter::for_each_mapping(&map, &map.keys(), |value, key| {
        result.push(Value::slice(TypeExpr::Any, vec![key.to_value(), value]));
        Ok(())
    })?;
    Ok(result.into_value())
}

/// Same keys, values replaced by `callback(value[, key])`.
pub fn map_values(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let map = mapping_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = mapping_callback(&map, &func, ReturnContract::Single)?;

    let result = builder::make_mapping_of(map.key_type.clone(), return_type(&callback))?;
    iter::for_each_mapping(&map, &map.keys(), |value, key| {
        result.insert(key.clone(), callback.mapped_keyed(value, key)?);
        Ok(())
    })?;
    Ok(result.into_value())
}
