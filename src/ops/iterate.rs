use super::slice::reversed;
use super::{callback_arg, sequence_arg, sequence_type};
use crate::runtime::builder;
use crate::runtime::callback::{self, Callback, ReturnContract};
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::guard;
use crate::runtime::iter;
use crate::runtime::recover;
use crate::runtime::value::{FuncValue, MapKey, MapValue, SliceValue, Value};
use crate::types::TypeExpr;

/// Input accepted by operations that walk either kind of collection.
enum Source {
    Sequence(SliceValue),
    Mapping(MapValue),
}

fn source_arg(data: &Value) -> RuntimeResult<Source> {
    guard::require_non_nil("data", data)?;
    match data.as_map() {
        Some(map) => Ok(Source::Mapping(map)),
        None => Ok(Source::Sequence(sequence_arg("data", data)?)),
    }
}

fn sequence_callback(
    seq: &SliceValue,
    func: &FuncValue,
    contract: ReturnContract,
) -> RuntimeResult<Callback> {
    let callback = callback::validate_for_sequence(func, &seq.elem_type)?;
    callback::validate_returns(func, contract)?;
    Ok(callback)
}

pub(crate) fn mapping_callback(
    map: &MapValue,
    func: &FuncValue,
    contract: ReturnContract,
) -> RuntimeResult<Callback> {
    let callback = callback::validate_for_mapping(func, &map.key_type, &map.value_type)?;
    callback::validate_returns(func, contract)?;
    Ok(callback)
}

/// Calls `callback` for every element (or entry); it must not return anything.
pub fn each(data: &Value, callback: &Value) -> RuntimeResult<()> {
    walk(data, callback, false)
}

/// Like [`each`], last element (or key) first.
pub fn each_right(data: &Value, callback: &Value) -> RuntimeResult<()> {
    walk(data, callback, true)
}

fn walk(data: &Value, callback: &Value, backwards: bool) -> RuntimeResult<()> {
    let source = source_arg(data)?;
    let func = callback_arg(callback)?;
    match source {
        Source::Sequence(seq) => {
            let callback = sequence_callback(&seq, &func, ReturnContract::Nothing)?;
            if !backwards {
                return iter::for_each_sequence(&seq, |element, index| {
                    callback.call_indexed(element, index).map(|_| ())
                });
            }
            let last = seq.len().saturating_sub(1);
            iter::for_each_sequence(&reversed(&seq)?, |element, offset| {
                callback.call_indexed(element, last - offset).map(|_| ())
            })
        }
        Source::Mapping(map) => {
            let callback = mapping_callback(&map, &func, ReturnContract::Nothing)?;
            let mut keys = map.keys();
            if backwards {
                keys.reverse();
            }
            iter::for_each_mapping(&map, &keys, |value, key| {
                callback.call_keyed(value, key).map(|_| ())
            })
        }
    }
}

/// Elements (or entries) for which `callback` returns true.
pub fn filter(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    select(data, callback, true)
}

/// Elements (or entries) for which `callback` returns false.
pub fn reject(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    select(data, callback, false)
}

fn select(data: &Value, callback: &Value, keep: bool) -> RuntimeResult<Value> {
    let source = source_arg(data)?;
    let func = callback_arg(callback)?;
    match source {
        Source::Sequence(seq) => {
            let callback = sequence_callback(&seq, &func, ReturnContract::Bool)?;
            let result = builder::make_sequence_like(&sequence_type(&seq), 0, 0)?;
            iter::for_each_sequence(&seq, |element, index| {
                if callback.predicate(element.clone(), index)? == keep {
                    result.push(element);
                }
                Ok(())
            })?;
            Ok(result.into_value())
        }
        Source::Mapping(map) => {
            let callback = mapping_callback(&map, &func, ReturnContract::Bool)?;
            let result = builder::make_mapping_of(map.key_type.clone(), map.value_type.clone())?;
            iter::for_each_mapping(&map, &map.keys(), |value, key| {
                if callback.predicate_keyed(value.clone(), key)? == keep {
                    result.insert(key.clone(), value);
                }
                Ok(())
            })?;
            Ok(result.into_value())
        }
    }
}

/// Splits `data` into `[matching, rest]`.
pub fn partition(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = sequence_callback(&seq, &func, ReturnContract::Bool)?;

    let source = sequence_type(&seq);
    let matching = builder::make_sequence_like(&source, 0, 0)?;
    let rest = builder::make_sequence_like(&source, 0, 0)?;
    iter::for_each_sequence(&seq, |element, index| {
        if callback.predicate(element.clone(), index)? {
            matching.push(element);
        } else {
            rest.push(element);
        }
        Ok(())
    })?;

    let result = builder::make_sequence_of(source, 0, 2);
    result.push(matching.into_value());
    result.push(rest.into_value());
    Ok(result.into_value())
}

pub fn some(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let found = search(data, callback, 0)?;
    Ok(Value::Bool(found.is_some()))
}

/// True when no element fails `callback`; stops at the first failure.
pub fn every(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = sequence_callback(&seq, &func, ReturnContract::Bool)?;
    let mut all = true;
    iter::for_each_sequence_stoppable(&seq, |element, index| {
        all = callback.predicate(element, index)?;
        Ok(all)
    })?;
    Ok(Value::Bool(all))
}

/// First element at or after `from_index` matching `callback`, or nil.
pub fn find(data: &Value, callback: &Value, from_index: i64) -> RuntimeResult<Value> {
    Ok(search(data, callback, from_index)?
        .map(|(_, element)| element)
        .unwrap_or_else(Value::nil))
}

/// Index of the first match at or after `from_index`, or -1.
pub fn find_index(data: &Value, callback: &Value, from_index: i64) -> RuntimeResult<Value> {
    let found = search(data, callback, from_index)?;
    Ok(Value::Int(found.map(|(index, _)| index as i64).unwrap_or(-1)))
}

pub fn find_last(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    Ok(search_last(data, callback)?
        .map(|(_, element)| element)
        .unwrap_or_else(Value::nil))
}

pub fn find_last_index(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let found = search_last(data, callback)?;
    Ok(Value::Int(found.map(|(index, _)| index as i64).unwrap_or(-1)))
}

fn search(data: &Value, callback: &Value, from_index: i64) -> RuntimeResult<Option<(usize, Value)>> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = sequence_callback(&seq, &func, ReturnContract::Bool)?;
    guard::require_non_negative("from index", from_index)?;

    let mut found = None;
    iter::for_each_sequence_stoppable(&seq, |element, index| {
        if (index as i64) < from_index {
            return Ok(true);
        }
        if callback.predicate(element.clone(), index)? {
            found = Some((index, element));
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(found)
}

fn search_last(data: &Value, callback: &Value) -> RuntimeResult<Option<(usize, Value)>> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = sequence_callback(&seq, &func, ReturnContract::Bool)?;

    let last = seq.len().saturating_sub(1);
    let mut found = None;
    iter::for_each_sequence_stoppable(&reversed(&seq)?, |element, offset| {
        let index = last - offset;
        if callback.predicate(element.clone(), index)? {
            found = Some((index, element));
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(found)
}

/// Early-exit search whose callback returns `found` optionally followed by
/// a value to hand back instead of the element. Nil when nothing matches.
pub fn detect(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = sequence_callback(&seq, &func, ReturnContract::BoolThenAny)?;

    let mut detected = Value::nil();
    iter::for_each_sequence_stoppable(&seq, |element, index| {
        let mut outputs = callback.call_indexed(element.clone(), index)?.into_iter();
        let found = match outputs.next() {
            Some(flag) => flag.expect_bool()?,
            None => false,
        };
        if found {
            detected = outputs.next().unwrap_or(element);
        }
        Ok(!found)
    })?;
    Ok(detected)
}

/// Applies `callback` to every element (or entry) and collects the results
/// into a slice typed after the callback's return type.
pub fn map(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let source = source_arg(data)?;
    let func = callback_arg(callback)?;
    match source {
        Source::Sequence(seq) => {
            let callback = sequence_callback(&seq, &func, ReturnContract::Single)?;
            let result = builder::make_sequence_of(return_type(&callback), 0, seq.len());
            iter::for_each_sequence(&seq, |element, index| {
                result.try_push(callback.mapped(element, index)?)
            })?;
            Ok(result.into_value())
        }
        Source::Mapping(map) => {
            let callback = mapping_callback(&map, &func, ReturnContract::Single)?;
            let result = builder::make_sequence_of(return_type(&callback), 0, map.len());
            iter::for_each_mapping(&map, &map.keys(), |value, key| {
                result.try_push(callback.mapped_keyed(value, key)?)
            })?;
            Ok(result.into_value())
        }
    }
}

/// Folds `data` into `initial` with `func(acc, element[, index]) acc`.
pub fn reduce(data: &Value, callback: &Value, initial: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    guard::require_non_nil("initial value", initial)?;
    let accumulator_type = initial
        .ty()
        .ok_or_else(|| RuntimeError::nil_input("initial value"))?;
    let reducer = callback::validate_reducer(&func, &accumulator_type, &seq.elem_type)?;

    let mut accumulator = initial.clone();
    iter::for_each_sequence(&seq, |element, index| {
        accumulator = reducer.step(accumulator.clone(), element, index)?;
        Ok(())
    })?;
    Ok(accumulator)
}

/// Groups elements under the key `callback` computes for them.
pub fn group_by(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = sequence_callback(&seq, &func, ReturnContract::Single)?;

    hashable_keys(|| {
        let source = sequence_type(&seq);
        let groups = builder::make_mapping_of(return_type(&callback), source.clone())?;
        iter::for_each_sequence(&seq, |element, index| {
            let key = MapKey::from_value(&callback.mapped(element.clone(), index)?)?;
            let group = match groups.get(&key).and_then(|group| group.as_sequence()) {
                Some(group) => group,
                None => {
                    let group = builder::make_sequence_like(&source, 0, 0)?;
                    groups.insert(key, group.clone().into_value());
                    group
                }
            };
            group.push(element);
            Ok(())
        })?;
        Ok(groups.into_value())
    })
}

/// Maps each computed key to the last element producing it.
pub fn key_by(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = sequence_callback(&seq, &func, ReturnContract::Single)?;

    hashable_keys(|| {
        let keyed = builder::make_mapping_of(return_type(&callback), seq.elem_type.clone())?;
        iter::for_each_sequence(&seq, |element, index| {
            let key = callback.mapped(element.clone(), index)?;
            keyed.insert_value(&key, element)
        })?;
        Ok(keyed.into_value())
    })
}

/// Counts elements per computed key.
pub fn count_by(data: &Value, callback: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let func = callback_arg(callback)?;
    let callback = sequence_callback(&seq, &func, ReturnContract::Single)?;

    hashable_keys(|| {
        let counts = builder::make_mapping_of(return_type(&callback), TypeExpr::Int)?;
        iter::for_each_sequence(&seq, |element, index| {
            let key = MapKey::from_value(&callback.mapped(element, index)?)?;
            let count = counts.get(&key).and_then(|n| n.as_int()).unwrap_or(0);
            counts.insert(key, Value::Int(count + 1));
            Ok(())
        })?;
        Ok(counts.into_value())
    })
}

pub(crate) fn return_type(callback: &Callback) -> TypeExpr {
    callback.returns().first().cloned().unwrap_or(TypeExpr::Any)
}

fn hashable_keys<T>(operation: impl FnOnce() -> RuntimeResult<T>) -> RuntimeResult<T> {
    recover::scoped_recover_with(operation, |fault| {
        if fault.contains("unhashable") {
            format!("callback return value should be hashable: {fault}")
        } else {
            fault.to_string()
        }
    })
}
