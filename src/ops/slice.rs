use super::{sequence_arg, sequence_type};
use crate::runtime::builder;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::guard;
use crate::runtime::inspect::{classify, Category};
use crate::runtime::iter;
use crate::runtime::value::{SliceValue, Value};
use std::mem;

/// Splits `data` into groups of `size`; the last group holds the remainder.
pub fn chunk(data: &Value, size: i64) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    guard::require_non_negative("size", size)?;

    let source = sequence_type(&seq);
    let result = builder::make_sequence_of(source.clone(), 0, 0);
    if size == 0 {
        return Ok(result.into_value());
    }
    let size = size as usize;
    let capacity = size.min(seq.len());
    let mut group = builder::make_sequence_like(&source, 0, capacity)?;
    iter::for_each_sequence(&seq, |element, _| {
        group.push(element);
        if group.len() == size {
            let next = builder::make_sequence_like(&source, 0, capacity)?;
            result.push(mem::replace(&mut group, next).into_value());
        }
        Ok(())
    })?;
    if !group.is_empty() {
        result.push(group.into_value());
    }
    Ok(result.into_value())
}

/// Drops zero values (`0`, `""`, `false`, nil).
pub fn compact(data: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let result = builder::make_sequence_like(&sequence_type(&seq), 0, seq.len())?;
    iter::for_each_sequence(&seq, |element, _| {
        if !element.is_zero() {
            result.push(element);
        }
        Ok(())
    })?;
    Ok(result.into_value())
}

/// Concatenates `values`: sequences are spread, bare elements appended. The
/// first sequence among them fixes the element type.
pub fn concat(values: &[Value]) -> RuntimeResult<Value> {
    guard::require_any_sequence("values", values)?;
    let Some(template) = values.iter().find_map(|value| value.as_sequence()) else {
        return Err(RuntimeError::wrong_shape("values must be slice"));
    };
    let elem_type = template.elem_type.clone();
    for value in values {
        match value.as_sequence() {
            Some(seq) => guard::require_same_type(
                "values",
                &sequence_type(&seq),
                "first slice",
                &sequence_type(&template),
            )?,
            None if elem_type.accepts(value) => {}
            None => {
                return Err(RuntimeError::type_mismatch(
                    "type of each value should be same with type of slice element",
                ))
            }
        }
    }

    let result = builder::make_sequence_of(elem_type, 0, 0);
    for value in values {
        match value.as_sequence() {
            Some(seq) => extend(&result, &seq)?,
            None => result.push(value.clone()),
        }
    }
    Ok(result.into_value())
}

/// Elements of `data` that appear in none of `others`.
pub fn difference(data: &Value, others: &[Value]) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let others = same_typed_sequences(&seq, others)?;
    let result = builder::make_sequence_like(&sequence_type(&seq), 0, seq.len())?;
    iter::for_each_sequence(&seq, |element, _| {
        if !others.iter().any(|other| other.contains(&element)) {
            result.push(element);
        }
        Ok(())
    })?;
    Ok(result.into_value())
}

/// Unique elements of `data` that appear in every one of `others`.
pub fn intersection(data: &Value, others: &[Value]) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let others = same_typed_sequences(&seq, others)?;
    let result = builder::make_sequence_like(&sequence_type(&seq), 0, 0)?;
    iter::for_each_sequence(&seq, |element, _| {
        if !result.contains(&element) && others.iter().all(|other| other.contains(&element)) {
            result.push(element);
        }
        Ok(())
    })?;
    Ok(result.into_value())
}

/// Unique elements across `data` and `others`, in first-seen order.
pub fn union(data: &Value, others: &[Value]) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let others = same_typed_sequences(&seq, others)?;
    let result = builder::make_sequence_like(&sequence_type(&seq), 0, seq.len())?;
    for source in std::iter::once(&seq).chain(others.iter()) {
        push_unique(&result, source)?;
    }
    Ok(result.into_value())
}

pub fn uniq(data: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let result = builder::make_sequence_like(&sequence_type(&seq), 0, seq.len())?;
    push_unique(&result, &seq)?;
    Ok(result.into_value())
}

/// `data` without any of the given bare `values`.
pub fn without(data: &Value, values: &[Value]) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let result = builder::make_sequence_like(&sequence_type(&seq), 0, seq.len())?;
    iter::for_each_sequence(&seq, |element, _| {
        if !values.contains(&element) {
            result.push(element);
        }
        Ok(())
    })?;
    Ok(result.into_value())
}

/// `data` without the elements of the same-typed sequence `values`. Returns
/// a new slice; `data` is left as is.
pub fn pull(data: &Value, values: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let removed = sequence_arg("values", values)?;
    guard::require_same_type(
        "data",
        &sequence_type(&seq),
        "values",
        &sequence_type(&removed),
    )?;
    without(data, &removed.snapshot())
}

pub fn drop(data: &Value, n: i64) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    guard::require_non_negative("n", n)?;
    let start = (n as usize).min(seq.len());
    copy_range(&seq, start, seq.len())
}

pub fn drop_right(data: &Value, n: i64) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    guard::require_non_negative("n", n)?;
    let end = seq.len().saturating_sub(n as usize);
    copy_range(&seq, 0, end)
}

pub fn take(data: &Value, n: i64) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    guard::require_non_negative("n", n)?;
    let end = (n as usize).min(seq.len());
    copy_range(&seq, 0, end)
}

pub fn take_right(data: &Value, n: i64) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    guard::require_non_negative("n", n)?;
    let start = seq.len().saturating_sub(n as usize);
    copy_range(&seq, start, seq.len())
}

/// All but the last element.
pub fn initial(data: &Value) -> RuntimeResult<Value> {
    drop_right(data, 1)
}

/// All but the first element.
pub fn tail(data: &Value) -> RuntimeResult<Value> {
    drop(data, 1)
}

pub fn first(data: &Value) -> RuntimeResult<Value> {
    nth(data, 0)
}

pub fn last(data: &Value) -> RuntimeResult<Value> {
    nth(data, -1)
}

/// Element at `index`; negative indexes count from the end. Out of range
/// yields nil.
pub fn nth(data: &Value, index: i64) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let len = seq.len() as i64;
    let resolved = if index < 0 { len + index } else { index };
    if resolved < 0 || resolved >= len {
        return Ok(Value::nil());
    }
    Ok(seq.get(resolved as usize).unwrap_or_else(Value::nil))
}

/// Fills `data[start..last]` with `value` in place and returns `data`
/// itself. `last` is clamped to the length. Nothing is written when a
/// precondition fails.
pub fn fill(data: &Value, value: &Value, start: i64, last: i64) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    guard::require_non_negative("start index", start)?;
    guard::require_non_negative("last index", last)?;
    guard::require_ordered("last index", last, "start index", start)?;
    if !seq.elem_type.accepts(value) {
        return Err(RuntimeError::type_mismatch(
            "type of value should be same with type of data element",
        ));
    }

    let end = (last as usize).min(seq.len());
    for index in (start as usize)..end {
        seq.set(index, value.clone());
    }
    Ok(data.clone())
}

pub fn index_of(data: &Value, value: &Value, from_index: i64) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    guard::require_non_negative("from index", from_index)?;
    let mut found = -1;
    iter::for_each_sequence_stoppable(&seq, |element, index| {
        if (index as i64) >= from_index && element == *value {
            found = index as i64;
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(Value::Int(found))
}

pub fn last_index_of(data: &Value, value: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let mut found = -1;
    iter::for_each_sequence(&seq, |element, index| {
        if element == *value {
            found = index as i64;
        }
        Ok(())
    })?;
    Ok(Value::Int(found))
}

/// Membership test over sequence elements, mapping values, or substrings.
pub fn includes(data: &Value, value: &Value) -> RuntimeResult<Value> {
    guard::require_non_nil("data", data)?;
    let shape = classify(data);
    let found = match (shape.category, data.deref_once()) {
        (Category::Sequence, Value::Slice(seq) | Value::Array(seq)) => seq.contains(value),
        (Category::Mapping, Value::Map(map)) => map.entries.borrow().values().any(|v| v == value),
        (Category::Scalar, Value::Str(text)) => match value.as_str() {
            Some(needle) => text.contains(needle),
            None => {
                return Err(RuntimeError::type_mismatch(
                    "type of value should be string when data is string",
                ))
            }
        },
        _ => {
            return Err(RuntimeError::wrong_shape(
                "data must be slice, map, or string",
            ))
        }
    };
    Ok(Value::Bool(found))
}

/// Joins the display form of each element with `separator`.
pub fn join(data: &Value, separator: &str) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let mut parts = Vec::with_capacity(seq.len());
    iter::for_each_sequence(&seq, |element, _| {
        parts.push(element.to_string());
        Ok(())
    })?;
    Ok(Value::Str(parts.join(separator)))
}

pub fn reverse(data: &Value) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    Ok(reversed(&seq)?.into_value())
}

/// Number of elements in a sequence or entries in a mapping.
pub fn size(data: &Value) -> RuntimeResult<Value> {
    guard::require_non_nil("data", data)?;
    let shape = classify(data);
    match shape.category {
        Category::Sequence | Category::Mapping => Ok(Value::Int(shape.len as i64)),
        _ => Err(RuntimeError::wrong_shape("data must be slice or map")),
    }
}

pub(crate) fn reversed(seq: &SliceValue) -> RuntimeResult<SliceValue> {
    let result = builder::make_sequence_like(&sequence_type(seq), 0, seq.len())?;
    let mut items = seq.snapshot();
    items.reverse();
    for item in items {
        result.push(item);
    }
    Ok(result)
}

fn copy_range(seq: &SliceValue, start: usize, end: usize) -> RuntimeResult<Value> {
    let result = builder::make_sequence_like(&sequence_type(seq), 0, end.saturating_sub(start))?;
    iter::for_each_sequence(seq, |element, index| {
        if (start..end).contains(&index) {
            result.push(element);
        }
        Ok(())
    })?;
    Ok(result.into_value())
}

fn extend(target: &SliceValue, source: &SliceValue) -> RuntimeResult<()> {
    iter::for_each_sequence(source, |element, _| {
        target.push(element);
        Ok(())
    })
}

fn push_unique(target: &SliceValue, source: &SliceValue) -> RuntimeResult<()> {
    iter::for_each_sequence(source, |element, _| {
        if !target.contains(&element) {
            target.push(element);
        }
        Ok(())
    })
}

fn same_typed_sequences(seq: &SliceValue, others: &[Value]) -> RuntimeResult<Vec<SliceValue>> {
    let expected = sequence_type(seq);
    others
        .iter()
        .map(|other| -> RuntimeResult<SliceValue> {
            let other = sequence_arg("others", other)?;
            guard::require_same_type("data", &expected, "others", &sequence_type(&other))?;
            Ok(other)
        })
        .collect()
}
