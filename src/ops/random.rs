//! Random selection. The source of randomness is always passed in; seed a
//! `StdRng` for reproducible results.

use super::{sequence_arg, sequence_type};
use crate::runtime::builder;
use crate::runtime::error::RuntimeResult;
use crate::runtime::guard;
use crate::runtime::value::Value;
use rand::seq::SliceRandom;
use rand::Rng;

pub fn shuffle<R: Rng + ?Sized>(data: &Value, rng: &mut R) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    let mut items = seq.snapshot();
    items.shuffle(rng);
    let result = builder::make_sequence_like(&sequence_type(&seq), 0, items.len())?;
    for item in items {
        result.push(item);
    }
    Ok(result.into_value())
}

/// One random element, or nil for an empty sequence.
pub fn sample<R: Rng + ?Sized>(data: &Value, rng: &mut R) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    Ok(seq.snapshot().choose(rng).cloned().unwrap_or_else(Value::nil))
}

/// Up to `n` distinct positions drawn at random, in random order.
pub fn sample_size<R: Rng + ?Sized>(data: &Value, n: i64, rng: &mut R) -> RuntimeResult<Value> {
    let seq = sequence_arg("data", data)?;
    guard::require_non_negative("n", n)?;
    let items = seq.snapshot();
    let amount = (n as usize).min(items.len());
    let result = builder::make_sequence_like(&sequence_type(&seq), 0, amount)?;
    for item in items.choose_multiple(rng, amount) {
        result.push(item.clone());
    }
    Ok(result.into_value())
}
