//! Fluent wrapper over [`crate::ops`].
//!
//! ```
//! use dynaseq::{Chain, Value};
//!
//! let chunks = Chain::from(Value::strings(&["a", "", "b", "c"]))
//!     .compact()
//!     .chunk(2)
//!     .result()
//!     .unwrap();
//! assert_eq!(chunks.to_string(), "[[a b] [c]]");
//! ```

use crate::ops;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::Value;
use miette::Diagnostic;
use rand::Rng;
use thiserror::Error;
use tracing::trace;

#[derive(Clone, Debug, Error, Diagnostic, PartialEq)]
#[error("{operation}: {source}")]
#[diagnostic(code(dynaseq::chain))]
pub struct ChainError {
    pub operation: &'static str,
    #[source]
    pub source: RuntimeError,
}

/// Applies operations in sequence. After the first failure the remaining
/// steps are skipped and the failing step's name is kept.
#[derive(Clone, Debug)]
pub struct Chain {
    state: RuntimeResult<Value>,
    last_operation: Option<&'static str>,
}

impl From<Value> for Chain {
    fn from(value: Value) -> Self {
        Self {
            state: Ok(value),
            last_operation: None,
        }
    }
}

impl Chain {
    /// Name of the last operation attempted.
    pub fn last_operation(&self) -> Option<&'static str> {
        self.last_operation
    }

    pub fn result(self) -> Result<Value, ChainError> {
        self.state.map_err(|source| ChainError {
            operation: self.last_operation.unwrap_or("from"),
            source,
        })
    }

    fn apply(
        mut self,
        operation: &'static str,
        step: impl FnOnce(&Value) -> RuntimeResult<Value>,
    ) -> Self {
        if let Ok(value) = &self.state {
            trace!(operation, input = %value.type_name(), "applying chain step");
            self.last_operation = Some(operation);
            self.state = step(value);
        }
        self
    }

    pub fn chunk(self, size: i64) -> Self {
        self.apply("chunk", |data| ops::chunk(data, size))
    }

    pub fn compact(self) -> Self {
        self.apply("compact", ops::compact)
    }

    pub fn concat(self, others: &[Value]) -> Self {
        self.apply("concat", |data| {
            let mut values = Vec::with_capacity(others.len() + 1);
            values.push(data.clone());
            values.extend_from_slice(others);
            ops::concat(&values)
        })
    }

    pub fn difference(self, others: &[Value]) -> Self {
        self.apply("difference", |data| ops::difference(data, others))
    }

    pub fn intersection(self, others: &[Value]) -> Self {
        self.apply("intersection", |data| ops::intersection(data, others))
    }

    pub fn union(self, others: &[Value]) -> Self {
        self.apply("union", |data| ops::union(data, others))
    }

    pub fn uniq(self) -> Self {
        self.apply("uniq", ops::uniq)
    }

    pub fn without(self, values: &[Value]) -> Self {
        self.apply("without", |data| ops::without(data, values))
    }

    pub fn pull(self, values: &Value) -> Self {
        self.apply("pull", |data| ops::pull(data, values))
    }

    pub fn drop(self, n: i64) -> Self {
        self.apply("drop", |data| ops::drop(data, n))
    }

    pub fn drop_right(self, n: i64) -> Self {
        self.apply("drop_right", |data| ops::drop_right(data, n))
    }

    pub fn take(self, n: i64) -> Self {
        self.apply("take", |data| ops::take(data, n))
    }

    pub fn take_right(self, n: i64) -> Self {
        self.apply("take_right", |data| ops::take_right(data, n))
    }

    pub fn initial(self) -> Self {
        self.apply("initial", ops::initial)
    }

    pub fn tail(self) -> Self {
        self.apply("tail", ops::tail)
    }

    pub fn reverse(self) -> Self {
        self.apply("reverse", ops::reverse)
    }

    /// In place: the chained container itself is modified.
    pub fn fill(self, value: &Value, start: i64, last: i64) -> Self {
        self.apply("fill", |data| ops::fill(data, value, start, last))
    }

    pub fn filter(self, callback: &Value) -> Self {
        self.apply("filter", |data| ops::filter(data, callback))
    }

    pub fn reject(self, callback: &Value) -> Self {
        self.apply("reject", |data| ops::reject(data, callback))
    }

    pub fn map(self, callback: &Value) -> Self {
        self.apply("map", |data| ops::map(data, callback))
    }

    pub fn map_values(self, callback: &Value) -> Self {
        self.apply("map_values", |data| ops::map_values(data, callback))
    }

    pub fn group_by(self, callback: &Value) -> Self {
        self.apply("group_by", |data| ops::group_by(data, callback))
    }

    pub fn key_by(self, callback: &Value) -> Self {
        self.apply("key_by", |data| ops::key_by(data, callback))
    }

    pub fn count_by(self, callback: &Value) -> Self {
        self.apply("count_by", |data| ops::count_by(data, callback))
    }

    pub fn shuffle<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        self.apply("shuffle", |data| ops::shuffle(data, rng))
    }

    pub fn each(self, callback: &Value) -> Self {
        self.apply("each", |data| ops::each(data, callback).map(|_| data.clone()))
    }

    pub fn find(self, callback: &Value, from_index: i64) -> Self {
        self.apply("find", |data| ops::find(data, callback, from_index))
    }

    pub fn find_index(self, callback: &Value, from_index: i64) -> Self {
        self.apply("find_index", |data| ops::find_index(data, callback, from_index))
    }

    pub fn reduce(self, callback: &Value, initial: &Value) -> Self {
        self.apply("reduce", |data| ops::reduce(data, callback, initial))
    }

    pub fn join(self, separator: &str) -> Self {
        self.apply("join", |data| ops::join(data, separator))
    }

    pub fn size(self) -> Self {
        self.apply("size", ops::size)
    }

    pub fn first(self) -> Self {
        self.apply("first", ops::first)
    }

    pub fn last(self) -> Self {
        self.apply("last", ops::last)
    }

    pub fn to_pairs(self) -> Self {
        self.apply("to_pairs", ops::to_pairs)
    }

    pub fn from_pairs(self) -> Self {
        self.apply("from_pairs", ops::from_pairs)
    }
}
