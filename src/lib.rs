//! Collection operations over runtime-typed values.
//!
//! Containers, elements and callbacks carry their types at runtime. Every
//! operation checks its inputs and callback signatures first and reports a
//! violation as a [`RuntimeError`] instead of panicking; a panic raised
//! inside a callback comes back as a `RuntimeFault`.

pub mod chain;
pub mod diagnostics;
pub mod ops;
pub mod runtime;
pub mod types;

pub use chain::{Chain, ChainError};
pub use runtime::{Category, ErrorKind, RuntimeError, RuntimeResult, Shape, Value};
pub use types::{Signature, TypeExpr, TypeParseError};

#[cfg(test)]
mod tests;
