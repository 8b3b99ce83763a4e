pub mod builder;
pub mod callback;
pub mod error;
pub mod guard;
pub mod inspect;
pub mod iter;
pub mod recover;
pub mod value;

pub use error::{ErrorKind, RuntimeError, RuntimeResult};
pub use inspect::{classify, Category, ElementShape, Shape};
pub use value::{FuncValue, MapKey, MapValue, ReferenceValue, SliceValue, Value};

#[cfg(test)]
mod tests;
