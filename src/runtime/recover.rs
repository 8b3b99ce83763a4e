//! Turns panics raised inside dynamic calls into `RuntimeFault` failures.

use crate::runtime::error::{RuntimeError, RuntimeResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Runs `operation`, converting a panic inside it into a `RuntimeFault`.
///
/// Recovery needs unwinding; a `panic = "abort"` profile turns these faults
/// back into process aborts.
pub fn scoped_recover<T>(operation: impl FnOnce() -> RuntimeResult<T>) -> RuntimeResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(operation)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            debug!(%message, "recovered panic inside dynamic call");
            Err(RuntimeError::fault(message))
        }
    }
}

/// Like [`scoped_recover`], but lets the caller rewrite the text of any
/// `RuntimeFault` coming out of `operation`, recovered or returned.
pub fn scoped_recover_with<T>(
    operation: impl FnOnce() -> RuntimeResult<T>,
    rewrite: impl FnOnce(&str) -> String,
) -> RuntimeResult<T> {
    scoped_recover(operation).map_err(|err| match err {
        RuntimeError::RuntimeFault { message } => RuntimeError::fault(rewrite(&message)),
        other => other,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".into()
    }
}
