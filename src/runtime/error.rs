use miette::Diagnostic;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Failures raised by guards, callback validation, container building and
/// dynamic calls. The display text is the exact message shown to callers.
#[derive(Clone, Debug, Error, Diagnostic, PartialEq)]
pub enum RuntimeError {
    #[error("{label} cannot be nil")]
    #[diagnostic(code(dynaseq::nil_input))]
    NilInput { label: String },
    #[error("{message}")]
    #[diagnostic(code(dynaseq::wrong_shape))]
    WrongShape { message: String },
    #[error("{message}")]
    #[diagnostic(
        code(dynaseq::callback_arity),
        help("callbacks take the element, optionally followed by its index or key")
    )]
    CallbackArity { message: String },
    #[error("{message}")]
    #[diagnostic(code(dynaseq::callback_param_type))]
    CallbackParamType { message: String },
    #[error("{message}")]
    #[diagnostic(code(dynaseq::callback_return_shape))]
    CallbackReturnShape { message: String },
    #[error("{message}")]
    #[diagnostic(code(dynaseq::range))]
    Range { message: String },
    #[error("{message}")]
    #[diagnostic(code(dynaseq::type_mismatch))]
    TypeMismatch { message: String },
    #[error("{message}")]
    #[diagnostic(
        code(dynaseq::runtime_fault),
        help("raised while calling a callback or converting a dynamic value")
    )]
    RuntimeFault { message: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NilInput,
    WrongShape,
    CallbackArity,
    CallbackParamType,
    CallbackReturnShape,
    Range,
    TypeMismatch,
    RuntimeFault,
}

impl RuntimeError {
    pub fn nil_input(label: impl Into<String>) -> Self {
        RuntimeError::NilInput {
            label: label.into(),
        }
    }

    pub fn wrong_shape(message: impl Into<String>) -> Self {
        RuntimeError::WrongShape {
            message: message.into(),
        }
    }

    pub fn range(message: impl Into<String>) -> Self {
        RuntimeError::Range {
            message: message.into(),
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        RuntimeError::TypeMismatch {
            message: message.into(),
        }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        RuntimeError::RuntimeFault {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::NilInput { .. } => ErrorKind::NilInput,
            RuntimeError::WrongShape { .. } => ErrorKind::WrongShape,
            RuntimeError::CallbackArity { .. } => ErrorKind::CallbackArity,
            RuntimeError::CallbackParamType { .. } => ErrorKind::CallbackParamType,
            RuntimeError::CallbackReturnShape { .. } => ErrorKind::CallbackReturnShape,
            RuntimeError::Range { .. } => ErrorKind::Range,
            RuntimeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            RuntimeError::RuntimeFault { .. } => ErrorKind::RuntimeFault,
        }
    }
}
