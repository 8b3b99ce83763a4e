//! Shape checks for caller-supplied callbacks.
//!
//! Every operation that takes a predicate, mapper or reducer validates it
//! here before the first call, so the rules and their wording are shared.
//! A validated callback is turned into a [`Callback`] or [`Reducer`] and
//! dispatched without further shape checks.

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::value::{FuncValue, MapKey, Value};
use crate::types::TypeExpr;

/// What a callback must return for a given operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnContract {
    Nothing,
    Bool,
    Single,
    /// A bool, optionally followed by one value of any type.
    BoolThenAny,
}

impl ReturnContract {
    fn allows(self, returns: &[TypeExpr]) -> bool {
        match self {
            ReturnContract::Nothing => returns.is_empty(),
            ReturnContract::Bool => matches!(returns, [TypeExpr::Bool]),
            ReturnContract::Single => returns.len() == 1,
            ReturnContract::BoolThenAny => matches!(returns, [TypeExpr::Bool] | [TypeExpr::Bool, _]),
        }
    }

    fn violation(self) -> &'static str {
        match self {
            ReturnContract::Nothing => "callback should not have return value",
            ReturnContract::Bool => "callback return value should be one variable with bool type",
            ReturnContract::Single => "callback return value should be one variable",
            ReturnContract::BoolThenAny => {
                "callback return value should be bool type, optionally followed by one more value"
            }
        }
    }
}

/// A callback whose parameters have been checked against its collection.
#[derive(Clone, Debug)]
pub enum Callback {
    /// `func(element)`
    Unary(FuncValue),
    /// `func(element, index)` or `func(value, key)`
    Binary(FuncValue),
}

impl Callback {
    pub fn func(&self) -> &FuncValue {
        match self {
            Callback::Unary(func) | Callback::Binary(func) => func,
        }
    }

    pub fn returns(&self) -> &[TypeExpr] {
        &self.func().signature.returns
    }

    pub fn call_indexed(&self, element: Value, index: usize) -> RuntimeResult<Vec<Value>> {
        match self {
            Callback::Unary(func) => func.call(&[element]),
            Callback::Binary(func) => func.call(&[element, Value::Int(index as i64)]),
        }
    }

    pub fn call_keyed(&self, value: Value, key: &MapKey) -> RuntimeResult<Vec<Value>> {
        match self {
            Callback::Unary(func) => func.call(&[value]),
            Callback::Binary(func) => func.call(&[value, key.to_value()]),
        }
    }

    pub fn predicate(&self, element: Value, index: usize) -> RuntimeResult<bool> {
        let outputs = self.call_indexed(element, index)?;
        first_output(outputs)?.expect_bool()
    }

    pub fn mapped(&self, element: Value, index: usize) -> RuntimeResult<Value> {
        first_output(self.call_indexed(element, index)?)
    }

    pub fn predicate_keyed(&self, value: Value, key: &MapKey) -> RuntimeResult<bool> {
        first_output(self.call_keyed(value, key)?)?.expect_bool()
    }

    pub fn mapped_keyed(&self, value: Value, key: &MapKey) -> RuntimeResult<Value> {
        first_output(self.call_keyed(value, key)?)
    }
}

/// A reducer whose accumulator, element and optional index slots have been checked.
#[derive(Clone, Debug)]
pub enum Reducer {
    /// `func(accumulator, element) accumulator`
    Pair(FuncValue),
    /// `func(accumulator, element, index) accumulator`
    Indexed(FuncValue),
}

impl Reducer {
    pub fn step(&self, accumulator: Value, element: Value, index: usize) -> RuntimeResult<Value> {
        let outputs = match self {
            Reducer::Pair(func) => func.call(&[accumulator, element])?,
            Reducer::Indexed(func) => {
                func.call(&[accumulator, element, Value::Int(index as i64)])?
            }
        };
        first_output(outputs)
    }
}

fn first_output(outputs: Vec<Value>) -> RuntimeResult<Value> {
    outputs
        .into_iter()
        .next()
        .ok_or_else(|| RuntimeError::fault("reflect: callback returned no value"))
}

fn arity_error() -> RuntimeError {
    RuntimeError::CallbackArity {
        message: "callback must only have one or two parameters".into(),
    }
}

fn param_error(message: &str) -> RuntimeError {
    RuntimeError::CallbackParamType {
        message: message.into(),
    }
}

/// Checks a callback applied to sequence elements: `func(T)` or `func(T, int)`.
pub fn validate_for_sequence(callback: &FuncValue, element_type: &TypeExpr) -> RuntimeResult<Callback> {
    let params = &callback.signature.params;
    if !(1..=2).contains(&params.len()) {
        return Err(arity_error());
    }
    if params[0] != *element_type {
        return Err(param_error(
            "callback 1st parameter's data type should be same with slice element data type",
        ));
    }
    if params.len() == 1 {
        return Ok(Callback::Unary(callback.clone()));
    }
    if params[1] != TypeExpr::Int {
        return Err(param_error("callback 2nd parameter's data type should be int"));
    }
    Ok(Callback::Binary(callback.clone()))
}

/// Checks a callback applied to mapping entries: `func(V)` or `func(V, K)`.
pub fn validate_for_mapping(
    callback: &FuncValue,
    key_type: &TypeExpr,
    value_type: &TypeExpr,
) -> RuntimeResult<Callback> {
    let params = &callback.signature.params;
    if !(1..=2).contains(&params.len()) {
        return Err(arity_error());
    }
    if params[0] != *value_type {
        return Err(param_error(
            "callback 1st parameter's data type should be same with map value data type",
        ));
    }
    if params.len() == 1 {
        return Ok(Callback::Unary(callback.clone()));
    }
    if params[1] != *key_type {
        return Err(param_error(
            "callback 2nd parameter's data type should be same with map key data type",
        ));
    }
    Ok(Callback::Binary(callback.clone()))
}

pub fn validate_returns(callback: &FuncValue, contract: ReturnContract) -> RuntimeResult<()> {
    if !contract.allows(&callback.signature.returns) {
        return Err(RuntimeError::CallbackReturnShape {
            message: contract.violation().into(),
        });
    }
    Ok(())
}

/// Checks a reducer: `func(A, T) A` or `func(A, T, int) A`.
pub fn validate_reducer(
    callback: &FuncValue,
    accumulator_type: &TypeExpr,
    element_type: &TypeExpr,
) -> RuntimeResult<Reducer> {
    let params = &callback.signature.params;
    if !(2..=3).contains(&params.len()) {
        return Err(RuntimeError::CallbackArity {
            message: "callback must only have two or three parameters".into(),
        });
    }
    if params[0] != *accumulator_type {
        return Err(param_error(
            "callback 1st parameter's data type should be same with initial value data type",
        ));
    }
    if params[1] != *element_type {
        return Err(param_error(
            "callback 2nd parameter's data type should be same with slice element data type",
        ));
    }
    if params.len() == 3 && params[2] != TypeExpr::Int {
        return Err(param_error("callback 3rd parameter's data type should be int"));
    }
    if !matches!(callback.signature.returns.as_slice(), [ret] if ret == accumulator_type) {
        return Err(RuntimeError::CallbackReturnShape {
            message: "callback return value should be one variable with same type as initial value"
                .into(),
        });
    }
    Ok(if params.len() == 2 {
        Reducer::Pair(callback.clone())
    } else {
        Reducer::Indexed(callback.clone())
    })
}
