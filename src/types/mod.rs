mod parse;

pub use parse::TypeParseError;

use crate::runtime::value::{SliceValue, Value};
use std::fmt;

/// Concrete runtime type of a value, a container element, or a callback slot.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    Int,
    Float,
    Bool,
    Str,
    Any,
    Slice(Box<TypeExpr>),
    Array { size: usize, ty: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Pointer(Box<TypeExpr>),
    Func(Signature),
}

/// Ordered parameter and return types of a function value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signature {
    pub params: Vec<TypeExpr>,
    pub returns: Vec<TypeExpr>,
}

impl Signature {
    pub fn new(params: Vec<TypeExpr>, returns: Vec<TypeExpr>) -> Self {
        Self { params, returns }
    }

    pub fn parse(input: &str) -> Result<Signature, TypeParseError> {
        match input.parse::<TypeExpr>()? {
            TypeExpr::Func(signature) => Ok(signature),
            other => Err(TypeParseError::not_a_function(input, &other)),
        }
    }
}

impl TypeExpr {
    pub fn slice_of(elem: TypeExpr) -> Self {
        TypeExpr::Slice(Box::new(elem))
    }

    pub fn array_of(size: usize, elem: TypeExpr) -> Self {
        TypeExpr::Array {
            size,
            ty: Box::new(elem),
        }
    }

    pub fn map_of(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn pointer_to(ty: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(ty))
    }

    /// Element type of a slice or array type.
    pub fn element(&self) -> Option<&TypeExpr> {
        match self {
            TypeExpr::Slice(elem) => Some(elem),
            TypeExpr::Array { ty, .. } => Some(ty),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, TypeExpr::Slice(_) | TypeExpr::Array { .. })
    }

    /// Types that have a nil value of their own.
    pub fn is_nillable(&self) -> bool {
        matches!(
            self,
            TypeExpr::Slice(_)
                | TypeExpr::Map { .. }
                | TypeExpr::Pointer(_)
                | TypeExpr::Func(_)
                | TypeExpr::Any
        )
    }

    /// Whether values of this type may be used as mapping keys. `any` passes
    /// here and is re-checked against each concrete key value.
    pub fn is_hashable(&self) -> bool {
        matches!(
            self,
            TypeExpr::Int | TypeExpr::Float | TypeExpr::Bool | TypeExpr::Str | TypeExpr::Any
        )
    }

    pub fn accepts(&self, value: &Value) -> bool {
        if matches!(self, TypeExpr::Any) {
            return true;
        }
        match value.ty() {
            Some(ty) => ty == *self,
            None => self.is_nillable(),
        }
    }

    pub fn zero_value(&self) -> Value {
        match self {
            TypeExpr::Int => Value::Int(0),
            TypeExpr::Float => Value::Float(0.0),
            TypeExpr::Bool => Value::Bool(false),
            TypeExpr::Str => Value::Str(String::new()),
            TypeExpr::Any => Value::Nil(None),
            TypeExpr::Array { size, ty } => {
                let items = (0..*size).map(|_| ty.zero_value()).collect();
                Value::Array(SliceValue::from_vec(items, (**ty).clone()))
            }
            TypeExpr::Slice(_) | TypeExpr::Map { .. } | TypeExpr::Pointer(_) | TypeExpr::Func(_) => {
                Value::Nil(Some(self.clone()))
            }
        }
    }

    pub fn canonical_name(&self) -> String {
        match self {
            TypeExpr::Int => "int".into(),
            TypeExpr::Float => "float64".into(),
            TypeExpr::Bool => "bool".into(),
            TypeExpr::Str => "string".into(),
            TypeExpr::Any => "any".into(),
            TypeExpr::Slice(inner) => format!("[]{}", inner.canonical_name()),
            TypeExpr::Array { size, ty } => format!("[{}]{}", size, ty.canonical_name()),
            TypeExpr::Map { key, value } => {
                format!("map[{}]{}", key.canonical_name(), value.canonical_name())
            }
            TypeExpr::Pointer(inner) => format!("*{}", inner.canonical_name()),
            TypeExpr::Func(signature) => {
                let params: Vec<String> =
                    signature.params.iter().map(|ty| ty.canonical_name()).collect();
                let rendered = format!("func({})", params.join(", "));
                match signature.returns.as_slice() {
                    [] => rendered,
                    [single] => format!("{} {}", rendered, single.canonical_name()),
                    many => {
                        let returns: Vec<String> =
                            many.iter().map(|ty| ty.canonical_name()).collect();
                        format!("{} ({})", rendered, returns.join(", "))
                    }
                }
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TypeExpr::Func(self.clone()))
    }
}
