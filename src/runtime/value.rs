use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::recover;
use crate::types::{Signature, TypeExpr, TypeParseError};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug)]
pub enum Value {
    /// Literal nil (`None`) or a nil handle of a nillable type.
    Nil(Option<TypeExpr>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Slice(SliceValue),
    Array(SliceValue),
    Map(MapValue),
    Func(FuncValue),
    Pointer(ReferenceValue),
}

impl Value {
    pub fn nil() -> Self {
        Value::Nil(None)
    }

    pub fn typed_nil(ty: TypeExpr) -> Self {
        Value::Nil(Some(ty))
    }

    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn slice(elem_type: TypeExpr, items: Vec<Value>) -> Self {
        Value::Slice(SliceValue::from_vec(items, elem_type))
    }

    pub fn array(elem_type: TypeExpr, items: Vec<Value>) -> Self {
        Value::Array(SliceValue::from_vec(items, elem_type))
    }

    pub fn strings<S: AsRef<str>>(items: &[S]) -> Self {
        let items = items.iter().map(|item| Value::str(item.as_ref())).collect();
        Value::slice(TypeExpr::Str, items)
    }

    pub fn ints(items: &[i64]) -> Self {
        Value::slice(TypeExpr::Int, items.iter().copied().map(Value::Int).collect())
    }

    pub fn pointer_to(value: Value) -> Self {
        Value::Pointer(ReferenceValue::new(value))
    }

    pub fn func(
        signature: &str,
        body: impl Fn(&[Value]) -> Vec<Value> + 'static,
    ) -> Result<Self, TypeParseError> {
        Ok(Value::Func(FuncValue::new(Signature::parse(signature)?, body)))
    }

    /// Concrete type of the value; `None` only for a literal nil.
    pub fn ty(&self) -> Option<TypeExpr> {
        match self {
            Value::Nil(ty) => ty.clone(),
            Value::Int(_) => Some(TypeExpr::Int),
            Value::Float(_) => Some(TypeExpr::Float),
            Value::Bool(_) => Some(TypeExpr::Bool),
            Value::Str(_) => Some(TypeExpr::Str),
            Value::Slice(slice) => Some(TypeExpr::slice_of(slice.elem_type.clone())),
            Value::Array(array) => Some(TypeExpr::array_of(array.len(), array.elem_type.clone())),
            Value::Map(map) => Some(TypeExpr::map_of(
                map.key_type.clone(),
                map.value_type.clone(),
            )),
            Value::Func(func) => Some(TypeExpr::Func(func.signature.clone())),
            Value::Pointer(reference) => Some(TypeExpr::pointer_to(reference.pointee.clone())),
        }
    }

    pub fn type_name(&self) -> String {
        self.ty()
            .map(|ty| ty.canonical_name())
            .unwrap_or_else(|| "nil".into())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Nil(_) => true,
            Value::Int(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Bool(v) => !*v,
            Value::Str(v) => v.is_empty(),
            Value::Slice(_) | Value::Array(_) | Value::Map(_) | Value::Func(_) | Value::Pointer(_) => {
                false
            }
        }
    }

    /// Follows one level of pointer indirection.
    pub fn deref_once(&self) -> Value {
        match self {
            Value::Pointer(reference) => reference.get(),
            other => other.clone(),
        }
    }

    pub fn as_sequence(&self) -> Option<SliceValue> {
        match self.deref_once() {
            Value::Slice(slice) | Value::Array(slice) => Some(slice),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<MapValue> {
        match self.deref_once() {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<FuncValue> {
        match self.deref_once() {
            Value::Func(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Checked conversion of a dynamically produced value.
    pub fn expect_bool(&self) -> RuntimeResult<bool> {
        self.as_bool().ok_or_else(|| {
            RuntimeError::fault(format!(
                "interface conversion: interface {{}} is {}, not bool",
                self.type_name()
            ))
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil(_), Value::Nil(_)) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Slice(a), Value::Slice(b)) | (Value::Array(a), Value::Array(b)) => {
                a.elem_type == b.elem_type && *a.items.borrow() == *b.items.borrow()
            }
            (Value::Map(a), Value::Map(b)) => {
                a.key_type == b.key_type
                    && a.value_type == b.value_type
                    && *a.entries.borrow() == *b.entries.borrow()
            }
            (Value::Func(a), Value::Func(b)) => Rc::ptr_eq(&a.body, &b.body),
            (Value::Pointer(a), Value::Pointer(b)) => Rc::ptr_eq(&a.cell, &b.cell),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil(_) => write!(f, "nil"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::Slice(slice) | Value::Array(slice) => {
                write!(f, "[")?;
                for (idx, value) in slice.items.borrow().iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "map[")?;
                let mut first = true;
                for (key, value) in map.entries.borrow().iter() {
                    if !first {
                        write!(f, " ")?;
                    }
                    first = false;
                    write!(f, "{key}:{value}")?;
                }
                write!(f, "]")
            }
            Value::Func(func) => write!(f, "{}", func.signature),
            Value::Pointer(reference) => write!(f, "&{}", reference.cell.borrow()),
        }
    }
}

/// Backing store shared by slices and fixed-size arrays.
#[derive(Clone, Debug)]
pub struct SliceValue {
    pub items: Rc<RefCell<Vec<Value>>>,
    pub elem_type: TypeExpr,
}

impl SliceValue {
    pub fn new(elem_type: TypeExpr) -> Self {
        Self::from_vec(Vec::new(), elem_type)
    }

    pub fn with_capacity(elem_type: TypeExpr, capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity), elem_type)
    }

    pub fn from_vec(items: Vec<Value>, elem_type: TypeExpr) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
            elem_type,
        }
    }

    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    /// Appends a dynamically produced value after checking it against the element type.
    pub fn try_push(&self, value: Value) -> RuntimeResult<()> {
        if !self.elem_type.accepts(&value) {
            return Err(RuntimeError::fault(format!(
                "reflect.Set: value of type {} is not assignable to type {}",
                value.type_name(),
                self.elem_type
            )));
        }
        self.push(value);
        Ok(())
    }

    pub fn set(&self, index: usize, value: Value) {
        if let Some(slot) = self.items.borrow_mut().get_mut(index) {
            *slot = value;
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.borrow().capacity()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.borrow().iter().any(|item| item == value)
    }

    pub fn into_value(self) -> Value {
        Value::Slice(self)
    }
}

/// Hashable projection of a value used as a mapping key.
#[derive(Clone, Debug)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl MapKey {
    pub fn from_value(value: &Value) -> RuntimeResult<MapKey> {
        match value {
            Value::Bool(v) => Ok(MapKey::Bool(*v)),
            Value::Int(v) => Ok(MapKey::Int(*v)),
            // -0.0 and 0.0 are one key, matching `==` on values.
            Value::Float(v) if *v == 0.0 => Ok(MapKey::Float(0.0)),
            Value::Float(v) => Ok(MapKey::Float(*v)),
            Value::Str(v) => Ok(MapKey::Str(v.clone())),
            other => Err(RuntimeError::fault(format!(
                "runtime error: hash of unhashable type {}",
                other.type_name()
            ))),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Bool(v) => Value::Bool(*v),
            MapKey::Int(v) => Value::Int(*v),
            MapKey::Float(v) => Value::Float(*v),
            MapKey::Str(v) => Value::Str(v.clone()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            MapKey::Bool(_) => 0,
            MapKey::Int(_) => 1,
            MapKey::Float(_) => 2,
            MapKey::Str(_) => 3,
        }
    }
}

impl Ord for MapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MapKey::Bool(a), MapKey::Bool(b)) => a.cmp(b),
            (MapKey::Int(a), MapKey::Int(b)) => a.cmp(b),
            (MapKey::Float(a), MapKey::Float(b)) => a.total_cmp(b),
            (MapKey::Str(a), MapKey::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for MapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MapKey {}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[derive(Clone, Debug)]
pub struct MapValue {
    pub entries: Rc<RefCell<BTreeMap<MapKey, Value>>>,
    pub key_type: TypeExpr,
    pub value_type: TypeExpr,
}

impl MapValue {
    pub fn new(key_type: TypeExpr, value_type: TypeExpr) -> Self {
        Self {
            entries: Rc::new(RefCell::new(BTreeMap::new())),
            key_type,
            value_type,
        }
    }

    pub fn insert(&self, key: MapKey, value: Value) {
        self.entries.borrow_mut().insert(key, value);
    }

    /// Inserts a dynamically typed key, hashing it first.
    pub fn insert_value(&self, key: &Value, value: Value) -> RuntimeResult<()> {
        let key = MapKey::from_value(key)?;
        self.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &MapKey) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Keys in storage order, captured once for the mapping iterators.
    pub fn keys(&self) -> Vec<MapKey> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn into_value(self) -> Value {
        Value::Map(self)
    }
}

type NativeBody = dyn Fn(&[Value]) -> Vec<Value>;

/// A caller-supplied function together with its declared signature.
#[derive(Clone)]
pub struct FuncValue {
    pub signature: Signature,
    body: Rc<NativeBody>,
}

impl FuncValue {
    pub fn new(signature: Signature, body: impl Fn(&[Value]) -> Vec<Value> + 'static) -> Self {
        Self {
            signature,
            body: Rc::new(body),
        }
    }

    /// Invokes the function after checking the arguments against its
    /// signature; panics in the body and results that disagree with the
    /// declared return types come back as `RuntimeFault`.
    pub fn call(&self, args: &[Value]) -> RuntimeResult<Vec<Value>> {
        let params = &self.signature.params;
        match args.len().cmp(&params.len()) {
            Ordering::Less => {
                return Err(RuntimeError::fault(
                    "reflect: Call with too few input arguments",
                ))
            }
            Ordering::Greater => {
                return Err(RuntimeError::fault(
                    "reflect: Call with too many input arguments",
                ))
            }
            Ordering::Equal => {}
        }
        for (arg, param) in args.iter().zip(params) {
            if !param.accepts(arg) {
                return Err(RuntimeError::fault(format!(
                    "reflect: Call using {} as type {}",
                    arg.type_name(),
                    param
                )));
            }
        }

        let body = Rc::clone(&self.body);
        let outputs = recover::scoped_recover(|| Ok(body(args)))?;

        let returns = &self.signature.returns;
        if outputs.len() != returns.len() {
            return Err(RuntimeError::fault(format!(
                "reflect: function returned {} values, signature declares {}",
                outputs.len(),
                returns.len()
            )));
        }
        for (output, ty) in outputs.iter().zip(returns) {
            if !ty.accepts(output) {
                return Err(RuntimeError::fault(format!(
                    "reflect: function returned {} for result of type {}",
                    output.type_name(),
                    ty
                )));
            }
        }
        Ok(outputs)
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncValue")
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct ReferenceValue {
    pub cell: Rc<RefCell<Value>>,
    pub pointee: TypeExpr,
}

impl ReferenceValue {
    pub fn new(value: Value) -> Self {
        let pointee = value.ty().unwrap_or(TypeExpr::Any);
        Self {
            cell: Rc::new(RefCell::new(value)),
            pointee,
        }
    }

    pub fn get(&self) -> Value {
        self.cell.borrow().clone()
    }
}
