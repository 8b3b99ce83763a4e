use crate::runtime::value::Value;
use crate::types::TypeExpr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Sequence,
    Mapping,
    Function,
    Scalar,
    Nil,
    /// A pointer left over after the one permitted dereference.
    Pointer,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElementShape {
    None,
    Element(TypeExpr),
    Entry { key: TypeExpr, value: TypeExpr },
    Signature {
        params: Vec<TypeExpr>,
        returns: Vec<TypeExpr>,
    },
}

/// Result of classifying a value. Derived fresh on every call.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub category: Category,
    pub ty: Option<TypeExpr>,
    pub element: ElementShape,
    pub len: usize,
}

impl Shape {
    fn nil() -> Self {
        Self {
            category: Category::Nil,
            ty: None,
            element: ElementShape::None,
            len: 0,
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.category == Category::Sequence
    }

    pub fn is_mapping(&self) -> bool {
        self.category == Category::Mapping
    }

    pub fn is_function(&self) -> bool {
        self.category == Category::Function
    }

    pub fn is_fixed_size(&self) -> bool {
        matches!(self.ty, Some(TypeExpr::Array { .. }))
    }

    /// Element type of a sequence, or value type of a mapping.
    pub fn element_type(&self) -> Option<&TypeExpr> {
        match &self.element {
            ElementShape::Element(ty) => Some(ty),
            ElementShape::Entry { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn key_type(&self) -> Option<&TypeExpr> {
        match &self.element {
            ElementShape::Entry { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Reports the structural category, concrete type and length of `value`.
/// A pointer is dereferenced once before classification.
pub fn classify(value: &Value) -> Shape {
    match value {
        Value::Pointer(reference) => classify_direct(&reference.get()),
        other => classify_direct(other),
    }
}

fn classify_direct(value: &Value) -> Shape {
    match value {
        Value::Nil(_) => Shape::nil(),
        Value::Slice(slice) | Value::Array(slice) => Shape {
            category: Category::Sequence,
            ty: value.ty(),
            element: ElementShape::Element(slice.elem_type.clone()),
            len: slice.len(),
        },
        Value::Map(map) => Shape {
            category: Category::Mapping,
            ty: value.ty(),
            element: ElementShape::Entry {
                key: map.key_type.clone(),
                value: map.value_type.clone(),
            },
            len: map.len(),
        },
        Value::Func(func) => Shape {
            category: Category::Function,
            ty: value.ty(),
            element: ElementShape::Signature {
                params: func.signature.params.clone(),
                returns: func.signature.returns.clone(),
            },
            len: 0,
        },
        Value::Pointer(reference) => Shape {
            category: Category::Pointer,
            ty: Some(TypeExpr::pointer_to(reference.pointee.clone())),
            element: ElementShape::None,
            len: 0,
        },
        Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::Str(_) => Shape {
            category: Category::Scalar,
            ty: value.ty(),
            element: ElementShape::None,
            len: 0,
        },
    }
}
