//! Value inspection: the type-descriptor layer the comparator walks.
//!
//! A type takes part in comparisons by implementing [`Inspect`]. The only
//! required method is [`Inspect::shape`], which describes one level of the
//! value: a scalar, a sequence of children, a struct with named fields, a
//! pointer to another value and so on. Children are themselves `&dyn Inspect`,
//! so the comparator, the diff engine, and the renderer walk arbitrary nested
//! data lazily without per-type code.
//!
//! Optional capabilities let a type override the structural defaults:
//!
//! - [`Inspect::equal_to`]: semantic equality (e.g. two timestamps that name
//!   the same instant in different zones)
//! - [`Inspect::is_zero`]: what "zero" means for the type
//! - [`Inspect::debug_string`]: a custom rendering used for diffs
//!
//! Structs normally get their implementation from [`inspectable!`](crate::inspectable),
//! leaf types from [`inspect_leaf!`](crate::inspect_leaf).

mod ext;
mod impls;
mod macros;

use std::any::Any;
use std::borrow::Cow;

/// A leaf value that is compared and rendered directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Unit,
    Bool(bool),
    Int(i128),
    Uint(u128),
    Float(f64),
    Char(char),
    Str(Cow<'a, str>),
}

impl Scalar<'_> {
    /// Whether this scalar is the zero value of its kind.
    ///
    /// Negative zero is not zero, matching a bitwise zero-initialized float.
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Unit => true,
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => *i == 0,
            Scalar::Uint(u) => *u == 0,
            Scalar::Float(f) => f.to_bits() == 0,
            Scalar::Char(c) => *c == '\0',
            Scalar::Str(s) => s.is_empty(),
        }
    }
}

/// A named struct field as seen by the walks.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    /// The field name as written in the struct definition
    pub name: &'static str,
    /// Whether the field is part of the type's public surface
    pub exported: bool,
    /// Whether the field is embedded, promoting its own fields
    pub embedded: bool,
    /// The field value
    pub value: &'a dyn Inspect,
}

/// One level of a value's structure.
pub enum Shape<'a> {
    /// Absent value: `None`, an unset cell, JSON `null`
    Nil,
    Scalar(Scalar<'a>),
    /// A byte sequence, compared by content
    Bytes(&'a [u8]),
    /// A growable sequence
    Seq(Vec<&'a dyn Inspect>),
    /// A fixed-size sequence (arrays, tuples)
    Array(Vec<&'a dyn Inspect>),
    /// An unordered collection of members
    Set(Vec<&'a dyn Inspect>),
    /// Key/value pairs in any order
    Map(Vec<(&'a dyn Inspect, &'a dyn Inspect)>),
    Struct(Vec<Field<'a>>),
    /// A shared or owning reference. `addr` identifies the pointee for cycle
    /// detection.
    Pointer { addr: usize, target: &'a dyn Inspect },
    /// A present optional value
    Some(&'a dyn Inspect),
    Error(&'a (dyn std::error::Error + 'static)),
    /// A value without visible structure, rendered by its text
    Opaque(String),
}

impl Shape<'_> {
    /// Short kind label used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Nil => "nil",
            Shape::Scalar(_) => "scalar",
            Shape::Bytes(_) => "bytes",
            Shape::Seq(_) => "sequence",
            Shape::Array(_) => "array",
            Shape::Set(_) => "set",
            Shape::Map(_) => "map",
            Shape::Struct(_) => "struct",
            Shape::Pointer { .. } => "pointer",
            Shape::Some(_) => "optional",
            Shape::Error(_) => "error",
            Shape::Opaque(_) => "opaque",
        }
    }

    /// Length of a collection-like shape.
    pub fn len(&self) -> Option<usize> {
        match self {
            Shape::Scalar(Scalar::Str(s)) => Some(s.len()),
            Shape::Bytes(b) => Some(b.len()),
            Shape::Seq(items) | Shape::Array(items) | Shape::Set(items) => Some(items.len()),
            Shape::Map(entries) => Some(entries.len()),
            Shape::Nil => Some(0),
            _ => None,
        }
    }
}

/// Static description of a type's fields, expanded on demand.
///
/// Layouts are used to resolve dotted field names before any value is
/// walked. Expansion is lazy, so recursive types are fine.
#[derive(Clone, Copy)]
pub enum Layout {
    /// No addressable fields
    Leaf,
    Struct(fn() -> Vec<FieldLayout>),
    /// Pointer, optional, or container: field names resolve against the
    /// element type
    Through(fn() -> Layout),
}

/// Static description of one struct field.
#[derive(Clone, Copy)]
pub struct FieldLayout {
    pub name: &'static str,
    pub exported: bool,
    pub embedded: bool,
    pub layout: fn() -> Layout,
}

impl std::fmt::Debug for FieldLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldLayout")
            .field("name", &self.name)
            .field("exported", &self.exported)
            .field("embedded", &self.embedded)
            .finish_non_exhaustive()
    }
}

/// A value the comparator can walk.
///
/// # Example
///
/// ```
/// use assertx_core::inspect::{Inspect, Scalar, Shape};
///
/// struct Celsius(f64);
///
/// impl Inspect for Celsius {
///     fn shape(&self) -> Shape<'_> {
///         Shape::Scalar(Scalar::Float(self.0))
///     }
/// }
///
/// assert!(assertx_core::compare::is_equal(&Celsius(21.5), &Celsius(21.5), &[]).unwrap());
/// ```
pub trait Inspect {
    /// Describe one level of this value.
    fn shape(&self) -> Shape<'_>;

    /// Dynamic type name, used to tell apart values behind trait objects.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Custom equality capability.
    ///
    /// `other` has the same type name as `self`. Return `None` to fall back
    /// to structural comparison.
    fn equal_to(&self, other: &dyn Inspect) -> Option<bool> {
        let _ = other;
        None
    }

    /// Zero capability, consulted by the zero-field rule.
    fn is_zero(&self) -> Option<bool> {
        None
    }

    /// Custom debug-string capability, preferred by the diff renderer.
    fn debug_string(&self) -> Option<String> {
        None
    }

    /// Downcast hook for capability implementations.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    /// Static field layout of the type.
    fn layout() -> Layout
    where
        Self: Sized,
    {
        Layout::Leaf
    }

    /// How a slice of this type is described.
    fn seq_shape(items: &[Self]) -> Shape<'_>
    where
        Self: Sized,
    {
        Shape::Seq(items.iter().map(|item| item as &dyn Inspect).collect())
    }
}

/// Downcast `other` to `T` through its [`Inspect::as_any`] hook.
///
/// Helper for [`Inspect::equal_to`] implementations.
pub fn downcast<T: Any>(other: &dyn Inspect) -> Option<&T> {
    other.as_any().and_then(|any| any.downcast_ref::<T>())
}

/// Whether `value` is empty in the sense of the empty-field rule.
///
/// Strings and collections are empty when they have no elements, fixed arrays
/// when every element is zero, pointers and optionals when absent. Anything
/// else falls back to [`is_zero`].
pub fn is_empty(value: &dyn Inspect) -> bool {
    match value.shape() {
        Shape::Nil => true,
        Shape::Scalar(Scalar::Str(s)) => s.is_empty(),
        Shape::Bytes(b) => b.is_empty(),
        Shape::Seq(items) | Shape::Set(items) => items.is_empty(),
        Shape::Map(entries) => entries.is_empty(),
        Shape::Array(items) => items.iter().all(|item| is_zero(*item)),
        _ => is_zero(value),
    }
}

/// Whether `value` is zero in the sense of the zero-field rule.
///
/// The type's own [`Inspect::is_zero`] wins. Otherwise a value is zero when it
/// equals its zero-initialized form: zero scalars, absent optionals, empty
/// collections, and structs or arrays whose elements are all zero. A present
/// pointer is never zero.
pub fn is_zero(value: &dyn Inspect) -> bool {
    if let Some(zero) = value.is_zero() {
        return zero;
    }
    match value.shape() {
        Shape::Nil => true,
        Shape::Scalar(scalar) => scalar.is_zero(),
        Shape::Bytes(b) => b.is_empty(),
        Shape::Seq(items) | Shape::Set(items) => items.is_empty(),
        Shape::Map(entries) => entries.is_empty(),
        Shape::Array(items) => items.iter().all(|item| is_zero(*item)),
        Shape::Struct(fields) => fields.iter().all(|field| is_zero(field.value)),
        Shape::Opaque(text) => text.is_empty(),
        Shape::Pointer { .. } | Shape::Some(_) | Shape::Error(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_zero() {
        assert!(Scalar::Int(0).is_zero());
        assert!(!Scalar::Int(-1).is_zero());
        assert!(Scalar::Float(0.0).is_zero());
        assert!(!Scalar::Float(-0.0).is_zero());
        assert!(Scalar::Str(Cow::Borrowed("")).is_zero());
        assert!(Scalar::Bool(false).is_zero());
        assert!(Scalar::Char('\0').is_zero());
    }

    #[test]
    fn test_empty_checks() {
        assert!(is_empty(&String::new()));
        assert!(!is_empty(&"x".to_string()));
        assert!(is_empty(&Vec::<u32>::new()));
        assert!(is_empty(&None::<u32>));
        assert!(is_empty(&[0u8; 4]));
        assert!(!is_empty(&[0u8, 1, 0, 0]));
        assert!(is_empty(&0u64));
        assert!(!is_empty(&Some(0u64)));
    }

    #[test]
    fn test_zero_checks() {
        assert!(is_zero(&0i32));
        assert!(is_zero(&(0u8, false)));
        assert!(!is_zero(&(0u8, true)));
        assert!(!is_zero(&Box::new(0u8)));
        assert!(is_zero(&None::<Box<u8>>));
    }

    #[test]
    fn test_bytes_shape_for_u8_slices() {
        let bytes = vec![1u8, 2, 3];
        assert!(matches!(bytes.shape(), Shape::Bytes(b) if b == [1, 2, 3]));
        let words = vec![1u16, 2];
        assert!(matches!(words.shape(), Shape::Seq(items) if items.len() == 2));
    }

    #[test]
    fn test_shape_len() {
        assert_eq!("héllo".shape().len(), Some(6));
        assert_eq!(vec![1u32, 2, 3].shape().len(), Some(3));
        assert_eq!(42u32.shape().len(), None);
    }
}
