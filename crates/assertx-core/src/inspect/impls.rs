//! `Inspect` implementations for standard library types.

use super::{downcast, Inspect, Layout, Scalar, Shape};
use std::any::Any;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

// ===== Scalars =====

macro_rules! signed_scalars {
    ($($t:ty),*) => {
        $(
            impl Inspect for $t {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Scalar::Int(*self as i128))
                }
            }
        )*
    };
}

macro_rules! unsigned_scalars {
    ($($t:ty),*) => {
        $(
            impl Inspect for $t {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Scalar::Uint(*self as u128))
                }
            }
        )*
    };
}

signed_scalars!(i8, i16, i32, i64, i128, isize);
unsigned_scalars!(u16, u32, u64, u128, usize);

impl Inspect for u8 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Uint(*self as u128))
    }

    fn seq_shape(items: &[Self]) -> Shape<'_> {
        Shape::Bytes(items)
    }
}

impl Inspect for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Float(*self as f64))
    }
}

impl Inspect for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Float(*self))
    }
}

impl Inspect for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Bool(*self))
    }
}

impl Inspect for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Char(*self))
    }
}

impl Inspect for () {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Unit)
    }
}

impl Inspect for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(Cow::Borrowed(self)))
    }
}

impl Inspect for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(Cow::Borrowed(self.as_str())))
    }
}

impl Inspect for Cow<'_, str> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(Cow::Borrowed(self.as_ref())))
    }
}

impl Inspect for PathBuf {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self.to_string_lossy()))
    }
}

impl Inspect for Duration {
    fn shape(&self) -> Shape<'_> {
        Shape::Opaque(format!("{:?}", self))
    }

    fn equal_to(&self, other: &dyn Inspect) -> Option<bool> {
        downcast::<Duration>(other).map(|other| self == other)
    }

    fn is_zero(&self) -> Option<bool> {
        Some(Duration::is_zero(self))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

// ===== Sequences =====

impl<T: Inspect> Inspect for [T] {
    fn shape(&self) -> Shape<'_> {
        T::seq_shape(self)
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        T::seq_shape(self)
    }

    fn layout() -> Layout {
        Layout::Through(T::layout)
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|item| item as &dyn Inspect).collect())
    }

    fn layout() -> Layout {
        Layout::Through(T::layout)
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Array(self.iter().map(|item| item as &dyn Inspect).collect())
    }

    fn layout() -> Layout {
        Layout::Through(T::layout)
    }
}

macro_rules! tuples {
    ($(($($name:ident : $idx:tt),+)),+) => {
        $(
            impl<$($name: Inspect),+> Inspect for ($($name,)+) {
                fn shape(&self) -> Shape<'_> {
                    Shape::Array(vec![$(&self.$idx as &dyn Inspect),+])
                }
            }
        )+
    };
}

tuples!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3)
);

// ===== Maps and sets =====

impl<K: Inspect, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (k as &dyn Inspect, v as &dyn Inspect))
                .collect(),
        )
    }

    fn layout() -> Layout {
        Layout::Through(V::layout)
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(k, v)| (k as &dyn Inspect, v as &dyn Inspect))
                .collect(),
        )
    }

    fn layout() -> Layout {
        Layout::Through(V::layout)
    }
}

impl<T: Inspect, S> Inspect for HashSet<T, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Set(self.iter().map(|item| item as &dyn Inspect).collect())
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Set(self.iter().map(|item| item as &dyn Inspect).collect())
    }
}

// ===== Optionals and pointers =====

impl<T: Inspect> Inspect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => Shape::Some(value),
            None => Shape::Nil,
        }
    }

    fn is_zero(&self) -> Option<bool> {
        match self {
            Some(value) => value.is_zero(),
            None => Some(true),
        }
    }

    fn debug_string(&self) -> Option<String> {
        self.as_ref().and_then(|value| value.debug_string())
    }

    fn layout() -> Layout {
        Layout::Through(T::layout)
    }
}

impl<T: Inspect> Inspect for OnceCell<T> {
    fn shape(&self) -> Shape<'_> {
        match self.get() {
            Some(value) => Shape::Some(value),
            None => Shape::Nil,
        }
    }

    fn layout() -> Layout {
        Layout::Through(T::layout)
    }
}

/// Plain references are transparent: they describe the referent.
impl<T: Inspect + ?Sized> Inspect for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn equal_to(&self, other: &dyn Inspect) -> Option<bool> {
        (**self).equal_to(other)
    }

    fn is_zero(&self) -> Option<bool> {
        (**self).is_zero()
    }

    fn debug_string(&self) -> Option<String> {
        (**self).debug_string()
    }

    fn as_any(&self) -> Option<&dyn Any> {
        (**self).as_any()
    }
}

macro_rules! owning_pointers {
    ($($ptr:ident),*) => {
        $(
            impl<T: Inspect> Inspect for $ptr<T> {
                fn shape(&self) -> Shape<'_> {
                    let target: &T = self;
                    Shape::Pointer {
                        addr: target as *const T as usize,
                        target,
                    }
                }

                fn is_zero(&self) -> Option<bool> {
                    (**self).is_zero()
                }

                fn debug_string(&self) -> Option<String> {
                    (**self).debug_string()
                }

                fn layout() -> Layout {
                    Layout::Through(T::layout)
                }
            }
        )*
    };
}

owning_pointers!(Box, Rc, Arc);

// ===== Errors =====

impl Inspect for std::io::Error {
    fn shape(&self) -> Shape<'_> {
        Shape::Error(self)
    }
}

impl Inspect for Box<dyn Error> {
    fn shape(&self) -> Shape<'_> {
        Shape::Error(&**self)
    }
}

impl Inspect for Box<dyn Error + Send + Sync> {
    fn shape(&self) -> Shape<'_> {
        Shape::Error(&**self)
    }
}

crate::inspect_error!(crate::errors::AssertXError, crate::errors::AxError);
