//! Declarative macros deriving [`Inspect`](crate::inspect::Inspect).

/// Define a struct and implement `Inspect` for it.
///
/// Field visibility is captured: any `pub` form marks the field as exported,
/// a bare field is private. Prefix a field with `@embed` to mark it as an
/// embedded struct whose fields are promoted, so skip lists may address them
/// by their own name.
///
/// Generic structs and tuple structs are not supported; implement `Inspect`
/// by hand for those.
///
/// # Example
///
/// ```
/// use assertx_core::inspectable;
///
/// inspectable! {
///     #[derive(Debug, Default)]
///     pub struct Audit {
///         pub created_by: String,
///     }
/// }
///
/// inspectable! {
///     #[derive(Debug, Default)]
///     pub struct Account {
///         pub id: u64,
///         @embed pub audit: Audit,
///         cache_key: String,
///     }
/// }
///
/// let got = Account { id: 1, cache_key: "a".into(), ..Default::default() };
/// let want = Account { id: 1, cache_key: "b".into(), ..Default::default() };
/// assert!(assertx_core::compare::is_equal(&got, &want, &[]).unwrap());
/// ```
#[macro_export]
macro_rules! inspectable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $(@$marker:ident)?
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::inspect::Inspect for $name {
            fn shape(&self) -> $crate::inspect::Shape<'_> {
                $crate::inspect::Shape::Struct(::std::vec![
                    $(
                        $crate::inspect::Field {
                            name: ::std::stringify!($field),
                            exported: !::std::stringify!($fvis).is_empty(),
                            embedded: $crate::__inspect_marker!($($marker)?),
                            value: &self.$field,
                        },
                    )*
                ])
            }

            fn layout() -> $crate::inspect::Layout {
                $crate::inspect::Layout::Struct(|| {
                    ::std::vec![
                        $(
                            $crate::inspect::FieldLayout {
                                name: ::std::stringify!($field),
                                exported: !::std::stringify!($fvis).is_empty(),
                                embedded: $crate::__inspect_marker!($($marker)?),
                                layout: <$fty as $crate::inspect::Inspect>::layout,
                            },
                        )*
                    ]
                })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __inspect_marker {
    () => {
        false
    };
    (embed) => {
        true
    };
    ($other:ident) => {
        ::std::compile_error!(::std::concat!(
            "unknown field marker @",
            ::std::stringify!($other),
            ", expected @embed"
        ))
    };
}

/// Implement `Inspect` for opaque `PartialEq + Debug` types.
///
/// The type's own `==` decides equality and its `Debug` output is used for
/// rendering.
///
/// ```
/// use assertx_core::inspect_leaf;
///
/// #[derive(Debug, PartialEq)]
/// pub struct Money(i64);
///
/// inspect_leaf!(Money);
///
/// assert!(assertx_core::compare::is_equal(&Money(5), &Money(5), &[]).unwrap());
/// ```
#[macro_export]
macro_rules! inspect_leaf {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::inspect::Inspect for $ty {
                fn shape(&self) -> $crate::inspect::Shape<'_> {
                    $crate::inspect::Shape::Opaque(::std::format!("{:?}", self))
                }

                fn equal_to(
                    &self,
                    other: &dyn $crate::inspect::Inspect,
                ) -> ::std::option::Option<bool> {
                    $crate::inspect::downcast::<$ty>(other).map(|other| self == other)
                }

                fn as_any(&self) -> ::std::option::Option<&dyn ::std::any::Any> {
                    ::std::option::Option::Some(self)
                }
            }
        )+
    };
}

/// Implement `Inspect` for error types.
///
/// Error values are rejected by the plain equality checks and matched by the
/// error assertions instead.
#[macro_export]
macro_rules! inspect_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::inspect::Inspect for $ty {
                fn shape(&self) -> $crate::inspect::Shape<'_> {
                    $crate::inspect::Shape::Error(self)
                }

                fn as_any(&self) -> ::std::option::Option<&dyn ::std::any::Any> {
                    ::std::option::Option::Some(self)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use crate::inspect::{Inspect, Layout, Shape};

    inspectable! {
        #[derive(Debug, Default)]
        struct Inner {
            pub leaf: u32,
        }
    }

    inspectable! {
        #[derive(Debug, Default)]
        struct Outer {
            pub name: String,
            @embed pub inner: Inner,
            secret: Option<Box<Inner>>,
        }
    }

    #[test]
    fn test_struct_shape_captures_visibility() {
        let outer = Outer::default();
        let Shape::Struct(fields) = outer.shape() else {
            panic!("expected a struct shape");
        };
        let summary: Vec<_> = fields
            .iter()
            .map(|f| (f.name, f.exported, f.embedded))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("name", true, false),
                ("inner", true, true),
                ("secret", false, false),
            ]
        );
        assert!(outer.secret.is_none());
    }

    #[test]
    fn test_layout_reaches_through_pointers() {
        let Layout::Struct(fields) = Outer::layout() else {
            panic!("expected a struct layout");
        };
        let secret = fields()
            .into_iter()
            .find(|f| f.name == "secret")
            .expect("secret field");
        let Layout::Through(next) = (secret.layout)() else {
            panic!("expected an optional layout");
        };
        let Layout::Through(next) = next() else {
            panic!("expected a pointer layout");
        };
        assert!(matches!(next(), Layout::Struct(_)));
    }
}
