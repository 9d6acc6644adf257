#![allow(dead_code)]

use assertx_core::inspect::{downcast, Inspect, Scalar, Shape};
use assertx_core::{inspect_leaf, inspectable};

inspectable! {
    /// Nested leaf shared by the fixtures
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Inner {
        pub value: i64,
        pub label: String,
    }
}

inspectable! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Outer {
        pub name: String,
        pub inner: Inner,
    }
}

inspectable! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Audit {
        pub created_by: String,
        pub revision: u32,
    }
}

inspectable! {
    /// Account record with an embedded audit block and a private cache key
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Account {
        pub id: u64,
        pub owner: String,
        pub tags: Vec<String>,
        @embed pub audit: Audit,
        cache_key: String,
    }
}

impl Account {
    pub fn new(id: u64, owner: &str) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            ..Default::default()
        }
    }

    pub fn with_cache_key(mut self, key: &str) -> Self {
        self.cache_key = key.to_string();
        self
    }
}

inspectable! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Pair {
        pub a: i32,
        pub b: i32,
    }
}

/// Amount of money compared by value in cents, whatever the currency label.
#[derive(Debug, Clone, PartialEq)]
pub struct Cents {
    pub amount: i64,
    pub label: &'static str,
}

impl Inspect for Cents {
    fn shape(&self) -> Shape<'_> {
        Shape::Opaque(format!("{} {}", self.amount, self.label))
    }

    fn equal_to(&self, other: &dyn Inspect) -> Option<bool> {
        downcast::<Cents>(other).map(|other| self.amount == other.amount)
    }

    fn as_any(&self) -> Option<&dyn std::any::Any> {
        Some(self)
    }
}

/// Version number where anything below 1 counts as unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Version(pub i32);

impl Inspect for Version {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Int(self.0.into()))
    }

    fn is_zero(&self) -> Option<bool> {
        Some(self.0 < 1)
    }
}

inspectable! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Release {
        pub name: String,
        pub version: Version,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Suspended,
}

inspect_leaf!(Status);
