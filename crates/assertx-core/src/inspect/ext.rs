//! `Inspect` implementations for the ecosystem types the crate depends on.

use super::{downcast, Inspect, Scalar, Shape};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde_json::Value;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;

/// Timestamps compare by instant, so the same moment in two offsets is equal.
impl<Tz> Inspect for DateTime<Tz>
where
    Tz: TimeZone + 'static,
    Tz::Offset: fmt::Display + 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Opaque(self.to_rfc3339())
    }

    fn equal_to(&self, other: &dyn Inspect) -> Option<bool> {
        downcast::<DateTime<Tz>>(other).map(|other| self == other)
    }

    fn is_zero(&self) -> Option<bool> {
        Some(self.timestamp() == 0 && self.timestamp_subsec_nanos() == 0)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

crate::inspect_leaf!(NaiveDate, NaiveDateTime, NaiveTime);

impl Inspect for Uuid {
    fn shape(&self) -> Shape<'_> {
        Shape::Opaque(self.hyphenated().to_string())
    }

    fn equal_to(&self, other: &dyn Inspect) -> Option<bool> {
        downcast::<Uuid>(other).map(|other| self == other)
    }

    fn is_zero(&self) -> Option<bool> {
        Some(self.is_nil())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Nil,
            Value::Bool(b) => Shape::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Shape::Scalar(Scalar::Int(i as i128))
                } else if let Some(u) = n.as_u64() {
                    Shape::Scalar(Scalar::Uint(u as u128))
                } else {
                    Shape::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => Shape::Scalar(Scalar::Str(Cow::Borrowed(s.as_str()))),
            Value::Array(items) => {
                Shape::Seq(items.iter().map(|item| item as &dyn Inspect).collect())
            }
            Value::Object(map) => Shape::Map(
                map.iter()
                    .map(|(k, v)| (k as &dyn Inspect, v as &dyn Inspect))
                    .collect(),
            ),
        }
    }
}
