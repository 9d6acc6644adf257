//! In-memory capture of assertion events
//!
//! Tests share one global subscriber, so assertions select events by the
//! compared type or the assertion that emitted them rather than by position.

use assertx_core_types::schema::{
    EVENT_FAIL, FIELD_CHECK, FIELD_EVENT, FIELD_MESSAGE, FIELD_OP, FIELD_TYPE_NAME,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One captured event.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    /// The assertion that emitted the event, for `assert` operations
    pub check: Option<String>,
    pub type_name: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, fields: HashMap<String, String>) -> Self {
        let take = |key: &str| fields.get(key).cloned();
        Self {
            level,
            op: take(FIELD_OP),
            event: take(FIELD_EVENT),
            check: take(FIELD_CHECK),
            type_name: take(FIELD_TYPE_NAME),
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Whether this is `event` of operation `op`.
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let captured = CapturedEvent::from_fields(*event.metadata().level(), fields.0);
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Handle on the captured events.
#[derive(Clone, Default)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events logged while comparing or diffing values of `type_name`.
    pub fn events_for_type(&self, type_name: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.type_name.as_deref() == Some(type_name))
            .collect()
    }

    /// `(op, event)` pairs for `type_name`, in emission order.
    pub fn lifecycle(&self, type_name: &str) -> Vec<(String, String)> {
        self.events_for_type(type_name)
            .into_iter()
            .filter_map(|e| Some((e.op?, e.event?)))
            .collect()
    }

    /// Messages of the failures reported by assertion `check`.
    pub fn failures(&self, check: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.event.as_deref() == Some(EVENT_FAIL))
            .filter(|e| e.check.as_deref() == Some(check))
            .filter_map(|e| e.fields.get(FIELD_MESSAGE).cloned())
            .collect()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture as the global subscriber on first use and return the
/// shared handle. If another global subscriber was installed first, the
/// handle stays empty.
///
/// ```
/// use assertx_core::logging_facility::test_capture::init_test_capture;
/// use assertx_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("compare", type_name = "doc::Example");
/// assert_eq!(
///     capture.lifecycle("doc::Example"),
///     vec![("compare".to_string(), "start".to_string())]
/// );
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            let layer = CaptureLayer {
                events: Arc::clone(&capture.events),
            };
            let _ = tracing_subscriber::registry().with(layer).try_init();
            capture
        })
        .clone()
}
