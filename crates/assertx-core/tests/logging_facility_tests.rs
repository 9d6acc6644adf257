#![allow(clippy::unwrap_used, clippy::expect_used)]

use assertx_core::assertions::equal;
use assertx_core::compare::compare;
use assertx_core::errors::AssertXError;
use assertx_core::logging_facility::test_capture::init_test_capture;
use assertx_core::policy::Policy;
use assertx_core::{inspectable, log_op_end, log_op_error, log_op_fail, log_op_start};
use assertx_core::{skip_field_names, RecordingReporter};
use assertx_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_FAIL, EVENT_START, OP_ASSERT, OP_COMPARE, OP_DIFF,
    OP_RESOLVE_POLICY,
};

inspectable! {
    #[derive(Debug, Clone, Default)]
    pub struct CompareProbe {
        pub id: u32,
    }
}

inspectable! {
    #[derive(Debug, Clone, Default)]
    pub struct PolicyProbe {
        pub id: u32,
    }
}

inspectable! {
    #[derive(Debug, Clone, Default)]
    pub struct AssertProbe {
        pub id: u32,
    }
}

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, type_name = "T");

    let events = capture.events();
    let start = events
        .iter()
        .find(|e| e.is(op_name, EVENT_START))
        .expect("start event");
    assert_eq!(start.type_name.as_deref(), Some("T"));
}

#[test]
fn test_log_op_end_and_fail_macros() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);
    log_op_fail!(op_name, duration_ms = 1, message = "expected equal");

    let events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name))
        .collect();
    assert_eq!(events.len(), 2);
    assert!(events[0].is(op_name, EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
    assert!(events[1].is(op_name, EVENT_FAIL));
    assert_eq!(events[1].field("message"), Some("expected equal"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    log_op_error!(op_name, AssertXError::ConfigAlreadySet, duration_ms = 10);

    let events = capture.events();
    let error = events
        .iter()
        .find(|e| e.is(op_name, EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error.field("err_kind"), Some("ConfigAlreadySet"));
    assert_eq!(error.field("err_code"), Some("ERR_CONFIG_ALREADY_SET"));
    assert_eq!(error.level, tracing::Level::ERROR);
}

#[test]
fn test_compare_emits_policy_and_compare_events() {
    let capture = init_test_capture();
    let type_name = std::any::type_name::<CompareProbe>();

    let got = CompareProbe { id: 1 };
    let want = CompareProbe { id: 2 };
    let comparison = compare(&got, &want, &[]).unwrap();
    assert!(!comparison.is_equal());

    let ops: Vec<(String, String)> = [
        (OP_RESOLVE_POLICY, EVENT_START),
        (OP_RESOLVE_POLICY, EVENT_END),
        (OP_COMPARE, EVENT_START),
        (OP_COMPARE, EVENT_END),
    ]
    .into_iter()
    .map(|(op, event)| (op.to_string(), event.to_string()))
    .collect();
    assert_eq!(capture.lifecycle(type_name), ops);

    let events = capture.events_for_type(type_name);
    assert_eq!(events[1].field("rule_count"), Some("1"));
    assert_eq!(events[3].field("equal"), Some("false"));
}

#[test]
fn test_policy_errors_are_logged() {
    let capture = init_test_capture();
    let type_name = std::any::type_name::<PolicyProbe>();

    let result = Policy::from_options(&[skip_field_names(["missing"])]).resolve::<PolicyProbe>();
    assert!(result.is_err());

    let events = capture.events_for_type(type_name);
    let error = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error.op.as_deref(), Some(OP_RESOLVE_POLICY));
    assert_eq!(error.field("err_code"), Some("ERR_UNKNOWN_FIELD"));
}

#[test]
fn test_failed_assertion_emits_diff_and_fail_events() {
    let capture = init_test_capture();
    let type_name = std::any::type_name::<AssertProbe>();

    let r = RecordingReporter::new();
    equal(&r, &AssertProbe { id: 1 }, &AssertProbe { id: 2 }, &[]);
    assert!(r.failed());

    let events = capture.events_for_type(type_name);
    assert!(events
        .iter()
        .any(|e| e.is(OP_ASSERT, EVENT_START) && e.check.as_deref() == Some("equal")));
    let diff_end = events
        .iter()
        .find(|e| e.is(OP_DIFF, EVENT_END))
        .expect("diff end event");
    assert_eq!(diff_end.field("change_count"), Some("1"));

    let message = r.last_message().unwrap();
    assert!(capture.failures("equal").contains(&message));
}
