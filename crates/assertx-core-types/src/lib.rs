//! Core types shared across assertx facilities
//!
//! This crate provides the canonical field keys and event names used by the
//! logging macros and the test capture layer of `assertx-core`, so that
//! emitters and assertions agree on one vocabulary.

pub mod schema;
