//! Human-readable rendering of diff reports for failure messages.

use crate::diff::model::{DiffBody, DiffLine, DiffReport};
use std::fmt::Write as _;

/// Render a [`DiffReport`] as the text that follows `expected equal`.
pub fn render_human_summary(report: &DiffReport) -> String {
    let mut out = String::new();
    match &report.body {
        DiffBody::DebugStrings { got, want } | DiffBody::Fallback { got, want } => {
            let _ = write!(out, " got: {got}\nwant: {want}");
        }
        DiffBody::Changes { changes } => {
            for change in changes {
                let _ = writeln!(
                    out,
                    "[{}] {} path {}: {} -> {}",
                    change.kind,
                    report.type_name,
                    change.path,
                    change.from.as_deref().unwrap_or("<none>"),
                    change.to.as_deref().unwrap_or("<none>"),
                );
            }
            out.truncate(out.trim_end().len());
        }
        DiffBody::Text { lines } => {
            out.push_str("--- want\n+++ got");
            for line in lines {
                let (marker, text) = match line {
                    DiffLine::Same(text) => (' ', text),
                    DiffLine::Want(text) => ('-', text),
                    DiffLine::Got(text) => ('+', text),
                };
                let _ = write!(out, "\n{marker} {text}");
            }
        }
    }
    out
}
