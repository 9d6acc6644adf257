//! Diff computation engine.
//!
//! The core entry point is [`compute_diff`], which explains a failed
//! comparison with the same field filter that decided it.

use crate::compare::engine::{errors_equivalent, is_nil, Walk};
use crate::config::DiffOptions;
use crate::diff::model::{Change, ChangeKind, DiffBody, DiffLine, DiffReport};
use crate::inspect::{Inspect, Shape};
use crate::policy::{FieldFilter, FieldSite};
use crate::render;
use crate::{log_op_end, log_op_start};
use assertx_core_types::schema::OP_DIFF;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

/// Display path of a change at the comparison root.
pub const ROOT_PATH: &str = "(root)";

/// Explain how `got` differs from `want`.
///
/// Preference order:
///
/// 1. If either side has a custom debug string, both are shown as a block.
/// 2. If the walk finds changes below the root, they are listed per leaf.
/// 3. Otherwise both sides are rendered and truncated; multi-line renderings
///    are line-diffed, single-line ones shown as a got/want block.
pub fn compute_diff(
    got: &dyn Inspect,
    want: &dyn Inspect,
    filter: &dyn FieldFilter,
    options: &DiffOptions,
) -> DiffReport {
    let start = Instant::now();
    let type_name = render::type_name(got.type_name(), options);
    log_op_start!(OP_DIFF, type_name = type_name.as_str());

    let body = diff_body(got, want, filter, options);

    let change_count = match &body {
        DiffBody::Changes { changes } => changes.len(),
        _ => 0,
    };
    log_op_end!(
        OP_DIFF,
        duration_ms = start.elapsed().as_millis() as u64,
        type_name = type_name.as_str(),
        change_count = change_count
    );

    DiffReport { type_name, body }
}

fn diff_body(
    got: &dyn Inspect,
    want: &dyn Inspect,
    filter: &dyn FieldFilter,
    options: &DiffOptions,
) -> DiffBody {
    let got_debug = got.debug_string();
    let want_debug = want.debug_string();
    if got_debug.is_some() || want_debug.is_some() {
        return DiffBody::DebugStrings {
            got: got_debug.unwrap_or_else(|| render::compact(got)),
            want: want_debug.unwrap_or_else(|| render::compact(want)),
        };
    }

    let mut differ = Differ::new(filter, options);
    differ.diff(got, want);
    if differ.changes.iter().any(|c| c.path != ROOT_PATH) {
        return DiffBody::Changes {
            changes: differ.changes,
        };
    }

    let max = options.max_fallback_len;
    let got_text = render::render_filtered(got, Some(want), &[], options, true, filter);
    let want_text = render::render_filtered(want, Some(want), &[], options, true, filter);
    let got_text = render::truncate(&got_text, max);
    let want_text = render::truncate(&want_text, max);

    if got_text != want_text && (got_text.contains('\n') || want_text.contains('\n')) {
        let lines = ::diff::lines(want_text, got_text)
            .into_iter()
            .map(|line| match line {
                ::diff::Result::Left(l) => DiffLine::Want(l.to_string()),
                ::diff::Result::Both(l, _) => DiffLine::Same(l.to_string()),
                ::diff::Result::Right(r) => DiffLine::Got(r.to_string()),
            })
            .collect();
        DiffBody::Text { lines }
    } else {
        DiffBody::Fallback {
            got: got_text.to_string(),
            want: want_text.to_string(),
        }
    }
}

enum Step {
    Field { name: &'static str, embedded: bool },
    Index(usize),
    Key(String),
}

fn display_path(steps: &[Step]) -> String {
    let mut path = String::new();
    for step in steps {
        match step {
            Step::Field { embedded: true, .. } => {}
            Step::Field { name, .. } => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(name);
            }
            Step::Index(i) => path.push_str(&format!("[{i}]")),
            Step::Key(k) => path.push_str(&format!("[{k}]")),
        }
    }
    if path.is_empty() {
        ROOT_PATH.to_string()
    } else {
        path
    }
}

struct Differ<'f> {
    filter: &'f dyn FieldFilter,
    options: &'f DiffOptions,
    visited: HashSet<(usize, usize)>,
    fields: Vec<&'static str>,
    steps: Vec<Step>,
    changes: Vec<Change>,
}

impl<'f> Differ<'f> {
    fn new(filter: &'f dyn FieldFilter, options: &'f DiffOptions) -> Self {
        Self {
            filter,
            options,
            visited: HashSet::new(),
            fields: Vec::new(),
            steps: Vec::new(),
            changes: Vec::new(),
        }
    }

    fn diff(&mut self, got: &dyn Inspect, want: &dyn Inspect) {
        let got_shape = got.shape();
        let want_shape = want.shape();

        match (is_nil(&got_shape), is_nil(&want_shape)) {
            (true, true) => return,
            (true, false) => return self.created(want),
            (false, true) => return self.deleted(got),
            (false, false) => {}
        }
        if got.type_name() != want.type_name() {
            return self.updated(got, want);
        }
        if let Some(equal) = got.equal_to(want) {
            if !equal {
                self.updated(got, want);
            }
            return;
        }

        match (got_shape, want_shape) {
            (Shape::Scalar(a), Shape::Scalar(b)) => {
                if a != b {
                    self.updated(got, want);
                }
            }
            (Shape::Bytes(a), Shape::Bytes(b)) => {
                if a != b {
                    self.updated(got, want);
                }
            }
            (Shape::Seq(a), Shape::Seq(b)) | (Shape::Array(a), Shape::Array(b)) => {
                for i in 0..a.len().max(b.len()) {
                    self.steps.push(Step::Index(i));
                    match (a.get(i), b.get(i)) {
                        (Some(g), Some(w)) => self.diff(*g, *w),
                        (Some(g), None) => self.deleted(*g),
                        (None, Some(w)) => self.created(*w),
                        (None, None) => {}
                    }
                    self.steps.pop();
                }
            }
            (Shape::Set(mut a), Shape::Set(mut b)) => {
                a.sort_by_cached_key(|item| render::compact(*item));
                b.sort_by_cached_key(|item| render::compact(*item));
                self.diff_sets(&a, &b);
            }
            (Shape::Map(a), Shape::Map(b)) => self.diff_maps(a, b),
            (Shape::Struct(a), Shape::Struct(b)) => {
                for (g, w) in a.iter().zip(&b) {
                    self.fields.push(w.name);
                    let site = FieldSite {
                        path: &self.fields,
                        exported: w.exported,
                        want: Some(w.value),
                    };
                    if !self.filter.ignores(&site) {
                        self.steps.push(Step::Field {
                            name: w.name,
                            embedded: w.embedded,
                        });
                        self.diff(g.value, w.value);
                        self.steps.pop();
                    }
                    self.fields.pop();
                }
            }
            (
                Shape::Pointer {
                    addr: got_addr,
                    target: got_target,
                },
                Shape::Pointer {
                    addr: want_addr,
                    target: want_target,
                },
            ) => {
                let pair = (got_addr, want_addr);
                if got_addr != want_addr && self.visited.insert(pair) {
                    self.diff(got_target, want_target);
                    self.visited.remove(&pair);
                }
            }
            (Shape::Some(g), Shape::Some(w)) => self.diff(g, w),
            (Shape::Error(g), Shape::Error(w)) => {
                if !errors_equivalent(g, w) {
                    self.updated(got, want);
                }
            }
            (Shape::Opaque(g), Shape::Opaque(w)) => {
                if g != w {
                    self.updated(got, want);
                }
            }
            _ => self.updated(got, want),
        }
    }

    fn diff_sets(&mut self, got: &[&dyn Inspect], want: &[&dyn Inspect]) {
        let mut walk = Walk::at(self.filter, &self.fields);
        let mut used = vec![false; want.len()];
        let mut unmatched = Vec::new();
        for g in got {
            let found = (0..want.len()).find(|&i| !used[i] && walk.equal(*g, want[i]));
            match found {
                Some(i) => used[i] = true,
                None => unmatched.push(*g),
            }
        }
        for g in unmatched {
            self.deleted(g);
        }
        for (w, _) in want.iter().zip(&used).filter(|(_, used)| !**used) {
            self.created(*w);
        }
    }

    fn diff_maps(
        &mut self,
        got: Vec<(&dyn Inspect, &dyn Inspect)>,
        want: Vec<(&dyn Inspect, &dyn Inspect)>,
    ) {
        let mut keyed: BTreeMap<String, (Option<&dyn Inspect>, Option<&dyn Inspect>)> =
            BTreeMap::new();
        for (k, v) in got {
            keyed.entry(render::compact(k)).or_default().0 = Some(v);
        }
        for (k, v) in want {
            keyed.entry(render::compact(k)).or_default().1 = Some(v);
        }
        for (key, sides) in keyed {
            self.steps.push(Step::Key(key));
            match sides {
                (Some(g), Some(w)) => self.diff(g, w),
                (Some(g), None) => self.deleted(g),
                (None, Some(w)) => self.created(w),
                (None, None) => {}
            }
            self.steps.pop();
        }
    }

    fn render(&self, value: &dyn Inspect, want: Option<&dyn Inspect>) -> String {
        render::render_filtered(value, want, &self.fields, self.options, false, self.filter)
    }

    fn push(&mut self, kind: ChangeKind, from: Option<String>, to: Option<String>) {
        self.changes.push(Change {
            kind,
            path: display_path(&self.steps),
            from,
            to,
        });
    }

    fn created(&mut self, want: &dyn Inspect) {
        let to = self.render(want, Some(want));
        self.push(ChangeKind::Create, None, Some(to));
    }

    fn deleted(&mut self, got: &dyn Inspect) {
        let from = self.render(got, None);
        self.push(ChangeKind::Delete, Some(from), None);
    }

    fn updated(&mut self, got: &dyn Inspect, want: &dyn Inspect) {
        let from = self.render(got, Some(want));
        let to = self.render(want, Some(want));
        self.push(ChangeKind::Update, Some(from), Some(to));
    }
}
