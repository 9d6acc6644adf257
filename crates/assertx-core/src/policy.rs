//! Comparison policy and filter rules
//!
//! Options passed to a comparison are folded into a [`Policy`], which is then
//! resolved against the compared type's [`Layout`] into an ordered
//! [`RuleSet`]. The comparator and the diff engine only ever see the rules
//! through the [`FieldFilter`] trait, so new rules can be added without
//! touching the walks.

use crate::errors::{AssertXError, Result};
use crate::inspect::{self, FieldLayout, Inspect, Layout};
use crate::{log_op_end, log_op_error, log_op_start};
use assertx_core_types::schema::OP_RESOLVE_POLICY;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Embedded structs nested deeper than this are not searched for promoted
/// fields.
const MAX_EMBED_DEPTH: usize = 32;

/// An opaque mutator of the policy accumulator.
///
/// Options are built with [`ignore_unexported`], [`compare_unexported`],
/// [`skip_empty_fields`], [`skip_zero_fields`] and [`skip_field_names`].
#[derive(Clone)]
pub struct CompareOption(Arc<dyn Fn(&mut Policy) + Send + Sync>);

impl CompareOption {
    fn new(apply: impl Fn(&mut Policy) + Send + Sync + 'static) -> Self {
        Self(Arc::new(apply))
    }

    fn apply(&self, policy: &mut Policy) {
        (self.0)(policy)
    }
}

impl fmt::Debug for CompareOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompareOption(..)")
    }
}

/// Ignore fields that are not exported (`pub`).
///
/// Takes precedence over [`compare_unexported`].
pub fn ignore_unexported() -> CompareOption {
    CompareOption::new(|p| p.ignore_unexported = true)
}

/// Compare private fields as well as exported ones.
pub fn compare_unexported() -> CompareOption {
    CompareOption::new(|p| p.compare_unexported = true)
}

/// Ignore fields whose expected value is empty.
pub fn skip_empty_fields() -> CompareOption {
    CompareOption::new(|p| p.skip_empty_fields = true)
}

/// Ignore fields whose expected value is zero.
pub fn skip_zero_fields() -> CompareOption {
    CompareOption::new(|p| p.skip_zero_fields = true)
}

/// Ignore the given dot-delimited field paths.
///
/// Promoted fields of embedded structs are addressed by their own name.
/// Names are resolved when the comparison starts; a name that does not exist
/// on the compared type is a usage error.
pub fn skip_field_names<I, S>(names: I) -> CompareOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    CompareOption::new(move |p| p.skip_field_names.extend(names.iter().cloned()))
}

/// Resolved comparison relaxations for one comparison call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    ignore_unexported: bool,
    compare_unexported: bool,
    skip_empty_fields: bool,
    skip_zero_fields: bool,
    skip_field_names: Vec<String>,
}

impl Policy {
    /// Fold options into a policy.
    pub fn from_options(options: &[CompareOption]) -> Self {
        let mut policy = Policy::default();
        for option in options {
            option.apply(&mut policy);
        }
        policy
    }

    pub fn ignore_unexported(&self) -> bool {
        self.ignore_unexported
    }

    pub fn compare_unexported(&self) -> bool {
        self.compare_unexported
    }

    pub fn skip_empty_fields(&self) -> bool {
        self.skip_empty_fields
    }

    pub fn skip_zero_fields(&self) -> bool {
        self.skip_zero_fields
    }

    pub fn skip_field_names(&self) -> &[String] {
        &self.skip_field_names
    }

    /// Translate the policy into rules for values of type `T`.
    ///
    /// # Errors
    ///
    /// Returns a usage error if a skipped field name is malformed, unknown,
    /// ambiguous, or walks into a type without fields.
    pub fn resolve<T: Inspect>(&self) -> Result<RuleSet> {
        self.resolve_layout(T::layout(), std::any::type_name::<T>())
    }

    /// Translate the policy into rules against an explicit layout.
    ///
    /// # Errors
    ///
    /// See [`Policy::resolve`].
    pub fn resolve_layout(&self, layout: Layout, type_name: &str) -> Result<RuleSet> {
        let start = Instant::now();
        log_op_start!(OP_RESOLVE_POLICY, type_name = type_name);

        let result = self.build_rules(layout, type_name);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(rules) => {
                log_op_end!(
                    OP_RESOLVE_POLICY,
                    duration_ms = duration_ms,
                    type_name = type_name,
                    rule_count = rules.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    OP_RESOLVE_POLICY,
                    err.clone(),
                    duration_ms = duration_ms,
                    type_name = type_name
                );
            }
        }
        result
    }

    fn build_rules(&self, layout: Layout, type_name: &str) -> Result<RuleSet> {
        let mut rules = Vec::new();

        if self.ignore_unexported || !self.compare_unexported {
            rules.push(FilterRule::ExportedOnly);
        }
        if self.skip_empty_fields {
            rules.push(FilterRule::SkipEmpty);
        }
        if self.skip_zero_fields {
            rules.push(FilterRule::SkipZero);
        }
        if !self.skip_field_names.is_empty() {
            let resolved = self
                .skip_field_names
                .iter()
                .map(|name| resolve_name(layout, type_name, name))
                .collect::<Result<Vec<_>>>()?;
            rules.push(FilterRule::SkipNames(resolved));
        }

        Ok(RuleSet { rules })
    }
}

/// A skipped field name together with its full field path.
///
/// The path includes the names of embedded structs the field was promoted
/// through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    pub path: Vec<&'static str>,
}

/// A field reached by a walk, as presented to filter rules.
pub struct FieldSite<'a> {
    /// Field names from the comparison root, container steps excluded
    pub path: &'a [&'static str],
    pub exported: bool,
    /// The expected side's value of the field, if there is one. Without it
    /// only the rules that do not look at values apply.
    pub want: Option<&'a dyn Inspect>,
}

/// Decides whether a field is left out of comparison and diff.
pub trait FieldFilter {
    fn ignores(&self, site: &FieldSite<'_>) -> bool;
}

/// A single ignore rule derived from the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRule {
    /// Ignore fields that are not exported
    ExportedOnly,
    /// Ignore fields whose expected value is empty
    SkipEmpty,
    /// Ignore fields whose expected value is zero
    SkipZero,
    /// Ignore fields at the resolved paths
    SkipNames(Vec<ResolvedName>),
}

impl FieldFilter for FilterRule {
    fn ignores(&self, site: &FieldSite<'_>) -> bool {
        match self {
            FilterRule::ExportedOnly => !site.exported,
            FilterRule::SkipEmpty => site.want.is_some_and(inspect::is_empty),
            FilterRule::SkipZero => site.want.is_some_and(inspect::is_zero),
            FilterRule::SkipNames(names) => names.iter().any(|n| n.path == site.path),
        }
    }
}

/// The ordered rules for one comparison. A field is ignored if any rule
/// ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<FilterRule>,
}

impl RuleSet {
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FieldFilter for RuleSet {
    fn ignores(&self, site: &FieldSite<'_>) -> bool {
        self.rules.iter().any(|rule| rule.ignores(site))
    }
}

/// Look through pointers, optionals and containers to the struct fields.
fn struct_fields(layout: Layout) -> Option<Vec<FieldLayout>> {
    let mut current = layout;
    loop {
        match current {
            Layout::Leaf => return None,
            Layout::Struct(fields) => return Some(fields()),
            Layout::Through(next) => current = next(),
        }
    }
}

fn resolve_name(layout: Layout, type_name: &str, name: &str) -> Result<ResolvedName> {
    if name.is_empty() || name.split('.').any(str::is_empty) {
        return Err(AssertXError::InvalidFieldName {
            name: name.to_string(),
        });
    }

    let mut current = layout;
    let mut path = Vec::new();
    let mut walked: Vec<&str> = Vec::new();

    for segment in name.split('.') {
        let fields = struct_fields(current).ok_or_else(|| AssertXError::NotAStruct {
            type_name: type_name.to_string(),
            name: name.to_string(),
            at: if walked.is_empty() {
                "(root)".to_string()
            } else {
                walked.join(".")
            },
        })?;

        let (steps, field) = find_promoted(fields, segment).map_err(|ambiguous| {
            if ambiguous {
                AssertXError::AmbiguousField {
                    type_name: type_name.to_string(),
                    name: name.to_string(),
                    segment: segment.to_string(),
                }
            } else {
                AssertXError::UnknownField {
                    type_name: type_name.to_string(),
                    name: name.to_string(),
                    segment: segment.to_string(),
                }
            }
        })?;

        path.extend(steps);
        walked.push(segment);
        current = (field.layout)();
    }

    Ok(ResolvedName {
        name: name.to_string(),
        path,
    })
}

/// Breadth-first search for `segment` among `fields` and the fields promoted
/// through embedded structs. The shallowest match wins.
///
/// Returns the field path steps and the matched field, or `Err(true)` when
/// the shallowest depth holds more than one match, `Err(false)` when there is
/// none.
fn find_promoted(
    fields: Vec<FieldLayout>,
    segment: &str,
) -> std::result::Result<(Vec<&'static str>, FieldLayout), bool> {
    let mut level: VecDeque<(Vec<&'static str>, Vec<FieldLayout>)> = VecDeque::new();
    level.push_back((Vec::new(), fields));

    for _ in 0..MAX_EMBED_DEPTH {
        if level.is_empty() {
            break;
        }
        let mut matches = Vec::new();
        let mut next = VecDeque::new();

        for (prefix, fields) in level.drain(..) {
            for field in fields {
                if field.name == segment {
                    let mut steps = prefix.clone();
                    steps.push(field.name);
                    matches.push((steps, field));
                } else if field.embedded {
                    if let Some(inner) = struct_fields((field.layout)()) {
                        let mut steps = prefix.clone();
                        steps.push(field.name);
                        next.push_back((steps, inner));
                    }
                }
            }
        }

        match matches.len() {
            0 => level = next,
            1 => return matches.pop().ok_or(false),
            _ => return Err(true),
        }
    }
    Err(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspectable;

    inspectable! {
        #[derive(Debug, Default)]
        struct Audit {
            pub created_by: String,
            pub revision: u32,
        }
    }

    inspectable! {
        #[derive(Debug, Default)]
        struct Stamp {
            pub revision: u32,
        }
    }

    inspectable! {
        #[derive(Debug, Default)]
        struct Doc {
            pub title: String,
            @embed pub audit: Audit,
            pub children: Vec<Doc>,
            pub parent: Option<Box<Doc>>,
        }
    }

    inspectable! {
        #[derive(Debug, Default)]
        struct Clash {
            @embed pub audit: Audit,
            @embed pub stamp: Stamp,
        }
    }

    fn names(rules: &RuleSet) -> Vec<Vec<&'static str>> {
        rules
            .rules()
            .iter()
            .flat_map(|rule| match rule {
                FilterRule::SkipNames(names) => names.iter().map(|n| n.path.clone()).collect(),
                _ => Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_default_policy_compares_exported_only() {
        let rules = Policy::from_options(&[]).resolve::<Doc>().unwrap();
        assert_eq!(rules.rules(), &[FilterRule::ExportedOnly]);
    }

    #[test]
    fn test_compare_unexported_surfaces_private_fields() {
        let rules = Policy::from_options(&[compare_unexported()])
            .resolve::<Doc>()
            .unwrap();
        assert!(rules.is_empty());

        let rules = Policy::from_options(&[compare_unexported(), ignore_unexported()])
            .resolve::<Doc>()
            .unwrap();
        assert_eq!(rules.rules(), &[FilterRule::ExportedOnly]);
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let options = [
            skip_field_names(["title"]),
            skip_zero_fields(),
            skip_empty_fields(),
            ignore_unexported(),
        ];
        let rules = Policy::from_options(&options).resolve::<Doc>().unwrap();
        let kinds: Vec<_> = rules
            .rules()
            .iter()
            .map(|r| std::mem::discriminant(r))
            .collect();
        assert_eq!(
            kinds,
            vec![
                std::mem::discriminant(&FilterRule::ExportedOnly),
                std::mem::discriminant(&FilterRule::SkipEmpty),
                std::mem::discriminant(&FilterRule::SkipZero),
                std::mem::discriminant(&FilterRule::SkipNames(Vec::new())),
            ]
        );
    }

    #[test]
    fn test_promoted_field_resolves_through_embedding() {
        let rules = Policy::from_options(&[skip_field_names(["created_by"])])
            .resolve::<Doc>()
            .unwrap();
        assert_eq!(names(&rules), vec![vec!["audit", "created_by"]]);
    }

    #[test]
    fn test_names_resolve_through_containers_and_pointers() {
        let rules = Policy::from_options(&[skip_field_names([
            "children.title",
            "parent.audit.revision",
        ])])
        .resolve::<Doc>()
        .unwrap();
        assert_eq!(
            names(&rules),
            vec![
                vec!["children", "title"],
                vec!["parent", "audit", "revision"]
            ]
        );
    }

    #[test]
    fn test_unknown_field_is_a_usage_error() {
        let err = Policy::from_options(&[skip_field_names(["nope"])])
            .resolve::<Doc>()
            .unwrap_err();
        assert!(matches!(err, AssertXError::UnknownField { ref segment, .. } if segment == "nope"));
    }

    #[test]
    fn test_non_struct_is_a_usage_error() {
        let err = Policy::from_options(&[skip_field_names(["title.len"])])
            .resolve::<Doc>()
            .unwrap_err();
        assert!(matches!(err, AssertXError::NotAStruct { ref at, .. } if at == "title"));

        let err = Policy::from_options(&[skip_field_names(["x"])])
            .resolve::<u32>()
            .unwrap_err();
        assert!(matches!(err, AssertXError::NotAStruct { ref at, .. } if at == "(root)"));
    }

    #[test]
    fn test_ambiguous_promotion_is_a_usage_error() {
        let err = Policy::from_options(&[skip_field_names(["revision"])])
            .resolve::<Clash>()
            .unwrap_err();
        assert!(matches!(err, AssertXError::AmbiguousField { .. }));

        // Qualified names stay unambiguous
        let rules = Policy::from_options(&[skip_field_names(["stamp.revision"])])
            .resolve::<Clash>()
            .unwrap();
        assert_eq!(names(&rules), vec![vec!["stamp", "revision"]]);
    }

    #[test]
    fn test_empty_segments_are_rejected() {
        for bad in ["", "a..b", ".title", "title."] {
            let err = Policy::from_options(&[skip_field_names([bad])])
                .resolve::<Doc>()
                .unwrap_err();
            assert!(
                matches!(err, AssertXError::InvalidFieldName { .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let options = [skip_empty_fields(), skip_field_names(["audit.revision"])];
        let first = Policy::from_options(&options).resolve::<Doc>().unwrap();
        let second = Policy::from_options(&options).resolve::<Doc>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rules_inspect_the_want_side() {
        let empty = String::new();
        let site = FieldSite {
            path: &["title"],
            exported: true,
            want: Some(&empty),
        };
        assert!(FilterRule::SkipEmpty.ignores(&site));
        assert!(FilterRule::SkipZero.ignores(&site));
        assert!(!FilterRule::ExportedOnly.ignores(&site));

        let unpaired = FieldSite {
            path: &["title"],
            exported: false,
            want: None,
        };
        assert!(!FilterRule::SkipEmpty.ignores(&unpaired));
        assert!(!FilterRule::SkipZero.ignores(&unpaired));
        assert!(FilterRule::ExportedOnly.ignores(&unpaired));
    }
}
