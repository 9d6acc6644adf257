//! Lock-step equality walk over two inspected values.

use crate::inspect::{Inspect, Shape};
use crate::policy::{FieldFilter, FieldSite};
use crate::render;
use std::collections::{HashMap, HashSet};
use std::error::Error;

/// Equality walk state for one comparison.
pub(crate) struct Walk<'f> {
    filter: &'f dyn FieldFilter,
    /// Pointer pairs whose comparison is in progress.
    visited: HashSet<(usize, usize)>,
    path: Vec<&'static str>,
}

impl<'f> Walk<'f> {
    pub(crate) fn new(filter: &'f dyn FieldFilter) -> Self {
        Self {
            filter,
            visited: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Start the walk below `path` instead of at the root.
    pub(crate) fn at(filter: &'f dyn FieldFilter, path: &[&'static str]) -> Self {
        let mut walk = Self::new(filter);
        walk.path.extend_from_slice(path);
        walk
    }

    pub(crate) fn equal(&mut self, got: &dyn Inspect, want: &dyn Inspect) -> bool {
        let got_shape = got.shape();
        let want_shape = want.shape();

        match (is_nil(&got_shape), is_nil(&want_shape)) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }
        if got.type_name() != want.type_name() {
            return false;
        }
        if let Some(equal) = got.equal_to(want) {
            return equal;
        }

        match (got_shape, want_shape) {
            (Shape::Scalar(a), Shape::Scalar(b)) => a == b,
            (Shape::Bytes(a), Shape::Bytes(b)) => a == b,
            (Shape::Seq(a), Shape::Seq(b)) | (Shape::Array(a), Shape::Array(b)) => {
                a.len() == b.len() && a.iter().zip(&b).all(|(g, w)| self.equal(*g, *w))
            }
            (Shape::Set(a), Shape::Set(b)) => self.equal_sets(&a, &b),
            (Shape::Map(a), Shape::Map(b)) => self.equal_maps(a, b),
            (Shape::Struct(a), Shape::Struct(b)) => {
                a.len() == b.len()
                    && a.iter().zip(&b).all(|(g, w)| {
                        self.path.push(w.name);
                        let site = FieldSite {
                            path: &self.path,
                            exported: w.exported,
                            want: Some(w.value),
                        };
                        let equal = self.filter.ignores(&site) || self.equal(g.value, w.value);
                        self.path.pop();
                        equal
                    })
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
                if got_addr == want_addr || !self.visited.insert(pair) {
                    return true;
                }
                let equal = self.equal(got_target, want_target);
                self.visited.remove(&pair);
                equal
            }
            (Shape::Some(g), Shape::Some(w)) => self.equal(g, w),
            (Shape::Error(g), Shape::Error(w)) => errors_equivalent(g, w),
            (Shape::Opaque(g), Shape::Opaque(w)) => g == w,
            _ => false,
        }
    }

    /// Every member of `got` pairs with a distinct equal member of `want`.
    fn equal_sets(&mut self, got: &[&dyn Inspect], want: &[&dyn Inspect]) -> bool {
        if got.len() != want.len() {
            return false;
        }
        let mut used = vec![false; want.len()];
        got.iter().all(|g| {
            let found = want
                .iter()
                .enumerate()
                .find(|(i, w)| !used[*i] && self.equal(*g, **w))
                .map(|(i, _)| i);
            match found {
                Some(i) => {
                    used[i] = true;
                    true
                }
                None => false,
            }
        })
    }

    fn equal_maps(
        &mut self,
        got: Vec<(&dyn Inspect, &dyn Inspect)>,
        want: Vec<(&dyn Inspect, &dyn Inspect)>,
    ) -> bool {
        if got.len() != want.len() {
            return false;
        }
        let want_by_key: HashMap<String, &dyn Inspect> = want
            .into_iter()
            .map(|(k, v)| (render::compact(k), v))
            .collect();
        got.into_iter().all(|(k, g)| match want_by_key.get(&render::compact(k)) {
            Some(w) => self.equal(g, *w),
            None => false,
        })
    }
}

pub(crate) fn is_nil(shape: &Shape<'_>) -> bool {
    matches!(shape, Shape::Nil)
}

/// Two errors are equivalent when they are the same value, or render the
/// same through both `Display` and `Debug`.
pub fn errors_equivalent(a: &(dyn Error + 'static), b: &(dyn Error + 'static)) -> bool {
    std::ptr::addr_eq(a as *const dyn Error, b as *const dyn Error)
        || (a.to_string() == b.to_string() && format!("{a:?}") == format!("{b:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RuleSet;
    use std::collections::{BTreeSet, HashMap};
    use std::rc::Rc;

    fn equal(got: &dyn Inspect, want: &dyn Inspect) -> bool {
        let rules = RuleSet::default();
        Walk::new(&rules).equal(got, want)
    }

    #[test]
    fn test_scalars_and_strings() {
        assert!(equal(&1u32, &1u32));
        assert!(!equal(&1u32, &2u32));
        assert!(equal(&"a".to_string(), &"a".to_string()));
        assert!(!equal(&f64::NAN, &f64::NAN));
    }

    #[test]
    fn test_distinct_pointers_to_equal_values() {
        assert!(equal(&Box::new(5u8), &Box::new(5u8)));
        assert!(equal(&Rc::new(vec![1u8]), &Rc::new(vec![1u8])));
        assert!(!equal(&Box::new(5u8), &Box::new(6u8)));
    }

    #[test]
    fn test_failed_set_candidate_does_not_leave_pointer_pair_behind() {
        let shared = Rc::new(5u8);
        let got: BTreeSet<_> = [(1u8, shared.clone(), 0u8), (1, shared, 1)].into_iter().collect();
        let want: BTreeSet<_> = [(1u8, Rc::new(4u8), 1u8), (1, Rc::new(5), 0)]
            .into_iter()
            .collect();
        assert!(!equal(&got, &want));
    }

    #[test]
    fn test_nil_handling() {
        assert!(equal(&None::<u8>, &None::<u8>));
        assert!(!equal(&None::<u8>, &Some(0u8)));
        assert!(!equal(&Some(0u8), &None::<u8>));
    }

    #[test]
    fn test_sequences_compare_by_length_and_element() {
        assert!(!equal(&vec![1u16, 2], &vec![1u16, 2, 3]));
        assert!(!equal(&vec![1u16, 2], &vec![2u16, 1]));
        assert!(equal(&[1u16, 2], &[1u16, 2]));
    }

    #[test]
    fn test_maps_and_sets_ignore_order() {
        let a: HashMap<_, _> = [("x", 1), ("y", 2)].into_iter().collect();
        let b: HashMap<_, _> = [("y", 2), ("x", 1)].into_iter().collect();
        assert!(equal(&a, &b));
        let c: HashMap<_, _> = [("y", 2), ("z", 1)].into_iter().collect();
        assert!(!equal(&a, &c));

        let s: BTreeSet<_> = [3, 1].into_iter().collect();
        let t: BTreeSet<_> = [1, 3].into_iter().collect();
        assert!(equal(&s, &t));
    }

    #[test]
    fn test_errors_equivalent_by_rendering() {
        let a = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let b = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let c = std::io::Error::new(std::io::ErrorKind::Other, "bang");
        assert!(errors_equivalent(&a, &b));
        assert!(!errors_equivalent(&a, &c));
    }
}
