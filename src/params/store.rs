//! Canonical parameter registry.
//!
//! The store is the single source of truth for parameter state. Every input
//! surface (text entry, slider, command line, fit results) writes through it,
//! and every successful mutation is fanned out synchronously to subscribers.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{Bound, ClampNotice, FitOptions, FitProblem, Parameter};
use crate::error::ParamError;

/// A change notification.
#[derive(Debug, Clone, Copy)]
pub enum ParamEvent<'a> {
    /// `val` was written (and possibly clamped) by `set_value`.
    Value {
        index: usize,
        param: &'a Parameter,
        clamp: Option<ClampNotice>,
    },
    /// `min` or `max` was written.
    Bound {
        index: usize,
        param: &'a Parameter,
        bound: Bound,
    },
    /// `frozen` was written.
    Frozen { index: usize, param: &'a Parameter },
    /// Every `val` was overwritten at once (fit results).
    Bulk { params: &'a [Parameter] },
}

pub type Observer = Box<dyn FnMut(&ParamEvent<'_>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct ParameterStore {
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("params", &self.params)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ParameterStore {
    /// Build a store from the model's canonical parameter list.
    ///
    /// Later duplicates of a `full_name` shadow earlier ones in name lookups.
    pub fn new(params: Vec<Parameter>) -> Self {
        let index = params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.full_name.clone(), i))
            .collect();
        Self {
            params,
            index,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| &self.params[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    pub fn index_of(&self, name: &str) -> Result<usize, ParamError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ParamError::UnknownParameter(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.full_name.as_str())
    }

    /// Current values in canonical order.
    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.val).collect()
    }

    pub fn thawed_count(&self) -> usize {
        self.params.iter().filter(|p| !p.frozen).count()
    }

    /// Snapshot handed to a fit worker.
    pub fn problem(&self) -> FitProblem {
        FitProblem {
            parnames: self.params.iter().map(|p| p.full_name.clone()).collect(),
            parvals: self.values(),
            mins: self.params.iter().map(|p| p.min).collect(),
            maxs: self.params.iter().map(|p| p.max).collect(),
            frozen: self.params.iter().map(|p| p.frozen).collect(),
            options: FitOptions::default(),
        }
    }

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Write `val`, clamping into `[min, max]`.
    pub fn set_value(&mut self, name: &str, v: f64) -> Result<Option<ClampNotice>, ParamError> {
        let index = self.index_of(name)?;
        Ok(self.set_value_at(index, v))
    }

    /// Index-based variant of [`set_value`](Self::set_value) for row-oriented views.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_value_at(&mut self, index: usize, v: f64) -> Option<ClampNotice> {
        let param = &mut self.params[index];
        param.val = v;

        // Min is checked first so that an inverted range lands on `min`.
        // NaN compares false against both bounds, so it goes to `min` too.
        let clamp = if param.val.is_nan() || param.val < param.min {
            param.val = param.min;
            Some(ClampNotice::ToMin {
                requested: v,
                min: param.min,
            })
        } else if param.val > param.max {
            param.val = param.max;
            Some(ClampNotice::ToMax {
                requested: v,
                max: param.max,
            })
        } else {
            None
        };

        if let Some(notice) = &clamp {
            warn!(param = %param.full_name, "{notice}");
        }

        let event = ParamEvent::Value {
            index,
            param: &self.params[index],
            clamp,
        };
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
        clamp
    }

    /// Write `min` or `max`. The current `val` is left as is even if it now
    /// falls outside the new range.
    pub fn set_bound(&mut self, name: &str, which: Bound, v: f64) -> Result<(), ParamError> {
        let index = self.index_of(name)?;
        self.set_bound_at(index, which, v);
        Ok(())
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_bound_at(&mut self, index: usize, which: Bound, v: f64) {
        let param = &mut self.params[index];
        match which {
            Bound::Min => param.min = v,
            Bound::Max => param.max = v,
        }

        let event = ParamEvent::Bound {
            index,
            param: &self.params[index],
            bound: which,
        };
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }

    pub fn set_frozen(&mut self, name: &str, frozen: bool) -> Result<(), ParamError> {
        let index = self.index_of(name)?;
        self.set_frozen_at(index, frozen);
        Ok(())
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_frozen_at(&mut self, index: usize, frozen: bool) {
        self.params[index].frozen = frozen;
        let event = ParamEvent::Frozen {
            index,
            param: &self.params[index],
        };
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }

    /// Overwrite every `val` from a vector in canonical order.
    pub fn bulk_update(&mut self, values: &[f64]) -> Result<(), ParamError> {
        if values.len() != self.params.len() {
            return Err(ParamError::ShapeMismatch {
                expected: self.params.len(),
                got: values.len(),
            });
        }
        for (param, &v) in self.params.iter_mut().zip(values) {
            param.val = v;
        }

        let event = ParamEvent::Bulk {
            params: &self.params,
        };
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
        Ok(())
    }

    /// Copy `val/min/max/frozen/fmt` from `source` for every parameter whose
    /// name matches. Returns the names that were updated.
    pub fn inherit_from(&mut self, source: &[Parameter]) -> Vec<String> {
        let mut inherited = Vec::new();
        for other in source {
            let Some(&i) = self.index.get(&other.full_name) else {
                continue;
            };
            let param = &mut self.params[i];
            param.val = other.val;
            param.min = other.min;
            param.max = other.max;
            param.frozen = other.frozen;
            param.fmt = other.fmt.clone();
            inherited.push(other.full_name.clone());
        }

        if !inherited.is_empty() {
            let event = ParamEvent::Bulk {
                params: &self.params,
            };
            for (_, observer) in self.observers.iter_mut() {
                observer(&event);
            }
        }
        inherited
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn store() -> ParameterStore {
        ParameterStore::new(vec![
            Parameter::new("foo.bar", 1.0, 0.0, 10.0),
            Parameter::new("foo.baz", 5.0, -5.0, 5.0),
            Parameter::new("qux.bar", 0.5, 0.0, 1.0).frozen(true),
        ])
    }

    #[test]
    fn set_value_always_lands_inside_bounds() {
        let mut s = store();
        for v in [-1e9, -5.0, 0.0, 3.3, 10.0, 11.0, 1e12, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            s.set_value("foo.bar", v).unwrap();
            let p = s.get("foo.bar").unwrap();
            assert!(p.min <= p.val && p.val <= p.max, "v={v} -> {}", p.val);
        }
    }

    #[test]
    fn set_value_reports_clamps() {
        let mut s = store();
        assert_eq!(s.set_value("foo.bar", 4.0).unwrap(), None);
        assert!(matches!(
            s.set_value("foo.bar", -2.0).unwrap(),
            Some(ClampNotice::ToMin { .. })
        ));
        assert_eq!(s.get("foo.bar").unwrap().val, 0.0);
        assert!(matches!(
            s.set_value("foo.bar", 20.0).unwrap(),
            Some(ClampNotice::ToMax { .. })
        ));
        assert_eq!(s.get("foo.bar").unwrap().val, 10.0);
    }

    #[test]
    fn nan_lands_on_min_with_notice() {
        let mut s = store();
        let notice = s.set_value("foo.baz", f64::NAN).unwrap();
        assert!(matches!(notice, Some(ClampNotice::ToMin { min, .. }) if min == -5.0));
        assert_eq!(s.get("foo.baz").unwrap().val, -5.0);
    }

    #[test]
    fn inverted_range_resolves_to_min() {
        let mut s = store();
        s.set_bound("foo.bar", Bound::Min, 8.0).unwrap();
        s.set_bound("foo.bar", Bound::Max, 2.0).unwrap();
        let notice = s.set_value("foo.bar", 5.0).unwrap();
        assert!(matches!(notice, Some(ClampNotice::ToMin { .. })));
        assert_eq!(s.get("foo.bar").unwrap().val, 8.0);
    }

    #[test]
    fn bound_edit_does_not_reclamp_value() {
        let mut s = store();
        s.set_bound("foo.bar", Bound::Max, 0.5).unwrap();
        let p = s.get("foo.bar").unwrap();
        assert_eq!(p.max, 0.5);
        assert_eq!(p.val, 1.0);
    }

    #[test]
    fn bulk_update_shape_mismatch_leaves_values() {
        let mut s = store();
        let before = s.values();
        let err = s.bulk_update(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, ParamError::ShapeMismatch { expected: 3, got: 2 });
        assert_eq!(s.values(), before);

        s.bulk_update(&[2.0, 3.0, 0.25]).unwrap();
        assert_eq!(s.values(), vec![2.0, 3.0, 0.25]);
    }

    #[test]
    fn unknown_parameter_is_an_error() {
        let mut s = store();
        assert_eq!(
            s.set_value("nope", 1.0).unwrap_err(),
            ParamError::UnknownParameter("nope".into())
        );
        assert!(s.set_frozen("nope", true).is_err());
    }

    #[test]
    fn observers_see_every_mutation() {
        let mut s = store();
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&log);
        let id = s.subscribe(Box::new(move |event: &ParamEvent<'_>| {
            let entry = match event {
                ParamEvent::Value { index, param, clamp } => {
                    format!("value {index} {} {}", param.val, clamp.is_some())
                }
                ParamEvent::Bound { index, bound, .. } => format!("bound {index} {}", bound.label()),
                ParamEvent::Frozen { index, param } => format!("frozen {index} {}", param.frozen),
                ParamEvent::Bulk { params } => format!("bulk {}", params.len()),
            };
            sink.borrow_mut().push(entry);
        }));

        s.set_value("foo.bar", 99.0).unwrap();
        s.set_bound("foo.baz", Bound::Min, -1.0).unwrap();
        s.set_frozen("qux.bar", false).unwrap();
        s.bulk_update(&[1.0, 1.0, 1.0]).unwrap();
        assert!(s.bulk_update(&[1.0]).is_err());

        assert_eq!(
            *log.borrow(),
            vec![
                "value 0 10 true".to_string(),
                "bound 1 min".to_string(),
                "frozen 2 false".to_string(),
                "bulk 3".to_string(),
            ]
        );

        assert!(s.unsubscribe(id));
        s.set_value("foo.bar", 2.0).unwrap();
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn inherit_copies_matching_parameters() {
        let mut s = store();
        let other = vec![
            Parameter::new("foo.baz", -2.0, -3.0, 3.0)
                .frozen(true)
                .with_fmt("{:.2f}"),
            Parameter::new("missing", 1.0, 0.0, 2.0),
        ];
        let names = s.inherit_from(&other);
        assert_eq!(names, vec!["foo.baz".to_string()]);
        let p = s.get("foo.baz").unwrap();
        assert_eq!((p.val, p.min, p.max, p.frozen), (-2.0, -3.0, 3.0, true));
        assert_eq!(p.fmt, "{:.2f}");
    }

    #[test]
    fn problem_snapshot_is_in_canonical_order() {
        let s = store();
        let problem = s.problem();
        assert_eq!(problem.parnames, vec!["foo.bar", "foo.baz", "qux.bar"]);
        assert_eq!(problem.frozen, vec![false, false, true]);
        assert_eq!(problem.len(), 3);
    }
}
