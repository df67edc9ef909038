//! Time mask: intervals excluded from fitting and residual display.

use chrono::NaiveDateTime;

use crate::domain::MaskInterval;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskManager {
    intervals: Vec<MaskInterval>,
}

impl MaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_intervals(intervals: Vec<MaskInterval>) -> Self {
        Self { intervals }
    }

    pub fn add(&mut self, interval: MaskInterval) {
        self.intervals.push(interval);
    }

    /// Remove every interval. Returns how many were removed.
    pub fn reset(&mut self) -> usize {
        let n = self.intervals.len();
        self.intervals.clear();
        n
    }

    pub fn intervals(&self) -> &[MaskInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Whether `t` falls inside any interval (endpoints inclusive).
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.intervals.iter().any(|i| i.contains(t))
    }
}
