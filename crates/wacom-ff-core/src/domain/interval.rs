//! Half-open stepped integer intervals.
//!
//! An [`IntervalRange`] describes the set `{start, start + step, ...}` of all
//! values strictly below `stop`.  Monitors use step 1 on both axes; the step
//! is kept general so sparse sampling grids can reuse the same type.

use std::fmt;
use std::num::NonZeroU32;

use super::geometry::GeometryError;

/// A half-open integer interval `[start, stop)` with a step.
///
/// Immutable once constructed.  The bounds are 64-bit so that
/// `offset + size` never overflows for any 32-bit monitor geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalRange {
    start: i64,
    stop: i64,
    step: u32,
}

impl IntervalRange {
    /// Creates a new interval.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptyInterval`] if `stop <= start` and
    /// [`GeometryError::ZeroStep`] if `step == 0`.
    pub fn new(start: i64, stop: i64, step: u32) -> Result<Self, GeometryError> {
        if stop <= start {
            return Err(GeometryError::EmptyInterval { start, stop });
        }
        if step == 0 {
            return Err(GeometryError::ZeroStep);
        }
        Ok(Self { start, stop, step })
    }

    /// Creates the unit-step interval `[start, start + len)`.
    ///
    /// Infallible: a non-zero length always yields a non-empty interval.
    pub fn with_len(start: i64, len: NonZeroU32) -> Self {
        Self {
            start,
            stop: start + i64::from(len.get()),
            step: 1,
        }
    }

    /// Returns `true` if `value` is a member of the interval.
    ///
    /// Membership requires `start <= value < stop` and that `value` lies on
    /// the step grid anchored at `start`.
    pub fn contains(&self, value: i64) -> bool {
        self.start <= value
            && value < self.stop
            && value.abs_diff(self.start) % u64::from(self.step) == 0
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Exclusive upper bound.
    pub fn stop(&self) -> i64 {
        self.stop
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Number of members.
    pub fn len(&self) -> u64 {
        self.stop.abs_diff(self.start).div_ceil(u64::from(self.step))
    }

    /// Always `false`; construction rejects empty intervals.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for IntervalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range({}, {}, {})", self.start, self.stop, self.step)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(start: i64, stop: i64) -> IntervalRange {
        IntervalRange::new(start, stop, 1).expect("valid interval")
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_new_rejects_stop_equal_to_start() {
        assert_eq!(
            IntervalRange::new(5, 5, 1),
            Err(GeometryError::EmptyInterval { start: 5, stop: 5 })
        );
    }

    #[test]
    fn test_new_rejects_stop_below_start() {
        assert!(IntervalRange::new(10, 0, 1).is_err());
    }

    #[test]
    fn test_new_rejects_zero_step() {
        assert_eq!(IntervalRange::new(0, 10, 0), Err(GeometryError::ZeroStep));
    }

    #[test]
    fn test_with_len_produces_unit_step_interval() {
        let range = IntervalRange::with_len(1920, NonZeroU32::new(1920).unwrap());
        assert_eq!(range, unit(1920, 3840));
    }

    // ── contains, step 1 ──────────────────────────────────────────────────────

    #[test]
    fn test_unit_step_membership_matches_half_open_bounds() {
        // For every v in a window around the interval: contains(v) == (s <= v < e)
        for (s, e) in [(0i64, 10i64), (-5, 5), (1920, 3840), (-1080, 0)] {
            let range = unit(s, e);
            for v in (s - 20)..(e + 20) {
                assert_eq!(range.contains(v), s <= v && v < e, "s={s} e={e} v={v}");
            }
        }
    }

    #[test]
    fn test_contains_includes_start_and_excludes_stop() {
        let range = unit(0, 1920);
        assert!(range.contains(0));
        assert!(range.contains(1919));
        assert!(!range.contains(1920));
        assert!(!range.contains(-1));
    }

    #[test]
    fn test_contains_is_total_at_integer_extremes() {
        let range = unit(i64::MIN, i64::MAX);
        assert!(range.contains(i64::MIN));
        assert!(range.contains(0));
        assert!(!range.contains(i64::MAX));
    }

    // ── contains, step > 1 ────────────────────────────────────────────────────

    #[test]
    fn test_stepped_membership_requires_grid_alignment() {
        for step in 2u32..=7 {
            let (s, e) = (-13i64, 29i64);
            let range = IntervalRange::new(s, e, step).unwrap();
            for v in (s - 10)..(e + 10) {
                let expected = s <= v && v < e && (v - s) % i64::from(step) == 0;
                assert_eq!(range.contains(v), expected, "step={step} v={v}");
            }
        }
    }

    #[test]
    fn test_stepped_membership_is_anchored_at_start_not_zero() {
        let range = IntervalRange::new(1, 10, 3).unwrap();
        assert!(range.contains(1));
        assert!(range.contains(4));
        assert!(range.contains(7));
        assert!(!range.contains(3));
        assert!(!range.contains(10));
    }

    // ── len / Display ─────────────────────────────────────────────────────────

    #[test]
    fn test_len_counts_members() {
        assert_eq!(unit(0, 1920).len(), 1920);
        assert_eq!(IntervalRange::new(1, 10, 3).unwrap().len(), 3);
        assert_eq!(IntervalRange::new(0, 10, 3).unwrap().len(), 4);
    }

    #[test]
    fn test_display_uses_range_notation() {
        assert_eq!(unit(0, 1080).to_string(), "range(0, 1080, 1)");
    }
}
