//! Workday limits and break rules.

/// The break a day must accommodate.
///
/// The break is a fixed-duration interval whose start must fall inside
/// `[start_min, start_max]` and which may not overlap any stop's service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakRule {
    start_min: i64,
    start_max: i64,
    duration: i64,
}

impl BreakRule {
    /// Creates a break rule (quarter-hour units).
    pub fn new(start_min: i64, start_max: i64, duration: i64) -> Self {
        Self {
            start_min,
            start_max,
            duration,
        }
    }

    /// Earliest permitted break start.
    pub fn start_min(&self) -> i64 {
        self.start_min
    }

    /// Latest permitted break start.
    pub fn start_max(&self) -> i64 {
        self.start_max
    }

    /// Fixed break length.
    pub fn duration(&self) -> i64 {
        self.duration
    }
}

/// One workday: one route, one set of time limits.
///
/// All limits are cumulative quarter-hour values, on the same axis as the
/// route's time dimension. The route must start within
/// `[start_min, start_max]` and end no later than `end_max`.
///
/// # Examples
///
/// ```
/// use weekplan::models::{BreakRule, Day};
///
/// let day = Day::new(0, 4, 40).with_break(BreakRule::new(16, 20, 2));
/// assert_eq!(day.end_max(), 40);
/// assert!(day.break_rule().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    start_min: i64,
    start_max: i64,
    end_max: i64,
    brk: Option<BreakRule>,
}

impl Day {
    /// Creates a day with the given start window and end cap, no break.
    pub fn new(start_min: i64, start_max: i64, end_max: i64) -> Self {
        Self {
            start_min,
            start_max,
            end_max,
            brk: None,
        }
    }

    /// Attaches a break rule to this day.
    pub fn with_break(mut self, rule: BreakRule) -> Self {
        self.brk = Some(rule);
        self
    }

    /// Earliest permitted route start.
    pub fn start_min(&self) -> i64 {
        self.start_min
    }

    /// Latest permitted route start.
    pub fn start_max(&self) -> i64 {
        self.start_max
    }

    /// Latest permitted route end.
    pub fn end_max(&self) -> i64 {
        self.end_max
    }

    /// This day's break rule, if one is configured.
    pub fn break_rule(&self) -> Option<&BreakRule> {
        self.brk.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_without_break() {
        let d = Day::new(0, 4, 40);
        assert_eq!(d.start_min(), 0);
        assert_eq!(d.start_max(), 4);
        assert_eq!(d.end_max(), 40);
        assert!(d.break_rule().is_none());
    }

    #[test]
    fn test_day_with_break() {
        let d = Day::new(1, 2, 36).with_break(BreakRule::new(16, 20, 2));
        let b = d.break_rule().expect("break rule");
        assert_eq!(b.start_min(), 16);
        assert_eq!(b.start_max(), 20);
        assert_eq!(b.duration(), 2);
    }
}
