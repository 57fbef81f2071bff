//! Raw route assignment.

/// A discrete assignment: for each day, the ordered interior node
/// sequence (base excluded at both ends).
///
/// This is the object the search manipulates and the warm-start file
/// persists; timing is derived from it, never stored in it.
///
/// # Examples
///
/// ```
/// use weekplan::formulation::Assignment;
///
/// let mut a = Assignment::empty(2);
/// a.day_mut(0).push(3);
/// assert_eq!(a.day(0), &[3]);
/// assert_eq!(a.n_days(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    days: Vec<Vec<usize>>,
}

impl Assignment {
    /// An assignment with every node dropped.
    pub fn empty(n_days: usize) -> Self {
        Self {
            days: vec![Vec::new(); n_days],
        }
    }

    /// Wraps per-day interior sequences.
    pub fn from_days(days: Vec<Vec<usize>>) -> Self {
        Self { days }
    }

    /// All day sequences.
    pub fn days(&self) -> &[Vec<usize>] {
        &self.days
    }

    /// One day's interior sequence.
    pub fn day(&self, day: usize) -> &[usize] {
        &self.days[day]
    }

    /// Mutable access to one day's interior sequence.
    pub fn day_mut(&mut self, day: usize) -> &mut Vec<usize> {
        &mut self.days[day]
    }

    /// Number of days.
    pub fn n_days(&self) -> usize {
        self.days.len()
    }

    /// Total scheduled nodes across all days.
    pub fn num_scheduled(&self) -> usize {
        self.days.iter().map(|d| d.len()).sum()
    }

    /// Consumes the assignment into its per-day sequences.
    pub fn into_days(self) -> Vec<Vec<usize>> {
        self.days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let a = Assignment::empty(3);
        assert_eq!(a.n_days(), 3);
        assert_eq!(a.num_scheduled(), 0);
        assert!(a.day(2).is_empty());
    }

    #[test]
    fn test_round_trip_days() {
        let days = vec![vec![2, 5], vec![], vec![3]];
        let a = Assignment::from_days(days.clone());
        assert_eq!(a.num_scheduled(), 3);
        assert_eq!(a.into_days(), days);
    }
}
