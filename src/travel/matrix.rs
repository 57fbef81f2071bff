//! Dense travel-time matrix.

/// A dense n×n integer travel-time matrix, row-major.
///
/// Entries are quarter-hour travel times between cities. The matrix is
/// not required to be symmetric: base-adjacent entries may carry
/// asymmetric to-base/from-base overrides.
///
/// # Examples
///
/// ```
/// use weekplan::travel::TravelTimeMatrix;
///
/// let mut m = TravelTimeMatrix::new(2);
/// m.set(0, 1, 3);
/// m.set(1, 0, 2);
/// assert_eq!(m.get(0, 1), 3);
/// assert!(!m.is_symmetric());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelTimeMatrix {
    data: Vec<i64>,
    size: usize,
}

impl TravelTimeMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Travel time from city `from` to city `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the travel time from city `from` to city `to`.
    pub fn set(&mut self, from: usize, to: usize, time: i64) {
        self.data[from * self.size + to] = time;
    }

    /// Number of cities in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if every entry equals its transpose.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero() {
        let m = TravelTimeMatrix::new(3);
        assert_eq!(m.size(), 3);
        assert_eq!(m.get(1, 2), 0);
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_set_get() {
        let mut m = TravelTimeMatrix::new(3);
        m.set(0, 2, 7);
        assert_eq!(m.get(0, 2), 7);
        assert_eq!(m.get(2, 0), 0);
    }

    #[test]
    fn test_from_data() {
        let m = TravelTimeMatrix::from_data(2, vec![0, 5, 5, 0]).expect("valid");
        assert_eq!(m.get(0, 1), 5);
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(TravelTimeMatrix::from_data(2, vec![0, 1, 2]).is_none());
    }

    #[test]
    fn test_asymmetric() {
        let mut m = TravelTimeMatrix::new(2);
        m.set(0, 1, 10);
        m.set(1, 0, 15);
        assert!(!m.is_symmetric());
    }
}
