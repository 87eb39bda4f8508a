use core::cmp::Ordering;
use core::ops::Index;

use super::RankedIndex;
use crate::Rank;
use crate::compare::Comparator;

impl<T, C, R> RankedIndex<T, C, R> {
    /// Returns the entry at 1-based `rank` in sorted order.
    ///
    /// Returns `None` if `rank` is 0 or greater than [`len`](Self::len).
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let index: RankedIndex<_> = [30, 10, 20].into_iter().collect();
    /// assert_eq!(index.get_by_rank(1), Some(&10));
    /// assert_eq!(index.get_by_rank(3), Some(&30));
    /// assert_eq!(index.get_by_rank(0), None);
    /// assert_eq!(index.get_by_rank(4), None);
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        self.raw.get_by_rank(rank).map(|handle| self.raw.value(handle))
    }

    /// Returns the 1-based rank of the entry matched by `probe`.
    ///
    /// `probe` follows the same contract as in [`find_by`](Self::find_by).
    pub fn rank_by<F>(&self, probe: F) -> Option<usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.raw.find_by(probe).map(|(_, rank)| rank)
    }

    /// Removes and returns the entry at 1-based `rank`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let mut index: RankedIndex<_> = (1..=5).collect();
    /// assert_eq!(index.remove_by_rank(2), Some(2));
    /// assert_eq!(index.get_by_rank(2), Some(&3));
    /// assert_eq!(index.remove_by_rank(5), None);
    /// ```
    pub fn remove_by_rank(&mut self, rank: usize) -> Option<T> {
        self.raw.remove_by_rank(rank)
    }

    /// Returns the number of leading entries for which `pred` holds.
    ///
    /// The index must be partitioned by `pred`: true for a prefix of the
    /// entries and false for the rest, as with [`slice::partition_point`].
    /// The result is therefore the number of entries ordered before the
    /// partition point, which answers "how many entries are below x" even when
    /// x itself is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let index: RankedIndex<_> = [1, 3, 5, 7].into_iter().collect();
    /// assert_eq!(index.partition_point(|&x| x < 4), 2);
    /// assert_eq!(index.partition_point(|&x| x < 100), 4);
    /// ```
    pub fn partition_point<F>(&self, pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.raw.partition_point(pred)
    }
}

impl<T, C: Comparator<T>, R> RankedIndex<T, C, R> {
    /// Returns the 1-based rank of the entry comparing equal to `value`, or
    /// `None` if there is no such entry.
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let index: RankedIndex<_> = [10, 20].into_iter().collect();
    /// assert_eq!(index.rank_of(&20), Some(2));
    /// assert_eq!(index.rank_of(&15), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, value: &T) -> Option<usize> {
        self.rank_by(|existing| self.comparator.compare(existing, value))
    }
}

/// Indexes into the index by 1-based rank.
///
/// # Panics
///
/// Panics if `rank` is 0 or greater than `len()`.
impl<T, C, R> Index<Rank> for RankedIndex<T, C, R> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        match self.get_by_rank(rank.0) {
            Some(value) => value,
            None => panic!("`RankedIndex::index()` - rank {} out of 1..={}!", rank.0, self.len()),
        }
    }
}
