use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::{Bound, RangeBounds};

use rand::Rng;
use rand::rngs::SmallRng;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::InsertError;
use crate::ranked_index::{self, RankedIndex};

/// An entry of a [`ScoredIndex`]: a numeric score and the payload it ranks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Scored<P> {
    /// Primary sort key.
    pub score: i64,
    /// Caller data; ordered by the index's comparator among equal scores.
    pub payload: P,
}

/// Orders entries by score, then by payload.
#[derive(Clone, Debug)]
pub(crate) struct ByScore<C>(C);

impl<C> ByScore<C> {
    fn probe<P>(&self, entry: &Scored<P>, score: i64, payload: &P) -> Ordering
    where
        C: Comparator<P>,
    {
        entry.score.cmp(&score).then_with(|| self.0.compare(&entry.payload, payload))
    }
}

impl<P, C: Comparator<P>> Comparator<Scored<P>> for ByScore<C> {
    fn compare(&self, a: &Scored<P>, b: &Scored<P>) -> Ordering {
        self.probe(a, b.score, &b.payload)
    }
}

/// A ranked multimap from `i64` scores to payloads, in the manner of a
/// leaderboard.
///
/// Several payloads may share a score; among equal scores they are ordered by
/// the comparator `C`. An insert is refused only when an entry with the same
/// score *and* an equal payload is already present.
///
/// Ranks are 1-based over the whole `(score, payload)` order.
///
/// # Examples
///
/// ```
/// use rank_skiplist::ScoredIndex;
///
/// let mut board = ScoredIndex::new();
/// board.insert(300, "carol");
/// board.insert(100, "alice");
/// board.insert(200, "bob");
/// board.insert(200, "dave");
///
/// assert_eq!(board.find(200), Some(&"bob"));
/// assert_eq!(board.rank_of(200, &"dave"), Some(3));
/// assert_eq!(board.get_by_rank(4), Some((300, &"carol")));
/// assert_eq!(board.count_in_range(150..=300), 3);
///
/// // Same score and payload: rejected.
/// assert!(!board.insert(200, "bob"));
/// ```
#[derive(Clone)]
pub struct ScoredIndex<P, C = NaturalOrder, R = SmallRng> {
    inner: RankedIndex<Scored<P>, ByScore<C>, R>,
}

/// An iterator over the `(score, payload)` pairs of a [`ScoredIndex`], in
/// order.
///
/// This `struct` is created by [`ScoredIndex::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, P> {
    inner: ranked_index::Iter<'a, Scored<P>>,
}

#[cfg(feature = "std")]
impl<P: Ord> ScoredIndex<P> {
    /// Makes a new, empty index breaking score ties by `P`'s [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

#[cfg(feature = "std")]
impl<P, C: Comparator<P>> ScoredIndex<P, C> {
    /// Makes a new, empty index breaking score ties with `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            inner: RankedIndex::with_comparator(ByScore(comparator)),
        }
    }
}

impl<P, C, R> ScoredIndex<P, C, R> {
    /// Makes a new, empty index breaking score ties with `comparator` and
    /// drawing node heights from `rng`.
    pub const fn with_comparator_and_rng(comparator: C, rng: R) -> Self {
        Self {
            inner: RankedIndex::with_comparator_and_rng(ByScore(comparator), rng),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the index holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of levels currently in use.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.inner.height()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Returns the lowest-ranked entry.
    #[must_use]
    pub fn first(&self) -> Option<(i64, &P)> {
        self.inner.first().map(Scored::as_pair)
    }

    /// Returns the highest-ranked entry.
    #[must_use]
    pub fn last(&self) -> Option<(i64, &P)> {
        self.inner.last().map(Scored::as_pair)
    }

    /// Removes and returns the lowest-ranked entry.
    pub fn pop_first(&mut self) -> Option<(i64, P)> {
        self.inner.pop_first().map(Scored::into_pair)
    }

    /// Removes and returns the highest-ranked entry.
    pub fn pop_last(&mut self) -> Option<(i64, P)> {
        self.inner.pop_last().map(Scored::into_pair)
    }

    /// Returns the first payload carrying `score`.
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    #[must_use]
    pub fn find(&self, score: i64) -> Option<&P> {
        let rank = self.inner.partition_point(|entry| entry.score < score) + 1;
        self.inner
            .get_by_rank(rank)
            .filter(|entry| entry.score == score)
            .map(|entry| &entry.payload)
    }

    /// Returns the entry at 1-based `rank`.
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(i64, &P)> {
        self.inner.get_by_rank(rank).map(Scored::as_pair)
    }

    /// Removes and returns the entry at 1-based `rank`.
    pub fn remove_by_rank(&mut self, rank: usize) -> Option<(i64, P)> {
        self.inner.remove_by_rank(rank).map(Scored::into_pair)
    }

    /// Counts the entries whose score lies in `range`.
    ///
    /// Both ends are located with a rank descent, so the cost does not depend
    /// on how many entries fall inside the range.
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::ScoredIndex;
    ///
    /// let board: ScoredIndex<_> = [(1, 'a'), (5, 'b'), (5, 'c'), (9, 'd')].into_iter().collect();
    /// assert_eq!(board.count_in_range(5..=5), 2);
    /// assert_eq!(board.count_in_range(2..9), 2);
    /// assert_eq!(board.count_in_range(..), 4);
    /// assert_eq!(board.count_in_range(10..), 0);
    /// ```
    pub fn count_in_range<B: RangeBounds<i64>>(&self, range: B) -> usize {
        let below = match range.start_bound() {
            Bound::Included(&start) => self.inner.partition_point(|entry| entry.score < start),
            Bound::Excluded(&start) => self.inner.partition_point(|entry| entry.score <= start),
            Bound::Unbounded => 0,
        };
        let through = match range.end_bound() {
            Bound::Included(&end) => self.inner.partition_point(|entry| entry.score <= end),
            Bound::Excluded(&end) => self.inner.partition_point(|entry| entry.score < end),
            Bound::Unbounded => self.len(),
        };
        through.saturating_sub(below)
    }

    /// Gets an iterator over `(score, payload)` pairs, in order.
    pub fn iter(&self) -> Iter<'_, P> {
        Iter {
            inner: self.inner.iter(),
        }
    }
}

impl<P, C, R> ScoredIndex<P, C, R>
where
    C: Comparator<P>,
    R: Rng,
{
    /// Adds `payload` under `score`.
    ///
    /// Returns `false`, dropping `payload`, if the same score already carries
    /// an equal payload.
    ///
    /// # Panics
    ///
    /// Panics if storage for the new node cannot be allocated.
    pub fn insert(&mut self, score: i64, payload: P) -> bool {
        self.inner.insert(Scored { score, payload })
    }

    /// Adds `payload` under `score`, reporting why it was not added.
    ///
    /// # Errors
    ///
    /// Hands the payload back in an [`InsertError`] if the entry is a
    /// duplicate or cannot be allocated; the index is unchanged.
    pub fn try_insert(&mut self, score: i64, payload: P) -> Result<(), InsertError<P>> {
        self.inner
            .try_insert(Scored { score, payload })
            .map_err(|error| error.map(|entry| entry.payload))
    }

    /// Removes the entry with `score` and a payload equal to `payload`.
    pub fn remove(&mut self, score: i64, payload: &P) -> Option<P> {
        let (raw, by_score) = self.inner.parts_mut();
        raw.remove_by(|entry| by_score.probe(entry, score, payload)).map(|entry| entry.payload)
    }

    /// Returns `true` if `score` carries a payload equal to `payload`.
    #[must_use]
    pub fn contains(&self, score: i64, payload: &P) -> bool {
        self.rank_of(score, payload).is_some()
    }

    /// Returns the 1-based rank of the `(score, payload)` entry.
    #[must_use]
    pub fn rank_of(&self, score: i64, payload: &P) -> Option<usize> {
        let by_score = self.inner.comparator();
        self.inner.rank_by(|entry| by_score.probe(entry, score, payload))
    }
}

impl<P, C: Comparator<P>, R> ScoredIndex<P, C, R> {
    /// Runs the structural checks under the score-then-payload order.
    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) {
        self.inner.validate_invariants();
    }
}

impl<P> Scored<P> {
    fn as_pair(&self) -> (i64, &P) {
        (self.score, &self.payload)
    }

    fn into_pair(self) -> (i64, P) {
        (self.score, self.payload)
    }
}

impl<P: fmt::Debug, C, R> fmt::Debug for ScoredIndex<P, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "std")]
impl<P: Ord> Default for ScoredIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl<P: Ord> FromIterator<(i64, P)> for ScoredIndex<P> {
    fn from_iter<I: IntoIterator<Item = (i64, P)>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<P, C, R> Extend<(i64, P)> for ScoredIndex<P, C, R>
where
    C: Comparator<P>,
    R: Rng,
{
    fn extend<I: IntoIterator<Item = (i64, P)>>(&mut self, iter: I) {
        for (score, payload) in iter {
            self.insert(score, payload);
        }
    }
}

impl<'a, P, C, R> IntoIterator for &'a ScoredIndex<P, C, R> {
    type Item = (i64, &'a P);
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Iter<'a, P> {
        self.iter()
    }
}

impl<'a, P> Iterator for Iter<'a, P> {
    type Item = (i64, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Scored::as_pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<P> DoubleEndedIterator for Iter<'_, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Scored::as_pair)
    }
}

impl<P> ExactSizeIterator for Iter<'_, P> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<P> FusedIterator for Iter<'_, P> {}

impl<P> Clone for Iter<'_, P> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}
