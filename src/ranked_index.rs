use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use rand::Rng;
use rand::rngs::SmallRng;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::InsertError;
use crate::raw::{Handle, RawRankedIndex};

mod capacity;
mod order_statistic;

/// An ordered index based on a [skip list] with span counters.
///
/// Entries are kept in the order defined by the index's [`Comparator`]. Besides
/// the usual insert, lookup and removal, every forward pointer records how many
/// entries it skips, which makes rank queries ([`rank_of`], [`get_by_rank`])
/// as cheap as a lookup: O(log n) expected.
///
/// The index has set semantics: an entry comparing [`Equal`](Ordering::Equal)
/// to one already stored is rejected. Ranks are **1-based**, so the smallest
/// entry has rank 1.
///
/// Node heights are drawn from the random number generator `R`. By default a
/// [`SmallRng`] seeded from the thread RNG is used; pass a seeded generator to
/// [`with_comparator_and_rng`] for reproducible layouts.
///
/// It is a logic error for an entry to be modified in such a way that its
/// ordering relative to any other entry changes while it is in the index.
/// The behavior resulting from such a logic error is not specified, but will
/// not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use rank_skiplist::RankedIndex;
///
/// let mut index = RankedIndex::new();
/// for key in [3, 1, 2, 4, 9, 10, 6, 7, 5, 8] {
///     assert!(index.insert(key));
/// }
///
/// assert_eq!(index.find(&7), Some(&7));
/// assert_eq!(index.find(&11), None);
/// assert_eq!(index.rank_of(&5), Some(5));
/// assert_eq!(index.get_by_rank(1), Some(&1));
///
/// let in_order: Vec<_> = index.iter().copied().collect();
/// assert_eq!(in_order, (1..=10).collect::<Vec<_>>());
/// ```
///
/// Ordering by a closure:
///
/// ```
/// use rank_skiplist::RankedIndex;
///
/// // Longest word first, ties broken alphabetically.
/// let mut words: RankedIndex<&str, _> = RankedIndex::with_comparator(|a: &&str, b: &&str| {
///     b.len().cmp(&a.len()).then_with(|| a.cmp(b))
/// });
/// words.extend(["fig", "banana", "kiwi", "apple"]);
///
/// assert_eq!(words.first(), Some(&"banana"));
/// assert_eq!(words.rank_of(&"kiwi"), Some(3));
/// ```
///
/// [skip list]: https://en.wikipedia.org/wiki/Skip_list
/// [`rank_of`]: RankedIndex::rank_of
/// [`get_by_rank`]: RankedIndex::get_by_rank
/// [`with_comparator_and_rng`]: RankedIndex::with_comparator_and_rng
#[derive(Clone)]
pub struct RankedIndex<T, C = NaturalOrder, R = SmallRng> {
    raw: RawRankedIndex<T>,
    comparator: C,
    rng: R,
}

/// An iterator over the entries of a [`RankedIndex`], in order.
///
/// This `struct` is created by [`RankedIndex::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    raw: &'a RawRankedIndex<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

#[cfg(feature = "std")]
impl<T: Ord> RankedIndex<T> {
    /// Makes a new, empty index ordered by `T`'s [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let mut index = RankedIndex::new();
    /// index.insert("a");
    /// assert_eq!(index.len(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

#[cfg(feature = "std")]
impl<T, C: Comparator<T>> RankedIndex<T, C> {
    /// Makes a new, empty index ordered by `comparator`.
    ///
    /// The level generator is seeded from the thread-local RNG.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        use rand::SeedableRng;

        Self::with_comparator_and_rng(comparator, SmallRng::from_rng(&mut rand::rng()))
    }
}

impl<T, C, R> RankedIndex<T, C, R> {
    /// Makes a new, empty index ordered by `comparator`, drawing node heights
    /// from `rng`.
    ///
    /// Two indexes built with equally seeded generators and fed the same
    /// operations end up with identical layouts.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::SmallRng;
    /// use rank_skiplist::{NaturalOrder, RankedIndex};
    ///
    /// let rng = SmallRng::seed_from_u64(12345);
    /// let mut index = RankedIndex::with_comparator_and_rng(NaturalOrder, rng);
    /// index.insert(1u64);
    /// assert!(index.contains(&1));
    /// ```
    pub const fn with_comparator_and_rng(comparator: C, rng: R) -> Self {
        Self {
            raw: RawRankedIndex::new(),
            comparator,
            rng,
        }
    }

    /// Returns the number of entries in the index.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the index contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of levels currently in use.
    ///
    /// This is 1 for an empty index and never exceeds 32. It grows when a
    /// taller node is inserted and shrinks when the last node on the top level
    /// is removed.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.raw.level()
    }

    /// Returns the comparator that orders this index.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes every entry.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let mut index: RankedIndex<_> = (0..100).collect();
    /// index.clear();
    /// assert!(index.is_empty());
    /// assert_eq!(index.height(), 1);
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest entry.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|handle| self.raw.value(handle))
    }

    /// Returns the largest entry.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|handle| self.raw.value(handle))
    }

    /// Removes and returns the smallest entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let mut index: RankedIndex<_> = [2, 1].into_iter().collect();
    /// assert_eq!(index.pop_first(), Some(1));
    /// assert_eq!(index.pop_first(), Some(2));
    /// assert_eq!(index.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.remove_by_rank(1)
    }

    /// Removes and returns the largest entry.
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.remove_by_rank(self.raw.len())
    }

    /// Looks up an entry with a probe instead of a full entry.
    ///
    /// `probe` tells how a stored entry compares to the target and must agree
    /// with the index's comparator, the way [`slice::binary_search_by`] does.
    /// This allows searching by part of an entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let mut users = RankedIndex::new();
    /// users.insert((42, "ada"));
    /// users.insert((7, "brian"));
    ///
    /// assert_eq!(users.find_by(|(id, _)| id.cmp(&42)), Some(&(42, "ada")));
    /// assert_eq!(users.find_by(|(id, _)| id.cmp(&8)), None);
    /// ```
    pub fn find_by<F>(&self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.raw.find_by(probe).map(|(handle, _)| self.raw.value(handle))
    }

    /// Removes the entry matched by `probe`; see [`find_by`](Self::find_by).
    pub fn remove_by<F>(&mut self, probe: F) -> Option<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.raw.remove_by(probe)
    }

    /// Gets an iterator over the entries, in order.
    ///
    /// The iterator is double-ended: it walks forward from the head and
    /// backward from the tail.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let index: RankedIndex<_> = [3, 1, 2].into_iter().collect();
    /// let mut iter = index.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next_back(), Some(&3));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) per step.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            raw: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut RawRankedIndex<T>, &C) {
        (&mut self.raw, &self.comparator)
    }

    /// Runs the structural checks under this index's own comparator.
    #[cfg(test)]
    pub(crate) fn validate_invariants(&self)
    where
        C: Comparator<T>,
    {
        self.raw.validate_invariants(|a, b| self.comparator.compare(a, b));
    }
}

impl<T, C, R> RankedIndex<T, C, R>
where
    C: Comparator<T>,
    R: Rng,
{
    /// Adds an entry to the index.
    ///
    /// Returns `false` if an entry comparing equal is already present, in
    /// which case `value` is dropped and the index is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if storage for the new node cannot be allocated. Use
    /// [`try_insert`](Self::try_insert) to handle that case.
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
    /// let mut index = RankedIndex::new();
    /// assert!(index.insert(2));
    /// assert!(!index.insert(2));
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        match self.try_insert(value) {
            Ok(()) => true,
            Err(InsertError::Duplicate(_)) => false,
            Err(InsertError::AllocationFailure(_)) => {
                panic!("`RankedIndex::insert()` - cannot allocate a node (len = {})", self.len())
            }
        }
    }

    /// Adds an entry to the index, reporting why it was not added.
    ///
    /// On failure the entry is handed back inside the [`InsertError`] and the
    /// index is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`InsertError::Duplicate`] if an entry comparing equal is present.
    /// - [`InsertError::AllocationFailure`] if node storage cannot be
    ///   allocated.
    pub fn try_insert(&mut self, value: T) -> Result<(), InsertError<T>> {
        let comparator = &self.comparator;
        self.raw
            .try_insert(value, |a, b| comparator.compare(a, b), &mut self.rng)
            .map(|_| ())
    }

    /// Returns the stored entry comparing equal to `value`.
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    #[must_use]
    pub fn find(&self, value: &T) -> Option<&T> {
        self.find_by(|existing| self.comparator.compare(existing, value))
    }

    /// Returns `true` if an entry comparing equal to `value` is stored.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Removes the entry comparing equal to `value` and returns it.
    ///
    /// Returns `None`, leaving the index untouched, if there is no such entry.
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
    /// let mut index: RankedIndex<_> = (1..=3).collect();
    /// assert_eq!(index.remove(&2), Some(2));
    /// assert_eq!(index.remove(&2), None);
    /// assert_eq!(index.len(), 2);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let comparator = &self.comparator;
        self.raw.remove_by(|existing| comparator.compare(existing, value))
    }
}

impl<T: fmt::Debug, C, R> fmt::Debug for RankedIndex<T, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C, R> PartialEq for RankedIndex<T, C, R> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C, R> Eq for RankedIndex<T, C, R> {}

#[cfg(feature = "std")]
impl<T: Ord> Default for RankedIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl<T: Ord> FromIterator<T> for RankedIndex<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<T, C, R> Extend<T> for RankedIndex<T, C, R>
where
    C: Comparator<T>,
    R: Rng,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C, R> IntoIterator for &'a RankedIndex<T, C, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.front = self.raw.next(handle);
        self.remaining -= 1;
        Some(self.raw.value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.back = self.raw.prev(handle);
        self.remaining -= 1;
        Some(self.raw.value(handle))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
