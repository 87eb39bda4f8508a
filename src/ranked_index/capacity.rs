use alloc::collections::TryReserveError;

use super::RankedIndex;
#[cfg(feature = "std")]
use crate::compare::NaturalOrder;
use crate::raw::RawRankedIndex;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;

#[cfg(feature = "std")]
impl<T: Ord> RankedIndex<T> {
    /// Creates an empty index with node storage for at least `capacity`
    /// entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let index: RankedIndex<i32> = RankedIndex::with_capacity(16);
    /// assert!(index.is_empty());
    /// assert!(index.capacity() >= 16);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        use rand::SeedableRng;

        Self::with_capacity_comparator_and_rng(capacity, NaturalOrder, SmallRng::from_rng(&mut rand::rng()))
    }
}

impl<T, C, R> RankedIndex<T, C, R> {
    /// Creates an empty index ordered by `comparator`, drawing node heights
    /// from `rng`, with node storage for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::SmallRng;
    /// use rank_skiplist::{NaturalOrder, RankedIndex};
    ///
    /// let index: RankedIndex<u8, _, _> =
    ///     RankedIndex::with_capacity_comparator_and_rng(8, NaturalOrder, SmallRng::seed_from_u64(1));
    /// assert!(index.capacity() >= 8);
    /// ```
    #[must_use]
    pub fn with_capacity_comparator_and_rng(capacity: usize, comparator: C, rng: R) -> Self {
        Self {
            raw: RawRankedIndex::with_capacity(capacity),
            comparator,
            rng,
        }
    }

    /// Returns how many entries the index can hold without reallocating its
    /// node storage.
    ///
    /// Tall nodes keep their upper links on the heap, so inserting within
    /// capacity can still allocate.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves node storage for at least `additional` more entries.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(error) = self.try_reserve(additional) {
            panic!("`RankedIndex::reserve()` - {error}!");
        }
    }

    /// Tries to reserve node storage for at least `additional` more entries.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the storage cannot be reserved; the
    /// index is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::RankedIndex;
    ///
    /// let mut index: RankedIndex<u8> = RankedIndex::new();
    /// index.try_reserve(10).expect("reserve failed");
    /// assert!(index.capacity() >= 10);
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.raw.try_reserve(additional)
    }
}
