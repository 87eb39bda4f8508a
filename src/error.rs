use thiserror::Error;

/// Why [`RankedIndex::try_insert`](crate::RankedIndex::try_insert) or
/// [`ScoredIndex::try_insert`](crate::ScoredIndex::try_insert) refused an entry.
///
/// Both variants hand the rejected entry back, and in both cases the index is
/// left exactly as it was before the call.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InsertError<T> {
    /// An entry comparing equal is already stored.
    #[error("an equal entry is already present")]
    Duplicate(T),
    /// Storage for the new node could not be allocated.
    #[error("failed to allocate storage for a new entry")]
    AllocationFailure(T),
}

impl<T> InsertError<T> {
    /// Returns the entry that was not inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_skiplist::{InsertError, RankedIndex};
    ///
    /// let mut index = RankedIndex::new();
    /// index.insert(3);
    ///
    /// let err = index.try_insert(3).unwrap_err();
    /// assert!(matches!(err, InsertError::Duplicate(_)));
    /// assert_eq!(err.into_inner(), 3);
    /// ```
    pub fn into_inner(self) -> T {
        match self {
            Self::Duplicate(value) | Self::AllocationFailure(value) => value,
        }
    }

    /// Maps the carried entry, keeping the failure kind.
    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> InsertError<U> {
        match self {
            Self::Duplicate(value) => InsertError::Duplicate(f(value)),
            Self::AllocationFailure(value) => InsertError::AllocationFailure(f(value)),
        }
    }
}
