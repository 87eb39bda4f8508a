/// A one-based position in the sorted order of an index.
///
/// The smallest entry has rank 1 and the largest has rank `len()`. Indexing
/// with a rank outside that range panics; use
/// [`get_by_rank`](crate::RankedIndex::get_by_rank) for a checked lookup.
///
/// # Examples
///
/// ```
/// use rank_skiplist::{Rank, RankedIndex};
///
/// let index: RankedIndex<_> = ["b", "a", "c"].into_iter().collect();
///
/// assert_eq!(index[Rank(1)], "a");
/// assert_eq!(index[Rank(3)], "c");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
