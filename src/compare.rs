use core::cmp::Ordering;

/// A strict weak ordering over `T`.
///
/// Every index is parameterised by one of these instead of relying on `Ord`,
/// so the same entry type can be kept in different orders. Any
/// `Fn(&T, &T) -> Ordering` closure is a comparator, and [`NaturalOrder`]
/// forwards to `Ord`.
///
/// The ordering must be irreflexive, transitive and consistent for the whole
/// time entries are stored. A comparator that breaks this will not cause
/// undefined behavior, but lookups may miss entries and ranks may be wrong.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use rank_skiplist::{Comparator, NaturalOrder};
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"ab", &"abc"), Ordering::Less);
/// assert_eq!(NaturalOrder.compare(&"ab", &"abc"), Ordering::Less);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders values by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}
