//! Randomized in-place quicksort.
//!
//! Each pass picks a pivot index at random and splits the slice three ways:
//! less than, equal to and greater than the pivot. The equal run is final after
//! one pass, so inputs with many repeats cost no more than distinct ones. Only
//! the shorter side is sorted recursively; the longer side is handled by the
//! loop, keeping the stack depth logarithmic even on unlucky pivots.
//!
//! The sort is not stable.

use core::cmp::Ordering;
use core::mem;

use rand::Rng;

/// Sorts `v` in place by `T`'s [`Ord`].
///
/// # Examples
///
/// ```
/// let mut v = [5, -3, 2, 5, 0];
/// rank_skiplist::quick_sort(&mut v);
/// assert_eq!(v, [-3, 0, 2, 5, 5]);
/// ```
#[cfg(feature = "std")]
pub fn quick_sort<T: Ord>(v: &mut [T]) {
    quick_sort_by(v, T::cmp);
}

/// Sorts `v` in place with a comparator, drawing pivots from the thread RNG.
///
/// `compare` must describe a strict weak ordering, as for
/// [`slice::sort_by`]. If it does not, `v` ends up in an unspecified order
/// but every element is still present.
///
/// # Examples
///
/// ```
/// let mut words = ["pear", "fig", "banana"];
/// rank_skiplist::quick_sort_by(&mut words, |a, b| a.len().cmp(&b.len()));
/// assert_eq!(words, ["fig", "pear", "banana"]);
/// ```
#[cfg(feature = "std")]
pub fn quick_sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    quick_sort_by_with_rng(v, compare, &mut rand::rng());
}

/// Sorts `v` in place with a comparator, drawing pivots from `rng`.
///
/// Available without the `std` feature.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let mut v = [3u8, 1, 2];
/// rank_skiplist::quick_sort_by_with_rng(&mut v, |a, b| b.cmp(a), &mut rng);
/// assert_eq!(v, [3, 2, 1]);
/// ```
pub fn quick_sort_by_with_rng<T, F, R>(v: &mut [T], mut compare: F, rng: &mut R)
where
    F: FnMut(&T, &T) -> Ordering,
    R: Rng,
{
    sort(v, &mut compare, rng);
}

fn sort<T, F, R>(mut v: &mut [T], compare: &mut F, rng: &mut R)
where
    F: FnMut(&T, &T) -> Ordering,
    R: Rng,
{
    while v.len() > 1 {
        let pivot = rng.random_range(0..v.len());
        let (lt, gt) = partition(v, pivot, compare);

        let (less, rest) = mem::take(&mut v).split_at_mut(lt);
        let greater = &mut rest[gt - lt..];
        if less.len() < greater.len() {
            sort(less, compare, rng);
            v = greater;
        } else {
            sort(greater, compare, rng);
            v = less;
        }
    }
}

/// Three-way partition around `v[pivot]`.
///
/// Returns `(lt, gt)` such that `v[..lt]` orders before the pivot, `v[lt..gt]`
/// compares equal to it and `v[gt..]` orders after it. `lt < gt` always holds.
fn partition<T, F>(v: &mut [T], pivot: usize, compare: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> Ordering,
{
    // The pivot value travels with `v[lt]`, the start of the equal run.
    v.swap(0, pivot);
    let mut lt = 0;
    let mut i = 1;
    let mut gt = v.len();

    while i < gt {
        match compare(&v[i], &v[lt]) {
            Ordering::Less => {
                v.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                v.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }

    (lt, gt)
}
