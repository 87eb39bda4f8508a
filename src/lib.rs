//! A ranked skip list for Rust.
//!
//! This crate provides [`RankedIndex`], an ordered set built on a probabilistic
//! skip list whose forward pointers carry *span counters*: the number of
//! entries each pointer jumps over. Summing spans along a search gives an
//! entry's position for free, so besides the usual O(log n) expected insert,
//! lookup and removal you also get O(log n) rank queries:
//!
//! - [`rank_of`](RankedIndex::rank_of) - the 1-based sorted position of an entry
//! - [`get_by_rank`](RankedIndex::get_by_rank) - the entry at a sorted position
//! - Indexing by [`Rank`] - e.g., `index[Rank(1)]` for the smallest entry
//!
//! [`ScoredIndex`] layers a leaderboard-style multimap on top: entries are
//! ordered by an `i64` score, ties broken by payload, and
//! [`count_in_range`](ScoredIndex::count_in_range) counts a score range
//! without walking it.
//!
//! # Example
//!
//! ```
//! use rank_skiplist::{Rank, RankedIndex};
//!
//! let mut index = RankedIndex::new();
//! for key in [3, 1, 2, 4, 9, 10, 6, 7, 5, 8] {
//!     index.insert(key);
//! }
//!
//! assert_eq!(index.find(&7), Some(&7));
//! assert_eq!(index.rank_of(&5), Some(5));
//! assert_eq!(index[Rank(10)], 10);
//!
//! // Entries come back in order, with their ranks shifting on removal.
//! assert_eq!(index.remove(&1), Some(1));
//! assert_eq!(index.rank_of(&5), Some(4));
//! ```
//!
//! The crate also ships a small randomized quicksort: [`quick_sort`],
//! [`quick_sort_by`] and [`quick_sort_by_with_rng`].
//!
//! # Features
//!
//! - **`std`** (default) - constructors seeded from the thread RNG, and the
//!   sort entry points that draw from it. Without it the crate is `no_std` +
//!   `alloc` and every generator is passed in explicitly.
//! - **`tracing`** (default) - emits [`tracing`](https://docs.rs/tracing)
//!   events when the index changes height, rejects a duplicate or fails to
//!   allocate.
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other through generation-checked
//! handles, so the crate needs no unsafe code. Each node's height is drawn
//! once at insertion: start at 1 and promote with probability 1/4, up to 32
//! levels.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod compare;
mod error;
mod order_statistic;
mod raw;
mod sort;

pub mod ranked_index;
pub mod scored_index;

pub use compare::{Comparator, NaturalOrder};
pub use error::InsertError;
pub use order_statistic::Rank;
pub use ranked_index::RankedIndex;
pub use scored_index::{Scored, ScoredIndex};
#[cfg(feature = "std")]
pub use sort::{quick_sort, quick_sort_by};
pub use sort::quick_sort_by_with_rng;

/// Most levels any index grows to.
pub const MAX_LEVEL: usize = raw::MAX_LEVEL;
