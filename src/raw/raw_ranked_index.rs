use core::cmp::Ordering;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Link, MAX_LEVEL, Node, random_height};
use crate::error::InsertError;

/// The span-counting skip list backing both public index types.
///
/// The core never stores an ordering function. Lookups take a *probe*, a
/// closure telling how a stored entry compares to the target, so every public
/// face can supply its own composite ordering.
#[derive(Clone)]
pub(crate) struct RawRankedIndex<T> {
    /// Arena owning every node.
    nodes: Arena<Node<T>>,
    /// Head sentinel links, one per possible level.
    head: [Link; MAX_LEVEL],
    /// Last node in level-0 order.
    tail: Option<Handle>,
    /// Number of levels in use, `1..=MAX_LEVEL`.
    level: usize,
    /// Number of entries.
    len: usize,
}

/// Predecessors recorded by a descent.
///
/// `update[i]` is the last node visited at level `i` (`None` is the head) and
/// `rank[i]` is the number of level-0 hops from the head to it.
pub(crate) struct SearchPath {
    update: [Option<Handle>; MAX_LEVEL],
    rank: [usize; MAX_LEVEL],
}

impl SearchPath {
    const fn new() -> Self {
        Self {
            update: [None; MAX_LEVEL],
            rank: [0; MAX_LEVEL],
        }
    }

    /// Number of entries strictly before the search target.
    #[inline]
    pub(crate) const fn preceding(&self) -> usize {
        self.rank[0]
    }
}

impl<T> RawRankedIndex<T> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            head: [Link { next: None, span: 0 }; MAX_LEVEL],
            tail: None,
            level: 1,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            ..Self::new()
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) const fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), alloc::collections::TryReserveError> {
        self.nodes.try_reserve(additional)
    }

    /// Releases every node and returns to the empty single-level shape.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = [Link::default(); MAX_LEVEL];
        self.tail = None;
        self.level = 1;
        self.len = 0;
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.head[0].next
    }

    pub(crate) const fn last(&self) -> Option<Handle> {
        self.tail
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &T {
        &self.nodes.get(handle).value
    }

    #[inline]
    pub(crate) fn next(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).links[0].next
    }

    #[inline]
    pub(crate) fn prev(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).prev
    }

    /// The link leaving `from` (the head when `None`) at `level`.
    #[inline]
    fn link(&self, from: Option<Handle>, level: usize) -> Link {
        match from {
            Some(handle) => self.nodes.get(handle).links[level],
            None => self.head[level],
        }
    }

    #[inline]
    fn link_mut(&mut self, from: Option<Handle>, level: usize) -> &mut Link {
        match from {
            Some(handle) => &mut self.nodes.get_mut(handle).links[level],
            None => &mut self.head[level],
        }
    }

    /// Last-less-than descent: at every level advance while `before` holds for
    /// the next entry, then drop a level without restarting from the head.
    fn descend<F>(&self, mut before: F) -> SearchPath
    where
        F: FnMut(&T) -> bool,
    {
        let mut path = SearchPath::new();
        let mut cursor = None;
        let mut rank = 0;

        for level in (0..self.level).rev() {
            loop {
                let link = self.link(cursor, level);
                match link.next {
                    Some(next) if before(self.value(next)) => {
                        rank += link.span;
                        cursor = Some(next);
                    }
                    _ => break,
                }
            }
            path.update[level] = cursor;
            path.rank[level] = rank;
        }

        path
    }

    /// Descends to the predecessors of the first entry the probe does not
    /// order strictly before the target.
    pub(crate) fn search_by<F>(&self, mut probe: F) -> SearchPath
    where
        F: FnMut(&T) -> Ordering,
    {
        self.descend(|value| probe(value) == Ordering::Less)
    }

    /// Descends to the predecessors of the entry at 1-based `rank`.
    pub(crate) fn search_by_rank(&self, rank: usize) -> SearchPath {
        let mut path = SearchPath::new();
        let mut cursor = None;
        let mut traversed = 0;

        for level in (0..self.level).rev() {
            loop {
                let link = self.link(cursor, level);
                match link.next {
                    Some(next) if traversed + link.span < rank => {
                        traversed += link.span;
                        cursor = Some(next);
                    }
                    _ => break,
                }
            }
            path.update[level] = cursor;
            path.rank[level] = traversed;
        }

        path
    }

    /// The level-0 successor of the search target's predecessor.
    #[inline]
    pub(crate) fn successor(&self, path: &SearchPath) -> Option<Handle> {
        self.link(path.update[0], 0).next
    }

    /// Finds the entry the probe reports as `Equal`, with its 1-based rank.
    pub(crate) fn find_by<F>(&self, mut probe: F) -> Option<(Handle, usize)>
    where
        F: FnMut(&T) -> Ordering,
    {
        let path = self.search_by(&mut probe);
        let candidate = self.successor(&path)?;
        (probe(self.value(candidate)) == Ordering::Equal).then_some((candidate, path.preceding() + 1))
    }

    /// Returns the node at 1-based `rank`.
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<Handle> {
        if rank == 0 || rank > self.len {
            return None;
        }
        let path = self.search_by_rank(rank);
        debug_assert_eq!(path.preceding(), rank - 1, "span sum disagrees with requested rank");
        self.successor(&path)
    }

    /// Counts the leading entries for which `pred` holds.
    ///
    /// `pred` must be true for a prefix of the sequence and false afterwards.
    pub(crate) fn partition_point<F>(&self, pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.descend(pred).preceding()
    }

    /// Inserts `value` unless an entry comparing `Equal` is present.
    ///
    /// The node and its link array are allocated before any link or span is
    /// touched, so both error outcomes leave the index exactly as it was.
    pub(crate) fn try_insert<F, R>(&mut self, value: T, mut compare: F, rng: &mut R) -> Result<Handle, InsertError<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
        R: rand::Rng,
    {
        let path = self.search_by(|existing| compare(existing, &value));
        if let Some(next) = self.successor(&path)
            && compare(self.value(next), &value) == Ordering::Equal
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(rank = path.preceding() + 1, "insert rejected: equal entry present");
            return Err(InsertError::Duplicate(value));
        }

        let height = random_height(rng);
        self.link_new(path, value, height)
    }

    /// Splices a new node of `height` levels after the predecessors in `path`.
    pub(crate) fn link_new(&mut self, mut path: SearchPath, value: T, height: usize) -> Result<Handle, InsertError<T>> {
        let node = Node::try_new(value, height).map_err(|value| {
            #[cfg(feature = "tracing")]
            tracing::warn!(height, "insert failed: cannot allocate node links");
            InsertError::AllocationFailure(value)
        })?;
        let handle = self.nodes.try_alloc(node).map_err(|node| {
            #[cfg(feature = "tracing")]
            tracing::warn!(len = self.len, "insert failed: cannot allocate node slot");
            InsertError::AllocationFailure(node.value)
        })?;

        if height > self.level {
            for level in self.level..height {
                path.update[level] = None;
                path.rank[level] = 0;
                self.head[level] = Link {
                    next: None,
                    span: self.len,
                };
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(from = self.level, to = height, "index level grew");
            self.level = height;
        }

        let rank = path.rank[0];
        for level in 0..height {
            let pred = path.update[level];
            let before = self.link(pred, level);
            let gap = rank - path.rank[level];
            self.nodes.get_mut(handle).links[level] = Link {
                next: before.next,
                span: before.span - gap,
            };
            *self.link_mut(pred, level) = Link {
                next: Some(handle),
                span: gap + 1,
            };
        }

        for level in height..self.level {
            self.link_mut(path.update[level], level).span += 1;
        }

        match self.next(handle) {
            Some(next) => self.nodes.get_mut(next).prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.nodes.get_mut(handle).prev = path.update[0];
        self.len += 1;

        Ok(handle)
    }

    /// Removes the entry the probe reports as `Equal`.
    pub(crate) fn remove_by<F>(&mut self, mut probe: F) -> Option<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let path = self.search_by(&mut probe);
        let target = self.successor(&path)?;
        if probe(self.value(target)) != Ordering::Equal {
            return None;
        }
        Some(self.unlink(&path, target))
    }

    /// Removes the entry at 1-based `rank`.
    pub(crate) fn remove_by_rank(&mut self, rank: usize) -> Option<T> {
        if rank == 0 || rank > self.len {
            return None;
        }
        let path = self.search_by_rank(rank);
        let target = self.successor(&path)?;
        Some(self.unlink(&path, target))
    }

    /// Splices `target` out of every level and hands its entry back.
    fn unlink(&mut self, path: &SearchPath, target: Handle) -> T {
        for level in 0..self.level {
            let pred = path.update[level];
            let before = self.link(pred, level);
            if before.next == Some(target) {
                let removed = self.nodes.get(target).links[level];
                *self.link_mut(pred, level) = Link {
                    next: removed.next,
                    span: before.span + removed.span - 1,
                };
            } else {
                self.link_mut(pred, level).span -= 1;
            }
        }

        let node = self.nodes.take(target);
        match node.links[0].next {
            Some(next) => self.nodes.get_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }

        #[cfg(feature = "tracing")]
        let previous_level = self.level;
        while self.level > 1 && self.head[self.level - 1].next.is_none() {
            self.level -= 1;
        }
        #[cfg(feature = "tracing")]
        if self.level != previous_level {
            tracing::trace!(from = previous_level, to = self.level, "index level shrank");
        }

        self.len -= 1;
        node.value
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
mod tests {
    use super::*;
    use alloc::collections::{BTreeMap, BTreeSet};
    use alloc::string::String;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    impl<T> RawRankedIndex<T> {
        /// Checks every structural invariant, panicking with all violations found.
        ///
        /// `compare` is the order the index was built with; neighbours must be
        /// strictly increasing under it.
        pub(crate) fn validate_invariants<F>(&self, mut compare: F)
        where
            F: FnMut(&T, &T) -> Ordering,
        {
            let mut errors: Vec<String> = Vec::new();

            // Level-0 chain, its ranks, order, back links and tail.
            let mut order: Vec<Handle> = Vec::new();
            let mut cursor = self.head[0].next;
            let mut prev: Option<Handle> = None;
            while let Some(handle) = cursor {
                if self.prev(handle) != prev {
                    errors.push(alloc::format!("prev mismatch at rank {}", order.len() + 1));
                }
                if let Some(p) = prev
                    && compare(self.value(p), self.value(handle)) != Ordering::Less
                {
                    errors.push(alloc::format!("order violated at rank {}", order.len() + 1));
                }
                order.push(handle);
                prev = Some(handle);
                cursor = self.next(handle);
            }
            if self.tail != prev {
                errors.push(alloc::format!("tail mismatch: {:?} vs {:?}", self.tail, prev));
            }
            if order.len() != self.len {
                errors.push(alloc::format!("len mismatch: stored {}, counted {}", self.len, order.len()));
            }
            if self.nodes.len() != self.len {
                errors.push(alloc::format!("arena holds {} nodes for len {}", self.nodes.len(), self.len));
            }

            let ranks: BTreeMap<Handle, usize> = order.iter().enumerate().map(|(i, &h)| (h, i + 1)).collect();
            let rank_of = |handle: Handle| ranks.get(&handle).copied();

            // Every level: spans count level-0 hops, chains are subsequences.
            for level in 0..self.level {
                let mut from: Option<Handle> = None;
                let mut from_rank = 0;
                loop {
                    let link = self.link(from, level);
                    match link.next {
                        Some(next) => {
                            let Some(next_rank) = rank_of(next) else {
                                errors.push(alloc::format!("level {level} reaches a node off level 0"));
                                break;
                            };
                            if next_rank <= from_rank {
                                errors.push(alloc::format!("level {level} goes backwards at rank {next_rank}"));
                                break;
                            }
                            if link.span != next_rank - from_rank {
                                errors.push(alloc::format!(
                                    "level {level} span from rank {from_rank}: stored {}, counted {}",
                                    link.span,
                                    next_rank - from_rank
                                ));
                            }
                            if self.nodes.get(next).height() <= level {
                                errors.push(alloc::format!("level {level} links a node of lower height"));
                            }
                            from = Some(next);
                            from_rank = next_rank;
                        }
                        None => {
                            if link.span != self.len - from_rank {
                                errors.push(alloc::format!(
                                    "level {level} tail span from rank {from_rank}: stored {}, expected {}",
                                    link.span,
                                    self.len - from_rank
                                ));
                            }
                            break;
                        }
                    }
                }
            }

            // Level bookkeeping.
            if !(1..=MAX_LEVEL).contains(&self.level) {
                errors.push(alloc::format!("level {} out of range", self.level));
            }
            if self.level > 1 && self.head[self.level - 1].next.is_none() {
                errors.push(alloc::format!("top level {} is empty", self.level));
            }
            for level in self.level..MAX_LEVEL {
                if self.head[level].next.is_some() {
                    errors.push(alloc::format!("unused level {level} is linked"));
                }
            }

            assert!(errors.is_empty(), "Index invariant violations:\n{}", errors.join("\n"));
        }
    }

    impl<T: Ord> RawRankedIndex<T> {

        fn values(&self) -> Vec<&T> {
            let mut out = Vec::new();
            let mut cursor = self.first();
            while let Some(handle) = cursor {
                out.push(self.value(handle));
                cursor = self.next(handle);
            }
            out
        }

        fn insert_with(&mut self, value: T, rng: &mut SmallRng) -> bool {
            self.try_insert(value, Ord::cmp, rng).is_ok()
        }

        fn remove_value(&mut self, value: &T) -> Option<T> {
            self.remove_by(|existing| existing.cmp(value))
        }
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(12345)
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        RemoveRank(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..1000).prop_map(Op::Insert),
            3 => (0i32..1000).prop_map(Op::Remove),
            1 => (0usize..300).prop_map(Op::RemoveRank),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400), seed in any::<u64>()) {
            let mut index = RawRankedIndex::new();
            let mut model = BTreeSet::new();
            let mut rng = SmallRng::seed_from_u64(seed);

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        prop_assert_eq!(index.insert_with(key, &mut rng), model.insert(key));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(index.remove_value(&key), model.take(&key));
                    }
                    Op::RemoveRank(rank) => {
                        let expected = rank.checked_sub(1).and_then(|i| model.iter().nth(i).copied());
                        if let Some(key) = expected {
                            model.remove(&key);
                        }
                        prop_assert_eq!(index.remove_by_rank(rank), expected);
                    }
                }
                index.validate_invariants(Ord::cmp);
            }

            let expected: Vec<&i32> = model.iter().collect();
            prop_assert_eq!(index.values(), expected);
        }

        #[test]
        fn rank_round_trip(keys in prop::collection::vec(-500i32..500, 1..200)) {
            let mut index = RawRankedIndex::new();
            let mut rng = rng();
            for key in keys {
                index.insert_with(key, &mut rng);
            }
            index.validate_invariants(Ord::cmp);

            for rank in 1..=index.len() {
                let handle = index.get_by_rank(rank).expect("rank within bounds");
                let value = *index.value(handle);
                let (found, found_rank) = index.find_by(|existing| existing.cmp(&value)).expect("present");
                prop_assert_eq!(found, handle);
                prop_assert_eq!(found_rank, rank);
            }
            prop_assert!(index.get_by_rank(0).is_none());
            prop_assert!(index.get_by_rank(index.len() + 1).is_none());
        }

        #[test]
        fn partition_point_counts_prefix(keys in prop::collection::vec(-500i32..500, 0..200), pivot in -600i32..600) {
            let mut index = RawRankedIndex::new();
            let mut rng = rng();
            let mut model = BTreeSet::new();
            for key in keys {
                index.insert_with(key, &mut rng);
                model.insert(key);
            }

            let expected = model.iter().filter(|&&key| key < pivot).count();
            prop_assert_eq!(index.partition_point(|&key| key < pivot), expected);
        }
    }

    #[test]
    fn empty_index_shape() {
        let index: RawRankedIndex<i32> = RawRankedIndex::new();
        index.validate_invariants(Ord::cmp);
        assert_eq!(index.level(), 1);
        assert!(index.first().is_none());
        assert!(index.last().is_none());
        assert!(index.get_by_rank(1).is_none());
        assert!(index.find_by(|existing| existing.cmp(&0)).is_none());
    }

    #[test]
    fn spans_follow_hand_built_heights() {
        // Heights chosen so every splice case occurs: new top levels, taller
        // and shorter neighbours, insertion at both ends and in the middle.
        let mut index = RawRankedIndex::new();
        for (value, height) in [(50, 1), (10, 3), (90, 2), (30, 4), (70, 1), (20, 2), (80, 5)] {
            let path = index.search_by(|existing: &i32| existing.cmp(&value));
            index.link_new(path, value, height).unwrap();
            index.validate_invariants(Ord::cmp);
        }
        assert_eq!(index.level(), 5);
        assert_eq!(index.values(), [&10, &20, &30, &50, &70, &80, &90]);

        // The head's top link skips straight to 80, the sixth entry.
        assert_eq!(index.head[4].span, 6);
        assert_eq!(index.head[3].span, 3);

        assert_eq!(index.remove_value(&80), Some(80));
        index.validate_invariants(Ord::cmp);
        assert_eq!(index.level(), 4);

        assert_eq!(index.remove_value(&30), Some(30));
        index.validate_invariants(Ord::cmp);
        assert_eq!(index.level(), 3);
    }

    #[test]
    fn validation_follows_the_build_order() {
        let mut index = RawRankedIndex::new();
        let mut rng = rng();
        for key in [1, 5, 3, 9, 7] {
            assert!(index.try_insert(key, |a: &i32, b: &i32| b.cmp(a), &mut rng).is_ok());
        }
        assert_eq!(index.values(), [&9, &7, &5, &3, &1]);
        index.validate_invariants(|a: &i32, b: &i32| b.cmp(a));
    }

    #[test]
    #[should_panic(expected = "order violated at rank 2")]
    fn validation_rejects_misordered_neighbours() {
        let mut index = RawRankedIndex::new();
        let mut rng = rng();
        for key in [1, 5, 3] {
            assert!(index.try_insert(key, |a: &i32, b: &i32| b.cmp(a), &mut rng).is_ok());
        }
        index.validate_invariants(Ord::cmp);
    }

    #[test]
    fn duplicate_insert_leaves_index_untouched() {
        let mut index = RawRankedIndex::new();
        let mut rng = rng();
        for key in [5, 1, 9] {
            assert!(index.insert_with(key, &mut rng));
        }

        let before = index.values().into_iter().copied().collect::<Vec<_>>();
        match index.try_insert(5, Ord::cmp, &mut rng) {
            Err(InsertError::Duplicate(value)) => assert_eq!(value, 5),
            _ => panic!("expected duplicate rejection"),
        }
        index.validate_invariants(Ord::cmp);
        assert_eq!(index.values().into_iter().copied().collect::<Vec<_>>(), before);
    }

    #[test]
    fn exhausted_arena_rejects_without_mutation() {
        let mut index = RawRankedIndex::new();
        let mut rng = rng();
        let capacity = Handle::MAX_SLOT as i32 + 1;
        for key in 0..capacity {
            assert!(index.insert_with(key * 2, &mut rng));
        }
        let level = index.level();

        match index.try_insert(7, Ord::cmp, &mut rng) {
            Err(InsertError::AllocationFailure(value)) => assert_eq!(value, 7),
            _ => panic!("expected allocation failure"),
        }
        assert_eq!(index.len(), capacity as usize);
        assert_eq!(index.level(), level);
        assert!(index.find_by(|existing| existing.cmp(&7)).is_none());
        assert_eq!(index.find_by(|existing| existing.cmp(&8)).map(|(_, rank)| rank), Some(5));
        index.validate_invariants(Ord::cmp);

        // Freeing one slot makes room again.
        assert_eq!(index.remove_by_rank(1), Some(0));
        assert!(index.insert_with(7, &mut rng));
        index.validate_invariants(Ord::cmp);
    }

    #[test]
    fn draining_returns_to_single_level() {
        let mut index = RawRankedIndex::new();
        let mut rng = rng();
        for key in 0..500 {
            index.insert_with(key, &mut rng);
        }
        assert!(index.level() > 1);

        for key in (0..500).rev().step_by(2).chain((0..500).step_by(2)) {
            assert_eq!(index.remove_value(&key), Some(key));
            index.validate_invariants(Ord::cmp);
        }
        assert!(index.is_empty());
        assert_eq!(index.level(), 1);
        assert!(index.last().is_none());
        assert!(index.first().is_none());
    }

    #[test]
    fn removing_missing_value_is_a_no_op() {
        let mut index = RawRankedIndex::new();
        let mut rng = rng();
        for key in [2, 4, 6] {
            index.insert_with(key, &mut rng);
        }
        let level = index.level();
        assert_eq!(index.remove_value(&5), None);
        assert_eq!(index.remove_value(&100), None);
        assert_eq!(index.remove_by_rank(0), None);
        assert_eq!(index.remove_by_rank(4), None);
        assert_eq!(index.len(), 3);
        assert_eq!(index.level(), level);
        index.validate_invariants(Ord::cmp);
    }

    #[test]
    fn clear_resets_everything() {
        let mut index = RawRankedIndex::new();
        let mut rng = rng();
        for key in 0..100 {
            index.insert_with(key, &mut rng);
        }
        index.clear();
        index.validate_invariants(Ord::cmp);
        assert_eq!(index.level(), 1);
        assert!(index.insert_with(1, &mut rng));
        index.validate_invariants(Ord::cmp);
    }
}
