use smallvec::SmallVec;

use super::handle::Handle;

/// Upper bound on the number of levels any node (and the head) can have.
pub(crate) const MAX_LEVEL: usize = 32;

/// Chance that a node is promoted one more level.
pub(crate) const PROMOTION_PROBABILITY: f64 = 0.25;

// With p = 1/4 almost every node fits inline; taller ones spill to the heap.
const INLINE_LINKS: usize = 4;

/// A forward pointer at one level.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Link {
    pub(crate) next: Option<Handle>,
    // Level-0 hops to `next`; to the end of the sequence when `next` is `None`.
    pub(crate) span: usize,
}

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Option<Handle>,
    pub(crate) links: SmallVec<[Link; INLINE_LINKS]>,
}

impl<T> Node<T> {
    /// Builds a node with exactly `height` empty links.
    ///
    /// Returns the value back if the link array cannot be allocated.
    pub(crate) fn try_new(value: T, height: usize) -> Result<Self, T> {
        assert!(
            (1..=MAX_LEVEL).contains(&height),
            "`Node::try_new()` - `height` ({height}) outside 1..={MAX_LEVEL}!"
        );
        let mut links = SmallVec::new();
        if links.try_reserve_exact(height).is_err() {
            return Err(value);
        }
        links.resize(height, Link::default());
        Ok(Self {
            value,
            prev: None,
            links,
        })
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.links.len()
    }
}

/// Draws a node height: start at 1 and keep promoting while an independent
/// Bernoulli trial succeeds, never exceeding [`MAX_LEVEL`].
pub(crate) fn random_height<R: rand::Rng>(rng: &mut R) -> usize {
    let mut height = 1;
    while height < MAX_LEVEL && rng.random_bool(PROMOTION_PROBABILITY) {
        height += 1;
    }
    height
}
