use core::num::NonZero;

#[cfg(test)]
type RawSlot = u16;
#[cfg(not(test))]
type RawSlot = u32;

/// A generation-checked reference to an arena slot.
///
/// The slot is stored off-by-one in a `NonZero` so that `Option<Handle>` costs
/// nothing extra; the generation is bumped every time the slot is released,
/// which turns a dangling handle into a detectable error instead of a silent
/// alias of whatever entry reused the slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub(crate) struct Handle {
    slot: NonZero<RawSlot>,
    generation: u32,
}

impl Handle {
    pub(crate) const MAX_SLOT: usize = (RawSlot::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn new(index: usize, generation: u32) -> Self {
        assert!(index <= Self::MAX_SLOT, "`Handle::new()` - `index` > `Handle::MAX_SLOT`!");
        #[allow(clippy::cast_possible_truncation)]
        let slot = NonZero::new((index + 1) as RawSlot).unwrap();
        Self { slot, generation }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.slot.get() - 1) as usize
    }

    #[inline]
    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // The niche in the slot keeps links as small as a bare handle.
    assert_eq_size!(Handle, Option<Handle>);

    #[test]
    #[should_panic(expected = "`Handle::new()` - `index` > `Handle::MAX_SLOT`!")]
    fn slot_out_of_range() {
        let _ = Handle::new(Handle::MAX_SLOT + 1, 0);
    }

    proptest! {
        #[test]
        fn handle_keeps_index_and_generation(index in 0..=Handle::MAX_SLOT, generation in any::<u32>()) {
            let handle = Handle::new(index, generation);
            prop_assert_eq!(handle.index(), index);
            prop_assert_eq!(handle.generation(), generation);
        }

        #[test]
        fn generations_distinguish_handles(index in 0..=Handle::MAX_SLOT, generation in 0u32..u32::MAX) {
            prop_assert_ne!(Handle::new(index, generation), Handle::new(index, generation + 1));
        }
    }
}
