use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use super::handle::Handle;

#[derive(Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage for index nodes.
///
/// Allocation is fallible and never touches existing slots, so a failed
/// `try_alloc` leaves every outstanding handle valid. The free list always has
/// room for every slot, which keeps `take` allocation-free.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Reserves room for `additional` more live elements.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let wanted = self.len().saturating_add(additional);
        let missing = wanted.saturating_sub(self.slots.len());
        self.slots.try_reserve(missing)?;
        self.free.try_reserve(self.slots.capacity().saturating_sub(self.free.len()))
    }

    /// Stores `element`, or hands it back if no slot can be provided.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle, T> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(element);
            return Ok(Handle::new(index, slot.generation));
        }

        if self.slots.len() > Handle::MAX_SLOT {
            return Err(element);
        }
        let needed = self.slots.len() + 1;
        if self.slots.try_reserve(1).is_err() || self.free.try_reserve(needed - self.free.len()).is_err() {
            return Err(element);
        }

        self.slots.push(Slot {
            generation: 0,
            value: Some(element),
        });
        Ok(Handle::new(self.slots.len() - 1, 0))
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        let slot = &self.slots[handle.index()];
        assert_eq!(slot.generation, handle.generation(), "`Arena::get()` - stale `handle`!");
        slot.value.as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        let slot = &mut self.slots[handle.index()];
        assert_eq!(slot.generation, handle.generation(), "`Arena::get_mut()` - stale `handle`!");
        slot.value.as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let index = handle.index();
        let slot = &mut self.slots[index];
        assert_eq!(slot.generation, handle.generation(), "`Arena::take()` - stale `handle`!");
        let element = slot.value.take().expect("`Arena::take()` - `handle` is invalid!");
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
