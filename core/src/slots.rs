//! # Slot Tables
//!
//! Every kind of loaded resource lives in a fixed-capacity table indexed by a
//! small integer id. A slot is either empty or owns its resource outright:
//!
//! ```text
//!  id:    0        1        2        3      ...  N-1
//!       ┌────────┬────────┬────────┬────────┬───┬────────┐
//!       │ Some(T)│  None  │ Some(T)│  None  │...│  None  │
//!       └────────┴────────┴────────┴────────┴───┴────────┘
//! ```
//!
//! `Some` is the in-use flag, so a buffer can't exist without its slot being
//! marked, and dropping the value frees the buffer. Operations only ever touch
//! the addressed slot.

use core::array;

use crate::error::{Error, Result};

pub struct SlotTable<T, const N: usize> {
    name: &'static str,
    slots: [Option<T>; N],
}

impl<T, const N: usize> SlotTable<T, N> {
    /// An empty table. `name` shows up in error messages.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: array::from_fn(|_| None),
        }
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Mark every slot free.
    pub fn init(&mut self) {
        self.slots = array::from_fn(|_| None);
    }

    /// Free every slot, then start over.
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.take();
        }
        self.init();
    }

    /// Fails with `InvalidSlotId` past the end of the table.
    pub fn check_id(&self, id: usize) -> Result<()> {
        if id >= N {
            return Err(Error::InvalidSlotId { table: self.name, id, capacity: N });
        }
        Ok(())
    }

    /// Check a slot can be loaded into: valid and free.
    pub fn check_free(&self, id: usize) -> Result<()> {
        self.check_id(id)?;
        if self.slots[id].is_some() {
            return Err(Error::SlotInUse { table: self.name, id });
        }
        Ok(())
    }

    pub fn is_in_use(&self, id: usize) -> bool {
        self.slots.get(id).is_some_and(Option::is_some)
    }

    /// Fill a free slot with whatever `make` produces.
    ///
    /// The slot is checked before `make` runs, and stays free if it fails.
    pub fn load_with<F>(&mut self, id: usize, make: F) -> Result<&mut T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.check_free(id)?;
        let value = make()?;
        Ok(self.slots[id].insert(value))
    }

    pub fn load(&mut self, id: usize, value: T) -> Result<&mut T> {
        self.load_with(id, || Ok(value))
    }

    /// Empty a slot, handing back what it held.
    pub fn unload(&mut self, id: usize) -> Result<T> {
        self.check_id(id)?;
        self.slots[id]
            .take()
            .ok_or(Error::SlotNotInUse { table: self.name, id })
    }

    pub fn get(&self, id: usize) -> Result<&T> {
        self.check_id(id)?;
        self.slots[id]
            .as_ref()
            .ok_or(Error::SlotNotInUse { table: self.name, id })
    }

    pub fn get_mut(&mut self, id: usize) -> Result<&mut T> {
        self.check_id(id)?;
        let name = self.name;
        self.slots[id]
            .as_mut()
            .ok_or(Error::SlotNotInUse { table: name, id })
    }

    /// In-use slots and their ids.
    pub fn iter_used(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|v| (id, v)))
    }
}
