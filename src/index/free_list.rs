/// A set of recycled slot indices, kept sorted in descending order so that membership is a
/// binary search and the lowest free slot is popped from the back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct FreeList {
    slots: Vec<usize>,
}

impl FreeList {
    /// Creates a free list from slot indices in any order. Duplicates are dropped.
    pub(crate) fn from_slots(slots: impl IntoIterator<Item = usize>) -> FreeList {
        let mut slots = slots.into_iter().collect::<Vec<_>>();
        slots.sort_unstable_by(|a, b| b.cmp(a));
        slots.dedup();
        FreeList { slots }
    }

    fn search(&self, slot: usize) -> Result<usize, usize> {
        self.slots.binary_search_by(|probe| slot.cmp(probe))
    }

    /// Returns true if `slot` is free.
    pub(crate) fn contains(&self, slot: usize) -> bool {
        self.search(slot).is_ok()
    }

    /// Marks `slot` as free. Returns false if it already was.
    pub(crate) fn insert(&mut self, slot: usize) -> bool {
        match self.search(slot) {
            Ok(_) => false,
            Err(position) => {
                self.slots.insert(position, slot);
                true
            }
        }
    }

    /// Takes the lowest free slot out of the list.
    pub(crate) fn take_lowest(&mut self) -> Option<usize> {
        self.slots.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Iterates over the free slots in descending order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().copied()
    }
}
