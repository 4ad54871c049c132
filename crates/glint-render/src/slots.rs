//! Bounded texture-slot table with first-seen-wins deduplication.

use std::fmt;

/// Opaque identifier for a GPU-resident texture.
///
/// Handles are minted by the draw backend ("load a texture, get a handle
/// and its dimensions back"); the batching engine only compares them for
/// slot deduplication and never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u64);

impl TextureHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Returned by [`TextureSlotTable::slot_for`] when every slot is occupied
/// by a distinct handle.
///
/// This is a flush signal rather than a hard error: the session drains the
/// pending sub-batch, which resets the table, and retries the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTableFull;

impl fmt::Display for SlotTableFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every texture slot is occupied")
    }
}

impl std::error::Error for SlotTableFull {}

/// Ordered mapping from texture handle to hardware texture unit, bounded by
/// the unit count one draw call can bind.
///
/// Slot 0 permanently holds the reserved 1x1 opaque-white texture used by
/// color-only quads; slots `1..max_slots` are assigned on first use within
/// the current sub-batch and released on every reset.
pub struct TextureSlotTable {
    slots: Vec<TextureHandle>,
    max_slots: usize,
}

impl TextureSlotTable {
    /// `white` becomes the permanent occupant of slot 0.
    pub fn new(white: TextureHandle, max_slots: usize) -> Self {
        assert!(
            max_slots >= 2,
            "slot table needs the white slot plus at least one usable slot"
        );
        let mut slots = Vec::with_capacity(max_slots);
        slots.push(white);
        Self { slots, max_slots }
    }

    /// Restore occupancy to exactly the reserved white slot.
    pub fn reset(&mut self) {
        self.slots.truncate(1);
    }

    /// Deterministic dedup lookup.
    ///
    /// A handle already present keeps its slot for the rest of the
    /// sub-batch (first-seen-wins, no replacement). An absent handle takes
    /// the next free slot, or [`SlotTableFull`] when none is left.
    pub fn slot_for(&mut self, handle: TextureHandle) -> Result<u32, SlotTableFull> {
        // slot 0 is the white texture, never handed out for user handles
        if let Some(pos) = self.slots[1..].iter().position(|occupant| *occupant == handle) {
            return Ok((pos + 1) as u32);
        }
        if self.slots.len() >= self.max_slots {
            return Err(SlotTableFull);
        }
        self.slots.push(handle);
        Ok((self.slots.len() - 1) as u32)
    }

    /// Occupied slots in binding order, the white texture first. This is
    /// what the backend binds to units `0..occupancy` before a draw call.
    pub fn occupied(&self) -> &[TextureHandle] {
        &self.slots
    }

    /// Current occupancy, including the reserved white slot.
    pub fn occupancy(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: TextureHandle = TextureHandle::from_raw(1);

    fn handle(id: u64) -> TextureHandle {
        TextureHandle::from_raw(id)
    }

    #[test]
    fn test_white_occupies_slot_zero() {
        let table = TextureSlotTable::new(WHITE, 32);
        assert_eq!(table.occupancy(), 1);
        assert_eq!(table.occupied(), &[WHITE]);
    }

    #[test]
    fn test_distinct_handles_get_sequential_slots() {
        let mut table = TextureSlotTable::new(WHITE, 32);
        assert_eq!(table.slot_for(handle(10)), Ok(1));
        assert_eq!(table.slot_for(handle(20)), Ok(2));
        assert_eq!(table.slot_for(handle(30)), Ok(3));
        assert_eq!(table.occupancy(), 4);
    }

    #[test]
    fn test_repeated_handle_keeps_its_slot() {
        let mut table = TextureSlotTable::new(WHITE, 32);
        let first = table.slot_for(handle(10)).unwrap();
        table.slot_for(handle(20)).unwrap();
        for _ in 0..5 {
            assert_eq!(table.slot_for(handle(10)), Ok(first));
        }
        assert_eq!(table.occupancy(), 3);
    }

    #[test]
    fn test_full_table_reports_and_keeps_residents() {
        let mut table = TextureSlotTable::new(WHITE, 4);
        table.slot_for(handle(10)).unwrap();
        table.slot_for(handle(20)).unwrap();
        table.slot_for(handle(30)).unwrap();

        assert_eq!(table.slot_for(handle(40)), Err(SlotTableFull));
        // residents still resolve without a flush
        assert_eq!(table.slot_for(handle(20)), Ok(2));
    }

    #[test]
    fn test_reset_releases_everything_but_white() {
        let mut table = TextureSlotTable::new(WHITE, 4);
        table.slot_for(handle(10)).unwrap();
        table.slot_for(handle(20)).unwrap();

        table.reset();
        assert_eq!(table.occupancy(), 1);
        assert_eq!(table.occupied(), &[WHITE]);
        // freed slots are assignable again
        assert_eq!(table.slot_for(handle(20)), Ok(1));
    }
}
