//! Fixed-size circular slot ring
//!
//! All slots are preallocated in a `Vec` and linked by index, so the cycle
//! owns nothing and needs no teardown. Walking `next` from `head` yields
//! slots from most to least recently used; empty slots sit at the tail.
//!
//! ```text
//!          head                          tail = prev(head)
//!           v                               v
//!   ... -> [s3] -> [s0] -> [s2] -> [s1] -> [s4] -> (back to s3)
//!          MRU  ------------------------>  LRU / empty
//! ```

use crate::error::{Error, Result};

/// One reusable cache unit. `entry` is `None` for an empty slot.
struct Slot<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

/// Circular doubly-linked ring of `capacity` slots.
pub(crate) struct SlotRing<K, V> {
    slots: Vec<Slot<K, V>>,
    head: usize,
}

impl<K, V> SlotRing<K, V> {
    /// Build `capacity` empty slots linked into one cycle, headed at slot 0.
    pub(crate) fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let slots = (0..capacity)
            .map(|i| Slot {
                entry: None,
                prev: (i + capacity - 1) % capacity,
                next: (i + 1) % capacity,
            })
            .collect();

        Ok(Self { slots, head: 0 })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn set_head(&mut self, idx: usize) {
        self.head = idx;
    }

    /// Slot preceding `head`: the least recently used, or an empty slot.
    pub(crate) fn tail(&self) -> usize {
        self.slots[self.head].prev
    }

    pub(crate) fn next(&self, idx: usize) -> usize {
        self.slots[idx].next
    }

    pub(crate) fn entry(&self, idx: usize) -> Option<&(K, V)> {
        self.slots[idx].entry.as_ref()
    }

    pub(crate) fn entry_mut(&mut self, idx: usize) -> &mut Option<(K, V)> {
        &mut self.slots[idx].entry
    }

    /// Relink `idx` so it directly precedes `head`. `head` itself is left
    /// alone and every other slot keeps its relative order.
    ///
    /// Works when `idx` already precedes `head` and when `idx == head`; in
    /// both cases the topology comes out unchanged.
    pub(crate) fn move_to_front(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;

        // Read through the head's prev link rather than `head` directly: if
        // `idx == head` the splice point is the gap `idx` just left.
        let before = self.slots[self.head].prev;
        let after = self.slots[before].next;

        self.slots[idx].prev = before;
        self.slots[idx].next = after;
        self.slots[after].prev = idx;
        self.slots[before].next = idx;
    }

    /// Drop every stored entry. Links and `head` are kept.
    pub(crate) fn clear_entries(&mut self) {
        for slot in &mut self.slots {
            slot.entry = None;
        }
    }

    /// Slot indices from `head` following `next`, one full turn.
    pub(crate) fn walk(&self) -> Walk<'_, K, V> {
        Walk {
            ring: self,
            cursor: self.head,
            remaining: self.slots.len(),
        }
    }

    /// Verify the links form exactly one cycle through every slot.
    pub(crate) fn check_links(&self) -> Result<()> {
        let len = self.slots.len();
        if self.head >= len {
            return Err(Error::InvariantViolation(format!(
                "head {} out of range for capacity {}",
                self.head, len
            )));
        }

        for (i, slot) in self.slots.iter().enumerate() {
            if slot.next >= len || slot.prev >= len {
                return Err(Error::InvariantViolation(format!(
                    "slot {} links out of range",
                    i
                )));
            }
            if self.slots[slot.next].prev != i {
                return Err(Error::InvariantViolation(format!(
                    "slot {}: next.prev does not point back",
                    i
                )));
            }
        }

        let mut cursor = self.slots[self.head].next;
        let mut steps = 1;
        while cursor != self.head {
            cursor = self.slots[cursor].next;
            steps += 1;
            if steps > len {
                break;
            }
        }
        if steps != len {
            return Err(Error::InvariantViolation(format!(
                "cycle from head has {} slots, expected {}",
                steps, len
            )));
        }

        Ok(())
    }
}

/// Iterator returned by [`SlotRing::walk`].
pub(crate) struct Walk<'a, K, V> {
    ring: &'a SlotRing<K, V>,
    cursor: usize,
    remaining: usize,
}

impl<K, V> Iterator for Walk<'_, K, V> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.cursor;
        self.cursor = self.ring.slots[idx].next;
        self.remaining -= 1;
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Walk<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn order<K, V>(ring: &SlotRing<K, V>) -> Vec<usize> {
        ring.walk().collect()
    }

    #[test]
    fn test_ring_zero_capacity() {
        let result = SlotRing::<u32, u32>::new(0);
        assert_eq!(result.err(), Some(Error::InvalidCapacity(0)));
    }

    #[test]
    fn test_ring_initial_cycle() {
        let ring = SlotRing::<u32, u32>::new(4).unwrap();

        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.head, 0);
        assert_eq!(ring.tail(), 3);
        assert_eq!(order(&ring), vec![0, 1, 2, 3]);
        assert!((0..4).all(|i| ring.entry(i).is_none()));
        ring.check_links().unwrap();
    }

    #[test]
    fn test_ring_single_slot() {
        let mut ring = SlotRing::<u32, u32>::new(1).unwrap();

        assert_eq!(ring.tail(), 0);
        assert_eq!(ring.next(0), 0);

        ring.move_to_front(0);
        assert_eq!(order(&ring), vec![0]);
        ring.check_links().unwrap();
    }

    #[test]
    fn test_move_to_front_middle() {
        let mut ring = SlotRing::<u32, u32>::new(4).unwrap();

        ring.move_to_front(2);

        // head unchanged, slot 2 now precedes it
        assert_eq!(ring.head, 0);
        assert_eq!(ring.tail(), 2);
        assert_eq!(order(&ring), vec![0, 1, 3, 2]);
        ring.check_links().unwrap();
    }

    #[test]
    fn test_move_to_front_already_tail() {
        let mut ring = SlotRing::<u32, u32>::new(4).unwrap();

        ring.move_to_front(3);

        assert_eq!(order(&ring), vec![0, 1, 2, 3]);
        ring.check_links().unwrap();
    }

    #[test]
    fn test_move_to_front_head() {
        let mut ring = SlotRing::<u32, u32>::new(4).unwrap();
        ring.move_to_front(2);

        ring.move_to_front(ring.head);

        assert_eq!(ring.head, 0);
        assert_eq!(order(&ring), vec![0, 1, 3, 2]);
        ring.check_links().unwrap();
    }

    #[test]
    fn test_move_to_front_then_promote() {
        let mut ring = SlotRing::<u32, u32>::new(5).unwrap();

        ring.move_to_front(3);
        ring.set_head(3);
        assert_eq!(order(&ring), vec![3, 0, 1, 2, 4]);

        ring.move_to_front(2);
        ring.set_head(2);
        assert_eq!(order(&ring), vec![2, 3, 0, 1, 4]);
        ring.check_links().unwrap();
    }

    #[test]
    fn test_entries_and_clear() {
        let mut ring = SlotRing::new(3).unwrap();

        *ring.entry_mut(1) = Some(("a", 1));
        *ring.entry_mut(2) = Some(("b", 2));
        assert_eq!(ring.entry(1), Some(&("a", 1)));

        ring.clear_entries();

        assert!((0..3).all(|i| ring.entry(i).is_none()));
        assert_eq!(order(&ring), vec![0, 1, 2]);
    }

    #[test]
    fn test_check_links_detects_broken_cycle() {
        let mut ring = SlotRing::<u32, u32>::new(3).unwrap();

        ring.slots[0].next = 0;

        assert!(matches!(
            ring.check_links(),
            Err(Error::InvariantViolation(_))
        ));
    }
}
