// pool.rs - Fixed-capacity particle arena with a draw-order permutation
//
// Entities never move once allocated. Identity is the slot index (`Handle`);
// draw order is a separate list of handles that the reorder pass permutes.
// `order` is always a permutation of every slot.

use crate::error::ConfigError;

/// Stable index of an entity in its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub usize);

pub struct ParticlePool<T> {
    slots: Vec<T>,
    recycled: Vec<bool>,
    order: Vec<Handle>,
    scratch: Vec<Handle>,
    pending: usize,
}

impl<T> ParticlePool<T> {
    /// Build `capacity` entities with `init(slot)`. `pool` names the pool in errors.
    pub fn new(
        capacity: usize,
        pool: &'static str,
        init: impl FnMut(usize) -> T,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::EmptyPool { pool });
        }
        Ok(Self {
            slots: (0..capacity).map(init).collect(),
            recycled: vec![false; capacity],
            order: (0..capacity).map(Handle).collect(),
            scratch: Vec::with_capacity(capacity),
            pending: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, h: Handle) -> &T {
        &self.slots[h.0]
    }

    pub fn get_mut(&mut self, h: Handle) -> &mut T {
        &mut self.slots[h.0]
    }

    /// Handles in the order entities are drawn.
    pub fn draw_order(&self) -> &[Handle] {
        &self.order
    }

    /// Entities in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.order.iter().map(move |&h| (h, &self.slots[h.0]))
    }

    /// Entities in slot order.
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Flag an entity as just recycled. Flagging twice counts once.
    pub fn mark_recycled(&mut self, h: Handle) {
        if !self.recycled[h.0] {
            self.recycled[h.0] = true;
            self.pending += 1;
        }
    }

    pub fn is_recycled(&self, h: Handle) -> bool {
        self.recycled[h.0]
    }

    pub fn pending_recycled(&self) -> usize {
        self.pending
    }

    /// Stable partition of the draw order: unflagged entities first, then
    /// flagged ones, each group in its previous relative order. Flags are
    /// cleared on the way. Returns false (and touches nothing) when no entity
    /// was flagged.
    pub fn reorder(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.scratch.clear();
        self.scratch
            .extend(self.order.iter().copied().filter(|h| !self.recycled[h.0]));
        for &h in &self.order {
            if self.recycled[h.0] {
                self.recycled[h.0] = false;
                self.scratch.push(h);
            }
        }
        std::mem::swap(&mut self.order, &mut self.scratch);
        log::trace!("reorder moved {} recycled entities to the back", self.pending);
        self.pending = 0;
        true
    }

    /// Drop every flag without touching the draw order.
    pub fn clear_recycled(&mut self) {
        self.recycled.fill(false);
        self.pending = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> ParticlePool<usize> {
        ParticlePool::new(n, "test", |i| i * 10).unwrap()
    }

    fn order(p: &ParticlePool<usize>) -> Vec<usize> {
        p.draw_order().iter().map(|h| h.0).collect()
    }

    #[test]
    fn rejects_zero_capacity() {
        assert_eq!(
            ParticlePool::new(0, "leaf", |_| ()).err(),
            Some(ConfigError::EmptyPool { pool: "leaf" })
        );
    }

    #[test]
    fn starts_in_slot_order() {
        let p = pool(3);
        assert_eq!(order(&p), vec![0, 1, 2]);
        assert_eq!(*p.get(Handle(2)), 20);
    }

    #[test]
    fn reorder_without_flags_is_noop() {
        let mut p = pool(5);
        assert!(!p.reorder());
        assert_eq!(order(&p), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn flagged_entities_move_back_stably() {
        let mut p = pool(6);
        p.mark_recycled(Handle(4));
        p.mark_recycled(Handle(1));
        p.mark_recycled(Handle(1));
        assert_eq!(p.pending_recycled(), 2);
        assert!(p.reorder());
        assert_eq!(order(&p), vec![0, 2, 3, 5, 1, 4]);
        assert!(!p.is_recycled(Handle(1)));

        // Second pass on the permuted order keeps relative order too
        p.mark_recycled(Handle(0));
        p.mark_recycled(Handle(5));
        p.reorder();
        assert_eq!(order(&p), vec![2, 3, 1, 4, 0, 5]);
    }

    #[test]
    fn handles_survive_reorder() {
        let mut p = pool(4);
        let h = Handle(2);
        p.mark_recycled(Handle(0));
        p.reorder();
        *p.get_mut(h) += 1;
        assert_eq!(*p.get(h), 21);
        let drawn: Vec<usize> = p.iter().map(|(_, v)| *v).collect();
        assert_eq!(drawn, vec![10, 21, 30, 0]);
    }

    #[test]
    fn clear_recycled_drops_pending() {
        let mut p = pool(3);
        p.mark_recycled(Handle(1));
        p.clear_recycled();
        assert!(!p.reorder());
        assert_eq!(order(&p), vec![0, 1, 2]);
    }
}
