//! Entity registry
//!
//! Single owner of every live entity. Entities are kept sorted by id so
//! iteration order is stable. Removal is two-phase: `remove` marks an entity
//! (it disappears from lookups and iteration immediately) and `flush` splices
//! all marked entities out once the step is over.

use super::entity::{Entity, EntityId, Kind};

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    /// Live entities, sorted by id
    entities: Vec<Entity>,
    /// Ids marked for removal at the next flush (sorted)
    pending_removal: Vec<EntityId>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            pending_removal: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert an entity under a freshly allocated id
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        // Ids are monotonic, so pushing keeps the vec sorted
        self.entities.push(entity);
        id
    }

    /// Mark an entity for removal. Returns false if it is unknown or already marked.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        match self.pending_removal.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.pending_removal.insert(pos, id);
                true
            }
        }
    }

    /// Splice out every entity marked for removal. Returns how many were removed.
    pub fn flush(&mut self) -> usize {
        if self.pending_removal.is_empty() {
            return 0;
        }
        let pending = std::mem::take(&mut self.pending_removal);
        let before = self.entities.len();
        self.entities
            .retain(|e| pending.binary_search(&e.id).is_err());
        before - self.entities.len()
    }

    fn is_pending(&self, id: EntityId) -> bool {
        self.pending_removal.binary_search(&id).is_ok()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        if self.is_pending(id) {
            return None;
        }
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(|i| &mut self.entities[i])
    }

    /// Live entities of one kind, in id order
    pub fn iter(&self, kind: Kind) -> impl Iterator<Item = &Entity> + '_ {
        let pending = &self.pending_removal;
        self.entities
            .iter()
            .filter(move |e| e.kind() == kind && pending.binary_search(&e.id).is_err())
    }

    pub fn for_each(&self, kind: Kind, mut f: impl FnMut(&Entity)) {
        for entity in self.iter(kind) {
            f(entity);
        }
    }

    pub fn for_each_mut(&mut self, kind: Kind, mut f: impl FnMut(&mut Entity)) {
        let pending = &self.pending_removal;
        for entity in self
            .entities
            .iter_mut()
            .filter(|e| e.kind() == kind && pending.binary_search(&e.id).is_err())
        {
            f(entity);
        }
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.iter(kind).count()
    }

    /// Number of live entities of all kinds
    pub fn len(&self) -> usize {
        self.entities.len() - self.pending_removal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityKind, Particle};
    use glam::Vec2;

    fn particle() -> Entity {
        Entity::new(
            Vec2::ZERO,
            Vec2::ZERO,
            3.0,
            EntityKind::Particle(Particle {
                color: [1.0; 4],
                lifespan: 1.0,
                remaining: 1.0,
            }),
        )
    }

    #[test]
    fn test_ids_are_unique() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(particle());
        let b = reg.add(particle());
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_removal_is_deferred() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(particle());
        let b = reg.add(particle());

        assert!(reg.remove(a));
        assert!(!reg.remove(a), "double removal is rejected");
        assert!(!reg.contains(a));
        assert_eq!(reg.count(Kind::Particle), 1);

        assert_eq!(reg.flush(), 1);
        assert_eq!(reg.flush(), 0);
        assert!(reg.contains(b));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_remove_during_iteration_pattern() {
        let mut reg = EntityRegistry::new();
        for _ in 0..5 {
            reg.add(particle());
        }
        let mut doomed = Vec::new();
        reg.for_each(Kind::Particle, |e| {
            if e.id % 2 == 1 {
                doomed.push(e.id);
            }
        });
        for id in doomed {
            reg.remove(id);
        }
        reg.flush();
        let ids: Vec<_> = reg.iter(Kind::Particle).map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_unknown_id() {
        let mut reg = EntityRegistry::new();
        assert!(!reg.remove(42));
        assert!(reg.get(42).is_none());
    }
}
