//! Modal open-state registry.
//!
//! A keyed boolean map owned by the app root. Any descendant can open or close
//! any modal through [`use_modals`]. Per-row modals are keyed by entity id and
//! pruned when the owning list is refetched.

use std::collections::HashMap;

use dioxus::prelude::*;

use super::models::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModalKey {
    AddRiad,
    EditRiad(EntityId),
    RiadImages(EntityId),
    RiadRooms(EntityId),
    AddRoom { riad: EntityId },
    EditRoom(EntityId),
    RoomImages(EntityId),
    AddUser,
    ReservationResult,
}

impl ModalKey {
    /// Entity the modal belongs to, for per-row keys
    pub fn row(&self) -> Option<EntityId> {
        match self {
            ModalKey::EditRiad(id)
            | ModalKey::RiadImages(id)
            | ModalKey::RiadRooms(id)
            | ModalKey::EditRoom(id)
            | ModalKey::RoomImages(id) => Some(*id),
            ModalKey::AddRoom { riad } => Some(*riad),
            ModalKey::AddRiad | ModalKey::AddUser | ModalKey::ReservationResult => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModalRegistry {
    open: HashMap<ModalKey, bool>,
}

impl ModalRegistry {
    pub fn open(&mut self, key: ModalKey) {
        self.open.insert(key, true);
    }

    pub fn close(&mut self, key: ModalKey) {
        self.open.insert(key, false);
    }

    /// `None` when the key was never touched
    pub fn get(&self, key: &ModalKey) -> Option<bool> {
        self.open.get(key).copied()
    }

    pub fn is_open(&self, key: &ModalKey) -> bool {
        self.get(key).unwrap_or(false)
    }

    /// Drop per-row entries matching `belongs` whose row is not in `rows`
    pub fn retain_rows(&mut self, belongs: impl Fn(&ModalKey) -> bool, rows: &[EntityId]) {
        self.open.retain(|key, _| {
            if !belongs(key) {
                return true;
            }
            key.row().map_or(true, |id| rows.contains(&id))
        });
    }
}

/// Registry shared via context
#[derive(Clone, Copy)]
pub struct ModalContext {
    registry: Signal<ModalRegistry>,
}

impl ModalContext {
    pub fn open(&self, key: ModalKey) {
        let mut registry = self.registry;
        registry.write().open(key);
    }

    pub fn close(&self, key: ModalKey) {
        let mut registry = self.registry;
        registry.write().close(key);
    }

    pub fn is_open(&self, key: ModalKey) -> bool {
        self.registry.read().is_open(&key)
    }

    /// Forget per-row riad modals whose riad is gone
    pub fn prune_riads(&self, ids: &[EntityId]) {
        let mut registry = self.registry;
        registry.write().retain_rows(
            |k| {
                matches!(
                    k,
                    ModalKey::EditRiad(_)
                        | ModalKey::RiadImages(_)
                        | ModalKey::RiadRooms(_)
                        | ModalKey::AddRoom { .. }
                )
            },
            ids,
        );
    }

    /// Forget per-row room modals whose room is gone
    pub fn prune_rooms(&self, ids: &[EntityId]) {
        let mut registry = self.registry;
        registry.write().retain_rows(
            |k| matches!(k, ModalKey::EditRoom(_) | ModalKey::RoomImages(_)),
            ids,
        );
    }
}

/// Initialize modal registry provider - call once at app root
pub fn use_modal_provider() -> ModalContext {
    let registry = use_signal(ModalRegistry::default);
    use_context_provider(|| ModalContext { registry })
}

/// Get modal context - use in any component
pub fn use_modals() -> ModalContext {
    use_context::<ModalContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_leaves_false_entry() {
        let mut registry = ModalRegistry::default();
        assert_eq!(registry.get(&ModalKey::AddRiad), None);

        registry.open(ModalKey::AddRiad);
        assert!(registry.is_open(&ModalKey::AddRiad));

        registry.close(ModalKey::AddRiad);
        assert_eq!(registry.get(&ModalKey::AddRiad), Some(false));
    }

    #[test]
    fn keys_are_independent() {
        let mut registry = ModalRegistry::default();
        registry.open(ModalKey::EditRoom(1));
        registry.open(ModalKey::EditRoom(2));
        registry.close(ModalKey::EditRoom(1));

        assert!(!registry.is_open(&ModalKey::EditRoom(1)));
        assert!(registry.is_open(&ModalKey::EditRoom(2)));
        assert!(!registry.is_open(&ModalKey::RoomImages(2)));
    }

    #[test]
    fn retain_rows_prunes_only_matching_family() {
        let mut registry = ModalRegistry::default();
        registry.open(ModalKey::AddRiad);
        registry.open(ModalKey::EditRiad(1));
        registry.open(ModalKey::EditRiad(7));
        registry.open(ModalKey::RiadImages(7));
        registry.open(ModalKey::EditRoom(7));

        registry.retain_rows(
            |k| matches!(k, ModalKey::EditRiad(_) | ModalKey::RiadImages(_)),
            &[1],
        );

        assert!(registry.is_open(&ModalKey::AddRiad));
        assert!(registry.is_open(&ModalKey::EditRiad(1)));
        assert_eq!(registry.get(&ModalKey::EditRiad(7)), None);
        assert_eq!(registry.get(&ModalKey::RiadImages(7)), None);
        // Room 7 is unrelated to riad 7
        assert!(registry.is_open(&ModalKey::EditRoom(7)));
        assert_eq!(registry.open.len(), 3);
    }
}
