use crate::core::geo::{GeoEntry, GeoId, Visibility};
use crate::error::StoreError;
use indexmap::IndexMap;

/// Entries in append order. Hidden entries stay in the store until removed.
#[derive(Debug, Default, Clone)]
pub struct GeoStore {
    entries: IndexMap<GeoId, GeoEntry>,
}

impl GeoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: GeoEntry) -> Result<(), StoreError> {
        if self.entries.contains_key(&entry.id) {
            return Err(StoreError::DuplicateId(entry.id));
        }
        tracing::trace!(id = %entry.id, label = %entry.label, "entry added");
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    pub fn remove(&mut self, id: GeoId) -> Option<GeoEntry> {
        let removed = self.entries.shift_remove(&id);
        if removed.is_some() {
            tracing::trace!(%id, "entry removed");
        }
        removed
    }

    /// Returns false when the entry is unknown or already hidden.
    pub fn hide(&mut self, id: GeoId) -> bool {
        self.set_visibility(id, Visibility::Hidden)
    }

    /// Returns false when the entry is unknown or already visible.
    pub fn restore(&mut self, id: GeoId) -> bool {
        self.set_visibility(id, Visibility::Visible)
    }

    fn set_visibility(&mut self, id: GeoId, visibility: Visibility) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        if entry.visibility == visibility {
            return false;
        }
        entry.visibility = visibility;
        tracing::trace!(%id, ?visibility, "entry visibility changed");
        true
    }

    pub fn get(&self, id: GeoId) -> Option<&GeoEntry> {
        self.entries.get(&id)
    }

    /// Displayed entries, in append order.
    pub fn list(&self) -> impl Iterator<Item = &GeoEntry> {
        self.entries.values().filter(|entry| entry.is_visible())
    }

    pub fn all(&self) -> impl Iterator<Item = &GeoEntry> {
        self.entries.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = GeoId> + '_ {
        self.entries.keys().copied()
    }

    /// `max(ids ∪ {0}) + 1`, hidden entries included.
    pub fn next_id(&self) -> GeoId {
        self.ids().max().map_or(GeoId::FIRST, GeoId::next)
    }

    pub fn visible_len(&self) -> usize {
        self.list().count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::GeoStore;
    use crate::core::geo::{GeoEntry, GeoId};
    use crate::error::StoreError;

    fn id(raw: u64) -> GeoId {
        GeoId::new(raw).expect("positive id")
    }

    fn store_with(ids: &[u64]) -> GeoStore {
        let mut store = GeoStore::new();
        for raw in ids {
            store
                .add(GeoEntry::new(id(*raw), "Ohio", None))
                .expect("unique id");
        }
        store
    }

    #[test]
    fn next_id_is_one_for_empty_store() {
        assert_eq!(GeoStore::new().next_id(), id(1));
    }

    #[test]
    fn next_id_is_max_plus_one_not_len_plus_one() {
        assert_eq!(store_with(&[3, 1, 7]).next_id(), id(8));
        assert_eq!(store_with(&[2]).next_id(), id(3));
    }

    #[test]
    fn hidden_entries_still_count_for_next_id() {
        let mut store = store_with(&[1, 5]);
        assert!(store.hide(id(5)));
        assert_eq!(store.next_id(), id(6));
        assert_eq!(store.visible_len(), 1);
    }

    #[test]
    fn removed_entries_no_longer_count() {
        let mut store = store_with(&[1, 5]);
        assert!(store.remove(id(5)).is_some());
        assert_eq!(store.next_id(), id(2));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut store = store_with(&[4]);
        let err = store
            .add(GeoEntry::new(id(4), "Utah", None))
            .expect_err("duplicate");
        assert_eq!(err, StoreError::DuplicateId(id(4)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn hide_and_restore_toggle_listing_only() {
        let mut store = store_with(&[1, 2, 3]);
        assert!(store.hide(id(2)));
        assert!(!store.hide(id(2)));
        let listed: Vec<_> = store.list().map(|entry| entry.id.get()).collect();
        assert_eq!(listed, vec![1, 3]);

        assert!(store.restore(id(2)));
        let listed: Vec<_> = store.list().map(|entry| entry.id.get()).collect();
        assert_eq!(listed, vec![1, 2, 3]);
        assert!(!store.restore(id(9)));
    }
}
