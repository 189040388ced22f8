//! Canonical record store with stream and archive views.
//!
//! Rather than physically duplicating records between an ephemeral stream
//! and a durable archive, one canonical map holds every record keyed by id
//! and the two collections are ordered membership lists over it. Any
//! mutation through [`RecordStore::update`] or [`RecordStore::replace`] is
//! therefore visible to both views at once; a stale copy cannot exist.

use std::collections::HashMap;

use crate::persona::PersonaRecord;

/// In-memory source of truth for all persona records of a session.
///
/// The stream is session-scoped and newest-first; the archive preserves
/// newest-saved-first order and is the part that gets persisted.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<String, PersonaRecord>,
    stream: Vec<String>,
    archive: Vec<String>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the archive from a persisted snapshot, preserving its order.
    ///
    /// Called once at startup; the stream always starts empty.
    pub fn load_archive(&mut self, records: Vec<PersonaRecord>) {
        for record in records {
            if !self.archive.contains(&record.id) {
                self.archive.push(record.id.clone());
            }
            self.records.insert(record.id.clone(), record);
        }
    }

    /// Inserts a freshly generated record at the front of the stream.
    ///
    /// This is the only creation path for new records.
    pub fn insert_stream_front(&mut self, record: PersonaRecord) {
        let id = record.id.clone();
        self.records.insert(id.clone(), record);
        self.stream.retain(|existing| existing != &id);
        self.stream.insert(0, id);
    }

    /// Adds an existing record to the front of the archive.
    ///
    /// Idempotent: returns `false` without reordering when the id is already
    /// archived, or when the id is unknown to the store.
    pub fn save_to_archive(&mut self, id: &str) -> bool {
        if !self.records.contains_key(id) || self.archive.iter().any(|a| a == id) {
            return false;
        }
        self.archive.insert(0, id.to_string());
        true
    }

    /// Removes an id from the archive. Removing an absent id is a no-op.
    pub fn remove_from_archive(&mut self, id: &str) -> bool {
        let before = self.archive.len();
        self.archive.retain(|a| a != id);
        let removed = self.archive.len() != before;
        if removed {
            self.drop_if_orphaned(id);
        }
        removed
    }

    /// Applies a mutation to the record with the given id.
    ///
    /// Both views observe the result since they share the canonical map.
    /// Returns whether a match was found.
    pub fn update<F>(&mut self, id: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut PersonaRecord),
    {
        match self.records.get_mut(id) {
            Some(record) => {
                mutator(record);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole record matched by `record.id`, all fields.
    ///
    /// Used by edit commits; returns whether a match was found. A record
    /// that is in neither view cannot be replaced into existence.
    pub fn replace(&mut self, record: PersonaRecord) -> bool {
        match self.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Returns the record with the given id, if the store knows it.
    pub fn get(&self, id: &str) -> Option<&PersonaRecord> {
        self.records.get(id)
    }

    pub fn contains_stream(&self, id: &str) -> bool {
        self.stream.iter().any(|s| s == id)
    }

    pub fn contains_archive(&self, id: &str) -> bool {
        self.archive.iter().any(|a| a == id)
    }

    /// Stream records, newest first.
    pub fn stream(&self) -> impl Iterator<Item = &PersonaRecord> {
        self.stream.iter().filter_map(|id| self.records.get(id))
    }

    /// Archived records, newest-saved first.
    pub fn archive(&self) -> impl Iterator<Item = &PersonaRecord> {
        self.archive.iter().filter_map(|id| self.records.get(id))
    }

    pub fn stream_len(&self) -> usize {
        self.stream.len()
    }

    pub fn archive_len(&self) -> usize {
        self.archive.len()
    }

    /// Full-record archive snapshot in display order, for persistence.
    pub fn archive_snapshot(&self) -> Vec<PersonaRecord> {
        self.archive().cloned().collect()
    }

    fn drop_if_orphaned(&mut self, id: &str) {
        if !self.contains_stream(id) && !self.contains_archive(id) {
            self.records.remove(id);
        }
    }
}
