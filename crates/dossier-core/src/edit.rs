//! Draft/commit/cancel editing workflow for a single record.

use crate::persona::PersonaRecord;

/// Holds at most one in-progress edit draft.
///
/// The draft is a full working copy of one record; mutations touch only the
/// draft until [`EditSession::commit`] hands it back for whole-record
/// replacement in the store. Beginning a new edit while one is active
/// silently replaces the prior draft, discarding its unsaved changes.
#[derive(Debug, Default)]
pub struct EditSession {
    draft: Option<PersonaRecord>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots a full copy of the record as the active draft.
    pub fn begin(&mut self, record: &PersonaRecord) {
        self.draft = Some(record.clone());
    }

    /// Id of the record currently in edit mode, if any.
    pub fn editing_id(&self) -> Option<&str> {
        self.draft.as_ref().map(|d| d.id.as_str())
    }

    /// Read access to the active draft.
    pub fn draft(&self) -> Option<&PersonaRecord> {
        self.draft.as_ref()
    }

    /// Mutates the draft only. Returns `false` when no edit is active.
    pub fn update<F>(&mut self, mutator: F) -> bool
    where
        F: FnOnce(&mut PersonaRecord),
    {
        match self.draft.as_mut() {
            Some(draft) => {
                mutator(draft);
                true
            }
            None => false,
        }
    }

    /// Ends edit mode and yields the full draft for replacement in the
    /// collections. `None` when no edit was active (commit is then a no-op).
    pub fn commit(&mut self) -> Option<PersonaRecord> {
        self.draft.take()
    }

    /// Discards the draft and clears edit mode without touching anything.
    pub fn cancel(&mut self) {
        self.draft = None;
    }
}
