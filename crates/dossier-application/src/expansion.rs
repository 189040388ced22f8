//! Transient per-record expansion bookkeeping.
//!
//! Tracks, for each record id, whether a deepening request is in flight and
//! whether an already-deepened biography is currently shown in its long
//! form. This state is session-scoped and never persisted; a fresh session
//! starts with every detailed record collapsed.

use std::collections::HashMap;

/// Expansion lifecycle of one record id.
///
/// `Short` is the implicit state of ids with no entry. A record enters
/// `Detailed` exactly once and never leaves it here; only a full edit
/// commit that overwrites `is_detailed` clears the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    /// A deepening request is outstanding for this id.
    InFlight,
    /// The long-form biography is stored; `expanded` is the view toggle.
    Detailed { expanded: bool },
}

/// Map of record id to expansion state.
#[derive(Debug, Default)]
pub struct ExpansionTracker {
    states: HashMap<String, ExpansionState>,
}

impl ExpansionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        matches!(self.states.get(id), Some(ExpansionState::InFlight))
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        matches!(
            self.states.get(id),
            Some(ExpansionState::Detailed { expanded: true })
        )
    }

    /// Marks a deepening request as outstanding. Returns `false` when one is
    /// already in flight for this id, so duplicate requests collapse to one.
    pub fn begin(&mut self, id: &str) -> bool {
        if self.is_in_flight(id) {
            return false;
        }
        self.states
            .insert(id.to_string(), ExpansionState::InFlight);
        true
    }

    /// Terminal success: the id is detailed and shown expanded immediately.
    pub fn complete(&mut self, id: &str) {
        self.states
            .insert(id.to_string(), ExpansionState::Detailed { expanded: true });
    }

    /// Terminal failure: the in-flight marker is cleared so a retry is
    /// possible; the record stays in its implicit short state.
    pub fn abort(&mut self, id: &str) {
        self.states.remove(id);
    }

    /// Flips the show-long-form toggle for a detailed record and returns the
    /// new value. Ids without an entry (records loaded already detailed from
    /// the archive) start collapsed, so the first toggle expands them.
    /// In-flight ids are left untouched.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.states.get_mut(id) {
            Some(ExpansionState::Detailed { expanded }) => {
                *expanded = !*expanded;
                *expanded
            }
            Some(ExpansionState::InFlight) => false,
            None => {
                self.states
                    .insert(id.to_string(), ExpansionState::Detailed { expanded: true });
                true
            }
        }
    }

    /// Forgets everything about an id. Used when an edit commit overwrites
    /// the record's detailed flag.
    pub fn clear(&mut self, id: &str) {
        self.states.remove(id);
    }
}
