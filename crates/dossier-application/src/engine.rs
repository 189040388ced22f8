//! The persona lifecycle engine.
//!
//! `PersonaEngine` owns all mutable application state behind one lock and
//! exposes the documented mutation entry points: generate, expand,
//! save/remove, edit, sign-in/out, view and filter selection. Every archive
//! mutation persists the whole snapshot before returning to the caller.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use dossier_core::{
    DossierError, EditSession, FilterState, Gender, Identity, PersonaRecord, ProfileStorage,
    RecordStore, Result,
};
use dossier_interaction::{SynthesisAgent, SynthesisRequest};

use crate::expansion::ExpansionTracker;

/// Which collection the main listing currently projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Stream,
    Archive,
}

/// Result of a save-to-archive attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Archive membership is idempotent; the record was already there.
    AlreadyArchived,
    /// No identity session exists. The caller opens the sign-in prompt;
    /// nothing was mutated.
    SignInRequired,
}

/// Result of an expand call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// A deepening request ran and the long biography is now stored.
    Deepened,
    /// The record was already detailed; only the view toggle flipped.
    Toggled { expanded: bool },
    /// A request for this id is still outstanding; this call did nothing.
    AlreadyInFlight,
}

#[derive(Default)]
struct EngineState {
    store: RecordStore,
    expansion: ExpansionTracker,
    edit: EditSession,
    identity: Option<Identity>,
    view: ActiveView,
    filter: FilterState,
}

/// Single-writer application state plus the collaborators it drives.
///
/// Methods never hold the state lock across a network await, so expansions
/// for different ids can be in flight concurrently while other interactions
/// keep mutating state. Completions merge by id, so out-of-order completion
/// is safe.
#[derive(Clone)]
pub struct PersonaEngine {
    agent: Arc<dyn SynthesisAgent>,
    storage: Arc<ProfileStorage>,
    state: Arc<RwLock<EngineState>>,
}

impl PersonaEngine {
    /// Creates an engine, reading the archive snapshot and identity session
    /// from storage once. The stream always starts empty.
    pub fn new(agent: Arc<dyn SynthesisAgent>, storage: ProfileStorage) -> Self {
        let mut state = EngineState {
            identity: storage.load_identity(),
            ..Default::default()
        };
        state.store.load_archive(storage.load_archive());

        Self {
            agent,
            storage: Arc::new(storage),
            state: Arc::new(RwLock::new(state)),
        }
    }

    // ===== Generation =====

    /// Synthesizes one new persona and inserts it at the front of the
    /// stream. Constrained to the current region filter; "All" draws a
    /// region uniformly from the catalog.
    ///
    /// On failure nothing is inserted and the error is surfaced for the
    /// caller to display; there is no automatic retry. Concurrent calls are
    /// intentionally not deduplicated: each successful call appends its own
    /// record.
    pub async fn generate(&self) -> Result<PersonaRecord> {
        let region_filter = {
            let state = self.state.read().await;
            state.filter.region.clone()
        };
        let request = SynthesisRequest::for_region(region_filter.as_deref());

        let draft = self.agent.synthesize_persona(&request).await?;
        let record = PersonaRecord::from_draft(draft);
        info!(id = %record.id, region = %record.region, "synthesized persona");

        let mut state = self.state.write().await;
        state.store.insert_stream_front(record.clone());
        Ok(record)
    }

    // ===== Expansion =====

    /// Deepens a record's biography, or toggles the long-form view when the
    /// record is already detailed (no network call in that case).
    ///
    /// At most one deepening request is outstanding per id; a second call
    /// while one is in flight is a no-op. On failure the record is left
    /// unchanged, the in-flight marker is cleared, and the error is returned
    /// for non-blocking logging, never as a state change.
    pub async fn expand(&self, id: &str) -> Result<ExpandOutcome> {
        let context = {
            let mut state = self.state.write().await;

            if state.expansion.is_in_flight(id) {
                return Ok(ExpandOutcome::AlreadyInFlight);
            }

            let record = state
                .store
                .get(id)
                .ok_or_else(|| DossierError::not_found("persona", id))?
                .clone();

            if record.is_detailed {
                let expanded = state.expansion.toggle(id);
                return Ok(ExpandOutcome::Toggled { expanded });
            }

            state.expansion.begin(id);
            record
        };

        // Lock released while the request is outstanding.
        let outcome = self.agent.expand_biography(&context).await;

        let mut state = self.state.write().await;
        match outcome {
            Ok(narrative) => {
                // Empty collaborator output keeps the existing biography but
                // still counts as a successful deepening.
                let biography = if narrative.trim().is_empty() {
                    context.biography.clone()
                } else {
                    narrative
                };
                state.store.update(id, |record| {
                    record.biography = biography;
                    record.is_detailed = true;
                });
                state.expansion.complete(id);
                self.persist_archive(&state)?;
                info!(id = %id, "deepened biography");
                Ok(ExpandOutcome::Deepened)
            }
            Err(err) => {
                state.expansion.abort(id);
                warn!(id = %id, error = %err, "expansion failed, record unchanged");
                Err(err)
            }
        }
    }

    /// Whether a deepening request is outstanding for the id (spinner state).
    pub async fn is_expanding(&self, id: &str) -> bool {
        self.state.read().await.expansion.is_in_flight(id)
    }

    /// Whether the id's long-form biography is currently shown.
    pub async fn is_expanded(&self, id: &str) -> bool {
        self.state.read().await.expansion.is_expanded(id)
    }

    // ===== Archive =====

    /// Copies a stream record into the archive.
    ///
    /// Requires an identity session; without one nothing is mutated and the
    /// caller is told to prompt for sign-in. Saving an already-archived id
    /// is a no-op.
    pub async fn save_to_archive(&self, id: &str) -> Result<SaveOutcome> {
        let mut state = self.state.write().await;

        if state.identity.is_none() {
            return Ok(SaveOutcome::SignInRequired);
        }
        if state.store.contains_archive(id) {
            return Ok(SaveOutcome::AlreadyArchived);
        }
        if !state.store.save_to_archive(id) {
            return Err(DossierError::not_found("persona", id));
        }
        self.persist_archive(&state)?;
        Ok(SaveOutcome::Saved)
    }

    /// Removes an id from the archive and persists. Removing an absent id is
    /// a no-op; returns whether anything was removed.
    pub async fn remove_from_archive(&self, id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        let removed = state.store.remove_from_archive(id);
        if removed {
            self.persist_archive(&state)?;
        }
        Ok(removed)
    }

    // ===== Identity =====

    /// Signs in with the trimmed username and persists the session.
    pub async fn sign_in(&self, username: &str) -> Result<Identity> {
        let identity = Identity::sign_in(username)?;
        self.storage.save_identity(&identity)?;

        let mut state = self.state.write().await;
        state.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Clears the identity session and forces the view back to the stream.
    /// Archive data already in memory is untouched.
    pub async fn sign_out(&self) -> Result<()> {
        self.storage.clear_identity()?;
        let mut state = self.state.write().await;
        state.identity = None;
        state.view = ActiveView::Stream;
        Ok(())
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.identity.clone()
    }

    // ===== Editing =====

    /// Starts editing a record, snapshotting a full draft. A prior draft is
    /// replaced without committing it.
    pub async fn begin_edit(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state
            .store
            .get(id)
            .ok_or_else(|| DossierError::not_found("persona", id))?
            .clone();
        state.edit.begin(&record);
        Ok(())
    }

    /// Mutates the active draft only. Returns `false` when no edit is active.
    pub async fn update_draft<F>(&self, mutator: F) -> bool
    where
        F: FnOnce(&mut PersonaRecord),
    {
        self.state.write().await.edit.update(mutator)
    }

    /// Commits the draft: the full draft value replaces the record in both
    /// collections (all fields, including biography and the detailed flag)
    /// and the archive is persisted. A commit with no active draft is a
    /// no-op returning `None`.
    pub async fn commit_edit(&self) -> Result<Option<PersonaRecord>> {
        let mut state = self.state.write().await;
        let Some(draft) = state.edit.commit() else {
            return Ok(None);
        };

        if state.store.replace(draft.clone()) {
            // An edit may rewrite biography/is_detailed wholesale; stale
            // view-toggle state must not survive that.
            if !draft.is_detailed {
                state.expansion.clear(&draft.id);
            }
            self.persist_archive(&state)?;
        }
        Ok(Some(draft))
    }

    /// Discards the draft without mutating either collection.
    pub async fn cancel_edit(&self) {
        self.state.write().await.edit.cancel();
    }

    pub async fn editing_id(&self) -> Option<String> {
        self.state
            .read()
            .await
            .edit
            .editing_id()
            .map(str::to_string)
    }

    // ===== View & filter =====

    pub async fn set_view(&self, view: ActiveView) {
        self.state.write().await.view = view;
    }

    pub async fn view(&self) -> ActiveView {
        self.state.read().await.view
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.write().await.filter.query = query.into();
    }

    pub async fn set_region_filter(&self, region: Option<String>) {
        self.state.write().await.filter.region = region;
    }

    pub async fn set_gender_filter(&self, gender: Option<Gender>) {
        self.state.write().await.filter.gender = gender;
    }

    pub async fn filter(&self) -> FilterState {
        self.state.read().await.filter.clone()
    }

    /// The filtered projection of the active view, in collection order.
    pub async fn visible(&self) -> Vec<PersonaRecord> {
        let state = self.state.read().await;
        let records = match state.view {
            ActiveView::Stream => state.filter.apply(state.store.stream()),
            ActiveView::Archive => state.filter.apply(state.store.archive()),
        };
        records.into_iter().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<PersonaRecord> {
        self.state.read().await.store.get(id).cloned()
    }

    pub async fn stream_records(&self) -> Vec<PersonaRecord> {
        self.state.read().await.store.stream().cloned().collect()
    }

    pub async fn archive_records(&self) -> Vec<PersonaRecord> {
        self.state.read().await.store.archive().cloned().collect()
    }

    pub async fn archive_len(&self) -> usize {
        self.state.read().await.store.archive_len()
    }

    // ===== Export =====

    /// Canonical human-readable JSON of one record for clipboard hand-off.
    pub async fn export_json(&self, id: &str) -> Result<String> {
        let state = self.state.read().await;
        let record = state
            .store
            .get(id)
            .ok_or_else(|| DossierError::not_found("persona", id))?;
        record.to_clipboard_json()
    }

    /// Writes the full archive snapshot. Called with the state lock held so
    /// storage stays consistent with memory after every logical mutation.
    fn persist_archive(&self, state: &EngineState) -> Result<()> {
        self.storage.save_archive(&state.store.archive_snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dossier_core::PersonaDraft;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tokio::sync::Semaphore;

    /// Scripted collaborator: counts calls, optionally fails, optionally
    /// blocks expansions on a semaphore to simulate an in-flight request.
    struct MockAgent {
        region: String,
        narrative: String,
        fail_synthesis: bool,
        fail_expansion: bool,
        synthesis_calls: AtomicUsize,
        expansion_calls: AtomicUsize,
        expansion_gate: Option<Semaphore>,
    }

    impl MockAgent {
        fn new(region: &str) -> Self {
            Self {
                region: region.to_string(),
                narrative: "Roots paragraph.\n\nConflict paragraph.\n\nHorizon paragraph."
                    .to_string(),
                fail_synthesis: false,
                fail_expansion: false,
                synthesis_calls: AtomicUsize::new(0),
                expansion_calls: AtomicUsize::new(0),
                expansion_gate: None,
            }
        }

        fn gated(region: &str) -> Self {
            Self {
                expansion_gate: Some(Semaphore::new(0)),
                ..Self::new(region)
            }
        }
    }

    #[async_trait]
    impl SynthesisAgent for MockAgent {
        async fn synthesize_persona(&self, request: &SynthesisRequest) -> Result<PersonaDraft> {
            self.synthesis_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_synthesis {
                return Err(DossierError::synthesis("link down"));
            }
            assert_eq!(request.region, self.region);
            Ok(PersonaDraft {
                full_name: "Aiko Matsubara".to_string(),
                date_of_birth: "1987-04-12".to_string(),
                age: 38,
                gender: Gender::Female,
                region: self.region.clone(),
                occupation: "Kintsugi restorer".to_string(),
                biography: "Two short sentences.".to_string(),
                interests: vec!["moss gardens".to_string()],
                personality_traits: vec!["patient".to_string()],
                ethnicity: "Japanese".to_string(),
                primary_language: "Japanese".to_string(),
            })
        }

        async fn expand_biography(&self, _record: &PersonaRecord) -> Result<String> {
            self.expansion_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.expansion_gate {
                let _permit = gate.acquire().await.expect("gate closed");
            }
            if self.fail_expansion {
                return Err(DossierError::expansion("link down"));
            }
            Ok(self.narrative.clone())
        }
    }

    fn engine_with(agent: MockAgent) -> (PersonaEngine, Arc<MockAgent>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = ProfileStorage::new(temp_dir.path()).unwrap();
        let agent = Arc::new(agent);
        let engine = PersonaEngine::new(agent.clone(), storage);
        (engine, agent, temp_dir)
    }

    fn reopen(engine: &PersonaEngine, temp_dir: &TempDir) -> PersonaEngine {
        let storage = ProfileStorage::new(temp_dir.path()).unwrap();
        PersonaEngine::new(engine.agent.clone(), storage)
    }

    #[tokio::test]
    async fn test_full_lifecycle_scenario() {
        let (engine, agent, temp_dir) = engine_with(MockAgent::new("Japan - Kyoto"));
        engine
            .set_region_filter(Some("Japan - Kyoto".to_string()))
            .await;

        // Generate: inserted at stream front, short form.
        let r1 = engine.generate().await.unwrap();
        let stream = engine.stream_records().await;
        assert_eq!(stream[0].id, r1.id);
        assert!(!stream[0].is_detailed);
        assert_eq!(stream[0].biography, stream[0].short_biography);

        // Save while signed out: prompt, no mutation.
        assert_eq!(
            engine.save_to_archive(&r1.id).await.unwrap(),
            SaveOutcome::SignInRequired
        );
        assert_eq!(engine.archive_len().await, 0);

        // Sign in and save.
        let identity = engine.sign_in("ada").await.unwrap();
        assert_eq!(identity.username, "ada");
        assert_eq!(
            engine.save_to_archive(&r1.id).await.unwrap(),
            SaveOutcome::Saved
        );
        assert_eq!(
            engine.save_to_archive(&r1.id).await.unwrap(),
            SaveOutcome::AlreadyArchived
        );
        assert_eq!(engine.archive_len().await, 1);

        // Expand: both copies detailed and identical.
        assert_eq!(
            engine.expand(&r1.id).await.unwrap(),
            ExpandOutcome::Deepened
        );
        let in_stream = engine.stream_records().await.remove(0);
        let in_archive = engine.archive_records().await.remove(0);
        assert_eq!(in_stream, in_archive);
        assert!(in_stream.is_detailed);
        assert_ne!(in_stream.biography, in_stream.short_biography);
        assert_eq!(agent.expansion_calls.load(Ordering::SeqCst), 1);

        // Archive snapshot on disk reflects the expansion.
        let reopened = reopen(&engine, &temp_dir);
        assert!(reopened.archive_records().await[0].is_detailed);

        // Remove: archive empty, persisted.
        assert!(engine.remove_from_archive(&r1.id).await.unwrap());
        assert_eq!(engine.archive_len().await, 0);
        assert!(!engine.remove_from_archive(&r1.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_stream_untouched() {
        let mut agent = MockAgent::new("Chile");
        agent.fail_synthesis = true;
        let (engine, _, _tmp) = engine_with(agent);

        let err = engine.generate().await.unwrap_err();
        assert!(err.is_synthesis());
        assert!(engine.stream_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_expansion_after_success_only_toggles() {
        let (engine, agent, _tmp) = engine_with(MockAgent::new("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();

        assert_eq!(
            engine.expand(&record.id).await.unwrap(),
            ExpandOutcome::Deepened
        );
        assert!(engine.is_expanded(&record.id).await);

        // Detailed now: further calls are pure view toggles, no requests.
        assert_eq!(
            engine.expand(&record.id).await.unwrap(),
            ExpandOutcome::Toggled { expanded: false }
        );
        assert_eq!(
            engine.expand(&record.id).await.unwrap(),
            ExpandOutcome::Toggled { expanded: true }
        );
        assert_eq!(agent.expansion_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expansion_failure_keeps_short_form_and_allows_retry() {
        let mut agent = MockAgent::new("Chile");
        agent.fail_expansion = true;
        let (engine, agent, _tmp) = engine_with(agent);
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();

        let err = engine.expand(&record.id).await.unwrap_err();
        assert!(err.is_expansion());

        let current = engine.get(&record.id).await.unwrap();
        assert!(!current.is_detailed);
        assert_eq!(current.biography, current.short_biography);
        assert!(!engine.is_expanding(&record.id).await);

        // Retry issues a fresh request.
        let _ = engine.expand(&record.id).await;
        assert_eq!(agent.expansion_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_narrative_falls_back_but_marks_detailed() {
        let mut agent = MockAgent::new("Chile");
        agent.narrative = "   ".to_string();
        let (engine, _, _tmp) = engine_with(agent);
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();

        assert_eq!(
            engine.expand(&record.id).await.unwrap(),
            ExpandOutcome::Deepened
        );
        let current = engine.get(&record.id).await.unwrap();
        assert!(current.is_detailed);
        assert_eq!(current.biography, current.short_biography);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_in_flight_exclusivity() {
        let (engine, agent, _tmp) = engine_with(MockAgent::gated("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();

        let first = tokio::spawn({
            let engine = engine.clone();
            let id = record.id.clone();
            async move { engine.expand(&id).await }
        });

        // Wait until the first request is actually outstanding.
        while !engine.is_expanding(&record.id).await {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            engine.expand(&record.id).await.unwrap(),
            ExpandOutcome::AlreadyInFlight
        );

        agent.expansion_gate.as_ref().unwrap().add_permits(1);
        assert_eq!(first.await.unwrap().unwrap(), ExpandOutcome::Deepened);
        assert_eq!(agent.expansion_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sign_out_resets_view_and_regates_saves() {
        let (engine, _, _tmp) = engine_with(MockAgent::new("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();

        engine.sign_in("ada").await.unwrap();
        engine.save_to_archive(&record.id).await.unwrap();
        engine.set_view(ActiveView::Archive).await;

        engine.sign_out().await.unwrap();
        assert_eq!(engine.view().await, ActiveView::Stream);
        assert!(engine.identity().await.is_none());
        // Already-fetched archive data stays in memory.
        assert_eq!(engine.archive_len().await, 1);

        let second = engine.generate().await.unwrap();
        assert_eq!(
            engine.save_to_archive(&second.id).await.unwrap(),
            SaveOutcome::SignInRequired
        );
    }

    #[tokio::test]
    async fn test_identity_survives_restart() {
        let (engine, _, temp_dir) = engine_with(MockAgent::new("Chile"));
        engine.sign_in("ada").await.unwrap();

        let reopened = reopen(&engine, &temp_dir);
        assert_eq!(reopened.identity().await.unwrap().username, "ada");
    }

    #[tokio::test]
    async fn test_edit_commit_replaces_record_in_both_views() {
        let (engine, _, temp_dir) = engine_with(MockAgent::new("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();
        engine.sign_in("ada").await.unwrap();
        engine.save_to_archive(&record.id).await.unwrap();

        engine.begin_edit(&record.id).await.unwrap();
        assert!(
            engine
                .update_draft(|draft| {
                    draft.full_name = "Edited Name".to_string();
                    draft.occupation = "Cartographer".to_string();
                })
                .await
        );
        // Draft mutations are invisible until commit.
        assert_eq!(engine.get(&record.id).await.unwrap().full_name, record.full_name);

        let committed = engine.commit_edit().await.unwrap().unwrap();
        assert_eq!(committed.full_name, "Edited Name");
        assert_eq!(engine.editing_id().await, None);

        let in_stream = engine.stream_records().await.remove(0);
        let in_archive = engine.archive_records().await.remove(0);
        assert_eq!(in_stream, in_archive);
        assert_eq!(in_stream.full_name, "Edited Name");

        // Persisted synchronously with the commit.
        let reopened = reopen(&engine, &temp_dir);
        assert_eq!(reopened.archive_records().await[0].full_name, "Edited Name");
    }

    #[tokio::test]
    async fn test_edit_cancel_and_empty_commit_are_noops() {
        let (engine, _, _tmp) = engine_with(MockAgent::new("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();

        engine.begin_edit(&record.id).await.unwrap();
        engine.update_draft(|draft| draft.age = 99).await;
        engine.cancel_edit().await;

        assert_eq!(engine.get(&record.id).await.unwrap().age, record.age);
        assert_eq!(engine.commit_edit().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_edit_commit_can_reset_detailed_state() {
        let (engine, agent, _tmp) = engine_with(MockAgent::new("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();
        engine.expand(&record.id).await.unwrap();

        engine.begin_edit(&record.id).await.unwrap();
        engine
            .update_draft(|draft| {
                draft.biography = draft.short_biography.clone();
                draft.is_detailed = false;
            })
            .await;
        engine.commit_edit().await.unwrap();

        // The record is short again; expanding issues a fresh request.
        assert!(!engine.get(&record.id).await.unwrap().is_detailed);
        assert!(!engine.is_expanded(&record.id).await);
        assert_eq!(
            engine.expand(&record.id).await.unwrap(),
            ExpandOutcome::Deepened
        );
        assert_eq!(agent.expansion_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_visible_projects_active_view_through_filter() {
        let (engine, _, _tmp) = engine_with(MockAgent::new("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();
        engine.sign_in("ada").await.unwrap();
        engine.save_to_archive(&record.id).await.unwrap();

        engine.set_query("kintsugi").await;
        assert_eq!(engine.visible().await.len(), 1);

        engine.set_query("nomatch").await;
        assert!(engine.visible().await.is_empty());

        engine.set_query("").await;
        engine.set_view(ActiveView::Archive).await;
        assert_eq!(engine.visible().await.len(), 1);

        engine.set_gender_filter(Some(Gender::Male)).await;
        assert!(engine.visible().await.is_empty());
    }

    #[tokio::test]
    async fn test_export_json_uses_canonical_form() {
        let (engine, _, _tmp) = engine_with(MockAgent::new("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();

        let json = engine.export_json(&record.id).await.unwrap();
        assert!(json.contains("\"fullName\": \"Aiko Matsubara\""));
        assert!(engine.export_json("ghost").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_archive_snapshot_loads_on_startup() {
        let (engine, _, temp_dir) = engine_with(MockAgent::new("Chile"));
        engine.set_region_filter(Some("Chile".to_string())).await;
        let record = engine.generate().await.unwrap();
        engine.sign_in("ada").await.unwrap();
        engine.save_to_archive(&record.id).await.unwrap();

        let reopened = reopen(&engine, &temp_dir);
        // The stream is session-scoped; only the archive survives.
        assert!(reopened.stream_records().await.is_empty());
        assert_eq!(reopened.archive_records().await[0].id, record.id);
    }
}
