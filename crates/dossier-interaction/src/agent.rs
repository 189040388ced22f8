//! The seam between the engine and the generative collaborator.

use async_trait::async_trait;
use dossier_core::regions;
use dossier_core::{PersonaDraft, PersonaRecord, Result};

/// Diversity constraints for one synthesis call.
///
/// The seed token is fresh per call to discourage the collaborator from
/// repeating names and tropes across requests.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub region: String,
    pub archetype: String,
    pub seed: String,
}

impl SynthesisRequest {
    /// Builds a request for the given region filter. `None` (the "All"
    /// sentinel) draws a region uniformly from the catalog.
    pub fn for_region(explicit_region: Option<&str>) -> Self {
        Self {
            region: regions::pick_region(explicit_region),
            archetype: regions::pick_archetype().to_string(),
            seed: regions::seed_token(),
        }
    }
}

/// A generative collaborator that can synthesize persona records and deepen
/// their biographies.
///
/// Implementations convert their transport failures into
/// [`DossierError::Synthesis`] / [`DossierError::Expansion`] so nothing
/// transport-specific leaks into the engine.
///
/// [`DossierError::Synthesis`]: dossier_core::DossierError::Synthesis
/// [`DossierError::Expansion`]: dossier_core::DossierError::Expansion
#[async_trait]
pub trait SynthesisAgent: Send + Sync {
    /// Produces one structured persona draft under the request's
    /// constraints. Any malformed or schema-violating response is a
    /// `Synthesis` error; no partial drafts.
    async fn synthesize_persona(&self, request: &SynthesisRequest) -> Result<PersonaDraft>;

    /// Produces the expanded three-paragraph narrative for a record.
    ///
    /// May return an empty string; the engine falls back to the existing
    /// biography in that case and still treats the expansion as successful.
    async fn expand_biography(&self, record: &PersonaRecord) -> Result<String>;
}
