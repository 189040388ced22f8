//! Generative collaborator layer: the `SynthesisAgent` seam, prompt and
//! schema builders, and the Gemini REST implementation.

pub mod agent;
pub mod gemini;
pub mod prompt;

pub use agent::{SynthesisAgent, SynthesisRequest};
pub use gemini::GeminiAgent;
