//! Application layer: the persona lifecycle engine and its transient
//! expansion bookkeeping.

pub mod engine;
pub mod expansion;

pub use engine::{ActiveView, ExpandOutcome, PersonaEngine, SaveOutcome};
pub use expansion::{ExpansionState, ExpansionTracker};
