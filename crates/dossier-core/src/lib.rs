//! Domain layer of the dossier persona engine.
//!
//! Pure models and state machines: the persona record, the canonical record
//! store with its stream/archive views, filtering, the edit workflow, the
//! identity gate, and JSON file storage. Nothing in this crate talks to the
//! network or renders anything.

pub mod edit;
pub mod error;
pub mod filter;
pub mod identity;
pub mod persona;
pub mod regions;
pub mod storage;
pub mod store;

pub use edit::EditSession;
pub use error::{DossierError, Result};
pub use filter::FilterState;
pub use identity::Identity;
pub use persona::{Gender, PersonaDraft, PersonaRecord};
pub use storage::ProfileStorage;
pub use store::RecordStore;
