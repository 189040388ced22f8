//! Persona domain model.
//!
//! This module contains the core `PersonaRecord` entity that the engine
//! operates on. It is independent of any storage format or rendering concern.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Closed gender enumeration used by the synthesis schema and filters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "Non-binary")]
    #[strum(serialize = "Non-binary")]
    NonBinary,
    Other,
}

impl Gender {
    /// All variants, in schema order. Used for the synthesis response schema
    /// and for filter menus.
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::NonBinary, Gender::Other];
}

/// One synthesized identity.
///
/// The `id` is assigned exactly once at creation and is the sole key for
/// membership, merge, and equality across the stream and the archive.
/// `short_biography` keeps the original two-sentence biography forever;
/// `biography` starts identical and is replaced once a deepening succeeds.
///
/// Field declaration order is the canonical key order for persisted
/// snapshots and clipboard exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaRecord {
    pub id: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub age: u32,
    pub gender: Gender,
    pub region: String,
    pub occupation: String,
    pub ethnicity: String,
    pub primary_language: String,
    pub interests: Vec<String>,
    pub personality_traits: Vec<String>,
    pub short_biography: String,
    pub biography: String,
    pub is_detailed: bool,
}

impl PersonaRecord {
    /// Materializes a record from the collaborator's structured output.
    ///
    /// Assigns a fresh id, keeps the returned biography as both the short
    /// and the current biography, and starts in the short (not detailed) form.
    pub fn from_draft(draft: PersonaDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            full_name: draft.full_name,
            date_of_birth: draft.date_of_birth,
            age: draft.age,
            gender: draft.gender,
            region: draft.region,
            occupation: draft.occupation,
            ethnicity: draft.ethnicity,
            primary_language: draft.primary_language,
            interests: draft.interests,
            personality_traits: draft.personality_traits,
            short_biography: draft.biography.clone(),
            biography: draft.biography,
            is_detailed: false,
        }
    }

    /// Canonical human-readable JSON for clipboard export.
    ///
    /// Key order follows the struct declaration; this is a one-way,
    /// best-effort side effect and not part of core state.
    pub fn to_clipboard_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The structured output of the generative collaborator, before an identity
/// has been assigned. Every field is required; a response missing any of
/// them is a schema violation and fails deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDraft {
    pub full_name: String,
    pub date_of_birth: String,
    pub age: u32,
    pub gender: Gender,
    pub region: String,
    pub occupation: String,
    pub biography: String,
    pub interests: Vec<String>,
    pub personality_traits: Vec<String>,
    pub ethnicity: String,
    pub primary_language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft(region: &str) -> PersonaDraft {
        PersonaDraft {
            full_name: "Aiko Matsubara".to_string(),
            date_of_birth: "1987-04-12".to_string(),
            age: 38,
            gender: Gender::Female,
            region: region.to_string(),
            occupation: "Kintsugi restorer".to_string(),
            biography: "Aiko repaired a 300-year-old tea bowl last spring. \
                        The commission changed how she prices her work."
                .to_string(),
            interests: vec!["urushi lacquer".to_string(), "moss gardens".to_string()],
            personality_traits: vec!["patient".to_string(), "exacting".to_string()],
            ethnicity: "Japanese".to_string(),
            primary_language: "Japanese".to_string(),
        }
    }

    #[test]
    fn test_from_draft_assigns_id_and_short_form() {
        let record = PersonaRecord::from_draft(sample_draft("Japan - Kyoto"));

        assert!(Uuid::parse_str(&record.id).is_ok());
        assert!(!record.is_detailed);
        assert_eq!(record.biography, record.short_biography);
    }

    #[test]
    fn test_from_draft_ids_are_unique() {
        let a = PersonaRecord::from_draft(sample_draft("Chile"));
        let b = PersonaRecord::from_draft(sample_draft("Chile"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_gender_serde_uses_closed_labels() {
        assert_eq!(
            serde_json::to_string(&Gender::NonBinary).unwrap(),
            "\"Non-binary\""
        );
        let parsed: Gender = serde_json::from_str("\"Non-binary\"").unwrap();
        assert_eq!(parsed, Gender::NonBinary);
        assert!(serde_json::from_str::<Gender>("\"Unknown\"").is_err());
    }

    #[test]
    fn test_draft_rejects_missing_fields() {
        // Schema violation: no occupation.
        let json = r#"{
            "fullName": "X", "dateOfBirth": "1990-01-01", "age": 30,
            "gender": "Other", "region": "Chile", "biography": "b",
            "interests": [], "personalityTraits": [],
            "ethnicity": "e", "primaryLanguage": "Spanish"
        }"#;
        assert!(serde_json::from_str::<PersonaDraft>(json).is_err());
    }

    #[test]
    fn test_clipboard_json_key_order_is_canonical() {
        let record = PersonaRecord::from_draft(sample_draft("Japan - Kyoto"));
        let json = record.to_clipboard_json().unwrap();

        let order = [
            "\"id\"",
            "\"fullName\"",
            "\"dateOfBirth\"",
            "\"age\"",
            "\"gender\"",
            "\"region\"",
            "\"occupation\"",
            "\"ethnicity\"",
            "\"primaryLanguage\"",
            "\"interests\"",
            "\"personalityTraits\"",
            "\"shortBiography\"",
            "\"biography\"",
            "\"isDetailed\"",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|key| json.find(key).unwrap_or_else(|| panic!("missing {key}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
