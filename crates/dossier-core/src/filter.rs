//! Read-only filter projection over a record collection.

use serde::{Deserialize, Serialize};

use crate::persona::{Gender, PersonaRecord};

/// The three conjunctive filter predicates.
///
/// `None` on `region`/`gender` and an empty `query` are the "All" sentinels:
/// each widens its predicate to match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub region: Option<String>,
    pub gender: Option<Gender>,
}

impl FilterState {
    /// Whether a record passes all three predicates.
    ///
    /// The query matches case-insensitively as a substring of the full name,
    /// occupation, or region; region and gender filters match exactly.
    pub fn matches(&self, record: &PersonaRecord) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || record.full_name.to_lowercase().contains(&query)
            || record.occupation.to_lowercase().contains(&query)
            || record.region.to_lowercase().contains(&query);

        let matches_region = self
            .region
            .as_ref()
            .map_or(true, |region| &record.region == region);

        let matches_gender = self.gender.map_or(true, |gender| record.gender == gender);

        matches_query && matches_region && matches_gender
    }

    /// Projects a collection through the filter, preserving source order.
    /// Never mutates the collection.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a PersonaRecord>
    where
        I: IntoIterator<Item = &'a PersonaRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}
