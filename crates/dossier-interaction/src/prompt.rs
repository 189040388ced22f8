//! Prompt and response-schema builders for the generative collaborator.

use dossier_core::{Gender, PersonaRecord};
use serde_json::{json, Value};

use crate::agent::SynthesisRequest;

/// Prompt for synthesizing a new persona under the request's diversity
/// constraints.
pub fn synthesis_prompt(request: &SynthesisRequest) -> String {
    format!(
        "Generate a completely UNIQUE and realistic human persona for a simulation.\n\
         STRICT DIVERSITY PROTOCOL:\n\
         1. REGION: The persona MUST be from: \"{region}\".\n\
         2. ARCHETYPE: Use the spirit of a \"{archetype}\" but keep it grounded.\n\
         3. OCCUPATION: Avoid generic software engineers or CEOs. Use specific, niche roles.\n\
         4. INTERESTS: Must be ultra-specific.\n\
         5. PERSONALITY: Use nuanced traits.\n\
         6. REPETITION: Do not use common name tropes. Seed: {seed}.\n\
         7. BIOGRAPHY: 2 sentences focusing on a specific recent life event related to their \
         occupation or region.",
        region = request.region,
        archetype = request.archetype,
        seed = request.seed,
    )
}

/// Structured-output schema for persona synthesis: an object with every
/// field required. Any other response shape is a failure.
pub fn synthesis_response_schema() -> Value {
    let gender_labels: Vec<String> = Gender::ALL.iter().map(|g| g.to_string()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "fullName": { "type": "STRING" },
            "dateOfBirth": { "type": "STRING" },
            "age": { "type": "INTEGER" },
            "gender": { "type": "STRING", "enum": gender_labels },
            "region": { "type": "STRING" },
            "occupation": { "type": "STRING" },
            "biography": { "type": "STRING" },
            "interests": { "type": "ARRAY", "items": { "type": "STRING" } },
            "personalityTraits": { "type": "ARRAY", "items": { "type": "STRING" } },
            "ethnicity": { "type": "STRING" },
            "primaryLanguage": { "type": "STRING" }
        },
        "required": [
            "fullName", "dateOfBirth", "age", "gender", "region", "occupation",
            "biography", "interests", "personalityTraits", "ethnicity", "primaryLanguage"
        ]
    })
}

/// Free-form prompt for deepening a record's biography into the fixed
/// three-paragraph structure.
pub fn expansion_prompt(record: &PersonaRecord) -> String {
    format!(
        "Expand the biography of this persona into a deep, soulful, 3-paragraph narrative.\n\
         Persona Details: {name}, {age} year old {gender} {occupation} from {region}.\n\
         Ethnicity: {ethnicity} | Personality: {traits} | Interests: {interests}.\n\
         \n\
         REQUIREMENTS FOR EXPANSION:\n\
         1. Paragraph 1: Roots & Heritage.\n\
         2. Paragraph 2: Motivation & Conflict.\n\
         3. Paragraph 3: The Horizon.",
        name = record.full_name,
        age = record.age,
        gender = record.gender,
        occupation = record.occupation,
        region = record.region,
        ethnicity = record.ethnicity,
        traits = record.personality_traits.join(", "),
        interests = record.interests.join(", "),
    )
}
