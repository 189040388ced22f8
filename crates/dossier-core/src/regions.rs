//! Region and archetype catalogs plus the random pickers that feed
//! generation requests.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

/// Fixed region catalog (200+ entries, country or country-subregion).
pub const GLOBAL_REGIONS: &[&str] = &[
    "Afghanistan", "Albania", "Algeria", "Andorra", "Angola", "Argentina", "Armenia",
    "Australia - NSW", "Australia - Queensland", "Australia - Victoria", "Austria", "Azerbaijan",
    "Bahamas", "Bahrain", "Bangladesh", "Barbados", "Belarus", "Belgium", "Belize", "Benin",
    "Bhutan", "Bolivia", "Bosnia and Herzegovina", "Botswana", "Brazil - Amazonas",
    "Brazil - Bahia", "Brazil - Sao Paulo", "Bulgaria", "Burkina Faso", "Burundi", "Cambodia",
    "Cameroon", "Canada - Alberta", "Canada - BC", "Canada - Ontario", "Canada - Quebec",
    "Cape Verde", "Central African Republic", "Chad", "Chile", "China - Guangdong",
    "China - Sichuan", "China - Tibet", "Colombia", "Comoros", "Congo", "Costa Rica", "Croatia",
    "Cuba", "Cyprus", "Czech Republic", "Denmark", "Djibouti", "Dominica", "Dominican Republic",
    "Ecuador", "Egypt", "El Salvador", "Equatorial Guinea", "Eritrea", "Estonia", "Eswatini",
    "Ethiopia", "Fiji", "Finland", "France - Brittany", "France - Paris", "Gabon", "Gambia",
    "Georgia", "Germany - Bavaria", "Germany - Berlin", "Ghana", "Greece", "Grenada",
    "Guatemala", "Guinea", "Guyana", "Haiti", "Honduras", "Hungary", "Iceland", "India - Kerala",
    "India - Maharashtra", "India - Punjab", "Indonesia - Bali", "Indonesia - Jakarta", "Iran",
    "Iraq", "Ireland", "Israel", "Italy - Sicily", "Italy - Tuscany", "Ivory Coast", "Jamaica",
    "Japan - Hokkaido", "Japan - Kyoto", "Japan - Tokyo", "Jordan", "Kazakhstan", "Kenya",
    "Kiribati", "Kuwait", "Kyrgyzstan", "Laos", "Latvia", "Lebanon", "Lesotho", "Liberia",
    "Libya", "Liechtenstein", "Lithuania", "Luxembourg", "Madagascar", "Malawi", "Malaysia",
    "Maldives", "Mali", "Malta", "Mauritania", "Mauritius", "Mexico - Jalisco",
    "Mexico - Mexico City", "Moldova", "Monaco", "Mongolia", "Montenegro", "Morocco",
    "Mozambique", "Myanmar", "Namibia", "Nauru", "Nepal", "Netherlands", "New Zealand",
    "Nicaragua", "Niger", "Nigeria", "North Korea", "North Macedonia", "Norway", "Oman",
    "Pakistan", "Palau", "Panama", "Papua New Guinea", "Paraguay", "Peru", "Philippines",
    "Poland", "Portugal", "Qatar", "Romania", "Russia - Moscow", "Russia - Siberia", "Rwanda",
    "Samoa", "San Marino", "Saudi Arabia", "Senegal", "Serbia", "Seychelles", "Sierra Leone",
    "Singapore", "Slovakia", "Slovenia", "Solomon Islands", "Somalia", "South Africa",
    "South Korea", "Spain - Catalonia", "Spain - Madrid", "Sri Lanka", "Sudan", "Suriname",
    "Sweden", "Switzerland", "Syria", "Taiwan", "Tajikistan", "Tanzania", "Thailand",
    "Timor-Leste", "Togo", "Tonga", "Trinidad and Tobago", "Tunisia", "Turkey", "Turkmenistan",
    "Tuvalu", "Uganda", "Ukraine", "United Arab Emirates", "United Kingdom - Scotland",
    "United Kingdom - Wales", "Uruguay", "USA - Alabama", "USA - Alaska", "USA - Arizona",
    "USA - Arkansas", "USA - California", "USA - Colorado", "USA - Connecticut", "USA - Delaware",
    "USA - Florida", "USA - Georgia", "USA - Hawaii", "USA - Idaho", "USA - Illinois",
    "USA - Indiana", "USA - Iowa", "USA - Kansas", "USA - Kentucky", "USA - Louisiana",
    "USA - Maine", "USA - Maryland", "USA - Massachusetts", "USA - Michigan", "USA - Minnesota",
    "USA - Mississippi", "USA - Missouri", "USA - Montana", "USA - Nebraska", "USA - Nevada",
    "USA - New Hampshire", "USA - New Jersey", "USA - New Mexico", "USA - New York",
    "USA - North Carolina", "USA - North Dakota", "USA - Ohio", "USA - Oklahoma", "USA - Oregon",
    "USA - Pennsylvania", "USA - Rhode Island", "USA - South Carolina", "USA - South Dakota",
    "USA - Tennessee", "USA - Texas", "USA - Utah", "USA - Vermont", "USA - Virginia",
    "USA - Washington", "USA - West Virginia", "USA - Wisconsin", "USA - Wyoming", "Uzbekistan",
    "Vanuatu", "Vatican City", "Venezuela", "Vietnam - Hanoi", "Vietnam - Saigon", "Yemen",
    "Zambia", "Zimbabwe",
];

/// Archetype labels injected into synthesis prompts for entropy.
pub const ARCHETYPES: &[&str] = &[
    "Traditional Artisan",
    "Digital Nomad",
    "Off-grid Specialist",
    "Obscure Academic",
    "Niche Hobbyist",
    "Civic Leader",
    "Night-shift Worker",
    "Hidden Talent",
    "Cultural Preservationist",
    "Practical Problem Solver",
    "Aspiring Visionary",
    "Grounded Professional",
];

/// Picks the region a synthesis request is constrained to.
///
/// An explicit region is returned unchanged. `None` (the "All" sentinel)
/// draws uniformly from the catalog by taking the head of a full
/// Fisher-Yates shuffle, so no positional bias toward catalog order leaks
/// into generated personas.
pub fn pick_region(explicit: Option<&str>) -> String {
    match explicit {
        Some(region) => region.to_string(),
        None => {
            let mut catalog: Vec<&str> = GLOBAL_REGIONS.to_vec();
            catalog.shuffle(&mut rand::thread_rng());
            catalog[0].to_string()
        }
    }
}

/// Picks a random archetype label for a synthesis request.
pub fn pick_archetype() -> &'static str {
    ARCHETYPES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(ARCHETYPES[0])
}

/// A fresh per-call seed token, embedded in the prompt to discourage the
/// collaborator from repeating itself.
pub fn seed_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}

/// The region catalog sorted alphabetically, for filter menus.
pub fn sorted_regions() -> Vec<&'static str> {
    let mut regions = GLOBAL_REGIONS.to_vec();
    regions.sort_unstable();
    regions
}
