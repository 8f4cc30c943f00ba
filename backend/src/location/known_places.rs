//! Fixed table of place names the assistant knows about, with the lookup
//! helpers shared by the context builder and the title generator.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use once_cell::sync::Lazy;

/// Lowercase phrase -> display name. Covers the city areas, hubs and
/// landmarks that show up in journey queries.
pub const KNOWN_PLACES: &[(&str, &str)] = &[
    // Major cities
    ("mumbai", "Mumbai"),
    ("delhi", "Delhi"),
    ("bangalore", "Bangalore"),
    ("bengaluru", "Bangalore"),
    ("hyderabad", "Hyderabad"),
    ("chennai", "Chennai"),
    ("kolkata", "Kolkata"),
    ("pune", "Pune"),
    ("nashik", "Nashik"),
    ("nagpur", "Nagpur"),
    ("goa", "Goa"),
    // Pune areas and suburbs
    ("dighi", "Dighi"),
    ("hinjewadi", "Hinjewadi"),
    ("koregaon park", "Koregaon Park"),
    ("koregaon", "Koregaon Park"),
    ("camp", "Camp"),
    ("hadapsar", "Hadapsar"),
    ("wakad", "Wakad"),
    ("baner", "Baner"),
    ("aundh", "Aundh"),
    ("pimpri", "Pimpri"),
    ("chinchwad", "Chinchwad"),
    ("pcmc", "Pimpri-Chinchwad"),
    ("katraj", "Katraj"),
    ("kothrud", "Kothrud"),
    ("deccan", "Deccan"),
    ("shivajinagar", "Shivajinagar"),
    ("fc road", "FC Road"),
    ("mg road", "MG Road"),
    ("jm road", "JM Road"),
    ("pashan", "Pashan"),
    ("bavdhan", "Bavdhan"),
    ("warje", "Warje"),
    ("karve nagar", "Karve Nagar"),
    ("kharadi", "Kharadi"),
    ("viman nagar", "Viman Nagar"),
    ("yerawada", "Yerawada"),
    ("magarpatta", "Magarpatta"),
    ("pune station", "Pune Railway Station"),
    // Transportation hubs
    ("pune airport", "Pune Airport"),
    ("airport", "Airport"),
    ("pnq", "Pune Airport"),
    ("railway station", "Railway Station"),
    ("bus station", "Bus Station"),
    ("bus stand", "Bus Stand"),
    ("metro station", "Metro Station"),
    // Institutions and landmarks
    ("pune university", "Pune University"),
    ("symbiosis", "Symbiosis"),
    ("coep", "COEP"),
    ("fergusson college", "Fergusson College"),
    ("seasons mall", "Seasons Mall"),
    ("phoenix mills", "Phoenix Mills"),
    ("ruby hall", "Ruby Hall Clinic"),
];

// Longest phrases first, so "pune airport" matches before "airport".
static PLACES_BY_LENGTH: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut places = KNOWN_PLACES.to_vec();
    places.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    places
});

static MATCHER: Lazy<SkimMatcherV2> = Lazy::new(SkimMatcherV2::default);

/// Maps a free-text phrase onto a known display name: direct table hit
/// first, then containment in either direction.
pub fn display_name(text: &str) -> Option<&'static str> {
    let clean = text.trim().to_lowercase();
    if clean.is_empty() {
        return None;
    }

    for &(key, value) in KNOWN_PLACES {
        if clean == key {
            return Some(value);
        }
    }

    for &(key, value) in PLACES_BY_LENGTH.iter() {
        if clean.contains(key) || key.contains(clean.as_str()) {
            return Some(value);
        }
    }

    None
}

/// Scans a whole message for the first known place mention. Exact phrase
/// containment wins; a fuzzy pass over individual words catches near-miss
/// spellings such as "kharad".
pub fn scan_for_known_place(message: &str) -> Option<String> {
    let lower = message.to_lowercase();

    for &(key, value) in PLACES_BY_LENGTH.iter() {
        if lower.contains(key) {
            return Some(value.to_string());
        }
    }

    lower
        .split_whitespace()
        .filter(|word| word.chars().count() >= 5)
        .find_map(|word| closest_known_place(word).map(str::to_string))
}

/// Fuzzy lookup of a single word against the place table. The score
/// threshold scales with the word length so short tokens cannot sneak in on
/// a couple of scattered character hits.
pub fn closest_known_place(word: &str) -> Option<&'static str> {
    let threshold = 4 * word.chars().count() as i64;

    PLACES_BY_LENGTH
        .iter()
        .filter_map(|&(key, value)| {
            MATCHER
                .fuzzy_match(key, word)
                .filter(|score| *score >= threshold)
                .map(|score| (score, value))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, value)| value)
}

/// Cleans up the spellings that show up constantly in journey queries
/// before a phrase is handed to the geocoding/directions collaborator.
pub fn normalize_location_name(location: &str) -> String {
    let mut normalized = location.to_lowercase();
    for (from, to) in [
        ("ispune", "pune"),
        ("sttion", "station"),
        ("rly", "railway"),
        ("stn", "station"),
    ] {
        normalized = normalized.replace(from, to);
    }
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_exact_match() {
        assert_eq!(display_name("dighi"), Some("Dighi"));
        assert_eq!(display_name("  Koregaon Park "), Some("Koregaon Park"));
    }

    #[test]
    fn display_name_falls_back_to_containment() {
        assert_eq!(display_name("near the pune airport please"), Some("Pune Airport"));
        assert_eq!(display_name("unknown place"), None);
    }

    #[test]
    fn scan_prefers_longer_phrases() {
        assert_eq!(
            scan_for_known_place("how do I reach pune airport today"),
            Some("Pune Airport".to_string())
        );
    }

    #[test]
    fn scan_finds_fuzzy_mentions() {
        assert_eq!(
            scan_for_known_place("take me to kharad"),
            Some("Kharadi".to_string())
        );
        assert_eq!(scan_for_known_place("zzzz qqqq"), None);
    }

    #[test]
    fn normalize_fixes_common_typos() {
        assert_eq!(normalize_location_name("pune rly sttion"), "pune railway station");
        assert_eq!(normalize_location_name("  pune   stn "), "pune station");
    }
}
