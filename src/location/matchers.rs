//! Matcher strategies for the resolution precedence chain.
//!
//! Each [`MatchRule`] is evaluated against the whole gazetteer before the
//! next rule is tried. The first rule that yields a location wins.

use super::gazetteer::Gazetteer;
use super::types::{CampusLocation, MatchRule};

/// Id of the location every library reference resolves to.
pub const LIBRARY_ID: &str = "library";

const LIBRARY_KEYWORDS: &[&str] = &["library", "mcdermott"];

/// Words dropped before containment and word-prefix matching.
const FILLER_WORDS: &[&str] = &["building", "center", "hall"];

/// Minimum length (in chars) of the prefixing token in word-prefix matching.
const MIN_PREFIX_LEN: usize = 3;

struct EngineeringHeuristic {
    code: &'static str,
    wing: &'static str,
    target_id: &'static str,
}

const ENGINEERING_HEURISTICS: &[EngineeringHeuristic] = &[
    EngineeringHeuristic { code: "ecsw", wing: "west", target_id: "ecsw" },
    EngineeringHeuristic { code: "ecss", wing: "south", target_id: "ecss" },
    EngineeringHeuristic { code: "ecsn", wing: "north", target_id: "ecsn" },
];

/// The default precedence chain, strongest rule first.
pub const DEFAULT_CHAIN: &[MatchRule] = &[
    MatchRule::Library,
    MatchRule::ExactName,
    MatchRule::ExactAlias,
    MatchRule::RawName,
    MatchRule::Containment,
    MatchRule::WordPrefix,
    MatchRule::EngineeringHeuristic,
];

/// Trim, lowercase, and collapse whitespace runs to a single space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop "building", "center" and "hall" tokens from normalized text.
/// Surrounding punctuation is ignored when spotting them ("hall," counts).
pub fn strip_filler_words(normalized: &str) -> String {
    normalized
        .split(' ')
        .filter(|t| {
            let bare = t.trim_matches(|c: char| !c.is_alphanumeric());
            !t.is_empty() && !FILLER_WORDS.contains(&bare)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A query in every form the rules need, computed once per resolve.
#[derive(Debug, Clone)]
pub struct PreparedQuery<'q> {
    pub raw: &'q str,
    pub normalized: String,
    pub stripped: String,
}

impl<'q> PreparedQuery<'q> {
    pub fn new(raw: &'q str) -> Self {
        let normalized = normalize(raw);
        let stripped = strip_filler_words(&normalized);
        Self { raw, normalized, stripped }
    }

    pub fn is_blank(&self) -> bool {
        self.normalized.is_empty()
    }

    fn tokens(&self) -> impl Iterator<Item = &str> {
        self.stripped.split(' ').filter(|t| !t.is_empty())
    }
}

impl MatchRule {
    /// Evaluate this rule over the full gazetteer.
    pub fn apply<'g>(&self, query: &PreparedQuery<'_>, gazetteer: &'g Gazetteer) -> Option<&'g CampusLocation> {
        match self {
            Self::Library => match_library(query, gazetteer),
            Self::ExactName => gazetteer
                .entries()
                .find(|(_, keys)| keys.name == query.normalized)
                .map(|(loc, _)| loc),
            Self::ExactAlias => gazetteer
                .entries()
                .find(|(_, keys)| keys.aliases.iter().any(|a| *a == query.normalized))
                .map(|(loc, _)| loc),
            Self::RawName => gazetteer.locations().iter().find(|loc| loc.name == query.raw),
            Self::Containment => match_containment(query, gazetteer),
            Self::WordPrefix => match_word_prefix(query, gazetteer),
            Self::EngineeringHeuristic => match_engineering(query, gazetteer),
        }
    }
}

fn match_library<'g>(query: &PreparedQuery<'_>, gazetteer: &'g Gazetteer) -> Option<&'g CampusLocation> {
    if LIBRARY_KEYWORDS.iter().any(|k| query.normalized.contains(k)) {
        gazetteer.get_by_id(LIBRARY_ID)
    } else {
        None
    }
}

/// Either-direction substring match on stripped forms. The longest matching
/// candidate wins; ties keep the earliest gazetteer entry.
fn match_containment<'g>(query: &PreparedQuery<'_>, gazetteer: &'g Gazetteer) -> Option<&'g CampusLocation> {
    let q = query.stripped.as_str();
    if q.is_empty() {
        return None;
    }

    let mut best: Option<(&CampusLocation, usize)> = None;
    for (loc, keys) in gazetteer.entries() {
        for candidate in &keys.stripped {
            if !(q.contains(candidate.as_str()) || candidate.contains(q)) {
                continue;
            }
            let len = candidate.chars().count();
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((loc, len));
            }
        }
    }
    best.map(|(loc, _)| loc)
}

fn is_abbreviation_of(short: &str, long: &str) -> bool {
    short.chars().count() >= MIN_PREFIX_LEN && long.starts_with(short)
}

/// Token-level prefix match against stripped canonical names.
fn match_word_prefix<'g>(query: &PreparedQuery<'_>, gazetteer: &'g Gazetteer) -> Option<&'g CampusLocation> {
    let query_tokens: Vec<&str> = query.tokens().collect();
    if query_tokens.is_empty() {
        return None;
    }

    gazetteer
        .entries()
        .find(|(_, keys)| {
            query_tokens.iter().any(|qt| {
                keys.name_tokens
                    .iter()
                    .any(|ct| is_abbreviation_of(qt, ct) || is_abbreviation_of(ct, qt))
            })
        })
        .map(|(loc, _)| loc)
}

fn match_engineering<'g>(query: &PreparedQuery<'_>, gazetteer: &'g Gazetteer) -> Option<&'g CampusLocation> {
    let q = query.normalized.as_str();
    ENGINEERING_HEURISTICS
        .iter()
        .find(|h| q.contains(h.code) || (q.contains("engineering") && q.contains(h.wing)))
        .and_then(|h| gazetteer.get_by_id(h.target_id))
}
