//! Location resolver: runs the matcher chain over a gazetteer.
//!
//! Query flow:  blank check → Library → ExactName → ExactAlias → RawName →
//!              Containment → WordPrefix → EngineeringHeuristic → Unresolved

use super::gazetteer::Gazetteer;
use super::matchers::{PreparedQuery, DEFAULT_CHAIN, LIBRARY_ID};
use super::types::{CampusLocation, MatchResult, MatchRule};

/// Labels that introduce a location inside free-form event text.
const FRAGMENT_LABELS: &[&str] = &["location:", "where:", "venue:", "place:"];

/// Resolves free text to at most one campus location. Holds no mutable
/// state, so one resolver can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct LocationResolver<'g> {
    gazetteer: &'g Gazetteer,
    chain: Vec<MatchRule>,
}

impl LocationResolver<'static> {
    /// Resolver over the compiled-in campus dataset.
    pub fn builtin() -> Self {
        Self::new(Gazetteer::builtin())
    }
}

impl<'g> LocationResolver<'g> {
    pub fn new(gazetteer: &'g Gazetteer) -> Self {
        Self::with_chain(gazetteer, DEFAULT_CHAIN)
    }

    /// Create a resolver with a custom rule order.
    pub fn with_chain(gazetteer: &'g Gazetteer, chain: &[MatchRule]) -> Self {
        Self { gazetteer, chain: chain.to_vec() }
    }

    pub fn gazetteer(&self) -> &'g Gazetteer {
        self.gazetteer
    }

    pub fn chain(&self) -> &[MatchRule] {
        &self.chain
    }

    /// Resolve a location string. Never fails; blank input is `Unresolved`.
    pub fn resolve(&self, query: &str) -> MatchResult<'g> {
        let prepared = PreparedQuery::new(query);
        if prepared.is_blank() {
            return MatchResult::Unresolved;
        }

        for rule in &self.chain {
            if let Some(location) = rule.apply(&prepared, self.gazetteer) {
                tracing::debug!(query, rule = %rule, id = %location.id, "location resolved");
                return MatchResult::Matched { location, rule: *rule };
            }
        }

        tracing::debug!(query, "location unresolved");
        MatchResult::Unresolved
    }

    /// Resolve an event description. An embedded "Location: X" fragment is
    /// tried first; the whole text is the fallback.
    pub fn resolve_description(&self, text: &str) -> MatchResult<'g> {
        if let Some(fragment) = extract_location_fragment(text) {
            let result = self.resolve(fragment);
            if result.is_resolved() {
                return result;
            }
        }
        self.resolve(text)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&'g CampusLocation> {
        self.gazetteer.get_by_id(id)
    }

    pub fn search_prefix(&self, query: &str) -> Vec<&'g CampusLocation> {
        self.gazetteer.search_prefix(query)
    }

    /// The library, which calling code conventionally uses when a query is
    /// unresolved.
    pub fn default_location(&self) -> Option<&'g CampusLocation> {
        self.gazetteer.get_by_id(LIBRARY_ID)
    }
}

/// Pull the text following a "Location:" style label, up to the end of the
/// line or sentence.
pub fn extract_location_fragment(text: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let (start, label) = FRAGMENT_LABELS
        .iter()
        .filter_map(|label| {
            lower
                .match_indices(label)
                .map(|(idx, _)| idx)
                .find(|&idx| starts_word(&lower, idx))
                .map(|idx| (idx, *label))
        })
        .min_by_key(|(idx, _)| *idx)?;

    let rest = &text[start + label.len()..];
    let line_end = rest.find(['\n', ';', '|']).unwrap_or(rest.len());
    let mut fragment = &rest[..line_end];
    if let Some(sentence_end) = fragment.find(". ") {
        fragment = &fragment[..sentence_end];
    }

    let fragment = fragment.trim().trim_end_matches('.').trim_end();
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// A label only counts at the start of the text or after a non-alphanumeric
/// character, so "Anywhere:" is not read as "where:".
fn starts_word(text: &str, idx: usize) -> bool {
    text[..idx].chars().next_back().map_or(true, |c| !c.is_alphanumeric())
}
