use crate::gazetteer::Gazetteer;
use indexmap::IndexSet;

/// Which gazetteer pass recognised a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaceMatch {
    Pure(String),
    Categorized(String),
}

/// Decides whether a token names a place. Callers only see the outcome, so
/// the substring heuristic can be replaced without touching them.
pub trait PlaceMatcher: Send + Sync {
    fn find(&self, token: &str) -> Option<PlaceMatch>;

    fn is_geo(&self, token: &str) -> bool {
        self.find(token).is_some()
    }
}

/// Two-pass literal substring matcher.
///
/// Pass 1 accepts containment in either direction against the pure keys.
/// Pass 2 runs only when pass 1 fails and accepts the token as a substring of
/// a categorized key. The first entry that matches wins.
#[derive(Clone, Debug, Default)]
pub struct SubstringMatcher {
    pure: IndexSet<String>,
    categorized: IndexSet<String>,
}

impl SubstringMatcher {
    pub fn new<P, C>(pure: P, categorized: C) -> Self
    where
        P: IntoIterator<Item = String>,
        C: IntoIterator<Item = String>,
    {
        Self {
            pure: pure.into_iter().map(|w| w.to_lowercase()).collect(),
            categorized: categorized.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn from_gazetteer(gazetteer: &Gazetteer) -> Self {
        Self::new(
            gazetteer.pure_locations_combined(),
            gazetteer.category_adder_combined(),
        )
    }

    pub fn pure_len(&self) -> usize {
        self.pure.len()
    }

    pub fn categorized_len(&self) -> usize {
        self.categorized.len()
    }
}

impl PlaceMatcher for SubstringMatcher {
    fn find(&self, token: &str) -> Option<PlaceMatch> {
        let token = token.to_lowercase();

        if let Some(entry) = self
            .pure
            .iter()
            .find(|entry| entry.contains(token.as_str()) || token.contains(entry.as_str()))
        {
            return Some(PlaceMatch::Pure(entry.clone()));
        }

        self.categorized
            .iter()
            .find(|entry| entry.contains(token.as_str()))
            .map(|entry| PlaceMatch::Categorized(entry.clone()))
    }
}
