use crate::core::search::autocomplete;
use crate::core::search::fuzzy::{FuzzyMatch, ranked_matches, ranked_matches_limited};
use crate::error::ConfigError;

/// States, the District of Columbia and Puerto Rico.
pub const US_STATES: &[&str] = &[
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "District of Columbia",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Puerto Rico",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

/// Values offered by a text field's autocomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionList {
    items: Vec<String>,
}

impl SuggestionList {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    pub fn us_states() -> Self {
        Self::new(US_STATES.iter().map(|state| state.to_string()).collect())
    }

    /// Parses a JSON-encoded array of strings.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let items: Vec<String> = serde_json::from_str(raw)?;
        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }

    pub fn matches(&self, query: &str) -> Vec<FuzzyMatch> {
        ranked_matches(query, &self.items)
    }

    pub fn top_matches(&self, query: &str, limit: usize) -> Vec<&str> {
        ranked_matches_limited(query, &self.items, limit)
            .into_iter()
            .filter_map(|entry| self.items.get(entry.index).map(String::as_str))
            .collect()
    }

    pub fn suggest(&self, query: &str) -> Option<String> {
        autocomplete::suggest(query, &self.matches(query), &self.items)
    }
}

impl From<Vec<String>> for SuggestionList {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}
