use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Client-visible identifier of a list entry. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoId(NonZeroU64);

impl GeoId {
    pub const FIRST: Self = Self(NonZeroU64::MIN);

    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// The identifier following `self`, saturating at `u64::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for GeoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GeoId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u64>()
            .map_err(|err| format!("invalid geo id '{s}': {err}"))?;
        Self::new(raw).ok_or_else(|| format!("invalid geo id '{s}': must be positive"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Still held (and still counted for id allocation) but not displayed.
    Hidden,
}

/// A registered state/county pair as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoEntry {
    pub id: GeoId,
    pub state: String,
    pub county: Option<String>,
    /// Server-rendered fragment, kept verbatim.
    pub markup: String,
    pub label: String,
    pub visibility: Visibility,
}

impl GeoEntry {
    pub fn new(id: GeoId, state: impl Into<String>, county: Option<String>) -> Self {
        let state = state.into();
        let label = default_label(&state, county.as_deref());
        Self {
            id,
            state,
            county,
            markup: String::new(),
            label,
            visibility: Visibility::Visible,
        }
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.trim().is_empty() {
            self.label = label;
        }
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}

/// `"County, State"` when a county is present, otherwise just the state.
pub fn default_label(state: &str, county: Option<&str>) -> String {
    match county.map(str::trim).filter(|county| !county.is_empty()) {
        Some(county) => format!("{county}, {state}"),
        None => state.to_string(),
    }
}

/// Form fields of a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub state: String,
    pub county: Option<String>,
    pub id: GeoId,
}

impl NewEntry {
    pub fn new(state: impl Into<String>, county: Option<String>, id: GeoId) -> Self {
        Self {
            state: state.into(),
            county: county.filter(|county| !county.trim().is_empty()),
            id,
        }
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("state", self.state.clone())];
        if let Some(county) = &self.county {
            fields.push(("county", county.clone()));
        }
        fields.push(("id", self.id.to_string()));
        fields
    }
}
