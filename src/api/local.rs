use crate::api::fragment::render_list_item;
use crate::api::{GeoApi, Registration};
use crate::core::geo::{GeoId, NewEntry, default_label};
use crate::error::{ApiError, ConfigError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::Mutex;

const DEMO_GEOS: &str = include_str!("../../data/geos.json");

#[derive(Deserialize)]
#[serde(untagged)]
enum CountiesShape {
    Names(Vec<String>),
    /// County name to FIPS code.
    Codes(IndexMap<String, String>),
}

/// State name to its county names.
#[derive(Debug, Clone, Default)]
pub struct GeoData {
    counties: IndexMap<String, Vec<String>>,
}

impl GeoData {
    /// Accepts `{"State": ["County", ...]}` or `{"State": {"County": "fips"}}`.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let parsed: IndexMap<String, CountiesShape> =
            serde_json::from_str(raw).map_err(|err| ConfigError::GeoData(err.to_string()))?;
        let counties = parsed
            .into_iter()
            .map(|(state, shape)| {
                let mut names = match shape {
                    CountiesShape::Names(names) => names,
                    CountiesShape::Codes(codes) => codes.into_keys().collect(),
                };
                names.sort();
                (state, names)
            })
            .collect();
        Ok(Self { counties })
    }

    pub fn demo() -> Self {
        // The bundled file is checked by the tests below.
        Self::from_json(DEMO_GEOS).unwrap_or_default()
    }

    pub fn states(&self) -> Vec<String> {
        self.counties.keys().cloned().collect()
    }

    pub fn counties(&self, state: &str) -> Option<&[String]> {
        self.counties.get(state).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Registered {
    state: String,
    county: Option<String>,
}

/// In-process stand-in for the geo server.
pub struct LocalGeoApi {
    data: GeoData,
    registered: Mutex<IndexMap<GeoId, Registered>>,
}

impl LocalGeoApi {
    pub fn new(data: GeoData) -> Self {
        Self {
            data,
            registered: Mutex::new(IndexMap::new()),
        }
    }

    pub fn data(&self) -> &GeoData {
        &self.data
    }

    #[cfg(test)]
    pub fn registered_ids(&self) -> Vec<GeoId> {
        self.lock().keys().copied().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndexMap<GeoId, Registered>> {
        // A poisoned map is still a consistent map.
        self.registered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn validate(&self, entry: &NewEntry) -> Result<(), ApiError> {
        let Some(counties) = self.data.counties(&entry.state) else {
            return Err(rejected(format!("Unknown state: {}", entry.state)));
        };
        if let Some(county) = &entry.county
            && !counties.contains(county)
        {
            return Err(rejected(format!(
                "{county} is not a county of {}",
                entry.state
            )));
        }
        Ok(())
    }
}

impl GeoApi for LocalGeoApi {
    fn register(&self, entry: &NewEntry) -> Result<Registration, ApiError> {
        self.validate(entry)?;

        let record = Registered {
            state: entry.state.clone(),
            county: entry.county.clone(),
        };
        let mut registered = self.lock();
        if registered.values().any(|existing| *existing == record) {
            return Err(rejected(format!(
                "{} is already selected",
                default_label(&entry.state, entry.county.as_deref())
            )));
        }

        let id = if registered.contains_key(&entry.id) {
            registered
                .keys()
                .max()
                .map_or(GeoId::FIRST, |max| max.next())
        } else {
            entry.id
        };
        registered.insert(id, record);

        let label = default_label(&entry.state, entry.county.as_deref());
        Ok(Registration::from_fragment(id, render_list_item(id, &label)))
    }

    fn drop_geo(&self, id: GeoId) -> Result<(), ApiError> {
        match self.lock().shift_remove(&id) {
            Some(_) => Ok(()),
            None => Err(ApiError::Rejected {
                status: 404,
                body: format!("No geo with id {id}"),
            }),
        }
    }

    fn counties(&self, state: &str) -> Result<Vec<String>, ApiError> {
        Ok(self.data.counties(state).map(<[String]>::to_vec).unwrap_or_default())
    }
}

fn rejected(body: String) -> ApiError {
    ApiError::Rejected { status: 400, body }
}
