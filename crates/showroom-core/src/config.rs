// ── Runtime core configuration ──
//
// Tuning knobs for the filter model and effect scheduler. Never touches
// disk: the config crate resolves a profile and hands a `CoreConfig` in.

use serde::{Deserialize, Serialize};

use crate::query::Facet;

/// The closed set of values each static facet may take.
///
/// `make` and `model` are not here: they are derived from the
/// inventory collection on every rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct FacetVocabulary {
    pub status: Vec<String>,
    pub condition: Vec<String>,
    pub body_type: Vec<String>,
    pub assembly: Vec<String>,
    pub fuel_type: Vec<String>,
    pub transmission: Vec<String>,
}

impl Default for FacetVocabulary {
    fn default() -> Self {
        Self {
            status: strings(&["Available", "Sold"]),
            condition: strings(&["New", "Used"]),
            body_type: strings(&["Hatchback", "MPV", "Pickup", "Sedan", "SUV", "Van"]),
            assembly: strings(&["CBU", "CKD"]),
            fuel_type: strings(&["Diesel", "Electric", "Gasoline", "Hybrid"]),
            transmission: strings(&["Automatic", "Manual"]),
        }
    }
}

impl FacetVocabulary {
    /// Vocabulary for a static facet; `None` for `Make` and `Model`.
    pub fn values(&self, facet: Facet) -> Option<&[String]> {
        match facet {
            Facet::Status => Some(&self.status),
            Facet::Condition => Some(&self.condition),
            Facet::BodyType => Some(&self.body_type),
            Facet::Assembly => Some(&self.assembly),
            Facet::FuelType => Some(&self.fuel_type),
            Facet::Transmission => Some(&self.transmission),
            Facet::Make | Facet::Model => None,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

/// Configuration for a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Static facet vocabularies used when (re)building the query view.
    pub vocabulary: FacetVocabulary,
    /// Years the dashboard's comparison window lags the current one.
    pub default_past_range: u32,
    /// Clamp `SetRange` intents to the observed bounds before applying.
    pub clamp_ranges: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            vocabulary: FacetVocabulary::default(),
            default_past_range: 1,
            clamp_ranges: true,
        }
    }
}
