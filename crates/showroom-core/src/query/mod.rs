// ── Filter-state model ──
//
// `QueryView` is the derived, client-only filter state over the inventory
// collection. Every operation consumes the view and returns the next one,
// so the store can swap snapshots atomically and the scheduler can detect
// a change by identity.

mod cascade;
mod facet;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::FacetVocabulary;
use crate::error::CoreError;
use crate::model::{InventorySearch, Vehicle};

use cascade::MakesModels;
pub use facet::{Facet, RangeField, RangeFilter};

/// Filter state over one inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryView {
    makes_models: MakesModels,
    selected_makes: BTreeSet<String>,
    selected_models: BTreeSet<String>,
    selected_status: BTreeSet<String>,
    selected_condition: BTreeSet<String>,
    selected_body_type: BTreeSet<String>,
    selected_assembly: BTreeSet<String>,
    selected_fuel_type: BTreeSet<String>,
    selected_transmission: BTreeSet<String>,
    price_range: RangeFilter,
    year_range: RangeFilter,
    odometer_range: RangeFilter,
    search: String,
    #[serde(skip)]
    vocabulary: FacetVocabulary,
}

impl QueryView {
    // ── Construction ─────────────────────────────────────────────────

    /// Build a fully selected view over `vehicles`.
    ///
    /// Makes and models are those present in the collection, ranges span
    /// the observed values (`[0, 0]` when empty), and static facets
    /// select their whole vocabulary. Deterministic for a given input.
    pub fn rebuild_from_collection(vehicles: &[Vehicle], vocabulary: FacetVocabulary) -> Self {
        let mut makes_models = MakesModels::new();
        for vehicle in vehicles {
            makes_models
                .entry(vehicle.make.clone())
                .or_default()
                .push(vehicle.model.clone());
        }
        for models in makes_models.values_mut() {
            models.sort();
            models.dedup();
        }

        let span = |value: fn(&Vehicle) -> i64| {
            let min = vehicles.iter().map(value).min().unwrap_or(0);
            let max = vehicles.iter().map(value).max().unwrap_or(0);
            RangeFilter::full(min, max)
        };

        let view = Self {
            makes_models,
            selected_makes: BTreeSet::new(),
            selected_models: BTreeSet::new(),
            selected_status: BTreeSet::new(),
            selected_condition: BTreeSet::new(),
            selected_body_type: BTreeSet::new(),
            selected_assembly: BTreeSet::new(),
            selected_fuel_type: BTreeSet::new(),
            selected_transmission: BTreeSet::new(),
            price_range: span(|v| v.price),
            year_range: span(|v| v.year),
            odometer_range: span(|v| v.odometer),
            search: String::new(),
            vocabulary,
        };
        view.clear()
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Make → sorted model names present in the last rebuilt collection.
    pub fn makes_models(&self) -> &BTreeMap<String, Vec<String>> {
        &self.makes_models
    }

    pub fn selected(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Status => &self.selected_status,
            Facet::Condition => &self.selected_condition,
            Facet::BodyType => &self.selected_body_type,
            Facet::Assembly => &self.selected_assembly,
            Facet::FuelType => &self.selected_fuel_type,
            Facet::Transmission => &self.selected_transmission,
            Facet::Make => &self.selected_makes,
            Facet::Model => &self.selected_models,
        }
    }

    pub fn range(&self, field: RangeField) -> &RangeFilter {
        match field {
            RangeField::Price => &self.price_range,
            RangeField::Year => &self.year_range,
            RangeField::Odometer => &self.odometer_range,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn vocabulary(&self) -> &FacetVocabulary {
        &self.vocabulary
    }

    /// Every value the facet could currently select.
    ///
    /// For `Model` that is the union of the selected makes' models.
    pub fn universe(&self, facet: Facet) -> BTreeSet<String> {
        match facet {
            Facet::Make => self.makes_models.keys().cloned().collect(),
            Facet::Model => cascade::models_of(&self.makes_models, &self.selected_makes),
            _ => self
                .vocabulary
                .values(facet)
                .unwrap_or_default()
                .iter()
                .cloned()
                .collect(),
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Symmetric-difference toggle of one value.
    ///
    /// Deselecting a make drops the models only it contributed; selecting
    /// one adds all of its models. A model must belong to a selected make,
    /// and a static value must be in the vocabulary.
    pub fn toggle_facet_value(mut self, facet: Facet, value: &str) -> Result<Self, CoreError> {
        if !self.universe(facet).contains(value) {
            return Err(CoreError::invariant(format!(
                "'{value}' is not a selectable {facet}"
            )));
        }

        let now_selected = toggle(self.selected_mut(facet), value);

        if facet == Facet::Make {
            if now_selected {
                let make = value.to_owned();
                cascade::add_models_of(
                    &self.makes_models,
                    std::iter::once(&make),
                    &mut self.selected_models,
                );
            } else {
                cascade::prune_models(
                    &self.makes_models,
                    &self.selected_makes,
                    &mut self.selected_models,
                );
            }
        }

        Ok(self)
    }

    /// Select everything if not everything is selected, otherwise nothing.
    ///
    /// No memory of a previous partial selection is kept.
    pub fn toggle_all_facet(mut self, facet: Facet) -> Self {
        let universe = self.universe(facet);
        let was_full = *self.selected(facet) == universe;

        if facet == Facet::Make {
            if was_full {
                self.selected_makes.clear();
                self.selected_models.clear();
            } else {
                let added: Vec<String> = universe.difference(&self.selected_makes).cloned().collect();
                cascade::add_models_of(&self.makes_models, &added, &mut self.selected_models);
                self.selected_makes = universe;
            }
            return self;
        }

        *self.selected_mut(facet) = if was_full { BTreeSet::new() } else { universe };
        self
    }

    /// Replace a range's selected interval. Bounds are not enforced here.
    pub fn set_range(mut self, field: RangeField, low: i64, high: i64) -> Result<Self, CoreError> {
        if low > high {
            return Err(CoreError::invariant(format!(
                "{field} range low {low} exceeds high {high}"
            )));
        }
        let range = self.range_mut(field);
        *range = range.with_selection(low, high);
        Ok(self)
    }

    pub fn set_search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Back to everything selected over the last rebuilt collection.
    pub fn clear(mut self) -> Self {
        self.selected_makes = self.universe(Facet::Make);
        self.selected_models = self.universe(Facet::Model);
        for facet in [
            Facet::Status,
            Facet::Condition,
            Facet::BodyType,
            Facet::Assembly,
            Facet::FuelType,
            Facet::Transmission,
        ] {
            let universe = self.universe(facet);
            *self.selected_mut(facet) = universe;
        }
        self.price_range = self.price_range.reset();
        self.year_range = self.year_range.reset();
        self.odometer_range = self.odometer_range.reset();
        self.search.clear();
        self
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Whether `vehicle` passes every facet, range, and the text search.
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        let facets = [
            (&self.selected_makes, vehicle.make.as_str()),
            (&self.selected_models, vehicle.model.as_str()),
            (&self.selected_status, vehicle.status.as_str()),
            (&self.selected_condition, vehicle.condition.as_str()),
            (&self.selected_body_type, vehicle.body_type.as_str()),
            (&self.selected_assembly, vehicle.assembly.as_str()),
            (&self.selected_fuel_type, vehicle.fuel_type.as_str()),
            (&self.selected_transmission, vehicle.transmission.as_str()),
        ];
        if !facets.iter().all(|(selected, value)| selected.contains(*value)) {
            return false;
        }

        if !(self.price_range.contains(vehicle.price)
            && self.year_range.contains(vehicle.year)
            && self.odometer_range.contains(vehicle.odometer))
        {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || vehicle.make.to_lowercase().contains(&needle)
            || vehicle.model.to_lowercase().contains(&needle)
            || vehicle
                .specification
                .iter()
                .any(|spec| spec.to_lowercase().contains(&needle))
    }

    /// Body of `POST /api/vehicle/search`.
    pub fn to_search_params(&self) -> InventorySearch {
        let list = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>();
        InventorySearch {
            search: self.search.clone(),
            status: list(&self.selected_status),
            condition: list(&self.selected_condition),
            body_type: list(&self.selected_body_type),
            assembly: list(&self.selected_assembly),
            fuel_type: list(&self.selected_fuel_type),
            transmission: list(&self.selected_transmission),
            makes: list(&self.selected_makes),
            models: list(&self.selected_models),
            price_range: self.price_range.selection(),
            year_range: self.year_range.selection(),
            odometer_range: self.odometer_range.selection(),
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn selected_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Status => &mut self.selected_status,
            Facet::Condition => &mut self.selected_condition,
            Facet::BodyType => &mut self.selected_body_type,
            Facet::Assembly => &mut self.selected_assembly,
            Facet::FuelType => &mut self.selected_fuel_type,
            Facet::Transmission => &mut self.selected_transmission,
            Facet::Make => &mut self.selected_makes,
            Facet::Model => &mut self.selected_models,
        }
    }

    fn range_mut(&mut self, field: RangeField) -> &mut RangeFilter {
        match field {
            RangeField::Price => &mut self.price_range,
            RangeField::Year => &mut self.year_range,
            RangeField::Odometer => &mut self.odometer_range,
        }
    }
}

/// Returns whether `value` is selected afterwards.
fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_owned());
        true
    }
}
