// ── Facets and ranges ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::CoreError;

/// One independently selectable filter dimension.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Facet {
    Status,
    Condition,
    BodyType,
    Assembly,
    FuelType,
    Transmission,
    Make,
    Model,
}

impl Facet {
    /// Parse a facet name (`bodyType`, `make`, ...). Unknown names are a
    /// caller defect.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        name.parse()
            .map_err(|_| CoreError::invariant(format!("unknown facet '{name}'")))
    }
}

/// A numeric range filter over the inventory.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RangeField {
    Price,
    Year,
    Odometer,
}

impl RangeField {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        name.parse()
            .map_err(|_| CoreError::invariant(format!("unknown range '{name}'")))
    }
}

/// Observed bounds `[min, max]` plus the selected interval `[low, high]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    min: i64,
    max: i64,
    low: i64,
    high: i64,
}

impl RangeFilter {
    /// Bounds with the whole span selected.
    pub(crate) fn full(min: i64, max: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            low: min,
            high: max,
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    /// `[low, high]` as sent to the backend.
    pub fn selection(&self) -> [i64; 2] {
        [self.low, self.high]
    }

    pub fn is_full(&self) -> bool {
        self.low == self.min && self.high == self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    /// Pull an interval inside the observed bounds.
    pub fn clamp(&self, low: i64, high: i64) -> (i64, i64) {
        (low.clamp(self.min, self.max), high.clamp(self.min, self.max))
    }

    pub(crate) fn with_selection(self, low: i64, high: i64) -> Self {
        Self { low, high, ..self }
    }

    pub(crate) fn reset(self) -> Self {
        Self::full(self.min, self.max)
    }
}
