//! Composable filter predicates over ship records.
//!
//! Every builder takes an optional criterion and returns `None` when the
//! criterion is absent. `None` fragments vanish when folded into a
//! [`ShipPredicate`], which is the logical AND of the fragments it holds.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{Ship, ShipType, epoch_millis};

/// Numeric bound produced by the range filters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Bound<T> {
    /// `value >= min`.
    AtLeast(T),
    /// `value <= max`.
    AtMost(T),
    /// `min <= value <= max`.
    Between(T, T),
}

impl<T: PartialOrd + Copy> Bound<T> {
    /// Build a bound from optional limits; `None` when both are absent.
    pub fn from_limits(min: Option<T>, max: Option<T>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (Some(min), None) => Some(Self::AtLeast(min)),
            (None, Some(max)) => Some(Self::AtMost(max)),
            (Some(min), Some(max)) => Some(Self::Between(min, max)),
        }
    }

    /// Whether `value` satisfies the bound.
    pub fn contains(&self, value: T) -> bool {
        match *self {
            Self::AtLeast(min) => value >= min,
            Self::AtMost(max) => value <= max,
            Self::Between(min, max) => min <= value && value <= max,
        }
    }
}

/// A single constraint over one ship attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipFilter {
    /// Name contains the substring.
    NameContains(String),
    /// Planet contains the substring.
    PlanetContains(String),
    /// Exact ship type.
    ShipType(ShipType),
    /// Exact usage flag.
    Used(bool),
    /// Production date strictly before the instant.
    ProducedBefore(NaiveDateTime),
    /// Production date at or after the instant.
    ProducedFrom(NaiveDateTime),
    /// Speed bound.
    Speed(Bound<f64>),
    /// Crew size bound.
    CrewSize(Bound<i32>),
    /// Rating bound.
    Rating(Bound<f64>),
}

impl ShipFilter {
    /// Evaluate the constraint against a record.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Self::NameContains(needle) => ship.name.contains(needle.as_str()),
            Self::PlanetContains(needle) => ship.planet.contains(needle.as_str()),
            Self::ShipType(kind) => ship.ship_type == *kind,
            Self::Used(flag) => ship.is_used == *flag,
            Self::ProducedBefore(instant) => ship.prod_date < *instant,
            Self::ProducedFrom(instant) => ship.prod_date >= *instant,
            Self::Speed(bound) => bound.contains(ship.speed),
            Self::CrewSize(bound) => bound.contains(ship.crew_size),
            Self::Rating(bound) => bound.contains(ship.rating),
        }
    }
}

/// Name contains `name`.
pub fn by_name(name: Option<&str>) -> Option<ShipFilter> {
    name.map(|name| ShipFilter::NameContains(name.to_string()))
}

/// Planet contains `planet`.
pub fn by_planet(planet: Option<&str>) -> Option<ShipFilter> {
    planet.map(|planet| ShipFilter::PlanetContains(planet.to_string()))
}

/// Ship type equals `ship_type`.
pub fn by_ship_type(ship_type: Option<ShipType>) -> Option<ShipFilter> {
    ship_type.map(ShipFilter::ShipType)
}

/// Usage flag equals `is_used`.
pub fn by_usage(is_used: Option<bool>) -> Option<ShipFilter> {
    is_used.map(ShipFilter::Used)
}

/// Produced strictly before the local instant at `before` epoch millis.
pub fn before_date(before: Option<i64>) -> Option<ShipFilter> {
    before
        .and_then(epoch_millis::to_local)
        .map(ShipFilter::ProducedBefore)
}

/// Produced at or after the local instant at `after` epoch millis.
pub fn after_date(after: Option<i64>) -> Option<ShipFilter> {
    after
        .and_then(epoch_millis::to_local)
        .map(ShipFilter::ProducedFrom)
}

/// Speed within the optional inclusive limits.
pub fn by_speed(min: Option<f64>, max: Option<f64>) -> Option<ShipFilter> {
    Bound::from_limits(min, max).map(ShipFilter::Speed)
}

/// Crew size within the optional inclusive limits.
pub fn by_crew_size(min: Option<i32>, max: Option<i32>) -> Option<ShipFilter> {
    Bound::from_limits(min, max).map(ShipFilter::CrewSize)
}

/// Rating within the optional inclusive limits.
pub fn by_rating(min: Option<f64>, max: Option<f64>) -> Option<ShipFilter> {
    Bound::from_limits(min, max).map(ShipFilter::Rating)
}

/// Conjunction of filter fragments. The empty predicate matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipPredicate {
    filters: Vec<ShipFilter>,
}

impl ShipPredicate {
    /// The unconstrained predicate.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a fragment; `None` leaves the predicate unchanged.
    pub fn and(mut self, filter: Option<ShipFilter>) -> Self {
        if let Some(filter) = filter {
            self.filters.push(filter);
        }
        self
    }

    /// Fragments in the order they were added.
    pub fn filters(&self) -> &[ShipFilter] {
        &self.filters
    }

    /// Whether no fragment constrains the predicate.
    pub fn is_unconstrained(&self) -> bool {
        self.filters.is_empty()
    }

    /// Evaluate every fragment against a record.
    pub fn matches(&self, ship: &Ship) -> bool {
        self.filters.iter().all(|filter| filter.matches(ship))
    }
}

impl FromIterator<ShipFilter> for ShipPredicate {
    fn from_iter<I: IntoIterator<Item = ShipFilter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

/// Raw filter criteria as received from a list query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipQuery {
    /// Name substring.
    pub name: Option<String>,
    /// Planet substring.
    pub planet: Option<String>,
    /// Exact ship type.
    pub ship_type: Option<ShipType>,
    /// Lower production-date bound, epoch millis, inclusive.
    pub after: Option<i64>,
    /// Upper production-date bound, epoch millis, exclusive.
    pub before: Option<i64>,
    /// Exact usage flag.
    pub is_used: Option<bool>,
    /// Minimum speed.
    pub min_speed: Option<f64>,
    /// Maximum speed.
    pub max_speed: Option<f64>,
    /// Minimum crew size.
    pub min_crew_size: Option<i32>,
    /// Maximum crew size.
    pub max_crew_size: Option<i32>,
    /// Minimum rating.
    pub min_rating: Option<f64>,
    /// Maximum rating.
    pub max_rating: Option<f64>,
}

impl ShipQuery {
    /// Fold every criterion into a single predicate.
    pub fn predicate(&self) -> ShipPredicate {
        ShipPredicate::all()
            .and(by_name(self.name.as_deref()))
            .and(by_planet(self.planet.as_deref()))
            .and(by_ship_type(self.ship_type))
            .and(by_usage(self.is_used))
            .and(after_date(self.after))
            .and(before_date(self.before))
            .and(by_speed(self.min_speed, self.max_speed))
            .and(by_crew_size(self.min_crew_size, self.max_crew_size))
            .and(by_rating(self.min_rating, self.max_rating))
    }
}
