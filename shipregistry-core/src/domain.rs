//! Domain entities for the ship registry.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of ship categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    /// Cargo and passenger hauler.
    Transport,
    /// Armed vessel.
    Military,
    /// Trading vessel.
    Merchant,
}

impl ShipType {
    /// Every ship type, in declaration order.
    pub const ALL: [ShipType; 3] = [ShipType::Transport, ShipType::Military, ShipType::Merchant];

    /// Stable upper-case label, as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ShipType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown ship type: {value}"))
    }
}

/// A persisted ship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Storage-assigned identifier, always positive.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship category.
    pub ship_type: ShipType,
    /// Production date, epoch milliseconds on the wire.
    #[serde(with = "epoch_millis")]
    #[schema(value_type = i64)]
    pub prod_date: NaiveDateTime,
    /// Whether the ship has had a previous owner.
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Crew headcount.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl Ship {
    /// Calendar year of the production date.
    pub fn production_year(&self) -> i32 {
        self.prod_date.year()
    }
}

/// A validated and rated ship awaiting its storage identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship category.
    pub ship_type: ShipType,
    /// Production date.
    pub prod_date: NaiveDateTime,
    /// Whether the ship has had a previous owner.
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Crew headcount.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl NewShip {
    /// Calendar year of the production date.
    pub fn production_year(&self) -> i32 {
        self.prod_date.year()
    }

    /// Attach a storage identifier.
    pub fn into_ship(self, id: i64) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            is_used: self.is_used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}

/// Caller-supplied ship fields for create and update.
///
/// Every field is optional: on create the required ones are enforced by
/// validation, on update an absent field leaves the stored value untouched.
/// Identifier and rating are never accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipInput {
    /// Ship name.
    pub name: Option<String>,
    /// Home planet.
    pub planet: Option<String>,
    /// Ship category.
    pub ship_type: Option<ShipType>,
    /// Production date, epoch milliseconds on the wire.
    #[serde(
        default,
        with = "epoch_millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<NaiveDateTime>,
    /// Whether the ship has had a previous owner.
    pub is_used: Option<bool>,
    /// Maximum speed.
    pub speed: Option<f64>,
    /// Crew headcount.
    pub crew_size: Option<i32>,
}

/// Ship fields subject to bound checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShipField {
    /// Ship name.
    Name,
    /// Planet name.
    Planet,
    /// Speed.
    Speed,
    /// Crew size.
    CrewSize,
    /// Production date.
    ProdDate,
}

impl ShipField {
    /// Human-readable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ShipField::Name => "ship's name",
            ShipField::Planet => "planet's name",
            ShipField::Speed => "ship's speed",
            ShipField::CrewSize => "ship's crew number",
            ShipField::ProdDate => "ship's production date",
        }
    }
}

impl fmt::Display for ShipField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serde adapter mapping local calendar instants to epoch milliseconds.
pub mod epoch_millis {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Convert epoch milliseconds to a local calendar instant.
    ///
    /// Returns `None` when the value is outside chrono's supported range.
    pub fn to_local(millis: i64) -> Option<NaiveDateTime> {
        DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local).naive_local())
    }

    /// Convert a local calendar instant back to epoch milliseconds.
    ///
    /// Ambiguous local times resolve to the earliest instant; local times
    /// skipped by a DST transition are read as UTC.
    pub fn from_local(value: &NaiveDateTime) -> i64 {
        Local
            .from_local_datetime(value)
            .earliest()
            .map(|instant| instant.timestamp_millis())
            .unwrap_or_else(|| value.and_utc().timestamp_millis())
    }

    /// Serialize as epoch milliseconds.
    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(from_local(value))
    }

    /// Deserialize from epoch milliseconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        to_local(millis).ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}")))
    }

    /// Optional variant of the adapter.
    pub mod option {
        use chrono::NaiveDateTime;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize as optional epoch milliseconds.
        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.serialize_some(&super::from_local(value)),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize from optional epoch milliseconds.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<i64>::deserialize(deserializer)? {
                Some(millis) => super::to_local(millis).map(Some).ok_or_else(|| {
                    D::Error::custom(format!("timestamp out of range: {millis}"))
                }),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ShipInput, ShipType, epoch_millis};
    use chrono::{NaiveDate, NaiveDateTime};

    fn local(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid date")
            .and_hms_opt(0, 0, 0)
            .expect("valid time")
    }

    #[test]
    fn ship_type_parses_case_insensitively() {
        assert_eq!("military".parse::<ShipType>(), Ok(ShipType::Military));
        assert_eq!(" MERCHANT ".parse::<ShipType>(), Ok(ShipType::Merchant));
        assert!("freighter".parse::<ShipType>().is_err());
    }

    #[test]
    fn ship_type_serializes_upper_case() {
        let json = serde_json::to_string(&ShipType::Transport).expect("serialize");
        assert_eq!(json, "\"TRANSPORT\"");
    }

    #[test]
    fn epoch_millis_round_trips_local_dates() {
        let date = local(2995, 6, 1);
        let millis = epoch_millis::from_local(&date);
        assert_eq!(epoch_millis::to_local(millis), Some(date));
    }

    #[test]
    fn epoch_millis_rejects_out_of_range_values() {
        assert_eq!(epoch_millis::to_local(i64::MAX), None);
    }

    #[test]
    fn input_distinguishes_absent_from_false() {
        let absent: ShipInput = serde_json::from_str(r#"{"name":"Orion"}"#).expect("parse");
        assert_eq!(absent.name.as_deref(), Some("Orion"));
        assert_eq!(absent.is_used, None);
        assert_eq!(absent.prod_date, None);

        let explicit: ShipInput =
            serde_json::from_str(r#"{"isUsed":false,"crewSize":0}"#).expect("parse");
        assert_eq!(explicit.is_used, Some(false));
        assert_eq!(explicit.crew_size, Some(0));
    }

    #[test]
    fn input_ignores_rating_and_id() {
        let date = local(3000, 1, 1);
        let payload = format!(
            r#"{{"id":7,"rating":99.0,"prodDate":{},"shipType":"MERCHANT"}}"#,
            epoch_millis::from_local(&date)
        );
        let input: ShipInput = serde_json::from_str(&payload).expect("parse");
        assert_eq!(input.prod_date, Some(date));
        assert_eq!(input.ship_type, Some(ShipType::Merchant));
    }
}
