//! Database models for the ship registry server.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use shipregistry_core::{NewShip, RegistryError, Ship, ShipType};

use crate::schema::ships;

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, AsChangeset)]
#[diesel(table_name = ships)]
/// Ship database record.
pub struct ShipRecord {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Upper-case ship type label.
    pub ship_type: String,
    /// Production date in local time.
    pub prod_date: NaiveDateTime,
    /// Whether the ship is second-hand.
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Crew headcount.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ships)]
/// Insertable ship record; the identifier comes from the sequence.
pub struct NewShipRecord {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Upper-case ship type label.
    pub ship_type: String,
    /// Production date in local time.
    pub prod_date: NaiveDateTime,
    /// Whether the ship is second-hand.
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Crew headcount.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl TryFrom<ShipRecord> for Ship {
    type Error = RegistryError;

    fn try_from(record: ShipRecord) -> Result<Self, Self::Error> {
        let ship_type: ShipType = record.ship_type.parse().map_err(|err| {
            RegistryError::Storage(format!("ship {} has {err}", record.id))
        })?;
        Ok(Ship {
            id: record.id,
            name: record.name,
            planet: record.planet,
            ship_type,
            prod_date: record.prod_date,
            is_used: record.is_used,
            speed: record.speed,
            crew_size: record.crew_size,
            rating: record.rating,
        })
    }
}

impl From<&Ship> for ShipRecord {
    fn from(ship: &Ship) -> Self {
        Self {
            id: ship.id,
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl From<&NewShip> for NewShipRecord {
    fn from(ship: &NewShip) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ShipRecord;
    use chrono::NaiveDate;
    use shipregistry_core::{RegistryError, Ship, ShipType};

    fn record(ship_type: &str) -> ShipRecord {
        ShipRecord {
            id: 3,
            name: "Orion".to_string(),
            planet: "Mars".to_string(),
            ship_type: ship_type.to_string(),
            prod_date: NaiveDate::from_ymd_opt(3001, 2, 3)
                .expect("date")
                .and_hms_opt(0, 0, 0)
                .expect("time"),
            is_used: true,
            speed: 0.4,
            crew_size: 12,
            rating: 0.89,
        }
    }

    #[test]
    fn record_converts_to_ship_and_back() {
        let original = record("MERCHANT");
        let ship = Ship::try_from(original.clone()).expect("convert");
        assert_eq!(ship.ship_type, ShipType::Merchant);
        assert_eq!(ShipRecord::from(&ship), original);
    }

    #[test]
    fn unknown_ship_type_is_a_storage_error() {
        let result = Ship::try_from(record("YACHT"));
        assert!(matches!(result, Err(RegistryError::Storage(_))));
    }
}
