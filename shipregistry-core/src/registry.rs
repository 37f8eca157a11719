//! Ship registry service.

use crate::domain::{NewShip, Ship, ShipInput};
use crate::error::{BadRequest, RegistryError, Result};
use crate::filter::ShipPredicate;
use crate::page::{Page, PageRequest};
use crate::rating::compute_rating;
use crate::store::ShipStore;
use crate::validation::{validate_new, validate_present};

/// Orchestrates validation, rating and persistence of ship records.
#[derive(Debug, Clone)]
pub struct ShipRegistry<S: ShipStore> {
    store: S,
}

impl<S: ShipStore> ShipRegistry<S> {
    /// Create a registry over a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every record matching the predicate.
    pub fn list(&self, predicate: &ShipPredicate) -> Result<Vec<Ship>> {
        self.store.find_all(predicate)
    }

    /// One page of the records matching the predicate.
    pub fn list_paged(&self, predicate: &ShipPredicate, page: &PageRequest) -> Result<Page<Ship>> {
        self.store.find_page(predicate, page)
    }

    /// Total number of records, unfiltered.
    pub fn count(&self) -> Result<u64> {
        self.store.count()
    }

    /// Number of records matching the predicate.
    pub fn count_matching(&self, predicate: &ShipPredicate) -> Result<u64> {
        if predicate.is_unconstrained() {
            return self.count();
        }
        Ok(self.list(predicate)?.len() as u64)
    }

    /// Validate, rate and persist a new ship.
    pub fn create(&self, input: ShipInput) -> Result<Ship> {
        validate_new(&input)?;
        let ShipInput {
            name: Some(name),
            planet: Some(planet),
            ship_type: Some(ship_type),
            prod_date: Some(prod_date),
            is_used,
            speed: Some(speed),
            crew_size: Some(crew_size),
        } = input
        else {
            return Err(BadRequest::MissingRequiredField.into());
        };
        let is_used = is_used.unwrap_or(false);
        let mut ship = NewShip {
            name,
            planet,
            ship_type,
            prod_date,
            is_used,
            speed,
            crew_size,
            rating: 0.0,
        };
        ship.rating = compute_rating(speed, is_used, ship.production_year());
        self.store.insert(&ship)
    }

    /// Fetch a ship by its raw identifier.
    pub fn get(&self, id: &str) -> Result<Ship> {
        let id = parse_ship_id(id)?;
        self.store
            .find_by_id(id)?
            .ok_or(RegistryError::NotFound(id))
    }

    /// Apply the present fields of `updates` and recompute the rating.
    pub fn update(&self, id: &str, updates: ShipInput) -> Result<Ship> {
        let mut ship = self.get(id)?;
        validate_present(&updates)?;

        if let Some(name) = updates.name {
            ship.name = name;
        }
        if let Some(planet) = updates.planet {
            ship.planet = planet;
        }
        if let Some(ship_type) = updates.ship_type {
            ship.ship_type = ship_type;
        }
        if let Some(prod_date) = updates.prod_date {
            ship.prod_date = prod_date;
        }
        if let Some(is_used) = updates.is_used {
            ship.is_used = is_used;
        }
        if let Some(speed) = updates.speed {
            ship.speed = speed;
        }
        if let Some(crew_size) = updates.crew_size {
            ship.crew_size = crew_size;
        }
        ship.rating = compute_rating(ship.speed, ship.is_used, ship.production_year());

        self.store.save(&ship)
    }

    /// Remove a ship by its raw identifier.
    pub fn delete(&self, id: &str) -> Result<()> {
        let ship = self.get(id)?;
        self.store.delete(&ship)
    }
}

/// Parse a positive ship identifier.
///
/// A leading `-` or the literal `"0"` is rejected before parsing.
pub fn parse_ship_id(raw: &str) -> Result<i64> {
    if raw.starts_with('-') || raw == "0" {
        return Err(BadRequest::InvalidId(raw.to_string()).into());
    }
    let id: i64 = raw
        .parse()
        .map_err(|_| BadRequest::IdNotANumber(raw.to_string()))?;
    if id <= 0 {
        return Err(BadRequest::InvalidId(raw.to_string()).into());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::{ShipRegistry, parse_ship_id};
    use crate::domain::{NewShip, Ship, ShipInput, ShipType};
    use crate::error::{BadRequest, RegistryError};
    use crate::filter::{ShipPredicate, by_speed};
    use crate::store::{InMemoryShipStore, MockShipStore};
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 7, 4)
            .expect("date")
            .and_hms_opt(0, 0, 0)
            .expect("time")
    }

    fn input(speed: f64, year: i32, is_used: Option<bool>) -> ShipInput {
        ShipInput {
            name: Some("Orion".to_string()),
            planet: Some("Mars".to_string()),
            ship_type: Some(ShipType::Military),
            prod_date: Some(date(year)),
            is_used,
            speed: Some(speed),
            crew_size: Some(42),
        }
    }

    fn registry() -> ShipRegistry<InMemoryShipStore> {
        ShipRegistry::new(InMemoryShipStore::new())
    }

    fn bad_request(reason: BadRequest) -> RegistryError {
        RegistryError::BadRequest(reason)
    }

    #[test]
    fn create_defaults_usage_and_computes_rating() {
        let registry = registry();
        let ship = registry.create(input(0.5, 3019, None)).expect("create");
        assert_eq!(ship.id, 1);
        assert!(!ship.is_used);
        assert_eq!(ship.rating, 40.0);

        let used = registry.create(input(0.99, 2800, Some(true))).expect("create");
        assert!(used.is_used);
        assert_eq!(used.rating, 0.18);
    }

    #[test]
    fn create_rejects_missing_fields_without_persisting() {
        let registry = registry();
        let mut partial = input(0.5, 3000, None);
        partial.planet = None;
        assert_eq!(
            registry.create(partial),
            Err(bad_request(BadRequest::MissingRequiredField))
        );
        assert_eq!(registry.count().expect("count"), 0);
    }

    #[test]
    fn create_rejects_speed_of_one() {
        let registry = registry();
        assert!(registry.create(input(1.0, 3000, None)).is_err());
        assert!(registry.create(input(0.99, 3000, None)).is_ok());
        assert_eq!(registry.count().expect("count"), 1);
    }

    #[test]
    fn create_never_touches_store_on_invalid_input() {
        let mut store = MockShipStore::new();
        store.expect_insert().never();
        let registry = ShipRegistry::new(store);
        let result = registry.create(input(0.5, 2700, None));
        assert!(result.is_err_and(|err| err.is_bad_request()));
    }

    #[test]
    fn get_rejects_malformed_identifiers() {
        let registry = registry();
        for raw in ["0", "-5", "abc", "", "1.5"] {
            let result = registry.get(raw);
            assert!(
                result.as_ref().is_err_and(RegistryError::is_bad_request),
                "{raw:?} should be a bad request, got {result:?}"
            );
        }
        assert_eq!(registry.get("999999"), Err(RegistryError::NotFound(999999)));
    }

    #[test]
    fn parse_ship_id_distinguishes_reasons() {
        assert_eq!(parse_ship_id("17"), Ok(17));
        assert_eq!(
            parse_ship_id("-1"),
            Err(bad_request(BadRequest::InvalidId("-1".to_string())))
        );
        assert_eq!(
            parse_ship_id("00"),
            Err(bad_request(BadRequest::InvalidId("00".to_string())))
        );
        assert_eq!(
            parse_ship_id("x1"),
            Err(bad_request(BadRequest::IdNotANumber("x1".to_string())))
        );
    }

    #[test]
    fn update_with_name_only_keeps_other_fields() {
        let registry = registry();
        let created = registry.create(input(0.5, 3019, Some(true))).expect("create");

        let updated = registry
            .update(
                "1",
                ShipInput {
                    name: Some("Vega".to_string()),
                    ..ShipInput::default()
                },
            )
            .expect("update");

        assert_eq!(updated.name, "Vega");
        assert_eq!(updated.planet, created.planet);
        assert_eq!(updated.ship_type, created.ship_type);
        assert_eq!(updated.prod_date, created.prod_date);
        assert_eq!(updated.speed, created.speed);
        assert_eq!(updated.crew_size, created.crew_size);
        assert_eq!(updated.is_used, created.is_used);
        assert_eq!(updated.rating, 20.0);
        assert_eq!(registry.get("1").expect("get"), updated);
    }

    #[test]
    fn update_recomputes_rating_from_merged_record() {
        let registry = registry();
        registry.create(input(0.5, 3019, None)).expect("create");
        let updated = registry
            .update(
                "1",
                ShipInput {
                    is_used: Some(true),
                    ..ShipInput::default()
                },
            )
            .expect("update");
        assert_eq!(updated.rating, 20.0);
    }

    #[test]
    fn update_rejects_invalid_fields_without_mutation() {
        let registry = registry();
        let created = registry.create(input(0.5, 3000, None)).expect("create");
        let result = registry.update(
            "1",
            ShipInput {
                name: Some("Renamed".to_string()),
                speed: Some(1.0),
                ..ShipInput::default()
            },
        );
        assert!(result.is_err_and(|err| err.is_bad_request()));
        assert_eq!(registry.get("1").expect("get"), created);
    }

    #[test]
    fn update_of_missing_ship_is_not_found() {
        let registry = registry();
        assert_eq!(
            registry.update("5", ShipInput::default()),
            Err(RegistryError::NotFound(5))
        );
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let registry = registry();
        registry.create(input(0.5, 3000, None)).expect("create");
        registry.delete("1").expect("delete");
        assert_eq!(registry.get("1"), Err(RegistryError::NotFound(1)));
        assert_eq!(registry.delete("1"), Err(RegistryError::NotFound(1)));
    }

    #[test]
    fn count_matches_unfiltered_list() {
        let registry = registry();
        for speed in [0.2, 0.4, 0.6] {
            registry.create(input(speed, 3000, None)).expect("create");
        }
        registry.delete("2").expect("delete");
        let all = registry.list(&ShipPredicate::all()).expect("list");
        assert_eq!(registry.count().expect("count"), all.len() as u64);

        let fast = ShipPredicate::all().and(by_speed(Some(0.5), None));
        assert_eq!(registry.count_matching(&fast).expect("count"), 1);
    }

    #[test]
    fn storage_errors_propagate() {
        let mut store = MockShipStore::new();
        store
            .expect_find_by_id()
            .returning(|_| Err(RegistryError::Storage("offline".to_string())));
        let registry = ShipRegistry::new(store);
        assert_eq!(
            registry.get("3"),
            Err(RegistryError::Storage("offline".to_string()))
        );
    }

    #[test]
    fn create_persists_rated_record_through_store() {
        let mut store = MockShipStore::new();
        store
            .expect_insert()
            .withf(|ship: &NewShip| ship.rating == 40.0 && !ship.is_used)
            .times(1)
            .returning(|ship| Ok(ship.clone().into_ship(9)));
        let registry = ShipRegistry::new(store);
        let ship: Ship = registry.create(input(0.5, 3019, None)).expect("create");
        assert_eq!(ship.id, 9);
    }
}
