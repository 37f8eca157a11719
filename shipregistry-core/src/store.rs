//! Storage collaborator for ship records.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::domain::{NewShip, Ship};
use crate::error::{RegistryError, Result};
use crate::filter::ShipPredicate;
use crate::page::{Page, PageRequest, ShipOrder};

/// Abstraction over ship persistence.
#[cfg_attr(test, mockall::automock)]
pub trait ShipStore {
    /// Every record matching the predicate, ordered by identifier.
    fn find_all(&self, predicate: &ShipPredicate) -> Result<Vec<Ship>>;
    /// One page of the records matching the predicate.
    fn find_page(&self, predicate: &ShipPredicate, page: &PageRequest) -> Result<Page<Ship>>;
    /// Look up a record by identifier.
    fn find_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Persist a new record and assign its identifier.
    fn insert(&self, ship: &NewShip) -> Result<Ship>;
    /// Overwrite an existing record.
    fn save(&self, ship: &Ship) -> Result<Ship>;
    /// Remove a record.
    fn delete(&self, ship: &Ship) -> Result<()>;
    /// Total number of records.
    fn count(&self) -> Result<u64>;
}

impl<S: ShipStore + ?Sized> ShipStore for Arc<S> {
    fn find_all(&self, predicate: &ShipPredicate) -> Result<Vec<Ship>> {
        (**self).find_all(predicate)
    }

    fn find_page(&self, predicate: &ShipPredicate, page: &PageRequest) -> Result<Page<Ship>> {
        (**self).find_page(predicate, page)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        (**self).find_by_id(id)
    }

    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        (**self).insert(ship)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        (**self).save(ship)
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        (**self).delete(ship)
    }

    fn count(&self) -> Result<u64> {
        (**self).count()
    }
}

/// Process-local store backed by a `BTreeMap`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryShipStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    ships: BTreeMap<i64, Ship>,
}

impl InMemoryShipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&MemoryState) -> T) -> Result<T> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(f(&state))
    }

    fn write<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> Result<T> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        Ok(f(&mut state))
    }
}

fn poisoned() -> RegistryError {
    RegistryError::Storage("ship store lock poisoned".to_string())
}

fn compare(order: ShipOrder, left: &Ship, right: &Ship) -> Ordering {
    match order {
        ShipOrder::Id => left.id.cmp(&right.id),
        ShipOrder::Speed => left.speed.total_cmp(&right.speed),
        ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
        ShipOrder::Rating => left.rating.total_cmp(&right.rating),
    }
}

impl ShipStore for InMemoryShipStore {
    fn find_all(&self, predicate: &ShipPredicate) -> Result<Vec<Ship>> {
        self.read(|state| {
            state
                .ships
                .values()
                .filter(|ship| predicate.matches(ship))
                .cloned()
                .collect()
        })
    }

    fn find_page(&self, predicate: &ShipPredicate, page: &PageRequest) -> Result<Page<Ship>> {
        let mut matching = self.find_all(predicate)?;
        // stable sort keeps identifier order among ties
        matching.sort_by(|left, right| compare(page.order, left, right));
        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(page.page_size as usize)
            .collect();
        Ok(Page::new(content, page, total))
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        self.read(|state| state.ships.get(&id).cloned())
    }

    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        self.write(|state| {
            state.last_id += 1;
            let stored = ship.clone().into_ship(state.last_id);
            state.ships.insert(stored.id, stored.clone());
            stored
        })
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        self.write(|state| {
            state.last_id = state.last_id.max(ship.id);
            state.ships.insert(ship.id, ship.clone());
            ship.clone()
        })
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        self.write(|state| {
            state.ships.remove(&ship.id);
        })
    }

    fn count(&self) -> Result<u64> {
        self.read(|state| state.ships.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryShipStore, ShipStore};
    use crate::domain::{NewShip, ShipType};
    use crate::filter::{ShipPredicate, by_speed};
    use crate::page::{PageRequest, ShipOrder};
    use chrono::NaiveDate;

    fn new_ship(name: &str, speed: f64, rating: f64) -> NewShip {
        NewShip {
            name: name.to_string(),
            planet: "Jupiter".to_string(),
            ship_type: ShipType::Merchant,
            prod_date: NaiveDate::from_ymd_opt(3000, 1, 1)
                .expect("date")
                .and_hms_opt(0, 0, 0)
                .expect("time"),
            is_used: false,
            speed,
            crew_size: 10,
            rating,
        }
    }

    #[test]
    fn insert_assigns_increasing_identifiers() {
        let store = InMemoryShipStore::new();
        let first = store.insert(&new_ship("a", 0.1, 1.0)).expect("insert");
        let second = store.insert(&new_ship("b", 0.2, 2.0)).expect("insert");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.count().expect("count"), 2);
        assert_eq!(store.find_by_id(2).expect("find"), Some(second));
    }

    #[test]
    fn delete_removes_record() {
        let store = InMemoryShipStore::new();
        let ship = store.insert(&new_ship("a", 0.1, 1.0)).expect("insert");
        store.delete(&ship).expect("delete");
        assert_eq!(store.find_by_id(ship.id).expect("find"), None);
        assert_eq!(store.count().expect("count"), 0);
    }

    #[test]
    fn find_all_applies_predicate() {
        let store = InMemoryShipStore::new();
        store.insert(&new_ship("slow", 0.2, 1.0)).expect("insert");
        store.insert(&new_ship("fast", 0.8, 1.0)).expect("insert");
        let fast = store
            .find_all(&ShipPredicate::all().and(by_speed(Some(0.5), None)))
            .expect("find");
        assert_eq!(fast.len(), 1);
        assert_eq!(fast[0].name, "fast");
    }

    #[test]
    fn find_page_sorts_and_slices() {
        let store = InMemoryShipStore::new();
        for (name, rating) in [("a", 3.0), ("b", 1.0), ("c", 2.0), ("d", 0.5)] {
            store.insert(&new_ship(name, 0.5, rating)).expect("insert");
        }
        let page = store
            .find_page(&ShipPredicate::all(), &PageRequest::new(0, 3, ShipOrder::Rating))
            .expect("page");
        let names: Vec<&str> = page.content.iter().map(|ship| ship.name.as_str()).collect();
        assert_eq!(names, vec!["d", "b", "c"]);
        assert_eq!(page.total_elements, 4);
        assert_eq!(page.total_pages, 2);

        let second = store
            .find_page(&ShipPredicate::all(), &PageRequest::new(1, 3, ShipOrder::Rating))
            .expect("page");
        assert_eq!(second.content.len(), 1);
        assert_eq!(second.content[0].name, "a");
    }
}
