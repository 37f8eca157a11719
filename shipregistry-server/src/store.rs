//! PostgreSQL-backed ship store.

use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use shipregistry_core::{
    Bound, NewShip, Page, PageRequest, RegistryError, Result, Ship, ShipFilter, ShipOrder,
    ShipPredicate, ShipStore,
};

use crate::db::DbPool;
use crate::models::{NewShipRecord, ShipRecord};
use crate::schema::ships;

type BoxedShips = ships::BoxedQuery<'static, Pg>;

/// Ship store persisting records through a Diesel connection pool.
#[derive(Clone)]
pub struct PgShipStore {
    pool: DbPool,
}

impl PgShipStore {
    /// Wrap a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool
            .get()
            .map_err(|err| storage("db connection failed", err))
    }
}

fn storage(context: &str, err: impl std::fmt::Display) -> RegistryError {
    RegistryError::Storage(format!("{context}: {err}"))
}

/// `LIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Translate a predicate into a boxed `SELECT` over `ships`.
fn filtered(predicate: &ShipPredicate) -> BoxedShips {
    let unfiltered: BoxedShips = ships::table.into_boxed();
    predicate
        .filters()
        .iter()
        .fold(unfiltered, |query, filter| match filter {
            ShipFilter::NameContains(needle) => {
                query.filter(ships::name.like(contains_pattern(needle)))
            }
            ShipFilter::PlanetContains(needle) => {
                query.filter(ships::planet.like(contains_pattern(needle)))
            }
            ShipFilter::ShipType(kind) => query.filter(ships::ship_type.eq(kind.as_str())),
            ShipFilter::Used(flag) => query.filter(ships::is_used.eq(*flag)),
            ShipFilter::ProducedBefore(instant) => query.filter(ships::prod_date.lt(*instant)),
            ShipFilter::ProducedFrom(instant) => query.filter(ships::prod_date.ge(*instant)),
            ShipFilter::Speed(bound) => match *bound {
                Bound::AtLeast(min) => query.filter(ships::speed.ge(min)),
                Bound::AtMost(max) => query.filter(ships::speed.le(max)),
                Bound::Between(min, max) => query.filter(ships::speed.between(min, max)),
            },
            ShipFilter::CrewSize(bound) => match *bound {
                Bound::AtLeast(min) => query.filter(ships::crew_size.ge(min)),
                Bound::AtMost(max) => query.filter(ships::crew_size.le(max)),
                Bound::Between(min, max) => query.filter(ships::crew_size.between(min, max)),
            },
            ShipFilter::Rating(bound) => match *bound {
                Bound::AtLeast(min) => query.filter(ships::rating.ge(min)),
                Bound::AtMost(max) => query.filter(ships::rating.le(max)),
                Bound::Between(min, max) => query.filter(ships::rating.between(min, max)),
            },
        })
}

fn ordered(query: BoxedShips, order: ShipOrder) -> BoxedShips {
    match order {
        ShipOrder::Id => query.order(ships::id.asc()),
        ShipOrder::Speed => query.order((ships::speed.asc(), ships::id.asc())),
        ShipOrder::Date => query.order((ships::prod_date.asc(), ships::id.asc())),
        ShipOrder::Rating => query.order((ships::rating.asc(), ships::id.asc())),
    }
}

fn into_ships(records: Vec<ShipRecord>) -> Result<Vec<Ship>> {
    records.into_iter().map(Ship::try_from).collect()
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl ShipStore for PgShipStore {
    fn find_all(&self, predicate: &ShipPredicate) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let records = ordered(filtered(predicate), ShipOrder::Id)
            .load::<ShipRecord>(&mut conn)
            .map_err(|err| storage("load ships failed", err))?;
        into_ships(records)
    }

    fn find_page(&self, predicate: &ShipPredicate, page: &PageRequest) -> Result<Page<Ship>> {
        let mut conn = self.conn()?;
        let total: i64 = filtered(predicate)
            .count()
            .get_result(&mut conn)
            .map_err(|err| storage("count ships failed", err))?;
        let records = ordered(filtered(predicate), page.order)
            .offset(to_i64(page.offset()))
            .limit(i64::from(page.page_size))
            .load::<ShipRecord>(&mut conn)
            .map_err(|err| storage("load ship page failed", err))?;
        let total = u64::try_from(total).unwrap_or_default();
        Ok(Page::new(into_ships(records)?, page, total))
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .first::<ShipRecord>(&mut conn)
            .optional()
            .map_err(|err| storage("load ship failed", err))?
            .map(Ship::try_from)
            .transpose()
    }

    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record: ShipRecord = diesel::insert_into(ships::table)
            .values(NewShipRecord::from(ship))
            .get_result(&mut conn)
            .map_err(|err| storage("insert ship failed", err))?;
        Ship::try_from(record)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = ShipRecord::from(ship);
        let saved: ShipRecord = diesel::update(ships::table.find(record.id))
            .set(&record)
            .get_result(&mut conn)
            .map_err(|err| storage("update ship failed", err))?;
        Ship::try_from(saved)
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(ships::table.find(ship.id))
            .execute(&mut conn)
            .map_err(|err| storage("delete ship failed", err))?;
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        let mut conn = self.conn()?;
        let total: i64 = ships::table
            .count()
            .get_result(&mut conn)
            .map_err(|err| storage("count ships failed", err))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
