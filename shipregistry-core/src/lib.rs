#![deny(missing_docs)]
//! Ship registry core library.
//!
//! This crate contains the ship domain model, the filter predicate builder,
//! validation and rating rules, and the registry service that ties them to a
//! storage collaborator.

pub mod domain;
pub mod error;
pub mod filter;
pub mod page;
pub mod rating;
pub mod registry;
pub mod store;
pub mod validation;

pub use domain::{NewShip, Ship, ShipField, ShipInput, ShipType, epoch_millis};
pub use error::{BadRequest, RegistryError, Result};
pub use filter::{Bound, ShipFilter, ShipPredicate, ShipQuery};
pub use page::{DEFAULT_PAGE_SIZE, Page, PageRequest, ShipOrder};
pub use rating::compute_rating;
pub use registry::{ShipRegistry, parse_ship_id};
pub use store::{InMemoryShipStore, ShipStore};
pub use validation::{validate_new, validate_present};
