//! Field-level validation for ship input.

use chrono::Datelike;

use crate::domain::{ShipField, ShipInput};
use crate::error::{BadRequest, Result};

/// Names and planets must be shorter than this many characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Slowest permitted speed.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest permitted speed.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest permitted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest permitted crew.
pub const MAX_CREW_SIZE: i32 = 9999;
/// Earliest permitted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Latest permitted production year.
pub const MAX_PROD_YEAR: i32 = 3019;

/// Validate input for a new ship: required fields first, then bounds.
pub fn validate_new(input: &ShipInput) -> Result<()> {
    let complete = input.name.is_some()
        && input.planet.is_some()
        && input.ship_type.is_some()
        && input.prod_date.is_some()
        && input.speed.is_some()
        && input.crew_size.is_some();
    if !complete {
        return Err(BadRequest::MissingRequiredField.into());
    }
    validate_present(input)
}

/// Apply bound checks to every present field.
pub fn validate_present(input: &ShipInput) -> Result<()> {
    let invalid = invalid_fields(input);
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(BadRequest::InvalidFields(invalid).into())
    }
}

/// Present fields that fail their bound check, in a fixed order.
pub fn invalid_fields(input: &ShipInput) -> Vec<ShipField> {
    let mut invalid = Vec::new();
    if input.name.as_deref().is_some_and(|name| !text_in_bounds(name)) {
        invalid.push(ShipField::Name);
    }
    if input.planet.as_deref().is_some_and(|planet| !text_in_bounds(planet)) {
        invalid.push(ShipField::Planet);
    }
    if input.speed.is_some_and(|speed| !speed_in_bounds(speed)) {
        invalid.push(ShipField::Speed);
    }
    if input
        .crew_size
        .is_some_and(|crew| !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew))
    {
        invalid.push(ShipField::CrewSize);
    }
    if input
        .prod_date
        .is_some_and(|date| !(MIN_PROD_YEAR..=MAX_PROD_YEAR).contains(&date.year()))
    {
        invalid.push(ShipField::ProdDate);
    }
    invalid
}

fn text_in_bounds(value: &str) -> bool {
    !value.is_empty() && value.chars().count() < MAX_TEXT_LEN
}

fn speed_in_bounds(speed: f64) -> bool {
    !speed.is_nan() && (MIN_SPEED..=MAX_SPEED).contains(&speed)
}
