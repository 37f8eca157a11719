//! Paging and ordering for list queries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default page size for list queries.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Sort key for paged listings. Always ascending.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    /// By identifier.
    #[default]
    Id,
    /// By speed.
    Speed,
    /// By production date.
    Date,
    /// By rating.
    Rating,
}

impl ShipOrder {
    /// Name of the ship attribute the order sorts on.
    pub fn field_name(&self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Speed => "speed",
            ShipOrder::Date => "prodDate",
            ShipOrder::Rating => "rating",
        }
    }
}

/// Which slice of a listing to return.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page_number: u32,
    /// Records per page.
    pub page_size: u32,
    /// Sort key.
    pub order: ShipOrder,
}

impl PageRequest {
    /// Build a page request.
    pub fn new(page_number: u32, page_size: u32, order: ShipOrder) -> Self {
        Self {
            page_number,
            page_size,
            order,
        }
    }

    /// Number of records preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, ShipOrder::Id)
    }
}

/// One page of a listing plus totals for the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page.
    pub content: Vec<T>,
    /// Records across every page.
    pub total_elements: u64,
    /// Number of pages.
    pub total_pages: u64,
    /// Zero-based page index.
    pub page_number: u32,
    /// Requested page size.
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Wrap a page of content for `request`.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = if request.page_size == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(request.page_size))
        };
        Self {
            content,
            total_elements,
            total_pages,
            page_number: request.page_number,
            page_size: request.page_size,
        }
    }
}
