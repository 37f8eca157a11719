//! HTTP handlers for the ship registry server.

use std::sync::Arc;

use actix_web::error::InternalError;
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use serde::{Deserialize, Serialize};
use shipregistry_core::{
    DEFAULT_PAGE_SIZE, Page, PageRequest, RegistryError, Ship, ShipInput, ShipOrder, ShipQuery,
    ShipRegistry, ShipStore,
};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Store shared between workers, whichever backend was configured.
pub type SharedStore = Arc<dyn ShipStore + Send + Sync>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Registry over the configured store.
    pub registry: ShipRegistry<SharedStore>,
}

impl AppState {
    /// Build state around a store.
    pub fn new(store: SharedStore) -> Self {
        Self {
            registry: ShipRegistry::new(store),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Paging parameters for the list endpoint.
#[derive(Debug, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Sort key, ascending.
    pub order: Option<ShipOrder>,
    /// Zero-based page index.
    pub page_number: Option<u32>,
    /// Records per page, at least 1.
    pub page_size: Option<u32>,
}

impl PageParams {
    fn page_request(&self) -> Result<PageRequest, HttpResponse> {
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(bad_request("pageSize must be at least 1".to_string()));
        }
        Ok(PageRequest::new(
            self.page_number.unwrap_or_default(),
            page_size,
            self.order.unwrap_or_default(),
        ))
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse { message })
}

fn error_response(err: RegistryError) -> HttpResponse {
    match err {
        RegistryError::BadRequest(reason) => bad_request(reason.to_string()),
        RegistryError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            message: err.to_string(),
        }),
        RegistryError::Storage(_) => {
            log::error!("{err}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                message: err.to_string(),
            })
        }
    }
}

/// Run a blocking registry call and render its outcome.
async fn respond<T, F>(call: F, render: impl FnOnce(T) -> HttpResponse) -> HttpResponse
where
    T: Send + 'static,
    F: FnOnce() -> shipregistry_core::Result<T> + Send + 'static,
{
    match web::block(call).await {
        Ok(Ok(value)) => render(value),
        Ok(Err(err)) => error_response(err),
        Err(err) => {
            log::error!("registry task failed: {err}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                message: format!("registry task failed: {err}"),
            })
        }
    }
}

fn ok_json<T: Serialize>(value: T) -> HttpResponse {
    HttpResponse::Ok().json(value)
}

/// Register handlers along with JSON and query error handlers that answer 400.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    }))
    .service(list_ships)
    .service(ship_count)
    .service(create_ship)
    .service(get_ship)
    .service(update_ship)
    .service(delete_ship)
    .service(openapi_json);
}

#[utoipa::path(
    get,
    path = "/ships",
    params(ShipQuery, PageParams),
    responses(
        (status = 200, description = "Page of matching ships", body = [Ship]),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/api/ships")]
/// List ships matching the filter, one page at a time.
pub async fn list_ships(
    state: web::Data<AppState>,
    query: web::Query<ShipQuery>,
    paging: web::Query<PageParams>,
) -> impl Responder {
    let page = match paging.page_request() {
        Ok(page) => page,
        Err(response) => return response,
    };
    let predicate = query.predicate();
    let registry = state.registry.clone();
    respond(
        move || registry.list_paged(&predicate, &page),
        |page: Page<Ship>| ok_json(page.content),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/ships/count",
    params(ShipQuery),
    responses(
        (status = 200, description = "Number of matching ships", body = u64),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/api/ships/count")]
/// Count ships matching the filter.
pub async fn ship_count(
    state: web::Data<AppState>,
    query: web::Query<ShipQuery>,
) -> impl Responder {
    let predicate = query.predicate();
    let registry = state.registry.clone();
    respond(move || registry.count_matching(&predicate), ok_json).await
}

#[utoipa::path(
    post,
    path = "/ships",
    request_body = ShipInput,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/api/ships")]
/// Register a new ship.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipInput>,
) -> impl Responder {
    let input = payload.into_inner();
    let registry = state.registry.clone();
    respond(move || registry.create(input), ok_json).await
}

#[utoipa::path(
    get,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Positive ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/api/ships/{id}")]
/// Fetch one ship.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let registry = state.registry.clone();
    respond(move || registry.get(&id), ok_json).await
}

#[utoipa::path(
    post,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Positive ship identifier")
    ),
    request_body = ShipInput,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid identifier or fields", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/api/ships/{id}")]
/// Overwrite the fields present in the payload and recompute the rating.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipInput>,
) -> impl Responder {
    let id = path.into_inner();
    let updates = payload.into_inner();
    let registry = state.registry.clone();
    respond(move || registry.update(&id, updates), ok_json).await
}

#[utoipa::path(
    delete,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Positive ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/api/ships/{id}")]
/// Remove a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let registry = state.registry.clone();
    respond(move || registry.delete(&id), |()| HttpResponse::Ok().finish()).await
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
