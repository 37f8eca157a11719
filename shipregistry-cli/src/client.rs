//! HTTP client for the ship registry server.

use std::fmt;

use crate::CliResult;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shipregistry_core::{Ship, ShipInput, ShipOrder, ShipQuery};

/// Server used when neither `--server-url` nor `SHIPREGISTRY_API_URL` is given.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Paging parameters sent with list requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Sort key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ShipOrder>,
    /// Zero-based page index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// Records per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Non-success answer from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Message reported by the server, or the raw body.
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server answered {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Normalize the server URL for consistent API requests.
fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn check_status(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.message)
        .unwrap_or(body);
    Err(ApiError {
        status: status.as_u16(),
        message,
    }
    .into())
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> CliResult<T> {
    let response = check_status(request.send().await?).await?;
    Ok(response.json::<T>().await?)
}

/// Typed access to the `/api/ships` endpoints.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    server_url: String,
}

impl RegistryClient {
    /// Build a client for the server at `server_url`.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let client = Client::builder().user_agent("shipregistry-cli").build()?;
        Ok(Self {
            client,
            server_url: normalize_server_url(server_url)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/ships{path}", self.server_url)
    }

    /// Fetch one page of ships matching `query`.
    pub async fn list(&self, query: &ShipQuery, page: &PageQuery) -> CliResult<Vec<Ship>> {
        send_json(self.client.get(self.url("")).query(query).query(page)).await
    }

    /// Count ships matching `query`.
    pub async fn count(&self, query: &ShipQuery) -> CliResult<u64> {
        send_json(self.client.get(self.url("/count")).query(query)).await
    }

    /// Fetch a ship by its raw identifier.
    pub async fn get(&self, id: &str) -> CliResult<Ship> {
        send_json(self.client.get(self.url(&format!("/{id}")))).await
    }

    /// Register a ship.
    pub async fn create(&self, input: &ShipInput) -> CliResult<Ship> {
        send_json(self.client.post(self.url("")).json(input)).await
    }

    /// Overwrite the fields present in `input`.
    pub async fn update(&self, id: &str, input: &ShipInput) -> CliResult<Ship> {
        send_json(self.client.post(self.url(&format!("/{id}"))).json(input)).await
    }

    /// Remove a ship.
    pub async fn delete(&self, id: &str) -> CliResult<()> {
        let response = self.client.delete(self.url(&format!("/{id}"))).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
