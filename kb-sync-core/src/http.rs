//! Response handling shared by the REST clients.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{error, warn};

use crate::error::{RemoteSystem, SyncError};

/// List endpoints on both systems wrap their items in `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Pass success responses through; turn anything else into [`SyncError::Remote`].
pub async fn ensure_success(
    system: RemoteSystem,
    response: Response,
) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
    error!(%system, status = status.as_u16(), %url, body = %body, "Remote API returned error");
    Err(SyncError::Remote {
        system,
        status: status.as_u16(),
        body,
    })
}

/// Decode a `{"data": [...]}` body.
pub async fn read_data<T: DeserializeOwned>(
    system: RemoteSystem,
    response: Response,
) -> Result<Vec<T>, SyncError> {
    let text = response.text().await?;
    serde_json::from_str::<DataEnvelope<T>>(&text)
        .map(|envelope| envelope.data)
        .map_err(|e| SyncError::Decode {
            system,
            message: e.to_string(),
        })
}

/// Warn when a list call came back full. Only the first page is fetched, so a
/// full page most likely means the snapshot is missing articles.
pub fn warn_if_page_full(system: RemoteSystem, scope: &str, fetched: usize, limit: u32) -> bool {
    let full = fetched >= limit as usize;
    if full {
        warn!(
            %system,
            scope,
            fetched,
            limit,
            "Article listing reached the limit; results may be truncated"
        );
    }
    full
}
