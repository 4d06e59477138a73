//! Bot-list stats integration.
//!
//! This module reports the current server count to the external stats
//! aggregator. The call is a one-shot heartbeat: failures are logged by the
//! caller and never retried.

use crate::error::{Result, ShellError};
use serde::Serialize;
use std::time::Duration;

/// Upper bound for any outbound call made through the shared client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize, Debug)]
struct ServerCountPayload {
    server_count: usize,
}

/// Build the shared outbound HTTP client.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ShellError::Network(format!("Failed to build HTTP client: {}", e)))
}

/// Post the current server count to the stats service.
///
/// # Arguments
///
/// * `client` - HTTP client to use for the request
/// * `base_url` - Base URL of the stats service, without a trailing slash
/// * `client_id` - Id of the bot account the stats belong to
/// * `token` - Value sent in the `Authorization` header
/// * `server_count` - Number of guilds the bot is in
///
/// # Errors
///
/// Returns `ShellError::Network` if the request fails or the service answers
/// with a non-success status.
///
/// # Examples
///
/// ```no_run
/// use rpgbot::stats_api::{build_client, post_server_count};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = build_client()?;
/// post_server_count(&client, "https://bots.discord.pw", 305177429612298242, "token", 12).await?;
/// # Ok(())
/// # }
/// ```
pub async fn post_server_count(
    client: &reqwest::Client,
    base_url: &str,
    client_id: u64,
    token: &str,
    server_count: usize,
) -> Result<()> {
    let url = format!("{}/api/bots/{}/stats", base_url, client_id);
    let resp = client
        .post(&url)
        .header(reqwest::header::AUTHORIZATION, token)
        .json(&ServerCountPayload { server_count })
        .send()
        .await
        .map_err(|e| ShellError::Network(format!("Stats request failed: {}", e)))?;

    let status = resp.status();
    // Drain the body so the connection can be reused.
    let _ = resp.bytes().await;

    if status.is_success() {
        Ok(())
    } else {
        Err(ShellError::Network(format!(
            "Stats service returned error: {}",
            status
        )))
    }
}
