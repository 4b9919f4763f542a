// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP implementation of [`ApiWrapper`] using reqwest.
//!
//! Pings are posted to `{base_url}/readings/{reading_id}/pings` as
//! `{"ping": {...}}` with the access token as a bearer credential.

use std::time::Duration;

use chrono::SecondsFormat;
use reqwest::Client;
use serde::Serialize;

use rp_core::Ping;

use super::api::{ApiError, ApiFuture, ApiResult, ApiWrapper};

/// Longest slice of a response body quoted in an error.
const MAX_BODY_SNIPPET: usize = 200;

/// Settings for [`HttpApiWrapper`].
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

/// Talks to the reading service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApiWrapper {
    client: Client,
    base_url: String,
    client_id: Option<String>,
    access_token: Option<String>,
}

#[derive(Serialize)]
struct PingEnvelope<'a> {
    ping: PingBody<'a>,
}

#[derive(Serialize)]
struct PingBody<'a> {
    identifier: &'a str,
    progress: f64,
    duration: u32,
    occurred_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lng: Option<f64>,
}

impl<'a> PingBody<'a> {
    fn from_ping(ping: &'a Ping) -> Self {
        let location = ping.payload.location();
        PingBody {
            identifier: ping.session_identifier.as_str(),
            progress: ping.payload.progress,
            duration: ping.payload.duration,
            occurred_at: ping.occurred_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            lat: location.map(|(lat, _)| lat),
            lng: location.map(|(_, lng)| lng),
        }
    }
}

impl HttpApiWrapper {
    pub fn new(config: HttpApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::NetworkUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpApiWrapper {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id,
            access_token: config.access_token,
        })
    }

    fn pings_url(&self, ping: &Ping) -> String {
        format!("{}/readings/{}/pings", self.base_url, ping.reading_id)
    }

    async fn post_ping(&self, ping: &Ping) -> ApiResult<()> {
        let mut request = self
            .client
            .post(self.pings_url(ping))
            .json(&PingEnvelope { ping: PingBody::from_ping(ping) });
        if let Some(client_id) = &self.client_id {
            request = request.query(&[("client_id", client_id)]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(network_error)?;
        let status = response.status();
        let body = response.text().await.map_err(network_error)?;

        if status.is_success() {
            if body.trim().is_empty() || serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                return Ok(());
            }
            return Err(ApiError::MalformedResponse(format!(
                "expected JSON body, got '{}'",
                snippet(&body)
            )));
        }

        let message = extract_error_message(&body).unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        });
        Err(ApiError::ServerRejected { status: status.as_u16(), message })
    }
}

impl ApiWrapper for HttpApiWrapper {
    fn send_ping<'a>(&'a self, ping: &'a Ping) -> ApiFuture<'a, ()> {
        Box::pin(self.post_ping(ping))
    }
}

fn network_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::NetworkUnavailable(format!("request timed out: {e}"))
    } else {
        ApiError::NetworkUnavailable(e.to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`; anything else non-empty is quoted as-is.
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let message = value
            .get("error")
            .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
            .or_else(|| value.get("message").and_then(|m| m.as_str()));
        if let Some(message) = message {
            return Some(message.to_string());
        }
    }

    Some(snippet(trimmed))
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_SNIPPET) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
