//! Supabase (PostgREST) tick source.
//!
//! Issues a single read-only query per fetch:
//! `GET {url}/rest/v1/{table}?select={ts},{label}&order={ts}.desc&limit={n}`.
//! There is no retry loop; the poll interval is the retry cadence.

use serde_json::{Map, Value};

use super::provider::{SourceError, TickSource};
use crate::config::SourceConfig;
use crate::domain::Tick;

/// Longest response body excerpt kept in an error message.
const BODY_EXCERPT: usize = 200;

/// Tick source backed by a Supabase table.
pub struct SupabaseSource {
    client: reqwest::blocking::Client,
    config: SourceConfig,
}

impl SupabaseSource {
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        if config.url.trim().is_empty() {
            return Err(SourceError::NotConfigured("url is empty".into()));
        }
        if config.api_key.trim().is_empty() {
            return Err(SourceError::NotConfigured("api key is empty".into()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("candlewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// REST endpoint for the configured table.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    /// Query parameters for a newest-first batch of `limit` rows.
    pub fn query(&self, limit: usize) -> Vec<(&'static str, String)> {
        let ts = &self.config.timestamp_column;
        vec![
            ("select", format!("{ts},{}", self.config.label_column)),
            ("order", format!("{ts}.desc")),
            ("limit", limit.to_string()),
        ]
    }

    /// Turn a PostgREST JSON array into ticks, tolerating nulls and missing columns.
    pub fn parse_rows(&self, body: Value) -> Result<Vec<Tick>, SourceError> {
        let Value::Array(rows) = body else {
            return Err(SourceError::ResponseFormatChanged(
                "expected a JSON array of rows".into(),
            ));
        };

        rows.into_iter()
            .map(|row| match row {
                Value::Object(map) => Ok(Tick {
                    timestamp: column_text(&map, &self.config.timestamp_column),
                    label: column_text(&map, &self.config.label_column),
                }),
                other => Err(SourceError::ResponseFormatChanged(format!(
                    "expected a row object, got {other}"
                ))),
            })
            .collect()
    }

    fn map_transport_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else if e.is_connect() {
            SourceError::NetworkUnreachable(e.to_string())
        } else {
            SourceError::Other(e.to_string())
        }
    }
}

fn column_text(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

impl TickSource for SupabaseSource {
    fn name(&self) -> &str {
        "supabase"
    }

    fn fetch_latest(&self, limit: usize) -> Result<Vec<Tick>, SourceError> {
        let resp = self
            .client
            .get(self.endpoint())
            .query(&self.query(limit))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::AuthenticationRejected {
                status: status.as_u16(),
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(self.config.table.clone()));
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(SourceError::Http {
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT).collect(),
            });
        }

        let body: Value = resp.json().map_err(|e| {
            SourceError::ResponseFormatChanged(format!("failed to parse response: {e}"))
        })?;
        self.parse_rows(body)
    }
}
