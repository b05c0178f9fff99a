//! Tick source trait and structured error types.
//!
//! The TickSource trait abstracts over where candles come from (the hosted
//! table, the synthetic demo feed) so the poller can be driven by fakes in tests.

use thiserror::Error;

use crate::domain::Tick;

/// Structured error types for source operations.
///
/// Displayed verbatim in the error history overlay and the log.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("authentication rejected (HTTP {status})")]
    AuthenticationRejected { status: u16 },

    #[error("table or column not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("source not configured: {0}")]
    NotConfigured(String),

    #[error("source error: {0}")]
    Other(String),
}

/// Trait for tick sources.
///
/// `fetch_latest` returns at most `limit` rows, newest first. Implementations
/// block; the poller runs them off the UI thread.
pub trait TickSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the newest `limit` ticks, ordered newest-first.
    fn fetch_latest(&self, limit: usize) -> Result<Vec<Tick>, SourceError>;
}
