//! Base types and error handling.
//!
//! Provides the crate-wide error taxonomy:
//! - [`BridgeError`](error::BridgeError): structured errors for sync, registry,
//!   adapter, and storage failures
//! - [`BridgeResult`](error::BridgeResult): result alias used throughout

pub mod error;

use time::OffsetDateTime;

/// Current wall-clock time as unix epoch milliseconds.
///
/// Persisted timestamps (`addedAt`, transfer history) use epoch millis.
pub fn now_unix_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
