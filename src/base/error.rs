use thiserror::Error;

/// Error taxonomy for cookie synchronization.
///
/// Every public operation returns `Result<T, BridgeError>`. Per-cookie
/// failures inside a sync batch are absorbed into warning strings on the
/// outcome instead of failing the batch; per-source failures are absorbed
/// into the aggregate's warnings unless every source failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The source origin had nothing to offer. Reportable, not fatal.
    #[error("No cookies found for {}", no_cookies_detail(.host, .isolated))]
    NoCookiesAtSource { host: String, isolated: bool },

    #[error("No enabled source URLs found. Please add some production URLs first.")]
    NoEnabledSources,

    #[error("URL already exists in the list: {url}")]
    DuplicateSource { url: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Source index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The store adapter failed to enumerate cookies.
    #[error("Cookie store read failed: {message}")]
    AdapterRead { message: String },

    /// A single cookie write failed. Collected into warnings, never aborts
    /// the batch.
    #[error("Failed to set cookie {name}: {message}")]
    AdapterWrite { name: String, message: String },

    #[error("Failed to transfer cookies from any source. Errors: {details}")]
    AllSourcesFailed { details: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

fn no_cookies_detail(host: &str, isolated: &bool) -> String {
    if *isolated {
        format!("{host} in incognito mode")
    } else {
        host.to_string()
    }
}

impl BridgeError {
    pub fn no_cookies(host: impl Into<String>, isolated: bool) -> Self {
        BridgeError::NoCookiesAtSource { host: host.into(), isolated }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        BridgeError::InvalidUrl { url: url.into() }
    }

    pub fn adapter_read(message: impl Into<String>) -> Self {
        BridgeError::AdapterRead { message: message.into() }
    }

    pub fn adapter_write(name: impl Into<String>, message: impl Into<String>) -> Self {
        BridgeError::AdapterWrite { name: name.into(), message: message.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        BridgeError::Storage { message: message.into() }
    }
}

/// Result type alias for cookie synchronization operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
