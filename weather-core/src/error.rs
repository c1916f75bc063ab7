use thiserror::Error;

/// Failure of the persisted key-value store.
///
/// These are never swallowed: a corrupt or unreadable store must not turn
/// into silently wrong weather data.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt entry under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure talking to the remote weather provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("location not found: {0}")]
    NotFound(String),

    #[error("provider request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected provider payload: {0}")]
    Parse(String),
}

/// Top-level error returned by the gateway, registry and app use cases.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_are_marked_as_fetch_failures() {
        let err: WeatherError = FetchError::NotFound("Atlantis".into()).into();
        let msg = err.to_string();
        assert!(msg.starts_with("fetch failed"));
        assert!(msg.contains("Atlantis"));
    }

    #[test]
    fn storage_errors_pass_through_unchanged() {
        let source = serde_json::from_str::<u8>("nope").unwrap_err();
        let err: WeatherError = StorageError::Corrupt { key: "saved_cities".into(), source }.into();
        assert!(err.to_string().starts_with("corrupt entry under key 'saved_cities'"));
    }
}
