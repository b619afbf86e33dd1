use thiserror::Error;

/// Why a dictionary or translation call produced nothing.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} from {service}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("unexpected response from {service}: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("empty response from {0}")]
    Empty(&'static str),
}
