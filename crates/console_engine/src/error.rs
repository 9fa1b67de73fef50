use thiserror::Error;

/// Transport-level failures on a remote call. HTTP error statuses are not
/// errors at this layer; callers read them off the reply so the session
/// guard sees every response first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("client setup failed: {0}")]
    ClientSetup(String),
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        return RemoteError::Timeout(err.to_string());
    }
    RemoteError::Network(err.to_string())
}
