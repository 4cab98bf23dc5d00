use thiserror::Error;

/// Failures talking to the backend.
///
/// `Http` means the backend was reachable but declined; `Transport` and
/// `Timeout` mean it was not reached at all. Callers use the distinction to
/// pick an actionable user-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend returned HTTP {status}")]
    Http { status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response decoding failed: {0}")]
    Decode(String),

    #[error("client build error: {0}")]
    Build(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Build(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
