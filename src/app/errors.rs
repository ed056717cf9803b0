/// Message shown when nothing more specific is known about a failure.
pub const GENERIC_FAILURE: &str = "Extraction failed";

pub const INVALID_URL: &str = "please provide a valid URL";

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("{}", INVALID_URL)]
    Validation,

    /// Raised by a backend that observed its cancellation token.
    #[error("operation was cancelled")]
    Cancelled,

    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("{}", GENERIC_FAILURE)]
    Transport(String),
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        ExtractError::Transport(err.to_string())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("io error: {0:?}")]
    IO(#[from] std::io::Error),

    #[error("json error: {0:?}")]
    Json(#[from] serde_json::Error),

    #[error("reqwest error: {0:?}")]
    Reqwest(#[from] reqwest::Error),
}
