/// Failures of a collection call, including the ones caught before any request
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field was missing; no request was sent
    #[error("{0}")]
    Validation(String),

    /// Every file of an upload batch is already in the list
    #[error("That file(s) is already uploaded.")]
    Duplicate { names: Vec<String> },

    /// The request never got a response
    #[error("{0}")]
    Network(String),

    /// Non-success status, carrying the server's message
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A success response whose body is not the expected JSON
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
