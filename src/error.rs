use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single upload or shorten call.
///
/// Per-request failures are carried as values inside an [`Action`] rather
/// than raised at the point of occurrence, so both execution modes share one
/// failure path. Only [`Error::Configuration`] is surfaced eagerly, at
/// client construction.
///
/// [`Action`]: crate::Action
#[derive(Debug, Error)]
pub enum Error {
    /// The client could not be constructed from the given settings.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An upload source could not be turned into bytes.
    #[error("could not resolve upload source: {0}")]
    Resolution(#[from] ResolutionError),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("api returned status {status}: {body}")]
    Transport { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Deserialization(String),
}

/// Failure while normalizing an upload source into bytes.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid source url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to fetch remote source: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A builder was consumed without any data being set.
    #[error("no upload data was provided")]
    MissingData,
}
