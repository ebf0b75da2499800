use thiserror::Error;

/// Result type for `wallhaven`, using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Enum for `wallhaven` errors.
///
/// Validation failures are raised before any request is made; the remote
/// variants mirror the status codes documented at
/// <https://wallhaven.cc/help/api>.
#[derive(Error, Debug)]
pub enum Error {
    /// The parameter name isn't part of the search grammar.
    #[error("unknown search parameter \"{0}\"")]
    UnknownParameter(String),

    /// The value doesn't match the grammar of its parameter.
    #[error("invalid value \"{value}\" for search parameter \"{key}\"")]
    InvalidParameter { key: String, value: String },

    /// The image type given to the `q` builder isn't `png`, `jpeg` or `jpg`.
    #[error("invalid image type \"{0}\", must be one of png, jpeg, jpg")]
    InvalidImageType(String),

    /// `page` was supplied to a page stream. The stream owns its own page
    /// cursor; use [`Client::search_page`][crate::client::Client::search_page]
    /// or [`Client::collection_page`][crate::client::Client::collection_page]
    /// to fetch a specific page.
    #[error("the page parameter is owned by the page stream and cannot be supplied")]
    PageParameterReserved,

    /// The endpoint requires an API key but the client was built without one.
    #[error("no API key supplied")]
    MissingApiKey,

    /// The API rejected the request (HTTP 400, 404 or 422).
    #[error("bad request for url {url}")]
    BadRequest { url: String },

    /// The API failed to answer (HTTP 500, 502 or 503). Transient; retrying
    /// later usually helps.
    #[error("server error {status}")]
    Server { status: u16 },

    /// The request rate limit was still exceeded after the retry budget.
    #[error("API request speed limit reached")]
    RateLimit,

    /// Any other unexpected status code.
    #[error("unexpected HTTP status {status}")]
    Http { status: u16 },

    /// The API answered 200 with a non-empty body that isn't JSON.
    #[error("invalid content returned")]
    MalformedResponse,

    /// JSON (de)serialization error, including the empty-body case.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request couldn't be sent or the transport failed mid-flight.
    #[error("couldn't send request: {0}")]
    CannotSendRequest(#[from] reqwest::Error),

    /// The client couldn't be created.
    #[error("couldn't create client: {0}")]
    CannotCreateClient(String),
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Error {
        Error::CannotCreateClient(format!("invalid header value: {}", e))
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::CannotCreateClient(format!("invalid base url: {}", e))
    }
}
