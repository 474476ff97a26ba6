//! Error types for talon.

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::{ErrorDocument, Response};

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for talon operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The configured endpoint is not a well-formed absolute URL.
    #[display("invalid endpoint URL: {_0}")]
    #[from]
    InvalidEndpoint(url::ParseError),

    /// No representation format could be resolved from the specifier.
    #[display("unknown representation format: {specifier}")]
    #[from(skip)]
    UnknownFormat {
        /// The original specifier as given by the caller.
        #[error(not(source))]
        specifier: String,
    },

    /// The format specifier identifies nothing.
    #[display("a representation format is required")]
    #[from(skip)]
    FormatRequired,

    /// A failed request, wrapping the raw response and the decoded
    /// error document when one was resolvable.
    #[display("{_0}")]
    Client(Box<ClientError>),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "error.detail").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// Form URL-encoded deserialization error.
    #[display("form deserialization error: {_0}")]
    #[from]
    FormDeserialization(serde_html_form::de::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a [`ClientError`].
    #[must_use]
    pub fn client(error: ClientError) -> Self {
        Self::Client(Box::new(error))
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if this wraps a failed response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client(inner) => inner.status(),
            _ => None,
        }
    }

    /// Returns `true` if this wraps a 4xx response.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this wraps a 5xx response.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the decoded error document if this wraps a failed response
    /// whose body a registered decoder understood.
    #[must_use]
    pub fn document(&self) -> Option<&ErrorDocument> {
        match self {
            Self::Client(inner) => inner.document(),
            _ => None,
        }
    }
}

impl From<ClientError> for Error {
    fn from(error: ClientError) -> Self {
        Self::client(error)
    }
}

// ============================================================================
// Client Error
// ============================================================================

/// A failed request, created exactly once per failure and immutable after
/// construction.
///
/// Carries the human-readable message, the originating transport failure
/// (for requests that never produced a response), the raw failure response
/// (status, headers, body), and the decoded [`ErrorDocument`] when a
/// registered decoder matched the response's `Content-Type`. A decoder that
/// matched but could not parse the body leaves the document absent and
/// records the parse error in [`ClientError::decode_failure`].
#[derive(Debug)]
pub struct ClientError {
    message: String,
    cause: Option<Box<Error>>,
    response: Option<Response<Bytes>>,
    document: Option<ErrorDocument>,
    decode_failure: Option<String>,
}

impl ClientError {
    /// Create a client error from a failed response.
    #[must_use]
    pub fn from_response(message: impl Into<String>, response: Response<Bytes>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            response: Some(response),
            document: None,
            decode_failure: None,
        }
    }

    /// Create a client error from a transport failure that produced no
    /// response (connection fault, timeout).
    #[must_use]
    pub fn from_transport(cause: Error) -> Self {
        Self {
            message: cause.to_string(),
            cause: Some(Box::new(cause)),
            response: None,
            document: None,
            decode_failure: None,
        }
    }

    pub(crate) fn with_document(mut self, document: ErrorDocument) -> Self {
        self.document = Some(document);
        self
    }

    pub(crate) fn with_decode_failure(mut self, message: impl Into<String>) -> Self {
        self.decode_failure = Some(message.into());
        self
    }

    /// Human-readable failure summary.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The transport failure that triggered this error, when the request
    /// never produced a response.
    #[must_use]
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_deref()
    }

    /// The raw failure response, when one was received.
    #[must_use]
    pub fn response(&self) -> Option<&Response<Bytes>> {
        self.response.as_ref()
    }

    /// The decoded error document, when a decoder matched and parsing
    /// succeeded.
    #[must_use]
    pub fn document(&self) -> Option<&ErrorDocument> {
        self.document.as_ref()
    }

    /// The decoder's parse error, when a decoder matched but the body was
    /// malformed for the claimed content-type.
    #[must_use]
    pub fn decode_failure(&self) -> Option<&str> {
        self.decode_failure.as_deref()
    }

    /// HTTP status code of the failure response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(Response::status)
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
