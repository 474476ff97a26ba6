//! Core types and the content-negotiation/error-resolution subsystem for
//! the talon REST client.
//!
//! This crate provides the foundational types used by talon:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Error`], [`ClientError`] and [`Result`] - Error handling
//! - [`Representation`] and [`RepresentationRegistry`] - pluggable
//!   serialization formats and their resolution
//! - [`ErrorDecoder`], [`DecoderRegistry`] and [`ErrorDocumentResolver`] -
//!   error-document decoding by response content-type
//! - [`translate`] - failed-response-to-[`ClientError`] translation
//! - [`Transport`] - the seam to the underlying HTTP transport
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod error;
mod error_document;
mod method;
pub mod prelude;
mod representation;
mod request;
mod response;
mod translate;
mod transport;

pub use error::{ClientError, Error, Result};
pub use error_document::{
    DecoderRegistry, ErrorDecoder, ErrorDocument, ErrorDocumentResolver, JsonErrorDecoder,
};
pub use method::Method;
pub use representation::{
    BUILTIN_NAMESPACE, FORM_CONTENT_TYPE, FormRepresentation, FormatSpecifier, JSON_CONTENT_TYPE,
    JsonRepresentation, Representation, RepresentationRegistry, from_json,
};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use translate::translate;
pub use transport::Transport;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
