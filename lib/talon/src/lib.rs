//! REST client with pluggable representation formats and typed error
//! resolution.
//!
//! Requests are serialized with the active representation; failed responses
//! come back as structured [`ClientError`]s carrying the raw response and,
//! when a registered decoder matches the response's `Content-Type`, the
//! decoded error document.
//!
//! # Example
//!
//! ```ignore
//! use talon::RestClient;
//!
//! let client = RestClient::new("https://api.example.com", "json")?;
//!
//! match client.post("/items", &serde_json::json!({"id": 1}), &[]).await {
//!     Ok(response) => println!("created: {}", response.text()),
//!     Err(err) => {
//!         if let Some(document) = err.document() {
//!             println!("API error code: {:?}", document.code());
//!         }
//!     }
//! }
//! ```

mod config;
pub mod prelude;
mod rest;
mod transport;

// Re-export client types
pub use config::{TransportConfig, TransportConfigBuilder};
pub use rest::RestClient;
pub use transport::HyperTransport;

// Re-export core types
pub use talon_core::{
    BUILTIN_NAMESPACE, ClientError, DecoderRegistry, Error, ErrorDecoder, ErrorDocument,
    ErrorDocumentResolver, FORM_CONTENT_TYPE, FormRepresentation, FormatSpecifier,
    JSON_CONTENT_TYPE, JsonErrorDecoder, JsonRepresentation, Method, Representation,
    RepresentationRegistry, Request, RequestBuilder, Response, Result, Transport, from_json,
    translate,
};

// Re-export http types for status codes and headers
pub use talon_core::{StatusCode, header};

// Re-export url for endpoint handling
pub use url;
