//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use talon::prelude::*;
//! ```

pub use crate::{
    ClientError, DecoderRegistry, Error, ErrorDecoder, ErrorDocument, FormatSpecifier,
    HyperTransport, Method, Representation, RepresentationRegistry, Request, Response, RestClient,
    Result, StatusCode, Transport, TransportConfig, from_json, header,
};
pub use serde::{Deserialize, Serialize};
