//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use talon_core::prelude::*;
//! ```

pub use crate::{
    ClientError, DecoderRegistry, Error, ErrorDecoder, ErrorDocument, ErrorDocumentResolver,
    FormatSpecifier, Method, Representation, RepresentationRegistry, Request, RequestBuilder,
    Response, Result, Transport, from_json, translate,
};
