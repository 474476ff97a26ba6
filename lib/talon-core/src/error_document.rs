//! Error-document decoding and decoder resolution.
//!
//! A failed response body is decoded by the first registered
//! [`ErrorDecoder`] whose content-type equals the response's `Content-Type`
//! exactly. The set of known decoders is a static [`DecoderRegistry`]
//! assembled at construction time; there is no runtime discovery.
//!
//! [`ErrorDocumentResolver`] caches the matched decoder. The cache holds at
//! most one decoder and is returned without re-matching while populated: a
//! client is assumed to see one error-content-type family per configured
//! representation format, and the client invalidates the cache whenever the
//! format changes.

use std::borrow::Cow;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::{Result, from_json};

// ============================================================================
// Error Document
// ============================================================================

/// The structured, decoded body of a failure response.
///
/// Fields are format-specific; the document is treated as an opaque decoded
/// payload by the client and inspected by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDocument(Value);

impl ErrorDocument {
    /// Wrap a decoded object graph.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Top-level field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The conventional `code` field, when present as a string.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get("code").and_then(Value::as_str)
    }

    /// Deserialize the document into a typed view.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not match `T`.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.0.clone()).map_err(Into::into)
    }

    /// Consume into the underlying object graph.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

// ============================================================================
// Error Decoder
// ============================================================================

/// A capability that recognizes one content-type and parses failure bodies
/// into [`ErrorDocument`]s.
///
/// # Example
///
/// ```ignore
/// struct ProblemDecoder;
///
/// impl ErrorDecoder for ProblemDecoder {
///     fn content_type(&self) -> &str {
///         "application/problem+json"
///     }
///
///     fn decode(&self, body: &str) -> talon_core::Result<ErrorDocument> {
///         talon_core::from_json(body.as_bytes()).map(ErrorDocument::new)
///     }
/// }
/// ```
pub trait ErrorDecoder: Send + Sync {
    /// The content-type this decoder recognizes, matched against response
    /// `Content-Type` values exactly (case-sensitive, no wildcard or
    /// parameter handling).
    fn content_type(&self) -> &str;

    /// Parse a failure body into an [`ErrorDocument`].
    ///
    /// # Errors
    ///
    /// Returns an error if the body is malformed for this content-type.
    fn decode(&self, body: &str) -> Result<ErrorDocument>;
}

/// JSON error-document decoder for a configurable content-type.
///
/// The built-in registry uses it for `application/json` and
/// `application/vnd.error+json`.
#[derive(Debug, Clone)]
pub struct JsonErrorDecoder {
    content_type: Cow<'static, str>,
}

impl JsonErrorDecoder {
    /// Create a decoder recognizing the given content-type.
    #[must_use]
    pub fn new(content_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }
}

impl ErrorDecoder for JsonErrorDecoder {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn decode(&self, body: &str) -> Result<ErrorDocument> {
        from_json(body.as_bytes()).map(ErrorDocument::new)
    }
}

// ============================================================================
// Decoder Registry
// ============================================================================

/// Static, ordered list of known error-document decoders.
///
/// Registration order is match order: the first decoder whose content-type
/// equals the response's wins.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: Vec<Arc<dyn ErrorDecoder>>,
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let content_types: Vec<&str> = self
            .decoders
            .iter()
            .map(|decoder| decoder.content_type())
            .collect();
        f.debug_struct("DecoderRegistry")
            .field("content_types", &content_types)
            .finish()
    }
}

impl DecoderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry populated with the built-in JSON decoders
    /// (`application/json`, `application/vnd.error+json`).
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(JsonErrorDecoder::new("application/json"));
        registry.register(JsonErrorDecoder::new("application/vnd.error+json"));
        registry
    }

    /// Append a decoder, preserving registration order.
    pub fn register(&mut self, decoder: impl ErrorDecoder + 'static) {
        self.decoders.push(Arc::new(decoder));
    }

    /// First registered decoder whose content-type equals `content_type`
    /// exactly.
    #[must_use]
    pub fn find(&self, content_type: &str) -> Option<Arc<dyn ErrorDecoder>> {
        self.decoders
            .iter()
            .find(|decoder| decoder.content_type() == content_type)
            .map(Arc::clone)
    }

    /// Number of registered decoders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns `true` if no decoder is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Matches decoders to response content-types, caching the match.
///
/// The single cache slot is returned without re-matching while populated;
/// [`ErrorDocumentResolver::invalidate`] clears it and must be called when
/// the active representation format changes, otherwise a decoder matched
/// under the previous format could silently apply to the wrong content-type.
pub struct ErrorDocumentResolver {
    registry: DecoderRegistry,
    cached: Mutex<Option<Arc<dyn ErrorDecoder>>>,
}

impl std::fmt::Debug for ErrorDocumentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorDocumentResolver")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl ErrorDocumentResolver {
    /// Create a resolver over the given decoder registry.
    #[must_use]
    pub fn new(registry: DecoderRegistry) -> Self {
        Self {
            registry,
            cached: Mutex::new(None),
        }
    }

    /// The decoder for `content_type`, from cache or fresh discovery.
    ///
    /// `None` is a valid, non-fatal outcome: no registered decoder
    /// recognizes the content-type and the error document stays absent.
    #[must_use]
    pub fn decoder_for(&self, content_type: &str) -> Option<Arc<dyn ErrorDecoder>> {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(decoder) = cached.as_ref() {
            return Some(Arc::clone(decoder));
        }

        let decoder = self.registry.find(content_type)?;
        *cached = Some(Arc::clone(&decoder));
        Some(decoder)
    }

    /// Clear the cached match, forcing fresh discovery on the next lookup.
    pub fn invalidate(&self) {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *cached = None;
    }

    /// The decoder registry backing this resolver.
    #[must_use]
    pub const fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }
}

impl Default for ErrorDocumentResolver {
    fn default() -> Self {
        Self::new(DecoderRegistry::builtin())
    }
}
