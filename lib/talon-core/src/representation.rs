//! Representation formats and their registry.
//!
//! A [`Representation`] turns payload object graphs into wire bodies and
//! back. The neutral object-graph type is [`serde_json::Value`]; typed
//! payloads cross into it via [`serde_json::to_value`] at the client
//! boundary, so a single trait object covers every payload type.
//!
//! Formats are resolved through a [`RepresentationRegistry`]: an ordered
//! name-to-factory map with an optional built-in-namespace retry, instead of
//! any runtime symbol loading.

use std::sync::Arc;

use serde_json::Value;

use crate::{Error, Result};

/// Namespace prefix under which built-in representations are registered.
pub const BUILTIN_NAMESPACE: &str = "talon";

/// Content type of the built-in JSON representation.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of the built-in form-urlencoded representation.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// ============================================================================
// Serialization helpers
// ============================================================================

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "error.detail").
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

// ============================================================================
// Representation trait and built-ins
// ============================================================================

/// A serialization format for request and error-response bodies.
///
/// Implement this trait to plug in a custom format, then register a factory
/// for it with [`RepresentationRegistry::register`] or pass an instance
/// directly via [`FormatSpecifier::Instance`].
pub trait Representation: Send + Sync {
    /// Fully-qualified registry name (e.g. `talon.json`).
    fn name(&self) -> &str;

    /// The content-type announced in `Accept` / `Content-Type` headers.
    fn content_type(&self) -> &str;

    /// Encode an object graph into a wire body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented in this format.
    fn encode(&self, value: &Value) -> Result<String>;

    /// Decode a wire body into an object graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed for this format.
    fn decode(&self, input: &str) -> Result<Value>;
}

/// Built-in JSON representation (`application/json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepresentation;

impl Representation for JsonRepresentation {
    fn name(&self) -> &str {
        "talon.json"
    }

    fn content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn encode(&self, value: &Value) -> Result<String> {
        serde_json::to_string(value).map_err(Into::into)
    }

    fn decode(&self, input: &str) -> Result<Value> {
        from_json(input.as_bytes())
    }
}

/// Built-in form-urlencoded representation
/// (`application/x-www-form-urlencoded`).
///
/// Encodes top-level object graphs as `key=value` pairs; decoded bodies come
/// back as an object with string values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormRepresentation;

impl Representation for FormRepresentation {
    fn name(&self) -> &str {
        "talon.form"
    }

    fn content_type(&self) -> &str {
        FORM_CONTENT_TYPE
    }

    fn encode(&self, value: &Value) -> Result<String> {
        serde_html_form::to_string(value).map_err(Into::into)
    }

    fn decode(&self, input: &str) -> Result<Value> {
        let pairs: Vec<(String, String)> = serde_html_form::from_str(input)?;
        let mut object = serde_json::Map::with_capacity(pairs.len());
        for (key, value) in pairs {
            object.insert(key, Value::String(value));
        }
        Ok(Value::Object(object))
    }
}

// ============================================================================
// Format specifier
// ============================================================================

/// A loosely-typed representation specifier: a (possibly namespaced) format
/// name, or an already-constructed representation used as-is.
#[derive(Clone)]
pub enum FormatSpecifier {
    /// A registry name, bare (`json`) or fully qualified (`talon.json`).
    Name(String),
    /// A ready representation instance.
    Instance(Arc<dyn Representation>),
}

impl std::fmt::Debug for FormatSpecifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Instance(repr) => f.debug_tuple("Instance").field(&repr.name()).finish(),
        }
    }
}

impl From<&str> for FormatSpecifier {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for FormatSpecifier {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Arc<dyn Representation>> for FormatSpecifier {
    fn from(repr: Arc<dyn Representation>) -> Self {
        Self::Instance(repr)
    }
}

// ============================================================================
// Registry
// ============================================================================

type Factory = Box<dyn Fn() -> Arc<dyn Representation> + Send + Sync>;

/// Ordered registry mapping format names to representation factories.
///
/// Resolution tries the name as given, then retries it under
/// [`BUILTIN_NAMESPACE`], so `json` and `talon.json` both reach the built-in
/// JSON representation while caller-registered names are matched exactly.
pub struct RepresentationRegistry {
    factories: Vec<(String, Factory)>,
}

impl std::fmt::Debug for RepresentationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.factories.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("RepresentationRegistry")
            .field("formats", &names)
            .finish()
    }
}

impl RepresentationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Create a registry populated with the built-in representations
    /// (`talon.json`, `talon.form`).
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("talon.json", || Arc::new(JsonRepresentation));
        registry.register("talon.form", || Arc::new(FormRepresentation));
        registry
    }

    /// Register a representation factory under a fully-qualified name.
    ///
    /// Registering an already-present name replaces the earlier factory.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Arc<dyn Representation> + Send + Sync + 'static,
    ) {
        let name = name.into();
        self.factories.retain(|(existing, _)| *existing != name);
        self.factories.push((name, Box::new(factory)));
    }

    /// Instantiate the representation registered under `name`, if any.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Option<Arc<dyn Representation>> {
        self.factories
            .iter()
            .find(|(registered, _)| registered == name)
            .map(|(_, factory)| factory())
    }

    /// Resolve a specifier to a representation.
    ///
    /// Instances are used as-is. Names are looked up as given, then retried
    /// under [`BUILTIN_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// [`Error::FormatRequired`] for an empty name, [`Error::UnknownFormat`]
    /// (naming the original specifier) when neither lookup resolves.
    pub fn resolve(&self, specifier: &FormatSpecifier) -> Result<Arc<dyn Representation>> {
        match specifier {
            FormatSpecifier::Instance(repr) => Ok(Arc::clone(repr)),
            FormatSpecifier::Name(name) => {
                if name.is_empty() {
                    return Err(Error::FormatRequired);
                }
                if let Some(repr) = self.instantiate(name) {
                    return Ok(repr);
                }
                let namespaced = format!("{BUILTIN_NAMESPACE}.{name}");
                self.instantiate(&namespaced)
                    .ok_or_else(|| Error::UnknownFormat {
                        specifier: name.clone(),
                    })
            }
        }
    }
}

impl Default for RepresentationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
