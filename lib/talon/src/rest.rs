//! The REST client: verbs, content negotiation, and failure translation.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{Instrument, Level, debug, error, span};
use url::Url;

use crate::transport::HyperTransport;
use crate::{
    ClientError, DecoderRegistry, Error, ErrorDocumentResolver, FORM_CONTENT_TYPE,
    FormatSpecifier, Method, Representation, RepresentationRegistry, Request, Response, Result,
    Transport, translate,
};

/// REST client issuing verb requests against a configured endpoint.
///
/// Outgoing payloads are serialized with the active [`Representation`];
/// failed responses are translated into [`ClientError`]s carrying the raw
/// response and, when a registered decoder matches the response's
/// `Content-Type`, the decoded error document. Changing the active format
/// with [`RestClient::set_format`] invalidates the cached decoder match.
///
/// Successful response bodies are returned raw; callers decode them
/// themselves (e.g. with [`Response::json`]).
///
/// # Example
///
/// ```ignore
/// use talon::RestClient;
///
/// let client = RestClient::new("https://api.example.com", "json")?;
/// let response = client.post("/items", &serde_json::json!({"id": 1}), &[]).await?;
/// ```
pub struct RestClient<T = HyperTransport> {
    transport: T,
    endpoint: Url,
    registry: RepresentationRegistry,
    format: Mutex<Arc<dyn Representation>>,
    resolver: ErrorDocumentResolver,
}

impl<T> std::fmt::Debug for RestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("format", &self.format().name())
            .finish_non_exhaustive()
    }
}

impl RestClient<HyperTransport> {
    /// Create a client over the default hyper transport.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEndpoint`] if `endpoint` is not a well-formed
    /// absolute URL; [`Error::UnknownFormat`]/[`Error::FormatRequired`] if
    /// the format specifier does not resolve.
    pub fn new(
        endpoint: impl AsRef<str>,
        format: impl Into<FormatSpecifier>,
    ) -> Result<Self> {
        Self::with_transport(HyperTransport::new(), endpoint, format)
    }
}

impl<T> RestClient<T> {
    /// Create a client over a custom transport, with the built-in
    /// representation and decoder registries.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::new`].
    pub fn with_transport(
        transport: T,
        endpoint: impl AsRef<str>,
        format: impl Into<FormatSpecifier>,
    ) -> Result<Self> {
        Self::with_registries(
            transport,
            endpoint,
            format,
            RepresentationRegistry::builtin(),
            DecoderRegistry::builtin(),
        )
    }

    /// Create a client with explicit representation and decoder registries.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::new`], resolving the format against the given
    /// registry.
    pub fn with_registries(
        transport: T,
        endpoint: impl AsRef<str>,
        format: impl Into<FormatSpecifier>,
        registry: RepresentationRegistry,
        decoders: DecoderRegistry,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint.as_ref())?;
        let format = registry.resolve(&format.into())?;
        Ok(Self {
            transport,
            endpoint,
            registry,
            format: Mutex::new(format),
            resolver: ErrorDocumentResolver::new(decoders),
        })
    }

    /// The configured endpoint URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The active representation.
    #[must_use]
    pub fn format(&self) -> Arc<dyn Representation> {
        let format = self
            .format
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&format)
    }

    /// Switch the active representation.
    ///
    /// Resolution failures leave the previous format active. A successful
    /// switch invalidates the cached error-decoder match: a decoder matched
    /// under the previous format must never apply to responses produced
    /// under the new one.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`]/[`Error::FormatRequired`] if the specifier
    /// does not resolve.
    pub fn set_format(&self, specifier: impl Into<FormatSpecifier>) -> Result<()> {
        let resolved = self.registry.resolve(&specifier.into())?;
        let mut format = self
            .format
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *format = resolved;
        self.resolver.invalidate();
        Ok(())
    }

    /// The error-decoder resolver for this client.
    #[must_use]
    pub const fn resolver(&self) -> &ErrorDocumentResolver {
        &self.resolver
    }

    /// Get a reference to the inner transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> RestClient<T> {
    /// Execute a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] for any failed exchange.
    pub async fn get(&self, path: &str, headers: &[(&str, &str)]) -> Result<Response<Bytes>> {
        self.dispatch(Method::Get, path, headers, None).await
    }

    /// Execute a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] for any failed exchange.
    pub async fn delete(&self, path: &str, headers: &[(&str, &str)]) -> Result<Response<Bytes>> {
        self.dispatch(Method::Delete, path, headers, None).await
    }

    /// Execute a POST request with a payload serialized by the active
    /// representation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, or [`Error::Client`] for
    /// any failed exchange.
    pub async fn post<P: Serialize + Sync>(
        &self,
        path: &str,
        payload: &P,
        headers: &[(&str, &str)],
    ) -> Result<Response<Bytes>> {
        let value = serde_json::to_value(payload)?;
        self.dispatch(Method::Post, path, headers, Some(value)).await
    }

    /// Execute a PUT request with a payload serialized by the active
    /// representation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, or [`Error::Client`] for
    /// any failed exchange.
    pub async fn put<P: Serialize + Sync>(
        &self,
        path: &str,
        payload: &P,
        headers: &[(&str, &str)],
    ) -> Result<Response<Bytes>> {
        let value = serde_json::to_value(payload)?;
        self.dispatch(Method::Put, path, headers, Some(value)).await
    }

    /// Execute a PATCH request with a payload serialized by the active
    /// representation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, or [`Error::Client`] for
    /// any failed exchange.
    pub async fn patch<P: Serialize + Sync>(
        &self,
        path: &str,
        payload: &P,
        headers: &[(&str, &str)],
    ) -> Result<Response<Bytes>> {
        let value = serde_json::to_value(payload)?;
        self.dispatch(Method::Patch, path, headers, Some(value)).await
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        payload: Option<Value>,
    ) -> Result<Response<Bytes>> {
        let format = self.format();
        let url = self
            .endpoint
            .join(path)
            .map_err(|e| Error::invalid_request(format!("invalid path {path:?}: {e}")))?;

        let request = build_request(method, url, format.as_ref(), headers, payload)?;
        let url_display = request.url().to_string();

        let span = span!(Level::DEBUG, "http_request", %method, url = %url_display);
        async {
            debug!(
                method = %method,
                url = %url_display,
                headers = ?request.headers(),
                "sending request"
            );
            let started = Instant::now();

            let outcome = self.transport.send(request).await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            match outcome {
                Ok(response) if response.is_success() => {
                    debug!(status = response.status(), elapsed_ms, "request completed");
                    Ok(response)
                }
                Ok(response) => {
                    let status = response.status();
                    let failure = translate(response, &self.resolver);
                    error!(
                        status,
                        elapsed_ms,
                        message = failure.message(),
                        "request failed with HTTP error"
                    );
                    Err(Error::client(failure))
                }
                Err(err) => {
                    let failure = ClientError::from_transport(err);
                    error!(
                        elapsed_ms,
                        message = failure.message(),
                        "request failed"
                    );
                    Err(Error::client(failure))
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Build the wire request for one verb call.
///
/// Body-bearing verbs get the payload encoded by the active representation
/// and a matching `Content-Type`; bodyless verbs get an `Accept` header.
/// Caller headers are applied last and may override both.
fn build_request(
    method: Method,
    url: Url,
    format: &dyn Representation,
    headers: &[(&str, &str)],
    payload: Option<Value>,
) -> Result<Request<Bytes>> {
    let caller_headers = headers
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()));

    let request = match payload {
        Some(value) => {
            let mut body = format.encode(&value)?;
            // Legacy shim: some transports strip query strings on
            // body-bearing verbs, so pairs found in the path are duplicated
            // into the form body. Only the form representation can carry
            // them; other formats keep the pairs on the URL untouched.
            if format.content_type() == FORM_CONTENT_TYPE {
                if let Some(promoted) = promoted_query_fields(&url) {
                    body = if body.is_empty() {
                        promoted
                    } else {
                        format!("{body}&{promoted}")
                    };
                }
            }
            Request::builder(method, url)
                .header("Content-Type", format.content_type())
                .headers(caller_headers)
                .body(Bytes::from(body))
                .build()
        }
        None => Request::builder(method, url)
            .header("Accept", format.content_type())
            .headers(caller_headers)
            .build(),
    };

    Ok(request)
}

/// Query pairs of `url` re-encoded as form fields, if any.
fn promoted_query_fields(url: &Url) -> Option<String> {
    if url.query().is_none_or(str::is_empty) {
        return None;
    }
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url.query_pairs() {
        serializer.append_pair(&key, &value);
    }
    Some(serializer.finish())
}
