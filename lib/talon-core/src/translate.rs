//! Translation of failed responses into [`ClientError`]s.

use bytes::Bytes;
use http::StatusCode;

use crate::{ClientError, ErrorDocumentResolver, Response};

/// Build a [`ClientError`] from a failed response.
///
/// The message and raw response are always populated; this step cannot
/// fail. If the response carries a non-empty `Content-Type` for which the
/// resolver finds a decoder, the body is decoded into an error document and
/// attached. A matched decoder that cannot parse the body does not replace
/// the HTTP failure context: the raw response is kept, the document stays
/// absent, and the parse error is recorded on the client error.
#[must_use]
pub fn translate(response: Response<Bytes>, resolver: &ErrorDocumentResolver) -> ClientError {
    let status = response.status();
    let message = match StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
    {
        Some(reason) => format!("HTTP error {status} {reason}"),
        None => format!("HTTP error {status}"),
    };

    let decoded = response
        .content_type()
        .and_then(|content_type| resolver.decoder_for(content_type))
        .map(|decoder| decoder.decode(&response.text()));

    let error = ClientError::from_response(message, response);
    match decoded {
        Some(Ok(document)) => error.with_document(document),
        Some(Err(parse_error)) => error.with_decode_failure(parse_error.to_string()),
        None => error,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> Response<Bytes> {
        let mut headers = HashMap::new();
        if let Some(content_type) = content_type {
            headers.insert("content-type".to_string(), content_type.to_string());
        }
        Response::new(status, headers, Bytes::copy_from_slice(body.as_bytes()))
    }

    #[test]
    fn translate_attaches_document_when_decoder_matches() {
        let resolver = ErrorDocumentResolver::default();
        let error = translate(
            response(
                422,
                Some("application/vnd.error+json"),
                r#"{"code":"INVALID"}"#,
            ),
            &resolver,
        );

        assert_eq!(error.message(), "HTTP error 422 Unprocessable Entity");
        assert_eq!(error.status(), Some(422));
        let document = error.document().expect("document attached");
        assert_eq!(document.code(), Some("INVALID"));
        assert!(error.decode_failure().is_none());
    }

    #[test]
    fn translate_without_matching_decoder_keeps_raw_body() {
        let resolver = ErrorDocumentResolver::default();
        let error = translate(response(500, Some("text/plain"), "boom"), &resolver);

        assert_eq!(error.message(), "HTTP error 500 Internal Server Error");
        assert!(error.document().is_none());
        assert!(error.decode_failure().is_none());
        let raw = error.response().expect("raw response kept");
        assert_eq!(raw.text(), "boom");
    }

    #[test]
    fn translate_without_content_type_skips_resolution() {
        let resolver = ErrorDocumentResolver::default();
        let error = translate(response(404, None, "gone"), &resolver);

        assert_eq!(error.message(), "HTTP error 404 Not Found");
        assert!(error.document().is_none());
        assert_eq!(error.response().expect("raw response").text(), "gone");
    }

    #[test]
    fn translate_records_decode_failure_without_losing_context() {
        let resolver = ErrorDocumentResolver::default();
        let error = translate(
            response(502, Some("application/json"), "<html>bad gateway</html>"),
            &resolver,
        );

        assert_eq!(error.message(), "HTTP error 502 Bad Gateway");
        assert!(error.document().is_none());
        assert!(error.decode_failure().is_some());
        let raw = error.response().expect("raw response kept");
        assert_eq!(raw.status(), 502);
        assert_eq!(raw.text(), "<html>bad gateway</html>");
    }

    #[test]
    fn translate_unknown_status_message() {
        let resolver = ErrorDocumentResolver::default();
        let error = translate(response(599, None, ""), &resolver);
        assert_eq!(error.message(), "HTTP error 599");
    }
}
