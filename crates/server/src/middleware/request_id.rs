//! Request ID middleware for tracing and error correlation.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request id that is trusted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// The id assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| Self(String::new())))
    }
}

fn upstream_id(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    let usable = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    usable.then(|| id.to_owned())
}

/// Ensure every request carries an id.
///
/// A well-formed `x-request-id` from an upstream proxy is reused; anything
/// else is replaced by a fresh UUID v4. The id is recorded on the current
/// span, tagged in the Sentry scope, stored as a [`RequestId`] extension and
/// echoed in the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(upstream_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_accepts_uuid_and_cf_ray() {
        let uuid = HeaderValue::from_static("0f8fad5b-d9cb-469f-a165-70867728950e");
        assert_eq!(
            upstream_id(&uuid).as_deref(),
            Some("0f8fad5b-d9cb-469f-a165-70867728950e")
        );
        let ray = HeaderValue::from_static("8a1b2c3d4e5f6a7b-BOM");
        assert!(upstream_id(&ray).is_some());
    }

    #[test]
    fn test_upstream_id_rejects_garbage() {
        assert!(upstream_id(&HeaderValue::from_static("")).is_none());
        assert!(upstream_id(&HeaderValue::from_static("a b")).is_none());
        let long = HeaderValue::from_str(&"a".repeat(200)).ok();
        assert!(long.as_ref().and_then(upstream_id).is_none());
    }
}
