use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HTTP header carrying the caller's session id
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Identifies whose selection list a request reads and writes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Starts a fresh session
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a header value, ignoring anything that is not a UUID
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves the session id for the request and echoes it back on the response.
///
/// A missing or malformed `x-session-id` header starts a new session.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    // Reuse the caller's session when the header parses, otherwise start a new one
    let session_id = request
        .headers()
        .get(SESSION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(SessionId::parse)
        .unwrap_or_else(SessionId::new);

    // Store in request extensions for handlers and the trace span
    request.extensions_mut().insert(session_id);

    let mut response = next.run(request).await;

    // Echo the session id so the client can send it on the next request
    if let Ok(header_value) = HeaderValue::from_str(&session_id.to_string()) {
        response
            .headers_mut()
            .insert(SESSION_ID_HEADER, header_value);
    }

    response
}

/// Span for one HTTP request, tagged with its session id when known
pub fn make_span_with_session_id(request: &Request<Body>) -> tracing::Span {
    let session_id = request
        .extensions()
        .get::<SessionId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        session_id = %session_id,
    )
}
