//! Correlation ids for HTTP requests.
//!
//! The server middleware resolves one [`RequestId`] per request, echoes it in
//! the `x-request-id` response header and runs the handler inside
//! [`with_request_id`], so logs written anywhere below the handler can pick it
//! up through [`current_request_id`].

use std::fmt;
use std::future::Future;
use uuid::Uuid;

/// Header carrying the request correlation ID, inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound request ID that is trusted as-is.
const MAX_REQUEST_ID_LENGTH: usize = 128;

/// Correlation id of one API request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a fresh, time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Adopts the caller's `x-request-id` if it is safe to log and echo.
    ///
    /// Safe means non-empty after trimming, at most 128 bytes, and made of
    /// ASCII alphanumerics, `-`, `_` and `.` only. Anything else gets a
    /// generated id.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id) if is_safe_id(id) => Self(id.to_string()),
            _ => Self::generate(),
        }
    }

    /// The id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LENGTH
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

tokio::task_local! {
    static CURRENT_REQUEST: RequestId;
}

/// Runs `fut` with `id` as the current request id.
pub async fn with_request_id<F: Future>(id: RequestId, fut: F) -> F::Output {
    CURRENT_REQUEST.scope(id, fut).await
}

/// The id of the request being handled by this task, if any.
#[must_use]
pub fn current_request_id() -> Option<String> {
    CURRENT_REQUEST.try_with(ToString::to_string).ok()
}
