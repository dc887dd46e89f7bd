//! Per-request correlation IDs.

use uuid::Uuid;

/// Header carrying a caller-supplied request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request ID that is honored.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Per-request context with correlation ID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    /// Creates a new request context with a generated ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Uses the caller's ID when it is short printable ASCII, otherwise
    /// generates one.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id)
                if !id.is_empty()
                    && id.len() <= MAX_REQUEST_ID_LEN
                    && id.chars().all(|c| c.is_ascii_graphic()) =>
            {
                Self {
                    request_id: id.to_string(),
                }
            },
            _ => Self::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Creates the span every event of this request is recorded under.
    #[must_use]
    pub fn span(&self, route: &'static str) -> tracing::Span {
        tracing::info_span!("request", request_id = %self.request_id, route = route)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_uuids() {
        let context = RequestContext::new();
        assert!(Uuid::parse_str(context.request_id()).is_ok());
        assert_ne!(context, RequestContext::new());
    }

    #[test]
    fn test_from_header_honors_caller_id() {
        let context = RequestContext::from_header(Some("req-42"));
        assert_eq!(context.request_id(), "req-42");
    }

    #[test]
    fn test_from_header_rejects_unusable_ids() {
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        for value in [None, Some(""), Some("has space"), Some(long.as_str())] {
            let context = RequestContext::from_header(value);
            assert!(Uuid::parse_str(context.request_id()).is_ok(), "{value:?}");
        }
    }
}
