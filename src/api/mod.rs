//! API client module for the STOMATON admin console.
//!
//! Provides the session-scoped HTTP client, durable token storage, the
//! endpoint wrappers, and request/response types matching the backend API.

pub mod auth;
pub mod client;
pub mod content;
pub mod documents;
pub mod gaps;
pub mod types;

use client::ApiError;
use types::StandardResponse;

/// Unwrap a `{success, data, error}` envelope into its payload.
pub(crate) fn envelope_data<T>(envelope: StandardResponse<T>) -> Result<T, ApiError> {
    if !envelope.success {
        return Err(ApiError::Rejected(
            envelope
                .error
                .unwrap_or_else(|| "request was not successful".to_string()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Decode("response envelope has no data".to_string()))
}
