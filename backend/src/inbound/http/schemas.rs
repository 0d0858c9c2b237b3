//! Shared response schemas for the HTTP surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error envelope documented for every failure response.
pub use crate::domain::Error as ErrorSchema;

/// Plain acknowledgement envelope used by mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a confirmation message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
