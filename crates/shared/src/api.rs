//! Shared API request/response types used by the relay server and clients.

use garde::Validate;
use serde::{Deserialize, Serialize};

/// Relay a verification code to a recipient identity.
///
/// All three fields are required and must be non-empty. Fields default to
/// the empty string during deserialization, so an absent field and an empty
/// one are rejected the same way.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitCodePayload {
    /// Recipient identity (the hash of the recipient client's user-agent).
    #[serde(default)]
    #[garde(length(min = 1))]
    pub to: String,
    /// Sender name, opaque to the relay.
    #[serde(default)]
    #[garde(length(min = 1))]
    pub from: String,
    /// The verification code being relayed, opaque to the relay.
    #[serde(default)]
    #[garde(length(min = 1))]
    pub code: String,
}

/// Returned for every code submission, success or failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    /// Present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
        }
    }
}
