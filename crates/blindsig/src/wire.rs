//! JSON request/response schema of the signing endpoints.
//!
//! Large integers travel as radix-32 text, curve points as two
//! independently encoded affine coordinates. Protocol errors ride in the
//! body's `error` field at HTTP 200; only transport failures surface as
//! HTTP-level errors.

use serde::{Deserialize, Serialize};

use crate::error::{BlindingError, Result};

/// In-band error for a missing or unknown hashed token.
pub const MISSING_TOKEN: &str = "Missing Token...";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_token: Option<String>,
}

impl SignRequest {
    pub fn new(message: String, hashed_token: String) -> Self {
        Self {
            message: Some(message),
            hashed_token: Some(hashed_token),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_token: Option<String>,
}

impl InitRequest {
    pub fn new(hashed_token: String) -> Self {
        Self {
            hashed_token: Some(hashed_token),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_blinded_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignResponse {
    pub fn ok(signed_blinded_message: String) -> Self {
        Self {
            signed_blinded_message: Some(signed_blinded_message),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            signed_blinded_message: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<String> {
        match (self.signed_blinded_message, self.error) {
            (Some(signed), _) => Ok(signed),
            (None, Some(error)) => Err(BlindingError::Session(error)),
            (None, None) => Err(BlindingError::MalformedValue(
                "response carries neither a signature nor an error".into(),
            )),
        }
    }
}

/// Nonce commitments published by the Andreev init round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndreevInitResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub px: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub py: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AndreevInitResponse {
    pub fn ok(px: String, py: String, qx: String, qy: String) -> Self {
        Self {
            px: Some(px),
            py: Some(py),
            qx: Some(qx),
            qy: Some(qy),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// The two commitment coordinate pairs, (px, py) and (qx, qy).
    pub fn into_result(self) -> Result<((String, String), (String, String))> {
        if let Some(error) = self.error {
            return Err(BlindingError::Session(error));
        }
        match (self.px, self.py, self.qx, self.qy) {
            (Some(px), Some(py), Some(qx), Some(qy)) => Ok(((px, py), (qx, qy))),
            _ => Err(BlindingError::MalformedValue(
                "init response is missing nonce coordinates".into(),
            )),
        }
    }
}

/// Session point published by the Butun init round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ButunInitResponse {
    #[serde(rename = "Rx", default, skip_serializing_if = "Option::is_none")]
    pub rx: Option<String>,
    #[serde(rename = "Ry", default, skip_serializing_if = "Option::is_none")]
    pub ry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ButunInitResponse {
    pub fn ok(rx: String, ry: String) -> Self {
        Self {
            rx: Some(rx),
            ry: Some(ry),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn into_result(self) -> Result<(String, String)> {
        if let Some(error) = self.error {
            return Err(BlindingError::Session(error));
        }
        match (self.rx, self.ry) {
            (Some(rx), Some(ry)) => Ok((rx, ry)),
            _ => Err(BlindingError::MalformedValue(
                "init response is missing the session point".into(),
            )),
        }
    }
}

/// Public key material served by the GET routes, in the same radix-32
/// form the blinding math consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsaKeyResponse {
    pub n: String,
    pub e: String,
    pub algorithm: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcdsaKeyResponse {
    pub x: String,
    pub y: String,
    pub algorithm: u8,
}
