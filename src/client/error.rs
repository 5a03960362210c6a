// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNPROCESSABLE: u16 = 422;

/// Structured `{status, message, description}` body the storefront sends on 4xx.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} ({status}): {description}")]
pub struct ValidationError {
    pub status: u16,
    pub message: String,
    pub description: String,
}

impl ValidationError {
    pub fn new(status: u16, message: impl Into<String>, description: impl Into<String>) -> Self {
        Self { status, message: message.into(), description: description.into() }
    }

    /// Quantity / stock failures shown inline next to the add-to-cart form.
    pub fn is_unprocessable(&self) -> bool {
        self.status == UNPROCESSABLE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The request failed before a structured response arrived.
    #[error("cart request failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A 2xx response whose body did not match the cart contract.
    #[error("unexpected cart response: {0}")]
    Decode(String),
}

impl CartError {
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CartError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Interprets a non-2xx response body.
///
/// Bodies carrying a `message` become [`CartError::Validation`]; anything else is a transport
/// failure. A non-numeric `status` (the storefront sometimes sends `"bad_request"`) falls back to
/// the HTTP status code.
pub(crate) fn error_from_response(http_status: u16, body: &str) -> CartError {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return CartError::Transport(format!("HTTP {http_status}"));
    };
    let Some(message) = parsed.message else {
        return CartError::Transport(format!("HTTP {http_status}"));
    };
    let status = parsed
        .status
        .as_ref()
        .and_then(|value| match value {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            serde_json::Value::String(s) => s.parse::<u16>().ok(),
            _ => None,
        })
        .unwrap_or(http_status);
    CartError::Validation(ValidationError {
        status,
        message,
        description: parsed.description.unwrap_or_default(),
    })
}
