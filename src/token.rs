use serde::{Deserialize, Serialize};

use crate::error::{Error, TransportError};
use crate::transport::HttpResponse;

/// Token issued by the Smartsheet token endpoint.
///
/// Immutable once obtained. Refreshing returns a new `Token`; persist the
/// new one, refresh token included, since Smartsheet may rotate it.
/// Serializes with the token endpoint's field names.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    access_token: String,
    token_type: String,
    refresh_token: String,
    #[serde(rename = "expires_in")]
    expires_in_seconds: u64,
}

impl Token {
    /// Rebuild a token from stored values.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in_seconds: u64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            refresh_token: refresh_token.into(),
            expires_in_seconds,
        }
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token type, `"Bearer"` for Smartsheet.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Lifetime of the access token in seconds, counted from issuance.
    #[must_use]
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    #[must_use]
    pub fn is_bearer(&self) -> bool {
        self.token_type.eq_ignore_ascii_case("bearer")
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("refresh_token", &"<redacted>")
            .field("expires_in_seconds", &self.expires_in_seconds)
            .finish()
    }
}

/// Error body of the token endpoint.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Decodes a 2xx token endpoint body.
pub(crate) fn decode_token(response: &HttpResponse) -> Result<Token, Error> {
    serde_json::from_slice(&response.body)
        .map_err(|e| TransportError::MalformedResponse(format!("token response: {e}")).into())
}

/// Maps a non-2xx token endpoint response to an [`Error`].
///
/// Standard OAuth2 error codes on 4xx get their own variant; anything else
/// keeps the raw status and body.
pub(crate) fn error_from_response(response: &HttpResponse) -> Error {
    let status = response.status;
    if (400..500).contains(&status) {
        if let Ok(err) = serde_json::from_slice::<ErrorResponse>(&response.body) {
            let description = err.error_description;
            match err.error.as_str() {
                "invalid_grant" => return Error::InvalidGrant { description },
                "invalid_request" => return Error::InvalidRequest { description },
                "invalid_client" => return Error::InvalidClient { description },
                "unsupported_grant_type" => return Error::UnsupportedGrantType { description },
                _ => {}
            }
        }
    }

    Error::TokenExchange {
        status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }
}
