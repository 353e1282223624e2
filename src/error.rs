/// Errors returned by the Smartsheet OAuth2 flow.
///
/// Nothing is retried internally. Branch on the variant to decide whether to
/// retry, refresh, or send the user back through authorization
/// (see [`Error::requires_reauthorization`]).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Missing or invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller passed an argument the flow cannot use (e.g. an empty scope set).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Redirect callback could not be parsed or carries no authorization code.
    #[error("Malformed authorization callback: {0}")]
    MalformedCallback(String),

    /// The user declined the authorization request.
    #[error("Access denied{}", describe(.description))]
    AccessDenied { description: Option<String> },

    /// The authorization endpoint rejected `response_type`.
    #[error("Unsupported response type{}", describe(.description))]
    UnsupportedResponseType { description: Option<String> },

    /// One or more requested scopes were rejected.
    #[error("Invalid scope{}", describe(.description))]
    InvalidScope { description: Option<String> },

    /// Any other error code returned on the redirect callback.
    #[error("Authorization error `{error}`{}", describe(.description))]
    Authorization {
        error: String,
        description: Option<String>,
    },

    /// Authorization code or refresh token is expired, used, or unknown.
    #[error("Invalid grant{}", describe(.description))]
    InvalidGrant { description: Option<String> },

    /// Token request was missing a parameter or otherwise malformed.
    #[error("Invalid token request{}", describe(.description))]
    InvalidRequest { description: Option<String> },

    /// Client authentication failed at the token endpoint.
    #[error("Invalid client{}", describe(.description))]
    InvalidClient { description: Option<String> },

    /// Token endpoint does not support the grant type.
    #[error("Unsupported grant type{}", describe(.description))]
    UnsupportedGrantType { description: Option<String> },

    /// Unexpected non-success response from the token endpoint.
    #[error("Token endpoint returned HTTP {status}: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Whether the caller has to restart the flow from the authorization URL.
    ///
    /// True for callback errors and for [`Error::InvalidGrant`]: the code or
    /// refresh token in hand can never succeed again.
    #[must_use]
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            Self::AccessDenied { .. }
                | Self::UnsupportedResponseType { .. }
                | Self::InvalidScope { .. }
                | Self::Authorization { .. }
                | Self::InvalidGrant { .. }
        )
    }
}

/// Failure below the OAuth layer: no usable HTTP response was obtained.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response arrived but its body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Failure reported by a custom [`HttpTransport`](crate::HttpTransport).
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

fn describe(description: &Option<String>) -> String {
    description
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}
