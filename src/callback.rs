use url::Url;
use url::form_urlencoded;

use crate::error::Error;

/// Lifetime of a Smartsheet authorization code, in seconds.
pub const AUTHORIZATION_CODE_TTL_SECONDS: u64 = 240;

/// Successful authorization redirect, ready for
/// [`OAuthFlow::exchange_code`](crate::OAuthFlow::exchange_code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    code: String,
    state: Option<String>,
    expires_in_seconds: u64,
}

impl AuthorizationResult {
    /// Parse the full URL Smartsheet redirected the browser to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCallback`] if the URL does not parse or carries
    /// no `code`, or the matching authorization error if it carries `error`.
    pub fn from_callback_url(callback_url: &str) -> Result<Self, Error> {
        let url = Url::parse(callback_url)
            .map_err(|e| Error::MalformedCallback(format!("invalid URL: {e}")))?;
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Parse only the query string of the redirect (without the leading `?`).
    ///
    /// # Errors
    ///
    /// Same as [`from_callback_url`](Self::from_callback_url).
    pub fn from_query(query: &str) -> Result<Self, Error> {
        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut error_description = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "code" => &mut code,
                "state" => &mut state,
                "error" => &mut error,
                "error_description" => &mut error_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        if let Some(error) = error {
            tracing::warn!(
                error = %error,
                description = ?error_description,
                "OAuth2 error on authorization callback"
            );
            return Err(authorization_error(error, error_description));
        }

        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::MalformedCallback("missing authorization code".into()))?;

        Ok(Self {
            code,
            state,
            expires_in_seconds: AUTHORIZATION_CODE_TTL_SECONDS,
        })
    }

    /// Authorization code to redeem at the token endpoint.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// State echoed by the authorization endpoint. Compare it with the value
    /// sent in the authorization URL before exchanging the code.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    #[must_use]
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }
}

fn authorization_error(error: String, description: Option<String>) -> Error {
    match error.as_str() {
        "access_denied" => Error::AccessDenied { description },
        "unsupported_response_type" => Error::UnsupportedResponseType { description },
        "invalid_scope" => Error::InvalidScope { description },
        _ => Error::Authorization { error, description },
    }
}
