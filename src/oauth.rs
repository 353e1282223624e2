use std::collections::BTreeSet;

use url::Url;
use url::form_urlencoded;

use crate::callback::AuthorizationResult;
use crate::crypto;
use crate::error::Error;
use crate::scope::Scope;
use crate::token::{self, Token};
use crate::transport::{HttpRequest, HttpTransport, Method, ReqwestTransport};

/// Smartsheet authorization endpoint visited by the user's browser.
pub const DEFAULT_AUTH_URL: &str = "https://app.smartsheet.com/b/authorize";

/// Smartsheet token endpoint called server-to-server.
pub const DEFAULT_TOKEN_URL: &str = "https://api.smartsheet.com/2.0/token";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Smartsheet `OAuth2` client configuration.
///
/// Immutable once built. Use [`OAuthConfig::builder`] or
/// [`OAuthConfig::from_env`].
///
/// ```rust,ignore
/// use smartsheet_oauth::OAuthConfig;
///
/// let config = OAuthConfig::builder()
///     .client_id("my-client-id")
///     .client_secret("my-client-secret")
///     .redirect_uri("https://my-app.com/callback")
///     // Optional override:
///     .token_url("https://api.smartsheetgov.com/2.0/token")
///     .build()?;
/// ```
#[derive(Clone)]
#[non_exhaustive]
pub struct OAuthConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_uri: Url,
    pub(crate) auth_url: Url,
    pub(crate) token_url: Url,
}

impl OAuthConfig {
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// # Required env vars
    /// - `SMARTSHEET_CLIENT_ID`: OAuth2 client ID
    /// - `SMARTSHEET_CLIENT_SECRET`: OAuth2 client secret
    /// - `SMARTSHEET_REDIRECT_URI`: OAuth2 callback URI (must be a valid URL)
    ///
    /// # Optional env vars
    /// - `SMARTSHEET_AUTH_URL`: Override the authorization endpoint
    /// - `SMARTSHEET_TOKEN_URL`: Override the token endpoint
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if required env vars are missing or URLs are invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| Error::Config(format!("{name} is required")))
        };

        let mut builder = Self::builder()
            .client_id(require("SMARTSHEET_CLIENT_ID")?)
            .client_secret(require("SMARTSHEET_CLIENT_SECRET")?)
            .redirect_uri(require("SMARTSHEET_REDIRECT_URI")?);

        if let Some(url) = lookup("SMARTSHEET_AUTH_URL") {
            builder = builder.auth_url(url);
        }
        if let Some(url) = lookup("SMARTSHEET_TOKEN_URL") {
            builder = builder.token_url(url);
        }

        builder.build()
    }

    /// `OAuth2` client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// `OAuth2` redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// Authorization endpoint URL.
    #[must_use]
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    /// Token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

// The client secret never reaches logs.
impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .finish()
    }
}

/// Builder for [`OAuthConfig`]. Required: client ID, client secret, redirect URI.
#[derive(Clone, Default)]
#[must_use]
pub struct ConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    auth_url: Option<String>,
    token_url: Option<String>,
}

impl ConfigBuilder {
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Override the authorization endpoint (default: [`DEFAULT_AUTH_URL`]).
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = Some(url.into());
        self
    }

    /// Override the token endpoint (default: [`DEFAULT_TOKEN_URL`]).
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required field is missing or empty, or
    /// if any URL does not parse.
    pub fn build(self) -> Result<OAuthConfig, Error> {
        let client_id = required(self.client_id, "client_id")?;
        let client_secret = required(self.client_secret, "client_secret")?;
        let redirect_uri = required(self.redirect_uri, "redirect_uri")?;
        let redirect_uri = parse_url(&redirect_uri, "redirect_uri")?;
        let auth_url = parse_url(
            self.auth_url.as_deref().unwrap_or(DEFAULT_AUTH_URL),
            "auth_url",
        )?;
        let token_url = parse_url(
            self.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL),
            "token_url",
        )?;

        Ok(OAuthConfig {
            client_id,
            client_secret,
            redirect_uri,
            auth_url,
            token_url,
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, Error> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{name} is required")))
}

fn parse_url(value: &str, name: &str) -> Result<Url, Error> {
    value
        .parse()
        .map_err(|e| Error::Config(format!("{name}: {e}")))
}

/// Authorization URL to send the browser to, with the state to keep for the callback.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct AuthorizationRequest {
    pub url: Url,
    pub state: String,
}

/// Token grant redeemed at the token endpoint.
#[derive(Clone, Copy)]
enum Grant<'a> {
    AuthorizationCode(&'a str),
    RefreshToken(&'a str),
}

impl<'a> Grant<'a> {
    fn grant_type(self) -> &'static str {
        match self {
            Self::AuthorizationCode(_) => "authorization_code",
            Self::RefreshToken(_) => "refresh_token",
        }
    }

    /// Form field carrying the credential, and its value.
    fn credential(self) -> (&'static str, &'a str) {
        match self {
            Self::AuthorizationCode(code) => ("code", code),
            Self::RefreshToken(refresh_token) => ("refresh_token", refresh_token),
        }
    }
}

/// Smartsheet `OAuth2` authorization-code flow.
///
/// Stateless: every call is a function of its arguments and the immutable
/// configuration, so one instance can serve any number of concurrent
/// authorization attempts. Tokens are returned to the caller and never cached.
#[derive(Debug)]
pub struct OAuthFlow<T = ReqwestTransport> {
    config: OAuthConfig,
    transport: T,
}

impl OAuthFlow<ReqwestTransport> {
    /// Create a flow using the default `reqwest` transport.
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> OAuthFlow<T> {
    /// Create a flow with a custom HTTP transport.
    #[must_use]
    pub fn with_transport(config: OAuthConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Build the URL that starts authorization in the user's browser.
    ///
    /// Scopes are de-duplicated and comma-joined. `state` is passed through
    /// untouched; see [`generate_state`](crate::generate_state).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `scopes` is empty.
    pub fn authorization_url(
        &self,
        scopes: impl IntoIterator<Item = Scope>,
        state: &str,
    ) -> Result<AuthorizationRequest, Error> {
        let scopes: BTreeSet<Scope> = scopes.into_iter().collect();
        if scopes.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one scope is required".into(),
            ));
        }
        let scope = scopes
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("scope", &scope)
            .append_pair("state", state)
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code");

        Ok(AuthorizationRequest {
            url,
            state: state.to_string(),
        })
    }

    /// Parse the URL the authorization endpoint redirected the browser to.
    ///
    /// # Errors
    ///
    /// See [`AuthorizationResult::from_callback_url`].
    pub fn parse_callback(&self, callback_url: &str) -> Result<AuthorizationResult, Error> {
        AuthorizationResult::from_callback_url(callback_url)
    }

    /// Exchange an authorization code for a token.
    ///
    /// A code is single-use; on [`Error::InvalidGrant`] restart from
    /// [`authorization_url`](Self::authorization_url).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure or an undecodable body,
    /// [`Error::InvalidGrant`] (or another OAuth2 error variant) when the token
    /// endpoint rejects the request, and [`Error::TokenExchange`] for any other
    /// non-success response.
    pub async fn exchange_code(&self, result: &AuthorizationResult) -> Result<Token, Error> {
        self.request_token(Grant::AuthorizationCode(result.code())).await
    }

    /// Obtain a new token using the refresh token of `token`.
    ///
    /// `token` is left untouched. Persist the returned token; its refresh
    /// token may differ from the old one.
    ///
    /// # Errors
    ///
    /// Same as [`exchange_code`](Self::exchange_code). [`Error::InvalidGrant`]
    /// here means the refresh token is dead and the user must re-authorize.
    pub async fn refresh_token(&self, token: &Token) -> Result<Token, Error> {
        self.request_token(Grant::RefreshToken(token.refresh_token())).await
    }

    /// Revoke the access token of `token` (logout).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure, or the mapped token
    /// endpoint error on a non-success response.
    pub async fn revoke_token(&self, token: &Token) -> Result<(), Error> {
        let request = HttpRequest::new(Method::Delete, self.config.token_url.clone())
            .with_header("Authorization", format!("Bearer {}", token.access_token()));

        tracing::debug!(token_url = %self.config.token_url, "Revoking access token");
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let err = token::error_from_response(&response);
            tracing::warn!(status = response.status, error = %err, "Token revocation failed");
            return Err(err);
        }
        Ok(())
    }

    async fn request_token(&self, grant: Grant<'_>) -> Result<Token, Error> {
        let (credential_field, credential) = grant.credential();
        let hash = crypto::token_hash(&self.config.client_secret, credential);

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", grant.grant_type())
            .append_pair(credential_field, credential)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("client_secret", &self.config.client_secret)
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("hash", &hash)
            .finish();

        let request = HttpRequest::new(Method::Post, self.config.token_url.clone())
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_header("Accept", "application/json")
            .with_body(body);

        tracing::debug!(
            grant_type = grant.grant_type(),
            token_url = %self.config.token_url,
            "Requesting token"
        );
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let err = token::error_from_response(&response);
            tracing::warn!(
                grant_type = grant.grant_type(),
                status = response.status,
                error = %err,
                "Token request failed"
            );
            return Err(err);
        }

        let token = token::decode_token(&response)?;
        tracing::debug!(
            grant_type = grant.grant_type(),
            expires_in = token.expires_in_seconds(),
            "Token obtained"
        );
        Ok(token)
    }
}
