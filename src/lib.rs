#![doc = include_str!("../README.md")]

pub mod callback;
pub mod crypto;
pub mod error;
pub mod oauth;
pub mod scope;
pub mod token;
pub mod transport;

// Re-exports for convenient access
pub use callback::{AUTHORIZATION_CODE_TTL_SECONDS, AuthorizationResult};
pub use crypto::generate_state;
pub use error::{Error, TransportError};
pub use oauth::{
    AuthorizationRequest, ConfigBuilder, DEFAULT_AUTH_URL, DEFAULT_TOKEN_URL, OAuthConfig,
    OAuthFlow,
};
pub use scope::Scope;
pub use token::Token;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
