//! Bearer-token (JWT) authentication extractor and standalone verifier.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use newsproof_core::{classify::Classifier, fetch::ArticleFetcher, store::HistoryStore};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Accepted token issuer settings for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  key:        DecodingKey,
  validation: Validation,
}

impl AuthConfig {
  /// HS256 tokens signed with `secret`, carrying `audience` and an `exp`.
  pub fn hs256(secret: &str, audience: &str) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);
    validation.set_required_spec_claims(&["exp", "aud", "sub"]);
    Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
  }
}

#[derive(Debug, Deserialize)]
struct Claims {
  sub: String,
}

/// The authenticated caller; the inner value is the token's `sub` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

/// Verify the bearer token in `headers` and return the caller's user id.
pub fn verify_bearer(headers: &HeaderMap, config: &AuthConfig) -> Result<String, ApiError> {
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.trim_start().split_once(char::is_whitespace))
    .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
    .map(|(_, token)| token.trim())
    .filter(|t| !t.is_empty())
    .ok_or_else(ApiError::missing_token)?;

  let data = decode::<Claims>(token, &config.key, &config.validation).map_err(|e| {
    ApiError::invalid_token(match e.kind() {
      ErrorKind::ExpiredSignature => "token has expired".to_owned(),
      ErrorKind::InvalidAudience => "token audience is not accepted".to_owned(),
      _ => e.to_string(),
    })
  })?;

  if data.claims.sub.trim().is_empty() {
    return Err(ApiError::invalid_token("token has no subject"));
  }
  Ok(data.claims.sub)
}

impl<S, F, C> FromRequestParts<AppState<S, F, C>> for AuthUser
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, F, C>,
  ) -> Result<Self, Self::Rejection> {
    verify_bearer(&parts.headers, &state.auth).map(AuthUser)
  }
}
