//! Bearer token authentication.
//!
//! Every protected route requires `Authorization: Bearer <jwt>`. The token is
//! verified against the key configured at startup (a Cognito user pool's RS256
//! public key, or a shared HS256 secret) and its `sub` claim becomes the
//! student id. Expired tokens, foreign issuers and bad signatures get a 401.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims read from a verified token.
#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    /// Set by Cognito; absent on tokens minted with a shared secret.
    #[serde(default)]
    pub token_use: Option<String>,
}

/// Checks token signatures and standard claims.
#[derive(Clone)]
pub struct TokenVerifier {
    key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenVerifier {
    /// Verify Cognito-issued tokens with the user pool's RS256 public key.
    pub fn cognito(
        public_key_pem: &[u8],
        user_pool_id: &str,
        region: &str,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let issuer = format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}");
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&issuer]);
        // ID tokens carry the app client as `aud`; access tokens do not.
        validation.validate_aud = false;
        Ok(Self::new(DecodingKey::from_rsa_pem(public_key_pem)?, validation))
    }

    /// Verify HS256 tokens signed with `secret`.
    pub fn shared_secret(secret: &[u8]) -> Self {
        Self::new(DecodingKey::from_secret(secret), Validation::new(Algorithm::HS256))
    }

    fn new(key: DecodingKey, validation: Validation) -> Self {
        Self {
            key: Arc::new(key),
            validation: Arc::new(validation),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))?;
        let claims = data.claims;

        match claims.token_use.as_deref() {
            None | Some("access") | Some("id") => {}
            Some(other) => {
                return Err(ApiError::Unauthorized(format!("unexpected token_use: {other}")));
            }
        }
        if claims.sub.trim().is_empty() {
            return Err(ApiError::Unauthorized("token has no subject".to_string()));
        }
        Ok(claims)
    }
}

/// Verify the bearer token and insert the caller as `AuthUser` into request
/// extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = match bearer_token(&req).and_then(|token| state.verifier.verify(token)) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(student_id = %claims.sub, "authenticated");
    req.extensions_mut().insert(AuthUser { sub: claims.sub });
    next.run(req).await
}

fn bearer_token(req: &Request) -> Result<&str, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".to_string()))?;

    if token.is_empty() {
        return Err(ApiError::Unauthorized("empty bearer token".to_string()));
    }
    Ok(token)
}

/// The caller, as established by `require_auth`.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
}
