use std::env;

use crate::middleware::auth::TokenVerifier;

/// Runtime settings read from the Lambda environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaConfig {
    pub bucket: String,
    pub region: String,
    pub cognito_user_pool_id: Option<String>,
    /// PEM-encoded RS256 public key of the user pool.
    pub cognito_public_key_pem: Option<String>,
    /// HS256 secret, for deployments that mint their own tokens.
    pub jwt_secret: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank values fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let var = |name: &str, default: &str| opt(name).unwrap_or_else(|| default.to_string());
        Self {
            bucket: var("JORNADA_BUCKET", "jornada"),
            region: var("AWS_REGION", "us-east-1"),
            cognito_user_pool_id: opt("COGNITO_USER_POOL_ID"),
            cognito_public_key_pem: opt("COGNITO_PUBLIC_KEY_PEM"),
            jwt_secret: opt("JORNADA_JWT_SECRET"),
        }
    }

    /// The token verifier for protected routes. A Cognito user pool wins over
    /// a shared secret; with neither configured the API refuses to start.
    pub fn token_verifier(&self) -> eyre::Result<TokenVerifier> {
        match (&self.cognito_user_pool_id, &self.cognito_public_key_pem, &self.jwt_secret) {
            (Some(pool), Some(pem), _) => {
                Ok(TokenVerifier::cognito(pem.as_bytes(), pool, &self.region)?)
            }
            (None, None, Some(secret)) => Ok(TokenVerifier::shared_secret(secret.as_bytes())),
            (Some(_), None, _) | (None, Some(_), _) => Err(eyre::eyre!(
                "COGNITO_USER_POOL_ID and COGNITO_PUBLIC_KEY_PEM must be set together"
            )),
            (None, None, None) => Err(eyre::eyre!(
                "no token verification configured: set COGNITO_USER_POOL_ID and \
                 COGNITO_PUBLIC_KEY_PEM, or JORNADA_JWT_SECRET"
            )),
        }
    }
}
