use std::collections::HashMap;

use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sns_core::SnsError;

use crate::env::IdentityEnv;

pub const ID_TOKEN_USE: &str = "id";

/// Claims of an ID token that the API relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    #[serde(rename = "cognito:username")]
    pub username: String,
    pub token_use: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
}

/// Verifies ID tokens of the identity provider: signature, issuer, audience,
/// expiry and `token_use == "id"`.
pub struct IdentityVerifier {
    keys: HashMap<String, DecodingKey>,
    shared_secret: Option<DecodingKey>,
    validation: Validation,
}

impl IdentityVerifier {
    /// RS256 verification against the keys of a JWKS document.
    pub fn from_jwks(jwks: &JwkSet, issuer: &str, client_id: &str) -> Result<Self> {
        let mut keys = HashMap::new();
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                tracing::warn!("skipping JWK without kid");
                continue;
            };
            keys.insert(kid, DecodingKey::from_jwk(jwk)?);
        }

        if keys.is_empty() {
            return Err(anyhow!("JWKS has no usable keys"));
        }

        Ok(Self {
            keys,
            shared_secret: None,
            validation: Self::validation(Algorithm::RS256, issuer, client_id),
        })
    }

    /// HS256 verification with a shared secret, for local runs and tests.
    pub fn with_secret(secret: &[u8], issuer: &str, client_id: &str) -> Self {
        Self {
            keys: HashMap::new(),
            shared_secret: Some(DecodingKey::from_secret(secret)),
            validation: Self::validation(Algorithm::HS256, issuer, client_id),
        }
    }

    /// Uses `COGNITO_JWKS` when set, otherwise downloads the issuer's JWKS once.
    pub async fn from_env(env: &IdentityEnv, http_client: &reqwest::Client) -> Result<Self> {
        let jwks: JwkSet = match &env.jwks {
            Some(inline) => serde_json::from_str(inline)
                .map_err(|e| anyhow!("COGNITO_JWKS is not a valid JWKS document: {}", e))?,
            None => {
                let url = env.jwks_url();
                let response = http_client.get(&url).send().await?;
                if !response.status().is_success() {
                    let status = response.status();
                    let text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Could not read error body".to_string());
                    return Err(anyhow!(
                        "Failed to fetch JWKS from {}. Status: {}. Body: {}",
                        url,
                        status,
                        text
                    ));
                }
                response.json().await?
            }
        };

        tracing::info!(issuer = %env.issuer(), keys = jwks.keys.len(), "loaded identity provider keys");
        Self::from_jwks(&jwks, &env.issuer(), &env.client_id)
    }

    fn validation(algorithm: Algorithm, issuer: &str, client_id: &str) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[client_id]);
        validation
    }

    /// Returns the claims of a valid ID token.
    pub fn verify(&self, token: &str) -> Result<IdTokenClaims, SnsError> {
        let unauthenticated = |reason: String| SnsError::Unauthenticated(reason);

        let header = decode_header(token).map_err(|e| unauthenticated(e.to_string()))?;
        let key = match (&header.kid, &self.shared_secret) {
            (_, Some(secret)) => secret,
            (Some(kid), None) => self.keys.get(kid)
                .ok_or_else(|| unauthenticated(format!("unknown signing key {}", kid)))?,
            (None, None) => return Err(unauthenticated("token header has no kid".to_string())),
        };

        let claims = decode::<IdTokenClaims>(token, key, &self.validation)
            .map_err(|e| unauthenticated(e.to_string()))?
            .claims;

        if claims.token_use != ID_TOKEN_USE {
            return Err(unauthenticated(format!("expected an id token, got {}", claims.token_use)));
        }

        Ok(claims)
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub const ISSUER: &str = "https://cognito-idp.local.amazonaws.com/local_pool";
    pub const CLIENT_ID: &str = "local-client";
    pub const SECRET: &[u8] = b"sns-test-secret";

    pub fn verifier() -> IdentityVerifier {
        IdentityVerifier::with_secret(SECRET, ISSUER, CLIENT_ID)
    }

    pub fn token_with(username: &str, token_use: &str, aud: &str, exp: i64) -> String {
        let claims = IdTokenClaims {
            username: username.to_string(),
            token_use: token_use.to_string(),
            iss: ISSUER.to_string(),
            aud: aud.to_string(),
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    pub fn far_future() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    pub fn token(username: &str) -> String {
        token_with(username, ID_TOKEN_USE, CLIENT_ID, far_future())
    }
}
