//! Core business logic for bearer-token validation.
//!
//! Tokens are HS256-signed JWTs. The service only verifies them and maps the
//! claims to an `AuthUser`; `issue_token` exists so operators and tests can
//! mint tokens with the same secret the identity provider uses.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::errors::AuthError;
use super::models::{AuthUser, Claims};

#[derive(Clone)]
pub struct JwtValidator {
    keys: Arc<Keys>,
    expiry_seconds: u64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtValidator {
    pub fn new(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            expiry_seconds,
        }
    }

    pub fn issue_token(
        &self,
        user_id: i64,
        name: Option<String>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let claims = Claims {
            sub: user_id.to_string(),
            name,
            iat: now,
            exp: now + self.expiry_seconds,
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidToken("bad signature".into()),
                _ => AuthError::InvalidToken(err.to_string()),
            })?;

        let id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".into()))?;

        Ok(AuthUser {
            id,
            name: data.claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-1234";

    #[test]
    fn issued_tokens_verify() {
        let jwt = JwtValidator::new(SECRET, 60);
        let token = jwt.issue_token(42, Some("Ana".into())).unwrap();

        let user = jwt.verify(&token).unwrap();
        assert_eq!(
            user,
            AuthUser {
                id: 42,
                name: Some("Ana".into())
            }
        );
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let ours = JwtValidator::new(SECRET, 60);
        let theirs = JwtValidator::new("a-completely-different-secret-value!", 60);
        let token = theirs.issue_token(1, None).unwrap();

        assert!(matches!(
            ours.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtValidator::new(SECRET, 0);
        let claims = Claims {
            sub: "1".into(),
            name: None,
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(&Header::default(), &claims, &jwt.keys.encoding).unwrap();

        assert!(matches!(jwt.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let jwt = JwtValidator::new(SECRET, 60);
        let claims = Claims {
            sub: "open-id-abc".into(),
            name: None,
            iat: 0,
            exp: 4_102_444_800,
        };
        let token = encode(&Header::default(), &claims, &jwt.keys.encoding).unwrap();

        assert!(matches!(jwt.verify(&token), Err(AuthError::InvalidToken(_))));
    }
}
