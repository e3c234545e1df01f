use crate::error::AppError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use types::caller::{Caller, Role};
use types::ids::UserId;

/// Bearer token claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Verification key for bearer tokens
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;
        Ok(data.claims)
    }
}

/// Verified caller identity for a request
pub struct AuthenticatedCaller(pub Caller);

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        claims
            .roles
            .into_iter()
            .fold(Caller::new(UserId::new(claims.sub)), |caller, role| {
                caller.with_role(role)
            })
    }
}

impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    Arc<JwtKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing authentication credentials".into()))?;
        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid header string".into()))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Expected a bearer token".into()))?;

        let keys = Arc::<JwtKeys>::from_ref(state);
        let claims = keys.verify(token)?;
        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized("Token has no subject".into()));
        }
        Ok(AuthenticatedCaller(claims.into()))
    }
}

#[cfg(test)]
pub(crate) fn issue_token(secret: &[u8], sub: &str, roles: Vec<Role>) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        roles,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_roundtrip_with_roles() {
        let keys = JwtKeys::new(b"secret");
        let token = issue_token(b"secret", "u1", vec![Role::MarketManager]);
        let caller: Caller = keys.verify(&token).unwrap().into();
        assert_eq!(caller.user_id, UserId::new("u1"));
        assert!(caller.has_role(Role::MarketManager));
        assert!(!caller.has_role(Role::Admin));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let keys = JwtKeys::new(b"secret");
        let token = issue_token(b"other", "u1", vec![]);
        assert!(matches!(keys.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        use jsonwebtoken::{encode, EncodingKey, Header};
        let claims = Claims {
            sub: "u1".into(),
            exp: (chrono::Utc::now().timestamp() - 3600) as usize,
            roles: vec![],
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();
        assert!(JwtKeys::new(b"secret").verify(&token).is_err());
    }
}
