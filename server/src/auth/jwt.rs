use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::{AccessClaims, Claims, RefreshClaims};
use crate::config::AuthConfig;

/// Everything that can go wrong when minting or checking a token. All
/// verification variants collapse to one 401 message at the HTTP boundary.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("wrong token type")]
    WrongType,
    #[error("token signing failed")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// Stateless issuer/verifier for access and refresh tokens. Holds the
/// symmetric key material so callers never touch the secret; built once
/// from [`AuthConfig`] and cloned into request handlers.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(cfg: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            algorithm: cfg.algorithm,
            access_ttl: Duration::minutes(cfg.access_ttl_minutes),
            refresh_ttl: Duration::days(cfg.refresh_ttl_days),
        }
    }

    /// Short-lived token for API calls.
    pub fn issue_access(&self, user_id: i64, email: Option<&str>) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims::Access(AccessClaims {
            sub: user_id.to_string(),
            iat: now,
            nbf: now,
            exp: now + self.access_ttl.whole_seconds(),
            email: email.map(str::to_string),
        });
        self.sign(&claims, user_id)
    }

    /// Longer-lived token whose only job is minting new access tokens.
    pub fn issue_refresh(&self, user_id: i64) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims::Refresh(RefreshClaims {
            sub: user_id.to_string(),
            iat: now,
            nbf: now,
            exp: now + self.refresh_ttl.whole_seconds(),
        });
        self.sign(&claims, user_id)
    }

    fn sign(&self, claims: &Claims, user_id: i64) -> Result<String, TokenError> {
        let token = encode(&Header::new(self.algorithm), claims, &self.encoding)
            .map_err(TokenError::Sign)?;
        debug!(user_id, "token signed");
        Ok(token)
    }

    /// Check signature, `exp` and `nbf` with zero leeway and return the
    /// decoded payload. Token type is not constrained here; use
    /// [`verify_access`](Self::verify_access) /
    /// [`verify_refresh`](Self::verify_refresh) on protected paths.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_nbf = true;
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                _ => TokenError::Invalid,
            })?;
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        match self.decode(token)? {
            Claims::Access(claims) => {
                debug!(sub = %claims.sub, "access token verified");
                Ok(claims)
            }
            Claims::Refresh(_) => Err(TokenError::WrongType),
        }
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        match self.decode(token)? {
            Claims::Refresh(claims) => {
                debug!(sub = %claims.sub, "refresh token verified");
                Ok(claims)
            }
            Claims::Access(_) => Err(TokenError::WrongType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "dev-secret";

    fn make_service() -> TokenService {
        TokenService::new(&AuthConfig {
            secret: SECRET.into(),
            algorithm: Algorithm::HS256,
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        })
    }

    fn encode_raw(claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode")
    }

    #[test]
    fn access_token_round_trips() {
        let svc = make_service();
        let token = svc.issue_access(42, Some("a@x.com")).expect("issue");
        let claims = svc.verify_access(&token).expect("verify");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.email.as_deref(), Some("a@x.com"));
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp, claims.iat + 15 * 60);
    }

    #[test]
    fn refresh_token_round_trips_without_email() {
        let svc = make_service();
        let token = svc.issue_refresh(42).expect("issue");
        let claims = svc.verify_refresh(&token).expect("verify");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp, claims.iat + 7 * 24 * 3600);
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let svc = make_service();
        let token = svc.issue_refresh(42).expect("issue");
        assert!(matches!(
            svc.verify_access(&token),
            Err(TokenError::WrongType)
        ));
    }

    #[test]
    fn access_token_rejected_as_refresh() {
        let svc = make_service();
        let token = svc.issue_access(42, None).expect("issue");
        assert!(matches!(
            svc.verify_refresh(&token),
            Err(TokenError::WrongType)
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let svc = make_service();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let token = encode_raw(&Claims::Access(AccessClaims {
            sub: "7".into(),
            iat: now - 120,
            nbf: now - 120,
            exp: now - 60,
            email: None,
        }));
        assert!(matches!(svc.verify_access(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn token_not_yet_valid_rejected() {
        let svc = make_service();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let token = encode_raw(&Claims::Access(AccessClaims {
            sub: "7".into(),
            iat: now,
            nbf: now + 60,
            exp: now + 120,
            email: None,
        }));
        assert!(matches!(
            svc.verify_access(&token),
            Err(TokenError::NotYetValid)
        ));
    }

    #[test]
    fn tampered_signature_rejected() {
        let svc = make_service();
        let token = svc.issue_access(42, Some("a@x.com")).expect("issue");
        let (head, sig) = token.rsplit_once('.').expect("three segments");
        let flipped: String = sig
            .chars()
            .map(|c| if c == 'A' { 'B' } else { 'A' })
            .collect();
        let tampered = format!("{head}.{flipped}");
        assert!(matches!(
            svc.verify_access(&tampered),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn wrong_secret_rejected() {
        let svc = make_service();
        let other = TokenService::new(&AuthConfig {
            secret: "another-secret".into(),
            algorithm: Algorithm::HS256,
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        });
        let token = other.issue_access(42, None).expect("issue");
        assert!(matches!(svc.verify_access(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn garbage_rejected() {
        let svc = make_service();
        assert!(matches!(
            svc.verify_access("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }
}
