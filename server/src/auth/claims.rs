use serde::{Deserialize, Serialize};

/// Payload of an access token. `sub` is the user id in string form,
/// timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload of a refresh token. Same base as [`AccessClaims`] but never
/// carries an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Decoded JWT payload, tagged by the `type` claim. An access token can
/// never deserialize as a refresh token or the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Claims {
    Access(AccessClaims),
    Refresh(RefreshClaims),
}

impl AccessClaims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

impl RefreshClaims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_claims_serialize_with_type_tag() {
        let claims = Claims::Access(AccessClaims {
            sub: "42".into(),
            iat: 1_700_000_000,
            nbf: 1_700_000_000,
            exp: 1_700_000_900,
            email: Some("a@x.com".into()),
        });
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "access");
        assert_eq!(json["sub"], "42");
        assert_eq!(json["email"], "a@x.com");
    }

    #[test]
    fn refresh_claims_have_no_email_key() {
        let claims = Claims::Refresh(RefreshClaims {
            sub: "42".into(),
            iat: 1_700_000_000,
            nbf: 1_700_000_000,
            exp: 1_700_604_800,
        });
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");
        assert!(json.get("email").is_none());
    }

    #[test]
    fn email_omitted_when_absent() {
        let claims = Claims::Access(AccessClaims {
            sub: "7".into(),
            iat: 0,
            nbf: 0,
            exp: 900,
            email: None,
        });
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("email").is_none());
    }

    #[test]
    fn user_id_parses_subject() {
        let claims = AccessClaims {
            sub: "1234".into(),
            iat: 0,
            nbf: 0,
            exp: 900,
            email: None,
        };
        assert_eq!(claims.user_id(), Some(1234));

        let bad = RefreshClaims {
            sub: "not-a-number".into(),
            iat: 0,
            nbf: 0,
            exp: 900,
        };
        assert_eq!(bad.user_id(), None);
    }
}
