// JWT minting and validation
//
// HS256 is the only accepted algorithm on both the encode and decode path.
// Access tokens authenticate RPCs; refresh tokens are accepted only by the
// refresh operation. Both carry the session id and profile name so a
// refreshed access token binds to the same server-side session.

use crate::error::{AuthError, AuthResult};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Access tokens live for 15 minutes.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Refresh tokens live for 7 days.
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Distinguishes the two token kinds carried in the `token_type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by every Kassie token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub session_id: String,
    pub profile: String,
    #[serde(rename = "token_type")]
    pub token_kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// An access/refresh pair minted at login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) at which the access token expires.
    pub access_expires_at: i64,
}

/// Stateless token mint/verify service sharing one process-wide secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Fails with `InvalidSecret` when the secret is empty; the server must
    /// not start without one.
    pub fn new(secret: &str) -> AuthResult<Self> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Mint an access/refresh pair for a freshly created session.
    pub fn generate_token_pair(&self, session_id: &str, profile: &str) -> AuthResult<TokenPair> {
        if session_id.is_empty() {
            return Err(AuthError::MissingSessionId);
        }
        if profile.is_empty() {
            return Err(AuthError::MissingProfile);
        }

        let now = chrono::Utc::now().timestamp();
        let access_expires_at = now + ACCESS_TOKEN_TTL.as_secs() as i64;

        let access_token = self.sign(&TokenClaims {
            session_id: session_id.to_string(),
            profile: profile.to_string(),
            token_kind: TokenKind::Access,
            iat: now,
            exp: access_expires_at,
        })?;

        let refresh_token = self.sign(&TokenClaims {
            session_id: session_id.to_string(),
            profile: profile.to_string(),
            token_kind: TokenKind::Refresh,
            iat: now,
            exp: now + REFRESH_TOKEN_TTL.as_secs() as i64,
        })?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
        })
    }

    /// Verify signature and expiry, then check the claim kind and session id.
    ///
    /// Only the HMAC family is accepted: a token whose header names any other
    /// algorithm fails with `InvalidToken` before its claims are looked at.
    pub fn validate_token(&self, token: &str, expected: TokenKind) -> AuthResult<TokenClaims> {
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let claims = data.claims;

        if claims.token_kind != expected {
            return Err(AuthError::InvalidClaims(format!(
                "expected {} token, got {}",
                expected, claims.token_kind
            )));
        }

        if claims.session_id.is_empty() {
            return Err(AuthError::MissingSessionId);
        }

        Ok(claims)
    }

    /// Exchange a valid refresh token for a new access token bound to the
    /// same session and profile. Does not consult any server-side state.
    pub fn refresh_access_token(&self, refresh_token: &str) -> AuthResult<(String, i64)> {
        let claims = self.validate_token(refresh_token, TokenKind::Refresh)?;

        let now = chrono::Utc::now().timestamp();
        let expires_at = now + ACCESS_TOKEN_TTL.as_secs() as i64;

        let access_token = self.sign(&TokenClaims {
            session_id: claims.session_id,
            profile: claims.profile,
            token_kind: TokenKind::Access,
            iat: now,
            exp: expires_at,
        })?;

        Ok((access_token, expires_at))
    }

    fn sign(&self, claims: &TokenClaims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    fn service() -> TokenService {
        TokenService::new(SECRET).unwrap()
    }

    fn sign_with(secret: &str, algorithm: Algorithm, claims: &TokenClaims) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(kind: TokenKind, exp_offset: i64) -> TokenClaims {
        let now = chrono::Utc::now().timestamp();
        TokenClaims {
            session_id: "sess-1".to_string(),
            profile: "local".to_string(),
            token_kind: kind,
            iat: now,
            exp: now + exp_offset,
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(TokenService::new(""), Err(AuthError::InvalidSecret)));
    }

    #[test]
    fn test_generate_and_validate_pair() {
        let svc = service();
        let pair = svc.generate_token_pair("sess-1", "local").unwrap();

        let access = svc.validate_token(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.session_id, "sess-1");
        assert_eq!(access.profile, "local");

        let refresh = svc.validate_token(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.session_id, "sess-1");

        let now = chrono::Utc::now().timestamp();
        let expected = now + ACCESS_TOKEN_TTL.as_secs() as i64;
        assert!((pair.access_expires_at - expected).abs() <= 2);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let svc = service();
        let pair = svc.generate_token_pair("sess-1", "local").unwrap();

        let err = svc.validate_token(&pair.access_token, TokenKind::Refresh).unwrap_err();
        assert!(matches!(err, AuthError::InvalidClaims(_)));

        let err = svc.validate_token(&pair.refresh_token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidClaims(_)));
    }

    #[test]
    fn test_expired_token() {
        let svc = service();
        let token = sign_with(SECRET, Algorithm::HS256, &claims(TokenKind::Access, -60));
        let err = svc.validate_token(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_wrong_secret() {
        let svc = service();
        let token = sign_with("other-secret", Algorithm::HS256, &claims(TokenKind::Access, 3600));
        let err = svc.validate_token(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_algorithm_pinning() {
        // Well-signed with the right secret, but not HS256: must be rejected
        // as an invalid token regardless of claim content.
        let svc = service();
        let token = sign_with(SECRET, Algorithm::HS384, &claims(TokenKind::Access, 3600));
        let err = svc.validate_token(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_empty_session_id_claim() {
        let svc = service();
        let mut c = claims(TokenKind::Access, 3600);
        c.session_id = String::new();
        let token = sign_with(SECRET, Algorithm::HS256, &c);
        let err = svc.validate_token(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::MissingSessionId));
    }

    #[test]
    fn test_garbage_token_strings() {
        let svc = service();
        for junk in ["", "not-a-jwt", "a.b", "eyJhbGciOiJIUzI1NiJ9.e30"] {
            let err = svc.validate_token(junk, TokenKind::Access).unwrap_err();
            assert!(matches!(err, AuthError::InvalidToken), "token {junk:?} must be rejected");
        }
    }

    #[test]
    fn test_refresh_access_token() {
        let svc = service();
        let pair = svc.generate_token_pair("sess-9", "prod").unwrap();

        let (access, expires_at) = svc.refresh_access_token(&pair.refresh_token).unwrap();
        let claims = svc.validate_token(&access, TokenKind::Access).unwrap();
        assert_eq!(claims.session_id, "sess-9");
        assert_eq!(claims.profile, "prod");
        assert!(expires_at > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_refresh_rejects_access_token() {
        let svc = service();
        let pair = svc.generate_token_pair("sess-9", "prod").unwrap();
        let err = svc.refresh_access_token(&pair.access_token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidClaims(_)));
    }

    #[test]
    fn test_missing_inputs_on_generation() {
        let svc = service();
        assert!(matches!(
            svc.generate_token_pair("", "local"),
            Err(AuthError::MissingSessionId)
        ));
        assert!(matches!(
            svc.generate_token_pair("sess-1", ""),
            Err(AuthError::MissingProfile)
        ));
    }
}
