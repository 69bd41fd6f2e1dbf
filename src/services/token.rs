use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use chrono::Duration;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::claims::Claims;
use crate::models::principal::Role;

type HmacSha256 = Hmac<Sha256>;

/// Issues and validates signed, expiring session tokens.
///
/// A token is `base64url(claims JSON) . base64url(signature)` where the
/// signature is HMAC-SHA256 over the encoded claims segment, binding
/// subject, role, and expiry. Stateless: validation needs only the
/// signing secret and a clock, so there is nothing to store or revoke
/// server-side.
#[derive(Clone)]
pub struct TokenService {
    signing_secret: Arc<Zeroizing<Vec<u8>>>,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a token service with an injected clock.
    pub fn new(
        signing_secret: Zeroizing<Vec<u8>>,
        lifetime_minutes: i64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            signing_secret: Arc::new(signing_secret),
            lifetime: Duration::minutes(lifetime_minutes),
            clock,
        }
    }

    /// Issues a token asserting `{subject, role, expiry}`.
    ///
    /// No I/O; the expiry is `now + lifetime` on the service's clock.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String> {
        let now = self.clock.now();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        let payload = sonic_rs::to_string(&claims)
            .map_err(|e| AppError::Internal(format!("claims serialization failed: {}", e)))?;
        let encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());
        let signature = self.sign(encoded.as_bytes());

        Ok(format!(
            "{}.{}",
            encoded,
            general_purpose::URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Validates a presented token and returns its claims.
    ///
    /// Malformed encoding, signature mismatch, and expiry all produce the
    /// same `InvalidToken` error: the caller is told nothing about why, so
    /// a forgery attempt cannot use the answer as an oracle. See DESIGN.md
    /// on why this stays asymmetric with the execution error path.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(AppError::InvalidToken)?;

        let signature = general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AppError::InvalidToken)?;

        let mut mac = HmacSha256::new_from_slice(&self.signing_secret)
            .map_err(|_| AppError::InvalidToken)?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AppError::InvalidToken)?;

        let payload = general_purpose::URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AppError::InvalidToken)?;
        let claims: Claims =
            sonic_rs::from_slice(&payload).map_err(|_| AppError::InvalidToken)?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.signing_secret)
            .expect("HMAC accepts any key length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_support::FixedClock;
    use chrono::{TimeZone, Utc};

    fn secret() -> Zeroizing<Vec<u8>> {
        Zeroizing::new(vec![0x42u8; 32])
    }

    fn service_at(timestamp: i64) -> TokenService {
        let clock = FixedClock(Utc.timestamp_opt(timestamp, 0).unwrap());
        TokenService::new(secret(), 120, Arc::new(clock))
    }

    const T0: i64 = 1_700_000_000;

    #[test]
    fn round_trip_preserves_subject_and_role() {
        let service = service_at(T0);
        let token = service.issue("analyst", Role::Analyst).unwrap();
        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "analyst");
        assert_eq!(claims.role, Role::Analyst);
        assert_eq!(claims.iat, T0);
        assert_eq!(claims.exp, T0 + 120 * 60);
    }

    #[test]
    fn expiry_is_boundary_exact() {
        let token = service_at(T0).issue("admin", Role::Admin).unwrap();
        let expiry = T0 + 120 * 60;

        // One second before expiry: still valid.
        assert!(service_at(expiry - 1).validate(&token).is_ok());
        // At expiry: invalid.
        assert!(matches!(
            service_at(expiry).validate(&token),
            Err(AppError::InvalidToken)
        ));
        // Long after: still invalid.
        assert!(service_at(expiry + 86_400).validate(&token).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let service = service_at(T0);
        let token = service.issue("analyst", Role::Analyst).unwrap();

        // Corrupt one character in the claims segment.
        let dot = token.find('.').unwrap();
        let target = dot / 2;
        let original = token.as_bytes()[target];
        let replacement = if original == b'A' { b'B' } else { b'A' };
        let mut bytes = token.clone().into_bytes();
        bytes[target] = replacement;
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            service.validate(&tampered),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let service = service_at(T0);
        let token = service.issue("analyst", Role::Analyst).unwrap();

        let dot = token.find('.').unwrap();
        let target = dot + 1 + (token.len() - dot - 1) / 2;
        let original = token.as_bytes()[target];
        let replacement = if original == b'A' { b'B' } else { b'A' };
        let mut bytes = token.clone().into_bytes();
        bytes[target] = replacement;
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let service = service_at(T0);
        for bad in [
            "",
            "no-dot-here",
            "a.b",
            "!!!.???",
            "e30.e30",
            "only.trailing.",
        ] {
            assert!(
                matches!(service.validate(bad), Err(AppError::InvalidToken)),
                "accepted malformed token {:?}",
                bad
            );
        }
    }

    #[test]
    fn token_from_different_secret_is_rejected() {
        let clock = FixedClock(Utc.timestamp_opt(T0, 0).unwrap());
        let other = TokenService::new(
            Zeroizing::new(vec![0x99u8; 32]),
            120,
            Arc::new(clock),
        );
        let token = other.issue("analyst", Role::Analyst).unwrap();
        assert!(service_at(T0).validate(&token).is_err());
    }
}
