//! Local JWT payload inspection.
//!
//! The session token is a JWT issued by the backend. The client never
//! verifies its signature (that is the backend's job on every request); it
//! only decodes the payload to check the expiry claim before spending a
//! network round-trip on a token that is already dead.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("token is not a JWT")]
    Malformed,

    #[error("payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims the backend embeds in every session token.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Standard JWT subject - set to the user's email.
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: i64,
}

impl Claims {
    /// Decode a JWT payload without verifying the signature.
    pub fn decode_unverified(token: &str) -> Result<Self, ClaimsError> {
        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(_sig), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ClaimsError::Malformed);
        };

        // Some issuers pad the segment; base64url-no-pad rejects that
        let payload = payload.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD.decode(payload)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp <= now_secs
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

#[cfg(test)]
pub(crate) fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{}.{}.sig", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_claims() {
        let token = encode_unsigned(&serde_json::json!({
            "sub": "jane@example.com",
            "user_id": 7,
            "role": "admin",
            "exp": 4_102_444_800i64
        }));

        let claims = Claims::decode_unverified(&token).expect("decode claims");
        assert_eq!(claims.sub.as_deref(), Some("jane@example.com"));
        assert_eq!(claims.user_id, Some(7));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_claim() {
        let token = encode_unsigned(&serde_json::json!({ "exp": 1_000 }));
        let claims = Claims::decode_unverified(&token).expect("decode claims");
        assert!(claims.is_expired());
        assert!(claims.is_expired_at(1_000));
        assert!(!claims.is_expired_at(999));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(Claims::decode_unverified("").is_err());
        assert!(Claims::decode_unverified("only-one-part").is_err());
        assert!(Claims::decode_unverified("a.b").is_err());
        assert!(Claims::decode_unverified("a.!!!.c").is_err());
        assert!(Claims::decode_unverified("a.b.c.d").is_err());
    }

    #[test]
    fn test_padded_payload_tolerated() {
        let bare = encode_unsigned(&serde_json::json!({ "exp": 10 }));
        let mut parts = bare.split('.');
        let header = parts.next().unwrap();
        let payload = parts.next().unwrap();
        let padded = format!("{}.{}==.sig", header, payload);
        assert!(Claims::decode_unverified(&padded).is_ok());
    }
}
