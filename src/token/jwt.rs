//! Claim decoding for assertions on issued tokens.

use jsonwebtoken::{DecodingKey, Validation};

use crate::error::{OAuthError, ResponseError};

/// Decode a JWT's claims without checking its signature or lifetime.
///
/// Only for inspecting tokens a test has just received. Never use this to
/// trust a token.
pub fn decode_unverified(token: &str) -> Result<serde_json::Value, OAuthError> {
    let header = jsonwebtoken::decode_header(token).map_err(malformed)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .map_err(malformed)?;

    Ok(data.claims)
}

fn malformed(e: jsonwebtoken::errors::Error) -> OAuthError {
    ResponseError::MalformedToken {
        message: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    #[test]
    fn test_decode_expired_token_with_unknown_key() {
        let claims = json!({
            "sub": "u-1",
            "aud": "account",
            "exp": 1000,
            "preferred_username": "alice"
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"provider-key"),
        )
        .unwrap();

        let decoded = decode_unverified(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            decode_unverified("not-a-jwt"),
            Err(OAuthError::InvalidResponse(ResponseError::MalformedToken { .. }))
        ));
    }
}
