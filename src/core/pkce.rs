//! PKCE Generator
//!
//! RFC 7636 Proof Key for Code Exchange.

use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::types::{PkceMethod, PkceParams};

/// PKCE generator interface (for dependency injection).
pub trait PkceGenerator: Send + Sync {
    /// Generate PKCE parameters.
    fn generate(&self, method: PkceMethod) -> PkceParams;
}

/// Default PKCE generator implementation.
pub struct DefaultPkceGenerator {
    verifier_length: usize,
}

impl DefaultPkceGenerator {
    /// Create new PKCE generator with default verifier length (64).
    pub fn new() -> Self {
        Self::with_length(64)
    }

    /// Create PKCE generator with custom verifier length.
    ///
    /// # Panics
    /// Panics if length is not between 43 and 128 (RFC 7636 requirement).
    pub fn with_length(length: usize) -> Self {
        assert!(
            (43..=128).contains(&length),
            "PKCE verifier length must be between 43 and 128"
        );
        Self {
            verifier_length: length,
        }
    }

    fn generate_verifier(&self) -> String {
        let mut rng = rand::thread_rng();
        let bytes_needed = (self.verifier_length * 3 + 3) / 4;
        let random_bytes: Vec<u8> = (0..bytes_needed).map(|_| rng.gen()).collect();

        let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes);
        encoded.truncate(self.verifier_length);
        encoded
    }
}

impl Default for DefaultPkceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PkceGenerator for DefaultPkceGenerator {
    fn generate(&self, method: PkceMethod) -> PkceParams {
        let code_verifier = self.generate_verifier();
        let code_challenge = compute_challenge(&code_verifier, method);

        PkceParams {
            code_verifier,
            code_challenge,
            code_challenge_method: method,
        }
    }
}

/// Derive the code challenge from a verifier.
pub fn compute_challenge(verifier: &str, method: PkceMethod) -> String {
    match method {
        PkceMethod::Plain => verifier.to_string(),
        PkceMethod::S256 => {
            // BASE64URL(SHA256(ASCII(code_verifier)))
            let hash = Sha256::digest(verifier.as_bytes());
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash)
        }
    }
}

/// Validate PKCE verifier format.
pub fn is_valid_verifier(verifier: &str) -> bool {
    let len = verifier.len();
    if !(43..=128).contains(&len) {
        return false;
    }

    // Unreserved characters only: [A-Z] / [a-z] / [0-9] / "-" / "." / "_" / "~"
    verifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_' || c == '~')
}
