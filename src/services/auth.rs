use base64::{Engine as _, engine::general_purpose};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{AppError, Result};

/// The number of PBKDF2 iterations for the credential KDF.
const PBKDF2_ITERATIONS: u32 = 100_000;
/// The size of the KDF salt in bytes (stored hex-encoded).
const SALT_SIZE: usize = 16;
/// The size of the derived key in bytes.
const DERIVED_KEY_SIZE: usize = 32;
/// The size of a session token in bytes.
const TOKEN_SIZE: usize = 32;

/// Derives the credential digest for a password and a hex-encoded salt.
///
/// The salt fed to the KDF is the ASCII hex string itself, not the decoded
/// bytes; stored hashes depend on this.
fn derive_key(password: &str, salt_hex: &str) -> [u8; DERIVED_KEY_SIZE] {
    let mut derived = [0u8; DERIVED_KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt_hex.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut derived,
    );
    derived
}

/// Hashes a password with PBKDF2-HMAC-SHA256 and a fresh random salt.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the stored credential in `hash:salt` form, both
/// parts hex-encoded.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt_hex = hex::encode(salt_bytes);

    let mut derived = derive_key(password, &salt_hex);
    let credential = format!("{}:{}", hex::encode(derived), salt_hex);
    derived.zeroize();

    tracing::debug!("Password hashed successfully with PBKDF2");
    Ok(credential)
}

/// Verifies a password against a stored hash and its salt.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `stored_hash` - The hex-encoded stored hash.
/// * `salt` - The hex-encoded salt the hash was derived with.
///
/// # Returns
///
/// `true` if the password matches.
pub fn verify_password(password: &str, stored_hash: &str, salt: &str) -> bool {
    let Ok(stored_bytes) = hex::decode(stored_hash) else {
        return false;
    };

    let mut derived = derive_key(password, salt);
    let matches: bool = derived.as_slice().ct_eq(stored_bytes.as_slice()).into();
    derived.zeroize();

    matches
}

/// Splits a stored credential into its hash and salt halves.
///
/// # Arguments
///
/// * `stored` - The stored `hash:salt` credential.
///
/// # Returns
///
/// A `Result` containing the `(hash, salt)` pair. Credentials rewritten by
/// the profile component carry no separator and fail here.
pub fn split_credential(stored: &str) -> Result<(&str, &str)> {
    stored
        .split_once(':')
        .ok_or_else(|| AppError::Internal("Stored credential is not in hash:salt form".to_string()))
}

/// Generates a new random URL-safe session token.
///
/// # Returns
///
/// A URL-safe base64-encoded token.
pub fn generate_token() -> String {
    let mut token = [0u8; TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    general_purpose::URL_SAFE_NO_PAD.encode(token)
}

/// Hashes a password for the profile component's credential scheme.
///
/// The profile component stores a bare unsalted SHA-256 hex digest. The two
/// schemes are deliberately not interchangeable: an account whose password
/// was rewritten here can no longer pass `verify_password`.
pub fn profile_password_hash(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let stored = hash_password("pw123456").unwrap();
        let (hash, salt) = split_credential(&stored).unwrap();
        assert!(verify_password("pw123456", hash, salt));
        assert!(!verify_password("pw123457", hash, salt));
    }

    #[test]
    fn stored_credential_shape() {
        let stored = hash_password("secret").unwrap();
        let (hash, salt) = split_credential(&stored).unwrap();
        // 32-byte key and 16-byte salt, both hex-encoded.
        assert_eq!(hash.len(), 64);
        assert_eq!(salt.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_salt_derives_same_hash() {
        let stored = hash_password("secret").unwrap();
        let (hash, salt) = split_credential(&stored).unwrap();
        let rederived = hex::encode(derive_key("secret", salt));
        assert_eq!(hash, rederived);
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn split_rejects_profile_scheme_credentials() {
        assert!(split_credential(&profile_password_hash("secret")).is_err());
    }

    #[test]
    fn tokens_are_urlsafe_and_distinct() {
        let token = generate_token();
        // 32 random bytes, unpadded URL-safe base64.
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn profile_hash_matches_known_vector() {
        assert_eq!(
            profile_password_hash("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }
}
