use hex::encode as hex_encode;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::config::get_pbkdf2_iterations;

const HASH_PREFIX: &str = "pbkdf2:sha256:";

/// Hash a password for storage as `pbkdf2:sha256:<iterations>$<salt>$<hex>`.
pub fn generate_password_hash(password: &str) -> String {
    let mut salt_bytes = [0u8; 12];
    rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
    let salt = hex_encode(salt_bytes);
    let iterations = get_pbkdf2_iterations();
    let digest = derive(password, &salt, iterations);
    format!("{}{}${}${}", HASH_PREFIX, iterations, salt, digest)
}

/// Check a candidate password against a stored hash. Unparseable hashes
/// never verify.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    match parse_hash(stored) {
        Some((iterations, salt, expected)) => derive(candidate, salt, iterations) == expected,
        None => false,
    }
}

fn derive(password: &str, salt: &str, iterations: u32) -> String {
    let mut dk = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut dk);
    hex_encode(dk)
}

fn parse_hash(stored: &str) -> Option<(u32, &str, &str)> {
    let rest = stored.strip_prefix(HASH_PREFIX)?;
    let (iterations, rest) = rest.split_once('$')?;
    let (salt, digest) = rest.split_once('$')?;
    Some((iterations.parse().ok()?, salt, digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_its_own_password() {
        let hash = generate_password_hash("hunter2");
        assert!(hash.starts_with(HASH_PREFIX));
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(
            generate_password_hash("same"),
            generate_password_hash("same")
        );
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("", "x"));
        assert!(!verify_password("plaintext", "plaintext"));
        assert!(!verify_password("pbkdf2:sha256:notanumber$ab$cd", "x"));
    }
}
