//! Argon2id password hashing adapter.

use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::PasswordDigest;

const SALT_LEN: usize = 16;

/// Hashes passwords into PHC strings using Argon2id.
///
/// Digests embed their own salt and parameters, so verification keeps
/// working after the hashing parameters change.
#[derive(Debug, Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Argon2CredentialHasher {
    /// Hasher using the crate's recommended Argon2id parameters.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    /// Minimal-cost hasher for tests, where unoptimised builds make the
    /// default memory cost slow.
    #[cfg(any(test, feature = "test-support"))]
    pub fn low_cost() -> Self {
        match Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None) {
            Ok(params) => Self::with_params(params),
            Err(_) => Self::new(),
        }
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CredentialHasherError::hash(err.to_string()))?;
        let encoded = self
            .engine()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialHasherError::hash(err.to_string()))?;
        Ok(PasswordDigest::new(encoded.to_string()))
    }

    fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, CredentialHasherError> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|err| CredentialHasherError::malformed_digest(err.to_string()))?;
        match self.engine().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::malformed_digest(err.to_string())),
        }
    }
}
