//! Port for password hashing.
//!
//! Services hash passwords at registration and verify them at login without
//! knowing which algorithm backs the digest.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashers.
    pub enum CredentialHasherError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Hash and verify account passwords.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing digest for `password`.
    fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError>;

    /// Check `password` against a digest previously returned by [`Self::hash`].
    fn verify(&self, password: &str, digest: &PasswordDigest)
    -> Result<bool, CredentialHasherError>;
}
