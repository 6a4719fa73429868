//! Account services: registration, login and user lookups.
//!
//! Implements the [`LoginService`], [`AccountCommand`] and [`UsersQuery`]
//! driving ports on top of a [`UserRepository`] and a [`CredentialHasher`].

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, CredentialHasher, CredentialHasherError, LoginService, UserPersistenceError,
    UserRepository, UsersQuery,
};
use crate::domain::{
    AccessPolicy, Actor, Error, LoginCredentials, PasswordDigest, Registration, Roles, User,
    UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
/// Password hashed once per service to give unknown usernames a digest to
/// verify against.
const DUMMY_PASSWORD: &str = "unknown-account-placeholder";

/// Account service implementing the authentication and user driving ports.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
    dummy_digest: Arc<OnceLock<PasswordDigest>>,
    policy: AccessPolicy,
}

impl<U> AccountService<U> {
    /// Create a new service over a user repository and password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            users,
            hasher,
            dummy_digest: Arc::new(OnceLock::new()),
            policy: AccessPolicy,
        }
    }

    /// Hash `password` on the blocking pool; Argon2 is too slow for a worker.
    async fn hash_password(&self, password: &str) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        run_blocking(move || hasher.hash(&password)).await
    }

    /// Verify `password` against `digest` on the blocking pool.
    async fn verify_password(
        &self,
        password: &str,
        digest: PasswordDigest,
    ) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        run_blocking(move || hasher.verify(&password, &digest)).await
    }

    /// Spend the same verification work as a real login, then discard it.
    async fn verify_against_dummy(&self, password: &str) -> Result<(), Error> {
        let digest = match self.dummy_digest.get() {
            Some(digest) => digest.clone(),
            None => {
                let digest = self.hash_password(DUMMY_PASSWORD).await?;
                self.dummy_digest.get_or_init(|| digest).clone()
            }
        };
        self.verify_password(password, digest).await?;
        Ok(())
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialHasherError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| CredentialHasherError::hash(format!("hashing task failed: {err}")))
        .and_then(|outcome| outcome)
        .map_err(map_hasher_error)
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already taken"))
        }
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            self.verify_against_dummy(credentials.password()).await?;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .verify_password(credentials.password(), stored.digest)
            .await?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %stored.user.id(), "user authenticated");
        Ok(stored.user)
    }
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let digest = self.hash_password(registration.password()).await?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
            registration.display_name().clone(),
            Roles::member(),
        );
        self.users
            .insert(&user, &digest)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id(), username = %user.username(), "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<U> UsersQuery for AccountService<U>
where
    U: UserRepository,
{
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }

    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, Error> {
        self.policy.require_elevated(actor)?;
        self.users.list().await.map_err(map_user_error)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.find_user(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
