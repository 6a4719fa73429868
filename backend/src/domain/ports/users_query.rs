//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Actor, Error, User, UserId};

/// Domain use-case port for reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Resolve a session's user id. Unknown ids yield `Ok(None)`.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;

    /// List every account. Only elevated actors may call this.
    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, Error>;

    /// Fetch one account by id, or `NotFound`.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;
}
