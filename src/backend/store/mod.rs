//! Persistence Layer
//!
//! Storage traits for users and dreams, with two implementations:
//!
//! - **`postgres`** - `PgStore`, sqlx over PostgreSQL (production)
//! - **`memory`** - `MemoryStore`, process-local maps (no `DATABASE_URL`, tests)
//!
//! Every mutation is a single atomic operation against the backing store, so
//! concurrent reaction toggles or share updates on the same dream cannot lose
//! writes.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::dreams::models::{
    Dream, DreamQuery, DreamSearchResult, NewDream, Reaction, ReactionOutcome,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key already exists
    #[error("duplicate value for {field}")]
    Conflict {
        /// `username` or `email`
        field: String,
    },

    /// A referenced record does not exist
    #[error("{0} not found")]
    Missing(&'static str),

    /// Database driver error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// User persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::Conflict`] on a taken username or email.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Lookup by normalized email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Append a dream to the owner's list
    async fn push_dream(&self, user_id: Uuid, dream_id: Uuid) -> Result<(), StoreError>;
}

/// Dream persistence
#[async_trait]
pub trait DreamStore: Send + Sync {
    /// Insert a private dream with empty reaction and share sets
    async fn insert_dream(&self, new_dream: NewDream) -> Result<Dream, StoreError>;

    async fn find_dream(&self, id: Uuid) -> Result<Option<Dream>, StoreError>;

    /// Set the public flag on a dream owned by `owner_id`. Making it public
    /// clears `shared_with`.
    ///
    /// Returns `false` if no dream with that id and owner exists.
    async fn set_visibility(
        &self,
        id: Uuid,
        owner_id: Uuid,
        is_public: bool,
    ) -> Result<bool, StoreError>;

    /// Add `user_id` to the share set of a private dream owned by `owner_id`.
    ///
    /// Returns `false` when nothing changed (public, already shared, or no match).
    async fn add_share(&self, id: Uuid, owner_id: Uuid, user_id: Uuid)
        -> Result<bool, StoreError>;

    /// Toggle a reaction on a public dream, removing the opposite reaction.
    ///
    /// Returns `None` if the dream does not exist or is not public.
    async fn toggle_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<ReactionOutcome>, StoreError>;

    /// Filter, sort and optionally paginate dreams
    async fn search(&self, query: &DreamQuery) -> Result<DreamSearchResult, StoreError>;
}
