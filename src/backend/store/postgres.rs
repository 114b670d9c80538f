//! PostgreSQL store
//!
//! Thin adapter from the store traits to the query functions in
//! `auth::users` and `dreams::db`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DreamStore, StoreError, UserStore};
use crate::backend::auth::users::{self, NewUser, User};
use crate::backend::dreams::db;
use crate::backend::dreams::models::{
    Dream, DreamQuery, DreamSearchResult, NewDream, Reaction, ReactionOutcome,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map unique violations on `users` to [`StoreError::Conflict`]
fn map_user_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("username") => "username",
                _ => "email",
            };
            return StoreError::Conflict {
                field: field.to_string(),
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        users::create_user(&self.pool, new_user)
            .await
            .map_err(map_user_insert_error)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(users::get_user_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(users::get_user_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(users::get_user_by_username(&self.pool, username).await?)
    }

    async fn push_dream(&self, user_id: Uuid, dream_id: Uuid) -> Result<(), StoreError> {
        Ok(users::push_dream(&self.pool, user_id, dream_id).await?)
    }
}

#[async_trait]
impl DreamStore for PgStore {
    async fn insert_dream(&self, new_dream: NewDream) -> Result<Dream, StoreError> {
        db::insert_dream(&self.pool, new_dream)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    StoreError::Missing("user")
                }
                other => StoreError::Database(other),
            })
    }

    async fn find_dream(&self, id: Uuid) -> Result<Option<Dream>, StoreError> {
        Ok(db::get_dream_by_id(&self.pool, id).await?)
    }

    async fn set_visibility(
        &self,
        id: Uuid,
        owner_id: Uuid,
        is_public: bool,
    ) -> Result<bool, StoreError> {
        Ok(db::set_visibility(&self.pool, id, owner_id, is_public).await?)
    }

    async fn add_share(
        &self,
        id: Uuid,
        owner_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(db::add_share(&self.pool, id, owner_id, user_id).await?)
    }

    async fn toggle_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<ReactionOutcome>, StoreError> {
        Ok(db::toggle_reaction(&self.pool, id, user_id, reaction).await?)
    }

    async fn search(&self, query: &DreamQuery) -> Result<DreamSearchResult, StoreError> {
        let (dreams, total) = db::search_dreams(&self.pool, query).await?;
        Ok(DreamSearchResult { dreams, total })
    }
}
