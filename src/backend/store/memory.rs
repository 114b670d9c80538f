//! In-memory store
//!
//! Used when no `DATABASE_URL` is configured and by the test suite. Each
//! mutation holds the write lock for its whole read-modify-write.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DreamStore, StoreError, UserStore};
use crate::backend::auth::users::{NewUser, User};
use crate::backend::dreams::models::{
    Dream, DreamQuery, DreamSearchResult, NewDream, Reaction, ReactionOutcome,
};
use crate::shared::SortBy;

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    /// Insertion order, oldest first
    dreams: RwLock<Vec<Dream>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == new_user.username) {
            return Err(StoreError::Conflict {
                field: "username".to_string(),
            });
        }
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict {
                field: "email".to_string(),
            });
        }

        let user = User::from_new(new_user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn push_dream(&self, user_id: Uuid, dream_id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::Missing("user"))?;
        user.dreams.push(dream_id);
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl DreamStore for MemoryStore {
    async fn insert_dream(&self, new_dream: NewDream) -> Result<Dream, StoreError> {
        let owner_username = self
            .users
            .read()
            .await
            .get(&new_dream.owner_id)
            .map(|u| u.username.clone())
            .ok_or(StoreError::Missing("user"))?;

        let now = Utc::now();
        let dream = Dream {
            id: Uuid::new_v4(),
            owner_id: new_dream.owner_id,
            owner_username,
            prompt: new_dream.prompt,
            image_url: new_dream.image_url,
            is_public: false,
            shared_with: HashSet::new(),
            likes: HashSet::new(),
            dislikes: HashSet::new(),
            created_at: now,
            updated_at: now,
        };
        self.dreams.write().await.push(dream.clone());
        Ok(dream)
    }

    async fn find_dream(&self, id: Uuid) -> Result<Option<Dream>, StoreError> {
        Ok(self.dreams.read().await.iter().find(|d| d.id == id).cloned())
    }

    async fn set_visibility(
        &self,
        id: Uuid,
        owner_id: Uuid,
        is_public: bool,
    ) -> Result<bool, StoreError> {
        let mut dreams = self.dreams.write().await;
        let Some(dream) = dreams
            .iter_mut()
            .find(|d| d.id == id && d.owner_id == owner_id)
        else {
            return Ok(false);
        };

        dream.is_public = is_public;
        if is_public {
            dream.shared_with.clear();
        }
        dream.updated_at = Utc::now();
        Ok(true)
    }

    async fn add_share(
        &self,
        id: Uuid,
        owner_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        let mut dreams = self.dreams.write().await;
        let Some(dream) = dreams
            .iter_mut()
            .find(|d| d.id == id && d.owner_id == owner_id && !d.is_public)
        else {
            return Ok(false);
        };

        let added = dream.shared_with.insert(user_id);
        if added {
            dream.updated_at = Utc::now();
        }
        Ok(added)
    }

    async fn toggle_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<ReactionOutcome>, StoreError> {
        let mut dreams = self.dreams.write().await;
        let Some(dream) = dreams.iter_mut().find(|d| d.id == id && d.is_public) else {
            return Ok(None);
        };

        let active = dream.toggle(user_id, reaction);
        dream.updated_at = Utc::now();
        Ok(Some(ReactionOutcome {
            active,
            likes: dream.likes.len(),
            dislikes: dream.dislikes.len(),
        }))
    }

    async fn search(&self, query: &DreamQuery) -> Result<DreamSearchResult, StoreError> {
        let dreams = self.dreams.read().await;

        // Newest insertion first, so equal timestamps still sort newest first.
        let mut matches: Vec<Dream> = dreams
            .iter()
            .rev()
            .filter(|d| query.filter.matches(d))
            .cloned()
            .collect();

        match query.sort {
            SortBy::Recent => matches.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortBy::Popular => matches.sort_by(|a, b| {
                b.likes
                    .len()
                    .cmp(&a.likes.len())
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }

        let total = matches.len() as u64;
        let dreams = match query.pagination {
            Some(pagination) => matches
                .into_iter()
                .skip(pagination.offset() as usize)
                .take(pagination.limit as usize)
                .collect(),
            None => matches,
        };

        Ok(DreamSearchResult { dreams, total })
    }
}
