/**
 * Dream Operations
 *
 * Everything the `/dreams` endpoints do once a request has been
 * authenticated and validated: generation, listings, sharing, reactions and
 * the three search flavours.
 *
 * # Visibility
 *
 * - Owners see their own dreams (and the `sharedWith` list in share responses)
 * - Public dreams are visible to everyone and are the only ones that take reactions
 * - Private dreams are visible to the users they are shared with
 */

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::dreams::models::{
    DreamFilter, DreamQuery, FilterSearch, NewDream, OwnSearch, Pagination, PublicSearch,
    Reaction, ShareCommand,
};
use crate::backend::error::{BackendError, Result};
use crate::backend::generation::{parse_image_url, ImageGenerator};
use crate::backend::store::{DreamStore, UserStore};
use crate::shared::dream::{ReactionResponse, ShareResponse};
use crate::shared::{DreamPage, DreamView, SortBy};

pub struct DreamService {
    dreams: Arc<dyn DreamStore>,
    users: Arc<dyn UserStore>,
    generator: Arc<dyn ImageGenerator>,
}

impl DreamService {
    pub fn new(
        dreams: Arc<dyn DreamStore>,
        users: Arc<dyn UserStore>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            dreams,
            users,
            generator,
        }
    }

    /// Generate an image for `prompt` and store it as a private dream
    ///
    /// # Errors
    ///
    /// * `Generation` - the generator failed or returned no usable URL
    /// * `Store` - the dream could not be persisted
    pub async fn create(&self, owner_id: Uuid, prompt: String) -> Result<DreamView> {
        let output = self.generator.generate(&prompt).await.map_err(|e| {
            tracing::error!(%owner_id, error = %e, "Image generation failed");
            e
        })?;
        let image_url = parse_image_url(&output)?;

        let dream = self
            .dreams
            .insert_dream(NewDream {
                owner_id,
                prompt,
                image_url,
            })
            .await?;
        self.users.push_dream(owner_id, dream.id).await?;

        tracing::info!(dream_id = %dream.id, %owner_id, "Dream created");
        Ok(dream.to_view())
    }

    /// The caller's dreams, newest first
    pub async fn list_own(&self, owner_id: Uuid) -> Result<Vec<DreamView>> {
        self.list(DreamFilter {
            owner_id: Some(owner_id),
            ..Default::default()
        })
        .await
    }

    /// Change visibility or add a private share on a dream the caller owns
    pub async fn share(&self, owner_id: Uuid, command: ShareCommand) -> Result<ShareResponse> {
        let dream_not_found = || BackendError::not_found("Dream not found");

        let dream = self
            .dreams
            .find_dream(command.dream_id)
            .await?
            .filter(|d| d.owner_id == owner_id)
            .ok_or_else(dream_not_found)?;

        // Private shares are ignored on a dream that ends up public
        let share_with = command
            .share_with
            .filter(|_| !command.is_public.unwrap_or(dream.is_public));

        if let Some(target) = share_with {
            if self.users.find_user_by_id(target).await?.is_none() {
                return Err(BackendError::not_found("User not found"));
            }
        }

        if let Some(is_public) = command.is_public {
            if !self.dreams.set_visibility(dream.id, owner_id, is_public).await? {
                return Err(dream_not_found());
            }
        }
        if let Some(target) = share_with {
            let added = self.dreams.add_share(dream.id, owner_id, target).await?;
            tracing::debug!(dream_id = %dream.id, %target, added, "Share requested");
        }

        let dream = self
            .dreams
            .find_dream(dream.id)
            .await?
            .ok_or_else(dream_not_found)?;

        tracing::info!(dream_id = %dream.id, is_public = dream.is_public, "Dream shared");
        Ok(ShareResponse {
            message: "Dream shared successfully".to_string(),
            dream: dream.to_owner_view(),
        })
    }

    /// Like or dislike a public dream, or take the reaction back
    pub async fn react(
        &self,
        user_id: Uuid,
        dream_id: Uuid,
        reaction: Reaction,
    ) -> Result<ReactionResponse> {
        let outcome = self
            .dreams
            .toggle_reaction(dream_id, user_id, reaction)
            .await?
            .ok_or_else(|| BackendError::not_found("Public dream not found"))?;

        tracing::info!(%dream_id, %user_id, ?reaction, active = outcome.active, "Reaction toggled");
        Ok(ReactionResponse {
            message: reaction.message(outcome.active).to_string(),
            likes: outcome.likes,
            dislikes: outcome.dislikes,
        })
    }

    /// Every public dream, newest first
    pub async fn list_public(&self) -> Result<Vec<DreamView>> {
        self.list(DreamFilter {
            is_public: Some(true),
            ..Default::default()
        })
        .await
    }

    /// Dreams privately shared with the caller
    pub async fn list_shared_with_me(&self, user_id: Uuid) -> Result<Vec<DreamView>> {
        self.list(DreamFilter {
            shared_with: Some(user_id),
            ..Default::default()
        })
        .await
    }

    pub async fn search_own(&self, owner_id: Uuid, search: OwnSearch) -> Result<DreamPage> {
        let filter = DreamFilter {
            owner_id: Some(owner_id),
            prompt_contains: Some(search.query),
            ..Default::default()
        };
        self.page(filter, SortBy::Recent, search.pagination).await
    }

    pub async fn search_public(&self, search: PublicSearch) -> Result<DreamPage> {
        let filter = DreamFilter {
            is_public: Some(true),
            prompt_contains: search.query,
            ..Default::default()
        };
        self.page(filter, SortBy::Recent, search.pagination).await
    }

    /// Search everything the caller may see
    ///
    /// # Errors
    ///
    /// `NotFound("User not found")` when `username` names nobody.
    pub async fn search(&self, viewer_id: Uuid, search: FilterSearch) -> Result<DreamPage> {
        let owner_id = match search.username.as_deref() {
            Some(username) => {
                let owner = self
                    .users
                    .find_user_by_username(username)
                    .await?
                    .ok_or_else(|| BackendError::not_found("User not found"))?;
                Some(owner.id)
            }
            None => None,
        };

        let filter = DreamFilter {
            owner_id,
            prompt_contains: search.query,
            is_public: search.is_public,
            visible_to: Some(viewer_id),
            ..Default::default()
        };
        self.page(filter, search.sort, search.pagination).await
    }

    async fn list(&self, filter: DreamFilter) -> Result<Vec<DreamView>> {
        let result = self
            .dreams
            .search(&DreamQuery {
                filter,
                sort: SortBy::Recent,
                pagination: None,
            })
            .await?;
        Ok(result.dreams.iter().map(|d| d.to_view()).collect())
    }

    async fn page(
        &self,
        filter: DreamFilter,
        sort: SortBy,
        pagination: Pagination,
    ) -> Result<DreamPage> {
        let result = self
            .dreams
            .search(&DreamQuery {
                filter,
                sort,
                pagination: Some(pagination),
            })
            .await?;

        Ok(DreamPage {
            total: result.total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(result.total),
            dreams: result.dreams.iter().map(|d| d.to_view()).collect(),
        })
    }
}
