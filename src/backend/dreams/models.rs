/**
 * Dream Domain Types
 *
 * The stored dream record, the commands that mutate it, and the query
 * description consumed by `DreamStore::search`.
 */

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::shared::{DreamView, OwnerView, SortBy};

/// Upper bound for `limit` on paginated searches
pub const MAX_PAGE_LIMIT: u32 = 100;
/// `limit` used when the client sends none
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// A generated image with its visibility and reactions
#[derive(Debug, Clone, PartialEq)]
pub struct Dream {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub prompt: String,
    pub image_url: String,
    pub is_public: bool,
    pub shared_with: HashSet<Uuid>,
    pub likes: HashSet<Uuid>,
    pub dislikes: HashSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dream {
    /// Client view with member lists reduced to counts
    pub fn to_view(&self) -> DreamView {
        DreamView {
            id: self.id,
            user: OwnerView {
                id: self.owner_id,
                username: self.owner_username.clone(),
            },
            prompt: self.prompt.clone(),
            image_url: self.image_url.clone(),
            is_public: self.is_public,
            shared_with: None,
            likes: self.likes.len(),
            dislikes: self.dislikes.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// View for the owner, which also lists who the dream is shared with
    pub fn to_owner_view(&self) -> DreamView {
        let mut shared_with: Vec<Uuid> = self.shared_with.iter().copied().collect();
        shared_with.sort();
        DreamView {
            shared_with: Some(shared_with),
            ..self.to_view()
        }
    }

    /// Apply a reaction toggle in place.
    ///
    /// Returns `true` when the reaction is now set, `false` when it was removed.
    pub fn toggle(&mut self, user_id: Uuid, reaction: Reaction) -> bool {
        let (target, opposite) = match reaction {
            Reaction::Like => (&mut self.likes, &mut self.dislikes),
            Reaction::Dislike => (&mut self.dislikes, &mut self.likes),
        };
        if target.remove(&user_id) {
            false
        } else {
            target.insert(user_id);
            opposite.remove(&user_id);
            true
        }
    }
}

/// Fields needed to insert a dream
#[derive(Debug, Clone)]
pub struct NewDream {
    pub owner_id: Uuid,
    pub prompt: String,
    pub image_url: String,
}

/// Like or dislike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    /// Name of the array column holding this reaction
    pub fn column(self) -> &'static str {
        match self {
            Self::Like => "likes",
            Self::Dislike => "dislikes",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }

    /// Response message after a toggle
    pub fn message(self, active: bool) -> &'static str {
        match (self, active) {
            (Self::Like, true) => "Liked successfully",
            (Self::Like, false) => "Like removed",
            (Self::Dislike, true) => "Disliked successfully",
            (Self::Dislike, false) => "Dislike removed",
        }
    }
}

/// Result of a reaction toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionOutcome {
    /// Whether the caller's reaction is set after the toggle
    pub active: bool,
    pub likes: usize,
    pub dislikes: usize,
}

/// Visibility change requested by the owner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareCommand {
    pub dream_id: Uuid,
    pub share_with: Option<Uuid>,
    pub is_public: Option<bool>,
}

/// Page number and size, both starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Build a pagination, capping `limit` at [`MAX_PAGE_LIMIT`]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

/// Conditions a dream must meet to be returned. All set fields must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DreamFilter {
    pub owner_id: Option<Uuid>,
    /// Case-insensitive substring of the prompt
    pub prompt_contains: Option<String>,
    pub is_public: Option<bool>,
    /// Only dreams privately shared with this user
    pub shared_with: Option<Uuid>,
    /// Only dreams this user may see: public, owned, or shared with them
    pub visible_to: Option<Uuid>,
}

impl DreamFilter {
    /// Check a dream against the filter
    pub fn matches(&self, dream: &Dream) -> bool {
        if self.owner_id.is_some_and(|owner| dream.owner_id != owner) {
            return false;
        }
        if let Some(needle) = &self.prompt_contains {
            if !dream.prompt.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if self.is_public.is_some_and(|public| dream.is_public != public) {
            return false;
        }
        if self
            .shared_with
            .is_some_and(|user| !dream.shared_with.contains(&user))
        {
            return false;
        }
        if let Some(viewer) = self.visible_to {
            let visible = dream.is_public
                || dream.owner_id == viewer
                || dream.shared_with.contains(&viewer);
            if !visible {
                return false;
            }
        }
        true
    }
}

/// A full search request for the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DreamQuery {
    pub filter: DreamFilter,
    pub sort: SortBy,
    /// `None` returns every match
    pub pagination: Option<Pagination>,
}

/// Matches for one page plus the total across all pages
#[derive(Debug, Clone, Default)]
pub struct DreamSearchResult {
    pub dreams: Vec<Dream>,
    pub total: u64,
}

/// Validated `GET /dreams/search` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnSearch {
    pub query: String,
    pub pagination: Pagination,
}

/// Validated `GET /dreams/public/search` input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicSearch {
    pub query: Option<String>,
    pub pagination: Pagination,
}

/// Validated `GET /dreams/filter/search` input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSearch {
    pub query: Option<String>,
    pub is_public: Option<bool>,
    pub username: Option<String>,
    pub sort: SortBy,
    pub pagination: Pagination,
}
