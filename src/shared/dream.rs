//! Dream API types
//!
//! Request and response bodies for the `/dreams` endpoints. All JSON is
//! camelCase on the wire. Request fields are optional at the serde level so
//! that missing values are reported as field errors instead of a generic
//! deserialization failure.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Owner of a dream, as exposed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerView {
    pub id: Uuid,
    pub username: String,
}

/// A dream as returned by every listing endpoint.
///
/// Reaction sets are reduced to counts. `shared_with` is only filled in for
/// the owner (share responses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamView {
    pub id: Uuid,
    pub user: OwnerView,
    pub prompt: String,
    pub image_url: String,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<Vec<Uuid>>,
    pub likes: usize,
    pub dislikes: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `POST /dreams/generate`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// `POST /dreams/share`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    #[serde(default)]
    pub dream_id: Option<String>,
    #[serde(default)]
    pub share_with: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareResponse {
    pub message: String,
    pub dream: DreamView,
}

/// `POST /dreams/like` and `POST /dreams/dislike`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    #[serde(default)]
    pub dream_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub message: String,
    pub likes: usize,
    pub dislikes: usize,
}

/// `GET /dreams/search`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OwnSearchQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// `GET /dreams/public/search`
///
/// Numeric parameters stay strings here so that a bad value becomes a field
/// error rather than a query rejection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PublicSearchQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// `GET /dreams/filter/search`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSearchQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub is_public: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamPage {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub dreams: Vec<DreamView>,
}

/// Result ordering for searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first
    #[default]
    Recent,
    /// Most liked first, newest first among equals
    Popular,
}

impl FromStr for SortBy {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(Self::Recent),
            "popular" => Ok(Self::Popular),
            other => Err(SharedError::validation(
                "sortBy",
                format!("sortBy must be 'recent' or 'popular', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recent => f.write_str("recent"),
            Self::Popular => f.write_str("popular"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_parse() {
        assert_eq!("recent".parse::<SortBy>().unwrap(), SortBy::Recent);
        assert_eq!("popular".parse::<SortBy>().unwrap(), SortBy::Popular);
        assert!("oldest".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_share_request_camel_case() {
        let request: ShareRequest = serde_json::from_str(
            r#"{"dreamId":"abc","shareWith":"def","isPublic":true}"#,
        )
        .unwrap();
        assert_eq!(request.dream_id.as_deref(), Some("abc"));
        assert_eq!(request.share_with.as_deref(), Some("def"));
        assert_eq!(request.is_public, Some(true));
    }

    #[test]
    fn test_dream_view_hides_absent_shares() {
        let now = Utc::now();
        let view = DreamView {
            id: Uuid::new_v4(),
            user: OwnerView {
                id: Uuid::new_v4(),
                username: "alice".to_string(),
            },
            prompt: "a castle".to_string(),
            image_url: "http://img/x.png".to_string(),
            is_public: false,
            shared_with: None,
            likes: 0,
            dislikes: 0,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("sharedWith").is_none());
        assert_eq!(json["imageUrl"], "http://img/x.png");
        assert_eq!(json["isPublic"], false);
    }
}
