//! Validation of `/dreams` request bodies and query strings.

use uuid::Uuid;

use crate::backend::dreams::models::{
    FilterSearch, OwnSearch, Pagination, PublicSearch, ShareCommand, DEFAULT_PAGE_LIMIT,
};
use crate::backend::validation::{FieldErrors, Validate};
use crate::shared::dream::{
    FilterSearchQuery, GenerateRequest, OwnSearchQuery, PublicSearchQuery, ReactionRequest,
    ShareRequest,
};
use crate::shared::{FieldError, SortBy};

/// Longest accepted prompt, in characters
pub const MAX_PROMPT_LEN: usize = 1000;

fn dream_id(errors: &mut FieldErrors, value: Option<String>) -> Option<Uuid> {
    let raw = errors.required("dreamId", value, "Dream ID is required")?;
    match Uuid::parse_str(&raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push("dreamId", "Invalid dream ID");
            None
        }
    }
}

fn pagination(errors: &mut FieldErrors, page: Option<&str>, limit: Option<&str>) -> Pagination {
    let page = errors.positive("page", page, 1);
    let limit = errors.positive("limit", limit, DEFAULT_PAGE_LIMIT);
    Pagination::new(page, limit)
}

/// Blank optional strings count as absent
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Validate for GenerateRequest {
    type Output = String;

    fn validate(self) -> Result<String, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let prompt = errors
            .required("prompt", self.prompt, "Prompt is required")
            .filter(|p| {
                let fits = p.chars().count() <= MAX_PROMPT_LEN;
                if !fits {
                    errors.push(
                        "prompt",
                        format!("Prompt must be at most {} characters", MAX_PROMPT_LEN),
                    );
                }
                fits
            });
        errors.into_result(prompt)
    }
}

impl Validate for ShareRequest {
    type Output = ShareCommand;

    fn validate(self) -> Result<ShareCommand, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let dream_id = dream_id(&mut errors, self.dream_id);

        let share_with = match optional_text(self.share_with) {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push("shareWith", "Invalid user ID");
                    None
                }
            },
            None => None,
        };

        let command = dream_id.map(|dream_id| ShareCommand {
            dream_id,
            share_with,
            is_public: self.is_public,
        });
        errors.into_result(command)
    }
}

impl Validate for ReactionRequest {
    type Output = Uuid;

    fn validate(self) -> Result<Uuid, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let dream_id = dream_id(&mut errors, self.dream_id);
        errors.into_result(dream_id)
    }
}

impl Validate for OwnSearchQuery {
    type Output = OwnSearch;

    fn validate(self) -> Result<OwnSearch, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let query = errors.required("query", self.query, "Query parameter is required");
        let pagination = pagination(&mut errors, self.page.as_deref(), self.limit.as_deref());
        errors.into_result(query.map(|query| OwnSearch { query, pagination }))
    }
}

impl Validate for PublicSearchQuery {
    type Output = PublicSearch;

    fn validate(self) -> Result<PublicSearch, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let pagination = pagination(&mut errors, self.page.as_deref(), self.limit.as_deref());
        errors.into_result(Some(PublicSearch {
            query: optional_text(self.query),
            pagination,
        }))
    }
}

impl Validate for FilterSearchQuery {
    type Output = FilterSearch;

    fn validate(self) -> Result<FilterSearch, Vec<FieldError>> {
        let mut errors = FieldErrors::new();

        let is_public = match optional_text(self.is_public).as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => {
                errors.push("isPublic", "isPublic must be a boolean");
                None
            }
        };

        let sort = match optional_text(self.sort_by) {
            Some(raw) => errors.check(raw.parse::<SortBy>()).unwrap_or_default(),
            None => SortBy::default(),
        };

        let pagination = pagination(&mut errors, self.page.as_deref(), self.limit.as_deref());

        errors.into_result(Some(FilterSearch {
            query: optional_text(self.query),
            is_public,
            username: optional_text(self.username),
            sort,
            pagination,
        }))
    }
}
