//! Database operations for dreams
//!
//! PostgreSQL queries behind `PgStore`. Reaction and share sets are `uuid[]`
//! columns changed only through single `UPDATE` statements, so concurrent
//! toggles on the same row serialize on the row lock.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{Dream, DreamFilter, DreamQuery, NewDream, Reaction, ReactionOutcome};
use crate::shared::SortBy;

const SELECT_DREAM: &str = r#"
    SELECT d.id, d.user_id, u.username AS owner_username, d.prompt, d.image_url,
           d.is_public, d.shared_with, d.likes, d.dislikes, d.created_at, d.updated_at
    FROM dreams d
    JOIN users u ON u.id = d.user_id
"#;

/// Row shape returned by [`SELECT_DREAM`]
#[derive(Debug, sqlx::FromRow)]
struct DreamRow {
    id: Uuid,
    user_id: Uuid,
    owner_username: String,
    prompt: String,
    image_url: String,
    is_public: bool,
    shared_with: Vec<Uuid>,
    likes: Vec<Uuid>,
    dislikes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DreamRow> for Dream {
    fn from(row: DreamRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.user_id,
            owner_username: row.owner_username,
            prompt: row.prompt,
            image_url: row.image_url,
            is_public: row.is_public,
            shared_with: row.shared_with.into_iter().collect::<HashSet<_>>(),
            likes: row.likes.into_iter().collect(),
            dislikes: row.dislikes.into_iter().collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert a new private dream
pub async fn insert_dream(pool: &PgPool, new_dream: NewDream) -> Result<Dream, sqlx::Error> {
    let row = sqlx::query_as::<_, DreamRow>(
        r#"
        WITH inserted AS (
            INSERT INTO dreams (id, user_id, prompt, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT d.id, d.user_id, u.username AS owner_username, d.prompt, d.image_url,
               d.is_public, d.shared_with, d.likes, d.dislikes, d.created_at, d.updated_at
        FROM inserted d
        JOIN users u ON u.id = d.user_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_dream.owner_id)
    .bind(&new_dream.prompt)
    .bind(&new_dream.image_url)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Get a dream by ID
pub async fn get_dream_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Dream>, sqlx::Error> {
    let row = sqlx::query_as::<_, DreamRow>(&format!("{SELECT_DREAM} WHERE d.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Dream::from))
}

/// Set the public flag; going public empties the share list
pub async fn set_visibility(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    is_public: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE dreams
        SET is_public = $3,
            shared_with = CASE WHEN $3 THEN '{}'::uuid[] ELSE shared_with END,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(is_public)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Share a private dream with one more user
pub async fn add_share(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE dreams
        SET shared_with = array_append(shared_with, $3), updated_at = NOW()
        WHERE id = $1 AND user_id = $2 AND NOT is_public AND NOT ($3 = ANY(shared_with))
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Toggle a reaction on a public dream in one statement
pub async fn toggle_reaction(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    reaction: Reaction,
) -> Result<Option<ReactionOutcome>, sqlx::Error> {
    let target = reaction.column();
    let opposite = reaction.opposite().column();

    let sql = format!(
        r#"
        UPDATE dreams
        SET {target} = CASE
                WHEN $2 = ANY({target}) THEN array_remove({target}, $2)
                ELSE array_append({target}, $2)
            END,
            {opposite} = array_remove({opposite}, $2),
            updated_at = NOW()
        WHERE id = $1 AND is_public
        RETURNING ($2 = ANY({target})) AS active,
                  cardinality(likes) AS likes,
                  cardinality(dislikes) AS dislikes
        "#
    );

    let row = sqlx::query_as::<_, (bool, i32, i32)>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(active, likes, dislikes)| ReactionOutcome {
        active,
        likes: likes.max(0) as usize,
        dislikes: dislikes.max(0) as usize,
    }))
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &DreamFilter) {
    builder.push(" WHERE TRUE");
    if let Some(owner_id) = filter.owner_id {
        builder.push(" AND d.user_id = ").push_bind(owner_id);
    }
    if let Some(needle) = &filter.prompt_contains {
        builder
            .push(" AND d.prompt ILIKE ")
            .push_bind(like_pattern(needle));
    }
    if let Some(is_public) = filter.is_public {
        builder.push(" AND d.is_public = ").push_bind(is_public);
    }
    if let Some(user_id) = filter.shared_with {
        builder
            .push(" AND ")
            .push_bind(user_id)
            .push(" = ANY(d.shared_with)");
    }
    if let Some(viewer) = filter.visible_to {
        builder
            .push(" AND (d.is_public OR d.user_id = ")
            .push_bind(viewer)
            .push(" OR ")
            .push_bind(viewer)
            .push(" = ANY(d.shared_with))");
    }
}

/// Ordering ends on the primary key so LIMIT/OFFSET pages never overlap
fn order_by(sort: SortBy) -> &'static str {
    match sort {
        SortBy::Recent => " ORDER BY d.created_at DESC, d.id DESC",
        SortBy::Popular => " ORDER BY cardinality(d.likes) DESC, d.created_at DESC, d.id DESC",
    }
}

/// Run a filtered, sorted, optionally paginated search.
///
/// Returns the page of dreams and the total number of matches.
pub async fn search_dreams(
    pool: &PgPool,
    query: &DreamQuery,
) -> Result<(Vec<Dream>, u64), sqlx::Error> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM dreams d");
    push_filter(&mut count, &query.filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Postgres>::new(SELECT_DREAM);
    push_filter(&mut select, &query.filter);
    select.push(order_by(query.sort));
    if let Some(pagination) = query.pagination {
        select
            .push(" LIMIT ")
            .push_bind(i64::from(pagination.limit))
            .push(" OFFSET ")
            .push_bind(pagination.offset() as i64);
    }

    let rows: Vec<DreamRow> = select.build_query_as().fetch_all(pool).await?;
    Ok((rows.into_iter().map(Dream::from).collect(), total.max(0) as u64))
}
