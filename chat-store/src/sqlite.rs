//! SQLite implementation of [`ChatStore`].
//!
//! Migrations under `./migrations` are embedded at compile time and run by
//! [`SqliteChatStore::connect`]. Queries use the runtime-checked `sqlx::query`
//! form, so no `DATABASE_URL` is needed to build.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::record::{Interaction, NewInteraction, Rating, RatingOutcome, StoredMessage};
use crate::{ChatStore, StoreFuture};

type InteractionRow = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
);

const SELECT_COLUMNS: &str =
    "SELECT id, session_id, role, content, created_at, rating, rated_at, messages FROM interactions";

/// SQLite-backed interaction store.
#[derive(Clone, Debug)]
pub struct SqliteChatStore {
    pool: SqlitePool,
}

impl SqliteChatStore {
    /// Open (or create) the database and run pending migrations.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;
        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!(
            max_connections = cfg.max_connections,
            "chat store ready"
        );
        Ok(Self { pool })
    }

    async fn insert(&self, new: NewInteraction) -> Result<Interaction, StoreError> {
        let interaction = new.into_interaction(Uuid::new_v4(), Utc::now());
        let messages = serde_json::to_string(&interaction.messages).map_err(|e| {
            StoreError::Corrupt {
                id: interaction.id.to_string(),
                reason: format!("encode messages: {e}"),
            }
        })?;

        sqlx::query(
            "INSERT INTO interactions (id, session_id, role, content, created_at, messages) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(interaction.id.to_string())
        .bind(&interaction.session_id)
        .bind(interaction.role.as_str())
        .bind(&interaction.content)
        .bind(interaction.timestamp.to_rfc3339())
        .bind(&messages)
        .execute(&self.pool)
        .await?;

        debug!(
            id = %interaction.id,
            session_id = %interaction.session_id,
            "interaction stored"
        );
        Ok(interaction)
    }

    /// Newest first.
    async fn newest(
        &self,
        session_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Interaction>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<InteractionRow> = match session_id {
            Some(sid) => {
                let sql = format!("{SELECT_COLUMNS} WHERE session_id = ?1 ORDER BY seq DESC LIMIT ?2");
                sqlx::query_as(&sql)
                    .bind(sid)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{SELECT_COLUMNS} ORDER BY seq DESC LIMIT ?1");
                sqlx::query_as(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.into_iter().map(decode_row).collect()
    }

    async fn set_rating(&self, id: Uuid, rating: Rating) -> Result<RatingOutcome, StoreError> {
        let id = id.to_string();
        let updated = sqlx::query(
            "UPDATE interactions SET rating = ?1, rated_at = ?2 WHERE id = ?3 AND rating IS NULL",
        )
        .bind(rating.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(&id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated > 0 {
            return Ok(RatingOutcome::Rated);
        }

        let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM interactions WHERE id = ?1")
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match exists {
            Some(_) => RatingOutcome::AlreadyRated,
            None => RatingOutcome::NotFound,
        })
    }
}

impl ChatStore for SqliteChatStore {
    fn append<'a>(&'a self, new: NewInteraction) -> StoreFuture<'a, Interaction> {
        Box::pin(self.insert(new))
    }

    fn session_interactions<'a>(
        &'a self,
        session_id: &'a str,
        limit: usize,
    ) -> StoreFuture<'a, Vec<Interaction>> {
        Box::pin(async move {
            if limit == 0 {
                return Ok(Vec::new());
            }
            let mut items = self.newest(Some(session_id), limit).await?;
            items.reverse();
            Ok(items)
        })
    }

    fn recent_messages<'a>(
        &'a self,
        session_id: Option<&'a str>,
        limit: usize,
    ) -> StoreFuture<'a, Vec<StoredMessage>> {
        Box::pin(async move {
            if limit == 0 {
                return Ok(Vec::new());
            }
            let mut items = self.newest(session_id, limit).await?;
            items.reverse();

            let mut messages: Vec<StoredMessage> =
                items.into_iter().flat_map(|it| it.messages).collect();
            let skip = messages.len().saturating_sub(limit);
            Ok(messages.split_off(skip))
        })
    }

    fn rate<'a>(&'a self, id: Uuid, rating: Rating) -> StoreFuture<'a, RatingOutcome> {
        Box::pin(self.set_rating(id, rating))
    }

    fn ping<'a>(&'a self) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
    }
}

fn decode_row(row: InteractionRow) -> Result<Interaction, StoreError> {
    let (id, session_id, role, content, created_at, rating, rated_at, messages) = row;
    let corrupt = |reason: String| StoreError::Corrupt {
        id: id.clone(),
        reason,
    };

    let uuid = Uuid::parse_str(&id).map_err(|e| corrupt(format!("id: {e}")))?;
    let role = role.parse().map_err(corrupt)?;
    let timestamp = parse_ts(&created_at).map_err(corrupt)?;
    let rating = rating.map(|r| r.parse::<Rating>()).transpose().map_err(corrupt)?;
    let rated_at = rated_at.as_deref().map(parse_ts).transpose().map_err(corrupt)?;
    let messages: Vec<StoredMessage> =
        serde_json::from_str(&messages).map_err(|e| corrupt(format!("messages: {e}")))?;

    Ok(Interaction {
        id: uuid,
        session_id,
        role,
        content,
        timestamp,
        rating,
        rated_at,
        messages,
    })
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("timestamp '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Role;

    async fn store() -> SqliteChatStore {
        SqliteChatStore::connect(&StoreConfig::in_memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn append_assigns_id_and_round_trips() {
        let s = store().await;
        let written = s
            .append(NewInteraction::new("s1", "hello", "hi there"))
            .await
            .unwrap();

        let read = s.session_interactions("s1", 10).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, written.id);
        assert_eq!(read[0].content, "hi there");
        assert_eq!(read[0].messages[0].role, Role::User);
        assert_eq!(read[0].messages[1].content, "hi there");
    }

    #[tokio::test]
    async fn session_interactions_are_oldest_first_and_limited() {
        let s = store().await;
        for i in 0..4 {
            s.append(NewInteraction::new("s1", format!("q{i}"), format!("a{i}")))
                .await
                .unwrap();
        }
        s.append(NewInteraction::new("other", "x", "y")).await.unwrap();

        let read = s.session_interactions("s1", 2).await.unwrap();
        let replies: Vec<_> = read.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(replies, ["a2", "a3"]);
    }

    #[tokio::test]
    async fn recent_messages_are_chronological_and_truncated() {
        let s = store().await;
        s.append(NewInteraction::new("s1", "q0", "a0")).await.unwrap();
        s.append(NewInteraction::new("s2", "q1", "a1")).await.unwrap();

        let all = s.recent_messages(None, 3).await.unwrap();
        let texts: Vec<_> = all.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, ["a0", "q1", "a1"]);

        let scoped = s.recent_messages(Some("s1"), 10).await.unwrap();
        let texts: Vec<_> = scoped.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, ["q0", "a0"]);

        assert!(s.recent_messages(None, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rating_is_set_once() {
        let s = store().await;
        let it = s.append(NewInteraction::new("s1", "q", "a")).await.unwrap();

        assert_eq!(s.rate(it.id, Rating::Helpful).await.unwrap(), RatingOutcome::Rated);
        assert_eq!(
            s.rate(it.id, Rating::Unhelpful).await.unwrap(),
            RatingOutcome::AlreadyRated
        );

        let read = s.session_interactions("s1", 1).await.unwrap();
        assert_eq!(read[0].rating, Some(Rating::Helpful));
        assert!(read[0].rated_at.is_some());
    }

    #[tokio::test]
    async fn rating_unknown_id_is_not_found() {
        let s = store().await;
        assert_eq!(
            s.rate(Uuid::new_v4(), Rating::Helpful).await.unwrap(),
            RatingOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_pool() {
        let s = store().await;
        s.ping().await.unwrap();
    }
}
