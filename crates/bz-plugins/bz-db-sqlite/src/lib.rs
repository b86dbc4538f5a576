//! # bz-db-sqlite Implementation
//!
//! A small document store on top of SQLite. Every record is a JSON document
//! in a single `documents` table, grouped by collection (`users`, `items`,
//! `courses`) and queried through SQLite's JSON functions.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use bz_core::models::{Listing, ListingFilter, ListingKind, User};
use bz_core::traits::{ListingRepo, UserRepo};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use uuid::Uuid;

const USERS: &str = "users";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id         BLOB PRIMARY KEY,
    collection TEXT NOT NULL,
    body       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS documents_by_collection ON documents (collection);
";

/// Cheap to clone; clones share one pool.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

// Helper for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn decode<T: DeserializeOwned>(body: &str) -> anyhow::Result<T> {
    serde_json::from_str(body).context("stored document does not match its model")
}

impl SqliteDocumentStore {
    /// Opens (creating if needed) the database at `url` and applies the schema.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url '{url}'"))?
            .create_if_missing(true);

        // Each connection to an in-memory database is its own database, so the
        // pool must hold exactly one connection and never recycle it.
        let in_memory = url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(if in_memory { None } else { Some(std::time::Duration::from_secs(600)) })
            .max_lifetime(if in_memory { None } else { Some(std::time::Duration::from_secs(1800)) })
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to '{url}'"))?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::info!(url, "document store ready");
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Inserts a document, or replaces the body of the one with the same id.
    async fn put<T: Serialize>(&self, collection: &str, id: Uuid, doc: &T) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO documents (id, collection, body) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET body = excluded.body",
        )
        .bind(uuid_to_blob(id))
        .bind(collection)
        .bind(serde_json::to_string(doc)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, collection: &str, id: Uuid) -> anyhow::Result<Option<T>> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| decode(&r.get::<String, _>("body"))).transpose()
    }

    /// Finds the first document whose top-level `field` equals `value`.
    async fn find_by<T: DeserializeOwned>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> anyhow::Result<Option<T>> {
        let row = sqlx::query(
            "SELECT body FROM documents
             WHERE collection = ? AND json_extract(body, ?) = ?
             ORDER BY rowid LIMIT 1",
        )
        .bind(collection)
        .bind(format!("$.{field}"))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| decode(&r.get::<String, _>("body"))).transpose()
    }
}

#[async_trait]
impl ListingRepo for SqliteDocumentStore {
    async fn create_listing(&self, listing: Listing) -> anyhow::Result<()> {
        self.put(listing.kind.collection(), listing.id, &listing).await
    }

    async fn get_listing(&self, kind: ListingKind, id: Uuid) -> anyhow::Result<Option<Listing>> {
        self.get(kind.collection(), id).await
    }

    async fn list_listings(
        &self,
        kind: ListingKind,
        filter: ListingFilter,
    ) -> anyhow::Result<Vec<Listing>> {
        let mut sql = String::from("SELECT body FROM documents WHERE collection = ?");
        if filter.category.is_some() {
            sql.push_str(" AND json_extract(body, '$.category') = ?");
        }
        if filter.tag.is_some() {
            sql.push_str(" AND EXISTS (SELECT 1 FROM json_each(body, '$.tags') WHERE value = ?)");
        }
        sql.push_str(" ORDER BY rowid DESC");

        let mut query = sqlx::query(&sql).bind(kind.collection());
        if let Some(category) = &filter.category {
            query = query.bind(category);
        }
        if let Some(tag) = &filter.tag {
            query = query.bind(tag);
        }

        query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| decode(&row.get::<String, _>("body")))
            .collect()
    }
}

#[async_trait]
impl UserRepo for SqliteDocumentStore {
    async fn save_user(&self, user: User) -> anyhow::Result<()> {
        self.put(USERS, user.id, &user).await
    }

    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.get(USERS, id).await
    }

    async fn find_user_by_subject(&self, subject: &str) -> anyhow::Result<Option<User>> {
        self.find_by(USERS, "subject", subject).await
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        self.find_by(USERS, "username", username).await
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        sqlx::query("SELECT body FROM documents WHERE collection = ? ORDER BY rowid")
            .bind(USERS)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| decode(&row.get::<String, _>("body")))
            .collect()
    }
}
