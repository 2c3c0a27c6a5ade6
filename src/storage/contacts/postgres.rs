//! PostgreSQL-backed contact store.

use crate::domain::contact::{Contact, ContactFilter, ContactInput};
use crate::storage::contacts::store::ContactStore;
use crate::storage::error::StorageError;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const RETURNING_COLUMNS: &str = "id, name, email, phone, created_at";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS contacts (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL CONSTRAINT contacts_name_not_blank CHECK (name <> ''),
    email TEXT NOT NULL,
    phone TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT contacts_email_key UNIQUE (email)
)";

const CREATE_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS contacts_created_at_idx ON contacts (created_at DESC)";

/// Contact store over a `PgPool`.
#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    /// Opens a pool with at most `max_connections` connections.
    pub async fn connect(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `contacts` table and its listing index if they are missing.
    pub async fn sync_schema(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX_SQL).execute(&self.pool).await?;
        tracing::debug!("contacts schema is in place");
        Ok(())
    }

    /// Whether the `contacts` table exists in the current search path.
    pub async fn schema_present(&self) -> Result<bool, StorageError> {
        let present: bool = sqlx::query_scalar("SELECT to_regclass('contacts') IS NOT NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(present)
    }
}

fn contact_from_row(row: &PgRow) -> Result<Contact, sqlx::Error> {
    Ok(Contact {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn insert(&self, input: &ContactInput) -> Result<Contact, StorageError> {
        let sql = format!(
            "INSERT INTO contacts (name, email, phone) VALUES ($1, $2, $3) RETURNING {}",
            RETURNING_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(input.name())
            .bind(input.email())
            .bind(input.phone())
            .fetch_one(&self.pool)
            .await?;
        Ok(contact_from_row(&row)?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, StorageError> {
        let sql = format!("SELECT {} FROM contacts WHERE id = $1", RETURNING_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(contact_from_row).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>, StorageError> {
        let sql = format!("SELECT {} FROM contacts WHERE email = $1", RETURNING_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(contact_from_row).transpose()?)
    }

    async fn search(&self, filter: &ContactFilter) -> Result<Vec<Contact>, StorageError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        qb.push(RETURNING_COLUMNS).push(" FROM contacts");

        // strpos keeps the match a literal, case-sensitive substring (no LIKE wildcards).
        if let Some(term) = filter.term() {
            qb.push(" WHERE strpos(name, ")
                .push_bind(term)
                .push(") > 0 OR strpos(email, ")
                .push_bind(term)
                .push(") > 0 OR strpos(COALESCE(phone, ''), ")
                .push_bind(term)
                .push(") > 0");
        }

        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut contacts = Vec::with_capacity(rows.len());
        for row in &rows {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    async fn update(&self, contact: &Contact) -> Result<Option<Contact>, StorageError> {
        let sql = format!(
            "UPDATE contacts SET name = $2, email = $3, phone = $4 WHERE id = $1 RETURNING {}",
            RETURNING_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(contact.id)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(contact.phone.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(contact_from_row).transpose()?)
    }

    async fn delete(&self, id: i64) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
