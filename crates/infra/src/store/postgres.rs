//! Postgres-backed document store.
//!
//! Each collection is a table of JSONB documents:
//!
//! | Column | Type | Notes |
//! |--------|------|-------|
//! | `id` | `uuid` | primary key, mirrors the document's `_id` |
//! | `doc` | `jsonb` | the full document including `_id` |
//! | `created_at` | `timestamptz` | insertion order for unsorted listings |
//!
//! ## Error Mapping
//!
//! Every SQLx error becomes `StoreError::Storage`; document (de)serialization
//! failures become `StoreError::Serialization`. Nothing is retried.
//!
//! ## Thread Safety
//!
//! `PostgresStore` is `Send + Sync` and cheap to clone. The SQLx pool handles
//! connection management for concurrent requests.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use househunter_core::{
    CreateUserOutcome, DeleteResult, House, HouseDocument, HouseFields, HouseId, HouseQuery,
    InsertResult, SortSpec, UpdateResult, User, UserDocument, UserId,
};

use super::{HouseStore, StoreError, UserStore};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        doc JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS users_email_idx ON users ((doc->>'email'))",
    r#"
    CREATE TABLE IF NOT EXISTS houses (
        id UUID PRIMARY KEY,
        doc JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "DROP INDEX IF EXISTS houses_city_idx",
    "CREATE INDEX IF NOT EXISTS houses_city_json_idx ON houses ((doc->'city'))",
];

/// Matches only documents whose `city` is that exact string.
const CITY_FILTER: &str = "($1::text IS NULL OR doc->'city' = to_jsonb($1::text))";

/// Type rank of the sort value: missing/null, number, string, object,
/// array, boolean. Same order as the in-memory store.
const SORT_RANK: &str = "CASE jsonb_typeof(doc -> $2::text) \
     WHEN 'number' THEN 1 WHEN 'string' THEN 2 WHEN 'object' THEN 3 \
     WHEN 'array' THEN 4 WHEN 'boolean' THEN 5 ELSE 0 END";

/// Strings compare bytewise, independent of the database collation.
const SORT_STRING: &str = "CASE WHEN jsonb_typeof(doc -> $2::text) = 'string' \
     THEN (doc ->> $2::text) COLLATE \"C\" END";

/// `SELECT` for a house listing. `$1` is the city, `$2` the sort field.
///
/// The sort field is bound as a parameter; only the direction is spliced in,
/// and it comes from a closed enum.
fn list_houses_sql(sort: Option<&SortSpec>) -> String {
    match sort {
        Some(spec) => format!(
            "SELECT doc FROM houses WHERE {CITY_FILTER} \
             ORDER BY {SORT_RANK} {dir}, {SORT_STRING} {dir}, doc -> $2::text {dir}, created_at, id",
            dir = spec.order.as_sql(),
        ),
        None => format!("SELECT doc FROM houses WHERE {CITY_FILTER} ORDER BY created_at, id"),
    }
}

/// Document store over a shared SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Storage(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Storage(format!("connection pool closed in {}", operation))
        }
        other => StoreError::Storage(format!("{} failed: {}", operation, other)),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, then check the server answers before serving traffic.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ping().await?;
        tracing::info!("connected to the document database");
        Ok(store)
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }

    /// Create the collection tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserDocument>, StoreError> {
        let rows = sqlx::query("SELECT doc FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;

        rows.iter()
            .map(|row| {
                row.try_get::<Json<UserDocument>, _>("doc")
                    .map(|Json(doc)| doc)
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserDocument>, StoreError> {
        let row = sqlx::query("SELECT doc FROM users WHERE doc->>'email' = $1 ORDER BY created_at LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        row.map(|row| {
            row.try_get::<Json<UserDocument>, _>("doc")
                .map(|Json(doc)| doc)
                .map_err(|e| StoreError::Serialization(e.to_string()))
        })
        .transpose()
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: User) -> Result<CreateUserOutcome<UserId>, StoreError> {
        let id = UserId::new();
        let doc = to_json(&UserDocument::new(id, user))?;

        // Check and insert in one statement; uniqueness is still not a
        // storage-level constraint.
        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, doc)
            SELECT $1::uuid, $2::jsonb
            WHERE NOT EXISTS (SELECT 1 FROM users WHERE doc->>'email' = $2::jsonb->>'email')
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&doc))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?
        .rows_affected();

        Ok(if inserted == 0 {
            CreateUserOutcome::AlreadyExists
        } else {
            CreateUserOutcome::Created(InsertResult::new(id))
        })
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Result<DeleteResult, StoreError> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?
            .rows_affected();
        Ok(DeleteResult::new(deleted))
    }
}

#[async_trait]
impl HouseStore for PostgresStore {
    #[instrument(skip(self, house))]
    async fn insert_house(&self, house: House) -> Result<InsertResult<HouseId>, StoreError> {
        let id = HouseId::new();
        let doc = to_json(&HouseDocument::new(id, house))?;

        sqlx::query("INSERT INTO houses (id, doc) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(Json(&doc))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_house", e))?;

        Ok(InsertResult::new(id))
    }

    #[instrument(skip(self))]
    async fn list_houses(&self, query: &HouseQuery) -> Result<Vec<HouseDocument>, StoreError> {
        let sql = list_houses_sql(query.sort.as_ref());
        let mut statement = sqlx::query(&sql).bind(query.city.as_deref());
        if let Some(spec) = &query.sort {
            statement = statement.bind(spec.field.as_str());
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_houses", e))?;

        rows.iter()
            .map(|row| {
                row.try_get::<Json<HouseDocument>, _>("doc")
                    .map(|Json(doc)| doc)
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn get_house(&self, id: HouseId) -> Result<Option<HouseDocument>, StoreError> {
        let row = sqlx::query("SELECT doc FROM houses WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_house", e))?;

        row.map(|row| {
            row.try_get::<Json<HouseDocument>, _>("doc")
                .map(|Json(doc)| doc)
                .map_err(|e| StoreError::Serialization(e.to_string()))
        })
        .transpose()
    }

    #[instrument(skip(self))]
    async fn delete_house(&self, id: HouseId) -> Result<DeleteResult, StoreError> {
        let deleted = sqlx::query("DELETE FROM houses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_house", e))?
            .rows_affected();
        Ok(DeleteResult::new(deleted))
    }

    #[instrument(skip(self, fields))]
    async fn update_house(&self, id: HouseId, fields: HouseFields) -> Result<UpdateResult, StoreError> {
        let patch = Value::Object(fields.to_patch());

        // `doc || patch` replaces exactly the keys in the patch. The row only
        // counts as modified when the merge changes something.
        let row = sqlx::query(
            r#"
            WITH target AS (
                SELECT id, doc FROM houses WHERE id = $1
            ),
            updated AS (
                UPDATE houses h
                SET doc = t.doc || $2::jsonb
                FROM target t
                WHERE h.id = t.id AND (t.doc || $2::jsonb) IS DISTINCT FROM t.doc
                RETURNING h.id
            )
            SELECT
                (SELECT COUNT(*) FROM target) AS matched,
                (SELECT COUNT(*) FROM updated) AS modified
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&patch))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_house", e))?;

        let matched: i64 = row
            .try_get("matched")
            .map_err(|e| map_sqlx_error("update_house", e))?;
        let modified: i64 = row
            .try_get("modified")
            .map_err(|e| map_sqlx_error("update_house", e))?;

        Ok(UpdateResult::new(matched as u64, modified as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use househunter_core::SortOrder;

    fn spec(order: SortOrder) -> SortSpec {
        SortSpec {
            field: "rent".into(),
            order,
        }
    }

    #[test]
    fn unsorted_listing_keeps_insertion_order() {
        let sql = list_houses_sql(None);
        assert!(sql.ends_with("ORDER BY created_at, id"));
        assert!(!sql.contains("$2"));
    }

    #[test]
    fn sort_ranks_types_before_comparing_values() {
        let sql = list_houses_sql(Some(&spec(SortOrder::Asc)));

        let rank = sql.find("jsonb_typeof").unwrap();
        let value = sql.find("doc -> $2::text ASC").unwrap();
        assert!(rank < value, "{sql}");

        // Same ladder as the in-memory ordering.
        let ladder = ["'number' THEN 1", "'string' THEN 2", "'object' THEN 3", "'array' THEN 4", "'boolean' THEN 5", "ELSE 0"];
        for rung in ladder {
            assert!(SORT_RANK.contains(rung), "{rung}");
        }
    }

    #[test]
    fn direction_applies_to_every_sort_key() {
        let sql = list_houses_sql(Some(&spec(SortOrder::Desc)));
        assert_eq!(sql.matches(" DESC").count(), 3, "{sql}");
        assert!(!sql.contains("NULLS"));
        assert!(sql.ends_with("created_at, id"));
    }

    #[test]
    fn city_filter_is_exact_string_match() {
        assert!(CITY_FILTER.contains("to_jsonb($1::text)"));
        assert!(!CITY_FILTER.contains("->>"));
    }
}
