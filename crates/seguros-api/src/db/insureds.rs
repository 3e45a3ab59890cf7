//! Insured persistence operations.
//!
//! The free functions take a `&PgPool` and operate on the `insureds` table.
//! [`PgInsuredStore`] wraps them behind [`InsuredRepository`] and translates
//! `sqlx::Error` into [`StoreError`], turning unique-constraint violations
//! into [`StoreError::Duplicate`] so a race past the validator's pre-check
//! still surfaces as a duplicate-value rejection.

use seguros_core::{
    InsuredDraft, InsuredId, InsuredPerson, InsuredRepository, StoreError, UniqueField,
};
use sqlx::PgPool;

/// Row shape returned by every `SELECT` / `RETURNING` on `insureds`.
#[derive(Debug, sqlx::FromRow)]
pub struct InsuredRow {
    pub id: i32,
    pub first_name: String,
    pub second_name: Option<String>,
    pub last_name: String,
    pub second_last_name: String,
    pub phone_number: String,
    pub email: String,
    pub birth_date: String,
    pub estimated_value: i32,
    pub notes: Option<String>,
}

impl InsuredRow {
    /// Convert a database row to the core record type.
    pub fn into_record(self) -> InsuredPerson {
        InsuredPerson {
            id: InsuredId::new(self.id),
            first_name: self.first_name,
            second_name: self.second_name,
            last_name: self.last_name,
            second_last_name: self.second_last_name,
            phone_number: self.phone_number,
            email: self.email,
            birth_date: self.birth_date,
            estimated_value: self.estimated_value,
            notes: self.notes,
        }
    }
}

/// Insert a new record and return it with its assigned id.
pub async fn insert(pool: &PgPool, draft: &InsuredDraft) -> Result<InsuredRow, sqlx::Error> {
    sqlx::query_as::<_, InsuredRow>(
        "INSERT INTO insureds (first_name, second_name, last_name, second_last_name,
                               phone_number, email, birth_date, estimated_value, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, first_name, second_name, last_name, second_last_name,
                   phone_number, email, birth_date, estimated_value, notes",
    )
    .bind(&draft.first_name)
    .bind(&draft.second_name)
    .bind(&draft.last_name)
    .bind(&draft.second_last_name)
    .bind(&draft.phone_number)
    .bind(&draft.email)
    .bind(&draft.birth_date)
    .bind(draft.estimated_value)
    .bind(&draft.notes)
    .fetch_one(pool)
    .await
}

/// Overwrite every mutable column of record `id`. Returns `None` if absent.
pub async fn replace_fields(
    pool: &PgPool,
    id: i32,
    draft: &InsuredDraft,
) -> Result<Option<InsuredRow>, sqlx::Error> {
    sqlx::query_as::<_, InsuredRow>(
        "UPDATE insureds
         SET first_name = $1, second_name = $2, last_name = $3, second_last_name = $4,
             phone_number = $5, email = $6, birth_date = $7, estimated_value = $8, notes = $9
         WHERE id = $10
         RETURNING id, first_name, second_name, last_name, second_last_name,
                   phone_number, email, birth_date, estimated_value, notes",
    )
    .bind(&draft.first_name)
    .bind(&draft.second_name)
    .bind(&draft.last_name)
    .bind(&draft.second_last_name)
    .bind(&draft.phone_number)
    .bind(&draft.email)
    .bind(&draft.birth_date)
    .bind(draft.estimated_value)
    .bind(&draft.notes)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete record `id`. Returns `true` if a row was removed.
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM insureds WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Fetch one record.
pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<InsuredRow>, sqlx::Error> {
    sqlx::query_as::<_, InsuredRow>(
        "SELECT id, first_name, second_name, last_name, second_last_name,
                phone_number, email, birth_date, estimated_value, notes
         FROM insureds WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Fetch every record ordered by id (creation order).
pub async fn list(pool: &PgPool) -> Result<Vec<InsuredRow>, sqlx::Error> {
    sqlx::query_as::<_, InsuredRow>(
        "SELECT id, first_name, second_name, last_name, second_last_name,
                phone_number, email, birth_date, estimated_value, notes
         FROM insureds ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

/// Whether any record other than `exclude` holds `value` in `field`.
pub async fn exists_with(
    pool: &PgPool,
    field: UniqueField,
    value: &str,
    exclude: Option<i32>,
) -> Result<bool, sqlx::Error> {
    let sql = match field {
        UniqueField::Email => {
            "SELECT EXISTS(SELECT 1 FROM insureds
                           WHERE email = $1 AND ($2::INT4 IS NULL OR id <> $2))"
        }
        UniqueField::PhoneNumber => {
            "SELECT EXISTS(SELECT 1 FROM insureds
                           WHERE phone_number = $1 AND ($2::INT4 IS NULL OR id <> $2))"
        }
    };
    sqlx::query_scalar::<_, bool>(sql)
        .bind(value)
        .bind(exclude)
        .fetch_one(pool)
        .await
}

/// Map a unique constraint name from the migration to the field it guards.
pub fn unique_field_for_constraint(name: &str) -> Option<UniqueField> {
    match name {
        "insureds_email_key" => Some(UniqueField::Email),
        "insureds_phone_number_key" => Some(UniqueField::PhoneNumber),
        _ => None,
    }
}

fn store_error(err: sqlx::Error, draft: Option<&InsuredDraft>) -> StoreError {
    if let (sqlx::Error::Database(db_err), Some(draft)) = (&err, draft) {
        if db_err.is_unique_violation() {
            if let Some(field) = db_err.constraint().and_then(unique_field_for_constraint) {
                return StoreError::Duplicate {
                    field,
                    value: field.value_of(draft).to_string(),
                };
            }
        }
    }
    StoreError::Backend(err.to_string())
}

/// Postgres-backed [`InsuredRepository`].
#[derive(Debug, Clone)]
pub struct PgInsuredStore {
    pool: PgPool,
}

impl PgInsuredStore {
    /// Wrap a pool whose schema has been migrated by [`crate::db::init_pool`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl InsuredRepository for PgInsuredStore {
    async fn find_by_id(&self, id: InsuredId) -> Result<Option<InsuredPerson>, StoreError> {
        get_by_id(&self.pool, id.get())
            .await
            .map(|row| row.map(InsuredRow::into_record))
            .map_err(|e| store_error(e, None))
    }

    async fn find_all(&self) -> Result<Vec<InsuredPerson>, StoreError> {
        list(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(InsuredRow::into_record).collect())
            .map_err(|e| store_error(e, None))
    }

    async fn exists_with(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<InsuredId>,
    ) -> Result<bool, StoreError> {
        exists_with(&self.pool, field, value, exclude.map(|id| id.get()))
            .await
            .map_err(|e| store_error(e, None))
    }

    async fn insert(&self, draft: &InsuredDraft) -> Result<InsuredPerson, StoreError> {
        insert(&self.pool, draft)
            .await
            .map(InsuredRow::into_record)
            .map_err(|e| store_error(e, Some(draft)))
    }

    async fn replace_fields(
        &self,
        id: InsuredId,
        draft: &InsuredDraft,
    ) -> Result<InsuredPerson, StoreError> {
        match replace_fields(&self.pool, id.get(), draft).await {
            Ok(Some(row)) => Ok(row.into_record()),
            Ok(None) => Err(StoreError::NotFound(id)),
            Err(e) => Err(store_error(e, Some(draft))),
        }
    }

    async fn remove(&self, id: InsuredId) -> Result<(), StoreError> {
        match delete(&self.pool, id.get()).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(StoreError::NotFound(id)),
            Err(e) => Err(store_error(e, None)),
        }
    }
}
