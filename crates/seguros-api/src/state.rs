//! # Application State
//!
//! Shared state passed to all Axum route handlers via the `State` extractor.
//! Holds the insured service over the configured backend, the optional
//! database pool for readiness checks, and the loaded configuration.

use std::sync::Arc;

use seguros_core::{
    InsuredDraft, InsuredId, InsuredPerson, InsuredRepository, InsuredService, MemoryStore,
    StoreError, UniqueField,
};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::insureds::PgInsuredStore;

/// The record store selected at start-up.
///
/// `Postgres` when a pool is configured, `Memory` otherwise.
#[derive(Debug, Clone)]
pub enum InsuredBackend {
    /// Process-local store; records are lost on restart.
    Memory(MemoryStore),
    /// The `insureds` table behind a SQLx pool.
    Postgres(PgInsuredStore),
}

impl InsuredRepository for InsuredBackend {
    async fn find_by_id(&self, id: InsuredId) -> Result<Option<InsuredPerson>, StoreError> {
        match self {
            Self::Memory(store) => store.find_by_id(id).await,
            Self::Postgres(store) => store.find_by_id(id).await,
        }
    }

    async fn find_all(&self) -> Result<Vec<InsuredPerson>, StoreError> {
        match self {
            Self::Memory(store) => store.find_all().await,
            Self::Postgres(store) => store.find_all().await,
        }
    }

    async fn exists_with(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<InsuredId>,
    ) -> Result<bool, StoreError> {
        match self {
            Self::Memory(store) => store.exists_with(field, value, exclude).await,
            Self::Postgres(store) => store.exists_with(field, value, exclude).await,
        }
    }

    async fn insert(&self, draft: &InsuredDraft) -> Result<InsuredPerson, StoreError> {
        match self {
            Self::Memory(store) => store.insert(draft).await,
            Self::Postgres(store) => store.insert(draft).await,
        }
    }

    async fn replace_fields(
        &self,
        id: InsuredId,
        draft: &InsuredDraft,
    ) -> Result<InsuredPerson, StoreError> {
        match self {
            Self::Memory(store) => store.replace_fields(id, draft).await,
            Self::Postgres(store) => store.replace_fields(id, draft).await,
        }
    }

    async fn remove(&self, id: InsuredId) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.remove(id).await,
            Self::Postgres(store) => store.remove(id).await,
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Insured operations over the selected backend.
    pub insureds: Arc<InsuredService<InsuredBackend>>,

    /// PostgreSQL connection pool. `None` means in-memory-only mode.
    pub db_pool: Option<PgPool>,

    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Build state from configuration and an optional database pool.
    ///
    /// The pool, when present, selects the Postgres backend.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let backend = match &db_pool {
            Some(pool) => InsuredBackend::Postgres(PgInsuredStore::new(pool.clone())),
            None => InsuredBackend::Memory(MemoryStore::new()),
        };
        Self::with_service(config, db_pool, InsuredService::new(backend))
    }

    /// Build state around an already-constructed service.
    pub fn with_service(
        config: AppConfig,
        db_pool: Option<PgPool>,
        service: InsuredService<InsuredBackend>,
    ) -> Self {
        Self {
            insureds: Arc::new(service),
            db_pool,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_uses_memory_backend() {
        let state = AppState::new();
        assert!(state.db_pool.is_none());
        assert!(matches!(
            state.insureds.repository(),
            InsuredBackend::Memory(_)
        ));
    }

    #[tokio::test]
    async fn clones_share_the_same_records() {
        let state = AppState::new();
        let clone = state.clone();
        let draft = InsuredDraft {
            first_name: "Ana".into(),
            last_name: "Lopez".into(),
            second_last_name: "Garcia".into(),
            phone_number: "555-0100".into(),
            email: "ana@x.com".into(),
            birth_date: "1990-01-01".into(),
            estimated_value: 1000,
            ..Default::default()
        };
        clone.insureds.create(draft).await.unwrap();
        assert_eq!(state.insureds.list().await.unwrap().len(), 1);
    }
}
