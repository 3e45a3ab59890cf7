//! # Insured Service
//!
//! The five request operations composed from [`validate`] and an injected
//! [`InsuredRepository`]:
//!
//! | operation | sequence |
//! |-----------|----------|
//! | create    | validate(Create) → insert |
//! | get       | find_by_id |
//! | list      | find_all |
//! | update    | find_by_id → validate(Update(id)) → replace_fields |
//! | delete    | find_by_id → remove |
//!
//! Create and update trim the draft's email and phone number first, so
//! stored keys and uniqueness comparisons never differ by padding.
//!
//! Update checks existence before validating so a request for an unknown id
//! never learns anything about other records' emails or phone numbers.

use chrono::{DateTime, Utc};

use crate::error::InsuredError;
use crate::model::{InsuredDraft, InsuredId, InsuredPerson};
use crate::repository::InsuredRepository;
use crate::validation::{validate, ValidationMode};

/// Source of the instant birth dates are compared against.
pub type Clock = fn() -> DateTime<Utc>;

/// Insured person operations over a repository `R`.
#[derive(Debug, Clone)]
pub struct InsuredService<R> {
    repo: R,
    clock: Clock,
}

impl<R: InsuredRepository> InsuredService<R> {
    /// Create a service using the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, Utc::now)
    }

    /// Create a service with a fixed time source.
    pub fn with_clock(repo: R, clock: Clock) -> Self {
        Self { repo, clock }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validate and store a new record.
    pub async fn create(&self, mut draft: InsuredDraft) -> Result<InsuredPerson, InsuredError> {
        draft.normalize();
        match self.try_create(&draft).await {
            Ok(record) => {
                tracing::info!(id = %record.id, "insured created");
                Ok(record)
            }
            Err(err) => {
                log_rejection("create", None, &err);
                Err(err)
            }
        }
    }

    /// Fetch one record.
    pub async fn get(&self, id: InsuredId) -> Result<InsuredPerson, InsuredError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(InsuredError::NotFound(id))
    }

    /// Fetch every record in creation order.
    pub async fn list(&self) -> Result<Vec<InsuredPerson>, InsuredError> {
        Ok(self.repo.find_all().await?)
    }

    /// Replace every mutable field of record `id`.
    pub async fn update(
        &self,
        id: InsuredId,
        mut draft: InsuredDraft,
    ) -> Result<InsuredPerson, InsuredError> {
        draft.normalize();
        match self.try_update(id, &draft).await {
            Ok(record) => {
                tracing::info!(%id, "insured updated");
                Ok(record)
            }
            Err(err) => {
                log_rejection("update", Some(id), &err);
                Err(err)
            }
        }
    }

    /// Delete record `id`.
    pub async fn delete(&self, id: InsuredId) -> Result<(), InsuredError> {
        self.get(id).await?;
        self.repo.remove(id).await?;
        tracing::info!(%id, "insured deleted");
        Ok(())
    }

    async fn try_create(&self, draft: &InsuredDraft) -> Result<InsuredPerson, InsuredError> {
        validate(&self.repo, draft, ValidationMode::Create, (self.clock)()).await?;
        Ok(self.repo.insert(draft).await?)
    }

    async fn try_update(
        &self,
        id: InsuredId,
        draft: &InsuredDraft,
    ) -> Result<InsuredPerson, InsuredError> {
        self.get(id).await?;
        validate(&self.repo, draft, ValidationMode::Update(id), (self.clock)()).await?;
        Ok(self.repo.replace_fields(id, draft).await?)
    }
}

fn log_rejection(operation: &str, id: Option<InsuredId>, err: &InsuredError) {
    let id = id.map(|id| id.get());
    match err {
        InsuredError::Validation(rule) => {
            tracing::debug!(operation, ?id, code = rule.code(), field = %rule.field(), "insured rejected");
        }
        InsuredError::NotFound(_) => {
            tracing::debug!(operation, ?id, "insured not found");
        }
        InsuredError::Persistence(message) => {
            tracing::error!(operation, ?id, error = %message, "insured persistence failure");
        }
    }
}
