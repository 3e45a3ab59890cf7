//! # Record Store Gateway
//!
//! [`InsuredRepository`] is the async capability the service is injected
//! with. Each operation is a single logically atomic call against one
//! table. Implementations must return `Send` futures so handlers can run on
//! a multi-threaded runtime.
//!
//! Implementations that can enforce uniqueness at the storage layer (a
//! unique constraint, a write lock) report violations as
//! [`StoreError::Duplicate`] rather than a generic backend failure.

use std::fmt;
use std::future::Future;

use crate::error::StoreError;
use crate::model::{InsuredDraft, InsuredId, InsuredPerson};
use crate::validation::Field;

/// Fields that must be unique across all stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    /// `email`
    Email,
    /// `phoneNumber`
    PhoneNumber,
}

impl UniqueField {
    /// Read this field's value from a draft.
    pub fn value_of<'a>(&self, draft: &'a InsuredDraft) -> &'a str {
        match self {
            Self::Email => &draft.email,
            Self::PhoneNumber => &draft.phone_number,
        }
    }
}

impl From<UniqueField> for Field {
    fn from(field: UniqueField) -> Self {
        match field {
            UniqueField::Email => Field::Email,
            UniqueField::PhoneNumber => Field::PhoneNumber,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Field::from(*self), f)
    }
}

/// Async persistence over the single `insureds` table.
pub trait InsuredRepository: Send + Sync {
    /// Fetch one record by id.
    fn find_by_id(
        &self,
        id: InsuredId,
    ) -> impl Future<Output = Result<Option<InsuredPerson>, StoreError>> + Send;

    /// Fetch every record in creation order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<InsuredPerson>, StoreError>> + Send;

    /// Whether any record other than `exclude` has `field == value`.
    fn exists_with(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<InsuredId>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Persist a new record and return it with its assigned id.
    fn insert(
        &self,
        draft: &InsuredDraft,
    ) -> impl Future<Output = Result<InsuredPerson, StoreError>> + Send;

    /// Overwrite every mutable field of record `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if no such record exists.
    fn replace_fields(
        &self,
        id: InsuredId,
        draft: &InsuredDraft,
    ) -> impl Future<Output = Result<InsuredPerson, StoreError>> + Send;

    /// Delete record `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if no such record exists.
    fn remove(&self, id: InsuredId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
