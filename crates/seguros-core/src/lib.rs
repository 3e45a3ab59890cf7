#![deny(missing_docs)]

//! # seguros-core: Insured Person Registry Core
//!
//! Everything the registry knows about an insured person that does not
//! depend on HTTP or a particular database driver:
//!
//! - [`model`]: the [`InsuredPerson`] record and the [`InsuredDraft`]
//!   candidate submitted by clients.
//! - [`validation`]: the single validator shared by every entry point.
//! - [`repository`]: the async [`InsuredRepository`] contract the service
//!   is injected with.
//! - [`memory`]: a lock-protected in-memory implementation of the contract.
//! - [`service`]: the five operations (create, get, list, update, delete)
//!   composed from validation and persistence.
//!
//! ## Crate Policy
//!
//! - No global state. The datastore is a value handed to [`InsuredService`].
//! - Structured errors with `thiserror`, no `.unwrap()` outside tests.
//! - With the `openapi` feature, public records derive `utoipa::ToSchema`.

pub mod error;
pub mod memory;
pub mod model;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{InsuredError, StoreError, ValidationError};
pub use memory::MemoryStore;
pub use model::{InsuredDraft, InsuredId, InsuredPerson};
pub use repository::{InsuredRepository, UniqueField};
pub use service::InsuredService;
pub use validation::{Field, ValidationMode};
