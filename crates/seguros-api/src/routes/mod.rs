//! # API Route Modules
//!
//! - `insureds`: CRUD over insured person records, mounted at `/insureds`
//!   and at the legacy controller path `/api/InsuranceControllers`.

pub mod insureds;
