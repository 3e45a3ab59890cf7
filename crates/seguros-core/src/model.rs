//! # Insured Person Record
//!
//! [`InsuredPerson`] is the stored record. [`InsuredDraft`] is the same set
//! of mutable fields without the store-assigned [`InsuredId`]; it is what
//! clients submit on create and on full-replace update.
//!
//! JSON field names are camelCase.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned identifier of an insured person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct InsuredId(i32);

impl InsuredId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for InsuredId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for InsuredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Candidate record submitted by a client.
///
/// Every field defaults when absent or `null` so that a missing required
/// field is reported by the validator with its name, not as a decode failure.
/// A payload carrying both `birthDate` and the legacy `brithDate` key is
/// rejected as a duplicate field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct InsuredDraft {
    /// Given name.
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    /// Optional middle name.
    pub second_name: Option<String>,
    /// Paternal surname.
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    /// Maternal surname.
    #[serde(deserialize_with = "null_as_default")]
    pub second_last_name: String,
    /// Contact phone number, unique across records after trimming.
    #[serde(deserialize_with = "null_as_default")]
    pub phone_number: String,
    /// Contact email, unique across records after trimming.
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    /// Birth date as submitted, e.g. `1990-01-01`.
    #[serde(alias = "brithDate", deserialize_with = "null_as_default")]
    pub birth_date: String,
    /// Estimated insured value, strictly positive.
    #[serde(deserialize_with = "null_as_default")]
    pub estimated_value: i32,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl InsuredDraft {
    /// Strip surrounding whitespace from the unique keys. Uniqueness is an
    /// exact match on the trimmed values.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.email);
        trim_in_place(&mut self.phone_number);
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A stored insured person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct InsuredPerson {
    /// Store-assigned identifier.
    pub id: InsuredId,
    /// Given name.
    pub first_name: String,
    /// Optional middle name.
    pub second_name: Option<String>,
    /// Paternal surname.
    pub last_name: String,
    /// Maternal surname.
    pub second_last_name: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Contact email.
    pub email: String,
    /// Birth date as it was submitted.
    pub birth_date: String,
    /// Estimated insured value.
    pub estimated_value: i32,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl InsuredPerson {
    /// Build a stored record from a draft and its assigned id.
    pub fn from_draft(id: InsuredId, draft: InsuredDraft) -> Self {
        let InsuredDraft {
            first_name,
            second_name,
            last_name,
            second_last_name,
            phone_number,
            email,
            birth_date,
            estimated_value,
            notes,
        } = draft;
        Self {
            id,
            first_name,
            second_name,
            last_name,
            second_last_name,
            phone_number,
            email,
            birth_date,
            estimated_value,
            notes,
        }
    }

    /// Overwrite every mutable field with the draft's values. The id is kept.
    pub fn replace_fields(&mut self, draft: InsuredDraft) {
        *self = Self::from_draft(self.id, draft);
    }

    /// The mutable fields of this record as a draft.
    pub fn to_draft(&self) -> InsuredDraft {
        InsuredDraft {
            first_name: self.first_name.clone(),
            second_name: self.second_name.clone(),
            last_name: self.last_name.clone(),
            second_last_name: self.second_last_name.clone(),
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
            birth_date: self.birth_date.clone(),
            estimated_value: self.estimated_value,
            notes: self.notes.clone(),
        }
    }
}
