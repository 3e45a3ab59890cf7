//! # Validation Rules
//!
//! One validator for every entry point. Checks run in a fixed order and
//! stop at the first failure:
//!
//! 1. required text fields are non-empty (`firstName`, `lastName`,
//!    `secondLastName`, `phoneNumber`, `email`, `birthDate`)
//! 2. `estimatedValue > 0`
//! 3. `birthDate` parses, and is not later than `now`
//! 4. `email`, then `phoneNumber`, are unused by any other record
//!
//! Steps 1–3 are pure ([`check_fields`]). Step 4 reads the repository
//! ([`validate`]). In [`ValidationMode::Update`] the record being updated is
//! excluded from the uniqueness query so it may keep its own values.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{InsuredError, ValidationError};
use crate::model::{InsuredDraft, InsuredId};
use crate::repository::{InsuredRepository, UniqueField};

/// Validated fields of an insured person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `firstName`
    FirstName,
    /// `lastName`
    LastName,
    /// `secondLastName`
    SecondLastName,
    /// `phoneNumber`
    PhoneNumber,
    /// `email`
    Email,
    /// `birthDate`
    BirthDate,
    /// `estimatedValue`
    EstimatedValue,
}

impl Field {
    /// JSON attribute name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::SecondLastName => "secondLastName",
            Self::PhoneNumber => "phoneNumber",
            Self::Email => "email",
            Self::BirthDate => "birthDate",
            Self::EstimatedValue => "estimatedValue",
        }
    }

    /// Human-readable label used in rejection messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::SecondLastName => "Second last name",
            Self::PhoneNumber => "Phone number",
            Self::Email => "Email",
            Self::BirthDate => "Birth date",
            Self::EstimatedValue => "Estimated value",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a candidate is being created or replaces an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// New record; every stored record counts for uniqueness.
    Create,
    /// Full replace of the given record, which is excluded from uniqueness.
    Update(InsuredId),
}

impl ValidationMode {
    /// Whether this is an update.
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }

    /// The record excluded from uniqueness checks, if any.
    pub fn exclude_id(&self) -> Option<InsuredId> {
        match self {
            Self::Create => None,
            Self::Update(id) => Some(*id),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a submitted birth date. Values without an offset are read as UTC.
pub fn parse_birth_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn require(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Field, range and date checks. Pure given `now`.
pub fn check_fields(draft: &InsuredDraft, now: DateTime<Utc>) -> Result<(), ValidationError> {
    require(Field::FirstName, &draft.first_name)?;
    require(Field::LastName, &draft.last_name)?;
    require(Field::SecondLastName, &draft.second_last_name)?;
    require(Field::PhoneNumber, &draft.phone_number)?;
    require(Field::Email, &draft.email)?;
    require(Field::BirthDate, &draft.birth_date)?;

    if draft.estimated_value <= 0 {
        return Err(ValidationError::InvalidValue(Field::EstimatedValue));
    }

    let born = parse_birth_date(&draft.birth_date)
        .ok_or(ValidationError::InvalidFormat(Field::BirthDate))?;
    if born > now {
        return Err(ValidationError::FutureDate(Field::BirthDate));
    }
    Ok(())
}

/// Run every rule against `draft`, consulting `repo` for uniqueness.
///
/// Store failures during the uniqueness query surface as
/// [`InsuredError::Persistence`].
pub async fn validate<R>(
    repo: &R,
    draft: &InsuredDraft,
    mode: ValidationMode,
    now: DateTime<Utc>,
) -> Result<(), InsuredError>
where
    R: InsuredRepository + ?Sized,
{
    check_fields(draft, now)?;

    for field in [UniqueField::Email, UniqueField::PhoneNumber] {
        let value = field.value_of(draft);
        if repo.exists_with(field, value, mode.exclude_id()).await? {
            return Err(ValidationError::DuplicateValue {
                field: field.into(),
                value: value.to_string(),
            }
            .into());
        }
    }
    Ok(())
}
