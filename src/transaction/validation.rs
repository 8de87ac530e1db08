//! Validation of client-supplied transaction fields.
//!
//! Every write to the store goes through [TransactionFields::validate], which
//! either produces a [NewTransaction] that satisfies the schema or lists every
//! constraint that was violated.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::transaction::TransactionType;

/// The minimum number of characters in a transaction name, after trimming.
pub const MIN_NAME_LENGTH: usize = 3;

/// Transaction fields as sent by a client.
///
/// Used for create bodies, where missing fields are errors, and for update
/// patches, where missing fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFields {
    /// The ID of the user that owns the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The transaction name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The amount of money.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Either "income" or "expense".
    ///
    /// Kept as a string so that an unknown type is reported as a validation
    /// error rather than a malformed request.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionFields {
    /// Fields for a complete transaction.
    pub fn new(user_id: &str, name: &str, amount: f64, kind: TransactionType) -> Self {
        Self {
            user_id: Some(user_id.to_owned()),
            name: Some(name.to_owned()),
            amount: Some(amount),
            kind: Some(kind.as_str().to_owned()),
            description: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Overwrite these fields with every field that is present in `patch`.
    pub fn merge(self, patch: TransactionFields) -> Self {
        Self {
            user_id: patch.user_id.or(self.user_id),
            name: patch.name.or(self.name),
            amount: patch.amount.or(self.amount),
            kind: patch.kind.or(self.kind),
            description: patch.description.or(self.description),
        }
    }

    /// Check the fields against the transaction schema.
    ///
    /// Strings are trimmed before they are checked, and a description that is
    /// empty after trimming is dropped. The returned [NewTransaction] is
    /// timestamped with the current time.
    ///
    /// # Errors
    /// Returns every violated constraint if any field is missing or invalid.
    pub fn validate(self) -> Result<NewTransaction, ValidationErrors> {
        let mut errors = Vec::new();

        let user_id = trimmed(self.user_id);
        if user_id.is_none() {
            errors.push(ValidationError::MissingUserId);
        }

        let name = trimmed(self.name);
        match &name {
            None => errors.push(ValidationError::MissingName),
            Some(name) if name.chars().count() < MIN_NAME_LENGTH => {
                errors.push(ValidationError::NameTooShort)
            }
            Some(_) => {}
        }

        match self.amount {
            None => errors.push(ValidationError::MissingAmount),
            Some(amount) if !amount.is_finite() => errors.push(ValidationError::NonFiniteAmount),
            Some(amount) if amount < 0.0 => errors.push(ValidationError::NegativeAmount),
            Some(_) => {}
        }

        let kind = match self.kind.as_deref().map(str::parse::<TransactionType>) {
            Some(Ok(kind)) => Some(kind),
            Some(Err(_)) | None => {
                errors.push(ValidationError::InvalidType);
                None
            }
        };

        match (user_id, name, self.amount, kind) {
            (Some(user_id), Some(name), Some(amount), Some(kind)) if errors.is_empty() => {
                Ok(NewTransaction {
                    user_id,
                    name,
                    amount,
                    kind,
                    description: trimmed(self.description),
                    created_at: OffsetDateTime::now_utc(),
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Trim `value`, treating an empty result the same as a missing value.
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Validated fields that are ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub(crate) user_id: String,
    pub(crate) name: String,
    pub(crate) amount: f64,
    pub(crate) kind: TransactionType,
    pub(crate) description: Option<String>,
    pub(crate) created_at: OffsetDateTime,
}

impl NewTransaction {
    /// Override the creation time, e.g. when seeding historic data.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A single violated schema constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `userId` was missing or blank.
    #[error("User ID is required")]
    MissingUserId,
    /// `name` was missing or blank.
    #[error("Transaction name is required")]
    MissingName,
    /// `name` was shorter than [MIN_NAME_LENGTH].
    #[error("Name must be at least 3 characters")]
    NameTooShort,
    /// `amount` was missing.
    #[error("Amount is required")]
    MissingAmount,
    /// `amount` was less than zero.
    #[error("Amount cannot be negative")]
    NegativeAmount,
    /// `amount` was NaN or infinite.
    #[error("Amount must be a finite number")]
    NonFiniteAmount,
    /// `type` was missing or not one of "income" or "expense".
    #[error("Type must be either income or expense")]
    InvalidType,
}

impl ValidationError {
    /// The wire name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingUserId => "userId",
            ValidationError::MissingName | ValidationError::NameTooShort => "name",
            ValidationError::MissingAmount
            | ValidationError::NegativeAmount
            | ValidationError::NonFiniteAmount => "amount",
            ValidationError::InvalidType => "type",
        }
    }
}

/// The non-empty list of constraints violated by a set of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Whether `error` is one of the violations.
    pub fn contains(&self, error: ValidationError) -> bool {
        self.0.contains(&error)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Transaction validation failed: ")?;

        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", error.field(), error)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
