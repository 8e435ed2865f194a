//! Todo item domain model.
//!
//! # Responsibility
//! - Define the record stored in the `toodo` table and exchanged as JSON.
//! - Validate caller-supplied items before they reach storage.
//!
//! # Invariants
//! - `id` is the identity key; it is never blank.
//! - `created_at` is Unix epoch milliseconds; `0` means "not set yet".

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-assigned opaque identifier.
pub type ToodoId = String;

/// One todo item.
///
/// On input, `title`, `completed` and `created_at` may be absent or `null`;
/// either decodes to the zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toodo {
    pub id: ToodoId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    /// Epoch milliseconds. Filled with the current time during sync when `0`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validation failures for caller-supplied items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToodoValidationError {
    EmptyId,
    NegativeCreatedAt { id: ToodoId, created_at: i64 },
}

impl Display for ToodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "toodo id cannot be empty"),
            Self::NegativeCreatedAt { id, created_at } => write!(
                f,
                "toodo `{id}` has negative created_at {created_at}"
            ),
        }
    }
}

impl Error for ToodoValidationError {}

impl Toodo {
    /// Creates an open item with an unset creation time.
    pub fn new(id: impl Into<ToodoId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            created_at: 0,
        }
    }

    pub fn has_created_at(&self) -> bool {
        self.created_at != 0
    }

    /// Sets `created_at` to `now_ms` unless already set.
    pub fn fill_created_at(&mut self, now_ms: i64) {
        if !self.has_created_at() {
            self.created_at = now_ms;
        }
    }

    /// Checks invariants that must hold before persistence.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is empty or whitespace only.
    /// - `NegativeCreatedAt` when `created_at < 0`.
    pub fn validate(&self) -> Result<(), ToodoValidationError> {
        if self.id.trim().is_empty() {
            return Err(ToodoValidationError::EmptyId);
        }
        if self.created_at < 0 {
            return Err(ToodoValidationError::NegativeCreatedAt {
                id: self.id.clone(),
                created_at: self.created_at,
            });
        }
        Ok(())
    }
}
