//! Pet models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{now_rfc3339, require_text, ValidationError, ValidationResult};

/// A pet owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    /// UUID, generated locally
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Pet name
    pub name: String,
    /// Species (e.g., "dog", "cat", "rabbit")
    pub species: String,
    /// Breed
    pub breed: Option<String>,
    /// Age in years
    pub age_years: Option<u32>,
    /// Weight in kg
    pub weight_kg: Option<f64>,
    /// Photo URL from the upload collaborator
    pub photo_url: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Pet {
    /// Create a new pet with required fields.
    pub fn new(user_id: String, name: String, species: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            name,
            species,
            breed: None,
            age_years: None,
            weight_kg: None,
            photo_url: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Set both audit timestamps to `now`.
    pub fn stamped(mut self, now: &DateTime<Utc>) -> Self {
        self.created_at = now.to_rfc3339();
        self.updated_at = self.created_at.clone();
        self
    }

    /// Check required fields and numeric ranges.
    pub fn validate(&self) -> ValidationResult {
        require_text("Pet name", &self.name)?;
        require_text("Species", &self.species)?;
        if let Some(weight) = self.weight_kg {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ValidationError("Weight must be a positive number".into()));
            }
        }
        Ok(())
    }
}
