//! Plan-tier limits on pets and medications.
//!
//! Free users are capped; an active subscription lifts every cap. The gate is
//! consulted inside each create path before the insert.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::db::{Database, DbError};

/// Resource kinds that count against the free tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pet,
    Medication,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pet => "pet",
            ResourceKind::Medication => "medication",
        }
    }

    /// Noun for user-facing messages, pluralised to agree with `count`.
    pub fn noun(&self, count: u32) -> &'static str {
        match (self, count) {
            (ResourceKind::Pet, 1) => "pet",
            (ResourceKind::Pet, _) => "pets",
            (ResourceKind::Medication, 1) => "medication",
            (ResourceKind::Medication, _) => "medications",
        }
    }
}

/// Plan gate errors.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("{}", limit_message(.resource, .limit))]
    LimitExceeded { resource: ResourceKind, limit: u32 },

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type PlanResult<T> = Result<T, PlanError>;

fn limit_message(resource: &ResourceKind, limit: &u32) -> String {
    format!("Free plan allows only {} {}", limit, resource.noun(*limit))
}

/// Free-tier caps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanLimits {
    pub free_pets: u32,
    pub free_medications: u32,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            free_pets: 1,
            free_medications: 2,
        }
    }
}

impl PlanLimits {
    pub fn limit_for(&self, resource: ResourceKind) -> u32 {
        match resource {
            ResourceKind::Pet => self.free_pets,
            ResourceKind::Medication => self.free_medications,
        }
    }
}

/// A user's tier and usage, for upgrade prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanStatus {
    pub premium: bool,
    pub pet_count: u32,
    /// `None` when unlimited
    pub pet_limit: Option<u32>,
    pub medication_count: u32,
    pub medication_limit: Option<u32>,
}

/// Plan limit gate.
pub struct PlanGate<'a> {
    db: &'a Database,
    limits: PlanLimits,
}

impl<'a> PlanGate<'a> {
    pub fn new(db: &'a Database, limits: PlanLimits) -> Self {
        Self { db, limits }
    }

    /// Whether the user has an active subscription.
    ///
    /// Lookup failures count as not subscribed.
    pub fn is_premium(&self, user_id: &str) -> bool {
        match self.db.get_subscription(user_id) {
            Ok(Some(sub)) => sub.is_active(),
            Ok(None) => false,
            Err(e) => {
                warn!(
                    "Subscription lookup failed for user {}, treating as free tier: {}",
                    user_id, e
                );
                false
            }
        }
    }

    fn count(&self, user_id: &str, resource: ResourceKind) -> PlanResult<u32> {
        let count = match resource {
            ResourceKind::Pet => self.db.count_pets(user_id)?,
            ResourceKind::Medication => self.db.count_medications(user_id)?,
        };
        Ok(count)
    }

    /// Fail with `LimitExceeded` if the user may not create another `resource`.
    pub fn check(&self, user_id: &str, resource: ResourceKind) -> PlanResult<()> {
        if self.is_premium(user_id) {
            return Ok(());
        }
        let limit = self.limits.limit_for(resource);
        if self.count(user_id, resource)? >= limit {
            return Err(PlanError::LimitExceeded { resource, limit });
        }
        Ok(())
    }

    pub fn check_can_create_pet(&self, user_id: &str) -> PlanResult<()> {
        self.check(user_id, ResourceKind::Pet)
    }

    pub fn check_can_create_medication(&self, user_id: &str) -> PlanResult<()> {
        self.check(user_id, ResourceKind::Medication)
    }

    pub fn can_create_pet(&self, user_id: &str) -> PlanResult<bool> {
        self.allowed(self.check_can_create_pet(user_id))
    }

    pub fn can_create_medication(&self, user_id: &str) -> PlanResult<bool> {
        self.allowed(self.check_can_create_medication(user_id))
    }

    fn allowed(&self, result: PlanResult<()>) -> PlanResult<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(PlanError::LimitExceeded { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Tier and usage summary.
    pub fn status(&self, user_id: &str) -> PlanResult<PlanStatus> {
        let premium = self.is_premium(user_id);
        let limit = |resource| (!premium).then(|| self.limits.limit_for(resource));
        Ok(PlanStatus {
            premium,
            pet_count: self.count(user_id, ResourceKind::Pet)?,
            pet_limit: limit(ResourceKind::Pet),
            medication_count: self.count(user_id, ResourceKind::Medication)?,
            medication_limit: limit(ResourceKind::Medication),
        })
    }
}
