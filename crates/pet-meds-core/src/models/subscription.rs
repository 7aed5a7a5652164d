//! Subscription records mirrored from the billing provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{now_rfc3339, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            other => Err(ValidationError(format!(
                "Unknown subscription status: {}",
                other
            ))),
        }
    }
}

/// A user's subscription. At most one per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub user_id: String,
    pub status: SubscriptionStatus,
    /// Plan name from the billing provider, e.g. "premium-monthly"
    pub plan: String,
    pub updated_at: String,
}

impl Subscription {
    pub fn new(user_id: String, status: SubscriptionStatus, plan: String) -> Self {
        Self {
            user_id,
            status,
            plan,
            updated_at: now_rfc3339(),
        }
    }

    pub fn stamped(mut self, now: &DateTime<Utc>) -> Self {
        self.updated_at = now.to_rfc3339();
        self
    }

    /// Whether this subscription lifts the free-tier limits.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        let sub = Subscription::new("u".into(), SubscriptionStatus::Active, "premium".into());
        assert!(sub.is_active());

        let sub = Subscription::new("u".into(), SubscriptionStatus::Trialing, "premium".into());
        assert!(sub.is_active());

        let sub = Subscription::new("u".into(), SubscriptionStatus::PastDue, "premium".into());
        assert!(!sub.is_active());

        let sub = Subscription::new("u".into(), SubscriptionStatus::Canceled, "premium".into());
        assert!(!sub.is_active());
    }

    #[test]
    fn test_status_parse() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Trialing,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
        ] {
            assert_eq!(SubscriptionStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(SubscriptionStatus::parse("paused").is_err());
    }
}
