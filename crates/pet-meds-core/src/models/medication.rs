//! Medication models.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{now_rfc3339, require_text, ValidationError, ValidationResult};

/// How often a medication is given.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    TwiceDaily,
    Weekly,
    Monthly,
    AsNeeded,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::TwiceDaily => "twice-daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::AsNeeded => "as-needed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "twice-daily" | "twice_daily" => Ok(Frequency::TwiceDaily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "as-needed" | "as_needed" => Ok(Frequency::AsNeeded),
            other => Err(ValidationError(format!("Unknown frequency: {}", other))),
        }
    }
}

/// Parse a time-of-day given as `HH:MM` or `HH:MM:SS`.
pub fn parse_timing(s: &str) -> Result<NaiveTime, ValidationError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| ValidationError(format!("Invalid time of day: {}", s)))
}

/// A medication prescribed to one pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// UUID, generated locally
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Pet receiving the medication
    pub pet_id: String,
    /// Medication name
    pub name: String,
    /// Free-text dosage, e.g. "1 tablet" or "0.5 mL"
    pub dosage: String,
    pub frequency: Frequency,
    /// Local time of day the dose is due
    pub timing: NaiveTime,
    /// Free-text course length, e.g. "14 days"
    pub duration: Option<String>,
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Medication {
    /// Create a new medication with required fields.
    pub fn new(
        user_id: String,
        pet_id: String,
        name: String,
        dosage: String,
        frequency: Frequency,
        timing: NaiveTime,
    ) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            pet_id,
            name,
            dosage,
            frequency,
            timing,
            duration: None,
            notes: None,
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

    pub fn validate(&self) -> ValidationResult {
        require_text("Medication name", &self.name)?;
        require_text("Dosage", &self.dosage)?;
        require_text("Pet", &self.pet_id)?;
        Ok(())
    }

    /// Timing formatted for storage and display.
    pub fn timing_str(&self) -> String {
        self.timing.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parse() {
        assert_eq!(Frequency::parse("daily").unwrap(), Frequency::Daily);
        assert_eq!(Frequency::parse("Twice-Daily").unwrap(), Frequency::TwiceDaily);
        assert_eq!(Frequency::parse("as_needed").unwrap(), Frequency::AsNeeded);
        assert!(Frequency::parse("hourly").is_err());
    }

    #[test]
    fn test_frequency_serde_names() {
        let json = serde_json::to_string(&Frequency::TwiceDaily).unwrap();
        assert_eq!(json, "\"twice-daily\"");
    }

    #[test]
    fn test_parse_timing() {
        assert_eq!(
            parse_timing("08:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_timing("20:15:00").unwrap(),
            NaiveTime::from_hms_opt(20, 15, 0).unwrap()
        );
        assert!(parse_timing("8.30am").is_err());
    }

    #[test]
    fn test_validate_requires_dosage() {
        let timing = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let med = Medication::new(
            "user-1".into(),
            "pet-1".into(),
            "Carprofen".into(),
            "".into(),
            Frequency::Daily,
            timing,
        );
        assert_eq!(med.validate().unwrap_err().to_string(), "Dosage is required");
        assert_eq!(med.timing_str(), "08:00");
    }
}
