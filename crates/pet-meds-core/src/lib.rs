//! Pet-Meds Core Library
//!
//! Medication reminders for pets: what is due, what was given, and what the
//! user's plan allows.
//!
//! # Architecture
//!
//! ```text
//!   create_medication ──▶ PlanGate ──▶ medications + first reminder
//!                                              │
//!   get_todays_reminders ◀── StatusEngine ◀────┤ (derived at read time)
//!                                              │
//!   mark_reminder_given ──▶ ReminderLifecycle ─┤
//!                              │               │
//!                              ▼               ▼
//!                      medication_history   NotificationTrigger
//!                      (append-only)        (external dispatcher)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Pet, Medication, Reminder, HistoryEntry, etc.)
//! - [`status`]: Derived reminder statuses and time-of-day grouping
//! - [`lifecycle`]: Reminder creation, completion and cleanup
//! - [`plan`]: Free-tier limits
//! - [`notify`]: Notification trigger contract
//! - [`export`]: History export
//! - [`config`]: Environment configuration
//! - [`clock`]: Injectable time source

pub mod clock;
pub mod config;
pub mod db;
pub mod export;
pub mod lifecycle;
pub mod models;
pub mod notify;
pub mod plan;
pub mod status;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use db::{Database, HistoryFilter};
pub use lifecycle::{ReminderError, ReminderLifecycle};
pub use models::{
    Frequency, HistoryEntry, HistoryStatus, Medication, NotificationChannel,
    NotificationPreference, Pet, Reminder, ReminderStatus, Subscription, SubscriptionStatus,
};
pub use notify::{NotificationTrigger, Notifier, RecordingNotifier};
pub use plan::{PlanError, PlanGate, PlanLimits, PlanStatus, ResourceKind};
pub use status::{DerivedStatus, StatusEngine, StatusInfo, StatusWindows, TimeOfDay};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::info;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PetMedsError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyCompleted(String),

    #[error("{message}")]
    PlanLimitExceeded {
        resource: String,
        limit: u32,
        message: String,
    },

    #[error("Store error: {0}")]
    Store(String),
}

impl From<db::DbError> for PetMedsError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(_) => PetMedsError::NotFound(e.to_string()),
            _ => PetMedsError::Store(e.to_string()),
        }
    }
}

impl From<models::ValidationError> for PetMedsError {
    fn from(e: models::ValidationError) -> Self {
        PetMedsError::Validation(e.0)
    }
}

impl From<lifecycle::ReminderError> for PetMedsError {
    fn from(e: lifecycle::ReminderError) -> Self {
        match e {
            ReminderError::NotFound(_) => PetMedsError::NotFound(e.to_string()),
            ReminderError::AlreadyCompleted(_) => PetMedsError::AlreadyCompleted(e.to_string()),
            ReminderError::Database(e) => e.into(),
        }
    }
}

impl From<plan::PlanError> for PetMedsError {
    fn from(e: plan::PlanError) -> Self {
        let message = e.to_string();
        match e {
            PlanError::LimitExceeded { resource, limit } => PetMedsError::PlanLimitExceeded {
                resource: resource.as_str().to_string(),
                limit,
                message,
            },
            PlanError::Database(e) => e.into(),
        }
    }
}

impl From<notify::NotifyError> for PetMedsError {
    fn from(e: notify::NotifyError) -> Self {
        match e {
            notify::NotifyError::NotFound(_) => PetMedsError::NotFound(e.to_string()),
            notify::NotifyError::NotDue(_) => PetMedsError::Validation(e.to_string()),
            notify::NotifyError::Transport(_) | notify::NotifyError::PartialDelivery { .. } => {
                PetMedsError::Store(e.to_string())
            }
            notify::NotifyError::Database(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for PetMedsError {
    fn from(e: serde_json::Error) -> Self {
        PetMedsError::Store(format!("Serialization error: {}", e))
    }
}

impl<T> From<std::sync::PoisonError<T>> for PetMedsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PetMedsError::Store(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
///
/// Everything except the path comes from the environment.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<PetMedsCore>, PetMedsError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(PetMedsCore::with_clock(
        db,
        Config::new(),
        Arc::new(SystemClock),
    )))
}

/// Open the database named by `PET_MEDS_DATABASE_PATH`.
#[uniffi::export]
pub fn open_database_from_env() -> Result<Arc<PetMedsCore>, PetMedsError> {
    let config = Config::new();
    let db = Database::open(&config.database_path)?;
    info!(path = %config.database_path, "Opened pet-meds database");
    Ok(Arc::new(PetMedsCore::with_clock(
        db,
        config,
        Arc::new(SystemClock),
    )))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<PetMedsCore>, PetMedsError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(PetMedsCore::with_clock(
        db,
        Config::defaults(),
        Arc::new(SystemClock),
    )))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PetMedsCore {
    db: Arc<Mutex<Database>>,
    config: Config,
    clock: Arc<dyn Clock>,
}

impl PetMedsCore {
    /// Build a core with an explicit config and time source.
    pub fn with_clock(db: Database, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn engine(&self) -> StatusEngine {
        StatusEngine::new(self.config.status_windows)
    }

    /// Run the notification trigger for one reminder through `notifier`.
    pub fn fire_notification(
        &self,
        reminder_id: &str,
        notifier: &dyn Notifier,
    ) -> Result<Vec<NotificationChannel>, PetMedsError> {
        let db = self.db.lock()?;
        let trigger = NotificationTrigger::new(&db, notifier, self.engine());
        Ok(trigger.fire(reminder_id, self.now())?)
    }

    fn view_lookup(&self, db: &Database, user_id: &str) -> Result<ViewLookup, PetMedsError> {
        Ok(ViewLookup {
            pets: db
                .list_pets(user_id)?
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            medications: db
                .list_medications(user_id, None)?
                .into_iter()
                .map(|m| (m.id.clone(), m))
                .collect(),
        })
    }

    fn reminder_views(&self, lookup: &ViewLookup, reminders: Vec<Reminder>) -> Vec<FfiReminderView> {
        let now = self.now();
        let engine = self.engine();
        reminders
            .into_iter()
            .map(|r| {
                let info = engine.derive(r.scheduled_time, now, r.status);
                let period = status::time_of_day(&r.scheduled_time, &self.config.utc_offset);
                let medication = lookup.medications.get(&r.medication_id);
                FfiReminderView {
                    reminder_id: r.id,
                    pet_id: r.pet_id.clone(),
                    pet_name: lookup
                        .pets
                        .get(&r.pet_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_default(),
                    medication_id: r.medication_id.clone(),
                    medication_name: medication.map(|m| m.name.clone()).unwrap_or_default(),
                    dosage: medication.map(|m| m.dosage.clone()).unwrap_or_default(),
                    scheduled_time: db::to_db_time(&r.scheduled_time),
                    status: status_label(r.status).to_string(),
                    derived_status: info.status.label().to_string(),
                    can_mark_given: info.status.is_actionable(),
                    minutes_late: info.minutes_late,
                    minutes_until: info.minutes_until,
                    time_of_day: period.label().to_string(),
                }
            })
            .collect()
    }

    fn todays_reminders(&self, db: &Database, user_id: &str) -> Result<Vec<Reminder>, PetMedsError> {
        let (start, end) = status::local_day_bounds(self.now(), &self.config.utc_offset);
        Ok(db.list_reminders_between(user_id, &start, &end)?)
    }
}

#[uniffi::export]
impl PetMedsCore {
    // =========================================================================
    // Pet Operations
    // =========================================================================

    /// Create a pet, subject to the user's plan limit.
    pub fn create_pet(&self, user_id: String, input: FfiPetInput) -> Result<FfiPet, PetMedsError> {
        let mut pet = Pet::new(user_id, input.name.trim().to_string(), input.species.trim().to_string())
            .stamped(&self.now());
        input.apply_optional(&mut pet);
        pet.validate()?;

        let db = self.db.lock()?;
        PlanGate::new(&db, self.config.plan_limits).check_can_create_pet(&pet.user_id)?;
        db.insert_pet(&pet)?;
        info!(pet_id = %pet.id, "Pet created");
        Ok(pet.into())
    }

    /// Get a pet by ID.
    pub fn get_pet(&self, user_id: String, pet_id: String) -> Result<Option<FfiPet>, PetMedsError> {
        let db = self.db.lock()?;
        let pet = db.get_pet(&pet_id, &user_id)?;
        Ok(pet.map(|p| p.into()))
    }

    /// List a user's pets by name.
    pub fn list_pets(&self, user_id: String) -> Result<Vec<FfiPet>, PetMedsError> {
        let db = self.db.lock()?;
        let pets = db.list_pets(&user_id)?;
        Ok(pets.into_iter().map(|p| p.into()).collect())
    }

    /// Replace a pet's editable fields.
    pub fn update_pet(
        &self,
        user_id: String,
        pet_id: String,
        input: FfiPetInput,
    ) -> Result<FfiPet, PetMedsError> {
        let db = self.db.lock()?;
        let mut pet = db
            .get_pet(&pet_id, &user_id)?
            .ok_or_else(|| PetMedsError::NotFound(format!("Pet not found: {}", pet_id)))?;

        pet.name = input.name.trim().to_string();
        pet.species = input.species.trim().to_string();
        input.apply_optional(&mut pet);
        pet.validate()?;
        pet.updated_at = self.now().to_rfc3339();

        db.update_pet(&pet)?;
        Ok(pet.into())
    }

    /// Delete a pet with its medications and reminders. History is kept.
    pub fn delete_pet(&self, user_id: String, pet_id: String) -> Result<(), PetMedsError> {
        let db = self.db.lock()?;
        if !db.delete_pet(&pet_id, &user_id)? {
            return Err(PetMedsError::NotFound(format!("Pet not found: {}", pet_id)));
        }
        info!(pet_id = %pet_id, "Pet deleted");
        Ok(())
    }

    // =========================================================================
    // Medication Operations
    // =========================================================================

    /// Create a medication and its first reminder, subject to the plan limit.
    pub fn create_medication(
        &self,
        user_id: String,
        input: FfiMedicationInput,
    ) -> Result<FfiMedication, PetMedsError> {
        let frequency = Frequency::parse(&input.frequency)?;
        let timing = models::parse_timing(&input.timing)?;
        let mut med = Medication::new(
            user_id,
            input.pet_id.clone(),
            input.name.trim().to_string(),
            input.dosage.trim().to_string(),
            frequency,
            timing,
        )
        .stamped(&self.now());
        med.duration = input.duration.filter(|d| !d.trim().is_empty());
        med.notes = input.notes.filter(|n| !n.trim().is_empty());
        med.validate()?;

        let db = self.db.lock()?;
        if db.get_pet(&med.pet_id, &med.user_id)?.is_none() {
            return Err(PetMedsError::NotFound(format!("Pet not found: {}", med.pet_id)));
        }
        PlanGate::new(&db, self.config.plan_limits).check_can_create_medication(&med.user_id)?;

        let now = self.now();
        let offset = self.config.utc_offset;
        let clock = self.clock.as_ref();
        db.with_transaction(|db| -> Result<(), PetMedsError> {
            db.insert_medication(&med)?;
            let first = lifecycle::next_occurrence(med.timing, now, &offset);
            ReminderLifecycle::with_clock(db, clock).create_reminder(&med, first)?;
            Ok(())
        })?;

        info!(medication_id = %med.id, pet_id = %med.pet_id, "Medication created");
        Ok(med.into())
    }

    /// Update a medication and replace its future reminders.
    pub fn update_medication(
        &self,
        user_id: String,
        medication_id: String,
        input: FfiMedicationInput,
    ) -> Result<FfiMedication, PetMedsError> {
        let frequency = Frequency::parse(&input.frequency)?;
        let timing = models::parse_timing(&input.timing)?;

        let db = self.db.lock()?;
        let mut med = db
            .get_medication_for_user(&medication_id, &user_id)?
            .ok_or_else(|| {
                PetMedsError::NotFound(format!("Medication not found: {}", medication_id))
            })?;

        if input.pet_id != med.pet_id && db.get_pet(&input.pet_id, &user_id)?.is_none() {
            return Err(PetMedsError::NotFound(format!("Pet not found: {}", input.pet_id)));
        }

        med.pet_id = input.pet_id;
        med.name = input.name.trim().to_string();
        med.dosage = input.dosage.trim().to_string();
        med.frequency = frequency;
        med.timing = timing;
        med.duration = input.duration.filter(|d| !d.trim().is_empty());
        med.notes = input.notes.filter(|n| !n.trim().is_empty());
        med.validate()?;

        let now = self.now();
        med.updated_at = now.to_rfc3339();
        let offset = self.config.utc_offset;
        let clock = self.clock.as_ref();
        db.with_transaction(|db| -> Result<(), PetMedsError> {
            db.update_medication(&med)?;
            ReminderLifecycle::with_clock(db, clock).reschedule(&med, now, &offset)?;
            Ok(())
        })?;

        Ok(med.into())
    }

    /// Delete a medication and its reminders. History is kept.
    pub fn delete_medication(
        &self,
        user_id: String,
        medication_id: String,
    ) -> Result<(), PetMedsError> {
        let db = self.db.lock()?;
        if !db.delete_medication(&medication_id, &user_id)? {
            return Err(PetMedsError::NotFound(format!(
                "Medication not found: {}",
                medication_id
            )));
        }
        info!(medication_id = %medication_id, "Medication deleted");
        Ok(())
    }

    /// List medications, optionally for one pet.
    pub fn list_medications(
        &self,
        user_id: String,
        pet_id: Option<String>,
    ) -> Result<Vec<FfiMedication>, PetMedsError> {
        let db = self.db.lock()?;
        let meds = db.list_medications(&user_id, pet_id.as_deref())?;
        Ok(meds.into_iter().map(|m| m.into()).collect())
    }

    // =========================================================================
    // Reminder Operations
    // =========================================================================

    /// Today's reminders in local time, earliest first, with derived status.
    pub fn get_todays_reminders(&self, user_id: String) -> Result<Vec<FfiReminderView>, PetMedsError> {
        let db = self.db.lock()?;
        let reminders = self.todays_reminders(&db, &user_id)?;
        let lookup = self.view_lookup(&db, &user_id)?;
        Ok(self.reminder_views(&lookup, reminders))
    }

    /// Today's reminders bucketed into morning, afternoon and evening.
    ///
    /// Empty groups are left out.
    pub fn get_todays_reminders_grouped(
        &self,
        user_id: String,
    ) -> Result<Vec<FfiReminderGroup>, PetMedsError> {
        let db = self.db.lock()?;
        let reminders = self.todays_reminders(&db, &user_id)?;
        let lookup = self.view_lookup(&db, &user_id)?;
        let groups = status::group_reminders(reminders, &self.config.utc_offset);

        Ok(groups
            .iter()
            .map(|(period, items)| FfiReminderGroup {
                time_of_day: period.label().to_string(),
                reminders: self.reminder_views(&lookup, items.to_vec()),
            })
            .collect())
    }

    /// Mark a reminder as given and record it in history.
    pub fn mark_reminder_given(
        &self,
        user_id: String,
        reminder_id: String,
    ) -> Result<FfiReminder, PetMedsError> {
        let db = self.db.lock()?;
        let reminder = ReminderLifecycle::with_clock(&db, self.clock.as_ref())
            .mark_as_given(&reminder_id, &user_id)?;
        Ok(reminder.into())
    }

    /// Mark a reminder as missed. Used by the missed-dose sweep.
    pub fn mark_reminder_missed(&self, reminder_id: String) -> Result<FfiReminder, PetMedsError> {
        let db = self.db.lock()?;
        let reminder =
            ReminderLifecycle::with_clock(&db, self.clock.as_ref()).mark_as_missed(&reminder_id)?;
        Ok(reminder.into())
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    /// History newest first. `start` and `end` are RFC 3339 bounds on the
    /// scheduled time; `start` is inclusive and `end` exclusive.
    pub fn get_history(
        &self,
        user_id: String,
        pet_id: Option<String>,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<Vec<FfiHistoryEntry>, PetMedsError> {
        let filter = history_filter(pet_id, start, end)?;
        let db = self.db.lock()?;
        let entries = db.list_history(&user_id, &filter)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Export history as JSON.
    pub fn export_history_json(
        &self,
        user_id: String,
        pet_id: Option<String>,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<String, PetMedsError> {
        let filter = history_filter(pet_id, start, end)?;
        let db = self.db.lock()?;
        let export = export::HistoryExporter::new(&db).export(&user_id, &filter, self.now())?;
        Ok(export.to_json()?)
    }

    /// Export history as CSV.
    pub fn export_history_csv(
        &self,
        user_id: String,
        pet_id: Option<String>,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<String, PetMedsError> {
        let filter = history_filter(pet_id, start, end)?;
        let db = self.db.lock()?;
        let export = export::HistoryExporter::new(&db).export(&user_id, &filter, self.now())?;
        Ok(export.to_csv())
    }

    // =========================================================================
    // Plan Operations
    // =========================================================================

    /// Tier, usage and limits.
    pub fn get_plan_status(&self, user_id: String) -> Result<FfiPlanStatus, PetMedsError> {
        let db = self.db.lock()?;
        let status = PlanGate::new(&db, self.config.plan_limits).status(&user_id)?;
        Ok(status.into())
    }

    /// Store the latest subscription state from the billing provider.
    pub fn record_subscription(
        &self,
        user_id: String,
        status: String,
        plan: String,
    ) -> Result<(), PetMedsError> {
        let status = SubscriptionStatus::parse(&status)?;
        let db = self.db.lock()?;
        db.upsert_subscription(&Subscription::new(user_id.clone(), status, plan).stamped(&self.now()))?;
        info!(user_id = %user_id, status = status.as_str(), "Subscription recorded");
        Ok(())
    }

    // =========================================================================
    // Notification Preference Operations
    // =========================================================================

    /// Saved preferences, or the defaults if none were saved.
    pub fn get_notification_preferences(
        &self,
        user_id: String,
    ) -> Result<FfiNotificationPreference, PetMedsError> {
        let db = self.db.lock()?;
        let pref = db
            .get_notification_preference(&user_id)?
            .unwrap_or_else(|| NotificationPreference::default_for(user_id));
        Ok(pref.into())
    }

    pub fn set_notification_preferences(
        &self,
        user_id: String,
        email_enabled: bool,
        push_enabled: bool,
    ) -> Result<FfiNotificationPreference, PetMedsError> {
        let mut pref = NotificationPreference::default_for(user_id);
        pref.email_enabled = email_enabled;
        pref.push_enabled = push_enabled;
        pref.updated_at = self.now().to_rfc3339();

        let db = self.db.lock()?;
        db.upsert_notification_preference(&pref)?;
        Ok(pref.into())
    }
}

/// Pet and medication records keyed by ID, for joining onto reminders.
struct ViewLookup {
    pets: HashMap<String, Pet>,
    medications: HashMap<String, Medication>,
}

fn status_label(status: ReminderStatus) -> &'static str {
    match status {
        ReminderStatus::Pending => "pending",
        ReminderStatus::Given => "given",
        ReminderStatus::Missed => "missed",
    }
}

fn parse_bound(name: &str, value: Option<String>) -> Result<Option<DateTime<Utc>>, PetMedsError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            DateTime::parse_from_rfc3339(v.trim())
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| PetMedsError::Validation(format!("Invalid {} time {}: {}", name, v, e)))
        })
        .transpose()
}

fn history_filter(
    pet_id: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<HistoryFilter, PetMedsError> {
    Ok(HistoryFilter {
        pet_id,
        start: parse_bound("start", start)?,
        end: parse_bound("end", end)?,
    })
}

// =========================================================================
// FFI Types
// =========================================================================

/// Editable pet fields.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPetInput {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age_years: Option<u32>,
    pub weight_kg: Option<f64>,
    pub photo_url: Option<String>,
}

impl FfiPetInput {
    fn apply_optional(&self, pet: &mut Pet) {
        pet.breed = self.breed.clone().filter(|b| !b.trim().is_empty());
        pet.age_years = self.age_years;
        pet.weight_kg = self.weight_kg;
        pet.photo_url = self.photo_url.clone().filter(|u| !u.trim().is_empty());
    }
}

/// FFI-safe pet.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPet {
    pub id: String,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age_years: Option<u32>,
    pub weight_kg: Option<f64>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Pet> for FfiPet {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            age_years: pet.age_years,
            weight_kg: pet.weight_kg,
            photo_url: pet.photo_url,
            created_at: pet.created_at,
            updated_at: pet.updated_at,
        }
    }
}

/// Editable medication fields.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationInput {
    pub pet_id: String,
    pub name: String,
    pub dosage: String,
    /// daily, twice-daily, weekly, monthly or as-needed
    pub frequency: String,
    /// Local time of day, "HH:MM"
    pub timing: String,
    pub duration: Option<String>,
    pub notes: Option<String>,
}

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub pet_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub timing: String,
    pub duration: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Medication> for FfiMedication {
    fn from(med: Medication) -> Self {
        Self {
            timing: med.timing_str(),
            frequency: med.frequency.as_str().to_string(),
            id: med.id,
            pet_id: med.pet_id,
            name: med.name,
            dosage: med.dosage,
            duration: med.duration,
            notes: med.notes,
            created_at: med.created_at,
            updated_at: med.updated_at,
        }
    }
}

/// FFI-safe reminder.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminder {
    pub id: String,
    pub pet_id: String,
    pub medication_id: String,
    pub scheduled_time: String,
    pub status: String,
    pub created_at: String,
}

impl From<Reminder> for FfiReminder {
    fn from(reminder: Reminder) -> Self {
        Self {
            scheduled_time: db::to_db_time(&reminder.scheduled_time),
            status: status_label(reminder.status).to_string(),
            id: reminder.id,
            pet_id: reminder.pet_id,
            medication_id: reminder.medication_id,
            created_at: reminder.created_at,
        }
    }
}

/// A reminder joined with its pet and medication, as shown on the home screen.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminderView {
    pub reminder_id: String,
    pub pet_id: String,
    pub pet_name: String,
    pub medication_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub scheduled_time: String,
    /// Persisted status: pending, given or missed
    pub status: String,
    /// scheduled, due-soon, due-now, overdue, given or missed
    pub derived_status: String,
    /// False once the reminder is given or missed
    pub can_mark_given: bool,
    pub minutes_late: Option<i64>,
    pub minutes_until: Option<i64>,
    /// morning, afternoon or evening
    pub time_of_day: String,
}

/// Reminders for one part of the day.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminderGroup {
    pub time_of_day: String,
    pub reminders: Vec<FfiReminderView>,
}

/// FFI-safe history entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHistoryEntry {
    pub id: String,
    pub pet_id: String,
    pub medication_id: String,
    pub dosage: String,
    pub scheduled_time: String,
    pub status: String,
    pub created_at: String,
}

impl From<HistoryEntry> for FfiHistoryEntry {
    fn from(entry: HistoryEntry) -> Self {
        let status = match entry.status {
            HistoryStatus::Given => "given",
            HistoryStatus::Missed => "missed",
        };
        Self {
            scheduled_time: db::to_db_time(&entry.scheduled_time),
            status: status.to_string(),
            id: entry.id,
            pet_id: entry.pet_id,
            medication_id: entry.medication_id,
            dosage: entry.dosage,
            created_at: entry.created_at,
        }
    }
}

/// FFI-safe plan status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPlanStatus {
    pub premium: bool,
    pub pet_count: u32,
    pub pet_limit: Option<u32>,
    pub medication_count: u32,
    pub medication_limit: Option<u32>,
}

impl From<PlanStatus> for FfiPlanStatus {
    fn from(status: PlanStatus) -> Self {
        Self {
            premium: status.premium,
            pet_count: status.pet_count,
            pet_limit: status.pet_limit,
            medication_count: status.medication_count,
            medication_limit: status.medication_limit,
        }
    }
}

/// FFI-safe notification preferences.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotificationPreference {
    pub email_enabled: bool,
    pub push_enabled: bool,
}

impl From<NotificationPreference> for FfiNotificationPreference {
    fn from(pref: NotificationPreference) -> Self {
        Self {
            email_enabled: pref.email_enabled,
            push_enabled: pref.push_enabled,
        }
    }
}
