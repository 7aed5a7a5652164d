//! SQLite schema definition.

/// Complete database schema for pet-meds.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS pets (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT,
    age_years INTEGER,
    weight_kg REAL,
    photo_url TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_pets_user ON pets(user_id);

-- ============================================================================
-- Medications
-- ============================================================================

CREATE TABLE IF NOT EXISTS medications (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    pet_id TEXT NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    dosage TEXT NOT NULL,
    frequency TEXT NOT NULL CHECK (
        frequency IN ('daily', 'twice-daily', 'weekly', 'monthly', 'as-needed')
    ),
    timing TEXT NOT NULL,                         -- local HH:MM
    duration TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medications_user ON medications(user_id);
CREATE INDEX IF NOT EXISTS idx_medications_pet ON medications(pet_id);

-- ============================================================================
-- Reminders (pending -> given | missed)
-- ============================================================================

CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    pet_id TEXT NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
    medication_id TEXT NOT NULL REFERENCES medications(id) ON DELETE CASCADE,
    scheduled_time TEXT NOT NULL,                 -- UTC, fixed-width ISO 8601
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'given', 'missed')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_reminders_user_time ON reminders(user_id, scheduled_time);
CREATE INDEX IF NOT EXISTS idx_reminders_medication ON reminders(medication_id);

-- Given and missed are terminal
CREATE TRIGGER IF NOT EXISTS reminders_terminal_status BEFORE UPDATE OF status ON reminders
WHEN old.status != 'pending'
BEGIN
    SELECT RAISE(ABORT, 'Reminder status is terminal');
END;

-- ============================================================================
-- Medication History (Append-Only - Immutable after creation)
-- ============================================================================

-- No foreign keys: history outlives its medication, reminder and pet
CREATE TABLE IF NOT EXISTS medication_history (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    pet_id TEXT NOT NULL,
    medication_id TEXT NOT NULL,
    dosage TEXT NOT NULL,
    scheduled_time TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('given', 'missed')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_history_user_time ON medication_history(user_id, scheduled_time);
CREATE INDEX IF NOT EXISTS idx_history_medication ON medication_history(medication_id);

CREATE TRIGGER IF NOT EXISTS medication_history_no_update BEFORE UPDATE ON medication_history
BEGIN
    SELECT RAISE(ABORT, 'History entries are immutable');
END;

CREATE TRIGGER IF NOT EXISTS medication_history_no_delete BEFORE DELETE ON medication_history
BEGIN
    SELECT RAISE(ABORT, 'History entries are immutable');
END;

-- ============================================================================
-- Subscriptions (mirrored from billing provider)
-- ============================================================================

CREATE TABLE IF NOT EXISTS subscriptions (
    user_id TEXT PRIMARY KEY,
    status TEXT NOT NULL CHECK (status IN ('active', 'trialing', 'past_due', 'canceled')),
    plan TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Notifications
-- ============================================================================

CREATE TABLE IF NOT EXISTS notification_preferences (
    user_id TEXT PRIMARY KEY,
    email_enabled INTEGER NOT NULL DEFAULT 1,
    push_enabled INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- One row per (reminder, channel) ever sent; the primary key is the
-- dispatcher's idempotency gate
CREATE TABLE IF NOT EXISTS notification_dispatches (
    reminder_id TEXT NOT NULL REFERENCES reminders(id) ON DELETE CASCADE,
    channel TEXT NOT NULL CHECK (channel IN ('email', 'push')),
    sent_at TEXT NOT NULL,
    PRIMARY KEY (reminder_id, channel)
);
"#;
