//! SQLite schema definition.

/// Pragmas applied to every connection. Cascading deletes depend on
/// foreign key enforcement, which SQLite keeps per connection.
pub const CONNECTION_PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
"#;

/// Complete database schema for medtrack.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    name TEXT,
    surname TEXT
);

-- ============================================================================
-- Medications (owned by a patient)
-- ============================================================================

CREATE TABLE IF NOT EXISTS medications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    dosage REAL NOT NULL DEFAULT 1.0,
    start_date TEXT NOT NULL,                    -- YYYY-MM-DD
    treatment_duration INTEGER NOT NULL DEFAULT 1 -- days, -1 = indefinite
);

CREATE INDEX IF NOT EXISTS idx_medications_patient ON medications(patient_id);

-- ============================================================================
-- Posologies (daily dosing times of a medication)
-- ============================================================================

CREATE TABLE IF NOT EXISTS posologies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    medication_id INTEGER NOT NULL REFERENCES medications(id) ON DELETE CASCADE,
    hour INTEGER NOT NULL CHECK (hour BETWEEN 0 AND 23),
    minute INTEGER NOT NULL CHECK (minute BETWEEN 0 AND 59)
);

CREATE INDEX IF NOT EXISTS idx_posologies_medication ON posologies(medication_id);

-- ============================================================================
-- Intakes (recorded doses of a medication)
-- ============================================================================

CREATE TABLE IF NOT EXISTS intakes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    medication_id INTEGER NOT NULL REFERENCES medications(id) ON DELETE CASCADE,
    date TEXT NOT NULL                           -- YYYY-MM-DDTHH:MM
);

CREATE INDEX IF NOT EXISTS idx_intakes_medication_date ON intakes(medication_id, date);
"#;
