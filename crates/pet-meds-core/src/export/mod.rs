//! Medication history export (JSON and CSV) for vet visits and records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{to_db_time, Database, DbResult, HistoryFilter};
use crate::models::{HistoryEntry, HistoryStatus};

/// One exported history line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryExportLine {
    pub scheduled_time: String,
    pub status: HistoryStatus,
    pub pet_id: String,
    /// `None` once the pet has been deleted
    pub pet_name: Option<String>,
    pub medication_id: String,
    /// `None` once the medication has been deleted
    pub medication_name: Option<String>,
    pub dosage: String,
    pub recorded_at: String,
}

/// Export metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryExportMetadata {
    pub format_version: String,
    pub exported_at: String,
    pub user_id: String,
    pub pet_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub given_count: u32,
    pub missed_count: u32,
}

/// A user's history, newest scheduled first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryExport {
    pub metadata: HistoryExportMetadata,
    pub lines: Vec<HistoryExportLine>,
}

impl HistoryExport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("scheduled_time,status,pet,medication,dosage,recorded_at\n");

        for line in &self.lines {
            let status = match line.status {
                HistoryStatus::Given => "given",
                HistoryStatus::Missed => "missed",
            };
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                line.scheduled_time,
                status,
                escape_csv(line.pet_name.as_deref().unwrap_or(&line.pet_id)),
                escape_csv(line.medication_name.as_deref().unwrap_or(&line.medication_id)),
                escape_csv(&line.dosage),
                line.recorded_at,
            ));
        }

        csv
    }
}

/// History exporter.
pub struct HistoryExporter<'a> {
    db: &'a Database,
}

impl<'a> HistoryExporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Export the history matching `filter`.
    pub fn export(
        &self,
        user_id: &str,
        filter: &HistoryFilter,
        now: DateTime<Utc>,
    ) -> DbResult<HistoryExport> {
        let entries = self.db.list_history(user_id, filter)?;

        let mut lines = Vec::with_capacity(entries.len());
        for entry in &entries {
            lines.push(self.line(user_id, entry)?);
        }

        let count = |status| entries.iter().filter(|e| e.status == status).count() as u32;

        Ok(HistoryExport {
            metadata: HistoryExportMetadata {
                format_version: "1.0".to_string(),
                exported_at: now.to_rfc3339(),
                user_id: user_id.to_string(),
                pet_id: filter.pet_id.clone(),
                start: filter.start.as_ref().map(to_db_time),
                end: filter.end.as_ref().map(to_db_time),
                given_count: count(HistoryStatus::Given),
                missed_count: count(HistoryStatus::Missed),
            },
            lines,
        })
    }

    fn line(&self, user_id: &str, entry: &HistoryEntry) -> DbResult<HistoryExportLine> {
        let pet_name = self.db.get_pet(&entry.pet_id, user_id)?.map(|p| p.name);
        let medication_name = self
            .db
            .get_medication_for_user(&entry.medication_id, user_id)?
            .map(|m| m.name);

        Ok(HistoryExportLine {
            scheduled_time: to_db_time(&entry.scheduled_time),
            status: entry.status,
            pet_id: entry.pet_id.clone(),
            pet_name,
            medication_id: entry.medication_id.clone(),
            medication_name,
            dosage: entry.dosage.clone(),
            recorded_at: entry.created_at.clone(),
        })
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
