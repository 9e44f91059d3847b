pub mod error;
pub mod provider;
pub mod types;
pub mod xml;

use crate::domain::pharmacy::PharmacyRecord;
use self::types::RawEntry;

/// Convert raw entries to records, skipping malformed ones with a warning.
/// One bad entry must not block the rest of the set.
pub fn normalize_records(entries: Vec<RawEntry>) -> Vec<PharmacyRecord> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry_id = entry.id.clone();
        match entry.into_record() {
            Ok(record) => out.push(record),
            Err(err) => {
                tracing::warn!(entry_id = %entry_id, error = %err, "skipping malformed feed entry");
            }
        }
    }
    out
}
