// src/dedupe.rs
use std::collections::HashSet;

use crate::models::EntityRecord;

/// Remove duplicate records by lowercased `name|address`, keeping the first
/// occurrence in the original order. Records missing both fields share the
/// `"|"` key and collapse into one; that is intended behavior, not a bug.
pub fn dedupe(records: Vec<EntityRecord>) -> Vec<EntityRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;
    use chrono::Utc;

    fn record(name: &str, address: &str, phone: &str) -> EntityRecord {
        EntityRecord {
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
            email: String::new(),
            website: String::new(),
            entity_type: EntityKind::Unknown,
            scraped_at: Utc::now(),
            source_type: "directories".to_string(),
            source_region: "all".to_string(),
        }
    }

    #[test]
    fn keeps_first_occurrence_of_duplicate_pairs() {
        let records = vec![
            record("Lakeside HOA", "1 Lake Rd", "first"),
            record("lakeside hoa", "1 LAKE RD", "second"),
            record("Other", "2 Main St", "third"),
        ];
        let deduped = dedupe(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].phone, "first");
        assert_eq!(deduped[1].name, "Other");
    }

    #[test]
    fn is_idempotent() {
        let records = vec![
            record("A", "1", ""),
            record("A", "1", ""),
            record("B", "2", ""),
        ];
        let once = dedupe(records);
        let twice = dedupe(once.clone());
        assert_eq!(once.len(), twice.len());
        assert!(once.len() <= 3);
    }

    #[test]
    fn same_name_different_address_both_survive() {
        let records = vec![record("A", "1 First St", ""), record("A", "2 Second St", "")];
        assert_eq!(dedupe(records).len(), 2);
    }

    #[test]
    fn blank_name_and_address_records_collapse() {
        let records = vec![record("", "", "first"), record("", "", "second")];
        let deduped = dedupe(records);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].phone, "first");
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
