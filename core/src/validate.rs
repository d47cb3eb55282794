//! Required-field checks run before a record reaches the write gate.

use crate::error::ValidationError;
use crate::types::RecordBody;

/// Check that `record` has a name, a type, a positive TTL and at least one
/// target. Every failing field is reported, not just the first.
pub fn validate(record: &RecordBody) -> Result<(), ValidationError> {
    let mut fields = Vec::new();
    if record.name.trim().is_empty() {
        fields.push("name");
    }
    if record.record_type.trim().is_empty() {
        fields.push("type");
    }
    if record.ttl == 0 {
        fields.push("ttl");
    }
    if record.target.is_empty() {
        fields.push("rdata");
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_record_passes() {
        let record = RecordBody::new("www.example.com", "A", 300, ["192.0.2.1"]);
        assert!(validate(&record).is_ok());
    }

    #[test]
    fn empty_record_reports_every_field() {
        let err = validate(&RecordBody::default()).unwrap_err();
        assert_eq!(err.fields, vec!["name", "type", "ttl", "rdata"]);
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let record = RecordBody::new("www.example.com", "A", 0, ["192.0.2.1"]);
        assert_eq!(validate(&record).unwrap_err().fields, vec!["ttl"]);
    }

    #[test]
    fn blank_name_is_rejected() {
        let record = RecordBody::new("  ", "TXT", 60, ["\"hello\""]);
        assert_eq!(validate(&record).unwrap_err().fields, vec!["name"]);
    }

    #[test]
    fn missing_targets_are_rejected() {
        let record = RecordBody::new("mail.example.com", "MX", 3600, Vec::<String>::new());
        assert_eq!(validate(&record).unwrap_err().fields, vec!["rdata"]);
    }
}
