//! Domain DTOs for the zone record API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. Record sets are
//! addressed by `zone / name / type`, so `RecordBody` carries everything a
//! request path needs.

use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;

/// A record set as sent to and returned by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ttl: u32,
    #[serde(rename = "rdata", default, skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<String>,
}

fn is_zero(ttl: &u32) -> bool {
    *ttl == 0
}

impl RecordBody {
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
        target: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl,
            target: target.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response of the record set listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordSetResponse {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub recordsets: Vec<RecordBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub show_all: bool,
    #[serde(default)]
    pub total_elements: usize,
}

/// Filters for `ZoneClient::list_records`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRecordsQuery {
    /// Only return record sets of these types.
    pub types: Vec<String>,
    /// Substring match on the owner name.
    pub search: Option<String>,
}

impl ListRecordsQuery {
    pub fn of_type(record_type: impl Into<String>) -> Self {
        Self {
            types: vec![record_type.into()],
            search: None,
        }
    }
}

/// The three mutating operations.
///
/// Each is tied to exactly one success status by the remote contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn method(self) -> HttpMethod {
        match self {
            Operation::Create => HttpMethod::Post,
            Operation::Update => HttpMethod::Put,
            Operation::Delete => HttpMethod::Delete,
        }
    }

    pub fn expected_status(self) -> u16 {
        match self {
            Operation::Create => 201,
            Operation::Update => 200,
            Operation::Delete => 204,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Per-call options for mutating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Hold the write gate for the duration of the call. Callers that already
    /// order their writes externally may turn this off.
    pub serialize: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { serialize: true }
    }
}

impl WriteOptions {
    pub fn unserialized() -> Self {
        Self { serialize: false }
    }
}

/// A single mutation as seen by the write gate.
#[derive(Debug, Clone, Copy)]
pub struct MutationRequest<'a> {
    pub zone: &'a str,
    pub operation: Operation,
    pub record: &'a RecordBody,
    pub options: WriteOptions,
}

impl<'a> MutationRequest<'a> {
    pub fn new(operation: Operation, zone: &'a str, record: &'a RecordBody) -> Self {
        Self {
            zone,
            operation,
            record,
            options: WriteOptions::default(),
        }
    }

    pub fn create(zone: &'a str, record: &'a RecordBody) -> Self {
        Self::new(Operation::Create, zone, record)
    }

    pub fn update(zone: &'a str, record: &'a RecordBody) -> Self {
        Self::new(Operation::Update, zone, record)
    }

    pub fn delete(zone: &'a str, record: &'a RecordBody) -> Self {
        Self::new(Operation::Delete, zone, record)
    }

    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_body_uses_wire_names() {
        let record = RecordBody::new("www.example.com", "A", 300, ["192.0.2.1"]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "www.example.com");
        assert_eq!(json["type"], "A");
        assert_eq!(json["ttl"], 300);
        assert_eq!(json["rdata"][0], "192.0.2.1");
    }

    #[test]
    fn record_body_omits_empty_fields() {
        let record = RecordBody {
            name: "www.example.com".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("type").is_none());
        assert!(json.get("ttl").is_none());
        assert!(json.get("rdata").is_none());
    }

    #[test]
    fn record_set_response_tolerates_missing_metadata() {
        let parsed: RecordSetResponse = serde_json::from_str(
            r#"{"recordsets":[{"name":"a.example.com","type":"A","ttl":60,"rdata":["192.0.2.7"]}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.recordsets.len(), 1);
        assert_eq!(parsed.metadata, Metadata::default());
    }

    #[test]
    fn operations_map_to_single_success_status() {
        assert_eq!(Operation::Create.expected_status(), 201);
        assert_eq!(Operation::Update.expected_status(), 200);
        assert_eq!(Operation::Delete.expected_status(), 204);
        assert_eq!(Operation::Create.method(), HttpMethod::Post);
        assert_eq!(Operation::Update.method(), HttpMethod::Put);
        assert_eq!(Operation::Delete.method(), HttpMethod::Delete);
    }

    #[test]
    fn mutation_requests_serialize_by_default() {
        let record = RecordBody::default();
        let req = MutationRequest::create("example.com", &record);
        assert!(req.options.serialize);
        let req = req.with_options(WriteOptions::unserialized());
        assert!(!req.options.serialize);
    }
}
