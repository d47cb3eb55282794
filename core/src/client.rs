//! Zone record client: request building, write serialization, classification.
//!
//! # Design
//! `build_*` methods produce an `HttpRequest` and `parse_*` methods consume
//! an `HttpResponse`; neither touches the network. The operation methods
//! glue them to a `Session` and, for writes, to the `WriteGate`:
//!
//! 1. validate the record (a bad record never touches the gate);
//! 2. acquire the gate unless the call opted out;
//! 3. build and execute the request;
//! 4. classify the status;
//! 5. release the gate by dropping the permit, on every path.
//!
//! Reads never take the gate.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::{classify, expect_read_status};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::gate::WriteGate;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Session};
use crate::rdata::process_rdata;
use crate::types::{
    ListRecordsQuery, MutationRequest, Operation, RecordBody, RecordSetResponse, WriteOptions,
};
use crate::validate::validate;

/// Typed CRUD access to record sets of a zone management service.
#[derive(Debug)]
pub struct ZoneClient<S> {
    session: S,
    gate: Arc<WriteGate>,
    base_path: String,
}

impl<S: Session> ZoneClient<S> {
    /// Client with default configuration and its own global write gate.
    pub fn new(session: S) -> Self {
        Self::with_config(session, &ClientConfig::default())
    }

    pub fn with_config(session: S, config: &ClientConfig) -> Self {
        let gate = Arc::new(WriteGate::new(config.gate_scope));
        Self::with_gate(session, config, gate)
    }

    /// Client that contends on `gate` with every other client sharing it.
    /// `config.gate_scope` is ignored in favor of the gate's own scope.
    pub fn with_gate(session: S, config: &ClientConfig, gate: Arc<WriteGate>) -> Self {
        Self {
            session,
            gate,
            base_path: config.base_path.clone(),
        }
    }

    pub fn gate(&self) -> &Arc<WriteGate> {
        &self.gate
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn record_path(&self, zone: &str, name: &str, record_type: &str) -> String {
        format!(
            "{}/zones/{zone}/names/{name}/types/{record_type}",
            self.base_path
        )
    }

    /// Request for a create, update or delete of `record` in `zone`.
    ///
    /// Create and update carry the JSON record; delete has no body.
    pub fn build_mutation(
        &self,
        operation: Operation,
        zone: &str,
        record: &RecordBody,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.record_path(zone, &record.name, &record.record_type);
        let (headers, body) = match operation {
            Operation::Create | Operation::Update => {
                let body = serde_json::to_string(record)
                    .map_err(|e| ApiError::Serialization(e.to_string()))?;
                (json_headers(), Some(body))
            }
            Operation::Delete => (accept_headers(), None),
        };
        Ok(HttpRequest {
            method: operation.method(),
            path,
            headers,
            body,
        })
    }

    pub fn build_get_record(&self, zone: &str, name: &str, record_type: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.record_path(zone, name, record_type),
            headers: accept_headers(),
            body: None,
        }
    }

    /// Query values are form-encoded, so a search term cannot add parameters.
    pub fn build_list_records(&self, zone: &str, query: &ListRecordsQuery) -> HttpRequest {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("showAll", "true");
        if !query.types.is_empty() {
            params.append_pair("types", &query.types.join(","));
        }
        if let Some(search) = &query.search {
            params.append_pair("search", search);
        }
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}/zones/{zone}/recordsets?{}",
                self.base_path,
                params.finish()
            ),
            headers: accept_headers(),
            body: None,
        }
    }

    // -----------------------------------------------------------------------
    // Response parsers
    // -----------------------------------------------------------------------

    pub fn parse_get_record(&self, response: HttpResponse) -> Result<RecordBody, ApiError> {
        expect_read_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_list_records(
        &self,
        response: HttpResponse,
    ) -> Result<RecordSetResponse, ApiError> {
        expect_read_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Run one mutation through validation, the write gate and the session.
    pub fn mutate(&self, request: MutationRequest<'_>) -> Result<(), ApiError> {
        let MutationRequest {
            zone,
            operation,
            record,
            options,
        } = request;
        debug!(
            operation = operation.name(),
            zone,
            name = %record.name,
            record_type = %record.record_type,
            serialize = options.serialize,
            "mutating record set"
        );

        if let Err(err) = validate(record) {
            warn!(operation = operation.name(), zone, error = %err, "record rejected");
            return Err(err.into());
        }

        let _permit = self.gate.acquire(&request);
        let http = self.build_mutation(operation, zone, record)?;
        let response = self.session.execute(&http)?;
        classify(operation, &response)
    }

    pub fn create_record(&self, zone: &str, record: &RecordBody) -> Result<(), ApiError> {
        self.mutate(MutationRequest::create(zone, record))
    }

    pub fn create_record_with(
        &self,
        zone: &str,
        record: &RecordBody,
        options: WriteOptions,
    ) -> Result<(), ApiError> {
        self.mutate(MutationRequest::create(zone, record).with_options(options))
    }

    pub fn update_record(&self, zone: &str, record: &RecordBody) -> Result<(), ApiError> {
        self.mutate(MutationRequest::update(zone, record))
    }

    pub fn update_record_with(
        &self,
        zone: &str,
        record: &RecordBody,
        options: WriteOptions,
    ) -> Result<(), ApiError> {
        self.mutate(MutationRequest::update(zone, record).with_options(options))
    }

    pub fn delete_record(&self, zone: &str, record: &RecordBody) -> Result<(), ApiError> {
        self.mutate(MutationRequest::delete(zone, record))
    }

    pub fn delete_record_with(
        &self,
        zone: &str,
        record: &RecordBody,
        options: WriteOptions,
    ) -> Result<(), ApiError> {
        self.mutate(MutationRequest::delete(zone, record).with_options(options))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn get_record(
        &self,
        zone: &str,
        name: &str,
        record_type: &str,
    ) -> Result<RecordBody, ApiError> {
        debug!(zone, name, record_type, "get record set");
        let response = self
            .session
            .execute(&self.build_get_record(zone, name, record_type))?;
        self.parse_get_record(response)
    }

    pub fn list_records(
        &self,
        zone: &str,
        query: &ListRecordsQuery,
    ) -> Result<RecordSetResponse, ApiError> {
        debug!(zone, types = ?query.types, "list record sets");
        let response = self.session.execute(&self.build_list_records(zone, query))?;
        self.parse_list_records(response)
    }

    /// Targets of one record set, normalized by `process_rdata`.
    pub fn get_rdata(
        &self,
        zone: &str,
        name: &str,
        record_type: &str,
    ) -> Result<Vec<String>, ApiError> {
        let record = self.get_record(zone, name, record_type)?;
        Ok(process_rdata(&record.target, &record.record_type))
    }
}

fn accept_headers() -> Vec<(String, String)> {
    vec![("accept".to_string(), "application/json".to_string())]
}

fn json_headers() -> Vec<(String, String)> {
    vec![
        ("accept".to_string(), "application/json".to_string()),
        ("content-type".to_string(), "application/json".to_string()),
    ]
}
