//! Typed client core for a DNS zone record management service.
//!
//! # Overview
//! Creates, updates, deletes and reads record sets addressed by
//! `zone / name / type`. The service bumps each zone's SOA serial on every
//! write, so mutations from one process pass through a `WriteGate` that
//! admits one in-flight write at a time.
//!
//! # Design
//! - `ZoneClient` owns its gate (or shares one via `Arc`); there is no
//!   process-wide lock.
//! - Records are validated before the gate is taken.
//! - Each operation has exactly one success status: create 201, update 200,
//!   delete 204. Anything else is `ApiError::Remote`.
//! - Executing requests is a `Session`'s job. `UreqSession` is a blocking
//!   implementation; tests substitute doubles.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod rdata;
pub mod session;
pub mod types;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use classify::{classify, expect_read_status, expect_status};
pub use client::ZoneClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, Problem, RemoteError, TransportError, ValidationError};
pub use gate::{GateScope, WriteGate, WritePermit};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Session};
pub use rdata::{full_ipv6, pad_coordinates, process_rdata};
pub use session::UreqSession;
pub use types::{
    ListRecordsQuery, Metadata, MutationRequest, Operation, RecordBody, RecordSetResponse,
    WriteOptions,
};
pub use validate::validate;
