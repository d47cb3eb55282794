//! In-memory stand-in for the zone record management API.
//!
//! Every successful write bumps the zone's SOA serial. Writes are also
//! counted while in flight, so tests can check that a client never had two
//! mutations outstanding at once. An optional per-write delay widens the
//! window in which overlapping writes would be caught.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordSet {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub rdata: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub zone: String,
    pub types: Vec<String>,
    pub show_all: bool,
    pub total_elements: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordSetList {
    pub metadata: Metadata,
    pub recordsets: Vec<RecordSet>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    pub zone: String,
    pub soa_serial: u32,
    pub record_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub detail: String,
    pub status: u16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub types: Option<String>,
    pub search: Option<String>,
    pub show_all: Option<bool>,
}

#[derive(Debug, Default)]
struct Zone {
    serial: u32,
    records: BTreeMap<(String, String), RecordSet>,
}

/// Shared server state. Hold an `Arc` to inspect it from tests.
#[derive(Debug, Default)]
pub struct MockState {
    zones: RwLock<HashMap<String, Zone>>,
    write_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    writes: AtomicUsize,
}

impl MockState {
    pub fn new<'a>(zones: impl IntoIterator<Item = &'a str>) -> Self {
        let zones = zones
            .into_iter()
            .map(|z| {
                (
                    zone_key(z),
                    Zone {
                        serial: 1,
                        records: BTreeMap::new(),
                    },
                )
            })
            .collect();
        Self {
            zones: RwLock::new(zones),
            ..Default::default()
        }
    }

    /// Hold every write for `delay` before applying it.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    pub async fn serial(&self, zone: &str) -> Option<u32> {
        self.zones.read().await.get(&zone_key(zone)).map(|z| z.serial)
    }

    /// Highest number of writes ever in flight at the same time.
    pub fn max_concurrent_writes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of write requests received, successful or not.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

pub type Db = Arc<MockState>;

type Failure = (StatusCode, Json<Problem>);

fn problem(status: StatusCode, title: &str, detail: impl Into<String>) -> Failure {
    (
        status,
        Json(Problem {
            kind: format!("https://problems.mock/{}", status.as_u16()),
            title: title.to_string(),
            detail: detail.into(),
            status: status.as_u16(),
        }),
    )
}

fn zone_not_found(zone: &str) -> Failure {
    problem(
        StatusCode::NOT_FOUND,
        "Zone Not Found",
        format!("zone {zone} does not exist"),
    )
}

fn record_not_found(zone: &str, name: &str, record_type: &str) -> Failure {
    problem(
        StatusCode::NOT_FOUND,
        "Record Set Not Found",
        format!("{name} {record_type} does not exist in {zone}"),
    )
}

fn zone_key(zone: &str) -> String {
    zone.trim_end_matches('.').to_ascii_lowercase()
}

fn record_key(name: &str, record_type: &str) -> (String, String) {
    (name.to_ascii_lowercase(), record_type.to_ascii_uppercase())
}

/// Counts a write as in flight until dropped.
struct InFlight<'a>(&'a MockState);

impl<'a> InFlight<'a> {
    async fn enter(state: &'a MockState) -> InFlight<'a> {
        state.writes.fetch_add(1, Ordering::SeqCst);
        let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !state.write_delay.is_zero() {
            tokio::time::sleep(state.write_delay).await;
        }
        InFlight(state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

const RECORD_PATH: &str = "/config-dns/v2/zones/{zone}/names/{name}/types/{type}";

pub fn app() -> Router {
    app_with_state(Arc::new(MockState::new(["example.com"])))
}

pub fn app_with_state(state: Db) -> Router {
    Router::new()
        .route("/config-dns/v2/zones/{zone}", get(get_zone))
        .route("/config-dns/v2/zones/{zone}/recordsets", get(list_records))
        .route(
            RECORD_PATH,
            get(get_record)
                .post(create_record)
                .put(update_record)
                .delete(delete_record),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn get_zone(
    State(db): State<Db>,
    Path(zone): Path<String>,
) -> Result<Json<ZoneInfo>, Failure> {
    let zones = db.zones.read().await;
    let z = zones
        .get(&zone_key(&zone))
        .ok_or_else(|| zone_not_found(&zone))?;
    Ok(Json(ZoneInfo {
        zone: zone_key(&zone),
        soa_serial: z.serial,
        record_count: z.records.len(),
    }))
}

async fn list_records(
    State(db): State<Db>,
    Path(zone): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<RecordSetList>, Failure> {
    let zones = db.zones.read().await;
    let z = zones
        .get(&zone_key(&zone))
        .ok_or_else(|| zone_not_found(&zone))?;

    let types: Vec<String> = params
        .types
        .as_deref()
        .map(|t| {
            t.split(',')
                .filter(|s| !s.is_empty())
                .map(|s| s.to_ascii_uppercase())
                .collect()
        })
        .unwrap_or_default();
    let recordsets: Vec<RecordSet> = z
        .records
        .values()
        .filter(|r| types.is_empty() || types.contains(&r.record_type.to_ascii_uppercase()))
        .filter(|r| {
            params
                .search
                .as_deref()
                .map_or(true, |s| r.name.contains(s))
        })
        .cloned()
        .collect();

    Ok(Json(RecordSetList {
        metadata: Metadata {
            zone: zone_key(&zone),
            types,
            show_all: params.show_all.unwrap_or(false),
            total_elements: recordsets.len(),
        },
        recordsets,
    }))
}

async fn get_record(
    State(db): State<Db>,
    Path((zone, name, record_type)): Path<(String, String, String)>,
) -> Result<Json<RecordSet>, Failure> {
    let zones = db.zones.read().await;
    zones
        .get(&zone_key(&zone))
        .and_then(|z| z.records.get(&record_key(&name, &record_type)))
        .cloned()
        .map(Json)
        .ok_or_else(|| record_not_found(&zone, &name, &record_type))
}

/// Reject bodies that do not match the path or lack required fields.
fn check_body(name: &str, record_type: &str, body: &RecordSet) -> Result<(), Failure> {
    if !body.name.eq_ignore_ascii_case(name)
        || !body.record_type.eq_ignore_ascii_case(record_type)
    {
        return Err(problem(
            StatusCode::BAD_REQUEST,
            "Invalid Record Set",
            "record name and type must match the request path",
        ));
    }
    if body.ttl == 0 || body.rdata.is_empty() {
        return Err(problem(
            StatusCode::BAD_REQUEST,
            "Invalid Record Set",
            "ttl and rdata are required",
        ));
    }
    Ok(())
}

async fn create_record(
    State(db): State<Db>,
    Path((zone, name, record_type)): Path<(String, String, String)>,
    Json(input): Json<RecordSet>,
) -> Result<(StatusCode, Json<RecordSet>), Failure> {
    let _in_flight = InFlight::enter(&db).await;
    check_body(&name, &record_type, &input)?;

    let mut zones = db.zones.write().await;
    let z = zones
        .get_mut(&zone_key(&zone))
        .ok_or_else(|| zone_not_found(&zone))?;
    let key = record_key(&name, &record_type);
    if z.records.contains_key(&key) {
        return Err(problem(
            StatusCode::CONFLICT,
            "Record Set Exists",
            format!("{name} {record_type} already exists in {zone}"),
        ));
    }
    z.records.insert(key, input.clone());
    z.serial += 1;
    info!(%zone, %name, %record_type, serial = z.serial, "record set created");
    Ok((StatusCode::CREATED, Json(input)))
}

async fn update_record(
    State(db): State<Db>,
    Path((zone, name, record_type)): Path<(String, String, String)>,
    Json(input): Json<RecordSet>,
) -> Result<Json<RecordSet>, Failure> {
    let _in_flight = InFlight::enter(&db).await;
    check_body(&name, &record_type, &input)?;

    let mut zones = db.zones.write().await;
    let z = zones
        .get_mut(&zone_key(&zone))
        .ok_or_else(|| zone_not_found(&zone))?;
    let existing = z
        .records
        .get_mut(&record_key(&name, &record_type))
        .ok_or_else(|| record_not_found(&zone, &name, &record_type))?;
    *existing = input.clone();
    z.serial += 1;
    info!(%zone, %name, %record_type, serial = z.serial, "record set updated");
    Ok(Json(input))
}

async fn delete_record(
    State(db): State<Db>,
    Path((zone, name, record_type)): Path<(String, String, String)>,
) -> Result<StatusCode, Failure> {
    let _in_flight = InFlight::enter(&db).await;

    let mut zones = db.zones.write().await;
    let z = zones
        .get_mut(&zone_key(&zone))
        .ok_or_else(|| zone_not_found(&zone))?;
    if z.records.remove(&record_key(&name, &record_type)).is_none() {
        return Err(record_not_found(&zone, &name, &record_type));
    }
    z.serial += 1;
    info!(%zone, %name, %record_type, serial = z.serial, "record set deleted");
    Ok(StatusCode::NO_CONTENT)
}
