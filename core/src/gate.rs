//! Write gate: at most one in-flight mutation per resource scope.
//!
//! # Design
//! The zone management service bumps the zone's SOA serial on every write.
//! Two writes racing from the same process can bump it out of order, so every
//! mutating call passes through a `WriteGate` first.
//!
//! - The gate is an ordinary value owned by the client (usually behind an
//!   `Arc`), never a process-wide static. Clients that must contend share one
//!   gate; independent clients and tests get independent gates.
//! - `GateScope::Global` serializes every write through the gate;
//!   `GateScope::PerZone` serializes only writes to the same zone.
//! - Acquisition blocks without a timeout. A writer stuck forever is a wedged
//!   session and must not let a second writer in.
//! - The permit releases on `Drop`, so early returns, errors and unwinding
//!   all free the scope. `parking_lot` locks do not poison.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::error::ConfigError;
use crate::types::MutationRequest;

/// Granularity of write serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateScope {
    /// One writer at a time across all zones.
    #[default]
    Global,
    /// One writer at a time per zone; different zones proceed concurrently.
    PerZone,
}

impl FromStr for GateScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(GateScope::Global),
            "zone" | "per-zone" | "per_zone" => Ok(GateScope::PerZone),
            _ => Err(ConfigError::InvalidGateScope(s.to_string())),
        }
    }
}

impl fmt::Display for GateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateScope::Global => f.write_str("global"),
            GateScope::PerZone => f.write_str("zone"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot {
    Global,
    Zone(String),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Global => f.write_str("global"),
            Slot::Zone(zone) => write!(f, "zone:{zone}"),
        }
    }
}

/// Serializes mutating calls. See the module docs.
pub struct WriteGate {
    scope: GateScope,
    held: Mutex<HashSet<Slot>>,
    released: Condvar,
}

impl Default for WriteGate {
    fn default() -> Self {
        Self::new(GateScope::default())
    }
}

impl fmt::Debug for WriteGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteGate")
            .field("scope", &self.scope)
            .field("held", &self.held.lock().len())
            .finish()
    }
}

impl WriteGate {
    pub fn new(scope: GateScope) -> Self {
        Self {
            scope,
            held: Mutex::new(HashSet::new()),
            released: Condvar::new(),
        }
    }

    pub fn scope(&self) -> GateScope {
        self.scope
    }

    /// Take the gate for `request`, blocking until its scope is free.
    ///
    /// When `request.options.serialize` is false this returns at once with a
    /// permit that holds nothing; the caller orders its own writes.
    pub fn acquire(&self, request: &MutationRequest<'_>) -> WritePermit<'_> {
        if !request.options.serialize {
            trace!(zone = request.zone, "write gate bypassed");
            return WritePermit {
                gate: self,
                slot: None,
            };
        }
        self.lock(request.zone)
    }

    /// Take the gate for `zone` unconditionally.
    pub fn lock(&self, zone: &str) -> WritePermit<'_> {
        let slot = self.slot_for(zone);
        let mut held = self.held.lock();
        while held.contains(&slot) {
            trace!(zone, %slot, "waiting for write gate");
            self.released.wait(&mut held);
        }
        held.insert(slot.clone());
        trace!(zone, %slot, "write gate acquired");
        WritePermit {
            gate: self,
            slot: Some(slot),
        }
    }

    /// Whether a writer currently holds the scope covering `zone`.
    pub fn is_held(&self, zone: &str) -> bool {
        self.held.lock().contains(&self.slot_for(zone))
    }

    fn slot_for(&self, zone: &str) -> Slot {
        match self.scope {
            GateScope::Global => Slot::Global,
            GateScope::PerZone => Slot::Zone(normalize_zone(zone)),
        }
    }

    fn unlock(&self, slot: &Slot) {
        let mut held = self.held.lock();
        held.remove(slot);
        drop(held);
        self.released.notify_all();
    }
}

/// `Example.COM.` and `example.com` name the same zone.
fn normalize_zone(zone: &str) -> String {
    zone.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Proof of gate ownership for one mutation. Dropping it releases the scope.
#[must_use = "the write gate is released as soon as the permit is dropped"]
pub struct WritePermit<'a> {
    gate: &'a WriteGate,
    slot: Option<Slot>,
}

impl WritePermit<'_> {
    /// False for permits handed out to unserialized requests.
    pub fn is_exclusive(&self) -> bool {
        self.slot.is_some()
    }

    pub fn release(self) {}
}

impl fmt::Debug for WritePermit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WritePermit")
            .field("exclusive", &self.is_exclusive())
            .finish()
    }
}

impl Drop for WritePermit<'_> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            self.gate.unlock(&slot);
            trace!(%slot, "write gate released");
        }
    }
}
