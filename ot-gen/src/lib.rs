#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]

//! # ot-gen – OpenTrip demonstration scenario
//!
//! ot-gen builds the fixed "banana shipment" trip and turns it into NGSI-LD entities.
//!
//! ## Pipeline overview
//! 1. Scenario generation ([`generate`](crate::scenario::generate)) – Build three locations, a
//!    shipment, a truck, the trip and five events, and classify each event as planned, actual or
//!    realized relative to a reference time.
//! 2. Entity mapping ([`to_entities`](crate::mapping::to_entities)) – Convert every scenario
//!    object into an [`ot_core::Entity`] with Property and Relationship attributes.
//!
//! [`scenario_entities`] chains both steps and is what the CLI and the web service use. Both
//! steps are pure: no I/O, no shared state, identical output for identical reference times.

pub mod mapping;
pub mod model;
pub mod scenario;

use chrono::{
    DateTime,
    Utc,
};
pub use mapping::to_entities;
pub use model::{
    Event,
    LifecyclePhase,
    Location,
    ScenarioObject,
    Shipment,
    Trip,
    Vehicle,
};
use ot_core::Entity;
pub use scenario::{
    generate,
    resolve_reference_time,
    scenario_start,
};

/// Generate the scenario for `reference_time` and map every trip's objects to entities.
#[must_use]
pub fn scenario_entities(reference_time: DateTime<Utc>) -> Vec<Entity> {
    generate(reference_time)
        .iter()
        .flat_map(|(trip_id, objects)| to_entities(trip_id, objects))
        .collect()
}
