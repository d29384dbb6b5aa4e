#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]

//! # ot-server – HTTP surface of the OpenTrip demo scenario
//!
//! | route          | effect                                                        |
//! |----------------|---------------------------------------------------------------|
//! | `GET /trip`    | scenario as a JSON array of NGSI-LD entities                  |
//! | `POST /trip`   | create every entity at the broker, recreating existing ones   |
//! | `DELETE /trip` | delete every scenario entity from the broker, best effort     |
//! | `GET /health`  | liveness                                                      |
//!
//! `GET` and `POST` accept `hourOffset` (hours after the scenario start) or `time` (seconds
//! since the epoch) to choose the reference time the event lifecycle phases are computed for.

pub mod config;
pub mod routes;

use ot_core::BrokerClient;
use rocket::{
    Build,
    Rocket,
};

pub use crate::config::ServerConfig;

/// Assemble the Rocket instance with `broker` as managed state.
#[must_use]
pub fn build(broker: BrokerClient, config: rocket::Config) -> Rocket<Build> {
    rocket::custom(config).manage(broker).mount("/", routes::routes())
}
