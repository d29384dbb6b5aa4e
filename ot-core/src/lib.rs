#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]

//! # ot-core – shared plumbing for the OpenTrip NGSI-LD scenario service
//!
//! This crate holds everything that is not specific to the banana-shipment narrative:
//!
//! * [`ngsi`] – the generic NGSI-LD entity representation (Property/Relationship attributes keyed
//!   by name, in insertion order) and its wire serialization.
//! * [`broker`] – an async client for the context broker that creates and deletes entities one at a
//!   time, tolerating partial failure across a batch.
//! * [`logging`] – crate-standard `tracing` setup shared by the binaries.

pub mod broker;
pub mod logging;
pub mod ngsi;

pub use broker::{
    BrokerClient,
    BrokerError,
    DeleteSummary,
    PublishSummary,
};
pub use ngsi::{
    Attribute,
    Entity,
    PropertyValue,
    DATA_MODEL_CONTEXT,
};
