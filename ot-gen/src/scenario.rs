//! The banana shipment scenario.
//!
//! The Banana Company ships a container to its customer's storage at the port:
//! - load the truck at the Banana Company (start)
//! - start driving to the port (start + 30 min)
//! - stop driving on arrival (start + 1 day)
//! - the customer receives the bananas at the port (start + 1 day 1 h)
//! - the truck is unloaded at the port (start + 1 day 2 h)
//!
//! Every generation call builds the objects anew and classifies each event against the reference
//! time it was given. Ids are fixed slugs, so repeated calls address the same broker entities.
use std::collections::BTreeMap;

use chrono::{
    DateTime,
    TimeDelta,
    Utc,
};
use tracing::{
    debug,
    instrument,
};

use crate::model::{
    Classifier,
    Event,
    Location,
    LocationKind,
    NgsiKind,
    ScenarioObject,
    Shipment,
    Trip,
    Vehicle,
    VehicleKind,
};

/// 2020-12-12T12:00:00Z
const SCENARIO_START_EPOCH_SECONDS: i64 = 1_607_774_400;

/// Loading the truck at the Banana Company, in minutes after the start.
pub const LOADING_OFFSET_MINUTES: i64 = 0;
/// Leaving for the port.
pub const START_DRIVING_OFFSET_MINUTES: i64 = 30;
/// Arriving at the port.
pub const STOP_DRIVING_OFFSET_MINUTES: i64 = 24 * 60;
/// The customer receiving the bananas.
pub const RECEIVE_OFFSET_MINUTES: i64 = 25 * 60;
/// Unloading the truck at the port.
pub const UNLOADING_OFFSET_MINUTES: i64 = 26 * 60;

/// Time the scenario's first event happens at; also the default reference time.
#[must_use]
pub fn scenario_start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(SCENARIO_START_EPOCH_SECONDS)
}

/// Turn the optional caller inputs into a reference time.
///
/// `epoch_seconds` wins over `hour_offset`; with neither the scenario start is used. Returns `None`
/// when the requested instant is outside the representable range.
#[must_use]
pub fn resolve_reference_time(hour_offset: Option<i64>, epoch_seconds: Option<i64>) -> Option<DateTime<Utc>> {
    match (epoch_seconds, hour_offset) {
        (Some(secs), _) => DateTime::<Utc>::from_timestamp(secs, 0),
        (None, Some(hours)) => TimeDelta::try_hours(hours).and_then(|d| scenario_start().checked_add_signed(d)),
        (None, None) => Some(scenario_start()),
    }
}

/// Build the scenario, keyed by trip id.
///
/// Objects are returned in a fixed order: locations, shipment, vehicle, trip, then the events in
/// chronological order.
#[must_use]
#[instrument(level = "debug")]
pub fn generate(reference_time: DateTime<Utc>) -> BTreeMap<String, Vec<ScenarioObject>> {
    let start = scenario_start();

    let banana_company = Location {
        id: Location::ngsi_id("banana-company-id"),
        name: Some("The Banana Company".into()),
        remarks: None,
        location_type: Some(Classifier::Other("shipper".into())),
    };
    let port_storage = Location {
        id: Location::ngsi_id("port-storage-id"),
        name: Some("Port storage".into()),
        remarks: None,
        location_type: Some(Classifier::Known(LocationKind::Warehouse)),
    };
    let banana_customer = Location {
        id: Location::ngsi_id("banana-customer-id"),
        name: Some("Banana Customer".into()),
        remarks: None,
        location_type: Some(Classifier::Known(LocationKind::Customer)),
    };
    let banana_shipment = Shipment {
        id: Shipment::ngsi_id("banana-shipment-id"),
        goods_type: "Container".into(),
        physical_sender: Some(banana_company.id.clone()),
        legal_sender: Some(banana_company.id.clone()),
        physical_addressee: Some(port_storage.id.clone()),
        legal_addressee: Some(banana_customer.id.clone()),
    };
    let banana_truck = Vehicle {
        id: Vehicle::ngsi_id("banana-truck-id"),
        name: Some("Banana Truck".into()),
        vehicle_type: Some(Classifier::Known(VehicleKind::BoxTruck)),
    };
    let transport_trip = Trip {
        id: Trip::ngsi_id("transport-trip-id"),
        name: Some("Banana Company to Port Storage".into()),
    };

    let event = |slug: &str, event_type: &str, involved: &[&String], offset_minutes: i64| {
        Event::new(
            Event::ngsi_id(slug),
            event_type,
            involved.iter().map(|id| (*id).clone()).collect(),
            start + TimeDelta::minutes(offset_minutes),
            reference_time,
        )
    };
    let events = [
        event(
            "loading-event-id",
            "loadShipmentEvent",
            &[&banana_shipment.id, &banana_truck.id],
            LOADING_OFFSET_MINUTES,
        ),
        event("start-driving-event", "startMovingEvent", &[&banana_truck.id], START_DRIVING_OFFSET_MINUTES),
        event("stop-driving-event", "stopMovingEvent", &[&banana_truck.id], STOP_DRIVING_OFFSET_MINUTES),
        event(
            "receive-bananas-event",
            "receiveShipmentEvent",
            &[&port_storage.id, &banana_shipment.id],
            RECEIVE_OFFSET_MINUTES,
        ),
        event(
            "unloading-event-id",
            "unloadShipmentEvent",
            &[&banana_shipment.id, &banana_truck.id],
            UNLOADING_OFFSET_MINUTES,
        ),
    ];

    for e in &events {
        debug!(id = %e.id, phase = %e.lifecycle_phase(), "classified event");
    }

    let trip_id = transport_trip.id.clone();
    let mut objects: Vec<ScenarioObject> = vec![
        banana_company.into(),
        port_storage.into(),
        banana_customer.into(),
        banana_shipment.into(),
        banana_truck.into(),
        transport_trip.into(),
    ];
    objects.extend(events.into_iter().map(ScenarioObject::from));

    BTreeMap::from([(trip_id, objects)])
}
