//! Scenario objects to NGSI-LD entities.
//!
//! One conversion function per object kind, plus [`to_entities`] which dispatches over a whole
//! scenario list. Optional fields that are unset are left out of the entity entirely.
use ot_core::Entity;

use crate::model::{
    Event,
    Location,
    NgsiKind,
    ScenarioObject,
    Shipment,
    Trip,
    Vehicle,
};

/// Locations carry `remarks`, `name` and `locationType` when set.
#[must_use]
pub fn location_to_entity(location: &Location) -> Entity {
    let mut entity = Entity::new(Location::KIND, &location.id);
    if let Some(remarks) = &location.remarks {
        entity.put_property("remarks", remarks.as_str());
    }
    if let Some(name) = &location.name {
        entity.put_property("name", name.as_str());
    }
    if let Some(location_type) = &location.location_type {
        entity.put_property("locationType", location_type.resolve());
    }
    entity
}

/// Vehicles carry `name` and `vehicleType` when set.
#[must_use]
pub fn vehicle_to_entity(vehicle: &Vehicle) -> Entity {
    let mut entity = Entity::new(Vehicle::KIND, &vehicle.id);
    if let Some(name) = &vehicle.name {
        entity.put_property("name", name.as_str());
    }
    if let Some(vehicle_type) = &vehicle.vehicle_type {
        entity.put_property("vehicleType", vehicle_type.resolve());
    }
    entity
}

/// Shipments only carry relationships to their parties; the goods type is not published.
#[must_use]
pub fn shipment_to_entity(shipment: &Shipment) -> Entity {
    let mut entity = Entity::new(Shipment::KIND, &shipment.id);
    let parties = [
        ("physicalSender", &shipment.physical_sender),
        ("legalSender", &shipment.legal_sender),
        ("legalAddressee", &shipment.legal_addressee),
        ("physicalAddressee", &shipment.physical_addressee),
    ];
    for (field, party) in parties {
        if let Some(id) = party {
            entity.put_relationship(field, id.as_str());
        }
    }
    entity
}

/// Trips carry only `name` when set.
#[must_use]
pub fn trip_to_entity(trip: &Trip) -> Entity {
    let mut entity = Entity::new(Trip::KIND, &trip.id);
    if let Some(name) = &trip.name {
        entity.put_property("name", name.as_str());
    }
    entity
}

/// Events get one `involvedObject<i>` relationship per involved object, numbered from zero in
/// list order, and a `trip` relationship to `trip_id`.
#[must_use]
pub fn event_to_entity(event: &Event, trip_id: &str) -> Entity {
    let mut entity = Entity::new(Event::KIND, &event.id);
    entity.put_property("lifeCyclePhase", event.lifecycle_phase().as_str());
    entity.put_property("eventGenerationTime", event.time.timestamp());
    entity.put_property("eventType", event.event_type.as_str());
    for (i, involved) in event.involved_objects.iter().enumerate() {
        entity.put_relationship(format!("involvedObject{i}"), involved.as_str());
    }
    entity.put_relationship("trip", trip_id);
    entity
}

/// Map a scenario list to entities, one per object, in the same order.
#[must_use]
pub fn to_entities(trip_id: &str, objects: &[ScenarioObject]) -> Vec<Entity> {
    objects
        .iter()
        .map(|obj| match obj {
            ScenarioObject::Location(location) => location_to_entity(location),
            ScenarioObject::Vehicle(vehicle) => vehicle_to_entity(vehicle),
            ScenarioObject::Shipment(shipment) => shipment_to_entity(shipment),
            ScenarioObject::Trip(trip) => trip_to_entity(trip),
            ScenarioObject::Event(event) => event_to_entity(event, trip_id),
        })
        .collect()
}
