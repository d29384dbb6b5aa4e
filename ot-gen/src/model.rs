//! Domain objects of the OpenTrip scenario.
//!
//! These are short-lived transfer objects: built by the generator, consumed by the mapper, then
//! dropped. Nothing here is persisted.
use std::cmp::Ordering;
use std::fmt;

use chrono::{
    DateTime,
    Utc,
};

/// Kinds that appear as NGSI-LD entity types. `KIND` doubles as the `<type>` part of ids.
pub trait NgsiKind {
    /// Lowercased kind name, e.g. `location`.
    const KIND: &'static str;

    /// `urn:ngsi-ld:<kind>:<slug>`
    fn ngsi_id(slug: &str) -> String {
        format!("urn:ngsi-ld:{}:{slug}", Self::KIND)
    }
}

/// A type classifier that is either one of a closed set of known values or free text.
///
/// Modelled as a sum type so that "both set" and "neither set" cannot be expressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classifier<K> {
    /// One of the known values of `K`.
    Known(K),
    /// Free text for anything outside the known set.
    Other(String),
}

impl<K: AsRef<str>> Classifier<K> {
    /// The single string this classifier stands for; the known value wins when present.
    #[must_use]
    pub fn resolve(&self) -> &str {
        match self {
            Self::Known(kind) => kind.as_ref(),
            Self::Other(text) => text,
        }
    }
}

/// Known location types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocationKind {
    /// `WAREHOUSE`
    Warehouse,
    /// `CUSTOMER`
    Customer,
}

impl AsRef<str> for LocationKind {
    fn as_ref(&self) -> &str {
        match self {
            Self::Warehouse => "WAREHOUSE",
            Self::Customer => "CUSTOMER",
        }
    }
}

/// Known vehicle types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    /// `BOXTRUCK`
    BoxTruck,
}

impl AsRef<str> for VehicleKind {
    fn as_ref(&self) -> &str {
        match self {
            Self::BoxTruck => "BOXTRUCK",
        }
    }
}

/// Location type: a [`LocationKind`] or free text.
pub type LocationType = Classifier<LocationKind>;
/// Vehicle type: a [`VehicleKind`] or free text.
pub type VehicleType = Classifier<VehicleKind>;

/// A place goods are sent from, stored at or delivered to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// `urn:ngsi-ld:location:<slug>`
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Free-text notes.
    pub remarks: Option<String>,
    /// What kind of place this is.
    pub location_type: Option<LocationType>,
}

impl NgsiKind for Location {
    const KIND: &'static str = "location";
}

/// Anything that moves a shipment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vehicle {
    /// `urn:ngsi-ld:vehicle:<slug>`
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// What kind of vehicle this is.
    pub vehicle_type: Option<VehicleType>,
}

impl NgsiKind for Vehicle {
    const KIND: &'static str = "vehicle";
}

/// A consignment of goods. Parties are referenced by entity id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shipment {
    /// `urn:ngsi-ld:shipment:<slug>`
    pub id: String,
    /// Free-text goods type, e.g. `Container`.
    pub goods_type: String,
    /// Party the goods physically leave from.
    pub physical_sender: Option<String>,
    /// Party legally sending the goods.
    pub legal_sender: Option<String>,
    /// Party the goods are physically delivered to.
    pub physical_addressee: Option<String>,
    /// Party legally receiving the goods.
    pub legal_addressee: Option<String>,
}

impl NgsiKind for Shipment {
    const KIND: &'static str = "shipment";
}

/// Container that events point at. A trip does not list its own events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    /// `urn:ngsi-ld:trip:<slug>`
    pub id: String,
    /// Display name.
    pub name: Option<String>,
}

impl NgsiKind for Trip {
    const KIND: &'static str = "trip";
}

/// Where an event sits relative to the reference time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// Event lies in the future.
    Planned,
    /// Event happens exactly at the reference time.
    Actual,
    /// Event lies in the past.
    Realized,
}

impl LifecyclePhase {
    /// Classify `event_time` against `reference_time`.
    #[must_use]
    pub fn classify(event_time: DateTime<Utc>, reference_time: DateTime<Utc>) -> Self {
        match event_time.cmp(&reference_time) {
            Ordering::Less => Self::Realized,
            Ordering::Equal => Self::Actual,
            Ordering::Greater => Self::Planned,
        }
    }

    /// Wire name: `PLANNED`, `ACTUAL` or `REALIZED`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::Actual => "ACTUAL",
            Self::Realized => "REALIZED",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happens to the shipment during the trip.
///
/// The lifecycle phase is private: it is only ever computed by [`Event::new`] from the event time
/// and the reference time of the generation call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// `urn:ngsi-ld:event:<slug>`
    pub id: String,
    /// Free-text label, e.g. `loadShipmentEvent`.
    pub event_type: String,
    /// Ids of the shipment/vehicle/location involved, in significant order.
    pub involved_objects: Vec<String>,
    /// When the event happens.
    pub time: DateTime<Utc>,
    /// Phase of `time` relative to the reference time given to [`Event::new`].
    lifecycle_phase: LifecyclePhase,
}

impl Event {
    /// Build an event and classify it against `reference_time`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        event_type: impl Into<String>,
        involved_objects: Vec<String>,
        time: DateTime<Utc>,
        reference_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            event_type: event_type.into(),
            involved_objects,
            time,
            lifecycle_phase: LifecyclePhase::classify(time, reference_time),
        }
    }

    /// Lifecycle phase computed at construction.
    #[must_use]
    pub const fn lifecycle_phase(&self) -> LifecyclePhase {
        self.lifecycle_phase
    }
}

impl NgsiKind for Event {
    const KIND: &'static str = "event";
}

/// Closed set of objects a scenario is made of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScenarioObject {
    /// A [`Location`].
    Location(Location),
    /// A [`Vehicle`].
    Vehicle(Vehicle),
    /// A [`Shipment`].
    Shipment(Shipment),
    /// A [`Trip`].
    Trip(Trip),
    /// An [`Event`].
    Event(Event),
}

impl ScenarioObject {
    /// Id of the wrapped object.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Location(location) => &location.id,
            Self::Vehicle(vehicle) => &vehicle.id,
            Self::Shipment(shipment) => &shipment.id,
            Self::Trip(trip) => &trip.id,
            Self::Event(event) => &event.id,
        }
    }

    /// NGSI-LD type of the wrapped object.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Location(_) => Location::KIND,
            Self::Vehicle(_) => Vehicle::KIND,
            Self::Shipment(_) => Shipment::KIND,
            Self::Trip(_) => Trip::KIND,
            Self::Event(_) => Event::KIND,
        }
    }
}

impl From<Location> for ScenarioObject {
    fn from(value: Location) -> Self {
        Self::Location(value)
    }
}

impl From<Vehicle> for ScenarioObject {
    fn from(value: Vehicle) -> Self {
        Self::Vehicle(value)
    }
}

impl From<Shipment> for ScenarioObject {
    fn from(value: Shipment) -> Self {
        Self::Shipment(value)
    }
}

impl From<Trip> for ScenarioObject {
    fn from(value: Trip) -> Self {
        Self::Trip(value)
    }
}

impl From<Event> for ScenarioObject {
    fn from(value: Event) -> Self {
        Self::Event(value)
    }
}
