//! Trip endpoints.
use chrono::{
    DateTime,
    Utc,
};
use ot_core::{
    BrokerClient,
    DeleteSummary,
    Entity,
    PublishSummary,
};
use ot_gen::{
    resolve_reference_time,
    scenario_entities,
    scenario_start,
};
use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::{
    delete,
    get,
    post,
    routes,
    FromForm,
    Route,
    State,
};
use tracing::{
    info,
    instrument,
};

/// Optional reference time; `time` wins when both are given.
#[derive(Debug, Default, FromForm)]
pub struct ReferenceTimeQuery {
    /// Whole hours after the scenario start.
    #[field(name = "hourOffset")]
    pub hour_offset: Option<i64>,
    /// Seconds since the epoch.
    pub time: Option<i64>,
}

impl ReferenceTimeQuery {
    /// Resolve the query, rejecting instants outside the representable range.
    fn reference_time(&self) -> Result<DateTime<Utc>, BadRequest<String>> {
        resolve_reference_time(self.hour_offset, self.time)
            .ok_or_else(|| BadRequest(format!("reference time out of range: {:?}", self)))
    }
}

/// Every route of the trip service, to be mounted at `/`.
#[must_use]
pub fn routes() -> Vec<Route> {
    routes![get_trip, create_trip, delete_trip, health]
}

/// Scenario entities for the requested reference time.
#[get("/trip?<query..>")]
#[allow(clippy::needless_pass_by_value)]
pub fn get_trip(query: ReferenceTimeQuery) -> Result<Json<Vec<Entity>>, BadRequest<String>> {
    Ok(Json(scenario_entities(query.reference_time()?)))
}

/// Publish the scenario. Entities that already exist are deleted and written again.
#[post("/trip?<query..>")]
#[instrument(skip(broker))]
#[allow(clippy::needless_pass_by_value)]
pub async fn create_trip(
    query: ReferenceTimeQuery,
    broker: &State<BrokerClient>,
) -> Result<Json<PublishSummary>, BadRequest<String>> {
    let reference_time = query.reference_time()?;
    info!(%reference_time, "publishing scenario");

    Ok(Json(broker.publish(&scenario_entities(reference_time)).await))
}

/// Remove the scenario entities. Broker errors are swallowed; only the counts are reported.
#[delete("/trip")]
#[instrument(skip(broker))]
pub async fn delete_trip(broker: &State<BrokerClient>) -> Json<DeleteSummary> {
    // ids do not depend on the reference time
    Json(broker.delete_all(&scenario_entities(scenario_start())).await)
}

/// Liveness check.
#[get("/health")]
#[allow(clippy::missing_const_for_fn)]
pub fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
/// Route tests against a local Rocket client.
mod tests;
