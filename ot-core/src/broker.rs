//! Client for the NGSI-LD context broker.
//!
//! Only two broker operations are used: create-entity and delete-entity-by-id. Batch helpers
//! ([`BrokerClient::publish`], [`BrokerClient::delete_all`]) apply them entity by entity; a failure
//! on one entity is logged and counted, and never stops the rest of the batch. Entities that were
//! already created stay created.
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{
    debug,
    error,
    info,
    instrument,
    warn,
};
use url::Url;

use crate::ngsi::Entity;

/// Path of the NGSI-LD entities collection, relative to the broker root.
const ENTITIES_PATH: [&str; 3] = ["ngsi-ld", "v1", "entities"];
/// Content type of NGSI-LD request bodies.
const LD_JSON: &str = "application/ld+json";

/// Per-request timeout used when the caller does not configure one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors of a single broker request, or of building the client.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// The broker answered 409: an entity with this id already exists.
    #[error("entity {0} already exists")]
    Conflict(String),

    /// Any other non-2xx answer.
    #[error("broker answered {status} for entity {id}")]
    UnexpectedStatus {
        /// Entity the request was about.
        id: String,
        /// Status the broker answered with.
        status: StatusCode,
    },

    /// No answer within the configured request timeout.
    #[error("request for entity {0} timed out")]
    Timeout(String),

    /// Connection or protocol failure.
    #[error("request for entity {id} failed: {source}")]
    Transport {
        /// Entity the request was about.
        id: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The broker URL does not parse or cannot hold a path.
    #[error("invalid broker url {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be built.
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// An entity could not be encoded as JSON.
    #[error("could not serialize entity: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BrokerError {
    /// Classify a request failure for entity `id`, keeping timeouts apart.
    fn from_reqwest(id: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(id.to_owned())
        } else {
            Self::Transport { id: id.to_owned(), source: err }
        }
    }
}

/// Outcome counts of a [`BrokerClient::publish`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PublishSummary {
    /// Entities created on the first attempt.
    pub created: usize,
    /// Entities that already existed and were deleted and created again.
    pub recreated: usize,
    /// Entities that could not be written.
    pub failed: usize,
}

/// Outcome counts of a [`BrokerClient::delete_all`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    /// Entities the broker confirmed as deleted.
    pub deleted: usize,
    /// Entities whose delete request failed or was refused.
    pub failed: usize,
}

/// Async client for one NGSI-LD context broker.
#[derive(Clone, Debug)]
pub struct BrokerClient {
    /// Broker root, e.g. `http://orion:1026/`.
    base_url: Url,
    /// Shared HTTP client carrying the request timeout.
    client: reqwest::Client,
}

impl BrokerClient {
    /// Build a client for the broker rooted at `base_url` (e.g. `http://orion:1026`).
    ///
    /// # Errors
    ///
    /// [`BrokerError::InvalidUrl`] if `base_url` is not a URL that can hold a path, and
    /// [`BrokerError::Client`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BrokerError> {
        let base_url = Url::parse(base_url).map_err(|_| BrokerError::InvalidUrl(base_url.to_owned()))?;
        if base_url.cannot_be_a_base() {
            return Err(BrokerError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BrokerError::Client)?;

        Ok(Self { base_url, client })
    }

    /// URL of the entities collection, or of a single entity when `id` is given.
    #[must_use]
    pub fn entities_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // base urls are checked in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(ENTITIES_PATH);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Create a single entity.
    ///
    /// # Errors
    ///
    /// [`BrokerError::Conflict`] on a 409 answer, [`BrokerError::UnexpectedStatus`] on any other
    /// non-2xx answer, and [`BrokerError::Timeout`] or [`BrokerError::Transport`] when the request
    /// does not complete.
    pub async fn create_entity(&self, entity: &Entity) -> Result<(), BrokerError> {
        let body = serde_json::to_vec(entity)?;
        let response = self
            .client
            .post(self.entities_url(None))
            .header(CONTENT_TYPE, LD_JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| BrokerError::from_reqwest(entity.id(), e))?;

        match response.status() {
            status if status.is_success() => {
                debug!(id = entity.id(), %status, "entity created");
                Ok(())
            },
            StatusCode::CONFLICT => Err(BrokerError::Conflict(entity.id().to_owned())),
            status => Err(BrokerError::UnexpectedStatus { id: entity.id().to_owned(), status }),
        }
    }

    /// Delete a single entity by id.
    ///
    /// # Errors
    ///
    /// [`BrokerError::UnexpectedStatus`] on a non-2xx answer, and [`BrokerError::Timeout`] or
    /// [`BrokerError::Transport`] when the request does not complete.
    pub async fn delete_entity(&self, id: &str) -> Result<(), BrokerError> {
        let response = self
            .client
            .delete(self.entities_url(Some(id)))
            .header(CONTENT_TYPE, LD_JSON)
            .send()
            .await
            .map_err(|e| BrokerError::from_reqwest(id, e))?;

        let status = response.status();
        if status.is_success() {
            debug!(id, %status, "entity deleted");
            Ok(())
        } else {
            Err(BrokerError::UnexpectedStatus { id: id.to_owned(), status })
        }
    }

    /// Create every entity in order. Existing entities are deleted and created again.
    #[instrument(skip_all, fields(broker = %self.base_url, entities = entities.len()))]
    pub async fn publish(&self, entities: &[Entity]) -> PublishSummary {
        let mut summary = PublishSummary::default();

        for entity in entities {
            match self.create_entity(entity).await {
                Ok(()) => summary.created += 1,
                Err(BrokerError::Conflict(id)) => {
                    info!(id = %id, "entity already exists, will delete and rewrite");
                    if let Err(e) = self.delete_entity(&id).await {
                        warn!(id = %id, "delete before rewrite failed: {e}");
                    }
                    match self.create_entity(entity).await {
                        Ok(()) => summary.recreated += 1,
                        Err(e) => {
                            error!(id = %id, "was not able to rewrite entity: {e}");
                            summary.failed += 1;
                        },
                    }
                },
                Err(BrokerError::Timeout(id)) => {
                    // the broker may still have processed the request
                    warn!(id = %id, "create timed out, continuing");
                    summary.failed += 1;
                },
                Err(e @ BrokerError::UnexpectedStatus { .. }) => {
                    warn!(id = entity.id(), "was not able to create entity: {e}");
                    summary.failed += 1;
                },
                Err(e) => {
                    error!(id = entity.id(), "was not able to create entity: {e}");
                    summary.failed += 1;
                },
            }
        }

        info!(
            created = summary.created,
            recreated = summary.recreated,
            failed = summary.failed,
            "publish finished"
        );
        summary
    }

    /// Delete every entity by id. Failures are logged at debug level and counted only.
    #[instrument(skip_all, fields(broker = %self.base_url, entities = entities.len()))]
    pub async fn delete_all(&self, entities: &[Entity]) -> DeleteSummary {
        let mut summary = DeleteSummary::default();

        for entity in entities {
            match self.delete_entity(entity.id()).await {
                Ok(()) => summary.deleted += 1,
                Err(e) => {
                    debug!(id = entity.id(), "ignoring delete failure: {e}");
                    summary.failed += 1;
                },
            }
        }

        info!(deleted = summary.deleted, failed = summary.failed, "delete finished");
        summary
    }
}

#[cfg(test)]
/// Broker client tests against a mock broker.
mod tests;
