#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]

//! `otctl` – command-line access to the OpenTrip demo scenario
//!
//! Prints the scenario as NGSI-LD entities, or publishes/removes it at a context broker without
//! going through the web service. See `otctl --help` for the subcommands.

use std::time::Duration;

use anyhow::{
    anyhow,
    Result,
};
use chrono::{
    DateTime,
    Utc,
};
use clap::{
    Args,
    Parser,
    Subcommand,
};
use ot_core::BrokerClient;
use ot_gen::{
    resolve_reference_time,
    scenario_entities,
};
use tracing::info;

/// otctl command-line interface for generating, publishing and deleting the OpenTrip banana
/// shipment scenario
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Logging verbosity level (`trace`, `debug`, `info`, `warn`, `error`).
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    /// Operation to run.
    #[command(subcommand)]
    command: Command,
}

/// `otctl` subcommands.
#[derive(Subcommand)]
enum Command {
    /// Print the scenario entities as JSON
    Get {
        /// Reference time for the event phases.
        #[command(flatten)]
        reference: ReferenceTimeArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Create the scenario entities at the broker, replacing existing ones
    Create {
        /// Reference time for the event phases.
        #[command(flatten)]
        reference: ReferenceTimeArgs,

        /// Broker to publish to.
        #[command(flatten)]
        broker: BrokerArgs,
    },

    /// Delete the scenario entities from the broker
    Delete {
        /// Broker to delete from.
        #[command(flatten)]
        broker: BrokerArgs,
    },
}

/// Options choosing the reference time; both absent means the scenario start.
#[derive(Args)]
struct ReferenceTimeArgs {
    /// Reference time as whole hours after the scenario start (may be negative)
    #[arg(long, allow_negative_numbers = true)]
    hour_offset: Option<i64>,

    /// Reference time as seconds since the epoch; takes precedence over --hour-offset
    #[arg(long, allow_negative_numbers = true)]
    time: Option<i64>,
}

impl ReferenceTimeArgs {
    /// Turn the options into a reference time.
    fn resolve(&self) -> Result<DateTime<Utc>> {
        resolve_reference_time(self.hour_offset, self.time)
            .ok_or_else(|| anyhow!("reference time out of range"))
    }
}

/// Options locating the context broker.
#[derive(Args)]
struct BrokerArgs {
    /// Root URL of the NGSI-LD context broker
    #[arg(long, default_value = "http://localhost:1026")]
    broker_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,
}

impl BrokerArgs {
    /// Build a broker client from the options.
    fn client(&self) -> Result<BrokerClient> {
        Ok(BrokerClient::new(&self.broker_url, Duration::from_secs(self.request_timeout_secs))?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    ot_core::logging::setup(&args.verbosity);

    match args.command {
        Command::Get { reference, pretty } => {
            let entities = scenario_entities(reference.resolve()?);
            let out = if pretty {
                serde_json::to_string_pretty(&entities)?
            } else {
                serde_json::to_string(&entities)?
            };
            println!("{out}");
        },
        Command::Create { reference, broker } => {
            let reference_time = reference.resolve()?;
            info!(%reference_time, broker = %broker.broker_url, "publishing scenario");
            let summary = broker.client()?.publish(&scenario_entities(reference_time)).await;
            println!("{}", serde_json::to_string(&summary)?);
        },
        Command::Delete { broker } => {
            info!(broker = %broker.broker_url, "deleting scenario");
            let entities = scenario_entities(ot_gen::scenario_start());
            let summary = broker.client()?.delete_all(&entities).await;
            println!("{}", serde_json::to_string(&summary)?);
        },
    }

    Ok(())
}
