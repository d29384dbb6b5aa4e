//! Command-line configuration of the trip service.
use std::net::{
    IpAddr,
    Ipv4Addr,
};
use std::time::Duration;

use clap::Parser;
use ot_core::{
    BrokerClient,
    BrokerError,
};
use url::Url;

/// OpenTrip trip service: serves the banana shipment scenario as NGSI-LD and publishes it to a
/// context broker
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Root URL of the NGSI-LD context broker (e.g. Orion-LD)
    #[arg(long, default_value = "http://localhost:1026")]
    pub broker_url: Url,

    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub address: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Timeout for each request to the broker, in seconds
    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Logging verbosity level (`trace`, `debug`, `info`, `warn`, `error`).
    #[arg(short, long, default_value = "info")]
    pub verbosity: String,
}

impl ServerConfig {
    /// Client for the configured broker.
    ///
    /// # Errors
    ///
    /// See [`BrokerClient::new`].
    pub fn broker_client(&self) -> Result<BrokerClient, BrokerError> {
        BrokerClient::new(self.broker_url.as_str(), Duration::from_secs(self.request_timeout_secs))
    }

    /// Rocket settings for the configured listen address.
    #[must_use]
    pub fn rocket_config(&self) -> rocket::Config {
        rocket::Config {
            address: self.address,
            port: self.port,
            ..rocket::Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    //! Option parsing tests.
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_defaults() {
        let config = ServerConfig::parse_from(["ot-server"]);
        assert_eq!(config.broker_url.as_str(), "http://localhost:1026/");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rocket_config().address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(
            config.broker_client().unwrap().entities_url(None).as_str(),
            "http://localhost:1026/ngsi-ld/v1/entities"
        );
    }

    #[rstest]
    fn test_rejects_bad_broker_url() {
        assert!(ServerConfig::try_parse_from(["ot-server", "--broker-url", "orion without scheme"]).is_err());
    }
}
