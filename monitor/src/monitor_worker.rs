// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

//! The monitor worker: owns the transport network and the stomp session,
//! applies every inbound passenger event to the network, and answers route
//! queries.

use anyhow::{bail, Context, Error};
use launch::config::LaunchParams;
use launch::heimdall::tracing::{debug, error, info};
use launch::heimdall::{
    Id, PassengerEvent, PassengerEventKind, RoutePlanner, TransportNetwork, TravelRoute,
};
use serde::Deserialize;
use tokio::runtime::Builder;
use tokio::time::Duration;

use crate::layout_downloader::LayoutDownloader;
use crate::monitor_config::{LayoutSource, MonitorConfig};
use crate::stomp_client::{SessionEvent, StompClient, StompTransport};
use crate::websocket_client::{make_tls_config, WebSocketClient};

/// Body of an inbound MESSAGE frame.
#[derive(Debug, Deserialize)]
struct PassengerEventMessage {
    passenger_event: String,
    station_id: Id,
}

pub struct MonitorWorker<T> {
    config: MonitorConfig,
    network: TransportNetwork,
    planner: RoutePlanner,
    client: StompClient<T>,
}

impl MonitorWorker<WebSocketClient> {
    /// Builds the worker and its TLS context. The network stays empty until
    /// `run` loads it from the configured layout source.
    pub fn new(config: MonitorConfig) -> Result<Self, Error> {
        // the TLS context is built once and outlives the session
        let tls_context = make_tls_config(&config.cert_path)?;
        let transport = WebSocketClient::new(
            config.url.clone(),
            config.endpoint.clone(),
            config.port.clone(),
            tls_context,
        );
        let client = StompClient::new(
            transport,
            config.url.clone(),
            config.stomp_endpoint.clone(),
        );
        Ok(Self::with_parts(config, client, TransportNetwork::new()))
    }
}

impl<T: StompTransport> MonitorWorker<T> {
    fn with_parts(config: MonitorConfig, client: StompClient<T>, network: TransportNetwork) -> Self {
        let planner = RoutePlanner::new((&config.planner).into());
        Self {
            config,
            network,
            planner,
            client,
        }
    }

    pub fn network(&self) -> &TransportNetwork {
        &self.network
    }

    pub fn fastest_travel_route(&self, from: &Id, to: &Id) -> TravelRoute {
        self.planner.fastest_route(&self.network, from, to)
    }

    pub fn quietest_travel_route(&self, from: &Id, to: &Id) -> TravelRoute {
        self.planner.quietest_route(&self.network, from, to)
    }

    pub fn preferred_travel_route(&self, from: &Id, to: &Id) -> TravelRoute {
        self.planner.preferred_route(&self.network, from, to)
    }

    // run by blocking the current thread
    pub fn run_blocking(self) -> Result<(), Error> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime.")?;
        runtime.block_on(self.run())
    }

    pub async fn run(mut self) -> Result<(), Error> {
        self.load_network().await?;
        self.run_session().await
    }

    async fn load_network(&mut self) -> Result<(), Error> {
        match self.config.layout_source()? {
            LayoutSource::Local(path) => {
                let (network, _layout) = launch::read::read_network(&LaunchParams::new(path))?;
                self.network = network;
            }
            LayoutSource::Remote(url) => {
                info!("Downloading network layout from {}", url);
                let downloader = LayoutDownloader::new(&url, &self.config.cert_path)?;
                let layout = downloader.download_layout().await?;
                info!("Network layout downloaded");
                self.network = TransportNetwork::from_layout(&layout)
                    .context("Could not build the transport network from the layout")?;
            }
        }
        info!("Monitoring {} stations", self.network.nb_of_stations());
        Ok(())
    }

    async fn run_session(&mut self) -> Result<(), Error> {
        self.client
            .connect(&self.config.username, &self.config.password)
            .await
            .context("Could not establish the stomp session")?;
        info!("Stomp session established");

        let token = self
            .client
            .subscribe()
            .await
            .context("Could not subscribe to the passenger feed")?;
        info!(
            "Subscribed to {} with subscription id {}",
            self.config.stomp_endpoint, token.subscription_id
        );

        self.main_loop().await
    }

    async fn main_loop(&mut self) -> Result<(), Error> {
        info!("Starting monitor worker");
        match self.config.runtime_s {
            Some(runtime_s) => {
                let deadline = tokio::time::sleep(Duration::from_secs(runtime_s));
                tokio::pin!(deadline);
                loop {
                    let Self {
                        client, network, ..
                    } = self;
                    tokio::select! {
                        _ = &mut deadline => {
                            info!("Configured runtime of {}s elapsed. Closing the session.", runtime_s);
                            client
                                .close()
                                .await
                                .context("Could not close the stomp session")?;
                            return Ok(());
                        }
                        event = client.next_event() => {
                            if handle_session_event(network, event)? {
                                return Ok(());
                            }
                        }
                    }
                }
            }
            None => loop {
                let Self {
                    client, network, ..
                } = self;
                let event = client.next_event().await;
                if handle_session_event(network, event)? {
                    return Ok(());
                }
            },
        }
    }
}

/// Applies one session event. Returns true when the session is over.
fn handle_session_event(
    network: &mut TransportNetwork,
    event: SessionEvent,
) -> Result<bool, Error> {
    match event {
        SessionEvent::Message(body) => {
            handle_passenger_message(network, &body);
            Ok(false)
        }
        SessionEvent::MessageError(err) => {
            error!("Could not handle an inbound frame : {}", err);
            Ok(false)
        }
        SessionEvent::Disconnected(err) => {
            bail!("Stomp session lost : {}", err);
        }
        SessionEvent::Closed => {
            info!("Stomp session closed");
            Ok(true)
        }
    }
}

/// Parses one passenger event body and applies it to the network. Bad
/// payloads are logged and dropped, they never kill the session.
fn handle_passenger_message(network: &mut TransportNetwork, body: &str) {
    let message: PassengerEventMessage = match serde_json::from_str(body) {
        Ok(message) => message,
        Err(err) => {
            error!("Could not parse passenger event '{}' : {}", body, err);
            return;
        }
    };
    let kind = match PassengerEventKind::from_name(&message.passenger_event) {
        Some(kind) => kind,
        None => {
            error!(
                "Unknown passenger event kind '{}', I'll ignore this event",
                message.passenger_event
            );
            return;
        }
    };
    let event = PassengerEvent {
        station_id: message.station_id,
        kind,
    };
    if let Err(err) = network.record_passenger_event(&event) {
        error!("Could not record a passenger event : {}", err);
        return;
    }
    debug!(
        "Recorded a passenger event at station {}",
        event.station_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor_config::MonitorConfig;
    use crate::stomp_client::test_support::MockTransport;
    use launch::heimdall::layout::NetworkLayout;

    const CONNECTED_FRAME: &str = "CONNECTED\nversion:1.2\nsession:12\n\n\0";

    fn test_config() -> MonitorConfig {
        MonitorConfig {
            url: "monitor.example.com".to_string(),
            endpoint: "/network-events".to_string(),
            port: "443".to_string(),
            username: "user".to_string(),
            password: "password".to_string(),
            stomp_endpoint: "/passengers".to_string(),
            cert_path: std::path::PathBuf::from("tests/cacert.pem"),
            network_layout_path: None,
            network_layout_url: None,
            runtime_s: None,
            planner: launch::config::PlannerParams::default(),
        }
    }

    fn test_network() -> TransportNetwork {
        let document = r#"{
            "stations": [
                {"station_id": "s1", "name": "North"},
                {"station_id": "s2", "name": "South"}
            ],
            "lines": [
                {"line_id": "l1", "name": "Blue", "routes": [
                    {"route_id": "r1", "direction": "southbound",
                     "start_station_id": "s1", "end_station_id": "s2",
                     "route_stops": ["s1", "s2"]}
                ]}
            ],
            "travel_times": [
                {"start_station_id": "s1", "end_station_id": "s2", "travel_time": 4}
            ]
        }"#;
        let layout: NetworkLayout = serde_json::from_str(document).unwrap();
        TransportNetwork::from_layout(&layout).unwrap()
    }

    fn worker_with_feed(bodies: Vec<&str>) -> MonitorWorker<MockTransport> {
        let mut transport = MockTransport::new();
        transport.push_inbound(CONNECTED_FRAME);
        transport.publish_after_subscribe =
            bodies.into_iter().map(|body| body.to_string()).collect();
        let client = StompClient::new(
            transport,
            "monitor.example.com".to_string(),
            "/passengers".to_string(),
        );
        MonitorWorker::with_parts(test_config(), client, test_network())
    }

    #[tokio::test]
    async fn events_from_the_feed_update_the_network() {
        let mut worker = worker_with_feed(vec![
            r#"{"passenger_event": "in", "station_id": "s1"}"#,
            r#"{"passenger_event": "in", "station_id": "s1"}"#,
            r#"{"passenger_event": "out", "station_id": "s2"}"#,
        ]);
        // the scripted feed drains, then the stream ends quietly
        worker.run_session().await.unwrap();
        assert_eq!(worker.network().passenger_count(&"s1".to_string()), Ok(2));
        assert_eq!(worker.network().passenger_count(&"s2".to_string()), Ok(-1));
    }

    #[tokio::test]
    async fn bad_payloads_are_dropped_not_fatal() {
        let mut worker = worker_with_feed(vec![
            "this is not json",
            r#"{"passenger_event": "teleported", "station_id": "s1"}"#,
            r#"{"passenger_event": "in", "station_id": "nowhere"}"#,
            r#"{"passenger_event": "in", "station_id": "s2"}"#,
        ]);
        worker.run_session().await.unwrap();
        // only the last, valid event was applied
        assert_eq!(worker.network().passenger_count(&"s1".to_string()), Ok(0));
        assert_eq!(worker.network().passenger_count(&"s2".to_string()), Ok(1));
    }

    #[tokio::test]
    async fn query_methods_read_the_live_network() {
        let mut worker = worker_with_feed(vec![
            r#"{"passenger_event": "in", "station_id": "s2"}"#,
        ]);
        worker.run_session().await.unwrap();
        let journey = worker.fastest_travel_route(&"s1".to_string(), &"s2".to_string());
        assert_eq!(journey.total_travel_time, 4);
        assert_eq!(journey.steps.len(), 1);
        let preferred = worker.preferred_travel_route(&"s1".to_string(), &"s2".to_string());
        assert_eq!(preferred.total_travel_time, 4);
    }

    #[tokio::test]
    async fn server_error_frame_is_fatal() {
        let mut transport = MockTransport::new();
        transport.push_inbound(CONNECTED_FRAME);
        transport.publish_after_subscribe =
            vec![r#"{"passenger_event": "in", "station_id": "s1"}"#.to_string()];
        transport.error_after_messages = true;
        let client = StompClient::new(
            transport,
            "monitor.example.com".to_string(),
            "/passengers".to_string(),
        );
        let mut worker = MonitorWorker::with_parts(test_config(), client, test_network());
        let err = worker.run_session().await.unwrap_err();
        assert!(format!("{:#}", err).contains("session lost"));
        // the event before the error was still applied
        assert_eq!(worker.network().passenger_count(&"s1".to_string()), Ok(1));
    }
}
