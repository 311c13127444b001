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

//! Secure-WebSocket implementation of the [`StompTransport`] carrier.
//!
//! TLS is server-authenticated against the PEM trust store given in the
//! configuration; the same `rustls` client config is built once and shared
//! with every connection attempt. Messages are text frames; each inbound
//! text frame is one complete STOMP frame.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Error};
use futures::{SinkExt, StreamExt};
use launch::heimdall::tracing::{debug, warn};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};

use crate::stomp_client::{StompTransport, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Builds the TLS client configuration from a PEM trust store.
pub fn make_tls_config(cert_path: &Path) -> Result<Arc<rustls::ClientConfig>, Error> {
    let pem = std::fs::read(cert_path)
        .context(format!("Could not read certificate file {:?}", cert_path))?;
    let certs = rustls_pemfile::certs(&mut pem.as_slice())
        .context(format!("Could not parse certificate file {:?}", cert_path))?;
    let mut root_store = rustls::RootCertStore::empty();
    let (added, ignored) = root_store.add_parsable_certificates(&certs);
    if added == 0 {
        bail!(
            "No usable certificate in {:?} ({} entries ignored)",
            cert_path,
            ignored
        );
    }
    let config = rustls::ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    Ok(Arc::new(config))
}

/// A WebSocket client connecting to `wss://{url}:{port}{endpoint}`.
pub struct WebSocketClient {
    url: String,
    endpoint: String,
    port: String,
    tls_context: Arc<rustls::ClientConfig>,
    stream: Option<WsStream>,
    locally_closed: bool,
}

impl WebSocketClient {
    /// Does not initiate a connection.
    pub fn new(
        url: String,
        endpoint: String,
        port: String,
        tls_context: Arc<rustls::ClientConfig>,
    ) -> Self {
        Self {
            url,
            endpoint,
            port,
            tls_context,
            stream: None,
            locally_closed: false,
        }
    }

    fn ws_url(&self) -> String {
        format!("wss://{}:{}{}", self.url, self.port, self.endpoint)
    }
}

impl StompTransport for WebSocketClient {
    async fn connect(&mut self) -> Result<(), TransportError> {
        let ws_url = self.ws_url();
        debug!("Connecting to {}", ws_url);
        let connector = Connector::Rustls(self.tls_context.clone());
        let result =
            connect_async_tls_with_config(ws_url.as_str(), None, false, Some(connector)).await;
        match result {
            Ok((stream, response)) => {
                debug!("WebSocket established, http status {}", response.status());
                self.stream = Some(stream);
                self.locally_closed = false;
                Ok(())
            }
            Err(tungstenite::Error::Io(err)) => {
                Err(TransportError::ConnectFailed(err.to_string()))
            }
            Err(err) => Err(TransportError::HandshakeFailed(err.to_string())),
        }
    }

    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| TransportError::WriteFailed("not connected".to_string()))?;
        stream
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|err| TransportError::WriteFailed(err.to_string()))
    }

    async fn receive(&mut self) -> Result<Option<String>, TransportError> {
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None if self.locally_closed => return Ok(None),
            None => {
                return Err(TransportError::ReadFailed("not connected".to_string()));
            }
        };
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                // tungstenite answers pings internally on the next flush
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                Some(Ok(Message::Binary(payload))) => {
                    warn!(
                        "Ignoring an unexpected binary message of {} bytes",
                        payload.len()
                    );
                    continue;
                }
                Some(Ok(Message::Close(_))) | None => {
                    return if self.locally_closed {
                        Ok(None)
                    } else {
                        Err(TransportError::ReadFailed(
                            "connection closed by peer".to_string(),
                        ))
                    };
                }
                Some(Ok(Message::Frame(_))) => continue,
                Some(Err(err)) => {
                    // a read aborted by our own close is a normal termination
                    return if self.locally_closed {
                        Ok(None)
                    } else {
                        Err(TransportError::ReadFailed(err.to_string()))
                    };
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.locally_closed = true;
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => return Ok(()),
        };
        match stream.close(None).await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed)
            | Err(tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(err) => Err(TransportError::CloseFailed(err.to_string())),
        }
    }
}
