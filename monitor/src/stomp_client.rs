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

//! Client side of a STOMP 1.2 session over a duplex text-message transport.
//!
//! The session is owned and driven by a single task: `connect` and
//! `subscribe` run one handshake each, then `next_event` surfaces the
//! subscription stream as typed events. Running everything on one task
//! serializes all state transitions and preserves wire order, so no locking
//! is needed anywhere in the session.

use std::fmt;

use launch::heimdall::tracing::debug;
use rand::Rng;

use crate::stomp_frame::{StompCommand, StompError, StompFrame, StompHeader};

/// Failure surfaced by the transport carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    ConnectFailed(String),
    HandshakeFailed(String),
    ReadFailed(String),
    WriteFailed(String),
    CloseFailed(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectFailed(msg) => write!(f, "connect failed: {}", msg),
            TransportError::HandshakeFailed(msg) => write!(f, "handshake failed: {}", msg),
            TransportError::ReadFailed(msg) => write!(f, "read failed: {}", msg),
            TransportError::WriteFailed(msg) => write!(f, "write failed: {}", msg),
            TransportError::CloseFailed(msg) => write!(f, "close failed: {}", msg),
        }
    }
}

/// The duplex text-message carrier the session runs over.
///
/// Contract: `connect` completes exactly once; `receive` yields complete
/// inbound messages in arrival order, `Ok(None)` once the stream ends after
/// a locally initiated `close` (the aborted read consumed silently), and an
/// error when the peer closes or I/O fails; `send` accepts one message at a
/// time and delivers in call order (one outstanding write, enforced by
/// `&mut self`); `close` is idempotent.
pub trait StompTransport {
    async fn connect(&mut self) -> Result<(), TransportError>;
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;
    async fn receive(&mut self) -> Result<Option<String>, TransportError>;
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Failure surfaced by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StompClientError {
    Transport(TransportError),
    Frame(StompError),
    UnexpectedCommand(StompCommand),
    ReceiptMismatch { expected: String, received: String },
    ServerError(String),
    InvalidMessageHeaders,
    InvalidState(&'static str),
}

impl fmt::Display for StompClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StompClientError::Transport(err) => write!(f, "transport error: {}", err),
            StompClientError::Frame(err) => write!(f, "{}", err),
            StompClientError::UnexpectedCommand(command) => {
                write!(f, "unable to handle {} frame in this state", command)
            }
            StompClientError::ReceiptMismatch { expected, received } => {
                write!(
                    f,
                    "receipt-id mismatch: expected {}, received {}",
                    expected, received
                )
            }
            StompClientError::ServerError(body) => write!(f, "server error: {}", body),
            StompClientError::InvalidMessageHeaders => write!(f, "invalid headers"),
            StompClientError::InvalidState(operation) => {
                write!(f, "{} is not allowed in the current session state", operation)
            }
        }
    }
}

impl std::error::Error for StompClientError {}

impl From<TransportError> for StompClientError {
    fn from(err: TransportError) -> Self {
        StompClientError::Transport(err)
    }
}

/// Correlation ids of an active subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeToken {
    pub subscription_id: String,
    pub receipt_id: String,
}

/// What the subscription stream yields.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A MESSAGE frame matching the subscription: its body.
    Message(String),
    /// A frame that could not be delivered; the session stays up.
    MessageError(StompClientError),
    /// The session is over: server ERROR frame or transport loss.
    Disconnected(StompClientError),
    /// The stream ended after a locally initiated close.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Connecting,
    Connected,
    Subscribing,
    Subscribed,
    Closing,
    Closed,
    Failed,
}

/// A STOMP client bound to one subscription destination.
pub struct StompClient<T> {
    transport: T,
    host: String,
    destination: String,
    state: SessionState,
    subscription_id: Option<String>,
    receipt_id: Option<String>,
}

impl<T: StompTransport> StompClient<T> {
    /// Does not initiate a connection; `host` goes into the STOMP frame's
    /// `host` header, `destination` is the subscription endpoint.
    pub fn new(transport: T, host: String, destination: String) -> Self {
        Self {
            transport,
            host,
            destination,
            state: SessionState::Idle,
            subscription_id: None,
            receipt_id: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(
            self.state,
            SessionState::Connected | SessionState::Subscribing | SessionState::Subscribed
        )
    }

    pub fn is_subscribed(&self) -> bool {
        self.state == SessionState::Subscribed
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self.state, SessionState::Closed | SessionState::Failed)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Opens the transport and runs the STOMP connection handshake.
    ///
    /// Any failure (transport, malformed frame, server ERROR) is terminal
    /// for the session.
    pub async fn connect(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(), StompClientError> {
        if self.state != SessionState::Idle {
            return Err(StompClientError::InvalidState("connect"));
        }
        self.state = SessionState::Connecting;
        if let Err(err) = self.transport.connect().await {
            self.state = SessionState::Failed;
            return Err(err.into());
        }

        let connect_frame = format!(
            "STOMP\naccept-version:1.2\nhost:{}\nlogin:{}\npasscode:{}\n\n\0",
            self.host, username, password
        );
        if let Err(err) = self.transport.send(&connect_frame).await {
            self.state = SessionState::Failed;
            return Err(err.into());
        }

        let frame = self.receive_frame_or_fail().await?;
        match frame.command() {
            StompCommand::Connected => {
                debug!(
                    "Stomp session established, server version {:?}",
                    frame.header_value(StompHeader::Version)
                );
                self.state = SessionState::Connected;
                Ok(())
            }
            StompCommand::Error => {
                self.state = SessionState::Failed;
                Err(StompClientError::ServerError(frame.body().to_string()))
            }
            command => {
                self.state = SessionState::Failed;
                Err(StompClientError::UnexpectedCommand(command))
            }
        }
    }

    /// Subscribes to the configured destination and waits for the server's
    /// receipt. Calling this while already subscribed returns the existing
    /// token without touching the wire.
    pub async fn subscribe(&mut self) -> Result<SubscribeToken, StompClientError> {
        if self.state == SessionState::Subscribed {
            // unwraps are safe, both ids were stored on the way to Subscribed
            return Ok(SubscribeToken {
                subscription_id: self.subscription_id.clone().unwrap(),
                receipt_id: self.receipt_id.clone().unwrap(),
            });
        }
        if self.state != SessionState::Connected {
            return Err(StompClientError::InvalidState("subscribe"));
        }

        let mut rng = rand::thread_rng();
        let subscription_id = rng.gen_range(0..100_000u32).to_string();
        let receipt_id = rng.gen_range(0..100_000u32).to_string();
        self.subscription_id = Some(subscription_id.clone());
        self.receipt_id = Some(receipt_id.clone());
        self.state = SessionState::Subscribing;

        let subscribe_frame = format!(
            "SUBSCRIBE\nid:{}\nreceipt:{}\ndestination:{}\nack:auto\n\n\0",
            subscription_id, receipt_id, self.destination
        );
        if let Err(err) = self.transport.send(&subscribe_frame).await {
            self.state = SessionState::Failed;
            return Err(err.into());
        }

        let frame = self.receive_frame_or_fail().await?;
        match frame.command() {
            StompCommand::Receipt => {
                // unwrap is safe, receipt-id is required on RECEIPT frames
                let received = frame.header_value(StompHeader::ReceiptId).unwrap();
                if received == receipt_id {
                    self.state = SessionState::Subscribed;
                    Ok(SubscribeToken {
                        subscription_id,
                        receipt_id,
                    })
                } else {
                    let received = received.to_string();
                    self.state = SessionState::Failed;
                    Err(StompClientError::ReceiptMismatch {
                        expected: receipt_id,
                        received,
                    })
                }
            }
            StompCommand::Error => {
                self.state = SessionState::Failed;
                Err(StompClientError::ServerError(frame.body().to_string()))
            }
            command => {
                self.state = SessionState::Failed;
                Err(StompClientError::UnexpectedCommand(command))
            }
        }
    }

    /// The next event on the subscription stream.
    ///
    /// Frame-level problems are reported as [`SessionEvent::MessageError`]
    /// and leave the session subscribed; a server ERROR frame or transport
    /// loss is terminal.
    pub async fn next_event(&mut self) -> SessionEvent {
        let text = match self.transport.receive().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                self.state = SessionState::Closed;
                return SessionEvent::Closed;
            }
            Err(err) => {
                self.state = SessionState::Failed;
                return SessionEvent::Disconnected(err.into());
            }
        };
        let frame = match StompFrame::parse(text) {
            Ok(frame) => frame,
            Err(err) => return SessionEvent::MessageError(StompClientError::Frame(err)),
        };
        match frame.command() {
            StompCommand::Message => {
                let subscription_matches = frame.header_value(StompHeader::Subscription)
                    == self.subscription_id.as_deref();
                let destination_matches = frame.header_value(StompHeader::Destination)
                    == Some(self.destination.as_str());
                if subscription_matches && destination_matches {
                    SessionEvent::Message(frame.body().to_string())
                } else {
                    SessionEvent::MessageError(StompClientError::InvalidMessageHeaders)
                }
            }
            StompCommand::Error => {
                self.state = SessionState::Failed;
                SessionEvent::Disconnected(StompClientError::ServerError(
                    frame.body().to_string(),
                ))
            }
            command => SessionEvent::MessageError(StompClientError::UnexpectedCommand(command)),
        }
    }

    /// Closes the transport. Terminal: the session ends in `Closed` whether
    /// or not the transport closed cleanly.
    pub async fn close(&mut self) -> Result<(), StompClientError> {
        if self.is_disconnected() {
            return Ok(());
        }
        self.state = SessionState::Closing;
        let result = self.transport.close().await;
        self.state = SessionState::Closed;
        result.map_err(StompClientError::from)
    }

    async fn receive_frame_or_fail(&mut self) -> Result<StompFrame, StompClientError> {
        let received = match self.transport.receive().await {
            Ok(Some(text)) => StompFrame::parse(text).map_err(StompClientError::Frame),
            Ok(None) => Err(StompClientError::Transport(TransportError::ReadFailed(
                "stream ended during handshake".to_string(),
            ))),
            Err(err) => Err(err.into()),
        };
        if received.is_err() {
            self.state = SessionState::Failed;
        }
        received
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;

    use super::{StompTransport, TransportError};

    /// How the mock reacts to an outbound SUBSCRIBE frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum SubscribeBehavior {
        /// Echo a RECEIPT with the receipt id taken from the frame.
        EchoReceipt,
        /// Answer with a RECEIPT carrying an unrelated receipt id.
        WrongReceipt,
        /// Answer with an ERROR frame.
        ServerError,
        /// Stay silent; the test scripts the inbound queue itself.
        Ignore,
    }

    /// Scripted in-memory transport: inbound messages are popped from a
    /// queue, outbound messages are recorded.
    pub(crate) struct MockTransport {
        pub(crate) inbound: VecDeque<String>,
        pub(crate) sent: Vec<String>,
        pub(crate) subscribe_behavior: SubscribeBehavior,
        /// Bodies published as MESSAGE frames right after the receipt, under
        /// the subscription id the client chose.
        pub(crate) publish_after_subscribe: Vec<String>,
        /// Follow the published messages with a server ERROR frame.
        pub(crate) error_after_messages: bool,
        pub(crate) fail_connect: bool,
        pub(crate) drop_after_drain: bool,
        pub(crate) locally_closed: bool,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self {
                inbound: VecDeque::new(),
                sent: Vec::new(),
                subscribe_behavior: SubscribeBehavior::EchoReceipt,
                publish_after_subscribe: Vec::new(),
                error_after_messages: false,
                fail_connect: false,
                drop_after_drain: false,
                locally_closed: false,
            }
        }

        pub(crate) fn push_inbound(&mut self, message: &str) {
            self.inbound.push_back(message.to_string());
        }

        fn header_line_value(frame: &str, name: &str) -> Option<String> {
            let prefix = format!("{}:", name);
            frame
                .lines()
                .find_map(|line| line.strip_prefix(&prefix).map(|value| value.to_string()))
        }
    }

    impl StompTransport for MockTransport {
        async fn connect(&mut self) -> Result<(), TransportError> {
            if self.fail_connect {
                Err(TransportError::ConnectFailed("mock refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn send(&mut self, message: &str) -> Result<(), TransportError> {
            if message.starts_with("SUBSCRIBE\n") {
                match self.subscribe_behavior {
                    SubscribeBehavior::EchoReceipt => {
                        let receipt_id = Self::header_line_value(message, "receipt")
                            .expect("SUBSCRIBE frame carries a receipt header");
                        self.push_inbound(&format!("RECEIPT\nreceipt-id:{}\n\n\0", receipt_id));
                        let subscription_id = Self::header_line_value(message, "id")
                            .expect("SUBSCRIBE frame carries an id header");
                        let destination = Self::header_line_value(message, "destination")
                            .expect("SUBSCRIBE frame carries a destination header");
                        for (nb, body) in self.publish_after_subscribe.clone().iter().enumerate() {
                            self.push_inbound(&format!(
                                "MESSAGE\nsubscription:{}\nmessage-id:{:03}\ndestination:{}\n\n{}\0",
                                subscription_id, nb, destination, body
                            ));
                        }
                        if self.error_after_messages {
                            self.push_inbound(
                                "ERROR\ncontent-length:5\ncontent-type:text/plain\n\nError\0",
                            );
                        }
                    }
                    SubscribeBehavior::WrongReceipt => {
                        self.push_inbound("RECEIPT\nreceipt-id:0xdead\n\n\0");
                    }
                    SubscribeBehavior::ServerError => {
                        self.push_inbound(
                            "ERROR\ncontent-length:5\ncontent-type:text/plain\n\nError\0",
                        );
                    }
                    SubscribeBehavior::Ignore => {}
                }
            }
            self.sent.push(message.to_string());
            Ok(())
        }

        async fn receive(&mut self) -> Result<Option<String>, TransportError> {
            match self.inbound.pop_front() {
                Some(message) => Ok(Some(message)),
                None if self.locally_closed => Ok(None),
                None if self.drop_after_drain => Err(TransportError::ReadFailed(
                    "mock peer went away".to_string(),
                )),
                None => Ok(None),
            }
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            self.locally_closed = true;
            Ok(())
        }
    }
}
