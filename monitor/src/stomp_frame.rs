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

//! Byte-level STOMP 1.2 frame parsing and validation.
//!
//! A frame is `COMMAND LF (header-name COLON header-value LF)* LF body NUL
//! trailing-LF*`. Parsing runs in ordered phases (command, headers, body,
//! trailer) and the first failure short-circuits; a structurally sound frame
//! is then validated against per-command header rules. The two failure
//! classes stay distinct: [`StompError::Parse`] for malformed bytes,
//! [`StompError::Validation`] for a well-formed frame that breaks the rules
//! of its command.

use std::fmt;

/// The closed set of STOMP 1.2 commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StompCommand {
    Send,
    Subscribe,
    Unsubscribe,
    Begin,
    Commit,
    Abort,
    Ack,
    Nack,
    Disconnect,
    Connect,
    Stomp,
    Connected,
    Message,
    Receipt,
    Error,
}

impl StompCommand {
    fn from_name(name: &str) -> Option<Self> {
        let command = match name {
            "SEND" => StompCommand::Send,
            "SUBSCRIBE" => StompCommand::Subscribe,
            "UNSUBSCRIBE" => StompCommand::Unsubscribe,
            "BEGIN" => StompCommand::Begin,
            "COMMIT" => StompCommand::Commit,
            "ABORT" => StompCommand::Abort,
            "ACK" => StompCommand::Ack,
            "NACK" => StompCommand::Nack,
            "DISCONNECT" => StompCommand::Disconnect,
            "CONNECT" => StompCommand::Connect,
            "STOMP" => StompCommand::Stomp,
            "CONNECTED" => StompCommand::Connected,
            "MESSAGE" => StompCommand::Message,
            "RECEIPT" => StompCommand::Receipt,
            "ERROR" => StompCommand::Error,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            StompCommand::Send => "SEND",
            StompCommand::Subscribe => "SUBSCRIBE",
            StompCommand::Unsubscribe => "UNSUBSCRIBE",
            StompCommand::Begin => "BEGIN",
            StompCommand::Commit => "COMMIT",
            StompCommand::Abort => "ABORT",
            StompCommand::Ack => "ACK",
            StompCommand::Nack => "NACK",
            StompCommand::Disconnect => "DISCONNECT",
            StompCommand::Connect => "CONNECT",
            StompCommand::Stomp => "STOMP",
            StompCommand::Connected => "CONNECTED",
            StompCommand::Message => "MESSAGE",
            StompCommand::Receipt => "RECEIPT",
            StompCommand::Error => "ERROR",
        }
    }
}

impl fmt::Display for StompCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The closed set of recognized headers. Any other header name is a parse
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StompHeader {
    AcceptVersion,
    Ack,
    ContentLength,
    ContentType,
    Destination,
    HeartBeat,
    Host,
    Id,
    Login,
    Message,
    MessageId,
    Passcode,
    Receipt,
    ReceiptId,
    Server,
    Session,
    Subscription,
    Transaction,
    Version,
}

pub const NB_OF_STOMP_HEADERS: usize = 19;

impl StompHeader {
    pub const ALL: [StompHeader; NB_OF_STOMP_HEADERS] = [
        StompHeader::AcceptVersion,
        StompHeader::Ack,
        StompHeader::ContentLength,
        StompHeader::ContentType,
        StompHeader::Destination,
        StompHeader::HeartBeat,
        StompHeader::Host,
        StompHeader::Id,
        StompHeader::Login,
        StompHeader::Message,
        StompHeader::MessageId,
        StompHeader::Passcode,
        StompHeader::Receipt,
        StompHeader::ReceiptId,
        StompHeader::Server,
        StompHeader::Session,
        StompHeader::Subscription,
        StompHeader::Transaction,
        StompHeader::Version,
    ];

    fn from_name(name: &str) -> Option<Self> {
        let header = match name {
            "accept-version" => StompHeader::AcceptVersion,
            "ack" => StompHeader::Ack,
            "content-length" => StompHeader::ContentLength,
            "content-type" => StompHeader::ContentType,
            "destination" => StompHeader::Destination,
            "heart-beat" => StompHeader::HeartBeat,
            "host" => StompHeader::Host,
            "id" => StompHeader::Id,
            "login" => StompHeader::Login,
            "message" => StompHeader::Message,
            "message-id" => StompHeader::MessageId,
            "passcode" => StompHeader::Passcode,
            "receipt" => StompHeader::Receipt,
            "receipt-id" => StompHeader::ReceiptId,
            "server" => StompHeader::Server,
            "session" => StompHeader::Session,
            "subscription" => StompHeader::Subscription,
            "transaction" => StompHeader::Transaction,
            "version" => StompHeader::Version,
            _ => return None,
        };
        Some(header)
    }

    pub fn name(&self) -> &'static str {
        match self {
            StompHeader::AcceptVersion => "accept-version",
            StompHeader::Ack => "ack",
            StompHeader::ContentLength => "content-length",
            StompHeader::ContentType => "content-type",
            StompHeader::Destination => "destination",
            StompHeader::HeartBeat => "heart-beat",
            StompHeader::Host => "host",
            StompHeader::Id => "id",
            StompHeader::Login => "login",
            StompHeader::Message => "message",
            StompHeader::MessageId => "message-id",
            StompHeader::Passcode => "passcode",
            StompHeader::Receipt => "receipt",
            StompHeader::ReceiptId => "receipt-id",
            StompHeader::Server => "server",
            StompHeader::Session => "session",
            StompHeader::Subscription => "subscription",
            StompHeader::Transaction => "transaction",
            StompHeader::Version => "version",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StompHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Structural failure: the bytes do not form a STOMP frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownCommand,
    UnknownHeader,
    UnterminatedHeader,
    EmptyHeaderValue(StompHeader),
    DuplicateHeader(StompHeader),
    MissingHeadersEnd,
    MissingBodyTerminator,
    TrailingBytes,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownCommand => write!(f, "unknown or unterminated command"),
            ParseError::UnknownHeader => write!(f, "unrecognized header name"),
            ParseError::UnterminatedHeader => write!(f, "header line without line feed"),
            ParseError::EmptyHeaderValue(header) => {
                write!(f, "header {} has an empty value", header)
            }
            ParseError::DuplicateHeader(header) => {
                write!(f, "header {} appears more than once", header)
            }
            ParseError::MissingHeadersEnd => write!(f, "missing empty line after headers"),
            ParseError::MissingBodyTerminator => write!(f, "missing NUL after body"),
            ParseError::TrailingBytes => write!(f, "unexpected bytes after the NUL terminator"),
        }
    }
}

/// Rule failure: a structurally sound frame that its command forbids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnexpectedHeader {
        command: StompCommand,
        header: StompHeader,
    },
    MissingRequiredHeader {
        command: StompCommand,
        header: StompHeader,
    },
    BadAckValue,
    BadContentLength,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnexpectedHeader { command, header } => {
                write!(f, "header {} is not allowed on {}", header, command)
            }
            ValidationError::MissingRequiredHeader { command, header } => {
                write!(f, "header {} is required on {}", header, command)
            }
            ValidationError::BadAckValue => {
                write!(f, "ack must be auto, client or client-individual")
            }
            ValidationError::BadContentLength => {
                write!(f, "content-length does not match the body length")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StompError {
    Parse(ParseError),
    Validation(ValidationError),
}

impl fmt::Display for StompError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StompError::Parse(err) => write!(f, "parse error: {}", err),
            StompError::Validation(err) => write!(f, "validation error: {}", err),
        }
    }
}

impl From<ParseError> for StompError {
    fn from(err: ParseError) -> Self {
        StompError::Parse(err)
    }
}

impl From<ValidationError> for StompError {
    fn from(err: ValidationError) -> Self {
        StompError::Validation(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

/// A validated STOMP frame.
///
/// The frame owns its backing buffer; header values and the body are spans
/// into it, so the accessors return views valid for the frame's lifetime.
#[derive(Debug, Clone)]
pub struct StompFrame {
    data: String,
    command: StompCommand,
    header_values: [Option<Span>; NB_OF_STOMP_HEADERS],
    body: Span,
}

const VALID_ACK_VALUES: [&str; 3] = ["auto", "client", "client-individual"];
const DEFAULT_ACK_VALUE: &str = "auto";

fn required_headers(command: StompCommand) -> &'static [StompHeader] {
    match command {
        StompCommand::Connect | StompCommand::Stomp => {
            &[StompHeader::AcceptVersion, StompHeader::Host]
        }
        StompCommand::Connected => &[StompHeader::Version],
        StompCommand::Send => &[StompHeader::Destination],
        StompCommand::Subscribe => &[StompHeader::Destination, StompHeader::Id],
        StompCommand::Unsubscribe => &[StompHeader::Id],
        StompCommand::Ack | StompCommand::Nack => &[StompHeader::Id],
        StompCommand::Begin | StompCommand::Commit | StompCommand::Abort => {
            &[StompHeader::Transaction]
        }
        StompCommand::Disconnect => &[],
        StompCommand::Message => &[
            StompHeader::Destination,
            StompHeader::MessageId,
            StompHeader::Subscription,
        ],
        StompCommand::Receipt => &[StompHeader::ReceiptId],
        StompCommand::Error => &[],
    }
}

fn optional_headers(command: StompCommand) -> &'static [StompHeader] {
    match command {
        StompCommand::Connect | StompCommand::Stomp => &[
            StompHeader::Login,
            StompHeader::Passcode,
            StompHeader::HeartBeat,
        ],
        StompCommand::Connected => &[
            StompHeader::Session,
            StompHeader::Server,
            StompHeader::HeartBeat,
        ],
        StompCommand::Send => &[StompHeader::Transaction, StompHeader::ContentType],
        StompCommand::Subscribe => &[StompHeader::Ack],
        StompCommand::Unsubscribe => &[],
        StompCommand::Ack | StompCommand::Nack => &[StompHeader::Transaction],
        StompCommand::Begin | StompCommand::Commit | StompCommand::Abort => &[],
        StompCommand::Disconnect => &[StompHeader::Receipt],
        StompCommand::Message => &[StompHeader::Ack, StompHeader::ContentType],
        StompCommand::Receipt => &[],
        StompCommand::Error => &[StompHeader::Message, StompHeader::ContentType],
    }
}

impl StompFrame {
    /// Parses and validates one frame from its backing buffer.
    pub fn parse(data: String) -> Result<Self, StompError> {
        let mut frame = StompFrame {
            data,
            command: StompCommand::Error,
            header_values: [None; NB_OF_STOMP_HEADERS],
            body: Span { start: 0, end: 0 },
        };
        let idx = frame.parse_command()?;
        let idx = frame.parse_headers(idx)?;
        let idx = frame.parse_body(idx)?;
        frame.parse_trailer(idx)?;
        frame.validate()?;
        Ok(frame)
    }

    pub fn command(&self) -> StompCommand {
        self.command
    }

    /// The value of a header, as a view into the frame.
    ///
    /// On a SUBSCRIBE frame an absent `ack` reads as its default, `auto`.
    pub fn header_value(&self, header: StompHeader) -> Option<&str> {
        match self.header_values[header.index()] {
            Some(span) => Some(&self.data[span.start..span.end]),
            None if self.command == StompCommand::Subscribe && header == StompHeader::Ack => {
                Some(DEFAULT_ACK_VALUE)
            }
            None => None,
        }
    }

    pub fn has_header(&self, header: StompHeader) -> bool {
        self.header_values[header.index()].is_some()
    }

    /// The headers present on the wire, in enum order.
    pub fn headers(&self) -> impl Iterator<Item = (StompHeader, &str)> + '_ {
        StompHeader::ALL.iter().filter_map(move |header| {
            self.header_values[header.index()]
                .map(|span| (*header, &self.data[span.start..span.end]))
        })
    }

    pub fn body(&self) -> &str {
        &self.data[self.body.start..self.body.end]
    }

    pub fn has_body(&self) -> bool {
        self.body.start != self.body.end
    }

    fn parse_command(&mut self) -> Result<usize, ParseError> {
        let bytes = self.data.as_bytes();
        let end = bytes
            .iter()
            .position(|&byte| byte == b'\n')
            .ok_or(ParseError::UnknownCommand)?;
        self.command =
            StompCommand::from_name(&self.data[..end]).ok_or(ParseError::UnknownCommand)?;
        Ok(end + 1)
    }

    fn parse_headers(&mut self, mut idx: usize) -> Result<usize, ParseError> {
        loop {
            if idx >= self.data.as_bytes().len() {
                return Err(ParseError::MissingHeadersEnd);
            }
            if self.data.as_bytes()[idx] == b'\n' {
                return Ok(idx + 1);
            }
            idx = self.parse_header(idx)?;
        }
    }

    fn parse_header(&mut self, start: usize) -> Result<usize, ParseError> {
        let bytes = self.data.as_bytes();
        let mut idx = start;
        while idx < bytes.len() && bytes[idx] != b':' && bytes[idx] != b'\n' {
            idx += 1;
        }
        if idx >= bytes.len() || bytes[idx] != b':' {
            return Err(ParseError::UnknownHeader);
        }
        let header =
            StompHeader::from_name(&self.data[start..idx]).ok_or(ParseError::UnknownHeader)?;

        // only the first colon separates; the value may contain more
        idx += 1;
        let value_start = idx;
        while idx < bytes.len() && bytes[idx] != b'\n' {
            idx += 1;
        }
        if idx >= bytes.len() {
            return Err(ParseError::UnterminatedHeader);
        }
        if idx == value_start {
            return Err(ParseError::EmptyHeaderValue(header));
        }
        if self.header_values[header.index()].is_some() {
            return Err(ParseError::DuplicateHeader(header));
        }
        self.header_values[header.index()] = Some(Span {
            start: value_start,
            end: idx,
        });
        Ok(idx + 1)
    }

    fn parse_body(&mut self, start: usize) -> Result<usize, ParseError> {
        let bytes = self.data.as_bytes();
        let mut idx = start;
        while idx < bytes.len() && bytes[idx] != b'\0' {
            idx += 1;
        }
        if idx >= bytes.len() {
            return Err(ParseError::MissingBodyTerminator);
        }
        self.body = Span { start, end: idx };
        Ok(idx + 1)
    }

    fn parse_trailer(&self, start: usize) -> Result<(), ParseError> {
        let bytes = self.data.as_bytes();
        if bytes[start..].iter().all(|&byte| byte == b'\n') {
            Ok(())
        } else {
            Err(ParseError::TrailingBytes)
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let required = required_headers(self.command);
        let optional = optional_headers(self.command);

        let mut required_found = 0;
        for (header, _) in self.headers() {
            // content-length is tolerated on every command
            if header == StompHeader::ContentLength {
                continue;
            }
            if required.contains(&header) {
                required_found += 1;
            } else if !optional.contains(&header) {
                return Err(ValidationError::UnexpectedHeader {
                    command: self.command,
                    header,
                });
            }
        }
        if required_found != required.len() {
            // report the first one missing
            for header in required {
                if !self.has_header(*header) {
                    return Err(ValidationError::MissingRequiredHeader {
                        command: self.command,
                        header: *header,
                    });
                }
            }
        }

        if self.command == StompCommand::Subscribe {
            let ack = self
                .header_value(StompHeader::Ack)
                .unwrap_or(DEFAULT_ACK_VALUE);
            if !VALID_ACK_VALUES.contains(&ack) {
                return Err(ValidationError::BadAckValue);
            }
        }

        if let Some(content_length) = self.header_value(StompHeader::ContentLength) {
            let expected: usize = content_length
                .parse()
                .map_err(|_| ValidationError::BadContentLength)?;
            if expected != self.body().len() {
                return Err(ValidationError::BadContentLength);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(frame: &str) -> Result<StompFrame, StompError> {
        StompFrame::parse(frame.to_string())
    }

    fn parse_err(frame: &str) -> ParseError {
        match parse(frame) {
            Err(StompError::Parse(err)) => err,
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    fn validation_err(frame: &str) -> ValidationError {
        match parse(frame) {
            Err(StompError::Validation(err)) => err,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn well_formed_connect_frame() {
        let frame = parse("CONNECT\naccept-version:1.2\nhost:host.com\n\nFrame body\0").unwrap();
        assert_eq!(frame.command(), StompCommand::Connect);
        assert_eq!(frame.header_value(StompHeader::AcceptVersion), Some("1.2"));
        assert_eq!(frame.header_value(StompHeader::Host), Some("host.com"));
        assert_eq!(frame.header_value(StompHeader::Login), None);
        assert_eq!(frame.body(), "Frame body");
        assert!(frame.has_body());
    }

    #[test]
    fn empty_body_and_trailing_newlines() {
        let frame = parse("DISCONNECT\nreceipt:77\n\n\0\n\n\n").unwrap();
        assert_eq!(frame.command(), StompCommand::Disconnect);
        assert_eq!(frame.body(), "");
        assert!(!frame.has_body());
    }

    #[test]
    fn body_may_contain_newlines() {
        let frame = parse("ERROR\n\nline one\nline two\0").unwrap();
        assert_eq!(frame.body(), "line one\nline two");
    }

    #[test]
    fn value_may_contain_colons() {
        let frame = parse("CONNECT\naccept-version:1.2\nhost:host.com:443\n\n\0").unwrap();
        assert_eq!(frame.header_value(StompHeader::Host), Some("host.com:443"));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert_eq!(parse_err("CONNECTX\nhost:a\n\n\0"), ParseError::UnknownCommand);
        // lowercase commands are not in the closed set
        assert_eq!(parse_err("connect\nhost:a\n\n\0"), ParseError::UnknownCommand);
        // a buffer without any line feed never yields a command
        assert_eq!(parse_err("CONNECT"), ParseError::UnknownCommand);
        assert_eq!(parse_err(""), ParseError::UnknownCommand);
    }

    #[test]
    fn unknown_header_is_rejected() {
        assert_eq!(
            parse_err("CONNECT\nnot-a-header:1\n\n\0"),
            ParseError::UnknownHeader
        );
        // a header line without a colon has no recognizable name
        assert_eq!(parse_err("CONNECT\nhost\n\n\0"), ParseError::UnknownHeader);
    }

    #[test]
    fn empty_header_value_is_rejected() {
        assert_eq!(
            parse_err("CONNECT\nhost:\n\n\0"),
            ParseError::EmptyHeaderValue(StompHeader::Host)
        );
    }

    #[test]
    fn duplicate_header_is_rejected() {
        assert_eq!(
            parse_err("CONNECT\nhost:a\nhost:b\n\n\0"),
            ParseError::DuplicateHeader(StompHeader::Host)
        );
    }

    #[test]
    fn missing_headers_end_is_rejected() {
        assert_eq!(
            parse_err("CONNECT\naccept-version:1.2\nhost:host.com\n"),
            ParseError::MissingHeadersEnd
        );
        assert_eq!(parse_err("RECEIPT\nreceipt-id:1"), ParseError::UnterminatedHeader);
    }

    #[test]
    fn missing_body_terminator_is_rejected() {
        assert_eq!(
            parse_err("CONNECT\naccept-version:1.2\nhost:host.com\n\nFrame body"),
            ParseError::MissingBodyTerminator
        );
    }

    #[test]
    fn junk_after_the_terminator_is_rejected() {
        assert_eq!(
            parse_err("CONNECT\naccept-version:1.2\nhost:host.com\n\nFrame body\0junk"),
            ParseError::TrailingBytes
        );
        assert_eq!(
            parse_err("CONNECT\naccept-version:1.2\nhost:host.com\n\n\0\n \n"),
            ParseError::TrailingBytes
        );
    }

    #[test]
    fn missing_required_header_is_a_validation_error() {
        assert_eq!(
            validation_err("CONNECT\naccept-version:1.2\n\n\0"),
            ValidationError::MissingRequiredHeader {
                command: StompCommand::Connect,
                header: StompHeader::Host,
            }
        );
        assert_eq!(
            validation_err("MESSAGE\ndestination:/queue\nmessage-id:1\n\n\0"),
            ValidationError::MissingRequiredHeader {
                command: StompCommand::Message,
                header: StompHeader::Subscription,
            }
        );
    }

    #[test]
    fn unexpected_header_is_a_validation_error() {
        assert_eq!(
            validation_err("RECEIPT\nreceipt-id:1\nhost:host.com\n\n\0"),
            ValidationError::UnexpectedHeader {
                command: StompCommand::Receipt,
                header: StompHeader::Host,
            }
        );
    }

    #[test]
    fn stomp_command_shares_connect_rules() {
        let frame =
            parse("STOMP\naccept-version:1.2\nhost:host.com\nlogin:bob\npasscode:pw\n\n\0")
                .unwrap();
        assert_eq!(frame.command(), StompCommand::Stomp);
        assert!(matches!(
            validation_err("STOMP\naccept-version:1.2\n\n\0"),
            ValidationError::MissingRequiredHeader { .. }
        ));
    }

    #[test]
    fn subscribe_ack_defaults_to_auto() {
        let frame = parse("SUBSCRIBE\ndestination:/passengers\nid:0\n\n\0").unwrap();
        assert!(!frame.has_header(StompHeader::Ack));
        assert_eq!(frame.header_value(StompHeader::Ack), Some("auto"));
    }

    #[test]
    fn subscribe_ack_values_are_checked() {
        assert!(parse("SUBSCRIBE\ndestination:/passengers\nid:0\nack:client\n\n\0").is_ok());
        assert!(
            parse("SUBSCRIBE\ndestination:/passengers\nid:0\nack:client-individual\n\n\0").is_ok()
        );
        assert_eq!(
            validation_err("SUBSCRIBE\ndestination:/passengers\nid:0\nack:sometimes\n\n\0"),
            ValidationError::BadAckValue
        );
    }

    #[test]
    fn content_length_is_tolerated_everywhere_but_checked() {
        let frame =
            parse("RECEIPT\nreceipt-id:1\ncontent-length:5\n\nhello\0").unwrap();
        assert_eq!(frame.body(), "hello");

        // body is 10 bytes, header says 9
        assert_eq!(
            validation_err(
                "CONNECT\naccept-version:42\nhost:host.com\ncontent-length:9\n\nFrame body\0"
            ),
            ValidationError::BadContentLength
        );
        assert_eq!(
            validation_err("RECEIPT\nreceipt-id:1\ncontent-length:five\n\nhello\0"),
            ValidationError::BadContentLength
        );
    }

    #[test]
    fn message_frame_exposes_views() {
        let frame = parse(
            "MESSAGE\nsubscription:42\nmessage-id:001\ndestination:/passengers\n\
             content-length:11\ncontent-type:text/plain\n\nhello queue\0",
        )
        .unwrap();
        assert_eq!(frame.command(), StompCommand::Message);
        assert_eq!(frame.header_value(StompHeader::Subscription), Some("42"));
        assert_eq!(frame.header_value(StompHeader::Destination), Some("/passengers"));
        assert_eq!(frame.body(), "hello queue");
    }

    #[test]
    fn round_trip_preserves_command_headers_and_body() {
        let frames = [
            "CONNECTED\nversion:1.2\nsession:12\n\n\0",
            "MESSAGE\nsubscription:42\nmessage-id:001\ndestination:/passengers\n\nhello\0",
            "SUBSCRIBE\ndestination:/passengers\nid:7\nack:client\n\n\0",
        ];
        for original in frames {
            let frame = parse(original).unwrap();
            // re-serialize headers in reverse order: the parser must accept
            // the result and expose the same content
            let mut serialized = format!("{}\n", frame.command().name());
            let headers: Vec<_> = frame.headers().collect();
            for (header, value) in headers.iter().rev() {
                serialized.push_str(&format!("{}:{}\n", header.name(), value));
            }
            serialized.push('\n');
            serialized.push_str(frame.body());
            serialized.push('\0');

            let reparsed = StompFrame::parse(serialized).unwrap();
            assert_eq!(reparsed.command(), frame.command());
            assert_eq!(reparsed.body(), frame.body());
            let mut original_headers: Vec<_> = frame.headers().collect();
            let mut reparsed_headers: Vec<_> = reparsed.headers().collect();
            original_headers.sort();
            reparsed_headers.sort();
            assert_eq!(original_headers, reparsed_headers);
        }
    }
}
