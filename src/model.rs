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

//! Value types describing the static shape of the network: stations, the
//! lines that serve them, and the routes a line runs.
//!
//! These types carry no graph structure. [`crate::TransportNetwork`] consumes
//! them and owns the resulting vertices and arcs.

/// Identifier for stations, lines and routes.
///
/// Identifiers are opaque: only equality and hashing are meaningful.
pub type Id = String;

/// A network station.
///
/// Well formed when `id` is unique across all stations in the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: Id,
    pub name: String,
}

/// One possible journey across a set of stops, in a fixed direction.
///
/// Each line has one or more routes. There may or may not be a corresponding
/// route in the opposite direction of travel.
///
/// Well formed when:
/// - `id` is unique across all lines and their routes in the network,
/// - `stops` has at least 2 stops, each resolving to an existing station,
/// - `start_station_id` is the first stop and `end_station_id` the last,
/// - every stop appears only once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: Id,
    pub direction: String,
    pub line_id: Id,
    pub start_station_id: Id,
    pub end_station_id: Id,
    pub stops: Vec<Id>,
}

/// A named collection of routes serving multiple stations.
///
/// Well formed when `id` is unique, `routes` is non-empty, and every
/// contained route is well formed with a `line_id` equal to this line's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub id: Id,
    pub name: String,
    pub routes: Vec<Route>,
}

/// An `in` or `out` observation at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerEvent {
    pub station_id: Id,
    pub kind: PassengerEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerEventKind {
    In,
    Out,
}

impl PassengerEventKind {
    /// Maps the wire spelling of an event kind. Unrecognized spellings
    /// return `None` and are dropped by the caller.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "in" => Some(PassengerEventKind::In),
            "out" => Some(PassengerEventKind::Out),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PassengerEventKind;

    #[test]
    fn event_kind_names() {
        assert_eq!(
            PassengerEventKind::from_name("in"),
            Some(PassengerEventKind::In)
        );
        assert_eq!(
            PassengerEventKind::from_name("out"),
            Some(PassengerEventKind::Out)
        );
        assert_eq!(PassengerEventKind::from_name("IN"), None);
        assert_eq!(PassengerEventKind::from_name(""), None);
    }
}
