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

mod edges;

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::{Id, Line, PassengerEvent, PassengerEventKind, Station};

use edges::{EdgeIdx, RouteEdge, StationNode};
pub(crate) use edges::RouteMetadata;

/// Error while mutating the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkUpdateError {
    DuplicateStation(Id),
    UnknownStation(Id),
    DuplicateEdgeRoute { line_id: Id, route_id: Id },
    NoSuchEdge { from: Id, to: Id },
}

impl fmt::Display for NetworkUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkUpdateError::DuplicateStation(id) => {
                write!(f, "station {} is already in the network", id)
            }
            NetworkUpdateError::UnknownStation(id) => {
                write!(f, "station {} is not in the network", id)
            }
            NetworkUpdateError::DuplicateEdgeRoute { line_id, route_id } => {
                write!(
                    f,
                    "route {} of line {} is already registered on this edge",
                    route_id, line_id
                )
            }
            NetworkUpdateError::NoSuchEdge { from, to } => {
                write!(f, "stations {} and {} are not adjacent", from, to)
            }
        }
    }
}

impl std::error::Error for NetworkUpdateError {}

/// Error while querying the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkQueryError {
    UnknownStation(Id),
}

impl fmt::Display for NetworkQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkQueryError::UnknownStation(id) => {
                write!(f, "station {} is not in the network", id)
            }
        }
    }
}

impl std::error::Error for NetworkQueryError {}

/// Error while building a network from a layout document.
///
/// Any insertion failure is fatal to the hydration; only travel-time records
/// targeting non-adjacent pairs are tolerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationError {
    Station(NetworkUpdateError),
    Line { line_id: Id, source: NetworkUpdateError },
}

impl fmt::Display for HydrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HydrationError::Station(err) => write!(f, "could not add station: {}", err),
            HydrationError::Line { line_id, source } => {
                write!(f, "could not add line {}: {}", line_id, source)
            }
        }
    }
}

impl std::error::Error for HydrationError {}

/// The transport network as a directed multigraph.
///
/// Vertices are stations; arcs connect adjacent stations and carry every
/// `(line, route)` pair traversing that ordered pair, plus a shared travel
/// time. Arcs live in an arena and are referenced by index from both of
/// their endpoint nodes.
#[derive(Debug, Default, Clone)]
pub struct TransportNetwork {
    station_id_to_node: HashMap<Id, StationNode>,
    edges: Vec<RouteEdge>,
}

impl TransportNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a station to the network.
    ///
    /// Assumes the [`Station`] is well formed. The station cannot already be
    /// in the network.
    pub fn add_station(&mut self, station: Station) -> Result<(), NetworkUpdateError> {
        if self.station_id_to_node.contains_key(&station.id) {
            return Err(NetworkUpdateError::DuplicateStation(station.id));
        }
        self.station_id_to_node
            .insert(station.id, StationNode::new(station.name));
        Ok(())
    }

    /// Adds a line to the network.
    ///
    /// For every consecutive stop pair of every route, the directed edge is
    /// created if needed and the `(line, route)` pair registered on it.
    /// All stations served by the line must already be in the network, and
    /// the line cannot already be in the network.
    ///
    /// Assumes the [`Line`] is well formed. On failure the network keeps the
    /// edges registered before the failing pair.
    pub fn add_line(&mut self, line: &Line) -> Result<(), NetworkUpdateError> {
        for route in &line.routes {
            for pair in route.stops.windows(2) {
                let (prev_station_id, cur_station_id) = (&pair[0], &pair[1]);
                if !self.station_id_to_node.contains_key(cur_station_id) {
                    return Err(NetworkUpdateError::UnknownStation(cur_station_id.clone()));
                }
                let edge_idx = self.get_or_make_edge(prev_station_id, cur_station_id)?;
                let edge = &mut self.edges[edge_idx.idx];
                if !edge.add_route(&route.id, &line.id) {
                    return Err(NetworkUpdateError::DuplicateEdgeRoute {
                        line_id: line.id.clone(),
                        route_id: route.id.clone(),
                    });
                }
                // unwrap is safe, the destination was checked above
                self.station_id_to_node
                    .get_mut(cur_station_id)
                    .unwrap()
                    .incoming
                    .insert(prev_station_id.clone(), edge_idx);
            }
        }
        Ok(())
    }

    /// Records a passenger event at a station.
    ///
    /// The counter is signed on purpose: when observation starts mid-day,
    /// more exits than entries may be recorded.
    pub fn record_passenger_event(
        &mut self,
        event: &PassengerEvent,
    ) -> Result<(), NetworkUpdateError> {
        let node = self
            .station_id_to_node
            .get_mut(&event.station_id)
            .ok_or_else(|| NetworkUpdateError::UnknownStation(event.station_id.clone()))?;
        match event.kind {
            PassengerEventKind::In => node.passengers += 1,
            PassengerEventKind::Out => node.passengers -= 1,
        }
        Ok(())
    }

    /// The number of passengers currently recorded at a station. May be
    /// negative.
    pub fn passenger_count(&self, station_id: &Id) -> Result<i64, NetworkQueryError> {
        self.station_id_to_node
            .get(station_id)
            .map(|node| node.passengers)
            .ok_or_else(|| NetworkQueryError::UnknownStation(station_id.clone()))
    }

    /// The ids of all routes serving a station, over both incoming and
    /// outgoing edges, deduplicated.
    ///
    /// Empty when the station has no edges, and also when the station is not
    /// in the network at all.
    pub fn routes_serving(&self, station_id: &Id) -> Vec<Id> {
        let node = match self.station_id_to_node.get(station_id) {
            Some(node) => node,
            None => return Vec::new(),
        };
        let mut route_ids = HashSet::new();
        for edge_idx in node.outgoing.values().chain(node.incoming.values()) {
            for route_id in self.edges[edge_idx.idx].route_ids() {
                route_ids.insert(route_id.clone());
            }
        }
        route_ids.into_iter().collect()
    }

    /// Sets the travel time between two adjacent stations.
    ///
    /// The intent is symmetric: whichever of the two directed edges exist
    /// receive the same value. Fails only when neither direction exists.
    pub fn set_travel_time(
        &mut self,
        station_a: &Id,
        station_b: &Id,
        travel_time: u32,
    ) -> Result<(), NetworkUpdateError> {
        let forward = self.set_travel_time_directional(station_a, station_b, travel_time);
        let backward = self.set_travel_time_directional(station_b, station_a, travel_time);
        if forward || backward {
            Ok(())
        } else {
            Err(NetworkUpdateError::NoSuchEdge {
                from: station_a.clone(),
                to: station_b.clone(),
            })
        }
    }

    fn set_travel_time_directional(
        &mut self,
        station_a: &Id,
        station_b: &Id,
        travel_time: u32,
    ) -> bool {
        let edge_idx = match self
            .station_id_to_node
            .get(station_a)
            .and_then(|node| node.outgoing.get(station_b))
        {
            Some(edge_idx) => *edge_idx,
            None => return false,
        };
        self.edges[edge_idx.idx].travel_time = travel_time;
        true
    }

    /// The travel time between two adjacent stations: the maximum over the
    /// two directions, so that a single symmetric record covers whichever
    /// direction was hydrated first. 0 when the stations are equal or not
    /// adjacent.
    pub fn travel_time(&self, station_a: &Id, station_b: &Id) -> u32 {
        std::cmp::max(
            self.travel_time_directional(station_a, station_b),
            self.travel_time_directional(station_b, station_a),
        )
    }

    fn travel_time_directional(&self, station_a: &Id, station_b: &Id) -> u32 {
        if station_a == station_b {
            return 0;
        }
        self.station_id_to_node
            .get(station_a)
            .and_then(|node| node.outgoing.get(station_b))
            .map_or(0, |edge_idx| self.edges[edge_idx.idx].travel_time)
    }

    /// The cumulative travel time from `station_a` to `station_b` along one
    /// `(line, route)`, walking the route's edges and summing their times.
    ///
    /// 0 when the stations are equal, or when the walk dead-ends before
    /// reaching `station_b`.
    pub fn route_travel_time(
        &self,
        line_id: &Id,
        route_id: &Id,
        station_a: &Id,
        station_b: &Id,
    ) -> u32 {
        let mut cur_station = station_a;
        let mut total = 0u32;
        while cur_station != station_b {
            let node = match self.station_id_to_node.get(cur_station) {
                Some(node) => node,
                None => return 0,
            };
            // a route stops at each station at most once, so at most one
            // outgoing edge can carry this (line, route)
            let next = node.outgoing.iter().find_map(|(to_station_id, edge_idx)| {
                let edge = &self.edges[edge_idx.idx];
                edge.has_route(line_id, route_id)
                    .then(|| (to_station_id, edge.travel_time))
            });
            match next {
                Some((to_station_id, travel_time)) => {
                    total += travel_time;
                    cur_station = to_station_id;
                }
                None => return 0,
            }
        }
        total
    }

    pub fn contains_station(&self, station_id: &Id) -> bool {
        self.station_id_to_node.contains_key(station_id)
    }

    pub fn station_name(&self, station_id: &Id) -> Option<&str> {
        self.station_id_to_node
            .get(station_id)
            .map(|node| node.name.as_str())
    }

    pub fn nb_of_stations(&self) -> usize {
        self.station_id_to_node.len()
    }

    pub fn station_ids(&self) -> impl Iterator<Item = &Id> + '_ {
        self.station_id_to_node.keys()
    }

    /// Every `(destination, metadata)` entry reachable in one hop from a
    /// station. Feeds the planner's edge relaxation.
    pub(crate) fn outgoing_route_metadata(
        &self,
        station_id: &Id,
    ) -> Vec<(Id, RouteMetadata)> {
        let node = match self.station_id_to_node.get(station_id) {
            Some(node) => node,
            None => return Vec::new(),
        };
        let mut entries = Vec::new();
        for (to_station_id, edge_idx) in &node.outgoing {
            for metadata in self.edges[edge_idx.idx].route_metadata() {
                entries.push((to_station_id.clone(), metadata));
            }
        }
        entries
    }

    fn get_or_make_edge(
        &mut self,
        from_station_id: &Id,
        to_station_id: &Id,
    ) -> Result<EdgeIdx, NetworkUpdateError> {
        let node = self
            .station_id_to_node
            .get_mut(from_station_id)
            .ok_or_else(|| NetworkUpdateError::UnknownStation(from_station_id.clone()))?;
        if let Some(edge_idx) = node.outgoing.get(to_station_id) {
            return Ok(*edge_idx);
        }
        let edge_idx = EdgeIdx {
            idx: self.edges.len(),
        };
        node.outgoing.insert(to_station_id.clone(), edge_idx);
        self.edges.push(RouteEdge::default());
        Ok(edge_idx)
    }
}
