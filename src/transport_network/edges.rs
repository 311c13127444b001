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

use std::collections::{BTreeMap, HashMap};

use crate::model::Id;

/// Index of an edge in the network's edge arena.
///
/// Each directed edge is referenced by two nodes (the outgoing map of its
/// source and the incoming map of its destination), so nodes store indices
/// into the arena rather than owning the edge.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub(super) struct EdgeIdx {
    pub(super) idx: usize,
}

/// One `(line, route)` pair traversing a directed edge, together with the
/// edge's travel time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteMetadata {
    pub(crate) line_id: Id,
    pub(crate) route_id: Id,
    pub(crate) travel_time: u32,
}

/// A directed arc between two adjacent stations.
///
/// Carries every `(line, route)` pair that traverses this ordered station
/// pair, and a single travel time shared by all of them. The travel time
/// stays 0 until set explicitly.
#[derive(Debug, Default, Clone)]
pub(super) struct RouteEdge {
    pub(super) travel_time: u32,
    line_to_route_ids: BTreeMap<Id, Vec<Id>>,
}

impl RouteEdge {
    /// Registers `(line_id, route_id)` on this edge. Returns false if the
    /// pair is already registered.
    pub(super) fn add_route(&mut self, route_id: &Id, line_id: &Id) -> bool {
        if self.has_route(line_id, route_id) {
            return false;
        }
        self.line_to_route_ids
            .entry(line_id.clone())
            .or_default()
            .push(route_id.clone());
        true
    }

    pub(super) fn has_route(&self, line_id: &Id, route_id: &Id) -> bool {
        self.line_to_route_ids
            .get(line_id)
            .map_or(false, |route_ids| route_ids.contains(route_id))
    }

    pub(super) fn route_ids(&self) -> impl Iterator<Item = &Id> + '_ {
        self.line_to_route_ids.values().flatten()
    }

    pub(super) fn route_metadata(&self) -> Vec<RouteMetadata> {
        let mut metadata = Vec::new();
        for (line_id, route_ids) in &self.line_to_route_ids {
            for route_id in route_ids {
                metadata.push(RouteMetadata {
                    line_id: line_id.clone(),
                    route_id: route_id.clone(),
                    travel_time: self.travel_time,
                });
            }
        }
        metadata
    }
}

/// A graph vertex: one station, its signed passenger counter, and the edges
/// touching it.
#[derive(Debug, Clone)]
pub(super) struct StationNode {
    pub(super) name: String,
    pub(super) passengers: i64,
    pub(super) outgoing: HashMap<Id, EdgeIdx>,
    pub(super) incoming: HashMap<Id, EdgeIdx>,
}

impl StationNode {
    pub(super) fn new(name: String) -> Self {
        Self {
            name,
            passengers: 0,
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
        }
    }
}
