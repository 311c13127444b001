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

//! Optimal-route search over the expanded `(station, route, line)` space.
//!
//! Both variants run the same min-heap Dijkstra; they differ only in the
//! priority fed to the heap. The fastest variant orders states by
//! accumulated travel time (change penalties included). The quietest
//! variant orders them by accumulated passenger counts, while still
//! accumulating travel time on the side for reporting.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::model::Id;
use crate::response::{Step, TravelRoute};
use crate::transport_network::TransportNetwork;

/// Search parameters.
#[derive(Debug, Clone)]
pub struct PlannerParams {
    /// Surcharge applied when a hop leaves the current route for another
    /// route on another line. Same unit as travel times.
    pub change_penalty: u32,
    /// How much travel-time inflation a quieter journey is allowed before
    /// the fastest journey is preferred instead.
    pub quiet_tolerance: f64,
}

pub const DEFAULT_CHANGE_PENALTY: u32 = 5;
pub const DEFAULT_QUIET_TOLERANCE: f64 = 1.2;

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            change_penalty: DEFAULT_CHANGE_PENALTY,
            quiet_tolerance: DEFAULT_QUIET_TOLERANCE,
        }
    }
}

/// A vertex of the expanded search space: a station, reached on a given
/// route of a given line. The source state carries no route and no line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct GraphStop {
    station_id: Id,
    route_id: Option<Id>,
    line_id: Option<Id>,
}

#[derive(Debug, Clone, Copy)]
enum Criteria {
    Fastest,
    Quietest,
}

/// Best-known priority and travel time of an expanded state.
///
/// The metric is signed: quietest searches sum passenger counts, which may
/// be negative.
#[derive(Debug, Clone, Copy)]
struct Labels {
    metric: i64,
    distance: u32,
}

/// Read-only journey planner over a [`TransportNetwork`].
#[derive(Debug, Clone, Default)]
pub struct RoutePlanner {
    params: PlannerParams,
}

impl RoutePlanner {
    pub fn new(params: PlannerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PlannerParams {
        &self.params
    }

    /// The journey minimizing total travel time (change penalties included).
    pub fn fastest_route(
        &self,
        network: &TransportNetwork,
        from: &Id,
        to: &Id,
    ) -> TravelRoute {
        self.search(network, from, to, Criteria::Fastest)
    }

    /// The journey minimizing accumulated passenger counts.
    ///
    /// The reported `total_travel_time` is still the travel time of the
    /// selected journey, not the passenger metric.
    pub fn quietest_route(
        &self,
        network: &TransportNetwork,
        from: &Id,
        to: &Id,
    ) -> TravelRoute {
        self.search(network, from, to, Criteria::Quietest)
    }

    /// The quietest journey when it costs at most `quiet_tolerance` times
    /// the fastest one, the fastest journey otherwise.
    pub fn preferred_route(
        &self,
        network: &TransportNetwork,
        from: &Id,
        to: &Id,
    ) -> TravelRoute {
        let fastest = self.fastest_route(network, from, to);
        let quietest = self.quietest_route(network, from, to);
        if f64::from(fastest.total_travel_time) * self.params.quiet_tolerance
            > f64::from(quietest.total_travel_time)
        {
            quietest
        } else {
            fastest
        }
    }

    fn search(
        &self,
        network: &TransportNetwork,
        from: &Id,
        to: &Id,
        criteria: Criteria,
    ) -> TravelRoute {
        if from == to {
            return TravelRoute {
                start_station_id: from.clone(),
                end_station_id: to.clone(),
                total_travel_time: 0,
                steps: vec![Step {
                    start_station_id: from.clone(),
                    end_station_id: to.clone(),
                    line_id: None,
                    route_id: None,
                    travel_time: 0,
                }],
            };
        }

        let source = GraphStop {
            station_id: from.clone(),
            route_id: None,
            line_id: None,
        };
        let mut labels: HashMap<GraphStop, Labels> = HashMap::new();
        let mut parents: HashMap<GraphStop, (GraphStop, u32)> = HashMap::new();
        let mut settled: HashSet<GraphStop> = HashSet::new();
        let mut queue: BinaryHeap<Reverse<(i64, GraphStop)>> = BinaryHeap::new();

        labels.insert(
            source.clone(),
            Labels {
                metric: 0,
                distance: 0,
            },
        );
        queue.push(Reverse((0, source)));

        while let Some(Reverse((_, stop))) = queue.pop() {
            if !settled.insert(stop.clone()) {
                continue;
            }
            let stop_labels = labels[&stop];
            for (to_station_id, metadata) in network.outgoing_route_metadata(&stop.station_id) {
                let change = match (&stop.route_id, &stop.line_id) {
                    (Some(route_id), Some(line_id)) => {
                        *route_id != metadata.route_id && *line_id != metadata.line_id
                    }
                    _ => false,
                };
                let hop_distance = metadata.travel_time
                    + if change { self.params.change_penalty } else { 0 };
                let hop_metric = match criteria {
                    Criteria::Fastest => i64::from(hop_distance),
                    Criteria::Quietest => {
                        // people waiting at the hop's destination; a change
                        // counts them a second time
                        let count = network.passenger_count(&to_station_id).unwrap_or(0);
                        if change {
                            2 * count
                        } else {
                            count
                        }
                    }
                };
                let next = GraphStop {
                    station_id: to_station_id,
                    route_id: Some(metadata.route_id),
                    line_id: Some(metadata.line_id),
                };
                if settled.contains(&next) {
                    continue;
                }
                let candidate = Labels {
                    metric: stop_labels.metric + hop_metric,
                    distance: stop_labels.distance + hop_distance,
                };
                let improves = labels
                    .get(&next)
                    .map_or(true, |current| candidate.metric < current.metric);
                if improves {
                    labels.insert(next.clone(), candidate);
                    parents.insert(next.clone(), (stop.clone(), hop_distance));
                    queue.push(Reverse((candidate.metric, next)));
                }
            }
        }

        let target = labels
            .iter()
            .filter(|(stop, _)| stop.station_id == *to)
            .min_by_key(|(_, labels)| labels.metric)
            .map(|(stop, _)| stop.clone());
        let target = match target {
            Some(target) => target,
            None => {
                return TravelRoute {
                    start_station_id: from.clone(),
                    end_station_id: to.clone(),
                    total_travel_time: 0,
                    steps: Vec::new(),
                }
            }
        };

        let mut steps = Vec::new();
        let mut current = target.clone();
        while let Some((parent, hop_distance)) = parents.get(&current) {
            steps.push(Step {
                start_station_id: parent.station_id.clone(),
                end_station_id: current.station_id.clone(),
                line_id: current.line_id.clone(),
                route_id: current.route_id.clone(),
                travel_time: *hop_distance,
            });
            current = parent.clone();
        }
        steps.reverse();

        TravelRoute {
            start_station_id: from.clone(),
            end_station_id: to.clone(),
            total_travel_time: labels[&target].distance,
            steps,
        }
    }
}
