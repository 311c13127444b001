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

use std::time::SystemTime;

use heimdall::tracing::{debug, info};
use heimdall::{Id, RoutePlanner, TransportNetwork, TravelRoute};

use super::config;

/// A route query between two stations.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub from: Id,
    pub to: Id,
    pub criteria: config::RouteCriteria,
}

/// Facade between config-level requests and the route planner.
pub struct Solver {
    planner: RoutePlanner,
}

impl Solver {
    pub fn new(planner_params: &config::PlannerParams) -> Self {
        Self {
            planner: RoutePlanner::new(planner_params.into()),
        }
    }

    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    pub fn solve_request(&self, network: &TransportNetwork, request: &RouteRequest) -> TravelRoute {
        debug!(
            "Solving {} request from {} to {}",
            request.criteria, request.from, request.to
        );
        let timer = SystemTime::now();
        let travel_route = match request.criteria {
            config::RouteCriteria::Fastest => {
                self.planner.fastest_route(network, &request.from, &request.to)
            }
            config::RouteCriteria::Quietest => {
                self.planner.quietest_route(network, &request.from, &request.to)
            }
            config::RouteCriteria::Preferred => {
                self.planner.preferred_route(network, &request.from, &request.to)
            }
        };
        if let Ok(duration) = timer.elapsed() {
            info!(
                "Solved {} -> {} in {} us",
                request.from,
                request.to,
                duration.as_micros()
            );
        }
        travel_route
    }
}
