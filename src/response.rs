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

//! Result types returned by the route planner.

use std::fmt;

use crate::model::Id;

/// One hop of a planned journey.
///
/// `line_id` and `route_id` are absent only on the degenerate self-journey
/// step. `travel_time` is the distance delta of the hop, so a hop that
/// triggered a line change reports the change penalty inside its time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub start_station_id: Id,
    pub end_station_id: Id,
    pub line_id: Option<Id>,
    pub route_id: Option<Id>,
    pub travel_time: u32,
}

/// A planned journey between two stations.
///
/// An unreachable destination yields an empty step list and a total travel
/// time of 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelRoute {
    pub start_station_id: Id,
    pub end_station_id: Id,
    pub total_travel_time: u32,
    pub steps: Vec<Step>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} on {}, {})",
            self.start_station_id,
            self.end_station_id,
            self.route_id.as_deref().unwrap_or("-"),
            self.line_id.as_deref().unwrap_or("-"),
            self.travel_time,
        )
    }
}

impl fmt::Display for TravelRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} -> {} in {}",
            self.start_station_id, self.end_station_id, self.total_travel_time
        )?;
        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }
        Ok(())
    }
}
