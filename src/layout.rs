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

//! The declarative network-layout document and its hydration into a
//! [`TransportNetwork`].
//!
//! The document lists stations, lines with their nested routes, and
//! symmetric travel-time records:
//!
//! ```json
//! { "stations":     [{"station_id": "s1", "name": "..."}],
//!   "lines":        [{"line_id": "l1", "name": "...",
//!                     "routes": [{"route_id": "r1", "direction": "inbound",
//!                                 "start_station_id": "s1",
//!                                 "end_station_id": "s2",
//!                                 "route_stops": ["s1", "s2"]}]}],
//!   "travel_times": [{"start_station_id": "s1", "end_station_id": "s2",
//!                     "travel_time": 2}] }
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Id, Line, Route, Station};
use crate::transport_network::{HydrationError, TransportNetwork};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkLayout {
    pub stations: Vec<StationRecord>,
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub travel_times: Vec<TravelTimeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub station_id: Id,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRecord {
    pub line_id: Id,
    pub name: String,
    pub routes: Vec<RouteRecord>,
}

/// A route as it appears in the document. The owning line is implied by
/// nesting, so there is no `line_id` field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: Id,
    pub direction: String,
    pub start_station_id: Id,
    pub end_station_id: Id,
    pub route_stops: Vec<Id>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelTimeRecord {
    pub start_station_id: Id,
    pub end_station_id: Id,
    pub travel_time: u32,
}

impl LineRecord {
    fn to_line(&self) -> Line {
        Line {
            id: self.line_id.clone(),
            name: self.name.clone(),
            routes: self
                .routes
                .iter()
                .map(|route| Route {
                    id: route.route_id.clone(),
                    direction: route.direction.clone(),
                    line_id: self.line_id.clone(),
                    start_station_id: route.start_station_id.clone(),
                    end_station_id: route.end_station_id.clone(),
                    stops: route.route_stops.clone(),
                })
                .collect(),
        }
    }
}

impl TransportNetwork {
    /// Builds a network from a layout document.
    ///
    /// Station and line insertion failures are fatal. A travel-time record
    /// targeting a non-adjacent pair is logged and skipped.
    pub fn from_layout(layout: &NetworkLayout) -> Result<Self, HydrationError> {
        let mut network = TransportNetwork::new();
        for record in &layout.stations {
            network
                .add_station(Station {
                    id: record.station_id.clone(),
                    name: record.name.clone(),
                })
                .map_err(HydrationError::Station)?;
        }
        for record in &layout.lines {
            network
                .add_line(&record.to_line())
                .map_err(|source| HydrationError::Line {
                    line_id: record.line_id.clone(),
                    source,
                })?;
        }
        for record in &layout.travel_times {
            let result = network.set_travel_time(
                &record.start_station_id,
                &record.end_station_id,
                record.travel_time,
            );
            if let Err(err) = result {
                warn!("Skipping travel time record: {}", err);
            }
        }
        Ok(network)
    }
}
