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

use heimdall::layout::{LineRecord, NetworkLayout, RouteRecord, StationRecord, TravelTimeRecord};
use heimdall::TransportNetwork;

/// Fluent builder for small test networks.
///
/// ```ignore
/// let network = LayoutBuilder::default()
///     .stations(&["A", "B", "C"])
///     .line("l1", |line| {
///         line.route("r1", "eastbound", &["A", "B", "C"]);
///     })
///     .travel_time("A", "B", 3)
///     .build();
/// ```
#[derive(Default)]
pub struct LayoutBuilder {
    stations: Vec<StationRecord>,
    lines: Vec<LineRecord>,
    travel_times: Vec<TravelTimeRecord>,
}

pub struct LineBuilder {
    routes: Vec<RouteRecord>,
}

impl LineBuilder {
    pub fn route(&mut self, route_id: &str, direction: &str, stops: &[&str]) -> &mut Self {
        self.routes.push(RouteRecord {
            route_id: route_id.to_string(),
            direction: direction.to_string(),
            start_station_id: stops[0].to_string(),
            end_station_id: stops[stops.len() - 1].to_string(),
            route_stops: stops.iter().map(|stop| stop.to_string()).collect(),
        });
        self
    }
}

impl LayoutBuilder {
    pub fn station(mut self, station_id: &str, name: &str) -> Self {
        self.stations.push(StationRecord {
            station_id: station_id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn stations(mut self, station_ids: &[&str]) -> Self {
        for station_id in station_ids {
            self = self.station(station_id, station_id);
        }
        self
    }

    pub fn line<F>(mut self, line_id: &str, config: F) -> Self
    where
        F: FnOnce(&mut LineBuilder),
    {
        let mut line_builder = LineBuilder { routes: Vec::new() };
        config(&mut line_builder);
        self.lines.push(LineRecord {
            line_id: line_id.to_string(),
            name: line_id.to_string(),
            routes: line_builder.routes,
        });
        self
    }

    pub fn travel_time(mut self, from: &str, to: &str, travel_time: u32) -> Self {
        self.travel_times.push(TravelTimeRecord {
            start_station_id: from.to_string(),
            end_station_id: to.to_string(),
            travel_time,
        });
        self
    }

    pub fn build_layout(self) -> NetworkLayout {
        NetworkLayout {
            stations: self.stations,
            lines: self.lines,
            travel_times: self.travel_times,
        }
    }

    pub fn build(self) -> TransportNetwork {
        TransportNetwork::from_layout(&self.build_layout())
            .expect("test layout should hydrate cleanly")
    }
}
