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

mod utils;

use anyhow::Error;
use heimdall::{PassengerEvent, PassengerEventKind, TransportNetwork};
use heimdall_launch::config::{PlannerParams, RouteCriteria};
use heimdall_launch::logger::init_test_logger;
use heimdall_launch::solver::{RouteRequest, Solver};
use utils::LayoutBuilder;

fn crowd(network: &mut TransportNetwork, station_id: &str, entries: u32) {
    for _ in 0..entries {
        network
            .record_passenger_event(&PassengerEvent {
                station_id: station_id.to_string(),
                kind: PassengerEventKind::In,
            })
            .unwrap();
    }
}

/// A four-station diamond: a fast corridor through B and a slower corridor
/// through D.
fn diamond(fast: (u32, u32), slow: (u32, u32)) -> TransportNetwork {
    LayoutBuilder::default()
        .stations(&["A", "B", "C", "D"])
        .line("l1", |line| {
            line.route("r1", "eastbound", &["A", "B", "C"]);
        })
        .line("l2", |line| {
            line.route("r2", "eastbound", &["A", "D", "C"]);
        })
        .travel_time("A", "B", fast.0)
        .travel_time("B", "C", fast.1)
        .travel_time("A", "D", slow.0)
        .travel_time("D", "C", slow.1)
        .build()
}

#[test]
fn test_quietest_route_avoids_crowded_station() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let mut network = diamond((2, 2), (5, 5));
    crowd(&mut network, "B", 40);

    let solver = Solver::new(&PlannerParams::default());
    let quietest = solver.solve_request(
        &network,
        &RouteRequest {
            from: "A".to_string(),
            to: "C".to_string(),
            criteria: RouteCriteria::Quietest,
        },
    );

    assert_eq!(quietest.steps[0].end_station_id, "D");
    // the reported total is travel time, not the passenger metric
    assert_eq!(quietest.total_travel_time, 10);

    Ok(())
}

#[test]
fn test_preferred_route_accepts_small_detour() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    // fastest takes 10 through crowded B, the quiet detour takes 11:
    // 10 * 1.2 > 11, so the detour is preferred
    let mut network = diamond((5, 5), (5, 6));
    crowd(&mut network, "B", 40);

    let solver = Solver::new(&PlannerParams::default());
    let preferred = solver.solve_request(
        &network,
        &RouteRequest {
            from: "A".to_string(),
            to: "C".to_string(),
            criteria: RouteCriteria::Preferred,
        },
    );
    assert_eq!(preferred.steps[0].end_station_id, "D");
    assert_eq!(preferred.total_travel_time, 11);

    Ok(())
}

#[test]
fn test_preferred_route_rejects_large_detour() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    // the quiet detour takes 20 against 10: over the tolerance, keep fastest
    let mut network = diamond((5, 5), (10, 10));
    crowd(&mut network, "B", 40);

    let solver = Solver::new(&PlannerParams::default());
    let preferred = solver.solve_request(
        &network,
        &RouteRequest {
            from: "A".to_string(),
            to: "C".to_string(),
            criteria: RouteCriteria::Preferred,
        },
    );
    assert_eq!(preferred.steps[0].end_station_id, "B");
    assert_eq!(preferred.total_travel_time, 10);

    Ok(())
}

#[test]
fn test_quiet_tolerance_is_configurable() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    // same shape as the rejected detour, but with a lax tolerance
    let mut network = diamond((5, 5), (10, 10));
    crowd(&mut network, "B", 40);

    let params = PlannerParams {
        quiet_tolerance: 2.5,
        ..PlannerParams::default()
    };
    let solver = Solver::new(&params);
    let preferred = solver.solve_request(
        &network,
        &RouteRequest {
            from: "A".to_string(),
            to: "C".to_string(),
            criteria: RouteCriteria::Preferred,
        },
    );
    assert_eq!(preferred.steps[0].end_station_id, "D");

    Ok(())
}
