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

use anyhow::{bail, Error};
use launch::config::{LaunchParams, PlannerParams, RouteCriteria};
use launch::heimdall::tracing::{info, trace};
use launch::solver::{RouteRequest, Solver};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(rename_all = "snake_case")]
pub struct Options {
    #[structopt(flatten)]
    pub launch_params: LaunchParams,

    #[structopt(flatten)]
    pub planner_params: PlannerParams,

    /// criteria to optimize : fastest, quietest or preferred
    #[structopt(long, default_value = "preferred")]
    pub criteria: RouteCriteria,

    /// number of random queries to solve
    #[structopt(long, default_value = "100")]
    pub nb_queries: u32,
}

pub fn launch(options: Options) -> Result<(), Error> {
    let (network, _layout) = launch::read_network(&options.launch_params)?;
    if network.nb_of_stations() == 0 {
        bail!("The layout contains no station, nothing to query");
    }
    let station_ids: Vec<_> = network.station_ids().cloned().collect();

    let solver = Solver::new(&options.planner_params);

    use rand::prelude::{IteratorRandom, SeedableRng};
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);

    let compute_timer = SystemTime::now();
    let mut nb_of_reachable = 0u32;
    for _ in 0..options.nb_queries {
        // unwraps are safe, station_ids is non-empty
        let from = station_ids.iter().choose(&mut rng).unwrap();
        let to = station_ids.iter().choose(&mut rng).unwrap();
        let request = RouteRequest {
            from: from.clone(),
            to: to.clone(),
            criteria: options.criteria,
        };
        let travel_route = solver.solve_request(&network, &request);
        if !travel_route.steps.is_empty() {
            nb_of_reachable += 1;
        }
        trace!("{}", travel_route);
    }

    info!("Nb of requests : {}", options.nb_queries);
    info!(
        "Nb of requests with a journey : {}",
        nb_of_reachable
    );
    if let Ok(duration) = compute_timer.elapsed() {
        info!(
            "Average duration per request : {} ms",
            (duration.as_millis() as f64) / (options.nb_queries as f64)
        );
    }

    Ok(())
}
