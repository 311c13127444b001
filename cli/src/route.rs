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

use anyhow::{bail, Error};
use launch::config::{LaunchParams, PlannerParams, RouteCriteria};
use launch::solver::{RouteRequest, Solver};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(rename_all = "snake_case")]
pub struct Options {
    #[structopt(flatten)]
    pub launch_params: LaunchParams,

    #[structopt(flatten)]
    pub planner_params: PlannerParams,

    /// station to depart from
    #[structopt(long)]
    pub start: String,

    /// station to arrive at
    #[structopt(long)]
    pub end: String,

    /// criteria to optimize : fastest, quietest or preferred
    #[structopt(long, default_value = "preferred")]
    pub criteria: RouteCriteria,
}

pub fn launch(options: Options) -> Result<(), Error> {
    let (network, _layout) = launch::read_network(&options.launch_params)?;
    if !network.contains_station(&options.start) {
        bail!("Unknown start station : {}", options.start);
    }
    if !network.contains_station(&options.end) {
        bail!("Unknown end station : {}", options.end);
    }

    let solver = Solver::new(&options.planner_params);
    let request = RouteRequest {
        from: options.start.clone(),
        to: options.end.clone(),
        criteria: options.criteria,
    };
    let travel_route = solver.solve_request(&network, &request);
    println!("{}", travel_route);
    Ok(())
}
