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

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
#[structopt(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct PlannerParams {
    /// penalty to apply when a journey hops onto a route of another line,
    /// in the same unit as the travel times
    #[structopt(long, default_value = DEFAULT_CHANGE_PENALTY)]
    #[serde(default = "default_change_penalty")]
    pub change_penalty: u32,

    /// travel time inflation factor tolerated for a quieter journey
    #[structopt(long, default_value = DEFAULT_QUIET_TOLERANCE)]
    #[serde(default = "default_quiet_tolerance")]
    pub quiet_tolerance: f64,
}

pub const DEFAULT_CHANGE_PENALTY: &str = "5";
pub const DEFAULT_QUIET_TOLERANCE: &str = "1.2";

pub fn default_change_penalty() -> u32 {
    u32::from_str(DEFAULT_CHANGE_PENALTY).unwrap()
}

pub fn default_quiet_tolerance() -> f64 {
    f64::from_str(DEFAULT_QUIET_TOLERANCE).unwrap()
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            change_penalty: default_change_penalty(),
            quiet_tolerance: default_quiet_tolerance(),
        }
    }
}

impl From<&PlannerParams> for heimdall::PlannerParams {
    fn from(params: &PlannerParams) -> Self {
        heimdall::PlannerParams {
            change_penalty: params.change_penalty,
            quiet_tolerance: params.quiet_tolerance,
        }
    }
}
