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

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteCriteria {
    Fastest,
    Quietest,
    Preferred,
}

impl std::str::FromStr for RouteCriteria {
    type Err = RouteCriteriaConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let criteria = match s {
            "fastest" => RouteCriteria::Fastest,
            "quietest" => RouteCriteria::Quietest,
            "preferred" => RouteCriteria::Preferred,
            _ => {
                return Err(RouteCriteriaConfigError {
                    criteria_name: s.to_string(),
                })
            }
        };
        Ok(criteria)
    }
}

impl Default for RouteCriteria {
    fn default() -> Self {
        Self::Preferred
    }
}

impl std::fmt::Display for RouteCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteCriteria::Fastest => write!(f, "fastest"),
            RouteCriteria::Quietest => write!(f, "quietest"),
            RouteCriteria::Preferred => write!(f, "preferred"),
        }
    }
}

#[derive(Debug)]
pub struct RouteCriteriaConfigError {
    criteria_name: String,
}

impl std::fmt::Display for RouteCriteriaConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bad route criteria : `{}`", self.criteria_name)
    }
}
