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

use std::{fs::File, io::BufReader, path::Path, time::SystemTime};

use anyhow::{Context, Error};
use heimdall::tracing::info;
use heimdall::{NetworkLayout, TransportNetwork};

use super::config;

/// Reads a layout document from a json file.
pub fn read_layout(path: &Path) -> Result<NetworkLayout, Error> {
    let file = File::open(path).context(format!("Could not open layout file {:?}", path))?;
    let reader = BufReader::new(file);
    let layout: NetworkLayout = serde_json::from_reader(reader)
        .context(format!("Could not parse layout file {:?}", path))?;
    Ok(layout)
}

/// Reads the layout document and hydrates the transport network from it.
pub fn read_network(
    launch_params: &config::LaunchParams,
) -> Result<(TransportNetwork, NetworkLayout), Error> {
    let layout = read_layout(&launch_params.network_layout_path)?;
    info!("Network layout loaded");
    info!("Number of stations : {}", layout.stations.len());
    info!("Number of lines : {}", layout.lines.len());
    info!(
        "Number of travel time records : {}",
        layout.travel_times.len()
    );

    let network_timer = SystemTime::now();
    let network = TransportNetwork::from_layout(&layout)
        .context("Could not build the transport network from the layout")?;
    if let Ok(duration) = network_timer.elapsed() {
        info!("Network constructed in {} ms", duration.as_millis());
    }
    Ok((network, layout))
}
