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

use std::path::PathBuf;

use anyhow::{bail, Error};
use launch::config::PlannerParams;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(
    name = "heimdall_monitor",
    about = "Run the heimdall network monitor.",
    rename_all = "snake_case"
)]
pub enum Options {
    /// configure the monitor with command line flags
    Cli(MonitorConfig),
    /// configure the monitor with a toml config file
    ConfigFile(ConfigFile),
}

#[derive(StructOpt)]
pub struct ConfigFile {
    /// path to the toml config file
    #[structopt(parse(from_os_str))]
    pub file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
#[structopt(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// host of the messaging endpoint
    #[structopt(long)]
    pub url: String,

    /// websocket path on the messaging endpoint
    #[structopt(long)]
    pub endpoint: String,

    /// port of the messaging endpoint
    #[structopt(long, default_value = DEFAULT_PORT)]
    #[serde(default = "default_port")]
    pub port: String,

    /// stomp login
    #[structopt(long)]
    pub username: String,

    /// stomp passcode
    #[structopt(long)]
    pub password: String,

    /// stomp subscription destination
    #[structopt(long, default_value = DEFAULT_STOMP_ENDPOINT)]
    #[serde(default = "default_stomp_endpoint")]
    pub stomp_endpoint: String,

    /// pem trust store used to authenticate the server
    #[structopt(long, parse(from_os_str))]
    pub cert_path: PathBuf,

    /// path to the json network layout document
    #[structopt(long, parse(from_os_str))]
    #[serde(default)]
    pub network_layout_path: Option<PathBuf>,

    /// url to download the network layout document from, used when no local
    /// path is given
    #[structopt(long)]
    #[serde(default)]
    pub network_layout_url: Option<String>,

    /// stop the monitor after this many seconds
    #[structopt(long)]
    #[serde(default)]
    pub runtime_s: Option<u64>,

    #[structopt(flatten)]
    #[serde(default)]
    pub planner: PlannerParams,
}

pub const DEFAULT_PORT: &str = "443";
pub const DEFAULT_STOMP_ENDPOINT: &str = "/passengers";

pub fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

pub fn default_stomp_endpoint() -> String {
    DEFAULT_STOMP_ENDPOINT.to_string()
}

/// Where the layout document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Local(PathBuf),
    Remote(String),
}

impl MonitorConfig {
    pub fn layout_source(&self) -> Result<LayoutSource, Error> {
        if let Some(path) = &self.network_layout_path {
            return Ok(LayoutSource::Local(path.clone()));
        }
        if let Some(url) = &self.network_layout_url {
            return Ok(LayoutSource::Remote(url.clone()));
        }
        bail!("No network layout source configured: set network_layout_path or network_layout_url")
    }
}

pub fn read_config(config_file_path: &std::path::Path) -> Result<MonitorConfig, Error> {
    let content = std::fs::read_to_string(config_file_path).map_err(|e| {
        anyhow::anyhow!("Error opening config file {:?} : {}", config_file_path, e)
    })?;
    let config: MonitorConfig = toml::from_str(&content).map_err(|e| {
        anyhow::anyhow!("Error reading config file {:?} : {}", config_file_path, e)
    })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, str::FromStr};

    use super::{read_config, LayoutSource};

    fn config_file(name: &str) -> PathBuf {
        PathBuf::from_str(env!("CARGO_MANIFEST_DIR"))
            .unwrap()
            .join("config_files")
            .join(name)
    }

    #[test]
    fn test_config_with_local_layout() {
        let path = config_file("local_layout.toml");
        let config = read_config(&path).unwrap();
        assert_eq!(config.port, "443");
        assert_eq!(config.stomp_endpoint, "/passengers");
        assert_eq!(
            config.layout_source().unwrap(),
            LayoutSource::Local(PathBuf::from("tests/network-layout.json"))
        );
        assert_eq!(config.planner.change_penalty, 5);
    }

    #[test]
    fn test_config_with_remote_layout() {
        let path = config_file("remote_layout.toml");
        let config = read_config(&path).unwrap();
        assert_eq!(config.runtime_s, Some(120));
        assert_eq!(config.planner.change_penalty, 8);
        assert!(matches!(
            config.layout_source().unwrap(),
            LayoutSource::Remote(_)
        ));
    }

    #[test]
    fn test_typo_in_config() {
        let path = config_file("typo_in_config.toml");
        assert!(read_config(&path).is_err());
    }

    #[test]
    fn test_missing_layout_source() {
        let path = config_file("no_layout.toml");
        let config = read_config(&path).unwrap();
        assert!(config.layout_source().is_err());
    }
}
