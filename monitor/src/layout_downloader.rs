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

//! HTTPS download of the network-layout document.

use std::path::Path;

use anyhow::{bail, Context, Error};
use launch::heimdall::NetworkLayout;

/// Downloads the layout document over HTTPS, verifying the server against
/// the same PEM trust store as the WebSocket carrier.
pub struct LayoutDownloader {
    client: reqwest::Client,
    layout_url: String,
}

impl LayoutDownloader {
    pub fn new(layout_url: &str, cert_path: &Path) -> Result<Self, Error> {
        let pem = std::fs::read(cert_path)
            .context(format!("Could not read certificate file {:?}", cert_path))?;
        let certificate = reqwest::Certificate::from_pem(&pem)
            .context(format!("Could not parse certificate file {:?}", cert_path))?;
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .add_root_certificate(certificate)
            .build()
            .context("Could not build the http client")?;
        Ok(Self {
            client,
            layout_url: layout_url.to_string(),
        })
    }

    pub async fn download_layout(&self) -> Result<NetworkLayout, Error> {
        let response = self
            .client
            .get(&self.layout_url)
            .send()
            .await
            .context(format!("Cannot download layout from {}", self.layout_url))?;
        if !response.status().is_success() {
            bail!(
                "Error while downloading layout from {}, status code : {}",
                self.layout_url,
                response.status()
            );
        }
        let bytes = response
            .bytes()
            .await
            .context("Error while reading the layout response body")?;
        let layout: NetworkLayout = serde_json::from_slice(&bytes)
            .context("Could not parse the downloaded layout document")?;
        Ok(layout)
    }
}
