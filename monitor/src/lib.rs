pub mod layout_downloader;
pub mod monitor_config;
pub mod monitor_worker;
pub mod stomp_client;
pub mod stomp_frame;
pub mod websocket_client;

use anyhow::Error;
use launch::heimdall::tracing::debug;
use monitor_config::{read_config, Options};
use structopt::StructOpt;

pub fn launch_monitor() -> Result<(), Error> {
    let options =
        Options::from_iter_safe(std::env::args()).map_err(|err| anyhow::anyhow!("{}", err))?;
    let config = match options {
        Options::Cli(config) => config,
        Options::ConfigFile(config_file) => read_config(&config_file.file)?,
    };
    debug!("Launching with config : {:#?}", config);
    let worker = monitor_worker::MonitorWorker::new(config)?;
    worker.run_blocking()
}
