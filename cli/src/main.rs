use anyhow::Error;
use structopt::StructOpt;

use heimdall_cli::{random, route};

#[derive(StructOpt)]
#[structopt(
    name = "heimdall_cli",
    about = "Offline route queries over a network layout document.",
    rename_all = "snake_case"
)]
enum Options {
    /// solve one route query between two stations
    Route(route::Options),
    /// solve random route queries, for smoke-testing a layout
    Random(random::Options),
}

fn main() {
    launch::logger::init_logger();
    if let Err(err) = run() {
        for cause in err.chain() {
            eprintln!("{}", cause);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let options = Options::from_args();
    match options {
        Options::Route(options) => route::launch(options),
        Options::Random(options) => random::launch(options),
    }
}
