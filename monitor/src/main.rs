use heimdall_monitor::launch_monitor;

fn main() {
    launch::logger::init_logger();
    if let Err(err) = launch_monitor() {
        for cause in err.chain() {
            eprintln!("{}", cause);
        }
        std::process::exit(1);
    }
}
