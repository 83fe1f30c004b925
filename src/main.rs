mod app;

use env_logger::Env;
use std::process;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    if let Err(err) = app::run() {
        eprintln!("❌ {:#}", err);
        process::exit(1);
    }
}
