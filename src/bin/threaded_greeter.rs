use clap::Parser;
use rust_greeter::greeter::config::{CommandLineArgs, Config};
use rust_greeter::greeter::controller::threaded_controller::ThreadedControllerBuilder;
use rust_greeter::greeter::logging::init_std_err_logging_thread_local;
use std::sync::Arc;
use tracing::info;

fn main() {
    let _guard = init_std_err_logging_thread_local();

    let args = CommandLineArgs::parse();
    info!("Started with args: {:?}", args);

    let config = Arc::new(Config::try_from(args).expect("Failed to load configuration"));

    let controller = ThreadedControllerBuilder::default()
        .config(config)
        .build()
        .unwrap();

    controller.run()
}
