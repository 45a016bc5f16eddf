use derive_builder::Builder;
use derive_more::Debug;
use std::sync::Arc;
use tracing::info;

use crate::greeter::config::Config;
use crate::greeter::controller::{self, OnGreetingFn};
use crate::greeter::{greeting, region};

#[derive(Debug, Builder)]
#[builder(pattern = "owned")]
pub struct ThreadedController {
    config: Arc<Config>,
    #[builder(default)]
    #[debug(skip)]
    greeting_subscriber: Option<Arc<OnGreetingFn>>,
}

impl ThreadedController {
    /// Enters the parallel region and joins the whole team before returning.
    pub fn run(self) {
        let num_threads = self.config.region().num_threads;
        info!("Starting threaded greeter with {} threads.", num_threads);

        region::enter("greeter", num_threads, |thread, _| {
            emit_line(thread, &self.greeting_subscriber);
        });
    }
}

fn emit_line(thread: u32, subscriber: &Option<Arc<OnGreetingFn>>) {
    controller::emit(greeting::threaded_greeting(thread), subscriber);
}
