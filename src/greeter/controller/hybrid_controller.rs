use derive_builder::Builder;
use derive_more::Debug;
use nohash_hasher::IntMap;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use tracing::info;

use crate::greeter::config::Config;
use crate::greeter::controller;
use crate::greeter::controller::{MemberArgumentsBuilder, OnGreetingFn};
use crate::greeter::process_group::{DummyProcessGroup, LocalProcessGroup, ProcessGroup};

#[derive(Debug, Builder)]
#[builder(pattern = "owned")]
pub struct HybridController {
    config: Arc<Config>,
    #[builder(default)]
    #[debug(skip)]
    greeting_subscriber: Option<Arc<OnGreetingFn>>,
}

impl HybridController {
    /// Runs the hybrid greeter and joins all member threads before returning.
    pub fn run(self) {
        let num_processes = self.config.group().num_processes;

        if num_processes == 1 {
            // No second member, no thread to spawn. The calling thread acts
            // as the single group member.
            let args = MemberArgumentsBuilder::default()
                .group(DummyProcessGroup())
                .config(self.config.clone())
                .greeting_subscriber(self.greeting_subscriber.clone())
                .build()
                .unwrap();
            controller::execute_member(args);
            return;
        }

        info!("Starting hybrid greeter with {} processes.", num_processes);
        let groups = LocalProcessGroup::create(num_processes);

        let handles: IntMap<u32, JoinHandle<()>> = groups
            .into_iter()
            .map(|group| {
                let rank = group.rank();
                let args = MemberArgumentsBuilder::default()
                    .group(group)
                    .config(self.config.clone())
                    .greeting_subscriber(self.greeting_subscriber.clone())
                    .build()
                    .unwrap();
                (
                    rank,
                    thread::Builder::new()
                        .name(format!("greeter-{}", rank))
                        .spawn(move || controller::execute_member(args))
                        .expect("Failed to spawn member thread"),
                )
            })
            .collect();

        controller::try_join(handles);
    }
}
