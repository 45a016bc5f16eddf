pub mod hybrid_controller;
pub mod threaded_controller;

use derive_builder::Builder;
use derive_more::Debug;
use nohash_hasher::IntMap;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::info;

use crate::greeter::config::Config;
use crate::greeter::context::ExecutionContext;
use crate::greeter::process_group::ProcessGroup;
use crate::greeter::{greeting, logging, region};

/// Callback invoked with every emitted greeting line, in addition to the
/// write to stdout. Tests use this to observe the emitted set of lines
/// without scraping process output.
pub type OnGreetingFn = dyn Fn(String) + Send + Sync;

/// Arguments handed to the thread running one member of the execution group.
#[derive(Debug, Builder)]
#[builder(pattern = "owned")]
pub struct MemberArguments<G: ProcessGroup> {
    group: G,
    config: Arc<Config>,
    #[builder(default)]
    #[debug(skip)]
    greeting_subscriber: Option<Arc<OnGreetingFn>>,
}

/// Runs one group member: queries its identity, enters the parallel region
/// in which every team thread emits a greeting, then passes the group-leave
/// barrier.
pub(crate) fn execute_member<G: ProcessGroup>(args: MemberArguments<G>) {
    let _guards = logging::init_logging(&args.config, args.group.rank());

    let group = args.group;
    let rank = group.rank();
    let size = group.size();
    let processor_name = group.processor_name();
    let num_threads = args.config.region().num_threads;
    let subscriber = args.greeting_subscriber;

    info!("Process #{rank} of {size} joined the group on {processor_name}.");

    region::enter(
        &format!("greeter-{rank}"),
        num_threads,
        |thread, num_threads| {
            let ctx = ExecutionContext {
                rank,
                world_size: size,
                thread,
                num_threads,
                processor_name: processor_name.clone(),
            };
            emit(greeting::hybrid_greeting(&ctx), &subscriber);
        },
    );

    info!("Process #{rank} at barrier.");
    group.barrier();
    info!("Process #{rank} finishing.");

    // Drop guards here to make sure that the logging is flushed before the
    // member thread exits.
    drop(_guards);
}

/// Writes one greeting line to stdout. Lines from different threads may
/// interleave in any order, there is no synchronization across writers.
pub(crate) fn emit(line: String, subscriber: &Option<Arc<OnGreetingFn>>) {
    println!("{line}");
    if let Some(subscriber) = subscriber {
        subscriber(line);
    }
}

/// Joins all member threads.
pub fn try_join(handles: IntMap<u32, JoinHandle<()>>) {
    for (_, handle) in handles {
        let name = handle
            .thread()
            .name()
            .unwrap_or("unnamed_thread")
            .to_string();
        handle
            .join()
            .unwrap_or_else(|_| panic!("Error in member thread {:?}", name));
    }
}
