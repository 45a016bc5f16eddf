use std::sync::{Arc, Barrier};
use tracing::info;

use crate::greeter::context::ProcessorName;

/// The distributed execution group a hybrid greeter member belongs to.
/// Constructing a group value joins the group; dropping it after the final
/// barrier leaves it.
pub trait ProcessGroup: Send {
    fn rank(&self) -> u32;

    fn size(&self) -> u32;

    fn processor_name(&self) -> ProcessorName;

    /// Blocks until every member of the group has arrived.
    fn barrier(&self);
}

/// The degenerate group with a single member. Used when no second process
/// takes part in the run.
#[derive(Debug)]
pub struct DummyProcessGroup();

impl ProcessGroup for DummyProcessGroup {
    fn rank(&self) -> u32 {
        0
    }

    fn size(&self) -> u32 {
        1
    }

    fn processor_name(&self) -> ProcessorName {
        ProcessorName::resolve()
    }

    fn barrier(&self) {
        info!("Barrier was called on DummyProcessGroup, which doesn't do anything.")
    }
}

/// Group members backed by a shared in-process barrier. Each value is meant
/// to be moved onto its own member thread, which then acts as one "process"
/// of the run.
#[derive(Debug)]
pub struct LocalProcessGroup {
    rank: u32,
    size: u32,
    barrier: Arc<Barrier>,
    processor_name: ProcessorName,
}

impl LocalProcessGroup {
    /// Creates all members of a group of the given size. Members share one
    /// barrier and, since they run on the same machine, one resolved
    /// processor name.
    pub fn create(num_members: u32) -> Vec<LocalProcessGroup> {
        let barrier = Arc::new(Barrier::new(num_members as usize));
        let processor_name = ProcessorName::resolve();
        info!(
            "Resolved processor name {} ({} bytes)",
            processor_name,
            processor_name.reported_len()
        );

        (0..num_members)
            .map(|rank| LocalProcessGroup {
                rank,
                size: num_members,
                barrier: barrier.clone(),
                processor_name: processor_name.clone(),
            })
            .collect()
    }
}

impl ProcessGroup for LocalProcessGroup {
    fn rank(&self) -> u32 {
        self.rank
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn processor_name(&self) -> ProcessorName {
        self.processor_name.clone()
    }

    fn barrier(&self) {
        self.barrier.wait();
    }
}
