use crate::greeter::context::ExecutionContext;

/// The line every hybrid greeter thread emits. The format is part of the
/// external interface and pinned by tests.
pub fn hybrid_greeting(ctx: &ExecutionContext) -> String {
    format!(
        "Hello world from thread {} out of {} from process {} out of {} on {}",
        ctx.thread, ctx.num_threads, ctx.rank, ctx.world_size, ctx.processor_name
    )
}

/// The line every threaded greeter thread emits.
pub fn threaded_greeting(thread: u32) -> String {
    format!("Hello world from thread {thread}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greeter::context::ProcessorName;

    #[test]
    fn hybrid_format() {
        let ctx = ExecutionContext {
            rank: 1,
            world_size: 2,
            thread: 3,
            num_threads: 4,
            processor_name: ProcessorName::resolve(),
        };
        assert_eq!(
            hybrid_greeting(&ctx),
            format!(
                "Hello world from thread 3 out of 4 from process 1 out of 2 on {}",
                ctx.processor_name
            )
        );
    }

    #[test]
    fn threaded_format() {
        assert_eq!(threaded_greeting(0), "Hello world from thread 0");
        assert_eq!(threaded_greeting(7), "Hello world from thread 7");
    }
}
