use std::thread;

/// Enters a parallel region: spawns a team of `num_threads` named threads,
/// runs `f(thread, num_threads)` on each of them and joins the whole team
/// before returning. A panic on any team thread propagates after all threads
/// have been joined.
///
/// The caller thread only forks and waits; it never runs `f` itself, so the
/// team for `num_threads == 1` still consists of one spawned thread.
pub fn enter<F>(name_prefix: &str, num_threads: u32, f: F)
where
    F: Fn(u32, u32) + Send + Sync,
{
    let f = &f;
    thread::scope(|scope| {
        for thread in 0..num_threads {
            thread::Builder::new()
                .name(format!("{name_prefix}-{thread}"))
                .spawn_scoped(scope, move || f(thread, num_threads))
                .expect("Failed to spawn region thread");
        }
        // leaving the scope joins all team threads
    });
}
