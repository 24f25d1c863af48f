//! Frame loop: queue, run and reset a batch of entity tasks every frame.
//!
//! Run with `RUST_LOG=taskpool_arena=debug` to watch arena creation and
//! resets, or `RUST_LOG=trace` to see every allocation and queue operation.

use taskpool_arena::{ArenaError, TaskArena};
use taskpool_bench::{reference_profile, run_frame, Entity};
use tracing_subscriber::EnvFilter;

const FRAMES: usize = 5;
const ENTITIES: usize = 40;

fn main() -> Result<(), ArenaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut arena = TaskArena::new(reference_profile())?;
    let mut entities = vec![Entity::new(100); ENTITIES];
    let mut events = 0u64;

    println!("arena: {}", arena.config());
    for frame in 0..FRAMES {
        let damage = frame as i32 + 1;
        let ran = run_frame(&arena, &mut entities, damage, &mut events)?;
        let stats = arena.stats();
        println!(
            "frame {frame}: {ran} tasks, {} / {} bytes used, generation {}",
            stats.used, stats.capacity, stats.generation
        );
        arena.reset();
    }

    // One frame too many entities for the budget: the failure is reported,
    // the arena stays usable.
    let mut crowd = vec![Entity::new(100); ENTITIES * 2];
    match run_frame(&arena, &mut crowd, 1, &mut events) {
        Ok(ran) => println!("crowd frame: {ran} tasks"),
        Err(err) => println!("crowd frame rejected: {err}"),
    }
    arena.reset();

    let stats = arena.stats();
    println!(
        "done: {events} events, entity 0 health {}, high water {} bytes, {} allocations",
        entities[0].health, stats.high_water, stats.allocations
    );
    Ok(())
}
