//! Benchmark profiles and workloads for taskpool.
//!
//! Provides pre-built [`ArenaConfig`] profiles and a frame workload shared
//! by the Criterion benches and the `frame_loop` example:
//!
//! - [`reference_profile`]: the default 100-task budget
//! - [`stress_profile`]: 10K tasks per frame
//! - [`run_frame`]: queue, drain and release one frame of entity tasks

#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use taskpool_arena::{make_fn_task, make_method_task, ArenaConfig, ArenaError, TaskArena};
use taskpool_core::TaskArg;
use taskpool_queue::TaskQueue;

/// The default per-frame budget: 100 tasks of either built-in variant.
pub fn reference_profile() -> ArenaConfig {
    ArenaConfig::default()
}

/// A stress budget: 10K tasks per frame.
pub fn stress_profile() -> ArenaConfig {
    ArenaConfig::new(10_000)
}

/// A game entity whose state is updated by bound-method tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entity {
    pub health: i32,
    pub hits: u32,
}

impl Entity {
    /// Create an entity at full health.
    pub fn new(health: i32) -> Self {
        Self { health, hits: 0 }
    }

    /// Method task body: subtract `index` points of damage.
    pub fn apply_damage(&mut self, _arg: TaskArg, index: i32) {
        self.health -= index;
        self.hits += 1;
    }
}

/// Free-function task body: count one event in the `u64` behind `arg`.
pub fn count_event(arg: TaskArg, _index: i32) {
    // SAFETY: `run_frame` always passes a `&mut u64`.
    #[allow(unsafe_code)]
    let counter = unsafe { arg.as_mut::<u64>() };
    if let Some(counter) = counter {
        *counter += 1;
    }
}

/// Run one frame: for every entity queue a damage task and an event task,
/// then drain the queue invoking and releasing each one.
///
/// Returns the number of tasks run. The caller resets the arena afterwards.
pub fn run_frame(
    arena: &TaskArena,
    entities: &mut [Entity],
    damage: i32,
    events: &mut u64,
) -> Result<usize, ArenaError> {
    let mut queue = TaskQueue::new(arena);
    for entity in entities.iter_mut() {
        queue.push(make_method_task(arena, entity, Entity::apply_damage)?);
        queue.push(make_fn_task(arena, count_event)?);
    }

    let mut ran = 0;
    while let Some(mut task) = queue.pop() {
        task.invoke(TaskArg::from_mut(&mut *events), damage);
        arena.release(task)?;
        ran += 1;
    }
    Ok(ran)
}
