//! The thread's shared task arena.
//!
//! Hosts that want one arena reachable from anywhere (rather than passing a
//! [`TaskArena`] around) initialize it here once. The arena is per thread
//! and created lazily on first use. It is leaked, not dropped: it lives
//! until the process exits, and every thread that initializes one keeps its
//! buffer allocated for that long. Because handles may be borrowing it at
//! any time, it is rewound with [`TaskArena::try_reset`], or with
//! [`TaskArena::reset_unchecked`] once abandoned handles block that.

use std::cell::OnceCell;

use tracing::{debug, warn};

use crate::arena::TaskArena;
use crate::config::ArenaConfig;
use crate::error::ArenaError;

thread_local! {
    static SHARED: OnceCell<&'static TaskArena> = const { OnceCell::new() };
}

/// Get the thread's shared arena, creating it from `config` if needed.
///
/// The first successful call fixes the configuration. A later call with a
/// different configuration gets the existing arena back unchanged; the
/// mismatch is logged as a warning. Use [`try_initialize`] to treat it as
/// an error instead.
pub fn initialize(config: ArenaConfig) -> Result<&'static TaskArena, ArenaError> {
    let arena = get_or_create(config)?;
    if *arena.config() != config {
        warn!(
            existing = %arena.config(),
            requested = %config,
            "shared task arena already initialized; keeping existing configuration"
        );
    }
    Ok(arena)
}

/// Like [`initialize`], but a configuration mismatch is an error.
pub fn try_initialize(config: ArenaConfig) -> Result<&'static TaskArena, ArenaError> {
    let arena = get_or_create(config)?;
    if *arena.config() != config {
        return Err(ArenaError::ConfigMismatch {
            existing: *arena.config(),
            requested: config,
        });
    }
    Ok(arena)
}

/// The thread's shared arena, if it has been initialized.
pub fn get() -> Option<&'static TaskArena> {
    SHARED.with(|cell| cell.get().copied())
}

fn get_or_create(config: ArenaConfig) -> Result<&'static TaskArena, ArenaError> {
    if let Some(arena) = get() {
        return Ok(arena);
    }
    let arena: &'static TaskArena = Box::leak(Box::new(TaskArena::new(config)?));
    SHARED.with(|cell| {
        // Nothing between the `get` above and here can re-enter.
        let _ = cell.set(arena);
    });
    debug!(%config, "shared task arena initialized");
    Ok(arena)
}
