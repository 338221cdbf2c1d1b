//! Process-wide program statistics.
//!
//! Every pick program pool in the process reports here, so the counters give
//! a global view for diagnostics overlays and leak checks.

use std::sync::atomic::{AtomicUsize, Ordering};

static ACTIVE_PROGRAMS: AtomicUsize = AtomicUsize::new(0);
static PROGRAMS_COMPILED: AtomicUsize = AtomicUsize::new(0);

/// Records a program variant entering a pool.
pub fn program_created() {
    ACTIVE_PROGRAMS.fetch_add(1, Ordering::Relaxed);
}

/// Records a program variant leaving a pool.
pub fn program_destroyed() {
    // Saturate so an unbalanced call can't wrap the counter.
    let _ = ACTIVE_PROGRAMS.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
}

/// Records a successful compile, including recompiles after device loss.
pub fn program_compiled() {
    PROGRAMS_COMPILED.fetch_add(1, Ordering::Relaxed);
}

/// Number of program variants currently held by pools.
pub fn active_programs() -> usize {
    ACTIVE_PROGRAMS.load(Ordering::Relaxed)
}

/// Total number of successful compiles.
pub fn programs_compiled() -> usize {
    PROGRAMS_COMPILED.load(Ordering::Relaxed)
}
