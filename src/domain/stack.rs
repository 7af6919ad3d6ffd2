//! Stack growth for the recursive parts of evaluation.
//!
//! Bracket nesting and reference chains both recurse; `stacker` grows the
//! stack on demand so that the explicit reference depth limit, not the
//! thread's stack size, decides how deep a formula may go.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
