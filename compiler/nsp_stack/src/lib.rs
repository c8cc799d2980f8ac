//! Stack growth for deep recursion over nested forms.
//!
//! Forms arrive from arbitrary source text, so nesting depth is controlled
//! by whoever wrote the unit. The reader, the rewriter and the reference
//! evaluator all recurse once per nesting level; each recursive step is
//! wrapped in [`ensure_sufficient_stack`] so a pathologically nested form
//! grows the stack instead of overflowing it.
//!
//! On `wasm32` the call is a plain passthrough.

/// Grow when less than this much stack remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
