//! Stack growth for recursive semantic walks.
//!
//! Coercing a deeply nested tuple, stripping a long alias chain or folding
//! a constant whose initializer references many other constants all recurse
//! once per level. Each such walk runs its recursive step inside
//! [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: passthrough.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn strip_alias(&self, ty: TypeId) -> TypeId {
///     ensure_sufficient_stack(|| match self.pool.data(ty) {
///         TypeData::Alias { target, .. } => self.strip_alias(target),
///         _ => ty,
///     })
/// }
/// ```
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
