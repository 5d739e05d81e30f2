//! Keelc - one compilation unit's worth of the Keel semantic core.
//!
//! A [`Session`] owns the type pool, the name interner, the type
//! directory, the expression arena, the constant table and the diagnostic
//! queue, and exposes the semantic operations over them:
//!
//! - coercion: [`Session::implicit_coercion`], [`Session::explicit_coercion`],
//!   [`Session::coerce_to_index`], [`Session::is_better_match`]
//! - constants: [`Session::evaluate`], [`Session::evaluate_field`]
//! - types: [`Session::unify`], [`Session::cardinality`],
//!   [`Session::expr_cardinality`], [`Session::element_type`]
//!
//! Failures are collected as diagnostics; drain them with
//! [`Session::take_diagnostics`].
//!
//! # Debugging
//!
//! Call [`init_tracing`] once, then set `KEEL_LOG` (or `RUST_LOG`):
//!
//! - `KEEL_LOG=keel_typeck=debug`: conversions chosen by the coercion engine.
//! - `KEEL_LOG=keel_eval=trace`: every constant evaluation, nested.

mod session;

use std::sync::Once;

pub use session::{Session, SessionConfig};

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber.
///
/// The filter comes from `KEEL_LOG`, or `RUST_LOG` when that is unset.
/// Without either, nothing is installed. Later calls do nothing.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let filter = ["KEEL_LOG", "RUST_LOG"]
            .into_iter()
            .find_map(|var| std::env::var(var).ok());
        let Some(filter) = filter else {
            return;
        };
        let layer = tracing_tree::HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true);
        // Another subscriber may already be installed by the embedding tool.
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new(filter))
            .with(layer)
            .try_init();
    });
}
