//! Cx executor.
//!
//! Runs flattened, compiled Cx programs on an evaluation stack:
//! - `Executor`: fetch/store, call dispatch, and chunk execution
//! - `BuiltinRegistry`: the shared scalar and stream member tables
//! - `Tracer`: routine, statement, and data trace announcements
//!
//! Diagnostic logging goes through `tracing`; the user-visible trace of a
//! running program goes to the executor's `OutputSink`.

mod errors;
mod executor;
mod format;
pub mod output;
mod registry;
mod stack;
mod streams;
mod tracer;
mod value;

use std::sync::Once;

pub use errors::{EvalError, EvalResult};
pub use executor::Executor;
pub use format::{format_g, FLOAT_DIGITS};
pub use output::{buffer_sink, silent_sink, stdout_sink, OutputSink, SharedOutput};
pub use registry::{BuiltinRegistry, RegistryError};
pub use stack::{ensure_sufficient_stack, EvalStack};
pub use streams::StreamTable;
pub use tracer::{render_value, Tracer};
pub use value::{CharBuffer, Place, StackItem, StreamId, VarAddr};

static TRACING_INIT: Once = Once::new();

/// Install a `RUST_LOG`-filtered subscriber for the `cx_*` crates'
/// diagnostic events, e.g. `RUST_LOG=cx_eval=debug,cx_symtab=trace`.
///
/// Does nothing when `RUST_LOG` is unset or unparsable, or when a
/// subscriber is already installed. Program trace output never goes
/// through here; it is written to the executor's `OutputSink`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        let installed = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).without_time())
            .with(filter)
            .try_init();
        if installed.is_err() {
            tracing::debug!("diagnostic subscriber already installed");
        }
    });
}
