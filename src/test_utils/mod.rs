//! Test utilities for provdeps
//!
//! Builders for status snapshots, on-disk fixtures for CLI tests, and a once-only
//! tracing initializer.
//!
//! # Example
//!
//! ```rust,no_run
//! use provdeps::test_utils::{PipelineRunBuilder, TaskRunBuilder};
//!
//! let run = PipelineRunBuilder::new("release")
//!     .task("build")
//!     .task_run(
//!         TaskRunBuilder::new("release-build")
//!             .for_pipeline_task("build")
//!             .step("compile", "reg/builder@sha256:b1")
//!             .build(),
//!     )
//!     .build();
//! ```

pub mod builder;
pub mod fixtures;

pub use builder::{PipelineRunBuilder, TaskRunBuilder};
pub use fixtures::StatusFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` when set, otherwise stays silent.
///
/// ```bash
/// RUST_LOG=provdeps=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
