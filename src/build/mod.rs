//! Build Pipeline
//!
//! Compiler invocation and TeX log normalization.

pub mod engine;
pub mod log;

pub use engine::{build, BuildConfig, BuildOutcome, BuildStatus};
pub use log::{parse_log, BuildError, BuildErrorKind};
