//! LaTeX Language Server
//!
//! A Language Server Protocol implementation for LaTeX projects.
//!
//! This library provides:
//! - A workspace model with cross-file inclusion tracking
//! - Build root resolution
//! - Compiler invocation and TeX log parsing
//! - Diagnostics publishing per build cycle

pub mod build;
pub mod config;
pub mod core;
pub mod lsp;
pub mod syntax;

// Re-exports for clean public API
pub use build::{BuildConfig, BuildOutcome, BuildStatus};
pub use config::Config;
pub use core::{Document, DocumentStore, Language, Workspace};
pub use syntax::latex::LatexAnalysis;
