//! Core Workspace Model
//!
//! Documents, the store that owns them, and build root resolution.

pub mod document;
pub mod store;
pub mod workspace;

pub use document::{Analysis, Document, Language};
pub use store::DocumentStore;
pub use workspace::Workspace;
