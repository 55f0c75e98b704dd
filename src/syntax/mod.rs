//! Source Analysis
//!
//! Extraction of inclusion trees from raw document text.

pub mod latex;

pub use latex::{analyze, IncludeKind, IncludeLink, LatexAnalysis};
